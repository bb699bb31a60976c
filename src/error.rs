//! Error types for [`crate::Table`] and [`crate::Heap`].
//!
//! The original `st_hash`/indexed-heap pairing this crate is modeled on treats
//! allocation failure, capacity overflow, and misuse of an uninitialized table
//! as fatal, process-aborting conditions. Rust's global allocator already
//! aborts on allocation failure, so this crate only needs to surface the
//! conditions the original caller was expected to avoid: capacity overflow and
//! operating on a key that isn't present. Once either is returned, the
//! structure should be treated as poisoned — see the note on [`HeapError`] and
//! [`TableError`].

/// Errors returned by [`crate::Heap`] operations.
///
/// A returned `HeapError` means the heap's invariants may no longer hold for
/// the operation that produced it (for example, a failed `push` does not
/// grow the array, but a failed `update` may have performed a partial sift).
/// Callers should not continue to use a heap after observing an error from
/// it, mirroring the original library's "fatal" framing for these same
/// conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum HeapError {
    /// `push` was called while the heap was already at its configured
    /// `count_max` and could not grow further.
    #[error("heap is at its configured capacity ({count_max}) and cannot grow")]
    CapacityExceeded {
        /// The configured hard cap that was reached.
        count_max: usize,
    },

    /// `update` was called with an element that is not currently present in
    /// the heap. Checking via `search` first is the caller's responsibility.
    #[error("element is not present in the heap")]
    ElementNotFound,

    /// Capacity arithmetic (doubling `count`) would overflow `usize`.
    #[error("heap capacity computation overflowed")]
    CapacityOverflow,

    /// A [`crate::HeapConfig`] field was out of its documented domain, e.g.
    /// `init_count` of zero.
    #[error("invalid heap configuration: {reason}")]
    InvalidConfig {
        /// Human-readable description of which field failed validation.
        reason: &'static str,
    },
}

/// Errors returned by [`crate::Table`] operations and constructors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TableError {
    /// A [`crate::TableConfig`] field was out of its documented domain, e.g.
    /// `log_alpha_d` at or beyond the number of bits in the index word.
    #[error("invalid table configuration: {reason}")]
    InvalidConfig {
        /// Human-readable description of which field failed validation.
        reason: &'static str,
    },
}
