//! The hash-table capability bundle [`Heap`](crate::Heap) consumes.
//!
//! Spec §6 describes this as "a plain record carrying... function pointers
//! for init/insert/search/remove/free" — a vtable, in C terms, letting the
//! heap be parameterized over alternative hash table families without
//! naming a concrete type. The idiomatic Rust reading of a vtable the heap
//! is generic over (rather than one it calls through dynamically) is a
//! trait bound on the heap's own type parameter, so that's what this is:
//! [`Heap`](crate::Heap) is generic over any `SideIndex<E>` implementor, not
//! hard-wired to [`crate::Table`].

/// An element-to-slot side-index, as consumed by [`Heap`](crate::Heap).
///
/// An implementor maps element byte-patterns to their current array slot.
/// [`crate::Table`] is the bundled implementation; a different hash table
/// family (e.g. open addressing) can be substituted by implementing this
/// trait without touching `heap` module code.
pub trait SideIndex<E> {
    /// Constructs an empty index, sized for roughly `value_hint` entries.
    fn with_capacity_hint(value_hint: usize) -> Self;

    /// Maps `key` to `slot`, overwriting any prior mapping for `key`. This is
    /// the "compensating upsert" [`Heap`](crate::Heap) issues after every
    /// mutation that moves an element in its array.
    fn upsert(&mut self, key: &E, slot: usize)
    where
        E: Clone;

    /// Returns the slot currently mapped to `key`, if any.
    fn get(&self, key: &E) -> Option<usize>;

    /// Removes and returns the slot mapped to `key`, if any.
    fn remove(&mut self, key: &E) -> Option<usize>;
}

impl<E> SideIndex<E> for crate::Table<E, usize>
where
    E: AsRef<[u8]> + PartialEq,
{
    fn with_capacity_hint(value_hint: usize) -> Self {
        crate::Table::with_config(crate::TableConfig {
            min_num: value_hint,
            ..crate::TableConfig::default()
        })
        .expect("default alpha/log_alpha_d are always valid")
    }

    fn upsert(&mut self, key: &E, slot: usize)
    where
        E: Clone,
    {
        self.insert(key.clone(), slot);
    }

    fn get(&self, key: &E) -> Option<usize> {
        self.search(key).copied()
    }

    fn remove(&mut self, key: &E) -> Option<usize> {
        crate::Table::remove(self, key)
    }
}
