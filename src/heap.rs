//! The indexed min-heap: a binary heap over `(priority, element)` pairs,
//! paired with a side-index so elements can be found, and have their
//! priority updated, by value rather than by a separately tracked handle.

use core::cmp::Ordering;

use crate::error::HeapError;
use crate::side_index::SideIndex;
use crate::table::Table;

/// The largest slot count a [`Heap`] will ever grow to when constructed with
/// [`Heap::new`]. Matches spec's `HEAP_COUNT_MAX` sentinel.
pub const HEAP_COUNT_MAX: usize = usize::MAX;

/// Configuration for a [`Heap`], mirroring spec §4.2's enumerated fields.
pub struct HeapConfig<E> {
    /// Initial array capacity. Must be `> 0`.
    pub init_count: usize,
    /// Hard cap on the array's slot count.
    pub count_max: usize,
    /// Destructor invoked on every element the heap still owns when it is
    /// dropped (spec §3, "Element (E)").
    pub free_elt: Option<Box<dyn FnMut(E)>>,
}

impl<E> Default for HeapConfig<E> {
    fn default() -> Self {
        Self {
            init_count: 16,
            count_max: HEAP_COUNT_MAX,
            free_elt: None,
        }
    }
}

impl<E> HeapConfig<E> {
    fn validate(&self) -> Result<(), HeapError> {
        if self.init_count == 0 {
            return Err(HeapError::InvalidConfig {
                reason: "init_count must be > 0",
            });
        }
        Ok(())
    }
}

/// A generic indexed minimum-priority heap.
///
/// `P` is the priority type, ordered by a user-supplied comparator rather
/// than `Ord`, so callers can order by a projection or reverse an existing
/// order without a newtype. `E` is the element type; its byte pattern (via
/// [`AsRef<[u8]>`]) is its identity in the side-index, so pushing two
/// elements with equal byte patterns is undefined per spec §3 — the
/// side-index silently collapses onto one slot.
///
/// `S` is the side-index implementation, defaulting to [`Table`]. Swapping
/// in another [`SideIndex`] implementor requires no change to `Heap`'s own
/// code (spec §9, "Capability bundle vs. direct dependency").
pub struct Heap<P, E, F, S = Table<E, usize>>
where
    F: Fn(&P, &P) -> Ordering,
    S: SideIndex<E>,
{
    pairs: Vec<(P, E)>,
    index: S,
    cmp: F,
    count_max: usize,
    free_elt: Option<Box<dyn FnMut(E)>>,
}

impl<P, E, F, S> Heap<P, E, F, S>
where
    E: AsRef<[u8]> + Clone,
    F: Fn(&P, &P) -> Ordering,
    S: SideIndex<E>,
{
    /// Creates a heap ordered by `cmp` with default configuration.
    pub fn new(cmp: F) -> Self {
        Self::with_config(cmp, HeapConfig::default())
            .expect("default configuration is always valid")
    }

    /// Creates a heap ordered by `cmp` from an explicit [`HeapConfig`].
    pub fn with_config(cmp: F, config: HeapConfig<E>) -> Result<Self, HeapError> {
        config.validate()?;
        let HeapConfig {
            init_count,
            count_max,
            free_elt,
        } = config;
        Ok(Self {
            pairs: Vec::with_capacity(init_count),
            index: S::with_capacity_hint(init_count),
            cmp,
            count_max,
            free_elt,
        })
    }

    /// Number of elements currently in the heap.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Current array capacity (spec's `count`).
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.pairs.capacity()
    }

    fn cmp_slots(&self, a: usize, b: usize) -> Ordering {
        (self.cmp)(&self.pairs[a].0, &self.pairs[b].0)
    }

    /// Exchanges the pairs at slots `i` and `j` and issues the two
    /// compensating side-index upserts spec §4.2 requires. A no-op when
    /// `i == j`.
    fn swap(&mut self, i: usize, j: usize) {
        if i == j {
            return;
        }
        self.pairs.swap(i, j);
        let e_i = self.pairs[i].1.clone();
        let e_j = self.pairs[j].1.clone();
        self.index.upsert(&e_i, i);
        self.index.upsert(&e_j, j);
    }

    /// Sift-up from `i`: while `i` has a parent with a strictly greater
    /// priority, swap up. Returns the element's final slot.
    fn sift_up(&mut self, mut i: usize) -> usize {
        while i > 0 {
            let parent = (i - 1) / 2;
            if self.cmp_slots(parent, i) == Ordering::Greater {
                self.swap(i, parent);
                i = parent;
            } else {
                break;
            }
        }
        i
    }

    /// Sift-down from `i`, left-child-wins on a priority tie. Returns the
    /// element's final slot.
    fn sift_down(&mut self, mut i: usize) -> usize {
        loop {
            let left = 2 * i + 1;
            let right = 2 * i + 2;
            if left >= self.pairs.len() {
                break;
            }
            let child = if right >= self.pairs.len() || self.cmp_slots(left, right) != Ordering::Greater {
                left
            } else {
                right
            };
            if self.cmp_slots(i, child) == Ordering::Greater {
                self.swap(i, child);
                i = child;
            } else {
                break;
            }
        }
        i
    }

    fn grow(&mut self) -> Result<(), HeapError> {
        let count = self.pairs.capacity();
        if count >= self.count_max {
            return Err(HeapError::CapacityExceeded {
                count_max: self.count_max,
            });
        }
        let doubled = count.checked_add(count.max(1)).ok_or(HeapError::CapacityOverflow)?;
        let new_count = doubled.min(self.count_max);
        log::debug!("growing heap: {} -> {} slots", count, new_count);
        self.pairs.reserve_exact(new_count - count);
        Ok(())
    }

    /// Pushes `(priority, element)`. Grows the array (doubling, clamped to
    /// `count_max`) if it is full. Returns [`HeapError::CapacityExceeded`] if
    /// the heap is already at `count_max`, or [`HeapError::CapacityOverflow`]
    /// if doubling the capacity would overflow `usize`.
    ///
    /// Pushing an element whose byte pattern equals one already present is
    /// undefined (spec §3): the side-index silently collapses onto a single
    /// slot. Checking via [`Heap::search`] first is the caller's
    /// responsibility.
    pub fn push(&mut self, priority: P, element: E) -> Result<(), HeapError> {
        if self.pairs.len() == self.pairs.capacity() {
            self.grow()?;
        }
        self.pairs.push((priority, element.clone()));
        let idx = self.pairs.len() - 1;
        self.index.upsert(&element, idx);
        self.sift_up(idx);
        Ok(())
    }

    /// Returns the current priority of `element`, or `None` if it isn't
    /// present. The returned reference is valid only until the next call
    /// that mutates this heap (spec §3, Aliasing).
    ///
    /// ```
    /// use core::cmp::Ordering;
    /// use stheap::Heap;
    ///
    /// let mut heap: Heap<i32, Vec<u8>, _> = Heap::new(|a: &i32, b: &i32| a.cmp(b));
    /// heap.push(7, b"a".to_vec()).unwrap();
    /// assert_eq!(heap.search(&b"a".to_vec()), Some(&7));
    ///
    /// // Pushing another element may relocate the region backing the
    /// // reference above, so it cannot be held across the mutating call —
    /// // the borrow checker enforces this at compile time. Re-search instead.
    /// heap.push(1, b"b".to_vec()).unwrap();
    /// assert_eq!(heap.search(&b"a".to_vec()), Some(&7));
    /// ```
    #[must_use]
    pub fn search(&self, element: &E) -> Option<&P> {
        let idx = self.index.get(element)?;
        Some(&self.pairs[idx].0)
    }

    /// Updates `element`'s priority to `priority`. Runs both a sift-up and a
    /// sift-down from the element's slot; exactly one performs actual
    /// motion, covering both decrease-key and increase-key without branching
    /// on the comparison result (spec §4.2). Returns
    /// [`HeapError::ElementNotFound`] if `element` is not present — checking
    /// via [`Heap::search`] first is the caller's responsibility.
    pub fn update(&mut self, priority: P, element: &E) -> Result<(), HeapError> {
        let idx = self.index.get(element).ok_or(HeapError::ElementNotFound)?;
        self.pairs[idx].0 = priority;
        let idx = self.sift_up(idx);
        self.sift_down(idx);
        Ok(())
    }

    /// Removes and returns the minimum-priority element, or `None` if the
    /// heap is empty (a no-op, not an error, per spec §4.2).
    pub fn pop(&mut self) -> Option<(P, E)> {
        if self.pairs.is_empty() {
            return None;
        }
        let last = self.pairs.len() - 1;
        self.swap(0, last);
        let (priority, element) = self.pairs.pop().expect("heap is non-empty");
        self.index.remove(&element);
        if !self.pairs.is_empty() {
            self.sift_down(0);
        }
        Some((priority, element))
    }
}

impl<P, E, F, S> Drop for Heap<P, E, F, S>
where
    F: Fn(&P, &P) -> Ordering,
    S: SideIndex<E>,
{
    fn drop(&mut self) {
        if let Some(free_elt) = &mut self.free_elt {
            for (_, element) in self.pairs.drain(..) {
                free_elt(element);
            }
        }
    }
}
