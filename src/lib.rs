//! A generic indexed minimum-priority heap backed by a chained hash table.
//!
//! [`Heap`] is an ordinary binary min-heap over `(priority, element)` pairs
//! with one addition: a side-index, [`Table`], mapping each element's byte
//! pattern to its current array slot. That side-index is what lets
//! [`Heap::search`] and [`Heap::update`] find an element by its own value —
//! in O(1) and O(log n) expected time respectively — rather than requiring
//! callers to track an externally maintained handle into the array.
//!
//! ```
//! use core::cmp::Ordering;
//! use stheap::Heap;
//!
//! let mut heap: Heap<i32, Vec<u8>, _> = Heap::new(|a: &i32, b: &i32| a.cmp(b));
//! heap.push(5, b"a".to_vec()).unwrap();
//! heap.push(1, b"b".to_vec()).unwrap();
//! heap.update(0, &b"a".to_vec()).unwrap();
//! assert_eq!(heap.pop(), Some((0, b"a".to_vec())));
//! assert_eq!(heap.pop(), Some((1, b"b".to_vec())));
//! ```
//!
//! [`Table`] is usable on its own as a general-purpose chained hash table:
//! division hashing modulo a prime bucket count, growing into the next
//! prime from a precomputed, group-structured sequence whenever the load
//! factor would exceed a configurable bound.
//!
//! This crate is not thread-safe, performs no I/O, and does not persist
//! state — see the crate's design notes for the full non-goal list.

#![allow(clippy::module_name_repetitions)]

mod bucket;
mod error;
mod hasher;
mod heap;
mod primes;
mod side_index;
mod table;

pub use error::{HeapError, TableError};
pub use heap::{Heap, HeapConfig, HEAP_COUNT_MAX};
pub use side_index::SideIndex;
pub use table::{Table, TableConfig};
