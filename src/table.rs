//! The chained hash table (CHT): a dynamic `key bytes -> value` mapping with
//! division hashing and prime-driven growth.
//!
//! [`Table`] is the side-index [`crate::Heap`] uses to find an element's
//! current array slot in O(1) expected time, but it is also usable on its
//! own as a general-purpose map keyed by anything that presents itself as a
//! byte slice.

use crate::bucket::Chain;
use crate::error::TableError;
use crate::hasher::hash_bytes;
use crate::primes;

/// Number of bits in the index word used for the load-factor comparison
/// (`num_elts * 2^log_alpha_d <= count * alpha_n`). This crate always indexes
/// with `usize`; on the platforms it's built for that's 64 bits, matching the
/// widest index the original's `st_index_t` ever was.
const BITS_IN_INDEX: u32 = u64::BITS;

/// Configuration for a [`Table`], mirroring spec §4.1's enumerated fields.
pub struct TableConfig<V> {
    /// Expected steady-state key count. The table is pre-sized so that no
    /// rehash is needed until this many keys are present.
    pub min_num: usize,
    /// Numerator of the load-factor upper bound α = `alpha_n / 2^log_alpha_d`.
    pub alpha_n: u32,
    /// `log2` of the denominator of the load-factor upper bound. Must be
    /// less than the number of bits in the index word.
    pub log_alpha_d: u32,
    /// Destructor invoked on each remaining value when the table is dropped,
    /// and on the value removed by [`Table::delete`].
    pub free_value: Option<Box<dyn FnMut(V)>>,
}

impl<V> Default for TableConfig<V> {
    fn default() -> Self {
        Self {
            min_num: 0,
            alpha_n: 1,
            log_alpha_d: 1, // alpha = 1/2
            free_value: None,
        }
    }
}

impl<V> TableConfig<V> {
    fn validate(&self) -> Result<(), TableError> {
        if self.alpha_n == 0 {
            return Err(TableError::InvalidConfig {
                reason: "alpha_n must be > 0",
            });
        }
        if self.log_alpha_d >= BITS_IN_INDEX {
            return Err(TableError::InvalidConfig {
                reason: "log_alpha_d must be less than the index word's bit width",
            });
        }
        Ok(())
    }
}

/// A chained hash table mapping byte-pattern keys to values.
///
/// `K` must present its identity as a byte slice via [`AsRef<[u8]>`] — the
/// table hashes and compares on those bytes, not on a user-supplied equality
/// function (spec §9, "Side-index key identity").
pub struct Table<K, V> {
    buckets: Vec<Chain<K, V>>,
    num_elts: usize,
    alpha_n: u64,
    log_alpha_d: u32,
    free_value: Option<Box<dyn FnMut(V)>>,
}

impl<K, V> Table<K, V>
where
    K: AsRef<[u8]> + PartialEq,
{
    /// Creates a table with default configuration (α ≤ 1/2, no sizing hint,
    /// no value destructor).
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(TableConfig::default()).expect("default configuration is always valid")
    }

    /// Creates a table from an explicit [`TableConfig`].
    pub fn with_config(config: TableConfig<V>) -> Result<Self, TableError> {
        config.validate()?;
        let alpha_n = u64::from(config.alpha_n);
        let log_alpha_d = config.log_alpha_d;

        let prime = if config.min_num == 0 {
            primes::smallest()
        } else {
            // Smallest prime p such that min_num keys stay under the bound:
            // min_num * 2^log_alpha_d <= p * alpha_n, i.e. p >= ceil(numerator / alpha_n).
            let numerator = (config.min_num as u128) << log_alpha_d;
            let min_prime_needed = (numerator + alpha_n as u128 - 1) / (alpha_n as u128);
            primes::next_at_least(min_prime_needed.min(u64::MAX as u128) as u64)
        };

        let buckets = (0..prime).map(|_| Chain::new()).collect();
        Ok(Self {
            buckets,
            num_elts: 0,
            alpha_n,
            log_alpha_d,
            free_value: config.free_value,
        })
    }

    /// Number of keys currently stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.num_elts
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.num_elts == 0
    }

    /// Current bucket-array size (always prime).
    #[must_use]
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    fn slot_for(&self, key_bytes: &[u8]) -> usize {
        hash_bytes(key_bytes, self.buckets.len() as u64) as usize
    }

    /// Inserts or overwrites `key`'s value. If `key` was already present, its
    /// old value is byte-copied (moved, in Rust terms) out and returned with
    /// no chain restructuring. Otherwise a new chain node is prepended and
    /// the load factor is re-checked, rehashing into the next prime if it
    /// would be exceeded.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let idx = self.slot_for(key.as_ref());
        if let Some(existing) = self.buckets[idx].find_mut(&key) {
            return Some(core::mem::replace(existing, value));
        }
        self.buckets[idx].prepend(key, value);
        self.num_elts += 1;
        self.rehash_if_overloaded();
        None
    }

    /// Returns a reference to `key`'s value, or `None` if absent. Valid
    /// until the next mutating call on this table.
    #[must_use]
    pub fn search(&self, key: &K) -> Option<&V> {
        let idx = self.slot_for(key.as_ref());
        self.buckets[idx].find(key)
    }

    /// Returns a mutable reference to `key`'s value, or `None` if absent.
    pub fn search_mut(&mut self, key: &K) -> Option<&mut V> {
        let idx = self.slot_for(key.as_ref());
        self.buckets[idx].find_mut(key)
    }

    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.search(key).is_some()
    }

    /// Removes `key`, returning its value if present. Leaves the table
    /// unchanged (and does not invoke the value destructor) if absent — this
    /// is the caller's chance to take ownership back out, e.g. because the
    /// value is about to be reinserted elsewhere.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let idx = self.slot_for(key.as_ref());
        let removed = self.buckets[idx].remove(key);
        if removed.is_some() {
            self.num_elts -= 1;
        }
        removed.map(|(_, v)| v)
    }

    /// Removes `key` and, if present, invokes the configured `free_value`
    /// destructor on its value in place.
    pub fn delete(&mut self, key: &K) {
        if let Some(value) = self.remove(key) {
            if let Some(free_value) = &mut self.free_value {
                free_value(value);
            }
        }
    }

    fn rehash_if_overloaded(&mut self) {
        let prime = self.buckets.len() as u64;
        if prime >= primes::largest() {
            // Largest representable prime reached: tolerate overrun silently.
            return;
        }
        let lhs = (self.num_elts as u128) << self.log_alpha_d;
        let rhs = (prime as u128) * (self.alpha_n as u128);
        if lhs > rhs {
            let new_prime = primes::next_after(prime);
            log::debug!(
                "rehashing table: {} entries, {} -> {} buckets",
                self.num_elts,
                prime,
                new_prime
            );
            self.rehash(new_prime);
        }
    }

    fn rehash(&mut self, new_prime: u64) {
        let mut new_buckets: Vec<Chain<K, V>> = (0..new_prime).map(|_| Chain::new()).collect();
        for mut chain in core::mem::take(&mut self.buckets) {
            for (key, value) in chain.drain() {
                let idx = hash_bytes(key.as_ref(), new_prime) as usize;
                new_buckets[idx].prepend(key, value);
            }
        }
        self.buckets = new_buckets;
    }
}

impl<K, V> Default for Table<K, V>
where
    K: AsRef<[u8]> + PartialEq,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Drop for Table<K, V> {
    fn drop(&mut self) {
        if let Some(free_value) = &mut self.free_value {
            for chain in &mut self.buckets {
                for (_, value) in chain.drain() {
                    free_value(value);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_then_search_round_trips() {
        let mut t: Table<Vec<u8>, u32> = Table::new();
        assert_eq!(t.insert(b"alpha".to_vec(), 1), None);
        assert_eq!(t.insert(b"beta".to_vec(), 2), None);
        assert_eq!(t.search(&b"alpha".to_vec()), Some(&1));
        assert_eq!(t.search(&b"beta".to_vec()), Some(&2));
        assert_eq!(t.search(&b"gamma".to_vec()), None);
    }

    #[test]
    fn insert_overwrites_existing_value() {
        let mut t: Table<Vec<u8>, u32> = Table::new();
        t.insert(b"k".to_vec(), 1);
        let old = t.insert(b"k".to_vec(), 2);
        assert_eq!(old, Some(1));
        assert_eq!(t.search(&b"k".to_vec()), Some(&2));
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn remove_absent_key_is_a_no_op() {
        let mut t: Table<Vec<u8>, u32> = Table::new();
        t.insert(b"k".to_vec(), 1);
        assert_eq!(t.remove(&b"missing".to_vec()), None);
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn remove_present_key_decrements_len() {
        let mut t: Table<Vec<u8>, u32> = Table::new();
        t.insert(b"k".to_vec(), 1);
        assert_eq!(t.remove(&b"k".to_vec()), Some(1));
        assert_eq!(t.len(), 0);
        assert_eq!(t.search(&b"k".to_vec()), None);
    }

    #[test]
    fn delete_invokes_destructor_exactly_once() {
        use std::cell::RefCell;
        use std::rc::Rc;

        let calls = Rc::new(RefCell::new(Vec::new()));
        let calls_for_closure = Rc::clone(&calls);
        let config = TableConfig {
            free_value: Some(Box::new(move |v: u32| calls_for_closure.borrow_mut().push(v))
                as Box<dyn FnMut(u32)>),
            ..TableConfig::default()
        };
        let mut t: Table<Vec<u8>, u32> = Table::with_config(config).unwrap();
        t.insert(b"k".to_vec(), 42);
        t.delete(&b"k".to_vec());
        t.delete(&b"k".to_vec()); // absent now, no-op, destructor not called again
        assert_eq!(*calls.borrow(), vec![42]);
    }

    #[test]
    fn survives_growth_with_all_keys_and_values_intact() {
        let mut t: Table<Vec<u8>, usize> = Table::new();
        for i in 0..5000usize {
            t.insert(i.to_be_bytes().to_vec(), i);
        }
        assert_eq!(t.len(), 5000);
        for i in 0..5000usize {
            assert_eq!(t.search(&i.to_be_bytes().to_vec()), Some(&i));
        }
    }

    #[test]
    fn load_factor_bound_holds_below_max_prime() {
        let mut t: Table<Vec<u8>, usize> = Table::new();
        for i in 0..2000usize {
            t.insert(i.to_be_bytes().to_vec(), i);
            let prime = t.bucket_count() as u128;
            if (prime as u64) < primes::largest() {
                let lhs = (t.len() as u128) << t.log_alpha_d;
                let rhs = prime * (t.alpha_n as u128);
                assert!(lhs <= rhs, "load factor bound violated at len={}", t.len());
            }
        }
    }

    #[test]
    fn rejects_invalid_config() {
        let config: TableConfig<u32> = TableConfig {
            alpha_n: 0,
            ..TableConfig::default()
        };
        assert!(matches!(
            Table::<Vec<u8>, u32>::with_config(config),
            Err(TableError::InvalidConfig { .. })
        ));
    }
}
