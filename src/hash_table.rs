//! HashTable: separate-chaining core with a pluggable two-stage hash
//! pipeline, collision/resize accounting, and load-factor-triggered growth.

use crate::prehash::{Prehash, StructuralPrehash};
use crate::strategy::{DivisionHash, HashStrategy};
use core::fmt;
use core::hash::Hash;
use core::mem;
use log::{debug, trace};
use thiserror::Error;

/// Bucket count a fully-defaulted table starts with.
pub const DEFAULT_CAPACITY: usize = 8;
/// Load-factor threshold a fully-defaulted table resizes past.
pub const DEFAULT_LOAD_FACTOR: f64 = 0.75;
/// Growth rate a fully-defaulted table resizes by.
pub const DEFAULT_GROWTH_RATE: f64 = 2.0;
/// Capacity never goes below this, at construction or after a resize.
pub const MIN_CAPACITY: usize = 2;

#[derive(Debug)]
struct Entry<K, V> {
    key: K,
    value: V,
}

type Bucket<K, V> = Vec<Entry<K, V>>;

fn fresh_buckets<K, V>(capacity: usize) -> Vec<Bucket<K, V>> {
    let mut buckets = Vec::with_capacity(capacity);
    buckets.resize_with(capacity, Vec::new);
    buckets
}

/// Lookup failures from [`HashTable::get`], [`HashTable::get_mut`], and
/// [`HashTable::remove`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("key not found")]
    KeyNotFound,
}

/// A separate-chaining hash map whose slot computation is
/// `strategy.slot(prehash.prehash(key), bucket_count)`, with both stages
/// supplied by the caller.
///
/// The table keeps running totals alongside the entries: every insert into a
/// bucket that already holds N entries adds N to the collision counter, every
/// removal that leaves its bucket non-empty subtracts one, and every resize
/// bumps the resize counter. Resizing rebuckets entries without reconciling
/// the collision counter against the new layout, so the counter reads as a
/// history of insert-time collisions, not a description of the current
/// buckets. See [`HashTable::collision_count`].
pub struct HashTable<K, V, P = StructuralPrehash, H = DivisionHash> {
    buckets: Vec<Bucket<K, V>>,
    items: usize,
    prehash: P,
    strategy: H,
    load_threshold: f64,
    growth_rate: f64,
    collisions: i64,
    resizes: usize,
}

impl<K, V> HashTable<K, V>
where
    K: Eq + Hash,
{
    /// Fully-defaulted table: eight buckets, 0.75 threshold, 2x growth,
    /// structural prehash, division hashing.
    pub fn new() -> Self {
        HashTableBuilder::new().build()
    }

    /// Defaulted table with a chosen starting capacity (clamped to at
    /// least [`MIN_CAPACITY`]).
    pub fn with_capacity(capacity: usize) -> Self {
        HashTableBuilder::new().initial_capacity(capacity).build()
    }
}

impl<K, V> Default for HashTable<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over shared entries, ordered by bucket index then chain position.
pub struct Iter<'a, K, V> {
    it: core::iter::Flatten<core::slice::Iter<'a, Bucket<K, V>>>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it.next().map(|e| (&e.key, &e.value))
    }
}

/// Iterator over entries with mutable values, same order as [`Iter`].
pub struct IterMut<'a, K, V> {
    it: core::iter::Flatten<core::slice::IterMut<'a, Bucket<K, V>>>,
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it.next().map(|e| (&e.key, &mut e.value))
    }
}

impl<'a, K, V, P, H> IntoIterator for &'a HashTable<K, V, P, H> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;
    fn into_iter(self) -> Self::IntoIter {
        Iter {
            it: self.buckets.iter().flatten(),
        }
    }
}

impl<'a, K, V, P, H> IntoIterator for &'a mut HashTable<K, V, P, H> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;
    fn into_iter(self) -> Self::IntoIter {
        IterMut {
            it: self.buckets.iter_mut().flatten(),
        }
    }
}

impl<K, V, P, H> HashTable<K, V, P, H>
where
    K: Eq,
    P: Prehash<K>,
    H: HashStrategy,
{
    fn slot_of(&self, key: &K) -> usize {
        self.strategy
            .slot(self.prehash.prehash(key), self.buckets.len())
    }

    fn maybe_resize(&mut self) {
        let load = self.items as f64 / self.buckets.len() as f64;
        trace!("current load = {:.2}", load);
        if load > self.load_threshold {
            self.resize();
        }
    }

    /// Insert or overwrite. The load factor is checked first and the table
    /// resized if it strictly exceeds the threshold, even when the call turns
    /// out to be an overwrite.
    ///
    /// A new key landing in a bucket with N resident entries adds N to
    /// [`collision_count`](HashTable::collision_count); an overwrite leaves
    /// every counter as it was.
    pub fn insert(&mut self, key: K, value: V) {
        self.maybe_resize();
        let slot = self.slot_of(&key);
        let bucket = &mut self.buckets[slot];
        if let Some(entry) = bucket.iter_mut().find(|e| e.key == key) {
            debug!("key already present at slot {} - overwriting value", slot);
            entry.value = value;
            return;
        }
        let residents = bucket.len();
        self.collisions += residents as i64;
        trace!(
            "writing new key at slot {} ({} already resident)",
            slot,
            residents
        );
        bucket.push(Entry { key, value });
        self.items += 1;
    }

    /// Shared reference to the value for `key`.
    pub fn get(&self, key: &K) -> Result<&V, LookupError> {
        let slot = self.slot_of(key);
        self.buckets[slot]
            .iter()
            .find(|e| e.key == *key)
            .map(|e| &e.value)
            .ok_or(LookupError::KeyNotFound)
    }

    /// Mutable reference to the value for `key`.
    pub fn get_mut(&mut self, key: &K) -> Result<&mut V, LookupError> {
        let slot = self.slot_of(key);
        self.buckets[slot]
            .iter_mut()
            .find(|e| e.key == *key)
            .map(|e| &mut e.value)
            .ok_or(LookupError::KeyNotFound)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_ok()
    }

    /// Remove `key` and return its value. Removal from a bucket that stays
    /// non-empty subtracts one recorded collision. Capacity never shrinks
    /// here.
    pub fn remove(&mut self, key: &K) -> Result<V, LookupError> {
        let slot = self.slot_of(key);
        let bucket = &mut self.buckets[slot];
        let position = bucket
            .iter()
            .position(|e| e.key == *key)
            .ok_or(LookupError::KeyNotFound)?;
        // Vec::remove, not swap_remove: chain order is observable through
        // iteration and the dump.
        let entry = bucket.remove(position);
        self.items -= 1;
        if !bucket.is_empty() {
            self.collisions -= 1;
        }
        trace!("deleted entry at slot {} ({} left in chain)", slot, bucket.len());
        Ok(entry.value)
    }

    /// Rebuild the table at `max(MIN_CAPACITY, floor(len * growth_rate))`
    /// buckets. The target is derived from the live item count, not the
    /// current capacity, so a sparsely filled table can resize smaller.
    ///
    /// Repopulation reslots every entry in traversal order and appends
    /// directly: keys are already unique, so the duplicate scan is skipped,
    /// and the collision counter keeps its pre-resize value.
    pub fn resize(&mut self) {
        // TODO: shrink the table when deletions pull the load way down;
        // today capacity only changes here and only insert growth or
        // explicit calls reach this.
        let old_capacity = self.buckets.len();
        let new_capacity = ((self.items as f64 * self.growth_rate) as usize).max(MIN_CAPACITY);
        debug!(
            "resizing table from {} to {} slots",
            old_capacity, new_capacity
        );
        let old = mem::replace(&mut self.buckets, fresh_buckets(new_capacity));
        for entry in old.into_iter().flatten() {
            let slot = self
                .strategy
                .slot(self.prehash.prehash(&entry.key), new_capacity);
            self.buckets[slot].push(entry);
        }
        self.resizes += 1;
    }

    /// Lazy iterator over `(&K, &V)`; a fresh call restarts from the first
    /// bucket.
    pub fn iter(&self) -> Iter<'_, K, V> {
        self.into_iter()
    }

    /// Lazy iterator over `(&K, &mut V)` in the same order as `iter`.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        self.into_iter()
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items == 0
    }

    /// Number of buckets.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Current load: live entries per bucket.
    pub fn load_factor(&self) -> f64 {
        self.items as f64 / self.buckets.len() as f64
    }

    /// Resizes performed over the table's lifetime.
    pub fn resize_count(&self) -> usize {
        self.resizes
    }

    /// Net insert-time collisions: +N for each insert into a bucket holding
    /// N entries, -1 for each removal that leaves its bucket non-empty.
    ///
    /// Signed on purpose. Resize rebuckets entries without touching this
    /// counter, so entries that collided before a resize may share a bucket
    /// afterward without being counted; deleting them then decrements a
    /// collision that was never recorded, and the counter can legitimately
    /// go below zero.
    pub fn collision_count(&self) -> i64 {
        self.collisions
    }
}

impl<K, V, P, H> fmt::Debug for HashTable<K, V, P, H>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    /// One line per bucket: `[idx]   [(key, value), ...]`. Diagnostic only.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, bucket) in self.buckets.iter().enumerate() {
            write!(f, "[{}]   [", index)?;
            for (i, entry) in bucket.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "({:?}, {:?})", entry.key, entry.value)?;
            }
            writeln!(f, "]")?;
        }
        Ok(())
    }
}

/// Consuming builder for [`HashTable`]. Every knob is optional; the defaults
/// are [`DEFAULT_CAPACITY`] buckets, a [`DEFAULT_LOAD_FACTOR`] threshold,
/// [`DEFAULT_GROWTH_RATE`] growth, a structural prehash, and division
/// hashing.
pub struct HashTableBuilder<P = StructuralPrehash, H = DivisionHash> {
    capacity: usize,
    load_threshold: f64,
    growth_rate: f64,
    prehash: P,
    strategy: H,
}

impl HashTableBuilder {
    pub fn new() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            load_threshold: DEFAULT_LOAD_FACTOR,
            growth_rate: DEFAULT_GROWTH_RATE,
            prehash: StructuralPrehash::new(),
            strategy: DivisionHash,
        }
    }
}

impl Default for HashTableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl<P, H> HashTableBuilder<P, H> {
    /// Starting bucket count, clamped to at least [`MIN_CAPACITY`].
    pub fn initial_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity.max(MIN_CAPACITY);
        self
    }

    /// Load the table must strictly exceed before an insert grows it. Must
    /// be positive.
    pub fn load_factor(mut self, threshold: f64) -> Self {
        assert!(threshold > 0.0, "load factor threshold must be positive");
        self.load_threshold = threshold;
        self
    }

    /// Multiplier applied to the live item count to pick the post-resize
    /// capacity. Must be positive.
    pub fn growth_rate(mut self, rate: f64) -> Self {
        assert!(rate > 0.0, "growth rate must be positive");
        self.growth_rate = rate;
        self
    }

    /// Swap the first-stage key hash.
    pub fn prehash<P2>(self, prehash: P2) -> HashTableBuilder<P2, H> {
        HashTableBuilder {
            capacity: self.capacity,
            load_threshold: self.load_threshold,
            growth_rate: self.growth_rate,
            prehash,
            strategy: self.strategy,
        }
    }

    /// Swap the second-stage slot strategy.
    pub fn hash_strategy<H2>(self, strategy: H2) -> HashTableBuilder<P, H2> {
        HashTableBuilder {
            capacity: self.capacity,
            load_threshold: self.load_threshold,
            growth_rate: self.growth_rate,
            prehash: self.prehash,
            strategy,
        }
    }

    pub fn build<K, V>(self) -> HashTable<K, V, P, H> {
        HashTable {
            buckets: fresh_buckets(self.capacity),
            items: 0,
            prehash: self.prehash,
            strategy: self.strategy,
            load_threshold: self.load_threshold,
            growth_rate: self.growth_rate,
            collisions: 0,
            resizes: 0,
        }
    }
}
