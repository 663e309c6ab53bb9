//! hackable-hashmap: a separate-chaining hash map with a pluggable two-stage
//! hash pipeline, built for watching collisions and resizes happen.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: keep the table small and observable so different hashing and
//!   growth policies can be compared on the same workload.
//! - Layers:
//!   - Prehash<K>: first stage, arbitrary key to `u64`; the default is a
//!     structural hash behind a stored `BuildHasher`.
//!   - HashStrategy: second stage, `(u64, bucket count)` to slot index;
//!     division, multiplication, and universal variants provided.
//!   - HashTable<K, V, P, H>: separate-chaining storage, counters, and
//!     load-factor-driven growth on top of the two stages.
//!
//! Constraints
//! - Single-threaded: plain owned data, no interior mutability; `&`/`&mut`
//!   borrows are the whole concurrency story.
//! - Capacity never drops below two buckets.
//! - Chains preserve insertion order; removal uses `Vec::remove`, never
//!   `swap_remove`.
//! - Strategy randomness (multiplier, prime, affine coefficients) is drawn
//!   once at construction and reused for every call.
//!
//! Counter semantics
//! - A new key entering a bucket with N residents records N collisions;
//!   removing an entry from a bucket that stays occupied erases one.
//! - Resize rebuckets entries without reconciling the collision counter, so
//!   the counter is a signed running history of insert-time collisions, not
//!   a description of the current layout; deletions after a resize can pull
//!   it below zero.
//!
//! Growth policy
//! - Checked lazily before every insert; triggers when load strictly
//!   exceeds the configured threshold.
//! - The target capacity is `max(2, floor(len * growth_rate))`, derived
//!   from the live item count rather than the current capacity, so an
//!   explicit resize of a sparse table can end up smaller.
//!
//! Notes and non-goals
//! - No thread safety and no persistence.
//! - Iteration order is bucket index then chain position; it is not stable
//!   across mutation.
//! - No automatic shrink on deletion; capacity only changes through insert
//!   growth or an explicit `resize` call.
//! - Multiplication hashing assumes power-of-two bucket counts; the
//!   constraint is documented on the strategy rather than enforced by
//!   rounding capacities.
//! - Deliberately broken prehashes (for instance a random value per call)
//!   are accepted without validation; `len() == iter().count()` is the
//!   invariant that survives them.
//! - Diagnostics go through the `log` facade; the crate never installs a
//!   logger.

pub mod hash_table;
mod hash_table_proptest;
pub mod prehash;
pub mod strategy;

// Public surface
pub use hash_table::{HashTable, HashTableBuilder, LookupError};
pub use prehash::{Prehash, PrehashFn, StructuralPrehash};
pub use strategy::{DivisionHash, HashStrategy, MultiplicationHash, StrategyFn, UniversalHash};
