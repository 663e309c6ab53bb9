//! Prehash: the first stage of the pipeline, mapping an arbitrary key to a `u64`.

use core::hash::{BuildHasher, Hash};
use std::collections::hash_map::RandomState;

/// First-stage key mapping. The only contract is consistency: equal keys must
/// prehash to the same value for the lifetime of the instance. Nothing here
/// validates that; a strategy that breaks the contract (say, a fresh random
/// value per call) is accepted and simply makes lookups unreliable, which is
/// occasionally the point when studying failure modes.
pub trait Prehash<K: ?Sized> {
    fn prehash(&self, key: &K) -> u64;
}

impl<K: ?Sized, P: Prehash<K> + ?Sized> Prehash<K> for Box<P> {
    fn prehash(&self, key: &K) -> u64 {
        (**self).prehash(key)
    }
}

/// Default prehash: a structural hash of the key through a stored
/// [`BuildHasher`]. One instance hashes equal keys identically for as long as
/// it lives; two instances built from fresh [`RandomState`]s will disagree
/// with each other, which is fine because a table owns exactly one.
#[derive(Debug, Clone)]
pub struct StructuralPrehash<S = RandomState> {
    build: S,
}

impl StructuralPrehash {
    pub fn new() -> Self {
        Self {
            build: RandomState::new(),
        }
    }
}

impl<S: BuildHasher> StructuralPrehash<S> {
    /// Use a caller-supplied hasher builder, e.g. a fixed-seed one for
    /// reproducible bucket placement.
    pub fn with_hasher(build: S) -> Self {
        Self { build }
    }
}

impl Default for StructuralPrehash {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Hash + ?Sized, S: BuildHasher> Prehash<K> for StructuralPrehash<S> {
    fn prehash(&self, key: &K) -> u64 {
        self.build.hash_one(key)
    }
}

/// Adapter lifting any `Fn(&K) -> u64` into a [`Prehash`], so plain closures
/// plug in where a strategy is expected.
pub struct PrehashFn<F>(pub F);

impl<K: ?Sized, F: Fn(&K) -> u64> Prehash<K> for PrehashFn<F> {
    fn prehash(&self, key: &K) -> u64 {
        (self.0)(key)
    }
}
