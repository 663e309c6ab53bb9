//! Slot strategies: the second stage of the pipeline, mapping a prehashed key
//! and a bucket count to a slot index. Randomized strategies capture their
//! randomness once, at construction, and reuse it for every call.

use std::ops::Range;

use rand::seq::SliceRandom;
use rand::Rng;

/// Reference pool bounds for [`UniversalHash::new`]: primes in `[1000, 10000)`.
const DEFAULT_PRIME_RANGE: Range<u64> = 1000..10000;

/// Second-stage mapping from a prehashed key and a positive modulus (the
/// bucket count) to a slot index. Implementations must be pure with respect
/// to their own state: same instance, same inputs, same slot.
pub trait HashStrategy {
    /// Slot for `prehash` in a table of `modulus` buckets. `modulus` must be
    /// positive; the result is in `[0, modulus)` within each strategy's
    /// documented domain.
    fn slot(&self, prehash: u64, modulus: usize) -> usize;
}

impl<H: HashStrategy + ?Sized> HashStrategy for Box<H> {
    fn slot(&self, prehash: u64, modulus: usize) -> usize {
        (**self).slot(prehash, modulus)
    }
}

/// Adapter lifting any `Fn(u64, usize) -> usize` into a [`HashStrategy`].
pub struct StrategyFn<F>(pub F);

impl<F: Fn(u64, usize) -> usize> HashStrategy for StrategyFn<F> {
    fn slot(&self, prehash: u64, modulus: usize) -> usize {
        (self.0)(prehash, modulus)
    }
}

/// Division hashing: `prehash mod modulus`. Deterministic and the default;
/// the simplest strategy, and the one with the most predictable clustering
/// when keys follow a pattern (multiples of the bucket count all share slot
/// zero, and so on).
#[derive(Debug, Clone, Copy, Default)]
pub struct DivisionHash;

impl HashStrategy for DivisionHash {
    fn slot(&self, prehash: u64, modulus: usize) -> usize {
        (prehash % modulus as u64) as usize
    }
}

/// Multiplication hashing: multiply by a fixed random odd 64-bit constant and
/// keep the top `floor(log2(modulus))` bits of the wrapped product.
///
/// The bit-shift extraction assumes the modulus is a power of two. For any
/// other modulus only slots below `2^floor(log2(modulus))` can ever be
/// produced; nothing here rounds bucket counts up to powers of two, so a
/// table that has resized to an odd capacity will visibly cluster into its
/// low slots under this strategy. That skew is left observable on purpose.
#[derive(Debug, Clone, Copy)]
pub struct MultiplicationHash {
    multiplier: u64,
}

impl MultiplicationHash {
    /// Draw a fresh random odd multiplier.
    pub fn new() -> Self {
        Self::with_multiplier(rand::thread_rng().gen())
    }

    /// Use a caller-chosen multiplier, forced odd, for reproducible placement.
    pub fn with_multiplier(multiplier: u64) -> Self {
        Self {
            multiplier: multiplier | 1,
        }
    }
}

impl Default for MultiplicationHash {
    fn default() -> Self {
        Self::new()
    }
}

impl HashStrategy for MultiplicationHash {
    fn slot(&self, prehash: u64, modulus: usize) -> usize {
        let r = (modulus as u64).ilog2();
        if r == 0 {
            // One bucket: every key lands in slot zero.
            return 0;
        }
        (self.multiplier.wrapping_mul(prehash) >> (64 - r)) as usize
    }
}

/// Universal hashing: `((a*k + b) mod p) mod modulus` with `p` a prime drawn
/// from a pool at construction and `a`, `b` random in `[0, p)`.
///
/// The random affine map gives probabilistic protection against adversarial
/// key sequences that would pile up under a fixed strategy, at the cost of a
/// small bias toward low slots whenever `modulus` does not divide `p`.
#[derive(Debug, Clone, Copy)]
pub struct UniversalHash {
    prime: u64,
    a: u64,
    b: u64,
}

impl UniversalHash {
    /// Draw from the reference pool: primes in `[1000, 10000)`.
    pub fn new() -> Self {
        Self::in_range(DEFAULT_PRIME_RANGE)
    }

    /// Draw the prime from a caller-chosen range. Panics if the range
    /// contains no primes.
    pub fn in_range(range: Range<u64>) -> Self {
        let pool = primes_in(range.clone());
        assert!(!pool.is_empty(), "no primes in {:?}", range);
        let mut rng = rand::thread_rng();
        let prime = *pool.choose(&mut rng).expect("pool is non-empty");
        let a = rng.gen_range(0..prime);
        let b = rng.gen_range(0..prime);
        Self { prime, a, b }
    }

    /// Pin the captured randomness, for reproducible placement.
    pub fn with_parameters(prime: u64, a: u64, b: u64) -> Self {
        debug_assert!(prime >= 2, "modulus of the affine map must be a prime");
        Self { prime, a, b }
    }
}

impl Default for UniversalHash {
    fn default() -> Self {
        Self::new()
    }
}

impl HashStrategy for UniversalHash {
    fn slot(&self, prehash: u64, modulus: usize) -> usize {
        // a*k does not fit in 64 bits; widen before reducing.
        let affine = self.a as u128 * prehash as u128 + self.b as u128;
        ((affine % self.prime as u128) as u64 % modulus as u64) as usize
    }
}

fn primes_in(range: Range<u64>) -> Vec<u64> {
    range.filter(|n| is_prime(*n)).collect()
}

fn is_prime(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    let mut d = 2;
    while d * d <= n {
        if n % d == 0 {
            return false;
        }
        d += 1;
    }
    true
}
