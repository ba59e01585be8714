//! Fixed-width bit-vector spin configurations.
//!
//! An `N`-spin configuration is an unsigned integer whose low `N` bits are
//! the spins, most-significant-bit first. `N` may exceed the machine word,
//! so the representation is an arbitrary-precision unsigned integer and all
//! bit arithmetic is exact. Nothing outside this module touches the digit
//! representation.

use num_bigint::BigUint;
use num_traits::{One, Zero};

/// Upper bound on the spin count accepted by the simulation, the analogue
/// of a compile-time precision setting. The representation itself has no
/// hard limit; this bounds CLI input validation.
pub const MAX_SPINS: usize = 256;

/// One spin configuration. Value-typed: engines copy and reassign it per
/// step, observables clone it into uniqueness sets.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct SpinState(BigUint);

impl SpinState {
    pub fn zero() -> Self {
        SpinState(BigUint::zero())
    }

    pub fn from_biguint(value: BigUint) -> Self {
        SpinState(value)
    }

    pub fn as_biguint(&self) -> &BigUint {
        &self.0
    }

    /// Flips spin `k`, with `k == 0` the most significant of the `n`
    /// active bits. Pure; flipping the same bit twice is the identity.
    pub fn flip_bit(&self, k: usize, n: usize) -> SpinState {
        assert!(k < n, "bit index {k} out of range for {n} spins");
        let bit = n - 1 - k;
        SpinState(&self.0 ^ (BigUint::one() << bit))
    }

    /// The full single-flip neighborhood: exactly `n` states, each at
    /// Hamming distance 1. Index `i` flips spin `i` (counted from the
    /// MSB), and downstream exit-rate arrays are indexed against this
    /// order, so it is fixed.
    pub fn neighbors(&self, n: usize) -> Vec<SpinState> {
        (0..n).map(|k| self.flip_bit(k, n)).collect()
    }

    /// Fills a caller-owned buffer with the neighborhood instead of
    /// allocating a fresh vector; same order as [`SpinState::neighbors`].
    pub fn neighbors_into(&self, n: usize, out: &mut [SpinState]) {
        assert_eq!(out.len(), n, "neighbor buffer length must equal the spin count");
        for (k, slot) in out.iter_mut().enumerate() {
            *slot = self.flip_bit(k, n);
        }
    }

    /// Encodes a spin array into a configuration integer. `bits[0]` is
    /// the most significant bit.
    pub fn from_bits(bits: &[u8]) -> SpinState {
        let mut value = BigUint::zero();
        for &b in bits {
            debug_assert!(b <= 1, "spins are binary");
            value <<= 1;
            value |= BigUint::from(b);
        }
        SpinState(value)
    }

    /// Decodes the low `n` bits into a spin array, MSB first. Handles the
    /// all-zero and all-one states without overflow.
    pub fn to_bits(&self, n: usize) -> Vec<u8> {
        (0..n).map(|k| u8::from(self.0.bit((n - 1 - k) as u64))).collect()
    }

    /// The configuration as a string of '0'/'1' characters, MSB first.
    /// Used for output and debugging; uniqueness sets key on the state
    /// value itself.
    pub fn to_bit_string(&self, n: usize) -> String {
        self.to_bits(n)
            .into_iter()
            .map(|b| if b == 1 { '1' } else { '0' })
            .collect()
    }

    /// The underlying 64-bit digits, little-endian. The landscape hashes
    /// these to derive a per-state disorder seed.
    pub fn to_u64_digits(&self) -> Vec<u64> {
        self.0.to_u64_digits()
    }
}

impl From<u64> for SpinState {
    fn from(value: u64) -> Self {
        SpinState(BigUint::from(value))
    }
}

#[cfg(test)]
mod __test__;
