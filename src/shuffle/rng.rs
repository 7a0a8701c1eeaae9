//! Deterministic, `HashToScalar`-driven randomness for the shuffle prover
//! (spec.md §9 "Deterministic randomness"). A missing seed is replaced with a
//! fresh 32-byte value that is *not* recorded in the proof — the resulting
//! proof is still verifiable, just not reproducible from a recorded seed.

use crate::group::Scalar;
use crate::transcript::hash_to_scalar;
use rand::RngCore;

const LOG_TARGET: &str = "ocp_core::shuffle::rng";

pub struct ShuffleRng {
    seed: [u8; 32],
    counter: u32,
}

impl ShuffleRng {
    pub fn from_seed(seed: [u8; 32]) -> Self {
        ShuffleRng { seed, counter: 0 }
    }

    /// Build a fresh, non-reproducible RNG from OS randomness.
    pub fn fresh() -> Self {
        let mut seed = [0u8; 32];
        rand::rngs::OsRng.fill_bytes(&mut seed);
        Self::from_seed(seed)
    }

    fn next_scalar(&mut self) -> Scalar {
        let counter_bytes = self.counter.to_le_bytes();
        let scalar = hash_to_scalar(
            crate::config::DOMAIN_SHUFFLE_RNG,
            &[Some(self.seed.as_slice()), Some(counter_bytes.as_slice())],
        )
        .expect("shuffle RNG messages are never null");
        self.counter = self
            .counter
            .checked_add(1)
            .expect("shuffle RNG counter exhausted");
        scalar
    }

    /// Sample a non-zero scalar, used for re-encryption/sigma-protocol nonces.
    #[tracing::instrument(target = LOG_TARGET, skip(self))]
    pub fn next_nonzero_scalar(&mut self) -> Scalar {
        loop {
            let candidate = self.next_scalar();
            if !candidate.is_zero() {
                return candidate;
            }
        }
    }

    /// Sample a uniform index in `0..bound` via rejection sampling over the
    /// low 8 bytes of a fresh scalar, to avoid modulo bias.
    fn next_index(&mut self, bound: u64) -> u64 {
        assert!(bound > 0);
        let threshold = u64::MAX - (u64::MAX % bound);
        loop {
            let scalar = self.next_scalar();
            let bytes = scalar.bytes();
            let mut raw = [0u8; 8];
            raw.copy_from_slice(&bytes[..8]);
            let candidate = u64::from_le_bytes(raw);
            if candidate < threshold {
                return candidate % bound;
            }
        }
    }

    /// Fisher-Yates shuffle of `0..n`, driven entirely by this RNG.
    pub fn sample_permutation(&mut self, n: usize) -> Vec<u32> {
        let mut perm: Vec<u32> = (0..n as u32).collect();
        for i in (1..n).rev() {
            let j = self.next_index(i as u64 + 1) as usize;
            perm.swap(i, j);
        }
        perm
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic_for_same_seed() {
        let seed = [7u8; 32];
        let mut a = ShuffleRng::from_seed(seed);
        let mut b = ShuffleRng::from_seed(seed);
        assert_eq!(a.sample_permutation(10), b.sample_permutation(10));
    }

    #[test]
    fn different_seeds_diverge() {
        let mut a = ShuffleRng::from_seed([1u8; 32]);
        let mut b = ShuffleRng::from_seed([2u8; 32]);
        assert_ne!(a.sample_permutation(20), b.sample_permutation(20));
    }

    #[test]
    fn permutation_is_a_bijection() {
        let mut rng = ShuffleRng::from_seed([9u8; 32]);
        let perm = rng.sample_permutation(52);
        let mut sorted = perm.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..52u32).collect::<Vec<_>>());
    }

    #[test]
    fn vector_matches_hash_to_scalar() {
        let seed = [0u8; 32];
        let mut rng = ShuffleRng::from_seed(seed);
        let expected = hash_to_scalar(
            crate::config::DOMAIN_SHUFFLE_RNG,
            &[Some(seed.as_slice()), Some(0u32.to_le_bytes().as_slice())],
        )
        .unwrap();
        assert!(rng.next_scalar().eq(&expected));
    }
}
