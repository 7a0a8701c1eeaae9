//! Shuffle prover: runs an odd-even transposition sorting network over a
//! Fisher-Yates-sampled key array, re-encrypting every element every round
//! and proving each round's conditional swaps with a switch OR-proof
//! (spec.md §4.7).

use crate::elgamal::Ciphertext;
use crate::error::{OcpError, Result};
use crate::group::Point;
use crate::shuffle::reencrypt_proof::Proof as ReencProof;
use crate::shuffle::rng::ShuffleRng;
use crate::shuffle::round_table;
use crate::shuffle::switch_proof::SwitchProof;
use crate::shuffle::types::{Deck, RoundProof, ShuffleProof};

const LOG_TARGET: &str = "ocp_core::shuffle::prover";

/// Shuffle `deck` under `pk` over `rounds` rounds of conditional swaps, using
/// `seed` to derive both the sorting-network key array and every proof
/// nonce deterministically. Returns the permuted, re-encrypted deck and its
/// proof. The seed itself is never recorded in the returned proof.
#[tracing::instrument(target = LOG_TARGET, skip(deck, seed))]
pub fn shuffle(pk: &Point, deck: &Deck, rounds: u16, seed: [u8; 32]) -> Result<(Deck, ShuffleProof)> {
    let n = deck.len();
    if n < 2 || n > u16::MAX as usize {
        return Err(OcpError::InvalidArgument("deck size must be in 2..=65535".into()));
    }
    let n16 = n as u16;

    let mut rng = ShuffleRng::from_seed(seed);
    let mut keys = rng.sample_permutation(n);
    let mut current: Deck = deck.clone();

    let mut round_proofs = Vec::with_capacity(rounds as usize);
    for round_index in 0..rounds {
        let (pairs, singles) = round_table::partition(n16, round_index);
        let mut next = current.clone();
        let mut next_keys = keys.clone();

        let mut pair_proofs = Vec::with_capacity(pairs.len());
        for (i, j) in pairs {
            let (i, j) = (i as usize, j as usize);
            let swap = keys[i] > keys[j];
            let rho0 = rng.next_nonzero_scalar();
            let rho1 = rng.next_nonzero_scalar();
            let (proof, out0, out1) =
                SwitchProof::prove(pk, &current[i], &current[j], swap, &rho0, &rho1, &mut OsRngAdapter(&mut rng));
            next[i] = out0;
            next[j] = out1;
            if swap {
                next_keys[i] = keys[j];
                next_keys[j] = keys[i];
            }
            pair_proofs.push(proof);
        }

        let mut single_proofs = Vec::with_capacity(singles.len());
        for index in singles {
            let index = index as usize;
            let rho = rng.next_nonzero_scalar();
            let nonce = rng.next_nonzero_scalar();
            let (proof, out) = ReencProof::prove(pk, &current[index], &rho, &nonce);
            next[index] = out;
            single_proofs.push(proof);
        }

        current = next.clone();
        keys = next_keys;
        round_proofs.push(RoundProof { pair_proofs, single_proofs, outputs: next });
    }

    let proof = ShuffleProof { n: n16, rounds, round_proofs };
    Ok((current, proof))
}

/// Adapts `ShuffleRng`'s deterministic scalar stream to the `RngCore`
/// interface `SwitchProof::prove` expects for its internal nonce sampling,
/// so every byte of shuffle randomness still traces back to one seed.
struct OsRngAdapter<'a>(&'a mut ShuffleRng);

impl<'a> rand::RngCore for OsRngAdapter<'a> {
    fn next_u32(&mut self) -> u32 {
        let bytes = self.0.next_nonzero_scalar().bytes();
        u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
    }

    fn next_u64(&mut self) -> u64 {
        let bytes = self.0.next_nonzero_scalar().bytes();
        u64::from_le_bytes(bytes[..8].try_into().unwrap())
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        let mut offset = 0;
        while offset < dest.len() {
            let bytes = self.0.next_nonzero_scalar().bytes();
            let take = (dest.len() - offset).min(32);
            dest[offset..offset + take].copy_from_slice(&bytes[..take]);
            offset += take;
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> std::result::Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}
