//! Shuffle verifier: replays the same round table the prover used and
//! checks every round's switch/single proofs against the deck transition
//! each round carries (spec.md §4.7). Never needs the prover's seed or
//! permutation.

use crate::error::{OcpError, Result, ShuffleLocation};
use crate::group::Point;
use crate::shuffle::round_table;
use crate::shuffle::types::{Deck, ShuffleProof};

const LOG_TARGET: &str = "ocp_core::shuffle::verifier";

/// Verify that `output` is a valid re-encryption shuffle of `input` under
/// `pk`, attested by `proof`. Rejects size mismatches, round-shape
/// mismatches, and any individual round's failed switch or single proof,
/// with the failing location attached to the error.
#[tracing::instrument(target = LOG_TARGET, skip(input, output, proof))]
pub fn verify(pk: &Point, input: &Deck, output: &Deck, proof: &ShuffleProof) -> Result<()> {
    if proof.n < 2 {
        return Err(OcpError::InvalidArgument("deck size must be in 2..=65535".into()));
    }
    if input.len() != proof.n as usize || output.len() != proof.n as usize {
        return Err(OcpError::InvalidArgument(
            "deck length does not match shuffle proof header".into(),
        ));
    }
    if proof.round_proofs.len() != proof.rounds as usize {
        return Err(OcpError::InvalidArgument(
            "shuffle proof round count does not match its header".into(),
        ));
    }

    let mut current: Deck = input.clone();
    for (round_index, round_proof) in proof.round_proofs.iter().enumerate() {
        let round_index = round_index as u16;
        let (pairs, singles) = round_table::partition(proof.n, round_index);

        if round_proof.pair_proofs.len() != pairs.len()
            || round_proof.single_proofs.len() != singles.len()
            || round_proof.outputs.len() != proof.n as usize
        {
            return Err(OcpError::ShuffleVerificationFailed {
                kind: "round shape mismatch",
                location: ShuffleLocation::DeckSnapshot { round: round_index },
            });
        }

        for ((i, j), switch_proof) in pairs.iter().zip(round_proof.pair_proofs.iter()) {
            let (iu, ju) = (*i as usize, *j as usize);
            let out0 = &round_proof.outputs[iu];
            let out1 = &round_proof.outputs[ju];

            if !switch_proof.verify(pk, &current[iu], &current[ju], out0, out1) {
                return Err(OcpError::ShuffleVerificationFailed {
                    kind: "switch proof failed",
                    location: ShuffleLocation::Pair { round: round_index, left: *i, right: *j },
                });
            }
            if out0.c1.eq(&current[iu].c1)
                || out0.c1.eq(&current[ju].c1)
                || out1.c1.eq(&current[iu].c1)
                || out1.c1.eq(&current[ju].c1)
            {
                return Err(OcpError::ShuffleVerificationFailed {
                    kind: "re-encryption did not change C1",
                    location: ShuffleLocation::Pair { round: round_index, left: *i, right: *j },
                });
            }
        }

        for (index, single_proof) in singles.iter().zip(round_proof.single_proofs.iter()) {
            let iu = *index as usize;
            let out = &round_proof.outputs[iu];

            if !single_proof.verify(pk, &current[iu], out) {
                return Err(OcpError::ShuffleVerificationFailed {
                    kind: "single re-encryption proof failed",
                    location: ShuffleLocation::Single { round: round_index, index: *index },
                });
            }
            if out.c1.eq(&current[iu].c1) {
                return Err(OcpError::ShuffleVerificationFailed {
                    kind: "re-encryption did not change C1",
                    location: ShuffleLocation::Single { round: round_index, index: *index },
                });
            }
        }

        current = round_proof.outputs.clone();
    }

    if current != *output {
        return Err(OcpError::ShuffleVerificationFailed {
            kind: "final deck does not match claimed output",
            location: ShuffleLocation::DeckSnapshot { round: proof.rounds },
        });
    }

    Ok(())
}
