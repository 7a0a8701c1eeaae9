//! Wire encoding for a complete shuffle proof (spec.md §6 "Shuffle proof
//! header" and "Shuffle round body").
//!
//! Each round carries its own resulting deck alongside its proofs: a switch
//! or single re-encryption proof only attests a transition between two
//! concrete ciphertexts, so the verifier needs the round's output deck in
//! hand to check it, not just the final one.

use crate::config::SHUFFLE_PROOF_VERSION;
use crate::elgamal::Ciphertext;
use crate::error::{OcpError, Result};
use crate::shuffle::round_table;
use crate::shuffle::switch_proof::SwitchProof;

/// One round's worth of switch/single proofs plus the deck they transition
/// into. `outputs[i]` is the ciphertext occupying slot `i` after this round.
#[derive(Clone, Debug)]
pub struct RoundProof {
    pub pair_proofs: Vec<SwitchProof>,
    pub single_proofs: Vec<crate::shuffle::reencrypt_proof::Proof>,
    pub outputs: Deck,
}

#[derive(Clone, Debug)]
pub struct ShuffleProof {
    pub n: u16,
    pub rounds: u16,
    pub round_proofs: Vec<RoundProof>,
}

impl ShuffleProof {
    /// `version || u16le(n) || u16le(rounds)`, 5 bytes.
    pub fn header_bytes(&self) -> [u8; 5] {
        let mut out = [0u8; 5];
        out[0] = SHUFFLE_PROOF_VERSION;
        out[1..3].copy_from_slice(&self.n.to_le_bytes());
        out[3..5].copy_from_slice(&self.rounds.to_le_bytes());
        out
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&self.header_bytes());
        for round in &self.round_proofs {
            for ciphertext in &round.outputs {
                out.extend_from_slice(&ciphertext.to_bytes());
            }
            for pair_proof in &round.pair_proofs {
                out.extend_from_slice(&pair_proof.to_bytes());
            }
            for single_proof in &round.single_proofs {
                out.extend_from_slice(&single_proof.to_bytes());
            }
        }
        out
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < 5 {
            return Err(OcpError::InvalidEncoding("shuffle proof shorter than header".into()));
        }
        let version = bytes[0];
        if version != SHUFFLE_PROOF_VERSION {
            return Err(OcpError::InvalidEncoding(format!(
                "unsupported shuffle proof version {version}"
            )));
        }
        let mut n_bytes = [0u8; 2];
        n_bytes.copy_from_slice(&bytes[1..3]);
        let n = u16::from_le_bytes(n_bytes);
        let mut rounds_bytes = [0u8; 2];
        rounds_bytes.copy_from_slice(&bytes[3..5]);
        let rounds = u16::from_le_bytes(rounds_bytes);

        let mut cursor = 5usize;
        let mut round_proofs = Vec::with_capacity(rounds as usize);
        for round_index in 0..rounds {
            let (pairs, singles) = round_table::partition(n, round_index);

            let mut outputs = Vec::with_capacity(n as usize);
            for _ in 0..n {
                let chunk = take_chunk(bytes, &mut cursor, 64)?;
                let mut array = [0u8; 64];
                array.copy_from_slice(chunk);
                outputs.push(Ciphertext::from_bytes(&array)?);
            }

            let mut pair_proofs = Vec::with_capacity(pairs.len());
            for _ in &pairs {
                let chunk = take_chunk(bytes, &mut cursor, 416)?;
                let mut array = [0u8; 416];
                array.copy_from_slice(chunk);
                pair_proofs.push(SwitchProof::from_bytes(&array)?);
            }

            let mut single_proofs = Vec::with_capacity(singles.len());
            for _ in &singles {
                let chunk = take_chunk(bytes, &mut cursor, 96)?;
                let mut array = [0u8; 96];
                array.copy_from_slice(chunk);
                single_proofs.push(crate::shuffle::reencrypt_proof::Proof::from_bytes(&array)?);
            }

            round_proofs.push(RoundProof { pair_proofs, single_proofs, outputs });
        }

        if cursor != bytes.len() {
            return Err(OcpError::InvalidEncoding("trailing bytes after shuffle proof body".into()));
        }

        Ok(ShuffleProof { n, rounds, round_proofs })
    }
}

fn take_chunk<'a>(bytes: &'a [u8], cursor: &mut usize, len: usize) -> Result<&'a [u8]> {
    if *cursor + len > bytes.len() {
        return Err(OcpError::InvalidEncoding("shuffle proof body truncated".into()));
    }
    let chunk = &bytes[*cursor..*cursor + len];
    *cursor += len;
    Ok(chunk)
}

/// A deck of ciphertexts the shuffle permutes, re-encrypting each entry.
pub type Deck = Vec<Ciphertext>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::{Point, Scalar};
    use crate::shuffle::reencrypt_proof::Proof as ReencProof;

    #[test]
    fn header_round_trip() {
        let proof = ShuffleProof {
            n: 52,
            rounds: 4,
            round_proofs: vec![],
        };
        let header = proof.header_bytes();
        assert_eq!(header[0], SHUFFLE_PROOF_VERSION);
        assert_eq!(u16::from_le_bytes([header[1], header[2]]), 52);
        assert_eq!(u16::from_le_bytes([header[3], header[4]]), 4);
    }

    #[test]
    fn rejects_wrong_version() {
        let mut bytes = vec![0u8; 5];
        bytes[0] = SHUFFLE_PROOF_VERSION.wrapping_add(1);
        assert!(ShuffleProof::from_bytes(&bytes).is_err());
    }

    #[test]
    fn rejects_truncated_header() {
        assert!(ShuffleProof::from_bytes(&[0u8; 3]).is_err());
    }

    #[test]
    fn round_trips_small_deck_single_round() {
        let sk = Scalar::from_u64(9);
        let pk = Point::mul_base(&sk);
        let (_, singles) = round_table::partition(3, 0);
        assert_eq!(singles.len(), 1);
        let nonce = Scalar::from_u64(5);
        let input = crate::elgamal::Ciphertext::encrypt(&pk, &Point::mul_base(&Scalar::from_u64(2)), &Scalar::from_u64(3));
        let (single_proof, single_out) = ReencProof::prove(&pk, &input, &Scalar::from_u64(4), &nonce);
        let proof = ShuffleProof {
            n: 3,
            rounds: 1,
            round_proofs: vec![RoundProof {
                pair_proofs: vec![],
                single_proofs: vec![single_proof],
                outputs: vec![single_out; 3],
            }],
        };
        let bytes = proof.to_bytes();
        let decoded = ShuffleProof::from_bytes(&bytes).unwrap();
        assert_eq!(decoded.n, 3);
        assert_eq!(decoded.round_proofs.len(), 1);
        assert_eq!(decoded.round_proofs[0].single_proofs.len(), 1);
        assert_eq!(decoded.round_proofs[0].outputs.len(), 3);
    }
}
