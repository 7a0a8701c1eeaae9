//! Lifted ElGamal encryption over ristretto255 (spec.md §4.3).
//!
//! Plaintexts are group elements. Cards are encoded as `(cardId+1)*G` so
//! `cardId = 0` is distinguishable from the identity element.

use crate::error::{OcpError, Result};
use crate::group::{Point, Scalar};

const LOG_TARGET: &str = "ocp_core::elgamal";

/// `(C1, C2) = (r*G, m + r*PK)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Ciphertext {
    pub c1: Point,
    pub c2: Point,
}

impl Ciphertext {
    pub fn encrypt(pk: &Point, m: &Point, r: &Scalar) -> Self {
        let c1 = Point::mul_base(r);
        let c2 = m.add(&Point::mul_point(pk, r));
        Ciphertext { c1, c2 }
    }

    pub fn decrypt(&self, sk: &Scalar) -> Point {
        self.c2.sub(&Point::mul_point(&self.c1, sk))
    }

    /// Re-encrypt in place conceptually: returns a fresh ciphertext that
    /// decrypts to the same plaintext, blinded by `rho`.
    pub fn reencrypt(&self, pk: &Point, rho: &Scalar) -> Ciphertext {
        Ciphertext {
            c1: self.c1.add(&Point::mul_base(rho)),
            c2: self.c2.add(&Point::mul_point(pk, rho)),
        }
    }

    /// 64-byte canonical encoding: `C1 || C2`.
    pub fn to_bytes(&self) -> [u8; 64] {
        let mut out = [0u8; 64];
        out[..32].copy_from_slice(&self.c1.bytes());
        out[32..].copy_from_slice(&self.c2.bytes());
        out
    }

    pub fn from_bytes(bytes: &[u8; 64]) -> Result<Self> {
        let mut c1_bytes = [0u8; 32];
        let mut c2_bytes = [0u8; 32];
        c1_bytes.copy_from_slice(&bytes[..32]);
        c2_bytes.copy_from_slice(&bytes[32..]);
        Ok(Ciphertext {
            c1: Point::from_bytes_canonical(&c1_bytes)?,
            c2: Point::from_bytes_canonical(&c2_bytes)?,
        })
    }
}

/// Encode a card id (`0..deckSize-1`) as `(cardId+1)*G`.
pub fn encode_card(card_id: u8) -> Point {
    Point::mul_base(&Scalar::from_u64(card_id as u64 + 1))
}

/// Recover a card id from a decrypted plaintext by exhaustive search over a
/// small deck. Deck sizes in mental poker are small (<=52), so a linear scan
/// over precomputed base multiples is cheap and avoids a discrete-log solver.
#[tracing::instrument(target = LOG_TARGET, skip(plaintext))]
pub fn decode_card(plaintext: &Point, deck_size: usize) -> Result<u8> {
    for card_id in 0..deck_size {
        if encode_card(card_id as u8).eq(plaintext) {
            return Ok(card_id as u8);
        }
    }
    Err(OcpError::InvalidArgument(
        "plaintext does not correspond to any card in the deck".into(),
    ))
}
