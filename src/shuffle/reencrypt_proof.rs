//! Single re-encryption proof: knowledge of `rho` such that
//! `out = in.reencrypt(pk, rho)` (spec.md §4.7, "re-encryption EqDL proof").
//!
//! Structurally a Chaum-Pedersen proof over the two bases `G` and `pk`, but
//! bound to a re-encryption statement (`out.C1 - in.C1`, `out.C2 - in.C2`)
//! rather than a decryption-share statement.

use crate::elgamal::Ciphertext;
use crate::error::{OcpError, Result};
use crate::group::{Point, Scalar};
use crate::transcript::Transcript;

const LOG_TARGET: &str = "ocp_core::shuffle::reencrypt_proof";
const DOMAIN: &str = crate::config::DOMAIN_SHUFFLE_REENC_EQDLOG;

/// `(A, B, z)`, 96 bytes canonically encoded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Proof {
    pub a: Point,
    pub b: Point,
    pub z: Scalar,
}

fn bind_statement(transcript: &mut Transcript, pk: &Point, input: &Ciphertext, output: &Ciphertext) {
    transcript.append("pk", &pk.bytes());
    transcript.append("in", &input.to_bytes());
    transcript.append("out", &output.to_bytes());
}

impl Proof {
    #[tracing::instrument(target = LOG_TARGET, skip(nonce, rho))]
    pub fn prove(pk: &Point, input: &Ciphertext, rho: &Scalar, nonce: &Scalar) -> (Self, Ciphertext) {
        let output = input.reencrypt(pk, rho);
        let a = Point::mul_base(nonce);
        let b = Point::mul_point(pk, nonce);

        let mut transcript = Transcript::new(DOMAIN);
        bind_statement(&mut transcript, pk, input, &output);
        transcript.append("a", &a.bytes());
        transcript.append("b", &b.bytes());
        let e = transcript.challenge_scalar("e");

        let z = nonce.add(&e.mul(rho));
        (Proof { a, b, z }, output)
    }

    /// Build this proof's two commitment points and response for a *known*
    /// challenge `e`, without re-deriving `e` from a transcript. Used inside
    /// the switch OR-proof, where the challenge is split between branches
    /// before any individual leg is finalized.
    pub fn prove_with_challenge(pk: &Point, rho: &Scalar, nonce: &Scalar, e: &Scalar) -> (Point, Point, Scalar) {
        let a = Point::mul_base(nonce);
        let b = Point::mul_point(pk, nonce);
        let z = nonce.add(&e.mul(rho));
        (a, b, z)
    }

    /// Simulate a leg for a known (freely chosen) challenge and response,
    /// reverse-computing the commitment points from the verification
    /// equation. Used for the non-real branch of the switch OR-proof.
    pub fn simulate(pk: &Point, delta_c1: &Point, delta_c2: &Point, e: &Scalar, z: &Scalar) -> (Point, Point) {
        let a = Point::mul_base(z).sub(&Point::mul_point(delta_c1, e));
        let b = Point::mul_point(pk, z).sub(&Point::mul_point(delta_c2, e));
        (a, b)
    }

    #[tracing::instrument(target = LOG_TARGET, skip(self))]
    pub fn verify(&self, pk: &Point, input: &Ciphertext, output: &Ciphertext) -> bool {
        let mut transcript = Transcript::new(DOMAIN);
        bind_statement(&mut transcript, pk, input, output);
        transcript.append("a", &self.a.bytes());
        transcript.append("b", &self.b.bytes());
        let e = transcript.challenge_scalar("e");

        let delta_c1 = output.c1.sub(&input.c1);
        let delta_c2 = output.c2.sub(&input.c2);

        let lhs1 = Point::mul_base(&self.z);
        let rhs1 = self.a.add(&Point::mul_point(&delta_c1, &e));
        let lhs2 = Point::mul_point(pk, &self.z);
        let rhs2 = self.b.add(&Point::mul_point(&delta_c2, &e));

        lhs1.eq(&rhs1) && lhs2.eq(&rhs2)
    }

    pub fn to_bytes(&self) -> [u8; 96] {
        let mut out = [0u8; 96];
        out[..32].copy_from_slice(&self.a.bytes());
        out[32..64].copy_from_slice(&self.b.bytes());
        out[64..].copy_from_slice(&self.z.bytes());
        out
    }

    pub fn from_bytes(bytes: &[u8; 96]) -> Result<Self> {
        let mut a = [0u8; 32];
        let mut b = [0u8; 32];
        let mut z = [0u8; 32];
        a.copy_from_slice(&bytes[..32]);
        b.copy_from_slice(&bytes[32..64]);
        z.copy_from_slice(&bytes[64..]);
        Ok(Proof {
            a: Point::from_bytes_canonical(&a).map_err(|_| OcpError::InvalidEncoding("reencrypt proof a".into()))?,
            b: Point::from_bytes_canonical(&b).map_err(|_| OcpError::InvalidEncoding("reencrypt proof b".into()))?,
            z: Scalar::from_bytes_canonical(&z)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn honest_proof_verifies() {
        let sk = Scalar::from_u64(9);
        let pk = Point::mul_base(&sk);
        let input = Ciphertext::encrypt(&pk, &Point::mul_base(&Scalar::from_u64(3)), &Scalar::from_u64(5));
        let rho = Scalar::from_u64(17);
        let nonce = Scalar::from_u64(21);
        let (proof, output) = Proof::prove(&pk, &input, &rho, &nonce);
        assert!(proof.verify(&pk, &input, &output));
    }

    #[test]
    fn output_decrypts_to_same_plaintext() {
        let sk = Scalar::from_u64(4);
        let pk = Point::mul_base(&sk);
        let plaintext = Point::mul_base(&Scalar::from_u64(30));
        let input = Ciphertext::encrypt(&pk, &plaintext, &Scalar::from_u64(6));
        let (_, output) = Proof::prove(&pk, &input, &Scalar::from_u64(8), &Scalar::from_u64(2));
        assert!(output.decrypt(&sk).eq(&plaintext));
    }

    #[test]
    fn tampered_output_fails_verification() {
        let sk = Scalar::from_u64(4);
        let pk = Point::mul_base(&sk);
        let input = Ciphertext::encrypt(&pk, &Point::mul_base(&Scalar::from_u64(1)), &Scalar::from_u64(2));
        let (proof, mut output) = Proof::prove(&pk, &input, &Scalar::from_u64(8), &Scalar::from_u64(2));
        output.c2 = output.c2.add(&Point::base());
        assert!(!proof.verify(&pk, &input, &output));
    }

    #[test]
    fn simulated_leg_satisfies_verification_equation() {
        let sk = Scalar::from_u64(4);
        let pk = Point::mul_base(&sk);
        let input = Ciphertext::encrypt(&pk, &Point::mul_base(&Scalar::from_u64(1)), &Scalar::from_u64(2));
        // A simulated output: pick any output and a free challenge/response,
        // then check the reverse-computed commitments satisfy the verifier's
        // equations directly (bypassing the Fiat-Shamir challenge derivation,
        // which is what the switch OR-proof composes over).
        let output = input.reencrypt(&pk, &Scalar::from_u64(50));
        let e = Scalar::from_u64(123);
        let z = Scalar::from_u64(456);
        let delta_c1 = output.c1.sub(&input.c1);
        let delta_c2 = output.c2.sub(&input.c2);
        let (a, b) = Proof::simulate(&pk, &delta_c1, &delta_c2, &e, &z);

        let lhs1 = Point::mul_base(&z);
        let rhs1 = a.add(&Point::mul_point(&delta_c1, &e));
        assert!(lhs1.eq(&rhs1));
        let lhs2 = Point::mul_point(&pk, &z);
        let rhs2 = b.add(&Point::mul_point(&delta_c2, &e));
        assert!(lhs2.eq(&rhs2));
    }
}
