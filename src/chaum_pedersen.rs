//! Chaum-Pedersen equal-discrete-log proof (spec.md §4.4).
//!
//! Statement: `y = x*G /\ d = x*C1`. Used to validate a threshold decryption
//! share without revealing the share's discrete log.

use crate::error::{OcpError, Result};
use crate::group::{Point, Scalar};
use crate::transcript::Transcript;
use rand::RngCore;

const LOG_TARGET: &str = "ocp_core::chaum_pedersen";
const DOMAIN: &str = crate::config::DOMAIN_CHAUM_PEDERSEN_EQDL;

/// `(A, B, s)`, 96 bytes canonically encoded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Proof {
    pub a: Point,
    pub b: Point,
    pub s: Scalar,
}

fn sample_nonzero_scalar(rng: &mut impl RngCore) -> Scalar {
    loop {
        let mut bytes = [0u8; 64];
        rng.fill_bytes(&mut bytes);
        let candidate = Scalar::from_uniform_bytes(&bytes);
        if !candidate.is_zero() {
            return candidate;
        }
    }
}

fn bind_statement(transcript: &mut Transcript, y: &Point, c1: &Point, d: &Point) {
    transcript.append("y", &y.bytes());
    transcript.append("c1", &c1.bytes());
    transcript.append("d", &d.bytes());
}

impl Proof {
    /// Prove `y = x*G /\ d = x*c1` for witness `x` (x = 0 is permitted, it
    /// occurs in degenerate cases). The nonce `w` is sampled non-zero.
    #[tracing::instrument(target = LOG_TARGET, skip(rng, x))]
    pub fn prove(rng: &mut impl RngCore, c1: &Point, x: &Scalar) -> Self {
        let w = sample_nonzero_scalar(rng);
        Self::prove_with_nonce(c1, x, &w)
    }

    /// Prove with an explicit nonce `w` instead of sampling one. `w` must be
    /// non-zero; exposed so deterministic test vectors can pin proof bytes.
    /// `prove` is the standard randomized entry point for production use.
    pub fn prove_with_nonce(c1: &Point, x: &Scalar, w: &Scalar) -> Self {
        let y = Point::mul_base(x);
        let d = Point::mul_point(c1, x);

        let a = Point::mul_base(w);
        let b = Point::mul_point(c1, w);

        let mut transcript = Transcript::new(DOMAIN);
        bind_statement(&mut transcript, &y, c1, &d);
        transcript.append("a", &a.bytes());
        transcript.append("b", &b.bytes());
        let e = transcript.challenge_scalar("e");

        let s = w.add(&e.mul(x));
        Proof { a, b, s }
    }

    /// Verify the proof against the public statement `(y, c1, d)`.
    #[tracing::instrument(target = LOG_TARGET, skip(self))]
    pub fn verify(&self, y: &Point, c1: &Point, d: &Point) -> bool {
        let mut transcript = Transcript::new(DOMAIN);
        bind_statement(&mut transcript, y, c1, d);
        transcript.append("a", &self.a.bytes());
        transcript.append("b", &self.b.bytes());
        let e = transcript.challenge_scalar("e");

        let lhs1 = Point::mul_base(&self.s);
        let rhs1 = self.a.add(&Point::mul_point(y, &e));
        let lhs2 = Point::mul_point(c1, &self.s);
        let rhs2 = self.b.add(&Point::mul_point(d, &e));

        lhs1.eq(&rhs1) && lhs2.eq(&rhs2)
    }

    pub fn to_bytes(&self) -> [u8; 96] {
        let mut out = [0u8; 96];
        out[..32].copy_from_slice(&self.a.bytes());
        out[32..64].copy_from_slice(&self.b.bytes());
        out[64..].copy_from_slice(&self.s.bytes());
        out
    }

    pub fn from_bytes(bytes: &[u8; 96]) -> Result<Self> {
        let mut a = [0u8; 32];
        let mut b = [0u8; 32];
        let mut s = [0u8; 32];
        a.copy_from_slice(&bytes[..32]);
        b.copy_from_slice(&bytes[32..64]);
        s.copy_from_slice(&bytes[64..]);
        Ok(Proof {
            a: Point::from_bytes_canonical(&a)?,
            b: Point::from_bytes_canonical(&b)?,
            s: Scalar::from_bytes_canonical(&s)?,
        })
    }
}

/// Verify many proofs sharing the same `c1` base more cheaply than verifying
/// each one independently, via a random linear combination of the two
/// equations. Soundness is unaffected: a forged proof surviving the
/// combination with overwhelming probability would also pass individually.
pub fn batch_verify(proofs: &[(Proof, Point, Point, Point)], rng: &mut impl RngCore) -> bool {
    if proofs.is_empty() {
        return false;
    }

    let mut acc_lhs1 = Point::identity();
    let mut acc_rhs1 = Point::identity();
    let mut acc_lhs2 = Point::identity();
    let mut acc_rhs2 = Point::identity();

    for (proof, y, c1, d) in proofs {
        let rho = sample_nonzero_scalar(rng);

        let mut transcript = Transcript::new(DOMAIN);
        bind_statement(&mut transcript, y, c1, d);
        transcript.append("a", &proof.a.bytes());
        transcript.append("b", &proof.b.bytes());
        let e = transcript.challenge_scalar("e");

        acc_lhs1 = acc_lhs1.add(&Point::mul_base(&rho.mul(&proof.s)));
        acc_rhs1 = acc_rhs1.add(&Point::mul_point(&proof.a.add(&Point::mul_point(y, &e)), &rho));

        acc_lhs2 = acc_lhs2.add(&Point::mul_point(c1, &rho.mul(&proof.s)));
        acc_rhs2 = acc_rhs2.add(&Point::mul_point(&proof.b.add(&Point::mul_point(d, &e)), &rho));
    }

    acc_lhs1.eq(&acc_rhs1) && acc_lhs2.eq(&acc_rhs2)
}
