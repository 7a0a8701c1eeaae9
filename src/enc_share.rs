//! Verifiable-encryption proof binding a player-encrypted decryption share to
//! its public statement (spec.md §4.5).
//!
//! Statement: `exists (x, r): Y = x*G /\ U = r*G /\ V = x*C1 + r*PKP`.

use crate::error::{OcpError, Result};
use crate::group::{Point, Scalar};
use crate::transcript::Transcript;
use rand::RngCore;

const LOG_TARGET: &str = "ocp_core::enc_share";
const DOMAIN: &str = crate::config::DOMAIN_DEALER_ENCSHARE;

/// `(A1, A2, A3, sx, sr)`, 160 bytes canonically encoded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Proof {
    pub a1: Point,
    pub a2: Point,
    pub a3: Point,
    pub sx: Scalar,
    pub sr: Scalar,
}

/// Public statement `(Y, U, V)` together with the bases `(C1, PKP)`.
#[derive(Clone, Copy, Debug)]
pub struct Statement {
    pub c1: Point,
    pub pkp: Point,
    pub y: Point,
    pub u: Point,
    pub v: Point,
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

fn bind_statement(transcript: &mut Transcript, stmt: &Statement) {
    transcript.append("c1", &stmt.c1.bytes());
    transcript.append("pkp", &stmt.pkp.bytes());
    transcript.append("y", &stmt.y.bytes());
    transcript.append("u", &stmt.u.bytes());
    transcript.append("v", &stmt.v.bytes());
}

impl Proof {
    /// Build the public statement for witness `(x, r)` against bases `(c1, pkp)`.
    pub fn statement_for(c1: &Point, pkp: &Point, x: &Scalar, r: &Scalar) -> Statement {
        let y = Point::mul_base(x);
        let u = Point::mul_base(r);
        let v = Point::mul_point(c1, x).add(&Point::mul_point(pkp, r));
        Statement {
            c1: *c1,
            pkp: *pkp,
            y,
            u,
            v,
        }
    }

    #[tracing::instrument(target = LOG_TARGET, skip(rng, x, r))]
    pub fn prove(rng: &mut impl RngCore, c1: &Point, pkp: &Point, x: &Scalar, r: &Scalar) -> (Self, Statement) {
        let stmt = Self::statement_for(c1, pkp, x, r);

        let wx = sample_nonzero_scalar(rng);
        let wr = sample_nonzero_scalar(rng);
        let a1 = Point::mul_base(&wx);
        let a2 = Point::mul_base(&wr);
        let a3 = Point::mul_point(c1, &wx).add(&Point::mul_point(pkp, &wr));

        let mut transcript = Transcript::new(DOMAIN);
        bind_statement(&mut transcript, &stmt);
        transcript.append("a1", &a1.bytes());
        transcript.append("a2", &a2.bytes());
        transcript.append("a3", &a3.bytes());
        let e = transcript.challenge_scalar("e");

        let sx = wx.add(&e.mul(x));
        let sr = wr.add(&e.mul(r));

        (
            Proof {
                a1,
                a2,
                a3,
                sx,
                sr,
            },
            stmt,
        )
    }

    #[tracing::instrument(target = LOG_TARGET, skip(self))]
    pub fn verify(&self, stmt: &Statement) -> bool {
        let mut transcript = Transcript::new(DOMAIN);
        bind_statement(&mut transcript, stmt);
        transcript.append("a1", &self.a1.bytes());
        transcript.append("a2", &self.a2.bytes());
        transcript.append("a3", &self.a3.bytes());
        let e = transcript.challenge_scalar("e");

        let check1 = Point::mul_base(&self.sx).eq(&self.a1.add(&Point::mul_point(&stmt.y, &e)));
        let check2 = Point::mul_base(&self.sr).eq(&self.a2.add(&Point::mul_point(&stmt.u, &e)));
        let lhs3 = Point::mul_point(&stmt.c1, &self.sx).add(&Point::mul_point(&stmt.pkp, &self.sr));
        let rhs3 = self.a3.add(&Point::mul_point(&stmt.v, &e));
        let check3 = lhs3.eq(&rhs3);

        check1 && check2 && check3
    }

    pub fn to_bytes(&self) -> [u8; 160] {
        let mut out = [0u8; 160];
        out[..32].copy_from_slice(&self.a1.bytes());
        out[32..64].copy_from_slice(&self.a2.bytes());
        out[64..96].copy_from_slice(&self.a3.bytes());
        out[96..128].copy_from_slice(&self.sx.bytes());
        out[128..].copy_from_slice(&self.sr.bytes());
        out
    }

    pub fn from_bytes(bytes: &[u8; 160]) -> Result<Self> {
        let mut a1 = [0u8; 32];
        let mut a2 = [0u8; 32];
        let mut a3 = [0u8; 32];
        let mut sx = [0u8; 32];
        let mut sr = [0u8; 32];
        a1.copy_from_slice(&bytes[..32]);
        a2.copy_from_slice(&bytes[32..64]);
        a3.copy_from_slice(&bytes[64..96]);
        sx.copy_from_slice(&bytes[96..128]);
        sr.copy_from_slice(&bytes[128..]);
        Ok(Proof {
            a1: Point::from_bytes_canonical(&a1)?,
            a2: Point::from_bytes_canonical(&a2)?,
            a3: Point::from_bytes_canonical(&a3)?,
            sx: Scalar::from_bytes_canonical(&sx)?,
            sr: Scalar::from_bytes_canonical(&sr)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn completeness() {
        let mut rng = StdRng::seed_from_u64(42);
        let c1 = Point::mul_base(&Scalar::from_u64(13));
        let pkp = Point::mul_base(&Scalar::from_u64(77));
        let x = Scalar::from_u64(5);
        let r = Scalar::from_u64(9);

        let (proof, stmt) = Proof::prove(&mut rng, &c1, &pkp, &x, &r);
        assert!(proof.verify(&stmt));
        assert_eq!(proof.to_bytes().len(), 160);
    }

    #[test]
    fn tampering_sx_fails() {
        let mut rng = StdRng::seed_from_u64(1);
        let c1 = Point::mul_base(&Scalar::from_u64(2));
        let pkp = Point::mul_base(&Scalar::from_u64(3));
        let (mut proof, stmt) = Proof::prove(&mut rng, &c1, &pkp, &Scalar::from_u64(4), &Scalar::from_u64(6));
        proof.sx = proof.sx.add(&Scalar::ONE);
        assert!(!proof.verify(&stmt));
    }

    #[test]
    fn tampering_sr_fails() {
        let mut rng = StdRng::seed_from_u64(2);
        let c1 = Point::mul_base(&Scalar::from_u64(2));
        let pkp = Point::mul_base(&Scalar::from_u64(3));
        let (mut proof, stmt) = Proof::prove(&mut rng, &c1, &pkp, &Scalar::from_u64(4), &Scalar::from_u64(6));
        proof.sr = proof.sr.add(&Scalar::ONE);
        assert!(!proof.verify(&stmt));
    }

    #[test]
    fn tampering_statement_element_fails() {
        let mut rng = StdRng::seed_from_u64(3);
        let c1 = Point::mul_base(&Scalar::from_u64(2));
        let pkp = Point::mul_base(&Scalar::from_u64(3));
        let (proof, mut stmt) = Proof::prove(&mut rng, &c1, &pkp, &Scalar::from_u64(4), &Scalar::from_u64(6));
        stmt.v = stmt.v.add(&Point::base());
        assert!(!proof.verify(&stmt));
    }

    proptest::proptest! {
        #[test]
        fn bit_flip_breaks_verification(seed in 0u64..500, bit in 0u32..1280) {
            let mut rng = StdRng::seed_from_u64(seed);
            let c1 = Point::mul_base(&Scalar::from_u64(seed + 1));
            let pkp = Point::mul_base(&Scalar::from_u64(seed + 2));
            let x = Scalar::from_u64(seed + 3);
            let r = Scalar::from_u64(seed + 4);
            let (proof, stmt) = Proof::prove(&mut rng, &c1, &pkp, &x, &r);

            let mut bytes = proof.to_bytes();
            bytes[(bit / 8) as usize] ^= 1 << (bit % 8);
            match Proof::from_bytes(&bytes) {
                Ok(flipped) => assert!(!flipped.verify(&stmt)),
                Err(_) => {}
            }
        }
    }
}
