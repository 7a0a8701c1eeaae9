//! Switch OR-proof: for one adjacent pair `(in0, in1) -> (out0, out1)`,
//! prove that either
//!   branch 0 (no swap):  out0 = reenc(in0), out1 = reenc(in1)
//! or
//!   branch 1 (swap):     out0 = reenc(in1), out1 = reenc(in0)
//! holds, without revealing which (spec.md §4.7 "switch proof").
//!
//! Built from four independent re-encryption legs (two per branch) glued
//! together by a Cramer-Damgard-Schoenmakers OR-proof: the real branch's
//! legs are proven honestly under a challenge `e_real`; the other branch's
//! legs are simulated under a freely chosen challenge `e_fake`, and
//! `e_real + e_fake == e`, the transcript's derived challenge. `e0` (branch
//! 0's challenge, whichever role it plays) is the only challenge recorded;
//! the verifier derives branch 1's as `e - e0`.

use crate::elgamal::Ciphertext;
use crate::error::{OcpError, Result};
use crate::group::{Point, Scalar};
use crate::shuffle::reencrypt_proof::Proof as ReencProof;
use crate::transcript::Transcript;
use rand::RngCore;

const LOG_TARGET: &str = "ocp_core::shuffle::switch_proof";
const DOMAIN: &str = crate::config::DOMAIN_SHUFFLE_SWITCH_OR;

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
struct Leg {
    t1: Point,
    t2: Point,
    z: Scalar,
}

impl Leg {
    fn to_bytes(&self) -> [u8; 96] {
        let mut out = [0u8; 96];
        out[..32].copy_from_slice(&self.t1.bytes());
        out[32..64].copy_from_slice(&self.t2.bytes());
        out[64..].copy_from_slice(&self.z.bytes());
        out
    }

    fn from_bytes(bytes: &[u8; 96]) -> Result<Self> {
        let mut t1 = [0u8; 32];
        let mut t2 = [0u8; 32];
        let mut z = [0u8; 32];
        t1.copy_from_slice(&bytes[..32]);
        t2.copy_from_slice(&bytes[32..64]);
        z.copy_from_slice(&bytes[64..]);
        Ok(Leg {
            t1: Point::from_bytes_canonical(&t1).map_err(|_| OcpError::InvalidEncoding("switch proof leg t1".into()))?,
            t2: Point::from_bytes_canonical(&t2).map_err(|_| OcpError::InvalidEncoding("switch proof leg t2".into()))?,
            z: Scalar::from_bytes_canonical(&z)?,
        })
    }
}

/// `e0 || leg[branch0,slot0] || leg[branch0,slot1] || leg[branch1,slot0] || leg[branch1,slot1]`,
/// 32 + 4*96 = 416 bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SwitchProof {
    e0: Scalar,
    legs: [Leg; 4],
}

fn delta(output: &Ciphertext, input: &Ciphertext) -> (Point, Point) {
    (output.c1.sub(&input.c1), output.c2.sub(&input.c2))
}

fn bind_statement(
    transcript: &mut Transcript,
    pk: &Point,
    in0: &Ciphertext,
    in1: &Ciphertext,
    out0: &Ciphertext,
    out1: &Ciphertext,
) {
    transcript.append("pk", &pk.bytes());
    transcript.append("in0", &in0.to_bytes());
    transcript.append("in1", &in1.to_bytes());
    transcript.append("out0", &out0.to_bytes());
    transcript.append("out1", &out1.to_bytes());
}

impl SwitchProof {
    /// Prove the pair transition. `swap` selects which branch is real.
    /// `rho0, rho1` are the blinding factors used to produce `out0, out1`
    /// from whichever inputs `swap` assigns them (not necessarily `in0,in1`
    /// in that order). `nonce0, nonce1` are the real branch's sigma nonces;
    /// `fake_e, fake_z0, fake_z1` are freely chosen simulation parameters
    /// for the non-real branch.
    #[allow(clippy::too_many_arguments)]
    #[tracing::instrument(target = LOG_TARGET, skip_all)]
    pub fn prove(
        pk: &Point,
        in0: &Ciphertext,
        in1: &Ciphertext,
        swap: bool,
        rho0: &Scalar,
        rho1: &Scalar,
        rng: &mut impl RngCore,
    ) -> (Self, Ciphertext, Ciphertext) {
        let (src0, src1) = if swap { (in1, in0) } else { (in0, in1) };
        let out0 = src0.reencrypt(pk, rho0);
        let out1 = src1.reencrypt(pk, rho1);

        let nonce0 = sample_nonzero_scalar(rng);
        let nonce1 = sample_nonzero_scalar(rng);
        let fake_e = sample_nonzero_scalar(rng);
        let fake_z0 = sample_nonzero_scalar(rng);
        let fake_z1 = sample_nonzero_scalar(rng);

        // Commitments for the real branch, honest nonces; challenge unknown
        // yet so these are provisional (A = nonce*G form, independent of e).
        let real_a0 = Point::mul_base(&nonce0);
        let real_b0 = Point::mul_point(pk, &nonce0);
        let real_a1 = Point::mul_base(&nonce1);
        let real_b1 = Point::mul_point(pk, &nonce1);

        // Commitments for the fake branch, reverse-computed from the chosen
        // challenge/response against that branch's (false) statement.
        let (fake_src0, fake_src1) = if swap { (in0, in1) } else { (in1, in0) };
        let (fake_delta_c1_0, fake_delta_c2_0) = delta(&out0, fake_src0);
        let (fake_delta_c1_1, fake_delta_c2_1) = delta(&out1, fake_src1);
        let (fake_a0, fake_b0) = ReencProof::simulate(pk, &fake_delta_c1_0, &fake_delta_c2_0, &fake_e, &fake_z0);
        let (fake_a1, fake_b1) = ReencProof::simulate(pk, &fake_delta_c1_1, &fake_delta_c2_1, &fake_e, &fake_z1);

        let mut transcript = Transcript::new(DOMAIN);
        bind_statement(&mut transcript, pk, in0, in1, &out0, &out1);
        let (branch0_a, branch0_b, branch1_a, branch1_b) = if swap {
            (&fake_a0, &fake_a1, &real_a0, &real_a1)
        } else {
            (&real_a0, &real_a1, &fake_a0, &fake_a1)
        };
        let (branch0_b0, branch0_b1, branch1_b0, branch1_b1) = if swap {
            (&fake_b0, &fake_b1, &real_b0, &real_b1)
        } else {
            (&real_b0, &real_b1, &fake_b0, &fake_b1)
        };
        transcript.append("t_branch0_slot0", &[branch0_a.bytes(), branch0_b0.bytes()].concat());
        transcript.append("t_branch0_slot1", &[branch0_b.bytes(), branch0_b1.bytes()].concat());
        transcript.append("t_branch1_slot0", &[branch1_a.bytes(), branch1_b0.bytes()].concat());
        transcript.append("t_branch1_slot1", &[branch1_b.bytes(), branch1_b1.bytes()].concat());
        let e = transcript.challenge_scalar("e");

        let e_real = e.sub(&fake_e);
        let (_, _, real_z0) = ReencProof::prove_with_challenge(pk, rho0, &nonce0, &e_real);
        let (_, _, real_z1) = ReencProof::prove_with_challenge(pk, rho1, &nonce1, &e_real);

        let (e0, branch0_legs, branch1_legs) = if swap {
            (
                fake_e,
                [
                    Leg { t1: fake_a0, t2: fake_b0, z: fake_z0 },
                    Leg { t1: fake_a1, t2: fake_b1, z: fake_z1 },
                ],
                [
                    Leg { t1: real_a0, t2: real_b0, z: real_z0 },
                    Leg { t1: real_a1, t2: real_b1, z: real_z1 },
                ],
            )
        } else {
            (
                e_real,
                [
                    Leg { t1: real_a0, t2: real_b0, z: real_z0 },
                    Leg { t1: real_a1, t2: real_b1, z: real_z1 },
                ],
                [
                    Leg { t1: fake_a0, t2: fake_b0, z: fake_z0 },
                    Leg { t1: fake_a1, t2: fake_b1, z: fake_z1 },
                ],
            )
        };

        let legs = [branch0_legs[0], branch0_legs[1], branch1_legs[0], branch1_legs[1]];
        (SwitchProof { e0, legs }, out0, out1)
    }

    #[tracing::instrument(target = LOG_TARGET, skip(self))]
    pub fn verify(
        &self,
        pk: &Point,
        in0: &Ciphertext,
        in1: &Ciphertext,
        out0: &Ciphertext,
        out1: &Ciphertext,
    ) -> bool {
        let mut transcript = Transcript::new(DOMAIN);
        bind_statement(&mut transcript, pk, in0, in1, out0, out1);
        transcript.append(
            "t_branch0_slot0",
            &[self.legs[0].t1.bytes(), self.legs[0].t2.bytes()].concat(),
        );
        transcript.append(
            "t_branch0_slot1",
            &[self.legs[1].t1.bytes(), self.legs[1].t2.bytes()].concat(),
        );
        transcript.append(
            "t_branch1_slot0",
            &[self.legs[2].t1.bytes(), self.legs[2].t2.bytes()].concat(),
        );
        transcript.append(
            "t_branch1_slot1",
            &[self.legs[3].t1.bytes(), self.legs[3].t2.bytes()].concat(),
        );
        let e = transcript.challenge_scalar("e");
        let e1 = e.sub(&self.e0);

        let (d_branch0_slot0_c1, d_branch0_slot0_c2) = delta(out0, in0);
        let (d_branch0_slot1_c1, d_branch0_slot1_c2) = delta(out1, in1);
        let (d_branch1_slot0_c1, d_branch1_slot0_c2) = delta(out0, in1);
        let (d_branch1_slot1_c1, d_branch1_slot1_c2) = delta(out1, in0);

        let checks = [
            (self.legs[0], self.e0, d_branch0_slot0_c1, d_branch0_slot0_c2),
            (self.legs[1], self.e0, d_branch0_slot1_c1, d_branch0_slot1_c2),
            (self.legs[2], e1, d_branch1_slot0_c1, d_branch1_slot0_c2),
            (self.legs[3], e1, d_branch1_slot1_c1, d_branch1_slot1_c2),
        ];

        for (leg, challenge, delta_c1, delta_c2) in checks {
            let lhs1 = Point::mul_base(&leg.z);
            let rhs1 = leg.t1.add(&Point::mul_point(&delta_c1, &challenge));
            let lhs2 = Point::mul_point(pk, &leg.z);
            let rhs2 = leg.t2.add(&Point::mul_point(&delta_c2, &challenge));
            if !lhs1.eq(&rhs1) || !lhs2.eq(&rhs2) {
                return false;
            }
        }
        true
    }

    pub fn to_bytes(&self) -> [u8; 416] {
        let mut out = [0u8; 416];
        out[..32].copy_from_slice(&self.e0.bytes());
        for (i, leg) in self.legs.iter().enumerate() {
            let offset = 32 + i * 96;
            out[offset..offset + 96].copy_from_slice(&leg.to_bytes());
        }
        out
    }

    pub fn from_bytes(bytes: &[u8; 416]) -> Result<Self> {
        let mut e0_bytes = [0u8; 32];
        e0_bytes.copy_from_slice(&bytes[..32]);
        let e0 = Scalar::from_bytes_canonical(&e0_bytes)?;

        let mut legs = Vec::with_capacity(4);
        for i in 0..4 {
            let offset = 32 + i * 96;
            let mut leg_bytes = [0u8; 96];
            leg_bytes.copy_from_slice(&bytes[offset..offset + 96]);
            legs.push(Leg::from_bytes(&leg_bytes)?);
        }
        Ok(SwitchProof {
            e0,
            legs: [legs[0], legs[1], legs[2], legs[3]],
        })
    }
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
