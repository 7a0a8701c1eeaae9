//! The live, event-driven DKG engine: a caller-owned state machine that
//! assembles the on-chain transcript round by round and finalizes it
//! (spec.md §4.6). `verify_transcript` is the pure, replayable counterpart a
//! non-participant uses to check a finished epoch from published bytes alone.

use super::complaint::{evaluate_commitment_poly, resolve_slashed};
use super::types::{Complaint, DealerCommitments, FinalizedEpoch, MemberId, Phase, Reveal};
use crate::error::{OcpError, Result};
use crate::group::{Point, Scalar};
use std::collections::{BTreeMap, BTreeSet};

const LOG_TARGET: &str = "ocp_core::dkg::state";

/// The complete public transcript of one epoch: everything a non-participant
/// watcher needs to independently derive `QUAL` and `PK_E`.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct OnChainTranscript {
    pub epoch_id: u64,
    pub threshold: usize,
    pub committee: Vec<MemberId>,
    pub commitments: BTreeMap<MemberId, DealerCommitments>,
    pub complaints: Vec<Complaint>,
    pub reveals: Vec<Reveal>,
}

fn validate_committee(committee: &[MemberId], threshold: usize) -> Result<()> {
    if committee.is_empty() {
        return Err(OcpError::InvalidArgument("DKG committee must be non-empty".into()));
    }
    if threshold == 0 || threshold > committee.len() {
        return Err(OcpError::InvalidArgument(format!(
            "threshold {threshold} out of range for committee of size {}",
            committee.len()
        )));
    }
    let mut seen = BTreeSet::new();
    for member in committee {
        if member.0 == 0 {
            return Err(OcpError::InvalidArgument("member id 0 is reserved (non-zero index required)".into()));
        }
        if !seen.insert(*member) {
            return Err(OcpError::InvalidArgument(format!("duplicate committee member id {}", member.0)));
        }
    }
    Ok(())
}

/// Derive `(QUAL, PK_E)` from a finished on-chain transcript alone. Two
/// independent verifiers given the same transcript MUST produce identical
/// output (spec.md testable property 7).
#[tracing::instrument(target = LOG_TARGET, skip(transcript))]
pub fn verify_transcript(transcript: &OnChainTranscript) -> Result<FinalizedEpoch> {
    validate_committee(&transcript.committee, transcript.threshold)?;

    // Dealers whose commitment vector has the wrong length never properly
    // committed; exclude them so they fall into the "missing commit" branch
    // of `resolve_slashed` by omission.
    let well_formed_commitments: BTreeMap<MemberId, DealerCommitments> = transcript
        .commitments
        .iter()
        .filter(|(_, c)| c.len() == transcript.threshold)
        .map(|(id, c)| (*id, c.clone()))
        .collect();

    let slashed = resolve_slashed(
        &transcript.committee,
        &well_formed_commitments,
        &transcript.complaints,
        &transcript.reveals,
    );

    // Canonical order: committee is already sorted by id (MemberId: Ord),
    // BTreeSet difference preserves that order.
    let qual: Vec<MemberId> = transcript
        .committee
        .iter()
        .filter(|m| !slashed.contains(m))
        .copied()
        .collect();

    if qual.len() < transcript.threshold {
        tracing::warn!(target: LOG_TARGET, epoch_id = transcript.epoch_id, qual = qual.len(), "DKG aborted: quorum collapsed");
        return Err(OcpError::DkgAborted {
            qual_size: qual.len(),
            threshold: transcript.threshold,
        });
    }

    let mut epoch_public_key = Point::identity();
    for dealer in &qual {
        epoch_public_key = epoch_public_key.add(&well_formed_commitments[dealer][0]);
    }

    Ok(FinalizedEpoch {
        epoch_id: transcript.epoch_id,
        qual,
        epoch_public_key,
    })
}

/// A member's locally-held aggregate secret share, computed from the private
/// shares it received from each dealer in `QUAL`. This is never published:
/// only the member who holds the `(dealer -> share)` map can compute it.
pub fn aggregate_secret_share(qual: &[MemberId], received_shares: &BTreeMap<MemberId, Scalar>) -> Result<Scalar> {
    let mut acc = Scalar::ZERO;
    for dealer in qual {
        let share = received_shares
            .get(dealer)
            .ok_or_else(|| OcpError::InvalidArgument(format!("missing private share from dealer {}", dealer.0)))?;
        acc = acc.add(share);
    }
    Ok(acc)
}

/// Caller-owned, event-driven DKG epoch builder. Wraps [`OnChainTranscript`]
/// assembly behind the phase sequence from spec.md §4.6; each transition is
/// driven by the caller supplying either a quorum of expected messages or
/// signalling deadline expiry (there are no internal timers in this core —
/// see spec.md §5).
#[derive(Clone, Debug)]
pub struct Epoch {
    transcript: OnChainTranscript,
    phase: Phase,
    finalized: Option<FinalizedEpoch>,
}

impl Epoch {
    pub fn new(epoch_id: u64, committee: Vec<MemberId>, threshold: usize) -> Result<Self> {
        validate_committee(&committee, threshold)?;
        Ok(Epoch {
            transcript: OnChainTranscript {
                epoch_id,
                threshold,
                committee,
                commitments: BTreeMap::new(),
                complaints: Vec::new(),
                reveals: Vec::new(),
            },
            phase: Phase::Proposed,
            finalized: None,
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn transcript(&self) -> &OnChainTranscript {
        &self.transcript
    }

    /// Round 1: a dealer publishes its Feldman commitments.
    #[tracing::instrument(target = LOG_TARGET, skip(self, commitments), fields(epoch_id = self.transcript.epoch_id))]
    pub fn submit_commitment(&mut self, dealer: MemberId, commitments: DealerCommitments) -> Result<()> {
        if !matches!(self.phase, Phase::Proposed | Phase::Committed) {
            return Err(OcpError::InvalidArgument("commitments may only be submitted before the commit deadline".into()));
        }
        if !self.transcript.committee.contains(&dealer) {
            return Err(OcpError::InvalidArgument(format!("{} is not a committee member", dealer.0)));
        }
        if commitments.len() != self.transcript.threshold {
            return Err(OcpError::InvalidArgument(format!(
                "expected {} commitments, got {}",
                self.transcript.threshold,
                commitments.len()
            )));
        }
        self.transcript.commitments.insert(dealer, commitments);
        self.phase = Phase::Committed;
        Ok(())
    }

    /// Commit-deadline expiry: advance to the complaint phase. Any member who
    /// never published commitments is slashed for "missing commit" once
    /// `verify_transcript` resolves the transcript.
    pub fn close_commit_phase(&mut self) -> Result<()> {
        if !matches!(self.phase, Phase::Proposed | Phase::Committed) {
            return Err(OcpError::InvalidArgument("not in the commit phase".into()));
        }
        self.phase = Phase::Complaining;
        Ok(())
    }

    /// Round 3: a member complains about a dealer.
    pub fn submit_complaint(&mut self, complaint: Complaint) -> Result<()> {
        if self.phase != Phase::Complaining {
            return Err(OcpError::InvalidArgument("not in the complaint phase".into()));
        }
        if !self.transcript.committee.contains(&complaint.complainer)
            || !self.transcript.committee.contains(&complaint.dealer)
        {
            return Err(OcpError::InvalidArgument("complaint references a non-member".into()));
        }
        self.transcript.complaints.push(complaint);
        Ok(())
    }

    /// Complaint-deadline expiry: advance to the reveal phase.
    pub fn close_complaint_phase(&mut self) -> Result<()> {
        if self.phase != Phase::Complaining {
            return Err(OcpError::InvalidArgument("not in the complaint phase".into()));
        }
        self.phase = Phase::Revealing;
        Ok(())
    }

    /// Round 4: a complained-against dealer reveals the disputed share.
    pub fn submit_reveal(&mut self, reveal: Reveal) -> Result<()> {
        if self.phase != Phase::Revealing {
            return Err(OcpError::InvalidArgument("not in the reveal phase".into()));
        }
        self.transcript.reveals.push(reveal);
        Ok(())
    }

    /// Reveal-deadline expiry: resolve the transcript to `Finalized` or
    /// `Aborted`. Delegates to [`verify_transcript`] so a live participant
    /// and a later replaying watcher always agree.
    #[tracing::instrument(target = LOG_TARGET, skip(self), fields(epoch_id = self.transcript.epoch_id))]
    pub fn finalize(&mut self) -> Result<&FinalizedEpoch> {
        if self.phase != Phase::Revealing {
            return Err(OcpError::InvalidArgument("not in the reveal phase".into()));
        }
        match verify_transcript(&self.transcript) {
            Ok(finalized) => {
                self.phase = Phase::Finalized;
                self.finalized = Some(finalized);
                Ok(self.finalized.as_ref().unwrap())
            }
            Err(err @ OcpError::DkgAborted { .. }) => {
                self.phase = Phase::Aborted;
                Err(err)
            }
            Err(err) => Err(err),
        }
    }

    pub fn finalized(&self) -> Option<&FinalizedEpoch> {
        self.finalized.as_ref()
    }

    /// Evaluate a dealer's commitment polynomial at a member's index; used by
    /// a watcher resolving a complaint without access to private shares.
    pub fn feldman_check(&self, dealer: MemberId, member: MemberId, claimed_share: &Scalar) -> bool {
        match self.transcript.commitments.get(&dealer) {
            Some(commitments) => {
                Point::mul_base(claimed_share).eq(&evaluate_commitment_poly(commitments, &member.index()))
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dkg::types::ComplaintKind;
    use rand::rngs::StdRng;
    use rand::{RngCore, SeedableRng};

    fn sample_poly(rng: &mut impl RngCore, degree: usize) -> Vec<Scalar> {
        (0..=degree)
            .map(|_| {
                let mut bytes = [0u8; 64];
                rng.fill_bytes(&mut bytes);
                Scalar::from_uniform_bytes(&bytes)
            })
            .collect()
    }

    fn eval(coeffs: &[Scalar], x: &Scalar) -> Scalar {
        let mut acc = Scalar::ZERO;
        let mut power = Scalar::ONE;
        for c in coeffs {
            acc = acc.add(&c.mul(&power));
            power = power.mul(x);
        }
        acc
    }

    #[test]
    fn happy_path_3_of_5() {
        let mut rng = StdRng::seed_from_u64(1);
        let committee: Vec<MemberId> = (1..=5).map(MemberId).collect();
        let threshold = 3;
        let mut epoch = Epoch::new(1, committee.clone(), threshold).unwrap();

        let mut dealer_polys = BTreeMap::new();
        for dealer in &committee {
            let poly = sample_poly(&mut rng, threshold - 1);
            let commitments: DealerCommitments = poly.iter().map(Point::mul_base).collect();
            epoch.submit_commitment(*dealer, commitments).unwrap();
            dealer_polys.insert(*dealer, poly);
        }
        epoch.close_commit_phase().unwrap();
        epoch.close_complaint_phase().unwrap();
        let finalized = epoch.finalize().unwrap().clone();

        assert_eq!(finalized.qual, committee);

        let expected_pk = dealer_polys
            .values()
            .fold(Point::identity(), |acc, poly| acc.add(&Point::mul_base(&poly[0])));
        assert!(finalized.epoch_public_key.eq(&expected_pk));

        // Reconstruct the epoch secret from any 3 aggregate shares.
        let mut shares = Vec::new();
        for member in committee.iter().take(3) {
            let mut received = BTreeMap::new();
            for (dealer, poly) in &dealer_polys {
                received.insert(*dealer, eval(poly, &member.index()));
            }
            let agg = aggregate_secret_share(&finalized.qual, &received).unwrap();
            shares.push((member.index(), agg));
        }
        let reconstructed = crate::lagrange::reconstruct_scalar(&shares).unwrap();
        assert!(Point::mul_base(&reconstructed).eq(&finalized.epoch_public_key));
    }

    #[test]
    fn one_equivocator_still_finalizes() {
        let mut rng = StdRng::seed_from_u64(2);
        let committee: Vec<MemberId> = (1..=5).map(MemberId).collect();
        let threshold = 3;
        let mut epoch = Epoch::new(2, committee.clone(), threshold).unwrap();

        let mut dealer_polys = BTreeMap::new();
        for dealer in &committee {
            let poly = sample_poly(&mut rng, threshold - 1);
            let commitments: DealerCommitments = poly.iter().map(Point::mul_base).collect();
            epoch.submit_commitment(*dealer, commitments).unwrap();
            dealer_polys.insert(*dealer, poly);
        }
        epoch.close_commit_phase().unwrap();

        // Dealer 2 sends member 3 a bogus share; member 3 complains.
        epoch
            .submit_complaint(Complaint {
                complainer: MemberId(3),
                dealer: MemberId(2),
                kind: ComplaintKind::Missing,
            })
            .unwrap();
        epoch.close_complaint_phase().unwrap();

        // Dealer 2 reveals a share that does not match its own commitments.
        epoch
            .submit_reveal(Reveal {
                dealer: MemberId(2),
                member: MemberId(3),
                share: Scalar::from_u64(0xdead_beef),
            })
            .unwrap();

        let finalized = epoch.finalize().unwrap().clone();
        assert_eq!(
            finalized.qual,
            vec![MemberId(1), MemberId(3), MemberId(4), MemberId(5)]
        );
    }

    #[test]
    fn quorum_collapse_aborts() {
        let committee: Vec<MemberId> = (1..=3).map(MemberId).collect();
        let mut epoch = Epoch::new(3, committee, 3).unwrap();
        epoch
            .submit_commitment(MemberId(1), vec![Point::base(); 3])
            .unwrap();
        epoch.close_commit_phase().unwrap();
        epoch.close_complaint_phase().unwrap();
        let err = epoch.finalize().unwrap_err();
        assert!(matches!(err, OcpError::DkgAborted { .. }));
        assert_eq!(epoch.phase(), Phase::Aborted);
    }

    #[test]
    fn replaying_transcript_matches_live_result() {
        let mut rng = StdRng::seed_from_u64(4);
        let committee: Vec<MemberId> = (1..=5).map(MemberId).collect();
        let threshold = 3;
        let mut epoch = Epoch::new(4, committee.clone(), threshold).unwrap();
        for dealer in &committee {
            let poly = sample_poly(&mut rng, threshold - 1);
            let commitments: DealerCommitments = poly.iter().map(Point::mul_base).collect();
            epoch.submit_commitment(*dealer, commitments).unwrap();
        }
        epoch.close_commit_phase().unwrap();
        epoch.close_complaint_phase().unwrap();
        let live = epoch.finalize().unwrap().clone();

        let replayed = verify_transcript(epoch.transcript()).unwrap();
        assert_eq!(live, replayed);
    }
}
