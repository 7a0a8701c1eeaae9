//! Pure complaint/reveal resolution: the deterministic core that both the
//! live DKG engine and a non-participant transcript verifier replay
//! identically from public commits/complaints/reveals alone (spec.md §4.6).

use super::types::{Complaint, ComplaintKind, DealerCommitments, MemberId, Reveal, SlashReason};
use crate::group::{Point, Scalar};
use std::collections::{BTreeMap, BTreeSet};

const LOG_TARGET: &str = "ocp_core::dkg::complaint";

/// Evaluate a dealer's committed polynomial at `index` in the exponent:
/// `Sum_k index^k * C_k`, via Horner's method over group elements.
pub fn evaluate_commitment_poly(commitments: &DealerCommitments, index: &Scalar) -> Point {
    let mut acc = Point::identity();
    for coefficient_commitment in commitments.iter().rev() {
        acc = Point::mul_point(&acc, index).add(coefficient_commitment);
    }
    acc
}

/// Deterministically resolve the slash set for one epoch from its public
/// transcript: the set of dealers who either never committed, or who
/// (when complained against) failed to reveal a share consistent with their
/// own Feldman commitments, or who equivocated between a claimed-invalid
/// share and the one they later revealed.
///
/// `missing_committers` is every committee member absent from `commitments`
/// at commit-deadline expiry.
#[tracing::instrument(target = LOG_TARGET, skip(commitments, complaints, reveals))]
pub fn resolve_slashed(
    committee: &[MemberId],
    commitments: &BTreeMap<MemberId, DealerCommitments>,
    complaints: &[Complaint],
    reveals: &[Reveal],
) -> BTreeSet<MemberId> {
    let mut slashed: BTreeSet<MemberId> = BTreeSet::new();

    for member in committee {
        if !commitments.contains_key(member) {
            slashed.insert(*member);
        }
    }

    // Index reveals by (dealer, member) for O(1) lookup; a dealer may only
    // usefully reveal once per complained member.
    let reveal_index: BTreeMap<(MemberId, MemberId), &Reveal> = reveals
        .iter()
        .map(|r| ((r.dealer, r.member), r))
        .collect();

    for complaint in complaints {
        if slashed.contains(&complaint.dealer) {
            continue;
        }
        let Some(dealer_commitments) = commitments.get(&complaint.dealer) else {
            // already slashed above for missing commit
            continue;
        };

        match reveal_index.get(&(complaint.dealer, complaint.complainer)) {
            None => {
                tracing::debug!(target: LOG_TARGET, dealer = complaint.dealer.0, "no reveal before deadline, slashing");
                slashed.insert(complaint.dealer);
            }
            Some(reveal) => {
                let expected = evaluate_commitment_poly(dealer_commitments, &complaint.complainer.index());
                let claimed = Point::mul_base(&reveal.share);
                if !claimed.eq(&expected) {
                    tracing::debug!(target: LOG_TARGET, dealer = complaint.dealer.0, "revealed share inconsistent with commitments");
                    slashed.insert(complaint.dealer);
                    continue;
                }
                if let ComplaintKind::Invalid { share_msg } = &complaint.kind {
                    if share_msg.as_slice() != reveal.share.bytes().as_slice() {
                        tracing::debug!(target: LOG_TARGET, dealer = complaint.dealer.0, "equivocation: claimed share differs from revealed share");
                        slashed.insert(complaint.dealer);
                    }
                }
            }
        }
    }

    slashed
}

/// The reason a dealer ended up slashed, for diagnostics (not load-bearing
/// for consensus — `resolve_slashed` alone determines membership in QUAL).
pub fn slash_reason(
    dealer: MemberId,
    commitments: &BTreeMap<MemberId, DealerCommitments>,
    complaints: &[Complaint],
    reveals: &[Reveal],
) -> Option<SlashReason> {
    if !commitments.contains_key(&dealer) {
        return Some(SlashReason::MissingCommit);
    }
    let dealer_commitments = &commitments[&dealer];
    for complaint in complaints.iter().filter(|c| c.dealer == dealer) {
        match reveals
            .iter()
            .find(|r| r.dealer == dealer && r.member == complaint.complainer)
        {
            None => return Some(SlashReason::MissingReveal),
            Some(reveal) => {
                let expected = evaluate_commitment_poly(dealer_commitments, &complaint.complainer.index());
                if !Point::mul_base(&reveal.share).eq(&expected) {
                    return Some(SlashReason::InvalidReveal);
                }
                if let ComplaintKind::Invalid { share_msg } = &complaint.kind {
                    if share_msg.as_slice() != reveal.share.bytes().as_slice() {
                        return Some(SlashReason::Equivocation);
                    }
                }
            }
        }
    }
    None
}
