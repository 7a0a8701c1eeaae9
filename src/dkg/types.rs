//! Wire types for the Feldman DKG transcript (spec.md §4.6).

use crate::group::{Point, Scalar};
use serde::{Deserialize, Serialize};

/// A committee member, tagged with a non-zero scalar index used to evaluate
/// dealer polynomials. `id` doubles as the index (`index = id` as a scalar),
/// which keeps "sorted by member id" and "sorted by index" the same order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MemberId(pub u32);

impl MemberId {
    pub fn index(&self) -> Scalar {
        Scalar::from_u64(self.0 as u64)
    }
}

/// The kind of complaint a member can raise against a dealer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComplaintKind {
    /// "I received nothing from this dealer."
    Missing,
    /// "The share I received doesn't match the commitments", carrying the
    /// dealer-signed share bytes the complainer claims to have received.
    ///
    /// The authentication scheme behind these bytes is out of scope for this
    /// crate (spec.md §9 Open Question); they are treated as opaque input to
    /// the slash decision.
    Invalid { share_msg: Vec<u8> },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Complaint {
    pub complainer: MemberId,
    pub dealer: MemberId,
    pub kind: ComplaintKind,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reveal {
    pub dealer: MemberId,
    pub member: MemberId,
    pub share: Scalar,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlashReason {
    MissingCommit,
    MissingReveal,
    InvalidReveal,
    Equivocation,
}

/// State machine phases (spec.md §4.6).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Proposed,
    Committed,
    Complaining,
    Revealing,
    Finalized,
    Aborted,
}

/// The outcome of a finalized epoch: the public key and the QUAL set.
/// Per-member aggregate secret shares are *not* stored here — they are
/// private state each honest member derives locally from its own received
/// shares (see [`crate::dkg::aggregate_secret_share`]).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalizedEpoch {
    pub epoch_id: u64,
    pub qual: Vec<MemberId>,
    pub epoch_public_key: Point,
}

/// Feldman commitments published by one dealer: `C_k = a_k * G` for `k=0..t-1`.
pub type DealerCommitments = Vec<Point>;
