//! Feldman-style threshold DKG (spec.md §4.6): commitments, complaint/reveal
//! resolution, slashing, and a transcript any watcher can replay to derive
//! the epoch public key and the QUAL set.

pub mod complaint;
pub mod state;
pub mod types;

pub use complaint::{evaluate_commitment_poly, resolve_slashed, slash_reason};
pub use state::{aggregate_secret_share, verify_transcript, Epoch, OnChainTranscript};
pub use types::{
    Complaint, ComplaintKind, DealerCommitments, FinalizedEpoch, MemberId, Phase, Reveal, SlashReason,
};
