//! Verifiable re-encryption shuffle (spec.md §4.7): an odd-even
//! transposition sorting network over a re-encrypted deck, where every
//! round's conditional swaps are hidden behind a switch OR-proof and every
//! leftover single element carries its own re-encryption proof.

pub mod prover;
pub mod reencrypt_proof;
pub mod rng;
pub mod round_table;
pub mod switch_proof;
pub mod types;
pub mod verifier;

pub use prover::shuffle;
pub use types::{Deck, RoundProof, ShuffleProof};
pub use verifier::verify;
