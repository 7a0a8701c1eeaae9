//! Cryptographic core for a decentralized mental-poker protocol: ristretto255
//! group algebra, a Fiat-Shamir transcript, lifted ElGamal, a Chaum-Pedersen
//! equal-discrete-log proof, an encrypted-share proof of knowledge, a
//! Feldman threshold DKG, Lagrange reconstruction, and a verifiable
//! re-encryption shuffle.

pub mod chaum_pedersen;
pub mod config;
pub mod dkg;
pub mod elgamal;
pub mod enc_share;
pub mod error;
pub mod group;
pub mod lagrange;
pub mod shuffle;
pub mod transcript;

pub use error::{OcpError, Result, ShuffleLocation};
