//! Fixed cryptographic parameters shared across the crate: transcript domain
//! separators (normative per spec §6) and protocol-wide constants.

/// Number of distinct cards a deck encoding supports (standard 52-card deck).
pub const DECK_SIZE: usize = 52;

/// Default number of shuffle rounds when the caller doesn't override it.
/// Spec §4.7 mandates `rounds >= 1`; the default mirrors `n` so a full deck
/// gets enough mixing rounds to hide the permutation.
pub fn default_shuffle_rounds(deck_size: usize) -> usize {
    deck_size.max(1)
}

/// Transcript seed prefix, prepended before the domain separator.
pub const TRANSCRIPT_PREFIX: &[u8] = b"OCPv1|transcript|";

/// Domain for the stateless `HashToScalar` helper.
pub const HASH_TO_SCALAR_DOMAIN: &[u8] = b"OCPv1|hash_to_scalar|";

/// Chaum-Pedersen EqDL proof domain.
pub const DOMAIN_CHAUM_PEDERSEN_EQDL: &str = "ocp/v1/chaum-pedersen-eqdl";

/// Encrypted-share proof domain (dealer -> member share delivery PoK).
pub const DOMAIN_DEALER_ENCSHARE: &str = "ocp/v1/dealer/encshare";

/// Shuffle single re-encryption EqDL domain.
pub const DOMAIN_SHUFFLE_REENC_EQDLOG: &str = "ocp/v1/shuffle/reenc-eqdlog";

/// Shuffle switch OR-proof domain.
pub const DOMAIN_SHUFFLE_SWITCH_OR: &str = "ocp/v1/shuffle/switch-or";

/// Shuffle deterministic-RNG domain.
pub const DOMAIN_SHUFFLE_RNG: &str = "ocp/v1/shuffle/rng";

/// Shuffle proof wire format version.
pub const SHUFFLE_PROOF_VERSION: u8 = 1;
