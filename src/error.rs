use thiserror::Error;

/// Location of a failed check inside a shuffle proof, for caller-visible
/// attribution (a monitoring layer can map this straight to a slashing event).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ShuffleLocation {
    Pair { round: u16, left: u16, right: u16 },
    Single { round: u16, index: u16 },
    Header,
    DeckSnapshot { round: u16 },
}

impl std::fmt::Display for ShuffleLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShuffleLocation::Pair { round, left, right } => {
                write!(f, "round={round} pair=({left},{right})")
            }
            ShuffleLocation::Single { round, index } => {
                write!(f, "round={round} single={index}")
            }
            ShuffleLocation::Header => write!(f, "header"),
            ShuffleLocation::DeckSnapshot { round } => write!(f, "round={round} deck-snapshot"),
        }
    }
}

/// Crate-wide error type. Every primitive reports one of these variants to
/// its caller; nothing is swallowed internally.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OcpError {
    /// Byte length wrong, non-canonical scalar/point, or a truncated/trailing proof.
    #[error("invalid encoding: {0}")]
    InvalidEncoding(String),

    /// `w=0` where a non-zero nonce is required, `ScalarInv(0)`, a malformed
    /// Lagrange index set, or a deck smaller than 2 in the shuffle.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A proof parsed correctly but a transcript-derived equation did not hold.
    #[error("verification failed: {0}")]
    VerificationFailed(String),

    /// A shuffle-specific verification failure carrying a structured location.
    #[error("invalid {kind} proof at {location}")]
    ShuffleVerificationFailed {
        kind: &'static str,
        location: ShuffleLocation,
    },

    /// `|QUAL| < t` after DKG resolution.
    #[error("DKG aborted: quorum collapsed ({qual_size} of {threshold} required)")]
    DkgAborted { qual_size: usize, threshold: usize },

    /// A transcript or hash-to-scalar message was null (null is not empty).
    #[error("null message passed to transcript/hash-to-scalar")]
    NullMessage,
}

pub type Result<T> = std::result::Result<T, OcpError>;
