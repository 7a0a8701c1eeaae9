//! Byte-oriented Fiat-Shamir transcript and the stateless `HashToScalar`
//! helper (spec.md §4.2).
//!
//! Per the design notes (spec.md §9), the transcript stores its serialized
//! byte history rather than an incremental hash state — SHA-512 has no cheap
//! clone primitive for mid-stream forking, and storing bytes is
//! observationally equivalent given the framing rules below.

use crate::error::{OcpError, Result};
use crate::group::Scalar;
use sha2::{Digest, Sha512};

const LOG_TARGET: &str = "ocp_core::transcript";

const MSG_TAG: &[u8] = b"msg";
const CHALLENGE_TAG: &[u8] = b"challenge";

fn append_len_prefixed(buffer: &mut Vec<u8>, bytes: &[u8]) {
    buffer.extend_from_slice(&(bytes.len() as u32).to_le_bytes());
    buffer.extend_from_slice(bytes);
}

/// A monotonically growing, domain-separated transcript.
///
/// Owned by a single caller for its whole lifetime; not `Sync` by
/// construction since nothing protects concurrent mutation, but independent
/// transcripts may be built and used in parallel without contention.
#[derive(Clone, Debug)]
pub struct Transcript {
    buffer: Vec<u8>,
}

impl Transcript {
    /// Seed a fresh transcript with the fixed protocol prefix and a
    /// length-prefixed domain separator.
    pub fn new(domain_sep: &str) -> Self {
        let mut buffer = Vec::with_capacity(128);
        buffer.extend_from_slice(crate::config::TRANSCRIPT_PREFIX);
        append_len_prefixed(&mut buffer, domain_sep.as_bytes());
        Transcript { buffer }
    }

    /// Append a labelled message. `bytes = None` represents a null message
    /// (distinct from an empty one) and is rejected.
    #[tracing::instrument(target = LOG_TARGET, skip(self, bytes))]
    pub fn append_message(&mut self, label: &str, bytes: Option<&[u8]>) -> Result<()> {
        let bytes = bytes.ok_or(OcpError::NullMessage)?;
        self.buffer.extend_from_slice(MSG_TAG);
        append_len_prefixed(&mut self.buffer, label.as_bytes());
        append_len_prefixed(&mut self.buffer, bytes);
        Ok(())
    }

    /// Convenience wrapper for the common case of a non-null message.
    pub fn append(&mut self, label: &str, bytes: &[u8]) {
        self.append_message(label, Some(bytes))
            .expect("non-null append_message cannot fail");
    }

    /// Fork a SHA-512 over the current buffer plus a framed challenge label,
    /// reducing the 64-byte digest uniformly into a scalar. The transcript's
    /// own buffer is left untouched, so sequential challenges are independent.
    #[tracing::instrument(target = LOG_TARGET, skip(self))]
    pub fn challenge_scalar(&self, label: &str) -> Scalar {
        let mut hasher = Sha512::new();
        hasher.update(&self.buffer);
        hasher.update(CHALLENGE_TAG);
        let mut label_framed = Vec::with_capacity(4 + label.len());
        append_len_prefixed(&mut label_framed, label.as_bytes());
        hasher.update(&label_framed);
        let digest: [u8; 64] = hasher.finalize().into();
        Scalar::from_uniform_bytes(&digest)
    }
}

/// Stateless helper: `HashToScalar(domain, msgs...)`.
///
/// Equals the scalar a fresh `Transcript::new(domain)` would produce after
/// appending each message with label `""` and calling
/// `challenge_scalar("")`, but is computed directly for efficiency.
pub fn hash_to_scalar(domain: &str, msgs: &[Option<&[u8]>]) -> Result<Scalar> {
    let mut hasher = Sha512::new();
    hasher.update(crate::config::HASH_TO_SCALAR_DOMAIN);
    let mut domain_framed = Vec::with_capacity(4 + domain.len());
    append_len_prefixed(&mut domain_framed, domain.as_bytes());
    hasher.update(&domain_framed);
    for msg in msgs {
        let msg = msg.ok_or(OcpError::NullMessage)?;
        let mut framed = Vec::with_capacity(4 + msg.len());
        append_len_prefixed(&mut framed, msg);
        hasher.update(&framed);
    }
    let digest: [u8; 64] = hasher.finalize().into();
    Ok(Scalar::from_uniform_bytes(&digest))
}
