//! Error types for key-wrap and envelope operations

use thiserror::Error;

/// Errors from session key, wrap and envelope operations.
///
/// Every variant aborts only the operation that produced it. None are
/// retried internally.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// The entropy source could not supply random bytes
    #[error("random source failure: {reason}")]
    RandomSource {
        /// Description of the underlying failure
        reason: String,
    },

    /// No session key has been generated yet
    #[error("no active session key")]
    NoActiveKey,

    /// Key material or a key container could not be parsed
    #[error("invalid key format: {reason}")]
    KeyFormat {
        /// What was wrong with the key
        reason: String,
    },

    /// A well-formed public key belongs to an unsupported algorithm family
    #[error("key type mismatch: expected {expected}, got algorithm {actual}")]
    KeyTypeMismatch {
        /// Algorithm family that was expected
        expected: &'static str,
        /// Algorithm OID found in the key container
        actual: String,
    },

    /// Message is too long for OAEP under the recipient modulus
    #[error("plaintext too large for OAEP: {len} bytes, maximum {max}")]
    PlaintextTooLarge {
        /// Length of the message that was offered
        len: usize,
        /// Largest message the key and padding accept
        max: usize,
    },

    /// The cipher refused its inputs
    #[error("cipher initialisation failed: {reason}")]
    CipherInit {
        /// Reason reported by the cipher
        reason: String,
    },

    /// Tag mismatch, wrong key or corrupted ciphertext.
    ///
    /// Intentionally carries no detail about which of these occurred.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Sealed input is too short to contain a nonce
    #[error("malformed envelope: {len} bytes, need at least {min}")]
    MalformedEnvelope {
        /// Length of the input
        len: usize,
        /// Minimum acceptable length
        min: usize,
    },
}

impl CryptoError {
    /// Returns true if this error indicates a broken environment rather than
    /// bad input.
    ///
    /// Fatal errors will recur on every call. Everything else depends on the
    /// arguments and may succeed with different input.
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::RandomSource { .. } => true,

            Self::NoActiveKey
            | Self::KeyFormat { .. }
            | Self::KeyTypeMismatch { .. }
            | Self::PlaintextTooLarge { .. }
            | Self::CipherInit { .. }
            | Self::AuthenticationFailed
            | Self::MalformedEnvelope { .. } => false,
        }
    }

    pub(crate) fn key_format(reason: impl Into<String>) -> Self {
        Self::KeyFormat { reason: reason.into() }
    }
}
