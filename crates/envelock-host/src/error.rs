//! Host-level errors.

use envelock_crypto::CryptoError;
use thiserror::Error;

/// Errors surfaced to the host from the text-encoded operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    /// A key-wrap or envelope operation failed
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    /// The envelope authenticated but its plaintext is not UTF-8
    #[error("opened message is not valid UTF-8")]
    InvalidUtf8,

    /// A host binding asked for an operation that does not exist
    #[error("unknown operation: {name}")]
    UnknownOperation {
        /// Name the host asked for
        name: String,
    },

    /// A host binding passed the wrong number of arguments
    #[error("{operation} takes {expected} arguments, got {actual}")]
    WrongArity {
        /// Operation name
        operation: &'static str,
        /// Arguments the operation takes
        expected: usize,
        /// Arguments supplied
        actual: usize,
    },
}

impl HostError {
    /// Returns true if this error indicates a broken environment.
    ///
    /// See [`CryptoError::is_fatal`].
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::Crypto(err) => err.is_fatal(),
            Self::InvalidUtf8 | Self::UnknownOperation { .. } | Self::WrongArity { .. } => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crypto_errors_display_transparently() {
        let err = HostError::from(CryptoError::AuthenticationFailed);
        assert_eq!(err.to_string(), "authentication failed");
    }

    #[test]
    fn fatality_follows_crypto_error() {
        let fatal = HostError::from(CryptoError::RandomSource { reason: "gone".to_string() });
        assert!(fatal.is_fatal());
        assert!(!HostError::InvalidUtf8.is_fatal());
    }
}
