//! Symmetric session keys.

use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::{entropy::Entropy, error::CryptoError};

/// Session key length in bytes (AES-256).
pub const SESSION_KEY_LEN: usize = 32;

/// A 256-bit symmetric session key.
///
/// The length is fixed by the type, so a `SessionKey` is always usable with
/// the envelope cipher. Key material is zeroized on drop and never printed.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SessionKey {
    bytes: [u8; SESSION_KEY_LEN],
}

impl SessionKey {
    /// Generate a fresh key from `entropy`.
    pub fn generate(entropy: &impl Entropy) -> Result<Self, CryptoError> {
        let mut bytes = Zeroizing::new([0u8; SESSION_KEY_LEN]);
        entropy.fill(bytes.as_mut_slice())?;
        Ok(Self { bytes: *bytes })
    }

    /// Wrap existing key material.
    pub fn from_bytes(bytes: [u8; SESSION_KEY_LEN]) -> Self {
        Self { bytes }
    }

    /// Copy key material out of a slice.
    ///
    /// # Errors
    ///
    /// - `KeyFormat`: if `bytes` is not exactly [`SESSION_KEY_LEN`] long
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        let bytes: [u8; SESSION_KEY_LEN] = bytes.try_into().map_err(|_| {
            CryptoError::key_format(format!(
                "session key must be {SESSION_KEY_LEN} bytes, got {}",
                bytes.len()
            ))
        })?;
        Ok(Self { bytes })
    }

    /// Raw key material.
    pub fn as_bytes(&self) -> &[u8; SESSION_KEY_LEN] {
        &self.bytes
    }
}

impl fmt::Debug for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionKey(<redacted>)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entropy::OsEntropy;

    #[test]
    fn generated_key_is_32_bytes() {
        let key = SessionKey::generate(&OsEntropy).unwrap();
        assert_eq!(key.as_bytes().len(), 32);
    }

    #[test]
    fn generated_keys_differ() {
        let key1 = SessionKey::generate(&OsEntropy).unwrap();
        let key2 = SessionKey::generate(&OsEntropy).unwrap();
        assert_ne!(key1, key2);
    }

    #[test]
    fn generate_propagates_entropy_failure() {
        struct Broken;

        impl Entropy for Broken {
            fn fill(&self, buffer: &mut [u8]) -> Result<(), CryptoError> {
                buffer[0] = 0xAA;
                Err(CryptoError::RandomSource { reason: "unavailable".to_string() })
            }
        }

        let result = SessionKey::generate(&Broken);
        assert!(matches!(result, Err(CryptoError::RandomSource { .. })));
    }

    #[test]
    fn from_slice_rejects_wrong_length() {
        for len in [0, 16, 31, 33, 64] {
            let result = SessionKey::from_slice(&vec![0u8; len]);
            assert!(
                matches!(result, Err(CryptoError::KeyFormat { .. })),
                "length {len} must be rejected"
            );
        }
    }

    #[test]
    fn from_slice_accepts_exact_length() {
        let key = SessionKey::from_slice(&[7u8; 32]).unwrap();
        assert_eq!(key.as_bytes(), &[7u8; 32]);
    }

    #[test]
    fn debug_output_is_redacted() {
        let key = SessionKey::from_bytes([0xAB; 32]);
        let printed = format!("{key:?}");
        assert!(!printed.contains("ab") && !printed.contains("171"));
        assert_eq!(printed, "SessionKey(<redacted>)");
    }
}
