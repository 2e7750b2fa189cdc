//! Message sealing using AES-256-GCM.
//!
//! Wire format of a sealed message:
//!
//! ```text
//! [0..12)      nonce (random, fresh per seal)
//! [12..N-16)   ciphertext
//! [N-16..N)    GCM authentication tag (appended by the mode)
//! ```
//!
//! No associated data is bound. Nonces are drawn at random for every call;
//! with 96-bit nonces the birthday bound keeps collisions negligible well
//! past 2^32 messages per key.

use aes_gcm::{
    Aes256Gcm, Nonce,
    aead::{Aead, KeyInit},
};

use crate::{entropy::Entropy, error::CryptoError, key::SessionKey};

/// AES-GCM nonce size (12 bytes)
pub const NONCE_LEN: usize = 12;

/// GCM tag size (16 bytes)
pub const TAG_LEN: usize = 16;

/// A sealed message: nonce plus ciphertext with the tag appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedMessage {
    /// The 12-byte GCM nonce
    pub nonce: [u8; NONCE_LEN],
    /// The ciphertext including the 16-byte GCM tag
    pub ciphertext: Vec<u8>,
}

impl SealedMessage {
    /// Split wire bytes into nonce and ciphertext.
    ///
    /// Only the nonce prefix is checked here. A body too short to hold a tag
    /// is rejected by [`open`] as an authentication failure.
    ///
    /// # Errors
    ///
    /// - `MalformedEnvelope`: fewer than [`NONCE_LEN`] bytes
    pub fn parse(bytes: &[u8]) -> Result<Self, CryptoError> {
        let Some((nonce, ciphertext)) = bytes.split_first_chunk::<NONCE_LEN>() else {
            return Err(CryptoError::MalformedEnvelope { len: bytes.len(), min: NONCE_LEN });
        };

        Ok(Self { nonce: *nonce, ciphertext: ciphertext.to_vec() })
    }

    /// Serialize as `nonce || ciphertext`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(NONCE_LEN + self.ciphertext.len());
        out.extend_from_slice(&self.nonce);
        out.extend_from_slice(&self.ciphertext);
        out
    }

    /// Plaintext length (ciphertext length minus authentication tag).
    pub fn plaintext_len(&self) -> usize {
        self.ciphertext.len().saturating_sub(TAG_LEN)
    }
}

/// Seal `plaintext` under `key` with a fresh random nonce.
///
/// # Errors
///
/// - `RandomSource`: no nonce could be drawn
/// - `CipherInit`: the cipher rejected the input (plaintext beyond the GCM
///   length limit)
pub fn seal(
    plaintext: &[u8],
    key: &SessionKey,
    entropy: &impl Entropy,
) -> Result<SealedMessage, CryptoError> {
    let mut nonce = [0u8; NONCE_LEN];
    entropy.fill(&mut nonce)?;

    let cipher = Aes256Gcm::new(key.as_bytes().into());
    let ciphertext = cipher.encrypt(Nonce::from_slice(&nonce), plaintext).map_err(|_| {
        CryptoError::CipherInit { reason: "AES-256-GCM refused the plaintext".to_string() }
    })?;

    Ok(SealedMessage { nonce, ciphertext })
}

/// Open a sealed message.
///
/// Returns the plaintext only if the tag verifies; nothing is released
/// otherwise.
///
/// # Errors
///
/// - `AuthenticationFailed`: wrong key, tampering, or truncated tag
pub fn open(sealed: &SealedMessage, key: &SessionKey) -> Result<Vec<u8>, CryptoError> {
    let cipher = Aes256Gcm::new(key.as_bytes().into());

    cipher
        .decrypt(Nonce::from_slice(&sealed.nonce), sealed.ciphertext.as_slice())
        .map_err(|_| CryptoError::AuthenticationFailed)
}

/// Parse wire bytes and open them.
pub fn open_bytes(sealed: &[u8], key: &SessionKey) -> Result<Vec<u8>, CryptoError> {
    open(&SealedMessage::parse(sealed)?, key)
}
