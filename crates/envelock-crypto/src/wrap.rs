//! Session key wrapping with RSA-OAEP.
//!
//! The wrap step is the only place a session key crosses a trust boundary.
//! Keys are encrypted under the recipient's RSA public key with OAEP padding,
//! SHA-256 as both the digest and the MGF1 hash, and no label.
//!
//! OAEP is randomized: wrapping the same key twice under the same public key
//! produces different ciphertexts. Each call draws fresh randomness from the
//! supplied [`Entropy`].

use rsa::{
    BigUint, Oaep, RsaPrivateKey, RsaPublicKey,
    pkcs1::{ALGORITHM_OID as RSA_ENCRYPTION_OID, RsaPublicKey as Pkcs1PublicKey},
    pkcs8::{SubjectPublicKeyInfoRef, der::Decode},
    traits::PublicKeyParts,
};
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::{
    entropy::{Entropy, seeded_rng},
    error::CryptoError,
    key::SessionKey,
};

/// SHA-256 output size, the OAEP `hLen`.
const OAEP_HASH_LEN: usize = 32;

/// Fixed OAEP overhead: two hash-sized fields plus two marker bytes.
const OAEP_OVERHEAD: usize = 2 * OAEP_HASH_LEN + 2;

/// Default smallest accepted RSA modulus.
pub const DEFAULT_MIN_MODULUS_BITS: usize = 2048;

/// Largest RSA modulus [`RecipientKey::import`] accepts.
///
/// Bounds the cost of a single wrap for attacker-chosen keys.
pub const MAX_MODULUS_BITS: usize = 16384;

/// Acceptance rules for recipient public keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WrapPolicy {
    /// Smallest RSA modulus, in bits, that [`RecipientKey::import`] accepts
    pub min_modulus_bits: usize,
}

impl Default for WrapPolicy {
    fn default() -> Self {
        Self { min_modulus_bits: DEFAULT_MIN_MODULUS_BITS }
    }
}

/// An imported, RSA-validated recipient public key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipientKey {
    key: RsaPublicKey,
}

impl RecipientKey {
    /// Parse a DER-encoded SubjectPublicKeyInfo.
    ///
    /// # Errors
    ///
    /// - `KeyFormat`: not DER SPKI, an unparseable RSA key, or a modulus
    ///   below `policy.min_modulus_bits` or above [`MAX_MODULUS_BITS`]
    /// - `KeyTypeMismatch`: well-formed SPKI for a non-RSA algorithm
    pub fn import(der: &[u8], policy: &WrapPolicy) -> Result<Self, CryptoError> {
        let spki = SubjectPublicKeyInfoRef::from_der(der).map_err(|err| {
            CryptoError::key_format(format!("not a DER SubjectPublicKeyInfo: {err}"))
        })?;

        let oid = spki.algorithm.oid;
        if oid != RSA_ENCRYPTION_OID {
            return Err(CryptoError::KeyTypeMismatch { expected: "RSA", actual: oid.to_string() });
        }

        let pkcs1_der = spki.subject_public_key.as_bytes().ok_or_else(|| {
            CryptoError::key_format("RSA public key bit string is not byte aligned")
        })?;
        let pkcs1_key = Pkcs1PublicKey::from_der(pkcs1_der)
            .map_err(|err| CryptoError::key_format(format!("invalid RSA public key: {err}")))?;

        let n = BigUint::from_bytes_be(pkcs1_key.modulus.as_bytes());
        let e = BigUint::from_bytes_be(pkcs1_key.public_exponent.as_bytes());

        let bits = n.bits();
        if bits < policy.min_modulus_bits {
            return Err(CryptoError::key_format(format!(
                "RSA modulus of {bits} bits is below the minimum of {}",
                policy.min_modulus_bits
            )));
        }
        if bits > MAX_MODULUS_BITS {
            return Err(CryptoError::key_format(format!(
                "RSA modulus of {bits} bits is above the maximum of {MAX_MODULUS_BITS}"
            )));
        }

        let key = RsaPublicKey::new_with_max_size(n, e, MAX_MODULUS_BITS)
            .map_err(|err| CryptoError::key_format(format!("invalid RSA public key: {err}")))?;

        Ok(Self { key })
    }

    /// Exact modulus size in bits.
    pub fn modulus_bits(&self) -> usize {
        self.key.n().bits()
    }

    /// Largest message that fits under OAEP-SHA256 with this modulus.
    pub fn max_wrap_len(&self) -> usize {
        self.key.size().saturating_sub(OAEP_OVERHEAD)
    }
}

impl From<RsaPublicKey> for RecipientKey {
    fn from(key: RsaPublicKey) -> Self {
        Self { key }
    }
}

/// RSA-OAEP ciphertext of a session key.
///
/// Always exactly as long as the recipient modulus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrappedKey {
    bytes: Vec<u8>,
}

impl WrappedKey {
    /// Ciphertext bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consume into ciphertext bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Encrypt `plaintext` under `recipient` with RSA-OAEP-SHA256.
///
/// # Errors
///
/// - `PlaintextTooLarge`: `plaintext` exceeds [`RecipientKey::max_wrap_len`]
/// - `RandomSource`: `entropy` failed
pub fn wrap_key(
    plaintext: &[u8],
    recipient: &RecipientKey,
    entropy: &impl Entropy,
) -> Result<WrappedKey, CryptoError> {
    let max = recipient.max_wrap_len();
    if plaintext.len() > max {
        return Err(CryptoError::PlaintextTooLarge { len: plaintext.len(), max });
    }

    let mut rng = seeded_rng(entropy)?;
    let bytes =
        recipient.key.encrypt(&mut rng, Oaep::new::<Sha256>(), plaintext).map_err(|err| {
            match err {
                rsa::Error::MessageTooLong => {
                    CryptoError::PlaintextTooLarge { len: plaintext.len(), max }
                },
                other => CryptoError::CipherInit { reason: other.to_string() },
            }
        })?;

    Ok(WrappedKey { bytes })
}

/// Wrap a session key for `recipient`.
pub fn wrap_session_key(
    key: &SessionKey,
    recipient: &RecipientKey,
    entropy: &impl Entropy,
) -> Result<WrappedKey, CryptoError> {
    wrap_key(key.as_bytes(), recipient, entropy)
}

/// Recover a session key with the recipient's private key.
///
/// OAEP decryption in `rsa` 0.9 is not constant time (RUSTSEC-2023-0071).
/// Do not expose this as an unwrap service to untrusted callers: response
/// timing can leak the private key.
///
/// # Errors
///
/// - `AuthenticationFailed`: OAEP decoding failed (wrong key, corruption)
/// - `KeyFormat`: decryption succeeded but the payload is not a session key
pub fn unwrap_session_key(
    wrapped: &[u8],
    private_key: &RsaPrivateKey,
) -> Result<SessionKey, CryptoError> {
    let plaintext = Zeroizing::new(
        private_key
            .decrypt(Oaep::new::<Sha256>(), wrapped)
            .map_err(|_| CryptoError::AuthenticationFailed)?,
    );

    SessionKey::from_slice(&plaintext)
}
