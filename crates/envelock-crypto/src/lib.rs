//! Envelock Cryptographic Primitives
//!
//! Building blocks for a hybrid key-wrap envelope: a random 256-bit session
//! key is wrapped under a recipient's RSA public key, then used to seal and
//! open messages with AES-256-GCM. Functions take their randomness from an
//! [`Entropy`] supplied by the caller, so tests can pin every random input.
//!
//! # Key Lifecycle
//!
//! ```text
//! Entropy ──► SessionKey (32 bytes)
//!                 │
//!                 ├──► RSA-OAEP-SHA256 ──► WrappedKey ──► recipient
//!                 │
//!                 ▼
//!            AES-256-GCM ──► nonce || ciphertext || tag
//! ```
//!
//! The session key never leaves this crate in the clear except through
//! [`SessionKey::as_bytes`]. It is zeroized on drop.
//!
//! # Security
//!
//! Wrapping:
//! - OAEP with SHA-256 for digest and MGF1, no label
//! - Fresh padding randomness on every call, so wraps are unlinkable
//! - Recipient keys must be RSA and meet a minimum modulus size
//!
//! Sealing:
//! - 96-bit random nonce per message, never reused by construction
//! - 128-bit tag; any modification of nonce, ciphertext or tag is rejected
//! - Failed opens return a single detail-free error and no plaintext
//!
//! Out of scope: associated-data binding, key persistence, rotation.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod entropy;
pub mod envelope;
pub mod error;
pub mod key;
pub mod wrap;

pub use entropy::{Entropy, OsEntropy};
pub use envelope::{NONCE_LEN, SealedMessage, TAG_LEN, open, open_bytes, seal};
pub use error::CryptoError;
pub use key::{SESSION_KEY_LEN, SessionKey};
pub use rsa::{RsaPrivateKey, RsaPublicKey};
pub use wrap::{
    DEFAULT_MIN_MODULUS_BITS, MAX_MODULUS_BITS, RecipientKey, WrapPolicy, WrappedKey,
    unwrap_session_key, wrap_key, wrap_session_key,
};
