//! Active session key slot.
//!
//! A [`KeyManager`] owns one "active" session key. Generation or an explicit
//! [`KeyManager::set_active`] replaces it; reads clone it. The slot sits behind a mutex so concurrent generate and
//! read calls observe either the old or the new key, never a partial one.
//! The lock is only held to swap or clone, never across cryptographic work.

use std::sync::{Mutex, MutexGuard, PoisonError};

use envelock_crypto::{CryptoError, Entropy, SessionKey};

/// Generates session keys and holds the active one.
#[derive(Debug, Default)]
pub struct KeyManager<E> {
    entropy: E,
    active: Mutex<Option<SessionKey>>,
}

impl<E: Entropy> KeyManager<E> {
    /// Create an empty manager drawing randomness from `entropy`.
    pub fn new(entropy: E) -> Self {
        Self { entropy, active: Mutex::new(None) }
    }

    /// Entropy source shared with the envelope and wrap steps.
    pub fn entropy(&self) -> &E {
        &self.entropy
    }

    /// Generate a new session key and make it the active one.
    ///
    /// On failure the previous active key is left in place.
    pub fn generate(&self) -> Result<SessionKey, CryptoError> {
        let key = SessionKey::generate(&self.entropy)?;
        self.set_active(key.clone());
        Ok(key)
    }

    /// Make `key` the active one, replacing any previous key.
    ///
    /// Callers that must finish more work before a new key may become
    /// visible generate it with [`SessionKey::generate`] and commit it here
    /// once that work has succeeded.
    pub fn set_active(&self, key: SessionKey) {
        *self.slot() = Some(key);
    }

    /// The active session key.
    ///
    /// # Errors
    ///
    /// - `NoActiveKey`: [`generate`](Self::generate) has not succeeded yet
    pub fn active(&self) -> Result<SessionKey, CryptoError> {
        self.slot().clone().ok_or(CryptoError::NoActiveKey)
    }

    /// Whether a key has been generated.
    pub fn has_active(&self) -> bool {
        self.slot().is_some()
    }

    // The slot only ever holds a complete key, so a panic elsewhere while the
    // lock was held cannot leave it half written.
    fn slot(&self) -> MutexGuard<'_, Option<SessionKey>> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
