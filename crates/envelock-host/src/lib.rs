//! Envelock host adapter.
//!
//! Text-in, text-out operations over [`envelock_crypto`], shaped for a host
//! runtime that can only pass strings: binary values cross the boundary as
//! standard base64, messages as UTF-8.
//!
//! # Operations
//!
//! | Operation            | Method                                |
//! |----------------------|---------------------------------------|
//! | `generateAndWrapKey` | [`Host::generate_and_wrap_key`]       |
//! | `getActiveKey`       | [`Host::get_active_key`]              |
//! | `sealMessage`        | [`Host::seal_message`]                |
//! | `openMessage`        | [`Host::open_message`]                |
//! | `bytesToBase64`      | [`bytes_to_base64`]                   |
//!
//! Bindings that register entry points by name dispatch through
//! [`Host::call_by_name`].
//!
//! Each [`Host`] owns its own active-key slot; there is no process-wide key.
//! Seal and open take the key explicitly, so any number of sessions can share
//! one host.
//!
//! Decoding failures are folded into the crypto error taxonomy: a bad key
//! argument is a `KeyFormat` error, a bad envelope is a `MalformedEnvelope`.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod codec;
mod config;
mod error;
mod key_manager;
mod operation;

pub use config::HostConfig;
use envelock_crypto::{
    CryptoError, Entropy, OsEntropy, RecipientKey, SealedMessage, SessionKey, WrappedKey,
};
pub use error::HostError;
pub use key_manager::KeyManager;
pub use operation::Operation;
use zeroize::Zeroizing;

/// Encode raw bytes as base64 (`bytesToBase64`).
pub fn bytes_to_base64(bytes: &[u8]) -> String {
    codec::encode(bytes)
}

/// Host-facing entry points with their own active-key slot.
#[derive(Debug)]
pub struct Host<E = OsEntropy> {
    config: HostConfig,
    keys: KeyManager<E>,
}

impl Host<OsEntropy> {
    /// Create a host drawing randomness from the OS RNG.
    pub fn new(config: HostConfig) -> Self {
        Self::with_entropy(config, OsEntropy)
    }
}

impl Default for Host<OsEntropy> {
    fn default() -> Self {
        Self::new(HostConfig::default())
    }
}

impl<E: Entropy> Host<E> {
    /// Create a host with a caller-supplied entropy source.
    pub fn with_entropy(config: HostConfig, entropy: E) -> Self {
        Self { config, keys: KeyManager::new(entropy) }
    }

    /// Active configuration.
    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    /// The active-key slot.
    pub fn keys(&self) -> &KeyManager<E> {
        &self.keys
    }

    /// Import `public_key_der`, generate a new active session key and wrap it.
    ///
    /// Returns the key itself alongside the wrapped form so byte-level
    /// callers can keep an explicit handle instead of reading the slot back.
    /// The new key only becomes active once it has been wrapped. Any failure
    /// (invalid public key, entropy, wrapping) leaves the previous active key
    /// in place.
    pub fn generate_and_wrap(
        &self,
        public_key_der: &[u8],
    ) -> Result<(SessionKey, WrappedKey), CryptoError> {
        let recipient = RecipientKey::import(public_key_der, &self.config.wrap)?;
        let key = SessionKey::generate(self.keys.entropy())?;
        let wrapped = envelock_crypto::wrap_session_key(&key, &recipient, self.keys.entropy())?;
        self.keys.set_active(key.clone());

        tracing::debug!(
            modulus_bits = recipient.modulus_bits(),
            wrapped_len = wrapped.as_bytes().len(),
            "generated and wrapped session key"
        );

        Ok((key, wrapped))
    }

    /// `generateAndWrapKey`: base64 DER SPKI in, base64 wrapped key out.
    pub fn generate_and_wrap_key(&self, public_key: &str) -> Result<String, HostError> {
        let _span = operation_span(Operation::GenerateAndWrapKey);

        let der = codec::decode(public_key).map_err(|err| {
            CryptoError::KeyFormat { reason: format!("public key is not valid base64: {err}") }
        });
        let result = der.and_then(|der| self.generate_and_wrap(&der));

        match result {
            Ok((_key, wrapped)) => Ok(codec::encode(wrapped.as_bytes())),
            Err(err) => Err(failed(err)),
        }
    }

    /// `getActiveKey`: base64 of the active session key.
    pub fn get_active_key(&self) -> Result<String, HostError> {
        let _span = operation_span(Operation::GetActiveKey);

        let key = self.keys.active().map_err(failed)?;
        Ok(codec::encode(key.as_bytes()))
    }

    /// `sealMessage`: UTF-8 plaintext and base64 key in, base64 envelope out.
    pub fn seal_message(&self, plaintext: &str, key: &str) -> Result<String, HostError> {
        let _span = operation_span(Operation::SealMessage);

        let key = decode_session_key(key).map_err(failed)?;
        let sealed =
            envelock_crypto::seal(plaintext.as_bytes(), &key, self.keys.entropy()).map_err(failed)?;

        tracing::trace!(plaintext_len = plaintext.len(), "sealed message");
        Ok(codec::encode(&sealed.to_bytes()))
    }

    /// `openMessage`: base64 envelope and base64 key in, UTF-8 plaintext out.
    pub fn open_message(&self, sealed: &str, key: &str) -> Result<String, HostError> {
        let _span = operation_span(Operation::OpenMessage);

        let key = decode_session_key(key).map_err(failed)?;
        let sealed = decode_envelope(sealed).map_err(failed)?;
        let plaintext = envelock_crypto::open(&sealed, &key).map_err(failed)?;

        tracing::trace!(plaintext_len = sealed.plaintext_len(), "opened message");
        String::from_utf8(plaintext).map_err(|_| HostError::InvalidUtf8)
    }

    /// Dispatch `op` with string arguments, as a host binding registers it.
    ///
    /// `bytesToBase64` encodes the UTF-8 bytes of its argument.
    ///
    /// # Errors
    ///
    /// - `WrongArity`: `args.len()` differs from [`Operation::arity`]
    /// - anything the dispatched operation returns
    pub fn call(&self, op: Operation, args: &[&str]) -> Result<String, HostError> {
        if args.len() != op.arity() {
            return Err(HostError::WrongArity {
                operation: op.name(),
                expected: op.arity(),
                actual: args.len(),
            });
        }

        match (op, args) {
            (Operation::GenerateAndWrapKey, [public_key]) => self.generate_and_wrap_key(public_key),
            (Operation::GetActiveKey, []) => self.get_active_key(),
            (Operation::SealMessage, [plaintext, key]) => self.seal_message(plaintext, key),
            (Operation::OpenMessage, [sealed, key]) => self.open_message(sealed, key),
            (Operation::BytesToBase64, [text]) => Ok(bytes_to_base64(text.as_bytes())),
            _ => Err(HostError::WrongArity {
                operation: op.name(),
                expected: op.arity(),
                actual: args.len(),
            }),
        }
    }

    /// Dispatch by host-visible name (`sealMessage`, ...).
    ///
    /// # Errors
    ///
    /// - `UnknownOperation`: `name` is not a registered operation
    /// - anything [`call`](Self::call) returns
    pub fn call_by_name(&self, name: &str, args: &[&str]) -> Result<String, HostError> {
        let op: Operation = name.parse()?;
        self.call(op, args)
    }
}

fn operation_span(op: Operation) -> tracing::span::EnteredSpan {
    tracing::debug_span!("envelock", op = %op).entered()
}

fn failed(err: CryptoError) -> HostError {
    if err.is_fatal() {
        tracing::error!(%err, "operation failed");
    } else {
        tracing::debug!(%err, "operation failed");
    }
    HostError::Crypto(err)
}

fn decode_session_key(text: &str) -> Result<SessionKey, CryptoError> {
    let bytes = Zeroizing::new(codec::decode(text).map_err(|err| CryptoError::KeyFormat {
        reason: format!("session key is not valid base64: {err}"),
    })?);
    SessionKey::from_slice(&bytes)
}

fn decode_envelope(text: &str) -> Result<SealedMessage, CryptoError> {
    // Undecodable text has no byte length; report what it would decode to
    let bytes = codec::decode(text).map_err(|_| CryptoError::MalformedEnvelope {
        len: text.len() / 4 * 3,
        min: envelock_crypto::NONCE_LEN,
    })?;
    SealedMessage::parse(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_to_base64_encodes_whole_buffer() {
        assert_eq!(bytes_to_base64(&[0xDE, 0xAD, 0xBE, 0xEF]), "3q2+7w==");
    }

    #[test]
    fn get_active_key_before_generation() {
        let host = Host::default();
        assert_eq!(host.get_active_key(), Err(HostError::Crypto(CryptoError::NoActiveKey)));
    }

    #[test]
    fn seal_rejects_short_key() {
        let host = Host::default();
        let key = codec::encode(&[0u8; 16]);

        let result = host.seal_message("hi", &key);
        assert!(matches!(result, Err(HostError::Crypto(CryptoError::KeyFormat { .. }))));
    }

    #[test]
    fn seal_rejects_non_base64_key() {
        let host = Host::default();

        let result = host.seal_message("hi", "not base64!");
        assert!(matches!(result, Err(HostError::Crypto(CryptoError::KeyFormat { .. }))));
    }

    #[test]
    fn open_rejects_non_base64_envelope() {
        let host = Host::default();
        let key = codec::encode(&[1u8; 32]);

        let result = host.open_message("***", &key);
        assert!(matches!(result, Err(HostError::Crypto(CryptoError::MalformedEnvelope { .. }))));
    }

    #[test]
    fn undecodable_envelope_reports_its_size() {
        let host = Host::default();
        let key = codec::encode(&[1u8; 32]);
        let envelope = "!".repeat(400);

        let result = host.open_message(&envelope, &key);
        assert_eq!(
            result,
            Err(HostError::Crypto(CryptoError::MalformedEnvelope { len: 300, min: 12 }))
        );
    }

    #[test]
    fn call_dispatches_by_name() {
        let host = Host::default();
        let key = codec::encode(&[4u8; 32]);

        let envelope = host.call_by_name("sealMessage", &["by name", key.as_str()]).unwrap();
        let opened = host.call(Operation::OpenMessage, &[envelope.as_str(), key.as_str()]);
        assert_eq!(opened.unwrap(), "by name");
        assert_eq!(host.call_by_name("bytesToBase64", &["abc"]).unwrap(), "YWJj");
        assert_eq!(
            host.call_by_name("getActiveKey", &[]),
            Err(HostError::Crypto(CryptoError::NoActiveKey))
        );
    }

    #[test]
    fn call_rejects_unknown_name() {
        let host = Host::default();

        let result = host.call_by_name("rotateKey", &[]);
        assert_eq!(result, Err(HostError::UnknownOperation { name: "rotateKey".to_string() }));
    }

    #[test]
    fn call_checks_arity() {
        let host = Host::default();

        let result = host.call(Operation::SealMessage, &["only one"]);
        assert_eq!(
            result,
            Err(HostError::WrongArity { operation: "sealMessage", expected: 2, actual: 1 })
        );
    }

    #[test]
    fn open_rejects_short_envelope() {
        let host = Host::default();
        let key = codec::encode(&[1u8; 32]);
        let envelope = codec::encode(&[0u8; 11]);

        let result = host.open_message(&envelope, &key);
        assert_eq!(
            result,
            Err(HostError::Crypto(CryptoError::MalformedEnvelope { len: 11, min: 12 }))
        );
    }

    #[test]
    fn open_reports_non_utf8_plaintext() {
        let host = Host::default();
        let key = SessionKey::from_bytes([9u8; 32]);
        let sealed = envelock_crypto::seal(&[0xFF, 0xFE], &key, &OsEntropy).unwrap();

        let result =
            host.open_message(&codec::encode(&sealed.to_bytes()), &codec::encode(key.as_bytes()));
        assert_eq!(result, Err(HostError::InvalidUtf8));
    }

    #[test]
    fn generate_and_wrap_rejects_non_base64_public_key() {
        let host = Host::default();

        let result = host.generate_and_wrap_key("%%%");
        assert!(matches!(result, Err(HostError::Crypto(CryptoError::KeyFormat { .. }))));
        assert!(!host.keys().has_active());
    }
}
