//! Cross-checks session key wrapping against the `rsa` crate directly.
//!
//! A wrapped key must be recoverable by a plain OAEP-SHA256 decrypt with the
//! matching private key, independent of this crate's own unwrap helper.

use std::sync::OnceLock;

use envelock_crypto::{
    CryptoError, OsEntropy, RecipientKey, RsaPrivateKey, SessionKey, WrapPolicy,
    unwrap_session_key, wrap_key, wrap_session_key,
};
use proptest::prelude::*;
use rand_chacha::{ChaCha20Rng, rand_core::SeedableRng};
use rsa::{Oaep, pkcs8::EncodePublicKey};
use sha2::Sha256;

fn private_key() -> &'static RsaPrivateKey {
    static KEY: OnceLock<RsaPrivateKey> = OnceLock::new();
    KEY.get_or_init(|| {
        let mut rng = ChaCha20Rng::seed_from_u64(2048);
        RsaPrivateKey::new(&mut rng, 2048).unwrap()
    })
}

fn imported_recipient() -> RecipientKey {
    let der = private_key().to_public_key().to_public_key_der().unwrap();
    RecipientKey::import(der.as_bytes(), &WrapPolicy::default()).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn prop_reference_decrypt_recovers_key(key_bytes in any::<[u8; 32]>()) {
        let key = SessionKey::from_bytes(key_bytes);
        let wrapped = wrap_session_key(&key, &imported_recipient(), &OsEntropy).unwrap();

        let recovered = private_key().decrypt(Oaep::new::<Sha256>(), wrapped.as_bytes()).unwrap();

        prop_assert_eq!(recovered.as_slice(), key_bytes.as_slice());
    }

    #[test]
    fn prop_wrap_accepts_any_length_up_to_max(len in 0usize..=190) {
        let message = vec![0x5Au8; len];
        let wrapped = wrap_key(&message, &imported_recipient(), &OsEntropy).unwrap();

        let recovered = private_key().decrypt(Oaep::new::<Sha256>(), wrapped.as_bytes()).unwrap();

        prop_assert_eq!(recovered, message);
    }
}

#[test]
fn unwrap_accepts_reference_encryption() {
    let key_bytes = [0x42u8; 32];
    let mut rng = ChaCha20Rng::seed_from_u64(7);
    let wrapped = private_key()
        .to_public_key()
        .encrypt(&mut rng, Oaep::new::<Sha256>(), &key_bytes)
        .unwrap();

    let recovered = unwrap_session_key(&wrapped, private_key()).unwrap();

    assert_eq!(recovered.as_bytes(), &key_bytes);
}

#[test]
fn labelled_oaep_is_not_accepted() {
    let key_bytes = [0x42u8; 32];
    let mut rng = ChaCha20Rng::seed_from_u64(9);
    let labelled = private_key()
        .to_public_key()
        .encrypt(&mut rng, Oaep::new_with_label::<Sha256, _>("context"), &key_bytes)
        .unwrap();

    assert_eq!(
        unwrap_session_key(&labelled, private_key()),
        Err(CryptoError::AuthenticationFailed)
    );
}
