//! Fuzz target for recipient public key import
//!
//! # Strategy
//!
//! - Arbitrary bytes fed to the DER SubjectPublicKeyInfo importer
//! - Arbitrary text fed to the host `generateAndWrapKey` entry point
//!
//! # Invariants
//!
//! - Import never panics and only reports key errors
//! - A rejected public key never produces an active session key

#![no_main]

use arbitrary::Arbitrary;
use envelock_crypto::{CryptoError, MAX_MODULUS_BITS, RecipientKey, WrapPolicy};
use envelock_host::{Host, HostConfig, HostError};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Clone, Arbitrary)]
struct ImportScenario {
    der: Vec<u8>,
    text: String,
    min_modulus_bits: u16,
}

fuzz_target!(|scenario: ImportScenario| {
    let policy = WrapPolicy { min_modulus_bits: scenario.min_modulus_bits as usize };

    match RecipientKey::import(&scenario.der, &policy) {
        Ok(recipient) => {
            assert!(recipient.modulus_bits() >= policy.min_modulus_bits);
            assert!(recipient.modulus_bits() <= MAX_MODULUS_BITS);
        },
        Err(CryptoError::KeyFormat { .. } | CryptoError::KeyTypeMismatch { .. }) => {},
        Err(other) => panic!("unexpected import error: {other}"),
    }

    let host = Host::new(HostConfig::default());
    match host.generate_and_wrap_key(&scenario.text) {
        Ok(_) => assert!(host.keys().has_active()),
        Err(HostError::Crypto(
            CryptoError::KeyFormat { .. } | CryptoError::KeyTypeMismatch { .. },
        )) => {
            assert!(!host.keys().has_active());
        },
        Err(other) => panic!("unexpected host error: {other}"),
    }
});
