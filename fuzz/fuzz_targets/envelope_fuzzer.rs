//! Fuzz target for sealing and opening envelopes
//!
//! # Strategy
//!
//! - Arbitrary session keys and messages
//! - Raw attacker-supplied envelope bytes of any length
//! - Single-byte tampering of valid envelopes
//!
//! # Invariants
//!
//! - Opening never panics, whatever the input
//! - Inputs shorter than the nonce are malformed, never authenticated
//! - Seal/open roundtrip succeeds
//! - Any modified envelope fails authentication
//! - Nonces come from the entropy source untouched

#![no_main]

use arbitrary::Arbitrary;
use envelock_crypto::{
    open, open_bytes, seal, CryptoError, Entropy, SealedMessage, SessionKey, NONCE_LEN,
};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Clone, Arbitrary)]
struct EnvelopeScenario {
    key: [u8; 32],
    operations: Vec<EnvelopeOperation>,
}

#[derive(Debug, Clone, Arbitrary)]
enum EnvelopeOperation {
    /// Seal with a fixed nonce byte, then open
    Seal { message: Vec<u8>, nonce_byte: u8 },
    /// Open attacker-controlled bytes
    OpenRaw { bytes: Vec<u8> },
    /// Seal, flip bits in one byte, open
    Tamper { message: Vec<u8>, index: u16, mask: u8 },
}

/// Deterministic entropy so crashes reproduce.
struct Fixed(u8);

impl Entropy for Fixed {
    fn fill(&self, buffer: &mut [u8]) -> Result<(), CryptoError> {
        buffer.fill(self.0);
        Ok(())
    }
}

fuzz_target!(|scenario: EnvelopeScenario| {
    let key = SessionKey::from_bytes(scenario.key);

    for op in scenario.operations {
        match op {
            EnvelopeOperation::Seal { message, nonce_byte } => {
                let sealed = seal(&message, &key, &Fixed(nonce_byte)).unwrap();

                // INVARIANT: nonce is exactly what the entropy source produced
                assert_eq!(sealed.nonce, [nonce_byte; NONCE_LEN]);

                // INVARIANT: roundtrip through wire bytes
                let opened = open_bytes(&sealed.to_bytes(), &key).unwrap();
                assert_eq!(opened, message);
            },

            EnvelopeOperation::OpenRaw { bytes } => {
                // INVARIANT: never panics; short input is malformed
                match open_bytes(&bytes, &key) {
                    Err(CryptoError::MalformedEnvelope { len, min }) => {
                        assert!(len < min);
                        assert_eq!(len, bytes.len());
                    },
                    Err(CryptoError::AuthenticationFailed) => {
                        assert!(bytes.len() >= NONCE_LEN);
                    },
                    Ok(_) => {
                        // Only possible if the input is a genuine envelope
                        assert!(SealedMessage::parse(&bytes).is_ok());
                    },
                    Err(other) => panic!("unexpected error from open: {other}"),
                }
            },

            EnvelopeOperation::Tamper { message, index, mask } => {
                if mask == 0 {
                    continue;
                }

                let sealed = seal(&message, &key, &Fixed(0x5A)).unwrap();
                let mut wire = sealed.to_bytes();
                let index = index as usize % wire.len();
                wire[index] ^= mask;

                // INVARIANT: any modification fails authentication
                let tampered = SealedMessage::parse(&wire).unwrap();
                assert_eq!(open(&tampered, &key), Err(CryptoError::AuthenticationFailed));
            },
        }
    }
});
