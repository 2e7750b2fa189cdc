//! Base64 transport encoding.
//!
//! Standard alphabet with padding, matching what browsers produce with
//! `btoa` and what most key tooling emits for DER blobs.

use base64::{Engine as _, engine::general_purpose::STANDARD};

/// Encode bytes for transport.
pub fn encode(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Decode transport text into bytes.
pub fn decode(text: &str) -> Result<Vec<u8>, base64::DecodeError> {
    STANDARD.decode(text)
}
