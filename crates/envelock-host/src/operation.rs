//! Names of host-callable operations.
//!
//! Host bindings (script runtimes, FFI shims, RPC routers) register entry
//! points under these names.

use std::{fmt, str::FromStr};

use crate::error::HostError;

/// A host-callable operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Generate a session key and wrap it for a recipient
    GenerateAndWrapKey,
    /// Read the active session key
    GetActiveKey,
    /// Seal a UTF-8 message under a session key
    SealMessage,
    /// Open a sealed message back to UTF-8
    OpenMessage,
    /// Encode raw bytes as base64
    BytesToBase64,
}

impl Operation {
    /// Every operation, in registration order.
    pub const ALL: [Self; 5] = [
        Self::GenerateAndWrapKey,
        Self::GetActiveKey,
        Self::SealMessage,
        Self::OpenMessage,
        Self::BytesToBase64,
    ];

    /// Host-visible name.
    pub fn name(self) -> &'static str {
        match self {
            Self::GenerateAndWrapKey => "generateAndWrapKey",
            Self::GetActiveKey => "getActiveKey",
            Self::SealMessage => "sealMessage",
            Self::OpenMessage => "openMessage",
            Self::BytesToBase64 => "bytesToBase64",
        }
    }

    /// Number of arguments the host passes.
    pub fn arity(self) -> usize {
        match self {
            Self::GetActiveKey => 0,
            Self::GenerateAndWrapKey | Self::BytesToBase64 => 1,
            Self::SealMessage | Self::OpenMessage => 2,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = HostError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|op| op.name() == name)
            .ok_or_else(|| HostError::UnknownOperation { name: name.to_string() })
    }
}
