//! Randomness source abstraction.
//!
//! Key generation, nonces and OAEP padding all draw from an [`Entropy`]
//! implementation. Production code uses [`OsEntropy`]; tests can supply fixed
//! bytes to make outputs reproducible or a failing source to exercise error
//! paths.

use rand_chacha::{ChaCha20Rng, rand_core::SeedableRng};
use zeroize::Zeroizing;

use crate::error::CryptoError;

/// Source of cryptographically secure random bytes.
///
/// # Invariants
///
/// - Production implementations MUST use a cryptographically secure source
/// - A failure MUST be reported as an error, never as a partially filled or
///   zeroed buffer
pub trait Entropy: Send + Sync {
    /// Fills `buffer` entirely with random bytes.
    fn fill(&self, buffer: &mut [u8]) -> Result<(), CryptoError>;
}

impl<E: Entropy + ?Sized> Entropy for &E {
    fn fill(&self, buffer: &mut [u8]) -> Result<(), CryptoError> {
        (**self).fill(buffer)
    }
}

/// Operating system RNG (getrandom).
///
/// Reads `/dev/urandom`, `getrandom(2)`, `BCryptGenRandom` or the platform
/// equivalent. Failures are surfaced as [`CryptoError::RandomSource`].
#[derive(Debug, Clone, Copy, Default)]
pub struct OsEntropy;

impl Entropy for OsEntropy {
    #[allow(clippy::disallowed_methods)]
    fn fill(&self, buffer: &mut [u8]) -> Result<(), CryptoError> {
        getrandom::fill(buffer)
            .map_err(|err| CryptoError::RandomSource { reason: err.to_string() })
    }
}

/// Build a CSPRNG for the RSA padding step, keyed from `entropy`.
///
/// The `rsa` crate wants an infallible `RngCore`. Drawing the seed up front
/// moves the only fallible read to a point where it can be reported.
pub(crate) fn seeded_rng(entropy: &impl Entropy) -> Result<ChaCha20Rng, CryptoError> {
    let mut seed = Zeroizing::new([0u8; 32]);
    entropy.fill(seed.as_mut_slice())?;
    Ok(ChaCha20Rng::from_seed(*seed))
}
