//! Host configuration.

use envelock_crypto::WrapPolicy;

/// Configuration for a [`Host`](crate::Host).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HostConfig {
    /// Which recipient public keys are accepted for wrapping
    pub wrap: WrapPolicy,
}

impl HostConfig {
    /// Override the minimum accepted RSA modulus size.
    #[must_use]
    pub fn with_min_modulus_bits(mut self, bits: usize) -> Self {
        self.wrap.min_modulus_bits = bits;
        self
    }
}

#[cfg(test)]
mod tests {
    use envelock_crypto::DEFAULT_MIN_MODULUS_BITS;

    use super::*;

    #[test]
    fn default_requires_2048_bit_keys() {
        assert_eq!(HostConfig::default().wrap.min_modulus_bits, DEFAULT_MIN_MODULUS_BITS);
        assert_eq!(DEFAULT_MIN_MODULUS_BITS, 2048);
    }

    #[test]
    fn min_modulus_override() {
        let config = HostConfig::default().with_min_modulus_bits(4096);
        assert_eq!(config.wrap.min_modulus_bits, 4096);
    }
}
