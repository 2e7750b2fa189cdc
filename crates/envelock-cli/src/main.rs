//! Envelock command-line tool.
//!
//! # Usage
//!
//! ```bash
//! # Wrap a fresh session key for a recipient, printing the key too
//! envelock wrap-key --public-key-file recipient.pem --print-key
//!
//! # Seal and open with the printed key
//! envelock seal --key "$KEY" "hello world"
//! envelock open --key "$KEY" "$ENVELOPE"
//! ```

use clap::Parser;
use envelock_cli::{Cli, run_stdio};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    tracing::debug!(min_modulus_bits = cli.min_modulus_bits, "envelock starting");

    run_stdio(&cli)
}
