//! Command-line binding for the Envelock host operations.
//!
//! Each subcommand maps onto one host operation. Results are written one per
//! line so they can be piped between invocations:
//!
//! ```bash
//! envelock wrap-key --public-key-file recipient.pem --print-key
//! envelock seal --key "$KEY" "hello world"
//! envelock open --key "$KEY" "$ENVELOPE"
//! ```
//!
//! The active key lives only as long as the process, so `wrap-key` can print
//! it alongside the wrapped form for later `seal`/`open` calls.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

use std::{
    error::Error,
    io::{self, Read, Write},
    path::PathBuf,
};

use clap::{Args, Parser, Subcommand};
use envelock_host::{Host, HostConfig, bytes_to_base64};

/// Hybrid RSA-OAEP / AES-256-GCM envelope tool
#[derive(Parser, Debug)]
#[command(name = "envelock")]
#[command(about = "Wrap session keys and seal messages")]
#[command(version)]
pub struct Cli {
    /// Smallest accepted RSA modulus, in bits
    #[arg(long, global = true, default_value_t = HostConfig::default().wrap.min_modulus_bits)]
    pub min_modulus_bits: usize,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    /// Operation to run
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Host configuration derived from the global flags.
    pub fn host_config(&self) -> HostConfig {
        HostConfig::default().with_min_modulus_bits(self.min_modulus_bits)
    }
}

/// Subcommands, one per host operation.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate a session key and wrap it under a recipient public key
    WrapKey(WrapKeyArgs),

    /// Seal a UTF-8 message under a session key
    Seal {
        /// Session key (base64)
        #[arg(short, long)]
        key: String,

        /// Message to seal
        message: String,
    },

    /// Open a sealed envelope
    Open {
        /// Session key (base64)
        #[arg(short, long)]
        key: String,

        /// Sealed envelope (base64)
        envelope: String,
    },

    /// Base64-encode a file, or stdin when no path is given
    Encode {
        /// File to encode
        path: Option<PathBuf>,
    },

    /// Invoke a host operation by its registered name (e.g. `sealMessage`)
    Call {
        /// Operation name
        operation: String,

        /// Operation arguments, in order
        args: Vec<String>,
    },
}

/// Arguments for `wrap-key`.
#[derive(Args, Debug)]
pub struct WrapKeyArgs {
    /// Recipient public key: base64 DER SubjectPublicKeyInfo
    #[arg(long, required_unless_present = "public_key_file", conflicts_with = "public_key_file")]
    pub public_key: Option<String>,

    /// File holding the recipient public key, as PEM or bare base64
    #[arg(long)]
    pub public_key_file: Option<PathBuf>,

    /// Also print the generated session key (base64) on a second line
    #[arg(long)]
    pub print_key: bool,
}

/// Run one command against `host`, writing results to `out`.
pub fn run(
    command: &Command,
    host: &Host,
    input: &mut impl Read,
    out: &mut impl Write,
) -> Result<(), Box<dyn Error>> {
    match command {
        Command::WrapKey(args) => {
            let public_key = match (&args.public_key, &args.public_key_file) {
                (Some(text), _) => text.trim().to_string(),
                (None, Some(path)) => strip_pem_armor(&std::fs::read_to_string(path)?),
                (None, None) => return Err("a recipient public key is required".into()),
            };

            let wrapped = host.generate_and_wrap_key(&public_key)?;
            writeln!(out, "{wrapped}")?;

            if args.print_key {
                writeln!(out, "{}", host.get_active_key()?)?;
            }
        },
        Command::Seal { key, message } => {
            writeln!(out, "{}", host.seal_message(message, key.trim())?)?;
        },
        Command::Open { key, envelope } => {
            writeln!(out, "{}", host.open_message(envelope.trim(), key.trim())?)?;
        },
        Command::Encode { path } => {
            let bytes = match path {
                Some(path) => std::fs::read(path)?,
                None => {
                    let mut buffer = Vec::new();
                    input.read_to_end(&mut buffer)?;
                    buffer
                },
            };
            writeln!(out, "{}", bytes_to_base64(&bytes))?;
        },
        Command::Call { operation, args } => {
            let args: Vec<&str> = args.iter().map(String::as_str).collect();
            writeln!(out, "{}", host.call_by_name(operation, &args)?)?;
        },
    }

    Ok(())
}

/// Reduce PEM or bare base64 text to a single base64 line.
///
/// PEM `PUBLIC KEY` blocks are base64 DER SubjectPublicKeyInfo between
/// armor lines, so dropping the armor and joining the body is enough.
pub fn strip_pem_armor(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with("-----"))
        .collect()
}

/// Convenience used by `main`: run against the process stdio.
pub fn run_stdio(cli: &Cli) -> Result<(), Box<dyn Error>> {
    let host = Host::new(cli.host_config());
    let stdout = io::stdout();
    let mut out = stdout.lock();
    run(&cli.command, &host, &mut io::stdin().lock(), &mut out)?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn strip_pem_armor_joins_body() {
        let pem = "-----BEGIN PUBLIC KEY-----\nQUJD\nREVG\n-----END PUBLIC KEY-----\n";
        assert_eq!(strip_pem_armor(pem), "QUJDREVG");
    }

    #[test]
    fn strip_pem_armor_passes_bare_base64() {
        assert_eq!(strip_pem_armor("  QUJDREVG \n"), "QUJDREVG");
    }

    #[test]
    fn wrap_key_requires_a_recipient() {
        let result = Cli::try_parse_from(["envelock", "wrap-key"]);
        assert!(result.is_err());
    }

    #[test]
    fn global_flags_reach_config() {
        let cli =
            Cli::try_parse_from(["envelock", "--min-modulus-bits", "4096", "encode"]).unwrap();
        assert_eq!(cli.host_config().wrap.min_modulus_bits, 4096);
    }
}
