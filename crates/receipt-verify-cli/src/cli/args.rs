use clap::{Parser, Subcommand};

use super::commands::fingerprint::FingerprintArgs;
use super::commands::verify::VerifyArgs;

#[derive(Parser, Debug)]
#[command(
    name = "receipt-verify",
    version,
    about = "Verify RSA-signed purchase receipts against a trusted public key"
)]
pub struct Cli {
    /// Log verification diagnostics to stderr (overridden by RUST_LOG)
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Verify a signed receipt
    Verify(VerifyArgs),

    /// Print the key id of the resolved public key
    Fingerprint(FingerprintArgs),
}
