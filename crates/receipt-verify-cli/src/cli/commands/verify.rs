//! `receipt-verify verify` - Check a receipt signature.

use anyhow::{bail, Context, Result};
use clap::Args;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use receipt_verify_core::{PurchaseState, SignedReceipt, Verifier};

use crate::exit_codes;
use crate::key_source::{KeyArgs, PUBLIC_KEY_ENV_VAR};

#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Receipt JSON file with `originalJson` (or `signed_data`) and `signature`
    #[arg(
        required_unless_present = "data",
        conflicts_with_all = ["data", "signature"]
    )]
    pub receipt: Option<PathBuf>,

    /// File holding the exact signed payload
    #[arg(long, requires = "signature")]
    pub data: Option<PathBuf>,

    /// Base64 signature, or @FILE to read it from a file
    #[arg(long, requires = "data")]
    pub signature: Option<String>,

    #[command(flatten)]
    pub key: KeyArgs,

    /// Print the verdict as JSON
    #[arg(long)]
    pub json: bool,

    /// Quiet mode - only exit code, no output
    #[arg(long, short, conflicts_with = "json")]
    pub quiet: bool,
}

#[derive(Debug, Serialize)]
struct VerifyReport {
    trusted: bool,
    key_source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    key_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    order_id: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    products: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    purchase_state: Option<PurchaseState>,
}

pub fn run(args: VerifyArgs) -> Result<i32> {
    let receipt = load_receipt(&args)?;

    let (public_key, source) = args.key.resolve()?;
    if public_key.is_empty() {
        bail!(
            "no public key configured: pass --public-key or --public-key-file, or set {PUBLIC_KEY_ENV_VAR}"
        );
    }
    tracing::debug!(key_source = %source, "resolved public key");

    let verifier = Verifier::new(public_key);
    let Some(key_id) = verifier.key_id() else {
        bail!("public key from {source} is not an RSA SubjectPublicKeyInfo");
    };
    let trusted = verifier.verify_receipt(&receipt);

    let mut report = VerifyReport {
        trusted,
        key_source: source.to_string(),
        key_id: Some(key_id),
        order_id: None,
        products: Vec::new(),
        purchase_state: None,
    };
    // Payload fields are only reported for receipts we trust.
    if trusted {
        if let Ok(payload) = receipt.payload() {
            report.products = payload.products().into_iter().map(String::from).collect();
            report.order_id = payload.order_id;
            report.purchase_state = payload.purchase_state;
        }
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if !args.quiet {
        print_human(&report);
    }

    Ok(if trusted {
        exit_codes::SUCCESS
    } else {
        exit_codes::NOT_TRUSTED
    })
}

fn print_human(report: &VerifyReport) {
    if !report.trusted {
        println!("not trusted");
        return;
    }
    println!("trusted");
    println!();
    if let Some(key_id) = &report.key_id {
        println!("  key_id:   {key_id}");
    }
    if let Some(order_id) = &report.order_id {
        println!("  order_id: {order_id}");
    }
    if !report.products.is_empty() {
        println!("  products: {}", report.products.join(", "));
    }
}

fn load_receipt(args: &VerifyArgs) -> Result<SignedReceipt> {
    if let Some(path) = &args.receipt {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read receipt file: {}", path.display()))?;
        return serde_json::from_str(&content)
            .with_context(|| format!("failed to parse receipt JSON: {}", path.display()));
    }

    let (Some(data_path), Some(signature)) = (&args.data, &args.signature) else {
        bail!("must specify a receipt file, or --data with --signature");
    };

    // Read verbatim: the signature covers these exact bytes.
    let signed_data = fs::read_to_string(data_path)
        .with_context(|| format!("failed to read signed data: {}", data_path.display()))?;
    let signature = match signature.strip_prefix('@') {
        Some(path) => read_signature_file(Path::new(path))?,
        None => signature.clone(),
    };

    Ok(SignedReceipt::new(signed_data, signature))
}

fn read_signature_file(path: &Path) -> Result<String> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read signature file: {}", path.display()))?;
    Ok(text.trim().to_string())
}
