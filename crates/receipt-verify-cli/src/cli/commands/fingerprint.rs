//! `receipt-verify fingerprint` - Print the key id of the resolved key.

use anyhow::{bail, Result};
use clap::Args;

use receipt_verify_core::Verifier;

use crate::exit_codes;
use crate::key_source::KeyArgs;

#[derive(Args, Debug)]
pub struct FingerprintArgs {
    #[command(flatten)]
    pub key: KeyArgs,
}

pub fn run(args: FingerprintArgs) -> Result<i32> {
    let (public_key, source) = args.key.resolve()?;
    let verifier = Verifier::new(public_key);

    let Some(key_id) = verifier.key_id() else {
        bail!("public key from {source} is missing or is not an RSA SubjectPublicKeyInfo");
    };

    println!("key_id: {key_id}");
    println!("source: {source}");
    println!("algorithm: {}", verifier.algorithm());
    Ok(exit_codes::SUCCESS)
}
