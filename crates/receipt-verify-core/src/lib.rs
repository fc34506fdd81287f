//! Purchase receipt signature verification.
//!
//! Checks that a receipt's signed payload was produced by the holder of a
//! trusted RSA key, using PKCS#1 v1.5 signatures over SHA-1. The result is a
//! single boolean; every missing, malformed or tampered input fails closed.
//!
//! # Quick Start
//!
//! ```no_run
//! use receipt_verify_core::Verifier;
//!
//! # let (original_json, signature) = ("{}", "");
//! let verifier = Verifier::new("MIIBIjANBgkqhkiG9w0BAQEFAAOCAQ8AMIIBCgKCAQEA...");
//! if verifier.verify_purchase(original_json, signature) {
//!     // grant entitlement
//! }
//! ```
//!
//! # Embedded key
//!
//! The signer's key is normally fixed at build time:
//!
//! ```text
//! RECEIPT_VERIFY_EMBEDDED_KEY="MIIBIjANBg..." cargo build --release
//! ```
//!
//! [`verify_purchase`] and [`Verifier::embedded`] use that key. Without it,
//! they reject every receipt.
//!
//! # Wire contract
//!
//! | Input | Encoding |
//! |-------|----------|
//! | signed data | UTF-8 bytes of the string, unmodified |
//! | signature | base64 (standard alphabet) of the raw RSA signature |
//! | public key | base64 of X.509 SubjectPublicKeyInfo DER |
//!
//! Whitespace inside base64 text is ignored and padding is optional.

mod backend;
mod checker;
mod encoding;
pub mod error;
mod keys;
mod receipt;
mod verifier;

#[cfg(test)]
mod test_support;

pub use backend::{RsaSha1Backend, SignatureBackend, MAX_MODULUS_BITS, SHA1_WITH_RSA};
pub use checker::SignatureChecker;
pub use error::{BackendError, KeyError, MissingField, Rejection};
pub use keys::{
    compute_key_id, load_public_key, EncodedPublicKey, EMBEDDED_KEY_ENV_VAR, EMBEDDED_PUBLIC_KEY,
};
pub use receipt::{PurchasePayload, PurchaseState, SignedReceipt};
pub use verifier::{verify_purchase, Verifier};
