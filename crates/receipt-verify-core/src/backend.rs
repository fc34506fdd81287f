//! Signature backend capability.
//!
//! The verifier never calls a crypto library directly; it goes through
//! [`SignatureBackend`] so the toolkit can be swapped, and so tests can count
//! or fail primitive invocations.

use rsa::pkcs1v15::Pkcs1v15Sign;
use rsa::pkcs8::der::Decode;
use rsa::pkcs8::SubjectPublicKeyInfoRef;
use rsa::{pkcs1, BigUint, RsaPublicKey};
use sha1::{Digest, Sha1};

use crate::error::BackendError;

/// Algorithm identifier for the default backend.
///
/// SHA-1 is fixed by the signing authority. Receipts already in the field are
/// signed with it; switching the digest would reject every one of them.
pub const SHA1_WITH_RSA: &str = "SHA1withRSA";

/// Largest accepted modulus. `rsa` defaults to 4096 bits, which rejects
/// valid store keys.
pub const MAX_MODULUS_BITS: usize = 16384;

/// Public-key signature verification primitive.
pub trait SignatureBackend: Send + Sync {
    /// Decoded key material.
    type PublicKey: Send + Sync;

    /// Algorithm name, for diagnostics.
    fn algorithm(&self) -> &'static str;

    /// Parse X.509 SubjectPublicKeyInfo DER bytes.
    fn decode_public_key(&self, spki_der: &[u8]) -> Result<Self::PublicKey, BackendError>;

    /// Check `signature` over `message`.
    ///
    /// `Ok(false)` means the math ran and the signature does not match.
    fn verify(
        &self,
        key: &Self::PublicKey,
        message: &[u8],
        signature: &[u8],
    ) -> Result<bool, BackendError>;
}

/// RSA PKCS#1 v1.5 with SHA-1, backed by RustCrypto.
#[derive(Debug, Clone, Copy, Default)]
pub struct RsaSha1Backend;

impl SignatureBackend for RsaSha1Backend {
    type PublicKey = RsaPublicKey;

    fn algorithm(&self) -> &'static str {
        SHA1_WITH_RSA
    }

    fn decode_public_key(&self, spki_der: &[u8]) -> Result<RsaPublicKey, BackendError> {
        let spki = SubjectPublicKeyInfoRef::from_der(spki_der)
            .map_err(|e| BackendError::InvalidKeySpec(e.to_string()))?;
        spki.algorithm
            .assert_algorithm_oid(pkcs1::ALGORITHM_OID)
            .map_err(|e| BackendError::InvalidKeySpec(e.to_string()))?;

        let key_bytes = spki.subject_public_key.as_bytes().ok_or_else(|| {
            BackendError::InvalidKeySpec("subject public key has unused bits".to_string())
        })?;
        let pkcs1_key = pkcs1::RsaPublicKey::from_der(key_bytes)
            .map_err(|e| BackendError::InvalidKeySpec(e.to_string()))?;

        let n = BigUint::from_bytes_be(pkcs1_key.modulus.as_bytes());
        let e = BigUint::from_bytes_be(pkcs1_key.public_exponent.as_bytes());
        RsaPublicKey::new_with_max_size(n, e, MAX_MODULUS_BITS)
            .map_err(|err| BackendError::InvalidKey(err.to_string()))
    }

    fn verify(
        &self,
        key: &RsaPublicKey,
        message: &[u8],
        signature: &[u8],
    ) -> Result<bool, BackendError> {
        use rsa::traits::PublicKeyParts;

        if signature.len() != key.size() {
            return Err(BackendError::SignatureFormat(format!(
                "expected {} signature bytes, got {}",
                key.size(),
                signature.len()
            )));
        }

        let hashed = Sha1::digest(message);
        match key.verify(Pkcs1v15Sign::new::<Sha1>(), &hashed, signature) {
            Ok(()) => Ok(true),
            Err(rsa::Error::Verification) => Ok(false),
            Err(e) => Err(BackendError::SignatureFormat(e.to_string())),
        }
    }
}
