//! Public key handling: the embedded constant, decoding, and key ids.

use sha2::{Digest, Sha256};

use crate::backend::SignatureBackend;
use crate::encoding::decode_lenient;
use crate::error::{BackendError, KeyError};

/// Build-time variable that supplies the embedded public key.
pub const EMBEDDED_KEY_ENV_VAR: &str = "RECEIPT_VERIFY_EMBEDDED_KEY";

/// Base64 X.509 SubjectPublicKeyInfo of the receipt signer, fixed at build
/// time.
///
/// Set `RECEIPT_VERIFY_EMBEDDED_KEY` while compiling to embed a key. When it
/// is unset the constant is empty and every embedded verification fails
/// closed.
pub const EMBEDDED_PUBLIC_KEY: &str = match option_env!("RECEIPT_VERIFY_EMBEDDED_KEY") {
    Some(key) => key,
    None => "",
};

/// Base64 text of an X.509 SubjectPublicKeyInfo.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct EncodedPublicKey(String);

impl EncodedPublicKey {
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// The key compiled into this binary.
    pub fn embedded() -> Self {
        Self::new(EMBEDDED_PUBLIC_KEY)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when no key text is present (whitespace counts as none).
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Decode the base64 layer to SPKI DER bytes.
    pub fn to_der(&self) -> Result<Vec<u8>, KeyError> {
        if self.is_empty() {
            return Err(KeyError::Empty);
        }
        decode_lenient(&self.0).map_err(|e| KeyError::Base64 {
            reason: e.to_string(),
        })
    }
}

impl From<&str> for EncodedPublicKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for EncodedPublicKey {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Decode `encoded` into backend key material.
///
/// Logs a `warn` diagnostic on failure.
///
/// # Panics
///
/// Panics if the backend reports that its algorithm is unavailable. That is a
/// broken deployment, not an untrusted receipt.
pub fn load_public_key<B: SignatureBackend>(
    backend: &B,
    encoded: &EncodedPublicKey,
) -> Result<B::PublicKey, KeyError> {
    decode_key(backend, encoded).inspect_err(|e| {
        tracing::warn!(error = %e, "failed to load public key");
    })
}

/// [`load_public_key`] without the failure diagnostic, for callers that
/// report the error themselves.
pub(crate) fn decode_key<B: SignatureBackend>(
    backend: &B,
    encoded: &EncodedPublicKey,
) -> Result<B::PublicKey, KeyError> {
    let der = encoded.to_der()?;

    match backend.decode_public_key(&der) {
        Ok(key) => {
            tracing::debug!(
                key_id = %compute_key_id(&der),
                algorithm = backend.algorithm(),
                "public key loaded"
            );
            Ok(key)
        }
        Err(BackendError::AlgorithmUnavailable { algorithm }) => {
            panic!("{algorithm} is required for receipt verification but is not available")
        }
        Err(e) => Err(KeyError::InvalidKeySpec {
            reason: e.to_string(),
        }),
    }
}

/// Compute a key id from SPKI DER bytes.
///
/// Returns `sha256:<lowercase-hex>`.
pub fn compute_key_id(spki_der: &[u8]) -> String {
    format!("sha256:{}", hex::encode(Sha256::digest(spki_der).as_slice()))
}
