//! Signature decoding and cryptographic check.

use crate::backend::SignatureBackend;
use crate::encoding::decode_lenient;
use crate::error::{BackendError, Rejection};

/// Decodes a base64 signature and checks it against signed bytes.
#[derive(Debug)]
pub struct SignatureChecker<'a, B: SignatureBackend> {
    backend: &'a B,
}

impl<'a, B: SignatureBackend> SignatureChecker<'a, B> {
    pub fn new(backend: &'a B) -> Self {
        Self { backend }
    }

    /// Check `signature_text` over `signed_data`, reporting why it failed.
    ///
    /// `signed_data` is fed to the backend exactly as given.
    ///
    /// # Panics
    ///
    /// Panics if the backend's algorithm is unavailable.
    pub fn check(
        &self,
        key: &B::PublicKey,
        signed_data: &[u8],
        signature_text: &str,
    ) -> Result<(), Rejection> {
        let signature = decode_lenient(signature_text).map_err(|e| Rejection::SignatureDecode {
            reason: e.to_string(),
        })?;

        match self.backend.verify(key, signed_data, &signature) {
            Ok(true) => Ok(()),
            Ok(false) => Err(Rejection::SignatureMismatch),
            Err(BackendError::AlgorithmUnavailable { algorithm }) => {
                panic!("{algorithm} is required for receipt verification but is not available")
            }
            Err(BackendError::InvalidKey(reason) | BackendError::InvalidKeySpec(reason)) => {
                Err(Rejection::InvalidKey { reason })
            }
            Err(BackendError::SignatureFormat(reason)) => {
                Err(Rejection::SignatureFormat { reason })
            }
        }
    }

    /// Boolean view of [`Self::check`].
    pub fn verify(&self, key: &B::PublicKey, signed_data: &[u8], signature_text: &str) -> bool {
        self.check(key, signed_data, signature_text).is_ok()
    }
}
