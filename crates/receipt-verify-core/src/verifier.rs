//! Purchase verification entry point.

use std::fmt;
use std::sync::OnceLock;

use crate::backend::{RsaSha1Backend, SignatureBackend};
use crate::checker::SignatureChecker;
use crate::error::{KeyError, MissingField, Rejection};
use crate::keys::{compute_key_id, decode_key, EncodedPublicKey};
use crate::receipt::SignedReceipt;

/// Decides whether a signed receipt came from the trusted signer.
///
/// The key is decoded on first use and cached for the lifetime of the
/// verifier, including a decode failure. A `Verifier` is `Send + Sync` and
/// can be shared freely between threads.
pub struct Verifier<B: SignatureBackend = RsaSha1Backend> {
    public_key: EncodedPublicKey,
    backend: B,
    loaded: OnceLock<Result<B::PublicKey, KeyError>>,
}

impl Verifier<RsaSha1Backend> {
    /// Verifier for RSA/SHA-1 signatures under `public_key`.
    pub fn new(public_key: impl Into<EncodedPublicKey>) -> Self {
        Self::with_backend(public_key, RsaSha1Backend)
    }

    /// Verifier over the key compiled into this binary.
    pub fn embedded() -> Self {
        Self::new(EncodedPublicKey::embedded())
    }
}

impl<B: SignatureBackend> Verifier<B> {
    pub fn with_backend(public_key: impl Into<EncodedPublicKey>, backend: B) -> Self {
        Self {
            public_key: public_key.into(),
            backend,
            loaded: OnceLock::new(),
        }
    }

    /// Returns `true` only if `signature` is a valid signature by the trusted
    /// key over the UTF-8 bytes of `signed_data`.
    ///
    /// Missing, malformed and tampered inputs all yield `false`; the reason
    /// is logged but not returned.
    ///
    /// # Panics
    ///
    /// Panics if the signature algorithm is unavailable in the backend.
    pub fn verify_purchase(&self, signed_data: &str, signature: &str) -> bool {
        match self.evaluate(signed_data, signature) {
            Ok(()) => {
                tracing::debug!("purchase signature verified");
                true
            }
            Err(rejection) => {
                log_rejection(&rejection);
                false
            }
        }
    }

    pub fn verify_receipt(&self, receipt: &SignedReceipt) -> bool {
        self.verify_purchase(&receipt.signed_data, &receipt.signature)
    }

    /// Key id of the trusted key, or `None` if it does not load.
    pub fn key_id(&self) -> Option<String> {
        self.public_key().ok()?;
        self.public_key.to_der().ok().map(|der| compute_key_id(&der))
    }

    pub fn algorithm(&self) -> &'static str {
        self.backend.algorithm()
    }

    pub(crate) fn evaluate(&self, signed_data: &str, signature: &str) -> Result<(), Rejection> {
        let missing = if signed_data.is_empty() {
            Some(MissingField::SignedData)
        } else if self.public_key.is_empty() {
            Some(MissingField::PublicKey)
        } else if signature.is_empty() {
            Some(MissingField::Signature)
        } else {
            None
        };
        if let Some(field) = missing {
            return Err(Rejection::MissingData { field });
        }

        let key = self.public_key()?;
        SignatureChecker::new(&self.backend).check(key, signed_data.as_bytes(), signature)
    }

    fn public_key(&self) -> Result<&B::PublicKey, KeyError> {
        self.loaded
            .get_or_init(|| decode_key(&self.backend, &self.public_key))
            .as_ref()
            .map_err(Clone::clone)
    }
}

impl<B: SignatureBackend> fmt::Debug for Verifier<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Verifier")
            .field("algorithm", &self.backend.algorithm())
            .field("has_key", &!self.public_key.is_empty())
            .field("loaded", &self.loaded.get().map(Result::is_ok))
            .finish()
    }
}

fn log_rejection(rejection: &Rejection) {
    let reason = rejection.reason_code();
    match rejection {
        Rejection::MissingData { field } => {
            tracing::warn!(reason, %field, "purchase verification failed: missing data");
        }
        Rejection::KeyLoad(e) => {
            tracing::error!(reason, error = %e, "failed to load public key, rejecting receipt");
        }
        other => {
            tracing::warn!(reason, error = %other, "purchase verification failed");
        }
    }
}

/// Verify against the key compiled into this binary.
///
/// Uses one process-wide [`Verifier::embedded`], built on first call.
pub fn verify_purchase(signed_data: &str, signature: &str) -> bool {
    static EMBEDDED: OnceLock<Verifier> = OnceLock::new();
    EMBEDDED
        .get_or_init(Verifier::embedded)
        .verify_purchase(signed_data, signature)
}
