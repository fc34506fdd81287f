//! Error types for receipt verification.
//!
//! None of these cross the public boolean boundary of [`crate::Verifier`].
//! They exist so failure paths can be logged with a precise reason and so
//! tests can assert on why a receipt was rejected.

/// Failure to turn an encoded public key into usable key material.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyError {
    /// No key material was configured.
    #[error("public key is empty")]
    Empty,

    /// The key text is not valid base64.
    #[error("invalid base64 public key: {reason}")]
    Base64 { reason: String },

    /// The decoded bytes are not an X.509 SubjectPublicKeyInfo for the
    /// backend's algorithm.
    #[error("invalid key specification: {reason}")]
    InvalidKeySpec { reason: String },
}

/// Errors reported by a [`crate::SignatureBackend`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    /// The runtime cannot perform the required algorithm at all.
    ///
    /// This is a deployment defect. The verifier panics on it instead of
    /// reporting an untrusted receipt.
    #[error("signature algorithm {algorithm} is not available")]
    AlgorithmUnavailable { algorithm: &'static str },

    #[error("invalid key specification: {0}")]
    InvalidKeySpec(String),

    #[error("invalid key: {0}")]
    InvalidKey(String),

    #[error("signature format error: {0}")]
    SignatureFormat(String),
}

/// Which caller-visible input was missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingField {
    SignedData,
    PublicKey,
    Signature,
}

impl std::fmt::Display for MissingField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::SignedData => "signed data",
            Self::PublicKey => "public key",
            Self::Signature => "signature",
        })
    }
}

/// Reason a receipt was not trusted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    #[error("missing data: {field}")]
    MissingData { field: MissingField },

    #[error("public key could not be loaded: {0}")]
    KeyLoad(#[from] KeyError),

    #[error("signature is not valid base64: {reason}")]
    SignatureDecode { reason: String },

    #[error("key rejected by signature algorithm: {reason}")]
    InvalidKey { reason: String },

    #[error("malformed signature: {reason}")]
    SignatureFormat { reason: String },

    #[error("signature verification failed")]
    SignatureMismatch,
}

impl Rejection {
    /// Stable short code used as a log field.
    pub fn reason_code(&self) -> &'static str {
        match self {
            Self::MissingData { .. } => "missing_data",
            Self::KeyLoad(_) => "key_load",
            Self::SignatureDecode { .. } => "signature_decode",
            Self::InvalidKey { .. } => "invalid_key",
            Self::SignatureFormat { .. } => "signature_format",
            Self::SignatureMismatch => "signature_mismatch",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_codes_are_distinct() {
        let all = [
            Rejection::MissingData {
                field: MissingField::Signature,
            },
            Rejection::KeyLoad(KeyError::Empty),
            Rejection::SignatureDecode { reason: "x".into() },
            Rejection::InvalidKey { reason: "x".into() },
            Rejection::SignatureFormat { reason: "x".into() },
            Rejection::SignatureMismatch,
        ];
        let mut codes: Vec<_> = all.iter().map(Rejection::reason_code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), all.len());
    }

    #[test]
    fn test_display_mentions_missing_field() {
        let err = Rejection::MissingData {
            field: MissingField::SignedData,
        };
        assert_eq!(err.to_string(), "missing data: signed data");
    }

    #[test]
    fn test_key_error_converts_into_rejection() {
        let rejection: Rejection = KeyError::InvalidKeySpec {
            reason: "bad oid".into(),
        }
        .into();
        assert_eq!(rejection.reason_code(), "key_load");
        assert!(rejection.to_string().contains("bad oid"));
    }
}
