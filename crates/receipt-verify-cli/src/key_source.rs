//! Resolve which public key the CLI verifies against.
//!
//! Precedence: `--public-key`, then `--public-key-file`, then the
//! `RECEIPT_VERIFY_PUBLIC_KEY` environment variable, then the key embedded at
//! build time.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use clap::Args;
use receipt_verify_core::EncodedPublicKey;

pub const PUBLIC_KEY_ENV_VAR: &str = "RECEIPT_VERIFY_PUBLIC_KEY";

const PEM_LABEL: &str = "PUBLIC KEY";

#[derive(Args, Debug, Clone, Default)]
pub struct KeyArgs {
    /// Public key as base64 X.509 SubjectPublicKeyInfo
    #[arg(long, conflicts_with = "public_key_file")]
    pub public_key: Option<String>,

    /// Public key file: SPKI PEM, base64 text, or raw DER
    #[arg(long)]
    pub public_key_file: Option<PathBuf>,
}

/// Where the resolved key came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeySource {
    Flag,
    File(PathBuf),
    Env,
    Embedded,
}

impl fmt::Display for KeySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flag => f.write_str("--public-key"),
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Env => f.write_str(PUBLIC_KEY_ENV_VAR),
            Self::Embedded => f.write_str("embedded"),
        }
    }
}

impl KeyArgs {
    pub fn resolve(&self) -> Result<(EncodedPublicKey, KeySource)> {
        self.resolve_with_env(std::env::var(PUBLIC_KEY_ENV_VAR).ok())
    }

    fn resolve_with_env(&self, env_value: Option<String>) -> Result<(EncodedPublicKey, KeySource)> {
        if let Some(key) = &self.public_key {
            return Ok((EncodedPublicKey::new(key.as_str()), KeySource::Flag));
        }
        if let Some(path) = &self.public_key_file {
            let key = load_key_file(path)?;
            return Ok((key, KeySource::File(path.clone())));
        }
        if let Some(key) = env_value.filter(|v| !v.trim().is_empty()) {
            return Ok((EncodedPublicKey::new(key), KeySource::Env));
        }
        Ok((EncodedPublicKey::embedded(), KeySource::Embedded))
    }
}

/// Read a public key file into its base64 SPKI form.
pub fn load_key_file(path: &Path) -> Result<EncodedPublicKey> {
    let bytes = fs::read(path)
        .with_context(|| format!("failed to read public key file: {}", path.display()))?;

    let Ok(text) = std::str::from_utf8(&bytes) else {
        // Not text: treat as DER.
        return Ok(EncodedPublicKey::new(BASE64.encode(&bytes)));
    };

    if text.trim_start().starts_with("-----BEGIN") {
        let (label, doc) = pkcs8::der::Document::from_pem(text.trim())
            .with_context(|| format!("failed to parse PEM: {}", path.display()))?;
        if label != PEM_LABEL {
            bail!(
                "unexpected PEM label in {}: expected {PEM_LABEL}, got {label}",
                path.display()
            );
        }
        return Ok(EncodedPublicKey::new(BASE64.encode(doc.as_bytes())));
    }

    Ok(EncodedPublicKey::new(text.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    // 512-bit RSA SubjectPublicKeyInfo.
    const KEY_B64: &str = "MFwwDQYJKoZIhvcNAQEBBQADSwAwSAJBALCtwRjbD9USVEhk7lpOo7+zoTPFrzHLTsCvA6e1r+bguXjOLJ0Pb3D6AX3Pvlj1AygOh3BZzKdY3efe2y/qKOECAwEAAQ==";

    fn pem(label: &str) -> String {
        let (first, second) = KEY_B64.split_at(64);
        format!("-----BEGIN {label}-----\n{first}\n{second}\n-----END {label}-----\n")
    }

    fn temp_file(contents: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents).unwrap();
        file
    }

    #[test]
    fn test_flag_wins_over_env() {
        let args = KeyArgs {
            public_key: Some("flag".into()),
            public_key_file: None,
        };
        let (key, source) = args.resolve_with_env(Some("env".into())).unwrap();
        assert_eq!(key.as_str(), "flag");
        assert_eq!(source, KeySource::Flag);
    }

    #[test]
    fn test_env_used_when_no_flags() {
        let (key, source) = KeyArgs::default()
            .resolve_with_env(Some("env".into()))
            .unwrap();
        assert_eq!(key.as_str(), "env");
        assert_eq!(source, KeySource::Env);
    }

    #[test]
    fn test_blank_env_falls_back_to_embedded() {
        let (key, source) = KeyArgs::default()
            .resolve_with_env(Some("  ".into()))
            .unwrap();
        assert_eq!(source, KeySource::Embedded);
        assert_eq!(key, EncodedPublicKey::embedded());
    }

    #[test]
    fn test_file_base64_text() {
        let file = temp_file(format!("{KEY_B64}\n").as_bytes());
        let key = load_key_file(file.path()).unwrap();
        assert_eq!(key.as_str(), KEY_B64);
    }

    #[test]
    fn test_file_pem() {
        let file = temp_file(pem("PUBLIC KEY").as_bytes());
        let key = load_key_file(file.path()).unwrap();
        assert_eq!(key.as_str(), KEY_B64);
    }

    #[test]
    fn test_file_pem_wrong_label() {
        let file = temp_file(pem("CERTIFICATE").as_bytes());
        let err = load_key_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("unexpected PEM label"));
    }

    #[test]
    fn test_file_raw_der() {
        let der = BASE64.decode(KEY_B64).unwrap();
        let file = temp_file(&der);
        let key = load_key_file(file.path()).unwrap();
        assert_eq!(key.as_str(), KEY_B64);
    }

    #[test]
    fn test_missing_file() {
        let err = load_key_file(Path::new("/nonexistent/key.pem")).unwrap_err();
        assert!(err.to_string().contains("failed to read public key file"));
    }
}
