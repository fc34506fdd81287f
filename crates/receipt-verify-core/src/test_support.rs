//! Shared fixtures for unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use rsa::pkcs1v15::SigningKey;
use rsa::pkcs8::EncodePublicKey;
use rsa::signature::{SignatureEncoding, Signer};
use rsa::RsaPrivateKey;
use sha1::Sha1;

use crate::backend::SignatureBackend;
use crate::error::BackendError;

pub(crate) struct Fixture {
    pub signing_key: SigningKey<Sha1>,
    pub spki_der: Vec<u8>,
    pub public_key_b64: String,
}

/// One keypair per test binary; RSA generation is slow in debug builds.
pub(crate) fn fixture() -> &'static Fixture {
    static FIXTURE: OnceLock<Fixture> = OnceLock::new();
    FIXTURE.get_or_init(|| {
        let private_key = RsaPrivateKey::new(&mut rand::thread_rng(), 1024).unwrap();
        let spki_der = private_key
            .to_public_key()
            .to_public_key_der()
            .unwrap()
            .as_bytes()
            .to_vec();
        Fixture {
            public_key_b64: BASE64.encode(&spki_der),
            signing_key: SigningKey::<Sha1>::new(private_key),
            spki_der,
        }
    })
}

pub(crate) fn sign(message: &[u8]) -> Vec<u8> {
    fixture().signing_key.sign(message).to_vec()
}

pub(crate) fn sign_b64(message: &str) -> String {
    BASE64.encode(sign(message.as_bytes()))
}

/// Backend that records calls and answers from fixed outcomes.
#[derive(Clone)]
pub(crate) struct CountingBackend {
    pub decode_calls: Arc<AtomicUsize>,
    pub verify_calls: Arc<AtomicUsize>,
    pub decode_outcome: Result<(), BackendError>,
    pub verify_outcome: Result<bool, BackendError>,
}

impl CountingBackend {
    pub fn answering(verify_outcome: Result<bool, BackendError>) -> Self {
        Self {
            decode_calls: Arc::default(),
            verify_calls: Arc::default(),
            decode_outcome: Ok(()),
            verify_outcome,
        }
    }

    pub fn calls(&self) -> usize {
        self.decode_calls.load(Ordering::SeqCst) + self.verify_calls.load(Ordering::SeqCst)
    }
}

impl SignatureBackend for CountingBackend {
    type PublicKey = ();

    fn algorithm(&self) -> &'static str {
        "counting"
    }

    fn decode_public_key(&self, _spki_der: &[u8]) -> Result<(), BackendError> {
        self.decode_calls.fetch_add(1, Ordering::SeqCst);
        self.decode_outcome.clone()
    }

    fn verify(&self, _key: &(), _message: &[u8], _signature: &[u8]) -> Result<bool, BackendError> {
        self.verify_calls.fetch_add(1, Ordering::SeqCst);
        self.verify_outcome.clone()
    }
}
