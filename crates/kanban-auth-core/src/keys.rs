//! RSA key pair loading
//!
//! Keys are read once at startup and shared read-only behind an `Arc`.
//! A key that cannot be parsed, or a public key that does not match the
//! private key, stops startup instead of failing later at first use.

use std::path::Path;

use jsonwebtoken::{crypto, Algorithm, DecodingKey, EncodingKey};

use crate::AuthError;

const SELF_TEST_MESSAGE: &[u8] = b"kanban-auth key pair self-test";

/// Signing and verification keys for session tokens
pub struct KeyPair {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl KeyPair {
    /// Load a PEM-encoded RSA private/public key pair from disk
    pub fn load(
        private_key_path: impl AsRef<Path>,
        public_key_path: impl AsRef<Path>,
    ) -> Result<Self, AuthError> {
        let private_key_path = private_key_path.as_ref();
        let public_key_path = public_key_path.as_ref();

        let private_pem = read_key(private_key_path)?;
        let public_pem = read_key(public_key_path)?;

        let pair = Self::parse(
            &private_pem,
            &private_key_path.display().to_string(),
            &public_pem,
            &public_key_path.display().to_string(),
        )?;

        tracing::info!(
            private_key = %private_key_path.display(),
            public_key = %public_key_path.display(),
            "Loaded RSA key pair"
        );
        Ok(pair)
    }

    /// Build a key pair from in-memory PEM bytes
    pub fn from_pem(private_pem: &[u8], public_pem: &[u8]) -> Result<Self, AuthError> {
        Self::parse(private_pem, "private key", public_pem, "public key")
    }

    fn parse(
        private_pem: &[u8],
        private_name: &str,
        public_pem: &[u8],
        public_name: &str,
    ) -> Result<Self, AuthError> {
        let encoding = EncodingKey::from_rsa_pem(private_pem).map_err(|e| AuthError::KeyParse {
            key: private_name.to_string(),
            reason: e.to_string(),
        })?;
        let decoding = DecodingKey::from_rsa_pem(public_pem).map_err(|e| AuthError::KeyParse {
            key: public_name.to_string(),
            reason: e.to_string(),
        })?;

        let pair = Self { encoding, decoding };
        pair.self_test().map_err(|reason| AuthError::KeyParse {
            key: private_name.to_string(),
            reason,
        })?;
        Ok(pair)
    }

    // The DER behind an EncodingKey is only parsed at signing time, so sign
    // once here to surface bad keys and mismatched halves at load.
    fn self_test(&self) -> Result<(), String> {
        let signature = crypto::sign(SELF_TEST_MESSAGE, &self.encoding, Algorithm::RS256)
            .map_err(|e| format!("private key cannot sign: {e}"))?;
        let valid = crypto::verify(&signature, SELF_TEST_MESSAGE, &self.decoding, Algorithm::RS256)
            .map_err(|e| format!("public key cannot verify: {e}"))?;
        if valid {
            Ok(())
        } else {
            Err("public key does not match private key".to_string())
        }
    }

    pub fn encoding_key(&self) -> &EncodingKey {
        &self.encoding
    }

    pub fn decoding_key(&self) -> &DecodingKey {
        &self.decoding
    }
}

impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair").finish_non_exhaustive()
    }
}

fn read_key(path: &Path) -> Result<Vec<u8>, AuthError> {
    std::fs::read(path).map_err(|source| AuthError::KeyLoad {
        path: path.to_path_buf(),
        source,
    })
}
