//! # Ed25519 Scheme
//!
//! The single-signer scheme. Deterministic signatures, 32+32 byte keys,
//! constant-time implementations that other people have audited so we don't
//! have to pretend we did.
//!
//! Messages here are hex-encoded digests: `sign` and `verify` decode the hex
//! and operate on the raw bytes, because the chain addresses everything by
//! hex digest but signs the bytes underneath.

use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};

use super::scheme::{decode_fixed, CryptoError};
use crate::wallet::KeyPair;

/// Ed25519 signer/verifier state.
///
/// Freshly constructed instances hold no keys; configure them with
/// [`set_private_key`](Self::set_private_key) or
/// [`set_public_key`](Self::set_public_key) before use.
#[derive(Default)]
pub struct Ed25519Scheme {
    signing_key: Option<SigningKey>,
    verifying_key: Option<VerifyingKey>,
}

impl Ed25519Scheme {
    /// Creates an empty scheme instance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Derives a key pair from a 32-byte seed. In Ed25519 the seed *is* the
    /// secret key, so this is a thin, deterministic mapping.
    pub(crate) fn keypair_from_seed(seed: &[u8; 32]) -> KeyPair {
        let signing_key = SigningKey::from_bytes(seed);
        KeyPair {
            public_key: hex::encode(signing_key.verifying_key().to_bytes()),
            private_key: hex::encode(signing_key.to_bytes()),
        }
    }

    /// Sets the signing key from its 32-byte hex encoding. The verification
    /// key is re-derived so sign-then-verify on one instance just works.
    pub fn set_private_key(&mut self, private_key_hex: &str) -> Result<(), CryptoError> {
        let bytes: [u8; 32] = decode_fixed(private_key_hex)?;
        let signing_key = SigningKey::from_bytes(&bytes);
        self.verifying_key = Some(signing_key.verifying_key());
        self.signing_key = Some(signing_key);
        Ok(())
    }

    /// Sets the verification key from its 32-byte hex encoding. Rejects
    /// encodings that are not valid curve points.
    pub fn set_public_key(&mut self, public_key_hex: &str) -> Result<(), CryptoError> {
        let bytes: [u8; 32] = decode_fixed(public_key_hex)?;
        let verifying_key = VerifyingKey::from_bytes(&bytes)
            .map_err(|_| CryptoError::InvalidKey("not a valid ed25519 point".to_string()))?;
        self.verifying_key = Some(verifying_key);
        Ok(())
    }

    /// Signs the raw bytes of a hex digest, returning 128 hex chars.
    pub fn sign(&self, hash_hex: &str) -> Result<String, CryptoError> {
        let signing_key = self
            .signing_key
            .as_ref()
            .ok_or(CryptoError::MissingPrivateKey)?;
        let message =
            hex::decode(hash_hex).map_err(|e| CryptoError::MalformedHex(e.to_string()))?;
        let signature = signing_key.sign(&message);
        Ok(hex::encode(signature.to_bytes()))
    }

    /// Verifies a hex signature over a hex digest. A malformed signature is
    /// simply invalid — callers get `false`, not a panic.
    pub fn verify(&self, signature_hex: &str, hash_hex: &str) -> Result<bool, CryptoError> {
        let verifying_key = self
            .verifying_key
            .as_ref()
            .ok_or(CryptoError::MissingPublicKey)?;
        let message =
            hex::decode(hash_hex).map_err(|e| CryptoError::MalformedHex(e.to_string()))?;

        let Ok(sig_bytes) = hex::decode(signature_hex) else {
            return Ok(false);
        };
        let Ok(sig_arr) = <[u8; 64]>::try_from(sig_bytes.as_slice()) else {
            return Ok(false);
        };
        let signature = Signature::from_bytes(&sig_arr);
        Ok(verifying_key.verify(&message, &signature).is_ok())
    }
}
