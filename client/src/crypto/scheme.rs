//! # Signature Scheme Abstraction
//!
//! A tagged variant over the curves Meridian supports, with one capability
//! set: derive wallets from mnemonics, sign hex digests, verify, and (for the
//! aggregating variant) combine signatures.
//!
//! ## Why a tagged variant
//!
//! The transaction pipeline must serve single-signer wallets and threshold
//! wallets through the same code path. The scheme is picked once, by a
//! configuration string, and everything downstream stays polymorphic. An
//! unknown configuration string is a deployment bug, not a runtime condition
//! to limp through — construction fails fast with
//! [`CryptoError::UnknownSignatureScheme`].
//!
//! ## Key derivation
//!
//! Derivation is deliberately scheme-independent up to the last step:
//!
//! ```text
//! mnemonic ──BIP39──▶ 64-byte master seed
//! key_seed(i) = SHA3-256(master_seed || u32_le(i))
//! key_seed(i) ──scheme──▶ KeyPair
//! ```
//!
//! Same mnemonic, same index, same scheme → same key pair, on every platform,
//! forever. That reproducibility is what makes mnemonic recovery a real
//! guarantee rather than a best effort.

use bip39::{Language, Mnemonic};
use rand::RngCore;
use thiserror::Error;

use super::bls::BlsScheme;
use super::ed25519::Ed25519Scheme;
use super::hash::{hash_bytes, hash_bytes_raw};
use crate::wallet::{KeyPair, Wallet, WALLET_VERSION};

/// Entropy for freshly generated mnemonics: 256 bits, 24 words.
const MNEMONIC_ENTROPY_BYTES: usize = 32;

/// Errors from key derivation, signing, and verification.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// The mnemonic failed BIP-39 checksum or word-list validation.
    #[error("invalid mnemonic")]
    InvalidMnemonic,

    /// The configured signature scheme name is not recognized. This is a
    /// programmer/deployment error and callers should treat it as fatal.
    #[error("unknown signature scheme: {0}")]
    UnknownSignatureScheme(String),

    /// Key derivation was asked for zero keys.
    #[error("at least one key is required, got {0}")]
    InvalidKeyCount(usize),

    /// Key bytes were malformed: bad hex, wrong length, or not a valid
    /// curve element.
    #[error("invalid key material: {0}")]
    InvalidKey(String),

    /// A hex input (digest or signature) could not be decoded.
    #[error("malformed hex input: {0}")]
    MalformedHex(String),

    /// A signature string decoded but is not a valid curve element.
    #[error("invalid signature encoding: {0}")]
    InvalidSignature(String),

    /// `add` was called on a scheme that does not aggregate signatures.
    #[error("signature aggregation is not supported by this scheme")]
    InvalidSignatureAdd,

    /// A signing operation was attempted before `set_private_key`.
    #[error("private key not set")]
    MissingPrivateKey,

    /// A verification was attempted before `set_public_key`.
    #[error("public key not set")]
    MissingPublicKey,
}

/// The supported scheme tags. Parsed from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemeKind {
    /// Single-signer Ed25519.
    Ed25519,
    /// Aggregating BLS on BLS12-381 (threshold wallets).
    Bls,
}

impl SchemeKind {
    /// Parses a configuration string into a scheme tag.
    pub fn parse(name: &str) -> Result<SchemeKind, CryptoError> {
        match name {
            "ed25519" => Ok(SchemeKind::Ed25519),
            "bls0chain" => Ok(SchemeKind::Bls),
            other => Err(CryptoError::UnknownSignatureScheme(other.to_string())),
        }
    }

    /// The canonical configuration string for this tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemeKind::Ed25519 => "ed25519",
            SchemeKind::Bls => "bls0chain",
        }
    }
}

/// Returns `true` if the phrase is a valid BIP-39 mnemonic (word list and
/// checksum both pass).
pub fn is_mnemonic_valid(mnemonic: &str) -> bool {
    Mnemonic::parse_in_normalized(Language::English, mnemonic).is_ok()
}

/// The polymorphic signer/verifier.
///
/// One instance holds at most one private and one public key, set via
/// [`set_private_key`](Self::set_private_key) /
/// [`set_public_key`](Self::set_public_key). Wallet derivation
/// ([`generate_keys`](Self::generate_keys) /
/// [`recover_keys`](Self::recover_keys)) is stateless and does not touch the
/// instance's configured keys.
pub enum SignatureScheme {
    /// Single-signer Ed25519.
    Ed25519(Ed25519Scheme),
    /// Aggregating BLS12-381.
    Bls(BlsScheme),
}

impl SignatureScheme {
    /// Creates an empty scheme instance of the given kind.
    pub fn new(kind: SchemeKind) -> SignatureScheme {
        match kind {
            SchemeKind::Ed25519 => SignatureScheme::Ed25519(Ed25519Scheme::new()),
            SchemeKind::Bls => SignatureScheme::Bls(BlsScheme::new()),
        }
    }

    /// Creates a scheme from a configuration string, failing fast on an
    /// unknown tag.
    pub fn from_config(name: &str) -> Result<SignatureScheme, CryptoError> {
        Ok(SignatureScheme::new(SchemeKind::parse(name)?))
    }

    /// The tag of this instance.
    pub fn kind(&self) -> SchemeKind {
        match self {
            SignatureScheme::Ed25519(_) => SchemeKind::Ed25519,
            SignatureScheme::Bls(_) => SchemeKind::Bls,
        }
    }

    /// Generates a fresh wallet: 256 bits of OS entropy, a 24-word mnemonic,
    /// and `num_keys` deterministically derived key pairs.
    ///
    /// The wallet's `client_id` is the SHA3-256 digest of the first public
    /// key's raw bytes, and `date_created` is stamped with the wall clock.
    pub fn generate_keys(&self, num_keys: usize) -> Result<Wallet, CryptoError> {
        let mut entropy = [0u8; MNEMONIC_ENTROPY_BYTES];
        rand::rngs::OsRng.fill_bytes(&mut entropy);
        let mnemonic = Mnemonic::from_entropy_in(Language::English, &entropy)
            .map_err(|_| CryptoError::InvalidMnemonic)?;

        let mut wallet = self.wallet_from_mnemonic(&mnemonic, num_keys)?;
        wallet.date_created = chrono::Utc::now().to_rfc3339();
        Ok(wallet)
    }

    /// Re-derives a wallet from an existing mnemonic.
    ///
    /// Identity input produces identity output, byte for byte — recovered
    /// wallets carry no creation timestamp so two recoveries of the same
    /// phrase compare equal.
    pub fn recover_keys(&self, mnemonic: &str, num_keys: usize) -> Result<Wallet, CryptoError> {
        let mnemonic = Mnemonic::parse_in_normalized(Language::English, mnemonic)
            .map_err(|_| CryptoError::InvalidMnemonic)?;
        self.wallet_from_mnemonic(&mnemonic, num_keys)
    }

    /// Derives `num_keys` key pairs from a validated mnemonic and assembles
    /// the wallet. Shared by generation and recovery.
    fn wallet_from_mnemonic(
        &self,
        mnemonic: &Mnemonic,
        num_keys: usize,
    ) -> Result<Wallet, CryptoError> {
        if num_keys == 0 {
            return Err(CryptoError::InvalidKeyCount(num_keys));
        }

        let master_seed = mnemonic.to_seed("");
        let mut keys = Vec::with_capacity(num_keys);
        for index in 0..num_keys as u32 {
            let mut preimage = Vec::with_capacity(master_seed.len() + 4);
            preimage.extend_from_slice(&master_seed);
            preimage.extend_from_slice(&index.to_le_bytes());
            let key_seed = hash_bytes_raw(&preimage);
            keys.push(self.keypair_from_seed(&key_seed)?);
        }

        let public_key_bytes = hex::decode(&keys[0].public_key)
            .map_err(|e| CryptoError::InvalidKey(e.to_string()))?;

        Ok(Wallet {
            client_id: hash_bytes(&public_key_bytes),
            client_key: keys[0].public_key.clone(),
            keys,
            mnemonic: mnemonic.to_string(),
            version: WALLET_VERSION.to_string(),
            date_created: String::new(),
        })
    }

    /// Maps a 32-byte key seed to a scheme-specific key pair.
    fn keypair_from_seed(&self, seed: &[u8; 32]) -> Result<KeyPair, CryptoError> {
        match self {
            SignatureScheme::Ed25519(_) => Ok(Ed25519Scheme::keypair_from_seed(seed)),
            SignatureScheme::Bls(_) => Ok(BlsScheme::keypair_from_seed(seed)),
        }
    }

    /// Configures the signing key from its hex encoding.
    pub fn set_private_key(&mut self, private_key_hex: &str) -> Result<(), CryptoError> {
        match self {
            SignatureScheme::Ed25519(s) => s.set_private_key(private_key_hex),
            SignatureScheme::Bls(s) => s.set_private_key(private_key_hex),
        }
    }

    /// Configures the verification key from its hex encoding.
    pub fn set_public_key(&mut self, public_key_hex: &str) -> Result<(), CryptoError> {
        match self {
            SignatureScheme::Ed25519(s) => s.set_public_key(public_key_hex),
            SignatureScheme::Bls(s) => s.set_public_key(public_key_hex),
        }
    }

    /// Signs the raw bytes of a hex-encoded digest, returning the signature
    /// hex-encoded. Deterministic for both supported schemes.
    pub fn sign(&self, hash_hex: &str) -> Result<String, CryptoError> {
        match self {
            SignatureScheme::Ed25519(s) => s.sign(hash_hex),
            SignatureScheme::Bls(s) => s.sign(hash_hex),
        }
    }

    /// Verifies a hex signature over a hex digest under the configured
    /// public key. Malformed signatures verify as `false`; a missing public
    /// key is an error.
    pub fn verify(&self, signature_hex: &str, hash_hex: &str) -> Result<bool, CryptoError> {
        match self {
            SignatureScheme::Ed25519(s) => s.verify(signature_hex, hash_hex),
            SignatureScheme::Bls(s) => s.verify(signature_hex, hash_hex),
        }
    }

    /// Folds this signer's signature over `hash_hex` into the supplied
    /// aggregate. Only the BLS variant aggregates; the single-signer variant
    /// fails with [`CryptoError::InvalidSignatureAdd`].
    pub fn add(&self, signature_hex: &str, hash_hex: &str) -> Result<String, CryptoError> {
        match self {
            SignatureScheme::Ed25519(_) => Err(CryptoError::InvalidSignatureAdd),
            SignatureScheme::Bls(s) => s.add(signature_hex, hash_hex),
        }
    }
}

/// Decodes a hex string into a fixed-size array, with a length check.
pub(crate) fn decode_fixed<const N: usize>(hex_str: &str) -> Result<[u8; N], CryptoError> {
    let bytes = hex::decode(hex_str).map_err(|e| CryptoError::MalformedHex(e.to_string()))?;
    if bytes.len() != N {
        return Err(CryptoError::InvalidKey(format!(
            "expected {} bytes, got {}",
            N,
            bytes.len()
        )));
    }
    let mut out = [0u8; N];
    out.copy_from_slice(&bytes);
    Ok(out)
}
