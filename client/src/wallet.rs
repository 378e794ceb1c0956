//! # Wallet
//!
//! The identity container handed to every signing operation. A wallet is a
//! client id, an ordered list of key pairs, and the mnemonic the keys were
//! derived from. It is deliberately a plain serializable value: the SDK never
//! mutates a wallet after creation, and callers share it by reference.
//!
//! Key material here is hex strings rather than typed keys. Wallets cross
//! process boundaries (files, faucet services, multisig registration
//! payloads), and the scheme that can interpret the bytes is chosen at
//! runtime by configuration — so the wallet stays representation-only and
//! the [`crate::crypto::scheme`] module owns interpretation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Wallet format version. Bump only on breaking layout changes.
pub const WALLET_VERSION: &str = "1.0";

/// Errors produced when parsing or serializing wallets.
#[derive(Debug, Error)]
pub enum WalletError {
    /// The wallet JSON could not be parsed or is structurally invalid.
    #[error("invalid wallet: {0}")]
    Invalid(String),

    /// The wallet parsed but holds no keys. A keyless wallet cannot sign
    /// anything and is never legitimate.
    #[error("wallet has no keys")]
    NoKeys,
}

/// A single scheme-specific key pair, hex-encoded.
///
/// The encoding is opaque to everything outside the owning signature scheme:
/// an ed25519 public key is 32 bytes, a BLS public key is 96 — the rest of
/// the SDK never looks inside.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyPair {
    /// Hex-encoded public key.
    pub public_key: String,
    /// Hex-encoded private key. Never logged; `Debug` on the containing
    /// wallet is the one place this surfaces, so keep wallets out of logs.
    pub private_key: String,
}

/// A client identity: id, keys, and provenance.
///
/// Invariant: a wallet recovered from a given mnemonic is reproducible
/// byte-for-byte — `client_id`, `client_key`, and every key pair are pure
/// functions of the mnemonic. `date_created` is stamped only on fresh
/// generation and left empty on recovery for exactly that reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wallet {
    /// Hex digest of the first public key. The on-chain identity.
    pub client_id: String,
    /// The first public key, hex-encoded. Travels with transactions so
    /// validators can check signatures without a registry lookup.
    pub client_key: String,
    /// Ordered key pairs. `keys[0]` signs transactions; additional keys
    /// serve split-key and multisig setups.
    pub keys: Vec<KeyPair>,
    /// The BIP-39 phrase the keys derive from.
    pub mnemonic: String,
    /// Wallet format version, currently [`WALLET_VERSION`].
    pub version: String,
    /// RFC 3339 creation instant, or empty for recovered wallets.
    pub date_created: String,
}

impl Wallet {
    /// Parses a wallet from its JSON form, rejecting keyless wallets.
    pub fn from_json(raw: &str) -> Result<Wallet, WalletError> {
        let wallet: Wallet =
            serde_json::from_str(raw).map_err(|e| WalletError::Invalid(e.to_string()))?;
        if wallet.keys.is_empty() {
            return Err(WalletError::NoKeys);
        }
        Ok(wallet)
    }

    /// Serializes the wallet to JSON.
    pub fn to_json(&self) -> Result<String, WalletError> {
        serde_json::to_string(self).map_err(|e| WalletError::Invalid(e.to_string()))
    }

    /// The signing key pair: `keys[0]`.
    ///
    /// Construction paths guarantee at least one key, but external JSON is
    /// checked at the parse boundary rather than trusted here.
    pub fn signing_key(&self) -> Result<&KeyPair, WalletError> {
        self.keys.first().ok_or(WalletError::NoKeys)
    }
}
