//! # Transaction Entity
//!
//! The canonical transaction record: the exact fields that travel to miners,
//! the hash that names the transaction forever, and the signing hooks that
//! bind the record to a wallet.
//!
//! ## Hash discipline
//!
//! The transaction hash is
//! `SHA3-256(creation_date:client_id:to_client_id:value:SHA3-256(transaction_data))`.
//! Every field in that preimage is frozen the moment the hash is computed —
//! change one afterwards and the signature stops meaning anything, which is
//! why the submission engine refuses mutation once a broadcast begins.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::crypto::hash::hash;
use crate::crypto::scheme::CryptoError;
use crate::wallet::Wallet;

/// Transaction format version.
pub const TXN_VERSION: &str = "1.0";

// ---------------------------------------------------------------------------
// TransactionType
// ---------------------------------------------------------------------------

/// The operation a transaction performs. Serialized as the numeric
/// discriminant the chain expects on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u32", try_from = "u32")]
pub enum TransactionType {
    /// Token transfer to another client.
    #[default]
    Send,
    /// Token lock-in.
    LockIn,
    /// Arbitrary data storage.
    Data,
    /// Smart-contract execution.
    SmartContract,
}

impl From<TransactionType> for u32 {
    fn from(t: TransactionType) -> u32 {
        match t {
            TransactionType::Send => 0,
            TransactionType::LockIn => 2,
            TransactionType::Data => 10,
            TransactionType::SmartContract => 1000,
        }
    }
}

impl TryFrom<u32> for TransactionType {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(TransactionType::Send),
            2 => Ok(TransactionType::LockIn),
            10 => Ok(TransactionType::Data),
            1000 => Ok(TransactionType::SmartContract),
            other => Err(format!("unknown transaction type: {}", other)),
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Send => write!(f, "send"),
            Self::LockIn => write!(f, "lock-in"),
            Self::Data => write!(f, "data"),
            Self::SmartContract => write!(f, "smart contract"),
        }
    }
}

// ---------------------------------------------------------------------------
// Smart-contract payload
// ---------------------------------------------------------------------------

/// A smart-contract invocation: method name plus structured input. The
/// canonical JSON form of this value becomes the transaction's
/// `transaction_data` — the SDK imposes nothing on either string beyond
/// that serialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmartContractData {
    /// Contract method name.
    pub name: String,
    /// Method input, passed through opaquely.
    #[serde(rename = "input")]
    pub input_args: serde_json::Value,
}

// ---------------------------------------------------------------------------
// TransactionEntity
// ---------------------------------------------------------------------------

/// The wire-canonical transaction record.
///
/// Field names below are the node API contract; the serde renames are load-
/// bearing. Empty `public_key`/`transaction_output` are omitted on the wire
/// rather than sent as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionEntity {
    /// Transaction hash per the preimage formula in the module docs.
    #[serde(default)]
    pub hash: String,
    /// Scheme signature over `hash` under the submitter's first key.
    #[serde(default)]
    pub signature: String,
    /// Record format version.
    #[serde(default)]
    pub version: String,
    /// Submitting client's id.
    #[serde(default)]
    pub client_id: String,
    /// Submitting client's public key, for registry-free verification.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub public_key: String,
    /// Destination client or contract address.
    #[serde(default)]
    pub to_client_id: String,
    /// Chain this transaction targets.
    #[serde(default)]
    pub chain_id: String,
    /// Operation payload: free text, stored data, or SC invocation JSON.
    #[serde(default)]
    pub transaction_data: String,
    /// Token amount moved.
    #[serde(rename = "transaction_value", default)]
    pub value: i64,
    /// Unix seconds at hash-compute time (or as supplied by a pre-signer).
    #[serde(default)]
    pub creation_date: i64,
    /// Operation discriminant.
    #[serde(default)]
    pub transaction_type: TransactionType,
    /// Fee offered to the network.
    #[serde(default)]
    pub transaction_fee: i64,
    /// Execution output, present once a sharder reports the confirmed
    /// transaction back.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub transaction_output: String,
}

impl TransactionEntity {
    /// A fresh entity for the given identity, with no operation set yet.
    pub fn new(client_id: &str, chain_id: &str, public_key: &str) -> Self {
        TransactionEntity {
            version: TXN_VERSION.to_string(),
            client_id: client_id.to_string(),
            chain_id: chain_id.to_string(),
            public_key: public_key.to_string(),
            ..Default::default()
        }
    }

    /// The colon-joined hash preimage.
    fn hash_data(&self) -> String {
        format!(
            "{}:{}:{}:{}:{}",
            self.creation_date,
            self.client_id,
            self.to_client_id,
            self.value,
            hash(&self.transaction_data)
        )
    }

    /// Computes and stores the transaction hash.
    ///
    /// `creation_date` is stamped with the wall clock only if still zero —
    /// externally pre-signed transactions arrive with their original instant
    /// and must keep it, or the hash would no longer match the signature.
    pub fn compute_hash(&mut self) {
        if self.creation_date == 0 {
            self.creation_date = chrono::Utc::now().timestamp();
        }
        self.hash = hash(&self.hash_data());
    }

    /// Computes the hash and signs it with the process's configured key.
    pub fn compute_hash_and_sign<F>(&mut self, signer: F) -> Result<(), CryptoError>
    where
        F: FnOnce(&str) -> Result<String, CryptoError>,
    {
        self.compute_hash();
        self.signature = signer(&self.hash)?;
        Ok(())
    }

    /// Computes the hash and signs it with a supplied wallet's first key.
    ///
    /// Needed wherever the submitter's identity is not the process identity:
    /// faucet drips, multisig registration, vote casting.
    pub fn compute_hash_and_sign_with_wallet<F>(
        &mut self,
        signer: F,
        wallet: &Wallet,
    ) -> Result<(), CryptoError>
    where
        F: FnOnce(&str, &Wallet) -> Result<String, CryptoError>,
    {
        self.compute_hash();
        self.signature = signer(&self.hash, wallet)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// TransactionReceipt
// ---------------------------------------------------------------------------

/// The processed result of a confirmed transaction, as the receipt Merkle
/// tree sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionReceipt {
    txn_hash: String,
    txn_output: String,
}

impl TransactionReceipt {
    /// Builds the receipt for a (confirmed) transaction.
    pub fn new(txn: &TransactionEntity) -> Self {
        Self {
            txn_hash: txn.hash.clone(),
            txn_output: txn.transaction_output.clone(),
        }
    }

    /// The receipt's leaf hash: `SHA3-256(hash:output)`.
    pub fn hash(&self) -> String {
        hash(&format!("{}:{}", self.txn_hash, self.txn_output))
    }
}
