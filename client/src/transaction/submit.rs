//! # Submission Engine
//!
//! Drives a single transaction through `build -> sign -> broadcast` and
//! reports the outcome through the caller's callback, exactly once.
//!
//! ```text
//! NEW ──build payload──▶ BUILT ──sign──▶ SIGNED ──broadcast──▶ {SUCCESS, ERROR}
//! ```
//!
//! The build step happens synchronously inside the operation call; the rest
//! runs on one background task per submission. The handle is marked
//! *submitted* at the instant that task is spawned, and from that instant
//! every mutator (and every second operation call) fails with
//! [`TransactionError::AlreadySubmitted`] — the record that was signed is
//! the record that was broadcast, always.
//!
//! Signing is skipped when the caller pre-populated a signature (externally
//! signed transactions); delegated to the auth service in split-wallet mode;
//! and otherwise done locally with the configured wallet's first key.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use thiserror::Error;
use tokio::time::sleep;
use tracing::{info, warn};

use super::auth::{AuthError, RemoteSigner};
use super::confirm;
use super::entity::{SmartContractData, TransactionEntity, TransactionType};
use super::{Status, TransactionCallback};
use crate::config::{
    ClientConfig, INTEREST_POOL_CONTRACT_ADDRESS, LOCK_METHOD, MINER_CONTRACT_ADDRESS,
    MULTISIG_CONTRACT_ADDRESS, MULTISIG_REGISTER_METHOD, MULTISIG_VOTE_METHOD, STAKE_METHOD,
    DELETE_STAKE_METHOD, UNLOCK_METHOD,
};
use crate::crypto::scheme::{CryptoError, SignatureScheme};
use crate::network::{QuorumClient, QuorumError, PUT_TRANSACTION};
use crate::network::quorum::sample_peers;
use crate::wallet::{Wallet, WalletError};

/// Grace interval after a successful broadcast, before completion is
/// reported: lets the transaction propagate to sharders ahead of the
/// caller's first verify attempt.
const SUBMIT_GRACE: Duration = Duration::from_secs(3);

/// Timeout for the split-wallet signing round-trip. Generous, because a
/// human is usually on the other end.
const AUTH_TIMEOUT: Duration = Duration::from_secs(60);

/// Errors surfaced by the submission engine.
#[derive(Debug, Error)]
pub enum TransactionError {
    /// A mutator or second operation was invoked after broadcast began.
    #[error("transaction already submitted")]
    AlreadySubmitted,

    /// `verify` was called on a handle with no hash to verify.
    #[error("invalid transaction: cannot be verified")]
    NotVerifiable,

    /// A smart-contract input string was not valid JSON.
    #[error("invalid smart contract input: {0}")]
    InvalidInput(String),

    /// A supplied wallet failed to parse.
    #[error(transparent)]
    Wallet(#[from] WalletError),

    /// Key handling or signing failed.
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    /// The broadcast failed at the quorum layer.
    #[error(transparent)]
    Quorum(#[from] QuorumError),

    /// The split-wallet signer failed.
    #[error(transparent)]
    Auth(#[from] AuthError),
}

// ---------------------------------------------------------------------------
// Handle internals
// ---------------------------------------------------------------------------

pub(crate) struct Inner {
    pub(crate) txn: TransactionEntity,
    pub(crate) callback: Option<Arc<dyn TransactionCallback>>,
    pub(crate) txn_status: Status,
    pub(crate) txn_out: String,
    pub(crate) txn_error: Option<String>,
    pub(crate) txn_hash: String,
    pub(crate) verify_status: Status,
    pub(crate) verify_out: String,
    pub(crate) verify_error: Option<String>,
}

pub(crate) struct TransactionCore {
    pub(crate) config: Arc<ClientConfig>,
    pub(crate) quorum: QuorumClient,
    pub(crate) submitted: AtomicBool,
    pub(crate) inner: Mutex<Inner>,
}

impl TransactionCore {
    /// Records the submission outcome and fires `on_transaction_complete`.
    /// Called exactly once per spawned submission task.
    pub(crate) fn complete_txn(
        core: &Arc<TransactionCore>,
        status: Status,
        out: String,
        err: Option<String>,
    ) {
        let callback = {
            let mut inner = core.inner.lock();
            inner.txn_status = status;
            inner.txn_out = out;
            inner.txn_error = err;
            inner.callback.clone()
        };
        if let Some(cb) = callback {
            cb.on_transaction_complete(&Transaction { core: Arc::clone(core) }, status);
        }
    }

    /// Records the verification outcome and fires `on_verify_complete`.
    /// Called exactly once per spawned verification task.
    pub(crate) fn complete_verify(
        core: &Arc<TransactionCore>,
        status: Status,
        out: String,
        err: Option<String>,
    ) {
        let callback = {
            let mut inner = core.inner.lock();
            inner.verify_status = status;
            inner.verify_out = out;
            inner.verify_error = err;
            inner.callback.clone()
        };
        if let Some(cb) = callback {
            cb.on_verify_complete(&Transaction { core: Arc::clone(core) }, status);
        }
    }

    fn notify_auth(core: &Arc<TransactionCore>, status: Status) {
        let callback = core.inner.lock().callback.clone();
        if let Some(cb) = callback {
            cb.on_auth_complete(&Transaction { core: Arc::clone(core) }, status);
        }
    }
}

/// Signs `hash` with a wallet's first key under the configured scheme.
fn sign_with_wallet(
    config: &ClientConfig,
    wallet: &Wallet,
    hash: &str,
) -> Result<String, CryptoError> {
    let mut scheme = SignatureScheme::new(config.scheme);
    let key = wallet
        .signing_key()
        .map_err(|_| CryptoError::MissingPrivateKey)?;
    scheme.set_private_key(&key.private_key)?;
    scheme.sign(hash)
}

// ---------------------------------------------------------------------------
// Transaction handle
// ---------------------------------------------------------------------------

/// A single transaction: builder, broadcast handle, and verification handle
/// in one. Cheap to clone; all clones observe the same state.
///
/// Operations must be called from within a Tokio runtime — each spawns its
/// background task there.
#[derive(Clone)]
pub struct Transaction {
    pub(crate) core: Arc<TransactionCore>,
}

impl Transaction {
    /// Creates a transaction handle for the process identity.
    pub fn new(
        config: Arc<ClientConfig>,
        callback: Option<Arc<dyn TransactionCallback>>,
        fee: i64,
    ) -> Transaction {
        let mut txn = TransactionEntity::new(
            &config.wallet.client_id,
            &config.chain_id,
            &config.wallet.client_key,
        );
        txn.transaction_fee = fee;
        Self::from_entity(config, callback, txn)
    }

    /// Creates a transaction handle whose submitter identity comes from a
    /// supplied wallet rather than the process wallet. Used for multisig
    /// flows where the group wallet is the sender.
    pub fn new_with_wallet(
        config: Arc<ClientConfig>,
        wallet_json: &str,
        callback: Option<Arc<dyn TransactionCallback>>,
    ) -> Result<Transaction, TransactionError> {
        let wallet = Wallet::from_json(wallet_json)?;
        let txn = TransactionEntity::new(&wallet.client_id, &config.chain_id, &wallet.client_key);
        Ok(Self::from_entity(config, callback, txn))
    }

    fn from_entity(
        config: Arc<ClientConfig>,
        callback: Option<Arc<dyn TransactionCallback>>,
        txn: TransactionEntity,
    ) -> Transaction {
        let quorum = QuorumClient::new(config.request_timeout);
        Transaction {
            core: Arc::new(TransactionCore {
                config,
                quorum,
                submitted: AtomicBool::new(false),
                inner: Mutex::new(Inner {
                    txn,
                    callback,
                    txn_status: Status::Unknown,
                    txn_out: String::new(),
                    txn_error: None,
                    txn_hash: String::new(),
                    verify_status: Status::Unknown,
                    verify_out: String::new(),
                    verify_error: None,
                }),
            }),
        }
    }

    /// Atomically claims the one permitted broadcast.
    fn begin_submit(&self) -> Result<(), TransactionError> {
        self.core
            .submitted
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map_err(|_| TransactionError::AlreadySubmitted)?;
        Ok(())
    }

    fn guard_mutable(&self) -> Result<(), TransactionError> {
        if self.core.submitted.load(Ordering::SeqCst) {
            return Err(TransactionError::AlreadySubmitted);
        }
        Ok(())
    }

    // -- Mutators (valid only before broadcast) -----------------------------

    /// Replaces the completion callback.
    pub fn set_transaction_callback(
        &self,
        callback: Arc<dyn TransactionCallback>,
    ) -> Result<(), TransactionError> {
        self.guard_mutable()?;
        self.core.inner.lock().callback = Some(callback);
        Ok(())
    }

    /// Sets the offered fee.
    pub fn set_transaction_fee(&self, fee: i64) -> Result<(), TransactionError> {
        self.guard_mutable()?;
        self.core.inner.lock().txn.transaction_fee = fee;
        Ok(())
    }

    /// Points the handle at a previously submitted transaction so `verify`
    /// can confirm it without resubmitting.
    pub fn set_transaction_hash(&self, hash: &str) -> Result<(), TransactionError> {
        self.guard_mutable()?;
        self.core.inner.lock().txn_hash = hash.to_string();
        Ok(())
    }

    // -- Operations ---------------------------------------------------------

    /// Sends `value` tokens to `to_client_id`.
    pub fn send(
        &self,
        to_client_id: &str,
        value: i64,
        desc: &str,
    ) -> Result<(), TransactionError> {
        self.begin_submit()?;
        {
            let mut inner = self.core.inner.lock();
            inner.txn.transaction_type = TransactionType::Send;
            inner.txn.to_client_id = to_client_id.to_string();
            inner.txn.value = value;
            inner.txn.transaction_data = desc.to_string();
        }
        self.spawn_submit(None);
        Ok(())
    }

    /// Sends `value` tokens with an externally produced hash, signature, and
    /// creation date; the engine skips signing.
    #[allow(clippy::too_many_arguments)]
    pub fn send_with_signature_hash(
        &self,
        to_client_id: &str,
        value: i64,
        desc: &str,
        signature: &str,
        creation_date: i64,
        hash: &str,
    ) -> Result<(), TransactionError> {
        self.begin_submit()?;
        {
            let mut inner = self.core.inner.lock();
            inner.txn.transaction_type = TransactionType::Send;
            inner.txn.to_client_id = to_client_id.to_string();
            inner.txn.value = value;
            inner.txn.transaction_data = desc.to_string();
            inner.txn.signature = signature.to_string();
            inner.txn.creation_date = creation_date;
            inner.txn.hash = hash.to_string();
        }
        self.spawn_submit(None);
        Ok(())
    }

    /// Stores `data` on the chain.
    pub fn store_data(&self, data: &str) -> Result<(), TransactionError> {
        self.begin_submit()?;
        {
            let mut inner = self.core.inner.lock();
            inner.txn.transaction_type = TransactionType::Data;
            inner.txn.transaction_data = data.to_string();
        }
        self.spawn_submit(None);
        Ok(())
    }

    /// Executes a smart-contract method at `address` with a JSON input
    /// string and an attached token value.
    pub fn execute_smart_contract(
        &self,
        address: &str,
        method: &str,
        json_input: &str,
        value: i64,
    ) -> Result<(), TransactionError> {
        let input: serde_json::Value = serde_json::from_str(json_input)
            .map_err(|e| TransactionError::InvalidInput(e.to_string()))?;
        self.begin_submit()?;
        self.build_smart_contract_txn(address, method, input, value)?;
        self.spawn_submit(None);
        Ok(())
    }

    /// Executes a faucet-contract method, signed by a supplied wallet
    /// instead of the process wallet.
    pub fn execute_faucet_contract(
        &self,
        wallet_json: &str,
        method: &str,
        input: serde_json::Value,
    ) -> Result<(), TransactionError> {
        let wallet = Wallet::from_json(wallet_json)?;
        self.begin_submit()?;
        self.build_smart_contract_txn(crate::config::FAUCET_CONTRACT_ADDRESS, method, input, 0)?;
        self.spawn_submit(Some(wallet));
        Ok(())
    }

    /// Locks `value` tokens in the interest pool for the given duration.
    pub fn lock_tokens(
        &self,
        value: i64,
        duration_hours: i64,
        duration_minutes: i64,
    ) -> Result<(), TransactionError> {
        self.begin_submit()?;
        let input = serde_json::json!({
            "duration": format!("{}h{}m", duration_hours, duration_minutes),
        });
        self.build_smart_contract_txn(
            INTEREST_POOL_CONTRACT_ADDRESS,
            LOCK_METHOD,
            input,
            value,
        )?;
        self.spawn_submit(None);
        Ok(())
    }

    /// Releases a previously locked pool.
    pub fn unlock_tokens(&self, pool_id: &str) -> Result<(), TransactionError> {
        self.begin_submit()?;
        let input = serde_json::json!({ "pool_id": pool_id });
        self.build_smart_contract_txn(INTEREST_POOL_CONTRACT_ADDRESS, UNLOCK_METHOD, input, 0)?;
        self.spawn_submit(None);
        Ok(())
    }

    /// Stakes `value` tokens on the node owned by `client_id`.
    pub fn stake(&self, client_id: &str, value: i64) -> Result<(), TransactionError> {
        self.begin_submit()?;
        let input = serde_json::json!({ "id": client_id });
        self.build_smart_contract_txn(MINER_CONTRACT_ADDRESS, STAKE_METHOD, input, value)?;
        self.spawn_submit(None);
        Ok(())
    }

    /// Withdraws a stake pool from the node owned by `client_id`.
    pub fn delete_stake(&self, client_id: &str, pool_id: &str) -> Result<(), TransactionError> {
        self.begin_submit()?;
        let input = serde_json::json!({ "id": client_id, "pool_id": pool_id });
        self.build_smart_contract_txn(MINER_CONTRACT_ADDRESS, DELETE_STAKE_METHOD, input, 0)?;
        self.spawn_submit(None);
        Ok(())
    }

    /// Registers a group wallet with the multisig contract, signed by the
    /// supplied group wallet.
    pub fn register_multisig(
        &self,
        wallet_json: &str,
        multisig_payload_json: &str,
    ) -> Result<(), TransactionError> {
        let wallet = Wallet::from_json(wallet_json)?;
        let payload: serde_json::Value = serde_json::from_str(multisig_payload_json)
            .map_err(|e| TransactionError::InvalidInput(e.to_string()))?;
        self.begin_submit()?;
        self.build_smart_contract_txn(
            MULTISIG_CONTRACT_ADDRESS,
            MULTISIG_REGISTER_METHOD,
            payload,
            0,
        )?;
        self.spawn_submit(Some(wallet));
        Ok(())
    }

    /// Casts a multisig vote, signed by the supplied signer wallet.
    pub fn register_vote(
        &self,
        signer_wallet_json: &str,
        vote_payload_json: &str,
    ) -> Result<(), TransactionError> {
        let wallet = Wallet::from_json(signer_wallet_json)?;
        let payload: serde_json::Value = serde_json::from_str(vote_payload_json)
            .map_err(|e| TransactionError::InvalidInput(e.to_string()))?;
        self.begin_submit()?;
        self.build_smart_contract_txn(MULTISIG_CONTRACT_ADDRESS, MULTISIG_VOTE_METHOD, payload, 0)?;
        self.spawn_submit(Some(wallet));
        Ok(())
    }

    /// Spawns the confirmation loop for this transaction's hash. The
    /// outcome arrives through `on_verify_complete`, exactly once per call.
    pub fn verify(&self) -> Result<(), TransactionError> {
        {
            let mut inner = self.core.inner.lock();
            if inner.txn_hash.is_empty() && inner.txn_status == Status::Unknown {
                return Err(TransactionError::NotVerifiable);
            }
            // A verify-only handle starts its expiration clock now.
            if inner.txn.creation_date == 0 {
                inner.txn.creation_date = chrono::Utc::now().timestamp();
            }
        }
        if self.get_transaction_hash().is_empty() {
            return Err(TransactionError::NotVerifiable);
        }
        let core = Arc::clone(&self.core);
        tokio::spawn(async move {
            confirm::run_verify(core).await;
        });
        Ok(())
    }

    // -- Accessors ----------------------------------------------------------

    /// The authoritative transaction hash: either set explicitly, or lazily
    /// extracted from the broadcast success body (`entity.hash`) and cached.
    pub fn get_transaction_hash(&self) -> String {
        let mut inner = self.core.inner.lock();
        if !inner.txn_hash.is_empty() {
            return inner.txn_hash.clone();
        }
        if inner.txn_status != Status::Success {
            return String::new();
        }
        match serde_json::from_str::<serde_json::Value>(&inner.txn_out) {
            Ok(value) => {
                if let Some(hash) = value
                    .get("entity")
                    .and_then(|e| e.get("hash"))
                    .and_then(|h| h.as_str())
                {
                    inner.txn_hash = hash.to_string();
                }
            }
            Err(e) => warn!(error = %e, "malformed broadcast success body"),
        }
        inner.txn_hash.clone()
    }

    /// Submission status.
    pub fn status(&self) -> Status {
        self.core.inner.lock().txn_status
    }

    /// Verification status.
    pub fn verify_status(&self) -> Status {
        self.core.inner.lock().verify_status
    }

    /// The canonical confirmation payload, once verification succeeded.
    pub fn get_verify_output(&self) -> String {
        let inner = self.core.inner.lock();
        if inner.verify_status == Status::Success {
            inner.verify_out.clone()
        } else {
            String::new()
        }
    }

    /// The submission failure reason, if submission did not succeed.
    pub fn get_transaction_error(&self) -> String {
        let inner = self.core.inner.lock();
        if inner.txn_status != Status::Success {
            inner.txn_error.clone().unwrap_or_default()
        } else {
            String::new()
        }
    }

    /// The verification failure reason, if verification did not succeed.
    pub fn get_verify_error(&self) -> String {
        let inner = self.core.inner.lock();
        if inner.verify_status != Status::Success {
            inner.verify_error.clone().unwrap_or_default()
        } else {
            String::new()
        }
    }

    /// A snapshot of the underlying entity.
    pub fn entity(&self) -> TransactionEntity {
        self.core.inner.lock().txn.clone()
    }

    // -- Internals ----------------------------------------------------------

    /// Fills the entity with a smart-contract invocation.
    fn build_smart_contract_txn(
        &self,
        address: &str,
        method: &str,
        input: serde_json::Value,
        value: i64,
    ) -> Result<(), TransactionError> {
        let payload = SmartContractData {
            name: method.to_string(),
            input_args: input,
        };
        let data = serde_json::to_string(&payload)
            .map_err(|e| TransactionError::InvalidInput(e.to_string()))?;
        let mut inner = self.core.inner.lock();
        inner.txn.transaction_type = TransactionType::SmartContract;
        inner.txn.to_client_id = address.to_string();
        inner.txn.transaction_data = data;
        inner.txn.value = value;
        Ok(())
    }

    /// Spawns the one broadcast task for this handle.
    fn spawn_submit(&self, signer_wallet: Option<Wallet>) {
        let core = Arc::clone(&self.core);
        tokio::spawn(async move {
            submit_txn(core, signer_wallet).await;
        });
    }
}

// ---------------------------------------------------------------------------
// The broadcast task
// ---------------------------------------------------------------------------

/// Sign (unless pre-signed), broadcast to a random miner sample, and report.
async fn submit_txn(core: Arc<TransactionCore>, signer_wallet: Option<Wallet>) {
    let config = Arc::clone(&core.config);

    let needs_signature = {
        let mut inner = core.inner.lock();
        inner.txn_status = Status::Unknown;
        inner.txn_out.clear();
        inner.txn_error = None;
        inner.txn.signature.is_empty()
    };

    if needs_signature {
        let outcome = if let Some(wallet) = &signer_wallet {
            let mut inner = core.inner.lock();
            inner
                .txn
                .compute_hash_and_sign_with_wallet(
                    |hash, w| sign_with_wallet(&config, w, hash),
                    wallet,
                )
                .map_err(TransactionError::from)
        } else if config.is_split_wallet {
            sign_remotely(&core, &config).await
        } else {
            let mut inner = core.inner.lock();
            inner
                .txn
                .compute_hash_and_sign(|hash| sign_with_wallet(&config, &config.wallet, hash))
                .map_err(TransactionError::from)
        };

        if let Err(e) = outcome {
            warn!(error = %e, "transaction signing failed");
            TransactionCore::complete_txn(&core, Status::Error, String::new(), Some(e.to_string()));
            return;
        }
    }

    let (body, txn_type) = {
        let inner = core.inner.lock();
        match serde_json::to_value(&inner.txn) {
            Ok(v) => (v, inner.txn.transaction_type),
            Err(e) => {
                drop(inner);
                TransactionCore::complete_txn(&core, Status::Error, String::new(), Some(e.to_string()));
                return;
            }
        }
    };

    let miners = sample_peers(&config.miners, config.min_miners_submit);
    info!(
        txn_type = %txn_type,
        miners = miners.len(),
        "submitting transaction"
    );

    match core
        .quorum
        .submit_with_threshold(&miners, PUT_TRANSACTION, &body, config.consensus_threshold)
        .await
    {
        Ok(success_body) => {
            sleep(SUBMIT_GRACE).await;
            TransactionCore::complete_txn(&core, Status::Success, success_body, None);
        }
        Err(e) => {
            warn!(error = %e, "transaction broadcast failed");
            TransactionCore::complete_txn(&core, Status::Error, String::new(), Some(e.to_string()));
        }
    }
}

/// The split-wallet path: hash locally, sign remotely, verify the returned
/// signature before trusting it.
async fn sign_remotely(
    core: &Arc<TransactionCore>,
    config: &ClientConfig,
) -> Result<(), TransactionError> {
    let auth_url = config
        .auth_url
        .as_deref()
        .ok_or(AuthError::Transport("auth url not set".to_string()))?;

    let hash = {
        let mut inner = core.inner.lock();
        inner.txn.compute_hash();
        inner.txn.hash.clone()
    };

    let signer = RemoteSigner::new(auth_url, AUTH_TIMEOUT);
    let result = async {
        let signature = signer.sign(&config.wallet.client_id, &hash).await?;
        let mut verifier = SignatureScheme::new(config.scheme);
        verifier.set_public_key(&config.wallet.client_key)?;
        if !verifier.verify(&signature, &hash)? {
            return Err(TransactionError::Auth(AuthError::AuthVerifyFailed));
        }
        Ok::<String, TransactionError>(signature)
    }
    .await;

    match result {
        Ok(signature) => {
            core.inner.lock().txn.signature = signature;
            TransactionCore::notify_auth(&core, Status::Success);
            Ok(())
        }
        Err(e) => {
            TransactionCore::notify_auth(&core, Status::Error);
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::crypto::scheme::{SchemeKind, SignatureScheme};

    fn test_config() -> Arc<ClientConfig> {
        let scheme = SignatureScheme::new(SchemeKind::Ed25519);
        let wallet = scheme.generate_keys(1).unwrap();
        ClientConfig::builder()
            .signature_scheme("ed25519")
            .chain_id("meridian-test")
            .miners(vec!["http://127.0.0.1:1".into()])
            .sharders(vec!["http://127.0.0.1:1".into()])
            .wallet(wallet)
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn new_handle_carries_identity_and_fee() {
        let config = test_config();
        let txn = Transaction::new(Arc::clone(&config), None, 42);
        let entity = txn.entity();
        assert_eq!(entity.client_id, config.wallet.client_id);
        assert_eq!(entity.public_key, config.wallet.client_key);
        assert_eq!(entity.chain_id, "meridian-test");
        assert_eq!(entity.transaction_fee, 42);
        assert_eq!(txn.status(), Status::Unknown);
    }

    #[tokio::test]
    async fn mutators_work_before_submission() {
        let txn = Transaction::new(test_config(), None, 0);
        txn.set_transaction_fee(7).unwrap();
        txn.set_transaction_hash("abc123").unwrap();
        assert_eq!(txn.entity().transaction_fee, 7);
        assert_eq!(txn.get_transaction_hash(), "abc123");
    }

    #[tokio::test]
    async fn mutators_fail_after_submission_begins() {
        let txn = Transaction::new(test_config(), None, 0);
        txn.send("to-client", 1, "x").unwrap();
        assert!(matches!(
            txn.set_transaction_fee(9),
            Err(TransactionError::AlreadySubmitted)
        ));
        assert!(matches!(
            txn.set_transaction_hash("h"),
            Err(TransactionError::AlreadySubmitted)
        ));
    }

    #[tokio::test]
    async fn second_operation_rejected() {
        let txn = Transaction::new(test_config(), None, 0);
        txn.send("to-client", 1, "first").unwrap();
        assert!(matches!(
            txn.store_data("second"),
            Err(TransactionError::AlreadySubmitted)
        ));
    }

    #[tokio::test]
    async fn smart_contract_build_shapes_payload() {
        let txn = Transaction::new(test_config(), None, 0);
        txn.execute_smart_contract("sc-address", "transfer", r#"{"amount": 5}"#, 100)
            .unwrap();
        let entity = txn.entity();
        assert_eq!(entity.transaction_type, TransactionType::SmartContract);
        assert_eq!(entity.to_client_id, "sc-address");
        assert_eq!(entity.value, 100);
        let payload: SmartContractData =
            serde_json::from_str(&entity.transaction_data).unwrap();
        assert_eq!(payload.name, "transfer");
        assert_eq!(payload.input_args, serde_json::json!({"amount": 5}));
    }

    #[tokio::test]
    async fn invalid_smart_contract_input_rejected_synchronously() {
        let txn = Transaction::new(test_config(), None, 0);
        let result = txn.execute_smart_contract("addr", "m", "{broken", 0);
        assert!(matches!(result, Err(TransactionError::InvalidInput(_))));
        // The build failure must not have consumed the handle.
        assert!(txn.send("to", 1, "ok").is_ok());
    }

    #[tokio::test]
    async fn lock_tokens_formats_duration() {
        let txn = Transaction::new(test_config(), None, 0);
        txn.lock_tokens(250, 2, 30).unwrap();
        let entity = txn.entity();
        assert_eq!(entity.to_client_id, INTEREST_POOL_CONTRACT_ADDRESS);
        assert_eq!(entity.value, 250);
        let payload: SmartContractData =
            serde_json::from_str(&entity.transaction_data).unwrap();
        assert_eq!(payload.name, LOCK_METHOD);
        assert_eq!(payload.input_args, serde_json::json!({"duration": "2h30m"}));
    }

    #[tokio::test]
    async fn verify_without_hash_is_rejected() {
        let txn = Transaction::new(test_config(), None, 0);
        assert!(matches!(txn.verify(), Err(TransactionError::NotVerifiable)));
    }

    #[tokio::test]
    async fn malformed_group_wallet_rejected() {
        let txn = Transaction::new(test_config(), None, 0);
        assert!(matches!(
            txn.register_multisig("{bad json", "{}"),
            Err(TransactionError::Wallet(_))
        ));
        // Parse failures happen before the submission claim.
        assert!(txn.send("to", 1, "ok").is_ok());
    }
}
