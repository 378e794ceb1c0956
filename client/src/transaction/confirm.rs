//! # Confirmation Engine
//!
//! Establishes, without trusting any single node, that a transaction sits in
//! a finalized block. Four independent checks have to line up:
//!
//! 1. A quorum of sharders votes for the same confirmation (keyed by block
//!    hash).
//! 2. The transaction hash Merkle-verifies against the block's transaction
//!    tree.
//! 3. The transaction's receipt Merkle-verifies against the receipt tree.
//! 4. The block hash recomputes from its own fields, and the chain extends
//!    past the confirmation round by the configured depth, every link
//!    recomputed the same way.
//!
//! The engine probes one random sharder first and escalates to a quorum only
//! when the probe comes back empty — the cheap path is the common path. The
//! whole loop is bounded by transaction expiration: when
//! `min(lfb_creation_time, now)` passes the transaction's creation date plus
//! the expiration window, verification fails with `VerifyTimeout`.
//!
//! Vote keys are computed over the exact bytes each sharder sent, never over
//! re-serialized structures: two sharders agreeing byte-for-byte must always
//! land in the same bucket.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use thiserror::Error;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use super::entity::{TransactionEntity, TransactionReceipt};
use super::submit::TransactionCore;
use super::Status;
use crate::crypto::hash::{hash, hash_bytes};
use crate::merkle::{verify_merkle_path, MerklePath};
use crate::network::quorum::sample_peers;
use crate::network::{QuorumClient, VoteSet, GET_BLOCK, GET_CONFIRMATION};

/// Pause before escalating a failed single-sharder block probe to a quorum.
const ESCALATION_PAUSE: Duration = Duration::from_secs(1);

/// Errors surfaced by the confirmation engine.
#[derive(Debug, Error)]
pub enum VerifyError {
    /// The transaction expired before a confirmation quorum was found.
    #[error("verify transaction failed: timeout")]
    VerifyTimeout,

    /// A Merkle path did not verify; names which tree.
    #[error("{0} merkle validation failed")]
    MerkleValidationFailed(&'static str),

    /// The block hash did not recompute from the confirmation's fields.
    #[error("block hash verification failed in confirmation")]
    BlockHashMismatch,

    /// The confirmed transaction is not the one we asked about.
    #[error("invalid transaction hash: expected {expected}, received {received}")]
    HashMismatch {
        /// The hash we queried for.
        expected: String,
        /// The hash the sharder returned.
        received: String,
    },

    /// The response carried no confirmation for this transaction.
    #[error("transaction confirmation not found")]
    ConfirmationNotFound,

    /// No sharder quorum agreed on a block for the queried round.
    #[error("round info not found")]
    RoundInfoNotFound,

    /// A response failed to parse. Individual parse errors are discarded;
    /// this only surfaces when nothing parseable remains.
    #[error("confirmation parse error: {0}")]
    Parse(String),
}

// ---------------------------------------------------------------------------
// Wire structures
// ---------------------------------------------------------------------------

/// The proof bundle a sharder returns for a confirmed transaction: the
/// transaction itself, both Merkle paths, and the enclosing block header's
/// fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Confirmation {
    /// Confirmation format version.
    #[serde(default)]
    pub version: String,
    /// Confirmed transaction hash.
    #[serde(default)]
    pub hash: String,
    /// Hash of the enclosing block.
    #[serde(default)]
    pub block_hash: String,
    /// Hash of the enclosing block's predecessor.
    #[serde(default)]
    pub previous_block_hash: String,
    /// The confirmed transaction record.
    #[serde(rename = "txn", default, skip_serializing_if = "Option::is_none")]
    pub txn: Option<TransactionEntity>,
    /// Block creation time, unix seconds.
    #[serde(default)]
    pub creation_date: i64,
    /// Block producer.
    #[serde(default)]
    pub miner_id: String,
    /// Consensus round of the enclosing block.
    #[serde(default)]
    pub round: i64,
    /// Execution status of the transaction.
    #[serde(rename = "transaction_status", default)]
    pub status: i32,
    /// Round randomness, part of the block hash preimage.
    #[serde(default)]
    pub round_random_seed: i64,
    /// Root of the block's transaction Merkle tree.
    #[serde(default)]
    pub merkle_tree_root: String,
    /// Inclusion path for the transaction hash.
    #[serde(default)]
    pub merkle_tree_path: Option<MerklePath>,
    /// Root of the block's receipt Merkle tree.
    #[serde(default)]
    pub receipt_merkle_tree_root: String,
    /// Inclusion path for the transaction's receipt.
    #[serde(default)]
    pub receipt_merkle_tree_path: Option<MerklePath>,
}

/// A block header as sharders serve it: by round, or derived from a
/// confirmation. Only the fields in the hash preimage matter to the client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockHeader {
    /// Header format version.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub version: String,
    /// Block creation time, unix seconds.
    #[serde(default)]
    pub creation_date: i64,
    /// The block hash.
    #[serde(default)]
    pub hash: String,
    /// Block producer.
    #[serde(default)]
    pub miner_id: String,
    /// Consensus round.
    #[serde(default)]
    pub round: i64,
    /// Round randomness.
    #[serde(default)]
    pub round_random_seed: i64,
    /// Transaction tree root.
    #[serde(default)]
    pub merkle_tree_root: String,
    /// State trie root after this block. Not part of the client's checks.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub state_hash: String,
    /// Receipt tree root.
    #[serde(default)]
    pub receipt_merkle_tree_root: String,
    /// Transactions in the block.
    #[serde(default)]
    pub num_txns: i64,
}

// ---------------------------------------------------------------------------
// Pure checks
// ---------------------------------------------------------------------------

/// Recomputes a block hash from its predecessor and the header fields, in
/// the canonical colon-joined order, and compares it to the claimed hash.
pub fn block_extends(prev_hash: &str, block: &BlockHeader) -> bool {
    let data = format!(
        "{}:{}:{}:{}:{}:{}:{}",
        block.miner_id,
        prev_hash,
        block.creation_date,
        block.round,
        block.round_random_seed,
        block.merkle_tree_root,
        block.receipt_merkle_tree_root
    );
    block.hash == hash(&data)
}

/// Validates a confirmation against the transaction hash we queried for and
/// distills it into the enclosing block header.
///
/// Rejection here means this sharder's answer casts no vote; it does not
/// fail the overall verification.
pub fn header_from_confirmation(
    expected_hash: &str,
    cfm: &Confirmation,
) -> Result<BlockHeader, VerifyError> {
    let txn = cfm
        .txn
        .as_ref()
        .ok_or_else(|| VerifyError::Parse("confirmation carries no transaction".to_string()))?;

    if txn.hash != expected_hash {
        return Err(VerifyError::HashMismatch {
            expected: expected_hash.to_string(),
            received: txn.hash.clone(),
        });
    }

    let txn_path = cfm.merkle_tree_path.clone().unwrap_or_default();
    if !verify_merkle_path(&txn.hash, &txn_path, &cfm.merkle_tree_root) {
        return Err(VerifyError::MerkleValidationFailed("transaction"));
    }

    let receipt = TransactionReceipt::new(txn);
    let receipt_path = cfm.receipt_merkle_tree_path.clone().unwrap_or_default();
    if !verify_merkle_path(&receipt.hash(), &receipt_path, &cfm.receipt_merkle_tree_root) {
        return Err(VerifyError::MerkleValidationFailed("receipt"));
    }

    let block = BlockHeader {
        hash: cfm.block_hash.clone(),
        miner_id: cfm.miner_id.clone(),
        creation_date: cfm.creation_date,
        round: cfm.round,
        round_random_seed: cfm.round_random_seed,
        merkle_tree_root: cfm.merkle_tree_root.clone(),
        receipt_merkle_tree_root: cfm.receipt_merkle_tree_root.clone(),
        ..Default::default()
    };

    if !block_extends(&cfm.previous_block_hash, &block) {
        return Err(VerifyError::BlockHashMismatch);
    }
    Ok(block)
}

/// Extracts the vote key and raw header text from one sharder's block-by-
/// round response body.
///
/// The key is the digest of the *raw bytes* of the header's `hash` field as
/// received, so byte-identical answers always vote together and re-
/// serialization can never split a quorum.
fn round_vote(body: &str) -> Option<(String, String)> {
    let map: HashMap<String, &RawValue> = serde_json::from_str(body).ok()?;
    let header_raw = map.get("header")?;
    let fields: HashMap<String, &RawValue> = serde_json::from_str(header_raw.get()).ok()?;
    let hash_raw = fields.get("hash")?;
    Some((
        hash_bytes(hash_raw.get().as_bytes()),
        header_raw.get().to_string(),
    ))
}

// ---------------------------------------------------------------------------
// Sharder queries
// ---------------------------------------------------------------------------

/// Outcome of one confirmation query round: the winning (header, raw body)
/// pair, or the reason none was found — plus whatever view of the latest
/// finalized block came back, for expiration accounting.
struct ConfirmationQuery {
    outcome: Result<(BlockHeader, String), VerifyError>,
    lfb: BlockHeader,
}

/// Queries `num_sharders` random sharders for the transaction confirmation
/// and votes on the results by block hash.
async fn get_transaction_confirmation(
    core: &Arc<TransactionCore>,
    num_sharders: usize,
    txn_hash: &str,
) -> ConfirmationQuery {
    let sharders = sample_peers(&core.config.sharders, num_sharders);
    let query = format!("{}?hash={}&content=lfb", GET_CONFIRMATION, txn_hash);
    let rx = core.quorum.get(&sharders, &query);
    let responses = QuorumClient::collect(rx, sharders.len()).await;

    let mut votes: VoteSet<(BlockHeader, String)> = VoteSet::new();
    let mut lfb = BlockHeader::default();

    for response in responses {
        if !response.is_ok() {
            continue;
        }
        let map: HashMap<String, &RawValue> = match serde_json::from_str(&response.body) {
            Ok(map) => map,
            Err(e) => {
                warn!(url = %response.url, error = %e, "confirmation parse error");
                continue;
            }
        };

        let confirmed = map.get("confirmation").and_then(|raw| {
            match serde_json::from_str::<Confirmation>(raw.get()) {
                Ok(cfm) => Some(cfm),
                Err(e) => {
                    warn!(url = %response.url, error = %e, "confirmation parse error");
                    None
                }
            }
        });

        match confirmed.map(|cfm| header_from_confirmation(txn_hash, &cfm)) {
            Some(Ok(header)) => {
                let key = header.hash.clone();
                votes.cast(&key, (header, response.body.clone()));
            }
            other => {
                if let Some(Err(e)) = other {
                    warn!(url = %response.url, error = %e, "confirmation rejected");
                }
                // No usable confirmation from this sharder; take its view
                // of the latest finalized block for expiration accounting.
                if let Some(raw) = map.get("latest_finalized_block") {
                    match serde_json::from_str::<BlockHeader>(raw.get()) {
                        Ok(parsed) => lfb = parsed,
                        Err(e) => warn!(url = %response.url, error = %e, "lfb parse error"),
                    }
                }
            }
        }
    }

    let outcome = votes
        .into_leader()
        .map(|(payload, _)| payload)
        .ok_or(VerifyError::ConfirmationNotFound);
    ConfirmationQuery { outcome, lfb }
}

/// Queries `num_sharders` random sharders for the block at `round` and
/// votes on the answers.
async fn get_block_info_by_round(
    core: &Arc<TransactionCore>,
    num_sharders: usize,
    round: i64,
) -> Result<BlockHeader, VerifyError> {
    let sharders = sample_peers(&core.config.sharders, num_sharders);
    let query = format!("{}?round={}&content=header", GET_BLOCK, round);
    let rx = core.quorum.get(&sharders, &query);
    let responses = QuorumClient::collect(rx, sharders.len()).await;

    let mut votes: VoteSet<String> = VoteSet::new();
    for response in responses {
        if !response.is_ok() {
            continue;
        }
        match round_vote(&response.body) {
            Some((key, raw_header)) => votes.cast(&key, raw_header),
            None => debug!(url = %response.url, round, "no round confirmation"),
        }
    }

    let (raw_header, _) = votes.into_leader().ok_or(VerifyError::RoundInfoNotFound)?;
    serde_json::from_str(&raw_header).map_err(|e| VerifyError::Parse(e.to_string()))
}

// ---------------------------------------------------------------------------
// Chain extension
// ---------------------------------------------------------------------------

fn creation_date(core: &Arc<TransactionCore>) -> i64 {
    core.inner.lock().txn.creation_date
}

/// Has the transaction's expiration window elapsed on the local clock?
fn chain_expired(core: &Arc<TransactionCore>) -> bool {
    chrono::Utc::now().timestamp()
        > creation_date(core) + core.config.txn_expiration_seconds
}

/// Walks the chain forward from the confirmation round, requiring one
/// verified extension per round, until the chain has advanced by
/// `min_required_chain_length` rounds past the confirmation.
///
/// A missing or non-extending round is retried: first a single-sharder
/// probe, then (after a short pause) a quorum of `min_sharders_verify`, then
/// a `wait_time` sleep — for as long as the transaction's expiration window
/// allows. Returns `false` only when that window runs out.
async fn validate_chain(core: &Arc<TransactionCore>, confirm_block: &BlockHeader) -> bool {
    let config = &core.config;
    let confirm_round = confirm_block.round;
    debug!(confirm_round, "chain extension started");

    let mut current_hash = confirm_block.hash.clone();
    let mut round = confirm_round + 1;

    while round <= confirm_round + config.min_required_chain_length {
        let next = match get_block_info_by_round(core, 1, round).await {
            Ok(header) => Some(header),
            Err(e) => {
                info!(
                    error = %e,
                    round,
                    escalate_to = config.min_sharders_verify,
                    sharders = config.sharders.len(),
                    "block probe failed, escalating"
                );
                sleep(ESCALATION_PAUSE).await;
                match get_block_info_by_round(core, config.min_sharders_verify, round).await {
                    Ok(header) => Some(header),
                    Err(e) => {
                        warn!(error = %e, round, "block chain stalled, waiting");
                        None
                    }
                }
            }
        };

        match next {
            Some(header) if block_extends(&current_hash, &header) => {
                current_hash = header.hash.clone();
                round += 1;
            }
            Some(header) => {
                warn!(round, hash = %header.hash, "header does not extend the chain");
                if chain_expired(core) {
                    return false;
                }
                sleep(config.wait_time).await;
            }
            None => {
                if chain_expired(core) {
                    return false;
                }
                sleep(config.wait_time).await;
            }
        }
    }

    debug!(
        confirm_round,
        extended_to = round - 1,
        "chain extension complete"
    );
    true
}

// ---------------------------------------------------------------------------
// The verification task
// ---------------------------------------------------------------------------

/// If the window has closed, returns `true`; otherwise sleeps out the retry
/// pause and returns `false`. A zero `lfb_creation` means no sharder
/// answered, in which case the local clock stands in for the network's.
async fn expired_or_wait(core: &Arc<TransactionCore>, lfb_creation: i64, now: i64) -> bool {
    let lfb = if lfb_creation == 0 { now } else { lfb_creation };
    if lfb.min(now) > creation_date(core) + core.config.txn_expiration_seconds {
        return true;
    }
    sleep(core.config.wait_time).await;
    false
}

/// Reports the one failure the loop can end in: the expiration window
/// closed without a proven confirmation.
fn fail_with_timeout(core: &Arc<TransactionCore>) {
    TransactionCore::complete_verify(
        core,
        Status::Error,
        String::new(),
        Some(VerifyError::VerifyTimeout.to_string()),
    );
}

/// The confirmation loop: probe, escalate, verify inclusion, extend the
/// chain, report. Completes the verification exactly once.
pub(crate) async fn run_verify(core: Arc<TransactionCore>) {
    let config = Arc::clone(&core.config);
    let txn_hash = core.inner.lock().txn_hash.clone();

    loop {
        // Probe a single random sharder first.
        let probe = get_transaction_confirmation(&core, 1, &txn_hash).await;
        let (confirm_block, confirmation_body) = match probe.outcome {
            Ok(pair) => pair,
            Err(e) => {
                let now = chrono::Utc::now().timestamp();
                let lfb_time = probe.lfb.creation_date;
                info!(error = %e, now, lfb_time, "no confirmation from probe");

                if lfb_time.max(now)
                    < creation_date(&core) + config.txn_expiration_seconds
                {
                    info!(
                        escalate_to = config.min_sharders_verify,
                        sharders = config.sharders.len(),
                        "escalating confirmation query"
                    );
                    let escalated =
                        get_transaction_confirmation(&core, config.min_sharders_verify, &txn_hash)
                            .await;
                    match escalated.outcome {
                        Ok(pair) => pair,
                        Err(_) => {
                            if expired_or_wait(&core, escalated.lfb.creation_date, now).await {
                                fail_with_timeout(&core);
                                return;
                            }
                            continue;
                        }
                    }
                } else {
                    if expired_or_wait(&core, lfb_time, now).await {
                        fail_with_timeout(&core);
                        return;
                    }
                    continue;
                }
            }
        };

        if validate_chain(&core, &confirm_block).await {
            TransactionCore::complete_verify(&core, Status::Success, confirmation_body, None);
            return;
        }

        // The chain never reached the required depth inside the expiration
        // window; the confirmation cannot be trusted as final.
        if chain_expired(&core) {
            fail_with_timeout(&core);
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Builds a header whose hash satisfies the recomputation formula.
    fn sealed_header(prev_hash: &str, round: i64) -> BlockHeader {
        let mut header = BlockHeader {
            miner_id: "miner-1".to_string(),
            creation_date: 1_700_000_000 + round,
            round,
            round_random_seed: 42 + round,
            merkle_tree_root: hash(&format!("mtr-{}", round)),
            receipt_merkle_tree_root: hash(&format!("rmtr-{}", round)),
            ..Default::default()
        };
        header.hash = hash(&format!(
            "{}:{}:{}:{}:{}:{}:{}",
            header.miner_id,
            prev_hash,
            header.creation_date,
            header.round,
            header.round_random_seed,
            header.merkle_tree_root,
            header.receipt_merkle_tree_root
        ));
        header
    }

    /// A confirmation whose Merkle roots are the single-leaf roots of the
    /// transaction and its receipt, and whose block hash is sealed.
    fn sealed_confirmation(txn_hash: &str) -> Confirmation {
        let txn = TransactionEntity {
            hash: txn_hash.to_string(),
            ..Default::default()
        };
        let receipt_root = TransactionReceipt::new(&txn).hash();
        let prev = hash("previous-block");

        let mut cfm = Confirmation {
            hash: txn_hash.to_string(),
            previous_block_hash: prev.clone(),
            txn: Some(txn),
            miner_id: "miner-1".to_string(),
            creation_date: 1_700_000_100,
            round: 50,
            round_random_seed: 7,
            merkle_tree_root: txn_hash.to_string(),
            merkle_tree_path: Some(MerklePath::default()),
            receipt_merkle_tree_root: receipt_root,
            receipt_merkle_tree_path: Some(MerklePath::default()),
            ..Default::default()
        };
        cfm.block_hash = hash(&format!(
            "{}:{}:{}:{}:{}:{}:{}",
            cfm.miner_id,
            prev,
            cfm.creation_date,
            cfm.round,
            cfm.round_random_seed,
            cfm.merkle_tree_root,
            cfm.receipt_merkle_tree_root
        ));
        cfm
    }

    #[test]
    fn block_extends_accepts_sealed_header() {
        let prev = hash("genesis");
        let header = sealed_header(&prev, 10);
        assert!(block_extends(&prev, &header));
    }

    #[test]
    fn block_extends_rejects_any_perturbation() {
        let prev = hash("genesis");
        let base = sealed_header(&prev, 10);

        let mutations: Vec<Box<dyn Fn(&mut BlockHeader)>> = vec![
            Box::new(|h| h.miner_id.push('x')),
            Box::new(|h| h.creation_date += 1),
            Box::new(|h| h.round += 1),
            Box::new(|h| h.round_random_seed += 1),
            Box::new(|h| h.merkle_tree_root.push('0')),
            Box::new(|h| h.receipt_merkle_tree_root.push('0')),
        ];
        for mutate in mutations {
            let mut header = base.clone();
            mutate(&mut header);
            assert!(!block_extends(&prev, &header));
        }
        // Wrong predecessor also breaks the equality.
        assert!(!block_extends(&hash("other"), &base));
    }

    #[test]
    fn sealed_confirmation_yields_header() {
        let txn_hash = hash("the-txn");
        let cfm = sealed_confirmation(&txn_hash);
        let header = header_from_confirmation(&txn_hash, &cfm).unwrap();
        assert_eq!(header.hash, cfm.block_hash);
        assert_eq!(header.round, 50);
    }

    #[test]
    fn mismatched_txn_hash_rejected() {
        let txn_hash = hash("the-txn");
        let cfm = sealed_confirmation(&txn_hash);
        assert!(matches!(
            header_from_confirmation("different-hash", &cfm),
            Err(VerifyError::HashMismatch { .. })
        ));
    }

    #[test]
    fn broken_transaction_merkle_path_rejected() {
        let txn_hash = hash("the-txn");
        let mut cfm = sealed_confirmation(&txn_hash);
        cfm.merkle_tree_root = hash("not-the-root");
        assert!(matches!(
            header_from_confirmation(&txn_hash, &cfm),
            Err(VerifyError::MerkleValidationFailed("transaction"))
        ));
    }

    #[test]
    fn broken_receipt_merkle_path_rejected() {
        let txn_hash = hash("the-txn");
        let mut cfm = sealed_confirmation(&txn_hash);
        cfm.receipt_merkle_tree_root = hash("not-the-root");
        assert!(matches!(
            header_from_confirmation(&txn_hash, &cfm),
            Err(VerifyError::MerkleValidationFailed("receipt"))
        ));
    }

    #[test]
    fn tampered_block_hash_rejected() {
        let txn_hash = hash("the-txn");
        let mut cfm = sealed_confirmation(&txn_hash);
        cfm.block_hash = hash("forged");
        assert!(matches!(
            header_from_confirmation(&txn_hash, &cfm),
            Err(VerifyError::BlockHashMismatch)
        ));
    }

    #[test]
    fn round_vote_keys_are_byte_exact() {
        let body_a = r#"{"header":{"hash":"abc","round":5}}"#;
        let body_b = r#"{"header":{"hash":"abc","round":5}}"#;
        // Same content, different whitespace: different bytes on the wire
        // around the field, same raw hash field bytes.
        let body_c = r#"{"header": {"hash":"abc",  "round":5}}"#;

        let (key_a, raw_a) = round_vote(body_a).unwrap();
        let (key_b, _) = round_vote(body_b).unwrap();
        let (key_c, _) = round_vote(body_c).unwrap();
        assert_eq!(key_a, key_b);
        assert_eq!(key_a, key_c);
        assert_eq!(raw_a, r#"{"hash":"abc","round":5}"#);
    }

    #[test]
    fn round_vote_ignores_headerless_bodies() {
        assert!(round_vote(r#"{"block":{}}"#).is_none());
        assert!(round_vote("not json").is_none());
        assert!(round_vote(r#"{"header":{"round":5}}"#).is_none());
    }

    #[test]
    fn confirmation_parses_wire_fields() {
        let body = r#"{
            "version": "1.0",
            "hash": "aa",
            "block_hash": "bb",
            "previous_block_hash": "cc",
            "txn": {"hash": "aa", "transaction_value": 10},
            "creation_date": 1700000000,
            "miner_id": "m1",
            "round": 9,
            "transaction_status": 1,
            "round_random_seed": 3,
            "merkle_tree_root": "r1",
            "merkle_tree_path": {"nodes": ["n1"], "leaf_index": 1},
            "receipt_merkle_tree_root": "r2",
            "receipt_merkle_tree_path": {"nodes": [], "leaf_index": 0}
        }"#;
        let cfm: Confirmation = serde_json::from_str(body).unwrap();
        assert_eq!(cfm.round, 9);
        assert_eq!(cfm.status, 1);
        assert_eq!(cfm.txn.as_ref().unwrap().value, 10);
        assert_eq!(cfm.merkle_tree_path.unwrap().nodes, vec!["n1"]);
    }

    #[test]
    fn block_header_tolerates_partial_payloads() {
        let header: BlockHeader = serde_json::from_str(r#"{"hash":"h","round":3}"#).unwrap();
        assert_eq!(header.hash, "h");
        assert_eq!(header.round, 3);
        assert_eq!(header.creation_date, 0);
        assert!(header.miner_id.is_empty());
    }
}
