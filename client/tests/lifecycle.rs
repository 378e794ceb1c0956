//! End-to-end scenario tests for the submission and confirmation engines.
//!
//! These tests run the real engines against stub miner and sharder servers
//! bound to ephemeral localhost ports. The stubs are deliberately dumb: they
//! serve fixtures and count requests, while every quorum decision, Merkle
//! check, hash recomputation, and expiration deadline is computed by the
//! code under test.
//!
//! Each test owns its servers and its configuration. No shared state, no
//! ordering dependencies.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tokio::sync::mpsc;
use tokio::time::timeout;

use meridian_client::config::ClientConfig;
use meridian_client::crypto::hash::hash;
use meridian_client::crypto::{SchemeKind, SignatureScheme};
use meridian_client::merkle::MerklePath;
use meridian_client::transaction::{
    BlockHeader, Confirmation, Status, Transaction, TransactionCallback, TransactionEntity,
    TransactionReceipt,
};

/// Generous ceiling for awaiting a callback; failures show up as timeouts
/// rather than hangs.
const TEST_TIMEOUT: Duration = Duration::from_secs(30);

// ---------------------------------------------------------------------------
// Callback plumbing
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Event {
    Submitted(Status),
    Verified(Status),
}

struct ChannelCallback {
    tx: mpsc::UnboundedSender<Event>,
}

impl TransactionCallback for ChannelCallback {
    fn on_transaction_complete(&self, _txn: &Transaction, status: Status) {
        let _ = self.tx.send(Event::Submitted(status));
    }

    fn on_verify_complete(&self, _txn: &Transaction, status: Status) {
        let _ = self.tx.send(Event::Verified(status));
    }

    fn on_auth_complete(&self, _txn: &Transaction, _status: Status) {}
}

async fn next_event(rx: &mut mpsc::UnboundedReceiver<Event>) -> Event {
    timeout(TEST_TIMEOUT, rx.recv())
        .await
        .expect("callback deadline exceeded")
        .expect("callback channel closed")
}

// ---------------------------------------------------------------------------
// Stub servers
// ---------------------------------------------------------------------------

async fn spawn_server(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub server");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    format!("http://{}", addr)
}

/// A miner that accepts everything and echoes the transaction hash back in
/// the `entity` envelope, the way real miners acknowledge intake.
async fn spawn_accepting_miner() -> String {
    async fn handler(Json(body): Json<serde_json::Value>) -> Json<serde_json::Value> {
        let hash = body
            .get("hash")
            .and_then(|h| h.as_str())
            .unwrap_or_default()
            .to_string();
        Json(json!({ "entity": { "hash": hash } }))
    }
    spawn_server(Router::new().route("/v1/transaction/put", post(handler))).await
}

/// A miner that rejects everything with a 500.
async fn spawn_rejecting_miner() -> String {
    async fn handler() -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, "intake failed").into_response()
    }
    spawn_server(Router::new().route("/v1/transaction/put", post(handler))).await
}

/// Shared fixture state behind the sharder stubs.
#[derive(Clone, Default)]
struct SharderState {
    /// Body served for confirmation queries, or `{}` when unset.
    confirmation: Arc<Mutex<Option<serde_json::Value>>>,
    /// Headers served by round.
    headers: Arc<Mutex<HashMap<i64, BlockHeader>>>,
    /// Per-round countdown of empty answers before the header appears.
    outage: Arc<Mutex<HashMap<i64, usize>>>,
}

async fn confirmation_handler(State(state): State<SharderState>) -> Json<serde_json::Value> {
    let body = state.confirmation.lock().unwrap().clone();
    Json(body.unwrap_or_else(|| json!({})))
}

async fn block_handler(
    State(state): State<SharderState>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<serde_json::Value> {
    let round: i64 = params
        .get("round")
        .and_then(|r| r.parse().ok())
        .unwrap_or_default();

    {
        let mut outage = state.outage.lock().unwrap();
        if let Some(remaining) = outage.get_mut(&round) {
            if *remaining > 0 {
                *remaining -= 1;
                return Json(json!({}));
            }
        }
    }

    match state.headers.lock().unwrap().get(&round) {
        Some(header) => Json(json!({ "header": header })),
        None => Json(json!({})),
    }
}

async fn spawn_sharder(state: SharderState) -> String {
    let router = Router::new()
        .route("/v1/transaction/get/confirmation", get(confirmation_handler))
        .route("/v1/block/get", get(block_handler))
        .with_state(state);
    spawn_server(router).await
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

fn test_wallet() -> meridian_client::Wallet {
    SignatureScheme::new(SchemeKind::Ed25519)
        .generate_keys(1)
        .expect("wallet generation")
}

/// Seals a header so its hash satisfies the recomputation formula against
/// `prev_hash`.
fn sealed_header(prev_hash: &str, round: i64) -> BlockHeader {
    let mut header = BlockHeader {
        miner_id: "miner-1".to_string(),
        creation_date: 1_700_000_000 + round,
        round,
        round_random_seed: 1000 + round,
        merkle_tree_root: hash(&format!("tree-{}", round)),
        receipt_merkle_tree_root: hash(&format!("receipts-{}", round)),
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

/// Builds an internally consistent confirmation for `txn_hash` at `round`:
/// single-leaf Merkle trees and a sealed block hash. Returns the
/// confirmation body and the enclosing header.
fn sealed_confirmation(txn_hash: &str, round: i64) -> (serde_json::Value, BlockHeader) {
    let txn = TransactionEntity {
        hash: txn_hash.to_string(),
        ..Default::default()
    };
    let receipt_root = TransactionReceipt::new(&txn).hash();
    let prev = hash("the-block-before");

    let mut cfm = Confirmation {
        hash: txn_hash.to_string(),
        previous_block_hash: prev.clone(),
        txn: Some(txn),
        miner_id: "miner-1".to_string(),
        creation_date: 1_700_000_050,
        round,
        round_random_seed: 77,
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

    let header = BlockHeader {
        hash: cfm.block_hash.clone(),
        miner_id: cfm.miner_id.clone(),
        creation_date: cfm.creation_date,
        round: cfm.round,
        round_random_seed: cfm.round_random_seed,
        merkle_tree_root: cfm.merkle_tree_root.clone(),
        receipt_merkle_tree_root: cfm.receipt_merkle_tree_root.clone(),
        ..Default::default()
    };

    (json!({ "confirmation": cfm }), header)
}

/// Populates `state.headers` with a sealed chain extending `from` for
/// `length` rounds.
fn extend_chain(state: &SharderState, from: &BlockHeader, length: i64) {
    let mut headers = state.headers.lock().unwrap();
    let mut prev = from.hash.clone();
    for round in (from.round + 1)..=(from.round + length) {
        let header = sealed_header(&prev, round);
        prev = header.hash.clone();
        headers.insert(round, header);
    }
}

// ---------------------------------------------------------------------------
// S1 — round-trip signing
// ---------------------------------------------------------------------------

#[test]
fn s1_round_trip_signing() {
    let mut scheme = SignatureScheme::new(SchemeKind::Ed25519);
    let wallet = scheme
        .recover_keys(
            "abandon abandon abandon abandon abandon abandon \
             abandon abandon abandon abandon abandon about",
            1,
        )
        .expect("recovery");

    scheme
        .set_private_key(&wallet.keys[0].private_key)
        .expect("set private key");
    let signature = scheme.sign("a1b2c3").expect("sign");

    let mut verifier = SignatureScheme::new(SchemeKind::Ed25519);
    verifier
        .set_public_key(&wallet.keys[0].public_key)
        .expect("set public key");
    assert!(verifier.verify(&signature, "a1b2c3").unwrap());

    let mut tampered = hex::decode(&signature).unwrap();
    tampered[10] ^= 0x01;
    assert!(!verifier.verify(&hex::encode(tampered), "a1b2c3").unwrap());
}

// ---------------------------------------------------------------------------
// S2 / S3 — quorum submission
// ---------------------------------------------------------------------------

fn submission_config(miners: Vec<String>) -> Arc<ClientConfig> {
    ClientConfig::builder()
        .signature_scheme("ed25519")
        .chain_id("meridian-test")
        .miners(miners)
        .sharders(vec!["http://127.0.0.1:9".into()])
        .consensus_threshold(60.0)
        .min_miners_submit(5)
        .wallet(test_wallet())
        .build()
        .expect("config")
}

#[tokio::test(flavor = "multi_thread")]
async fn s2_quorum_submission_healthy() {
    let mut miners = Vec::new();
    for _ in 0..4 {
        miners.push(spawn_accepting_miner().await);
    }
    miners.push(spawn_rejecting_miner().await);

    let config = submission_config(miners);
    let (tx, mut rx) = mpsc::unbounded_channel();
    let txn = Transaction::new(config, Some(Arc::new(ChannelCallback { tx })), 0);

    txn.send("recipient", 100, "healthy quorum").unwrap();
    assert_eq!(next_event(&mut rx).await, Event::Submitted(Status::Success));

    // The aggregated success body carries the authoritative hash, which for
    // an echoing miner is the hash the engine computed and signed.
    assert_eq!(txn.get_transaction_hash(), txn.entity().hash);
    assert!(!txn.entity().signature.is_empty());
    assert!(txn.get_transaction_error().is_empty());

    // Exactly one completion per submission.
    assert!(rx.try_recv().is_err());
}

#[tokio::test(flavor = "multi_thread")]
async fn s3_quorum_submission_insufficient() {
    let mut miners = Vec::new();
    for _ in 0..2 {
        miners.push(spawn_accepting_miner().await);
    }
    for _ in 0..3 {
        miners.push(spawn_rejecting_miner().await);
    }

    let config = submission_config(miners);
    let (tx, mut rx) = mpsc::unbounded_channel();
    let txn = Transaction::new(config, Some(Arc::new(ChannelCallback { tx })), 0);

    txn.send("recipient", 100, "starved quorum").unwrap();
    assert_eq!(next_event(&mut rx).await, Event::Submitted(Status::Error));
    assert!(txn.get_transaction_error().contains("consensus not reached"));
    assert!(txn.get_transaction_hash().is_empty());
}

// ---------------------------------------------------------------------------
// S4 / S5 / S6 — confirmation engine
// ---------------------------------------------------------------------------

fn verification_config(
    sharders: Vec<String>,
    expiration_seconds: i64,
    wait: Duration,
) -> Arc<ClientConfig> {
    ClientConfig::builder()
        .signature_scheme("ed25519")
        .chain_id("meridian-test")
        .miners(vec!["http://127.0.0.1:9".into()])
        .sharders(sharders)
        .min_sharders_verify(1)
        .min_required_chain_length(3)
        .txn_expiration_seconds(expiration_seconds)
        .wait_time(wait)
        .wallet(test_wallet())
        .build()
        .expect("config")
}

#[tokio::test(flavor = "multi_thread")]
async fn s4_merkle_failure_is_rejected_until_timeout() {
    let txn_hash = hash("txn-with-bad-proof");
    let (mut body, _) = sealed_confirmation(&txn_hash, 50);
    // Corrupt the transaction Merkle root: the path no longer verifies.
    body["confirmation"]["merkle_tree_root"] = json!(hash("unrelated-root"));

    let state = SharderState::default();
    *state.confirmation.lock().unwrap() = Some(body);
    let sharder = spawn_sharder(state).await;

    let config = verification_config(vec![sharder], 2, Duration::from_millis(200));
    let (tx, mut rx) = mpsc::unbounded_channel();
    let txn = Transaction::new(config, Some(Arc::new(ChannelCallback { tx })), 0);

    txn.set_transaction_hash(&txn_hash).unwrap();
    txn.verify().unwrap();

    assert_eq!(next_event(&mut rx).await, Event::Verified(Status::Error));
    assert!(txn.get_verify_error().contains("timeout"));
    assert!(txn.get_verify_output().is_empty());
    assert!(rx.try_recv().is_err());
}

#[tokio::test(flavor = "multi_thread")]
async fn s5_chain_extension_success() {
    let txn_hash = hash("txn-finalized");
    let (body, confirm_header) = sealed_confirmation(&txn_hash, 50);

    let state = SharderState::default();
    *state.confirmation.lock().unwrap() = Some(body.clone());
    extend_chain(&state, &confirm_header, 3);
    let sharder = spawn_sharder(state).await;

    let config = verification_config(vec![sharder], 60, Duration::from_millis(200));
    let (tx, mut rx) = mpsc::unbounded_channel();
    let txn = Transaction::new(config, Some(Arc::new(ChannelCallback { tx })), 0);

    txn.set_transaction_hash(&txn_hash).unwrap();
    txn.verify().unwrap();

    assert_eq!(next_event(&mut rx).await, Event::Verified(Status::Success));

    // The output is the confirmation payload as the sharder served it.
    let output: serde_json::Value = serde_json::from_str(&txn.get_verify_output()).unwrap();
    assert_eq!(output["confirmation"]["block_hash"], body["confirmation"]["block_hash"]);
    assert!(txn.get_verify_error().is_empty());
    assert!(rx.try_recv().is_err());
}

#[tokio::test(flavor = "multi_thread")]
async fn s6_chain_stall_then_recovery() {
    let txn_hash = hash("txn-through-outage");
    let (body, confirm_header) = sealed_confirmation(&txn_hash, 50);

    let state = SharderState::default();
    *state.confirmation.lock().unwrap() = Some(body);
    extend_chain(&state, &confirm_header, 3);
    // Round 53 disappears for the first three queries: the probe, the
    // escalated quorum, and one retry all come back empty before recovery.
    state.outage.lock().unwrap().insert(53, 3);
    let sharder = spawn_sharder(state.clone()).await;

    let config = verification_config(vec![sharder], 30, Duration::from_millis(100));
    let (tx, mut rx) = mpsc::unbounded_channel();
    let txn = Transaction::new(config, Some(Arc::new(ChannelCallback { tx })), 0);

    txn.set_transaction_hash(&txn_hash).unwrap();
    txn.verify().unwrap();

    assert_eq!(next_event(&mut rx).await, Event::Verified(Status::Success));
    assert_eq!(*state.outage.lock().unwrap().get(&53).unwrap(), 0);
}

// ---------------------------------------------------------------------------
// Full lifecycle — submit against miners, then verify against sharders
// ---------------------------------------------------------------------------

#[tokio::test(flavor = "multi_thread")]
async fn full_lifecycle_submit_then_verify() {
    let miner = spawn_accepting_miner().await;
    let state = SharderState::default();
    let sharder = spawn_sharder(state.clone()).await;

    let config = ClientConfig::builder()
        .signature_scheme("ed25519")
        .chain_id("meridian-test")
        .miners(vec![miner])
        .sharders(vec![sharder])
        .min_sharders_verify(1)
        .min_required_chain_length(3)
        .txn_expiration_seconds(60)
        .wait_time(Duration::from_millis(200))
        .wallet(test_wallet())
        .build()
        .expect("config");

    let (tx, mut rx) = mpsc::unbounded_channel();
    let txn = Transaction::new(config, Some(Arc::new(ChannelCallback { tx })), 5);

    txn.send("recipient-client", 250, "full round trip").unwrap();
    assert_eq!(next_event(&mut rx).await, Event::Submitted(Status::Success));

    // The sharder learns about the transaction only now, from the entity
    // the engine actually signed and broadcast.
    let submitted_hash = txn.get_transaction_hash();
    assert!(!submitted_hash.is_empty());
    let (body, confirm_header) = sealed_confirmation(&submitted_hash, 90);
    *state.confirmation.lock().unwrap() = Some(body);
    extend_chain(&state, &confirm_header, 3);

    txn.verify().unwrap();
    assert_eq!(next_event(&mut rx).await, Event::Verified(Status::Success));

    let output: serde_json::Value = serde_json::from_str(&txn.get_verify_output()).unwrap();
    assert_eq!(output["confirmation"]["txn"]["hash"], json!(submitted_hash));
}
