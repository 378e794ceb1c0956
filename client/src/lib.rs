// Copyright (c) 2026 Meridian Labs. MIT License.
// See LICENSE for details.

//! # Meridian Client SDK
//!
//! The client-side core for the Meridian proof-of-stake network: assemble,
//! sign, and submit transactions to a quorum of miners, then independently
//! prove — not ask — that the network finalized them.
//!
//! Trust is the organizing principle here, specifically the absence of it.
//! No single miner is believed about acceptance; no single sharder is
//! believed about inclusion. Acceptance takes a threshold of miner
//! acknowledgements. Inclusion takes a sharder quorum *and* two Merkle
//! proofs *and* a recomputed block hash *and* a verified chain extension
//! past the confirmation round. Every answer a node gives is checked against
//! math the client runs itself.
//!
//! ## Architecture
//!
//! - **crypto** — SHA3 hashing and the polymorphic signature scheme
//!   (single-signer Ed25519, aggregating BLS). Don't roll your own.
//! - **wallet** — identity container: client id, keys, mnemonic.
//! - **merkle** — leaf-against-root path verification.
//! - **network** — the quorum client: sample, fan out, reduce.
//! - **transaction** — the entity, the submission engine, the confirmation
//!   engine, and the split-wallet remote signer.
//! - **config** — the immutable, validated configuration injected into every
//!   transaction at construction.
//!
//! ## A complete round trip
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use meridian_client::config::ClientConfig;
//! use meridian_client::crypto::{SchemeKind, SignatureScheme};
//! use meridian_client::transaction::{Status, Transaction, TransactionCallback};
//!
//! struct Printer;
//! impl TransactionCallback for Printer {
//!     fn on_transaction_complete(&self, t: &Transaction, status: Status) {
//!         println!("submitted: {:?} hash={}", status, t.get_transaction_hash());
//!     }
//!     fn on_verify_complete(&self, t: &Transaction, status: Status) {
//!         println!("verified: {:?} {}", status, t.get_verify_output());
//!     }
//!     fn on_auth_complete(&self, _t: &Transaction, status: Status) {
//!         println!("auth: {:?}", status);
//!     }
//! }
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let wallet = SignatureScheme::new(SchemeKind::Ed25519).generate_keys(1)?;
//! let config = ClientConfig::builder()
//!     .signature_scheme("ed25519")
//!     .chain_id("meridian-mainnet")
//!     .miners(vec!["https://miner1.meridian.network".into()])
//!     .sharders(vec!["https://sharder1.meridian.network".into()])
//!     .wallet(wallet)
//!     .build()?;
//!
//! let txn = Transaction::new(Arc::clone(&config), Some(Arc::new(Printer)), 0);
//! txn.send("recipient-client-id", 100, "two coffees")?;
//! // ... after on_transaction_complete(SUCCESS):
//! txn.verify()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Design ground rules
//!
//! 1. Configuration is validated once and immutable after; there is no
//!    ambient global state to make two tests disagree.
//! 2. Completion is signaled exactly once per submission and once per
//!    verify, via the caller's callback, never by polling.
//! 3. Anything received from a node is hashed and voted on in the exact
//!    bytes received. Re-serialization does not get a vote.

pub mod config;
pub mod crypto;
pub mod merkle;
pub mod network;
pub mod transaction;
pub mod wallet;

pub use config::{ClientConfig, ConfigError};
pub use crypto::{CryptoError, SchemeKind, SignatureScheme};
pub use transaction::{Status, Transaction, TransactionCallback, TransactionError};
pub use wallet::{KeyPair, Wallet};
