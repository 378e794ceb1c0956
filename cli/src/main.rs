// Copyright (c) 2026 Meridian Labs. MIT License.
// See LICENSE for details.

//! # Meridian CLI
//!
//! Entry point for the `meridian` binary. Parses CLI arguments, initializes
//! logging, and drives the client SDK:
//!
//! - `wallet create`  — generate a fresh wallet
//! - `wallet recover` — re-derive a wallet from a mnemonic
//! - `send`           — submit a token transfer and await the outcome
//! - `verify`         — confirm a transaction's finality by hash
//! - `version`        — print build version information

mod cli;
mod logging;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::Deserialize;
use tokio::sync::mpsc;

use meridian_client::config::ClientConfig;
use meridian_client::crypto::SignatureScheme;
use meridian_client::transaction::{Status, Transaction, TransactionCallback};
use meridian_client::wallet::Wallet;

use cli::{Commands, MeridianCli, WalletCommands};
use logging::LogFormat;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = MeridianCli::parse();
    logging::init_logging(
        &format!("meridian={0},meridian_client={0}", cli.log_level),
        LogFormat::from_str_lossy(&cli.log_format),
    );

    match cli.command {
        Commands::Wallet(WalletCommands::Create(args)) => {
            let scheme = SignatureScheme::from_config(&args.scheme)?;
            let wallet = scheme.generate_keys(args.keys)?;
            emit_wallet(&wallet, args.out.as_deref())
        }
        Commands::Wallet(WalletCommands::Recover(args)) => {
            let scheme = SignatureScheme::from_config(&args.scheme)?;
            let wallet = scheme.recover_keys(&args.mnemonic, args.keys)?;
            emit_wallet(&wallet, args.out.as_deref())
        }
        Commands::Send(args) => run_send(args).await,
        Commands::Verify(args) => run_verify(args).await,
        Commands::Version => {
            println!("meridian {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

// ---------------------------------------------------------------------------
// Configuration file
// ---------------------------------------------------------------------------

/// The on-disk network configuration. Mirrors the SDK builder; unset fields
/// fall back to the SDK defaults.
#[derive(Debug, Deserialize)]
struct ConfigFile {
    signature_scheme: String,
    #[serde(default)]
    chain_id: String,
    miners: Vec<String>,
    sharders: Vec<String>,
    consensus_threshold: Option<f32>,
    min_miners_submit: Option<usize>,
    min_sharders_verify: Option<usize>,
    min_required_chain_length: Option<i64>,
    txn_expiration_seconds: Option<i64>,
    wait_seconds: Option<u64>,
    #[serde(default)]
    is_split_wallet: bool,
    auth_url: Option<String>,
}

/// Loads and validates the network configuration plus the wallet file.
fn load_config(config_path: &Path, wallet_path: &Path) -> Result<Arc<ClientConfig>> {
    let raw = std::fs::read_to_string(config_path)
        .with_context(|| format!("failed to read config: {}", config_path.display()))?;
    let file: ConfigFile = serde_json::from_str(&raw)
        .with_context(|| format!("malformed config: {}", config_path.display()))?;

    let wallet_raw = std::fs::read_to_string(wallet_path)
        .with_context(|| format!("failed to read wallet: {}", wallet_path.display()))?;
    let wallet = Wallet::from_json(&wallet_raw)
        .with_context(|| format!("malformed wallet: {}", wallet_path.display()))?;

    let mut builder = ClientConfig::builder()
        .signature_scheme(&file.signature_scheme)
        .chain_id(&file.chain_id)
        .miners(file.miners)
        .sharders(file.sharders)
        .split_wallet(file.is_split_wallet)
        .wallet(wallet);

    if let Some(v) = file.consensus_threshold {
        builder = builder.consensus_threshold(v);
    }
    if let Some(v) = file.min_miners_submit {
        builder = builder.min_miners_submit(v);
    }
    if let Some(v) = file.min_sharders_verify {
        builder = builder.min_sharders_verify(v);
    }
    if let Some(v) = file.min_required_chain_length {
        builder = builder.min_required_chain_length(v);
    }
    if let Some(v) = file.txn_expiration_seconds {
        builder = builder.txn_expiration_seconds(v);
    }
    if let Some(v) = file.wait_seconds {
        builder = builder.wait_time(Duration::from_secs(v));
    }
    if let Some(v) = file.auth_url {
        builder = builder.auth_url(&v);
    }

    Ok(builder.build()?)
}

fn emit_wallet(wallet: &Wallet, out: Option<&Path>) -> Result<()> {
    let json = wallet.to_json()?;
    match out {
        Some(path) => {
            std::fs::write(path, &json)
                .with_context(|| format!("failed to write wallet to {}", path.display()))?;
            tracing::info!(client_id = %wallet.client_id, path = %path.display(), "wallet written");
        }
        None => println!("{}", json),
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Completion plumbing
// ---------------------------------------------------------------------------

/// Which lifecycle event completed.
#[derive(Debug, Clone, Copy)]
enum Event {
    Submitted(Status),
    Verified(Status),
    Auth(Status),
}

/// Forwards callback invocations into a channel the command loop can await.
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

    fn on_auth_complete(&self, _txn: &Transaction, status: Status) {
        let _ = self.tx.send(Event::Auth(status));
    }
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

async fn run_send(args: cli::SendArgs) -> Result<()> {
    let config = load_config(&args.network.config, &args.network.wallet)?;
    let (tx, mut rx) = mpsc::unbounded_channel();
    let txn = Transaction::new(config, Some(Arc::new(ChannelCallback { tx })), args.fee);

    txn.send(&args.to, args.value, &args.desc)?;
    tracing::info!(to = %args.to, value = args.value, "transaction submitted");

    loop {
        let Some(event) = rx.recv().await else {
            bail!("submission task ended without reporting");
        };
        match event {
            Event::Auth(status) => tracing::info!(?status, "auth completed"),
            Event::Submitted(Status::Success) => break,
            Event::Submitted(_) => bail!("submission failed: {}", txn.get_transaction_error()),
            Event::Verified(_) => {}
        }
    }
    println!("hash: {}", txn.get_transaction_hash());

    if args.verify {
        txn.verify()?;
        loop {
            let Some(event) = rx.recv().await else {
                bail!("verification task ended without reporting");
            };
            if let Event::Verified(status) = event {
                if status != Status::Success {
                    bail!("verification failed: {}", txn.get_verify_error());
                }
                break;
            }
        }
        println!("{}", txn.get_verify_output());
    }
    Ok(())
}

async fn run_verify(args: cli::VerifyArgs) -> Result<()> {
    let config = load_config(&args.network.config, &args.network.wallet)?;
    let (tx, mut rx) = mpsc::unbounded_channel();
    let txn = Transaction::new(config, Some(Arc::new(ChannelCallback { tx })), 0);

    txn.set_transaction_hash(&args.hash)?;
    txn.verify()?;

    loop {
        let Some(event) = rx.recv().await else {
            bail!("verification task ended without reporting");
        };
        if let Event::Verified(status) = event {
            if status != Status::Success {
                bail!("verification failed: {}", txn.get_verify_error());
            }
            break;
        }
    }
    println!("{}", txn.get_verify_output());
    Ok(())
}
