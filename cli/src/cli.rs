//! # CLI Interface
//!
//! Command-line argument structure for the `meridian` binary using `clap`
//! derive. Wallet management plus the two halves of the transaction
//! lifecycle: submit and verify.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Meridian network command-line client.
///
/// Creates and recovers wallets, submits transactions to miners, and
/// verifies their finality against sharders.
#[derive(Parser, Debug)]
#[command(
    name = "meridian",
    about = "Meridian network client",
    version,
    propagate_version = true
)]
pub struct MeridianCli {
    /// Log verbosity level: trace, debug, info, warn, error.
    #[arg(long, env = "MERIDIAN_LOG_LEVEL", default_value = "info", global = true)]
    pub log_level: String,

    /// Log format: pretty or json.
    #[arg(long, env = "MERIDIAN_LOG_FORMAT", default_value = "pretty", global = true)]
    pub log_format: String,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Wallet management.
    #[command(subcommand)]
    Wallet(WalletCommands),
    /// Send tokens to another client.
    Send(SendArgs),
    /// Verify a previously submitted transaction by hash.
    Verify(VerifyArgs),
    /// Print version information and exit.
    Version,
}

/// Wallet subcommands.
#[derive(Subcommand, Debug)]
pub enum WalletCommands {
    /// Generate a fresh wallet and print it as JSON.
    Create(WalletCreateArgs),
    /// Re-derive a wallet from an existing mnemonic.
    Recover(WalletRecoverArgs),
}

/// Arguments for `wallet create`.
#[derive(Args, Debug)]
pub struct WalletCreateArgs {
    /// Signature scheme: ed25519 or bls0chain.
    #[arg(long, default_value = "ed25519")]
    pub scheme: String,

    /// Number of key pairs to derive.
    #[arg(long, default_value_t = 1)]
    pub keys: usize,

    /// Write the wallet JSON to this file instead of stdout.
    #[arg(long, short = 'o')]
    pub out: Option<PathBuf>,
}

/// Arguments for `wallet recover`.
#[derive(Args, Debug)]
pub struct WalletRecoverArgs {
    /// The BIP-39 mnemonic phrase, quoted.
    #[arg(long)]
    pub mnemonic: String,

    /// Signature scheme: ed25519 or bls0chain.
    #[arg(long, default_value = "ed25519")]
    pub scheme: String,

    /// Number of key pairs to derive.
    #[arg(long, default_value_t = 1)]
    pub keys: usize,

    /// Write the wallet JSON to this file instead of stdout.
    #[arg(long, short = 'o')]
    pub out: Option<PathBuf>,
}

/// Shared network/config/wallet file arguments.
#[derive(Args, Debug)]
pub struct NetworkArgs {
    /// Path to the network configuration JSON.
    #[arg(long, short = 'c', env = "MERIDIAN_CONFIG", default_value = "config.json")]
    pub config: PathBuf,

    /// Path to the wallet JSON.
    #[arg(long, short = 'w', env = "MERIDIAN_WALLET", default_value = "wallet.json")]
    pub wallet: PathBuf,
}

/// Arguments for `send`.
#[derive(Args, Debug)]
pub struct SendArgs {
    #[command(flatten)]
    pub network: NetworkArgs,

    /// Recipient client id.
    #[arg(long)]
    pub to: String,

    /// Amount to send, in the smallest token unit.
    #[arg(long)]
    pub value: i64,

    /// Free-text description attached to the transaction.
    #[arg(long, default_value = "")]
    pub desc: String,

    /// Transaction fee.
    #[arg(long, default_value_t = 0)]
    pub fee: i64,

    /// Also verify the transaction after submission succeeds.
    #[arg(long)]
    pub verify: bool,
}

/// Arguments for `verify`.
#[derive(Args, Debug)]
pub struct VerifyArgs {
    #[command(flatten)]
    pub network: NetworkArgs,

    /// Transaction hash to verify.
    #[arg(long)]
    pub hash: String,
}
