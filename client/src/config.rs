//! # Client Configuration & Protocol Constants
//!
//! Every knob and every magic address the SDK knows about lives here. The
//! configuration is built once, validated once, and from then on is an
//! immutable value injected into each transaction at construction — no
//! ambient globals, no hidden coupling, and tests that behave the same way
//! twice.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::crypto::scheme::{CryptoError, SchemeKind};
use crate::wallet::Wallet;

// ---------------------------------------------------------------------------
// Well-known contract addresses
// ---------------------------------------------------------------------------

/// Token faucet contract. Devnet-only economics, mainnet-grade plumbing.
pub const FAUCET_CONTRACT_ADDRESS: &str =
    "87c0e5db4a6cb778ecf2bdf3519f41fd93604ff4ce20c5cc67b8a5eef1b3c901";

/// Interest pool contract: token locking and interest accrual.
pub const INTEREST_POOL_CONTRACT_ADDRESS: &str =
    "8010e86d345634ca49d700843da8f503db449308820c70367b9b15b0655900e5";

/// Miner contract: stake and delegate pool management.
pub const MINER_CONTRACT_ADDRESS: &str =
    "647f74f8faaa6f9c4db67b91f96c46789b1b4d6ee4125c94f650f1404ef159ab";

/// Multisig contract: group wallet registration and vote casting.
pub const MULTISIG_CONTRACT_ADDRESS: &str =
    "bf742a25482b584a1a9ee53b615011ccec16f9ce6ccd6221da1814fe7dae80c1";

// ---------------------------------------------------------------------------
// Smart-contract method names
// ---------------------------------------------------------------------------

/// Interest pool: lock tokens for a duration.
pub const LOCK_METHOD: &str = "lock";
/// Interest pool: release a previously locked pool.
pub const UNLOCK_METHOD: &str = "unlock";
/// Miner contract: stake tokens on a node.
pub const STAKE_METHOD: &str = "addToDelegatePool";
/// Miner contract: withdraw a stake pool.
pub const DELETE_STAKE_METHOD: &str = "deleteFromDelegatePool";
/// Multisig contract: register a group wallet.
pub const MULTISIG_REGISTER_METHOD: &str = "register";
/// Multisig contract: cast a vote from a signer wallet.
pub const MULTISIG_VOTE_METHOD: &str = "vote";

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// Default submission success threshold, in percent. Deliberately low: the
/// network tolerates a majority of sampled miners being down as long as a
/// quarter accept the transaction. Finality comes from verification, not
/// from submission breadth.
pub const DEFAULT_CONSENSUS_THRESHOLD: f32 = 25.0;

/// Default chain-extension depth required before inclusion counts as final.
pub const DEFAULT_MIN_CHAIN_LENGTH: i64 = 3;

/// Default transaction expiration window, in seconds. A transaction not
/// confirmed within this window of its creation date is abandoned.
pub const DEFAULT_TXN_EXPIRATION_SECONDS: i64 = 60;

/// Default wait between confirmation retries.
pub const DEFAULT_WAIT: Duration = Duration::from_secs(5);

/// Default per-request HTTP timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors produced while validating a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// `signature_scheme` has no default; an unset scheme is a deployment
    /// error.
    #[error("signature scheme is not set")]
    SignatureSchemeNotSet,

    /// The scheme string did not parse (see
    /// [`CryptoError::UnknownSignatureScheme`]).
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    /// The consensus threshold must lie in (0, 100].
    #[error("consensus threshold must be in (0, 100], got {0}")]
    InvalidThreshold(f32),

    /// No miners configured; there is nowhere to submit.
    #[error("no miners configured")]
    NoMiners,

    /// No sharders configured; there is no one to confirm.
    #[error("no sharders configured")]
    NoSharders,

    /// Split-wallet mode requires an auth URL.
    #[error("auth url is required when split wallet is enabled")]
    AuthUrlNotSet,

    /// The configuration carries no wallet to sign with.
    #[error("wallet is not set")]
    WalletNotSet,
}

// ---------------------------------------------------------------------------
// ClientConfig
// ---------------------------------------------------------------------------

/// The validated, immutable SDK configuration.
///
/// Construct through [`ClientConfig::builder`]; the builder applies defaults
/// and `build()` enforces the invariants, so a `ClientConfig` in hand is
/// always internally consistent.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Which signature scheme signs and verifies for this process.
    pub scheme: SchemeKind,
    /// Chain identifier copied into every transaction.
    pub chain_id: String,
    /// Miner base URLs (transaction intake).
    pub miners: Vec<String>,
    /// Sharder base URLs (confirmation queries).
    pub sharders: Vec<String>,
    /// Fraction of sampled miners (percent) that must accept a submission.
    pub consensus_threshold: f32,
    /// How many miners to sample per broadcast.
    pub min_miners_submit: usize,
    /// How many sharders to query when escalating past a single probe.
    pub min_sharders_verify: usize,
    /// How many rounds past the confirmation the chain must extend.
    pub min_required_chain_length: i64,
    /// Transaction expiration window in seconds.
    pub txn_expiration_seconds: i64,
    /// Pause between confirmation retries.
    pub wait_time: Duration,
    /// Per-request HTTP timeout.
    pub request_timeout: Duration,
    /// Whether signing is delegated to a remote auth service.
    pub is_split_wallet: bool,
    /// Auth service base URL; present iff `is_split_wallet`.
    pub auth_url: Option<String>,
    /// The process wallet. Read-only for the process lifetime.
    pub wallet: Wallet,
}

impl ClientConfig {
    /// Starts a builder with all defaults applied.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }
}

/// Builder for [`ClientConfig`]. Unset counts are derived from the peer
/// lists at build time: sample all miners, escalate to half the sharders.
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    signature_scheme: Option<String>,
    chain_id: String,
    miners: Vec<String>,
    sharders: Vec<String>,
    consensus_threshold: Option<f32>,
    min_miners_submit: Option<usize>,
    min_sharders_verify: Option<usize>,
    min_required_chain_length: Option<i64>,
    txn_expiration_seconds: Option<i64>,
    wait_time: Option<Duration>,
    request_timeout: Option<Duration>,
    is_split_wallet: bool,
    auth_url: Option<String>,
    wallet: Option<Wallet>,
}

impl ClientConfigBuilder {
    /// Sets the signature scheme by its configuration string
    /// (`"ed25519"` or `"bls0chain"`).
    pub fn signature_scheme(mut self, name: &str) -> Self {
        self.signature_scheme = Some(name.to_string());
        self
    }

    /// Sets the chain id.
    pub fn chain_id(mut self, chain_id: &str) -> Self {
        self.chain_id = chain_id.to_string();
        self
    }

    /// Sets the miner URL list.
    pub fn miners(mut self, miners: Vec<String>) -> Self {
        self.miners = miners;
        self
    }

    /// Sets the sharder URL list.
    pub fn sharders(mut self, sharders: Vec<String>) -> Self {
        self.sharders = sharders;
        self
    }

    /// Sets the submission success threshold in percent.
    pub fn consensus_threshold(mut self, percent: f32) -> Self {
        self.consensus_threshold = Some(percent);
        self
    }

    /// Sets how many miners each broadcast samples.
    pub fn min_miners_submit(mut self, count: usize) -> Self {
        self.min_miners_submit = Some(count);
        self
    }

    /// Sets how many sharders an escalated confirmation query samples.
    pub fn min_sharders_verify(mut self, count: usize) -> Self {
        self.min_sharders_verify = Some(count);
        self
    }

    /// Sets the required chain-extension depth.
    pub fn min_required_chain_length(mut self, rounds: i64) -> Self {
        self.min_required_chain_length = Some(rounds);
        self
    }

    /// Sets the transaction expiration window in seconds.
    pub fn txn_expiration_seconds(mut self, seconds: i64) -> Self {
        self.txn_expiration_seconds = Some(seconds);
        self
    }

    /// Sets the confirmation retry pause.
    pub fn wait_time(mut self, wait: Duration) -> Self {
        self.wait_time = Some(wait);
        self
    }

    /// Sets the per-request HTTP timeout.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Enables split-wallet mode (remote signing via `auth_url`).
    pub fn split_wallet(mut self, enabled: bool) -> Self {
        self.is_split_wallet = enabled;
        self
    }

    /// Sets the auth service URL for split-wallet mode.
    pub fn auth_url(mut self, url: &str) -> Self {
        self.auth_url = Some(url.to_string());
        self
    }

    /// Sets the process wallet.
    pub fn wallet(mut self, wallet: Wallet) -> Self {
        self.wallet = Some(wallet);
        self
    }

    /// Validates and freezes the configuration.
    pub fn build(self) -> Result<Arc<ClientConfig>, ConfigError> {
        let scheme_name = self
            .signature_scheme
            .ok_or(ConfigError::SignatureSchemeNotSet)?;
        let scheme = SchemeKind::parse(&scheme_name)?;

        if self.miners.is_empty() {
            return Err(ConfigError::NoMiners);
        }
        if self.sharders.is_empty() {
            return Err(ConfigError::NoSharders);
        }

        let consensus_threshold = self
            .consensus_threshold
            .unwrap_or(DEFAULT_CONSENSUS_THRESHOLD);
        if !(consensus_threshold > 0.0 && consensus_threshold <= 100.0) {
            return Err(ConfigError::InvalidThreshold(consensus_threshold));
        }

        if self.is_split_wallet && self.auth_url.is_none() {
            return Err(ConfigError::AuthUrlNotSet);
        }

        let wallet = self.wallet.ok_or(ConfigError::WalletNotSet)?;

        let min_miners_submit = self
            .min_miners_submit
            .unwrap_or(self.miners.len())
            .clamp(1, self.miners.len());
        let min_sharders_verify = self
            .min_sharders_verify
            .unwrap_or_else(|| (self.sharders.len() / 2).max(1))
            .clamp(1, self.sharders.len());

        Ok(Arc::new(ClientConfig {
            scheme,
            chain_id: self.chain_id,
            miners: self.miners,
            sharders: self.sharders,
            consensus_threshold,
            min_miners_submit,
            min_sharders_verify,
            min_required_chain_length: self
                .min_required_chain_length
                .unwrap_or(DEFAULT_MIN_CHAIN_LENGTH),
            txn_expiration_seconds: self
                .txn_expiration_seconds
                .unwrap_or(DEFAULT_TXN_EXPIRATION_SECONDS),
            wait_time: self.wait_time.unwrap_or(DEFAULT_WAIT),
            request_timeout: self.request_timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT),
            is_split_wallet: self.is_split_wallet,
            auth_url: self.auth_url,
            wallet,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wallet::KeyPair;

    fn test_wallet() -> Wallet {
        Wallet {
            client_id: "cid".into(),
            client_key: "ckey".into(),
            keys: vec![KeyPair {
                public_key: "ckey".into(),
                private_key: "priv".into(),
            }],
            mnemonic: String::new(),
            version: "1.0".into(),
            date_created: String::new(),
        }
    }

    fn base_builder() -> ClientConfigBuilder {
        ClientConfig::builder()
            .signature_scheme("ed25519")
            .chain_id("meridian-devnet")
            .miners(vec!["http://m1".into(), "http://m2".into()])
            .sharders(vec!["http://s1".into(), "http://s2".into(), "http://s3".into()])
            .wallet(test_wallet())
    }

    #[test]
    fn defaults_applied() {
        let cfg = base_builder().build().unwrap();
        assert_eq!(cfg.consensus_threshold, DEFAULT_CONSENSUS_THRESHOLD);
        assert_eq!(cfg.min_miners_submit, 2);
        assert_eq!(cfg.min_sharders_verify, 1);
        assert_eq!(cfg.min_required_chain_length, DEFAULT_MIN_CHAIN_LENGTH);
        assert_eq!(cfg.txn_expiration_seconds, DEFAULT_TXN_EXPIRATION_SECONDS);
        assert_eq!(cfg.wait_time, DEFAULT_WAIT);
    }

    #[test]
    fn scheme_is_required() {
        let result = ClientConfig::builder()
            .miners(vec!["http://m1".into()])
            .sharders(vec!["http://s1".into()])
            .wallet(test_wallet())
            .build();
        assert!(matches!(result, Err(ConfigError::SignatureSchemeNotSet)));
    }

    #[test]
    fn unknown_scheme_rejected() {
        let result = base_builder().signature_scheme("rot13").build();
        assert!(matches!(result, Err(ConfigError::Crypto(_))));
    }

    #[test]
    fn threshold_bounds_enforced() {
        assert!(matches!(
            base_builder().consensus_threshold(0.0).build(),
            Err(ConfigError::InvalidThreshold(_))
        ));
        assert!(matches!(
            base_builder().consensus_threshold(100.5).build(),
            Err(ConfigError::InvalidThreshold(_))
        ));
        assert!(base_builder().consensus_threshold(100.0).build().is_ok());
    }

    #[test]
    fn split_wallet_requires_auth_url() {
        assert!(matches!(
            base_builder().split_wallet(true).build(),
            Err(ConfigError::AuthUrlNotSet)
        ));
        assert!(base_builder()
            .split_wallet(true)
            .auth_url("http://auth")
            .build()
            .is_ok());
    }

    #[test]
    fn peer_lists_required() {
        let no_miners = ClientConfig::builder()
            .signature_scheme("ed25519")
            .sharders(vec!["http://s1".into()])
            .wallet(test_wallet())
            .build();
        assert!(matches!(no_miners, Err(ConfigError::NoMiners)));

        let no_sharders = ClientConfig::builder()
            .signature_scheme("ed25519")
            .miners(vec!["http://m1".into()])
            .wallet(test_wallet())
            .build();
        assert!(matches!(no_sharders, Err(ConfigError::NoSharders)));
    }

    #[test]
    fn counts_clamped_to_peer_lists() {
        let cfg = base_builder()
            .min_miners_submit(99)
            .min_sharders_verify(99)
            .build()
            .unwrap();
        assert_eq!(cfg.min_miners_submit, 2);
        assert_eq!(cfg.min_sharders_verify, 3);
    }
}
