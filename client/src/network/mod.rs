//! # Network Layer
//!
//! The SDK's only I/O: HTTP fan-out to miners and sharders through the
//! [`quorum`] client. Endpoint paths are fixed here because they are part of
//! the node API contract, not something callers choose.

pub mod quorum;

pub use quorum::{PeerResponse, QuorumClient, QuorumError, VoteSet};

/// Miner endpoint accepting a transaction body.
pub const PUT_TRANSACTION: &str = "/v1/transaction/put";

/// Sharder endpoint answering confirmation queries by transaction hash.
pub const GET_CONFIRMATION: &str = "/v1/transaction/get/confirmation";

/// Sharder endpoint answering block queries by round.
pub const GET_BLOCK: &str = "/v1/block/get";
