//! # Merkle Path Verification
//!
//! The client never builds Merkle trees — sharders do that. It only checks
//! that a leaf it cares about (a transaction hash, a receipt hash) really
//! sits under a root it has voted on. That check is a pure function: walk
//! the supplied sibling path from the leaf upward, combining left/right by
//! the leaf index's parity at each level, and compare the result to the root.
//!
//! Node hashes are hex strings and combination is SHA3-256 over the
//! concatenated hex text, matching how the chain serializes tree nodes.

use serde::{Deserialize, Serialize};

use crate::crypto::hash::hash;

/// A sibling path from a leaf to (one level below) the root.
///
/// `nodes[i]` is the sibling at level `i`; `leaf_index` locates the leaf in
/// the bottom level, and its successive halvings locate the running hash at
/// each level above.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerklePath {
    /// Sibling hashes, leaf level first.
    #[serde(default)]
    pub nodes: Vec<String>,
    /// Index of the leaf within the bottom level.
    #[serde(default)]
    pub leaf_index: usize,
}

/// Combines two node hashes into their parent.
pub fn merkle_hash(left: &str, right: &str) -> String {
    hash(&format!("{}{}", left, right))
}

/// Verifies that `leaf` hashes up through `path` to exactly `root`.
///
/// Same inputs, same answer — no I/O, no state. An empty path verifies iff
/// the leaf *is* the root (single-leaf tree).
pub fn verify_merkle_path(leaf: &str, path: &MerklePath, root: &str) -> bool {
    let mut running = leaf.to_string();
    let mut index = path.leaf_index;
    for sibling in &path.nodes {
        running = if index & 1 == 1 {
            merkle_hash(sibling, &running)
        } else {
            merkle_hash(&running, sibling)
        };
        index /= 2;
    }
    running == root
}
