//! # Hashing Utilities
//!
//! SHA3-256 is the Meridian chain hash function. Transaction hashes, block
//! hashes, Merkle node combination, client ids, and sharder vote keys all go
//! through it, and they all use the lowercase-hex textual form — the chain
//! addresses entities by hex digest, so the string form *is* the canonical
//! form on the wire.
//!
//! SHA3-512 appears in exactly one place: widening a 32-byte key seed into
//! the 64 bytes needed for unbiased BLS scalar reduction.

use sha3::{Digest, Sha3_256, Sha3_512};

/// SHA3-256 of a UTF-8 string, hex-encoded.
///
/// This is the workhorse for every colon-joined preimage in the protocol
/// (transaction hashes, block hashes, receipt hashes).
///
/// # Example
///
/// ```
/// use meridian_client::crypto::hash::hash;
///
/// let digest = hash("hello");
/// assert_eq!(digest.len(), 64);
/// ```
pub fn hash(data: &str) -> String {
    hash_bytes(data.as_bytes())
}

/// SHA3-256 of raw bytes, hex-encoded.
///
/// Used where the preimage is binary: public key bytes for client-id
/// derivation, and the raw sharder response bytes used as vote keys.
pub fn hash_bytes(data: &[u8]) -> String {
    let mut hasher = Sha3_256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// SHA3-256 of raw bytes as a fixed-size array.
///
/// For call sites that feed the digest into further key derivation rather
/// than onto the wire.
pub fn hash_bytes_raw(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha3_256::new();
    hasher.update(data);
    let mut out = [0u8; 32];
    out.copy_from_slice(&hasher.finalize());
    out
}

/// SHA3-512 of raw bytes as a fixed-size array.
///
/// 64 bytes of output, wide enough for `Scalar::from_bytes_wide` to reduce
/// without modular bias.
pub fn hash_bytes_wide(data: &[u8]) -> [u8; 64] {
    let mut hasher = Sha3_512::new();
    hasher.update(data);
    let mut out = [0u8; 64];
    out.copy_from_slice(&hasher.finalize());
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha3_256_known_vector() {
        // SHA3-256 of the empty string, per FIPS 202.
        assert_eq!(
            hash(""),
            "a7ffc6f8bf1ed76651c14756a061d662f580ff4de43b49fa82d80a4b80f8434a"
        );
    }

    #[test]
    fn hash_is_deterministic() {
        assert_eq!(hash("meridian"), hash("meridian"));
        assert_ne!(hash("meridian"), hash("Meridian"));
    }

    #[test]
    fn string_and_byte_forms_agree() {
        assert_eq!(hash("payload"), hash_bytes(b"payload"));
        assert_eq!(hash_bytes(b"payload"), hex::encode(hash_bytes_raw(b"payload")));
    }

    #[test]
    fn wide_hash_is_64_bytes() {
        let wide = hash_bytes_wide(b"seed material");
        assert_eq!(wide.len(), 64);
        // First half must not equal the 256-bit digest — different functions.
        assert_ne!(hex::encode(&wide[..32]), hash_bytes(b"seed material"));
    }
}
