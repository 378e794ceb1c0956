//! # Cryptographic Primitives
//!
//! Everything that touches key material or digests lives under this module:
//!
//! - [`hash`] — SHA3-256/512 helpers (the chain hash function).
//! - [`scheme`] — the polymorphic signature scheme and wallet derivation.
//! - [`ed25519`] — single-signer scheme on Curve25519.
//! - [`bls`] — aggregating threshold scheme on BLS12-381.
//!
//! The rest of the SDK talks to [`scheme::SignatureScheme`] and never to a
//! curve directly. That boundary is what lets one transaction pipeline serve
//! single-signer and threshold wallets without knowing which it has.

pub mod bls;
pub mod ed25519;
pub mod hash;
pub mod scheme;

pub use scheme::{CryptoError, SchemeKind, SignatureScheme};
