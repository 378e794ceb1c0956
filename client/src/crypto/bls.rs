//! # BLS Threshold Scheme
//!
//! The aggregating scheme, for wallets whose signing authority is split
//! across parties. Minimal-signature-size BLS on BLS12-381: signatures live
//! in G1 (48 bytes compressed), public keys in G2 (96 bytes compressed), and
//! aggregation is literally point addition — which is the entire reason this
//! curve earns its keep here.
//!
//! Hashing to G1 uses the standard `ExpandMsgXmd<Sha256>` suite with a
//! Meridian domain-separation tag. The tag is part of the wire contract:
//! change it and every existing signature on the network stops verifying.

use bls12_381::hash_to_curve::{ExpandMsgXmd, HashToCurve};
use bls12_381::{pairing, G1Affine, G1Projective, G2Affine, G2Projective, Scalar};
use group::Curve;
use sha2::Sha256;

use super::hash::hash_bytes_wide;
use super::scheme::{decode_fixed, CryptoError};
use crate::wallet::KeyPair;

/// Domain separation tag for hash-to-G1, following the RFC 9380 naming
/// convention.
const DST: &[u8] = b"MERIDIAN-V01-CS01-with-BLS12381G1_XMD:SHA-256_SSWU_RO_";

/// BLS signer/verifier state.
#[derive(Default)]
pub struct BlsScheme {
    secret: Option<Scalar>,
    public: Option<G2Affine>,
}

/// Hashes message bytes to a G1 point.
fn hash_to_g1(message: &[u8]) -> G1Projective {
    <G1Projective as HashToCurve<ExpandMsgXmd<Sha256>>>::hash_to_curve(message, DST)
}

impl BlsScheme {
    /// Creates an empty scheme instance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Derives a key pair from a 32-byte seed.
    ///
    /// The seed is widened to 64 bytes with SHA3-512 before scalar reduction
    /// so the resulting secret is uniform over the field.
    pub(crate) fn keypair_from_seed(seed: &[u8; 32]) -> KeyPair {
        let secret = Scalar::from_bytes_wide(&hash_bytes_wide(seed));
        let public = (G2Projective::generator() * secret).to_affine();
        KeyPair {
            public_key: hex::encode(public.to_compressed()),
            private_key: hex::encode(secret.to_bytes()),
        }
    }

    /// Sets the secret scalar from its 32-byte little-endian hex encoding
    /// and re-derives the public key.
    pub fn set_private_key(&mut self, private_key_hex: &str) -> Result<(), CryptoError> {
        let bytes: [u8; 32] = decode_fixed(private_key_hex)?;
        let secret = Option::<Scalar>::from(Scalar::from_bytes(&bytes))
            .ok_or_else(|| CryptoError::InvalidKey("scalar out of field range".to_string()))?;
        self.public = Some((G2Projective::generator() * secret).to_affine());
        self.secret = Some(secret);
        Ok(())
    }

    /// Sets the public key from its 96-byte compressed-G2 hex encoding.
    pub fn set_public_key(&mut self, public_key_hex: &str) -> Result<(), CryptoError> {
        let bytes: [u8; 96] = decode_fixed(public_key_hex)?;
        let public = Option::<G2Affine>::from(G2Affine::from_compressed(&bytes))
            .ok_or_else(|| CryptoError::InvalidKey("not a valid G2 point".to_string()))?;
        self.public = Some(public);
        Ok(())
    }

    /// Signs the raw bytes of a hex digest: `sig = sk * H(m)`.
    pub fn sign(&self, hash_hex: &str) -> Result<String, CryptoError> {
        let secret = self.secret.as_ref().ok_or(CryptoError::MissingPrivateKey)?;
        let message =
            hex::decode(hash_hex).map_err(|e| CryptoError::MalformedHex(e.to_string()))?;
        let signature = (hash_to_g1(&message) * secret).to_affine();
        Ok(hex::encode(signature.to_compressed()))
    }

    /// Verifies via the pairing equation `e(sig, g2) == e(H(m), pk)`.
    pub fn verify(&self, signature_hex: &str, hash_hex: &str) -> Result<bool, CryptoError> {
        let public = self.public.as_ref().ok_or(CryptoError::MissingPublicKey)?;
        let message =
            hex::decode(hash_hex).map_err(|e| CryptoError::MalformedHex(e.to_string()))?;

        let Some(signature) = decode_g1(signature_hex) else {
            return Ok(false);
        };
        let digest_point = hash_to_g1(&message).to_affine();
        Ok(pairing(&signature, &G2Affine::generator()) == pairing(&digest_point, public))
    }

    /// Aggregates this signer's signature over `hash_hex` into the supplied
    /// running aggregate: `agg' = agg + sk * H(m)`.
    ///
    /// The aggregate verifies under the sum of the participating public
    /// keys, which is what makes k-of-n signing ceremonies composable.
    pub fn add(&self, signature_hex: &str, hash_hex: &str) -> Result<String, CryptoError> {
        let own = self.sign(hash_hex)?;
        let aggregate = decode_g1(signature_hex).ok_or_else(|| {
            CryptoError::InvalidSignature("aggregate is not a valid G1 point".to_string())
        })?;
        let own_point = decode_g1(&own).ok_or_else(|| {
            CryptoError::InvalidSignature("own signature is not a valid G1 point".to_string())
        })?;
        let combined = (G1Projective::from(aggregate) + G1Projective::from(own_point)).to_affine();
        Ok(hex::encode(combined.to_compressed()))
    }
}

/// Decodes a compressed G1 hex string, returning `None` on any malformation.
fn decode_g1(hex_str: &str) -> Option<G1Affine> {
    let bytes = hex::decode(hex_str).ok()?;
    let arr = <[u8; 48]>::try_from(bytes.as_slice()).ok()?;
    Option::<G1Affine>::from(G1Affine::from_compressed(&arr))
}
