//! # Split-Wallet Remote Signing
//!
//! In split-wallet mode the private key never enters this process: signing
//! is a round-trip to an auth service that holds the key and (typically)
//! asks a human. The SDK supplies the transaction hash, waits, and treats
//! the three ways that can go wrong as three distinct errors — a timeout is
//! not a denial, and a denial is not a forgery.
//!
//! The auth protocol itself is a narrow contract: one POST, one JSON field.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Errors from the remote signing round-trip.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The auth service did not answer within the timeout.
    #[error("auth timed out")]
    AuthTimeout,

    /// The auth service answered with an explicit denial.
    #[error("rejected by user")]
    UserRejected,

    /// The returned signature does not verify under the wallet's key, or
    /// the response was missing one.
    #[error("verification failed for auth response")]
    AuthVerifyFailed,

    /// Transport-level failure other than a timeout.
    #[error("auth transport error: {0}")]
    Transport(String),
}

#[derive(Deserialize)]
struct SignResponse {
    #[serde(default)]
    signature: String,
}

/// Client for the auth service's signing endpoint.
pub struct RemoteSigner {
    http: Client,
    auth_url: String,
}

impl RemoteSigner {
    /// Creates a signer for the given auth service base URL.
    pub fn new(auth_url: &str, timeout: Duration) -> Self {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();
        Self {
            http,
            auth_url: auth_url.trim_end_matches('/').to_string(),
        }
    }

    /// Requests a signature over `hash` on behalf of `client_id`.
    ///
    /// Returns the hex signature on HTTP 200. 401/403 map to
    /// [`AuthError::UserRejected`]; a missing signature field maps to
    /// [`AuthError::AuthVerifyFailed`]. The caller still must verify the
    /// signature cryptographically — a 200 is a claim, not a proof.
    pub async fn sign(&self, client_id: &str, hash: &str) -> Result<String, AuthError> {
        let url = format!("{}/v1/transaction/sign", self.auth_url);
        debug!(%url, %hash, "requesting remote signature");

        let response = self
            .http
            .post(&url)
            .json(&serde_json::json!({ "client_id": client_id, "hash": hash }))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AuthError::AuthTimeout
                } else {
                    AuthError::Transport(e.to_string())
                }
            })?;

        match response.status().as_u16() {
            200 => {
                let parsed: SignResponse = response
                    .json()
                    .await
                    .map_err(|_| AuthError::AuthVerifyFailed)?;
                if parsed.signature.is_empty() {
                    return Err(AuthError::AuthVerifyFailed);
                }
                Ok(parsed.signature)
            }
            401 | 403 => Err(AuthError::UserRejected),
            other => Err(AuthError::Transport(format!("auth returned status {}", other))),
        }
    }
}
