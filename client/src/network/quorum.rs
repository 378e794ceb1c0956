//! # Quorum Client
//!
//! The one primitive under both broadcast and confirmation: sample K of N
//! peers uniformly without replacement, hit them all in parallel, and reduce
//! the responses. Two reductions exist:
//!
//! - **Threshold** (submission): succeed once the fraction of HTTP-200
//!   responses reaches the consensus threshold.
//! - **Voting** (confirmation): group responses by a caller-chosen key and
//!   keep the group with the most votes, first-seen winning ties.
//!
//! Each sampled peer gets its own task; all tasks deposit into one bounded
//! channel sized to the fan-out width, so a task can always deliver and then
//! exit. The aggregator stops reading the moment it has a decision — late
//! responses drain into a closed channel and are dropped, never awaited on
//! and never forcibly aborted.

use std::collections::HashMap;
use std::time::Duration;

use rand::seq::SliceRandom;
use reqwest::Client;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Errors from a threshold-mode broadcast.
#[derive(Debug, Error)]
pub enum QuorumError {
    /// Not one sampled peer answered at all.
    #[error("network error: no peer reachable")]
    NetworkUnreachable,

    /// Peers answered, but too few accepted.
    #[error("consensus not reached: {failure_body}")]
    ConsensusNotReached {
        /// The pooled error body from rejecting peers.
        failure_body: String,
    },
}

/// One peer's answer. `status: None` means the request never completed
/// (connect failure, timeout); the peer is unreachable rather than
/// disagreeing.
#[derive(Debug, Clone)]
pub struct PeerResponse {
    /// The peer base URL the request went to.
    pub url: String,
    /// HTTP status, or `None` for a transport failure.
    pub status: Option<u16>,
    /// Response body (empty on transport failure).
    pub body: String,
}

impl PeerResponse {
    /// `true` for an HTTP 200.
    pub fn is_ok(&self) -> bool {
        self.status == Some(200)
    }
}

/// Samples `count` distinct peers uniformly at random.
///
/// Asking for more peers than exist returns them all (shuffled).
pub fn sample_peers(peers: &[String], count: usize) -> Vec<String> {
    let mut rng = rand::thread_rng();
    peers
        .choose_multiple(&mut rng, count.min(peers.len()))
        .cloned()
        .collect()
}

// ---------------------------------------------------------------------------
// QuorumClient
// ---------------------------------------------------------------------------

/// Parallel request dispatcher over a shared HTTP connection pool.
#[derive(Clone)]
pub struct QuorumClient {
    http: Client,
}

impl QuorumClient {
    /// Creates a client whose every request carries `timeout`.
    pub fn new(timeout: Duration) -> Self {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();
        Self { http }
    }

    /// POSTs a JSON body to `{peer}{path}` on every peer. Returns the result
    /// channel; one [`PeerResponse`] arrives per peer, in completion order.
    pub fn post_json(
        &self,
        peers: &[String],
        path: &str,
        body: &serde_json::Value,
    ) -> mpsc::Receiver<PeerResponse> {
        let (tx, rx) = mpsc::channel(peers.len().max(1));
        for peer in peers {
            let url = format!("{}{}", peer, path);
            let http = self.http.clone();
            let body = body.clone();
            let tx = tx.clone();
            tokio::spawn(async move {
                debug!(%url, "dispatching POST");
                let response = match http.post(&url).json(&body).send().await {
                    Ok(res) => {
                        let status = res.status().as_u16();
                        let body = res.text().await.unwrap_or_default();
                        PeerResponse {
                            url,
                            status: Some(status),
                            body,
                        }
                    }
                    Err(e) => {
                        warn!(%url, error = %e, "peer unreachable");
                        PeerResponse {
                            url,
                            status: None,
                            body: String::new(),
                        }
                    }
                };
                let _ = tx.send(response).await;
            });
        }
        rx
    }

    /// GETs `{peer}{path_and_query}` on every peer. Same channel contract as
    /// [`post_json`](Self::post_json).
    pub fn get(&self, peers: &[String], path_and_query: &str) -> mpsc::Receiver<PeerResponse> {
        let (tx, rx) = mpsc::channel(peers.len().max(1));
        for peer in peers {
            let url = format!("{}{}", peer, path_and_query);
            let http = self.http.clone();
            let tx = tx.clone();
            tokio::spawn(async move {
                debug!(%url, "dispatching GET");
                let response = match http.get(&url).send().await {
                    Ok(res) => {
                        let status = res.status().as_u16();
                        let body = res.text().await.unwrap_or_default();
                        PeerResponse {
                            url,
                            status: Some(status),
                            body,
                        }
                    }
                    Err(e) => {
                        warn!(%url, error = %e, "peer unreachable");
                        PeerResponse {
                            url,
                            status: None,
                            body: String::new(),
                        }
                    }
                };
                let _ = tx.send(response).await;
            });
        }
        rx
    }

    /// Collects up to `expected` responses from a dispatch channel.
    pub async fn collect(
        mut rx: mpsc::Receiver<PeerResponse>,
        expected: usize,
    ) -> Vec<PeerResponse> {
        let mut responses = Vec::with_capacity(expected);
        while responses.len() < expected {
            match rx.recv().await {
                Some(response) => responses.push(response),
                None => break,
            }
        }
        responses
    }

    /// Broadcasts a JSON body to the given (already sampled) peers and
    /// reduces in threshold mode. Returns the pooled success body once the
    /// acceptance rate reaches `threshold_percent`; in-flight requests are
    /// left to drain.
    pub async fn submit_with_threshold(
        &self,
        peers: &[String],
        path: &str,
        body: &serde_json::Value,
        threshold_percent: f32,
    ) -> Result<String, QuorumError> {
        let mut rx = self.post_json(peers, path, body);
        let mut tally = ThresholdTally::new(peers.len(), threshold_percent);
        while !tally.complete() {
            let Some(response) = rx.recv().await else {
                break;
            };
            debug!(url = %response.url, status = ?response.status, "peer response");
            if tally.record(&response) {
                return Ok(tally.success_body);
            }
        }
        Err(tally.failure())
    }
}

// ---------------------------------------------------------------------------
// Threshold reduction
// ---------------------------------------------------------------------------

/// Pure tally behind threshold mode, kept free of I/O so the arithmetic is
/// testable on synthetic responses.
struct ThresholdTally {
    sampled: usize,
    threshold_percent: f32,
    received: usize,
    accepted: usize,
    reachable: usize,
    success_body: String,
    failure_body: String,
}

impl ThresholdTally {
    fn new(sampled: usize, threshold_percent: f32) -> Self {
        Self {
            sampled: sampled.max(1),
            threshold_percent,
            received: 0,
            accepted: 0,
            reachable: 0,
            success_body: String::new(),
            failure_body: String::new(),
        }
    }

    /// All sampled peers have answered.
    fn complete(&self) -> bool {
        self.received >= self.sampled
    }

    /// Records one response; returns `true` the moment the threshold is met.
    fn record(&mut self, response: &PeerResponse) -> bool {
        self.received += 1;
        match response.status {
            Some(200) => {
                self.accepted += 1;
                self.reachable += 1;
                self.success_body = response.body.clone();
            }
            Some(_) => {
                self.reachable += 1;
                self.failure_body = response.body.clone();
            }
            None => {}
        }
        self.accepted as f32 * 100.0 / self.sampled as f32 >= self.threshold_percent
    }

    /// The failure outcome after the channel ran dry below threshold.
    fn failure(self) -> QuorumError {
        if self.reachable == 0 {
            QuorumError::NetworkUnreachable
        } else {
            QuorumError::ConsensusNotReached {
                failure_body: self.failure_body,
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Voting reduction
// ---------------------------------------------------------------------------

/// Vote tally for confirmation mode: responses grouped by key, the largest
/// group wins, first-seen breaks ties.
///
/// Only the single aggregator task touches a `VoteSet`; peer tasks deposit
/// raw responses and never see the map.
pub struct VoteSet<T> {
    counts: HashMap<String, usize>,
    leader: Option<T>,
    leader_votes: usize,
}

impl<T> VoteSet<T> {
    /// An empty tally.
    pub fn new() -> Self {
        Self {
            counts: HashMap::new(),
            leader: None,
            leader_votes: 0,
        }
    }

    /// Casts one vote for `key`, carrying a representative payload. The
    /// payload is retained only if this vote puts `key` strictly in the
    /// lead, which is what gives earlier keys the tie.
    pub fn cast(&mut self, key: &str, payload: T) {
        let count = self.counts.entry(key.to_string()).or_insert(0);
        *count += 1;
        if *count > self.leader_votes {
            self.leader_votes = *count;
            self.leader = Some(payload);
        }
    }

    /// Votes held by the current leader.
    pub fn leader_votes(&self) -> usize {
        self.leader_votes
    }

    /// Consumes the tally, yielding the winning payload and its vote count.
    pub fn into_leader(self) -> Option<(T, usize)> {
        self.leader.map(|payload| (payload, self.leader_votes))
    }
}

impl<T> Default for VoteSet<T> {
    fn default() -> Self {
        Self::new()
    }
}
