//! Longest-valid-chain consensus
//!
//! Each registered peer is asked for its full chain; the local chain is
//! replaced only by a strictly longer chain that passes validation. One
//! unreachable or lying peer never aborts resolution.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::block::Block;
use crate::error::{ChainError, Result};
use crate::validation::is_valid_chain;

/// Wire shape of a full-chain query. Peers expose the exact same shape we
/// serve from `GET /chain`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainSnapshot {
    pub chain: Vec<Block>,
    pub length: u64,
}

/// Seam over peer-chain retrieval, so resolution can be exercised without a
/// network.
#[async_trait]
pub trait ChainFetcher: Send + Sync {
    async fn fetch_chain(&self, peer: &str) -> Result<ChainSnapshot>;
}

/// Fetches `http://{peer}/chain` with a per-request timeout, so one slow
/// peer only costs its timeout before the scan moves on.
pub struct HttpChainFetcher {
    client: reqwest::Client,
}

impl HttpChainFetcher {
    pub fn new(timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("default reqwest client construction cannot fail");
        HttpChainFetcher { client }
    }
}

#[async_trait]
impl ChainFetcher for HttpChainFetcher {
    async fn fetch_chain(&self, peer: &str) -> Result<ChainSnapshot> {
        let url = format!("http://{}/chain", peer);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ChainError::PeerFetch(format!("{}: {}", peer, e)))?;

        if !response.status().is_success() {
            return Err(ChainError::PeerFetch(format!(
                "{} answered {}",
                peer,
                response.status()
            )));
        }

        response
            .json::<ChainSnapshot>()
            .await
            .map_err(|e| ChainError::PeerFetch(format!("{}: malformed chain response: {}", peer, e)))
    }
}

fn accept_candidate(snapshot: ChainSnapshot, peer: &str) -> Result<Vec<Block>> {
    if !is_valid_chain(&snapshot.chain) {
        return Err(ChainError::ChainIntegrity(format!(
            "chain reported by {} fails validation",
            peer
        )));
    }
    Ok(snapshot.chain)
}

/// Scan every peer for a strictly longer chain that validates; return the
/// winning candidate, if any.
///
/// Equal-length chains never win. Peer iteration order over the set is
/// unspecified, so when several peers tie at the same greater length the
/// last one visited wins; that tie is resolved arbitrarily on purpose.
pub async fn find_longer_chain<F>(
    local_length: usize,
    peers: &HashSet<String>,
    fetcher: &F,
) -> Option<Vec<Block>>
where
    F: ChainFetcher + ?Sized,
{
    let mut max_length = local_length;
    let mut candidate = None;

    for peer in peers {
        let snapshot = match fetcher.fetch_chain(peer).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(peer = %peer, error = %e, "skipping peer");
                continue;
            }
        };

        if (snapshot.length as usize) <= max_length {
            debug!(peer = %peer, length = snapshot.length, "peer chain is not longer");
            continue;
        }

        let length = snapshot.length as usize;
        match accept_candidate(snapshot, peer) {
            Ok(chain) => {
                max_length = length;
                candidate = Some(chain);
            }
            Err(e) => warn!(peer = %peer, error = %e, "discarding candidate chain"),
        }
    }

    candidate
}
