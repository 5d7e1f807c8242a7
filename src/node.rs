//! Node orchestration: shared ledger state, mining and consensus
//!
//! The ledger sits behind one coarse `RwLock`; every mutating operation
//! takes the write lock, and full-chain reads are consistent snapshots
//! under the read lock. The proof-of-work search runs on a blocking thread
//! with no lock held.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tracing::info;

use crate::block::Block;
use crate::consensus::{self, ChainFetcher, ChainSnapshot, HttpChainFetcher};
use crate::error::{ChainError, Result};
use crate::ledger::Ledger;
use crate::pow;
use crate::transaction::Transaction;

/// Reward paid to this node's identifier for sealing a block.
pub const MINING_REWARD: f64 = 1.0;

pub struct Node {
    pub ledger: Arc<RwLock<Ledger>>,
    /// Recipient of mining rewards; unique per process.
    pub node_id: String,
    fetcher: Box<dyn ChainFetcher>,
    /// Cancellation token of the proof-of-work search currently in flight.
    /// `resolve` raises it when the chain is replaced. Every search gets a
    /// fresh token, so a later search can never erase a cancellation aimed
    /// at an earlier one.
    mining_cancel: RwLock<Arc<AtomicBool>>,
}

impl Node {
    /// Node with the real HTTP chain fetcher.
    pub fn new(fetch_timeout: Duration) -> Self {
        Self::with_fetcher(Box::new(HttpChainFetcher::new(fetch_timeout)))
    }

    /// Node with an arbitrary fetcher; used by tests to avoid the network.
    pub fn with_fetcher(fetcher: Box<dyn ChainFetcher>) -> Self {
        Node {
            ledger: Arc::new(RwLock::new(Ledger::new())),
            node_id: uuid::Uuid::new_v4().simple().to_string(),
            fetcher,
            mining_cancel: RwLock::new(Arc::new(AtomicBool::new(false))),
        }
    }

    /// Buffer a transaction; returns the index of the block that will
    /// contain it.
    pub async fn submit_transaction(&self, transaction: Transaction) -> u64 {
        self.ledger.write().await.new_transaction(transaction)
    }

    pub async fn register_peer(&self, address: &str) -> Result<String> {
        self.ledger.write().await.register_peer(address)
    }

    /// Consistent `{chain, length}` snapshot, the shape served to peers.
    pub async fn chain_snapshot(&self) -> ChainSnapshot {
        let ledger = self.ledger.read().await;
        ChainSnapshot {
            chain: ledger.chain().to_vec(),
            length: ledger.len() as u64,
        }
    }

    /// Mine one block.
    ///
    /// Snapshot the pending pool and the tail's proof under the write lock,
    /// search with no lock held, then re-take the lock to append the reward
    /// transaction and seal with the snapshot. Transactions arriving during
    /// the search stay pooled for the next block. If consensus replaces the
    /// chain mid-search, the search is abandoned and the snapshot restored.
    pub async fn mine(&self) -> Result<Block> {
        let cancel = Arc::new(AtomicBool::new(false));
        *self.mining_cancel.write().await = cancel.clone();
        self.mine_with(cancel).await
    }

    /// Mining with an explicit cancellation token; split out so the abort
    /// path can be driven directly.
    async fn mine_with(&self, cancel: Arc<AtomicBool>) -> Result<Block> {
        let (last_proof, snapshot) = {
            let mut ledger = self.ledger.write().await;
            (ledger.last_block()?.proof, ledger.take_pending())
        };

        let search_cancel = cancel.clone();
        let found = match tokio::task::spawn_blocking(move || {
            pow::proof_of_work_interruptible(last_proof, &search_cancel)
        })
        .await
        {
            Ok(found) => found,
            Err(e) => {
                self.ledger.write().await.restore_pending(snapshot);
                return Err(ChainError::Internal(format!("mining task failed: {}", e)));
            }
        };

        let mut ledger = self.ledger.write().await;
        let Some(proof) = found else {
            ledger.restore_pending(snapshot);
            return Err(ChainError::MiningInterrupted);
        };

        let mut transactions = snapshot;
        transactions.push(Transaction::coinbase(self.node_id.clone(), MINING_REWARD));

        let block = ledger.seal_block(proof, transactions, None)?;
        info!(index = block.index, proof = block.proof, "sealed new block");
        Ok(block)
    }

    /// Run longest-valid-chain consensus over the registered peers. Returns
    /// whether the local chain was replaced, plus the resulting chain.
    pub async fn resolve(&self) -> Result<(bool, Vec<Block>)> {
        let (local_length, peers) = {
            let ledger = self.ledger.read().await;
            (ledger.len(), ledger.peers().clone())
        };

        let candidate =
            consensus::find_longer_chain(local_length, &peers, self.fetcher.as_ref()).await;

        let mut ledger = self.ledger.write().await;
        match candidate {
            Some(chain) => {
                ledger.replace_chain(chain);
                // Any search still running targets the old tail; cut it off.
                self.mining_cancel.read().await.store(true, Ordering::Relaxed);
                info!(length = ledger.len(), "replaced local chain with longer peer chain");
                Ok((true, ledger.chain().to_vec()))
            }
            None => Ok((false, ledger.chain().to_vec())),
        }
    }
}
