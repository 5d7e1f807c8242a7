//! The ledger: chain, pending pool and peer set
//!
//! One `Ledger` is created per process with a genesis block already sealed.
//! The chain only grows (via [`Ledger::new_block`]/[`Ledger::seal_block`])
//! or is replaced wholesale by consensus; callers needing concurrent access
//! wrap the whole thing in a single coarse lock (see `node`).

use std::collections::HashSet;

use url::Url;

use crate::block::Block;
use crate::error::{ChainError, Result};
use crate::transaction::Transaction;

/// Sentinel previous-hash the genesis block is seeded with. Genesis is
/// exempt from linkage checks, so this is never compared against a digest.
pub const GENESIS_PREVIOUS_HASH: &str = "1";

/// Fixed proof the genesis block carries; likewise never verified.
pub const GENESIS_PROOF: u64 = 100;

pub struct Ledger {
    chain: Vec<Block>,
    pending: Vec<Transaction>,
    peers: HashSet<String>,
}

impl Ledger {
    /// Create a ledger with its genesis block sealed and an empty pool.
    pub fn new() -> Self {
        let mut ledger = Ledger {
            chain: Vec::new(),
            pending: Vec::new(),
            peers: HashSet::new(),
        };
        ledger
            .new_block(GENESIS_PROOF, Some(GENESIS_PREVIOUS_HASH.to_string()))
            .expect("sealing genesis cannot fail: its previous hash is given");
        ledger
    }

    pub fn chain(&self) -> &[Block] {
        &self.chain
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    /// The current tail of the chain.
    pub fn last_block(&self) -> Result<&Block> {
        self.chain.last().ok_or(ChainError::EmptyChain)
    }

    /// Buffer a transaction and return the index of the block that will
    /// eventually contain it. Amounts are not validated here; that is the
    /// boundary's concern.
    pub fn new_transaction(&mut self, transaction: Transaction) -> u64 {
        self.pending.push(transaction);
        self.chain.last().map_or(0, |block| block.index) + 1
    }

    pub fn pending(&self) -> &[Transaction] {
        &self.pending
    }

    /// Drain the pool, e.g. to snapshot it before an unlocked mining search.
    pub fn take_pending(&mut self) -> Vec<Transaction> {
        std::mem::take(&mut self.pending)
    }

    /// Put an unsealed snapshot back, ahead of anything that arrived since.
    pub fn restore_pending(&mut self, mut transactions: Vec<Transaction>) {
        transactions.append(&mut self.pending);
        self.pending = transactions;
    }

    /// Seal a new block from the current pending pool and append it. The
    /// pool is cleared; `previous_hash` defaults to the hash of the tail.
    pub fn new_block(&mut self, proof: u64, previous_hash: Option<String>) -> Result<Block> {
        let transactions = self.take_pending();
        self.seal_block(proof, transactions, previous_hash)
    }

    /// Seal a new block from an explicit transaction snapshot. Used by the
    /// mining path so transactions accepted mid-search stay pooled for the
    /// next block.
    pub fn seal_block(
        &mut self,
        proof: u64,
        transactions: Vec<Transaction>,
        previous_hash: Option<String>,
    ) -> Result<Block> {
        let previous_hash = match previous_hash {
            Some(hash) => hash,
            None => self.last_block()?.hash(),
        };
        let block = Block {
            index: self.chain.len() as u64 + 1,
            timestamp: unix_time(),
            transactions,
            proof,
            previous_hash,
        };
        self.chain.push(block.clone());
        Ok(block)
    }

    /// Swap the whole chain for a longer one accepted by consensus.
    pub fn replace_chain(&mut self, chain: Vec<Block>) {
        self.chain = chain;
    }

    /// Normalize a peer address to `host:port` and add it to the peer set.
    /// Registering an address that is already present is a no-op.
    pub fn register_peer(&mut self, address: &str) -> Result<String> {
        let normalized = normalize_peer_address(address)?;
        self.peers.insert(normalized.clone());
        Ok(normalized)
    }

    /// Register several peers at once. Every address is normalized before
    /// anything is inserted, so one malformed address leaves the set
    /// untouched.
    pub fn register_peers(&mut self, addresses: &[String]) -> Result<Vec<String>> {
        let normalized = addresses
            .iter()
            .map(|address| normalize_peer_address(address))
            .collect::<Result<Vec<_>>>()?;
        for address in &normalized {
            self.peers.insert(address.clone());
        }
        Ok(normalized)
    }

    pub fn peers(&self) -> &HashSet<String> {
        &self.peers
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

/// Seconds since the Unix epoch, fractional.
fn unix_time() -> f64 {
    chrono::Utc::now().timestamp_micros() as f64 / 1_000_000.0
}

/// Reduce a peer address to `host:port`, dropping scheme, path and anything
/// else. `http://x:5000` and `http://x:5000/` both come out as `x:5000`.
pub fn normalize_peer_address(address: &str) -> Result<String> {
    let trimmed = address.trim();
    if trimmed.is_empty() {
        return Err(ChainError::Validation("peer address is empty".to_string()));
    }

    // Scheme-less inputs like "x:5000" parse as scheme "x" with no host, so
    // fall back to an http:// prefix whenever no host comes out.
    let parsed = match Url::parse(trimmed) {
        Ok(url) if url.host_str().is_some() => url,
        _ => Url::parse(&format!("http://{}", trimmed)).map_err(|e| {
            ChainError::Validation(format!("invalid peer address '{}': {}", trimmed, e))
        })?,
    };

    let host = parsed.host_str().ok_or_else(|| {
        ChainError::Validation(format!("peer address '{}' has no host", trimmed))
    })?;

    Ok(match parsed.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    })
}
