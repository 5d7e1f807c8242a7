//! Block structure and canonical hashing

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::transaction::Transaction;

/// One link in the chain. Fields are immutable once the block is appended;
/// equality is value-based over all fields, and the JSON field names are
/// part of the wire contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// 1-based position in the chain.
    pub index: u64,
    /// Seconds since the Unix epoch, fractional.
    pub timestamp: f64,
    pub transactions: Vec<Transaction>,
    pub proof: u64,
    /// Hex SHA-256 digest of the preceding block ("1" for genesis).
    pub previous_hash: String,
}

impl Block {
    /// Hex SHA-256 digest of the canonical JSON form of this block.
    ///
    /// The serialization goes through `serde_json::Value`, whose object map
    /// is BTree-backed, so keys are always emitted in sorted order. Two
    /// blocks with equal fields therefore hash identically no matter how
    /// they were constructed.
    pub fn hash(&self) -> String {
        let canonical = serde_json::to_value(self)
            .expect("a block is always JSON-serializable")
            .to_string();
        hex::encode(Sha256::digest(canonical.as_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_block() -> Block {
        Block {
            index: 2,
            timestamp: 1700000000.25,
            transactions: vec![Transaction::new("alice", "bob", 3.0)],
            proof: 35293,
            previous_hash: "aa".repeat(32),
        }
    }

    #[test]
    fn hash_is_deterministic() {
        let block = sample_block();
        assert_eq!(block.hash(), block.hash());
        assert_eq!(block.hash(), block.clone().hash());
        assert_eq!(block.hash().len(), 64);
    }

    #[test]
    fn hash_changes_with_any_field() {
        let base = sample_block();

        let mut tampered = base.clone();
        tampered.index = 3;
        assert_ne!(base.hash(), tampered.hash());

        let mut tampered = base.clone();
        tampered.timestamp += 1.0;
        assert_ne!(base.hash(), tampered.hash());

        let mut tampered = base.clone();
        tampered.proof += 1;
        assert_ne!(base.hash(), tampered.hash());

        let mut tampered = base.clone();
        tampered.previous_hash = "bb".repeat(32);
        assert_ne!(base.hash(), tampered.hash());

        let mut tampered = base.clone();
        tampered.transactions[0].amount = 4.0;
        assert_ne!(base.hash(), tampered.hash());
    }

    #[test]
    fn hash_survives_a_serde_round_trip() {
        let block = sample_block();
        let json = serde_json::to_string(&block).unwrap();
        let back: Block = serde_json::from_str(&json).unwrap();
        assert_eq!(block.hash(), back.hash());
    }
}
