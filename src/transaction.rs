//! Transaction value type

use serde::{Deserialize, Serialize};

/// Reserved sender marking a mining reward. There is no real sender; the
/// value is minted when the block is sealed.
pub const COINBASE_SENDER: &str = "0";

/// A transfer waiting in the pending pool or embedded in a sealed block.
/// Immutable once embedded; field names are part of the JSON contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub sender: String,
    pub recipient: String,
    pub amount: f64,
}

impl Transaction {
    pub fn new(
        sender: impl Into<String>,
        recipient: impl Into<String>,
        amount: f64,
    ) -> Self {
        Transaction {
            sender: sender.into(),
            recipient: recipient.into(),
            amount,
        }
    }

    /// The reward transaction appended when a block is mined.
    pub fn coinbase(recipient: impl Into<String>, amount: f64) -> Self {
        Transaction::new(COINBASE_SENDER, recipient, amount)
    }

    pub fn is_coinbase(&self) -> bool {
        self.sender == COINBASE_SENDER
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coinbase_uses_reserved_sender() {
        let tx = Transaction::coinbase("miner-1", 1.0);
        assert_eq!(tx.sender, COINBASE_SENDER);
        assert!(tx.is_coinbase());
        assert!(!Transaction::new("a", "b", 2.0).is_coinbase());
    }

    #[test]
    fn json_shape_is_stable() {
        let tx = Transaction::new("a", "b", 5.0);
        let value = serde_json::to_value(&tx).unwrap();
        assert_eq!(value["sender"], "a");
        assert_eq!(value["recipient"], "b");
        assert_eq!(value["amount"], 5.0);

        let back: Transaction = serde_json::from_value(value).unwrap();
        assert_eq!(back, tx);
    }
}
