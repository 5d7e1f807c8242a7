//! Error types for picochain

use std::fmt;

#[derive(Debug, Clone)]
pub enum ChainError {
    /// Missing or malformed input at the service boundary. Never fatal and
    /// never mutates the chain.
    Validation(String),
    /// Network failure or non-success status while fetching a peer's chain.
    /// Logged and skipped; resolution continues with the remaining peers.
    PeerFetch(String),
    /// A fetched chain failed validation; the candidate is discarded.
    ChainIntegrity(String),
    /// The chain was empty after construction. Unreachable unless the
    /// genesis-seeding contract is broken.
    EmptyChain,
    /// An in-flight proof-of-work search was abandoned because consensus
    /// replaced the chain underneath it.
    MiningInterrupted,
    Internal(String),
}

impl fmt::Display for ChainError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ChainError::Validation(msg) => write!(f, "Validation error: {}", msg),
            ChainError::PeerFetch(msg) => write!(f, "Peer fetch error: {}", msg),
            ChainError::ChainIntegrity(msg) => write!(f, "Chain integrity error: {}", msg),
            ChainError::EmptyChain => write!(f, "Chain is empty"),
            ChainError::MiningInterrupted => {
                write!(f, "Mining was interrupted by a chain replacement")
            }
            ChainError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ChainError {}

/// Convenience alias used across the crate
pub type Result<T> = std::result::Result<T, ChainError>;
