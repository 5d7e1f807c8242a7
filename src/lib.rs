//! Picochain - a minimal replicated ledger
//!
//! An append-only sequence of blocks bundling pending transactions, linked
//! by SHA-256, extended via a proof-of-work puzzle and reconciled across
//! peers by a longest-valid-chain rule.
//!
//! # Architecture
//!
//! ## Core Ledger
//! - [`block`] - Block structure and canonical hashing
//! - [`transaction`] - Transaction type and the coinbase sentinel
//! - [`ledger`] - Chain, pending pool and peer set ownership
//!
//! ## Consensus & Mining
//! - [`pow`] - Proof-of-work search and verification
//! - [`validation`] - Chain validation (hash linkage + PoW continuity)
//! - [`consensus`] - Longest-valid-chain resolution over peers
//!
//! ## Service
//! - [`node`] - Shared node state, mining and consensus orchestration
//! - [`api`] - REST API server
//!
//! ## Configuration & Utilities
//! - [`config`] - Configuration management
//! - [`error`] - Error types

#![forbid(unsafe_code)]

// ============================================================================
// Core Ledger
// ============================================================================
pub mod block;
pub mod ledger;
pub mod transaction;

// ============================================================================
// Consensus & Mining
// ============================================================================
pub mod consensus;
pub mod pow;
pub mod validation;

// ============================================================================
// Service
// ============================================================================
pub mod api;
pub mod node;

// ============================================================================
// Configuration & Utilities
// ============================================================================
pub mod config;
pub mod error;
