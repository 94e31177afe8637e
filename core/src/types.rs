//! Core type definitions for the GIO oracle client
//!
//! Uses alloy-primitives for Ethereum-compatible types. Everything on the
//! wire is big-endian and fixed-width, so the fixed-byte types are used
//! throughout instead of integers wherever a value crosses the protocol.

pub use alloy_primitives::{Address, B256, Bytes, U256};

/// 32-byte hash (Keccak256 output)
pub type Hash = B256;

/// Hash of the block a snapshot is pinned to
pub type BlockHash = B256;

/// Account nonce type
pub type Nonce = u64;

/// Gas amount type
pub type Gas = u64;

/// Block number
pub type BlockNumber = u64;

/// Wei amount (for clarity in value transfers)
pub type Wei = U256;
