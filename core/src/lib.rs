//! # GIO-EVM Core
//!
//! Client library for running EVM view calls against remote blockchain state
//! served over GIO, the numbered-domain request/response protocol between a
//! sandboxed program and its host.
//!
//! The EVM itself runs locally (via `revm`); every account, storage slot,
//! bytecode blob and block header it touches is fetched on demand from the
//! host, scoped to one immutable snapshot block. Exchanges are deliberately
//! minimal (bytes in, bytes out) so the host side can prove or audit each
//! one.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │    EvmRunner     │ ── one view call at a chosen block hash
//! └────────┬─────────┘
//!          │ state reads (revm Database)
//!          ▼
//! ┌──────────────────┐
//! │     OracleDb     │ ── sync-to-async bridge, no caching
//! └────────┬─────────┘
//!          │
//!          ▼
//! ┌──────────────────┐
//! │ BlockchainOracle │ ── accounts, storage, code, headers
//! └────────┬─────────┘
//!          │ hint-then-fetch for hash-addressed blobs
//!          ▼
//! ┌──────────────────┐
//! │   GioTransport   │ ── JSON envelope over HTTP to the host
//! └──────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use gio_evm_core::prelude::*;
//!
//! let transport = HttpTransport::new(&"http://127.0.0.1:5004".parse()?)?;
//! let oracle = BlockchainOracle::new(transport, block_hash);
//! let runner = EvmRunner::new(oracle, 1);
//!
//! let output = runner
//!     .call(CallParams::new(contract, calldata), block_hash)
//!     .await?;
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Core type definitions (Address, Hash, U256)
//! - [`errors`] - Error types and Result alias
//! - [`codec`] - Byte layouts of the GIO blockchain domains
//! - [`transport`] - The GIO exchange itself (trait + HTTP implementation)
//! - [`resolver`] - Hint-then-fetch preimage retrieval
//! - [`oracle`] - Typed chain-state reads bound to a snapshot
//! - [`state`] - revm `Database` over the oracle
//! - [`evm`] - View-call runner

#![allow(async_fn_in_trait)]

pub mod codec;
pub mod errors;
pub mod evm;
pub mod oracle;
pub mod resolver;
pub mod state;
pub mod transport;
pub mod types;

#[cfg(test)]
mod mock;

// Re-exports for convenience
pub use codec::{Account, GioDomain, HashType, HintKind, ZERO_CODE_HASH};
pub use errors::{GioEvmError, Result};
pub use evm::{CallParams, EvmRunner};
pub use oracle::BlockchainOracle;
pub use resolver::PreimageResolver;
pub use state::OracleDb;
pub use transport::{GioResponse, GioTransport, HttpTransport};
pub use types::{Address, BlockHash, Bytes, Gas, Hash, Nonce, U256};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Account, Address, BlockHash, BlockchainOracle, Bytes, CallParams, EvmRunner, Gas,
        GioDomain, GioEvmError, GioResponse, GioTransport, Hash, HashType, HintKind,
        HttpTransport, Nonce, OracleDb, PreimageResolver, Result, U256, ZERO_CODE_HASH,
    };
}
