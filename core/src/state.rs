//! Oracle-backed state database for the EVM
//!
//! Implements `revm::Database` and `revm::DatabaseRef` by forwarding every
//! state read to the async oracle and blocking on the result. No caching:
//! each read the EVM performs is a live protocol exchange, so what the EVM
//! sees is exactly what the host answered.

use std::future::Future;

use revm::primitives::{AccountInfo, Bytecode, KECCAK_EMPTY};
use revm::{Database, DatabaseRef};
use tokio::runtime::{Handle, Runtime, RuntimeFlavor};

use crate::codec::ZERO_CODE_HASH;
use crate::errors::{GioEvmError, Result};
use crate::oracle::BlockchainOracle;
use crate::transport::GioTransport;
use crate::types::{Address, Hash, U256};

/// Where blocking waits run: a handle into the ambient runtime, or a runtime
/// owned by the database for fully synchronous callers
#[derive(Debug)]
enum HandleOrRuntime {
    Handle(Handle),
    Runtime(Runtime),
}

impl HandleOrRuntime {
    fn block_on<F: Future>(&self, future: F) -> F::Output {
        match self {
            Self::Handle(handle) => tokio::task::block_in_place(|| handle.block_on(future)),
            Self::Runtime(runtime) => runtime.block_on(future),
        }
    }
}

/// State database answering the EVM's synchronous reads through the oracle
#[derive(Debug)]
pub struct OracleDb<T> {
    oracle: BlockchainOracle<T>,
    rt: HandleOrRuntime,
}

impl<T: GioTransport> OracleDb<T> {
    /// Wraps `oracle` using the ambient tokio runtime for blocking waits.
    ///
    /// Returns `None` outside a runtime or under the current-thread flavor:
    /// re-entering a current-thread runtime from synchronous code would
    /// deadlock, so only the multi-thread flavor is accepted.
    pub fn new(oracle: BlockchainOracle<T>) -> Option<Self> {
        let handle = Handle::try_current().ok()?;
        match handle.runtime_flavor() {
            RuntimeFlavor::CurrentThread => None,
            _ => Some(Self {
                oracle,
                rt: HandleOrRuntime::Handle(handle),
            }),
        }
    }

    /// Wraps `oracle` with a runtime of its own, for callers with no ambient
    /// runtime at all.
    pub fn with_runtime(oracle: BlockchainOracle<T>, runtime: Runtime) -> Self {
        Self {
            oracle,
            rt: HandleOrRuntime::Runtime(runtime),
        }
    }

    /// The oracle behind this database
    pub fn oracle(&self) -> &BlockchainOracle<T> {
        &self.oracle
    }

    /// Account record plus eagerly loaded code.
    ///
    /// Code is keyed by (block, address) on the wire, not by hash, so it has
    /// to be pulled here while the address is known; `code_by_hash` cannot
    /// reconstruct it later.
    fn account_info(&self, address: Address) -> Result<AccountInfo> {
        let account = self.rt.block_on(self.oracle.get_account(address))?;
        let code = self.rt.block_on(self.oracle.get_code(address))?;
        Ok(AccountInfo {
            balance: account.balance,
            nonce: account.nonce,
            code_hash: account.code_hash,
            code: if code.is_empty() {
                None
            } else {
                Some(Bytecode::new_raw(code))
            },
        })
    }

    fn storage_word(&self, address: Address, index: U256) -> Result<U256> {
        let slot = Hash::from(index);
        let word = self
            .rt
            .block_on(self.oracle.get_storage_slot(address, slot))?;
        Ok(U256::from_be_bytes(word.0))
    }

    /// Resolves a block number by walking parent links from the snapshot.
    ///
    /// Headers only link backwards, so this is the one way to answer
    /// BLOCKHASH. Numbers above the snapshot cannot be reached and fail fast
    /// instead of walking forever.
    fn ancestor_hash(&self, number: u64) -> Result<Hash> {
        let mut hash = self.oracle.latest_block_hash();
        loop {
            let header = self.rt.block_on(self.oracle.get_block_header(hash))?;
            if header.number == number {
                return Ok(hash);
            }
            if header.number < number {
                return Err(GioEvmError::Decoding(format!(
                    "block {number} is not an ancestor of the snapshot (walked down to {})",
                    header.number
                )));
            }
            tracing::trace!(current = header.number, number, "walking ancestor headers");
            hash = header.parent_hash;
        }
    }
}

impl<T: GioTransport> DatabaseRef for OracleDb<T> {
    type Error = GioEvmError;

    fn basic_ref(&self, address: Address) -> Result<Option<AccountInfo>> {
        // The host answers every address, zero-filled when untouched, so
        // there is no "absent account" case to report.
        self.account_info(address).map(Some)
    }

    fn code_by_hash_ref(&self, code_hash: Hash) -> Result<Bytecode> {
        // Code travels with the account read; only the empty markers can
        // legitimately land here.
        if code_hash == ZERO_CODE_HASH || code_hash == KECCAK_EMPTY {
            return Ok(Bytecode::default());
        }
        Err(GioEvmError::Decoding(format!(
            "bytecode {code_hash} was not preloaded by an account read"
        )))
    }

    fn storage_ref(&self, address: Address, index: U256) -> Result<U256> {
        self.storage_word(address, index)
    }

    fn block_hash_ref(&self, number: u64) -> Result<Hash> {
        self.ancestor_hash(number)
    }
}

impl<T: GioTransport> Database for OracleDb<T> {
    type Error = GioEvmError;

    fn basic(&mut self, address: Address) -> Result<Option<AccountInfo>> {
        self.basic_ref(address)
    }

    fn code_by_hash(&mut self, code_hash: Hash) -> Result<Bytecode> {
        self.code_by_hash_ref(code_hash)
    }

    fn storage(&mut self, address: Address, index: U256) -> Result<U256> {
        self.storage_ref(address, index)
    }

    fn block_hash(&mut self, number: u64) -> Result<Hash> {
        self.block_hash_ref(number)
    }
}
