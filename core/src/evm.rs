//! Oracle-backed EVM view calls
//!
//! Runs one EVM call at a time against the state of a chosen historical
//! block, with every state read answered live by the oracle. Nothing is
//! committed: the state journal is dropped with the EVM instance, so a call
//! can only observe the chain, never change it.

use alloy_consensus::Header;
use alloy_primitives::hex;
use revm::primitives::{
    BlockEnv as RevmBlockEnv, CfgEnv, EVMError, ExecutionResult, SpecId, TxEnv, TxKind,
};
use revm::Evm;

use crate::errors::{GioEvmError, Result};
use crate::oracle::BlockchainOracle;
use crate::state::OracleDb;
use crate::transport::GioTransport;
use crate::types::{Address, Bytes, B256, U256};

/// Parameters of one view call
#[derive(Debug, Clone)]
pub struct CallParams {
    /// Contract to call
    pub to: Address,
    /// Caller and origin; the zero address when absent
    pub from: Option<Address>,
    /// Calldata
    pub data: Bytes,
    /// Wei sent with the call; zero when absent
    pub value: Option<U256>,
    /// Gas available to the call; the block's gas limit when absent
    pub gas: Option<u64>,
}

impl CallParams {
    /// Calls `to` with `data`, defaults everywhere else
    pub fn new(to: Address, data: Bytes) -> Self {
        Self {
            to,
            from: None,
            data,
            value: None,
            gas: None,
        }
    }

    /// Sets the caller address
    pub fn with_from(mut self, from: Address) -> Self {
        self.from = Some(from);
        self
    }

    /// Attaches wei to the call
    pub fn with_value(mut self, value: U256) -> Self {
        self.value = Some(value);
        self
    }

    /// Caps the gas available to the call
    pub fn with_gas(mut self, gas: u64) -> Self {
        self.gas = Some(gas);
        self
    }
}

/// Facade running read-only EVM calls against oracle-served state.
///
/// Holds only the oracle and the chain id; each call builds a fresh EVM and
/// state journal, so a single runner serves concurrent calls.
#[derive(Debug, Clone)]
pub struct EvmRunner<T> {
    oracle: BlockchainOracle<T>,
    chain_id: u64,
}

impl<T: GioTransport + Clone> EvmRunner<T> {
    /// Builds a runner over `oracle` for the chain identified by `chain_id`.
    pub fn new(oracle: BlockchainOracle<T>, chain_id: u64) -> Self {
        Self { oracle, chain_id }
    }

    /// The oracle answering this runner's state reads
    pub fn oracle(&self) -> &BlockchainOracle<T> {
        &self.oracle
    }

    /// Runs a single view call in the context of `block_hash`.
    ///
    /// The header is resolved first and seeds the block environment; state
    /// reads then flow through the oracle while the call executes. Success
    /// returns the call's output bytes. A revert or exceptional halt becomes
    /// an `Execution` error carrying the engine's own description, while
    /// state-read failures keep the kind the oracle reported.
    pub async fn call(&self, params: CallParams, block_hash: B256) -> Result<Bytes> {
        let header = self.oracle.get_block_header(block_hash).await?;
        tracing::debug!(block = header.number, to = %params.to, "running view call");

        let db = OracleDb::new(self.oracle.clone()).ok_or_else(|| {
            GioEvmError::Execution(
                "oracle-backed execution needs a multi-thread tokio runtime".into(),
            )
        })?;

        let mut cfg = CfgEnv::default();
        cfg.chain_id = self.chain_id;
        // A view call runs against real headers without the caller holding
        // funds, paying base fee, or proving it is not a contract.
        cfg.disable_base_fee = true;
        cfg.disable_balance_check = true;
        cfg.disable_eip3607 = true;

        let block_env = Self::block_env(&header);
        let tx_env = Self::tx_env(&params, &header);

        let mut evm = Evm::builder()
            .with_db(db)
            .with_spec_id(SpecId::CANCUN)
            .modify_cfg_env(|c| *c = cfg)
            .modify_block_env(|b| *b = block_env)
            .modify_tx_env(|t| *t = tx_env)
            .build();

        let outcome = evm.transact().map_err(|err| match err {
            // State reads that failed keep their original kind.
            EVMError::Database(db_err) => db_err,
            other => GioEvmError::Execution(other.to_string()),
        })?;

        match outcome.result {
            ExecutionResult::Success { output, .. } => Ok(output.into_data()),
            ExecutionResult::Revert { output, gas_used } => Err(GioEvmError::Execution(format!(
                "reverted after {gas_used} gas with output 0x{}",
                hex::encode(&output)
            ))),
            ExecutionResult::Halt { reason, gas_used } => Err(GioEvmError::Execution(format!(
                "halted after {gas_used} gas: {reason:?}"
            ))),
        }
    }

    fn block_env(header: &Header) -> RevmBlockEnv {
        RevmBlockEnv {
            number: U256::from(header.number),
            timestamp: U256::from(header.timestamp),
            gas_limit: U256::from(header.gas_limit),
            coinbase: header.beneficiary,
            basefee: U256::from(header.base_fee_per_gas.unwrap_or_default()),
            difficulty: header.difficulty,
            prevrandao: Some(header.mix_hash),
            ..Default::default()
        }
    }

    fn tx_env(params: &CallParams, header: &Header) -> TxEnv {
        TxEnv {
            caller: params.from.unwrap_or(Address::ZERO),
            transact_to: TxKind::Call(params.to),
            data: params.data.clone(),
            value: params.value.unwrap_or(U256::ZERO),
            gas_limit: params.gas.unwrap_or(header.gas_limit),
            // A read has no nonce to check.
            nonce: None,
            ..Default::default()
        }
    }
}
