//! GIO-EVM CLI
//!
//! Command-line interface for inspecting remote chain state through a GIO
//! host and running read-only EVM calls against it.

use std::str::FromStr;
use std::time::Duration;

use alloy_primitives::hex;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use gio_evm_core::prelude::*;
use url::Url;

#[derive(Parser)]
#[command(name = "gio-evm")]
#[command(about = "EVM view calls against remote chain state served over GIO")]
#[command(version)]
struct Cli {
    /// Base URL of the GIO host
    #[arg(long, global = true, default_value = "http://127.0.0.1:5004")]
    host_url: Url,

    /// Per-request timeout in seconds (no timeout when omitted)
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a read-only EVM call at a block
    Call {
        /// Hash of the block to execute against
        #[arg(long)]
        block: Hash,

        /// Contract address to call
        #[arg(long)]
        to: Address,

        /// Calldata as hex
        #[arg(long, default_value = "0x", value_parser = Bytes::from_str)]
        data: Bytes,

        /// Caller address (zero address when omitted)
        #[arg(long)]
        from: Option<Address>,

        /// Wei sent with the call
        #[arg(long)]
        value: Option<U256>,

        /// Gas limit (block gas limit when omitted)
        #[arg(long)]
        gas: Option<u64>,

        /// Numeric chain id for the EVM
        #[arg(long, default_value_t = 1)]
        chain_id: u64,
    },

    /// Show an account's balance, nonce and hashes
    Account {
        /// Hash of the block to read against
        #[arg(long)]
        block: Hash,

        /// Account address
        #[arg(long)]
        address: Address,
    },

    /// Read one storage word of a contract
    Storage {
        /// Hash of the block to read against
        #[arg(long)]
        block: Hash,

        /// Contract address
        #[arg(long)]
        address: Address,

        /// Storage slot as a 32-byte hex word
        #[arg(long)]
        slot: Hash,
    },

    /// Download a contract's bytecode
    Code {
        /// Hash of the block to read against
        #[arg(long)]
        block: Hash,

        /// Contract address
        #[arg(long)]
        address: Address,
    },

    /// Fetch and decode a block header by its hash
    Header {
        /// Hash of the header to fetch
        #[arg(long)]
        hash: Hash,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let transport = build_transport(&cli).context("failed to set up the gio transport")?;
    tracing::debug!(endpoint = %transport.endpoint(), "gio transport ready");

    match cli.command {
        Commands::Call {
            block,
            to,
            data,
            from,
            value,
            gas,
            chain_id,
        } => {
            let mut params = CallParams::new(to, data);
            if let Some(from) = from {
                params = params.with_from(from);
            }
            if let Some(value) = value {
                params = params.with_value(value);
            }
            if let Some(gas) = gas {
                params = params.with_gas(gas);
            }
            cmd_call(transport, block, chain_id, params).await?;
        }
        Commands::Account { block, address } => {
            cmd_account(transport, block, address).await?;
        }
        Commands::Storage {
            block,
            address,
            slot,
        } => {
            cmd_storage(transport, block, address, slot).await?;
        }
        Commands::Code { block, address } => {
            cmd_code(transport, block, address).await?;
        }
        Commands::Header { hash } => {
            cmd_header(transport, hash).await?;
        }
    }

    Ok(())
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn build_transport(cli: &Cli) -> gio_evm_core::Result<HttpTransport> {
    match cli.timeout_secs {
        Some(secs) => HttpTransport::with_timeout(&cli.host_url, Duration::from_secs(secs)),
        None => HttpTransport::new(&cli.host_url),
    }
}

async fn cmd_call(
    transport: HttpTransport,
    block: Hash,
    chain_id: u64,
    params: CallParams,
) -> Result<()> {
    let oracle = BlockchainOracle::new(transport, block);
    let runner = EvmRunner::new(oracle, chain_id);

    let output = runner.call(params, block).await?;
    println!("0x{}", hex::encode(&output));

    Ok(())
}

async fn cmd_account(transport: HttpTransport, block: Hash, address: Address) -> Result<()> {
    let oracle = BlockchainOracle::new(transport, block);
    let account = oracle.get_account(address).await?;

    println!("Account {address}");
    println!("  balance:      {} wei", account.balance);
    println!("  nonce:        {}", account.nonce);
    println!("  code hash:    {}", account.code_hash);
    println!("  storage root: {}", account.storage_root);

    Ok(())
}

async fn cmd_storage(
    transport: HttpTransport,
    block: Hash,
    address: Address,
    slot: Hash,
) -> Result<()> {
    let oracle = BlockchainOracle::new(transport, block);
    let word = oracle.get_storage_slot(address, slot).await?;
    println!("{word}");

    Ok(())
}

async fn cmd_code(transport: HttpTransport, block: Hash, address: Address) -> Result<()> {
    let oracle = BlockchainOracle::new(transport, block);
    let code = oracle.get_code(address).await?;

    if code.is_empty() {
        println!("(no code)");
    } else {
        println!("{} bytes", code.len());
        println!("0x{}", hex::encode(&code));
    }

    Ok(())
}

async fn cmd_header(transport: HttpTransport, hash: Hash) -> Result<()> {
    let oracle = BlockchainOracle::new(transport, hash);
    let header = oracle.get_block_header(hash).await?;

    println!("Block {}", header.number);
    println!("  hash:        {}", header.hash_slow());
    println!("  parent:      {}", header.parent_hash);
    println!("  timestamp:   {}", header.timestamp);
    println!("  gas limit:   {}", header.gas_limit);
    println!("  gas used:    {}", header.gas_used);
    match header.base_fee_per_gas {
        Some(base_fee) => println!("  base fee:    {base_fee} wei"),
        None => println!("  base fee:    (pre-london)"),
    }
    println!("  beneficiary: {}", header.beneficiary);
    println!("  state root:  {}", header.state_root);

    Ok(())
}
