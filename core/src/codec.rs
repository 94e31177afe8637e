//! Wire layouts for the GIO blockchain domains
//!
//! Pure byte-level encoding and decoding; no I/O happens here. Every field
//! is big-endian and fixed-width so request bytes are reproducible and the
//! host can address responses by content.

use crate::errors::{GioEvmError, Result};
use crate::types::{Address, B256, U256};

/// GIO domains understood by the blockchain host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum GioDomain {
    /// Read one storage word of a contract
    GetStorage = 0x27,
    /// Read the account record behind an address
    GetAccount = 0x29,
    /// Fetch a blob by its hash
    GetImage = 0x2a,
    /// Announce an upcoming preimage fetch
    PreimageHint = 0x2e,
}

impl GioDomain {
    /// Wire value of the domain
    pub const fn value(self) -> u32 {
        self as u32
    }
}

/// Hint kinds naming which preimage the host should stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum HintKind {
    /// Contract code, keyed by block hash and address
    CodePreimage = 1,
    /// Block header, keyed by block hash
    BlockPreimage = 2,
}

/// Hash schemes a preimage can be addressed by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum HashType {
    Keccak256 = 2,
}

/// Code hash the host reports for accounts with no code.
///
/// All zero bytes, deliberately distinct from `KECCAK_EMPTY`: the sentinel
/// means "do not fetch", not "the code is the empty string".
pub const ZERO_CODE_HASH: B256 = B256::ZERO;

/// Byte length of a GET_ACCOUNT response
pub const ACCOUNT_RESPONSE_LEN: usize = 104;

/// Byte length of a storage word
pub const WORD_LEN: usize = 32;

/// Account record decoded from a GET_ACCOUNT response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Account {
    pub nonce: u64,
    pub balance: U256,
    pub storage_root: B256,
    pub code_hash: B256,
}

impl Account {
    /// Whether the host will serve code for this account.
    ///
    /// A zero code hash is the no-code sentinel; everything else, including
    /// `KECCAK_EMPTY`, names a fetchable image.
    pub fn has_code(&self) -> bool {
        self.code_hash != ZERO_CODE_HASH
    }
}

/// GET_STORAGE request: blockHash(32) || address(20) || slot(32)
pub fn encode_get_storage(block_hash: &B256, address: &Address, slot: &B256) -> Vec<u8> {
    let mut out = Vec::with_capacity(84);
    out.extend_from_slice(block_hash.as_slice());
    out.extend_from_slice(address.as_slice());
    out.extend_from_slice(slot.as_slice());
    out
}

/// GET_ACCOUNT request: blockHash(32) || address(20)
pub fn encode_get_account(block_hash: &B256, address: &Address) -> Vec<u8> {
    let mut out = Vec::with_capacity(52);
    out.extend_from_slice(block_hash.as_slice());
    out.extend_from_slice(address.as_slice());
    out
}

/// GET_IMAGE request: hashType(1) || hash(32)
pub fn encode_get_image(hash_type: HashType, hash: &B256) -> Vec<u8> {
    let mut out = Vec::with_capacity(33);
    out.push(hash_type as u8);
    out.extend_from_slice(hash.as_slice());
    out
}

/// PREIMAGE_HINT request for contract code: hintType(1) || blockHash(32) || address(20)
pub fn encode_code_hint(block_hash: &B256, address: &Address) -> Vec<u8> {
    let mut out = Vec::with_capacity(53);
    out.push(HintKind::CodePreimage as u8);
    out.extend_from_slice(block_hash.as_slice());
    out.extend_from_slice(address.as_slice());
    out
}

/// PREIMAGE_HINT request for a block header: hintType(1) || blockHash(32)
pub fn encode_block_hint(block_hash: &B256) -> Vec<u8> {
    let mut out = Vec::with_capacity(33);
    out.push(HintKind::BlockPreimage as u8);
    out.extend_from_slice(block_hash.as_slice());
    out
}

/// Decodes a GET_ACCOUNT response: balance(32) || nonce(8) || codeHash(32) || storageRoot(32).
///
/// Trailing bytes beyond the layout are ignored.
pub fn decode_account(payload: &[u8]) -> Result<Account> {
    if payload.len() < ACCOUNT_RESPONSE_LEN {
        return Err(GioEvmError::Decoding(format!(
            "account payload is {} bytes, layout needs {ACCOUNT_RESPONSE_LEN}",
            payload.len()
        )));
    }
    let balance = U256::from_be_slice(&payload[0..32]);
    let mut nonce_bytes = [0u8; 8];
    nonce_bytes.copy_from_slice(&payload[32..40]);
    let nonce = u64::from_be_bytes(nonce_bytes);
    let code_hash = B256::from_slice(&payload[40..72]);
    let storage_root = B256::from_slice(&payload[72..104]);
    Ok(Account {
        nonce,
        balance,
        storage_root,
        code_hash,
    })
}

/// Encodes an account into the GET_ACCOUNT response layout, the exact
/// mirror of [`decode_account`]. Used by hosts and test fixtures.
pub fn encode_account(account: &Account) -> Vec<u8> {
    let mut out = Vec::with_capacity(ACCOUNT_RESPONSE_LEN);
    out.extend_from_slice(&account.balance.to_be_bytes::<32>());
    out.extend_from_slice(&account.nonce.to_be_bytes());
    out.extend_from_slice(account.code_hash.as_slice());
    out.extend_from_slice(account.storage_root.as_slice());
    out
}

/// Decodes a GET_STORAGE response: one 32-byte word.
pub fn decode_storage_word(payload: &[u8]) -> Result<B256> {
    if payload.len() < WORD_LEN {
        return Err(GioEvmError::Decoding(format!(
            "storage payload is {} bytes, layout needs {WORD_LEN}",
            payload.len()
        )));
    }
    Ok(B256::from_slice(&payload[..WORD_LEN]))
}
