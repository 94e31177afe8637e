//! Two-phase preimage retrieval
//!
//! Hash-addressed blobs come back in two strictly ordered steps: a hint
//! telling the host which preimage is about to be needed, then a fetch
//! addressing the staged blob by its Keccak-256 hash. The hint exists
//! because the host cannot derive every preimage from its hash alone; its
//! reply carries no payload and matters only as an acknowledgement.

use crate::codec::{self, GioDomain, HashType};
use crate::errors::Result;
use crate::transport::GioTransport;
use crate::types::{Address, B256};

/// Hint-then-fetch resolver for hash-addressed blobs.
///
/// Stateless and cache-free: resolving the same hash twice performs two full
/// exchanges.
#[derive(Debug, Clone)]
pub struct PreimageResolver<T> {
    transport: T,
}

impl<T: GioTransport> PreimageResolver<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Announces that the code of `address` at `block_hash` is about to be
    /// fetched.
    pub async fn hint_code(&self, block_hash: &B256, address: &Address) -> Result<()> {
        self.hint(codec::encode_code_hint(block_hash, address)).await
    }

    /// Announces that the header behind `block_hash` is about to be fetched.
    pub async fn hint_block(&self, block_hash: &B256) -> Result<()> {
        self.hint(codec::encode_block_hint(block_hash)).await
    }

    /// Fetches the blob whose Keccak-256 image is `hash`.
    ///
    /// The matching hint must have completed first; the host only stages
    /// preimages it was told about.
    pub async fn fetch(&self, hash: &B256) -> Result<Vec<u8>> {
        let payload = codec::encode_get_image(HashType::Keccak256, hash);
        self.transport
            .send(GioDomain::GetImage, &payload)
            .await?
            .require_ok(GioDomain::GetImage)
    }

    async fn hint(&self, payload: Vec<u8>) -> Result<()> {
        self.transport
            .send(GioDomain::PreimageHint, &payload)
            .await?
            .require_ok(GioDomain::PreimageHint)?;
        Ok(())
    }
}
