//! Typed chain-state reads bound to one snapshot block
//!
//! The oracle is created with the hash of the block every read is scoped to
//! and never changes it. Methods take `&self`, hold no locks and share no
//! mutable state, so concurrent reads through one oracle are independent and
//! equivalent to sequential ones.

use alloy_consensus::Header;
use alloy_rlp::Decodable;

use crate::codec::{self, Account, GioDomain};
use crate::errors::Result;
use crate::resolver::PreimageResolver;
use crate::transport::GioTransport;
use crate::types::{Address, Bytes, B256};

/// Client for reading accounts, storage, code and headers of a remote chain
#[derive(Debug, Clone)]
pub struct BlockchainOracle<T> {
    transport: T,
    resolver: PreimageResolver<T>,
    block_hash: B256,
}

impl<T: GioTransport + Clone> BlockchainOracle<T> {
    /// Binds a new oracle to the snapshot at `block_hash`.
    pub fn new(transport: T, block_hash: B256) -> Self {
        Self {
            resolver: PreimageResolver::new(transport.clone()),
            transport,
            block_hash,
        }
    }
}

impl<T: GioTransport> BlockchainOracle<T> {
    /// Hash of the block this oracle is bound to. Answered locally; the
    /// snapshot never moves, so there is nothing to ask the host.
    pub fn latest_block_hash(&self) -> B256 {
        self.block_hash
    }

    /// Reads the account record behind `address` at the snapshot block.
    ///
    /// Absent accounts come back with all fields zeroed; the host does not
    /// distinguish "empty" from "nonexistent".
    pub async fn get_account(&self, address: Address) -> Result<Account> {
        let payload = codec::encode_get_account(&self.block_hash, &address);
        let data = self
            .transport
            .send(GioDomain::GetAccount, &payload)
            .await?
            .require_ok(GioDomain::GetAccount)?;
        codec::decode_account(&data)
    }

    /// Reads one storage word of `address` at the snapshot block.
    pub async fn get_storage_slot(&self, address: Address, slot: B256) -> Result<B256> {
        let payload = codec::encode_get_storage(&self.block_hash, &address, &slot);
        let data = self
            .transport
            .send(GioDomain::GetStorage, &payload)
            .await?
            .require_ok(GioDomain::GetStorage)?;
        codec::decode_storage_word(&data)
    }

    /// Reads the code of `address` at the snapshot block.
    ///
    /// Runs the full hint-then-fetch sequence: hint the code preimage, read
    /// the account, then fetch the blob behind its code hash. A zero code
    /// hash short-circuits to empty bytes without any image fetch.
    pub async fn get_code(&self, address: Address) -> Result<Bytes> {
        self.resolver.hint_code(&self.block_hash, &address).await?;
        let account = self.get_account(address).await?;
        if !account.has_code() {
            tracing::debug!(%address, "account has no code");
            return Ok(Bytes::new());
        }
        let raw = self.resolver.fetch(&account.code_hash).await?;
        Ok(Bytes::from(raw))
    }

    /// Fetches and decodes the header whose hash is `block_hash`.
    ///
    /// Takes an explicit hash rather than using the snapshot so ancestor
    /// headers stay reachable through their parent links.
    pub async fn get_block_header(&self, block_hash: B256) -> Result<Header> {
        self.resolver.hint_block(&block_hash).await?;
        let raw = self.resolver.fetch(&block_hash).await?;
        Ok(Header::decode(&mut raw.as_slice())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::HashType;
    use crate::errors::GioEvmError;
    use crate::mock::MockTransport;
    use alloy_primitives::keccak256;

    fn snapshot() -> B256 {
        B256::repeat_byte(0x11)
    }

    fn oracle(transport: &MockTransport) -> BlockchainOracle<MockTransport> {
        BlockchainOracle::new(transport.clone(), snapshot())
    }

    fn sample_header(number: u64) -> Header {
        Header {
            number,
            parent_hash: B256::repeat_byte(0x01),
            timestamp: 1_700_000_000 + number,
            gas_limit: 30_000_000,
            beneficiary: Address::repeat_byte(0x0c),
            mix_hash: B256::repeat_byte(0x0d),
            base_fee_per_gas: Some(7),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_get_account_request_and_decode() {
        let transport = MockTransport::new();
        let address = Address::repeat_byte(0x22);
        let account = Account {
            nonce: 3,
            balance: alloy_primitives::U256::from(42u64),
            storage_root: B256::repeat_byte(0xaa),
            code_hash: B256::repeat_byte(0xbb),
        };
        transport.stub(
            GioDomain::GetAccount,
            codec::encode_get_account(&snapshot(), &address),
            codec::encode_account(&account),
        );

        let got = oracle(&transport).get_account(address).await.unwrap();
        assert_eq!(got, account);
    }

    #[tokio::test]
    async fn test_storage_read_scoped_to_snapshot() {
        let transport = MockTransport::new();
        let address = Address::repeat_byte(0x22);
        let slot = B256::repeat_byte(0x33);
        transport.stub(
            GioDomain::GetStorage,
            codec::encode_get_storage(&snapshot(), &address, &slot),
            vec![0x5a; 32],
        );

        let word = oracle(&transport)
            .get_storage_slot(address, slot)
            .await
            .unwrap();
        assert_eq!(word, B256::repeat_byte(0x5a));

        // The request carries the bound snapshot hash up front.
        let sent = transport.sent();
        assert_eq!(&sent[0].1[0..32], snapshot().as_slice());
    }

    #[tokio::test]
    async fn test_storage_failure_carries_response_code() {
        let transport = MockTransport::new();
        let address = Address::repeat_byte(0x22);
        let slot = B256::repeat_byte(0x33);
        transport.stub_code(
            GioDomain::GetStorage,
            codec::encode_get_storage(&snapshot(), &address, &slot),
            404,
        );

        let err = oracle(&transport)
            .get_storage_slot(address, slot)
            .await
            .unwrap_err();
        match err {
            GioEvmError::Protocol { domain, code } => {
                assert_eq!(domain, GioDomain::GetStorage.value());
                assert_eq!(code, 404);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_code_zero_hash_short_circuits() {
        let transport = MockTransport::new();
        let address = Address::repeat_byte(0x22);
        transport.stub_domain(GioDomain::PreimageHint, vec![]);
        transport.stub_domain(
            GioDomain::GetAccount,
            codec::encode_account(&Account::default()),
        );

        let code = oracle(&transport).get_code(address).await.unwrap();
        assert!(code.is_empty());

        // Hint and account lookup happen; no image fetch does.
        assert_eq!(
            transport.sent_domains(),
            vec![GioDomain::PreimageHint, GioDomain::GetAccount]
        );
    }

    #[tokio::test]
    async fn test_code_hint_precedes_fetch() {
        let transport = MockTransport::new();
        let address = Address::repeat_byte(0x22);
        let code = vec![0x60, 0x2a, 0x60, 0x00, 0x52];
        let code_hash = keccak256(&code);
        let account = Account {
            code_hash,
            ..Account::default()
        };
        transport.stub_domain(GioDomain::PreimageHint, vec![]);
        transport.stub_domain(GioDomain::GetAccount, codec::encode_account(&account));
        transport.stub(
            GioDomain::GetImage,
            codec::encode_get_image(HashType::Keccak256, &code_hash),
            code.clone(),
        );

        let got = oracle(&transport).get_code(address).await.unwrap();
        assert_eq!(got.as_ref(), code.as_slice());
        assert_eq!(
            transport.sent_domains(),
            vec![
                GioDomain::PreimageHint,
                GioDomain::GetAccount,
                GioDomain::GetImage
            ]
        );
        // The hint names the address; the fetch names the hash.
        let sent = transport.sent();
        assert_eq!(sent[0].1, codec::encode_code_hint(&snapshot(), &address));
        assert_eq!(
            sent[2].1,
            codec::encode_get_image(HashType::Keccak256, &code_hash)
        );
    }

    #[tokio::test]
    async fn test_header_round_trip() {
        let transport = MockTransport::new();
        let header = sample_header(1234);
        let encoded = alloy_rlp::encode(&header);
        let hash = header.hash_slow();
        transport.stub_domain(GioDomain::PreimageHint, vec![]);
        transport.stub(
            GioDomain::GetImage,
            codec::encode_get_image(HashType::Keccak256, &hash),
            encoded.clone(),
        );

        let got = oracle(&transport).get_block_header(hash).await.unwrap();
        assert_eq!(got, header);
        assert_eq!(alloy_rlp::encode(&got), encoded);
        assert_eq!(got.hash_slow(), hash);

        // Hint went out before the fetch.
        assert_eq!(
            transport.sent_domains(),
            vec![GioDomain::PreimageHint, GioDomain::GetImage]
        );
        assert_eq!(transport.sent()[0].1, codec::encode_block_hint(&hash));
    }

    #[tokio::test]
    async fn test_header_garbage_is_decoding_error() {
        let transport = MockTransport::new();
        transport.stub_domain(GioDomain::PreimageHint, vec![]);
        transport.stub_domain(GioDomain::GetImage, vec![0xff, 0x00, 0xff]);

        let err = oracle(&transport)
            .get_block_header(B256::repeat_byte(0x77))
            .await
            .unwrap_err();
        assert!(matches!(err, GioEvmError::Decoding(_)));
    }

    #[tokio::test]
    async fn test_latest_block_hash_is_local() {
        let transport = MockTransport::new();
        let oracle = oracle(&transport);
        assert_eq!(oracle.latest_block_hash(), snapshot());
        assert_eq!(oracle.latest_block_hash(), snapshot());
        assert!(transport.sent().is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_reads_match_sequential() {
        let transport = MockTransport::new();
        let address = Address::repeat_byte(0x22);
        let slot = B256::repeat_byte(0x33);
        let account = Account {
            nonce: 9,
            ..Account::default()
        };
        transport.stub_domain(GioDomain::GetAccount, codec::encode_account(&account));
        transport.stub_domain(GioDomain::GetStorage, vec![0x5a; 32]);

        let oracle = oracle(&transport);
        let (joined_account, joined_word) = tokio::join!(
            oracle.get_account(address),
            oracle.get_storage_slot(address, slot)
        );

        let sequential_account = oracle.get_account(address).await.unwrap();
        let sequential_word = oracle.get_storage_slot(address, slot).await.unwrap();
        assert_eq!(joined_account.unwrap(), sequential_account);
        assert_eq!(joined_word.unwrap(), sequential_word);
    }

    #[tokio::test]
    async fn test_transport_failure_passes_through() {
        let transport = MockTransport::new();
        transport.fail_domain(GioDomain::GetAccount, "connection refused");

        let err = oracle(&transport)
            .get_account(Address::repeat_byte(0x22))
            .await
            .unwrap_err();
        match err {
            GioEvmError::Transport(message) => assert!(message.contains("connection refused")),
            other => panic!("unexpected error: {other}"),
        }
    }
}
