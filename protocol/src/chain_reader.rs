//! Reconstructs headers and deposits from verifier contract logs.

use crate::bindings::fuel::IFuel;
use crate::codec::Packed;
use crate::deposit::Deposit;
use crate::header::{BlockHeader, RootHeader};
use crate::leaf::split_leaves;
use alloy::{
    primitives::{Address, B256, Bytes, U256},
    rpc::types::{Filter, Log},
    sol_types::{SolCall, SolEvent},
};
use anyhow::Error;
use common::execution_layer::ExecutionLayer;
use tracing::debug;

pub struct ChainReader {
    execution_layer: ExecutionLayer,
    contract: Address,
    from_block: u64,
}

impl ChainReader {
    pub fn new(execution_layer: ExecutionLayer, contract: Address, from_block: u64) -> Self {
        Self {
            execution_layer,
            contract,
            from_block,
        }
    }

    fn filter(&self, signature: B256) -> Filter {
        Filter::new()
            .address(self.contract)
            .event_signature(signature)
            .from_block(self.from_block)
    }

    async fn root_log(&self, root_hash: B256) -> Result<Log, Error> {
        let filter = self
            .filter(IFuel::RootCommitted::SIGNATURE_HASH)
            .topic1(root_hash);
        debug!("Querying RootCommitted logs for root {}", root_hash);
        self.execution_layer
            .get_logs(filter)
            .await?
            .into_iter()
            .next()
            .ok_or(anyhow::anyhow!("Root {} not found in logs", root_hash))
    }

    pub async fn root_from_logs(&self, root_hash: B256) -> Result<RootHeader, Error> {
        root_header_from_log(&self.root_log(root_hash).await?)
    }

    /// Root header together with the leaves submitted in the originating `commitRoot` call.
    pub async fn root_with_leaves(&self, root_hash: B256) -> Result<(RootHeader, Vec<Bytes>), Error> {
        let log = self.root_log(root_hash).await?;
        let root = root_header_from_log(&log)?;
        let tx_hash = log
            .transaction_hash
            .ok_or(anyhow::anyhow!("RootCommitted log without transaction hash"))?;
        let input = self.execution_layer.get_transaction_input(tx_hash).await?;
        let call = IFuel::commitRootCall::abi_decode(&input)?;
        let leaves = split_leaves(&call.transactions)?;
        debug!(
            "Root {} has {} leaves in transaction {}",
            root_hash,
            leaves.len(),
            tx_hash
        );
        Ok((root, leaves))
    }

    async fn blocks(&self, filter: Filter) -> Result<Vec<BlockHeader>, Error> {
        self.execution_layer
            .get_logs(filter)
            .await?
            .iter()
            .map(block_header_from_log)
            .collect()
    }

    pub async fn block_from_logs_by_height(&self, height: u64) -> Result<BlockHeader, Error> {
        let filter = self
            .filter(IFuel::BlockCommitted::SIGNATURE_HASH)
            .topic2(B256::from(U256::from(height)));
        debug!("Querying BlockCommitted logs for height {}", height);
        self.blocks(filter)
            .await?
            .into_iter()
            .next()
            .ok_or(anyhow::anyhow!("Block at height {} not found in logs", height))
    }

    pub async fn block_from_logs_by_hash(&self, block_hash: B256) -> Result<BlockHeader, Error> {
        debug!("Scanning BlockCommitted logs for block {}", block_hash);
        for block in self
            .blocks(self.filter(IFuel::BlockCommitted::SIGNATURE_HASH))
            .await?
        {
            if block.hash_packed()? == block_hash {
                return Ok(block);
            }
        }
        Err(anyhow::anyhow!("Block {} not found in logs", block_hash))
    }

    /// The committed block whose roots include `root_hash`.
    pub async fn block_containing_root(&self, root_hash: B256) -> Result<BlockHeader, Error> {
        debug!("Scanning BlockCommitted logs for root {}", root_hash);
        self.blocks(self.filter(IFuel::BlockCommitted::SIGNATURE_HASH))
            .await?
            .into_iter()
            .find(|block| block.root_index(&root_hash).is_some())
            .ok_or(anyhow::anyhow!("No block commits root {}", root_hash))
    }

    pub async fn deposits_from_logs(&self, owner: Address) -> Result<Vec<Deposit>, Error> {
        let filter = self
            .filter(IFuel::DepositMade::SIGNATURE_HASH)
            .topic1(owner.into_word());
        debug!("Querying DepositMade logs for owner {}", owner);
        self.execution_layer
            .get_logs(filter)
            .await?
            .iter()
            .map(deposit_from_log)
            .collect()
    }
}

pub fn root_header_from_log(log: &Log) -> Result<RootHeader, Error> {
    let event = log.log_decode::<IFuel::RootCommitted>()?;
    Ok(RootHeader {
        root_producer: event.inner.rootProducer,
        merkle_tree_root: event.inner.merkleTreeRoot,
        commitment_hash: event.inner.commitmentHash,
        root_length: event.inner.rootLength,
        fee_token: event.inner.feeToken,
        fee: event.inner.fee,
    })
}

pub fn block_header_from_log(log: &Log) -> Result<BlockHeader, Error> {
    let event = log.log_decode::<IFuel::BlockCommitted>()?;
    let ethereum_block_number = log
        .block_number
        .ok_or(anyhow::anyhow!("BlockCommitted log without block number"))?;
    Ok(BlockHeader {
        producer: event.inner.producer,
        previous_block_hash: event.inner.previousBlockHash,
        height: event.inner.height,
        ethereum_block_number: U256::from(ethereum_block_number),
        num_tokens: event.inner.numTokens,
        num_addresses: event.inner.numAddresses,
        roots: event.inner.roots.clone(),
    })
}

pub fn deposit_from_log(log: &Log) -> Result<Deposit, Error> {
    let event = log.log_decode::<IFuel::DepositMade>()?;
    let block_number = log
        .block_number
        .ok_or(anyhow::anyhow!("DepositMade log without block number"))?;
    Ok(Deposit::new(
        event.inner.owner,
        U256::from(event.inner.token),
        U256::from(block_number),
        event.inner.value,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::LogData;

    fn rpc_log(data: LogData, block_number: u64) -> Log {
        Log {
            inner: alloy::primitives::Log {
                address: Address::repeat_byte(0xf0),
                data,
            },
            block_number: Some(block_number),
            transaction_hash: Some(B256::repeat_byte(0x77)),
            ..Default::default()
        }
    }

    #[test]
    fn test_root_header_from_log() {
        let event = IFuel::RootCommitted {
            root: B256::repeat_byte(1),
            rootProducer: Address::repeat_byte(2),
            feeToken: U256::from(3),
            fee: U256::from(4),
            rootLength: U256::from(5),
            merkleTreeRoot: B256::repeat_byte(6),
            commitmentHash: B256::repeat_byte(7),
        };
        let header = root_header_from_log(&rpc_log(event.encode_log_data(), 10)).unwrap();
        assert_eq!(header.root_producer, Address::repeat_byte(2));
        assert_eq!(header.merkle_tree_root, B256::repeat_byte(6));
        assert_eq!(header.commitment_hash, B256::repeat_byte(7));
        assert_eq!(header.fee, U256::from(4));
    }

    #[test]
    fn test_block_header_from_log() {
        let event = IFuel::BlockCommitted {
            producer: Address::repeat_byte(1),
            numTokens: U256::from(2),
            numAddresses: U256::from(3),
            previousBlockHash: B256::repeat_byte(4),
            height: U256::from(5),
            roots: vec![B256::repeat_byte(6)],
        };
        let header = block_header_from_log(&rpc_log(event.encode_log_data(), 900)).unwrap();
        assert_eq!(header.height, U256::from(5));
        assert_eq!(header.ethereum_block_number, U256::from(900));
        assert_eq!(header.roots, vec![B256::repeat_byte(6)]);
    }

    #[test]
    fn test_deposit_from_log() {
        let event = IFuel::DepositMade {
            owner: Address::repeat_byte(9),
            token: 2,
            value: U256::from(1000),
        };
        let deposit = deposit_from_log(&rpc_log(event.encode_log_data(), 42)).unwrap();
        assert_eq!(
            deposit,
            Deposit::new(
                Address::repeat_byte(9),
                U256::from(2),
                U256::from(42),
                U256::from(1000)
            )
        );
    }

    #[test]
    fn test_wrong_event_is_rejected() {
        let event = IFuel::DepositMade {
            owner: Address::repeat_byte(9),
            token: 2,
            value: U256::from(1000),
        };
        assert!(root_header_from_log(&rpc_log(event.encode_log_data(), 1)).is_err());
    }
}
