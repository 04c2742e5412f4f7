//! Root and block headers.
//!
//! Both are identified on chain by `hash_packed`. A block stores the packed hashes of its
//! roots, never the root headers themselves.

use crate::codec::{HeaderWidth, Packed, Reader, Writer, decode_hashes, encode_hashes};
use crate::error::Result;
use crate::leaf::{Leaf, concat_leaves, leaf_hashes};
use crate::merkle::merkle_root;
use alloy::primitives::{Address, B256, U256, keccak256};

/// Commitment to one ordered batch of leaves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RootHeader {
    pub root_producer: Address,
    pub merkle_tree_root: B256,
    pub commitment_hash: B256,
    pub root_length: U256,
    pub fee_token: U256,
    pub fee: U256,
}

impl RootHeader {
    /// Header for `leaves` as the verifier records it when they are submitted with `commitRoot`.
    pub fn from_leaves(
        root_producer: Address,
        fee_token: U256,
        fee: U256,
        leaves: &[Leaf],
    ) -> Result<Self> {
        let combined = concat_leaves(leaves)?;
        Ok(Self {
            root_producer,
            merkle_tree_root: merkle_root(&leaf_hashes(leaves)?)?,
            commitment_hash: keccak256(&combined),
            root_length: U256::from(combined.len()),
            fee_token,
            fee,
        })
    }

    pub(crate) fn encode_fields(&self, writer: &mut Writer) {
        writer.write_address(&self.root_producer);
        writer.write_b256(&self.merkle_tree_root);
        writer.write_b256(&self.commitment_hash);
        writer.write_u256(&self.root_length);
        writer.write_u256(&self.fee_token);
        writer.write_u256(&self.fee);
    }

    pub(crate) fn decode_fields(reader: &mut Reader<'_>) -> Result<Self> {
        Ok(Self {
            root_producer: reader.read_address("RootHeader::rootProducer")?,
            merkle_tree_root: reader.read_b256("RootHeader::merkleTreeRoot")?,
            commitment_hash: reader.read_b256("RootHeader::commitmentHash")?,
            root_length: reader.read_u256("RootHeader::rootLength")?,
            fee_token: reader.read_u256("RootHeader::feeToken")?,
            fee: reader.read_u256("RootHeader::fee")?,
        })
    }
}

impl Packed for RootHeader {
    fn encode_packed(&self, writer: &mut Writer) -> Result<()> {
        self.encode_fields(writer);
        Ok(())
    }

    fn decode_packed(reader: &mut Reader<'_>) -> Result<Self> {
        Self::decode_fields(reader)
    }
}

/// Commitment to an ordered batch of roots, chained to the previous block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockHeader {
    pub producer: Address,
    pub previous_block_hash: B256,
    pub height: U256,
    pub ethereum_block_number: U256,
    pub num_tokens: U256,
    pub num_addresses: U256,
    pub roots: Vec<B256>,
}

impl BlockHeader {
    /// Position of a root header hash within this block.
    pub fn root_index(&self, root_hash: &B256) -> Option<usize> {
        self.roots.iter().position(|root| root == root_hash)
    }

    pub(crate) fn encode_fields(&self, writer: &mut Writer) -> Result<()> {
        writer.write_address(&self.producer);
        writer.write_b256(&self.previous_block_hash);
        writer.write_u256(&self.height);
        writer.write_u256(&self.ethereum_block_number);
        writer.write_u256(&self.num_tokens);
        writer.write_u256(&self.num_addresses);
        writer.write_span(HeaderWidth::U16, "BlockHeader::roots", |w| {
            encode_hashes(&self.roots, w);
            Ok(())
        })
    }

    pub(crate) fn decode_fields(reader: &mut Reader<'_>) -> Result<Self> {
        Ok(Self {
            producer: reader.read_address("BlockHeader::producer")?,
            previous_block_hash: reader.read_b256("BlockHeader::previousBlockHash")?,
            height: reader.read_u256("BlockHeader::height")?,
            ethereum_block_number: reader.read_u256("BlockHeader::ethereumBlockNumber")?,
            num_tokens: reader.read_u256("BlockHeader::numTokens")?,
            num_addresses: reader.read_u256("BlockHeader::numAddresses")?,
            roots: decode_hashes(
                reader.read_span(HeaderWidth::U16, "BlockHeader::roots")?,
                "BlockHeader::roots",
            )?,
        })
    }
}

impl Packed for BlockHeader {
    fn encode_packed(&self, writer: &mut Writer) -> Result<()> {
        self.encode_fields(writer)
    }

    fn decode_packed(reader: &mut Reader<'_>) -> Result<Self> {
        Self::decode_fields(reader)
    }
}
