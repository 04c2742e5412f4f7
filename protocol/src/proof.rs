//! Transaction proofs: the blob the verifier consumes for withdrawals and fraud proofs.
//!
//! A proof flattens the block header, the root header, the Merkle path of one leaf and that
//! leaf's bytes into a single self-contained record.

use crate::codec::{HeaderWidth, Packed, Reader, Writer, decode_hashes, encode_hashes};
use crate::error::{Error, Result};
use crate::header::{BlockHeader, RootHeader};
use crate::leaf::{Leaf, leaf_hashes};
use crate::merkle::{MAX_TREE_HEIGHT, MerkleProof, merkle_proof};
use alloy::primitives::{Address, B256, Bytes, U256, keccak256};
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionProof {
    pub block: BlockHeader,
    pub root: RootHeader,
    pub root_index: u16,
    /// Sibling hashes; left or right placement follows the bits of `transaction_index`.
    pub merkle_proof: Vec<B256>,
    pub input_output_index: u8,
    pub transaction_index: u16,
    /// Packed leaf bytes, empty when the requested leaf was past the end of the root.
    pub transaction: Bytes,
    pub data: Vec<B256>,
    pub signature_fee_token: U256,
    pub signature_fee: U256,
    pub token: Address,
    pub selector: Address,
    /// Concatenated packed proofs of the outputs spent by `transaction`.
    pub input_proofs: Bytes,
}

impl TransactionProof {
    /// Merkle path with the side of each sibling taken from `transaction_index`.
    ///
    /// Levels above the highest bit of the index always place the tracked node on the left.
    pub fn merkle_path(&self) -> Result<MerkleProof> {
        if self.merkle_proof.len() > MAX_TREE_HEIGHT {
            return Err(Error::HeightOverflow(self.merkle_proof.len()));
        }
        let index = usize::from(self.transaction_index);
        Ok(MerkleProof {
            index,
            left_flags: (0..self.merkle_proof.len())
                .map(|level| {
                    u32::try_from(level)
                        .ok()
                        .and_then(|level| index.checked_shr(level))
                        .is_none_or(|bits| bits & 1 == 0)
                })
                .collect(),
            siblings: self.merkle_proof.clone(),
        })
    }

    /// Whether `transaction` is committed by the root and the root by the block.
    pub fn verify_inclusion(&self) -> Result<bool> {
        let root_hash = self.root.hash_packed()?;
        if self.block.roots.get(usize::from(self.root_index)) != Some(&root_hash) {
            return Ok(false);
        }
        self.merkle_path()?
            .verify(keccak256(&self.transaction), self.root.merkle_tree_root)
    }

    /// The proofs carried in `input_proofs`.
    pub fn decode_input_proofs(&self) -> Result<Vec<TransactionProof>> {
        decode_proof_list(&self.input_proofs)
    }
}

pub fn encode_proof_list(proofs: &[TransactionProof]) -> Result<Bytes> {
    let mut writer = Writer::new();
    for proof in proofs {
        proof.encode_packed(&mut writer)?;
    }
    Ok(writer.into_bytes())
}

pub fn decode_proof_list(bytes: &[u8]) -> Result<Vec<TransactionProof>> {
    let mut reader = Reader::new(bytes);
    let mut proofs = Vec::new();
    while !reader.is_empty() {
        proofs.push(TransactionProof::decode_packed(&mut reader)?);
    }
    Ok(proofs)
}

impl Packed for TransactionProof {
    fn encode_packed(&self, writer: &mut Writer) -> Result<()> {
        self.block.encode_fields(writer)?;
        self.root.encode_fields(writer);
        writer.write_u16(self.root_index);
        writer.write_span(HeaderWidth::U16, "TransactionProof::merkleProof", |w| {
            encode_hashes(&self.merkle_proof, w);
            Ok(())
        })?;
        writer.write_u8(self.input_output_index);
        writer.write_u16(self.transaction_index);
        writer.write_variable(
            HeaderWidth::U16,
            &self.transaction,
            "TransactionProof::transaction",
        )?;
        writer.write_span(HeaderWidth::U16, "TransactionProof::data", |w| {
            encode_hashes(&self.data, w);
            Ok(())
        })?;
        writer.write_u256(&self.signature_fee_token);
        writer.write_u256(&self.signature_fee);
        writer.write_address(&self.token);
        writer.write_address(&self.selector);
        writer.write_variable(
            HeaderWidth::U16,
            &self.input_proofs,
            "TransactionProof::inputProofs",
        )
    }

    fn decode_packed(reader: &mut Reader<'_>) -> Result<Self> {
        Ok(Self {
            block: BlockHeader::decode_fields(reader)?,
            root: RootHeader::decode_fields(reader)?,
            root_index: reader.read_u16("TransactionProof::rootIndex")?,
            merkle_proof: decode_hashes(
                reader.read_span(HeaderWidth::U16, "TransactionProof::merkleProof")?,
                "TransactionProof::merkleProof",
            )?,
            input_output_index: reader.read_u8("TransactionProof::inputOutputIndex")?,
            transaction_index: reader.read_u16("TransactionProof::transactionIndex")?,
            transaction: Bytes::copy_from_slice(
                reader.read_variable(HeaderWidth::U16, "TransactionProof::transaction")?,
            ),
            data: decode_hashes(
                reader.read_span(HeaderWidth::U16, "TransactionProof::data")?,
                "TransactionProof::data",
            )?,
            signature_fee_token: reader.read_u256("TransactionProof::signatureFeeToken")?,
            signature_fee: reader.read_u256("TransactionProof::signatureFee")?,
            token: reader.read_address("TransactionProof::token")?,
            selector: reader.read_address("TransactionProof::selector")?,
            input_proofs: Bytes::copy_from_slice(
                reader.read_variable(HeaderWidth::U16, "TransactionProof::inputProofs")?,
            ),
        })
    }
}

/// Assembles a [`TransactionProof`] for one leaf of a root inside a block.
#[derive(Debug, Clone)]
pub struct TransactionProofBuilder<'a> {
    block: &'a BlockHeader,
    root: &'a RootHeader,
    leaves: &'a [Leaf],
    transaction_index: usize,
    input_output_index: u8,
    token: Address,
    selector: Address,
    signature_fee_override: Option<(U256, U256)>,
    input_proofs: Vec<TransactionProof>,
}

impl<'a> TransactionProofBuilder<'a> {
    pub fn new(
        block: &'a BlockHeader,
        root: &'a RootHeader,
        leaves: &'a [Leaf],
        transaction_index: usize,
    ) -> Self {
        Self {
            block,
            root,
            leaves,
            transaction_index,
            input_output_index: 0,
            token: Address::ZERO,
            selector: Address::ZERO,
            signature_fee_override: None,
            input_proofs: Vec::new(),
        }
    }

    pub fn input_output_index(mut self, index: u8) -> Self {
        self.input_output_index = index;
        self
    }

    pub fn token(mut self, token: Address) -> Self {
        self.token = token;
        self
    }

    pub fn selector(mut self, selector: Address) -> Self {
        self.selector = selector;
        self
    }

    /// Replaces the fee copied from the root, used to build fee misalignment proofs.
    pub fn signature_fee_override(mut self, token: U256, fee: U256) -> Self {
        self.signature_fee_override = Some((token, fee));
        self
    }

    pub fn input_proofs(mut self, proofs: Vec<TransactionProof>) -> Self {
        self.input_proofs = proofs;
        self
    }

    pub fn build(self) -> Result<TransactionProof> {
        let root_hash = self.root.hash_packed()?;
        let root_index = self
            .block
            .root_index(&root_hash)
            .ok_or(Error::RootNotInBlock(root_hash))?;

        let path = merkle_proof(&leaf_hashes(self.leaves)?, self.transaction_index)?;
        if path.index != self.transaction_index {
            debug!(
                "Transaction index {} out of range for {} leaves, proving rightmost index {}",
                self.transaction_index,
                self.leaves.len(),
                path.index
            );
        }

        let (transaction, data) = match self.leaves.get(self.transaction_index) {
            Some(leaf) => (leaf.to_bytes()?, leaf.data().to_vec()),
            None => (Bytes::new(), Vec::new()),
        };
        let (signature_fee_token, signature_fee) = self
            .signature_fee_override
            .unwrap_or((self.root.fee_token, self.root.fee));

        debug!(
            "Assembled proof for root {} at index {}, transaction index {}",
            root_hash, root_index, path.index
        );

        Ok(TransactionProof {
            block: self.block.clone(),
            root: self.root.clone(),
            root_index: to_u16(root_index, "TransactionProof::rootIndex")?,
            merkle_proof: path.siblings,
            input_output_index: self.input_output_index,
            transaction_index: to_u16(path.index, "TransactionProof::transactionIndex")?,
            transaction,
            data,
            signature_fee_token,
            signature_fee,
            token: self.token,
            selector: self.selector,
            input_proofs: encode_proof_list(&self.input_proofs)?,
        })
    }
}

fn to_u16(value: usize, field: &'static str) -> Result<u16> {
    u16::try_from(value).map_err(|_| Error::FieldOverflow {
        field,
        max: usize::from(u16::MAX),
        actual: value,
    })
}
