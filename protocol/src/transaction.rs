//! Transaction leaves and the builder that assembles them.
//!
//! A transaction has two encodings. The leaf is what gets batched into a root:
//!
//! ```text
//! uint16 length || uint8 metadataSpan || metadata || uint16 witnessesSpan || witnesses
//!               || uint16 inputsSpan || inputs || uint16 outputsSpan || outputs
//! ```
//!
//! The unsigned body is what gets signed, and it is the only place `data[]` and the signature
//! fee appear:
//!
//! ```text
//! uint16 inputsSpan || inputs || uint16 outputsSpan || outputs || uint16 dataSpan || data
//!                   || uint256 signatureFeeToken || uint256 signatureFee
//! ```

use crate::codec::{
    Canonical, HeaderWidth, Packed, Reader, Writer, decode_hashes, decode_typed_array,
    encode_hashes, encode_typed_array,
};
use crate::deposit::Deposit;
use crate::eip712::ProtocolDomain;
use crate::error::{Error, Result};
use crate::header::RootHeader;
use crate::input::Input;
use crate::metadata::Metadata;
use crate::output::Output;
use crate::utxo::Utxo;
use crate::witness::Witness;
use alloy::{
    primitives::{Address, B256, Bytes, U256},
    signers::Signer,
};
use std::{fmt, sync::Arc};
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnsignedTransaction {
    pub inputs: Vec<Input>,
    pub outputs: Vec<Output>,
    pub data: Vec<B256>,
    pub signature_fee_token: U256,
    pub signature_fee: U256,
}

impl Packed for UnsignedTransaction {
    fn encode_packed(&self, writer: &mut Writer) -> Result<()> {
        writer.write_span(HeaderWidth::U16, "UnsignedTransaction::inputs", |w| {
            encode_typed_array(&self.inputs, w)
        })?;
        writer.write_span(HeaderWidth::U16, "UnsignedTransaction::outputs", |w| {
            encode_typed_array(&self.outputs, w)
        })?;
        writer.write_span(HeaderWidth::U16, "UnsignedTransaction::data", |w| {
            encode_hashes(&self.data, w);
            Ok(())
        })?;
        writer.write_u256(&self.signature_fee_token);
        writer.write_u256(&self.signature_fee);
        Ok(())
    }

    fn decode_packed(reader: &mut Reader<'_>) -> Result<Self> {
        let inputs = decode_typed_array(
            reader.read_variable(HeaderWidth::U16, "UnsignedTransaction::inputs")?,
        )?;
        let outputs = decode_typed_array(
            reader.read_variable(HeaderWidth::U16, "UnsignedTransaction::outputs")?,
        )?;
        let data = decode_hashes(
            reader.read_span(HeaderWidth::U16, "UnsignedTransaction::data")?,
            "UnsignedTransaction::data",
        )?;
        Ok(Self {
            inputs,
            outputs,
            data,
            signature_fee_token: reader.read_u256("UnsignedTransaction::signatureFeeToken")?,
            signature_fee: reader.read_u256("UnsignedTransaction::signatureFee")?,
        })
    }
}

/// The part of a transaction committed to in a root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionLeaf {
    pub metadata: Vec<Metadata>,
    pub witnesses: Vec<Witness>,
    pub inputs: Vec<Input>,
    pub outputs: Vec<Output>,
}

impl Packed for TransactionLeaf {
    fn encode_packed(&self, writer: &mut Writer) -> Result<()> {
        let mut body = Writer::new();
        body.write_span(HeaderWidth::U8, "Transaction::metadata", |w| {
            Metadata::encode_list(&self.metadata, w);
            Ok(())
        })?;
        body.write_span(HeaderWidth::U16, "Transaction::witnesses", |w| {
            encode_typed_array(&self.witnesses, w)
        })?;
        body.write_span(HeaderWidth::U16, "Transaction::inputs", |w| {
            encode_typed_array(&self.inputs, w)
        })?;
        body.write_span(HeaderWidth::U16, "Transaction::outputs", |w| {
            encode_typed_array(&self.outputs, w)
        })?;
        // The length counts everything after its own header.
        writer.write_variable(HeaderWidth::U16, &body.into_vec(), "Transaction::length")
    }

    fn decode_packed(reader: &mut Reader<'_>) -> Result<Self> {
        let mut body = reader.read_span(HeaderWidth::U16, "Transaction::length")?;
        let metadata = body.read_variable(HeaderWidth::U8, "Transaction::metadata")?;
        let witnesses =
            decode_typed_array(body.read_variable(HeaderWidth::U16, "Transaction::witnesses")?)?;
        let inputs: Vec<Input> =
            decode_typed_array(body.read_variable(HeaderWidth::U16, "Transaction::inputs")?)?;
        let outputs =
            decode_typed_array(body.read_variable(HeaderWidth::U16, "Transaction::outputs")?)?;
        body.finish("Transaction")?;

        // Metadata precedes the inputs on the wire but its shape depends on them.
        Ok(Self {
            metadata: Metadata::decode_list(metadata, &inputs)?,
            witnesses,
            inputs,
            outputs,
        })
    }
}

/// A built transaction: its leaf, the body its witnesses signed, and its hash id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    leaf: TransactionLeaf,
    unsigned: UnsignedTransaction,
    transaction_hash_id: B256,
}

impl Transaction {
    pub fn leaf(&self) -> &TransactionLeaf {
        &self.leaf
    }

    pub fn unsigned(&self) -> &UnsignedTransaction {
        &self.unsigned
    }

    pub fn data(&self) -> &[B256] {
        &self.unsigned.data
    }

    pub fn transaction_hash_id(&self) -> B256 {
        self.transaction_hash_id
    }

    pub fn to_leaf_bytes(&self) -> Result<Bytes> {
        self.leaf.to_packed_bytes()
    }

    pub fn hash_packed(&self) -> Result<B256> {
        self.leaf.hash_packed()
    }

    /// Every spendable output of this transaction as a UTXO.
    pub fn utxos(&self) -> Vec<Utxo> {
        self.leaf
            .outputs
            .iter()
            .enumerate()
            .filter_map(|(index, output)| {
                let index = u8::try_from(index).ok()?;
                Utxo::new(self.transaction_hash_id, index, output.clone()).ok()
            })
            .collect()
    }

    /// Addresses recovered from the signature witnesses, in witness order.
    pub fn signers(&self, domain: &ProtocolDomain) -> Result<Vec<Option<Address>>> {
        self.leaf
            .witnesses
            .iter()
            .map(|witness| domain.recover(witness, &self.unsigned))
            .collect()
    }
}

/// Something `data[i]` can commit to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataItem {
    Hash(B256),
    Utxo(Utxo),
    Deposit(Deposit),
    Root(RootHeader),
}

impl DataItem {
    pub fn commitment(&self) -> Result<B256> {
        match self {
            DataItem::Hash(hash) => Ok(*hash),
            DataItem::Utxo(utxo) => Ok(utxo.hash_canonical()),
            DataItem::Deposit(deposit) => Ok(deposit.hash_canonical()),
            DataItem::Root(root) => root.hash_packed(),
        }
    }
}

impl From<B256> for DataItem {
    fn from(hash: B256) -> Self {
        DataItem::Hash(hash)
    }
}

impl From<Utxo> for DataItem {
    fn from(utxo: Utxo) -> Self {
        DataItem::Utxo(utxo)
    }
}

impl From<Deposit> for DataItem {
    fn from(deposit: Deposit) -> Self {
        DataItem::Deposit(deposit)
    }
}

impl From<RootHeader> for DataItem {
    fn from(root: RootHeader) -> Self {
        DataItem::Root(root)
    }
}

pub type DynSigner = Arc<dyn Signer + Send + Sync>;

/// Where a witness comes from: a wallet that signs at build time, or a ready-made witness.
#[derive(Clone)]
pub enum WitnessSource {
    Wallet(DynSigner),
    Provided(Witness),
}

impl fmt::Debug for WitnessSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WitnessSource::Wallet(signer) => f.debug_tuple("Wallet").field(&signer.address()).finish(),
            WitnessSource::Provided(witness) => f.debug_tuple("Provided").field(witness).finish(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TransactionBuilder {
    inputs: Vec<Input>,
    outputs: Vec<Output>,
    data: Vec<DataItem>,
    metadata: Vec<Metadata>,
    witnesses: Vec<WitnessSource>,
    signature_fee_token: U256,
    signature_fee: U256,
    override_lengths: bool,
}

impl TransactionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input(mut self, input: Input) -> Self {
        self.inputs.push(input);
        self
    }

    pub fn output(mut self, output: Output) -> Self {
        self.outputs.push(output);
        self
    }

    pub fn data(mut self, item: impl Into<DataItem>) -> Self {
        self.data.push(item.into());
        self
    }

    pub fn metadata(mut self, metadata: Metadata) -> Self {
        self.metadata.push(metadata);
        self
    }

    /// Adds a witness produced by `signer` over the transaction hash id.
    pub fn wallet(mut self, signer: DynSigner) -> Self {
        self.witnesses.push(WitnessSource::Wallet(signer));
        self
    }

    /// Adds a witness as is, typically a `Caller` or `Producer` placeholder.
    pub fn witness(mut self, witness: Witness) -> Self {
        self.witnesses.push(WitnessSource::Provided(witness));
        self
    }

    pub fn signature_fee(mut self, token: U256, fee: U256) -> Self {
        self.signature_fee_token = token;
        self.signature_fee = fee;
        self
    }

    /// Skips the inputs/data/metadata count check, for deliberately malformed transactions.
    pub fn override_lengths(mut self, override_lengths: bool) -> Self {
        self.override_lengths = override_lengths;
        self
    }

    pub async fn build(self, domain: &ProtocolDomain) -> Result<Transaction> {
        let (inputs, data, metadata) = (self.inputs.len(), self.data.len(), self.metadata.len());
        if !self.override_lengths && (inputs != data || inputs != metadata) {
            return Err(Error::LengthMismatch {
                inputs,
                data,
                metadata,
            });
        }

        let unsigned = UnsignedTransaction {
            inputs: self.inputs,
            outputs: self.outputs,
            data: self
                .data
                .iter()
                .map(DataItem::commitment)
                .collect::<Result<Vec<_>>>()?,
            signature_fee_token: self.signature_fee_token,
            signature_fee: self.signature_fee,
        };
        let transaction_hash_id = domain.transaction_hash_id(&unsigned)?;

        let mut witnesses = Vec::with_capacity(self.witnesses.len());
        for source in self.witnesses {
            witnesses.push(match source {
                WitnessSource::Wallet(signer) => domain.sign(signer.as_ref(), &unsigned).await?,
                WitnessSource::Provided(witness) => witness,
            });
        }

        let leaf = TransactionLeaf {
            metadata: self.metadata,
            witnesses,
            inputs: unsigned.inputs.clone(),
            outputs: unsigned.outputs.clone(),
        };
        let encoded = leaf.to_packed_bytes()?;
        debug!(
            "Built transaction {}: {} inputs, {} outputs, {} witnesses, {} bytes",
            transaction_hash_id,
            leaf.inputs.len(),
            leaf.outputs.len(),
            leaf.witnesses.len(),
            encoded.len()
        );

        Ok(Transaction {
            leaf,
            unsigned,
            transaction_hash_id,
        })
    }
}
