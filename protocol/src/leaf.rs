use crate::codec::{HeaderWidth, Reader};
use crate::error::Result;
use crate::transaction::Transaction;
use alloy::primitives::{B256, Bytes, keccak256};

/// One entry of a root. Leaves that are not well formed transactions are kept as raw bytes
/// so malformed roots can still be committed and proven against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Leaf {
    Transaction(Box<Transaction>),
    Raw(Bytes),
}

impl Leaf {
    pub fn to_bytes(&self) -> Result<Bytes> {
        match self {
            Leaf::Transaction(transaction) => transaction.to_leaf_bytes(),
            Leaf::Raw(bytes) => Ok(bytes.clone()),
        }
    }

    pub fn hash_packed(&self) -> Result<B256> {
        Ok(keccak256(self.to_bytes()?))
    }

    /// The `data[]` committed by the unsigned body, empty for raw leaves.
    pub fn data(&self) -> &[B256] {
        match self {
            Leaf::Transaction(transaction) => transaction.data(),
            Leaf::Raw(_) => &[],
        }
    }
}

impl From<Transaction> for Leaf {
    fn from(transaction: Transaction) -> Self {
        Leaf::Transaction(Box::new(transaction))
    }
}

impl From<Bytes> for Leaf {
    fn from(bytes: Bytes) -> Self {
        Leaf::Raw(bytes)
    }
}

pub fn leaf_hashes(leaves: &[Leaf]) -> Result<Vec<B256>> {
    leaves.iter().map(Leaf::hash_packed).collect()
}

/// Concatenated leaf bytes, as passed to `commitRoot`.
pub fn concat_leaves(leaves: &[Leaf]) -> Result<Vec<u8>> {
    let mut combined = Vec::new();
    for leaf in leaves {
        combined.extend_from_slice(&leaf.to_bytes()?);
    }
    Ok(combined)
}

/// Splits concatenated leaves using the `uint16 length` each leaf starts with.
///
/// Returned slices include their own length header.
pub fn split_leaves(bytes: &[u8]) -> Result<Vec<Bytes>> {
    let mut reader = Reader::new(bytes);
    let mut leaves = Vec::new();
    while !reader.is_empty() {
        let start = reader.position();
        reader.read_variable(HeaderWidth::U16, "Leaf::length")?;
        leaves.push(Bytes::copy_from_slice(&bytes[start..reader.position()]));
    }
    Ok(leaves)
}
