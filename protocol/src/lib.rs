//! Client side protocol layer of the Fuel optimistic rollup.
//!
//! Encodes and decodes the packed records the verifier contract consumes, builds and signs
//! transactions, commits leaves into roots and roots into blocks, and assembles the
//! transaction proofs used for withdrawals and fraud proofs.

pub mod amount;
pub mod bindings;
pub mod chain_reader;
pub mod codec;
pub mod deposit;
pub mod eip712;
pub mod error;
pub mod header;
pub mod input;
pub mod leaf;
pub mod merkle;
pub mod metadata;
pub mod output;
pub mod proof;
pub mod transaction;
pub mod utxo;
pub mod verifier;
pub mod witness;

#[cfg(test)]
mod test_utils;

pub use codec::{Canonical, Packed};
pub use eip712::ProtocolDomain;
pub use error::{Error, Result};
pub use header::{BlockHeader, RootHeader};
pub use leaf::Leaf;
pub use proof::{TransactionProof, TransactionProofBuilder};
pub use transaction::{DataItem, Transaction, TransactionBuilder, TransactionLeaf, UnsignedTransaction};
pub use witness::Witness;
