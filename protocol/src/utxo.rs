use crate::bindings::commitments::UtxoCommitment;
use crate::codec::Canonical;
use crate::error::{Error, Result};
use crate::output::Output;
use alloy::{
    primitives::{B256, U256, keccak256},
    sol_types::SolValue,
};

/// A spendable output, identified by the transaction that created it and its position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utxo {
    transaction_hash_id: B256,
    output_index: u8,
    output: Output,
}

impl Utxo {
    pub fn new(transaction_hash_id: B256, output_index: u8, output: Output) -> Result<Self> {
        if matches!(output, Output::Return { .. }) {
            return Err(Error::UnspendableOutput(usize::from(output_index)));
        }
        Ok(Self {
            transaction_hash_id,
            output_index,
            output,
        })
    }

    pub fn transaction_hash_id(&self) -> B256 {
        self.transaction_hash_id
    }

    pub fn output_index(&self) -> u8 {
        self.output_index
    }

    pub fn output(&self) -> &Output {
        &self.output
    }
}

impl Canonical for Utxo {
    fn hash_canonical(&self) -> B256 {
        let output = self.output.commitment();
        keccak256(
            UtxoCommitment {
                transactionHashId: self.transaction_hash_id,
                outputIndex: U256::from(self.output_index),
                outputType: U256::from(output.outputType),
                owner: output.owner,
                amount: output.amount,
                token: output.token,
                digest: output.digest,
                expiry: U256::from(output.expiry),
                returnOwner: output.returnOwner,
            }
            .abi_encode(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amount::{CompressedAmount, compress};
    use crate::output::{CompressedId, OutputValue};
    use alloy::primitives::{Address, Bytes};

    fn transfer(amount: CompressedAmount) -> Output {
        Output::Transfer(OutputValue::new(
            CompressedId::from_id(2),
            amount,
            CompressedId::from_address(Address::repeat_byte(0x44)),
        ))
    }

    #[test]
    fn test_utxo_id_uses_decompressed_amount() {
        let hash_id = B256::repeat_byte(0x01);
        let shifted = Utxo::new(
            hash_id,
            0,
            transfer(CompressedAmount::new(U256::from(0x10), 8).unwrap()),
        )
        .unwrap();
        let plain = Utxo::new(hash_id, 0, transfer(compress(U256::from(0x1000)))).unwrap();
        assert_eq!(shifted.hash_canonical(), plain.hash_canonical());
    }

    #[test]
    fn test_utxo_id_binds_position() {
        let output = transfer(compress(U256::from(5)));
        let first = Utxo::new(B256::repeat_byte(1), 0, output.clone()).unwrap();
        let second = Utxo::new(B256::repeat_byte(1), 1, output.clone()).unwrap();
        let other_tx = Utxo::new(B256::repeat_byte(2), 0, output).unwrap();
        assert_ne!(first.hash_canonical(), second.hash_canonical());
        assert_ne!(first.hash_canonical(), other_tx.hash_canonical());
    }

    #[test]
    fn test_return_output_is_not_spendable() {
        let output = Output::Return {
            data: Bytes::from_static(b"memo"),
        };
        assert!(matches!(
            Utxo::new(B256::ZERO, 3, output),
            Err(Error::UnspendableOutput(3))
        ));
    }
}
