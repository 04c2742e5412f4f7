use crate::bindings::commitments::DepositCommitment;
use crate::codec::{Canonical, Packed, Reader, Writer};
use crate::error::Result;
use alloy::{
    primitives::{Address, B256, U256, keccak256},
    sol_types::SolValue,
};

/// A pending L1 to L2 deposit as recorded by the verifier.
///
/// The deposit id covers owner, token and L1 block number. The value is what the verifier
/// stores under that id, so it is carried here but never hashed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deposit {
    pub owner: Address,
    pub token: U256,
    pub block_number: U256,
    pub value: U256,
}

impl Deposit {
    pub fn new(owner: Address, token: U256, block_number: U256, value: U256) -> Self {
        Self {
            owner,
            token,
            block_number,
            value,
        }
    }
}

impl Canonical for Deposit {
    fn hash_canonical(&self) -> B256 {
        keccak256(
            DepositCommitment {
                owner: self.owner,
                token: self.token,
                blockNumber: self.block_number,
            }
            .abi_encode(),
        )
    }
}

impl Packed for Deposit {
    fn encode_packed(&self, writer: &mut Writer) -> Result<()> {
        writer.write_address(&self.owner);
        writer.write_u256(&self.token);
        writer.write_u256(&self.block_number);
        writer.write_u256(&self.value);
        Ok(())
    }

    fn decode_packed(reader: &mut Reader<'_>) -> Result<Self> {
        Ok(Self {
            owner: reader.read_address("Deposit::owner")?,
            token: reader.read_u256("Deposit::token")?,
            block_number: reader.read_u256("Deposit::blockNumber")?,
            value: reader.read_u256("Deposit::value")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deposit_id_excludes_value() {
        let owner = Address::repeat_byte(0x0a);
        let small = Deposit::new(owner, U256::from(1), U256::from(100), U256::from(1));
        let large = Deposit::new(owner, U256::from(1), U256::from(100), U256::MAX);
        assert_eq!(small.hash_canonical(), large.hash_canonical());

        let later = Deposit::new(owner, U256::from(1), U256::from(101), U256::from(1));
        assert_ne!(small.hash_canonical(), later.hash_canonical());
    }

    #[test]
    fn test_deposit_id_matches_abi_encoding() {
        let deposit = Deposit::new(
            Address::repeat_byte(0x0b),
            U256::from(7),
            U256::from(9),
            U256::from(3),
        );
        let expected = keccak256(
            (deposit.owner, deposit.token, deposit.block_number).abi_encode(),
        );
        assert_eq!(deposit.hash_canonical(), expected);
    }

    #[test]
    fn test_deposit_packed_round_trip() {
        let deposit = Deposit::new(
            Address::repeat_byte(0x0c),
            U256::from(2),
            U256::from(12_000_000),
            U256::from(10).pow(U256::from(18)),
        );
        let bytes = deposit.to_packed_bytes().unwrap();
        assert_eq!(bytes.len(), 20 + 32 * 3);
        assert_eq!(Deposit::from_packed_bytes(&bytes).unwrap(), deposit);
    }
}
