//! EIP-712 domain separation and transaction signing.
//!
//! The transaction hash id is the EIP-712 digest of the unsigned transaction body. It is both
//! the message signed by wallets and the identifier the verifier compares across proofs, so
//! it must be computed identically on both sides.

use crate::codec::Packed;
use crate::error::Result;
use crate::transaction::UnsignedTransaction;
use crate::witness::Witness;
use alloy::{
    primitives::{Address, B256, U256, keccak256},
    signers::Signer,
    sol_types::SolValue,
};
use tracing::debug;

pub const DOMAIN_TYPE: &str =
    "EIP712Domain(string name,string version,uint256 chainId,address verifyingContract)";
pub const TRANSACTION_TYPE: &str = "Transaction(bytes32 hash)";

pub const DEFAULT_DOMAIN_NAME: &str = "Fuel";
pub const DEFAULT_DOMAIN_VERSION: &str = "1.1.0";

pub fn domain_hash(name: &str, version: &str, chain_id: u64, verifying_contract: Address) -> B256 {
    keccak256(
        (
            keccak256(DOMAIN_TYPE),
            keccak256(name),
            keccak256(version),
            U256::from(chain_id),
            verifying_contract,
        )
            .abi_encode(),
    )
}

/// Struct hash of an unsigned transaction: `keccak256(abi.encode(typeHash, keccak256(packed)))`.
pub fn transaction_struct_hash(unsigned: &UnsignedTransaction) -> Result<B256> {
    let packed = unsigned.to_packed_bytes()?;
    Ok(keccak256(
        (keccak256(TRANSACTION_TYPE), keccak256(packed)).abi_encode(),
    ))
}

/// `keccak256("\x19\x01" || domainSeparator || structHash)`
pub fn signing_digest(domain_separator: &B256, struct_hash: &B256) -> B256 {
    let mut buffer = [0u8; 66];
    buffer[0] = 0x19;
    buffer[1] = 0x01;
    buffer[2..34].copy_from_slice(domain_separator.as_slice());
    buffer[34..].copy_from_slice(struct_hash.as_slice());
    keccak256(buffer)
}

/// Domain of one deployed verifier contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtocolDomain {
    name: String,
    version: String,
    chain_id: u64,
    verifying_contract: Address,
    separator: B256,
}

impl ProtocolDomain {
    pub fn new(name: &str, version: &str, chain_id: u64, verifying_contract: Address) -> Self {
        Self {
            name: name.to_string(),
            version: version.to_string(),
            chain_id,
            verifying_contract,
            separator: domain_hash(name, version, chain_id, verifying_contract),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    pub fn verifying_contract(&self) -> Address {
        self.verifying_contract
    }

    pub fn separator(&self) -> B256 {
        self.separator
    }

    pub fn transaction_hash_id(&self, unsigned: &UnsignedTransaction) -> Result<B256> {
        Ok(signing_digest(
            &self.separator,
            &transaction_struct_hash(unsigned)?,
        ))
    }

    /// Signs the transaction hash id with `signer` and returns the signature witness.
    pub async fn sign<S>(&self, signer: &S, unsigned: &UnsignedTransaction) -> Result<Witness>
    where
        S: Signer + ?Sized,
    {
        let hash_id = self.transaction_hash_id(unsigned)?;
        let signature = signer.sign_hash(&hash_id).await?;
        debug!(
            "Signed transaction {} with wallet {}",
            hash_id,
            signer.address()
        );
        Ok(Witness::from_signature(&signature))
    }

    /// Address that produced a signature witness, `None` for placeholder witnesses.
    pub fn recover(
        &self,
        witness: &Witness,
        unsigned: &UnsignedTransaction,
    ) -> Result<Option<Address>> {
        let Some(signature) = witness.to_signature() else {
            return Ok(None);
        };
        let hash_id = self.transaction_hash_id(unsigned)?;
        Ok(Some(signature.recover_address_from_prehash(&hash_id)?))
    }
}

impl From<&common::config::Config> for ProtocolDomain {
    fn from(config: &common::config::Config) -> Self {
        Self::new(
            &config.domain_name,
            &config.domain_version,
            config.chain_id,
            config.fuel_contract_address,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Input;
    use alloy::{signers::local::PrivateKeySigner, sol_types::Eip712Domain};

    fn unsigned() -> UnsignedTransaction {
        UnsignedTransaction {
            inputs: vec![Input::Transfer {
                witness_reference: 0,
            }],
            outputs: vec![],
            data: vec![B256::repeat_byte(0x33)],
            signature_fee_token: U256::from(1),
            signature_fee: U256::from(2),
        }
    }

    fn domain() -> ProtocolDomain {
        ProtocolDomain::new("Fuel", "1.1.0", 10, Address::repeat_byte(0xf0))
    }

    #[test]
    fn test_domain_hash_matches_alloy() {
        let contract = Address::repeat_byte(0xf0);
        let reference = Eip712Domain::new(
            Some("Fuel".into()),
            Some("1.1.0".into()),
            Some(U256::from(10)),
            Some(contract),
            None,
        );
        assert_eq!(domain().separator(), reference.hash_struct());
    }

    #[test]
    fn test_hash_id_depends_on_domain() {
        let unsigned = unsigned();
        let other = ProtocolDomain::new("Fuel", "1.1.0", 11, Address::repeat_byte(0xf0));
        assert_ne!(
            domain().transaction_hash_id(&unsigned).unwrap(),
            other.transaction_hash_id(&unsigned).unwrap()
        );
        assert_eq!(
            domain().transaction_hash_id(&unsigned).unwrap(),
            domain().transaction_hash_id(&unsigned).unwrap()
        );
    }

    #[test]
    fn test_hash_id_depends_on_fee() {
        let mut changed = unsigned();
        changed.signature_fee = U256::from(3);
        assert_ne!(
            domain().transaction_hash_id(&unsigned()).unwrap(),
            domain().transaction_hash_id(&changed).unwrap()
        );
    }

    #[tokio::test]
    async fn test_sign_and_recover() {
        let wallet = PrivateKeySigner::from_bytes(&B256::repeat_byte(0x07)).unwrap();
        let witness = domain().sign(&wallet, &unsigned()).await.unwrap();
        assert!(matches!(witness, Witness::Signature { v: 27 | 28, .. }));

        let recovered = domain().recover(&witness, &unsigned()).unwrap();
        assert_eq!(recovered, Some(wallet.address()));

        // A different body recovers to someone else.
        let mut tampered = unsigned();
        tampered.data[0] = B256::ZERO;
        assert_ne!(
            domain().recover(&witness, &tampered).unwrap(),
            Some(wallet.address())
        );
    }

    #[test]
    fn test_placeholder_witness_has_no_signer() {
        let witness = Witness::Producer {
            hash: B256::repeat_byte(1),
        };
        assert_eq!(domain().recover(&witness, &unsigned()).unwrap(), None);
    }
}
