//! Calldata for the verifier contract entry points.

use crate::bindings::fuel::IFuel;
use crate::codec::Packed;
use crate::error::{Error, Result};
use crate::header::{BlockHeader, RootHeader};
use crate::leaf::{Leaf, concat_leaves};
use crate::proof::{TransactionProof, encode_proof_list};
use alloy::{
    primitives::{B256, Bytes, U256},
    sol_types::SolCall,
};

pub fn commit_root(root: &RootHeader, leaves: &[Leaf]) -> Result<Bytes> {
    Ok(IFuel::commitRootCall {
        merkleTreeRoot: root.merkle_tree_root,
        token: root.fee_token,
        fee: root.fee,
        transactions: concat_leaves(leaves)?.into(),
    }
    .abi_encode()
    .into())
}

/// `minimum` and `minimum_hash` pin the L1 block the submission builds on.
pub fn commit_block(minimum: u32, minimum_hash: B256, block: &BlockHeader) -> Result<Bytes> {
    Ok(IFuel::commitBlockCall {
        minimum,
        minimumHash: minimum_hash,
        height: to_u32(block.height, "BlockHeader::height")?,
        roots: block.roots.clone(),
    }
    .abi_encode()
    .into())
}

pub fn withdraw(proof: &TransactionProof) -> Result<Bytes> {
    Ok(IFuel::withdrawCall {
        transactionProof: proof.to_packed_bytes()?,
    }
    .abi_encode()
    .into())
}

/// `input_proof` is whatever the disputed input points at: a transaction proof, a deposit
/// or a root header.
pub fn prove_invalid_input<P: Packed>(input_proof: &P, proof: &TransactionProof) -> Result<Bytes> {
    Ok(IFuel::proveInvalidInputCall {
        inputProof: input_proof.to_packed_bytes()?,
        transactionProof: proof.to_packed_bytes()?,
    }
    .abi_encode()
    .into())
}

pub fn prove_invalid_witness(
    proof: &TransactionProof,
    input_proofs: &[TransactionProof],
) -> Result<Bytes> {
    Ok(IFuel::proveInvalidWitnessCall {
        transactionProof: proof.to_packed_bytes()?,
        inputProofs: encode_proof_list(input_proofs)?,
    }
    .abi_encode()
    .into())
}

pub fn prove_invalid_sum(
    proof: &TransactionProof,
    input_proofs: &[TransactionProof],
) -> Result<Bytes> {
    Ok(IFuel::proveInvalidSumCall {
        transactionProof: proof.to_packed_bytes()?,
        inputProofs: encode_proof_list(input_proofs)?,
    }
    .abi_encode()
    .into())
}

pub fn prove_double_spend(first: &TransactionProof, second: &TransactionProof) -> Result<Bytes> {
    Ok(IFuel::proveDoubleSpendCall {
        transactionProofA: first.to_packed_bytes()?,
        transactionProofB: second.to_packed_bytes()?,
    }
    .abi_encode()
    .into())
}

pub fn prove_malformed_block(
    block: &BlockHeader,
    root: &RootHeader,
    root_index: u16,
    leaves: &[Leaf],
) -> Result<Bytes> {
    Ok(IFuel::proveMalformedBlockCall {
        blockHeader: block.to_packed_bytes()?,
        rootHeader: root.to_packed_bytes()?,
        rootIndex: root_index,
        transactions: concat_leaves(leaves)?.into(),
    }
    .abi_encode()
    .into())
}

fn to_u32(value: U256, field: &'static str) -> Result<u32> {
    u32::try_from(value).map_err(|_| Error::FieldOverflow {
        field,
        max: usize::try_from(u32::MAX).unwrap_or(usize::MAX),
        actual: usize::try_from(value).unwrap_or(usize::MAX),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::Address;

    fn leaves() -> Vec<Leaf> {
        vec![Leaf::from(Bytes::from_static(&[0, 1, 0x42]))]
    }

    #[test]
    fn test_commit_root_calldata() {
        let root = RootHeader::from_leaves(Address::ZERO, U256::from(1), U256::from(2), &leaves())
            .unwrap();
        let calldata = commit_root(&root, &leaves()).unwrap();
        assert_eq!(&calldata[..4], IFuel::commitRootCall::SELECTOR.as_slice());

        let call = IFuel::commitRootCall::abi_decode(&calldata).unwrap();
        assert_eq!(call.merkleTreeRoot, root.merkle_tree_root);
        assert_eq!(call.fee, U256::from(2));
        assert_eq!(call.transactions.as_ref(), &[0, 1, 0x42]);
    }

    #[test]
    fn test_commit_block_height_bound() {
        let mut block = BlockHeader {
            height: U256::from(8),
            roots: vec![B256::repeat_byte(1)],
            ..Default::default()
        };
        let calldata = commit_block(100, B256::repeat_byte(2), &block).unwrap();
        let call = IFuel::commitBlockCall::abi_decode(&calldata).unwrap();
        assert_eq!(call.height, 8);
        assert_eq!(call.roots, block.roots);

        block.height = U256::from(u64::MAX);
        assert!(matches!(
            commit_block(100, B256::ZERO, &block),
            Err(Error::FieldOverflow { .. })
        ));
    }

    #[test]
    fn test_double_spend_carries_both_proofs() {
        let first = TransactionProof {
            transaction_index: 1,
            ..Default::default()
        };
        let second = TransactionProof {
            transaction_index: 2,
            ..Default::default()
        };
        let calldata = prove_double_spend(&first, &second).unwrap();
        let call = IFuel::proveDoubleSpendCall::abi_decode(&calldata).unwrap();
        assert_eq!(
            TransactionProof::from_packed_bytes(&call.transactionProofB).unwrap(),
            second
        );
    }
}
