//! Seeded generators of random well formed records.

use crate::amount::CompressedAmount;
use crate::header::{BlockHeader, RootHeader};
use crate::input::Input;
use crate::metadata::Metadata;
use crate::output::{CompressedId, Output, OutputValue};
use crate::proof::TransactionProof;
use crate::transaction::{TransactionLeaf, UnsignedTransaction};
use crate::witness::Witness;
use alloy::primitives::{Address, B256, Bytes, U256};
use rand::{Rng, SeedableRng, rngs::StdRng};

pub const ROUNDS: usize = 300;

pub fn seeded(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

pub fn list<T>(rng: &mut StdRng, max: usize, mut item: impl FnMut(&mut StdRng) -> T) -> Vec<T> {
    let len = rng.random_range(0..=max);
    (0..len).map(|_| item(rng)).collect()
}

pub fn b256(rng: &mut StdRng) -> B256 {
    let mut word = [0u8; 32];
    rng.fill(&mut word);
    B256::from(word)
}

pub fn u256(rng: &mut StdRng) -> U256 {
    U256::from_be_bytes(b256(rng).0)
}

pub fn address(rng: &mut StdRng) -> Address {
    let mut bytes = [0u8; 20];
    rng.fill(&mut bytes);
    Address::from(bytes)
}

pub fn bytes(rng: &mut StdRng, max: usize) -> Bytes {
    let mut bytes = vec![0u8; rng.random_range(0..=max)];
    rng.fill(bytes.as_mut_slice());
    Bytes::from(bytes)
}

pub fn input(rng: &mut StdRng) -> Input {
    let witness_reference = rng.random();
    match rng.random_range(0..4u8) {
        0 => Input::Transfer { witness_reference },
        1 => Input::Deposit {
            witness_reference,
            owner: address(rng),
        },
        2 => Input::Htlc {
            witness_reference,
            pre_image: b256(rng),
        },
        _ => Input::Root { witness_reference },
    }
}

pub fn witness(rng: &mut StdRng) -> Witness {
    match rng.random_range(0..3u8) {
        0 => Witness::Signature {
            r: b256(rng),
            s: b256(rng),
            v: rng.random(),
        },
        1 => Witness::Caller {
            owner: address(rng),
            block_number: rng.random(),
        },
        _ => Witness::Producer { hash: b256(rng) },
    }
}

/// A record of the shape `input` selects.
pub fn metadata_for(rng: &mut StdRng, input: &Input) -> Metadata {
    if input.is_deposit() {
        Metadata::Deposit {
            token: rng.random(),
            block_number: rng.random(),
        }
    } else {
        Metadata::Pointer {
            block_height: rng.random(),
            root_index: rng.random(),
            transaction_index: rng.random(),
            output_index: rng.random(),
        }
    }
}

/// Any width from a one byte id up to a full address.
pub fn compressed_id(rng: &mut StdRng) -> CompressedId {
    let mut id = vec![0u8; rng.random_range(1..=20usize)];
    rng.fill(id.as_mut_slice());
    CompressedId::from_bytes(id).unwrap()
}

/// Mantissa and shift drawn independently, so most results are not minimal.
pub fn compressed_amount(rng: &mut StdRng) -> CompressedAmount {
    let mut mantissa = vec![0u8; rng.random_range(1..=32usize)];
    rng.fill(mantissa.as_mut_slice());
    let shift_bytes = rng.random_range(0..=32 - mantissa.len());
    let shift = u8::try_from(shift_bytes * 8).unwrap();
    CompressedAmount::from_parts(shift, mantissa).unwrap()
}

pub fn output_value(rng: &mut StdRng) -> OutputValue {
    OutputValue::new(
        compressed_id(rng),
        compressed_amount(rng),
        compressed_id(rng),
    )
}

pub fn output(rng: &mut StdRng) -> Output {
    match rng.random_range(0..4u8) {
        0 => Output::Transfer(output_value(rng)),
        1 => Output::Withdraw(output_value(rng)),
        2 => Output::Htlc {
            value: output_value(rng),
            digest: b256(rng),
            expiry: rng.random(),
            return_owner: compressed_id(rng),
        },
        _ => Output::Return {
            data: bytes(rng, 96),
        },
    }
}

pub fn transaction_leaf(rng: &mut StdRng) -> TransactionLeaf {
    let inputs = list(rng, 8, input);
    let metadata = inputs
        .iter()
        .map(|input| metadata_for(rng, input))
        .collect();
    TransactionLeaf {
        metadata,
        witnesses: list(rng, 4, witness),
        inputs,
        outputs: list(rng, 8, output),
    }
}

pub fn unsigned_transaction(rng: &mut StdRng) -> UnsignedTransaction {
    UnsignedTransaction {
        inputs: list(rng, 8, input),
        outputs: list(rng, 8, output),
        data: list(rng, 8, b256),
        signature_fee_token: u256(rng),
        signature_fee: u256(rng),
    }
}

pub fn root_header(rng: &mut StdRng) -> RootHeader {
    RootHeader {
        root_producer: address(rng),
        merkle_tree_root: b256(rng),
        commitment_hash: b256(rng),
        root_length: u256(rng),
        fee_token: u256(rng),
        fee: u256(rng),
    }
}

pub fn block_header(rng: &mut StdRng) -> BlockHeader {
    BlockHeader {
        producer: address(rng),
        previous_block_hash: b256(rng),
        height: u256(rng),
        ethereum_block_number: u256(rng),
        num_tokens: u256(rng),
        num_addresses: u256(rng),
        roots: list(rng, 6, b256),
    }
}

/// A proof over random headers whose `input_proofs` holds already packed bytes.
pub fn transaction_proof(rng: &mut StdRng, input_proofs: Bytes) -> TransactionProof {
    TransactionProof {
        block: block_header(rng),
        root: root_header(rng),
        root_index: rng.random(),
        merkle_proof: list(rng, 12, b256),
        input_output_index: rng.random(),
        transaction_index: rng.random(),
        transaction: bytes(rng, 200),
        data: list(rng, 8, b256),
        signature_fee_token: u256(rng),
        signature_fee: u256(rng),
        token: address(rng),
        selector: address(rng),
        input_proofs,
    }
}
