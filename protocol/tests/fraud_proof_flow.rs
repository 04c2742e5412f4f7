use alloy::{
    primitives::{Address, B256, Bytes, U256},
    signers::local::PrivateKeySigner,
    sol_types::SolCall,
};
use protocol::{
    BlockHeader, Canonical, Leaf, Packed, ProtocolDomain, RootHeader, Transaction,
    TransactionBuilder, TransactionLeaf, TransactionProof, TransactionProofBuilder,
    amount::compress,
    bindings::fuel::IFuel,
    deposit::Deposit,
    input::Input,
    metadata::Metadata,
    output::{CompressedId, Output, OutputValue},
    verifier,
};
use std::sync::Arc;

fn domain() -> ProtocolDomain {
    ProtocolDomain::new("Fuel", "1.1.0", 1337, Address::repeat_byte(0xfe))
}

fn wallet(seed: u8) -> Arc<PrivateKeySigner> {
    Arc::new(PrivateKeySigner::from_bytes(&B256::repeat_byte(seed)).unwrap())
}

fn transfer(owner: Address, amount: u64) -> Output {
    Output::Transfer(OutputValue::new(
        CompressedId::from_id(1),
        compress(U256::from(amount)),
        CompressedId::from_address(owner),
    ))
}

async fn spend_utxo(
    from: Arc<PrivateKeySigner>,
    utxo: protocol::utxo::Utxo,
    to: Address,
    amount: u64,
) -> Transaction {
    TransactionBuilder::new()
        .input(Input::Transfer {
            witness_reference: 0,
        })
        .data(utxo)
        .metadata(Metadata::Pointer {
            block_height: 1,
            root_index: 0,
            transaction_index: 0,
            output_index: 0,
        })
        .output(transfer(to, amount))
        .wallet(from)
        .build(&domain())
        .await
        .unwrap()
}

fn commit(producer: Address, leaves: &[Leaf], height: u64) -> (RootHeader, BlockHeader) {
    let root = RootHeader::from_leaves(producer, U256::from(1), U256::from(2), leaves).unwrap();
    let block = BlockHeader {
        producer,
        height: U256::from(height),
        ethereum_block_number: U256::from(100 + height),
        num_tokens: U256::from(2),
        num_addresses: U256::from(3),
        roots: vec![root.hash_packed().unwrap()],
        ..Default::default()
    };
    (root, block)
}

#[tokio::test]
async fn test_deposit_spend_and_withdraw_proof() {
    let alice = wallet(0x11);
    let bob = wallet(0x22);
    let producer = Address::repeat_byte(0x99);

    let deposit = Deposit::new(alice.address(), U256::from(1), U256::from(50), U256::from(1000));
    let tx = TransactionBuilder::new()
        .input(Input::Deposit {
            witness_reference: 0,
            owner: alice.address(),
        })
        .data(deposit.clone())
        .metadata(Metadata::Deposit {
            token: 1,
            block_number: 50,
        })
        .output(transfer(bob.address(), 1000))
        .wallet(alice.clone())
        .build(&domain())
        .await
        .unwrap();

    let leaves = vec![
        Leaf::from(tx.clone()),
        Leaf::from(Bytes::from_static(&[0, 2, 0xde, 0xad])),
    ];
    let (root, block) = commit(producer, &leaves, 1);

    let proof = TransactionProofBuilder::new(&block, &root, &leaves, 0)
        .token(Address::ZERO)
        .build()
        .unwrap();
    assert!(proof.verify_inclusion().unwrap());
    assert_eq!(proof.data, vec![deposit.hash_canonical()]);

    // The verifier sees exactly these bytes.
    let calldata = verifier::withdraw(&proof).unwrap();
    let call = IFuel::withdrawCall::abi_decode(&calldata).unwrap();
    let decoded = TransactionProof::from_packed_bytes(&call.transactionProof).unwrap();
    assert_eq!(decoded, proof);

    let leaf = TransactionLeaf::from_packed_bytes(&decoded.transaction).unwrap();
    assert!(matches!(leaf.metadata[0], Metadata::Deposit { block_number: 50, .. }));
    assert_eq!(tx.signers(&domain()).unwrap(), vec![Some(alice.address())]);
}

#[tokio::test]
async fn test_double_spend_proofs_share_input_commitment() {
    let alice = wallet(0x11);
    let bob = wallet(0x22);
    let carol = Address::repeat_byte(0x33);
    let producer = Address::repeat_byte(0x99);

    let funding = TransactionBuilder::new()
        .input(Input::Root {
            witness_reference: 0,
        })
        .data(B256::repeat_byte(0x01))
        .metadata(Metadata::Pointer {
            block_height: 0,
            root_index: 0,
            transaction_index: 0,
            output_index: 0,
        })
        .output(transfer(bob.address(), 500))
        .wallet(alice)
        .build(&domain())
        .await
        .unwrap();
    let utxo = funding.utxos().remove(0);

    let first = spend_utxo(bob.clone(), utxo.clone(), carol, 500).await;
    let second = spend_utxo(bob, utxo.clone(), Address::repeat_byte(0x44), 500).await;
    assert_ne!(first.transaction_hash_id(), second.transaction_hash_id());

    let leaves_a = vec![Leaf::from(funding), Leaf::from(first)];
    let (root_a, block_a) = commit(producer, &leaves_a, 1);
    let leaves_b = vec![Leaf::from(second)];
    let (root_b, block_b) = commit(producer, &leaves_b, 2);

    let input_proof = TransactionProofBuilder::new(&block_a, &root_a, &leaves_a, 0)
        .build()
        .unwrap();
    let proof_a = TransactionProofBuilder::new(&block_a, &root_a, &leaves_a, 1)
        .input_proofs(vec![input_proof.clone()])
        .build()
        .unwrap();
    let proof_b = TransactionProofBuilder::new(&block_b, &root_b, &leaves_b, 0)
        .build()
        .unwrap();

    assert_eq!(proof_a.data, proof_b.data);
    assert_eq!(proof_a.data[0], utxo.hash_canonical());
    assert_eq!(proof_a.decode_input_proofs().unwrap(), vec![input_proof]);

    let calldata = verifier::prove_double_spend(&proof_a, &proof_b).unwrap();
    assert_eq!(&calldata[..4], IFuel::proveDoubleSpendCall::SELECTOR.as_slice());
}

#[tokio::test]
async fn test_malformed_root_is_provable() {
    let producer = Address::repeat_byte(0x99);
    let leaves = vec![
        Leaf::from(Bytes::from_static(&[0, 3, 0xff, 0xff, 0xff])),
        Leaf::from(Bytes::from_static(&[0, 0])),
        Leaf::from(Bytes::from_static(&[0, 1, 0x05])),
    ];
    let (root, block) = commit(producer, &leaves, 7);

    // Raw leaves still commit and prove; they just do not decode as transactions.
    assert!(TransactionLeaf::from_packed_bytes(&leaves[0].to_bytes().unwrap()).is_err());
    let proof = TransactionProofBuilder::new(&block, &root, &leaves, 10)
        .build()
        .unwrap();
    assert_eq!(proof.transaction_index, 2);
    assert!(proof.transaction.is_empty());

    let calldata = verifier::prove_malformed_block(&block, &root, proof.root_index, &leaves).unwrap();
    let call = IFuel::proveMalformedBlockCall::abi_decode(&calldata).unwrap();
    assert_eq!(
        protocol::leaf::split_leaves(&call.transactions).unwrap().len(),
        3
    );
    assert_eq!(BlockHeader::from_packed_bytes(&call.blockHeader).unwrap(), block);
}
