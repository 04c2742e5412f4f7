use alloy::sol;

/// Fixed-width ABI layouts hashed to obtain canonical identities.
pub mod commitments {
    use super::*;

    sol! {
        #[derive(Debug, PartialEq, Eq)]
        struct OutputCommitment {
            uint8 outputType;
            uint256 token;
            uint256 amount;
            bytes32 owner;
            bytes32 digest;
            uint32 expiry;
            bytes32 returnOwner;
        }

        #[derive(Debug, PartialEq, Eq)]
        struct UtxoCommitment {
            bytes32 transactionHashId;
            uint256 outputIndex;
            uint256 outputType;
            bytes32 owner;
            uint256 amount;
            uint256 token;
            bytes32 digest;
            uint256 expiry;
            bytes32 returnOwner;
        }

        #[derive(Debug, PartialEq, Eq)]
        struct DepositCommitment {
            address owner;
            uint256 token;
            uint256 blockNumber;
        }
    }
}

pub mod fuel {
    use super::*;

    sol!(
        #[allow(missing_docs)]
        #[sol(rpc)]
        interface IFuel {
            event RootCommitted(
                bytes32 indexed root,
                address rootProducer,
                uint256 feeToken,
                uint256 fee,
                uint256 rootLength,
                bytes32 indexed merkleTreeRoot,
                bytes32 indexed commitmentHash
            );

            event BlockCommitted(
                address producer,
                uint256 numTokens,
                uint256 numAddresses,
                bytes32 indexed previousBlockHash,
                uint256 indexed height,
                bytes32[] roots
            );

            event DepositMade(address indexed owner, uint32 indexed token, uint256 value);

            function commitRoot(
                bytes32 merkleTreeRoot,
                uint256 token,
                uint256 fee,
                bytes transactions
            ) external;

            function commitBlock(
                uint32 minimum,
                bytes32 minimumHash,
                uint32 height,
                bytes32[] roots
            ) external payable;

            function withdraw(bytes transactionProof) external;

            function proveInvalidInput(bytes inputProof, bytes transactionProof) external;

            function proveInvalidWitness(bytes transactionProof, bytes inputProofs) external;

            function proveInvalidSum(bytes transactionProof, bytes inputProofs) external;

            function proveDoubleSpend(bytes transactionProofA, bytes transactionProofB) external;

            function proveMalformedBlock(
                bytes blockHeader,
                bytes rootHeader,
                uint16 rootIndex,
                bytes transactions
            ) external;
        }
    );
}
