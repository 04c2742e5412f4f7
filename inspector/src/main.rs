use alloy::{hex, primitives::B256};
use anyhow::Error;
use clap::{Parser, Subcommand};
use common::{
    config::{Config, ConfigTrait},
    execution_layer::ExecutionLayer,
    shared::alloy_tools::create_alloy_provider_without_wallet,
};
use protocol::{
    Leaf, Packed, ProtocolDomain, TransactionLeaf, TransactionProofBuilder,
    chain_reader::ChainReader,
};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(version, about = "Inspect Fuel transactions and build transaction proofs")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decode a packed transaction leaf
    Decode {
        #[arg(value_name = "HEX")]
        leaf: String,
    },
    /// Print the EIP-712 domain hash for the configured contract
    Domain,
    /// Build a transaction proof for a committed leaf
    Prove {
        #[arg(long)]
        root: B256,
        #[arg(long)]
        index: usize,
        #[arg(long = "io-index", default_value_t = 0)]
        io_index: u8,
        /// Commitments of the spent inputs, in input order
        #[arg(long = "data")]
        data: Vec<B256>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    common::utils::logging::init_logging();

    info!("🔎 Fuel inspector v{}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();
    let config = Config::read_env_variables()?;

    match args.command {
        Command::Decode { leaf } => decode(&leaf),
        Command::Domain => {
            domain(&config);
            Ok(())
        }
        Command::Prove {
            root,
            index,
            io_index,
            data,
        } => prove(&config, root, index, io_index, data).await,
    }
}

fn decode(leaf_hex: &str) -> Result<(), Error> {
    let bytes = hex::decode(leaf_hex.trim_start_matches("0x"))
        .map_err(|e| anyhow::anyhow!("Leaf must be valid hex: {}", e))?;
    let leaf = TransactionLeaf::from_packed_bytes(&bytes)?;

    for (index, metadata) in leaf.metadata.iter().enumerate() {
        info!("metadata[{index}]: {metadata:?}");
    }
    for (index, witness) in leaf.witnesses.iter().enumerate() {
        info!("witness[{index}]: {witness:?}");
    }
    for (index, input) in leaf.inputs.iter().enumerate() {
        info!("input[{index}]: {input:?}");
    }
    for (index, output) in leaf.outputs.iter().enumerate() {
        info!("output[{index}]: {output:?} amount {}", output.amount());
    }

    let encoded = leaf.to_packed_bytes()?;
    info!("Leaf hash: {}", leaf.hash_packed()?);
    info!("Length: {} bytes, re-encoded {} bytes", bytes.len(), encoded.len());
    if encoded.as_ref() != bytes.as_slice() {
        warn!("Re-encoded leaf differs from the input");
    }
    Ok(())
}

fn domain(config: &Config) {
    let domain = ProtocolDomain::from(config);
    info!("Config:\n{config}");
    info!("Domain hash: {}", domain.separator());
}

async fn prove(
    config: &Config,
    root_hash: B256,
    index: usize,
    io_index: u8,
    data: Vec<B256>,
) -> Result<(), Error> {
    let provider = create_alloy_provider_without_wallet(&config.l1_rpc_url).await?;
    let execution_layer = ExecutionLayer::new(provider)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create L1 execution layer: {}", e))?;
    if execution_layer.chain_id() != config.chain_id {
        warn!(
            "L1 node reports chain ID {}, but signatures use chain ID {}",
            execution_layer.chain_id(),
            config.chain_id
        );
    }
    let reader = ChainReader::new(
        execution_layer,
        config.fuel_contract_address,
        config.logs_from_block,
    );

    let (root, leaves) = reader.root_with_leaves(root_hash).await?;
    let block = reader.block_containing_root(root_hash).await?;
    let leaves: Vec<Leaf> = leaves.into_iter().map(Leaf::from).collect();
    info!(
        "Root {} has {} leaves, committed in block {}",
        root_hash,
        leaves.len(),
        block.height
    );

    let mut proof = TransactionProofBuilder::new(&block, &root, &leaves, index)
        .input_output_index(io_index)
        .build()?;
    if data.is_empty() && !proof.transaction.is_empty() {
        warn!("No --data given, the proof carries an empty data[]");
    }
    proof.data = data;

    info!("Transaction proof: 0x{}", hex::encode(proof.to_packed_bytes()?));
    Ok(())
}
