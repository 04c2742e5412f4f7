use alloy::{
    consensus::Transaction as _,
    primitives::{B256, Bytes},
    providers::{DynProvider, Provider},
    rpc::types::{Filter, Log, Transaction},
};
use anyhow::Error;
use tracing::debug;

/// Read-only access to the L1 node the verifier contract is deployed on.
pub struct ExecutionLayer {
    provider: DynProvider,
    chain_id: u64,
}

impl ExecutionLayer {
    pub async fn new(provider: DynProvider) -> Result<Self, Error> {
        let chain_id = provider
            .get_chain_id()
            .await
            .map_err(|e| Error::msg(format!("Failed to get chain ID: {e}")))?;

        Ok(Self { provider, chain_id })
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    pub async fn get_logs(&self, filter: Filter) -> Result<Vec<Log>, Error> {
        let logs = self
            .provider
            .get_logs(&filter)
            .await
            .map_err(|e| Error::msg(format!("Failed to get logs: {e}")))?;
        debug!("[chain_id: {}] Found {} logs", self.chain_id, logs.len());
        Ok(logs)
    }

    pub async fn get_transaction_by_hash(&self, hash: B256) -> Result<Transaction, Error> {
        self.provider
            .get_transaction_by_hash(hash)
            .await
            .map_err(|e| {
                anyhow::anyhow!(
                    "[chain_id: {}] Failed to get transaction {}: {}",
                    self.chain_id,
                    hash,
                    e
                )
            })?
            .ok_or(anyhow::anyhow!(
                "[chain_id: {}] Failed to get transaction {}: value is None",
                self.chain_id,
                hash
            ))
    }

    /// Call data of a mined transaction.
    pub async fn get_transaction_input(&self, hash: B256) -> Result<Bytes, Error> {
        let tx = self.get_transaction_by_hash(hash).await?;
        Ok(tx.input().clone())
    }
}
