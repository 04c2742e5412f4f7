use alloy::primitives::Address;
use anyhow::Error;
use std::{fmt, str::FromStr};
use tracing::warn;

pub trait ConfigTrait: Sized {
    fn read_env_variables() -> Result<Self, Error>;
}

pub fn address_parse_error(
    env_var: &str,
    err: impl fmt::Display,
    value: &str,
) -> anyhow::Error {
    anyhow::anyhow!("Failed to parse {} '{}' as an address: {}", env_var, value, err)
}

const L1_RPC_URL: &str = "L1_RPC_URL";
const FUEL_CONTRACT_ADDRESS: &str = "FUEL_CONTRACT_ADDRESS";
const FUEL_CHAIN_ID: &str = "FUEL_CHAIN_ID";
const FUEL_DOMAIN_NAME: &str = "FUEL_DOMAIN_NAME";
const FUEL_DOMAIN_VERSION: &str = "FUEL_DOMAIN_VERSION";
const FUEL_LOGS_FROM_BLOCK: &str = "FUEL_LOGS_FROM_BLOCK";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub l1_rpc_url: String,
    pub fuel_contract_address: Address,
    pub chain_id: u64,
    pub domain_name: String,
    pub domain_version: String,
    pub logs_from_block: u64,
}

impl Config {
    /// Builds the config from `lookup`, which returns the raw value of a variable if set.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let l1_rpc_url =
            lookup(L1_RPC_URL).unwrap_or_else(|| "http://127.0.0.1:8545".to_string());

        let fuel_contract_address = match lookup(FUEL_CONTRACT_ADDRESS) {
            Some(value) => Address::from_str(&value)
                .map_err(|e| address_parse_error(FUEL_CONTRACT_ADDRESS, e, &value))?,
            None => {
                warn!(
                    "{} not set, signatures will use the zero verifying contract",
                    FUEL_CONTRACT_ADDRESS
                );
                Address::ZERO
            }
        };

        let chain_id = lookup(FUEL_CHAIN_ID)
            .unwrap_or("1".to_string())
            .parse::<u64>()
            .map_err(|e| anyhow::anyhow!("{} must be a number: {}", FUEL_CHAIN_ID, e))?;

        let domain_name = lookup(FUEL_DOMAIN_NAME).unwrap_or("Fuel".to_string());
        let domain_version = lookup(FUEL_DOMAIN_VERSION).unwrap_or("1.1.0".to_string());

        let logs_from_block = lookup(FUEL_LOGS_FROM_BLOCK)
            .unwrap_or("0".to_string())
            .parse::<u64>()
            .map_err(|e| anyhow::anyhow!("{} must be a number: {}", FUEL_LOGS_FROM_BLOCK, e))?;

        Ok(Config {
            l1_rpc_url,
            fuel_contract_address,
            chain_id,
            domain_name,
            domain_version,
            logs_from_block,
        })
    }
}

impl ConfigTrait for Config {
    fn read_env_variables() -> Result<Self, Error> {
        // An optional .env file seeds the environment.
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "L1 RPC URL: {}", self.l1_rpc_url)?;
        writeln!(f, "Fuel contract: {}", self.fuel_contract_address)?;
        writeln!(f, "Chain ID: {}", self.chain_id)?;
        writeln!(
            f,
            "EIP-712 domain: {} {}",
            self.domain_name, self.domain_version
        )?;
        writeln!(f, "Logs from block: {}", self.logs_from_block)?;

        Ok(())
    }
}
