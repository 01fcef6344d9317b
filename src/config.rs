use crate::constants::{
    DEFAULT_METADATA_STORE_URL, DEFAULT_NETWORK_URL, DEFAULT_PROVIDER_URL, DISPENSER_ADDRESS,
    DISPENSER_CONTRACT, METADATA_STORE_URL, NETWORK_URL, PROVIDER_ADDRESS, PROVIDER_URL,
};
use alloy_primitives::Address;
use anyhow::{anyhow, Result};
use std::collections::HashMap;
use std::env;
use std::str::FromStr;

/// SDK configuration. Passed explicitly into every component; there is no
/// process-wide fallback.
#[derive(Clone, Debug)]
pub struct Config {
    /// JSON-RPC endpoint of the chain node.
    pub network_url: String,
    /// Root URL of the compute provider service.
    pub provider_url: String,
    pub provider_address: Address,
    /// URL of the metadata store resolving DDO documents.
    pub metadata_store_url: String,
    /// Deployed contract addresses keyed by contract-type name.
    pub contract_addresses: HashMap<String, Address>,
}

impl Default for Config {
    fn default() -> Self {
        let mut contract_addresses = HashMap::new();
        if let Some(address) = parse_address(DISPENSER_ADDRESS) {
            contract_addresses.insert(DISPENSER_CONTRACT.to_string(), address);
        }

        Self {
            network_url: env::var(NETWORK_URL).unwrap_or_else(|_| DEFAULT_NETWORK_URL.to_string()),
            provider_url: env::var(PROVIDER_URL)
                .unwrap_or_else(|_| DEFAULT_PROVIDER_URL.to_string()),
            provider_address: parse_address(PROVIDER_ADDRESS).unwrap_or(Address::ZERO),
            metadata_store_url: env::var(METADATA_STORE_URL)
                .unwrap_or_else(|_| DEFAULT_METADATA_STORE_URL.to_string()),
            contract_addresses,
        }
    }
}

impl Config {
    pub fn address_of_type(&self, contract_type: &str) -> Result<Address> {
        self.contract_addresses
            .get(contract_type)
            .copied()
            .ok_or_else(|| anyhow!("no address configured for contract type `{contract_type}`"))
    }
}

fn parse_address(env_var: &str) -> Option<Address> {
    env::var_os(env_var).map(|s| {
        Address::from_str(s.to_str().unwrap())
            .unwrap_or_else(|_| panic!("expected a valid address for {}", env_var))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_book_lookup() {
        let dispenser = Address::repeat_byte(0x11);
        let mut config = Config {
            network_url: DEFAULT_NETWORK_URL.to_string(),
            provider_url: DEFAULT_PROVIDER_URL.to_string(),
            provider_address: Address::ZERO,
            metadata_store_url: DEFAULT_METADATA_STORE_URL.to_string(),
            contract_addresses: HashMap::new(),
        };
        config
            .contract_addresses
            .insert(DISPENSER_CONTRACT.to_string(), dispenser);

        assert_eq!(config.address_of_type(DISPENSER_CONTRACT).unwrap(), dispenser);

        let err = config.address_of_type("Router").unwrap_err();
        assert!(err.to_string().contains("Router"));
    }
}
