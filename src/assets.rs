use crate::config::Config;
use crate::constants::COMPUTE_SERVICE_TYPE;
use alloy_primitives::Address;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde::Deserialize;

/// One service entry of an asset's DDO document.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct Service {
    #[serde(rename = "type")]
    pub service_type: String,
    pub index: u32,
    #[serde(rename = "serviceEndpoint")]
    pub service_endpoint: String,
}

/// Resolved asset metadata, trimmed to the fields the compute client needs.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct Asset {
    #[serde(rename = "id")]
    pub did: String,
    #[serde(rename = "dataToken")]
    pub data_token_address: Address,
    #[serde(rename = "service", default)]
    pub services: Vec<Service>,
}

impl Asset {
    pub fn compute_service(&self) -> Result<&Service> {
        self.services
            .iter()
            .find(|service| service.service_type == COMPUTE_SERVICE_TYPE)
            .ok_or_else(|| anyhow!("asset {} declares no compute service", self.did))
    }
}

#[async_trait]
pub trait AssetResolver: Send + Sync {
    async fn resolve(&self, did: &str) -> Result<Asset>;
}

/// Resolves DDO documents from the configured metadata store.
pub struct MetadataStoreClient {
    base_url: String,
    client: reqwest::Client,
}

impl MetadataStoreClient {
    pub fn new(config: &Config) -> Self {
        MetadataStoreClient {
            base_url: config.metadata_store_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl AssetResolver for MetadataStoreClient {
    async fn resolve(&self, did: &str) -> Result<Asset> {
        let url = format!("{}/api/v1/assets/ddo/{}", self.base_url, did);
        let response = self.client.get(&url).send().await?.error_for_status()?;
        Ok(response.json::<Asset>().await?)
    }
}
