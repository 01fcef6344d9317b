use crate::constants::COMPUTE_SERVICE_NAME;
use alloy_primitives::{utils::parse_ether, U256};
use anyhow::Result;
use serde::{Deserialize, Serialize, Serializer};

/// Typed attribute blocks of a compute-service descriptor. Values are not
/// range-checked here; the remote provider is the authority on acceptance.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClusterSpec {
    #[serde(rename = "type")]
    pub cluster_type: String,
    pub url: String,
}

impl ClusterSpec {
    pub fn new(cluster_type: impl Into<String>, url: impl Into<String>) -> Self {
        ClusterSpec {
            cluster_type: cluster_type.into(),
            url: url.into(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContainerSpec {
    pub image: String,
    pub tag: String,
    pub checksum: String,
}

impl ContainerSpec {
    pub fn new(
        image: impl Into<String>,
        tag: impl Into<String>,
        checksum: impl Into<String>,
    ) -> Self {
        ContainerSpec {
            image: image.into(),
            tag: tag.into(),
            checksum: checksum.into(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ServerSpec {
    pub server_id: String,
    pub server_type: String,
    pub cpu: u32,
    pub gpu: u32,
    pub memory: String,
    pub disk: String,
    pub max_execution_time: u64,
}

impl ServerSpec {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        server_id: impl Into<String>,
        server_type: impl Into<String>,
        cpu: u32,
        gpu: u32,
        memory: impl Into<String>,
        disk: impl Into<String>,
        max_execution_time: u64,
    ) -> Self {
        ServerSpec {
            server_id: server_id.into(),
            server_type: server_type.into(),
            cpu,
            gpu,
            memory: memory.into(),
            disk: disk.into(),
            max_execution_time,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct EnvironmentSpec {
    pub cluster: ClusterSpec,
    #[serde(rename = "supportedContainers")]
    pub supported_containers: Vec<ContainerSpec>,
    #[serde(rename = "supportedServers")]
    pub supported_servers: Vec<ServerSpec>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProviderSpec {
    #[serde(rename = "type")]
    pub provider_type: String,
    pub description: String,
    pub environment: EnvironmentSpec,
}

impl ProviderSpec {
    pub fn new(
        provider_type: impl Into<String>,
        description: impl Into<String>,
        cluster: ClusterSpec,
        containers: Vec<ContainerSpec>,
        servers: Vec<ServerSpec>,
    ) -> Self {
        ProviderSpec {
            provider_type: provider_type.into(),
            description: description.into(),
            environment: EnvironmentSpec {
                cluster,
                supported_containers: containers,
                supported_servers: servers,
            },
        }
    }
}

/// Top-level compute-service descriptor as published in an asset's DDO.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct ComputeServiceSpec {
    pub main: ComputeServiceMain,
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ComputeServiceMain {
    pub name: String,
    pub creator: String,
    pub date_published: String,
    #[serde(serialize_with = "serialize_wei")]
    pub cost: U256,
    pub timeout: u64,
    pub provider: ProviderSpec,
}

impl ComputeServiceSpec {
    /// `price` is a human decimal amount; conversion to atomic units happens
    /// once here. Fails on a malformed decimal.
    pub fn new(
        price: &str,
        timeout: u64,
        creator: impl Into<String>,
        date_published: impl Into<String>,
        provider: ProviderSpec,
    ) -> Result<Self> {
        Ok(ComputeServiceSpec {
            main: ComputeServiceMain {
                name: COMPUTE_SERVICE_NAME.to_string(),
                creator: creator.into(),
                date_published: date_published.into(),
                cost: parse_ether(price)?,
                timeout,
                provider,
            },
        })
    }
}

// On-chain amounts do not fit JSON numbers; the wire form is a decimal string.
fn serialize_wei<S: Serializer>(value: &U256, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&value.to_string())
}

/// Metadata for an algorithm supplied inline instead of by DID.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AlgorithmMetadata {
    pub language: String,
    pub format: String,
    pub version: String,
    pub url: String,
    #[serde(default)]
    pub rawcode: String,
    pub container: ContainerSpec,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_provider() -> ProviderSpec {
        ProviderSpec::new(
            "Azure",
            "cheap provider",
            ClusterSpec::new("Kubernetes", "http://kubernetes.example.com"),
            vec![ContainerSpec::new("tensorflow/tensorflow", "latest", "sha256:cb57ecfa6e")],
            vec![ServerSpec::new("1", "xlsize", 16, 0, "128gb", "160gb", 86_400)],
        )
    }

    #[test]
    fn specs_serialize_to_protocol_keys() {
        let value = serde_json::to_value(sample_provider()).unwrap();

        assert_eq!(value["type"], "Azure");
        assert_eq!(value["environment"]["cluster"]["type"], "Kubernetes");
        assert_eq!(
            value["environment"]["supportedContainers"][0]["image"],
            "tensorflow/tensorflow"
        );
        let server = &value["environment"]["supportedServers"][0];
        assert_eq!(server["serverId"], "1");
        assert_eq!(server["serverType"], "xlsize");
        assert_eq!(server["maxExecutionTime"], 86_400);
    }

    #[test]
    fn descriptor_converts_price_to_wei() {
        let spec = ComputeServiceSpec::new(
            "1",
            3600,
            "0x22d49Af358c5Fe73BB81939b69F929B28A1DBc8f",
            "2019-06-12T08:44:28Z",
            sample_provider(),
        )
        .unwrap();

        let value = serde_json::to_value(&spec).unwrap();
        assert_eq!(value["main"]["name"], "dataAssetComputingServiceAgreement");
        assert_eq!(value["main"]["cost"], "1000000000000000000");
        assert_eq!(value["main"]["timeout"], 3600);
        assert_eq!(value["main"]["datePublished"], "2019-06-12T08:44:28Z");
    }

    #[test]
    fn fractional_price() {
        let spec = ComputeServiceSpec::new("0.5", 60, "creator", "2020-01-01", sample_provider())
            .unwrap();
        assert_eq!(spec.main.cost.to_string(), "500000000000000000");
    }

    #[test]
    fn malformed_price_is_rejected() {
        assert!(ComputeServiceSpec::new("ten", 60, "creator", "2020-01-01", sample_provider())
            .is_err());
    }

    #[test]
    fn algorithm_metadata_round_trips_container() {
        let meta: AlgorithmMetadata = serde_json::from_value(json!({
            "language": "python",
            "format": "docker-image",
            "version": "0.1",
            "url": "https://example.com/algo.py",
            "container": {"image": "python", "tag": "3.9-slim", "checksum": "sha256:redacted"},
        }))
        .unwrap();

        assert_eq!(meta.rawcode, "");
        assert_eq!(meta.container.tag, "3.9-slim");
    }
}
