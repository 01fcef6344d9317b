use crate::auth::AuthToken;
use crate::config::Config;
use crate::service::AlgorithmMetadata;
use alloy_primitives::Address;
use anyhow::Result;
use async_trait::async_trait;
use reqwest::{Method, Url};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

/// Job document returned by the compute provider. Every field is optional on
/// the wire; absent fields fall back to empty values.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct JobInfo {
    #[serde(default)]
    pub status: i64,
    #[serde(default, rename = "statusText")]
    pub status_text: String,
    #[serde(default, rename = "jobId")]
    pub job_id: Option<String>,
    #[serde(default, rename = "resultsDid")]
    pub results_did: String,
    #[serde(default, rename = "resultsUrls")]
    pub results_urls: Vec<String>,
    #[serde(default, rename = "algorithmLogUrl")]
    pub algorithm_log_url: Vec<String>,
}

/// Everything a start request carries to the provider.
pub struct StartComputeJob {
    pub did: String,
    pub service_endpoint: String,
    pub consumer_address: Address,
    pub auth_token: AuthToken,
    pub service_index: u32,
    pub token_address: Address,
    pub transfer_tx_id: String,
    pub algorithm_did: Option<String>,
    pub algorithm_meta: Option<AlgorithmMetadata>,
    pub output: Map<String, Value>,
    /// Resume a previously stopped job, if the provider backend supports it.
    pub job_id: Option<String>,
}

/// Remote compute-provider boundary. One implementation talks HTTP; tests
/// substitute their own.
#[async_trait]
pub trait DataProvider: Send + Sync {
    /// Root URL of the provider, used when defaulting output options.
    fn get_url(&self) -> String;

    async fn start_compute_job(&self, request: StartComputeJob) -> Result<JobInfo>;

    async fn compute_job_status(
        &self,
        did: &str,
        job_id: &str,
        service_endpoint: &str,
        consumer_address: Address,
        auth_token: &AuthToken,
    ) -> Result<JobInfo>;

    async fn compute_job_result(
        &self,
        did: &str,
        job_id: &str,
        service_endpoint: &str,
        consumer_address: Address,
        auth_token: &AuthToken,
    ) -> Result<JobInfo>;

    async fn stop_compute_job(
        &self,
        did: &str,
        job_id: &str,
        service_endpoint: &str,
        consumer_address: Address,
        auth_token: &AuthToken,
    ) -> Result<JobInfo>;

    async fn restart_compute_job(
        &self,
        did: &str,
        job_id: &str,
        service_endpoint: &str,
        consumer_address: Address,
        auth_token: &AuthToken,
    ) -> Result<JobInfo>;

    async fn delete_compute_job(
        &self,
        did: &str,
        job_id: &str,
        service_endpoint: &str,
        consumer_address: Address,
        auth_token: &AuthToken,
    ) -> Result<JobInfo>;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StartComputeBody<'a> {
    document_id: &'a str,
    consumer_address: String,
    signature: &'a str,
    service_index: u32,
    token_address: String,
    transfer_tx_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    algorithm_did: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    algorithm_meta: Option<&'a AlgorithmMetadata>,
    output: &'a Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    job_id: Option<&'a str>,
}

/// reqwest-backed provider client. Timeouts and retries are properties of the
/// injected client, not of this layer.
pub struct HttpDataProvider {
    base_url: String,
    client: reqwest::Client,
}

impl HttpDataProvider {
    pub fn new(config: &Config) -> Self {
        Self::with_client(config, reqwest::Client::new())
    }

    pub fn with_client(config: &Config, client: reqwest::Client) -> Self {
        HttpDataProvider {
            base_url: config.provider_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    fn job_url(
        &self,
        service_endpoint: &str,
        did: &str,
        job_id: &str,
        consumer_address: Address,
        auth_token: &AuthToken,
    ) -> Result<Url> {
        let mut url = Url::parse(service_endpoint)?;
        url.query_pairs_mut().extend_pairs(&[
            ("documentId", did),
            ("jobId", job_id),
            ("consumerAddress", &consumer_address.to_string()),
            ("signature", auth_token.expose_secret().as_str()),
        ]);
        Ok(url)
    }

    async fn job_call(
        &self,
        method: Method,
        action: Option<&str>,
        did: &str,
        job_id: &str,
        service_endpoint: &str,
        consumer_address: Address,
        auth_token: &AuthToken,
    ) -> Result<JobInfo> {
        let mut url = self.job_url(service_endpoint, did, job_id, consumer_address, auth_token)?;
        if let Some(action) = action {
            url.query_pairs_mut().append_pair("action", action);
        }
        debug!(%method, did, job_id, "compute job request");

        let response = self
            .client
            .request(method, url)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json::<JobInfo>().await?)
    }
}

#[async_trait]
impl DataProvider for HttpDataProvider {
    fn get_url(&self) -> String {
        self.base_url.clone()
    }

    async fn start_compute_job(&self, request: StartComputeJob) -> Result<JobInfo> {
        let body = StartComputeBody {
            document_id: &request.did,
            consumer_address: request.consumer_address.to_string(),
            signature: request.auth_token.expose_secret(),
            service_index: request.service_index,
            token_address: request.token_address.to_string(),
            transfer_tx_id: &request.transfer_tx_id,
            algorithm_did: request.algorithm_did.as_deref(),
            algorithm_meta: request.algorithm_meta.as_ref(),
            output: &request.output,
            job_id: request.job_id.as_deref(),
        };
        debug!(did = %request.did, "start compute job request");

        let response = self
            .client
            .post(&request.service_endpoint)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json::<JobInfo>().await?)
    }

    async fn compute_job_status(
        &self,
        did: &str,
        job_id: &str,
        service_endpoint: &str,
        consumer_address: Address,
        auth_token: &AuthToken,
    ) -> Result<JobInfo> {
        self.job_call(
            Method::GET,
            None,
            did,
            job_id,
            service_endpoint,
            consumer_address,
            auth_token,
        )
        .await
    }

    async fn compute_job_result(
        &self,
        did: &str,
        job_id: &str,
        service_endpoint: &str,
        consumer_address: Address,
        auth_token: &AuthToken,
    ) -> Result<JobInfo> {
        self.job_call(
            Method::GET,
            None,
            did,
            job_id,
            service_endpoint,
            consumer_address,
            auth_token,
        )
        .await
    }

    async fn stop_compute_job(
        &self,
        did: &str,
        job_id: &str,
        service_endpoint: &str,
        consumer_address: Address,
        auth_token: &AuthToken,
    ) -> Result<JobInfo> {
        self.job_call(
            Method::PUT,
            Some("stop"),
            did,
            job_id,
            service_endpoint,
            consumer_address,
            auth_token,
        )
        .await
    }

    async fn restart_compute_job(
        &self,
        did: &str,
        job_id: &str,
        service_endpoint: &str,
        consumer_address: Address,
        auth_token: &AuthToken,
    ) -> Result<JobInfo> {
        self.job_call(
            Method::PUT,
            Some("restart"),
            did,
            job_id,
            service_endpoint,
            consumer_address,
            auth_token,
        )
        .await
    }

    async fn delete_compute_job(
        &self,
        did: &str,
        job_id: &str,
        service_endpoint: &str,
        consumer_address: Address,
        auth_token: &AuthToken,
    ) -> Result<JobInfo> {
        self.job_call(
            Method::DELETE,
            None,
            did,
            job_id,
            service_endpoint,
            consumer_address,
            auth_token,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn job_info_defaults_absent_fields() {
        let info: JobInfo = serde_json::from_value(json!({"status": 70})).unwrap();

        assert_eq!(info.status, 70);
        assert_eq!(info.status_text, "");
        assert_eq!(info.job_id, None);
        assert_eq!(info.results_did, "");
        assert!(info.results_urls.is_empty());
        assert!(info.algorithm_log_url.is_empty());
    }

    #[test]
    fn job_info_reads_provider_keys() {
        let info: JobInfo = serde_json::from_value(json!({
            "status": 70,
            "statusText": "Job finished",
            "jobId": "0x1234",
            "resultsDid": "did:op:abc",
            "resultsUrls": ["https://results/0"],
            "algorithmLogUrl": ["https://logs/0"],
        }))
        .unwrap();

        assert_eq!(info.status_text, "Job finished");
        assert_eq!(info.job_id.as_deref(), Some("0x1234"));
        assert_eq!(info.results_urls, vec!["https://results/0"]);
        assert_eq!(info.algorithm_log_url, vec!["https://logs/0"]);
    }
}
