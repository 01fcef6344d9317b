use crate::auth::Account;
use crate::config::Config;
use crate::constants::JOB_FAILED_STATUS_CODES;
use crate::provider::{DataProvider, JobInfo, StartComputeJob};
use crate::service::AlgorithmMetadata;
use crate::{SharedAssetResolver, SharedAuthProvider, SharedDataProvider};
use anyhow::{anyhow, ensure, Result};
use serde_json::{json, Map, Value};
use tracing::info;

/// Normalized job status. `ok` is false exactly for the provider's terminal
/// failure codes; everything else, unknown codes included, is ok.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JobStatus {
    pub ok: bool,
    pub status: i64,
    pub status_text: String,
}

impl From<&JobInfo> for JobStatus {
    fn from(info: &JobInfo) -> Self {
        JobStatus {
            ok: !JOB_FAILED_STATUS_CODES.contains(&info.status),
            status: info.status,
            status_text: info.status_text.clone(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct JobResult {
    pub did: String,
    pub urls: Vec<String>,
    pub logs: Vec<String>,
}

/// Fills in provider/config-derived defaults for the output options sent with
/// a start request. Caller keys overwrite defaults key-by-key; anything that
/// is not a JSON object counts as empty.
pub fn build_output_config(
    output: Option<Value>,
    consumer: &Account,
    provider: &dyn DataProvider,
    config: &Config,
) -> Map<String, Value> {
    let mut merged = Map::new();
    merged.insert("nodeUri".to_string(), json!(config.network_url));
    merged.insert("brizoUri".to_string(), json!(provider.get_url()));
    merged.insert(
        "brizoAddress".to_string(),
        json!(config.provider_address.to_string()),
    );
    merged.insert("metadata".to_string(), json!({}));
    merged.insert("metadataUri".to_string(), json!(config.metadata_store_url));
    merged.insert("owner".to_string(), json!(consumer.address.to_string()));
    merged.insert("publishOutput".to_string(), json!(0));
    merged.insert("publishAlgorithmLog".to_string(), json!(0));
    merged.insert("whitelist".to_string(), json!([]));

    if let Some(Value::Object(overrides)) = output {
        for (key, value) in overrides {
            merged.insert(key, value);
        }
    }
    merged
}

/// Lifecycle client for compute-to-data jobs. Stateless between calls; the
/// asset is re-resolved on every operation.
pub struct ComputeClient {
    config: Config,
    provider: SharedDataProvider,
    resolver: SharedAssetResolver,
    auth: SharedAuthProvider,
}

impl ComputeClient {
    pub fn new(
        config: Config,
        provider: SharedDataProvider,
        resolver: SharedAssetResolver,
        auth: SharedAuthProvider,
    ) -> Self {
        ComputeClient {
            config,
            provider,
            resolver,
            auth,
        }
    }

    /// Starts a remote compute job on the asset identified by `did` and
    /// returns the provider-assigned job id. Exactly one of `algorithm_did`
    /// and `algorithm_meta` must be given; a violation fails before any
    /// request is sent. `job_id` resumes a previously stopped job if the
    /// provider backend supports it.
    #[allow(clippy::too_many_arguments)]
    #[tracing::instrument(skip_all, fields(did))]
    pub async fn start(
        &self,
        did: &str,
        consumer: &Account,
        transfer_tx_id: &str,
        algorithm_did: Option<&str>,
        algorithm_meta: Option<AlgorithmMetadata>,
        output: Option<Value>,
        job_id: Option<&str>,
    ) -> Result<String> {
        // empty references count as absent, not as a supplied algorithm
        let algorithm_did = algorithm_did.filter(|did| !did.is_empty());
        let algorithm_meta =
            algorithm_meta.filter(|meta| !meta.url.is_empty() || !meta.rawcode.is_empty());
        ensure!(
            algorithm_did.is_some() != algorithm_meta.is_some(),
            "exactly one of an algorithm did or an algorithm meta must be provided"
        );

        let output = build_output_config(output, consumer, self.provider.as_ref(), &self.config);
        let asset = self.resolver.resolve(did).await?;
        let service = asset.compute_service()?;
        let auth_token = self.auth.get_token(consumer).await?;

        let job_info = self
            .provider
            .start_compute_job(StartComputeJob {
                did: did.to_string(),
                service_endpoint: service.service_endpoint.clone(),
                consumer_address: consumer.address,
                auth_token,
                service_index: service.index,
                token_address: asset.data_token_address,
                transfer_tx_id: transfer_tx_id.to_string(),
                algorithm_did: algorithm_did.map(str::to_string),
                algorithm_meta,
                output,
                job_id: job_id.map(str::to_string),
            })
            .await?;

        let job_id = job_info
            .job_id
            .ok_or_else(|| anyhow!("provider response is missing a job id"))?;
        info!(did, %job_id, "compute job started");
        Ok(job_id)
    }

    #[tracing::instrument(skip_all, fields(did, job_id))]
    pub async fn status(&self, did: &str, job_id: &str, account: &Account) -> Result<JobStatus> {
        let service_endpoint = self.service_endpoint(did).await?;
        let auth_token = self.auth.get_token(account).await?;
        let info = self
            .provider
            .compute_job_status(did, job_id, &service_endpoint, account.address, &auth_token)
            .await?;
        Ok(JobStatus::from(&info))
    }

    /// Fetches the result of a terminal job. Absent provider fields map to
    /// empty values, not errors.
    #[tracing::instrument(skip_all, fields(did, job_id))]
    pub async fn result(&self, did: &str, job_id: &str, account: &Account) -> Result<JobResult> {
        let service_endpoint = self.service_endpoint(did).await?;
        let auth_token = self.auth.get_token(account).await?;
        let info = self
            .provider
            .compute_job_result(did, job_id, &service_endpoint, account.address, &auth_token)
            .await?;
        Ok(JobResult {
            did: info.results_did,
            urls: info.results_urls,
            logs: info.algorithm_log_url,
        })
    }

    #[tracing::instrument(skip_all, fields(did, job_id))]
    pub async fn stop(&self, did: &str, job_id: &str, account: &Account) -> Result<JobStatus> {
        let service_endpoint = self.service_endpoint(did).await?;
        let auth_token = self.auth.get_token(account).await?;
        let info = self
            .provider
            .stop_compute_job(did, job_id, &service_endpoint, account.address, &auth_token)
            .await?;
        Ok(JobStatus::from(&info))
    }

    #[tracing::instrument(skip_all, fields(did, job_id))]
    pub async fn restart(&self, did: &str, job_id: &str, account: &Account) -> Result<JobStatus> {
        let service_endpoint = self.service_endpoint(did).await?;
        let auth_token = self.auth.get_token(account).await?;
        let info = self
            .provider
            .restart_compute_job(did, job_id, &service_endpoint, account.address, &auth_token)
            .await?;
        Ok(JobStatus::from(&info))
    }

    #[tracing::instrument(skip_all, fields(did, job_id))]
    pub async fn delete(&self, did: &str, job_id: &str, account: &Account) -> Result<JobStatus> {
        let service_endpoint = self.service_endpoint(did).await?;
        let auth_token = self.auth.get_token(account).await?;
        let info = self
            .provider
            .delete_compute_job(did, job_id, &service_endpoint, account.address, &auth_token)
            .await?;
        Ok(JobStatus::from(&info))
    }

    // Re-resolves the asset on every call; endpoints are never cached.
    async fn service_endpoint(&self, did: &str) -> Result<String> {
        let asset = self.resolver.resolve(did).await?;
        Ok(asset.compute_service()?.service_endpoint.clone())
    }
}
