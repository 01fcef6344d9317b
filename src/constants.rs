pub const NETWORK_URL: &str = "NETWORK_URL";
pub const DEFAULT_NETWORK_URL: &str = "http://127.0.0.1:8545";
pub const PROVIDER_URL: &str = "PROVIDER_URL";
pub const DEFAULT_PROVIDER_URL: &str = "http://127.0.0.1:8030";
pub const PROVIDER_ADDRESS: &str = "PROVIDER_ADDRESS";
pub const METADATA_STORE_URL: &str = "METADATA_STORE_URL";
pub const DEFAULT_METADATA_STORE_URL: &str = "http://127.0.0.1:5000";
pub const DISPENSER_ADDRESS: &str = "DISPENSER_ADDRESS";

/// Contract-type key of the dispenser in the config address book.
pub const DISPENSER_CONTRACT: &str = "Dispenser";

/// Service type under which an asset declares its compute service.
pub const COMPUTE_SERVICE_TYPE: &str = "compute";

pub const COMPUTE_SERVICE_NAME: &str = "dataAssetComputingServiceAgreement";

/// Terminal failure codes reported by the compute provider. Any other code,
/// known or not, counts as ok.
pub const JOB_FAILED_STATUS_CODES: [i64; 2] = [31, 32];
