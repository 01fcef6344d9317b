//! Client SDK for the dataswap data-exchange protocol.
//!
//! Two surfaces: thin typed helpers around the token dispenser contract
//! (status decoding, creation arguments), and a lifecycle client for remote
//! compute-to-data jobs. Contract invocation, asset resolution, and auth
//! token signing are collaborator seams; this crate fixes the shapes and
//! rules exchanged with them.

use std::sync::Arc;

pub mod assets;
pub mod auth;
pub mod compute;
pub mod config;
pub mod constants;
pub mod dispenser;
pub mod provider;
pub mod service;

pub use assets::{Asset, AssetResolver, MetadataStoreClient, Service};
pub use auth::{Account, AuthError, AuthProvider, AuthToken};
pub use compute::{build_output_config, ComputeClient, JobResult, JobStatus};
pub use config::Config;
pub use dispenser::{DispenserArguments, DispenserStatus, DispenserStatusTuple};
pub use provider::{DataProvider, HttpDataProvider, JobInfo, StartComputeJob};
pub use service::{
    AlgorithmMetadata, ClusterSpec, ComputeServiceSpec, ContainerSpec, ProviderSpec, ServerSpec,
};

pub type SharedDataProvider = Arc<dyn provider::DataProvider>;
pub type SharedAssetResolver = Arc<dyn assets::AssetResolver>;
pub type SharedAuthProvider = Arc<dyn auth::AuthProvider>;
