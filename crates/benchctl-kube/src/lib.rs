//! benchctl Kube - reconciling benchmark manifests against a cluster
//!
//! This crate provides:
//! - **Decoder**: Rendered files into typed, ordered resource batches
//! - **Registry**: Supported kinds and versions, each with a small handler
//! - **Reconciler**: Sequential create-or-update and delete with per-resource outcomes
//! - **Polling**: Bounded readiness and deletion confirmation
//! - **Cluster API**: A live `kube::Client` backend and an in-memory mock

pub mod client;
pub mod cluster;
pub mod config;
pub mod decoder;
pub mod error;
pub mod poll;
pub mod readiness;
pub mod reconciler;
pub mod registry;
pub mod resources;
pub mod retry;

pub use client::{connect, connect_cluster};
pub use cluster::{ClusterApi, ClusterCall, LiveCluster, MockCluster, Verb};
pub use config::{ConflictRetry, PollConfig, ReconcileConfig};
pub use decoder::Decoder;
pub use error::{KubeError, Result};
pub use poll::retry_until_true;
pub use reconciler::Reconciler;
pub use registry::{KindHandler, KindRegistry, TypedHandler};
pub use resources::{
    DEFAULT_NAMESPACE, OperationSummary, ParsedResource, Payload, ResourceAction, ResourceBatch,
    ResourceOutcome, TypedObject,
};
pub use retry::retry_on_conflict;
