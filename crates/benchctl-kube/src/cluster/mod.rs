//! The cluster-management API boundary
//!
//! Handlers talk to the cluster only through [`ClusterApi`]:
//! - **Live**: a `kube::Client` against a real API server
//! - **Mock**: an in-memory cluster that records every call, for tests
//!
//! Objects cross the boundary as `DynamicObject`s addressed by an
//! `ApiResource`; typed conversion happens in the handlers. A `namespace`
//! of `None` addresses a cluster-scoped collection.

mod live;
mod mock;

pub use live::LiveCluster;
pub use mock::{ClusterCall, MockCluster, Verb};

use async_trait::async_trait;
use kube::api::DynamicObject;
use kube::discovery::ApiResource;

use crate::error::Result;

/// Minimal CRUD surface the reconciler needs
///
/// Errors follow the API server's status codes: 404 for a missing object,
/// 409 for an optimistic-concurrency conflict (see [`crate::KubeError::is_not_found`]
/// and [`crate::KubeError::is_conflict`]).
#[async_trait]
pub trait ClusterApi: Send + Sync {
    /// List every object of a kind
    async fn list(
        &self,
        resource: &ApiResource,
        namespace: Option<&str>,
    ) -> Result<Vec<DynamicObject>>;

    /// Get an object by name
    async fn get(
        &self,
        resource: &ApiResource,
        namespace: Option<&str>,
        name: &str,
    ) -> Result<DynamicObject>;

    /// Create an object
    async fn create(
        &self,
        resource: &ApiResource,
        namespace: Option<&str>,
        object: &DynamicObject,
    ) -> Result<DynamicObject>;

    /// Replace an existing object
    async fn replace(
        &self,
        resource: &ApiResource,
        namespace: Option<&str>,
        name: &str,
        object: &DynamicObject,
    ) -> Result<DynamicObject>;

    /// Delete an object with foreground propagation
    async fn delete(&self, resource: &ApiResource, namespace: Option<&str>, name: &str)
    -> Result<()>;
}
