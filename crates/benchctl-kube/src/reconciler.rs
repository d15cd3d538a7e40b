//! Sequential apply/delete of decoded resource batches
//!
//! Batches are processed in order, and resources within a batch in document
//! order. Nothing runs concurrently: a Deployment is only sent once the
//! Namespace before it has been created. A failing resource is recorded in
//! the [`OperationSummary`] and processing moves on to the next one.

use std::sync::Arc;
use tracing::{error, info};

use crate::cluster::ClusterApi;
use crate::config::ReconcileConfig;
use crate::error::Result;
use crate::poll::retry_until_true;
use crate::registry::KindRegistry;
use crate::resources::{
    OperationSummary, ParsedResource, ResourceAction, ResourceBatch, ResourceOutcome,
};

/// Drives resources toward their manifests on one cluster
pub struct Reconciler<C: ClusterApi> {
    cluster: C,
    registry: Arc<KindRegistry>,
    config: ReconcileConfig,
}

impl<C: ClusterApi> Reconciler<C> {
    /// Reconciler with the built-in kinds and default timings
    pub fn new(cluster: C) -> Self {
        Self {
            cluster,
            registry: Arc::new(KindRegistry::with_defaults()),
            config: ReconcileConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ReconcileConfig) -> Self {
        self.config = config;
        self
    }

    pub fn cluster(&self) -> &C {
        &self.cluster
    }

    pub fn config(&self) -> &ReconcileConfig {
        &self.config
    }

    /// Create or update every resource, waiting for readiness where the kind requires it
    pub async fn apply(&self, batches: &[ResourceBatch]) -> OperationSummary {
        let mut summary = OperationSummary::default();

        for batch in batches {
            for resource in &batch.resources {
                let result = self.apply_resource(resource).await;
                if let Err(e) = &result {
                    error!(
                        file = %batch.file_name,
                        kind = %resource.kind,
                        name = %resource.name,
                        error = %e,
                        "error applying resource"
                    );
                }
                summary.push(ResourceOutcome::new(
                    &batch.file_name,
                    resource,
                    self.target_namespace(resource),
                    result,
                ));
            }
        }

        info!(summary = %summary.summary(), "apply finished");
        summary
    }

    /// Delete every resource, confirming absence where the kind requires it
    pub async fn delete(&self, batches: &[ResourceBatch]) -> OperationSummary {
        let mut summary = OperationSummary::default();

        for batch in batches {
            for resource in &batch.resources {
                let result = self.delete_resource(resource).await;
                if let Err(e) = &result {
                    error!(
                        file = %batch.file_name,
                        kind = %resource.kind,
                        name = %resource.name,
                        error = %e,
                        "error deleting resource"
                    );
                }
                summary.push(ResourceOutcome::new(
                    &batch.file_name,
                    resource,
                    self.target_namespace(resource),
                    result,
                ));
            }
        }

        info!(summary = %summary.summary(), "delete finished");
        summary
    }

    /// Namespace the handler addresses, or the manifest's when no handler matches
    fn target_namespace<'a>(&self, resource: &'a ParsedResource) -> Option<&'a str> {
        match self.registry.resolve(resource) {
            Ok(handler) => handler.target_namespace(resource),
            Err(_) => resource.namespace.as_deref(),
        }
    }

    async fn apply_resource(&self, resource: &ParsedResource) -> Result<ResourceAction> {
        let handler = self.registry.resolve(resource)?;
        let cluster: &dyn ClusterApi = &self.cluster;

        let action = handler
            .apply(cluster, resource, &self.config.conflict_retry)
            .await?;

        if handler.waits_for_ready() {
            let description = format!(
                "applying {}: {}",
                resource.kind.to_lowercase(),
                resource.name
            );
            retry_until_true(
                &description,
                self.config.poll.max_attempts,
                self.config.poll.interval,
                move || handler.ready(cluster, resource),
            )
            .await?;
        }

        Ok(action)
    }

    async fn delete_resource(&self, resource: &ParsedResource) -> Result<ResourceAction> {
        let handler = self.registry.resolve(resource)?;
        let cluster: &dyn ClusterApi = &self.cluster;

        handler.delete(cluster, resource).await?;

        if handler.confirms_deletion() {
            let description = format!(
                "deleting {}: {}",
                resource.kind.to_lowercase(),
                resource.name
            );
            retry_until_true(
                &description,
                self.config.poll.deletion_attempts(),
                self.config.poll.interval,
                move || handler.deleted(cluster, resource),
            )
            .await?;
        }

        Ok(ResourceAction::Deleted)
    }
}
