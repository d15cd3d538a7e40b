//! `ClusterApi` backed by a live API server

use async_trait::async_trait;
use kube::{
    Client,
    api::{Api, DeleteParams, DynamicObject, ListParams, PostParams, PropagationPolicy},
    discovery::ApiResource,
};
use tracing::debug;

use super::ClusterApi;
use crate::error::Result;

/// Cluster reached through a `kube::Client`
#[derive(Clone)]
pub struct LiveCluster {
    client: Client,
}

impl LiveCluster {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn api(&self, resource: &ApiResource, namespace: Option<&str>) -> Api<DynamicObject> {
        match namespace {
            Some(ns) => Api::namespaced_with(self.client.clone(), ns, resource),
            None => Api::all_with(self.client.clone(), resource),
        }
    }
}

#[async_trait]
impl ClusterApi for LiveCluster {
    async fn list(
        &self,
        resource: &ApiResource,
        namespace: Option<&str>,
    ) -> Result<Vec<DynamicObject>> {
        debug!(kind = %resource.kind, namespace = ?namespace, "list");
        let list = self
            .api(resource, namespace)
            .list(&ListParams::default())
            .await?;
        Ok(list.items)
    }

    async fn get(
        &self,
        resource: &ApiResource,
        namespace: Option<&str>,
        name: &str,
    ) -> Result<DynamicObject> {
        debug!(kind = %resource.kind, namespace = ?namespace, name, "get");
        Ok(self.api(resource, namespace).get(name).await?)
    }

    async fn create(
        &self,
        resource: &ApiResource,
        namespace: Option<&str>,
        object: &DynamicObject,
    ) -> Result<DynamicObject> {
        debug!(kind = %resource.kind, namespace = ?namespace, "create");
        Ok(self
            .api(resource, namespace)
            .create(&PostParams::default(), object)
            .await?)
    }

    async fn replace(
        &self,
        resource: &ApiResource,
        namespace: Option<&str>,
        name: &str,
        object: &DynamicObject,
    ) -> Result<DynamicObject> {
        debug!(kind = %resource.kind, namespace = ?namespace, name, "replace");
        Ok(self
            .api(resource, namespace)
            .replace(name, &PostParams::default(), object)
            .await?)
    }

    async fn delete(
        &self,
        resource: &ApiResource,
        namespace: Option<&str>,
        name: &str,
    ) -> Result<()> {
        debug!(kind = %resource.kind, namespace = ?namespace, name, "delete");
        let params = DeleteParams {
            propagation_policy: Some(PropagationPolicy::Foreground),
            ..Default::default()
        };

        self.api(resource, namespace).delete(name, &params).await?;
        Ok(())
    }
}
