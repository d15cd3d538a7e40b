//! Kind registry and per-kind handlers
//!
//! The registry maps a lowercase kind and an apiVersion to a [`KindHandler`].
//! Every supported kind shares one create-or-update routine in
//! [`TypedHandler`]; kinds differ only in their k8s-openapi type, their scope
//! and whether they are polled after apply or delete.

use async_trait::async_trait;
use k8s_openapi::api::apps::v1::{DaemonSet, Deployment};
use k8s_openapi::api::core::v1::{
    ConfigMap, Namespace, PersistentVolumeClaim, Secret, Service, ServiceAccount,
};
use k8s_openapi::api::networking::v1::Ingress;
use k8s_openapi::api::rbac::v1::{ClusterRole, ClusterRoleBinding, Role, RoleBinding};
use k8s_openapi::apiextensions_apiserver::pkg::apis::apiextensions::v1::CustomResourceDefinition;
use kube::api::DynamicObject;
use kube::discovery::ApiResource;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::{BTreeMap, HashMap};
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::info;

use crate::cluster::ClusterApi;
use crate::config::ConflictRetry;
use crate::error::{KubeError, Result};
use crate::readiness;
use crate::resources::{ParsedResource, ResourceAction, TypedKind, TypedObject};
use crate::retry::retry_on_conflict;

/// Capability interface implemented once per (kind, apiVersion)
#[async_trait]
pub trait KindHandler: Send + Sync {
    /// Kind name as the API spells it
    fn kind(&self) -> &'static str;

    fn api_version(&self) -> &'static str;

    /// Collection addressed by this handler
    fn api_resource(&self) -> ApiResource;

    /// Whether objects of this kind live in a namespace
    fn namespaced(&self) -> bool;

    /// Decode a well-formed document into the typed object
    fn decode(&self, value: serde_json::Value) -> Result<TypedObject>;

    /// Whether the reconciler polls [`KindHandler::ready`] after apply
    fn waits_for_ready(&self) -> bool {
        false
    }

    /// Whether the reconciler polls [`KindHandler::deleted`] after delete
    fn confirms_deletion(&self) -> bool {
        false
    }

    /// Create the object, or update it if one with the same name exists
    async fn apply(
        &self,
        cluster: &dyn ClusterApi,
        resource: &ParsedResource,
        retry: &ConflictRetry,
    ) -> Result<ResourceAction>;

    /// Delete the object by name
    async fn delete(&self, cluster: &dyn ClusterApi, resource: &ParsedResource) -> Result<()>;

    /// One readiness check against the live object
    async fn ready(&self, cluster: &dyn ClusterApi, resource: &ParsedResource) -> Result<bool>;

    /// One absence check: `true` once the API reports not-found
    async fn deleted(&self, cluster: &dyn ClusterApi, resource: &ParsedResource) -> Result<bool> {
        let namespace = self.target_namespace(resource);
        match cluster
            .get(&self.api_resource(), namespace, &resource.name)
            .await
        {
            Ok(_) => Ok(false),
            Err(e) if e.is_not_found() => Ok(true),
            Err(e) => Err(e),
        }
    }

    /// Namespace to address: the resource's (or `default`) for namespaced kinds
    fn target_namespace<'a>(&self, resource: &'a ParsedResource) -> Option<&'a str> {
        self.namespaced()
            .then(|| resource.namespace_or_default())
    }
}

/// Bounds shared by every k8s-openapi type a [`TypedHandler`] can manage
pub trait ManagedKind:
    k8s_openapi::Resource
    + kube::Resource<DynamicType = ()>
    + TypedKind
    + Serialize
    + DeserializeOwned
    + Clone
    + Send
    + Sync
    + 'static
{
}

impl<K> ManagedKind for K where
    K: k8s_openapi::Resource
        + kube::Resource<DynamicType = ()>
        + TypedKind
        + Serialize
        + DeserializeOwned
        + Clone
        + Send
        + Sync
        + 'static
{
}

/// Readiness check over (desired, observed)
pub type ReadyCheck<K> = fn(&K, &K) -> bool;

/// Side effect run once an object is observed ready
pub type ReadyHook<K> = fn(&K);

/// Generic handler for a k8s-openapi type
pub struct TypedHandler<K> {
    namespaced: bool,
    ready_check: Option<ReadyCheck<K>>,
    on_ready: Option<ReadyHook<K>>,
    confirms_deletion: bool,
    _kind: PhantomData<fn() -> K>,
}

impl<K: ManagedKind> TypedHandler<K> {
    /// Handler for a namespaced kind
    pub fn namespaced() -> Self {
        Self::new(true)
    }

    /// Handler for a cluster-scoped kind
    pub fn cluster_scoped() -> Self {
        Self::new(false)
    }

    fn new(namespaced: bool) -> Self {
        Self {
            namespaced,
            ready_check: None,
            on_ready: None,
            confirms_deletion: false,
            _kind: PhantomData,
        }
    }

    /// Poll `check` after apply until it holds
    pub fn wait_until(mut self, check: ReadyCheck<K>) -> Self {
        self.ready_check = Some(check);
        self
    }

    /// Run `hook` on the observed object once it is ready
    pub fn on_ready(mut self, hook: ReadyHook<K>) -> Self {
        self.on_ready = Some(hook);
        self
    }

    /// Poll until the object is gone after delete
    pub fn confirm_deletion(mut self) -> Self {
        self.confirms_deletion = true;
        self
    }

    /// The manifest's object as sent to the API server
    fn desired_object(&self, resource: &ParsedResource) -> Result<DynamicObject> {
        let typed: &K = resource.typed_as()?;
        let mut object: DynamicObject = serde_json::from_value(serde_json::to_value(typed)?)?;
        object.metadata.namespace = self.target_namespace(resource).map(str::to_string);
        Ok(object)
    }
}

#[async_trait]
impl<K: ManagedKind> KindHandler for TypedHandler<K> {
    fn kind(&self) -> &'static str {
        <K as k8s_openapi::Resource>::KIND
    }

    fn api_version(&self) -> &'static str {
        <K as k8s_openapi::Resource>::API_VERSION
    }

    fn api_resource(&self) -> ApiResource {
        ApiResource::erase::<K>(&())
    }

    fn namespaced(&self) -> bool {
        self.namespaced
    }

    fn decode(&self, value: serde_json::Value) -> Result<TypedObject> {
        let object: K = serde_json::from_value(value)?;
        Ok(object.into_typed())
    }

    fn waits_for_ready(&self) -> bool {
        self.ready_check.is_some()
    }

    fn confirms_deletion(&self) -> bool {
        self.confirms_deletion
    }

    async fn apply(
        &self,
        cluster: &dyn ClusterApi,
        resource: &ParsedResource,
        retry: &ConflictRetry,
    ) -> Result<ResourceAction> {
        let api_resource = &self.api_resource();
        let namespace = self.target_namespace(resource);
        let name = resource.name.as_str();
        let desired = &self.desired_object(resource)?;

        let existing = cluster.list(api_resource, namespace).await?;
        let live = existing
            .into_iter()
            .find(|item| item.metadata.name.as_deref() == Some(name));

        if let Some(live) = live {
            // The listed version is used once; after a conflict it is re-read
            let mut listed_version = live.metadata.resource_version;
            retry_on_conflict(retry, move || {
                let known = listed_version.take();
                async move {
                    let resource_version = match known {
                        Some(version) => Some(version),
                        None => {
                            cluster
                                .get(api_resource, namespace, name)
                                .await?
                                .metadata
                                .resource_version
                        }
                    };
                    let mut object = desired.clone();
                    object.metadata.resource_version = resource_version;
                    cluster.replace(api_resource, namespace, name, &object).await
                }
            })
            .await?;
            info!(kind = self.kind(), name, namespace = ?namespace, "resource updated");
            Ok(ResourceAction::Updated)
        } else {
            cluster.create(api_resource, namespace, desired).await?;
            info!(kind = self.kind(), name, namespace = ?namespace, "resource created");
            Ok(ResourceAction::Created)
        }
    }

    async fn delete(&self, cluster: &dyn ClusterApi, resource: &ParsedResource) -> Result<()> {
        let namespace = self.target_namespace(resource);
        cluster
            .delete(&self.api_resource(), namespace, &resource.name)
            .await?;
        info!(kind = self.kind(), name = %resource.name, namespace = ?namespace, "resource deleting");
        Ok(())
    }

    async fn ready(&self, cluster: &dyn ClusterApi, resource: &ParsedResource) -> Result<bool> {
        let Some(check) = self.ready_check else {
            return Ok(true);
        };

        let desired: &K = resource.typed_as()?;
        let namespace = self.target_namespace(resource);
        let observed = cluster
            .get(&self.api_resource(), namespace, &resource.name)
            .await?;
        let observed: K = serde_json::from_value(serde_json::to_value(&observed)?)?;

        let ready = check(desired, &observed);
        if ready && let Some(hook) = self.on_ready {
            hook(&observed);
        }
        Ok(ready)
    }
}

/// Logs the external endpoints of a ready LoadBalancer Service
fn report_service_endpoints(service: &Service) {
    let name = service.metadata.name.as_deref().unwrap_or_default();
    for endpoint in readiness::load_balancer_endpoints(service) {
        info!(service = name, %endpoint, "service endpoint");
    }
}

/// Lookup table from (lowercase kind, apiVersion) to handler
#[derive(Clone, Default)]
pub struct KindRegistry {
    handlers: HashMap<String, BTreeMap<String, Arc<dyn KindHandler>>>,
}

impl KindRegistry {
    /// Registry with no handlers
    pub fn empty() -> Self {
        Self::default()
    }

    /// Registry with every built-in kind
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();

        registry.register(TypedHandler::<Namespace>::cluster_scoped().confirm_deletion());
        registry.register(
            TypedHandler::<Deployment>::namespaced().wait_until(readiness::deployment_ready),
        );
        registry.register(
            TypedHandler::<DaemonSet>::namespaced()
                .wait_until(|_, observed| readiness::daemonset_ready(observed)),
        );
        registry.register(
            TypedHandler::<Service>::namespaced()
                .wait_until(|_, observed| readiness::service_ready(observed))
                .on_ready(report_service_endpoints),
        );
        registry.register(TypedHandler::<ServiceAccount>::namespaced());
        registry.register(TypedHandler::<ConfigMap>::namespaced());
        registry.register(TypedHandler::<Secret>::namespaced());
        registry.register(TypedHandler::<PersistentVolumeClaim>::namespaced());
        registry.register(TypedHandler::<Role>::namespaced());
        registry.register(TypedHandler::<RoleBinding>::namespaced());
        registry.register(TypedHandler::<ClusterRole>::cluster_scoped());
        registry.register(TypedHandler::<ClusterRoleBinding>::cluster_scoped());
        registry.register(TypedHandler::<Ingress>::namespaced());
        registry.register(TypedHandler::<CustomResourceDefinition>::cluster_scoped());

        registry
    }

    /// Add or replace the handler for its (kind, apiVersion)
    pub fn register<H: KindHandler + 'static>(&mut self, handler: H) {
        self.handlers
            .entry(handler.kind().to_lowercase())
            .or_default()
            .insert(handler.api_version().to_string(), Arc::new(handler));
    }

    /// Handler for this exact pair, if registered
    pub fn get(&self, kind: &str, api_version: &str) -> Option<&Arc<dyn KindHandler>> {
        self.handlers
            .get(&kind.to_lowercase())
            .and_then(|versions| versions.get(api_version))
    }

    /// Handler for a resource, or the per-resource dispatch error
    pub fn resolve(&self, resource: &ParsedResource) -> Result<&Arc<dyn KindHandler>> {
        let versions = self
            .handlers
            .get(&resource.kind.to_lowercase())
            .ok_or_else(|| KubeError::UnsupportedKind {
                kind: resource.kind.to_lowercase(),
            })?;

        versions
            .get(&resource.api_version)
            .ok_or_else(|| KubeError::UnsupportedVersion {
                kind: resource.kind.clone(),
                api_version: resource.api_version.clone(),
                name: resource.name.clone(),
                supported: versions.keys().cloned().collect::<Vec<_>>().join(", "),
            })
    }

    /// Registered kinds, lowercase and sorted
    pub fn kinds(&self) -> Vec<&str> {
        let mut kinds: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        kinds.sort_unstable();
        kinds
    }
}

impl std::fmt::Debug for KindRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KindRegistry")
            .field("kinds", &self.kinds())
            .finish()
    }
}
