//! Decoded resources and reconciliation outcomes
//!
//! A rendered file decodes into a [`ResourceBatch`]: the ordered list of
//! [`ParsedResource`]s found in that file. Reconciling batches yields an
//! [`OperationSummary`] with one [`ResourceOutcome`] per resource, so the
//! caller decides what a partial failure means.

use k8s_openapi::api::apps::v1::{DaemonSet, Deployment};
use k8s_openapi::api::core::v1::{
    ConfigMap, Namespace, PersistentVolumeClaim, Secret, Service, ServiceAccount,
};
use k8s_openapi::api::networking::v1::Ingress;
use k8s_openapi::api::rbac::v1::{ClusterRole, ClusterRoleBinding, Role, RoleBinding};
use k8s_openapi::apiextensions_apiserver::pkg::apis::apiextensions::v1::CustomResourceDefinition;

use crate::error::{KubeError, Result};

/// Namespace used for namespaced resources that do not set one
pub const DEFAULT_NAMESPACE: &str = "default";

/// Conversion between a concrete k8s-openapi type and [`TypedObject`]
pub trait TypedKind: Sized {
    fn into_typed(self) -> TypedObject;
    fn from_typed(object: &TypedObject) -> Option<&Self>;
}

macro_rules! typed_objects {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        /// A decoded object of one of the registered kinds
        #[derive(Debug, Clone, PartialEq)]
        pub enum TypedObject {
            $($variant(Box<$ty>),)*
        }

        impl TypedObject {
            /// Kind name as the API spells it
            pub fn kind(&self) -> &'static str {
                match self {
                    $(Self::$variant(_) => <$ty as k8s_openapi::Resource>::KIND,)*
                }
            }

            /// apiVersion as the API spells it
            pub fn api_version(&self) -> &'static str {
                match self {
                    $(Self::$variant(_) => <$ty as k8s_openapi::Resource>::API_VERSION,)*
                }
            }

            /// Serialize back to JSON, including apiVersion and kind
            pub fn to_json(&self) -> Result<serde_json::Value> {
                let value = match self {
                    $(Self::$variant(object) => serde_json::to_value(object.as_ref())?,)*
                };
                Ok(value)
            }
        }

        $(
            impl TypedKind for $ty {
                fn into_typed(self) -> TypedObject {
                    TypedObject::$variant(Box::new(self))
                }

                fn from_typed(object: &TypedObject) -> Option<&Self> {
                    match object {
                        TypedObject::$variant(inner) => Some(inner.as_ref()),
                        #[allow(unreachable_patterns)]
                        _ => None,
                    }
                }
            }
        )*
    };
}

typed_objects! {
    Namespace => Namespace,
    Deployment => Deployment,
    DaemonSet => DaemonSet,
    Service => Service,
    ServiceAccount => ServiceAccount,
    ConfigMap => ConfigMap,
    Secret => Secret,
    PersistentVolumeClaim => PersistentVolumeClaim,
    Role => Role,
    RoleBinding => RoleBinding,
    ClusterRole => ClusterRole,
    ClusterRoleBinding => ClusterRoleBinding,
    Ingress => Ingress,
    CustomResourceDefinition => CustomResourceDefinition,
}

/// Decoded body of a resource document
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// A registered (kind, apiVersion) pair, decoded into its typed struct
    Typed(TypedObject),
    /// Well-formed, but no handler is registered for the kind or version
    Unsupported(serde_json::Value),
}

/// One resource document decoded from a rendered file
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedResource {
    /// Kind as written in the manifest
    pub kind: String,
    /// apiVersion as written in the manifest
    pub api_version: String,
    /// `metadata.namespace`, if set
    pub namespace: Option<String>,
    /// `metadata.name`
    pub name: String,
    pub payload: Payload,
}

impl ParsedResource {
    /// Namespace a namespaced handler operates in
    pub fn namespace_or_default(&self) -> &str {
        self.namespace
            .as_deref()
            .filter(|ns| !ns.is_empty())
            .unwrap_or(DEFAULT_NAMESPACE)
    }

    /// Typed payload, if this resource was decoded by a handler
    pub fn typed(&self) -> Option<&TypedObject> {
        match &self.payload {
            Payload::Typed(object) => Some(object),
            Payload::Unsupported(_) => None,
        }
    }

    /// The typed payload as a concrete k8s-openapi type
    pub fn typed_as<K: TypedKind>(&self) -> Result<&K> {
        self.typed().and_then(K::from_typed).ok_or_else(|| {
            KubeError::InvalidConfig(format!(
                "{} has no decoded {} payload",
                self.display_name(),
                self.kind
            ))
        })
    }

    /// Payload as JSON
    pub fn to_json(&self) -> Result<serde_json::Value> {
        match &self.payload {
            Payload::Typed(object) => object.to_json(),
            Payload::Unsupported(value) => Ok(value.clone()),
        }
    }

    /// Get display name for logging
    pub fn display_name(&self) -> String {
        match &self.namespace {
            Some(ns) => format!("{}/{}/{}", ns, self.kind, self.name),
            None => format!("{}/{}", self.kind, self.name),
        }
    }
}

/// All resources decoded from one rendered file, in document order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceBatch {
    pub file_name: String,
    pub resources: Vec<ParsedResource>,
}

impl ResourceBatch {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            resources: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

/// What happened to a resource that was processed successfully
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceAction {
    Created,
    Updated,
    Deleted,
}

impl std::fmt::Display for ResourceAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Deleted => "deleted",
        };
        f.write_str(s)
    }
}

/// Result of reconciling a single resource
#[derive(Debug)]
pub struct ResourceOutcome {
    /// File the resource was decoded from
    pub file: String,
    pub kind: String,
    pub name: String,
    /// Namespace the operation targeted (None for cluster-scoped kinds)
    pub namespace: Option<String>,
    pub result: Result<ResourceAction>,
}

impl ResourceOutcome {
    pub fn new(
        file: &str,
        resource: &ParsedResource,
        namespace: Option<&str>,
        result: Result<ResourceAction>,
    ) -> Self {
        Self {
            file: file.to_string(),
            kind: resource.kind.clone(),
            name: resource.name.clone(),
            namespace: namespace.map(str::to_string),
            result,
        }
    }

    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    /// Get display name for logging
    pub fn display_name(&self) -> String {
        match &self.namespace {
            Some(ns) => format!("{}/{}/{}", ns, self.kind, self.name),
            None => format!("{}/{}", self.kind, self.name),
        }
    }
}

/// Summary of apply/delete operations
#[derive(Debug, Default)]
pub struct OperationSummary {
    /// Every processed resource, in processing order
    pub outcomes: Vec<ResourceOutcome>,
}

impl OperationSummary {
    pub fn push(&mut self, outcome: ResourceOutcome) {
        self.outcomes.push(outcome);
    }

    /// Check if all operations succeeded
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(ResourceOutcome::is_success)
    }

    /// Get total count
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn succeeded(&self) -> impl Iterator<Item = &ResourceOutcome> {
        self.outcomes.iter().filter(|o| o.is_success())
    }

    pub fn failed(&self) -> impl Iterator<Item = &ResourceOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }

    /// Outcomes with the given action
    pub fn count(&self, action: ResourceAction) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.result, Ok(a) if a == action))
            .count()
    }

    /// Format as human-readable summary
    pub fn summary(&self) -> String {
        let mut parts = Vec::with_capacity(4);
        for action in [
            ResourceAction::Created,
            ResourceAction::Updated,
            ResourceAction::Deleted,
        ] {
            let count = self.count(action);
            if count > 0 {
                parts.push(format!("{} {}", count, action));
            }
        }

        let failed = self.failed().count();
        if failed > 0 {
            parts.push(format!("{} failed", failed));
        }

        if parts.is_empty() {
            "No resources processed".to_string()
        } else {
            parts.join(", ")
        }
    }
}
