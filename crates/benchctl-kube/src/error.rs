//! Error types for benchctl-kube

use thiserror::Error;

/// Result type for benchctl-kube operations
pub type Result<T> = std::result::Result<T, KubeError>;

/// Errors that can occur while decoding or reconciling resources
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum KubeError {
    /// Kubernetes API error
    #[error("Kubernetes API error: {0}")]
    Api(#[from] kube::Error),

    /// A document in a rendered file could not be decoded
    #[error("decoding the resource file: {file}, section {index}: {message}\n  {snippet}...")]
    Decode {
        file: String,
        index: usize,
        snippet: String,
        message: String,
    },

    /// Kind is not in the registry
    #[error("unsupported resource kind '{kind}'")]
    UnsupportedKind { kind: String },

    /// Kind is known but the apiVersion is not
    #[error("unknown object version: {api_version} kind: '{kind}', name: '{name}' (supported: {supported})")]
    UnsupportedVersion {
        kind: String,
        api_version: String,
        name: String,
        supported: String,
    },

    /// A poll exhausted its attempt budget
    #[error("{description}: condition not met after {attempts} attempts")]
    Timeout { description: String, attempts: u32 },

    /// Could not build a client
    #[error("cannot connect to the cluster: {0}")]
    Connect(String),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Invalid configuration
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for KubeError {
    fn from(e: serde_json::Error) -> Self {
        KubeError::Serialization(e.to_string())
    }
}

impl From<serde_yaml::Error> for KubeError {
    fn from(e: serde_yaml::Error) -> Self {
        KubeError::Serialization(e.to_string())
    }
}

impl KubeError {
    /// Check if this is a Kubernetes 404 Not Found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, KubeError::Api(kube::Error::Api(resp)) if resp.code == 404)
    }

    /// Check if this is a conflict error (409)
    pub fn is_conflict(&self) -> bool {
        matches!(self, KubeError::Api(kube::Error::Api(resp)) if resp.code == 409)
    }

    /// Build an API error the way the API server reports it
    pub fn api_status(code: u16, reason: &str, message: impl Into<String>) -> Self {
        KubeError::Api(kube::Error::Api(kube::core::ErrorResponse {
            status: "Failure".to_string(),
            message: message.into(),
            reason: reason.to_string(),
            code,
        }))
    }

    /// A 404 for the named object
    pub fn not_found(kind: &str, name: &str) -> Self {
        Self::api_status(
            404,
            "NotFound",
            format!("{} \"{}\" not found", kind.to_lowercase(), name),
        )
    }

    /// A 409 for the named object
    pub fn conflict(kind: &str, name: &str) -> Self {
        Self::api_status(
            409,
            "Conflict",
            format!(
                "Operation cannot be fulfilled on {} \"{}\": the object has been modified",
                kind.to_lowercase(),
                name
            ),
        )
    }
}
