//! CLI error types with exit code handling
//!
//! Every failure that stops a command maps to a stable exit code, so CI
//! jobs driving benchctl can tell a broken template from an unreachable
//! cluster.

use benchctl_core::CoreError;
use benchctl_engine::{EngineError, TemplateError};
use benchctl_kube::KubeError;
use miette::Diagnostic;
use thiserror::Error;

use crate::exit_codes;

/// CLI-specific error type that includes exit code information
#[derive(Error, Debug, Diagnostic)]
pub enum CliError {
    /// A manifest failed to render
    #[error("Failed to render {file}")]
    #[diagnostic(code(benchctl::cli::template))]
    Template {
        file: String,
        #[source]
        #[diagnostic_source]
        source: TemplateError,
    },

    /// A rendered manifest could not be decoded into resources
    #[error("Manifest error: {message}")]
    #[diagnostic(code(benchctl::cli::manifest))]
    Manifest {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// The reconciler config file is invalid
    #[error("Configuration error: {message}")]
    #[diagnostic(code(benchctl::cli::config))]
    Config { message: String },

    /// No usable cluster connection
    #[error("Cluster error: {message}")]
    #[diagnostic(
        code(benchctl::cli::cluster),
        help("check --kubeconfig, KUBECONFIG or ~/.kube/config")
    )]
    Cluster { message: String },

    /// Some resources failed and the caller asked for a failing exit status
    #[error("{failed} of {total} resource(s) failed")]
    #[diagnostic(code(benchctl::cli::partial_failure))]
    PartialFailure { failed: usize, total: usize },

    /// Invalid command line input (bindings, variables file)
    #[error("{message}")]
    #[diagnostic(code(benchctl::cli::usage))]
    Usage { message: String },

    /// IO error (file not found, permissions, etc.)
    #[error("IO error: {message}")]
    #[diagnostic(code(benchctl::cli::io))]
    Io { message: String },

    /// Wrapped error for passthrough (stores the formatted message)
    #[error("{message}")]
    #[diagnostic(code(benchctl::cli::error))]
    Other { message: String },
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Template { .. } => exit_codes::TEMPLATE_ERROR,
            CliError::Manifest { .. } => exit_codes::MANIFEST_ERROR,
            CliError::Config { .. } => exit_codes::CONFIG_ERROR,
            CliError::Cluster { .. } => exit_codes::CLUSTER_ERROR,
            CliError::PartialFailure { .. } => exit_codes::PARTIAL_FAILURE,
            CliError::Usage { .. } => exit_codes::USAGE_ERROR,
            CliError::Io { .. } => exit_codes::IO_ERROR,
            CliError::Other { .. } => exit_codes::ERROR,
        }
    }

    /// Create a manifest error with help text
    pub fn manifest_with_help(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Manifest {
            message: message.into(),
            help: Some(help.into()),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a cluster error
    pub fn cluster(message: impl Into<String>) -> Self {
        Self::Cluster {
            message: message.into(),
        }
    }

    /// Create a usage error
    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Io {
            message: err.to_string(),
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidBinding { .. } | CoreError::YamlParse(_) => CliError::usage(err.to_string()),
            other => CliError::Io {
                message: other.to_string(),
            },
        }
    }
}

impl From<EngineError> for CliError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Template { file, source } => CliError::Template { file, source },
            EngineError::Io(e) => e.into(),
        }
    }
}

impl From<KubeError> for CliError {
    fn from(err: KubeError) -> Self {
        match err {
            KubeError::Decode { .. } => CliError::manifest_with_help(
                err.to_string(),
                "every section between '---' lines needs apiVersion, kind and metadata.name",
            ),
            KubeError::Connect(message) => CliError::cluster(message),
            KubeError::InvalidConfig(message) => CliError::config(message),
            other => CliError::Other {
                message: other.to_string(),
            },
        }
    }
}

impl From<miette::Report> for CliError {
    fn from(err: miette::Report) -> Self {
        CliError::Other {
            message: format!("{:?}", err),
        }
    }
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
