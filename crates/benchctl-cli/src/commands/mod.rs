//! Command implementations

use clap::Args;
use std::path::PathBuf;

pub mod pipeline;
pub mod reconcile;
pub mod render;

/// Where manifests come from and how they are rendered
#[derive(Args, Debug, Clone)]
pub struct ManifestArgs {
    /// Manifest file or directory (repeatable, processed in order)
    #[arg(short = 'f', long = "file", required = true)]
    pub files: Vec<PathBuf>,

    /// Bind a template variable (KEY=VALUE), overriding --vars-file
    #[arg(long = "set")]
    pub set: Vec<String>,

    /// YAML mapping of template variables
    #[arg(long)]
    pub vars_file: Option<PathBuf>,
}

/// How to reach the cluster and how to report partial failure
#[derive(Args, Debug, Clone)]
pub struct ClusterArgs {
    /// Path to a kubeconfig (defaults to KUBECONFIG, ~/.kube/config, then in-cluster)
    #[arg(long)]
    pub kubeconfig: Option<PathBuf>,

    /// Reconciler config (poll and conflict retry budgets)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Exit non-zero if any resource failed
    #[arg(long)]
    pub fail_on_error: bool,
}
