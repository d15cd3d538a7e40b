//! Apply and delete commands - reconcile rendered manifests against a cluster

use benchctl_kube::{ClusterApi, OperationSummary, Reconciler, ResourceBatch, connect_cluster};
use console::style;

use super::{ClusterArgs, ManifestArgs, pipeline};
use crate::display::{OutcomeDisplay, pluralize};
use crate::error::{CliError, Result};

/// Direction of a reconcile run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Apply,
    Delete,
}

impl Mode {
    fn verb(self) -> &'static str {
        match self {
            Mode::Apply => "Applying",
            Mode::Delete => "Deleting",
        }
    }
}

/// Run the apply or delete command
pub async fn run(mode: Mode, manifests: &ManifestArgs, cluster: &ClusterArgs) -> Result<()> {
    let documents = pipeline::render(manifests, true)?;
    let batches = pipeline::decode(&documents)?;
    let config = pipeline::load_config(cluster.config.as_deref())?;

    let total: usize = batches.iter().map(ResourceBatch::len).sum();
    println!(
        "{} {} {} from {}",
        style("→").blue().bold(),
        mode.verb(),
        pluralize(total, "resource", "resources"),
        pluralize(batches.len(), "file", "files")
    );

    let live = connect_cluster(cluster.kubeconfig.as_deref()).await?;
    let reconciler = Reconciler::new(live).with_config(config);

    let summary = execute(&reconciler, mode, &batches).await;
    OutcomeDisplay::new().render(&summary)?;

    check(&summary, cluster.fail_on_error)
}

/// Reconcile every batch in order
pub async fn execute<C: ClusterApi>(
    reconciler: &Reconciler<C>,
    mode: Mode,
    batches: &[ResourceBatch],
) -> OperationSummary {
    match mode {
        Mode::Apply => reconciler.apply(batches).await,
        Mode::Delete => reconciler.delete(batches).await,
    }
}

/// Per-resource failures fail the command only when asked to
fn check(summary: &OperationSummary, fail_on_error: bool) -> Result<()> {
    let failed = summary.failed().count();
    if failed > 0 && fail_on_error {
        return Err(CliError::PartialFailure {
            failed,
            total: summary.total(),
        });
    }
    Ok(())
}
