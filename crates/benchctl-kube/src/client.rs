//! Connecting to a cluster
//!
//! An explicit kubeconfig path wins. Otherwise the configuration is
//! inferred: `KUBECONFIG` or `~/.kube/config` first, then the in-cluster
//! service account.

use kube::Client;
use kube::config::{Config, KubeConfigOptions, Kubeconfig};
use std::path::Path;
use tracing::info;

use crate::cluster::LiveCluster;
use crate::error::{KubeError, Result};

/// Build a Kubernetes client
pub async fn connect(kubeconfig: Option<&Path>) -> Result<Client> {
    let config = match kubeconfig {
        Some(path) => {
            let kubeconfig = Kubeconfig::read_from(path).map_err(|e| {
                KubeError::Connect(format!("cannot read kubeconfig {}: {}", path.display(), e))
            })?;
            Config::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default())
                .await
                .map_err(|e| KubeError::Connect(e.to_string()))?
        }
        None => Config::infer()
            .await
            .map_err(|e| KubeError::Connect(e.to_string()))?,
    };

    info!(
        cluster = %config.cluster_url,
        namespace = %config.default_namespace,
        "connecting to cluster"
    );

    Client::try_from(config).map_err(|e| KubeError::Connect(e.to_string()))
}

/// Build a [`LiveCluster`] for the reconciler
pub async fn connect_cluster(kubeconfig: Option<&Path>) -> Result<LiveCluster> {
    Ok(LiveCluster::new(connect(kubeconfig).await?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_kubeconfig_is_a_connect_error() {
        let Err(err) = connect(Some(Path::new("/nonexistent/benchctl/kubeconfig"))).await else {
            panic!("connect succeeded without a kubeconfig");
        };
        assert!(matches!(err, KubeError::Connect(ref msg) if msg.contains("/nonexistent/benchctl/kubeconfig")));
    }
}
