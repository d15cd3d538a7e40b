//! Shared stages: collect, bind, render, decode
//!
//! Every stage here runs before a cluster client exists, so a broken
//! template or malformed manifest never reaches the API server.

use benchctl_core::{Bindings, ManifestFile, RenderedDocument, collect};
use benchctl_engine::Engine;
use benchctl_kube::{Decoder, ReconcileConfig, ResourceBatch};
use std::path::Path;
use tracing::{debug, info};

use super::ManifestArgs;
use crate::error::{CliError, Result};

/// Variables from `--vars-file`, then `--set` on top
pub fn load_bindings(manifests: &ManifestArgs) -> Result<Bindings> {
    let mut bindings = match &manifests.vars_file {
        Some(path) => Bindings::from_yaml_file(path)?,
        None => Bindings::new(),
    };
    bindings.merge(&Bindings::parse_set(&manifests.set)?);

    debug!(variables = ?bindings.names(), "template variables bound");
    Ok(bindings)
}

/// Collect and render every manifest, stopping at the first failure
pub fn render(manifests: &ManifestArgs, strict: bool) -> Result<Vec<RenderedDocument>> {
    let paths = collect(&manifests.files)?;
    if paths.is_empty() {
        return Err(CliError::manifest_with_help(
            "no manifest files found",
            "directories are searched recursively for .yaml and .yml files",
        ));
    }

    let files = ManifestFile::load_all(&paths)?;
    let bindings = load_bindings(manifests)?;

    let engine = Engine::builder().strict(strict).build();
    let documents = engine.render_all(&files, &bindings)?;

    info!(files = documents.len(), strict, "rendered manifests");
    Ok(documents)
}

/// Decode rendered files into resource batches
pub fn decode(documents: &[RenderedDocument]) -> Result<Vec<ResourceBatch>> {
    Ok(Decoder::default().decode_all(documents)?)
}

/// Reconciler config from `--config`, defaults otherwise
pub fn load_config(path: Option<&Path>) -> Result<ReconcileConfig> {
    match path {
        Some(path) => ReconcileConfig::from_file(path)
            .map_err(|e| CliError::config(format!("{}: {}", path.display(), e))),
        None => Ok(ReconcileConfig::default()),
    }
}
