//! Rendered manifest decoding
//!
//! A rendered file is split into sections on `---` lines. Every non-empty
//! section must be a well-formed resource document; the first one that is
//! not aborts the whole file. Well-formed documents of kinds the registry
//! does not know are kept as [`Payload::Unsupported`] and rejected later, per
//! resource, by the reconciler.

use benchctl_core::RenderedDocument;
use std::sync::Arc;
use tracing::debug;

use crate::error::{KubeError, Result};
use crate::registry::KindRegistry;
use crate::resources::{ParsedResource, Payload, ResourceBatch};

/// Characters of the offending section quoted in decode errors
const SNIPPET_LEN: usize = 100;

/// Decodes rendered documents into resource batches
#[derive(Debug, Clone)]
pub struct Decoder {
    registry: Arc<KindRegistry>,
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new(Arc::new(KindRegistry::with_defaults()))
    }
}

impl Decoder {
    pub fn new(registry: Arc<KindRegistry>) -> Self {
        Self { registry }
    }

    /// Decode one rendered file
    pub fn decode(&self, document: &RenderedDocument) -> Result<ResourceBatch> {
        let mut batch = ResourceBatch::new(document.source_file.clone());

        for (index, section) in document.sections().into_iter().enumerate() {
            if is_comment_only(section) {
                continue;
            }

            let decoded = self
                .decode_section(section)
                .map_err(|message| KubeError::Decode {
                    file: document.source_file.clone(),
                    index: index + 1,
                    snippet: section.chars().take(SNIPPET_LEN).collect(),
                    message,
                })?;

            if let Some(resource) = decoded {
                batch.resources.push(resource);
            }
        }

        debug!(file = %batch.file_name, resources = batch.len(), "decoded manifest");
        Ok(batch)
    }

    /// Decode every rendered file, stopping at the first malformed one
    pub fn decode_all(&self, documents: &[RenderedDocument]) -> Result<Vec<ResourceBatch>> {
        documents.iter().map(|doc| self.decode(doc)).collect()
    }

    fn decode_section(&self, section: &str) -> std::result::Result<Option<ParsedResource>, String> {
        let value: serde_json::Value =
            serde_yaml::from_str(section).map_err(|e| format!("YAML parse error: {}", e))?;

        if value.is_null() {
            return Ok(None);
        }
        if !value.is_object() {
            return Err("document is not a mapping".to_string());
        }

        let kind = required_str(&value, &["kind"])?;
        let api_version = required_str(&value, &["apiVersion"])?;
        let name = required_str(&value, &["metadata", "name"])?;
        let namespace = lookup(&value, &["metadata", "namespace"])
            .and_then(|v| v.as_str())
            .filter(|ns| !ns.is_empty())
            .map(str::to_string);

        let payload = match self.registry.get(&kind, &api_version) {
            Some(handler) => Payload::Typed(
                handler
                    .decode(value)
                    .map_err(|e| format!("invalid {} {}: {}", api_version, kind, e))?,
            ),
            None => Payload::Unsupported(value),
        };

        Ok(Some(ParsedResource {
            kind,
            api_version,
            namespace,
            name,
            payload,
        }))
    }
}

fn is_comment_only(section: &str) -> bool {
    section
        .lines()
        .all(|l| l.trim().is_empty() || l.trim().starts_with('#'))
}

fn lookup<'a>(value: &'a serde_json::Value, path: &[&str]) -> Option<&'a serde_json::Value> {
    path.iter().try_fold(value, |current, key| current.get(key))
}

fn required_str(value: &serde_json::Value, path: &[&str]) -> std::result::Result<String, String> {
    lookup(value, path)
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or_else(|| format!("missing required field '{}'", path.join(".")))
}
