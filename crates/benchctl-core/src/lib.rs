//! benchctl Core - Core types for benchmark environment manifests
//!
//! This crate provides the foundational types used throughout benchctl:
//! - `ManifestFile`: A manifest template read from disk
//! - `RenderedDocument`: A manifest after variable substitution
//! - `Bindings`: Caller-supplied template variables
//! - `collect`: Expansion of file/directory arguments into manifest files

pub mod bindings;
pub mod collector;
pub mod error;
pub mod manifest;

pub use bindings::Bindings;
pub use collector::{collect, is_manifest_path};
pub use error::{CoreError, Result};
pub use manifest::{DOCUMENT_SEPARATOR, ManifestFile, RenderedDocument};
