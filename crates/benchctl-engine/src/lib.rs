//! benchctl Engine - strict template rendering for benchmark manifests
//!
//! This crate provides a MiniJinja-based renderer with:
//! - Strict substitution: a reference to an unbound variable fails the render
//! - The `normalize` helper for names and labels that cannot contain dots
//! - Human-readable error messages with suggestions

pub mod engine;
pub mod error;
pub mod functions;
pub mod suggestions;

pub use engine::{Engine, EngineBuilder};
pub use error::{EngineError, Result, TemplateError, TemplateErrorKind};
pub use functions::normalize;
