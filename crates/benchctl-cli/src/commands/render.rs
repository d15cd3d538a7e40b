//! Render command - print rendered manifests without touching the cluster

use benchctl_core::RenderedDocument;
use console::style;
use miette::{IntoDiagnostic, WrapErr};
use std::io::{self, Write};

use super::{ManifestArgs, pipeline};
use crate::error::Result;

/// Run the render command
pub fn run(manifests: &ManifestArgs, lenient: bool) -> Result<()> {
    let documents = pipeline::render(manifests, !lenient)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    for document in &documents {
        write_document(&mut out, document)
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to write {}", document.source_file))?;
    }

    Ok(())
}

/// Each file becomes its own YAML document, headed by its source
fn write_document(out: &mut impl Write, document: &RenderedDocument) -> io::Result<()> {
    writeln!(out, "---")?;
    writeln!(
        out,
        "{}",
        style(format!("# Source: {}", document.source_file)).dim()
    )?;
    writeln!(out, "{}", document.content.trim())
}
