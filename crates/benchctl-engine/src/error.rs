//! Engine error types with source-annotated diagnostics

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

use crate::suggestions::{extract_quoted_name, suggest_undefined_variable, suggest_unknown_helper};

/// Main engine error type
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Template error in {file}: {source}")]
    Template {
        file: String,
        #[source]
        source: TemplateError,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;

/// Error kind for categorizing template errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum TemplateErrorKind {
    UndefinedVariable,
    UnknownFilter,
    UnknownFunction,
    SyntaxError,
    Other,
}

/// Template-specific error with source information
#[derive(Error, Debug, Diagnostic, Clone)]
#[error("{message}")]
#[diagnostic(code(benchctl::template::render))]
pub struct TemplateError {
    /// Error message
    pub message: String,

    /// Error kind for categorization
    pub kind: TemplateErrorKind,

    /// Template source code
    #[source_code]
    pub src: NamedSource<String>,

    /// Error location in source
    #[label("error occurred here")]
    pub span: Option<SourceSpan>,

    /// Suggestion for fixing the error
    #[help]
    pub suggestion: Option<String>,
}

impl TemplateError {
    /// Create a template error from a MiniJinja error
    ///
    /// `bound_names` are the variables that were available to the template,
    /// used to suggest corrections for unbound references.
    pub fn from_minijinja(
        err: minijinja::Error,
        template_name: &str,
        template_source: &str,
        bound_names: &[String],
    ) -> Self {
        let detailed = format!("{:#}", err);
        let kind = categorize(&err);

        let span = err
            .line()
            .and_then(|line_num| calculate_span(template_source, line_num));

        let (message, suggestion) = match kind {
            TemplateErrorKind::UndefinedVariable => {
                let expr = err
                    .range()
                    .and_then(|range| template_source.get(range))
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty() && !s.contains("{{"))
                    .or_else(|| extract_expression_from_display(&detailed));

                match expr {
                    Some(expr) => {
                        let root = expr.split(['.', '[', '(']).next().unwrap_or(&expr).trim();
                        (
                            format!("undefined variable `{}`", expr),
                            suggest_undefined_variable(root, bound_names),
                        )
                    }
                    None => (
                        err.to_string().replace("undefined value", "undefined variable"),
                        None,
                    ),
                }
            }
            TemplateErrorKind::UnknownFunction | TemplateErrorKind::UnknownFilter => {
                let msg = err.to_string();
                // MiniJinja reports these as "<name> is unknown"
                let name = err
                    .detail()
                    .and_then(|detail| detail.split_whitespace().next())
                    .map(str::to_string)
                    .or_else(|| extract_quoted_name(&msg));
                let suggestion = name
                    .and_then(|name| suggest_unknown_helper(&name))
                    .or_else(|| Some("Available helpers: normalize, normalise".to_string()));
                (msg, suggestion)
            }
            _ => (err.to_string().replace("syntax error: ", ""), None),
        };

        Self {
            message,
            kind,
            src: NamedSource::new(template_name, template_source.to_string()),
            span,
            suggestion,
        }
    }

    /// Get the error kind
    pub fn kind(&self) -> TemplateErrorKind {
        self.kind
    }
}

fn categorize(err: &minijinja::Error) -> TemplateErrorKind {
    match err.kind() {
        minijinja::ErrorKind::UndefinedError => TemplateErrorKind::UndefinedVariable,
        minijinja::ErrorKind::UnknownFilter => TemplateErrorKind::UnknownFilter,
        minijinja::ErrorKind::UnknownFunction => TemplateErrorKind::UnknownFunction,
        minijinja::ErrorKind::SyntaxError => TemplateErrorKind::SyntaxError,
        _ => TemplateErrorKind::Other,
    }
}

/// Extract the offending expression from MiniJinja's detailed display
///
/// MiniJinja marks the error line with `>`:
/// ```text
///    8 >   name: bench-{{ PR_NUMBR }}
///      i                  ^^^^^^^^ undefined value
/// ```
fn extract_expression_from_display(display: &str) -> Option<String> {
    for line in display.lines() {
        let trimmed = line.trim_start();
        if !(trimmed.contains(" > ") || trimmed.starts_with("> ")) {
            continue;
        }

        if let Some(start) = line.find("{{")
            && let Some(end) = line[start..].find("}}")
        {
            let expr = line[start + 2..start + end].trim();
            let expr = expr.split('|').next().unwrap_or(expr).trim();
            if !expr.is_empty() {
                return Some(expr.to_string());
            }
        }
    }

    None
}

/// Calculate the source span for a given line number
fn calculate_span(source: &str, line_num: usize) -> Option<SourceSpan> {
    let mut offset = 0;

    for (index, line) in source.lines().enumerate() {
        if index + 1 == line_num {
            return Some(SourceSpan::new(offset.into(), line.len()));
        }
        offset += line.len() + 1;
    }

    None
}
