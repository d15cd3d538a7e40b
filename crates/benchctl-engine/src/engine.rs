//! Template engine based on MiniJinja

use benchctl_core::{Bindings, ManifestFile, RenderedDocument};
use minijinja::{AutoEscape, Environment, UndefinedBehavior, Value};
use tracing::debug;

use crate::error::{EngineError, Result, TemplateError};
use crate::functions::{self, NORMALIZE_ALIASES};

/// Template engine builder
pub struct EngineBuilder {
    strict_mode: bool,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self { strict_mode: true }
    }

    /// Set strict mode (fail on unbound variables)
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict_mode = strict;
        self
    }

    /// Build the engine
    pub fn build(self) -> Engine {
        Engine::new(self.strict_mode)
    }
}

/// The manifest renderer
///
/// Rendering is a pure function of the template text and the bindings.
pub struct Engine {
    strict_mode: bool,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Engine {
    /// Create a new engine
    pub fn new(strict_mode: bool) -> Self {
        Self { strict_mode }
    }

    /// Create a builder
    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    /// Create a configured MiniJinja environment
    fn create_environment(&self) -> Environment<'static> {
        let mut env = Environment::new();

        if self.strict_mode {
            env.set_undefined_behavior(UndefinedBehavior::Strict);
        } else {
            env.set_undefined_behavior(UndefinedBehavior::Lenient);
        }

        // Manifests are YAML; rendered values must be emitted verbatim
        env.set_auto_escape_callback(|_| AutoEscape::None);
        env.set_keep_trailing_newline(true);

        let strict = self.strict_mode;
        for name in NORMALIZE_ALIASES {
            env.add_function(*name, move |value: Value| functions::normalize_value(value, strict));
            env.add_filter(*name, move |value: Value| functions::normalize_value(value, strict));
        }

        env
    }

    /// Render a single template string
    pub fn render_str(
        &self,
        template_name: &str,
        template: &str,
        bindings: &Bindings,
    ) -> std::result::Result<String, TemplateError> {
        let mut env = self.create_environment();
        let bound_names = bindings.names();

        env.add_template_owned(template_name.to_string(), template.to_string())
            .map_err(|e| TemplateError::from_minijinja(e, template_name, template, &bound_names))?;

        let tmpl = env
            .get_template(template_name)
            .map_err(|e| TemplateError::from_minijinja(e, template_name, template, &bound_names))?;

        tmpl.render(bindings)
            .map_err(|e| TemplateError::from_minijinja(e, template_name, template, &bound_names))
    }

    /// Render one manifest file
    pub fn render(&self, file: &ManifestFile, bindings: &Bindings) -> Result<RenderedDocument> {
        let name = file.name();
        let content = self
            .render_str(&name, &file.raw_template, bindings)
            .map_err(|source| EngineError::Template {
                file: name.clone(),
                source,
            })?;

        debug!(file = %name, bytes = content.len(), "rendered manifest");
        Ok(RenderedDocument::new(name, content))
    }

    /// Render every manifest file, stopping at the first failure
    pub fn render_all(
        &self,
        files: &[ManifestFile],
        bindings: &Bindings,
    ) -> Result<Vec<RenderedDocument>> {
        files.iter().map(|file| self.render(file, bindings)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TemplateErrorKind;

    fn bindings() -> Bindings {
        Bindings::new()
            .with("PR_NUMBER", "42")
            .with("RELEASE", "v2.13.0")
    }

    #[test]
    fn test_render_substitutes_bindings() {
        let engine = Engine::default();
        let out = engine
            .render_str("ns.yaml", "name: prombench-{{ PR_NUMBER }}", &bindings())
            .unwrap();
        assert_eq!(out, "name: prombench-42");
    }

    #[test]
    fn test_render_normalize_function_and_filter() {
        let engine = Engine::default();
        let template = "a: {{ normalize(RELEASE) }}\nb: {{ RELEASE | normalize }}\nc: {{ normalise(RELEASE) }}";
        let out = engine.render_str("t.yaml", template, &bindings()).unwrap();
        assert_eq!(out, "a: v2-13-0\nb: v2-13-0\nc: v2-13-0");
    }

    #[test]
    fn test_render_keeps_yaml_verbatim() {
        let engine = Engine::default();
        let template = "kind: ConfigMap\n---\nkind: Secret\n";
        let out = engine.render_str("t.yaml", template, &Bindings::new()).unwrap();
        assert_eq!(out, template);
    }

    #[test]
    fn test_values_are_not_escaped() {
        let engine = Engine::default();
        let vars = Bindings::new().with("ARGS", "--query=\"up\" & <b>");
        let out = engine.render_str("t.yaml", "{{ ARGS }}", &vars).unwrap();
        assert_eq!(out, "--query=\"up\" & <b>");
    }

    #[test]
    fn test_unbound_variable_fails_in_strict_mode() {
        let engine = Engine::default();
        let err = engine
            .render_str("ns.yaml", "name: bench-{{ PR_NUMBR }}", &bindings())
            .unwrap_err();

        assert_eq!(err.kind(), TemplateErrorKind::UndefinedVariable);
        assert!(err.suggestion.as_deref().unwrap_or_default().contains("PR_NUMBER"));
    }

    #[test]
    fn test_unbound_variable_inside_helper_fails() {
        let engine = Engine::default();
        let result = engine.render_str("t.yaml", "{{ normalize(MISSING) }}", &bindings());
        assert!(result.is_err());
    }

    #[test]
    fn test_unbound_variable_renders_empty_in_lenient_mode() {
        let engine = Engine::builder().strict(false).build();
        let out = engine
            .render_str("t.yaml", "name: bench-{{ MISSING }}", &bindings())
            .unwrap();
        assert_eq!(out, "name: bench-");
    }

    #[test]
    fn test_syntax_error() {
        let engine = Engine::default();
        let err = engine
            .render_str("t.yaml", "name: {{ PR_NUMBER ", &bindings())
            .unwrap_err();
        assert_eq!(err.kind(), TemplateErrorKind::SyntaxError);
    }

    #[test]
    fn test_unknown_function_suggests_normalize() {
        let engine = Engine::default();
        let err = engine
            .render_str("t.yaml", "{{ normalze(RELEASE) }}", &bindings())
            .unwrap_err();
        assert_eq!(err.kind(), TemplateErrorKind::UnknownFunction);
        assert!(err.suggestion.as_deref().unwrap_or_default().contains("normalize"));
    }

    #[test]
    fn test_render_all_stops_at_first_failure() {
        let engine = Engine::default();
        let files = vec![
            ManifestFile::new("ok.yaml", "name: {{ PR_NUMBER }}"),
            ManifestFile::new("bad.yaml", "name: {{ NOPE }}"),
        ];

        let err = engine.render_all(&files, &bindings()).unwrap_err();
        match err {
            EngineError::Template { file, .. } => assert_eq!(file, "bad.yaml"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_render_all_preserves_order() {
        let engine = Engine::default();
        let files = vec![
            ManifestFile::new("b.yaml", "b: {{ PR_NUMBER }}"),
            ManifestFile::new("a.yaml", "a: {{ PR_NUMBER }}"),
        ];

        let docs = engine.render_all(&files, &bindings()).unwrap();
        let names: Vec<_> = docs.iter().map(|d| d.source_file.as_str()).collect();
        assert_eq!(names, vec!["b.yaml", "a.yaml"]);
        assert_eq!(docs[0].content, "b: 42");
    }
}
