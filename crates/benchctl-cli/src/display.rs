//! Display formatting for CLI output
//!
//! One line per reconciled resource, then a summary line. Output goes to
//! any writer so it can be captured in tests.

use benchctl_kube::{OperationSummary, ResourceAction, ResourceOutcome};
use console::style;
use std::io::{self, Write};

/// Format count with proper pluralization
pub fn pluralize(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{} {}", count, singular)
    } else {
        format!("{} {}", count, plural)
    }
}

/// Renders reconcile outcomes
pub struct OutcomeDisplay {
    writer: Box<dyn Write>,
}

impl Default for OutcomeDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl OutcomeDisplay {
    /// Display writing to stdout
    pub fn new() -> Self {
        Self {
            writer: Box::new(io::stdout()),
        }
    }

    pub fn with_writer<W: Write + 'static>(writer: W) -> Self {
        Self {
            writer: Box::new(writer),
        }
    }

    /// Write every outcome in processing order, then the summary
    pub fn render(&mut self, summary: &OperationSummary) -> io::Result<()> {
        for outcome in &summary.outcomes {
            self.render_outcome(outcome)?;
        }

        if summary.total() > 0 {
            writeln!(self.writer)?;
        }

        let icon = if summary.is_success() {
            style("✓").green().bold()
        } else {
            style("✗").red().bold()
        };
        writeln!(self.writer, "{} {}", icon, summary.summary())?;
        self.writer.flush()
    }

    fn render_outcome(&mut self, outcome: &ResourceOutcome) -> io::Result<()> {
        let name = outcome.display_name();

        match &outcome.result {
            Ok(action) => {
                let verb = match action {
                    ResourceAction::Created => style(action.to_string()).green(),
                    ResourceAction::Updated => style(action.to_string()).cyan(),
                    ResourceAction::Deleted => style(action.to_string()).yellow(),
                };
                writeln!(
                    self.writer,
                    "  {} {} {} {}",
                    style("✓").green(),
                    name,
                    verb,
                    style(format!("({})", outcome.file)).dim()
                )
            }
            Err(e) => {
                writeln!(
                    self.writer,
                    "  {} {} {}",
                    style("✗").red(),
                    name,
                    style(format!("({})", outcome.file)).dim()
                )?;
                writeln!(self.writer, "      {}", style(e).red())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use benchctl_kube::{KubeError, ParsedResource, Payload};
    use std::sync::{Arc, Mutex};

    /// A thread-safe buffer for testing
    #[derive(Clone, Default)]
    struct TestBuffer {
        inner: Arc<Mutex<Vec<u8>>>,
    }

    impl TestBuffer {
        fn contents(&self) -> String {
            let guard = self.inner.lock().unwrap();
            String::from_utf8(guard.clone()).unwrap()
        }
    }

    impl Write for TestBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.inner.lock().unwrap().write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn resource(kind: &str, name: &str, namespace: Option<&str>) -> ParsedResource {
        ParsedResource {
            kind: kind.to_string(),
            api_version: "v1".to_string(),
            namespace: namespace.map(str::to_string),
            name: name.to_string(),
            payload: Payload::Unsupported(serde_json::Value::Null),
        }
    }

    fn render(summary: &OperationSummary) -> String {
        console::set_colors_enabled(false);
        let buffer = TestBuffer::default();
        OutcomeDisplay::with_writer(buffer.clone())
            .render(summary)
            .unwrap();
        buffer.contents()
    }

    #[test]
    fn test_pluralize() {
        assert_eq!(pluralize(1, "file", "files"), "1 file");
        assert_eq!(pluralize(0, "file", "files"), "0 files");
        assert_eq!(pluralize(3, "resource", "resources"), "3 resources");
    }

    #[test]
    fn test_render_outcomes_in_order() {
        let mut summary = OperationSummary::default();
        summary.push(ResourceOutcome::new(
            "ns.yaml",
            &resource("Namespace", "bench-42", None),
            None,
            Ok(ResourceAction::Created),
        ));
        summary.push(ResourceOutcome::new(
            "app.yaml",
            &resource("CronJob", "cleanup", Some("bench-42")),
            Some("bench-42"),
            Err(KubeError::UnsupportedKind {
                kind: "CronJob".to_string(),
            }),
        ));

        let out = render(&summary);
        let ns = out.find("Namespace/bench-42 created (ns.yaml)").unwrap();
        let cron = out.find("bench-42/CronJob/cleanup (app.yaml)").unwrap();
        assert!(ns < cron);
        assert!(out.contains("unsupported resource kind 'CronJob'"));
        assert!(out.contains("✗ 1 created, 1 failed"));
    }

    #[test]
    fn test_render_empty_summary() {
        let out = render(&OperationSummary::default());
        assert_eq!(out, "✓ No resources processed\n");
    }
}
