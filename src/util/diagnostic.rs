//! User-facing diagnostics and the end-of-run warning report.
//!
//! Fatal conditions abort the process immediately; everything else is
//! collected into a [`Report`] that travels through the run and is flushed
//! exactly once at the end, so a long matrix build never buries a warning
//! in the middle of compiler output.

use std::fmt;

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Note,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Note => write!(f, "note"),
        }
    }
}

/// A diagnostic message with optional context lines.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Primary message
    pub message: String,
    /// Severity level
    pub severity: Severity,
    /// Additional context lines
    pub context: Vec<String>,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    pub fn error(message: impl Into<String>) -> Self {
        Diagnostic {
            message: message.into(),
            severity: Severity::Error,
            context: Vec::new(),
        }
    }

    /// Create a new warning diagnostic.
    pub fn warning(message: impl Into<String>) -> Self {
        Diagnostic {
            message: message.into(),
            severity: Severity::Warning,
            context: Vec::new(),
        }
    }

    /// Add a context line.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context.push(context.into());
        self
    }

    /// Format the diagnostic for terminal output.
    pub fn format(&self, color: bool) -> String {
        let (prefix, reset) = if color {
            let c = match self.severity {
                Severity::Error => "\x1b[31;1m",
                Severity::Warning => "\x1b[33;1m",
                Severity::Note => "\x1b[36;1m",
            };
            (c, "\x1b[0m")
        } else {
            ("", "")
        };

        let mut out = format!("{}{}{}: {}", prefix, self.severity, reset, self.message);
        for line in &self.context {
            out.push_str("\n  ");
            out.push_str(line);
        }
        out
    }
}

/// Accumulates non-fatal diagnostics across a sequential run.
///
/// Passed explicitly through each stage rather than hidden in global
/// state, and flushed once after the last stage completes.
#[derive(Debug, Default)]
pub struct Report {
    diagnostics: Vec<Diagnostic>,
}

impl Report {
    /// Create an empty report.
    pub fn new() -> Self {
        Report::default()
    }

    /// Record a diagnostic.
    pub fn push(&mut self, diag: Diagnostic) {
        self.diagnostics.push(diag);
    }

    /// Record a plain warning message.
    pub fn warn(&mut self, message: impl Into<String>) {
        self.push(Diagnostic::warning(message));
    }

    /// Whether any warnings were recorded.
    pub fn has_warnings(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Warning)
    }

    /// Number of recorded diagnostics.
    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    /// Whether the report is empty.
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Iterate over recorded diagnostics.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    /// Print all recorded diagnostics to stderr.
    pub fn flush(&self, color: bool) {
        if self.diagnostics.is_empty() {
            return;
        }

        eprintln!();
        for diag in &self.diagnostics {
            eprintln!("{}", diag.format(color));
        }
        let warnings = self
            .diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count();
        if warnings > 0 {
            eprintln!("{} warning(s) emitted", warnings);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_without_color() {
        let diag = Diagnostic::warning("libwebpmux.a not found")
            .with_context("searched build/tmp/webp/mac_Release_arm64");

        let text = diag.format(false);
        assert!(text.starts_with("warning: libwebpmux.a not found"));
        assert!(text.contains("searched build/tmp"));
    }

    #[test]
    fn report_collects_warnings() {
        let mut report = Report::new();
        assert!(report.is_empty());

        report.warn("one");
        report.push(Diagnostic::error("two"));

        assert_eq!(report.len(), 2);
        assert!(report.has_warnings());
    }
}
