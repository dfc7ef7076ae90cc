use ariadne::{Color, Label, Report, ReportKind, Source};
use std::fmt;

use crate::lexer::LexError;
use crate::parser::ParseError;

/// A syntax error with source location.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Byte range the error points at.
    pub span: std::ops::Range<usize>,
    /// Headline message.
    pub message: String,
    /// Text attached to the highlighted span; defaults to the message.
    pub label: Option<String>,
    /// Extra line printed under the report.
    pub note: Option<String>,
}

impl Diagnostic {
    /// Create an error diagnostic.
    pub fn error(span: std::ops::Range<usize>, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            label: None,
            note: None,
        }
    }

    /// Attach a label to the highlighted span.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Attach a note.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error: {}", self.message)
    }
}

impl From<LexError> for Diagnostic {
    fn from(e: LexError) -> Self {
        Diagnostic::error(e.span, e.message).with_label("no token starts here")
    }
}

impl From<ParseError> for Diagnostic {
    fn from(e: ParseError) -> Self {
        let mut diag = Diagnostic::error(e.span, e.message);
        if !e.expected.is_empty() {
            diag = diag.with_label(format!("expected {}", e.expected.join(", ")));
        }
        if !e.context.is_empty() {
            diag = diag.with_note(format!("while parsing {}", e.context.join(", in ")));
        }
        diag
    }
}

/// 1-based line and column of a byte offset.
pub fn line_col(source: &str, offset: usize) -> (usize, usize) {
    let offset = offset.min(source.len());
    let before = &source.as_bytes()[..offset];
    let line = before.iter().filter(|&&b| b == b'\n').count() + 1;
    let line_start = before
        .iter()
        .rposition(|&b| b == b'\n')
        .map_or(0, |i| i + 1);
    (line, offset - line_start + 1)
}

/// Render diagnostics using ariadne for pretty terminal output.
pub fn render_diagnostics(source: &str, filename: &str, diagnostics: &[Diagnostic]) -> String {
    let mut output = Vec::new();

    for diag in diagnostics {
        let span = (filename, diag.span.clone());
        let mut report = Report::build(ReportKind::Error, span).with_message(&diag.message);

        let label_text = diag.label.as_deref().unwrap_or(&diag.message);
        report = report.with_label(
            Label::new((filename, diag.span.clone()))
                .with_message(label_text)
                .with_color(Color::Red),
        );
        if let Some(note) = &diag.note {
            report = report.with_note(note);
        }

        report
            .finish()
            .write((filename, Source::from(source)), &mut output)
            .ok();
    }

    String::from_utf8(output).unwrap_or_default()
}
