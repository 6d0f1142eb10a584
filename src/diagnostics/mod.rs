use std::fmt;
use std::io::IsTerminal;
use std::path::PathBuf;

use thiserror::Error;

use crate::line_index::LineIndex;
use crate::visit::channel::ChannelError;

#[derive(Debug, Error)]
pub enum PulsarError {
    #[error("I/O error: {msg}")]
    Io { msg: String, path: PathBuf },

    #[error("Tree error: {msg}")]
    Tree { msg: String, path: PathBuf },

    #[error("Config error: {msg}")]
    Config { msg: String, path: PathBuf },

    #[error("{count} error(s) found")]
    Check { count: usize },

    #[error(transparent)]
    Channel(#[from] ChannelError),
}

impl PulsarError {
    pub fn io(err: std::io::Error, path: PathBuf) -> Self {
        Self::Io { msg: format!("{}: {err}", path.display()), path }
    }

    pub fn tree(msg: impl Into<String>, path: PathBuf) -> Self {
        Self::Tree { msg: msg.into(), path }
    }

    pub fn config(msg: impl Into<String>, path: PathBuf) -> Self {
        Self::Config { msg: msg.into(), path }
    }
}

/// A secondary location attached to a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub message: String,
    pub line: u32,
}

/// A problem a pass found in the tree, located by source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub message: String,
    pub line: u32,
    pub note: Option<Note>,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>, line: u32) -> Self {
        Self { message: message.into(), line, note: None }
    }

    pub fn with_note(mut self, message: impl Into<String>, line: u32) -> Self {
        self.note = Some(Note { message: message.into(), line });
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error[line {}]: {}", self.line, self.message)?;
        if let Some(note) = &self.note {
            write!(f, "\n  note[line {}]: {}", note.line, note.message)?;
        }
        Ok(())
    }
}

/// Render a diagnostic with ariadne against the source text it came from.
///
/// Returns `None` when the diagnostic's line is not in `source`; callers fall
/// back to the plain `Display` form.
pub fn render_to_string(source: &str, filename: &str, diag: &Diagnostic, color: bool) -> Option<String> {
    use ariadne::{Config, IndexType, Label, Report, ReportKind, Source};

    let index = LineIndex::new(source);
    let span = index.line_range(diag.line)?;

    let mut report = Report::build(ReportKind::Error, (), span.start)
        .with_config(Config::default().with_color(color).with_index_type(IndexType::Byte))
        .with_message(format!("{} (in {filename})", diag.message))
        .with_label(Label::new(span).with_message(&diag.message));

    if let Some(note) = &diag.note {
        match index.line_range(note.line) {
            Some(note_span) => {
                report = report.with_label(Label::new(note_span).with_message(&note.message));
            }
            None => {
                report = report.with_note(format!("line {}: {}", note.line, note.message));
            }
        }
    }

    let mut out = Vec::new();
    report.finish().write(Source::from(source), &mut out).ok()?;
    String::from_utf8(out).ok()
}

/// Print diagnostics to stderr, using ariadne when the source text is known.
pub fn render_diagnostics(source: Option<&str>, filename: &str, diags: &[Diagnostic]) {
    let color = std::io::stderr().is_terminal();
    for diag in diags {
        let rendered = source.and_then(|src| render_to_string(src, filename, diag, color));
        match rendered {
            Some(report) => eprint!("{report}"),
            None => eprintln!("{diag}"),
        }
    }
}
