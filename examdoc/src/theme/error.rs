use std::fmt;
use std::ops::Range;

use codespan_reporting::diagnostic::{Diagnostic, Label};

/// A theme file that could not be loaded, with the offending source span
/// when the TOML decoder reports one.
#[derive(Debug, Clone)]
pub struct ThemeError {
    pub message: String,
    pub span: Option<Range<usize>>,
    pub notes: Vec<String>,
}

impl ThemeError {
    pub fn new(message: impl Into<String>) -> Self {
        ThemeError {
            message: message.into(),
            span: None,
            notes: Vec::new(),
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Convert to a codespan-reporting Diagnostic for display.
    pub fn to_diagnostic(&self, file_id: usize) -> Diagnostic<usize> {
        let labels = match &self.span {
            Some(span) => vec![Label::primary(file_id, span.clone())],
            None => Vec::new(),
        };
        Diagnostic::error()
            .with_message(&self.message)
            .with_labels(labels)
            .with_notes(self.notes.clone())
    }
}

impl From<toml::de::Error> for ThemeError {
    fn from(err: toml::de::Error) -> Self {
        ThemeError {
            message: err.message().to_string(),
            span: err.span(),
            notes: Vec::new(),
        }
    }
}

impl fmt::Display for ThemeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid theme: {}", self.message)
    }
}

impl std::error::Error for ThemeError {}
