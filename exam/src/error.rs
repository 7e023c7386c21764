use std::fmt;
use std::ops::Range;

use codespan_reporting::diagnostic::{Diagnostic, Label};

/// A single field of an exam request that failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Wire name of the field (camelCase).
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        ValidationError {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[derive(Debug)]
pub enum RequestError {
    Io(String),
    Parse {
        message: String,
        span: Option<Range<usize>>,
    },
    Invalid(Vec<ValidationError>),
}

impl RequestError {
    /// Diagnostics for display; parse errors point at their span in `file_id`.
    pub fn to_diagnostics(&self, file_id: usize) -> Vec<Diagnostic<usize>> {
        match self {
            RequestError::Parse {
                message,
                span: Some(span),
            } => vec![
                Diagnostic::error()
                    .with_message(message)
                    .with_labels(vec![Label::primary(file_id, span.clone())]),
            ],
            RequestError::Invalid(errors) => errors
                .iter()
                .map(|e| {
                    Diagnostic::error()
                        .with_message(format!("invalid exam request: {}", e.message))
                        .with_notes(vec![format!("field `{}`", e.field)])
                })
                .collect(),
            other => vec![Diagnostic::error().with_message(other.to_string())],
        }
    }
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestError::Io(msg) => write!(f, "I/O error: {}", msg),
            RequestError::Parse { message, .. } => write!(f, "parse error: {}", message),
            RequestError::Invalid(errors) => {
                write!(f, "invalid exam request: ")?;
                for (i, error) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, "; ")?;
                    }
                    write!(f, "{}", error)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for RequestError {}

impl From<std::io::Error> for RequestError {
    fn from(err: std::io::Error) -> Self {
        RequestError::Io(err.to_string())
    }
}

impl From<toml::de::Error> for RequestError {
    fn from(err: toml::de::Error) -> Self {
        RequestError::Parse {
            message: err.message().to_string(),
            span: err.span(),
        }
    }
}

impl RequestError {
    /// serde_json reports 1-based line/column; convert to a byte span.
    pub(crate) fn from_json(err: serde_json::Error, source: &str) -> Self {
        let start = if err.line() == 0 {
            None
        } else {
            source
                .split_inclusive('\n')
                .take(err.line() - 1)
                .map(str::len)
                .sum::<usize>()
                .checked_add(err.column().saturating_sub(1))
                .map(|offset| offset.min(source.len()))
        };
        RequestError::Parse {
            message: err.to_string(),
            span: start.map(|s| s..s),
        }
    }
}
