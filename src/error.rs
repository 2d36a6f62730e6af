use thiserror::Error;

use crate::span::SourceSpan;

/// What went wrong, independent of where.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum ErrorKind {
    /// Malformed JSON or path text.
    #[error("syntax error")]
    Syntax,
    #[error("not an object")]
    NotAnObject,
    #[error("not an array")]
    NotAnArray,
    #[error("missing property")]
    MissingProperty,
    #[error("index out of range")]
    IndexOutOfRange,
    /// A value did not satisfy a template, during either parsing or serialization.
    #[error("template mismatch")]
    Template,
}

/// The single error type of the library. Errors raised against parsed input carry the
/// [`SourceSpan`] of the offending text; errors raised against programmatically built values
/// have no span and degrade to their bare message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", located(.span, .message))]
pub struct JsonError {
    kind: ErrorKind,
    message: String,
    span: Option<SourceSpan>,
}

fn located(span: &Option<SourceSpan>, message: &str) -> String {
    match span {
        Some(span) => format!("{span} {message}"),
        None => message.to_owned(),
    }
}

impl JsonError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        JsonError {
            kind,
            message: message.into(),
            span: None,
        }
    }

    pub fn syntax(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Syntax, message)
    }

    pub fn template(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Template, message)
    }

    /// Attaches a span unless one is already present; the innermost location wins.
    pub fn with_span(mut self, span: Option<SourceSpan>) -> Self {
        if self.span.is_none() {
            self.span = span;
        }
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn span(&self) -> Option<&SourceSpan> {
        self.span.as_ref()
    }

    /// Renders the underlined source excerpt followed by the positioned message. Without a span
    /// this is just the message.
    pub fn render(&self, color: bool) -> String {
        match &self.span {
            Some(span) => format!("{}\n{} {}", span.underline(color), span, self.message),
            None => self.message.clone(),
        }
    }
}
