//! Parse error types.

use crate::token::Span;

/// The kind of parse error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// A token that does not fit the grammar at this position.
    UnexpectedToken,
    /// The token stream ended inside an unfinished construct.
    UnexpectedEof,
}

/// A syntax error. Parsing aborts on the first one.
#[derive(Debug)]
pub struct ParseError {
    /// A human-readable description of the error.
    message: String,
    /// The offending token's location.
    span: Span,
    /// The file being parsed.
    file: String,
    /// The kind of error, for structured handling.
    kind: ParseErrorKind,
}

impl ParseError {
    /// Creates a new parse error.
    pub fn new(
        kind: ParseErrorKind,
        message: impl Into<String>,
        span: Span,
        file: impl Into<String>,
    ) -> Self {
        ParseError {
            message: message.into(),
            span,
            file: file.into(),
            kind,
        }
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the offending location.
    pub fn span(&self) -> Span {
        self.span
    }

    /// Returns the file being parsed.
    pub fn file(&self) -> &str {
        &self.file
    }

    /// Returns the kind of error.
    pub fn kind(&self) -> ParseErrorKind {
        self.kind
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Syntax error in '{}' line {}: {}",
            self.file, self.span.line, self.message
        )
    }
}

impl std::error::Error for ParseError {}
