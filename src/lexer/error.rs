//! Lexical diagnostics.
//!
//! Lexical problems do not abort compilation: the lexer reports the
//! offending position, skips one unit, and keeps scanning. This module
//! defines the non-fatal [`LexDiagnostic`] those reports are carried in.

use crate::token::Span;

/// The kind of lexical diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexDiagnosticKind {
    /// A character the lexer has no rule for.
    UnknownCharacter,
    /// A string literal that ran into a newline or end of input.
    UnterminatedString,
    /// A char literal that is not exactly one character between quotes.
    InvalidCharLiteral,
    /// An integer literal that does not fit in 64 bits.
    IntegerOverflow,
}

/// A non-fatal diagnostic produced during lexical analysis.
#[derive(Debug, Clone)]
pub struct LexDiagnostic {
    /// A human-readable description of the problem.
    message: String,
    /// Where the problem was found.
    span: Span,
    /// The file being lexed.
    file: String,
    /// The kind of diagnostic, for structured handling.
    kind: LexDiagnosticKind,
}

impl LexDiagnostic {
    /// Creates a new diagnostic.
    pub fn new(
        kind: LexDiagnosticKind,
        message: impl Into<String>,
        span: Span,
        file: impl Into<String>,
    ) -> Self {
        LexDiagnostic {
            message: message.into(),
            span,
            file: file.into(),
            kind,
        }
    }

    /// Returns the diagnostic message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the source location.
    pub fn span(&self) -> Span {
        self.span
    }

    /// Returns the file the diagnostic belongs to.
    pub fn file(&self) -> &str {
        &self.file
    }

    /// Returns the kind of diagnostic.
    pub fn kind(&self) -> LexDiagnosticKind {
        self.kind
    }
}

impl std::fmt::Display for LexDiagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Lexical error in '{}' line {}: {}",
            self.file, self.span.line, self.message
        )
    }
}
