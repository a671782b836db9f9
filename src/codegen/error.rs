//! Code generation error types.
//!
//! After a successful semantic pass these should be unreachable; when one
//! does surface it is reported as a fatal internal compiler error, except
//! for the few constructs (like a stray `tix_cayiman`) that only the
//! generator can see in context.

use crate::token::Span;

/// The kind of code generation error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodegenErrorKind {
    /// A node kind the generator has no lowering for in this position.
    UnhandledNode,
    /// A construct used somewhere it cannot be lowered (e.g.
    /// `tix_cayiman` outside a declaration or assignment).
    InvalidConstruct,
    /// An invariant the semantic pass should have established was broken.
    Internal,
}

/// An error raised while emitting C.
#[derive(Debug)]
pub struct CodegenError {
    /// A human-readable description of the error.
    message: String,
    /// The offending node's location.
    span: Span,
    /// The file the offending node was parsed from.
    file: String,
    /// The kind of error.
    kind: CodegenErrorKind,
}

impl CodegenError {
    /// Creates a new codegen error.
    pub fn new(
        kind: CodegenErrorKind,
        message: impl Into<String>,
        span: Span,
        file: impl Into<String>,
    ) -> Self {
        CodegenError {
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

    /// Returns the file the error belongs to.
    pub fn file(&self) -> &str {
        &self.file
    }

    /// Returns the kind of error.
    pub fn kind(&self) -> CodegenErrorKind {
        self.kind
    }
}

impl std::fmt::Display for CodegenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            CodegenErrorKind::InvalidConstruct => write!(
                f,
                "Error in '{}' line {}: {}",
                self.file, self.span.line, self.message
            ),
            _ => write!(
                f,
                "Internal compiler error in '{}' line {}: {}",
                self.file, self.span.line, self.message
            ),
        }
    }
}

impl std::error::Error for CodegenError {}
