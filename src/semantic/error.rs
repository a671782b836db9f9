//! Semantic analysis error types.
//!
//! Every semantic error carries the filename and line of the offending
//! node; a single error aborts the compilation.

use crate::token::Span;

/// The kind of semantic analysis error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SemanticErrorKind {
    /// A variable was declared twice in the same scope.
    DuplicateVariable,
    /// A function (or method) was declared twice.
    DuplicateFunction,
    /// A class was declared twice.
    DuplicateClass,
    /// A variable was referenced but never declared.
    UndefinedVariable,
    /// A function was called but never declared.
    UndefinedFunction,
    /// A class was referenced but never declared.
    UndefinedClass,
    /// A type annotation names an unknown type.
    UnknownType,
    /// A value's type does not fit where it is used.
    TypeMismatch,
    /// Bad call arguments: wrong count, unknown or repeated named
    /// argument, positional after named, missing without default.
    InvalidArgument,
    /// A member access named a member the class (and its ancestors) does
    /// not have.
    UnknownMember,
    /// A method call named a method the class (and its ancestors) does
    /// not have.
    UnknownMethod,
    /// A construct used outside its valid context (`kan`, `waalid`,
    /// `joog`, `kasoco`, `soo_celi`).
    InvalidContext,
    /// A bad inheritance clause: unknown parent, non-class parent, or a
    /// cycle in the parent chain.
    InheritanceError,
    /// A compiler bug; should never surface from valid analyzer states.
    InternalError,
}

/// An error found during semantic analysis.
#[derive(Debug)]
pub struct SemanticError {
    /// A human-readable description of the error.
    message: String,
    /// The location of the offending node.
    span: Span,
    /// The file the offending node was parsed from.
    file: String,
    /// The kind of error, for structured handling.
    kind: SemanticErrorKind,
}

impl SemanticError {
    /// Creates a new semantic error.
    pub fn new(
        kind: SemanticErrorKind,
        message: impl Into<String>,
        span: Span,
        file: impl Into<String>,
    ) -> Self {
        SemanticError {
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
    pub fn kind(&self) -> SemanticErrorKind {
        self.kind
    }

    /// Returns a short, human-readable description of the error kind.
    pub fn short_message(&self) -> &'static str {
        match self.kind {
            SemanticErrorKind::DuplicateVariable => "Duplicate variable",
            SemanticErrorKind::DuplicateFunction => "Duplicate function",
            SemanticErrorKind::DuplicateClass => "Duplicate class",
            SemanticErrorKind::UndefinedVariable => "Undefined variable",
            SemanticErrorKind::UndefinedFunction => "Undefined function",
            SemanticErrorKind::UndefinedClass => "Undefined class",
            SemanticErrorKind::UnknownType => "Unknown type",
            SemanticErrorKind::TypeMismatch => "Type mismatch",
            SemanticErrorKind::InvalidArgument => "Invalid argument",
            SemanticErrorKind::UnknownMember => "Unknown member",
            SemanticErrorKind::UnknownMethod => "Unknown method",
            SemanticErrorKind::InvalidContext => "Invalid context",
            SemanticErrorKind::InheritanceError => "Inheritance error",
            SemanticErrorKind::InternalError => "Internal compiler error",
        }
    }
}

impl std::fmt::Display for SemanticError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Semantic error in '{}' line {}: {}",
            self.file, self.span.line, self.message
        )
    }
}

impl std::error::Error for SemanticError {}
