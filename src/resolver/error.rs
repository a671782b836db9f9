//! Import resolution error types.

use crate::token::Span;

/// The kind of import resolution error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveErrorKind {
    /// The imported module was not found under any search root.
    ModuleNotFound,
    /// A filesystem operation failed.
    IoError,
    /// An imported module failed to parse.
    ParseErrorInModule,
}

/// An error that occurred while resolving `keen` imports.
#[derive(Debug)]
pub struct ResolveError {
    /// A human-readable description of the error.
    message: String,
    /// The location of the `keen` statement, when the error belongs to an
    /// import site.
    span: Option<Span>,
    /// The file containing the `keen` statement (or the module itself for
    /// parse errors inside a module).
    file: String,
    /// The kind of error.
    kind: ResolveErrorKind,
    /// Source text of the module the error occurred in, when the error's
    /// location is in a different file than the entry module.
    source_content: Option<String>,
}

impl ResolveError {
    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the location of the error, if it has one.
    pub fn span(&self) -> Option<Span> {
        self.span
    }

    /// Returns the file the error belongs to.
    pub fn file(&self) -> &str {
        &self.file
    }

    /// Returns the kind of error.
    pub fn kind(&self) -> ResolveErrorKind {
        self.kind
    }

    /// Returns the source text of the module the error occurred in, when
    /// available. Lets diagnostics render spans for files the caller never
    /// read itself.
    pub fn source_content(&self) -> Option<&str> {
        self.source_content.as_deref()
    }

    /// Returns a short, human-readable description of the error kind.
    pub fn short_message(&self) -> &'static str {
        match self.kind {
            ResolveErrorKind::ModuleNotFound => "Module not found",
            ResolveErrorKind::IoError => "I/O error",
            ResolveErrorKind::ParseErrorInModule => "Parse error in module",
        }
    }

    /// Creates a "module not found" error at an import site.
    pub fn module_not_found(module: &str, span: Span, file: impl Into<String>) -> Self {
        ResolveError {
            message: format!(
                "Cannot find module '{}'. Looked in the importing file's directory, 'lib/', and the standard library.",
                module
            ),
            span: Some(span),
            file: file.into(),
            kind: ResolveErrorKind::ModuleNotFound,
            source_content: None,
        }
    }

    /// Creates an I/O error tied to an import site.
    pub fn io_error(
        path: &std::path::Path,
        source: &std::io::Error,
        span: Option<Span>,
        file: impl Into<String>,
    ) -> Self {
        ResolveError {
            message: format!("Failed to read '{}': {}", path.display(), source),
            span,
            file: file.into(),
            kind: ResolveErrorKind::IoError,
            source_content: None,
        }
    }

    /// Creates a wrapper for a parse error inside an imported module,
    /// carrying that module's source so diagnostics can render the span.
    pub fn parse_error_in_module(
        module_file: impl Into<String>,
        error: &crate::parser::ParseError,
        source: String,
    ) -> Self {
        ResolveError {
            message: error.message().to_string(),
            span: Some(error.span()),
            file: module_file.into(),
            kind: ResolveErrorKind::ParseErrorInModule,
            source_content: Some(source),
        }
    }
}

impl std::fmt::Display for ResolveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.span {
            Some(span) => write!(
                f,
                "Import error in '{}' line {}: {}",
                self.file, span.line, self.message
            ),
            None => write!(f, "Import error in '{}': {}", self.file, self.message),
        }
    }
}

impl std::error::Error for ResolveError {}
