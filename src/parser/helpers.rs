//! Token navigation and shared parsing operations.

use super::Parser;
use super::error::{ParseError, ParseErrorKind};
use crate::token::{Span, TokenKind};

impl Parser {
    /// Returns the kind of the current token.
    pub(super) fn current_kind(&self) -> &TokenKind {
        &self.tokens[self.pos].kind
    }

    /// Returns the span of the current token.
    pub(super) fn current_span(&self) -> Span {
        self.tokens[self.pos].span
    }

    /// Returns true if the current token matches `kind`.
    pub(super) fn check(&self, kind: &TokenKind) -> bool {
        self.current_kind() == kind
    }

    /// Returns the kind of the next token, or `Eof` past the end.
    pub(super) fn peek_kind(&self) -> &TokenKind {
        match self.tokens.get(self.pos + 1) {
            Some(token) => &token.kind,
            None => &TokenKind::Eof,
        }
    }

    /// Advances past the current token (never past `Eof`).
    pub(super) fn advance(&mut self) {
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
    }

    /// Returns true when the current token is `Eof`.
    pub(super) fn is_eof(&self) -> bool {
        matches!(self.current_kind(), TokenKind::Eof)
    }

    /// Consumes the current token if it matches `kind`, erroring otherwise.
    pub(super) fn expect(&mut self, kind: &TokenKind) -> Result<Span, ParseError> {
        if self.check(kind) {
            let span = self.current_span();
            self.advance();
            Ok(span)
        } else {
            Err(self.unexpected(&format!("expected '{}'", kind)))
        }
    }

    /// Consumes an identifier token and returns its name and span.
    pub(super) fn expect_identifier(&mut self) -> Result<(String, Span), ParseError> {
        if let TokenKind::Identifier(name) = self.current_kind() {
            let name = name.clone();
            let span = self.current_span();
            self.advance();
            Ok((name, span))
        } else {
            Err(self.unexpected("expected an identifier"))
        }
    }

    /// Consumes a string-literal token and returns its value and span.
    pub(super) fn expect_string(&mut self) -> Result<(String, Span), ParseError> {
        if let TokenKind::Str(value) = self.current_kind() {
            let value = value.clone();
            let span = self.current_span();
            self.advance();
            Ok((value, span))
        } else {
            Err(self.unexpected("expected a string literal"))
        }
    }

    /// Builds an error describing the current token.
    pub(super) fn unexpected(&self, context: &str) -> ParseError {
        let kind = if self.is_eof() {
            ParseErrorKind::UnexpectedEof
        } else {
            ParseErrorKind::UnexpectedToken
        };
        ParseError::new(
            kind,
            format!("{}, found '{}'", context, self.current_kind()),
            self.current_span(),
            self.filename.clone(),
        )
    }
}
