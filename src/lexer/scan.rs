//! Token recognition: numbers, strings, chars, identifiers and operators.

use super::Lexer;
use super::error::{LexDiagnostic, LexDiagnosticKind};
use super::fstring::split_fstring_content;
use crate::token::{Span, Token, TokenKind};

/// Decodes the escape sequences `\n \r \t \" \\` in string content.
/// Unrecognized escape pairs are kept verbatim.
fn decode_escapes(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

impl<'a> Lexer<'a> {
    fn span_from(&self, start: usize, line: usize, column: usize) -> Span {
        Span::new(start, self.pos, line, column)
    }

    /// Reads an integer or float literal. Floats require digits on both
    /// sides of the dot; `1..5` lexes as an integer followed by `..`.
    pub(super) fn read_number(&mut self) -> Token {
        let (start, line, column) = (self.pos, self.line, self.column);
        while matches!(self.current_char(), Some(c) if c.is_ascii_digit()) {
            self.advance();
        }

        let is_float = self.current_char() == Some('.')
            && matches!(self.peek_char(), Some(c) if c.is_ascii_digit());
        if is_float {
            self.advance(); // '.'
            while matches!(self.current_char(), Some(c) if c.is_ascii_digit()) {
                self.advance();
            }
            let text = &self.input[start..self.pos];
            let span = self.span_from(start, line, column);
            // The scanned text is digits-dot-digits, which always parses.
            let value: f64 = text.parse().unwrap_or(0.0);
            return Token::new(TokenKind::Float(value), span);
        }

        let text = &self.input[start..self.pos];
        let span = self.span_from(start, line, column);
        match text.parse::<i64>() {
            Ok(value) => Token::new(TokenKind::Int(value), span),
            Err(_) => {
                self.diagnostics.push(LexDiagnostic::new(
                    LexDiagnosticKind::IntegerOverflow,
                    format!("Integer literal '{}' does not fit in 64 bits", text),
                    span,
                    self.filename.clone(),
                ));
                Token::new(TokenKind::Int(i64::MAX), span)
            }
        }
    }

    /// Reads a `"…"` or `"""…"""` string literal.
    pub(super) fn read_string(&mut self) -> Token {
        let (start, line, column) = (self.pos, self.line, self.column);

        if self.starts_with("\"\"\"") {
            self.advance_by(3);
            let content_start = self.pos;
            while !self.is_eof() && !self.starts_with("\"\"\"") {
                self.advance();
            }
            let raw = self.input[content_start..self.pos].to_string();
            if self.is_eof() {
                let span = self.span_from(start, line, column);
                self.diagnostics.push(LexDiagnostic::new(
                    LexDiagnosticKind::UnterminatedString,
                    "Unterminated triple-quoted string".to_string(),
                    span,
                    self.filename.clone(),
                ));
            } else {
                self.advance_by(3);
            }
            let span = self.span_from(start, line, column);
            return Token::new(TokenKind::Str(decode_escapes(&raw)), span);
        }

        self.advance(); // opening quote
        let raw = self.read_single_line_quoted(start, line, column);
        let span = self.span_from(start, line, column);
        Token::new(TokenKind::Str(decode_escapes(&raw)), span)
    }

    /// Scans the body of a single-line quoted literal up to the closing
    /// quote, keeping escape pairs intact. Reports and stops at a newline
    /// or end of input.
    fn read_single_line_quoted(&mut self, start: usize, line: usize, column: usize) -> String {
        let mut raw = String::new();
        loop {
            match self.current_char() {
                None | Some('\n') => {
                    let span = self.span_from(start, line, column);
                    self.diagnostics.push(LexDiagnostic::new(
                        LexDiagnosticKind::UnterminatedString,
                        "Unterminated string literal".to_string(),
                        span,
                        self.filename.clone(),
                    ));
                    break;
                }
                Some('"') => {
                    self.advance();
                    break;
                }
                Some('\\') => {
                    raw.push('\\');
                    self.advance();
                    if let Some(next) = self.current_char() {
                        raw.push(next);
                        self.advance();
                    }
                }
                Some(ch) => {
                    raw.push(ch);
                    self.advance();
                }
            }
        }
        raw
    }

    /// Reads a `$"…"` or `$"""…"""` formatted string and splits its content
    /// into text and raw expression parts.
    pub(super) fn read_fstring(&mut self) -> Token {
        let (start, line, column) = (self.pos, self.line, self.column);
        self.advance(); // '$'

        let raw = if self.starts_with("\"\"\"") {
            self.advance_by(3);
            let content_start = self.pos;
            while !self.is_eof() && !self.starts_with("\"\"\"") {
                self.advance();
            }
            let raw = self.input[content_start..self.pos].to_string();
            if self.is_eof() {
                let span = self.span_from(start, line, column);
                self.diagnostics.push(LexDiagnostic::new(
                    LexDiagnosticKind::UnterminatedString,
                    "Unterminated triple-quoted formatted string".to_string(),
                    span,
                    self.filename.clone(),
                ));
            } else {
                self.advance_by(3);
            }
            raw
        } else {
            self.advance(); // opening quote
            self.read_single_line_quoted(start, line, column)
        };

        let parts = split_fstring_content(&decode_escapes(&raw));
        let span = self.span_from(start, line, column);
        Token::new(TokenKind::FStr(parts), span)
    }

    /// Reads a `'c'` char literal. Anything other than exactly one
    /// character between the quotes is diagnosed and skipped.
    pub(super) fn read_char(&mut self) -> Option<Token> {
        let (start, line, column) = (self.pos, self.line, self.column);
        self.advance(); // opening quote
        if let Some(ch) = self.current_char()
            && ch != '\''
            && self.peek_char() == Some('\'')
        {
            self.advance();
            self.advance();
            let span = self.span_from(start, line, column);
            return Some(Token::new(TokenKind::Char(ch), span));
        }
        let span = self.span_from(start, line, column);
        self.diagnostics.push(LexDiagnostic::new(
            LexDiagnosticKind::InvalidCharLiteral,
            "Char literal must hold exactly one character".to_string(),
            span,
            self.filename.clone(),
        ));
        None
    }

    /// Reads an identifier or keyword.
    pub(super) fn read_identifier(&mut self) -> Token {
        let (start, line, column) = (self.pos, self.line, self.column);
        while matches!(self.current_char(), Some(c) if c.is_ascii_alphanumeric() || c == '_') {
            self.advance();
        }
        let text = &self.input[start..self.pos];
        let span = self.span_from(start, line, column);
        match TokenKind::from_keyword(text) {
            Some(kind) => Token::new(kind, span),
            None => Token::new(TokenKind::Identifier(text.to_string()), span),
        }
    }

    /// Reads a punctuation or operator token, longest match first.
    pub(super) fn read_operator(&mut self) -> Option<Token> {
        const TWO_CHAR: &[(&str, TokenKind)] = &[
            ("==", TokenKind::EqualEqual),
            ("!=", TokenKind::BangEqual),
            (">=", TokenKind::GreaterEqual),
            ("<=", TokenKind::LessEqual),
            ("=>", TokenKind::Arrow),
            ("&&", TokenKind::AndAnd),
            ("||", TokenKind::OrOr),
            ("..", TokenKind::DotDot),
            ("+=", TokenKind::PlusEqual),
            ("-=", TokenKind::MinusEqual),
            ("*=", TokenKind::StarEqual),
            ("/=", TokenKind::SlashEqual),
        ];

        let (start, line, column) = (self.pos, self.line, self.column);
        for (text, kind) in TWO_CHAR {
            if self.starts_with(text) {
                self.advance_by(2);
                return Some(Token::new(kind.clone(), self.span_from(start, line, column)));
            }
        }

        let kind = match self.current_char()? {
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '%' => TokenKind::Percent,
            '?' => TokenKind::Question,
            '=' => TokenKind::Equals,
            ':' => TokenKind::Colon,
            ';' => TokenKind::Semicolon,
            ',' => TokenKind::Comma,
            '(' => TokenKind::LeftParen,
            ')' => TokenKind::RightParen,
            '{' => TokenKind::LeftBrace,
            '}' => TokenKind::RightBrace,
            '[' => TokenKind::LeftBracket,
            ']' => TokenKind::RightBracket,
            '.' => TokenKind::Dot,
            '>' => TokenKind::Greater,
            '<' => TokenKind::Less,
            _ => return None,
        };
        self.advance();
        Some(Token::new(kind, self.span_from(start, line, column)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_escapes() {
        assert_eq!(decode_escapes(r"a\nb"), "a\nb");
        assert_eq!(decode_escapes(r#"\"quoted\""#), "\"quoted\"");
        assert_eq!(decode_escapes(r"back\\slash"), "back\\slash");
        assert_eq!(decode_escapes(r"tab\there"), "tab\there");
    }

    #[test]
    fn test_decode_escapes_keeps_unknown_pairs() {
        assert_eq!(decode_escapes(r"\q"), r"\q");
    }
}
