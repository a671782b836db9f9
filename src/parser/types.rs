//! Type annotation parsing.

use super::Parser;
use super::error::ParseError;
use crate::ast::{FunctionType, Type};
use crate::token::TokenKind;

impl Parser {
    /// Parses a type specifier.
    ///
    /// ```text
    /// type → primitive | "qaamuus" | "tix" (":" type)?
    ///      | "hawl" "(" (type ("," type)*)? ")" ":" type
    ///      | IDENTIFIER
    /// ```
    ///
    /// An identifier names a user class; whether the class actually exists
    /// is checked by the semantic analyzer, not here.
    pub(super) fn parse_type(&mut self) -> Result<Type, ParseError> {
        match self.current_kind().clone() {
            TokenKind::Tiro => {
                self.advance();
                Ok(Type::Int)
            }
            TokenKind::Jajab => {
                self.advance();
                Ok(Type::Float)
            }
            TokenKind::Eray => {
                self.advance();
                Ok(Type::Str)
            }
            TokenKind::Xaraf => {
                self.advance();
                Ok(Type::Char)
            }
            TokenKind::Miyaa => {
                self.advance();
                Ok(Type::Bool)
            }
            TokenKind::Waxbo => {
                self.advance();
                Ok(Type::Void)
            }
            TokenKind::Qaamuus => {
                self.advance();
                Ok(Type::Dict)
            }
            TokenKind::Tix => {
                self.advance();
                if self.check(&TokenKind::Colon) {
                    self.advance();
                    let elem = self.parse_type()?;
                    Ok(Type::Array(Some(Box::new(elem))))
                } else {
                    Ok(Type::Array(None))
                }
            }
            TokenKind::Hawl => {
                self.advance();
                self.expect(&TokenKind::LeftParen)?;
                let mut params = Vec::new();
                if !self.check(&TokenKind::RightParen) {
                    loop {
                        params.push(self.parse_type()?);
                        if self.check(&TokenKind::Comma) {
                            self.advance();
                        } else {
                            break;
                        }
                    }
                }
                self.expect(&TokenKind::RightParen)?;
                self.expect(&TokenKind::Colon)?;
                let ret = self.parse_type()?;
                Ok(Type::Function(FunctionType {
                    params,
                    ret: Box::new(ret),
                }))
            }
            TokenKind::Identifier(name) => {
                self.advance();
                Ok(Type::Class(name))
            }
            _ => Err(self.unexpected("expected a type")),
        }
    }
}
