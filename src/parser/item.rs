//! Function and class declaration parsing.

use super::Parser;
use super::error::ParseError;
use crate::ast::{ClassDecl, FunctionDecl, MemberDecl, Param, Type};
use crate::token::TokenKind;

impl Parser {
    /// Parses a function declaration.
    ///
    /// ```text
    /// fn_def → ("hawl" | "shaqo") IDENTIFIER "(" params ")" (":" | "=>") type block
    /// param  → IDENTIFIER ":" type ("=" expr)?
    /// ```
    pub(super) fn parse_function(&mut self) -> Result<FunctionDecl, ParseError> {
        let span = self.current_span();
        if !matches!(self.current_kind(), TokenKind::Hawl | TokenKind::Shaqo) {
            return Err(self.unexpected("expected 'hawl' or 'shaqo'"));
        }
        self.advance();

        let (name, _) = self.expect_identifier()?;
        let params = self.parse_params()?;

        // `=>` is a synonym for `:` in the return type position.
        if self.check(&TokenKind::Colon) || self.check(&TokenKind::Arrow) {
            self.advance();
        } else {
            return Err(self.unexpected("expected ':' or '=>' before the return type"));
        }
        let return_type = self.parse_type()?;
        let body = self.parse_block()?;

        Ok(FunctionDecl {
            name,
            params,
            return_type,
            body,
            docstring: None,
            span,
            file: self.filename.clone(),
        })
    }

    /// Parses a parenthesized parameter list.
    fn parse_params(&mut self) -> Result<Vec<Param>, ParseError> {
        self.expect(&TokenKind::LeftParen)?;
        let mut params = Vec::new();
        if !self.check(&TokenKind::RightParen) {
            loop {
                let (name, span) = self.expect_identifier()?;
                self.expect(&TokenKind::Colon)?;
                let ty = self.parse_type()?;
                let default = if self.check(&TokenKind::Equals) {
                    self.advance();
                    Some(self.parse_expr()?)
                } else {
                    None
                };
                params.push(Param {
                    name,
                    ty,
                    default,
                    span,
                });
                if self.check(&TokenKind::Comma) {
                    self.advance();
                } else {
                    break;
                }
            }
        }
        self.expect(&TokenKind::RightParen)?;
        Ok(params)
    }

    /// Parses a class declaration.
    ///
    /// ```text
    /// class → "koox" IDENTIFIER ("dhaxlaya" IDENTIFIER)? "{" class_item* "}"
    /// class_item → keyd_decl | fn_def | ctor | docstring
    /// ctor → "dhis" "(" params ")" (":" "waxbo")? block
    /// ```
    ///
    /// A leading plain string literal statement becomes the class
    /// docstring, mirroring how function docstrings are attached by the
    /// docstring pass.
    pub(super) fn parse_class(&mut self) -> Result<ClassDecl, ParseError> {
        let span = self.current_span();
        self.expect(&TokenKind::Koox)?;
        let (name, _) = self.expect_identifier()?;

        let parent = if self.check(&TokenKind::Dhaxlaya) {
            self.advance();
            let (parent_name, _) = self.expect_identifier()?;
            Some(parent_name)
        } else {
            None
        };

        self.expect(&TokenKind::LeftBrace)?;
        let mut members = Vec::new();
        let mut methods = Vec::new();
        let mut docstring = None;
        let mut seen_item = false;

        while !self.check(&TokenKind::RightBrace) {
            match self.current_kind() {
                TokenKind::Keyd => {
                    let member_span = self.current_span();
                    let (member_name, ty, init) = self.parse_keyd()?;
                    members.push(MemberDecl {
                        name: member_name,
                        ty,
                        init,
                        span: member_span,
                    });
                    seen_item = true;
                }
                TokenKind::Hawl | TokenKind::Shaqo => {
                    methods.push(self.parse_function()?);
                    seen_item = true;
                }
                TokenKind::Dhis => {
                    methods.push(self.parse_constructor()?);
                    seen_item = true;
                }
                TokenKind::Str(value) => {
                    if seen_item || docstring.is_some() {
                        return Err(
                            self.unexpected("expected a member or method declaration")
                        );
                    }
                    docstring = Some(value.clone());
                    self.advance();
                    self.expect(&TokenKind::Semicolon)?;
                    seen_item = true;
                }
                TokenKind::Eof => return Err(self.unexpected("expected '}'")),
                _ => return Err(self.unexpected("expected a member or method declaration")),
            }
        }
        self.expect(&TokenKind::RightBrace)?;

        Ok(ClassDecl {
            name,
            parent,
            members,
            methods,
            docstring,
            span,
            file: self.filename.clone(),
        })
    }

    /// Parses a constructor: `dhis(params) [: waxbo] { … }`. The return
    /// type is implicitly `waxbo`; when spelled out it must be `waxbo`.
    fn parse_constructor(&mut self) -> Result<FunctionDecl, ParseError> {
        let span = self.current_span();
        self.expect(&TokenKind::Dhis)?;
        let params = self.parse_params()?;
        if self.check(&TokenKind::Colon) || self.check(&TokenKind::Arrow) {
            self.advance();
            self.expect(&TokenKind::Waxbo)?;
        }
        let body = self.parse_block()?;
        Ok(FunctionDecl {
            name: "dhis".to_string(),
            params,
            return_type: Type::Void,
            body,
            docstring: None,
            span,
            file: self.filename.clone(),
        })
    }
}
