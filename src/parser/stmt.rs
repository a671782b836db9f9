//! Statement parsing.

use super::Parser;
use super::error::ParseError;
use crate::ast::{BinaryOp, IfCase, Stmt, StmtKind, VarDecl};
use crate::token::{Span, TokenKind};

impl Parser {
    fn stmt(&self, kind: StmtKind, span: Span) -> Stmt {
        Stmt::new(kind, span, self.filename.clone())
    }

    /// Parses one statement (or a nested function/class declaration; the
    /// grammar allows declarations anywhere a statement is allowed).
    pub(super) fn parse_stmt(&mut self) -> Result<Stmt, ParseError> {
        let span = self.current_span();
        match self.current_kind() {
            TokenKind::Keyd => self.parse_var_decl(),
            TokenKind::Qor => self.parse_print(),
            TokenKind::Hel => self.parse_read(),
            TokenKind::Haddii => self.parse_if(),
            TokenKind::SooCeli => self.parse_return(),
            TokenKind::Inta => self.parse_while(),
            TokenKind::Samay => self.parse_do_while(),
            TokenKind::Soco => self.parse_for(),
            TokenKind::Joog => {
                self.advance();
                self.expect(&TokenKind::Semicolon)?;
                Ok(self.stmt(StmtKind::Break, span))
            }
            TokenKind::Kasoco => {
                self.advance();
                self.expect(&TokenKind::Semicolon)?;
                Ok(self.stmt(StmtKind::Continue, span))
            }
            TokenKind::Keen => {
                self.advance();
                let (module, _) = self.expect_string()?;
                self.expect(&TokenKind::Semicolon)?;
                Ok(self.stmt(StmtKind::Import(module), span))
            }
            TokenKind::CCode => {
                self.advance();
                self.expect(&TokenKind::LeftParen)?;
                let (code, _) = self.expect_string()?;
                self.expect(&TokenKind::RightParen)?;
                self.expect(&TokenKind::Semicolon)?;
                Ok(self.stmt(StmtKind::EmbeddedC(code), span))
            }
            TokenKind::Hawl | TokenKind::Shaqo => {
                let function = self.parse_function()?;
                Ok(self.stmt(StmtKind::Function(function), span))
            }
            TokenKind::Koox => {
                let class = self.parse_class()?;
                Ok(self.stmt(StmtKind::Class(class), span))
            }
            _ => self.parse_expr_led_stmt(),
        }
    }

    /// Parses a `{ … }` block of statements.
    pub(super) fn parse_block(&mut self) -> Result<Vec<Stmt>, ParseError> {
        self.expect(&TokenKind::LeftBrace)?;
        let mut body = Vec::new();
        while !self.check(&TokenKind::RightBrace) {
            if self.is_eof() {
                return Err(self.unexpected("expected '}'"));
            }
            body.push(self.parse_stmt()?);
        }
        self.expect(&TokenKind::RightBrace)?;
        Ok(body)
    }

    /// `keyd : T magac [= qiime];`
    fn parse_var_decl(&mut self) -> Result<Stmt, ParseError> {
        let span = self.current_span();
        let (name, ty, init) = self.parse_keyd()?;
        Ok(self.stmt(StmtKind::VarDecl(VarDecl { name, ty, init }), span))
    }

    /// Shared body of a `keyd` declaration, used for both local variables
    /// and class members.
    pub(super) fn parse_keyd(
        &mut self,
    ) -> Result<(String, crate::ast::Type, Option<crate::ast::Expr>), ParseError> {
        self.expect(&TokenKind::Keyd)?;
        self.expect(&TokenKind::Colon)?;
        let ty = self.parse_type()?;
        let (name, _) = self.expect_identifier()?;
        let init = if self.check(&TokenKind::Equals) {
            self.advance();
            Some(self.parse_expr()?)
        } else {
            None
        };
        self.expect(&TokenKind::Semicolon)?;
        Ok((name, ty, init))
    }

    /// `qor(e, …);`
    fn parse_print(&mut self) -> Result<Stmt, ParseError> {
        let span = self.current_span();
        self.expect(&TokenKind::Qor)?;
        self.expect(&TokenKind::LeftParen)?;
        let mut exprs = Vec::new();
        if !self.check(&TokenKind::RightParen) {
            loop {
                exprs.push(self.parse_expr()?);
                if self.check(&TokenKind::Comma) {
                    self.advance();
                } else {
                    break;
                }
            }
        }
        self.expect(&TokenKind::RightParen)?;
        self.expect(&TokenKind::Semicolon)?;
        Ok(self.stmt(StmtKind::Print(exprs), span))
    }

    /// `hel(magac);`
    fn parse_read(&mut self) -> Result<Stmt, ParseError> {
        let span = self.current_span();
        self.expect(&TokenKind::Hel)?;
        self.expect(&TokenKind::LeftParen)?;
        let (name, _) = self.expect_identifier()?;
        self.expect(&TokenKind::RightParen)?;
        self.expect(&TokenKind::Semicolon)?;
        Ok(self.stmt(StmtKind::Read(name), span))
    }

    /// `haddii (e) { … } ama_haddii (e) { … } … haddii_kale { … }`
    fn parse_if(&mut self) -> Result<Stmt, ParseError> {
        let span = self.current_span();
        self.expect(&TokenKind::Haddii)?;
        let mut cases = Vec::new();

        self.expect(&TokenKind::LeftParen)?;
        let cond = self.parse_expr()?;
        self.expect(&TokenKind::RightParen)?;
        let body = self.parse_block()?;
        cases.push(IfCase { cond, body });

        while self.check(&TokenKind::AmaHaddii) {
            self.advance();
            self.expect(&TokenKind::LeftParen)?;
            let cond = self.parse_expr()?;
            self.expect(&TokenKind::RightParen)?;
            let body = self.parse_block()?;
            cases.push(IfCase { cond, body });
        }

        let else_body = if self.check(&TokenKind::HaddiiKale) {
            self.advance();
            Some(self.parse_block()?)
        } else {
            None
        };

        Ok(self.stmt(StmtKind::If { cases, else_body }, span))
    }

    /// `soo_celi [e];`
    fn parse_return(&mut self) -> Result<Stmt, ParseError> {
        let span = self.current_span();
        self.expect(&TokenKind::SooCeli)?;
        let value = if self.check(&TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.expect(&TokenKind::Semicolon)?;
        Ok(self.stmt(StmtKind::Return(value), span))
    }

    /// `inta ay (e) { … }`
    fn parse_while(&mut self) -> Result<Stmt, ParseError> {
        let span = self.current_span();
        self.expect(&TokenKind::Inta)?;
        self.expect(&TokenKind::Ay)?;
        self.expect(&TokenKind::LeftParen)?;
        let cond = self.parse_expr()?;
        self.expect(&TokenKind::RightParen)?;
        let body = self.parse_block()?;
        Ok(self.stmt(StmtKind::While { cond, body }, span))
    }

    /// `samay { … } inta ay (e);`
    fn parse_do_while(&mut self) -> Result<Stmt, ParseError> {
        let span = self.current_span();
        self.expect(&TokenKind::Samay)?;
        let body = self.parse_block()?;
        self.expect(&TokenKind::Inta)?;
        self.expect(&TokenKind::Ay)?;
        self.expect(&TokenKind::LeftParen)?;
        let cond = self.parse_expr()?;
        self.expect(&TokenKind::RightParen)?;
        self.expect(&TokenKind::Semicolon)?;
        Ok(self.stmt(StmtKind::DoWhile { body, cond }, span))
    }

    /// Either loop form:
    /// `soco i laga bilaabo a .. b { … }` or
    /// `soco x kasta laga helo e { … }`.
    fn parse_for(&mut self) -> Result<Stmt, ParseError> {
        let span = self.current_span();
        self.expect(&TokenKind::Soco)?;
        let (var, _) = self.expect_identifier()?;

        match self.current_kind() {
            TokenKind::Laga => {
                self.advance();
                self.expect(&TokenKind::Bilaabo)?;
                let start = self.parse_expr()?;
                self.expect(&TokenKind::DotDot)?;
                let end = self.parse_expr()?;
                let body = self.parse_block()?;
                Ok(self.stmt(
                    StmtKind::ForRange {
                        var,
                        start,
                        end,
                        body,
                    },
                    span,
                ))
            }
            TokenKind::Kasta => {
                self.advance();
                self.expect(&TokenKind::Laga)?;
                self.expect(&TokenKind::Helo)?;
                let iterable = self.parse_expr()?;
                let body = self.parse_block()?;
                Ok(self.stmt(
                    StmtKind::ForEach {
                        var,
                        iterable,
                        body,
                    },
                    span,
                ))
            }
            _ => Err(self.unexpected("expected 'laga bilaabo' or 'kasta laga helo'")),
        }
    }

    /// An expression-led statement: an assignment, compound assignment, or
    /// a bare expression statement.
    fn parse_expr_led_stmt(&mut self) -> Result<Stmt, ParseError> {
        let span = self.current_span();
        let expr = self.parse_expr()?;

        let compound_op = match self.current_kind() {
            TokenKind::PlusEqual => Some(BinaryOp::Add),
            TokenKind::MinusEqual => Some(BinaryOp::Sub),
            TokenKind::StarEqual => Some(BinaryOp::Mul),
            TokenKind::SlashEqual => Some(BinaryOp::Div),
            _ => None,
        };
        if let Some(op) = compound_op {
            self.advance();
            let value = self.parse_expr()?;
            self.expect(&TokenKind::Semicolon)?;
            return Ok(self.stmt(
                StmtKind::CompoundAssign {
                    target: expr,
                    op,
                    value,
                },
                span,
            ));
        }

        if self.check(&TokenKind::Equals) {
            self.advance();
            let value = self.parse_expr()?;
            self.expect(&TokenKind::Semicolon)?;
            return Ok(self.stmt(
                StmtKind::Assign {
                    target: expr,
                    value,
                },
                span,
            ));
        }

        self.expect(&TokenKind::Semicolon)?;
        Ok(self.stmt(StmtKind::Expr(expr), span))
    }
}
