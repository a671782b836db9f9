//! Expression parsing using Pratt parsing (precedence climbing).
//!
//! Handles the full expression grammar: literals, identifiers, calls with
//! positional and named arguments, method calls, member access, indexing,
//! postfix `cusub` instantiation, the ternary conditional, and binary
//! operators with correct precedence and left-associativity.

use super::Parser;
use super::error::ParseError;
use crate::ast::{
    Arg, BinaryOp, CallExpr, Expr, ExprKind, FStringPart, MethodCallExpr, NewExpr, UnaryOp,
};
use crate::token::{FStringRawPart, Span, TokenKind};

/// Binding powers, weakest to strongest. A higher power binds tighter, so
/// `a + b * c` parses as `a + (b * c)`.
const POWER_OR: u8 = 1;
const POWER_AND: u8 = 2;
const POWER_EQUALITY: u8 = 3;
const POWER_COMPARISON: u8 = 4;
const POWER_ADDITIVE: u8 = 5;
const POWER_MULTIPLICATIVE: u8 = 6;

/// Returns the operator and binding power of a binary operator token.
fn binary_op_of(kind: &TokenKind) -> Option<(BinaryOp, u8)> {
    let entry = match kind {
        TokenKind::OrOr => (BinaryOp::Or, POWER_OR),
        TokenKind::AndAnd => (BinaryOp::And, POWER_AND),
        TokenKind::EqualEqual => (BinaryOp::Eq, POWER_EQUALITY),
        TokenKind::BangEqual => (BinaryOp::Ne, POWER_EQUALITY),
        TokenKind::Greater => (BinaryOp::Gt, POWER_COMPARISON),
        TokenKind::Less => (BinaryOp::Lt, POWER_COMPARISON),
        TokenKind::GreaterEqual => (BinaryOp::Ge, POWER_COMPARISON),
        TokenKind::LessEqual => (BinaryOp::Le, POWER_COMPARISON),
        TokenKind::Plus => (BinaryOp::Add, POWER_ADDITIVE),
        TokenKind::Minus => (BinaryOp::Sub, POWER_ADDITIVE),
        TokenKind::Star => (BinaryOp::Mul, POWER_MULTIPLICATIVE),
        TokenKind::Slash => (BinaryOp::Div, POWER_MULTIPLICATIVE),
        TokenKind::Percent => (BinaryOp::Mod, POWER_MULTIPLICATIVE),
        _ => return None,
    };
    Some(entry)
}

impl Parser {
    fn expr(&self, kind: ExprKind, span: Span) -> Expr {
        Expr::new(kind, span, self.filename.clone())
    }

    /// Parses a full expression, including the ternary conditional, which
    /// binds weaker than every binary operator and is right-associative.
    pub(super) fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        let cond = self.parse_binary(0)?;
        if !self.check(&TokenKind::Question) {
            return Ok(cond);
        }
        self.advance();
        let if_true = self.parse_expr()?;
        self.expect(&TokenKind::Colon)?;
        let if_false = self.parse_expr()?;
        let span = cond.span.to(if_false.span);
        Ok(self.expr(
            ExprKind::Ternary {
                cond: Box::new(cond),
                if_true: Box::new(if_true),
                if_false: Box::new(if_false),
            },
            span,
        ))
    }

    /// Core Pratt loop: parse an operand, then fold in binary operators
    /// whose binding power is at least `min_power`.
    fn parse_binary(&mut self, min_power: u8) -> Result<Expr, ParseError> {
        let mut left = self.parse_unary()?;

        loop {
            let Some((op, power)) = binary_op_of(self.current_kind()) else {
                break;
            };
            if power < min_power {
                break;
            }
            self.advance();
            // `power + 1` makes the operator left-associative: `a - b - c`
            // parses as `(a - b) - c`.
            let right = self.parse_binary(power + 1)?;
            let span = left.span.to(right.span);
            left = self.expr(
                ExprKind::Binary {
                    left: Box::new(left),
                    op,
                    right: Box::new(right),
                },
                span,
            );
        }

        Ok(left)
    }

    /// Parses a prefix `-`. Negation of a numeric literal folds straight
    /// into the literal.
    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        if !self.check(&TokenKind::Minus) {
            return self.parse_postfix();
        }
        let start = self.current_span();
        self.advance();
        let operand = self.parse_unary()?;
        let span = start.to(operand.span);
        let kind = match operand.kind {
            ExprKind::Int(value) => ExprKind::Int(-value),
            ExprKind::Float(value) => ExprKind::Float(-value),
            _ => ExprKind::Unary {
                op: UnaryOp::Neg,
                operand: Box::new(operand),
            },
        };
        Ok(self.expr(kind, span))
    }

    /// Parses a primary expression followed by any number of postfix
    /// forms: member access, method calls, indexing, and `cusub`.
    fn parse_postfix(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_primary()?;

        loop {
            match self.current_kind() {
                TokenKind::Dot => {
                    self.advance();
                    let (name, name_span) = self.parse_member_name()?;
                    if self.check(&TokenKind::LeftParen) {
                        let args = self.parse_args()?;
                        let span = expr.span.to(self.previous_span());
                        expr = self.expr(
                            ExprKind::MethodCall(MethodCallExpr {
                                object: Box::new(expr),
                                method: name,
                                args,
                                ordered: None,
                                resolved_class: None,
                            }),
                            span,
                        );
                    } else {
                        let span = expr.span.to(name_span);
                        expr = self.expr(
                            ExprKind::Member {
                                object: Box::new(expr),
                                member: name,
                            },
                            span,
                        );
                    }
                }
                TokenKind::LeftBracket => {
                    self.advance();
                    let index = self.parse_expr()?;
                    let end = self.expect(&TokenKind::RightBracket)?;
                    let span = expr.span.to(end);
                    expr = self.expr(
                        ExprKind::Index {
                            base: Box::new(expr),
                            index: Box::new(index),
                        },
                        span,
                    );
                }
                TokenKind::Cusub => {
                    let end = self.current_span();
                    self.advance();
                    let span = expr.span.to(end);
                    match expr.kind {
                        ExprKind::Call(call) => {
                            expr = self.expr(
                                ExprKind::New(NewExpr {
                                    class: call.name,
                                    args: call.args,
                                    ordered: None,
                                }),
                                span,
                            );
                        }
                        _ => {
                            return Err(self
                                .unexpected("'cusub' must follow a constructor call"));
                        }
                    }
                }
                _ => break,
            }
        }

        Ok(expr)
    }

    /// A name after `.`: an identifier, or the keywords `gali`/`dhis`,
    /// which double as method names.
    fn parse_member_name(&mut self) -> Result<(String, Span), ParseError> {
        let span = self.current_span();
        let name = match self.current_kind() {
            TokenKind::Identifier(name) => name.clone(),
            TokenKind::Gali => "gali".to_string(),
            TokenKind::Dhis => "dhis".to_string(),
            _ => return Err(self.unexpected("expected a member or method name")),
        };
        self.advance();
        Ok((name, span))
    }

    /// Span of the token just consumed.
    pub(super) fn previous_span(&self) -> Span {
        self.tokens[self.pos.saturating_sub(1)].span
    }

    /// Parses a parenthesized argument list. Named arguments are
    /// `magac=qiime`; mixing is allowed but the analyzer rejects
    /// positional arguments after named ones.
    pub(super) fn parse_args(&mut self) -> Result<Vec<Arg>, ParseError> {
        self.expect(&TokenKind::LeftParen)?;
        let mut args = Vec::new();
        if !self.check(&TokenKind::RightParen) {
            loop {
                args.push(self.parse_arg()?);
                if self.check(&TokenKind::Comma) {
                    self.advance();
                } else {
                    break;
                }
            }
        }
        self.expect(&TokenKind::RightParen)?;
        Ok(args)
    }

    fn parse_arg(&mut self) -> Result<Arg, ParseError> {
        if let TokenKind::Identifier(name) = self.current_kind()
            && matches!(self.peek_kind(), TokenKind::Equals)
        {
            let name = name.clone();
            let span = self.current_span();
            self.advance(); // name
            self.advance(); // '='
            let value = self.parse_expr()?;
            return Ok(Arg::Named { name, value, span });
        }
        Ok(Arg::Positional(self.parse_expr()?))
    }

    /// Parses a primary expression.
    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let span = self.current_span();
        match self.current_kind().clone() {
            TokenKind::Int(value) => {
                self.advance();
                Ok(self.expr(ExprKind::Int(value), span))
            }
            TokenKind::Float(value) => {
                self.advance();
                Ok(self.expr(ExprKind::Float(value), span))
            }
            TokenKind::Str(value) => {
                self.advance();
                Ok(self.expr(ExprKind::Str(value), span))
            }
            TokenKind::Char(value) => {
                self.advance();
                Ok(self.expr(ExprKind::Char(value), span))
            }
            TokenKind::FStr(raw_parts) => {
                self.advance();
                let parts = raw_parts
                    .into_iter()
                    .map(|part| match part {
                        FStringRawPart::Text(text) => FStringPart::Text(text),
                        FStringRawPart::Expr(src) => FStringPart::Raw(src),
                    })
                    .collect();
                Ok(self.expr(ExprKind::FString(parts), span))
            }
            TokenKind::Run | TokenKind::Haa => {
                self.advance();
                Ok(self.expr(ExprKind::Bool(true), span))
            }
            TokenKind::Been | TokenKind::Maya => {
                self.advance();
                Ok(self.expr(ExprKind::Bool(false), span))
            }
            TokenKind::Kan => {
                self.advance();
                Ok(self.expr(ExprKind::SelfRef, span))
            }
            TokenKind::Waalid => {
                self.advance();
                Ok(self.expr(ExprKind::ParentRef, span))
            }
            TokenKind::Identifier(name) => {
                self.advance();
                if self.check(&TokenKind::LeftParen) {
                    let args = self.parse_args()?;
                    let span = span.to(self.previous_span());
                    Ok(self.expr(
                        ExprKind::Call(CallExpr {
                            name,
                            args,
                            ordered: None,
                        }),
                        span,
                    ))
                } else {
                    Ok(self.expr(ExprKind::Identifier(name), span))
                }
            }
            // Type keywords: a call form is a cast builtin, otherwise the
            // name is a first-class type literal.
            TokenKind::Tiro | TokenKind::Eray | TokenKind::Jajab | TokenKind::Miyaa => {
                let name = self.current_kind().to_string();
                self.advance();
                if self.check(&TokenKind::LeftParen) {
                    let args = self.parse_args()?;
                    let span = span.to(self.previous_span());
                    Ok(self.expr(
                        ExprKind::Call(CallExpr {
                            name,
                            args,
                            ordered: None,
                        }),
                        span,
                    ))
                } else {
                    Ok(self.expr(ExprKind::TypeLiteral(name), span))
                }
            }
            TokenKind::Xaraf | TokenKind::Waxbo | TokenKind::Qaamuus => {
                let name = self.current_kind().to_string();
                self.advance();
                Ok(self.expr(ExprKind::TypeLiteral(name), span))
            }
            TokenKind::Nooc => {
                self.advance();
                self.parse_nooc_call(span)
            }
            TokenKind::Dherer => {
                self.advance();
                let args = self.parse_args()?;
                let span = span.to(self.previous_span());
                Ok(self.expr(
                    ExprKind::Call(CallExpr {
                        name: "dherer".to_string(),
                        args,
                        ordered: None,
                    }),
                    span,
                ))
            }
            TokenKind::TixCayiman => {
                self.advance();
                let args = self.parse_args()?;
                let span = span.to(self.previous_span());
                Ok(self.expr(
                    ExprKind::Call(CallExpr {
                        name: "tix_cayiman".to_string(),
                        args,
                        ordered: None,
                    }),
                    span,
                ))
            }
            TokenKind::CCall => {
                self.advance();
                self.expect(&TokenKind::LeftParen)?;
                let (function, _) = self.expect_string()?;
                let mut args = Vec::new();
                while self.check(&TokenKind::Comma) {
                    self.advance();
                    args.push(self.parse_expr()?);
                }
                let end = self.expect(&TokenKind::RightParen)?;
                Ok(self.expr(ExprKind::CCall { function, args }, span.to(end)))
            }
            TokenKind::LeftBracket => {
                self.advance();
                let mut elements = Vec::new();
                if !self.check(&TokenKind::RightBracket) {
                    loop {
                        elements.push(self.parse_expr()?);
                        if self.check(&TokenKind::Comma) {
                            self.advance();
                        } else {
                            break;
                        }
                    }
                }
                let end = self.expect(&TokenKind::RightBracket)?;
                Ok(self.expr(ExprKind::ArrayLit(elements), span.to(end)))
            }
            TokenKind::LeftBrace => {
                self.advance();
                let mut pairs = Vec::new();
                if !self.check(&TokenKind::RightBrace) {
                    loop {
                        let key = self.parse_expr()?;
                        self.expect(&TokenKind::Colon)?;
                        let value = self.parse_expr()?;
                        pairs.push((key, value));
                        if self.check(&TokenKind::Comma) {
                            self.advance();
                        } else {
                            break;
                        }
                    }
                }
                let end = self.expect(&TokenKind::RightBrace)?;
                Ok(self.expr(ExprKind::DictLit(pairs), span.to(end)))
            }
            TokenKind::LeftParen => {
                self.advance();
                let inner = self.parse_expr()?;
                self.expect(&TokenKind::RightParen)?;
                Ok(inner)
            }
            _ => Err(self.unexpected("expected an expression")),
        }
    }

    /// Parses the argument of `nooc(…)`. The special form `nooc(xs[])`
    /// asks for the array's element type rather than the value's type.
    fn parse_nooc_call(&mut self, start: Span) -> Result<Expr, ParseError> {
        self.expect(&TokenKind::LeftParen)?;

        let arg = if let TokenKind::Identifier(name) = self.current_kind() {
            let is_elem_query = matches!(self.peek_kind(), TokenKind::LeftBracket)
                && matches!(self.peek2_kind(), TokenKind::RightBracket);
            if is_elem_query {
                let name = name.clone();
                let query_span = self.current_span();
                self.advance(); // identifier
                self.advance(); // '['
                self.advance(); // ']'
                self.expr(ExprKind::ElemTypeQuery(name), query_span)
            } else {
                self.parse_expr()?
            }
        } else {
            self.parse_expr()?
        };

        let end = self.expect(&TokenKind::RightParen)?;
        Ok(self.expr(
            ExprKind::Call(CallExpr {
                name: "nooc".to_string(),
                args: vec![Arg::Positional(arg)],
                ordered: None,
            }),
            start.to(end),
        ))
    }

    /// Returns the kind two tokens ahead, or `Eof` past the end.
    fn peek2_kind(&self) -> &TokenKind {
        match self.tokens.get(self.pos + 2) {
            Some(token) => &token.kind,
            None => &TokenKind::Eof,
        }
    }
}
