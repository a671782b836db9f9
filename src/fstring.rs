//! Formatted-string lowering.
//!
//! The lexer leaves the `{…}` holes of a formatted string as raw source
//! substrings. This pass re-parses every hole through the regular parser
//! (snippet followed by `;`), coalesces adjacent text, and left-folds the
//! parts with the string-concatenation operator so that downstream passes
//! see one ordinary expression tree. The literal itself stays an f-string
//! node, which keeps its static type `eray` no matter what the first part
//! is.
//!
//! Running this before semantic analysis means the analyzer and the
//! generator never need a second expression evaluator.

use crate::ast::{
    Arg, BinaryOp, Expr, ExprKind, FStringPart, FunctionDecl, Stmt, StmtKind,
};
use crate::lexer::Lexer;
use crate::parser::{ParseError, ParseErrorKind, Parser};
use crate::token::Span;

/// Resolves every formatted-string literal in the translation unit.
///
/// # Errors
///
/// Returns a [`ParseError`] when a `{…}` hole does not parse as an
/// expression.
pub fn resolve(ast: &mut [Stmt]) -> Result<(), ParseError> {
    for stmt in ast {
        resolve_stmt(stmt)?;
    }
    Ok(())
}

fn resolve_stmt(stmt: &mut Stmt) -> Result<(), ParseError> {
    match &mut stmt.kind {
        StmtKind::VarDecl(decl) => {
            if let Some(init) = &mut decl.init {
                resolve_expr(init)?;
            }
        }
        StmtKind::Assign { target, value } => {
            resolve_expr(target)?;
            resolve_expr(value)?;
        }
        StmtKind::CompoundAssign { target, value, .. } => {
            resolve_expr(target)?;
            resolve_expr(value)?;
        }
        StmtKind::If { cases, else_body } => {
            for case in cases {
                resolve_expr(&mut case.cond)?;
                resolve(&mut case.body)?;
            }
            if let Some(body) = else_body {
                resolve(body)?;
            }
        }
        StmtKind::While { cond, body } | StmtKind::DoWhile { body, cond } => {
            resolve_expr(cond)?;
            resolve(body)?;
        }
        StmtKind::ForRange {
            start, end, body, ..
        } => {
            resolve_expr(start)?;
            resolve_expr(end)?;
            resolve(body)?;
        }
        StmtKind::ForEach { iterable, body, .. } => {
            resolve_expr(iterable)?;
            resolve(body)?;
        }
        StmtKind::Return(Some(value)) => resolve_expr(value)?,
        StmtKind::Print(exprs) => {
            for expr in exprs {
                resolve_expr(expr)?;
            }
        }
        StmtKind::Expr(expr) => resolve_expr(expr)?,
        StmtKind::Function(func) => resolve_function(func)?,
        StmtKind::Class(class) => {
            for member in &mut class.members {
                if let Some(init) = &mut member.init {
                    resolve_expr(init)?;
                }
            }
            for method in &mut class.methods {
                resolve_function(method)?;
            }
        }
        StmtKind::Return(None)
        | StmtKind::Break
        | StmtKind::Continue
        | StmtKind::Read(_)
        | StmtKind::Import(_)
        | StmtKind::EmbeddedC(_) => {}
    }
    Ok(())
}

fn resolve_function(func: &mut FunctionDecl) -> Result<(), ParseError> {
    for param in &mut func.params {
        if let Some(default) = &mut param.default {
            resolve_expr(default)?;
        }
    }
    resolve(&mut func.body)
}

fn resolve_expr(expr: &mut Expr) -> Result<(), ParseError> {
    let span = expr.span;
    let file = expr.file.clone();
    match &mut expr.kind {
        ExprKind::FString(parts) => resolve_fstring(parts, span, &file)?,
        ExprKind::Binary { left, right, .. } => {
            resolve_expr(left)?;
            resolve_expr(right)?;
        }
        ExprKind::Unary { operand, .. } => resolve_expr(operand)?,
        ExprKind::Ternary {
            cond,
            if_true,
            if_false,
        } => {
            resolve_expr(cond)?;
            resolve_expr(if_true)?;
            resolve_expr(if_false)?;
        }
        ExprKind::ArrayLit(elements) => {
            for element in elements {
                resolve_expr(element)?;
            }
        }
        ExprKind::DictLit(pairs) => {
            for (key, value) in pairs {
                resolve_expr(key)?;
                resolve_expr(value)?;
            }
        }
        ExprKind::Index { base, index } => {
            resolve_expr(base)?;
            resolve_expr(index)?;
        }
        ExprKind::Member { object, .. } => resolve_expr(object)?,
        ExprKind::Call(call) => resolve_args(&mut call.args)?,
        ExprKind::MethodCall(call) => {
            resolve_expr(&mut call.object)?;
            resolve_args(&mut call.args)?;
        }
        ExprKind::New(new) => resolve_args(&mut new.args)?,
        ExprKind::CCall { args, .. } => {
            for arg in args {
                resolve_expr(arg)?;
            }
        }
        ExprKind::Int(_)
        | ExprKind::Float(_)
        | ExprKind::Str(_)
        | ExprKind::Char(_)
        | ExprKind::Bool(_)
        | ExprKind::TypeLiteral(_)
        | ExprKind::Identifier(_)
        | ExprKind::SelfRef
        | ExprKind::ParentRef
        | ExprKind::ElemTypeQuery(_) => {}
    }
    Ok(())
}

fn resolve_args(args: &mut [Arg]) -> Result<(), ParseError> {
    for arg in args {
        resolve_expr(arg.value_mut())?;
    }
    Ok(())
}

/// Replaces the literal's parts with one resolved expression part holding
/// the left-folded concatenation tree.
fn resolve_fstring(
    parts: &mut Vec<FStringPart>,
    span: Span,
    file: &str,
) -> Result<(), ParseError> {
    let old_parts = std::mem::take(parts);
    let mut pieces: Vec<Expr> = Vec::new();
    let mut text = String::new();

    for part in old_parts {
        match part {
            FStringPart::Text(chunk) => text.push_str(&chunk),
            FStringPart::Raw(source) => {
                if !text.is_empty() {
                    pieces.push(Expr::new(
                        ExprKind::Str(std::mem::take(&mut text)),
                        span,
                        file,
                    ));
                }
                let trimmed = source.trim();
                if !trimmed.is_empty() {
                    let mut sub = parse_snippet(trimmed, span, file)?;
                    // A hole may itself contain a formatted string.
                    resolve_expr(&mut sub)?;
                    pieces.push(sub);
                }
            }
            FStringPart::Expr(resolved) => pieces.push(*resolved),
        }
    }
    if !text.is_empty() {
        pieces.push(Expr::new(ExprKind::Str(text), span, file));
    }

    let combined = match pieces.len() {
        0 => Expr::new(ExprKind::Str(String::new()), span, file),
        _ => {
            let mut iter = pieces.into_iter();
            let first = iter.next().expect("non-empty");
            iter.fold(first, |acc, next| {
                Expr::new(
                    ExprKind::Binary {
                        left: Box::new(acc),
                        op: BinaryOp::Add,
                        right: Box::new(next),
                    },
                    span,
                    file,
                )
            })
        }
    };

    parts.push(FStringPart::Expr(Box::new(combined)));
    Ok(())
}

/// Parses one `{…}` snippet by wrapping it in a minimal statement and
/// running it through the regular lexer and parser.
fn parse_snippet(source: &str, span: Span, file: &str) -> Result<Expr, ParseError> {
    let code = format!("{};", source);
    let tokens = Lexer::new(&code, file).tokenize().tokens;
    let mut parser = Parser::new(tokens, file);
    let mut stmts = parser.parse()?;

    if stmts.len() == 1
        && let StmtKind::Expr(expr) = stmts.remove(0).kind
    {
        return Ok(expr);
    }
    Err(ParseError::new(
        ParseErrorKind::UnexpectedToken,
        format!("Failed to parse f-string expression '{}'", source),
        span,
        file,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;
    use crate::parser::Parser;

    fn parse(source: &str) -> Vec<Stmt> {
        let tokens = Lexer::new(source, "test.tus").tokenize().tokens;
        Parser::new(tokens, "test.tus").parse().expect("parse error")
    }

    fn fstring_parts(stmt: &Stmt) -> &Vec<FStringPart> {
        match &stmt.kind {
            StmtKind::Expr(Expr {
                kind: ExprKind::FString(parts),
                ..
            }) => parts,
            other => panic!("expected an f-string statement, got {:?}", other),
        }
    }

    #[test]
    fn test_resolves_to_single_expression_part() {
        let mut ast = parse("$\"waa {magac}!\";");
        resolve(&mut ast).unwrap();
        let parts = fstring_parts(&ast[0]);
        assert_eq!(parts.len(), 1);
        assert!(matches!(parts[0], FStringPart::Expr(_)));
    }

    #[test]
    fn test_fold_is_concatenation_tree() {
        let mut ast = parse("$\"a{x}b{y}\";");
        resolve(&mut ast).unwrap();
        let parts = fstring_parts(&ast[0]);
        let FStringPart::Expr(combined) = &parts[0] else {
            panic!("expected resolved part");
        };
        // ((("a" + x) + "b") + y) - a left fold over four pieces.
        let ExprKind::Binary { left, op, .. } = &combined.kind else {
            panic!("expected a fold");
        };
        assert_eq!(*op, BinaryOp::Add);
        assert!(matches!(left.kind, ExprKind::Binary { .. }));
    }

    #[test]
    fn test_text_only_literal() {
        let mut ast = parse("$\"qoraal keliya\";");
        resolve(&mut ast).unwrap();
        let parts = fstring_parts(&ast[0]);
        let FStringPart::Expr(combined) = &parts[0] else {
            panic!("expected resolved part");
        };
        assert!(matches!(combined.kind, ExprKind::Str(ref s) if s == "qoraal keliya"));
    }

    #[test]
    fn test_empty_literal_resolves_to_empty_string() {
        let mut ast = parse("$\"\";");
        resolve(&mut ast).unwrap();
        let parts = fstring_parts(&ast[0]);
        let FStringPart::Expr(combined) = &parts[0] else {
            panic!("expected resolved part");
        };
        assert!(matches!(combined.kind, ExprKind::Str(ref s) if s.is_empty()));
    }

    #[test]
    fn test_hole_with_expression() {
        let mut ast = parse("$\"{1 + 2}\";");
        resolve(&mut ast).unwrap();
        let parts = fstring_parts(&ast[0]);
        let FStringPart::Expr(combined) = &parts[0] else {
            panic!("expected resolved part");
        };
        assert!(matches!(
            combined.kind,
            ExprKind::Binary {
                op: BinaryOp::Add,
                ..
            }
        ));
    }

    #[test]
    fn test_bad_snippet_is_a_parse_error() {
        let mut ast = parse("$\"{keyd}\";");
        assert!(resolve(&mut ast).is_err());
    }

    #[test]
    fn test_resolves_inside_function_bodies() {
        let mut ast = parse("hawl f(magac: eray) : eray { soo_celi $\"salaan {magac}\"; }");
        resolve(&mut ast).unwrap();
        let StmtKind::Function(func) = &ast[0].kind else {
            panic!("expected function");
        };
        let StmtKind::Return(Some(expr)) = &func.body[0].kind else {
            panic!("expected return");
        };
        let ExprKind::FString(parts) = &expr.kind else {
            panic!("expected f-string");
        };
        assert_eq!(parts.len(), 1);
    }
}
