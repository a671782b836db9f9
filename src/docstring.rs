//! Docstring preprocessing and attachment.
//!
//! Two cooperating pieces:
//!
//! - [`preprocess`] runs before lexing and rewrites compact doc lines of
//!   the form `    :text:` into string-literal statements, so humans can
//!   write single-line docs without quoting.
//! - [`attach`] runs after parsing and folds a leading plain string
//!   statement inside a function body into the declaration's `docstring`
//!   field, removing it from the body so it generates no code. Class
//!   docstrings are captured by the parser itself, since class bodies
//!   separate members from methods at parse time.

use crate::ast::{ClassDecl, Expr, ExprKind, FunctionDecl, Stmt, StmtKind};

/// Rewrites `    :text:` doc lines into string-literal statements.
///
/// Only whole lines participate: the trimmed line must start and end with
/// a colon and contain no other colon, which keeps type annotations like
/// `keyd : tiro x;` untouched.
pub fn preprocess(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    for (i, line) in source.split('\n').enumerate() {
        if i > 0 {
            out.push('\n');
        }
        match doc_line_content(line) {
            Some((indent, text)) => {
                out.push_str(indent);
                out.push('"');
                out.push_str(&escape_doc_text(text));
                out.push_str("\";");
            }
            None => out.push_str(line),
        }
    }
    out
}

/// Returns the indentation and inner text of a `:text:` doc line.
fn doc_line_content(line: &str) -> Option<(&str, &str)> {
    let trimmed_end = line.trim_end_matches('\r');
    let stripped = trimmed_end.trim_start();
    let indent = &trimmed_end[..trimmed_end.len() - stripped.len()];
    if stripped.len() < 2 || !stripped.starts_with(':') || !stripped.ends_with(':') {
        return None;
    }
    let inner = &stripped[1..stripped.len() - 1];
    if inner.contains(':') {
        return None;
    }
    Some((indent, inner))
}

fn escape_doc_text(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Attaches leading string-literal statements to the functions that
/// contain them, recursively through class methods and nested bodies.
pub fn attach(ast: &mut [Stmt]) {
    for stmt in ast {
        attach_stmt(stmt);
    }
}

fn attach_stmt(stmt: &mut Stmt) {
    match &mut stmt.kind {
        StmtKind::Function(func) => attach_function(func),
        StmtKind::Class(class) => attach_class(class),
        StmtKind::If { cases, else_body } => {
            for case in cases {
                attach(&mut case.body);
            }
            if let Some(body) = else_body {
                attach(body);
            }
        }
        StmtKind::While { body, .. }
        | StmtKind::DoWhile { body, .. }
        | StmtKind::ForRange { body, .. }
        | StmtKind::ForEach { body, .. } => attach(body),
        _ => {}
    }
}

fn attach_function(func: &mut FunctionDecl) {
    if func.docstring.is_none()
        && let Some(text) = leading_string(&func.body)
    {
        func.docstring = Some(text);
        func.body.remove(0);
    }
    attach(&mut func.body);
}

fn attach_class(class: &mut ClassDecl) {
    for method in &mut class.methods {
        attach_function(method);
    }
}

fn leading_string(body: &[Stmt]) -> Option<String> {
    match body.first() {
        Some(Stmt {
            kind:
                StmtKind::Expr(Expr {
                    kind: ExprKind::Str(text),
                    ..
                }),
            ..
        }) => Some(text.clone()),
        _ => None,
    }
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

    #[test]
    fn test_preprocess_rewrites_doc_lines() {
        let source = "hawl f() : waxbo {\n    :isu geyn laba tiro:\n}\n";
        let processed = preprocess(source);
        assert!(processed.contains("\"isu geyn laba tiro\";"));
        assert!(!processed.contains(':'.to_string().repeat(2).as_str()));
    }

    #[test]
    fn test_preprocess_ignores_type_annotations() {
        let source = "keyd : tiro x = 1;";
        assert_eq!(preprocess(source), source);
    }

    #[test]
    fn test_preprocess_escapes_quotes() {
        let processed = preprocess("    :waa \"tusaale\":");
        assert!(processed.contains("\\\"tusaale\\\""));
    }

    #[test]
    fn test_attach_function_docstring() {
        let mut ast = parse("hawl f() : waxbo { \"dokumenti\"; qor(1); }");
        attach(&mut ast);
        match &ast[0].kind {
            StmtKind::Function(func) => {
                assert_eq!(func.docstring.as_deref(), Some("dokumenti"));
                assert_eq!(func.body.len(), 1);
            }
            other => panic!("expected Function, got {:?}", other),
        }
    }

    #[test]
    fn test_attach_method_docstring() {
        let mut ast = parse("koox Qof { hawl hadal() : waxbo { \"wuu hadlaa\"; } }");
        attach(&mut ast);
        match &ast[0].kind {
            StmtKind::Class(class) => {
                assert_eq!(class.methods[0].docstring.as_deref(), Some("wuu hadlaa"));
                assert!(class.methods[0].body.is_empty());
            }
            other => panic!("expected Class, got {:?}", other),
        }
    }

    #[test]
    fn test_no_docstring_leaves_body_alone() {
        let mut ast = parse("hawl f() : waxbo { qor(1); }");
        attach(&mut ast);
        match &ast[0].kind {
            StmtKind::Function(func) => {
                assert!(func.docstring.is_none());
                assert_eq!(func.body.len(), 1);
            }
            other => panic!("expected Function, got {:?}", other),
        }
    }

    #[test]
    fn test_doc_line_through_full_pipeline() {
        let source = "hawl f() : waxbo {\n    :qoraal kooban:\n    qor(1);\n}";
        let mut ast = parse(&preprocess(source));
        attach(&mut ast);
        match &ast[0].kind {
            StmtKind::Function(func) => {
                assert_eq!(func.docstring.as_deref(), Some("qoraal kooban"));
            }
            other => panic!("expected Function, got {:?}", other),
        }
    }
}
