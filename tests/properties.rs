//! Quantified pipeline invariants.

mod common;

use common::compile_ok;
use tusmo::ast::{Expr, ExprKind, Stmt, StmtKind};
use tusmo::docstring;
use tusmo::fstring;
use tusmo::lexer::Lexer;
use tusmo::parser::Parser;
use tusmo::semantic::SemanticAnalyzer;

const PROGRAM: &str = "\
koox Qof {
  keyd : eray magac;
  dhis(magac: eray) : waxbo { kan.magac = magac; }
  hawl salaan(hordhac: eray = \"salaan\") : eray { soo_celi $\"{hordhac}, {kan.magac}\"; }
}
hawl isuGee(a: tiro, b: tiro = 10) : tiro { soo_celi a + b; }
keyd : Qof q = Qof(\"Ali\") cusub;
qor(q.salaan());
qor(isuGee(b=2, a=1));
keyd : tix xs = [1, \"laba\", 3.0];
soco x kasta laga helo xs { qor(x); }
";

fn analyzed_ast(source: &str) -> Vec<Stmt> {
    let preprocessed = docstring::preprocess(source);
    let tokens = Lexer::new(&preprocessed, "prog.tus").tokenize().tokens;
    let mut ast = Parser::new(tokens, "prog.tus")
        .parse()
        .expect("parse error");
    fstring::resolve(&mut ast).expect("f-string error");
    docstring::attach(&mut ast);
    let mut analyzer = SemanticAnalyzer::new();
    analyzer.analyze(&mut ast).expect("semantic error");
    ast
}

/// Walks every expression in a statement tree.
fn for_each_expr(stmts: &[Stmt], f: &mut impl FnMut(&Expr)) {
    for stmt in stmts {
        match &stmt.kind {
            StmtKind::VarDecl(decl) => {
                if let Some(init) = &decl.init {
                    walk_expr(init, f);
                }
            }
            StmtKind::Assign { target, value }
            | StmtKind::CompoundAssign { target, value, .. } => {
                walk_expr(target, f);
                walk_expr(value, f);
            }
            StmtKind::If { cases, else_body } => {
                for case in cases {
                    walk_expr(&case.cond, f);
                    for_each_expr(&case.body, f);
                }
                if let Some(body) = else_body {
                    for_each_expr(body, f);
                }
            }
            StmtKind::While { cond, body } | StmtKind::DoWhile { body, cond } => {
                walk_expr(cond, f);
                for_each_expr(body, f);
            }
            StmtKind::ForRange {
                start, end, body, ..
            } => {
                walk_expr(start, f);
                walk_expr(end, f);
                for_each_expr(body, f);
            }
            StmtKind::ForEach { iterable, body, .. } => {
                walk_expr(iterable, f);
                for_each_expr(body, f);
            }
            StmtKind::Return(Some(expr)) => walk_expr(expr, f),
            StmtKind::Print(exprs) => exprs.iter().for_each(|e| walk_expr(e, f)),
            StmtKind::Expr(expr) => walk_expr(expr, f),
            StmtKind::Function(func) => for_each_expr(&func.body, f),
            StmtKind::Class(class) => {
                for method in &class.methods {
                    for_each_expr(&method.body, f);
                }
            }
            _ => {}
        }
    }
}

fn walk_expr(expr: &Expr, f: &mut impl FnMut(&Expr)) {
    f(expr);
    match &expr.kind {
        ExprKind::Binary { left, right, .. } => {
            walk_expr(left, f);
            walk_expr(right, f);
        }
        ExprKind::Unary { operand, .. } => walk_expr(operand, f),
        ExprKind::Ternary {
            cond,
            if_true,
            if_false,
        } => {
            walk_expr(cond, f);
            walk_expr(if_true, f);
            walk_expr(if_false, f);
        }
        ExprKind::ArrayLit(elements) => elements.iter().for_each(|e| walk_expr(e, f)),
        ExprKind::DictLit(pairs) => {
            for (k, v) in pairs {
                walk_expr(k, f);
                walk_expr(v, f);
            }
        }
        ExprKind::Index { base, index } => {
            walk_expr(base, f);
            walk_expr(index, f);
        }
        ExprKind::Member { object, .. } => walk_expr(object, f),
        ExprKind::Call(call) => call.args.iter().for_each(|a| walk_expr(a.value(), f)),
        ExprKind::MethodCall(call) => {
            walk_expr(&call.object, f);
            call.args.iter().for_each(|a| walk_expr(a.value(), f));
        }
        ExprKind::New(new) => new.args.iter().for_each(|a| walk_expr(a.value(), f)),
        ExprKind::CCall { args, .. } => args.iter().for_each(|e| walk_expr(e, f)),
        _ => {}
    }
}

#[test]
fn every_node_has_filename_and_positive_line() {
    let ast = analyzed_ast(PROGRAM);
    let mut count = 0;
    for stmt in &ast {
        assert!(!stmt.file.is_empty());
        assert!(stmt.span.line >= 1);
    }
    for_each_expr(&ast, &mut |expr| {
        count += 1;
        assert!(!expr.file.is_empty());
        assert!(expr.span.line >= 1);
    });
    assert!(count > 10, "the walk visited a real tree");
}

#[test]
fn resolved_calls_have_full_ordered_vectors() {
    let ast = analyzed_ast(PROGRAM);
    let mut checked = 0;
    for_each_expr(&ast, &mut |expr| match &expr.kind {
        ExprKind::Call(call) => {
            if let Some(ordered) = &call.ordered {
                checked += 1;
                // isuGee has two parameters.
                assert_eq!(ordered.len(), 2);
            }
        }
        ExprKind::MethodCall(call) => {
            if let Some(ordered) = &call.ordered {
                checked += 1;
                assert!(call.resolved_class.is_some());
                assert!(ordered.len() <= 1);
            }
        }
        ExprKind::New(new) => {
            if let Some(ordered) = &new.ordered {
                checked += 1;
                assert_eq!(ordered.len(), 1);
            }
        }
        _ => {}
    });
    assert!(checked >= 3);
}

#[test]
fn no_class_is_its_own_ancestor() {
    let source = "koox A { }\nkoox B dhaxlaya A { }\nkoox C dhaxlaya B { }";
    let mut chain_ok = true;
    let ast = analyzed_ast(source);
    for stmt in &ast {
        if let StmtKind::Class(class) = &stmt.kind {
            let mut seen = vec![class.name.clone()];
            let mut parent = class.parent.clone();
            while let Some(p) = parent {
                if seen.contains(&p) {
                    chain_ok = false;
                    break;
                }
                seen.push(p.clone());
                parent = ast.iter().find_map(|s| match &s.kind {
                    StmtKind::Class(c) if c.name == p => c.parent.clone(),
                    _ => None,
                });
            }
        }
    }
    assert!(chain_ok);
}

#[test]
fn generation_is_deterministic() {
    let first = compile_ok(PROGRAM);
    let second = compile_ok(PROGRAM);
    assert_eq!(first.c_code, second.c_code);
    assert_eq!(first.features.tags(), second.features.tags());
}

#[test]
fn feature_tags_reflect_emitted_runtime_calls() {
    let output = compile_ok(PROGRAM);
    // Every published tag corresponds to a runtime reference in the C.
    for tag in output.features.tags() {
        let witness = match tag {
            "array" => "array_mixed_",
            "dictionary" => "print_dynamic",
            "string" => "tusmo_concat_cstr",
            "io" => "printf",
            "conversion" => "to_",
            other => panic!("unexpected tag for this program: {}", other),
        };
        assert!(
            output.c_code.contains(witness),
            "tag '{}' published without its runtime witness",
            tag
        );
    }
}

#[test]
fn fstring_of_string_parts_folds_to_source_string() {
    // A resolved f-string whose holes are all string literals is just the
    // concatenation of its pieces.
    // The inner quotes are escaped so the literal itself stays
    // single-line; escapes decode before the hole is split out.
    let output = compile_ok("qor($\"sal{\\\"aan\\\"} dunida\");");
    assert!(
        output
            .c_code
            .contains("tusmo_concat_cstr(tusmo_concat_cstr(\"sal\", \"aan\"), \" dunida\")")
    );
}
