//! Unit tests for the parser.

use super::*;
use crate::ast::{Arg, BinaryOp, ExprKind, StmtKind, Type};
use crate::lexer::Lexer;

fn parse(source: &str) -> Vec<Stmt> {
    let mut lexer = Lexer::new(source, "test.tus");
    let output = lexer.tokenize();
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
    let mut parser = Parser::new(output.tokens, "test.tus");
    parser.parse().expect("parse error")
}

fn parse_err(source: &str) -> ParseError {
    let mut lexer = Lexer::new(source, "test.tus");
    let tokens = lexer.tokenize().tokens;
    let mut parser = Parser::new(tokens, "test.tus");
    parser.parse().expect_err("expected a parse error")
}

fn single_expr(source: &str) -> crate::ast::Expr {
    let mut program = parse(source);
    assert_eq!(program.len(), 1);
    match program.remove(0).kind {
        StmtKind::Expr(expr) => expr,
        other => panic!("expected an expression statement, got {:?}", other),
    }
}

#[test]
fn test_var_decl_with_init() {
    let program = parse("keyd : tiro x = 5;");
    match &program[0].kind {
        StmtKind::VarDecl(decl) => {
            assert_eq!(decl.name, "x");
            assert_eq!(decl.ty, Type::Int);
            assert!(decl.init.is_some());
        }
        other => panic!("expected VarDecl, got {:?}", other),
    }
}

#[test]
fn test_var_decl_without_init() {
    let program = parse("keyd : eray magac;");
    match &program[0].kind {
        StmtKind::VarDecl(decl) => {
            assert_eq!(decl.ty, Type::Str);
            assert!(decl.init.is_none());
        }
        other => panic!("expected VarDecl, got {:?}", other),
    }
}

#[test]
fn test_array_type_annotations() {
    let program = parse("keyd : tix:tiro xs = [1, 2];");
    match &program[0].kind {
        StmtKind::VarDecl(decl) => {
            assert_eq!(decl.ty, Type::Array(Some(Box::new(Type::Int))));
        }
        other => panic!("expected VarDecl, got {:?}", other),
    }

    let program = parse("keyd : tix xs = [1, \"laba\"];");
    match &program[0].kind {
        StmtKind::VarDecl(decl) => assert_eq!(decl.ty, Type::Array(None)),
        other => panic!("expected VarDecl, got {:?}", other),
    }
}

#[test]
fn test_nested_array_type() {
    let program = parse("keyd : tix:tix:tiro xs;");
    match &program[0].kind {
        StmtKind::VarDecl(decl) => {
            assert_eq!(
                decl.ty,
                Type::Array(Some(Box::new(Type::Array(Some(Box::new(Type::Int))))))
            );
        }
        other => panic!("expected VarDecl, got {:?}", other),
    }
}

#[test]
fn test_function_type_annotation() {
    let program = parse("keyd : hawl(tiro):eray f;");
    match &program[0].kind {
        StmtKind::VarDecl(decl) => match &decl.ty {
            Type::Function(func) => {
                assert_eq!(func.params, vec![Type::Int]);
                assert_eq!(*func.ret, Type::Str);
            }
            other => panic!("expected a function type, got {:?}", other),
        },
        other => panic!("expected VarDecl, got {:?}", other),
    }
}

#[test]
fn test_precedence_mul_over_add() {
    let expr = single_expr("1 + 2 * 3;");
    match expr.kind {
        ExprKind::Binary { op, right, .. } => {
            assert_eq!(op, BinaryOp::Add);
            assert!(matches!(
                right.kind,
                ExprKind::Binary {
                    op: BinaryOp::Mul,
                    ..
                }
            ));
        }
        other => panic!("expected Binary, got {:?}", other),
    }
}

#[test]
fn test_left_associativity() {
    let expr = single_expr("10 - 4 - 3;");
    match expr.kind {
        ExprKind::Binary { op, left, .. } => {
            assert_eq!(op, BinaryOp::Sub);
            assert!(matches!(
                left.kind,
                ExprKind::Binary {
                    op: BinaryOp::Sub,
                    ..
                }
            ));
        }
        other => panic!("expected Binary, got {:?}", other),
    }
}

#[test]
fn test_keyword_operators() {
    let expr = single_expr("run iyo been ama run;");
    assert!(matches!(
        expr.kind,
        ExprKind::Binary {
            op: BinaryOp::Or,
            ..
        }
    ));
}

#[test]
fn test_negative_literal_folding() {
    let expr = single_expr("-5;");
    assert!(matches!(expr.kind, ExprKind::Int(-5)));
}

#[test]
fn test_ternary() {
    let expr = single_expr("x weyn 3 ? 1 : 2;");
    assert!(matches!(expr.kind, ExprKind::Ternary { .. }));
}

#[test]
fn test_function_declaration() {
    let program = parse("hawl isuGee(a: tiro, b: tiro = 10) : tiro { soo_celi a + b; }");
    match &program[0].kind {
        StmtKind::Function(func) => {
            assert_eq!(func.name, "isuGee");
            assert_eq!(func.params.len(), 2);
            assert_eq!(func.params[0].name, "a");
            assert!(func.params[0].default.is_none());
            assert!(func.params[1].default.is_some());
            assert_eq!(func.return_type, Type::Int);
            assert_eq!(func.body.len(), 1);
        }
        other => panic!("expected Function, got {:?}", other),
    }
}

#[test]
fn test_arrow_return_type_synonym() {
    let program = parse("shaqo f() => waxbo { }");
    match &program[0].kind {
        StmtKind::Function(func) => assert_eq!(func.return_type, Type::Void),
        other => panic!("expected Function, got {:?}", other),
    }
}

#[test]
fn test_named_arguments() {
    let expr = single_expr("f(1, b=2);");
    match expr.kind {
        ExprKind::Call(call) => {
            assert_eq!(call.name, "f");
            assert!(matches!(call.args[0], Arg::Positional(_)));
            assert!(matches!(call.args[1], Arg::Named { ref name, .. } if name == "b"));
            assert!(call.ordered.is_none());
        }
        other => panic!("expected Call, got {:?}", other),
    }
}

#[test]
fn test_class_declaration() {
    let program = parse(
        "koox Qof {\n  keyd : eray magac;\n  dhis(magac: eray) : waxbo { }\n  hawl hadal() : waxbo { qor(kan.magac); }\n}",
    );
    match &program[0].kind {
        StmtKind::Class(class) => {
            assert_eq!(class.name, "Qof");
            assert!(class.parent.is_none());
            assert_eq!(class.members.len(), 1);
            assert_eq!(class.methods.len(), 2);
            assert_eq!(class.methods[0].name, "dhis");
            assert_eq!(class.methods[0].return_type, Type::Void);
        }
        other => panic!("expected Class, got {:?}", other),
    }
}

#[test]
fn test_class_inheritance_clause() {
    let program = parse("koox Ardayga dhaxlaya Qof { }");
    match &program[0].kind {
        StmtKind::Class(class) => {
            assert_eq!(class.parent.as_deref(), Some("Qof"));
        }
        other => panic!("expected Class, got {:?}", other),
    }
}

#[test]
fn test_class_docstring() {
    let program = parse("koox Qof { \"Qofka aasaasiga ah.\"; keyd : tiro da;  }");
    match &program[0].kind {
        StmtKind::Class(class) => {
            assert_eq!(class.docstring.as_deref(), Some("Qofka aasaasiga ah."));
            assert_eq!(class.members.len(), 1);
        }
        other => panic!("expected Class, got {:?}", other),
    }
}

#[test]
fn test_instantiation_postfix() {
    let expr = single_expr("Qof(\"Ali\", 25) cusub;");
    match expr.kind {
        ExprKind::New(new) => {
            assert_eq!(new.class, "Qof");
            assert_eq!(new.args.len(), 2);
        }
        other => panic!("expected New, got {:?}", other),
    }
}

#[test]
fn test_method_call_and_member_access() {
    let expr = single_expr("qof.hadal(1).magac;");
    match expr.kind {
        ExprKind::Member { object, member } => {
            assert_eq!(member, "magac");
            assert!(matches!(object.kind, ExprKind::MethodCall(_)));
        }
        other => panic!("expected Member, got {:?}", other),
    }
}

#[test]
fn test_gali_method_with_named_index() {
    let expr = single_expr("xs.gali(boos=0, 5);");
    match expr.kind {
        ExprKind::MethodCall(call) => {
            assert_eq!(call.method, "gali");
            assert!(matches!(call.args[0], Arg::Named { ref name, .. } if name == "boos"));
        }
        other => panic!("expected MethodCall, got {:?}", other),
    }
}

#[test]
fn test_loops() {
    let program = parse(
        "soco i laga bilaabo 0 .. 10 { qor(i); }\n\
         soco x kasta laga helo xs { qor(x); }\n\
         inta ay (run) { joog; }\n\
         samay { kasoco; } inta ay (been);",
    );
    assert!(matches!(program[0].kind, StmtKind::ForRange { .. }));
    assert!(matches!(program[1].kind, StmtKind::ForEach { .. }));
    assert!(matches!(program[2].kind, StmtKind::While { .. }));
    assert!(matches!(program[3].kind, StmtKind::DoWhile { .. }));
}

#[test]
fn test_if_cascade() {
    let program = parse(
        "haddii (x weyn 0) { qor(1); } ama_haddii (x yar 0) { qor(2); } haddii_kale { qor(3); }",
    );
    match &program[0].kind {
        StmtKind::If { cases, else_body } => {
            assert_eq!(cases.len(), 2);
            assert!(else_body.is_some());
        }
        other => panic!("expected If, got {:?}", other),
    }
}

#[test]
fn test_import_statement() {
    let program = parse("keen \"xisaab\";");
    assert!(matches!(program[0].kind, StmtKind::Import(ref m) if m == "xisaab"));
}

#[test]
fn test_embedded_c() {
    let program = parse("__C_CODE__(\"int tusaale(void) { return 1; }\");");
    assert!(matches!(program[0].kind, StmtKind::EmbeddedC(_)));

    let expr = single_expr("__C_CALL__(\"tusmo_random_int\", 1, 10);");
    match expr.kind {
        ExprKind::CCall { function, args } => {
            assert_eq!(function, "tusmo_random_int");
            assert_eq!(args.len(), 2);
        }
        other => panic!("expected CCall, got {:?}", other),
    }
}

#[test]
fn test_nooc_elem_type_query() {
    let expr = single_expr("nooc(xs[]);");
    match expr.kind {
        ExprKind::Call(call) => {
            assert_eq!(call.name, "nooc");
            assert!(matches!(
                call.args[0].value().kind,
                ExprKind::ElemTypeQuery(ref n) if n == "xs"
            ));
        }
        other => panic!("expected Call, got {:?}", other),
    }
}

#[test]
fn test_nooc_value_query_still_parses_indexing() {
    let expr = single_expr("nooc(xs[0]);");
    match expr.kind {
        ExprKind::Call(call) => {
            assert!(matches!(call.args[0].value().kind, ExprKind::Index { .. }));
        }
        other => panic!("expected Call, got {:?}", other),
    }
}

#[test]
fn test_type_literal_vs_cast() {
    let expr = single_expr("nooc(x) == tiro;");
    match expr.kind {
        ExprKind::Binary { right, .. } => {
            assert!(matches!(right.kind, ExprKind::TypeLiteral(ref n) if n == "tiro"));
        }
        other => panic!("expected Binary, got {:?}", other),
    }

    let expr = single_expr("tiro(\"42\");");
    assert!(matches!(expr.kind, ExprKind::Call(ref c) if c.name == "tiro"));
}

#[test]
fn test_compound_assignment() {
    let program = parse("x += 1;");
    match &program[0].kind {
        StmtKind::CompoundAssign { op, .. } => assert_eq!(*op, BinaryOp::Add),
        other => panic!("expected CompoundAssign, got {:?}", other),
    }
}

#[test]
fn test_dict_literal_and_index_assignment() {
    let program = parse("keyd : qaamuus d = {\"magac\": \"Ali\"};\nd[\"da\"] = 25;");
    assert!(matches!(program[0].kind, StmtKind::VarDecl(_)));
    match &program[1].kind {
        StmtKind::Assign { target, .. } => {
            assert!(matches!(target.kind, ExprKind::Index { .. }));
        }
        other => panic!("expected Assign, got {:?}", other),
    }
}

#[test]
fn test_error_reports_file_and_line() {
    let err = parse_err("keyd : tiro\nx 5;");
    assert_eq!(err.file(), "test.tus");
    assert!(err.span().line >= 1);
    assert_eq!(err.kind(), ParseErrorKind::UnexpectedToken);
}

#[test]
fn test_error_on_missing_semicolon() {
    let err = parse_err("qor(1)");
    assert_eq!(err.kind(), ParseErrorKind::UnexpectedEof);
}

#[test]
fn test_error_on_cusub_without_call() {
    let err = parse_err("keyd : Qof q = x cusub;");
    assert!(err.message().contains("cusub"));
}

#[test]
fn test_every_node_carries_file_and_line() {
    let program = parse("keyd : tiro x = 1;\nqor(x);\nhawl f() : waxbo { soo_celi; }");
    for stmt in &program {
        assert!(!stmt.file.is_empty());
        assert!(stmt.span.line >= 1);
    }
}
