//! Unit tests for the semantic analyzer.

use super::*;
use crate::ast::ExprKind;
use crate::docstring;
use crate::fstring;
use crate::lexer::Lexer;
use crate::parser::Parser;

/// Runs the frontend passes and analysis over `source`.
fn analyze(source: &str) -> Result<Vec<Stmt>, SemanticError> {
    let preprocessed = docstring::preprocess(source);
    let tokens = Lexer::new(&preprocessed, "test.tus").tokenize().tokens;
    let mut ast = Parser::new(tokens, "test.tus")
        .parse()
        .expect("parse error");
    fstring::resolve(&mut ast).expect("f-string error");
    docstring::attach(&mut ast);
    let mut analyzer = SemanticAnalyzer::new();
    analyzer.analyze(&mut ast)?;
    Ok(ast)
}

fn analyze_err(source: &str) -> SemanticError {
    analyze(source).expect_err("expected a semantic error")
}

#[test]
fn test_simple_program_passes() {
    assert!(analyze("keyd : tiro x = 5;\nqor(x);").is_ok());
}

#[test]
fn test_duplicate_variable_same_scope() {
    let err = analyze_err("keyd : tiro x = 1;\nkeyd : tiro x = 2;");
    assert_eq!(err.kind(), SemanticErrorKind::DuplicateVariable);
    assert_eq!(err.file(), "test.tus");
    assert_eq!(err.span().line, 2);
}

#[test]
fn test_shadowing_in_inner_scope_is_allowed() {
    let source = "keyd : tiro x = 1;\nhaddii (run) { keyd : tiro x = 2; qor(x); }";
    assert!(analyze(source).is_ok());
}

#[test]
fn test_undefined_variable() {
    let err = analyze_err("qor(ma_jiro);");
    assert_eq!(err.kind(), SemanticErrorKind::UndefinedVariable);
}

#[test]
fn test_undefined_function() {
    let err = analyze_err("ma_jiro();");
    assert_eq!(err.kind(), SemanticErrorKind::UndefinedFunction);
}

#[test]
fn test_declaration_type_mismatch() {
    let err = analyze_err("keyd : tiro x = \"eray\";");
    assert_eq!(err.kind(), SemanticErrorKind::TypeMismatch);
}

#[test]
fn test_unknown_type_annotation() {
    let err = analyze_err("keyd : MaJiro x;");
    assert_eq!(err.kind(), SemanticErrorKind::UnknownType);
}

#[test]
fn test_string_plus_promotes_right_operand() {
    assert!(analyze("keyd : eray s = \"tirada: \" + 42;").is_ok());
}

#[test]
fn test_dynamic_value_is_compatible_with_primitives() {
    let source = "keyd : qaamuus d = {\"da\": 25};\nkeyd : tiro da = d[\"da\"];";
    assert!(analyze(source).is_ok());
}

#[test]
fn test_heterogeneous_array_accepts_typed_array() {
    assert!(analyze("keyd : tix xs = [1, 2, 3];").is_ok());
}

#[test]
fn test_named_arguments_are_reordered() {
    let ast = analyze(
        "hawl f(a: tiro, b: tiro = 10) : tiro { soo_celi a + b; }\nkeyd : tiro n = f(b=5, a=2);",
    )
    .unwrap();
    let StmtKind::VarDecl(decl) = &ast[1].kind else {
        panic!("expected declaration");
    };
    let Some(init) = &decl.init else {
        panic!("expected initializer");
    };
    let ExprKind::Call(call) = &init.kind else {
        panic!("expected call");
    };
    let ordered = call.ordered.as_ref().expect("ordered arguments must be set");
    assert_eq!(ordered.len(), 2);
    assert!(matches!(ordered[0].kind, ExprKind::Int(2)));
    assert!(matches!(ordered[1].kind, ExprKind::Int(5)));
}

#[test]
fn test_default_fills_missing_argument() {
    let ast = analyze("hawl f(a: tiro, b: tiro = 10) : tiro { soo_celi a; }\nf(1);").unwrap();
    let StmtKind::Expr(expr) = &ast[1].kind else {
        panic!("expected expression statement");
    };
    let ExprKind::Call(call) = &expr.kind else {
        panic!("expected call");
    };
    let ordered = call.ordered.as_ref().unwrap();
    assert_eq!(ordered.len(), 2);
    assert!(matches!(ordered[1].kind, ExprKind::Int(10)));
}

#[test]
fn test_missing_required_argument() {
    let err = analyze_err("hawl f(a: tiro) : tiro { soo_celi a; }\nf();");
    assert_eq!(err.kind(), SemanticErrorKind::InvalidArgument);
}

#[test]
fn test_positional_after_named_rejected() {
    let err = analyze_err("hawl f(a: tiro, b: tiro) : waxbo { }\nf(a=1, 2);");
    assert_eq!(err.kind(), SemanticErrorKind::InvalidArgument);
}

#[test]
fn test_argument_type_mismatch() {
    let err = analyze_err("hawl f(a: tiro) : waxbo { }\nf(\"eray\");");
    assert_eq!(err.kind(), SemanticErrorKind::TypeMismatch);
}

#[test]
fn test_default_after_required_rejected() {
    let err = analyze_err("hawl f(a: tiro = 1, b: tiro) : waxbo { }");
    assert_eq!(err.kind(), SemanticErrorKind::InvalidArgument);
}

#[test]
fn test_duplicate_function() {
    let err = analyze_err("hawl f() : waxbo { }\nhawl f() : waxbo { }");
    assert_eq!(err.kind(), SemanticErrorKind::DuplicateFunction);
}

#[test]
fn test_return_type_checked() {
    let err = analyze_err("hawl f() : tiro { soo_celi \"eray\"; }");
    assert_eq!(err.kind(), SemanticErrorKind::TypeMismatch);
}

#[test]
fn test_return_outside_function() {
    let err = analyze_err("soo_celi 1;");
    assert_eq!(err.kind(), SemanticErrorKind::InvalidContext);
}

#[test]
fn test_break_outside_loop() {
    let err = analyze_err("joog;");
    assert_eq!(err.kind(), SemanticErrorKind::InvalidContext);
}

#[test]
fn test_continue_inside_loop_ok() {
    assert!(analyze("inta ay (run) { kasoco; }").is_ok());
}

#[test]
fn test_break_in_nested_function_outside_loop() {
    let err = analyze_err("inta ay (run) { joog; }\njoog;");
    assert_eq!(err.kind(), SemanticErrorKind::InvalidContext);
}

#[test]
fn test_for_range_needs_integers() {
    let err = analyze_err("soco i laga bilaabo 0 .. \"toban\" { }");
    assert_eq!(err.kind(), SemanticErrorKind::TypeMismatch);
}

#[test]
fn test_for_each_over_string_yields_chars() {
    let source = "keyd : eray s = \"salaan\";\nsoco x kasta laga helo s { keyd : xaraf c = x; }";
    assert!(analyze(source).is_ok());
}

#[test]
fn test_for_each_needs_iterable() {
    let err = analyze_err("soco x kasta laga helo 5 { }");
    assert_eq!(err.kind(), SemanticErrorKind::TypeMismatch);
}

#[test]
fn test_self_outside_method() {
    let err = analyze_err("qor(kan);");
    assert_eq!(err.kind(), SemanticErrorKind::InvalidContext);
}

#[test]
fn test_parent_requires_inheritance() {
    let err = analyze_err(
        "koox A { hawl f() : waxbo { qor(waalid); } }",
    );
    assert_eq!(err.kind(), SemanticErrorKind::InvalidContext);
}

#[test]
fn test_class_registration_and_instantiation() {
    let source = "koox Qof {\n  keyd : eray magac;\n  dhis(magac: eray) : waxbo { kan.magac = magac; }\n}\nkeyd : Qof q = Qof(\"Ali\") cusub;";
    assert!(analyze(source).is_ok());
}

#[test]
fn test_constructor_arguments_resolved() {
    let source = "koox Qof {\n  keyd : eray magac;\n  keyd : tiro da;\n  dhis(magac: eray, da: tiro = 18) : waxbo { }\n}\nkeyd : Qof q = Qof(da=30, magac=\"Ali\") cusub;";
    let ast = analyze(source).unwrap();
    let StmtKind::VarDecl(decl) = &ast[1].kind else {
        panic!("expected declaration");
    };
    let ExprKind::New(new) = &decl.init.as_ref().unwrap().kind else {
        panic!("expected instantiation");
    };
    let ordered = new.ordered.as_ref().unwrap();
    assert!(matches!(ordered[0].kind, ExprKind::Str(ref s) if s == "Ali"));
    assert!(matches!(ordered[1].kind, ExprKind::Int(30)));
}

#[test]
fn test_instantiation_without_constructor_rejects_args() {
    let err = analyze_err("koox A { }\nkeyd : A a = A(1) cusub;");
    assert_eq!(err.kind(), SemanticErrorKind::InvalidArgument);
}

#[test]
fn test_unknown_class_instantiation() {
    let err = analyze_err("keyd : tiro x = MaJiro() cusub;");
    assert_eq!(err.kind(), SemanticErrorKind::UndefinedClass);
}

#[test]
fn test_inherits_unknown_class() {
    let err = analyze_err("koox B dhaxlaya MaJiro { }");
    assert_eq!(err.kind(), SemanticErrorKind::InheritanceError);
}

#[test]
fn test_method_resolution_walks_parent_chain() {
    let source = "koox A { hawl salaan() : waxbo { } }\n\
                  koox B dhaxlaya A { }\n\
                  keyd : B b = B() cusub;\n\
                  b.salaan();";
    let ast = analyze(source).unwrap();
    let StmtKind::Expr(expr) = &ast[3].kind else {
        panic!("expected expression statement");
    };
    let ExprKind::MethodCall(call) = &expr.kind else {
        panic!("expected method call");
    };
    assert_eq!(call.resolved_class.as_deref(), Some("A"));
    assert_eq!(call.ordered.as_ref().unwrap().len(), 0);
}

#[test]
fn test_member_lookup_walks_parent_chain() {
    let source = "koox A { keyd : tiro da; }\n\
                  koox B dhaxlaya A { }\n\
                  keyd : B b = B() cusub;\n\
                  keyd : tiro da = b.da;";
    assert!(analyze(source).is_ok());
}

#[test]
fn test_unknown_member() {
    let err = analyze_err("koox A { }\nkeyd : A a = A() cusub;\nqor(a.ma_jiro);");
    assert_eq!(err.kind(), SemanticErrorKind::UnknownMember);
}

#[test]
fn test_unknown_method() {
    let err = analyze_err("koox A { }\nkeyd : A a = A() cusub;\na.ma_jiro();");
    assert_eq!(err.kind(), SemanticErrorKind::UnknownMethod);
}

#[test]
fn test_array_append_type_checked() {
    let err = analyze_err("keyd : tix:tiro xs = [1];\nxs.gali(\"laba\");");
    assert_eq!(err.kind(), SemanticErrorKind::TypeMismatch);
}

#[test]
fn test_array_insert_needs_boos() {
    let err = analyze_err("keyd : tix:tiro xs = [1];\nxs.gali(0, 5);");
    assert_eq!(err.kind(), SemanticErrorKind::InvalidArgument);
}

#[test]
fn test_array_pop_and_remove_types() {
    let source = "keyd : tix:tiro xs = [1, 2];\n\
                  keyd : tiro x = xs.kasaar(boos=0);\n\
                  keyd : miyaa laga_saaray = xs.kasaar(2);";
    assert!(analyze(source).is_ok());
}

#[test]
fn test_dict_methods() {
    let source = "keyd : qaamuus d = {\"k\": 1};\n\
                  keyd : miyaa jira = d.majiraa(\"k\");\n\
                  d.kasaar(\"k\");";
    assert!(analyze(source).is_ok());
}

#[test]
fn test_dict_key_must_be_string() {
    let err = analyze_err("keyd : qaamuus d = {1: \"hal\"};");
    assert_eq!(err.kind(), SemanticErrorKind::TypeMismatch);
}

#[test]
fn test_string_indexing_yields_char() {
    assert!(analyze("keyd : eray s = \"ab\";\nkeyd : xaraf c = s[0];").is_ok());
}

#[test]
fn test_indexing_non_indexable() {
    let err = analyze_err("keyd : tiro x = 1;\nqor(x[0]);");
    assert_eq!(err.kind(), SemanticErrorKind::TypeMismatch);
}

#[test]
fn test_function_typed_variable_call() {
    let source = "hawl laban(n: tiro) : tiro { soo_celi n * 2; }\n\
                  keyd : hawl(tiro):tiro f = laban;\n\
                  keyd : tiro x = f(4);";
    assert!(analyze(source).is_ok());
}

#[test]
fn test_function_typed_variable_arity_checked() {
    let err = analyze_err(
        "hawl laban(n: tiro) : tiro { soo_celi n * 2; }\n\
         keyd : hawl(tiro):tiro f = laban;\n\
         keyd : tiro x = f(4, 5);",
    );
    assert_eq!(err.kind(), SemanticErrorKind::InvalidArgument);
}

#[test]
fn test_builtin_rejects_named_args() {
    let err = analyze_err("keyd : tiro n = dherer(s=\"abc\");");
    assert_eq!(err.kind(), SemanticErrorKind::InvalidArgument);
}

#[test]
fn test_type_literal_comparison() {
    let source = "keyd : tix xs = [1, \"laba\"];\nhaddii (nooc(xs[0]) == tiro) { qor(1); }";
    assert!(analyze(source).is_ok());
}

#[test]
fn test_hel_into_unsupported_type() {
    let err = analyze_err("keyd : miyaa b;\nhel(b);");
    assert_eq!(err.kind(), SemanticErrorKind::TypeMismatch);
}

#[test]
fn test_hel_into_undeclared() {
    let err = analyze_err("hel(magac);");
    assert_eq!(err.kind(), SemanticErrorKind::UndefinedVariable);
}

#[test]
fn test_errors_carry_location() {
    let err = analyze_err("keyd : tiro x = 1;\n\nqor(ma_jiro);");
    assert_eq!(err.file(), "test.tus");
    assert_eq!(err.span().line, 3);
    assert!(err.span().line >= 1);
}

#[test]
fn test_fstring_holes_are_analyzed() {
    let err = analyze_err("qor($\"waa {ma_jiro}\");");
    assert_eq!(err.kind(), SemanticErrorKind::UndefinedVariable);
}

#[test]
fn test_methods_live_in_class_scope() {
    // Two classes may both declare `hadal`; a free function may share a
    // method's name.
    let source = "koox A { hawl hadal() : waxbo { } }\n\
                  koox B { hawl hadal() : waxbo { } }\n\
                  hawl hadal() : waxbo { }";
    assert!(analyze(source).is_ok());
}
