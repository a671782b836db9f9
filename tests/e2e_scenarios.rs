//! End-to-end scenarios over the full pipeline, from source text to the
//! emitted C translation unit and feature tags.

mod common;

use common::{compile_ok, compile_err};
use tusmo::codegen::Feature;
use tusmo::driver::CompileError;

#[test]
fn e2e_hello_world() {
    let output = compile_ok("qor(\"hi\");");
    assert!(output.c_code.contains("printf(\"%s\""));
    assert!(output.c_code.contains("\"hi\""));
    assert!(output.c_code.contains("printf(\"\\n\");"));
    assert_eq!(output.features.tags(), vec!["io"]);
}

#[test]
fn e2e_arithmetic_and_precedence() {
    let output = compile_ok("qor(1 + 2 * 3);");
    assert!(output.c_code.contains("(1 + (2 * 3))"));
}

#[test]
fn e2e_homogeneous_array() {
    let output = compile_ok(
        "keyd : tix:tiro xs = [1, 2, 3];\nxs.gali(4);\nqor(xs[3]);",
    );
    assert!(output.features.contains(Feature::Array));
    assert!(output.c_code.contains("array_int_create(8)"));
    assert_eq!(output.c_code.matches("array_int_append").count(), 4);
    assert!(
        output
            .c_code
            .contains("xs->data[tusmo_bounds_check(3, xs->size)]")
    );
}

#[test]
fn e2e_class_with_inheritance_and_parent_dispatch() {
    let output = compile_ok(
        "koox A { hawl salaan() : waxbo { qor(\"A\"); } }\n\
         koox B dhaxlaya A { hawl hello() : waxbo { waalid.salaan(); } }\n\
         keyd : B b = B() cusub;\n\
         b.hello();",
    );
    // The B struct embeds A as its first field, named parent.
    assert!(output.c_code.contains("struct B {\n    A parent;\n};"));
    assert!(output.c_code.contains("A_salaan(&kan->parent);"));
    assert!(output.c_code.contains("B_hello(b)"));
}

#[test]
fn e2e_named_arguments_with_defaults() {
    let output = compile_ok(
        "hawl f(a: tiro, b: tiro = 10) : tiro { soo_celi a + b; }\nqor(f(b=5, a=2));",
    );
    assert!(output.c_code.contains("f(2, 5)"));
}

#[test]
fn e2e_heterogeneous_array_boxes_and_prints_dynamically() {
    let output = compile_ok("keyd : tix xs = [1, \"laba\", 3.0];\nqor(xs[1]);");
    assert!(output.features.contains(Feature::Array));
    assert!(output.c_code.contains("array_mixed_append"));
    assert!(output.c_code.contains(".kind = TUSMO_INT"));
    assert!(output.c_code.contains(".kind = TUSMO_STRING"));
    assert!(output.c_code.contains(".kind = TUSMO_FLOAT"));
    assert!(output.c_code.contains("print_dynamic("));
}

#[test]
fn e2e_fstring_with_all_string_parts_is_plain_concatenation() {
    let output = compile_ok("keyd : eray magac = \"dunida\";\nqor($\"salaan {magac}!\");");
    assert!(
        output
            .c_code
            .contains("tusmo_concat_cstr(tusmo_concat_cstr(\"salaan \", magac), \"!\")")
    );
}

#[test]
fn e2e_docstrings_compile_away() {
    let output = compile_ok(
        "hawl f() : waxbo {\n    :waa tijaabo:\n    qor(1);\n}\nf();",
    );
    assert!(!output.c_code.contains("waa tijaabo"));
    assert!(output.c_code.contains("void f()"));
}

#[test]
fn e2e_no_output_on_semantic_error() {
    let error = compile_err("keyd : tiro x = \"eray\";");
    assert!(matches!(error, CompileError::Semantic(_)));
}

#[test]
fn e2e_full_program() {
    let source = "\
koox Xayawaan {
  keyd : eray magac;
  dhis(magac: eray) : waxbo { kan.magac = magac; }
  hawl codka() : eray { soo_celi \"...\"; }
}
koox Ey dhaxlaya Xayawaan {
  hawl ci() : eray { soo_celi $\"{waalid.magac}: hau!\"; }
}
keyd : Ey ey = Ey(\"Buundo\") cusub;
qor(ey.ci());
soco i laga bilaabo 0 .. 3 {
  haddii (i % 2 == 0) { qor(i); } haddii_kale { kasoco; }
}";
    let output = compile_ok(source);
    assert!(output.c_code.contains("struct Ey {\n    Xayawaan parent;\n};"));
    assert!(output.c_code.contains("_create_Ey"));
    assert!(output.c_code.contains("for (int i = 0; i < 3; ++i)"));
    assert!(output.features.contains(Feature::Io));
    assert!(output.features.contains(Feature::String));
}
