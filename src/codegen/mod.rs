//! C code generation for the Tusmo compiler.
//!
//! The [`Codegen`] walks the analyzed AST and appends to three text
//! buffers - struct definitions, function definitions, and the main body -
//! plus a list of embedded-C chunks and a monotonic [`FeatureSet`]. The
//! final translation unit is assembled as:
//!
//! ```text
//! #include "tusmo_runtime.h"
//! <embedded C chunks, in source order>
//! <struct definitions>
//! <function definitions>
//! int main(void) { GC_INIT(); <main body> return 0; }
//! ```
//!
//! The generator consumes the symbol table produced by semantic analysis
//! and re-enters scopes as it walks so expression types can be recomputed
//! where lowering decisions need them (print batching, dynamic-value
//! unwrapping, inheritance hop counts).
//!
//! Given the same input the emitter produces byte-identical C and an
//! identical tag set; nothing here consults the environment.
//!
//! # Module Structure
//!
//! - [`error`] - Codegen error types
//! - `features` - Runtime feature tags
//! - `types` - Tusmo-to-C type mapping
//! - `expr` - Expression lowering
//! - `stmt` - Statement lowering
//! - `class_def` - Struct, method and creator emission
//! - `array` - Array literals, access and builtin methods
//! - `dict` - Dictionary literals and operations
//! - `tests` - Unit tests (test-only)

mod array;
mod class_def;
mod dict;
mod error;
mod expr;
mod features;
mod stmt;
mod types;


pub use error::{CodegenError, CodegenErrorKind};
pub use features::{Feature, FeatureSet};

use crate::ast::{Stmt, Type};
use crate::semantic::{SymbolTable, infer};

/// An embedded `__C_CODE__` chunk, hoisted to the top of the output.
struct EmbeddedChunk {
    code: String,
    file: String,
    line: usize,
}

/// The result of a translation: the C source and its feature tags.
#[derive(Debug)]
pub struct COutput {
    /// The complete C translation unit.
    pub c_code: String,
    /// The runtime features the C code references.
    pub features: FeatureSet,
}

/// The tree-directed C emitter.
pub struct Codegen {
    /// The symbol table from semantic analysis; the generator pushes and
    /// pops scopes as it walks so local types resolve during emission.
    pub(super) symbols: SymbolTable,
    /// Struct definitions, one per class, in source order.
    struct_defs: String,
    /// Free functions, methods and synthesized creators.
    function_defs: String,
    /// The statement buffer currently being filled; the main body at top
    /// level, swapped out while a function body is generated.
    body: String,
    /// Embedded C chunks in source order.
    embedded: Vec<EmbeddedChunk>,
    /// The features used so far.
    features: FeatureSet,
    /// Counter for generated temporaries.
    temp_counter: usize,
    /// The class whose methods are being generated, if any.
    current_class: Option<String>,
}

impl Codegen {
    /// Creates a generator over the analyzer's symbol table.
    pub fn new(symbols: SymbolTable) -> Self {
        Codegen {
            symbols,
            struct_defs: String::new(),
            function_defs: String::new(),
            body: String::new(),
            embedded: Vec::new(),
            features: FeatureSet::new(),
            temp_counter: 0,
            current_class: None,
        }
    }

    /// Generates the whole translation unit.
    pub fn generate(&mut self, ast: &[Stmt]) -> Result<COutput, CodegenError> {
        for stmt in ast {
            self.gen_stmt(stmt)?;
        }
        Ok(COutput {
            c_code: self.assemble(),
            features: self.features.clone(),
        })
    }

    fn assemble(&self) -> String {
        let mut out = String::from("#include \"tusmo_runtime.h\"\n\n");

        if !self.embedded.is_empty() {
            for chunk in &self.embedded {
                out.push_str(&format!(
                    "/* Embedded C from {}:{} */\n",
                    chunk.file, chunk.line
                ));
                out.push_str(&chunk.code);
                if !chunk.code.ends_with('\n') {
                    out.push('\n');
                }
            }
            out.push('\n');
        }

        out.push_str(&self.struct_defs);
        out.push_str(&self.function_defs);
        out.push_str("int main(void) {\n    GC_INIT();\n");
        out.push_str(&self.body);
        out.push_str("    return 0;\n}\n");
        out
    }

    /// Allocates a fresh temporary variable name.
    pub(super) fn temp_var(&mut self) -> String {
        self.temp_counter += 1;
        format!("__tusmo_temp_{}", self.temp_counter)
    }

    /// Appends one statement line to the current body buffer.
    pub(super) fn emit(&mut self, line: &str) {
        self.body.push_str("    ");
        self.body.push_str(line);
        self.body.push('\n');
    }

    /// Computes the static type of an expression against the current
    /// scope state, or `None` when inference fails.
    pub(super) fn type_of(&self, expr: &crate::ast::Expr) -> Option<Type> {
        infer::type_of_lenient(&self.symbols, expr)
    }

    /// Records an embedded C chunk.
    pub(super) fn push_embedded(&mut self, code: &str, file: &str, line: usize) {
        self.embedded.push(EmbeddedChunk {
            code: code.to_string(),
            file: file.to_string(),
            line,
        });
    }

    /// Adds a feature tag.
    pub(super) fn use_feature(&mut self, feature: Feature) {
        self.features.add(feature);
    }

    /// Swaps in an empty body buffer, runs `f`, and returns what it
    /// emitted, restoring the previous buffer. Used for function bodies.
    pub(super) fn capture_body<F>(&mut self, f: F) -> Result<String, CodegenError>
    where
        F: FnOnce(&mut Self) -> Result<(), CodegenError>,
    {
        let saved = std::mem::take(&mut self.body);
        let result = f(self);
        let captured = std::mem::replace(&mut self.body, saved);
        result.map(|_| captured)
    }
}
