//! The Tusmo compiler library.
//!
//! Tusmo is a small Somali-keyword programming language that compiles to
//! portable C. This library provides the full pipeline from source text to
//! an emitted C translation unit plus the set of runtime feature tags an
//! external build driver uses to pick which runtime sources to link.
//!
//! # Modules
//!
//! - [`token`] - Token types and source location tracking
//! - [`lexer`] - Lexical analysis (tokenization)
//! - [`ast`] - Abstract Syntax Tree and type lattice definitions
//! - [`parser`] - Recursive descent parser
//! - [`docstring`] - Docstring preprocessing and attachment
//! - [`fstring`] - Formatted-string lowering
//! - [`resolver`] - Module (`keen`) import resolution
//! - [`semantic`] - Scope-aware semantic analysis
//! - [`builtins`] - The built-in function registry
//! - [`codegen`] - C code generation and feature tagging
//! - [`docindex`] - Editor hover documentation index
//! - [`driver`] - Pipeline orchestration
//!
//! # Example
//!
//! ```no_run
//! use tusmo::driver;
//!
//! let source = r#"qor("Salaan, Adduunyo!");"#;
//! let output = driver::compile_source(source, "salaan.tus").expect("compile error");
//!
//! assert!(output.c_code.contains("printf"));
//! assert!(output.features.contains(tusmo::codegen::Feature::Io));
//! ```

pub mod ast;
pub mod builtins;
pub mod codegen;
pub mod docindex;
pub mod docstring;
pub mod driver;
pub mod fstring;
pub mod lexer;
pub mod parser;
pub mod resolver;
pub mod semantic;
pub mod token;
