//! Pipeline orchestration.
//!
//! Runs the whole compilation, in order: read the entry file, preprocess
//! docstring shorthand, lex, parse, resolve imports (which lexes and
//! parses every imported module), attach docstrings, resolve formatted
//! strings, analyze, and generate C. The result carries the C text, the
//! feature tags, and a filename-to-source map so a host can render
//! diagnostics for any file that participated.
//!
//! The pipeline is synchronous and deterministic: the same input files
//! produce byte-identical C and an identical tag set, and no partial
//! output escapes on failure.

use crate::codegen::{COutput, Codegen, CodegenError, FeatureSet};
use crate::docstring;
use crate::fstring;
use crate::lexer::{LexDiagnostic, Lexer};
use crate::parser::{ParseError, Parser};
use crate::resolver::{ModuleResolver, ResolveError};
use crate::semantic::{SemanticAnalyzer, SemanticError};

use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// A successful compilation.
#[derive(Debug)]
pub struct BuildOutput {
    /// The emitted C translation unit.
    pub c_code: String,
    /// The runtime feature tags the build driver links against.
    pub features: FeatureSet,
    /// Preprocessed source per filename, for diagnostics rendering.
    pub sources: HashMap<String, String>,
    /// Non-fatal lexical diagnostics from every file.
    pub lex_diagnostics: Vec<LexDiagnostic>,
}

/// A compilation error from any phase of the pipeline.
#[derive(Debug)]
pub enum CompileError {
    /// A source file could not be read.
    Io {
        /// The path that failed.
        path: PathBuf,
        /// The underlying error.
        source: std::io::Error,
    },
    /// A syntax error in the entry file.
    Parse(ParseError),
    /// An import could not be resolved, or an imported module failed to
    /// parse.
    Resolve(ResolveError),
    /// A semantic error anywhere in the translation unit.
    Semantic(SemanticError),
    /// A code generation failure; internal after a clean analysis.
    Codegen(CodegenError),
}

impl std::fmt::Display for CompileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompileError::Io { path, source } => {
                write!(f, "Failed to read '{}': {}", path.display(), source)
            }
            CompileError::Parse(e) => write!(f, "{}", e),
            CompileError::Resolve(e) => write!(f, "{}", e),
            CompileError::Semantic(e) => write!(f, "{}", e),
            CompileError::Codegen(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for CompileError {}

impl From<ParseError> for CompileError {
    fn from(e: ParseError) -> Self {
        CompileError::Parse(e)
    }
}

impl From<ResolveError> for CompileError {
    fn from(e: ResolveError) -> Self {
        CompileError::Resolve(e)
    }
}

impl From<SemanticError> for CompileError {
    fn from(e: SemanticError) -> Self {
        CompileError::Semantic(e)
    }
}

impl From<CodegenError> for CompileError {
    fn from(e: CodegenError) -> Self {
        CompileError::Codegen(e)
    }
}

/// Compiles the entry file at `path`, resolving imports against its
/// directory, the project `lib/` root, and `stdlib_root` when given.
pub fn compile_file(path: &Path, stdlib_root: Option<&Path>) -> Result<BuildOutput, CompileError> {
    let raw = std::fs::read_to_string(path).map_err(|e| CompileError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    let filename = path.display().to_string();
    let entry_dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    compile(&raw, &filename, &entry_dir, stdlib_root, Some(path))
}

/// Compiles an in-memory buffer. Imports resolve against the parent
/// directory of `filename`, falling back to the working directory.
pub fn compile_source(source: &str, filename: &str) -> Result<BuildOutput, CompileError> {
    let entry_dir = Path::new(filename)
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    compile(source, filename, &entry_dir, None, None)
}

fn compile(
    raw: &str,
    filename: &str,
    entry_dir: &Path,
    stdlib_root: Option<&Path>,
    entry_path: Option<&Path>,
) -> Result<BuildOutput, CompileError> {
    let source = docstring::preprocess(raw);

    let mut lexer = Lexer::new(&source, filename);
    let lex_output = lexer.tokenize();
    let mut lex_diagnostics = lex_output.diagnostics;

    let mut parser = Parser::new(lex_output.tokens, filename);
    let entry_ast = parser.parse()?;

    let mut resolver = ModuleResolver::new(entry_dir, stdlib_root.map(Path::to_path_buf));
    if let Some(entry_path) = entry_path {
        resolver.mark_seen(entry_path);
    }
    let unit = resolver.resolve(entry_ast, entry_dir)?;
    let mut ast = unit.nodes;
    let mut sources = unit.sources;
    sources.insert(filename.to_string(), source);
    lex_diagnostics.extend(unit.diagnostics);

    fstring::resolve(&mut ast)?;
    docstring::attach(&mut ast);

    let mut analyzer = SemanticAnalyzer::new();
    analyzer.analyze(&mut ast)?;

    let mut generator = Codegen::new(analyzer.into_symbols());
    let COutput { c_code, features } = generator.generate(&ast)?;

    Ok(BuildOutput {
        c_code,
        features,
        sources,
        lex_diagnostics,
    })
}
