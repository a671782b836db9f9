//! Module resolution for multi-file Tusmo programs.
//!
//! A `keen "module";` statement splices the referenced file's top-level
//! nodes into the translation unit in place of the import. Resolution is
//! depth-first and preserves import order, so a module's definitions land
//! before the code that imported them.
//!
//! # Search order
//!
//! The requested module name is normalized to a `.tus` suffix, then looked
//! up under, in order:
//!
//! 1. the importing file's directory,
//! 2. the project-local `lib/` root (next to the entry file),
//! 3. the standard-library root, when one is configured.
//!
//! The first existing file wins; a miss in all three aborts with a
//! diagnostic naming the module and the import location.
//!
//! # Cycles
//!
//! A set of already-processed canonical paths prevents re-import: the
//! second visit of a file contributes no nodes and recursion stops there,
//! so import cycles are silently short-circuited rather than diagnosed.

mod error;

pub use error::{ResolveError, ResolveErrorKind};

use crate::ast::{Stmt, StmtKind};
use crate::docstring;
use crate::lexer::{LexDiagnostic, Lexer};
use crate::parser::Parser;

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// The flattened translation unit produced by import resolution.
#[derive(Debug)]
pub struct ResolvedUnit {
    /// All top-level nodes, imports replaced by the imported files'
    /// nodes, in import order.
    pub nodes: Vec<Stmt>,
    /// Preprocessed source text per filename, for diagnostics. Keys match
    /// the filenames stamped on the nodes.
    pub sources: HashMap<String, String>,
    /// Non-fatal lexical diagnostics from every imported module.
    pub diagnostics: Vec<LexDiagnostic>,
}

/// Resolves `keen` imports for one compilation.
pub struct ModuleResolver {
    /// The project-local `lib/` root, anchored at the entry file's
    /// directory.
    lib_root: PathBuf,
    /// The standard-library root, if configured.
    stdlib_root: Option<PathBuf>,
    /// Canonical paths already spliced into the unit.
    seen: HashSet<PathBuf>,
}

impl ModuleResolver {
    /// Creates a resolver for a compilation whose entry file lives in
    /// `entry_dir`.
    pub fn new(entry_dir: &Path, stdlib_root: Option<PathBuf>) -> Self {
        ModuleResolver {
            lib_root: entry_dir.join("lib"),
            stdlib_root,
            seen: HashSet::new(),
        }
    }

    /// Marks a path as already processed. The driver registers the entry
    /// file here so a module importing the entry back is short-circuited.
    pub fn mark_seen(&mut self, path: &Path) {
        if let Ok(canonical) = path.canonicalize() {
            self.seen.insert(canonical);
        }
    }

    /// Resolves all imports in `nodes`, recursively. `base_dir` is the
    /// directory of the file the nodes were parsed from.
    pub fn resolve(
        &mut self,
        nodes: Vec<Stmt>,
        base_dir: &Path,
    ) -> Result<ResolvedUnit, ResolveError> {
        let mut unit = ResolvedUnit {
            nodes: Vec::new(),
            sources: HashMap::new(),
            diagnostics: Vec::new(),
        };
        self.resolve_into(nodes, base_dir, &mut unit)?;
        Ok(unit)
    }

    fn resolve_into(
        &mut self,
        nodes: Vec<Stmt>,
        base_dir: &Path,
        unit: &mut ResolvedUnit,
    ) -> Result<(), ResolveError> {
        for node in nodes {
            let StmtKind::Import(module) = &node.kind else {
                unit.nodes.push(node);
                continue;
            };

            let file_name = normalize_module_name(module);
            let Some(found) = self.locate(&file_name, base_dir) else {
                return Err(ResolveError::module_not_found(
                    module,
                    node.span,
                    node.file.clone(),
                ));
            };

            let canonical = found
                .canonicalize()
                .map_err(|e| ResolveError::io_error(&found, &e, Some(node.span), &node.file))?;
            if !self.seen.insert(canonical.clone()) {
                // Already spliced; cycles and repeats contribute nothing.
                continue;
            }

            let raw = std::fs::read_to_string(&canonical).map_err(|e| {
                ResolveError::io_error(&canonical, &e, Some(node.span), &node.file)
            })?;
            let source = docstring::preprocess(&raw);
            let display_name = canonical.display().to_string();

            let mut lexer = Lexer::new(&source, display_name.clone());
            let lex_output = lexer.tokenize();
            unit.diagnostics.extend(lex_output.diagnostics);

            let mut parser = Parser::new(lex_output.tokens, display_name.clone());
            let imported = parser.parse().map_err(|e| {
                ResolveError::parse_error_in_module(display_name.clone(), &e, source.clone())
            })?;

            unit.sources.insert(display_name, source);

            let child_dir = canonical
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| base_dir.to_path_buf());
            self.resolve_into(imported, &child_dir, unit)?;
        }
        Ok(())
    }

    /// Returns the first existing candidate for `file_name` under the
    /// search roots.
    fn locate(&self, file_name: &str, base_dir: &Path) -> Option<PathBuf> {
        let mut candidates = vec![base_dir.join(file_name), self.lib_root.join(file_name)];
        if let Some(stdlib) = &self.stdlib_root {
            candidates.push(stdlib.join(file_name));
        }
        candidates.into_iter().find(|c| c.is_file())
    }
}

/// Normalizes a requested module name to a `.tus` file name.
fn normalize_module_name(module: &str) -> String {
    if module.ends_with(".tus") {
        module.to_string()
    } else {
        format!("{}.tus", module)
    }
}
