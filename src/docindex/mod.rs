//! Editor hover documentation index.
//!
//! Editors reuse the compiler frontend to build hover documentation: the
//! entry points here re-run docstring preprocessing, lexing, parsing,
//! docstring attachment and (optionally) `keen` traversal, but skip
//! semantic analysis and code generation entirely.
//!
//! The index maps both unqualified names and `Class.method` qualified
//! names to [`DocEntry`] values. Parsing errors are swallowed - a broken
//! buffer yields an empty index - because this runs on every editor
//! change event and must never take the hosting process down. This is
//! the one externally observable interface that reaches into the core's
//! internals, so its shape stays stable.
//!
//! Each invocation builds fresh lexer and parser instances, so
//! concurrent documents cannot leak line-counter state into each other.

use crate::ast::{ClassDecl, FunctionDecl, Param, Stmt, StmtKind};
use crate::docstring;
use crate::lexer::Lexer;
use crate::parser::Parser;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// The kind of documented item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocKind {
    /// A class (`koox`).
    Class,
    /// A free function.
    Function,
    /// A method on a class.
    Method,
}

/// A single hover/documentation entry.
#[derive(Debug, Clone, PartialEq)]
pub struct DocEntry {
    /// The name shown to the user (`Qof.hadal` for methods).
    pub display_name: String,
    /// What kind of item this documents.
    pub kind: DocKind,
    /// A rendered signature.
    pub signature: String,
    /// The attached docstring, trimmed.
    pub docstring: String,
}

/// A lookup table of documentation entries.
#[derive(Debug, Default)]
pub struct DocIndex {
    entries: HashMap<String, Vec<DocEntry>>,
}

impl DocIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        DocIndex {
            entries: HashMap::new(),
        }
    }

    /// Adds an entry under `key`, skipping exact duplicates.
    pub fn add(&mut self, key: impl Into<String>, entry: DocEntry) {
        let bucket = self.entries.entry(key.into()).or_default();
        if !bucket.contains(&entry) {
            bucket.push(entry);
        }
    }

    /// Returns the entries registered under `key`.
    pub fn lookup(&self, key: &str) -> &[DocEntry] {
        self.entries.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns true when the index holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Merges every entry of `other` into this index.
    pub fn merge(&mut self, other: DocIndex) {
        for (key, entries) in other.entries {
            for entry in entries {
                self.add(key.clone(), entry);
            }
        }
    }
}

/// Builds a documentation index for one source buffer.
///
/// Never fails: a buffer that does not parse (the user is mid-keystroke)
/// simply produces an empty index.
pub fn build_doc_index(source: &str, filename: &str) -> DocIndex {
    let mut index = DocIndex::new();
    let Some(ast) = safe_parse(source, filename) else {
        return index;
    };
    collect(&ast, &mut index);
    index
}

/// Builds a documentation index for `source` and recursively for every
/// module it imports via `keen`. `filename` should be absolute so
/// relative imports resolve reliably; `extra_search_roots` are consulted
/// after the importing file's directory.
pub fn build_doc_index_with_imports(
    source: &str,
    filename: &str,
    extra_search_roots: &[PathBuf],
) -> DocIndex {
    let mut visited = std::collections::HashSet::new();
    let path = Path::new(filename);
    if let Ok(canonical) = path.canonicalize() {
        visited.insert(canonical);
    }
    build_recursive(source, path, extra_search_roots, &mut visited)
}

fn build_recursive(
    source: &str,
    path: &Path,
    search_roots: &[PathBuf],
    visited: &mut std::collections::HashSet<PathBuf>,
) -> DocIndex {
    let mut index = DocIndex::new();
    let Some(ast) = safe_parse(source, &path.display().to_string()) else {
        return index;
    };
    collect(&ast, &mut index);

    let current_dir = path.parent().unwrap_or(Path::new("."));
    for node in &ast {
        let StmtKind::Import(module) = &node.kind else {
            continue;
        };
        let Some(module_path) = resolve_module(module, current_dir, search_roots) else {
            continue;
        };
        let Ok(canonical) = module_path.canonicalize() else {
            continue;
        };
        if !visited.insert(canonical.clone()) {
            continue;
        }
        let Ok(child_source) = std::fs::read_to_string(&canonical) else {
            continue;
        };
        let child = build_recursive(&child_source, &canonical, search_roots, visited);
        index.merge(child);
    }
    index
}

/// Parses a buffer, attaching docstrings; `None` on any parse error.
fn safe_parse(source: &str, filename: &str) -> Option<Vec<Stmt>> {
    let preprocessed = docstring::preprocess(source);
    // Lexical diagnostics are non-fatal and irrelevant for hovers.
    let tokens = Lexer::new(&preprocessed, filename).tokenize().tokens;
    let mut ast = Parser::new(tokens, filename).parse().ok()?;
    docstring::attach(&mut ast);
    Some(ast)
}

fn collect(ast: &[Stmt], index: &mut DocIndex) {
    for node in ast {
        match &node.kind {
            StmtKind::Class(class) => {
                record_class(class, index);
                for method in &class.methods {
                    record_function(method, Some(&class.name), index);
                }
            }
            StmtKind::Function(func) => record_function(func, None, index),
            _ => {}
        }
    }
}

fn record_class(class: &ClassDecl, index: &mut DocIndex) {
    let Some(docstring) = &class.docstring else {
        return;
    };
    index.add(
        class.name.clone(),
        DocEntry {
            display_name: class.name.clone(),
            kind: DocKind::Class,
            signature: format!("koox {}", class.name),
            docstring: docstring.trim().to_string(),
        },
    );
}

fn record_function(func: &FunctionDecl, class_name: Option<&str>, index: &mut DocIndex) {
    let Some(docstring) = &func.docstring else {
        return;
    };
    let (display_name, kind) = match class_name {
        Some(class) => (format!("{}.{}", class, func.name), DocKind::Method),
        None => (func.name.clone(), DocKind::Function),
    };
    let entry = DocEntry {
        display_name: display_name.clone(),
        kind,
        signature: format_signature(func, class_name),
        docstring: docstring.trim().to_string(),
    };
    index.add(func.name.clone(), entry.clone());
    if class_name.is_some() {
        index.add(display_name, entry);
    }
}

fn format_signature(func: &FunctionDecl, class_name: Option<&str>) -> String {
    let params: Vec<String> = func.params.iter().map(format_param).collect();
    let qualifier = class_name.map(|c| format!("{}.", c)).unwrap_or_default();
    format!(
        "{}{}({}) : {}",
        qualifier,
        func.name,
        params.join(", "),
        func.return_type
    )
}

fn format_param(param: &Param) -> String {
    format!("{}: {}", param.name, param.ty)
}

/// Resolves a `keen` target against the importing directory, the extra
/// search roots, and finally the working directory.
fn resolve_module(module: &str, current_dir: &Path, search_roots: &[PathBuf]) -> Option<PathBuf> {
    let target = if module.ends_with(".tus") {
        module.to_string()
    } else {
        format!("{}.tus", module)
    };
    let target = Path::new(&target);
    if target.is_absolute() {
        return target.is_file().then(|| target.to_path_buf());
    }

    let mut candidates = vec![current_dir.join(target)];
    for root in search_roots {
        candidates.push(root.join(target));
    }
    if let Ok(cwd) = std::env::current_dir() {
        candidates.push(cwd.join(target));
    }
    candidates.into_iter().find(|c| c.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = "\
koox Qof {
  \"Qof aasaasi ah.\";
  keyd : eray magac;
  hawl hadal() : waxbo { \"Wuu hadlaa.\"; qor(kan.magac); }
}
hawl isuGee(a: tiro, b: tiro = 1) : tiro { \"Isu geyn.\"; soo_celi a + b; }
hawl aan_doc_lahayn() : waxbo { }
";

    #[test]
    fn test_class_and_method_entries() {
        let index = build_doc_index(SOURCE, "qof.tus");

        let class = index.lookup("Qof");
        assert_eq!(class.len(), 1);
        assert_eq!(class[0].kind, DocKind::Class);
        assert_eq!(class[0].signature, "koox Qof");
        assert_eq!(class[0].docstring, "Qof aasaasi ah.");

        let qualified = index.lookup("Qof.hadal");
        assert_eq!(qualified.len(), 1);
        assert_eq!(qualified[0].kind, DocKind::Method);
        assert_eq!(qualified[0].signature, "Qof.hadal() : waxbo");

        // Unqualified method lookup also resolves.
        assert_eq!(index.lookup("hadal"), qualified);
    }

    #[test]
    fn test_function_signature_includes_defaults_types() {
        let index = build_doc_index(SOURCE, "qof.tus");
        let entries = index.lookup("isuGee");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].kind, DocKind::Function);
        assert_eq!(entries[0].signature, "isuGee(a: tiro, b: tiro) : tiro");
        assert_eq!(entries[0].docstring, "Isu geyn.");
    }

    #[test]
    fn test_undocumented_items_are_skipped() {
        let index = build_doc_index(SOURCE, "qof.tus");
        assert!(index.lookup("aan_doc_lahayn").is_empty());
    }

    #[test]
    fn test_broken_source_yields_empty_index() {
        let index = build_doc_index("koox { { {", "jaban.tus");
        assert!(index.is_empty());
    }

    #[test]
    fn test_compact_doc_lines_are_indexed() {
        let source = "hawl f() : waxbo {\n    :qoraal kooban:\n}\n";
        let index = build_doc_index(source, "f.tus");
        let entries = index.lookup("f");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].docstring, "qoraal kooban");
    }

    #[test]
    fn test_duplicate_entries_collapse() {
        let mut index = DocIndex::new();
        let entry = DocEntry {
            display_name: "f".to_string(),
            kind: DocKind::Function,
            signature: "f() : waxbo".to_string(),
            docstring: "doc".to_string(),
        };
        index.add("f", entry.clone());
        index.add("f", entry);
        assert_eq!(index.lookup("f").len(), 1);
    }

    #[test]
    fn test_imports_are_walked() {
        let temp = tempfile::tempdir().unwrap();
        let helper = temp.path().join("caawiye.tus");
        std::fs::write(
            &helper,
            "hawl caawi() : waxbo { \"Wax caawiye ah.\"; }\n",
        )
        .unwrap();
        let entry_path = temp.path().join("main.tus");
        let entry_source = "keen \"caawiye\";\nhawl gudaha() : waxbo { \"Gudaha.\"; }\n";
        std::fs::write(&entry_path, entry_source).unwrap();

        let index = build_doc_index_with_imports(
            entry_source,
            &entry_path.display().to_string(),
            &[],
        );
        assert_eq!(index.lookup("gudaha").len(), 1);
        assert_eq!(index.lookup("caawi").len(), 1);
    }

    #[test]
    fn test_import_cycles_terminate() {
        let temp = tempfile::tempdir().unwrap();
        std::fs::write(
            temp.path().join("a.tus"),
            "keen \"b\";\nhawl laga_a() : waxbo { \"A.\"; }\n",
        )
        .unwrap();
        std::fs::write(
            temp.path().join("b.tus"),
            "keen \"a\";\nhawl laga_b() : waxbo { \"B.\"; }\n",
        )
        .unwrap();

        let entry = temp.path().join("a.tus");
        let source = std::fs::read_to_string(&entry).unwrap();
        let index =
            build_doc_index_with_imports(&source, &entry.display().to_string(), &[]);
        assert_eq!(index.lookup("laga_a").len(), 1);
        assert_eq!(index.lookup("laga_b").len(), 1);
    }

    #[test]
    fn test_missing_import_is_ignored() {
        let source = "keen \"ma_jiro\";\nhawl f() : waxbo { \"F.\"; }\n";
        let index = build_doc_index_with_imports(source, "/ma/jiro/main.tus", &[]);
        assert_eq!(index.lookup("f").len(), 1);
    }
}
