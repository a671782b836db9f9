//! The symbol table: a lexically scoped mapping from names to symbols.
//!
//! The bottom scope is the global scope and never pops. Entries are
//! variables (including function-typed variables), function declarations,
//! and class definitions; class definitions carry enough of the class AST
//! (members, method signatures, parent link) for inheritance-chain walks
//! during both analysis and code generation.

use crate::ast::{ClassDecl, FunctionDecl, Param, Type};
use std::collections::HashMap;

/// The callable surface of a function or method: what call resolution and
/// type checking need, without the body.
#[derive(Debug, Clone)]
pub struct FunctionSig {
    /// The function name.
    pub name: String,
    /// The parameters, including default value expressions.
    pub params: Vec<Param>,
    /// The declared return type.
    pub return_type: Type,
}

impl From<&FunctionDecl> for FunctionSig {
    fn from(decl: &FunctionDecl) -> Self {
        FunctionSig {
            name: decl.name.clone(),
            params: decl.params.clone(),
            return_type: decl.return_type.clone(),
        }
    }
}

/// A registered class definition.
#[derive(Debug, Clone)]
pub struct ClassInfo {
    /// The class name.
    pub name: String,
    /// The resolved parent class name, if the class inherits.
    pub parent: Option<String>,
    /// Member fields in declaration order.
    pub members: Vec<(String, Type)>,
    /// Method signatures in declaration order (`dhis` included).
    pub methods: Vec<FunctionSig>,
}

impl ClassInfo {
    /// Builds the registration record from a class declaration.
    pub fn from_decl(decl: &ClassDecl) -> Self {
        ClassInfo {
            name: decl.name.clone(),
            parent: decl.parent.clone(),
            members: decl
                .members
                .iter()
                .map(|m| (m.name.clone(), m.ty.clone()))
                .collect(),
            methods: decl.methods.iter().map(FunctionSig::from).collect(),
        }
    }

    /// Looks up a method declared directly on this class.
    pub fn method(&self, name: &str) -> Option<&FunctionSig> {
        self.methods.iter().find(|m| m.name == name)
    }

    /// Looks up a member declared directly on this class.
    pub fn member(&self, name: &str) -> Option<&Type> {
        self.members
            .iter()
            .find(|(member, _)| member == name)
            .map(|(_, ty)| ty)
    }
}

/// An entry in the symbol table.
#[derive(Debug, Clone)]
pub enum Symbol {
    /// A variable (or parameter) with its declared type. Function-typed
    /// variables are variables whose type is [`Type::Function`].
    Variable(Type),
    /// A declared function or method.
    Function(FunctionSig),
    /// A class definition.
    Class(ClassInfo),
}

/// A stack of scope frames. The bottom frame is the global scope.
pub struct SymbolTable {
    scopes: Vec<HashMap<String, Symbol>>,
}

impl SymbolTable {
    /// Creates a symbol table holding only the global scope.
    pub fn new() -> Self {
        SymbolTable {
            scopes: vec![HashMap::new()],
        }
    }

    /// Enters a new scope.
    pub fn push_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    /// Exits the current scope. The global scope never pops.
    pub fn pop_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    /// Defines `name` in the current scope, replacing any earlier entry
    /// in that scope. Duplicate checks are the caller's job (via
    /// [`in_current_scope`](Self::in_current_scope)); code generation
    /// re-registers names it walks past.
    pub fn define(&mut self, name: impl Into<String>, symbol: Symbol) {
        self.scopes
            .last_mut()
            .expect("symbol table always has a global scope")
            .insert(name.into(), symbol);
    }

    /// Defines `name` in the global scope. Returns false (and leaves the
    /// table unchanged) when the name is already defined globally.
    pub fn define_global(&mut self, name: impl Into<String>, symbol: Symbol) -> bool {
        let name = name.into();
        let global = &mut self.scopes[0];
        if global.contains_key(&name) {
            return false;
        }
        global.insert(name, symbol);
        true
    }

    /// Looks `name` up, innermost scope first.
    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }

    /// Returns true if `name` is defined in the current scope.
    pub fn in_current_scope(&self, name: &str) -> bool {
        self.scopes
            .last()
            .expect("symbol table always has a global scope")
            .contains_key(name)
    }

    /// Returns true if `name` is defined in the global scope.
    pub fn in_global_scope(&self, name: &str) -> bool {
        self.scopes[0].contains_key(name)
    }

    /// Looks up a class definition by name.
    pub fn lookup_class(&self, name: &str) -> Option<&ClassInfo> {
        match self.lookup(name) {
            Some(Symbol::Class(info)) => Some(info),
            _ => None,
        }
    }

    /// Finds `member` on `class` or an ancestor. Returns the member type
    /// and the number of `parent` hops to reach the owning class.
    pub fn find_member(&self, class: &str, member: &str) -> Option<(Type, usize)> {
        let mut current = class.to_string();
        let mut depth = 0;
        let mut guard = 0;
        loop {
            let info = self.lookup_class(&current)?;
            if let Some(ty) = info.member(member) {
                return Some((ty.clone(), depth));
            }
            current = info.parent.clone()?;
            depth += 1;
            guard += 1;
            if guard > self.scopes.iter().map(|s| s.len()).sum::<usize>() {
                // A cycle slipped past analysis; give up rather than spin.
                return None;
            }
        }
    }

    /// Finds `method` on `class` or an ancestor. Returns the signature
    /// and the name of the owning class.
    pub fn find_method(&self, class: &str, method: &str) -> Option<(FunctionSig, String)> {
        let mut current = class.to_string();
        let mut guard = 0;
        loop {
            let info = self.lookup_class(&current)?;
            if let Some(sig) = info.method(method) {
                return Some((sig.clone(), current));
            }
            current = info.parent.clone()?;
            guard += 1;
            if guard > self.scopes.iter().map(|s| s.len()).sum::<usize>() {
                return None;
            }
        }
    }

    /// Counts the `parent` hops from `class` up to `ancestor`. Zero when
    /// they are the same class; `None` when `ancestor` is not on the
    /// chain.
    pub fn inheritance_depth(&self, class: &str, ancestor: &str) -> Option<usize> {
        let mut current = class.to_string();
        let mut depth = 0;
        let mut guard = 0;
        loop {
            if current == ancestor {
                return Some(depth);
            }
            let info = self.lookup_class(&current)?;
            current = info.parent.clone()?;
            depth += 1;
            guard += 1;
            if guard > self.scopes.iter().map(|s| s.len()).sum::<usize>() {
                return None;
            }
        }
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::Span;

    fn class(name: &str, parent: Option<&str>, members: &[(&str, Type)]) -> ClassInfo {
        ClassInfo {
            name: name.to_string(),
            parent: parent.map(str::to_string),
            members: members
                .iter()
                .map(|(n, t)| (n.to_string(), t.clone()))
                .collect(),
            methods: vec![FunctionSig {
                name: format!("{}_hawl", name.to_lowercase()),
                params: vec![],
                return_type: Type::Void,
            }],
        }
    }

    #[test]
    fn test_scoped_lookup_and_shadowing() {
        let mut table = SymbolTable::new();
        table.define("x", Symbol::Variable(Type::Int));
        table.push_scope();
        table.define("x", Symbol::Variable(Type::Str));
        assert!(matches!(
            table.lookup("x"),
            Some(Symbol::Variable(Type::Str))
        ));
        table.pop_scope();
        assert!(matches!(
            table.lookup("x"),
            Some(Symbol::Variable(Type::Int))
        ));
    }

    #[test]
    fn test_global_scope_never_pops() {
        let mut table = SymbolTable::new();
        table.define("x", Symbol::Variable(Type::Int));
        table.pop_scope();
        table.pop_scope();
        assert!(table.lookup("x").is_some());
        assert!(table.in_global_scope("x"));
    }

    #[test]
    fn test_define_global_rejects_duplicates() {
        let mut table = SymbolTable::new();
        assert!(table.define_global("f", Symbol::Variable(Type::Int)));
        assert!(!table.define_global("f", Symbol::Variable(Type::Str)));
    }

    #[test]
    fn test_define_global_from_inner_scope() {
        let mut table = SymbolTable::new();
        table.push_scope();
        assert!(table.define_global("f", Symbol::Variable(Type::Int)));
        table.pop_scope();
        assert!(table.in_global_scope("f"));
    }

    #[test]
    fn test_member_lookup_walks_parent_chain() {
        let mut table = SymbolTable::new();
        table.define(
            "Qof",
            Symbol::Class(class("Qof", None, &[("magac", Type::Str)])),
        );
        table.define(
            "Ardayga",
            Symbol::Class(class("Ardayga", Some("Qof"), &[("fasalka", Type::Int)])),
        );

        let (ty, depth) = table.find_member("Ardayga", "fasalka").unwrap();
        assert_eq!(ty, Type::Int);
        assert_eq!(depth, 0);

        let (ty, depth) = table.find_member("Ardayga", "magac").unwrap();
        assert_eq!(ty, Type::Str);
        assert_eq!(depth, 1);

        assert!(table.find_member("Ardayga", "ma_jiro").is_none());
    }

    #[test]
    fn test_method_lookup_reports_owner() {
        let mut table = SymbolTable::new();
        table.define("Qof", Symbol::Class(class("Qof", None, &[])));
        table.define("Ardayga", Symbol::Class(class("Ardayga", Some("Qof"), &[])));

        let (_, owner) = table.find_method("Ardayga", "qof_hawl").unwrap();
        assert_eq!(owner, "Qof");
        let (_, owner) = table.find_method("Ardayga", "ardayga_hawl").unwrap();
        assert_eq!(owner, "Ardayga");
    }

    #[test]
    fn test_inheritance_depth() {
        let mut table = SymbolTable::new();
        table.define("A", Symbol::Class(class("A", None, &[])));
        table.define("B", Symbol::Class(class("B", Some("A"), &[])));
        table.define("C", Symbol::Class(class("C", Some("B"), &[])));

        assert_eq!(table.inheritance_depth("C", "C"), Some(0));
        assert_eq!(table.inheritance_depth("C", "B"), Some(1));
        assert_eq!(table.inheritance_depth("C", "A"), Some(2));
        assert_eq!(table.inheritance_depth("A", "C"), None);
    }

    #[test]
    fn test_function_sig_from_decl() {
        let decl = FunctionDecl {
            name: "f".to_string(),
            params: vec![Param {
                name: "a".to_string(),
                ty: Type::Int,
                default: None,
                span: Span::new(0, 0, 1, 1),
            }],
            return_type: Type::Str,
            body: vec![],
            docstring: None,
            span: Span::new(0, 0, 1, 1),
            file: "test.tus".to_string(),
        };
        let sig = FunctionSig::from(&decl);
        assert_eq!(sig.name, "f");
        assert_eq!(sig.params.len(), 1);
        assert_eq!(sig.return_type, Type::Str);
    }
}
