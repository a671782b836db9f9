//! Function and class declaration nodes.

use super::expr::Expr;
use super::stmt::Stmt;
use super::types::Type;
use crate::token::Span;

/// A function parameter, with an optional default value.
#[derive(Debug, Clone)]
pub struct Param {
    /// The parameter name.
    pub name: String,
    /// The parameter type.
    pub ty: Type,
    /// The default value, if any. Parameters with defaults must follow
    /// parameters without; the analyzer enforces this.
    pub default: Option<Expr>,
    /// The parameter's source location.
    pub span: Span,
}

/// A function declaration (`hawl`/`shaqo`), or a method when it appears
/// inside a class body. A constructor is a method named `dhis` with an
/// implicit `waxbo` return.
#[derive(Debug, Clone)]
pub struct FunctionDecl {
    /// The function name.
    pub name: String,
    /// The parameters, in declaration order.
    pub params: Vec<Param>,
    /// The declared return type.
    pub return_type: Type,
    /// The function body.
    pub body: Vec<Stmt>,
    /// Documentation attached by the docstring pass, if the body opened
    /// with a plain string literal.
    pub docstring: Option<String>,
    /// The declaration's source location.
    pub span: Span,
    /// The file the function was parsed from.
    pub file: String,
}

/// A member field of a class.
#[derive(Debug, Clone)]
pub struct MemberDecl {
    /// The field name.
    pub name: String,
    /// The field type.
    pub ty: Type,
    /// An initializer, if written. Struct emission ignores it; the
    /// constructor is the place to assign members.
    pub init: Option<Expr>,
    /// The member's source location.
    pub span: Span,
}

/// A class declaration (`koox Magac [dhaxlaya Waalid] { … }`).
#[derive(Debug, Clone)]
pub struct ClassDecl {
    /// The class name.
    pub name: String,
    /// The parent class name, if the class inherits.
    pub parent: Option<String>,
    /// Member fields, in declaration order.
    pub members: Vec<MemberDecl>,
    /// Methods, in declaration order. A method named `dhis` is the
    /// constructor.
    pub methods: Vec<FunctionDecl>,
    /// Documentation from a leading string literal in the class body.
    pub docstring: Option<String>,
    /// The declaration's source location.
    pub span: Span,
    /// The file the class was parsed from.
    pub file: String,
}

impl ClassDecl {
    /// Returns the constructor method, if one was declared.
    pub fn constructor(&self) -> Option<&FunctionDecl> {
        self.methods.iter().find(|m| m.name == "dhis")
    }
}
