//! Abstract Syntax Tree definitions for the Tusmo language.
//!
//! A parsed translation unit is a flat `Vec<Stmt>`: top-level statements,
//! function declarations and class declarations in source order. After
//! import resolution the vector contains the spliced nodes of every
//! imported module, each still carrying its own filename.
//!
//! # Module Structure
//!
//! - [`types`] - The type lattice ([`Type`], [`FunctionType`])
//! - [`expr`] - Expression nodes
//! - [`stmt`] - Statement nodes
//! - [`decl`] - Function, parameter and class declarations

mod decl;
mod expr;
mod stmt;
mod types;

pub use decl::{ClassDecl, FunctionDecl, MemberDecl, Param};
pub use expr::{
    Arg, BinaryOp, CallExpr, Expr, ExprKind, FStringPart, MethodCallExpr, NewExpr, UnaryOp,
};
pub use stmt::{IfCase, Stmt, StmtKind, VarDecl};
pub use types::{FunctionType, Type};
