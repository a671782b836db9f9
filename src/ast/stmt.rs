//! Statement nodes for the Tusmo AST.

use super::decl::{ClassDecl, FunctionDecl};
use super::expr::{BinaryOp, Expr};
use super::types::Type;
use crate::token::Span;

/// A variable declaration (`keyd : T magac [= qiime];`).
#[derive(Debug, Clone)]
pub struct VarDecl {
    /// The variable name.
    pub name: String,
    /// The declared type.
    pub ty: Type,
    /// The optional initializer.
    pub init: Option<Expr>,
}

/// One `haddii` / `ama_haddii` arm of a conditional cascade.
#[derive(Debug, Clone)]
pub struct IfCase {
    /// The arm's condition.
    pub cond: Expr,
    /// The arm's body.
    pub body: Vec<Stmt>,
}

/// The kind of a statement.
#[derive(Debug, Clone)]
pub enum StmtKind {
    /// A variable declaration.
    VarDecl(VarDecl),
    /// An assignment `target = value;`. The target must be an identifier,
    /// a member access or an index expression; the analyzer enforces this.
    Assign { target: Expr, value: Expr },
    /// A compound assignment `target op= value;`.
    CompoundAssign {
        target: Expr,
        op: BinaryOp,
        value: Expr,
    },
    /// A conditional cascade.
    If {
        cases: Vec<IfCase>,
        else_body: Option<Vec<Stmt>>,
    },
    /// A pretest loop (`inta ay (e) { … }`).
    While { cond: Expr, body: Vec<Stmt> },
    /// A post-test loop (`samay { … } inta ay (e);`).
    DoWhile { body: Vec<Stmt>, cond: Expr },
    /// A counted range loop (`soco i laga bilaabo a .. b { … }`).
    ForRange {
        var: String,
        start: Expr,
        end: Expr,
        body: Vec<Stmt>,
    },
    /// An iterator loop (`soco x kasta laga helo e { … }`).
    ForEach {
        var: String,
        iterable: Expr,
        body: Vec<Stmt>,
    },
    /// `joog;`
    Break,
    /// `kasoco;`
    Continue,
    /// `soo_celi [e];`
    Return(Option<Expr>),
    /// `qor(args…);`
    Print(Vec<Expr>),
    /// `hel(magac);` - read a value from stdin into a variable.
    Read(String),
    /// `keen "module";` - consumed by the import resolver.
    Import(String),
    /// `__C_CODE__("…");` - a verbatim C chunk hoisted to the top of the
    /// emitted translation unit.
    EmbeddedC(String),
    /// A bare expression statement.
    Expr(Expr),
    /// A function declaration.
    Function(FunctionDecl),
    /// A class declaration.
    Class(ClassDecl),
}

/// A statement with its source location.
#[derive(Debug, Clone)]
pub struct Stmt {
    /// The kind of statement.
    pub kind: StmtKind,
    /// The source location.
    pub span: Span,
    /// The file this statement was parsed from.
    pub file: String,
}

impl Stmt {
    /// Creates a new statement.
    pub fn new(kind: StmtKind, span: Span, file: impl Into<String>) -> Self {
        Stmt {
            kind,
            span,
            file: file.into(),
        }
    }
}
