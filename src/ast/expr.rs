//! Expression nodes for the Tusmo AST.

use crate::token::Span;

/// A binary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `%`
    Mod,
    /// `==` / `lamid`
    Eq,
    /// `!=` / `ahayn`
    Ne,
    /// `>` / `weyn`
    Gt,
    /// `<` / `yar`
    Lt,
    /// `>=` / `weyn_lamid`
    Ge,
    /// `<=` / `yar_lamid`
    Le,
    /// `&&` / `iyo`
    And,
    /// `||` / `ama`
    Or,
}

impl BinaryOp {
    /// Returns true for comparison and logical operators, which always
    /// produce a `miyaa`.
    pub fn is_boolean(&self) -> bool {
        matches!(
            self,
            BinaryOp::Eq
                | BinaryOp::Ne
                | BinaryOp::Gt
                | BinaryOp::Lt
                | BinaryOp::Ge
                | BinaryOp::Le
                | BinaryOp::And
                | BinaryOp::Or
        )
    }

    /// The C spelling of this operator.
    pub fn c_symbol(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Gt => ">",
            BinaryOp::Lt => "<",
            BinaryOp::Ge => ">=",
            BinaryOp::Le => "<=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        }
    }
}

impl std::fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.c_symbol())
    }
}

/// A unary operator. Only negation exists; there is no logical-not token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// `-`
    Neg,
}

/// A part of a formatted-string literal.
///
/// The lexer produces `Text` and `Raw` parts; the f-string resolver
/// re-parses every `Raw` snippet and folds the whole literal into a single
/// `Expr` part holding a string-concatenation tree.
#[derive(Debug, Clone)]
pub enum FStringPart {
    /// Literal text, escapes already decoded.
    Text(String),
    /// An unparsed expression snippet.
    Raw(String),
    /// A resolved expression subtree.
    Expr(Box<Expr>),
}

/// A call-site argument: positional, or named (`magac=qiime`).
///
/// Named arguments survive until the semantic analyzer resolves the call's
/// ordered argument vector.
#[derive(Debug, Clone)]
pub enum Arg {
    /// A plain positional argument.
    Positional(Expr),
    /// A named argument.
    Named {
        /// The parameter name.
        name: String,
        /// The argument value.
        value: Expr,
        /// Location of the argument (for diagnostics).
        span: Span,
    },
}

impl Arg {
    /// The argument's value expression, regardless of form.
    pub fn value(&self) -> &Expr {
        match self {
            Arg::Positional(expr) => expr,
            Arg::Named { value, .. } => value,
        }
    }

    /// Mutable access to the argument's value expression.
    pub fn value_mut(&mut self) -> &mut Expr {
        match self {
            Arg::Positional(expr) => expr,
            Arg::Named { value, .. } => value,
        }
    }
}

/// A free-function (or builtin) call.
#[derive(Debug, Clone)]
pub struct CallExpr {
    /// The callee name.
    pub name: String,
    /// Raw arguments as written, positional and named mixed.
    pub args: Vec<Arg>,
    /// Arguments reordered to the callee's parameter order, with defaults
    /// filled in. Set by the semantic analyzer for user-defined functions;
    /// stays `None` for builtins and indirect calls through function-typed
    /// variables, which are positional-only.
    pub ordered: Option<Vec<Expr>>,
}

/// A method call `object.method(args)`.
#[derive(Debug, Clone)]
pub struct MethodCallExpr {
    /// The receiver expression.
    pub object: Box<Expr>,
    /// The method name.
    pub method: String,
    /// Raw arguments as written.
    pub args: Vec<Arg>,
    /// Analyzer-resolved ordered arguments (class methods only).
    pub ordered: Option<Vec<Expr>>,
    /// The class that actually defines the method, resolved by walking the
    /// inheritance chain. The generator uses this for name mangling and to
    /// know how many `parent` hops the receiver needs.
    pub resolved_class: Option<String>,
}

/// A constructor invocation `Name(args) cusub`.
#[derive(Debug, Clone)]
pub struct NewExpr {
    /// The class being instantiated.
    pub class: String,
    /// Raw constructor arguments.
    pub args: Vec<Arg>,
    /// Analyzer-resolved ordered arguments.
    pub ordered: Option<Vec<Expr>>,
}

/// The kind of an expression.
#[derive(Debug, Clone)]
pub enum ExprKind {
    /// An integer literal.
    Int(i64),
    /// A float literal.
    Float(f64),
    /// A string literal (unescaped).
    Str(String),
    /// A char literal.
    Char(char),
    /// A boolean literal (`run`/`haa`/`been`/`maya`).
    Bool(bool),
    /// A formatted-string literal.
    FString(Vec<FStringPart>),
    /// A type name used as a value, e.g. the right side of `nooc(x) == tiro`.
    TypeLiteral(String),
    /// A variable reference.
    Identifier(String),
    /// `kan` - the receiver inside a method.
    SelfRef,
    /// `waalid` - the embedded parent of the receiver.
    ParentRef,
    /// A binary operation.
    Binary {
        left: Box<Expr>,
        op: BinaryOp,
        right: Box<Expr>,
    },
    /// A unary operation. The parser folds `-` applied to a numeric
    /// literal straight into the literal, so this only survives for
    /// non-literal operands.
    Unary { op: UnaryOp, operand: Box<Expr> },
    /// A ternary conditional `c ? t : f`.
    Ternary {
        cond: Box<Expr>,
        if_true: Box<Expr>,
        if_false: Box<Expr>,
    },
    /// An array literal `[a, b, c]`.
    ArrayLit(Vec<Expr>),
    /// A dictionary literal `{"k": v, …}`.
    DictLit(Vec<(Expr, Expr)>),
    /// Indexing: array, dictionary or string, depending on the base type.
    Index { base: Box<Expr>, index: Box<Expr> },
    /// `nooc(xs[])` - the array-element-type query.
    ElemTypeQuery(String),
    /// Member access `object.member`.
    Member { object: Box<Expr>, member: String },
    /// A free-function call.
    Call(CallExpr),
    /// A method call.
    MethodCall(MethodCallExpr),
    /// A constructor invocation.
    New(NewExpr),
    /// `__C_CALL__("fn", args…)` - a raw C function call.
    CCall { function: String, args: Vec<Expr> },
}

/// An expression with its source location.
///
/// Every node records the span and the file it was parsed from; after
/// import resolution nodes from several files share one list, so the
/// filename lives on the node rather than on the translation unit.
#[derive(Debug, Clone)]
pub struct Expr {
    /// The kind of expression.
    pub kind: ExprKind,
    /// The source location.
    pub span: Span,
    /// The file this expression was parsed from.
    pub file: String,
}

impl Expr {
    /// Creates a new expression.
    pub fn new(kind: ExprKind, span: Span, file: impl Into<String>) -> Self {
        Expr {
            kind,
            span,
            file: file.into(),
        }
    }
}
