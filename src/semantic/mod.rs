//! Semantic analysis for the Tusmo programming language.
//!
//! The [`SemanticAnalyzer`] validates the resolved translation unit and
//! annotates it for code generation:
//!
//! - **Name resolution**: duplicate and undefined variables, functions and
//!   classes; scope rules (top-level functions are global, methods live in
//!   a per-class scope, declarations shadow only in inner scopes).
//! - **Inheritance**: the parent name must resolve to a class definition,
//!   the parent chain must be acyclic, and method/member lookup walks the
//!   chain.
//! - **Call resolution**: positional and named arguments are resolved
//!   against the callee's parameter order, defaults filled in, and the
//!   ordered vector stored on the call node. Method calls also record the
//!   class that owns the resolved method.
//! - **Type checking**: the type rules of the language, with the dynamic
//!   value type deferring to runtime checks.
//! - **Context rules**: `joog`/`kasoco` only inside loops, `soo_celi`
//!   only inside functions, `kan`/`waalid` only inside methods.
//!
//! # Pipeline Position
//!
//! ```text
//! Source → Lexer → Parser → Imports → Docstrings → F-strings
//!        → Semantic Analyzer → Codegen → C translation unit
//! ```
//!
//! Analysis either succeeds (code generation can proceed) or aborts with
//! a single [`SemanticError`] carrying filename and line.

mod call;
mod error;
pub(crate) mod infer;
mod symbol;

#[cfg(test)]
mod tests;

pub use error::{SemanticError, SemanticErrorKind};
pub use symbol::{ClassInfo, FunctionSig, Symbol, SymbolTable};

use crate::ast::{
    Arg, BinaryOp, ClassDecl, Expr, ExprKind, FStringPart, FunctionDecl, Stmt, StmtKind, Type,
};
use crate::builtins;
use crate::token::Span;
use call::resolve_arguments;

/// Semantic analyzer for Tusmo translation units.
///
/// Created per compilation; after a successful [`analyze`](Self::analyze)
/// the symbol table (with the surviving global scope) is handed to the
/// code generator via [`into_symbols`](Self::into_symbols).
pub struct SemanticAnalyzer {
    symbols: SymbolTable,
    /// The function whose body is being analyzed, for `soo_celi` checks.
    current_function: Option<FunctionSig>,
    /// The class whose body is being analyzed, if any.
    current_class: Option<String>,
    /// Loop nesting depth, for `joog`/`kasoco` validation.
    loop_depth: usize,
}

impl SemanticAnalyzer {
    /// Creates a new analyzer.
    pub fn new() -> Self {
        SemanticAnalyzer {
            symbols: SymbolTable::new(),
            current_function: None,
            current_class: None,
            loop_depth: 0,
        }
    }

    /// Consumes the analyzer, yielding the symbol table for codegen.
    pub fn into_symbols(self) -> SymbolTable {
        self.symbols
    }

    /// Analyzes a whole translation unit.
    ///
    /// Mutates the AST: ordered-argument vectors and resolved method
    /// owners are stored on call nodes.
    pub fn analyze(&mut self, ast: &mut [Stmt]) -> Result<(), SemanticError> {
        self.check_stmts(ast)
    }

    fn check_stmts(&mut self, stmts: &mut [Stmt]) -> Result<(), SemanticError> {
        for stmt in stmts {
            self.check_stmt(stmt)?;
        }
        Ok(())
    }

    fn check_stmt(&mut self, stmt: &mut Stmt) -> Result<(), SemanticError> {
        let span = stmt.span;
        let file = stmt.file.clone();
        match &mut stmt.kind {
            StmtKind::VarDecl(decl) => {
                if self.symbols.in_current_scope(&decl.name) {
                    return Err(SemanticError::new(
                        SemanticErrorKind::DuplicateVariable,
                        format!("Variable '{}' is already declared in this scope", decl.name),
                        span,
                        file,
                    ));
                }
                self.validate_type(&decl.ty, span, &file)?;
                if let Some(init) = &mut decl.init {
                    self.check_expr(init)?;
                    let value_ty = infer::type_of(&self.symbols, init)?;
                    if !decl.ty.accepts(&value_ty) {
                        return Err(SemanticError::new(
                            SemanticErrorKind::TypeMismatch,
                            format!(
                                "Cannot assign a value of type '{}' to a variable of type '{}'",
                                value_ty, decl.ty
                            ),
                            span,
                            file,
                        ));
                    }
                }
                self.symbols
                    .define(decl.name.clone(), Symbol::Variable(decl.ty.clone()));
                Ok(())
            }

            StmtKind::Assign { target, value } => {
                Self::validate_assign_target(target)?;
                self.check_expr(target)?;
                self.check_expr(value)?;
                let declared = infer::type_of(&self.symbols, target)?;
                let value_ty = infer::type_of(&self.symbols, value)?;
                if !declared.accepts(&value_ty) {
                    return Err(SemanticError::new(
                        SemanticErrorKind::TypeMismatch,
                        format!(
                            "Cannot assign a value of type '{}' to a target of type '{}'",
                            value_ty, declared
                        ),
                        span,
                        file,
                    ));
                }
                Ok(())
            }

            StmtKind::CompoundAssign { target, op, value } => {
                let op = *op;
                Self::validate_assign_target(target)?;
                self.check_expr(target)?;
                self.check_expr(value)?;
                let declared = infer::type_of(&self.symbols, target)?;
                let value_ty = infer::type_of(&self.symbols, value)?;
                // `eray += x` promotes the operand like string `+`; every
                // other form behaves like `t = t op v`.
                let ok = if declared == Type::Str && op == BinaryOp::Add {
                    value_ty.is_primitive() || value_ty == Type::Dynamic
                } else {
                    declared.accepts(&value_ty)
                };
                if !ok {
                    return Err(SemanticError::new(
                        SemanticErrorKind::TypeMismatch,
                        format!(
                            "Cannot apply '{}=' with a value of type '{}' to a target of type '{}'",
                            op, value_ty, declared
                        ),
                        span,
                        file,
                    ));
                }
                Ok(())
            }

            StmtKind::If { cases, else_body } => {
                for case in cases.iter_mut() {
                    self.check_expr(&mut case.cond)?;
                    self.symbols.push_scope();
                    let result = self.check_stmts(&mut case.body);
                    self.symbols.pop_scope();
                    result?;
                }
                if let Some(body) = else_body {
                    self.symbols.push_scope();
                    let result = self.check_stmts(body);
                    self.symbols.pop_scope();
                    result?;
                }
                Ok(())
            }

            StmtKind::While { cond, body } => {
                self.check_expr(cond)?;
                self.check_loop_body(body)
            }

            StmtKind::DoWhile { body, cond } => {
                self.check_loop_body(body)?;
                self.check_expr(cond)
            }

            StmtKind::ForRange {
                var,
                start,
                end,
                body,
            } => {
                self.check_expr(start)?;
                self.check_expr(end)?;
                let start_ty = infer::type_of(&self.symbols, start)?;
                let end_ty = infer::type_of(&self.symbols, end)?;
                if start_ty != Type::Int || end_ty != Type::Int {
                    return Err(SemanticError::new(
                        SemanticErrorKind::TypeMismatch,
                        format!(
                            "'soco … laga bilaabo' needs integer bounds, got '{}' and '{}'",
                            start_ty, end_ty
                        ),
                        span,
                        file,
                    ));
                }
                self.symbols.push_scope();
                self.symbols
                    .define(var.clone(), Symbol::Variable(Type::Int));
                let result = self.check_loop_body_in_scope(body);
                self.symbols.pop_scope();
                result
            }

            StmtKind::ForEach {
                var,
                iterable,
                body,
            } => {
                self.check_expr(iterable)?;
                let iterable_ty = infer::type_of(&self.symbols, iterable)?;
                let elem_ty = match &iterable_ty {
                    Type::Array(_) | Type::Str => iterable_ty
                        .index_result()
                        .expect("arrays and strings are indexable"),
                    other => {
                        return Err(SemanticError::new(
                            SemanticErrorKind::TypeMismatch,
                            format!(
                                "'soco … kasta' needs an array or a string, got '{}'",
                                other
                            ),
                            span,
                            file,
                        ));
                    }
                };
                self.symbols.push_scope();
                self.symbols.define(var.clone(), Symbol::Variable(elem_ty));
                let result = self.check_loop_body_in_scope(body);
                self.symbols.pop_scope();
                result
            }

            StmtKind::Break => self.require_loop("joog", span, &file),
            StmtKind::Continue => self.require_loop("kasoco", span, &file),

            StmtKind::Return(value) => {
                let Some(function) = self.current_function.clone() else {
                    return Err(SemanticError::new(
                        SemanticErrorKind::InvalidContext,
                        "'soo_celi' may only be used inside a function",
                        span,
                        file,
                    ));
                };
                if let Some(value) = value {
                    self.check_expr(value)?;
                    let value_ty = infer::type_of(&self.symbols, value)?;
                    if !function.return_type.accepts(&value_ty) {
                        return Err(SemanticError::new(
                            SemanticErrorKind::TypeMismatch,
                            format!(
                                "Function '{}' must return '{}', but returns '{}'",
                                function.name, function.return_type, value_ty
                            ),
                            span,
                            file,
                        ));
                    }
                }
                Ok(())
            }

            StmtKind::Print(exprs) => {
                for expr in exprs {
                    self.check_expr(expr)?;
                }
                Ok(())
            }

            StmtKind::Read(name) => match self.symbols.lookup(name) {
                Some(Symbol::Variable(ty))
                    if matches!(ty, Type::Str | Type::Int | Type::Float) =>
                {
                    Ok(())
                }
                Some(Symbol::Variable(ty)) => Err(SemanticError::new(
                    SemanticErrorKind::TypeMismatch,
                    format!(
                        "'hel' reads into 'tiro', 'jajab' or 'eray' variables, not '{}'",
                        ty
                    ),
                    span,
                    file,
                )),
                _ => Err(SemanticError::new(
                    SemanticErrorKind::UndefinedVariable,
                    format!("Variable '{}' was not found", name),
                    span,
                    file,
                )),
            },

            // Imports are consumed by the resolver; a leftover node (from
            // a unit analyzed standalone) contributes nothing.
            StmtKind::Import(_) => Ok(()),
            StmtKind::EmbeddedC(_) => Ok(()),

            StmtKind::Expr(expr) => self.check_expr(expr),

            StmtKind::Function(func) => self.check_function(func),
            StmtKind::Class(class) => self.check_class(class, span),
        }
    }

    fn check_loop_body(&mut self, body: &mut [Stmt]) -> Result<(), SemanticError> {
        self.symbols.push_scope();
        let result = self.check_loop_body_in_scope(body);
        self.symbols.pop_scope();
        result
    }

    fn check_loop_body_in_scope(&mut self, body: &mut [Stmt]) -> Result<(), SemanticError> {
        self.loop_depth += 1;
        let result = self.check_stmts(body);
        self.loop_depth -= 1;
        result
    }

    fn require_loop(&self, keyword: &str, span: Span, file: &str) -> Result<(), SemanticError> {
        if self.loop_depth == 0 {
            return Err(SemanticError::new(
                SemanticErrorKind::InvalidContext,
                format!("'{}' may only be used inside a loop", keyword),
                span,
                file,
            ));
        }
        Ok(())
    }

    fn validate_assign_target(target: &Expr) -> Result<(), SemanticError> {
        match target.kind {
            ExprKind::Identifier(_) | ExprKind::Member { .. } | ExprKind::Index { .. } => Ok(()),
            _ => Err(SemanticError::new(
                SemanticErrorKind::TypeMismatch,
                "The left side of an assignment must be a variable, member or index",
                target.span,
                &target.file,
            )),
        }
    }

    /// Rejects annotations naming unknown classes, recursively through
    /// array and function types.
    fn validate_type(&self, ty: &Type, span: Span, file: &str) -> Result<(), SemanticError> {
        match ty {
            Type::Class(name) => {
                if self.symbols.lookup_class(name).is_none() {
                    return Err(SemanticError::new(
                        SemanticErrorKind::UnknownType,
                        format!("Unknown type '{}'", name),
                        span,
                        file,
                    ));
                }
                Ok(())
            }
            Type::Array(Some(elem)) => self.validate_type(elem, span, file),
            Type::Function(func) => {
                for param in &func.params {
                    self.validate_type(param, span, file)?;
                }
                self.validate_type(&func.ret, span, file)
            }
            _ => Ok(()),
        }
    }

    fn check_function(&mut self, func: &mut FunctionDecl) -> Result<(), SemanticError> {
        let span = func.span;
        let file = func.file.clone();
        let sig = FunctionSig::from(&*func);
        let is_method = self.current_class.is_some();

        if is_method {
            if self.symbols.in_current_scope(&func.name) {
                return Err(SemanticError::new(
                    SemanticErrorKind::DuplicateFunction,
                    format!("Method '{}' is already declared in this class", func.name),
                    span,
                    file,
                ));
            }
            self.symbols
                .define(func.name.clone(), Symbol::Function(sig.clone()));
        } else {
            if self.symbols.in_global_scope(&func.name) {
                return Err(SemanticError::new(
                    SemanticErrorKind::DuplicateFunction,
                    format!("Function '{}' is already declared", func.name),
                    span,
                    file,
                ));
            }
            self.symbols
                .define_global(func.name.clone(), Symbol::Function(sig.clone()));
        }

        self.validate_type(&func.return_type, span, &file)?;

        let previous_function = self.current_function.replace(sig);
        self.symbols.push_scope();
        if let Some(class) = &self.current_class {
            self.symbols
                .define("kan", Symbol::Variable(Type::Class(class.clone())));
        }

        let result = self.check_function_inner(func, &file);

        self.symbols.pop_scope();
        self.current_function = previous_function;
        result
    }

    fn check_function_inner(
        &mut self,
        func: &mut FunctionDecl,
        file: &str,
    ) -> Result<(), SemanticError> {
        let mut has_default = false;
        for param in &mut func.params {
            self.validate_type(&param.ty, param.span, file)?;
            if let Some(default) = &mut param.default {
                has_default = true;
                self.check_expr(default)?;
                let default_ty = infer::type_of(&self.symbols, default)?;
                if !param.ty.accepts(&default_ty) {
                    return Err(SemanticError::new(
                        SemanticErrorKind::TypeMismatch,
                        format!(
                            "Default value of '{}' must be '{}', but is '{}'",
                            param.name, param.ty, default_ty
                        ),
                        param.span,
                        file,
                    ));
                }
            } else if has_default {
                return Err(SemanticError::new(
                    SemanticErrorKind::InvalidArgument,
                    format!(
                        "Parameter '{}' without a default may not follow one with a default",
                        param.name
                    ),
                    param.span,
                    file,
                ));
            }
            self.symbols
                .define(param.name.clone(), Symbol::Variable(param.ty.clone()));
        }
        self.check_stmts(&mut func.body)
    }

    fn check_class(&mut self, class: &mut ClassDecl, span: Span) -> Result<(), SemanticError> {
        let file = class.file.clone();
        if self.symbols.in_current_scope(&class.name) {
            return Err(SemanticError::new(
                SemanticErrorKind::DuplicateClass,
                format!("Class '{}' is already declared", class.name),
                span,
                file,
            ));
        }

        if let Some(parent) = &class.parent {
            if self.symbols.lookup_class(parent).is_none() {
                return Err(SemanticError::new(
                    SemanticErrorKind::InheritanceError,
                    format!(
                        "Class '{}' inherits '{}', which is unknown or not a class",
                        class.name, parent
                    ),
                    span,
                    file,
                ));
            }
            self.check_inheritance_cycle(&class.name, parent, span, &file)?;
        }

        self.symbols.define(
            class.name.clone(),
            Symbol::Class(ClassInfo::from_decl(&*class)),
        );

        let previous_class = self.current_class.replace(class.name.clone());
        self.symbols.push_scope();

        let result = self.check_class_inner(class, &file);

        self.symbols.pop_scope();
        self.current_class = previous_class;
        result
    }

    fn check_class_inner(
        &mut self,
        class: &mut ClassDecl,
        file: &str,
    ) -> Result<(), SemanticError> {
        for member in &mut class.members {
            if self.symbols.in_current_scope(&member.name) {
                return Err(SemanticError::new(
                    SemanticErrorKind::DuplicateVariable,
                    format!(
                        "Member '{}' is already declared in class '{}'",
                        member.name, class.name
                    ),
                    member.span,
                    file,
                ));
            }
            self.validate_type(&member.ty, member.span, file)?;
            if let Some(init) = &mut member.init {
                self.check_expr(init)?;
                let value_ty = infer::type_of(&self.symbols, init)?;
                if !member.ty.accepts(&value_ty) {
                    return Err(SemanticError::new(
                        SemanticErrorKind::TypeMismatch,
                        format!(
                            "Cannot assign a value of type '{}' to member '{}' of type '{}'",
                            value_ty, member.name, member.ty
                        ),
                        member.span,
                        file,
                    ));
                }
            }
            self.symbols
                .define(member.name.clone(), Symbol::Variable(member.ty.clone()));
        }

        for method in &mut class.methods {
            self.check_function(method)?;
        }
        Ok(())
    }

    /// Walks the parent chain from `parent` and rejects any path that
    /// closes back on `class`.
    fn check_inheritance_cycle(
        &self,
        class: &str,
        parent: &str,
        span: Span,
        file: &str,
    ) -> Result<(), SemanticError> {
        let mut current = parent.to_string();
        let mut visited = std::collections::HashSet::new();
        loop {
            if current == class {
                return Err(SemanticError::new(
                    SemanticErrorKind::InheritanceError,
                    format!(
                        "Inheritance cycle detected between '{}' and '{}'",
                        class, parent
                    ),
                    span,
                    file,
                ));
            }
            if !visited.insert(current.clone()) {
                // A pre-existing cycle among ancestors; it does not
                // involve this class, and was rejected when it formed.
                return Ok(());
            }
            match self.symbols.lookup_class(&current).and_then(|c| c.parent.clone()) {
                Some(next) => current = next,
                None => return Ok(()),
            }
        }
    }

    /// Recursive expression check: validates children, resolves call
    /// arguments, then type-checks the node itself.
    fn check_expr(&mut self, expr: &mut Expr) -> Result<(), SemanticError> {
        self.check_expr_children(expr)?;
        infer::type_of(&self.symbols, expr).map(|_| ())
    }

    fn check_expr_children(&mut self, expr: &mut Expr) -> Result<(), SemanticError> {
        let span = expr.span;
        let file = expr.file.clone();
        match &mut expr.kind {
            ExprKind::Binary { left, right, .. } => {
                self.check_expr(left)?;
                self.check_expr(right)
            }
            ExprKind::Unary { operand, .. } => self.check_expr(operand),
            ExprKind::Ternary {
                cond,
                if_true,
                if_false,
            } => {
                self.check_expr(cond)?;
                self.check_expr(if_true)?;
                self.check_expr(if_false)
            }
            ExprKind::ArrayLit(elements) => {
                for element in elements {
                    self.check_expr(element)?;
                }
                Ok(())
            }
            ExprKind::DictLit(pairs) => {
                for (key, value) in pairs.iter_mut() {
                    self.check_expr(key)?;
                    self.check_expr(value)?;
                }
                for (key, _) in pairs.iter() {
                    let key_ty = infer::type_of(&self.symbols, key)?;
                    if key_ty != Type::Str {
                        return Err(SemanticError::new(
                            SemanticErrorKind::TypeMismatch,
                            format!("Dictionary keys must be 'eray', got '{}'", key_ty),
                            key.span,
                            &key.file,
                        ));
                    }
                }
                Ok(())
            }
            ExprKind::Index { base, index } => {
                self.check_expr(base)?;
                self.check_expr(index)?;
                let base_ty = infer::type_of(&self.symbols, base)?;
                let index_ty = infer::type_of(&self.symbols, index)?;
                let index_ok = match &base_ty {
                    Type::Dict => index_ty == Type::Str,
                    Type::Array(_) | Type::Str => index_ty == Type::Int,
                    Type::Dynamic => index_ty == Type::Str || index_ty == Type::Int,
                    _ => true, // the base error surfaces from type_of
                };
                if !index_ok {
                    return Err(SemanticError::new(
                        SemanticErrorKind::TypeMismatch,
                        format!("Cannot index a '{}' with a '{}'", base_ty, index_ty),
                        span,
                        file,
                    ));
                }
                Ok(())
            }
            ExprKind::Member { object, .. } => self.check_expr(object),
            ExprKind::FString(parts) => {
                for part in parts {
                    if let FStringPart::Expr(sub) = part {
                        self.check_expr(sub)?;
                    }
                }
                Ok(())
            }
            ExprKind::CCall { args, .. } => {
                for arg in args {
                    self.check_expr(arg)?;
                }
                Ok(())
            }
            ExprKind::Call(_) => self.check_call(expr, span, &file),
            ExprKind::MethodCall(_) => self.check_method_call(expr, span, &file),
            ExprKind::New(_) => self.check_new(expr, span, &file),
            ExprKind::Int(_)
            | ExprKind::Float(_)
            | ExprKind::Str(_)
            | ExprKind::Char(_)
            | ExprKind::Bool(_)
            | ExprKind::TypeLiteral(_)
            | ExprKind::Identifier(_)
            | ExprKind::SelfRef
            | ExprKind::ParentRef
            | ExprKind::ElemTypeQuery(_) => Ok(()),
        }
    }

    fn check_call(
        &mut self,
        expr: &mut Expr,
        span: Span,
        file: &str,
    ) -> Result<(), SemanticError> {
        let ExprKind::Call(call) = &mut expr.kind else {
            unreachable!("check_call is only invoked on Call nodes");
        };
        for arg in &mut call.args {
            self.check_expr(arg.value_mut())?;
        }

        let name = call.name.clone();
        let symbol = self.symbols.lookup(&name).cloned();
        match &symbol {
            Some(Symbol::Function(sig)) => {
                let context = format!("function '{}'", name);
                let ordered = resolve_arguments(&sig.params, &call.args, &context, span, file)?;
                for (index, (arg, param)) in ordered.iter().zip(&sig.params).enumerate() {
                    let arg_ty = infer::type_of(&self.symbols, arg)?;
                    if !param.ty.accepts(&arg_ty) {
                        return Err(SemanticError::new(
                            SemanticErrorKind::TypeMismatch,
                            format!(
                                "Argument {} of function '{}' must be '{}', got '{}'",
                                index + 1,
                                name,
                                param.ty,
                                arg_ty
                            ),
                            arg.span,
                            &arg.file,
                        ));
                    }
                }
                call.ordered = Some(ordered);
                Ok(())
            }
            Some(Symbol::Variable(Type::Function(func))) => {
                // Indirect call through a function-typed variable:
                // positional-only, exact arity, pairwise compatibility.
                Self::reject_named_args(&call.args, &name)?;
                if call.args.len() != func.params.len() {
                    return Err(SemanticError::new(
                        SemanticErrorKind::InvalidArgument,
                        format!(
                            "'{}' takes {} argument(s), but {} were given",
                            name,
                            func.params.len(),
                            call.args.len()
                        ),
                        span,
                        file,
                    ));
                }
                for (index, (arg, expected)) in
                    call.args.iter().zip(&func.params).enumerate()
                {
                    let arg_ty = infer::type_of(&self.symbols, arg.value())?;
                    if !expected.accepts(&arg_ty) {
                        return Err(SemanticError::new(
                            SemanticErrorKind::TypeMismatch,
                            format!(
                                "Argument {} of '{}' must be '{}', got '{}'",
                                index + 1,
                                name,
                                expected,
                                arg_ty
                            ),
                            arg.value().span,
                            &arg.value().file,
                        ));
                    }
                }
                Ok(())
            }
            _ => {
                if name == "tix_cayiman" {
                    Self::reject_named_args(&call.args, &name)?;
                    if call.args.len() != 1 {
                        return Err(SemanticError::new(
                            SemanticErrorKind::InvalidArgument,
                            "'tix_cayiman' takes exactly one argument, the capacity",
                            span,
                            file,
                        ));
                    }
                    let size_ty = infer::type_of(&self.symbols, call.args[0].value())?;
                    if size_ty != Type::Int {
                        return Err(SemanticError::new(
                            SemanticErrorKind::TypeMismatch,
                            format!("'tix_cayiman' needs a 'tiro' capacity, got '{}'", size_ty),
                            span,
                            file,
                        ));
                    }
                    return Ok(());
                }
                if symbol.is_none() && builtins::is_builtin(&name) {
                    Self::reject_named_args(&call.args, &name)?;
                    // The unary builtins all take exactly one argument.
                    if matches!(name.as_str(), "nooc" | "dherer" | "eray" | "tiro" | "jajab" | "miyaa")
                        && call.args.len() != 1
                    {
                        return Err(SemanticError::new(
                            SemanticErrorKind::InvalidArgument,
                            format!(
                                "'{}' takes exactly 1 argument, but {} were given",
                                name,
                                call.args.len()
                            ),
                            span,
                            file,
                        ));
                    }
                    return Ok(());
                }
                // A non-callable symbol or a completely unknown name; let
                // inference produce the precise error.
                infer::type_of(&self.symbols, expr).map(|_| ())
            }
        }
    }

    fn reject_named_args(args: &[Arg], name: &str) -> Result<(), SemanticError> {
        for arg in args {
            if let Arg::Named { span, .. } = arg {
                return Err(SemanticError::new(
                    SemanticErrorKind::InvalidArgument,
                    format!("'{}' does not support named arguments", name),
                    *span,
                    &arg.value().file,
                ));
            }
        }
        Ok(())
    }

    fn check_method_call(
        &mut self,
        expr: &mut Expr,
        span: Span,
        file: &str,
    ) -> Result<(), SemanticError> {
        let ExprKind::MethodCall(call) = &mut expr.kind else {
            unreachable!("check_method_call is only invoked on MethodCall nodes");
        };
        self.check_expr(&mut call.object)?;
        for arg in &mut call.args {
            self.check_expr(arg.value_mut())?;
        }

        let object_ty = infer::type_of(&self.symbols, &call.object)?;
        let method = call.method.clone();
        match object_ty {
            Type::Array(elem) => {
                self.check_array_method(expr, elem.as_deref(), &method, span, file)
            }
            Type::Dict => {
                let ExprKind::MethodCall(call) = &expr.kind else {
                    unreachable!();
                };
                if !matches!(method.as_str(), "kasaar" | "majiraa") {
                    return Err(SemanticError::new(
                        SemanticErrorKind::UnknownMethod,
                        format!("Dictionaries have no method named '{}'", method),
                        span,
                        file,
                    ));
                }
                if call.args.len() != 1 {
                    return Err(SemanticError::new(
                        SemanticErrorKind::InvalidArgument,
                        format!("'{}' takes exactly one key argument", method),
                        span,
                        file,
                    ));
                }
                let key_ty = infer::type_of(&self.symbols, call.args[0].value())?;
                if key_ty != Type::Str {
                    return Err(SemanticError::new(
                        SemanticErrorKind::TypeMismatch,
                        format!("Dictionary keys must be 'eray', got '{}'", key_ty),
                        span,
                        file,
                    ));
                }
                Ok(())
            }
            Type::Class(class) => {
                let Some((sig, owner)) = self.symbols.find_method(&class, &method) else {
                    return Err(SemanticError::new(
                        SemanticErrorKind::UnknownMethod,
                        format!("Class '{}' has no method named '{}'", class, method),
                        span,
                        file,
                    ));
                };
                let context = format!("method '{}'", method);
                let ExprKind::MethodCall(call) = &mut expr.kind else {
                    unreachable!();
                };
                let ordered = resolve_arguments(&sig.params, &call.args, &context, span, file)?;
                for (index, (arg, param)) in ordered.iter().zip(&sig.params).enumerate() {
                    let arg_ty = infer::type_of(&self.symbols, arg)?;
                    if !param.ty.accepts(&arg_ty) {
                        return Err(SemanticError::new(
                            SemanticErrorKind::TypeMismatch,
                            format!(
                                "Argument {} of method '{}' must be '{}', got '{}'",
                                index + 1,
                                method,
                                param.ty,
                                arg_ty
                            ),
                            arg.span,
                            &arg.file,
                        ));
                    }
                }
                call.ordered = Some(ordered);
                call.resolved_class = Some(owner);
                Ok(())
            }
            other => Err(SemanticError::new(
                SemanticErrorKind::TypeMismatch,
                format!("Cannot call a method on a value of type '{}'", other),
                span,
                file,
            )),
        }
    }

    /// The builtin array methods: `gali(v)` append, `gali(boos=i, v)`
    /// insert, `kasaar(v)` remove by value, `kasaar(boos=i)` pop.
    fn check_array_method(
        &mut self,
        expr: &Expr,
        elem: Option<&Type>,
        method: &str,
        span: Span,
        file: &str,
    ) -> Result<(), SemanticError> {
        let ExprKind::MethodCall(call) = &expr.kind else {
            unreachable!();
        };
        let element_accepts = |value_ty: &Type| match elem {
            Some(elem_ty) => elem_ty.accepts(value_ty),
            None => true, // heterogeneous arrays take anything
        };
        let elem_name = elem.map(|t| t.to_string()).unwrap_or_else(|| "dynamic_value".to_string());

        match method {
            "gali" => match call.args.len() {
                1 => {
                    let value_ty = infer::type_of(&self.symbols, call.args[0].value())?;
                    if !element_accepts(&value_ty) {
                        return Err(SemanticError::new(
                            SemanticErrorKind::TypeMismatch,
                            format!("'gali' expects '{}', but got '{}'", elem_name, value_ty),
                            span,
                            file,
                        ));
                    }
                    Ok(())
                }
                2 => {
                    let Arg::Named { name, value, .. } = &call.args[0] else {
                        return Err(SemanticError::new(
                            SemanticErrorKind::InvalidArgument,
                            "Two-argument 'gali' needs its first argument named 'boos'",
                            span,
                            file,
                        ));
                    };
                    if name != "boos" {
                        return Err(SemanticError::new(
                            SemanticErrorKind::InvalidArgument,
                            "Two-argument 'gali' needs its first argument named 'boos'",
                            span,
                            file,
                        ));
                    }
                    let index_ty = infer::type_of(&self.symbols, value)?;
                    if index_ty != Type::Int {
                        return Err(SemanticError::new(
                            SemanticErrorKind::TypeMismatch,
                            format!("'boos' must be 'tiro', got '{}'", index_ty),
                            span,
                            file,
                        ));
                    }
                    let value_ty = infer::type_of(&self.symbols, call.args[1].value())?;
                    if !element_accepts(&value_ty) {
                        return Err(SemanticError::new(
                            SemanticErrorKind::TypeMismatch,
                            format!(
                                "The inserted value must be '{}', but is '{}'",
                                elem_name, value_ty
                            ),
                            span,
                            file,
                        ));
                    }
                    Ok(())
                }
                _ => Err(SemanticError::new(
                    SemanticErrorKind::InvalidArgument,
                    "'gali' takes 1 or 2 arguments",
                    span,
                    file,
                )),
            },
            "kasaar" => {
                if call.args.len() != 1 {
                    return Err(SemanticError::new(
                        SemanticErrorKind::InvalidArgument,
                        "'kasaar' takes exactly 1 argument",
                        span,
                        file,
                    ));
                }
                match &call.args[0] {
                    Arg::Named { name, value, .. } if name == "boos" => {
                        let index_ty = infer::type_of(&self.symbols, value)?;
                        if index_ty != Type::Int {
                            return Err(SemanticError::new(
                                SemanticErrorKind::TypeMismatch,
                                format!("'boos' must be 'tiro', got '{}'", index_ty),
                                span,
                                file,
                            ));
                        }
                        Ok(())
                    }
                    arg => {
                        let value_ty = infer::type_of(&self.symbols, arg.value())?;
                        if !element_accepts(&value_ty) {
                            return Err(SemanticError::new(
                                SemanticErrorKind::TypeMismatch,
                                format!(
                                    "The removed value must be '{}', but is '{}'",
                                    elem_name, value_ty
                                ),
                                span,
                                file,
                            ));
                        }
                        Ok(())
                    }
                }
            }
            other => Err(SemanticError::new(
                SemanticErrorKind::UnknownMethod,
                format!("Arrays have no method named '{}'", other),
                span,
                file,
            )),
        }
    }

    fn check_new(&mut self, expr: &mut Expr, span: Span, file: &str) -> Result<(), SemanticError> {
        let ExprKind::New(new) = &mut expr.kind else {
            unreachable!("check_new is only invoked on New nodes");
        };
        for arg in &mut new.args {
            self.check_expr(arg.value_mut())?;
        }

        let class = new.class.clone();
        let Some(info) = self.symbols.lookup_class(&class).cloned() else {
            return Err(SemanticError::new(
                SemanticErrorKind::UndefinedClass,
                format!("Cannot instantiate '{}', which is not a class", class),
                span,
                file,
            ));
        };

        let ExprKind::New(new) = &mut expr.kind else {
            unreachable!();
        };
        let Some(constructor) = info.method("dhis") else {
            if !new.args.is_empty() {
                return Err(SemanticError::new(
                    SemanticErrorKind::InvalidArgument,
                    format!(
                        "Class '{}' has no constructor, but {} argument(s) were given",
                        class,
                        new.args.len()
                    ),
                    span,
                    file,
                ));
            }
            return Ok(());
        };

        let context = format!("constructor of '{}'", class);
        let ordered = resolve_arguments(&constructor.params, &new.args, &context, span, file)?;
        for (index, (arg, param)) in ordered.iter().zip(&constructor.params).enumerate() {
            let arg_ty = infer::type_of(&self.symbols, arg)?;
            if !param.ty.accepts(&arg_ty) {
                return Err(SemanticError::new(
                    SemanticErrorKind::TypeMismatch,
                    format!(
                        "Argument {} of the '{}' constructor must be '{}', got '{}'",
                        index + 1,
                        class,
                        param.ty,
                        arg_ty
                    ),
                    arg.span,
                    &arg.file,
                ));
            }
        }
        new.ordered = Some(ordered);
        Ok(())
    }
}

impl Default for SemanticAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
