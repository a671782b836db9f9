//! Statement lowering.

use super::error::{CodegenError, CodegenErrorKind};
use super::types::union_member;
use super::{Codegen, Feature};
use crate::ast::{BinaryOp, Expr, ExprKind, Stmt, StmtKind, Type, VarDecl};
use crate::semantic::Symbol;

/// Matches a `tix_cayiman(n)` initializer and yields the capacity
/// expression.
fn tix_cayiman_size(expr: &Expr) -> Option<&Expr> {
    match &expr.kind {
        ExprKind::Call(call) if call.name == "tix_cayiman" => {
            call.args.first().map(crate::ast::Arg::value)
        }
        _ => None,
    }
}

impl Codegen {
    pub(super) fn gen_stmt(&mut self, stmt: &Stmt) -> Result<(), CodegenError> {
        match &stmt.kind {
            StmtKind::VarDecl(decl) => self.gen_var_decl(decl),
            StmtKind::Assign { target, value } => self.gen_assign(target, None, value),
            StmtKind::CompoundAssign { target, op, value } => {
                self.gen_assign(target, Some(*op), value)
            }
            StmtKind::If { cases, else_body } => {
                for (i, case) in cases.iter().enumerate() {
                    let keyword = if i == 0 { "if" } else { "else if" };
                    let cond_c = self.gen_expr(&case.cond)?;
                    self.emit(&format!("{} ({}) {{", keyword, cond_c));
                    self.symbols.push_scope();
                    let result = self.gen_stmts(&case.body);
                    self.symbols.pop_scope();
                    result?;
                    self.emit("}");
                }
                if let Some(body) = else_body {
                    self.emit("else {");
                    self.symbols.push_scope();
                    let result = self.gen_stmts(body);
                    self.symbols.pop_scope();
                    result?;
                    self.emit("}");
                }
                Ok(())
            }
            StmtKind::While { cond, body } => {
                let cond_c = self.gen_expr(cond)?;
                self.emit(&format!("while ({}) {{", cond_c));
                self.symbols.push_scope();
                let result = self.gen_stmts(body);
                self.symbols.pop_scope();
                result?;
                self.emit("}");
                Ok(())
            }
            StmtKind::DoWhile { body, cond } => {
                self.emit("do {");
                self.symbols.push_scope();
                let result = self.gen_stmts(body);
                self.symbols.pop_scope();
                result?;
                let cond_c = self.gen_expr(cond)?;
                self.emit(&format!("}} while ({});", cond_c));
                Ok(())
            }
            StmtKind::ForRange {
                var,
                start,
                end,
                body,
            } => {
                let start_c = self.gen_expr(start)?;
                let end_c = self.gen_expr(end)?;
                self.symbols.push_scope();
                self.symbols
                    .define(var.clone(), Symbol::Variable(Type::Int));
                self.emit(&format!(
                    "for (int {var} = {start}; {var} < {end}; ++{var}) {{",
                    var = var,
                    start = start_c,
                    end = end_c
                ));
                let result = self.gen_stmts(body);
                self.symbols.pop_scope();
                result?;
                self.emit("}");
                Ok(())
            }
            StmtKind::ForEach {
                var,
                iterable,
                body,
            } => self.gen_for_each(var, iterable, body, stmt),
            StmtKind::Break => {
                self.emit("break;");
                Ok(())
            }
            StmtKind::Continue => {
                self.emit("continue;");
                Ok(())
            }
            StmtKind::Return(value) => {
                match value {
                    Some(value) => {
                        let value_c = self.gen_expr(value)?;
                        self.emit(&format!("return {};", value_c));
                    }
                    None => self.emit("return;"),
                }
                Ok(())
            }
            StmtKind::Print(exprs) => self.gen_print(exprs),
            StmtKind::Read(name) => self.gen_read(name, stmt),
            StmtKind::Import(_) => Ok(()),
            StmtKind::EmbeddedC(code) => {
                self.push_embedded(code, &stmt.file, stmt.span.line);
                Ok(())
            }
            StmtKind::Expr(expr) => {
                let code = self.gen_expr(expr)?;
                // Array appends and inserts emit their own statements and
                // return nothing to terminate.
                if !code.is_empty() {
                    self.emit(&format!("{};", code));
                }
                Ok(())
            }
            StmtKind::Function(func) => self.gen_function(func),
            StmtKind::Class(class) => self.gen_class(class),
        }
    }

    pub(super) fn gen_stmts(&mut self, stmts: &[Stmt]) -> Result<(), CodegenError> {
        for stmt in stmts {
            self.gen_stmt(stmt)?;
        }
        Ok(())
    }

    fn gen_var_decl(&mut self, decl: &VarDecl) -> Result<(), CodegenError> {
        self.symbols
            .define(decl.name.clone(), Symbol::Variable(decl.ty.clone()));
        let name = &decl.name;

        match &decl.ty {
            Type::Dict => {
                self.use_feature(Feature::Dictionary);
                match &decl.init {
                    Some(init) => {
                        let init_c = self.gen_expr(init)?;
                        self.emit(&format!("TusmoDict* {} = {};", name, init_c));
                    }
                    None => self.emit(&format!("TusmoDict* {} = dict_create();", name)),
                }
                Ok(())
            }

            Type::Array(elem) => {
                let c_type = self.c_type(&decl.ty);
                match &decl.init {
                    Some(init) => {
                        if let Some(size) = tix_cayiman_size(init) {
                            let size_c = self.gen_expr(size)?;
                            let create =
                                self.array_create_call(elem.as_deref(), &size_c, init)?;
                            self.emit(&format!("{} {} = {};", c_type, name, create));
                        } else if let ExprKind::ArrayLit(elements) = &init.kind {
                            // Use the declared type rather than the
                            // inferred one, so empty literals still know
                            // their element type.
                            let temp = self.gen_array_literal(&decl.ty, elements, init)?;
                            self.emit(&format!("{} {} = {};", c_type, name, temp));
                        } else {
                            let init_c = self.gen_expr(init)?;
                            self.emit(&format!("{} {} = {};", c_type, name, init_c));
                        }
                    }
                    None => self.emit(&format!("{} {} = NULL;", c_type, name)),
                }
                Ok(())
            }

            Type::Class(class) => {
                match &decl.init {
                    Some(init) => {
                        let init_c = self.gen_expr(init)?;
                        self.emit(&format!("{}* {} = {};", class, name, init_c));
                    }
                    None => self.emit(&format!("{}* {} = NULL;", class, name)),
                }
                Ok(())
            }

            Type::Function(_) => {
                let declarator = self.c_declarator(name, &decl.ty);
                match &decl.init {
                    Some(init) => {
                        let init_c = self.gen_expr(init)?;
                        self.emit(&format!("{} = {};", declarator, init_c));
                    }
                    None => self.emit(&format!("{} = NULL;", declarator)),
                }
                Ok(())
            }

            other => {
                // Primitives: declaration first, then the initializer (or
                // the language-defined default) as a separate assignment.
                self.emit_primitive_decl(name, other);
                match &decl.init {
                    Some(init) => {
                        let init_ty = self.type_of(init);
                        let mut init_c = self.gen_expr(init)?;
                        if init_ty == Some(Type::Dynamic) {
                            init_c = format!("({}).value.{}", init_c, union_member(other));
                        }
                        self.emit(&format!("{} = {};", name, init_c));
                    }
                    None => self.emit_primitive_default(name, other),
                }
                Ok(())
            }
        }
    }

    fn emit_primitive_decl(&mut self, name: &str, ty: &Type) {
        let c_type = match ty {
            Type::Int => "int",
            Type::Float => "double",
            Type::Char => "char",
            Type::Bool => "bool",
            Type::Str => "char*",
            Type::Void => "void*",
            Type::Dynamic => "TusmoValue",
            _ => "void*",
        };
        self.emit(&format!("{} {};", c_type, name));
    }

    fn emit_primitive_default(&mut self, name: &str, ty: &Type) {
        let default = match ty {
            Type::Int => "0",
            Type::Float => "0.0",
            Type::Char => "'\\0'",
            Type::Bool => "false",
            _ => "NULL",
        };
        self.emit(&format!("{} = {};", name, default));
    }

    fn gen_assign(
        &mut self,
        target: &Expr,
        op: Option<BinaryOp>,
        value: &Expr,
    ) -> Result<(), CodegenError> {
        // Writes through an index may need boxing or a dict_set instead
        // of a plain store.
        if op.is_none()
            && let ExprKind::Index { base, index } = &target.kind
        {
            match self.type_of(base) {
                Some(Type::Dict) => return self.gen_dict_set(base, index, value),
                Some(Type::Array(elem))
                    if elem.is_none() || elem.as_deref() == Some(&Type::Dict) =>
                {
                    // Every write into a mixed array boxes the value.
                    let target_c = self.gen_expr(target)?;
                    let boxed = self.boxed_value(value)?;
                    self.emit(&format!("{} = {};", target_c, boxed));
                    return Ok(());
                }
                Some(Type::Dynamic) => {
                    if self.type_of(index) == Some(Type::Str) {
                        self.use_feature(Feature::Dictionary);
                        let base_c = self.gen_expr(base)?;
                        let key_c = self.gen_expr(index)?;
                        let boxed = self.boxed_value(value)?;
                        self.emit(&format!(
                            "dict_set(({}).value.as_dict, {}, {});",
                            base_c, key_c, boxed
                        ));
                    } else {
                        let target_c = self.gen_expr(target)?;
                        let boxed = self.boxed_value(value)?;
                        self.emit(&format!("{} = {};", target_c, boxed));
                    }
                    return Ok(());
                }
                _ => {}
            }
        }

        let target_c = self.gen_expr(target)?;

        if op.is_none()
            && let Some(size) = tix_cayiman_size(value)
        {
            let Some(Type::Array(elem)) = self.type_of(target) else {
                return Err(CodegenError::new(
                    CodegenErrorKind::InvalidConstruct,
                    "'tix_cayiman' may only be assigned to array variables",
                    value.span,
                    &value.file,
                ));
            };
            let size_c = self.gen_expr(size)?;
            let create = self.array_create_call(elem.as_deref(), &size_c, value)?;
            self.emit(&format!("{} = {};", target_c, create));
            return Ok(());
        }

        let target_ty = self.type_of(target);
        let value_ty = self.type_of(value);
        let mut value_c = self.gen_expr(value)?;

        // Unwrap a dynamic value into a statically typed slot, except for
        // string concatenation, which coerces through the runtime.
        let concatenating = op == Some(BinaryOp::Add) && target_ty == Some(Type::Str);
        if value_ty == Some(Type::Dynamic)
            && !concatenating
            && let Some(target_ty) = &target_ty
            && Self::unwraps_to_member(target_ty)
        {
            value_c = format!("({}).value.{}", value_c, union_member(target_ty));
        }

        match op {
            None => {
                self.emit(&format!("{} = {};", target_c, value_c));
                Ok(())
            }
            Some(BinaryOp::Add) if target_ty == Some(Type::Str) => {
                self.use_feature(Feature::String);
                let coerced = self.ensure_string(value_c, value_ty.as_ref(), value)?;
                self.emit(&format!(
                    "{} = tusmo_concat_cstr({}, {});",
                    target_c, target_c, coerced
                ));
                Ok(())
            }
            Some(op) => {
                self.emit(&format!("{} {}= {};", target_c, op.c_symbol(), value_c));
                Ok(())
            }
        }
    }

    /// True for left-hand types with a fixed tagged-union member.
    fn unwraps_to_member(ty: &Type) -> bool {
        matches!(
            ty,
            Type::Int
                | Type::Float
                | Type::Str
                | Type::Char
                | Type::Bool
                | Type::Dict
                | Type::Array(None)
        )
    }

    fn gen_for_each(
        &mut self,
        var: &str,
        iterable: &Expr,
        body: &[Stmt],
        stmt: &Stmt,
    ) -> Result<(), CodegenError> {
        let iterable_ty = self.type_of(iterable);
        let iterable_c = self.gen_expr(iterable)?;

        match iterable_ty {
            Some(Type::Str) => {
                let length = self.temp_var();
                self.emit(&format!("int {} = strlen({});", length, iterable_c));
                let index = self.temp_var();
                self.symbols.push_scope();
                self.symbols
                    .define(var.to_string(), Symbol::Variable(Type::Char));
                self.emit(&format!(
                    "for (int {i} = 0; {i} < {len}; ++{i}) {{",
                    i = index,
                    len = length
                ));
                self.emit(&format!("char {} = {}[{}];", var, iterable_c, index));
                let result = self.gen_stmts(body);
                self.symbols.pop_scope();
                result?;
                self.emit("}");
                Ok(())
            }
            Some(Type::Array(elem)) => {
                self.use_feature(Feature::Array);
                let index = format!("{}_i", self.temp_var());
                self.symbols.push_scope();
                self.emit(&format!(
                    "for (size_t {i} = 0; {i} < {arr}->size; ++{i}) {{",
                    i = index,
                    arr = iterable_c
                ));
                match elem.as_deref() {
                    None | Some(Type::Dict) => {
                        self.symbols
                            .define(var.to_string(), Symbol::Variable(Type::Dynamic));
                        self.emit(&format!(
                            "TusmoValue {} = {}->data[{}];",
                            var, iterable_c, index
                        ));
                    }
                    Some(inner @ Type::Array(_)) => {
                        let c_type = self.c_type(inner);
                        self.symbols
                            .define(var.to_string(), Symbol::Variable(inner.clone()));
                        self.emit(&format!(
                            "{ctype} {var} = ({ctype})({arr}->data[{i}]);",
                            ctype = c_type,
                            var = var,
                            arr = iterable_c,
                            i = index
                        ));
                    }
                    Some(prim) => {
                        let c_type = self.c_type(prim);
                        self.symbols
                            .define(var.to_string(), Symbol::Variable(prim.clone()));
                        self.emit(&format!(
                            "{} {} = {}->data[{}];",
                            c_type, var, iterable_c, index
                        ));
                    }
                }
                let result = self.gen_stmts(body);
                self.symbols.pop_scope();
                result?;
                self.emit("}");
                Ok(())
            }
            _ => Err(CodegenError::new(
                CodegenErrorKind::Internal,
                "Iteration over a non-iterable survived analysis",
                stmt.span,
                &stmt.file,
            )),
        }
    }

    /// `qor(…)`: consecutive primitive arguments batch into one `printf`;
    /// arrays, dictionaries and dynamic values flush the batch and go
    /// through their polymorphic printers. One trailing newline.
    fn gen_print(&mut self, exprs: &[Expr]) -> Result<(), CodegenError> {
        self.use_feature(Feature::Io);
        let mut fmt = String::new();
        let mut args: Vec<String> = Vec::new();

        for expr in exprs {
            match self.type_of(expr) {
                Some(Type::Int) => {
                    let code = self.gen_expr(expr)?;
                    fmt.push_str("%d");
                    args.push(code);
                }
                Some(Type::Float) => {
                    let code = self.gen_expr(expr)?;
                    fmt.push_str("%f");
                    args.push(code);
                }
                Some(Type::Str) => {
                    let code = self.gen_expr(expr)?;
                    fmt.push_str("%s");
                    args.push(code);
                }
                Some(Type::Char) => {
                    let code = self.gen_expr(expr)?;
                    fmt.push_str("%c");
                    args.push(code);
                }
                Some(Type::Bool) => {
                    let code = self.gen_expr(expr)?;
                    fmt.push_str("%s");
                    args.push(format!("({} ? \"run\" : \"been\")", code));
                }
                Some(ty @ Type::Array(_)) => {
                    self.flush_print(&mut fmt, &mut args);
                    self.use_feature(Feature::Array);
                    self.use_feature(Feature::Dictionary);
                    let code = self.gen_expr(expr)?;
                    let boxed = self.boxed_for_print(&code, &ty);
                    self.emit(&format!("print_dynamic({});", boxed));
                    self.emit("fflush(stdout);");
                }
                Some(Type::Dict) => {
                    self.flush_print(&mut fmt, &mut args);
                    self.use_feature(Feature::Dictionary);
                    let code = self.gen_expr(expr)?;
                    self.emit(&format!("dict_print({});", code));
                    self.emit("fflush(stdout);");
                }
                // Dynamic values, and anything inference cannot name, go
                // through the runtime's polymorphic printer.
                _ => {
                    self.flush_print(&mut fmt, &mut args);
                    self.use_feature(Feature::Dictionary);
                    let code = self.gen_expr(expr)?;
                    self.emit(&format!("print_dynamic({});", code));
                    self.emit("fflush(stdout);");
                }
            }
        }

        self.flush_print(&mut fmt, &mut args);
        if !exprs.is_empty() {
            self.emit("printf(\"\\n\");");
            self.emit("fflush(stdout);");
        }
        Ok(())
    }

    fn flush_print(&mut self, fmt: &mut String, args: &mut Vec<String>) {
        if fmt.is_empty() {
            return;
        }
        let arg_list = if args.is_empty() {
            String::new()
        } else {
            format!(", {}", args.join(", "))
        };
        self.emit(&format!("printf(\"{}\"{});", fmt, arg_list));
        self.emit("fflush(stdout);");
        fmt.clear();
        args.clear();
    }

    /// `hel(x)`: strings read a whole line through the runtime; numbers
    /// use `scanf` and drain the rest of the input line.
    fn gen_read(&mut self, name: &str, stmt: &Stmt) -> Result<(), CodegenError> {
        self.use_feature(Feature::Io);
        let ty = match self.symbols.lookup(name) {
            Some(Symbol::Variable(ty)) => Some(ty.clone()),
            _ => None,
        };
        match ty {
            Some(Type::Str) => {
                self.emit(&format!("{} = read_str();", name));
                Ok(())
            }
            Some(Type::Int) => {
                self.emit(&format!("scanf(\"%d\", &{});", name));
                self.emit("{ int c; while((c = getchar()) != '\\n' && c != EOF); }");
                Ok(())
            }
            Some(Type::Float) => {
                self.emit(&format!("scanf(\"%lf\", &{});", name));
                self.emit("{ int c; while((c = getchar()) != '\\n' && c != EOF); }");
                Ok(())
            }
            _ => Err(CodegenError::new(
                CodegenErrorKind::Internal,
                format!("'hel({})' with an unreadable target survived analysis", name),
                stmt.span,
                &stmt.file,
            )),
        }
    }
}
