//! Class lowering: struct definitions, methods and synthesized creators.
//!
//! Each class becomes a typedef'd struct. An inherited class embeds its
//! parent struct as the first field named `parent`, so a pointer to the
//! child is implicitly a pointer to the ancestor. Methods become free
//! functions `Class_method(Class* kan, …)`; a synthesized
//! `_create_Class` allocates through the collector and invokes the
//! constructor when one exists.

use super::error::CodegenError;
use super::Codegen;
use crate::ast::{ClassDecl, FunctionDecl, Type};
use crate::semantic::{ClassInfo, Symbol};

impl Codegen {
    /// Emits a free function or, when a class context is active, a
    /// name-mangled method with the implicit `kan` receiver.
    pub(super) fn gen_function(&mut self, func: &FunctionDecl) -> Result<(), CodegenError> {
        let return_c = self.c_type(&func.return_type);
        let c_name = match &self.current_class {
            Some(class) => format!("{}_{}", class, func.name),
            None => func.name.clone(),
        };

        let mut params = Vec::new();
        if let Some(class) = &self.current_class {
            params.push(format!("{}* kan", class));
        }
        for param in &func.params {
            params.push(self.c_declarator(&param.name, &param.ty));
        }
        let signature = format!("{} {}({})", return_c, c_name, params.join(", "));

        self.symbols.push_scope();
        if let Some(class) = self.current_class.clone() {
            self.symbols
                .define("kan", Symbol::Variable(Type::Class(class)));
        }
        for param in &func.params {
            self.symbols
                .define(param.name.clone(), Symbol::Variable(param.ty.clone()));
        }

        let body = self.capture_body(|generator| generator.gen_stmts(&func.body));
        self.symbols.pop_scope();
        let body = body?;

        self.function_defs
            .push_str(&format!("{} {{\n{}}}\n\n", signature, body));
        Ok(())
    }

    /// Emits the struct, every method, and the creator for one class.
    pub(super) fn gen_class(&mut self, class: &ClassDecl) -> Result<(), CodegenError> {
        // Re-register so classes declared in inner scopes stay visible
        // for the rest of generation.
        self.symbols.define(
            class.name.clone(),
            Symbol::Class(ClassInfo::from_decl(class)),
        );

        let mut definition = format!("typedef struct {0} {0};\nstruct {0} {{\n", class.name);
        if let Some(parent) = &class.parent {
            // The embedded parent must be the first field.
            definition.push_str(&format!("    {} parent;\n", parent));
        }
        for member in &class.members {
            definition.push_str(&format!(
                "    {};\n",
                self.c_declarator(&member.name, &member.ty)
            ));
        }
        definition.push_str("};\n\n");
        self.struct_defs.push_str(&definition);

        let previous_class = self.current_class.replace(class.name.clone());
        for method in &class.methods {
            self.gen_function(method)?;
        }
        self.current_class = previous_class;

        self.gen_class_creator(class);
        Ok(())
    }

    /// `Class* _create_Class(ctor params)`: allocate, run the
    /// constructor if declared, return the instance.
    fn gen_class_creator(&mut self, class: &ClassDecl) {
        let constructor = class.constructor();
        let params: Vec<String> = constructor
            .map(|ctor| {
                ctor.params
                    .iter()
                    .map(|p| self.c_declarator(&p.name, &p.ty))
                    .collect()
            })
            .unwrap_or_default();

        let mut body = format!("    {0}* kan = GC_MALLOC(sizeof({0}));\n", class.name);
        if let Some(ctor) = constructor {
            let mut args = vec!["kan".to_string()];
            args.extend(ctor.params.iter().map(|p| p.name.clone()));
            body.push_str(&format!("    {}_dhis({});\n", class.name, args.join(", ")));
        }
        body.push_str("    return kan;\n");

        self.function_defs.push_str(&format!(
            "{0}* _create_{0}({1}) {{\n{2}}}\n\n",
            class.name,
            params.join(", "),
            body
        ));
    }
}
