//! Array lowering: literals, element access, and the builtin `gali` /
//! `kasaar` methods.
//!
//! Homogeneous arrays dispatch to per-element-type runtime functions
//! (`array_int_append`, …). Arrays of arrays go through the generic
//! array (`void*` elements, casts on read). Heterogeneous arrays and
//! arrays of dictionaries box every element into the runtime's tagged
//! value before a write and yield tagged values on read.

use super::error::{CodegenError, CodegenErrorKind};
use super::types::{DEFAULT_ARRAY_CAPACITY, array_fn_suffix, union_member, value_kind};
use super::{Codegen, Feature};
use crate::ast::{Arg, Expr, ExprKind, MethodCallExpr, Type};

impl Codegen {
    /// Emits the create-then-append sequence for an array literal and
    /// returns the temporary holding the array.
    ///
    /// `ty` is the literal's array type: the declared type when the
    /// literal initializes a declaration (so an empty literal still knows
    /// its element type), the inferred type otherwise.
    pub(super) fn gen_array_literal(
        &mut self,
        ty: &Type,
        elements: &[Expr],
        at: &Expr,
    ) -> Result<String, CodegenError> {
        self.use_feature(Feature::Array);
        let Type::Array(elem) = ty else {
            return Err(CodegenError::new(
                CodegenErrorKind::Internal,
                "Array literal with a non-array type survived analysis",
                at.span,
                &at.file,
            ));
        };
        let temp = self.temp_var();
        let c_type = self.c_type(ty);
        let capacity = elements.len().max(DEFAULT_ARRAY_CAPACITY);

        match elem.as_deref() {
            // Nested arrays: the generic array holds pointers.
            Some(inner @ Type::Array(_)) => {
                self.emit(&format!(
                    "{} {} = array_generic_create({});",
                    c_type, temp, capacity
                ));
                for element in elements {
                    let element_c = match &element.kind {
                        ExprKind::ArrayLit(sub_elements) => {
                            self.gen_array_literal(inner, sub_elements, element)?
                        }
                        _ => self.gen_expr(element)?,
                    };
                    self.emit(&format!("array_generic_append({}, {});", temp, element_c));
                }
            }
            // Heterogeneous (and dictionary-element) arrays box every
            // element.
            None | Some(Type::Dict) => {
                self.emit(&format!(
                    "{} {} = array_mixed_create({});",
                    c_type, temp, capacity
                ));
                for element in elements {
                    let boxed = self.boxed_value(element)?;
                    self.emit(&format!("array_mixed_append({}, {});", temp, boxed));
                }
            }
            Some(prim) => {
                let Some(suffix) = array_fn_suffix(prim) else {
                    return Err(CodegenError::new(
                        CodegenErrorKind::UnhandledNode,
                        format!("Arrays of '{}' have no runtime representation", prim),
                        at.span,
                        &at.file,
                    ));
                };
                if suffix == "string" {
                    // The string-array printers lean on the dictionary
                    // runtime.
                    self.use_feature(Feature::Dictionary);
                }
                self.emit(&format!(
                    "{} {} = array_{}_create({});",
                    c_type, temp, suffix, capacity
                ));
                for element in elements {
                    let element_c = self.gen_expr(element)?;
                    self.emit(&format!(
                        "array_{}_append({}, {});",
                        suffix, temp, element_c
                    ));
                }
            }
        }
        Ok(temp)
    }

    /// A bounds-checked element read.
    pub(super) fn gen_array_access(
        &mut self,
        base_c: &str,
        elem: Option<&Type>,
        index_c: &str,
    ) -> Result<String, CodegenError> {
        self.use_feature(Feature::Array);
        let checked = format!("tusmo_bounds_check({}, {}->size)", index_c, base_c);
        match elem {
            // Generic arrays store void*; cast back to the element
            // struct pointer.
            Some(inner @ Type::Array(_)) => {
                let c_type = self.c_type(inner);
                Ok(format!("(({})({}->data[{}]))", c_type, base_c, checked))
            }
            // Mixed arrays (and arrays of dictionaries) yield tagged
            // values the surrounding code unwraps where its static type
            // is known.
            _ => Ok(format!("({}->data[{}])", base_c, checked)),
        }
    }

    /// `xs.gali(…)` and `xs.kasaar(…)`.
    ///
    /// Append and insert are statements: their code is emitted into the
    /// body buffer and the returned expression string is empty. Pop and
    /// remove produce a value and return a real expression.
    pub(super) fn gen_array_method(
        &mut self,
        call: &MethodCallExpr,
        elem: Option<&Type>,
        at: &Expr,
    ) -> Result<String, CodegenError> {
        self.use_feature(Feature::Array);
        let object_c = self.gen_expr(&call.object)?;

        if call.args.is_empty() {
            return Err(CodegenError::new(
                CodegenErrorKind::Internal,
                format!(
                    "Array method '{}' without arguments survived analysis",
                    call.method
                ),
                at.span,
                &at.file,
            ));
        }

        match call.method.as_str() {
            "gali" => {
                if call.args.len() == 2 {
                    // Insert: gali(boos=i, value)
                    let Arg::Named { value: index, .. } = &call.args[0] else {
                        return Err(CodegenError::new(
                            CodegenErrorKind::Internal,
                            "Two-argument 'gali' without 'boos' survived analysis",
                            at.span,
                            &at.file,
                        ));
                    };
                    let index_c = self.gen_expr(index)?;
                    let value = call.args[1].value();
                    self.gen_array_insert(&object_c, elem, &index_c, value)?;
                } else {
                    self.gen_array_append(&object_c, elem, call.args[0].value())?;
                }
                Ok(String::new())
            }
            "kasaar" => match &call.args[0] {
                Arg::Named { value: index, .. } => {
                    // Pop by index.
                    let index_c = self.gen_expr(index)?;
                    match elem {
                        None | Some(Type::Dict) => {
                            Ok(format!("array_mixed_pop({}, {})", object_c, index_c))
                        }
                        Some(inner @ Type::Array(_)) => {
                            let c_type = self.c_type(inner);
                            Ok(format!(
                                "(({})array_generic_pop({}, {}))",
                                c_type, object_c, index_c
                            ))
                        }
                        Some(prim) => {
                            let suffix = self.array_suffix_or_err(prim, at)?;
                            Ok(format!("array_{}_pop({}, {})", suffix, object_c, index_c))
                        }
                    }
                }
                arg => {
                    // Remove by value.
                    let value = arg.value();
                    match elem {
                        None | Some(Type::Dict) => {
                            let boxed = self.boxed_value(value)?;
                            Ok(format!("array_mixed_remove({}, {})", object_c, boxed))
                        }
                        Some(Type::Array(_)) => {
                            let value_c = self.gen_expr(value)?;
                            Ok(format!(
                                "array_generic_remove({}, (void*){})",
                                object_c, value_c
                            ))
                        }
                        Some(prim) => {
                            let suffix = self.array_suffix_or_err(prim, at)?;
                            let value_c = self.gen_expr(value)?;
                            Ok(format!("array_{}_remove({}, {})", suffix, object_c, value_c))
                        }
                    }
                }
            },
            other => Err(CodegenError::new(
                CodegenErrorKind::Internal,
                format!("Array method '{}' survived analysis", other),
                at.span,
                &at.file,
            )),
        }
    }

    /// Emits the append statement for one element.
    pub(super) fn gen_array_append(
        &mut self,
        object_c: &str,
        elem: Option<&Type>,
        value: &Expr,
    ) -> Result<(), CodegenError> {
        match elem {
            None | Some(Type::Dict) => {
                let boxed = self.boxed_value(value)?;
                self.emit(&format!("array_mixed_append({}, {});", object_c, boxed));
            }
            Some(Type::Array(_)) => {
                let value_c = self.gen_expr(value)?;
                self.emit(&format!("array_generic_append({}, {});", object_c, value_c));
            }
            Some(prim) => {
                let suffix = self.array_suffix_or_err(prim, value)?;
                if suffix == "string" {
                    self.use_feature(Feature::Dictionary);
                }
                let value_c = self.gen_expr(value)?;
                self.emit(&format!(
                    "array_{}_append({}, {});",
                    suffix, object_c, value_c
                ));
            }
        }
        Ok(())
    }

    fn gen_array_insert(
        &mut self,
        object_c: &str,
        elem: Option<&Type>,
        index_c: &str,
        value: &Expr,
    ) -> Result<(), CodegenError> {
        match elem {
            None | Some(Type::Dict) => {
                let boxed = self.boxed_value(value)?;
                self.emit(&format!(
                    "array_mixed_insert({}, {}, {});",
                    object_c, index_c, boxed
                ));
            }
            Some(Type::Array(_)) => {
                let value_c = self.gen_expr(value)?;
                self.emit(&format!(
                    "array_generic_insert({}, {}, {});",
                    object_c, index_c, value_c
                ));
            }
            Some(prim) => {
                let suffix = self.array_suffix_or_err(prim, value)?;
                if suffix == "string" {
                    self.use_feature(Feature::Dictionary);
                }
                let value_c = self.gen_expr(value)?;
                self.emit(&format!(
                    "array_{}_insert({}, {}, {});",
                    suffix, object_c, index_c, value_c
                ));
            }
        }
        Ok(())
    }

    /// The preallocating create call for `tix_cayiman(n)` against a
    /// declared array type.
    pub(super) fn array_create_call(
        &mut self,
        elem: Option<&Type>,
        size_c: &str,
        at: &Expr,
    ) -> Result<String, CodegenError> {
        self.use_feature(Feature::Array);
        match elem {
            None | Some(Type::Dict) => Ok(format!("array_mixed_create({})", size_c)),
            Some(Type::Array(_)) => Ok(format!("array_generic_create({})", size_c)),
            Some(prim) => {
                let suffix = self.array_suffix_or_err(prim, at)?;
                Ok(format!("array_{}_create({})", suffix, size_c))
            }
        }
    }

    fn array_suffix_or_err(
        &self,
        prim: &Type,
        at: &Expr,
    ) -> Result<&'static str, CodegenError> {
        array_fn_suffix(prim).ok_or_else(|| {
            CodegenError::new(
                CodegenErrorKind::UnhandledNode,
                format!("Arrays of '{}' have no runtime representation", prim),
                at.span,
                &at.file,
            )
        })
    }

    /// Boxes an expression into a tagged-value compound literal. Values
    /// that are already dynamic pass through unchanged.
    pub(super) fn boxed_value(&mut self, value: &Expr) -> Result<String, CodegenError> {
        let ty = self.type_of(value);
        let value_c = self.gen_expr(value)?;
        match ty {
            Some(Type::Dynamic) => Ok(value_c),
            Some(
                ty @ (Type::Int
                | Type::Float
                | Type::Str
                | Type::Char
                | Type::Bool
                | Type::Dict
                | Type::Array(_)),
            ) => Ok(format!(
                "(TusmoValue){{.kind = {}, .value.{} = {}}}",
                value_kind(&ty),
                union_member(&ty),
                value_c
            )),
            // Objects and other non-taggable values degrade to a label,
            // matching the runtime printer's expectations.
            _ => Ok(
                "(TusmoValue){.kind = TUSMO_STRING, .value.as_string = \"<complex_object>\"}"
                    .to_string(),
            ),
        }
    }

    /// Boxes a value for printing through the polymorphic printer.
    pub(super) fn boxed_for_print(
        &mut self,
        value_c: &str,
        ty: &Type,
    ) -> String {
        format!(
            "(TusmoValue){{.kind = {}, .value.{} = {}}}",
            value_kind(ty),
            union_member(ty),
            value_c
        )
    }
}
