//! Tusmo-to-C type mapping and tagged-value helpers.

use super::Codegen;
use crate::ast::Type;

/// Array literals allocate this capacity and append; the runtime grows
/// the backing store past it.
pub(super) const DEFAULT_ARRAY_CAPACITY: usize = 8;

/// The runtime struct name for an array with the given element type.
///
/// Heterogeneous arrays and arrays of dictionaries use the mixed struct
/// (tagged elements); arrays of arrays use the generic struct (`void*`
/// elements).
pub(super) fn array_struct_name(elem: Option<&Type>) -> &'static str {
    match elem {
        None => "TusmoArrayMixed",
        Some(Type::Array(_)) => "TusmoArrayGeneric",
        Some(Type::Int) => "TusmoArrayInt",
        Some(Type::Float) => "TusmoArrayFloat",
        Some(Type::Str) => "TusmoArrayString",
        Some(Type::Bool) => "TusmoArrayBool",
        Some(Type::Char) => "TusmoArrayChar",
        Some(_) => "TusmoArrayMixed",
    }
}

/// The `array_<T>_…` runtime function suffix for a primitive element
/// type. `None` for element types that use the mixed or generic arrays.
pub(super) fn array_fn_suffix(elem: &Type) -> Option<&'static str> {
    match elem {
        Type::Int => Some("int"),
        Type::Float => Some("float"),
        Type::Str => Some("string"),
        Type::Bool => Some("bool"),
        Type::Char => Some("char"),
        _ => None,
    }
}

/// The tagged-value kind constant for a statically known type.
pub(super) fn value_kind(ty: &Type) -> &'static str {
    match ty {
        Type::Int => "TUSMO_INT",
        Type::Float => "TUSMO_FLOAT",
        Type::Str => "TUSMO_STRING",
        Type::Bool => "TUSMO_BOOL",
        Type::Char => "TUSMO_CHAR",
        Type::Dict => "TUSMO_DICT",
        Type::Array(_) => "TUSMO_ARRAY",
        _ => "TUSMO_STRING",
    }
}

/// The tagged-value union member for a statically known type.
pub(super) fn union_member(ty: &Type) -> &'static str {
    match ty {
        Type::Int => "as_int",
        Type::Float => "as_float",
        Type::Str => "as_string",
        Type::Bool => "as_bool",
        Type::Char => "as_char",
        Type::Dict => "as_dict",
        Type::Array(_) => "as_array",
        _ => "as_string",
    }
}

impl Codegen {
    /// The C type a value of `ty` is stored in.
    pub(super) fn c_type(&self, ty: &Type) -> String {
        match ty {
            Type::Int => "int".to_string(),
            Type::Float => "double".to_string(),
            Type::Str => "char*".to_string(),
            Type::Char => "char".to_string(),
            Type::Bool => "bool".to_string(),
            Type::Void => "void".to_string(),
            Type::Dict => "TusmoDict*".to_string(),
            Type::Dynamic => "TusmoValue".to_string(),
            Type::TypeTag(_) => "char*".to_string(),
            Type::Array(elem) => format!("{}*", array_struct_name(elem.as_deref())),
            Type::Class(name) => {
                if self.symbols.lookup_class(name).is_some() {
                    format!("{}*", name)
                } else {
                    "void*".to_string()
                }
            }
            Type::Function(func) => {
                format!("{} (*)({})", self.c_type(&func.ret), self.c_fn_params(func))
            }
        }
    }

    /// A named C declarator for `name: ty`; function pointers need the
    /// name inside the declarator.
    pub(super) fn c_declarator(&self, name: &str, ty: &Type) -> String {
        match ty {
            Type::Function(func) => format!(
                "{} (*{})({})",
                self.c_type(&func.ret),
                name,
                self.c_fn_params(func)
            ),
            _ => format!("{} {}", self.c_type(ty), name),
        }
    }

    fn c_fn_params(&self, func: &crate::ast::FunctionType) -> String {
        if func.params.is_empty() {
            "void".to_string()
        } else {
            func.params
                .iter()
                .map(|p| self.c_type(p))
                .collect::<Vec<_>>()
                .join(", ")
        }
    }
}
