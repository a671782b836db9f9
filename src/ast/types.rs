//! The Tusmo type lattice.
//!
//! Types are used by the parser (type annotations), the semantic analyzer
//! (type checking) and the code generator (C type mapping). Equality is
//! structural for arrays and function types and nominal for classes;
//! compatibility additionally lets [`Type::Dynamic`] stand in for anything
//! and a heterogeneous array stand in for any array.

use std::fmt;

/// A function type: parameter types plus a return type.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionType {
    /// The parameter types, in order.
    pub params: Vec<Type>,
    /// The return type.
    pub ret: Box<Type>,
}

/// A type in the Tusmo language.
#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    /// `tiro` - integer.
    Int,
    /// `jajab` - float.
    Float,
    /// `eray` - string (C-style null-terminated buffer).
    Str,
    /// `xaraf` - char.
    Char,
    /// `miyaa` - bool.
    Bool,
    /// `waxbo` - void.
    Void,
    /// `qaamuus` - dictionary.
    Dict,
    /// `tix` / `tix:T` - array. `None` denotes a heterogeneous array whose
    /// elements are tagged dynamic values; this is the only representation
    /// of heterogeneity, there is no stringly sentinel.
    Array(Option<Box<Type>>),
    /// `hawl(T, …):T` - first-class function type.
    Function(FunctionType),
    /// A user class, by name.
    Class(String),
    /// A type name used as a first-class value, e.g. in `x == tiro`.
    TypeTag(String),
    /// The type of any value read out of a dictionary or a heterogeneous
    /// array: a tagged union resolved at runtime. Compatible with
    /// everything; the check is deferred to runtime helpers.
    Dynamic,
}

impl Type {
    /// Returns true for the scalar primitives (`tiro`, `jajab`, `eray`,
    /// `xaraf`, `miyaa`).
    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            Type::Int | Type::Float | Type::Str | Type::Char | Type::Bool
        )
    }

    /// Checks whether a value of type `value` may be stored where `self`
    /// is declared.
    ///
    /// The rules: exact equality; `dynamic_value` with anything (either
    /// side); a heterogeneous array with any array and vice versa; function
    /// types with pairwise-compatible parameters and return types.
    pub fn accepts(&self, value: &Type) -> bool {
        if self == value {
            return true;
        }
        match (self, value) {
            (Type::Dynamic, _) | (_, Type::Dynamic) => true,
            (Type::Array(None), Type::Array(_)) => true,
            (Type::Array(_), Type::Array(None)) => true,
            (Type::Array(Some(a)), Type::Array(Some(b))) => a.accepts(b),
            (Type::Function(a), Type::Function(b)) => {
                a.params.len() == b.params.len()
                    && a.params
                        .iter()
                        .zip(b.params.iter())
                        .all(|(x, y)| x.accepts(y))
                    && a.ret.accepts(&b.ret)
            }
            _ => false,
        }
    }

    /// The element type an index expression on this type produces, if any.
    ///
    /// Strings index to chars, dictionaries to dynamic values, arrays to
    /// their element type (dynamic for heterogeneous arrays and arrays of
    /// dictionaries).
    pub fn index_result(&self) -> Option<Type> {
        match self {
            Type::Str => Some(Type::Char),
            Type::Dict => Some(Type::Dynamic),
            // Indexing a dynamic value dispatches on its runtime tag.
            Type::Dynamic => Some(Type::Dynamic),
            Type::Array(None) => Some(Type::Dynamic),
            Type::Array(Some(elem)) => {
                if **elem == Type::Dict {
                    Some(Type::Dynamic)
                } else {
                    Some((**elem).clone())
                }
            }
            _ => None,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Int => write!(f, "tiro"),
            Type::Float => write!(f, "jajab"),
            Type::Str => write!(f, "eray"),
            Type::Char => write!(f, "xaraf"),
            Type::Bool => write!(f, "miyaa"),
            Type::Void => write!(f, "waxbo"),
            Type::Dict => write!(f, "qaamuus"),
            Type::Array(None) => write!(f, "tix"),
            Type::Array(Some(elem)) => write!(f, "tix:{}", elem),
            Type::Function(func) => {
                let params: Vec<String> = func.params.iter().map(|p| p.to_string()).collect();
                write!(f, "hawl({}):{}", params.join(", "), func.ret)
            }
            Type::Class(name) => write!(f, "{}", name),
            Type::TypeTag(name) => write!(f, "typetag:{}", name),
            Type::Dynamic => write!(f, "dynamic_value"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_primitives() {
        assert_eq!(Type::Int.to_string(), "tiro");
        assert_eq!(Type::Str.to_string(), "eray");
        assert_eq!(Type::Dict.to_string(), "qaamuus");
        assert_eq!(Type::Dynamic.to_string(), "dynamic_value");
    }

    #[test]
    fn test_display_recursive_arrays() {
        let nested = Type::Array(Some(Box::new(Type::Array(Some(Box::new(Type::Int))))));
        assert_eq!(nested.to_string(), "tix:tix:tiro");
        assert_eq!(Type::Array(None).to_string(), "tix");
    }

    #[test]
    fn test_display_function_type() {
        let func = Type::Function(FunctionType {
            params: vec![Type::Int, Type::Str],
            ret: Box::new(Type::Bool),
        });
        assert_eq!(func.to_string(), "hawl(tiro, eray):miyaa");
    }

    #[test]
    fn test_display_type_tag() {
        assert_eq!(Type::TypeTag("tiro".to_string()).to_string(), "typetag:tiro");
    }

    #[test]
    fn test_dynamic_accepts_everything() {
        assert!(Type::Int.accepts(&Type::Dynamic));
        assert!(Type::Dynamic.accepts(&Type::Str));
        assert!(Type::Array(Some(Box::new(Type::Int))).accepts(&Type::Dynamic));
    }

    #[test]
    fn test_heterogeneous_array_compatibility() {
        let mixed = Type::Array(None);
        let ints = Type::Array(Some(Box::new(Type::Int)));
        assert!(mixed.accepts(&ints));
        assert!(ints.accepts(&mixed));
        assert!(!ints.accepts(&Type::Array(Some(Box::new(Type::Str)))));
    }

    #[test]
    fn test_function_type_compatibility() {
        let a = Type::Function(FunctionType {
            params: vec![Type::Int],
            ret: Box::new(Type::Void),
        });
        let b = Type::Function(FunctionType {
            params: vec![Type::Int],
            ret: Box::new(Type::Void),
        });
        let c = Type::Function(FunctionType {
            params: vec![Type::Str],
            ret: Box::new(Type::Void),
        });
        assert!(a.accepts(&b));
        assert!(!a.accepts(&c));
    }

    #[test]
    fn test_class_equality_is_nominal() {
        assert!(Type::Class("Qof".to_string()).accepts(&Type::Class("Qof".to_string())));
        assert!(!Type::Class("Qof".to_string()).accepts(&Type::Class("Xayawaan".to_string())));
    }

    #[test]
    fn test_index_result() {
        assert_eq!(Type::Str.index_result(), Some(Type::Char));
        assert_eq!(Type::Dict.index_result(), Some(Type::Dynamic));
        assert_eq!(Type::Array(None).index_result(), Some(Type::Dynamic));
        assert_eq!(
            Type::Array(Some(Box::new(Type::Int))).index_result(),
            Some(Type::Int)
        );
        assert_eq!(
            Type::Array(Some(Box::new(Type::Dict))).index_result(),
            Some(Type::Dynamic)
        );
        assert_eq!(Type::Int.index_result(), None);
    }
}
