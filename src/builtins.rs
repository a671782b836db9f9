//! The built-in function registry.
//!
//! A fixed table maps source-level builtin names to their return type, the
//! runtime feature tag they pull in, and the C symbol they lower to.
//! Adding a new builtin means adding a row here; neither the analyzer nor
//! the generator needs any other change, except for the handful of
//! builtins with bespoke lowering (`nooc`, `dherer`, `tix_cayiman` and the
//! casts), which the generator special-cases by name.

use crate::ast::Type;
use crate::codegen::Feature;

/// One registered builtin.
#[derive(Debug)]
pub struct Builtin {
    /// The source-level name.
    pub name: &'static str,
    /// The call's static result type.
    pub return_type: Type,
    /// The runtime feature the lowering depends on, if any.
    pub feature: Option<Feature>,
    /// The C symbol a plain call lowers to. `None` for builtins with
    /// bespoke lowering in the generator.
    pub c_symbol: Option<&'static str>,
}

/// The builtin registry.
///
/// `koobi` and `nuqul` are both accepted spellings of the copy helper.
pub static BUILTINS: &[Builtin] = &[
    Builtin {
        name: "tix_cayiman",
        return_type: Type::Array(None),
        feature: Some(Feature::Array),
        c_symbol: None,
    },
    Builtin {
        name: "nooc",
        return_type: Type::Str,
        feature: None,
        c_symbol: None,
    },
    Builtin {
        name: "dherer",
        return_type: Type::Int,
        feature: None,
        c_symbol: None,
    },
    // Typed casts.
    Builtin {
        name: "eray",
        return_type: Type::Str,
        feature: Some(Feature::Conversion),
        c_symbol: Some("to_string"),
    },
    Builtin {
        name: "tiro",
        return_type: Type::Int,
        feature: Some(Feature::Conversion),
        c_symbol: Some("to_int"),
    },
    Builtin {
        name: "jajab",
        return_type: Type::Float,
        feature: Some(Feature::Conversion),
        c_symbol: Some("to_float"),
    },
    Builtin {
        name: "miyaa",
        return_type: Type::Bool,
        feature: Some(Feature::Conversion),
        c_symbol: Some("to_bool"),
    },
    // OS helpers.
    Builtin {
        name: "tusmo_os_system",
        return_type: Type::Int,
        feature: Some(Feature::Os),
        c_symbol: Some("os_system"),
    },
    Builtin {
        name: "koobi",
        return_type: Type::Void,
        feature: Some(Feature::Os),
        c_symbol: Some("os_copy"),
    },
    Builtin {
        name: "nuqul",
        return_type: Type::Void,
        feature: Some(Feature::Os),
        c_symbol: Some("os_copy"),
    },
    Builtin {
        name: "u_dhaqaaji",
        return_type: Type::Void,
        feature: Some(Feature::Os),
        c_symbol: Some("os_move"),
    },
    Builtin {
        name: "aqri_fayl",
        return_type: Type::Str,
        feature: Some(Feature::Os),
        c_symbol: Some("os_read_file"),
    },
    Builtin {
        name: "qor_fayl",
        return_type: Type::Void,
        feature: Some(Feature::Os),
        c_symbol: Some("os_write_file"),
    },
    Builtin {
        name: "isku_dar_waddo",
        return_type: Type::Str,
        feature: Some(Feature::Os),
        c_symbol: Some("os_join_path"),
    },
    Builtin {
        name: "cabbir_fayl",
        return_type: Type::Int,
        feature: Some(Feature::Os),
        c_symbol: Some("os_file_size"),
    },
];

/// Looks up a builtin by its source-level name.
pub fn lookup(name: &str) -> Option<&'static Builtin> {
    BUILTINS.iter().find(|b| b.name == name)
}

/// Returns true when `name` is a registered builtin.
pub fn is_builtin(name: &str) -> bool {
    lookup(name).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_known_builtins() {
        assert!(is_builtin("dherer"));
        assert!(is_builtin("nooc"));
        assert!(is_builtin("tiro"));
        assert!(is_builtin("aqri_fayl"));
        assert!(!is_builtin("ma_jiro"));
    }

    #[test]
    fn test_cast_return_types() {
        assert_eq!(lookup("tiro").unwrap().return_type, Type::Int);
        assert_eq!(lookup("jajab").unwrap().return_type, Type::Float);
        assert_eq!(lookup("eray").unwrap().return_type, Type::Str);
        assert_eq!(lookup("miyaa").unwrap().return_type, Type::Bool);
    }

    #[test]
    fn test_os_helpers_share_feature() {
        for name in [
            "tusmo_os_system",
            "koobi",
            "nuqul",
            "u_dhaqaaji",
            "aqri_fayl",
            "qor_fayl",
            "isku_dar_waddo",
            "cabbir_fayl",
        ] {
            assert_eq!(lookup(name).unwrap().feature, Some(Feature::Os));
        }
    }

    #[test]
    fn test_copy_spellings_share_symbol() {
        assert_eq!(lookup("koobi").unwrap().c_symbol, Some("os_copy"));
        assert_eq!(lookup("nuqul").unwrap().c_symbol, Some("os_copy"));
    }
}
