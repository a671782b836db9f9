//! Dictionary lowering.
//!
//! Dictionary operations always dispatch to the dictionary runtime and
//! always box their values: writes wrap the value into a tagged value,
//! reads yield a tagged value that downstream code unwraps when its
//! static type is known.

use super::error::CodegenError;
use super::{Codegen, Feature};
use crate::ast::Expr;

impl Codegen {
    /// Emits the create-then-set sequence for a dictionary literal and
    /// returns the temporary holding the dictionary.
    pub(super) fn gen_dict_literal(
        &mut self,
        pairs: &[(Expr, Expr)],
    ) -> Result<String, CodegenError> {
        self.use_feature(Feature::Dictionary);
        let temp = self.temp_var();
        self.emit(&format!("TusmoDict* {} = dict_create();", temp));
        for (key, value) in pairs {
            let key_c = self.gen_expr(key)?;
            let boxed = self.boxed_value(value)?;
            self.emit(&format!("dict_set({}, {}, {});", temp, key_c, boxed));
        }
        Ok(temp)
    }

    /// Emits a `dict_set` for an assignment through a dictionary index.
    pub(super) fn gen_dict_set(
        &mut self,
        dict: &Expr,
        key: &Expr,
        value: &Expr,
    ) -> Result<(), CodegenError> {
        self.use_feature(Feature::Dictionary);
        let dict_c = self.gen_expr(dict)?;
        let key_c = self.gen_expr(key)?;
        let boxed = self.boxed_value(value)?;
        self.emit(&format!("dict_set({}, {}, {});", dict_c, key_c, boxed));
        Ok(())
    }
}
