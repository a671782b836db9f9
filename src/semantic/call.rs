//! Ordered-argument resolution for calls, method calls and constructors.
//!
//! Named-argument handling happens once, here, during semantic analysis:
//! the resolved vector is stored on the call node and the generator only
//! ever consumes that vector. Positional arguments fill the next open
//! slot; a named argument fills its parameter's slot; any slot still open
//! afterwards takes the parameter's default. Every violation is an
//! [`InvalidArgument`](super::SemanticErrorKind::InvalidArgument) error.

use super::error::{SemanticError, SemanticErrorKind};
use crate::ast::{Arg, Expr, Param};
use crate::token::Span;

/// Resolves `args` against `params`, producing a vector with exactly one
/// expression per parameter.
///
/// `context` names the callee for error messages, e.g. `function 'f'`.
pub(super) fn resolve_arguments(
    params: &[Param],
    args: &[Arg],
    context: &str,
    span: Span,
    file: &str,
) -> Result<Vec<Expr>, SemanticError> {
    let err = |message: String, at: Span| {
        SemanticError::new(SemanticErrorKind::InvalidArgument, message, at, file)
    };

    let mut ordered: Vec<Option<Expr>> = vec![None; params.len()];
    let mut next_positional = 0;
    let mut seen_named = false;

    for arg in args {
        match arg {
            Arg::Named {
                name,
                value,
                span: arg_span,
            } => {
                seen_named = true;
                let Some(index) = params.iter().position(|p| &p.name == name) else {
                    return Err(err(
                        format!("Unknown parameter name '{}' in {}", name, context),
                        *arg_span,
                    ));
                };
                if ordered[index].is_some() {
                    return Err(err(
                        format!("Parameter '{}' was given twice in {}", name, context),
                        *arg_span,
                    ));
                }
                ordered[index] = Some(value.clone());
            }
            Arg::Positional(value) => {
                if seen_named {
                    return Err(err(
                        format!(
                            "Positional arguments may not follow named arguments in {}",
                            context
                        ),
                        value.span,
                    ));
                }
                if next_positional >= params.len() {
                    return Err(err(
                        format!(
                            "{} takes {} argument(s) but more were given",
                            context,
                            params.len()
                        ),
                        span,
                    ));
                }
                ordered[next_positional] = Some(value.clone());
                next_positional += 1;
            }
        }
    }

    let mut resolved = Vec::with_capacity(params.len());
    for (param, slot) in params.iter().zip(ordered) {
        match slot {
            Some(value) => resolved.push(value),
            None => match &param.default {
                Some(default) => resolved.push(default.clone()),
                None => {
                    return Err(err(
                        format!("Missing argument for parameter '{}' in {}", param.name, context),
                        span,
                    ));
                }
            },
        }
    }
    Ok(resolved)
}
