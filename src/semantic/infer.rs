//! Expression type inference.
//!
//! [`type_of`] computes the static type of an expression against the
//! current symbol table, raising a [`SemanticError`] for unknown names,
//! bad contexts and non-indexable or non-class operand types. The code
//! generator re-runs the same inference through [`type_of_lenient`],
//! which maps failures to `None` instead so generation can fall back to
//! runtime-dispatched paths; after a successful analysis pass those
//! failures are rare.

use super::error::{SemanticError, SemanticErrorKind};
use super::symbol::{Symbol, SymbolTable};
use crate::ast::{BinaryOp, Expr, ExprKind, FunctionType, Type};
use crate::builtins;

/// Computes the static type of `expr`, strictly.
pub fn type_of(symbols: &SymbolTable, expr: &Expr) -> Result<Type, SemanticError> {
    let err = |kind, message: String| SemanticError::new(kind, message, expr.span, &expr.file);

    match &expr.kind {
        ExprKind::Int(_) => Ok(Type::Int),
        ExprKind::Float(_) => Ok(Type::Float),
        ExprKind::Str(_) => Ok(Type::Str),
        ExprKind::Char(_) => Ok(Type::Char),
        ExprKind::Bool(_) => Ok(Type::Bool),
        ExprKind::FString(_) => Ok(Type::Str),
        ExprKind::TypeLiteral(name) => Ok(Type::TypeTag(name.clone())),
        ExprKind::DictLit(_) => Ok(Type::Dict),

        ExprKind::Identifier(name) => match symbols.lookup(name) {
            Some(Symbol::Variable(ty)) => Ok(ty.clone()),
            Some(Symbol::Function(sig)) => Ok(Type::Function(FunctionType {
                params: sig.params.iter().map(|p| p.ty.clone()).collect(),
                ret: Box::new(sig.return_type.clone()),
            })),
            Some(Symbol::Class(_)) => Err(err(
                SemanticErrorKind::TypeMismatch,
                format!("'{}' is a class, not a value", name),
            )),
            None => Err(err(
                SemanticErrorKind::UndefinedVariable,
                format!("Variable '{}' was not found", name),
            )),
        },

        ExprKind::SelfRef => match symbols.lookup("kan") {
            Some(Symbol::Variable(ty)) => Ok(ty.clone()),
            _ => Err(err(
                SemanticErrorKind::InvalidContext,
                "'kan' may only be used inside a method".to_string(),
            )),
        },

        ExprKind::ParentRef => {
            let Some(Symbol::Variable(Type::Class(class))) = symbols.lookup("kan") else {
                return Err(err(
                    SemanticErrorKind::InvalidContext,
                    "'waalid' may only be used inside a method".to_string(),
                ));
            };
            match symbols.lookup_class(class).and_then(|c| c.parent.clone()) {
                Some(parent) => Ok(Type::Class(parent)),
                None => Err(err(
                    SemanticErrorKind::InvalidContext,
                    format!("'waalid' requires class '{}' to inherit a parent", class),
                )),
            }
        }

        ExprKind::Unary { operand, .. } => {
            let ty = type_of(symbols, operand)?;
            match ty {
                Type::Int | Type::Float | Type::Dynamic => Ok(ty),
                other => Err(err(
                    SemanticErrorKind::TypeMismatch,
                    format!("Cannot negate a value of type '{}'", other),
                )),
            }
        }

        ExprKind::Binary { left, op, right } => {
            let lt = type_of(symbols, left)?;
            let rt = type_of(symbols, right)?;
            if op.is_boolean() {
                return Ok(Type::Bool);
            }
            if *op == BinaryOp::Add && (lt == Type::Str || rt == Type::Str) {
                return Ok(Type::Str);
            }
            Ok(lt)
        }

        ExprKind::Ternary { if_true, .. } => type_of(symbols, if_true),

        ExprKind::ArrayLit(elements) => {
            let Some(first) = elements.first() else {
                return Ok(Type::Array(None));
            };
            let first_ty = type_of(symbols, first)?;
            for element in &elements[1..] {
                if type_of(symbols, element)? != first_ty {
                    return Ok(Type::Array(None));
                }
            }
            Ok(Type::Array(Some(Box::new(first_ty))))
        }

        ExprKind::Index { base, .. } => {
            let base_ty = type_of(symbols, base)?;
            base_ty.index_result().ok_or_else(|| {
                err(
                    SemanticErrorKind::TypeMismatch,
                    format!("Cannot index into a value of type '{}'", base_ty),
                )
            })
        }

        ExprKind::ElemTypeQuery(name) => match symbols.lookup(name) {
            Some(Symbol::Variable(ty @ Type::Array(_))) => Ok(ty.clone()),
            Some(_) => Err(err(
                SemanticErrorKind::TypeMismatch,
                format!("'{}' is not an array, so 'nooc({}[])' is invalid", name, name),
            )),
            None => Err(err(
                SemanticErrorKind::UndefinedVariable,
                format!("Variable '{}' was not found", name),
            )),
        },

        ExprKind::Member { object, member } => {
            let object_ty = type_of(symbols, object)?;
            let Type::Class(class) = &object_ty else {
                return Err(err(
                    SemanticErrorKind::TypeMismatch,
                    format!("Member access on '{}', which is not a class", object_ty),
                ));
            };
            if symbols.lookup_class(class).is_none() {
                return Err(err(
                    SemanticErrorKind::UndefinedClass,
                    format!("Class '{}' was not found", class),
                ));
            }
            match symbols.find_member(class, member) {
                Some((ty, _)) => Ok(ty),
                None => Err(err(
                    SemanticErrorKind::UnknownMember,
                    format!("Class '{}' has no member named '{}'", class, member),
                )),
            }
        }

        ExprKind::MethodCall(call) => {
            let object_ty = type_of(symbols, &call.object)?;
            match &object_ty {
                Type::Array(elem) => match call.method.as_str() {
                    "gali" => Ok(Type::Void),
                    "kasaar" => {
                        // Pop by index returns the element; remove by
                        // value reports whether it was found.
                        let by_index = call
                            .args
                            .first()
                            .is_some_and(|a| matches!(a, crate::ast::Arg::Named { name, .. } if name == "boos"));
                        if by_index {
                            Ok(elem
                                .as_ref()
                                .map(|e| (**e).clone())
                                .unwrap_or(Type::Dynamic))
                        } else {
                            Ok(Type::Bool)
                        }
                    }
                    other => Err(err(
                        SemanticErrorKind::UnknownMethod,
                        format!("Arrays have no method named '{}'", other),
                    )),
                },
                Type::Dict => match call.method.as_str() {
                    "kasaar" => Ok(Type::Void),
                    "majiraa" => Ok(Type::Bool),
                    other => Err(err(
                        SemanticErrorKind::UnknownMethod,
                        format!("Dictionaries have no method named '{}'", other),
                    )),
                },
                Type::Class(class) => match symbols.find_method(class, &call.method) {
                    Some((sig, _)) => Ok(sig.return_type),
                    None => Err(err(
                        SemanticErrorKind::UnknownMethod,
                        format!("Class '{}' has no method named '{}'", class, call.method),
                    )),
                },
                other => Err(err(
                    SemanticErrorKind::TypeMismatch,
                    format!("Cannot call a method on a value of type '{}'", other),
                )),
            }
        }

        ExprKind::Call(call) => {
            if call.name == "tix_cayiman" {
                return Ok(Type::Array(None));
            }
            match symbols.lookup(&call.name) {
                Some(Symbol::Function(sig)) => Ok(sig.return_type.clone()),
                Some(Symbol::Variable(Type::Function(func))) => Ok((*func.ret).clone()),
                Some(Symbol::Variable(other)) => Err(err(
                    SemanticErrorKind::TypeMismatch,
                    format!("'{}' has type '{}' and is not callable", call.name, other),
                )),
                Some(Symbol::Class(_)) => Err(err(
                    SemanticErrorKind::TypeMismatch,
                    format!("'{}' is a class; instantiate it with 'cusub'", call.name),
                )),
                None => match builtins::lookup(&call.name) {
                    Some(builtin) => Ok(builtin.return_type.clone()),
                    None => Err(err(
                        SemanticErrorKind::UndefinedFunction,
                        format!("Function '{}' was not found", call.name),
                    )),
                },
            }
        }

        ExprKind::New(new) => {
            if symbols.lookup_class(&new.class).is_none() {
                return Err(err(
                    SemanticErrorKind::UndefinedClass,
                    format!("Class '{}' was not found", new.class),
                ));
            }
            Ok(Type::Class(new.class.clone()))
        }

        // The result of a raw C call is only known at runtime.
        ExprKind::CCall { .. } => Ok(Type::Dynamic),
    }
}

/// Computes the static type of `expr`, mapping failures to `None`.
pub fn type_of_lenient(symbols: &SymbolTable, expr: &Expr) -> Option<Type> {
    type_of(symbols, expr).ok()
}
