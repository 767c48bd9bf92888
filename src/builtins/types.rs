//! Type predicates: atom?, boolean?, integer?, list?, number?, null?,
//! pair?, procedure?, string?, symbol?
//!
//! All are unary and return boolean. `list?` accepts Nil and proper lists;
//! `pair?` accepts any pair, improper chains included; an atom is anything
//! that is neither a pair nor Nil.

use super::{define_builtin, expect_exact};
use crate::env::Environment;
use crate::error::Error;
use crate::value::Value;
use std::rc::Rc;

fn predicate(
    procedure: &str,
    args: &[Value],
    test: fn(&Value) -> bool,
) -> Result<Value, Error> {
    expect_exact(procedure, args, 1)?;
    Ok(Value::Bool(test(&args[0])))
}

pub fn builtin_atom_q(args: &[Value], _env: &Rc<Environment>) -> Result<Value, Error> {
    predicate("atom?", args, |v| {
        !matches!(v, Value::Pair(_, _) | Value::Nil)
    })
}

pub fn builtin_boolean_q(args: &[Value], _env: &Rc<Environment>) -> Result<Value, Error> {
    predicate("boolean?", args, |v| matches!(v, Value::Bool(_)))
}

pub fn builtin_integer_q(args: &[Value], _env: &Rc<Environment>) -> Result<Value, Error> {
    predicate("integer?", args, |v| {
        matches!(v, Value::Number(n) if n.fract() == 0.0 && n.is_finite())
    })
}

pub fn builtin_list_q(args: &[Value], _env: &Rc<Environment>) -> Result<Value, Error> {
    predicate("list?", args, Value::is_list)
}

pub fn builtin_number_q(args: &[Value], _env: &Rc<Environment>) -> Result<Value, Error> {
    predicate("number?", args, |v| matches!(v, Value::Number(_)))
}

pub fn builtin_null_q(args: &[Value], _env: &Rc<Environment>) -> Result<Value, Error> {
    predicate("null?", args, |v| matches!(v, Value::Nil))
}

pub fn builtin_pair_q(args: &[Value], _env: &Rc<Environment>) -> Result<Value, Error> {
    predicate("pair?", args, |v| matches!(v, Value::Pair(_, _)))
}

pub fn builtin_procedure_q(args: &[Value], _env: &Rc<Environment>) -> Result<Value, Error> {
    predicate("procedure?", args, |v| {
        matches!(v, Value::Builtin(_) | Value::Closure(_))
    })
}

pub fn builtin_string_q(args: &[Value], _env: &Rc<Environment>) -> Result<Value, Error> {
    predicate("string?", args, |v| matches!(v, Value::String(_)))
}

pub fn builtin_symbol_q(args: &[Value], _env: &Rc<Environment>) -> Result<Value, Error> {
    predicate("symbol?", args, |v| matches!(v, Value::Symbol(_)))
}

/// Register all type predicates in the environment
pub fn register(env: &Rc<Environment>) {
    define_builtin(env, "atom?", builtin_atom_q);
    define_builtin(env, "boolean?", builtin_boolean_q);
    define_builtin(env, "integer?", builtin_integer_q);
    define_builtin(env, "list?", builtin_list_q);
    define_builtin(env, "number?", builtin_number_q);
    define_builtin(env, "null?", builtin_null_q);
    define_builtin(env, "pair?", builtin_pair_q);
    define_builtin(env, "procedure?", builtin_procedure_q);
    define_builtin(env, "string?", builtin_string_q);
    define_builtin(env, "symbol?", builtin_symbol_q);
}
