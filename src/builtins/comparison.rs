//! Comparison operations: =, <, >, <=, >=
//!
//! Binary relational operators over numbers. All return boolean.

use super::{define_builtin, expect_exact, number_arg};
use crate::env::Environment;
use crate::error::Error;
use crate::value::Value;
use std::rc::Rc;

fn compare(
    procedure: &str,
    args: &[Value],
    relation: fn(f64, f64) -> bool,
) -> Result<Value, Error> {
    expect_exact(procedure, args, 2)?;
    let a = number_arg(procedure, args, 0)?;
    let b = number_arg(procedure, args, 1)?;
    Ok(Value::Bool(relation(a, b)))
}

/// Numeric equality
pub fn builtin_eq(args: &[Value], _env: &Rc<Environment>) -> Result<Value, Error> {
    compare("=", args, |a, b| a == b)
}

/// Strictly less than
pub fn builtin_lt(args: &[Value], _env: &Rc<Environment>) -> Result<Value, Error> {
    compare("<", args, |a, b| a < b)
}

/// Strictly greater than
pub fn builtin_gt(args: &[Value], _env: &Rc<Environment>) -> Result<Value, Error> {
    compare(">", args, |a, b| a > b)
}

/// Less than or equal
pub fn builtin_le(args: &[Value], _env: &Rc<Environment>) -> Result<Value, Error> {
    compare("<=", args, |a, b| a <= b)
}

/// Greater than or equal
pub fn builtin_ge(args: &[Value], _env: &Rc<Environment>) -> Result<Value, Error> {
    compare(">=", args, |a, b| a >= b)
}

/// Register all comparison builtins in the environment
pub fn register(env: &Rc<Environment>) {
    define_builtin(env, "=", builtin_eq);
    define_builtin(env, "<", builtin_lt);
    define_builtin(env, ">", builtin_gt);
    define_builtin(env, "<=", builtin_le);
    define_builtin(env, ">=", builtin_ge);
}
