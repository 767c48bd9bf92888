//! Logic and equality operations: not, eq?, equal?
//!
//! `and` and `or` are special forms (they short-circuit), so only negation
//! and the two equality predicates live here.
//!
//! - `eq?`: value equality for atoms, identity for pairs and closures
//! - `equal?`: structural deep equality

use super::{define_builtin, expect_exact};
use crate::env::Environment;
use crate::error::Error;
use crate::value::Value;
use std::rc::Rc;

/// Inverse of truthiness: #t only for #f
pub fn builtin_not(args: &[Value], _env: &Rc<Environment>) -> Result<Value, Error> {
    expect_exact("not", args, 1)?;
    Ok(Value::Bool(!args[0].is_truthy()))
}

/// Identity/atom equality
pub fn builtin_eq_q(args: &[Value], _env: &Rc<Environment>) -> Result<Value, Error> {
    expect_exact("eq?", args, 2)?;
    Ok(Value::Bool(args[0].is_identical(&args[1])))
}

/// Structural deep equality
pub fn builtin_equal_q(args: &[Value], _env: &Rc<Environment>) -> Result<Value, Error> {
    expect_exact("equal?", args, 2)?;
    Ok(Value::Bool(args[0] == args[1]))
}

/// Register all logic builtins in the environment
pub fn register(env: &Rc<Environment>) {
    define_builtin(env, "not", builtin_not);
    define_builtin(env, "eq?", builtin_eq_q);
    define_builtin(env, "equal?", builtin_equal_q);
}
