//! Higher-order procedures: map, filter, reduce, apply
//!
//! These re-enter the evaluator through the apply protocol, so they take the
//! call-site environment seriously. `reduce` is a right fold.

use super::{define_builtin, expect_exact, list_arg};
use crate::env::Environment;
use crate::error::Error;
use crate::eval;
use crate::value::Value;
use std::rc::Rc;

/// List of proc applied to each element, in order
pub fn builtin_map(args: &[Value], env: &Rc<Environment>) -> Result<Value, Error> {
    expect_exact("map", args, 2)?;
    let elements = list_arg("map", args, 1)?;

    let mut results = Vec::with_capacity(elements.len());
    for element in elements {
        results.push(eval::apply(&args[0], vec![element], env)?);
    }
    Ok(Value::from_elements(results))
}

/// Elements for which pred is truthy, in order
pub fn builtin_filter(args: &[Value], env: &Rc<Environment>) -> Result<Value, Error> {
    expect_exact("filter", args, 2)?;
    let elements = list_arg("filter", args, 1)?;

    let mut kept = Vec::new();
    for element in elements {
        if eval::apply(&args[0], vec![element.clone()], env)?.is_truthy() {
            kept.push(element);
        }
    }
    Ok(Value::from_elements(kept))
}

/// Right fold: (reduce f (list a b c)) is (f a (f b c)). The empty list is
/// a domain error; a singleton returns its element without calling f.
pub fn builtin_reduce(args: &[Value], env: &Rc<Environment>) -> Result<Value, Error> {
    expect_exact("reduce", args, 2)?;
    let elements = list_arg("reduce", args, 1)?;

    let (last, init) = elements
        .split_last()
        .ok_or_else(|| Error::lisp("reduce: empty list"))?;

    let mut accumulator = last.clone();
    for element in init.iter().rev() {
        accumulator = eval::apply(&args[0], vec![element.clone(), accumulator], env)?;
    }
    Ok(accumulator)
}

/// Calls proc with the elements of list as its arguments
pub fn builtin_apply(args: &[Value], env: &Rc<Environment>) -> Result<Value, Error> {
    expect_exact("apply", args, 2)?;
    let arguments = list_arg("apply", args, 1)?;
    eval::apply(&args[0], arguments, env)
}

/// Register all higher-order builtins in the environment
pub fn register(env: &Rc<Environment>) {
    define_builtin(env, "map", builtin_map);
    define_builtin(env, "filter", builtin_filter);
    define_builtin(env, "reduce", builtin_reduce);
    define_builtin(env, "apply", builtin_apply);
}
