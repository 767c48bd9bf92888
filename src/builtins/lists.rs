//! Pair and list surgery: car, cdr, cons, list, length, append
//!
//! `car` and `cdr` require a pair; `length` requires a proper list (or Nil);
//! `append` concatenates proper lists, with the final argument permitted to
//! be any value, which becomes the tail of the result.

use super::{define_builtin, expect_exact, list_arg};
use crate::env::Environment;
use crate::error::Error;
use crate::value::Value;
use std::rc::Rc;

/// First component of a pair
pub fn builtin_car(args: &[Value], _env: &Rc<Environment>) -> Result<Value, Error> {
    expect_exact("car", args, 1)?;
    match &args[0] {
        Value::Pair(car, _) => Ok(car.as_ref().clone()),
        other => Err(Error::type_mismatch("car", "pair", other, 1)),
    }
}

/// Second component of a pair
pub fn builtin_cdr(args: &[Value], _env: &Rc<Environment>) -> Result<Value, Error> {
    expect_exact("cdr", args, 1)?;
    match &args[0] {
        Value::Pair(_, cdr) => Ok(cdr.as_ref().clone()),
        other => Err(Error::type_mismatch("cdr", "pair", other, 1)),
    }
}

/// Builds one cons cell; the second argument may be any value
pub fn builtin_cons(args: &[Value], _env: &Rc<Environment>) -> Result<Value, Error> {
    expect_exact("cons", args, 2)?;
    Ok(Value::cons(args[0].clone(), args[1].clone()))
}

/// Builds a proper list of the arguments in order
pub fn builtin_list(args: &[Value], _env: &Rc<Environment>) -> Result<Value, Error> {
    Ok(Value::from_elements(args.to_vec()))
}

/// Number of cons cells before Nil
pub fn builtin_length(args: &[Value], _env: &Rc<Environment>) -> Result<Value, Error> {
    expect_exact("length", args, 1)?;
    match args[0].list_len() {
        Some(len) => Ok(Value::Number(len as f64)),
        None => Err(Error::type_mismatch("length", "list", &args[0], 1)),
    }
}

/// Concatenates proper lists; the last argument becomes the result's tail
pub fn builtin_append(args: &[Value], _env: &Rc<Environment>) -> Result<Value, Error> {
    let (last, init) = match args.split_last() {
        Some(split) => split,
        None => return Ok(Value::Nil),
    };

    let mut elements = Vec::new();
    for (index, _) in init.iter().enumerate() {
        elements.extend(list_arg("append", args, index)?);
    }

    let mut result = last.clone();
    for element in elements.into_iter().rev() {
        result = Value::cons(element, result);
    }
    Ok(result)
}

/// Register all list builtins in the environment
pub fn register(env: &Rc<Environment>) {
    define_builtin(env, "car", builtin_car);
    define_builtin(env, "cdr", builtin_cdr);
    define_builtin(env, "cons", builtin_cons);
    define_builtin(env, "list", builtin_list);
    define_builtin(env, "length", builtin_length);
    define_builtin(env, "append", builtin_append);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env() -> Rc<Environment> {
        Environment::new()
    }

    fn nums(ns: &[f64]) -> Value {
        Value::from_elements(ns.iter().map(|n| Value::Number(*n)).collect())
    }

    #[test]
    fn test_car_cdr_of_cons() {
        let e = env();
        let pair =
            builtin_cons(&[Value::Number(1.0), Value::Number(2.0)], &e).unwrap();
        assert_eq!(builtin_car(&[pair.clone()], &e).unwrap(), Value::Number(1.0));
        assert_eq!(builtin_cdr(&[pair], &e).unwrap(), Value::Number(2.0));
    }

    #[test]
    fn test_car_requires_pair() {
        let e = env();
        assert!(builtin_car(&[Value::Nil], &e).is_err());
        assert!(builtin_car(&[Value::Number(1.0)], &e).is_err());
        assert!(builtin_cdr(&[Value::Nil], &e).is_err());
    }

    #[test]
    fn test_cons_onto_list_prepends() {
        let e = env();
        let result = builtin_cons(&[Value::Number(1.0), nums(&[2.0, 3.0])], &e).unwrap();
        assert_eq!(result.to_string(), "(1 2 3)");
    }

    #[test]
    fn test_list_builds_proper_list() {
        let e = env();
        let result =
            builtin_list(&[Value::Number(1.0), Value::symbol("a")], &e).unwrap();
        assert_eq!(result.to_string(), "(1 a)");
        assert_eq!(builtin_list(&[], &e).unwrap(), Value::Nil);
    }

    #[test]
    fn test_length() {
        let e = env();
        assert_eq!(builtin_length(&[nums(&[1.0, 2.0, 3.0])], &e).unwrap(), Value::Number(3.0));
        assert_eq!(builtin_length(&[Value::Nil], &e).unwrap(), Value::Number(0.0));

        let dotted = Value::cons(Value::Number(1.0), Value::Number(2.0));
        assert!(builtin_length(&[dotted], &e).is_err());
    }

    #[test]
    fn test_append_concatenates() {
        let e = env();
        let result = builtin_append(&[nums(&[1.0, 2.0]), nums(&[3.0]), nums(&[4.0])], &e).unwrap();
        assert_eq!(result.to_string(), "(1 2 3 4)");
        assert_eq!(builtin_append(&[], &e).unwrap(), Value::Nil);
    }

    #[test]
    fn test_append_last_argument_becomes_tail() {
        let e = env();
        let result = builtin_append(&[nums(&[1.0, 2.0]), Value::Number(3.0)], &e).unwrap();
        assert_eq!(result.to_string(), "(1 2 . 3)");
        // single argument comes back untouched
        let result = builtin_append(&[Value::Number(5.0)], &e).unwrap();
        assert_eq!(result, Value::Number(5.0));
    }

    #[test]
    fn test_append_rejects_improper_prefix() {
        let e = env();
        let dotted = Value::cons(Value::Number(1.0), Value::Number(2.0));
        assert!(builtin_append(&[dotted, Value::Nil], &e).is_err());
    }
}
