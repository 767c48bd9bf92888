//! Arithmetic operations: +, -, *, /, abs, quotient, modulo, remainder,
//! expt, zero?, even?, odd?
//!
//! - `+` and `*` are variadic with identities 0 and 1
//! - `-` and `/` take 1 or 2 arguments; `(- x)` negates, `(/ x)` is 1/x
//! - `quotient`, `modulo` and `remainder` require integral operands;
//!   `modulo` takes the divisor's sign, `remainder` the dividend's
//! - `(expt 0 0)` is a domain error

use super::{define_builtin, expect_exact, expect_range, integer_arg, number_arg};
use crate::env::Environment;
use crate::error::Error;
use crate::value::Value;
use std::rc::Rc;

/// Returns the sum of all arguments
pub fn builtin_add(args: &[Value], _env: &Rc<Environment>) -> Result<Value, Error> {
    let mut sum = 0.0;
    for index in 0..args.len() {
        sum += number_arg("+", args, index)?;
    }
    Ok(Value::Number(sum))
}

/// Returns the product of all arguments
pub fn builtin_mul(args: &[Value], _env: &Rc<Environment>) -> Result<Value, Error> {
    let mut product = 1.0;
    for index in 0..args.len() {
        product *= number_arg("*", args, index)?;
    }
    Ok(Value::Number(product))
}

/// Subtracts the second argument from the first; negates a single argument
pub fn builtin_sub(args: &[Value], _env: &Rc<Environment>) -> Result<Value, Error> {
    expect_range("-", args, 1, 2)?;
    let first = number_arg("-", args, 0)?;
    if args.len() == 1 {
        return Ok(Value::Number(-first));
    }
    let second = number_arg("-", args, 1)?;
    Ok(Value::Number(first - second))
}

/// Divides the first argument by the second; a single argument yields its
/// reciprocal. The divisor must be nonzero.
pub fn builtin_div(args: &[Value], _env: &Rc<Environment>) -> Result<Value, Error> {
    expect_range("/", args, 1, 2)?;
    let (dividend, divisor) = if args.len() == 1 {
        (1.0, number_arg("/", args, 0)?)
    } else {
        (number_arg("/", args, 0)?, number_arg("/", args, 1)?)
    };
    if divisor == 0.0 {
        return Err(Error::lisp("/: division by zero"));
    }
    Ok(Value::Number(dividend / divisor))
}

/// Absolute value
pub fn builtin_abs(args: &[Value], _env: &Rc<Environment>) -> Result<Value, Error> {
    expect_exact("abs", args, 1)?;
    Ok(Value::Number(number_arg("abs", args, 0)?.abs()))
}

/// Tests whether a number is zero
pub fn builtin_zero_q(args: &[Value], _env: &Rc<Environment>) -> Result<Value, Error> {
    expect_exact("zero?", args, 1)?;
    Ok(Value::Bool(number_arg("zero?", args, 0)? == 0.0))
}

/// Tests whether an integer is even
pub fn builtin_even_q(args: &[Value], _env: &Rc<Environment>) -> Result<Value, Error> {
    expect_exact("even?", args, 1)?;
    Ok(Value::Bool(integer_arg("even?", args, 0)? % 2 == 0))
}

/// Tests whether an integer is odd
pub fn builtin_odd_q(args: &[Value], _env: &Rc<Environment>) -> Result<Value, Error> {
    expect_exact("odd?", args, 1)?;
    Ok(Value::Bool(integer_arg("odd?", args, 0)? % 2 != 0))
}

/// Integer division truncated toward zero
pub fn builtin_quotient(args: &[Value], _env: &Rc<Environment>) -> Result<Value, Error> {
    expect_exact("quotient", args, 2)?;
    let a = integer_arg("quotient", args, 0)?;
    let b = integer_arg("quotient", args, 1)?;
    if b == 0 {
        return Err(Error::lisp("quotient: division by zero"));
    }
    Ok(Value::Number((a / b) as f64))
}

/// Remainder carrying the divisor's sign
pub fn builtin_modulo(args: &[Value], _env: &Rc<Environment>) -> Result<Value, Error> {
    expect_exact("modulo", args, 2)?;
    let a = integer_arg("modulo", args, 0)?;
    let b = integer_arg("modulo", args, 1)?;
    if b == 0 {
        return Err(Error::lisp("modulo: division by zero"));
    }
    let mut result = a % b;
    if result != 0 && (result < 0) != (b < 0) {
        result += b;
    }
    Ok(Value::Number(result as f64))
}

/// Remainder carrying the dividend's sign
pub fn builtin_remainder(args: &[Value], _env: &Rc<Environment>) -> Result<Value, Error> {
    expect_exact("remainder", args, 2)?;
    let a = integer_arg("remainder", args, 0)?;
    let b = integer_arg("remainder", args, 1)?;
    if b == 0 {
        return Err(Error::lisp("remainder: division by zero"));
    }
    Ok(Value::Number((a % b) as f64))
}

/// Exponentiation; 0^0 is undefined
pub fn builtin_expt(args: &[Value], _env: &Rc<Environment>) -> Result<Value, Error> {
    expect_exact("expt", args, 2)?;
    let base = number_arg("expt", args, 0)?;
    let exponent = number_arg("expt", args, 1)?;
    if base == 0.0 && exponent == 0.0 {
        return Err(Error::lisp(
            "expt: the base and the exponent cannot both be zero",
        ));
    }
    Ok(Value::Number(base.powf(exponent)))
}

/// Register all arithmetic builtins in the environment
pub fn register(env: &Rc<Environment>) {
    define_builtin(env, "+", builtin_add);
    define_builtin(env, "-", builtin_sub);
    define_builtin(env, "*", builtin_mul);
    define_builtin(env, "/", builtin_div);
    define_builtin(env, "abs", builtin_abs);
    define_builtin(env, "zero?", builtin_zero_q);
    define_builtin(env, "even?", builtin_even_q);
    define_builtin(env, "odd?", builtin_odd_q);
    define_builtin(env, "quotient", builtin_quotient);
    define_builtin(env, "modulo", builtin_modulo);
    define_builtin(env, "remainder", builtin_remainder);
    define_builtin(env, "expt", builtin_expt);
}
