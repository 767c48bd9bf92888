//! Control operations: error, exit, eval
//!
//! `error` raises an evaluation failure carrying its message; `exit`
//! terminates the process; `eval` re-enters the evaluator on a datum.

use super::{define_builtin, expect_exact, expect_range, integer_arg};
use crate::env::Environment;
use crate::error::Error;
use crate::eval;
use crate::value::Value;
use std::rc::Rc;

/// Raises a Lisp error with the given message
pub fn builtin_error(args: &[Value], _env: &Rc<Environment>) -> Result<Value, Error> {
    expect_exact("error", args, 1)?;
    Err(Error::Lisp(args[0].display_text()))
}

/// Terminates the process with the given status, or 0
pub fn builtin_exit(args: &[Value], _env: &Rc<Environment>) -> Result<Value, Error> {
    expect_range("exit", args, 0, 1)?;
    let code = if args.is_empty() {
        0
    } else {
        integer_arg("exit", args, 0)?
    };
    // process::exit skips destructors; push out any partial display output
    let _ = std::io::Write::flush(&mut std::io::stdout());
    std::process::exit(code as i32);
}

/// Evaluates a datum in the current environment
pub fn builtin_eval(args: &[Value], env: &Rc<Environment>) -> Result<Value, Error> {
    expect_exact("eval", args, 1)?;
    eval::eval(&args[0], env)
}

/// Register all control builtins in the environment
pub fn register(env: &Rc<Environment>) {
    define_builtin(env, "error", builtin_error);
    define_builtin(env, "exit", builtin_exit);
    define_builtin(env, "eval", builtin_eval);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtins::register_builtins;

    fn root() -> Rc<Environment> {
        let env = Environment::new();
        register_builtins(&env);
        env
    }

    #[test]
    fn test_error_carries_message() {
        let env = root();
        let err = builtin_error(&[Value::String("boom".into())], &env).unwrap_err();
        assert!(matches!(err, Error::Lisp(msg) if msg == "boom"));
    }

    #[test]
    fn test_error_formats_non_string_messages() {
        let env = root();
        let err = builtin_error(&[Value::Number(42.0)], &env).unwrap_err();
        assert!(matches!(err, Error::Lisp(msg) if msg == "42"));
    }

    #[test]
    fn test_error_requires_one_argument() {
        let env = root();
        assert!(builtin_error(&[], &env).is_err());
    }

    #[test]
    fn test_eval_runs_datum_in_current_environment() {
        let env = root();
        env.define("x".to_string(), Value::Number(3.0));
        let datum = Value::from_elements(vec![
            Value::symbol("+"),
            Value::symbol("x"),
            Value::Number(4.0),
        ]);
        assert_eq!(builtin_eval(&[datum], &env).unwrap(), Value::Number(7.0));
    }

    #[test]
    fn test_eval_of_quoted_datum_round_trips() {
        let env = root();
        let datum = Value::Number(5.0);
        assert_eq!(builtin_eval(&[datum.clone()], &env).unwrap(), datum);
    }
}
