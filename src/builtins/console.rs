//! Console I/O: display, displayln, newline, print, read
//!
//! `display` prints strings without quotes and everything else by its
//! external representation; `print` writes the external representation of
//! each argument. `read` draws one expression from standard input through
//! the same bracket-balanced assembly the REPL uses.

use super::{define_builtin, expect_exact};
use crate::env::Environment;
use crate::error::Error;
use crate::repl;
use crate::value::Value;
use std::rc::Rc;

/// Prints a value; strings print unquoted. Returns Nil.
pub fn builtin_display(args: &[Value], _env: &Rc<Environment>) -> Result<Value, Error> {
    expect_exact("display", args, 1)?;
    print!("{}", args[0].display_text());
    Ok(Value::Nil)
}

/// display followed by a newline
pub fn builtin_displayln(args: &[Value], _env: &Rc<Environment>) -> Result<Value, Error> {
    expect_exact("displayln", args, 1)?;
    println!("{}", args[0].display_text());
    Ok(Value::Nil)
}

/// Prints a newline. Returns Nil.
pub fn builtin_newline(args: &[Value], _env: &Rc<Environment>) -> Result<Value, Error> {
    expect_exact("newline", args, 0)?;
    println!();
    Ok(Value::Nil)
}

/// Writes the external representation of every argument
pub fn builtin_print(args: &[Value], _env: &Rc<Environment>) -> Result<Value, Error> {
    for arg in args {
        print!("{}", arg);
    }
    Ok(Value::Nil)
}

/// Reads one expression from standard input
pub fn builtin_read(args: &[Value], _env: &Rc<Environment>) -> Result<Value, Error> {
    expect_exact("read", args, 0)?;
    repl::read_from_stdin()
}

/// Register all console builtins in the environment
pub fn register(env: &Rc<Environment>) {
    define_builtin(env, "display", builtin_display);
    define_builtin(env, "displayln", builtin_displayln);
    define_builtin(env, "newline", builtin_newline);
    define_builtin(env, "print", builtin_print);
    define_builtin(env, "read", builtin_read);
}
