// ABOUTME: Evaluator walking value trees against a lexical environment

use crate::env::Environment;
use crate::error::Error;
use crate::forms;
use crate::value::Value;
use std::rc::Rc;

/// Evaluate one expression. Dispatch order: self-evaluating atoms, Nil
/// (prohibited), symbol lookup, then pair forms — special forms by head
/// symbol first, otherwise procedure application with strict left-to-right
/// argument evaluation.
///
/// The final body expression of a closure application is trampolined: the
/// loop re-enters with a new expression and environment instead of recursing,
/// so chains of `begin`-style tails do not grow the host stack. Conditionals
/// and non-tail recursion still recurse.
pub fn eval(expr: &Value, env: &Rc<Environment>) -> Result<Value, Error> {
    let mut expr = expr.clone();
    let mut env = Rc::clone(env);

    loop {
        match &expr {
            Value::Bool(_)
            | Value::Number(_)
            | Value::String(_)
            | Value::Builtin(_)
            | Value::Closure(_) => return Ok(expr.clone()),

            Value::Nil => return Err(Error::lisp("Evaluating nil is prohibited.")),

            Value::Symbol(name) => {
                return env.get(name).ok_or_else(|| Error::Undefined(name.clone()));
            }

            Value::Pair(_, _) => {
                let form = expr
                    .list_elements()
                    .ok_or_else(|| Error::lisp("Malformed expression: improper list"))?;

                if let Some(name) = form[0].as_symbol() {
                    if let Some(handler) = forms::lookup(name) {
                        return handler(&form, &env);
                    }
                }

                let proc = eval(&form[0], &env)?;
                let mut args = Vec::with_capacity(form.len() - 1);
                for arg in &form[1..] {
                    args.push(eval(arg, &env)?);
                }

                match proc {
                    Value::Builtin(builtin) => return (builtin.func)(&args, &env),
                    Value::Closure(closure) => {
                        let child = closure.env.create_child(&closure.params, args)?;
                        match closure.body.split_last() {
                            None => return Ok(Value::Nil),
                            Some((last, init)) => {
                                for body_expr in init {
                                    eval(body_expr, &child)?;
                                }
                                expr = last.clone();
                                env = child;
                            }
                        }
                    }
                    other => return Err(Error::lisp(format!("{} is not a procedure", other))),
                }
            }
        }
    }
}

/// Apply protocol, shared with the higher-order builtins
pub fn apply(proc: &Value, args: Vec<Value>, env: &Rc<Environment>) -> Result<Value, Error> {
    match proc {
        Value::Builtin(builtin) => (builtin.func)(&args, env),
        Value::Closure(closure) => {
            let child = closure.env.create_child(&closure.params, args)?;
            eval_sequence(&closure.body, &child)
        }
        other => Err(Error::lisp(format!("{} is not a procedure", other))),
    }
}

/// Evaluate expressions left-to-right, returning the last result.
/// An empty sequence returns Nil.
pub fn eval_sequence(exprs: &[Value], env: &Rc<Environment>) -> Result<Value, Error> {
    let mut result = Value::Nil;
    for expr in exprs {
        result = eval(expr, env)?;
    }
    Ok(result)
}
