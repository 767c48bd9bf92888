// ABOUTME: Special form handlers and the dispatch table keyed by head symbol

use crate::env::Environment;
use crate::error::Error;
use crate::eval::{eval, eval_sequence};
use crate::value::{Closure, Value};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::rc::Rc;

/// Handlers receive the whole flattened form, head symbol included, and
/// decide which of their arguments to evaluate. The signature matches the
/// builtin calling convention so the evaluator can treat both uniformly
/// after choosing the evaluation strategy.
pub type SpecialFormFn = fn(&[Value], &Rc<Environment>) -> Result<Value, Error>;

static SPECIAL_FORMS: Lazy<HashMap<&'static str, SpecialFormFn>> = Lazy::new(|| {
    let mut table: HashMap<&'static str, SpecialFormFn> = HashMap::new();
    table.insert("define", define_form);
    table.insert("quote", quote_form);
    table.insert("if", if_form);
    table.insert("and", and_form);
    table.insert("or", or_form);
    table.insert("lambda", lambda_form);
    table.insert("cond", cond_form);
    table.insert("begin", begin_form);
    table.insert("let", let_form);
    table.insert("quasiquote", quasiquote_form);
    table
});

pub fn lookup(name: &str) -> Option<SpecialFormFn> {
    SPECIAL_FORMS.get(name).copied()
}

fn param_names(form_name: &str, params: &[Value]) -> Result<Vec<String>, Error> {
    params
        .iter()
        .map(|param| {
            param
                .as_symbol()
                .map(str::to_string)
                .ok_or_else(|| Error::lisp(format!("{}: parameters must be symbols", form_name)))
        })
        .collect()
}

/// (define name expr) binds the evaluated expr in the current frame.
/// (define (fname p1 p2 ...) body...) is sugar for binding a lambda.
/// Both return Nil.
fn define_form(form: &[Value], env: &Rc<Environment>) -> Result<Value, Error> {
    if form.len() < 3 {
        return Err(Error::lisp("Malformed define"));
    }

    match &form[1] {
        Value::Symbol(name) => {
            if form.len() != 3 {
                return Err(Error::lisp("Malformed define"));
            }
            let value = eval(&form[2], env)?;
            env.define(name.clone(), value);
            Ok(Value::Nil)
        }
        signature @ Value::Pair(_, _) => {
            let parts = signature
                .list_elements()
                .ok_or_else(|| Error::lisp("Malformed define"))?;
            let name = parts[0]
                .as_symbol()
                .ok_or_else(|| Error::lisp("define: function name must be a symbol"))?;
            let closure = Closure {
                params: param_names("define", &parts[1..])?,
                body: form[2..].to_vec(),
                env: Rc::clone(env),
            };
            env.define(name.to_string(), Value::Closure(Rc::new(closure)));
            Ok(Value::Nil)
        }
        _ => Err(Error::lisp("Malformed define")),
    }
}

/// (quote datum) returns the datum unevaluated
fn quote_form(form: &[Value], _env: &Rc<Environment>) -> Result<Value, Error> {
    if form.len() != 2 {
        return Err(Error::arity("quote", "1", form.len() - 1));
    }
    Ok(form[1].clone())
}

/// (if c t e) with the else branch optional; a falsy condition with no else
/// branch returns Nil
fn if_form(form: &[Value], env: &Rc<Environment>) -> Result<Value, Error> {
    if form.len() < 3 || form.len() > 4 {
        return Err(Error::arity("if", "2-3", form.len() - 1));
    }

    let condition = eval(&form[1], env)?;
    if condition.is_truthy() {
        eval(&form[2], env)
    } else if form.len() == 4 {
        eval(&form[3], env)
    } else {
        Ok(Value::Nil)
    }
}

/// Short-circuit: returns the first falsy value, else the last value,
/// or #t when empty
fn and_form(form: &[Value], env: &Rc<Environment>) -> Result<Value, Error> {
    let mut last = Value::Bool(true);
    for expr in &form[1..] {
        let value = eval(expr, env)?;
        if !value.is_truthy() {
            return Ok(value);
        }
        last = value;
    }
    Ok(last)
}

/// Short-circuit: returns the first truthy value without evaluating the
/// rest, else #f
fn or_form(form: &[Value], env: &Rc<Environment>) -> Result<Value, Error> {
    for expr in &form[1..] {
        let value = eval(expr, env)?;
        if value.is_truthy() {
            return Ok(value);
        }
    }
    Ok(Value::Bool(false))
}

/// (lambda (p1 ...) body...) builds a closure capturing the current
/// environment
fn lambda_form(form: &[Value], env: &Rc<Environment>) -> Result<Value, Error> {
    if form.len() < 3 {
        return Err(Error::lisp("lambda: expected parameters and body"));
    }

    let params = match &form[1] {
        Value::Nil => Vec::new(),
        list @ Value::Pair(_, _) => {
            let elements = list
                .list_elements()
                .ok_or_else(|| Error::lisp("lambda: parameters must be a list"))?;
            param_names("lambda", &elements)?
        }
        _ => return Err(Error::lisp("lambda: parameters must be a list")),
    };

    Ok(Value::Closure(Rc::new(Closure {
        params,
        body: form[2..].to_vec(),
        env: Rc::clone(env),
    })))
}

/// First clause whose test is truthy wins; `else` always matches and must be
/// last; no matching clause returns Nil. A clause without a body returns its
/// test's value.
fn cond_form(form: &[Value], env: &Rc<Environment>) -> Result<Value, Error> {
    for (index, clause) in form[1..].iter().enumerate() {
        let parts = clause
            .list_elements()
            .filter(|parts| !parts.is_empty())
            .ok_or_else(|| Error::lisp("cond: malformed clause"))?;

        let is_else = parts[0].as_symbol() == Some("else");
        if is_else && index != form.len() - 2 {
            return Err(Error::lisp("cond: else clause must be last"));
        }

        let test = if is_else {
            Value::Bool(true)
        } else {
            eval(&parts[0], env)?
        };
        if test.is_truthy() {
            if parts.len() == 1 {
                return Ok(test);
            }
            return eval_sequence(&parts[1..], env);
        }
    }
    Ok(Value::Nil)
}

/// (begin e1 e2 ...) evaluates sequentially and returns the last result
fn begin_form(form: &[Value], env: &Rc<Environment>) -> Result<Value, Error> {
    eval_sequence(&form[1..], env)
}

/// (let ((n1 v1) ...) body...) — initializers are evaluated in the OUTER
/// environment, then bound in a fresh child where the body runs
fn let_form(form: &[Value], env: &Rc<Environment>) -> Result<Value, Error> {
    if form.len() < 3 {
        return Err(Error::lisp("let: expected bindings and body"));
    }

    let bindings = match &form[1] {
        Value::Nil => Vec::new(),
        list @ Value::Pair(_, _) => list
            .list_elements()
            .ok_or_else(|| Error::lisp("let: bindings must be a list"))?,
        _ => return Err(Error::lisp("let: bindings must be a list")),
    };

    let child = Environment::with_parent(Rc::clone(env));
    for binding in &bindings {
        let parts = binding
            .list_elements()
            .filter(|parts| parts.len() == 2)
            .ok_or_else(|| Error::lisp("let: binding must be (name value)"))?;
        let name = parts[0]
            .as_symbol()
            .ok_or_else(|| Error::lisp("let: binding name must be a symbol"))?;
        let value = eval(&parts[1], env)?;
        child.define(name.to_string(), value);
    }

    eval_sequence(&form[2..], &child)
}

/// `datum walks the datum replacing each (unquote x) with the evaluated x;
/// everything else passes through structurally
fn quasiquote_form(form: &[Value], env: &Rc<Environment>) -> Result<Value, Error> {
    if form.len() != 2 {
        return Err(Error::arity("quasiquote", "1", form.len() - 1));
    }
    quasi_walk(&form[1], env)
}

fn quasi_walk(datum: &Value, env: &Rc<Environment>) -> Result<Value, Error> {
    match datum {
        Value::Pair(car, cdr) => {
            if car.as_symbol() == Some("unquote") {
                let parts = datum
                    .list_elements()
                    .filter(|parts| parts.len() == 2)
                    .ok_or_else(|| Error::lisp("unquote: expected 1 argument"))?;
                return eval(&parts[1], env);
            }
            Ok(Value::cons(quasi_walk(car, env)?, quasi_walk(cdr, env)?))
        }
        atom => Ok(atom.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtins::register_builtins;
    use crate::lexer::tokenize;
    use crate::reader::Reader;

    fn root() -> Rc<Environment> {
        let env = Environment::new();
        register_builtins(&env);
        env
    }

    fn eval_str(source: &str, env: &Rc<Environment>) -> Result<Value, Error> {
        let mut reader = Reader::new(tokenize(source).unwrap());
        let mut result = reader.parse().and_then(|expr| eval(&expr, env))?;
        while !reader.is_empty() {
            result = reader.parse().and_then(|expr| eval(&expr, env))?;
        }
        Ok(result)
    }

    #[test]
    fn test_define_variable() {
        let env = root();
        assert_eq!(eval_str("(define x 42)", &env).unwrap(), Value::Nil);
        assert_eq!(eval_str("x", &env).unwrap(), Value::Number(42.0));
    }

    #[test]
    fn test_define_overwrites_in_current_frame() {
        let env = root();
        eval_str("(define x 1) (define x 2)", &env).unwrap();
        assert_eq!(eval_str("x", &env).unwrap(), Value::Number(2.0));
    }

    #[test]
    fn test_define_function_sugar() {
        let env = root();
        eval_str("(define (square x) (* x x))", &env).unwrap();
        assert_eq!(eval_str("(square 6)", &env).unwrap(), Value::Number(36.0));
    }

    #[test]
    fn test_define_malformed() {
        let env = root();
        assert!(eval_str("(define)", &env).is_err());
        assert!(eval_str("(define x)", &env).is_err());
        assert!(eval_str("(define 3 4)", &env).is_err());
    }

    #[test]
    fn test_quote_returns_datum_unevaluated() {
        let env = root();
        assert_eq!(eval_str("(quote x)", &env).unwrap(), Value::symbol("x"));
        assert_eq!(eval_str("'(1 2)", &env).unwrap().to_string(), "(1 2)");
        // quoting keeps structure intact even for would-be applications
        assert_eq!(
            eval_str("'(undefined-proc 1)", &env).unwrap().to_string(),
            "(undefined-proc 1)"
        );
    }

    #[test]
    fn test_if_branches() {
        let env = root();
        assert_eq!(eval_str("(if #t 1 2)", &env).unwrap(), Value::Number(1.0));
        assert_eq!(eval_str("(if #f 1 2)", &env).unwrap(), Value::Number(2.0));
        assert_eq!(eval_str("(if #f 1)", &env).unwrap(), Value::Nil);
    }

    #[test]
    fn test_if_truthiness_of_non_booleans() {
        let env = root();
        assert_eq!(eval_str("(if 0 1 2)", &env).unwrap(), Value::Number(1.0));
        assert_eq!(eval_str("(if '() 1 2)", &env).unwrap(), Value::Number(1.0));
        assert_eq!(eval_str("(if \"\" 1 2)", &env).unwrap(), Value::Number(1.0));
    }

    #[test]
    fn test_if_untaken_branch_not_evaluated() {
        let env = root();
        assert_eq!(
            eval_str("(if #t 'ok (error \"boom\"))", &env).unwrap(),
            Value::symbol("ok")
        );
    }

    #[test]
    fn test_and_semantics() {
        let env = root();
        assert_eq!(eval_str("(and)", &env).unwrap(), Value::Bool(true));
        assert_eq!(eval_str("(and 1 2 3)", &env).unwrap(), Value::Number(3.0));
        assert_eq!(eval_str("(and 1 #f 3)", &env).unwrap(), Value::Bool(false));
        // short-circuits before the error
        assert!(eval_str("(and #f (error \"boom\"))", &env).is_ok());
    }

    #[test]
    fn test_or_semantics() {
        let env = root();
        assert_eq!(eval_str("(or)", &env).unwrap(), Value::Bool(false));
        assert_eq!(eval_str("(or #f 2 3)", &env).unwrap(), Value::Number(2.0));
        assert_eq!(eval_str("(or #f #f)", &env).unwrap(), Value::Bool(false));
        assert!(eval_str("(or 1 (error \"boom\"))", &env).is_ok());
    }

    #[test]
    fn test_lambda_builds_closure() {
        let env = root();
        let value = eval_str("(lambda (x) x)", &env).unwrap();
        assert!(matches!(value, Value::Closure(_)));
        assert_eq!(value.to_string(), "#<procedure>");
    }

    #[test]
    fn test_lambda_empty_params() {
        let env = root();
        assert_eq!(eval_str("((lambda () 5))", &env).unwrap(), Value::Number(5.0));
    }

    #[test]
    fn test_lambda_rejects_non_symbol_params() {
        let env = root();
        assert!(eval_str("(lambda (1 2) 3)", &env).is_err());
        assert!(eval_str("(lambda x 3)", &env).is_err());
    }

    #[test]
    fn test_cond_first_truthy_clause() {
        let env = root();
        assert_eq!(
            eval_str("(cond ((> 1 2) 'a) ((< 1 2) 'b) (else 'c))", &env).unwrap(),
            Value::symbol("b")
        );
    }

    #[test]
    fn test_cond_else_and_fallthrough() {
        let env = root();
        assert_eq!(
            eval_str("(cond (#f 'a) (else 'c))", &env).unwrap(),
            Value::symbol("c")
        );
        assert_eq!(eval_str("(cond (#f 'a))", &env).unwrap(), Value::Nil);
    }

    #[test]
    fn test_cond_clause_without_body_returns_test() {
        let env = root();
        assert_eq!(eval_str("(cond (42))", &env).unwrap(), Value::Number(42.0));
    }

    #[test]
    fn test_cond_else_must_be_last() {
        let env = root();
        assert!(eval_str("(cond (else 'a) (#t 'b))", &env).is_err());
    }

    #[test]
    fn test_cond_body_sequence() {
        let env = root();
        assert_eq!(
            eval_str("(cond (#t (define y 1) (+ y 1)))", &env).unwrap(),
            Value::Number(2.0)
        );
    }

    #[test]
    fn test_begin_returns_last() {
        let env = root();
        assert_eq!(eval_str("(begin 1 2 3)", &env).unwrap(), Value::Number(3.0));
        assert_eq!(eval_str("(begin)", &env).unwrap(), Value::Nil);
    }

    #[test]
    fn test_let_binds_in_child_frame() {
        let env = root();
        assert_eq!(
            eval_str("(let ((x 1) (y 2)) (+ x y))", &env).unwrap(),
            Value::Number(3.0)
        );
        // bindings do not escape the let
        assert!(eval_str("(let ((z 1)) z) z", &env).is_err());
    }

    #[test]
    fn test_let_initializers_use_outer_env() {
        let env = root();
        eval_str("(define x 10)", &env).unwrap();
        // the initializer for y sees the outer x, not the new binding
        assert_eq!(
            eval_str("(let ((x 1) (y x)) y)", &env).unwrap(),
            Value::Number(10.0)
        );
    }

    #[test]
    fn test_let_malformed_binding() {
        let env = root();
        assert!(eval_str("(let (x) x)", &env).is_err());
        assert!(eval_str("(let ((x 1 2)) x)", &env).is_err());
    }

    #[test]
    fn test_quasiquote_passthrough_and_unquote() {
        let env = root();
        assert_eq!(
            eval_str("`(1 ,(+ 2 3) 4)", &env).unwrap().to_string(),
            "(1 5 4)"
        );
        assert_eq!(eval_str("`x", &env).unwrap(), Value::symbol("x"));
        assert_eq!(eval_str("`(a b)", &env).unwrap().to_string(), "(a b)");
    }

    #[test]
    fn test_quasiquote_nested_structure() {
        let env = root();
        assert_eq!(
            eval_str("`(a (b ,(* 2 2)))", &env).unwrap().to_string(),
            "(a (b 4))"
        );
    }

    #[test]
    fn test_unquote_outside_quasiquote_is_undefined() {
        let env = root();
        assert!(eval_str(",x", &env).is_err());
    }
}
