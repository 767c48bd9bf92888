// ABOUTME: Environment module for managing variable bindings and lexical scopes

use crate::error::Error;
use crate::value::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

#[derive(Debug)]
pub struct Environment {
    bindings: RefCell<HashMap<String, Value>>,
    parent: Option<Rc<Environment>>,
}

impl Environment {
    /// Creates a new root environment with no parent
    pub fn new() -> Rc<Self> {
        Rc::new(Environment {
            bindings: RefCell::new(HashMap::new()),
            parent: None,
        })
    }

    /// Creates a new child environment with a parent
    pub fn with_parent(parent: Rc<Environment>) -> Rc<Self> {
        Rc::new(Environment {
            bindings: RefCell::new(HashMap::new()),
            parent: Some(parent),
        })
    }

    /// Inserts a binding in THIS frame, overwriting any existing one.
    /// Parent frames are never touched.
    pub fn define(&self, name: String, value: Value) {
        self.bindings.borrow_mut().insert(name, value);
    }

    /// Looks up a symbol in this frame and parent frames recursively
    pub fn get(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.bindings.borrow().get(name) {
            return Some(value.clone());
        }

        if let Some(ref parent) = self.parent {
            return parent.get(name);
        }

        None
    }

    /// Produces a fresh child frame binding each param to the corresponding
    /// arg positionally. The parent of the child is `self` — for a closure
    /// application that is the environment the closure captured, not the
    /// caller's environment.
    pub fn create_child(
        self: &Rc<Self>,
        params: &[String],
        args: Vec<Value>,
    ) -> Result<Rc<Environment>, Error> {
        if params.len() != args.len() {
            return Err(Error::arity("#<procedure>", params.len().to_string(), args.len()));
        }

        let child = Environment::with_parent(Rc::clone(self));
        for (param, arg) in params.iter().zip(args) {
            child.define(param.clone(), arg);
        }
        Ok(child)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_define_and_get() {
        let env = Environment::new();
        env.define("x".to_string(), Value::Number(42.0));

        match env.get("x") {
            Some(Value::Number(n)) => assert_eq!(n, 42.0),
            _ => panic!("Expected Number(42.0)"),
        }
    }

    #[test]
    fn test_undefined_symbol() {
        let env = Environment::new();
        assert!(env.get("undefined").is_none());
    }

    #[test]
    fn test_shadowing() {
        let parent = Environment::new();
        parent.define("x".to_string(), Value::Number(42.0));

        let child = Environment::with_parent(parent);
        child.define("x".to_string(), Value::Number(100.0));

        match child.get("x") {
            Some(Value::Number(n)) => assert_eq!(n, 100.0),
            _ => panic!("Expected Number(100.0)"),
        }
    }

    #[test]
    fn test_parent_lookup() {
        let parent = Environment::new();
        parent.define("x".to_string(), Value::Number(42.0));

        let child = Environment::with_parent(parent);

        match child.get("x") {
            Some(Value::Number(n)) => assert_eq!(n, 42.0),
            _ => panic!("Expected Number(42.0)"),
        }
    }

    #[test]
    fn test_define_never_touches_parent() {
        let parent = Environment::new();
        parent.define("x".to_string(), Value::Number(1.0));

        let child = Environment::with_parent(parent.clone());
        child.define("x".to_string(), Value::Number(2.0));

        match parent.get("x") {
            Some(Value::Number(n)) => assert_eq!(n, 1.0),
            _ => panic!("Expected Number(1.0)"),
        }
    }

    #[test]
    fn test_create_child_binds_positionally() {
        let env = Environment::new();
        let params = vec!["a".to_string(), "b".to_string()];
        let args = vec![Value::Number(1.0), Value::Number(2.0)];

        let child = env.create_child(&params, args).unwrap();
        assert_eq!(child.get("a"), Some(Value::Number(1.0)));
        assert_eq!(child.get("b"), Some(Value::Number(2.0)));
    }

    #[test]
    fn test_create_child_arity_mismatch() {
        let env = Environment::new();
        let params = vec!["a".to_string()];

        assert!(env.create_child(&params, vec![]).is_err());
        assert!(env
            .create_child(&params, vec![Value::Nil, Value::Nil])
            .is_err());
    }

    #[test]
    fn test_multiple_levels() {
        let grandparent = Environment::new();
        grandparent.define("a".to_string(), Value::Number(1.0));

        let parent = Environment::with_parent(grandparent);
        parent.define("b".to_string(), Value::Number(2.0));

        let child = Environment::with_parent(parent);
        child.define("c".to_string(), Value::Number(3.0));

        assert_eq!(child.get("a"), Some(Value::Number(1.0)));
        assert_eq!(child.get("b"), Some(Value::Number(2.0)));
        assert_eq!(child.get("c"), Some(Value::Number(3.0)));
    }
}
