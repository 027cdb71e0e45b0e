use std::{cell::RefCell, collections::HashMap, rc::Rc};

use crate::interpreter::value::core::Value;

/// A shared handle to a scope.
///
/// Scopes are reference-counted because closures keep their defining
/// scope alive for as long as the closure value exists.
pub type EnvRef = Rc<RefCell<Environment>>;

/// Why an environment operation failed. The evaluator maps these onto
/// positioned runtime errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvError {
    /// `define` found the name already bound in the current scope.
    AlreadyDefined,
    /// `assign` exhausted the scope chain without finding the name.
    Undefined,
    /// `assign` found the name but the binding is immutable.
    Immutable,
}

/// A binding holds a value and its mutability flag.
#[derive(Debug, Clone)]
struct Binding {
    value:   Value,
    mutable: bool,
}

/// A single scope in the rill runtime.
///
/// Each scope maps names to bindings and links to its parent (enclosing)
/// scope, forming a chain that implements lexical scoping. The root
/// scope has no parent. Scopes are created per block, per loop
/// iteration, per function call, per match arm, and per test body.
#[derive(Default)]
pub struct Environment {
    store:  HashMap<String, Binding>,
    parent: Option<EnvRef>,
}

impl Environment {
    /// Creates a new root scope with no parent.
    ///
    /// # Example
    /// ```
    /// use rill::interpreter::{environment::Environment, value::core::Value};
    ///
    /// let env = Environment::new();
    /// env.borrow_mut().define("x", Value::Int(1), false).unwrap();
    /// assert_eq!(env.borrow().get("x"), Some(Value::Int(1)));
    /// ```
    #[must_use]
    pub fn new() -> EnvRef {
        Rc::new(RefCell::new(Self::default()))
    }

    /// Creates a child scope enclosed by `parent`.
    ///
    /// Used for function calls (enclosing the closure's captured scope),
    /// blocks, loop iterations, match arms, and test bodies.
    #[must_use]
    pub fn enclosed(parent: &EnvRef) -> EnvRef {
        Rc::new(RefCell::new(Self { store:  HashMap::new(),
                                    parent: Some(Rc::clone(parent)), }))
    }

    /// Creates a binding in the current scope only.
    ///
    /// Shadowing an outer scope's binding is allowed; re-binding a name
    /// already present in this scope is not.
    ///
    /// # Errors
    /// [`EnvError::AlreadyDefined`] if the name exists in this scope.
    pub fn define(&mut self, name: &str, value: Value, mutable: bool) -> Result<(), EnvError> {
        if self.store.contains_key(name) {
            return Err(EnvError::AlreadyDefined);
        }
        self.store.insert(name.to_string(), Binding { value, mutable });
        Ok(())
    }

    /// Looks a name up, walking parent scopes until it is found.
    ///
    /// Returns `None` when the root scope is exhausted.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Value> {
        if let Some(binding) = self.store.get(name) {
            return Some(binding.value.clone());
        }
        self.parent.as_ref().and_then(|parent| parent.borrow().get(name))
    }

    /// Overwrites an existing binding, walking parent scopes to find it.
    ///
    /// # Errors
    /// - [`EnvError::Immutable`] if the binding was created with `let`.
    /// - [`EnvError::Undefined`] if no scope in the chain binds `name`.
    pub fn assign(&mut self, name: &str, value: Value) -> Result<(), EnvError> {
        if let Some(binding) = self.store.get_mut(name) {
            if !binding.mutable {
                return Err(EnvError::Immutable);
            }
            binding.value = value;
            return Ok(());
        }
        match &self.parent {
            Some(parent) => parent.borrow_mut().assign(name, value),
            None => Err(EnvError::Undefined),
        }
    }

    /// Reports whether `name` resolves to a mutable binding.
    #[must_use]
    pub fn is_mutable(&self, name: &str) -> bool {
        if let Some(binding) = self.store.get(name) {
            return binding.mutable;
        }
        self.parent
            .as_ref()
            .is_some_and(|parent| parent.borrow().is_mutable(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn define_and_get() {
        let env = Environment::new();
        env.borrow_mut().define("x", Value::Int(1), false).unwrap();

        assert_eq!(env.borrow().get("x"), Some(Value::Int(1)));
        assert_eq!(env.borrow().get("y"), None);
    }

    #[test]
    fn redefinition_in_same_scope_fails() {
        let env = Environment::new();
        env.borrow_mut().define("x", Value::Int(1), false).unwrap();

        let result = env.borrow_mut().define("x", Value::Int(2), true);
        assert_eq!(result, Err(EnvError::AlreadyDefined));
    }

    #[test]
    fn shadowing_across_scopes_is_allowed() {
        let outer = Environment::new();
        outer.borrow_mut().define("x", Value::Int(1), false).unwrap();

        let inner = Environment::enclosed(&outer);
        inner.borrow_mut().define("x", Value::Int(2), false).unwrap();

        assert_eq!(inner.borrow().get("x"), Some(Value::Int(2)));
        assert_eq!(outer.borrow().get("x"), Some(Value::Int(1)));
    }

    #[test]
    fn get_walks_parent_chain() {
        let root = Environment::new();
        root.borrow_mut().define("x", Value::Int(7), false).unwrap();

        let middle = Environment::enclosed(&root);
        let leaf = Environment::enclosed(&middle);
        assert_eq!(leaf.borrow().get("x"), Some(Value::Int(7)));
    }

    #[test]
    fn assign_updates_the_defining_scope() {
        let outer = Environment::new();
        outer.borrow_mut().define("x", Value::Int(1), true).unwrap();

        let inner = Environment::enclosed(&outer);
        inner.borrow_mut().assign("x", Value::Int(5)).unwrap();

        assert_eq!(outer.borrow().get("x"), Some(Value::Int(5)));
    }

    #[test]
    fn assign_to_immutable_fails() {
        let env = Environment::new();
        env.borrow_mut().define("x", Value::Int(1), false).unwrap();

        let result = env.borrow_mut().assign("x", Value::Int(2));
        assert_eq!(result, Err(EnvError::Immutable));
    }

    #[test]
    fn assign_to_undefined_fails() {
        let env = Environment::new();
        let result = env.borrow_mut().assign("ghost", Value::Int(1));
        assert_eq!(result, Err(EnvError::Undefined));
    }

    #[test]
    fn mutability_is_visible_through_the_chain() {
        let outer = Environment::new();
        outer.borrow_mut().define("a", Value::Int(1), true).unwrap();
        outer.borrow_mut().define("b", Value::Int(2), false).unwrap();

        let inner = Environment::enclosed(&outer);
        assert!(inner.borrow().is_mutable("a"));
        assert!(!inner.borrow().is_mutable("b"));
        assert!(!inner.borrow().is_mutable("missing"));
    }
}
