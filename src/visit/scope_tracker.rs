//! Nested scope tracking for passes that resolve names during traversal.
//!
//! Blocks and function bodies open scopes; the outermost (global) scope is
//! always present and cannot be popped.
//!
//! ```rust
//! use pulsar::visit::scope_tracker::ScopeTracker;
//!
//! let mut scopes = ScopeTracker::<u32>::new();
//! scopes.declare("add", 1).unwrap();
//!
//! scopes.push_scope();
//! scopes.declare("x", 2).unwrap();
//! assert_eq!(scopes.lookup("add"), Some(&1));
//! assert_eq!(scopes.lookup("x"), Some(&2));
//!
//! // A second declaration in the same scope keeps the first one.
//! assert_eq!(scopes.declare("x", 3), Err(&2));
//!
//! scopes.pop_scope();
//! assert_eq!(scopes.lookup("x"), None);
//! ```

use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct ScopeTracker<T> {
    scopes: Vec<HashMap<String, T>>,
}

impl<T> ScopeTracker<T> {
    /// A tracker holding only the global scope.
    pub fn new() -> Self {
        Self { scopes: vec![HashMap::new()] }
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    /// Pop the innermost scope, returning its bindings.
    ///
    /// Returns `None` when only the global scope is left.
    pub fn pop_scope(&mut self) -> Option<HashMap<String, T>> {
        if self.scopes.len() > 1 { self.scopes.pop() } else { None }
    }

    /// Bind `name` in the innermost scope.
    ///
    /// If the innermost scope already binds `name`, the existing binding is
    /// kept and returned as the error.
    pub fn declare(&mut self, name: &str, value: T) -> Result<(), &T> {
        let last = self.scopes.len() - 1;
        if self.scopes[last].contains_key(name) {
            return Err(&self.scopes[last][name]);
        }
        self.scopes[last].insert(name.to_string(), value);
        Ok(())
    }

    /// Look up a binding from the innermost scope outward.
    pub fn lookup(&self, name: &str) -> Option<&T> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// Number of active scopes, counting the global one.
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }
}

impl<T> Default for ScopeTracker<T> {
    fn default() -> Self {
        Self::new()
    }
}

// ==============================================================================
// Tests
// ==============================================================================
