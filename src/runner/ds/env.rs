//! The namespace and evaluation context.
//!
//! The [`Namespace`] is the unit of execution context and the unit of
//! persistence: the loader builds one from prior artifacts, the executor
//! mutates it in place, and the capture stage encodes a filtered view of
//! it. "Globalness" is a property of the executed program, never ambient
//! host state - the namespace is always an explicit, single-owner value
//! passed by reference.

use std::collections::HashMap;

use crate::runner::ds::value::Value;

/// A mutable name-to-value environment. Cloning is shallow: the clone
/// shares list and function objects with the original, which is what the
/// capture stage relies on to preserve aliasing between the seed and the
/// executed namespace.
#[derive(Clone, Debug, Default)]
pub struct Namespace {
    bindings: HashMap<String, Value>,
}

impl Namespace {
    pub fn new() -> Self {
        Namespace {
            bindings: HashMap::new(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.bindings.get(name)
    }

    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.bindings.insert(name.into(), value);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.bindings.iter()
    }

    /// Copy every entry of `other` into this namespace, overwriting on
    /// name collision. Used by the loader, where later artifacts win.
    pub fn merge_from(&mut self, other: Namespace) {
        for (name, value) in other.bindings {
            self.bindings.insert(name, value);
        }
    }
}

/// Evaluation context threaded through the interpreter: the global
/// namespace plus a stack of local scopes, one per active function call.
pub struct EvalContext<'a> {
    globals: &'a mut Namespace,
    scopes: Vec<HashMap<String, Value>>,
}

impl<'a> EvalContext<'a> {
    pub fn new(globals: &'a mut Namespace) -> Self {
        EvalContext {
            globals,
            scopes: vec![],
        }
    }

    pub fn push_scope(&mut self, scope: HashMap<String, Value>) {
        self.scopes.push(scope);
    }

    pub fn pop_scope(&mut self) {
        self.scopes.pop();
    }

    pub fn call_depth(&self) -> usize {
        self.scopes.len()
    }

    /// Resolve a name: the current call's local scope first, then the
    /// globals. Scopes are per call, not lexically nested, so a callee
    /// never sees its caller's locals. Builtin fallback is handled at the
    /// call sites that need it.
    pub fn get_binding(&self, name: &str) -> Option<Value> {
        if let Some(scope) = self.scopes.last() {
            if let Some(v) = scope.get(name) {
                return Some(v.clone());
            }
        }
        self.globals.get(name).cloned()
    }

    /// Bind a name. Inside a function call the binding lands in the
    /// innermost local scope; at top level it lands in the globals.
    pub fn set_binding(&mut self, name: &str, value: Value) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.to_string(), value);
        } else {
            self.globals.set(name, value);
        }
    }
}
