//! Lexical environments.
//!
//! An [`Environment`] is a handle to one scope in a chain of scopes. Block
//! scopes hold `let`, `const` and `class` bindings; function scopes also hold
//! `var` declarations, parameters and the `this` binding. Closures keep the
//! handle of the scope they were created in, so scopes are reference counted
//! rather than kept on a stack.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashMap;
use sizer_ir::Name;

use crate::value::Value;

/// The `this` binding lives in the function scope under a name no
/// identifier can spell.
const THIS: &str = "this";

/// Whether a binding can be reassigned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mutability {
    /// `var`, `let`, parameters and declarations.
    Mutable,
    /// `const`.
    Immutable,
}

/// Error returned by [`Environment::assign`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssignError {
    /// The binding exists but is `const`.
    Immutable,
    /// No scope in the chain binds the name.
    Undefined,
}

#[derive(Clone)]
struct Binding<'a> {
    value: Value<'a>,
    mutability: Mutability,
}

struct Scope<'a> {
    bindings: FxHashMap<Name, Binding<'a>>,
    parent: Option<Environment<'a>>,
    /// Function scopes receive `var` declarations.
    function: bool,
}

/// Handle to a scope. Cloning the handle shares the scope.
#[derive(Clone)]
pub struct Environment<'a>(Rc<RefCell<Scope<'a>>>);

impl<'a> Environment<'a> {
    /// The global scope.
    pub fn global() -> Self {
        Self::with_parent(None, true)
    }

    /// A block scope nested in `self`.
    #[must_use]
    pub fn block(&self) -> Self {
        Self::with_parent(Some(self.clone()), false)
    }

    /// A function scope nested in `self`.
    #[must_use]
    pub fn function(&self) -> Self {
        Self::with_parent(Some(self.clone()), true)
    }

    fn with_parent(parent: Option<Environment<'a>>, function: bool) -> Self {
        Environment(Rc::new(RefCell::new(Scope {
            bindings: FxHashMap::default(),
            parent,
            function,
        })))
    }

    fn parent(&self) -> Option<Environment<'a>> {
        self.0.borrow().parent.clone()
    }

    /// Bind `name` in this scope, shadowing any outer binding.
    pub fn define(&self, name: Name, value: Value<'a>, mutability: Mutability) {
        self.0
            .borrow_mut()
            .bindings
            .insert(name, Binding { value, mutability });
    }

    /// Declare a `var` in the nearest function scope.
    ///
    /// Redeclaring without an initializer keeps the current value.
    pub fn declare_var(&self, name: &Name, value: Option<Value<'a>>) {
        let mut target = self.clone();
        while !target.0.borrow().function {
            match target.parent() {
                Some(parent) => target = parent,
                None => break,
            }
        }

        let mut scope = target.0.borrow_mut();
        if let Some(binding) = scope.bindings.get_mut(name) {
            if let Some(value) = value {
                binding.value = value;
            }
            return;
        }
        scope.bindings.insert(
            name.clone(),
            Binding {
                value: value.unwrap_or(Value::Undefined),
                mutability: Mutability::Mutable,
            },
        );
    }

    /// Look a name up through the scope chain.
    pub fn lookup(&self, name: &str) -> Option<Value<'a>> {
        let mut current = self.clone();
        loop {
            let parent = {
                let scope = current.0.borrow();
                if let Some(binding) = scope.bindings.get(name) {
                    return Some(binding.value.clone());
                }
                scope.parent.clone()
            };
            current = parent?;
        }
    }

    /// Assign to the innermost binding of `name`.
    pub fn assign(&self, name: &str, value: Value<'a>) -> Result<(), AssignError> {
        let mut current = self.clone();
        loop {
            let parent = {
                let mut scope = current.0.borrow_mut();
                if let Some(binding) = scope.bindings.get_mut(name) {
                    if binding.mutability == Mutability::Immutable {
                        return Err(AssignError::Immutable);
                    }
                    binding.value = value;
                    return Ok(());
                }
                scope.parent.clone()
            };
            match parent {
                Some(parent) => current = parent,
                None => return Err(AssignError::Undefined),
            }
        }
    }

    /// Bind `this` for a function body.
    pub fn bind_this(&self, value: Value<'a>) {
        self.define(Name::new(THIS), value, Mutability::Immutable);
    }

    /// The `this` of the innermost non-arrow function, or `undefined`.
    pub fn this(&self) -> Value<'a> {
        self.lookup(THIS).unwrap_or(Value::Undefined)
    }
}

impl fmt::Debug for Environment<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scope = self.0.borrow();
        let mut names: Vec<&str> = scope.bindings.keys().map(Name::as_str).collect();
        names.sort_unstable();
        f.debug_struct("Environment")
            .field("bindings", &names)
            .field("function", &scope.function)
            .finish_non_exhaustive()
    }
}
