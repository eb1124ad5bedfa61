//! Tree-walking interpreter.
//!
//! Statements produce a [`Completion`]; exceptions and evaluator errors
//! travel on the `Err` side as a [`Fault`](crate::errors::Fault).
//!
//! # Placeholders
//!
//! Every placeholder evaluates in the environment of the code around it,
//! so `var`, `let` and `this` behave as if the wrapped nodes were still
//! inline. Control flow does not: a placeholder compiles to its own unit,
//! and a `break` or `continue` cannot leave a unit.
//!
//! - a statement placeholder runs its statements and propagates `return`
//!   and exceptions; a jump escaping it is [`EvalError::IllegalJump`]
//! - an expression placeholder in a list position (array element, call or
//!   `new` argument, comma operand) splices its values into the list
//! - an expression placeholder in a value position yields its value
//! - property, class member and template placeholders splice their items

mod call;
mod expr;
mod stmt;

use sizer_ir::{Name, Program};
use sizer_stack::ensure_sufficient_stack;
use tracing::debug;

use crate::environment::{Environment, Mutability};
use crate::errors::{EvalError, Fault};
use crate::value::{Callable, Native, Object, Value};
use crate::Outcome;

/// Statements and loop iterations a program may take.
pub const STEP_LIMIT: u64 = 5_000_000;

/// Nested calls before a `RangeError` is thrown.
pub const MAX_CALL_DEPTH: usize = 2_000;

/// How a statement finished.
pub(crate) enum Completion<'a> {
    Normal,
    Break(Option<Name>),
    Continue(Option<Name>),
    Return(Value<'a>),
}

pub struct Interpreter<'a> {
    global: Environment<'a>,
    trace: Vec<String>,
    /// Value of the last expression statement run outside any function.
    last_value: Value<'a>,
    steps: u64,
    depth: usize,
}

impl<'a> Interpreter<'a> {
    pub fn new() -> Self {
        let global = Environment::global();
        global.define(
            Name::new("log"),
            Value::object(Object::callable(Callable::Native(Native::Log))),
            Mutability::Mutable,
        );
        Interpreter {
            global,
            trace: Vec::new(),
            last_value: Value::Undefined,
            steps: 0,
            depth: 0,
        }
    }

    /// Run a whole program.
    pub fn run(mut self, program: &'a Program) -> Result<Outcome, EvalError> {
        let global = self.global.clone();
        Self::hoist(&program.body, &global);
        let thrown = match self.exec_stmts(&program.body, &global) {
            Ok(_) => None,
            Err(Fault::Throw(value)) => Some(value.to_display()),
            Err(Fault::Error(error)) => return Err(error),
        };

        debug!(
            steps = self.steps,
            trace = self.trace.len(),
            thrown = thrown.is_some(),
            "program evaluated"
        );
        Ok(Outcome {
            value: self.last_value.inspect(),
            trace: self.trace,
            thrown,
        })
    }

    fn step(&mut self) -> Result<(), EvalError> {
        self.steps += 1;
        if self.steps > STEP_LIMIT {
            return Err(EvalError::StepLimit(STEP_LIMIT));
        }
        Ok(())
    }

    fn guarded<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        ensure_sufficient_stack(|| f(self))
    }
}

impl Default for Interpreter<'_> {
    fn default() -> Self {
        Self::new()
    }
}
