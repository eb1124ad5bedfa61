//! Reference evaluator for governed syntax trees.
//!
//! A small tree-walking interpreter for the JavaScript subset the governor
//! test corpus uses. Running a program before and after governing it and
//! comparing the [`Outcome`]s checks that the inserted placeholders are
//! invisible to the program.
//!
//! # Architecture
//!
//! - `Environment`: reference-counted scope chain with `var` hoisting to
//!   the nearest function scope
//! - `Value`: primitives plus shared arrays and objects; functions and
//!   classes are objects with a callable part
//! - `evaluate_binary` / `evaluate_unary`: direct enum dispatch
//! - `Interpreter`: statements, expressions, calls and placeholders
//!
//! Programs observe the outside world through one native function, `log`,
//! whose calls are recorded in [`Outcome::trace`].

mod environment;
mod errors;
mod interpreter;
mod operators;
mod value;

use sizer_ir::Program;

pub use environment::{AssignError, Environment, Mutability};
pub use errors::EvalError;
pub use interpreter::{Interpreter, MAX_CALL_DEPTH, STEP_LIMIT};
pub use value::Value;

/// Observable result of running a program.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Outcome {
    /// Inspected value of the last top-level expression statement.
    pub value: String,
    /// One line per `log(...)` call.
    pub trace: Vec<String>,
    /// The uncaught exception, if the program threw.
    pub thrown: Option<String>,
}

/// Run a program to completion.
pub fn run_program(program: &Program) -> Result<Outcome, EvalError> {
    Interpreter::new().run(program)
}
