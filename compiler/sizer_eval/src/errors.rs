//! Evaluation errors.
//!
//! A JavaScript `throw` is not an error of the evaluator. Thrown values
//! travel as [`Fault::Throw`] until a `catch` takes them or they surface in
//! [`Outcome::thrown`](crate::Outcome). [`EvalError`] is reserved for
//! programs the evaluator cannot run at all.
//!
//! Runtime errors a real engine would throw (`TypeError`, `ReferenceError`)
//! are thrown as strings so that programs can catch them.

use thiserror::Error;

use crate::value::Value;

/// A program the evaluator refuses to run.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum EvalError {
    #[error("unsupported construct: {0}")]
    Unsupported(&'static str),

    #[error("evaluation did not finish within {0} steps")]
    StepLimit(u64),

    /// A `break` or `continue` left a statement placeholder. The governor
    /// must never extract a jump apart from its target.
    #[error("`{0}` escapes an extracted unit")]
    IllegalJump(String),
}

/// Abrupt end of an evaluation.
pub(crate) enum Fault<'a> {
    /// A JavaScript exception.
    Throw(Value<'a>),
    Error(EvalError),
}

impl From<EvalError> for Fault<'_> {
    fn from(error: EvalError) -> Self {
        Fault::Error(error)
    }
}

pub(crate) type Eval<'a, T> = Result<T, Fault<'a>>;

// Error constructors

#[cold]
pub(crate) fn unsupported<'a>(what: &'static str) -> Fault<'a> {
    Fault::Error(EvalError::Unsupported(what))
}

#[cold]
pub(crate) fn escaping_jump<'a>(keyword: &str, label: Option<&str>) -> Fault<'a> {
    let jump = match label {
        Some(label) => format!("{keyword} {label}"),
        None => keyword.to_owned(),
    };
    Fault::Error(EvalError::IllegalJump(jump))
}

#[cold]
pub(crate) fn type_error<'a>(message: &str) -> Fault<'a> {
    Fault::Throw(Value::string(&format!("TypeError: {message}")))
}

#[cold]
pub(crate) fn reference_error<'a>(name: &str) -> Fault<'a> {
    Fault::Throw(Value::string(&format!(
        "ReferenceError: {name} is not defined"
    )))
}

#[cold]
pub(crate) fn range_error<'a>(message: &str) -> Fault<'a> {
    Fault::Throw(Value::string(&format!("RangeError: {message}")))
}

#[cold]
pub(crate) fn not_a_function<'a>(value: &Value<'a>) -> Fault<'a> {
    type_error(&format!("{} is not a function", value.inspect()))
}

#[cold]
pub(crate) fn not_iterable<'a>(value: &Value<'a>) -> Fault<'a> {
    type_error(&format!("{} is not iterable", value.inspect()))
}

#[cold]
pub(crate) fn assignment_to_constant<'a>(name: &str) -> Fault<'a> {
    type_error(&format!("assignment to constant variable '{name}'"))
}
