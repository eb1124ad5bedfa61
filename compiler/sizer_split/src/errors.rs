//! Governor failures.
//!
//! Estimation never fails; only the mutating strategies and the final size
//! check do. Every failure reaches the single caller of the entry point, and
//! nested-unit failures keep their original variant.

use sizer_diagnostic::{Diagnostic, ErrorCode};
use sizer_ir::{NodeId, Span};
use thiserror::Error;

use crate::governor::UnitKind;

/// Error produced while governing a unit.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum SizeError {
    /// A unit is still at or above the hard ceiling after every applicable
    /// strategy ran.
    #[error("{unit} is too large to compile: estimated size {size} exceeds the limit of {limit}")]
    SizeExceeded {
        unit: UnitKind,
        span: Span,
        size: u32,
        limit: u32,
    },

    /// A selected statement turned out to be a live jump target, a
    /// placeholder, or otherwise unmovable. Always a governor bug.
    #[error("internal error: cannot extract node {node:?}: {reason}")]
    IllegalExtraction {
        node: NodeId,
        span: Span,
        reason: &'static str,
    },
}

impl SizeError {
    /// Error code for this failure.
    pub fn code(&self) -> ErrorCode {
        match self {
            SizeError::SizeExceeded { .. } => ErrorCode::E5001,
            SizeError::IllegalExtraction { .. } => ErrorCode::E9001,
        }
    }

    /// Source location of the offending unit or node.
    pub fn span(&self) -> Span {
        match self {
            SizeError::SizeExceeded { span, .. } | SizeError::IllegalExtraction { span, .. } => {
                *span
            }
        }
    }

    /// Convert to a user-facing diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            SizeError::SizeExceeded {
                unit,
                span,
                size,
                limit,
            } => Diagnostic::unit_too_large(unit.as_str(), *span, *size, *limit),
            SizeError::IllegalExtraction { node, span, reason } => {
                Diagnostic::error(self.code())
                    .with_message(format!("internal error: cannot extract {node:?}"))
                    .with_label(*span, *reason)
                    .with_note("this is a bug in the code-size governor")
            }
        }
    }
}
