//! Code-size governor.
//!
//! Estimates how large the compiled unit for a script, module or function
//! will be and, when the estimate reaches the safe ceiling, rewrites the
//! tree by moving subtrees into out-of-line placeholders until every unit
//! fits, or fails with [`SizeError::SizeExceeded`].
//!
//! # Pipeline Position
//!
//! ```text
//! Source → Parse → **Govern size** → Emit
//! ```
//!
//! # Components
//!
//! 1. **Cost model** (`estimate`): a pure, total estimate per node kind
//! 2. **Extraction primitives** (`element`): cost-ordered elements, export
//!    states, back-to-front chunking and in-place wrapping
//! 3. **Strategies**, one per syntactic shape:
//!    - `list`: array and object literals, class bodies, template segments,
//!      comma operands
//!    - `binary`: binary and logical operators
//!    - `stmt`: statements nested in control flow, with jump legality
//!    - `top_level`: the statement list of a whole unit
//! 4. **Orchestrator** (`governor`): dispatch by node kind, re-measure, and
//!    govern nested units on a worker pool
//!
//! Every placeholder is itself a unit and must fit the ceiling too.

mod binary;
pub mod budget;
mod element;
mod errors;
pub mod estimate;
mod governor;
mod list;
mod stmt;
mod top_level;
mod validate;

#[cfg(test)]
mod test_support;

pub use binary::{split_binary, BinaryOutcome};
pub use element::{
    extract_expr, extract_stmt, has_gain, wrap_runs, Conflater, ExportState, ListItem,
    NodeElement,
};
pub use errors::SizeError;
pub use estimate::{
    estimate_expr, estimate_function_unit, estimate_member, estimate_part, estimate_property,
    estimate_stmt, estimate_stmts, SizeEstimator,
};
pub use governor::{
    govern_function, govern_program, measure_program, GovernReport, GovernorConfig, SplitStats,
    UnitKind,
};
pub use list::{split_list, ListOutcome};
pub use stmt::{split_statement, Legality, StmtOutcome};
pub use top_level::{split_top_level, TopLevelOutcome};
pub use validate::{validate_function, validate_program};

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Call this once at startup. Safe to call multiple times.
/// Enable with `RUST_LOG=sizer_split=debug` or `RUST_LOG=sizer_split=trace`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
