//! Binary Splitter.
//!
//! An oversized binary or logical expression has exactly two children; the
//! heavier operand goes out first, and the lighter one follows only if the
//! node is still above `MAX_INLINE_EXPR`.

use sizer_ir::{expr_suspends, Expr, ExprKind};
use tracing::{debug, trace};

use crate::budget::{MAX_INLINE_EXPR, SPLIT_COST};
use crate::element::extract_expr;
use crate::estimate::{weights, SizeEstimator};

/// What one binary split did.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
pub struct BinaryOutcome {
    /// Operands moved out (0, 1 or 2).
    pub extracted: usize,
    pub before: u32,
    pub after: u32,
}

fn extractable(operand: &Expr, cost: u32) -> bool {
    cost > SPLIT_COST && !operand.is_split() && !expr_suspends(operand)
}

/// Split a binary or logical expression in place.
///
/// Any other expression kind is left alone.
pub fn split_binary(expr: &mut Expr, estimator: &mut SizeEstimator<'_>) -> BinaryOutcome {
    let (base, left, right) = match &mut expr.kind {
        ExprKind::Binary { left, right, .. } => (weights::BINARY, left, right),
        ExprKind::Logical { left, right, .. } => (weights::LOGICAL, left, right),
        _ => return BinaryOutcome::default(),
    };

    let mut left_cost = estimator.expr(left);
    let mut right_cost = estimator.expr(right);
    let before = base + left_cost + right_cost;
    let mut outcome = BinaryOutcome {
        extracted: 0,
        before,
        after: before,
    };

    // Heavier operand first, left on ties.
    let left_first = left_cost >= right_cost;
    for take_left in [left_first, !left_first] {
        if base + left_cost + right_cost <= MAX_INLINE_EXPR {
            break;
        }
        let (operand, cost) = if take_left {
            (&mut **left, &mut left_cost)
        } else {
            (&mut **right, &mut right_cost)
        };
        if !extractable(operand, *cost) {
            continue;
        }
        trace!(cost = *cost, left = take_left, "extract binary operand");
        extract_expr(operand);
        *cost = SPLIT_COST;
        outcome.extracted += 1;
    }

    outcome.after = base + left_cost + right_cost;
    if outcome.extracted > 0 {
        debug!(
            before = outcome.before,
            after = outcome.after,
            extracted = outcome.extracted,
            "split binary expression"
        );
    }
    outcome
}
