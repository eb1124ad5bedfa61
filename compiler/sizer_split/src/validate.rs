//! Debug-mode validation of a governed tree.
//!
//! Walks every unit of the tree and asserts that:
//! - An expression placeholder in a value position wraps exactly one
//!   expression (array elements and sequence operands are list positions,
//!   where a placeholder may splice any number of values)
//! - No placeholder wraps a lone placeholder
//! - Every unit, nested functions and placeholder payloads included, stays
//!   below `MAX_UNIT_SIZE`
//!
//! These checks are enabled only in debug builds (`debug_assert!`).
//! They catch bugs in the splitting strategies before an emitter consumes
//! the rewritten tree.

use sizer_ir::visitor::{walk_expr, walk_function, walk_split, walk_stmts, SplitRef, Visitor};
use sizer_ir::{Expr, ExprKind, Function, Program, Span, Stmt};

use crate::budget::MAX_UNIT_SIZE;
use crate::estimate::{estimate_function_unit, estimate_stmts, SizeEstimator};
use crate::governor::payload_size;

/// Validate every unit of a governed program.
///
/// Panics with a descriptive message if an invariant is violated.
pub fn validate_program(program: &Program) {
    check_size("program", estimate_stmts(&program.body));
    walk_stmts(&mut Validator::default(), &program.body);
}

/// Validate a governed function and every unit nested in it.
pub fn validate_function(function: &Function) {
    Validator::default().visit_function(function);
}

fn check_size(what: &str, size: u32) {
    debug_assert!(
        size < MAX_UNIT_SIZE,
        "{what} of estimated size {size} exceeds the unit ceiling {MAX_UNIT_SIZE}",
    );
}

fn sole_placeholder(split: SplitRef<'_>) -> bool {
    match split {
        SplitRef::Expr(unit) => matches!(unit.body.as_slice(), [only] if only.is_split()),
        SplitRef::Stmt(unit) => matches!(unit.body.as_slice(), [only] if only.is_split()),
        SplitRef::Property(unit) => matches!(unit.body.as_slice(), [only] if only.is_split()),
        SplitRef::Member(unit) => matches!(unit.body.as_slice(), [only] if only.is_split()),
        SplitRef::Part(unit) => matches!(unit.body.as_slice(), [only] if only.is_split()),
    }
}

fn split_span(split: SplitRef<'_>) -> Span {
    match split {
        SplitRef::Expr(unit) => unit.span,
        SplitRef::Stmt(unit) => unit.span,
        SplitRef::Property(unit) => unit.span,
        SplitRef::Member(unit) => unit.span,
        SplitRef::Part(unit) => unit.span,
    }
}

#[derive(Default)]
struct Validator {
    /// The expression about to be visited sits in a list position.
    list_position: bool,
}

impl Validator {
    fn check_split(split: SplitRef<'_>) {
        debug_assert!(
            !sole_placeholder(split),
            "placeholder at {} wraps a lone placeholder",
            split_span(split),
        );
        check_size("placeholder", payload_size(split, &mut SizeEstimator::new()));
    }

    fn visit_items(&mut self, items: &[Expr], list_position: bool) {
        for item in items {
            self.list_position = list_position;
            self.visit_expr(item);
        }
    }
}

impl<'ast> Visitor<'ast> for Validator {
    fn visit_expr(&mut self, expr: &'ast Expr) {
        let list_position = std::mem::take(&mut self.list_position);
        match &expr.kind {
            ExprKind::Split(unit) => {
                debug_assert!(
                    list_position || unit.body.len() == 1,
                    "value placeholder at {} wraps {} expressions",
                    expr.span,
                    unit.body.len(),
                );
                Self::check_split(SplitRef::Expr(unit));
                // A placeholder's elements take the position of the
                // placeholder itself.
                self.visit_items(&unit.body, list_position);
            }
            ExprKind::Array(items) | ExprKind::Sequence(items) => self.visit_items(items, true),
            _ => walk_expr(self, expr),
        }
    }

    fn visit_function(&mut self, function: &'ast Function) {
        check_size("function", estimate_function_unit(function));
        walk_function(self, function);
    }

    fn visit_static_block(&mut self, body: &'ast [Stmt]) {
        check_size("class static block", estimate_stmts(body));
        walk_stmts(self, body);
    }

    fn visit_split(&mut self, split: SplitRef<'ast>) {
        Self::check_split(split);
        walk_split(self, split);
    }
}

#[cfg(test)]
mod tests;
