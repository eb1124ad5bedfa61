//! Suspension-point detection.
//!
//! Code containing `yield`, `await` or `for await` belongs to the generator
//! or async state machine of its function and cannot move into a separately
//! compiled unit.

use crate::ast::{Expr, ExprKind, Stmt, StmtKind};
use crate::visitor::{walk_expr, walk_split, walk_stmt, SplitRef, Visitor};
use sizer_stack::ensure_sufficient_stack;

#[derive(Default)]
struct SuspensionFinder {
    found: bool,
}

impl<'ast> Visitor<'ast> for SuspensionFinder {
    fn visit_stmt(&mut self, stmt: &'ast Stmt) {
        if self.found {
            return;
        }
        if let StmtKind::ForOf { is_await: true, .. } = stmt.kind {
            self.found = true;
            return;
        }
        ensure_sufficient_stack(|| walk_stmt(self, stmt));
    }

    fn visit_expr(&mut self, expr: &'ast Expr) {
        if self.found {
            return;
        }
        if matches!(expr.kind, ExprKind::Yield { .. } | ExprKind::Await(_)) {
            self.found = true;
            return;
        }
        ensure_sufficient_stack(|| walk_expr(self, expr));
    }

    fn visit_split(&mut self, split: SplitRef<'ast>) {
        walk_split(self, split);
    }
}

/// Check whether an expression suspends outside of nested functions.
pub fn expr_suspends(expr: &Expr) -> bool {
    let mut finder = SuspensionFinder::default();
    finder.visit_expr(expr);
    finder.found
}

/// Check whether a statement suspends outside of nested functions.
pub fn stmt_suspends(stmt: &Stmt) -> bool {
    let mut finder = SuspensionFinder::default();
    finder.visit_stmt(stmt);
    finder.found
}
