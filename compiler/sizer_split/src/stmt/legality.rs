//! Legality pass for statement extraction.
//!
//! A statement may leave its parent only if no `break`/`continue` inside it
//! targets a construct outside it, and only if it does not suspend. The pass
//! walks the origin once with a stack of enclosing statements and records:
//!
//! - **blocked**: every statement strictly between a jump and its target,
//!   plus the jump itself. A jump whose target lies outside the origin blocks
//!   its whole path.
//! - **suspending**: every statement containing `yield`, `await` or
//!   `for await` outside nested functions.
//!
//! Unlabelled `break` targets the nearest loop or `switch`, unlabelled
//! `continue` the nearest loop, and labelled jumps the labelled statement
//! itself (so a labelled loop can never be pulled out of its label).

use rustc_hash::FxHashSet;
use sizer_ir::visitor::{walk_expr, walk_stmt, Visitor};
use sizer_ir::{Expr, ExprKind, Name, NodeId, Stmt, StmtKind};
use sizer_stack::ensure_sufficient_stack;
use smallvec::SmallVec;

/// Result of the legality pass over one origin statement.
#[derive(Clone, Debug, Default)]
pub struct Legality {
    pub blocked: FxHashSet<NodeId>,
    pub suspending: FxHashSet<NodeId>,
}

impl Legality {
    /// Analyze `origin` and everything below it in the same unit.
    pub fn analyze(origin: &Stmt) -> Self {
        let mut walker = LegalityWalker::default();
        walker.visit_stmt(origin);
        walker.legality
    }

    pub fn is_blocked(&self, id: NodeId) -> bool {
        self.blocked.contains(&id)
    }

    pub fn suspends(&self, id: NodeId) -> bool {
        self.suspending.contains(&id)
    }
}

struct PathEntry<'ast> {
    id: NodeId,
    is_loop: bool,
    is_breakable: bool,
    label: Option<&'ast Name>,
}

#[derive(Copy, Clone)]
enum Jump {
    Break,
    Continue,
}

#[derive(Default)]
struct LegalityWalker<'ast> {
    path: SmallVec<[PathEntry<'ast>; 16]>,
    legality: Legality,
}

impl<'ast> LegalityWalker<'ast> {
    /// Index of the jump target on the current path.
    fn target(&self, jump: Jump, label: Option<&Name>) -> Option<usize> {
        self.path.iter().rposition(|entry| match (label, jump) {
            (Some(label), _) => entry.label == Some(label),
            (None, Jump::Break) => entry.is_breakable,
            (None, Jump::Continue) => entry.is_loop,
        })
    }

    fn jump(&mut self, id: NodeId, jump: Jump, label: Option<&Name>) {
        // The origin itself (path[0]) is never a candidate, so an unresolved
        // target blocks everything below it.
        let first = self.target(jump, label).map_or(1, |target| target + 1);
        for entry in self.path.iter().skip(first) {
            self.legality.blocked.insert(entry.id);
        }
        self.legality.blocked.insert(id);
    }

    fn suspend(&mut self) {
        for entry in self.path.iter().rev() {
            // Ancestors of a marked entry are already marked.
            if !self.legality.suspending.insert(entry.id) {
                break;
            }
        }
    }
}

impl<'ast> Visitor<'ast> for LegalityWalker<'ast> {
    fn visit_stmt(&mut self, stmt: &'ast Stmt) {
        match &stmt.kind {
            StmtKind::Break(label) => self.jump(stmt.id, Jump::Break, label.as_ref()),
            StmtKind::Continue(label) => self.jump(stmt.id, Jump::Continue, label.as_ref()),
            kind => {
                self.path.push(PathEntry {
                    id: stmt.id,
                    is_loop: stmt.is_loop(),
                    is_breakable: stmt.is_breakable(),
                    label: match kind {
                        StmtKind::Labelled { label, .. } => Some(label),
                        _ => None,
                    },
                });
                if let StmtKind::ForOf { is_await: true, .. } = kind {
                    self.suspend();
                }
                ensure_sufficient_stack(|| walk_stmt(self, stmt));
                self.path.pop();
            }
        }
    }

    fn visit_expr(&mut self, expr: &'ast Expr) {
        if matches!(expr.kind, ExprKind::Yield { .. } | ExprKind::Await(_)) {
            self.suspend();
        }
        ensure_sufficient_stack(|| walk_expr(self, expr));
    }
}

#[cfg(test)]
mod tests;
