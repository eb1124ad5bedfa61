//! Statement Splitter.
//!
//! Moves statements nested inside an oversized compound statement (blocks,
//! branches, loop bodies, switch clauses, try/catch/finally) into
//! placeholders without letting a live `break`/`continue` edge cross the new
//! boundary.
//!
//! The split runs in two phases. **Selection** works on a flat candidate
//! table built from one instrumented estimate and the legality pass:
//!
//! 1. extract every candidate above `MAX_INLINE_STMT`, largest first;
//! 2. if the origin is still too big, group runs of adjacent unexported
//!    siblings whose merged cost fits `MAX_INLINE_STMT`, largest group first;
//! 3. extract whatever candidates remain, largest first, while the gain is
//!    positive.
//!
//! **Rewrite** then applies the whole plan in one walk, keyed by `NodeId`.
//! Every selected statement is re-checked there; selecting an illegal one is
//! an internal error.

mod legality;

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use rustc_hash::FxHashMap;
use sizer_ir::{NodeId, Span, Stmt, StmtKind};
use sizer_stack::ensure_sufficient_stack;
use tracing::{debug, trace};

use crate::budget::{MAX_INLINE_STMT, SPLIT_COST};
use crate::element::{extract_stmt, has_gain, ExportState, ListItem, NodeElement};
use crate::errors::SizeError;
use crate::estimate::SizeEstimator;

pub use self::legality::Legality;

/// What one statement split did.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
pub struct StmtOutcome {
    /// Statements moved out on their own.
    pub extracted: usize,
    /// Sibling groups moved out together.
    pub grouped: usize,
    pub before: u32,
    pub after: u32,
}

impl StmtOutcome {
    pub fn changed(&self) -> bool {
        self.extracted + self.grouped > 0
    }
}

/// Split statements out of `origin` until it fits `MAX_INLINE_STMT`, as far
/// as legality allows.
pub fn split_statement(origin: &mut Stmt) -> Result<StmtOutcome, SizeError> {
    let mut memo: FxHashMap<NodeId, u32> = FxHashMap::default();
    let before = {
        let mut record = |id: NodeId, cost: u32| {
            memo.insert(id, cost);
        };
        SizeEstimator::with_hook(&mut record).recompute_stmt(origin)
    };
    let mut outcome = StmtOutcome {
        before,
        after: before,
        ..StmtOutcome::default()
    };
    if before <= MAX_INLINE_STMT {
        return Ok(outcome);
    }

    let legality = Legality::analyze(origin);
    let mut selection = Selection::collect(origin, &memo, &legality, before);
    selection.extract_above(MAX_INLINE_STMT);
    if selection.total > MAX_INLINE_STMT {
        selection.compact();
    }
    if selection.total > MAX_INLINE_STMT {
        selection.extract_above(SPLIT_COST);
    }

    let plan = selection.plan();
    if plan.is_empty() {
        debug!(size = before, "no legal statement extraction");
        return Ok(outcome);
    }
    apply_exports(origin, &plan, &legality)?;

    outcome.extracted = selection.extracted;
    outcome.grouped = selection.grouped;
    outcome.after = selection.total;
    debug!(
        before = outcome.before,
        after = outcome.after,
        extracted = outcome.extracted,
        grouped = outcome.grouped,
        "split statement"
    );
    Ok(outcome)
}

/// A statement that may become (part of) a placeholder.
#[derive(Clone, Debug)]
struct Candidate {
    id: NodeId,
    /// Cost left after extractions below it.
    current: u32,
    /// Nearest enclosing candidate.
    parent: Option<usize>,
    /// Index in the containing statement list.
    position: usize,
    state: ExportState,
    /// Statements wrapped by this one's placeholder, itself included.
    group_len: usize,
}

/// A statement list slot inside the origin.
#[derive(Clone, Debug)]
struct StmtList {
    len: usize,
    /// Try, catch and finally bodies and switch clauses may not be wrapped
    /// as a whole.
    whole_forbidden: bool,
    /// Candidates among the list's items, in source order.
    members: Vec<usize>,
}

struct Group {
    cost: u32,
    members: Vec<usize>,
}

struct Context<'a> {
    memo: &'a FxHashMap<NodeId, u32>,
    legality: &'a Legality,
}

struct Selection {
    candidates: Vec<Candidate>,
    lists: Vec<StmtList>,
    total: u32,
    extracted: usize,
    grouped: usize,
}

impl Selection {
    fn collect(
        origin: &Stmt,
        memo: &FxHashMap<NodeId, u32>,
        legality: &Legality,
        total: u32,
    ) -> Self {
        let mut selection = Selection {
            candidates: Vec::new(),
            lists: Vec::new(),
            total,
            extracted: 0,
            grouped: 0,
        };
        let cx = Context { memo, legality };
        selection.children(origin, None, &cx);
        trace!(
            candidates = selection.candidates.len(),
            blocked = legality.blocked.len(),
            "statement candidates"
        );
        selection
    }

    fn children(&mut self, stmt: &Stmt, parent: Option<usize>, cx: &Context<'_>) {
        match &stmt.kind {
            StmtKind::Block(body) => self.list(body, false, parent, cx),
            StmtKind::If {
                consequent,
                alternate,
                ..
            } => {
                self.visit(consequent, None, 0, parent, cx);
                if let Some(alternate) = alternate {
                    self.visit(alternate, None, 0, parent, cx);
                }
            }
            StmtKind::While { body, .. }
            | StmtKind::DoWhile { body, .. }
            | StmtKind::For { body, .. }
            | StmtKind::ForIn { body, .. }
            | StmtKind::ForOf { body, .. }
            | StmtKind::Labelled { body, .. }
            | StmtKind::With { body, .. } => self.visit(body, None, 0, parent, cx),
            StmtKind::Switch { cases, .. } => {
                for case in cases {
                    self.list(&case.body, true, parent, cx);
                }
            }
            StmtKind::Try {
                block,
                handler,
                finalizer,
            } => {
                self.list(block, true, parent, cx);
                if let Some(handler) = handler {
                    self.list(&handler.body, true, parent, cx);
                }
                if let Some(finalizer) = finalizer {
                    self.list(finalizer, true, parent, cx);
                }
            }
            _ => {}
        }
    }

    fn list(
        &mut self,
        body: &[Stmt],
        whole_forbidden: bool,
        parent: Option<usize>,
        cx: &Context<'_>,
    ) {
        let list = self.lists.len();
        self.lists.push(StmtList {
            len: body.len(),
            whole_forbidden,
            members: Vec::new(),
        });
        for (position, stmt) in body.iter().enumerate() {
            self.visit(stmt, Some(list), position, parent, cx);
        }
    }

    fn visit(
        &mut self,
        stmt: &Stmt,
        list: Option<usize>,
        position: usize,
        parent: Option<usize>,
        cx: &Context<'_>,
    ) {
        // Placeholders are separate units; function declarations are hoisted.
        if stmt.is_split() || matches!(stmt.kind, StmtKind::Function(_)) {
            return;
        }
        let cost = cx.memo.get(&stmt.id).copied().unwrap_or(0);
        let pinned = matches!(
            stmt.kind,
            StmtKind::Import { .. } | StmtKind::Export(_) | StmtKind::ExportDefault(_)
        );
        let is_candidate = cost > SPLIT_COST
            && !pinned
            && !cx.legality.is_blocked(stmt.id)
            && !cx.legality.suspends(stmt.id);

        let parent = if is_candidate {
            let index = self.candidates.len();
            self.candidates.push(Candidate {
                id: stmt.id,
                current: cost,
                parent,
                position,
                state: ExportState::NotExported,
                group_len: 0,
            });
            if let Some(list) = list {
                self.lists[list].members.push(index);
            }
            Some(index)
        } else {
            parent
        };
        ensure_sufficient_stack(|| self.children(stmt, parent, cx));
    }

    /// Whether an enclosing candidate already left the tree.
    fn detached(&self, index: usize) -> bool {
        let mut parent = self.candidates[index].parent;
        while let Some(ancestor) = parent {
            if self.candidates[ancestor].state.is_removed() {
                return true;
            }
            parent = self.candidates[ancestor].parent;
        }
        false
    }

    /// Account for `cost` worth of statements at `index` becoming one
    /// placeholder.
    fn settle(&mut self, index: usize, cost: u32) {
        let delta = cost.saturating_sub(SPLIT_COST);
        self.total = self.total.saturating_sub(delta);
        let mut parent = self.candidates[index].parent;
        while let Some(ancestor) = parent {
            let candidate = &mut self.candidates[ancestor];
            candidate.current = candidate.current.saturating_sub(delta);
            parent = candidate.parent;
        }
    }

    /// Extract single candidates costing more than `floor`, largest first,
    /// until the origin fits.
    fn extract_above(&mut self, floor: u32) {
        let mut heap: BinaryHeap<NodeElement> = self
            .candidates
            .iter()
            .enumerate()
            .filter(|(_, candidate)| {
                candidate.state == ExportState::NotExported && candidate.current > floor
            })
            .map(|(index, candidate)| NodeElement::new(index, candidate.current))
            .collect();

        while self.total > MAX_INLINE_STMT {
            let Some(top) = heap.pop() else {
                break;
            };
            let current = self.candidates[top.index].current;
            if self.candidates[top.index].state != ExportState::NotExported
                || self.detached(top.index)
            {
                continue;
            }
            // Stale entry: descendants were extracted since it was pushed.
            if current != top.cost {
                if current > floor {
                    heap.push(NodeElement::new(top.index, current));
                }
                continue;
            }

            trace!(id = ?self.candidates[top.index].id, cost = current, "extract statement");
            let candidate = &mut self.candidates[top.index];
            candidate.state = ExportState::Exported;
            candidate.group_len = 1;
            self.extracted += 1;
            self.settle(top.index, current);
        }
    }

    /// Merge runs of adjacent unexported siblings into groups.
    fn compact(&mut self) {
        let mut groups = Vec::new();
        for list in 0..self.lists.len() {
            let mut run: Vec<usize> = Vec::new();
            let mut run_cost = 0u32;
            for slot in 0..self.lists[list].members.len() {
                let member = self.lists[list].members[slot];
                let candidate = &self.candidates[member];
                let current = candidate.current;
                let eligible = candidate.state == ExportState::NotExported
                    && current <= MAX_INLINE_STMT
                    && !self.detached(member);
                let adjacent = run
                    .last()
                    .is_some_and(|&last| self.candidates[last].position + 1 == candidate.position);
                if !eligible || !adjacent || run_cost + current > MAX_INLINE_STMT {
                    self.tentative(list, std::mem::take(&mut run), &mut groups);
                    run_cost = 0;
                }
                if eligible {
                    run.push(member);
                    run_cost += current;
                }
            }
            self.tentative(list, run, &mut groups);
        }

        // Largest first; the sort is stable, so ties keep source order.
        groups.sort_by_key(|group| Reverse(group.cost));
        for group in &groups {
            if self.total <= MAX_INLINE_STMT {
                break;
            }
            let head = group.members[0];
            if self.detached(head) {
                continue;
            }
            let cost: u32 = group
                .members
                .iter()
                .map(|&member| self.candidates[member].current)
                .sum();
            trace!(id = ?self.candidates[head].id, len = group.members.len(), cost, "group statements");
            for &member in &group.members[1..] {
                self.candidates[member].state = ExportState::Empty;
            }
            let candidate = &mut self.candidates[head];
            candidate.state = ExportState::Exported;
            candidate.group_len = group.members.len();
            self.grouped += 1;
            self.settle(head, cost);
        }

        for candidate in &mut self.candidates {
            if candidate.state == ExportState::MaybeExported {
                candidate.state = ExportState::NotExported;
            }
        }
    }

    fn tentative(&mut self, list: usize, mut run: Vec<usize>, groups: &mut Vec<Group>) {
        let info = &self.lists[list];
        if info.whole_forbidden && run.len() == info.len {
            run.pop();
        }
        if run.len() < 2 {
            return;
        }
        let cost: u32 = run.iter().map(|&member| self.candidates[member].current).sum();
        if !has_gain(cost, run.len(), 0) {
            return;
        }
        for &member in &run {
            self.candidates[member].state = ExportState::MaybeExported;
        }
        groups.push(Group { cost, members: run });
    }

    /// Placeholder heads and the number of statements each one wraps.
    fn plan(&self) -> FxHashMap<NodeId, usize> {
        self.candidates
            .iter()
            .filter(|candidate| candidate.state == ExportState::Exported)
            .map(|candidate| (candidate.id, candidate.group_len))
            .collect()
    }
}

/// Apply a selection to the tree below `origin`.
///
/// `plan` maps the id of each statement to replace to the number of
/// statements (itself and following siblings) its placeholder wraps. Returns
/// the number of placeholders created. Fails without touching a list if a
/// selected statement may not be moved.
pub(crate) fn apply_exports(
    origin: &mut Stmt,
    plan: &FxHashMap<NodeId, usize>,
    legality: &Legality,
) -> Result<usize, SizeError> {
    let mut rewriter = Rewriter {
        plan,
        legality,
        applied: 0,
    };
    rewriter.children(origin)?;
    Ok(rewriter.applied)
}

struct Rewriter<'a> {
    plan: &'a FxHashMap<NodeId, usize>,
    legality: &'a Legality,
    applied: usize,
}

impl Rewriter<'_> {
    fn children(&mut self, stmt: &mut Stmt) -> Result<(), SizeError> {
        ensure_sufficient_stack(|| match &mut stmt.kind {
            StmtKind::Block(body) => self.list(body),
            StmtKind::If {
                consequent,
                alternate,
                ..
            } => {
                self.single(consequent)?;
                if let Some(alternate) = alternate {
                    self.single(alternate)?;
                }
                Ok(())
            }
            StmtKind::While { body, .. }
            | StmtKind::DoWhile { body, .. }
            | StmtKind::For { body, .. }
            | StmtKind::ForIn { body, .. }
            | StmtKind::ForOf { body, .. }
            | StmtKind::Labelled { body, .. }
            | StmtKind::With { body, .. } => self.single(body),
            StmtKind::Switch { cases, .. } => {
                for case in cases {
                    self.list(&mut case.body)?;
                }
                Ok(())
            }
            StmtKind::Try {
                block,
                handler,
                finalizer,
            } => {
                self.list(block)?;
                if let Some(handler) = handler {
                    self.list(&mut handler.body)?;
                }
                if let Some(finalizer) = finalizer {
                    self.list(finalizer)?;
                }
                Ok(())
            }
            _ => Ok(()),
        })
    }

    fn check(&self, stmt: &Stmt) -> Result<(), SizeError> {
        let reason = if stmt.is_split() {
            "statement is already a placeholder"
        } else if self.legality.is_blocked(stmt.id) {
            "statement lies on the path of a live jump"
        } else if !ListItem::is_extractable(stmt) {
            "statement is hoisted, a module declaration, or suspends"
        } else {
            return Ok(());
        };
        Err(SizeError::IllegalExtraction {
            node: stmt.id,
            span: stmt.span,
            reason,
        })
    }

    fn single(&mut self, slot: &mut Stmt) -> Result<(), SizeError> {
        self.children(slot)?;
        if self.plan.contains_key(&slot.id) {
            self.check(slot)?;
            extract_stmt(slot);
            self.applied += 1;
        }
        Ok(())
    }

    fn list(&mut self, body: &mut Vec<Stmt>) -> Result<(), SizeError> {
        for stmt in body.iter_mut() {
            self.children(stmt)?;
        }

        let mut selected = false;
        for (index, stmt) in body.iter().enumerate() {
            if let Some(&len) = self.plan.get(&stmt.id) {
                selected = true;
                let end = (index + len).min(body.len());
                for member in &body[index..end] {
                    self.check(member)?;
                }
            }
        }
        if !selected {
            return Ok(());
        }

        let mut old = std::mem::take(body).into_iter();
        while let Some(stmt) = old.next() {
            let Some(&len) = self.plan.get(&stmt.id) else {
                body.push(stmt);
                continue;
            };
            let mut run = Vec::with_capacity(len);
            run.push(stmt);
            run.extend(old.by_ref().take(len.saturating_sub(1)));
            let span = Span::cover(run.iter().map(|stmt| stmt.span));
            body.push(Stmt::split(run, span));
            self.applied += 1;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;
