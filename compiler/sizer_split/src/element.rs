//! Extraction primitives shared by the splitting strategies.

use std::cmp::{Ordering, Reverse};
use std::ops::Range;

use sizer_ir::{
    expr_suspends, stmt_suspends, ClassMember, ClassMemberKind, Expr, ExprKind, Property,
    PropertyKind, Span, Stmt, StmtKind, TemplatePart,
};

use crate::budget::SPLIT_COST;
use crate::estimate::SizeEstimator;

/// A child that might become a placeholder: its position and current cost.
///
/// Ordered by cost, then by *earlier* position, so a max-heap of elements
/// pops the largest element and breaks ties towards the front.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct NodeElement {
    pub index: usize,
    pub cost: u32,
}

impl NodeElement {
    pub fn new(index: usize, cost: u32) -> Self {
        NodeElement { index, cost }
    }
}

impl Ord for NodeElement {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.cost, Reverse(self.index)).cmp(&(other.cost, Reverse(other.index)))
    }
}

impl PartialOrd for NodeElement {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Per-candidate state during one statement-splitting pass.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum ExportState {
    /// Stays inline.
    #[default]
    NotExported,
    /// Member of a sibling group that is being assembled.
    MaybeExported,
    /// Replaced by a placeholder (alone, or as the head of a group).
    Exported,
    /// Absorbed into a preceding sibling's group; skipped on output.
    Empty,
}

impl ExportState {
    /// Whether the statement leaves its parent.
    #[inline]
    pub fn is_removed(self) -> bool {
        matches!(self, ExportState::Exported | ExportState::Empty)
    }
}

/// Whether replacing a run with one placeholder makes the parent smaller.
#[inline]
pub fn has_gain(run_cost: u32, run_len: usize, per_item: u32) -> bool {
    let slots = u32::try_from(run_len.saturating_sub(1)).unwrap_or(u32::MAX);
    run_cost.saturating_add(per_item.saturating_mul(slots)) > SPLIT_COST
}

/// Groups adjacent list elements into chunks, back to front.
///
/// A chunk's size counts each element's cost plus the per-item slot
/// overhead and never exceeds `limit`. Barrier elements close the current
/// chunk and are never part of one; so are elements that alone exceed
/// `limit`. Only chunks with a positive gain are returned.
#[derive(Copy, Clone, Debug)]
pub struct Conflater {
    limit: u32,
    per_item: u32,
}

impl Conflater {
    pub fn new(limit: u32, per_item: u32) -> Self {
        Conflater { limit, per_item }
    }

    /// Chunks as index ranges, rightmost first.
    pub fn chunks(&self, costs: &[u32], barriers: &[bool]) -> Vec<Range<usize>> {
        debug_assert_eq!(costs.len(), barriers.len());
        let mut chunks = Vec::new();
        let mut end = costs.len();
        let mut size = 0u32;

        for index in (0..costs.len()).rev() {
            let item = costs[index].saturating_add(self.per_item);
            if barriers[index] || item > self.limit {
                self.close(index + 1..end, costs, &mut chunks);
                end = index;
                size = 0;
                continue;
            }
            if size + item > self.limit {
                self.close(index + 1..end, costs, &mut chunks);
                end = index + 1;
                size = 0;
            }
            size += item;
        }
        self.close(0..end, costs, &mut chunks);
        chunks
    }

    fn close(&self, range: Range<usize>, costs: &[u32], chunks: &mut Vec<Range<usize>>) {
        if range.is_empty() {
            return;
        }
        let cost: u32 = costs[range.clone()].iter().sum();
        if has_gain(cost, range.len(), self.per_item) {
            chunks.push(range);
        }
    }
}

/// A list element the list-shaped strategies can move into a placeholder.
pub trait ListItem: Sized {
    /// Current cost, excluding the slot overhead of the containing list.
    fn estimate(&self, estimator: &mut SizeEstimator<'_>) -> u32;

    fn span(&self) -> Span;

    fn is_split(&self) -> bool;

    /// Whether the element may leave the current unit at all.
    fn is_extractable(&self) -> bool;

    /// Wrap a run of elements in a placeholder of the same element type.
    fn wrap(run: Vec<Self>, span: Span) -> Self;
}

impl ListItem for Expr {
    fn estimate(&self, estimator: &mut SizeEstimator<'_>) -> u32 {
        estimator.expr(self)
    }

    fn span(&self) -> Span {
        self.span
    }

    fn is_split(&self) -> bool {
        Expr::is_split(self)
    }

    fn is_extractable(&self) -> bool {
        !expr_suspends(self)
    }

    fn wrap(run: Vec<Self>, span: Span) -> Self {
        Expr::split(run, span)
    }
}

impl ListItem for Property {
    fn estimate(&self, estimator: &mut SizeEstimator<'_>) -> u32 {
        estimator.property(self)
    }

    fn span(&self) -> Span {
        self.span
    }

    fn is_split(&self) -> bool {
        Property::is_split(self)
    }

    fn is_extractable(&self) -> bool {
        match &self.kind {
            PropertyKind::KeyValue { value, .. } => !expr_suspends(value),
            PropertyKind::Spread(expr) => !expr_suspends(expr),
            PropertyKind::Shorthand(_) | PropertyKind::Method { .. } | PropertyKind::Split(_) => {
                true
            }
        }
    }

    fn wrap(run: Vec<Self>, span: Span) -> Self {
        Property::split(run, span)
    }
}

impl ListItem for ClassMember {
    fn estimate(&self, estimator: &mut SizeEstimator<'_>) -> u32 {
        estimator.member(self)
    }

    fn span(&self) -> Span {
        self.span
    }

    fn is_split(&self) -> bool {
        ClassMember::is_split(self)
    }

    fn is_extractable(&self) -> bool {
        match &self.kind {
            ClassMemberKind::Field {
                value: Some(value), ..
            } => !expr_suspends(value),
            _ => true,
        }
    }

    fn wrap(run: Vec<Self>, span: Span) -> Self {
        ClassMember::split(run, span)
    }
}

impl ListItem for TemplatePart {
    fn estimate(&self, estimator: &mut SizeEstimator<'_>) -> u32 {
        estimator.part(self)
    }

    fn span(&self) -> Span {
        TemplatePart::span(self)
    }

    fn is_split(&self) -> bool {
        TemplatePart::is_split(self)
    }

    fn is_extractable(&self) -> bool {
        match self {
            TemplatePart::Subst(expr) => !expr_suspends(expr),
            TemplatePart::Quasi(_) | TemplatePart::Split(_) => true,
        }
    }

    fn wrap(run: Vec<Self>, span: Span) -> Self {
        TemplatePart::split(run, span)
    }
}

impl ListItem for Stmt {
    fn estimate(&self, estimator: &mut SizeEstimator<'_>) -> u32 {
        estimator.stmt(self)
    }

    fn span(&self) -> Span {
        self.span
    }

    fn is_split(&self) -> bool {
        Stmt::is_split(self)
    }

    /// Hoisted function declarations must stay where the enclosing scope
    /// can see them before any statement runs; module declarations must stay
    /// at the top level of the module.
    fn is_extractable(&self) -> bool {
        let pinned = matches!(
            self.kind,
            StmtKind::Function(_)
                | StmtKind::Import { .. }
                | StmtKind::Export(_)
                | StmtKind::ExportDefault(_)
        );
        !pinned && !stmt_suspends(self)
    }

    fn wrap(run: Vec<Self>, span: Span) -> Self {
        Stmt::split(run, span)
    }
}

/// Replace the runs in `chunks` (disjoint, any order) with placeholders.
///
/// Rebuilds the list in one pass.
pub fn wrap_runs<T: ListItem>(items: &mut Vec<T>, chunks: &[Range<usize>]) {
    if chunks.is_empty() {
        return;
    }
    let mut ranges = chunks.to_vec();
    ranges.sort_by_key(|range| range.start);
    let mut ranges = ranges.into_iter().peekable();

    let old = std::mem::take(items);
    let mut current: Option<Range<usize>> = None;
    let mut run = Vec::new();
    for (index, item) in old.into_iter().enumerate() {
        if current.is_none() && ranges.peek().is_some_and(|range| range.start == index) {
            current = ranges.next();
        }
        match &current {
            Some(range) => {
                run.push(item);
                if index + 1 == range.end {
                    let run = std::mem::take(&mut run);
                    let span = Span::cover(run.iter().map(ListItem::span));
                    items.push(T::wrap(run, span));
                    current = None;
                }
            }
            None => items.push(item),
        }
    }
}

/// Move an expression into a value-position placeholder, in place.
pub fn extract_expr(slot: &mut Expr) {
    let span = slot.span;
    let inner = std::mem::replace(slot, Expr::new(ExprKind::Hole, span));
    *slot = Expr::split(vec![inner], span);
}

/// Move a statement into a single-statement placeholder, in place.
pub fn extract_stmt(slot: &mut Stmt) {
    let span = slot.span;
    let inner = std::mem::replace(slot, Stmt::new(StmtKind::Empty, span));
    *slot = Stmt::split(vec![inner], span);
}
