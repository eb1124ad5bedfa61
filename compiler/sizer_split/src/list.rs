//! List Splitter: array and object literals, class bodies, template
//! segments and comma-expression operands.
//!
//! Phase A moves every outlier (an element above `MAX_INLINE_EXPR`) into its
//! own placeholder, largest first. Phase B conflates adjacent runs back to
//! front into chunks of at most `MAX_SPLIT_CHUNK` while the aggregate stays
//! above `MAX_INLINE_LIST`, repeating on the shortened list until a pass
//! makes no progress.

use tracing::{debug, trace};

use crate::budget::{MAX_INLINE_EXPR, MAX_INLINE_LIST, MAX_SPLIT_CHUNK, SPLIT_COST};
use crate::element::{wrap_runs, Conflater, ListItem, NodeElement};
use crate::estimate::SizeEstimator;

/// What one list split did.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
pub struct ListOutcome {
    /// Outliers moved out in Phase A.
    pub outliers: usize,
    /// Chunks created in Phase B.
    pub chunks: usize,
    /// Aggregate (elements plus slot overhead) before splitting.
    pub before: u32,
    /// Aggregate after splitting.
    pub after: u32,
}

impl ListOutcome {
    pub fn changed(&self) -> bool {
        self.outliers + self.chunks > 0
    }
}

fn aggregate(costs: &[u32], per_item: u32) -> u32 {
    costs.iter().map(|cost| cost + per_item).sum()
}

/// Split an oversized list in place.
///
/// `per_item` is the slot overhead the containing construct pays for each
/// element (see `weights`). Elements that are not extractable stay inline
/// and act as chunk barriers.
pub fn split_list<T: ListItem>(
    items: &mut Vec<T>,
    per_item: u32,
    estimator: &mut SizeEstimator<'_>,
) -> ListOutcome {
    let mut costs: Vec<u32> = items.iter().map(|item| item.estimate(estimator)).collect();
    let before = aggregate(&costs, per_item);
    let mut outcome = ListOutcome {
        before,
        after: before,
        ..ListOutcome::default()
    };

    outcome.outliers = relieve_outliers(items, &mut costs);
    let mut total = aggregate(&costs, per_item);

    while total > MAX_INLINE_LIST {
        let created = conflate(items, &mut costs, per_item, total);
        if created == 0 {
            break;
        }
        outcome.chunks += created;
        total = aggregate(&costs, per_item);
        trace!(total, created, "list conflation pass");
    }

    outcome.after = total;
    if outcome.changed() {
        debug!(
            len = items.len(),
            before = outcome.before,
            after = outcome.after,
            outliers = outcome.outliers,
            chunks = outcome.chunks,
            "split list"
        );
    }
    outcome
}

/// Phase A. Returns the number of elements moved out.
fn relieve_outliers<T: ListItem>(items: &mut Vec<T>, costs: &mut [u32]) -> usize {
    let mut outliers: Vec<NodeElement> = costs
        .iter()
        .enumerate()
        .filter(|&(index, &cost)| {
            cost > MAX_INLINE_EXPR && !items[index].is_split() && items[index].is_extractable()
        })
        .map(|(index, &cost)| NodeElement::new(index, cost))
        .collect();
    if outliers.is_empty() {
        return 0;
    }

    // Largest first, earliest on ties.
    outliers.sort_unstable_by(|a, b| b.cmp(a));
    for outlier in &outliers {
        trace!(index = outlier.index, cost = outlier.cost, "extract list outlier");
        costs[outlier.index] = SPLIT_COST;
    }

    let ranges: Vec<_> = outliers
        .iter()
        .map(|outlier| outlier.index..outlier.index + 1)
        .collect();
    wrap_runs(items, &ranges);
    outliers.len()
}

/// One Phase B pass. Returns the number of chunks created.
fn conflate<T: ListItem>(
    items: &mut Vec<T>,
    costs: &mut Vec<u32>,
    per_item: u32,
    mut total: u32,
) -> usize {
    let barriers: Vec<bool> = items.iter().map(|item| !item.is_extractable()).collect();
    let chunks = Conflater::new(MAX_SPLIT_CHUNK, per_item).chunks(costs, &barriers);

    let mut applied = Vec::with_capacity(chunks.len());
    let last = chunks.len().saturating_sub(1);
    for (position, range) in chunks.into_iter().enumerate() {
        if range.len() == items.len() {
            continue;
        }
        // The leftmost chunk only goes if the rest was not enough.
        if position == last && total <= MAX_INLINE_LIST {
            break;
        }
        let run_cost = aggregate(&costs[range.clone()], per_item);
        total = total - run_cost + SPLIT_COST + per_item;
        applied.push(range);
    }
    if applied.is_empty() {
        return 0;
    }

    wrap_runs(items, &applied);
    // Rebuild costs right to left so earlier ranges stay valid.
    for range in &applied {
        costs.splice(range.clone(), [SPLIT_COST]);
    }
    applied.len()
}

#[cfg(test)]
mod tests;
