//! Top-Level Splitter.
//!
//! Chunks the statement list of a whole unit (script, module or function
//! body) back to front into runs of at most `MAX_INLINE_STMT`, until the
//! unit drops below `SAFE_UNIT_SIZE`. A top-level list has no enclosing
//! jump targets, so the only statements that stay put are the unmovable
//! ones: hoisted function declarations, module declarations and anything
//! that suspends. A single statement above the chunk limit is left for the
//! final size check.

use sizer_ir::Stmt;
use tracing::{debug, trace};

use crate::budget::{MAX_INLINE_STMT, SAFE_UNIT_SIZE, SPLIT_COST};
use crate::element::{wrap_runs, Conflater, ListItem};
use crate::estimate::SizeEstimator;

/// What one top-level split did.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
pub struct TopLevelOutcome {
    pub chunks: usize,
    pub before: u32,
    pub after: u32,
}

/// Chunk a unit's statement list in place.
pub fn split_top_level(body: &mut Vec<Stmt>, estimator: &mut SizeEstimator<'_>) -> TopLevelOutcome {
    let mut costs: Vec<u32> = body.iter().map(|stmt| estimator.stmt(stmt)).collect();
    let before: u32 = costs.iter().sum();
    let mut outcome = TopLevelOutcome {
        chunks: 0,
        before,
        after: before,
    };

    let mut total = before;
    while total >= SAFE_UNIT_SIZE {
        let barriers: Vec<bool> = body.iter().map(|stmt| !stmt.is_extractable()).collect();
        let chunks = Conflater::new(MAX_INLINE_STMT, 0).chunks(&costs, &barriers);

        let mut applied = Vec::with_capacity(chunks.len());
        for range in chunks {
            if total < SAFE_UNIT_SIZE {
                break;
            }
            if range.len() == body.len() {
                continue;
            }
            let run: u32 = costs[range.clone()].iter().sum();
            trace!(start = range.start, len = range.len(), cost = run, "chunk statements");
            total = total - run + SPLIT_COST;
            applied.push(range);
        }
        if applied.is_empty() {
            break;
        }

        wrap_runs(body, &applied);
        for range in &applied {
            costs.splice(range.clone(), [SPLIT_COST]);
        }
        outcome.chunks += applied.len();
    }

    outcome.after = total;
    if outcome.chunks > 0 {
        debug!(
            before = outcome.before,
            after = outcome.after,
            chunks = outcome.chunks,
            "split top-level statements"
        );
    }
    outcome
}

#[cfg(test)]
mod tests;
