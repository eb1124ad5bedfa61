//! Orchestrator.
//!
//! Governs one unit at a time:
//!
//! 1. **Estimate** the unit with a hooked estimator, memoizing the cost of
//!    every expression and statement it owns.
//! 2. **Check**: below `SAFE_UNIT_SIZE` the unit is left as it is.
//! 3. **Reduce**: otherwise run the node-level strategies bottom-up (list,
//!    binary, statement), then chunk the unit's own statement list while it
//!    is still at or above `SAFE_UNIT_SIZE`.
//! 4. **Re-check** against `MAX_UNIT_SIZE` and fail with `SizeExceeded` if
//!    the unit is still too large.
//!
//! The units nested inside a governed unit (functions, class static blocks
//! and every placeholder, including the ones just created) are independent
//! subtrees. The outermost unit runs on the calling thread; nested units run
//! on a scoped rayon pool, and the first failure cancels the ones that have
//! not started yet.

mod config;
mod reduce;
mod stats;
mod units;

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use parking_lot::Mutex;
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use sizer_ir::{Function, NodeId, Program};
use tracing::{debug, trace, warn};

use crate::budget::{MAX_UNIT_SIZE, SAFE_UNIT_SIZE};
use crate::errors::SizeError;
use crate::estimate::{estimate_stmts, SizeEstimator};
use crate::top_level::split_top_level;

pub use self::config::GovernorConfig;
pub use self::stats::SplitStats;
pub use self::units::UnitKind;

pub(crate) use self::units::payload_size;

use self::config::WORKER_STACK_SIZE;
use self::reduce::Reducer;
use self::units::Unit;

/// Result of a successful governor run.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GovernReport {
    /// Final estimated size of the outermost unit.
    pub size: u32,
    /// Units governed, the outermost one included.
    pub units: usize,
    pub stats: SplitStats,
}

/// Bring a script or module within the size ceiling.
///
/// On success every unit of the program, nested functions and extracted
/// placeholders included, fits `MAX_UNIT_SIZE`. On failure the tree may be
/// partially rewritten and must not be compiled.
pub fn govern_program(
    program: &mut Program,
    config: &GovernorConfig,
) -> Result<GovernReport, SizeError> {
    let unit = Unit::Program {
        kind: program.kind,
        span: program.span,
        body: &mut program.body,
    };
    let report = Governor::new(config).run(unit)?;

    #[cfg(debug_assertions)]
    crate::validate::validate_program(program);

    Ok(report)
}

/// Bring a single function within the size ceiling.
pub fn govern_function(
    function: &mut Function,
    config: &GovernorConfig,
) -> Result<GovernReport, SizeError> {
    let report = Governor::new(config).run(Unit::Function(function))?;

    #[cfg(debug_assertions)]
    crate::validate::validate_function(function);

    Ok(report)
}

/// Estimated size of a program after governing, without touching it.
///
/// Runs the full pipeline on a copy. If some unit stays too large, that
/// unit's size is returned instead of an error.
pub fn measure_program(program: &Program, config: &GovernorConfig) -> u32 {
    let mut copy = program.clone();
    match govern_program(&mut copy, config) {
        Ok(report) => report.size,
        Err(SizeError::SizeExceeded { size, .. }) => size,
        Err(error) => {
            warn!(%error, "governing failed, reporting the raw estimate");
            estimate_stmts(&program.body)
        }
    }
}

/// State shared by every unit of one run.
struct Governor<'c> {
    config: &'c GovernorConfig,
    cancelled: AtomicBool,
    units: AtomicUsize,
    stats: Mutex<SplitStats>,
}

impl<'c> Governor<'c> {
    fn new(config: &'c GovernorConfig) -> Self {
        Governor {
            config,
            cancelled: AtomicBool::new(false),
            units: AtomicUsize::new(0),
            stats: Mutex::new(SplitStats::default()),
        }
    }

    fn run(self, unit: Unit<'_>) -> Result<GovernReport, SizeError> {
        let (size, nested) = self.govern_one(unit)?;
        self.govern_nested(nested)?;
        Ok(GovernReport {
            size,
            units: self.units.into_inner(),
            stats: self.stats.into_inner(),
        })
    }

    /// Govern one unit and hand back the units nested in it.
    fn govern_one<'a>(&self, mut unit: Unit<'a>) -> Result<(u32, Vec<Unit<'a>>), SizeError> {
        let kind = unit.kind();
        let mut memo: FxHashMap<NodeId, u32> = FxHashMap::default();
        let initial = {
            let mut record = |id: NodeId, cost: u32| {
                memo.insert(id, cost);
            };
            unit.size(&mut SizeEstimator::with_hook(&mut record))
        };

        let mut size = initial;
        let mut stats = SplitStats::default();
        if initial >= SAFE_UNIT_SIZE {
            let mut reducer = Reducer::new(memo);
            unit.reduce(&mut reducer)?;
            size = unit.size(&mut SizeEstimator::with_cache(reducer.memo()));

            if size >= SAFE_UNIT_SIZE {
                if let Some(body) = unit.statements() {
                    let outcome =
                        split_top_level(body, &mut SizeEstimator::with_cache(reducer.memo()));
                    reducer.stats.record_top_level(&outcome);
                    size = unit.size(&mut SizeEstimator::with_cache(reducer.memo()));
                }
            }
            stats = reducer.stats;
            debug!(
                %kind,
                before = initial,
                size,
                extracted = stats.total(),
                "reduced unit"
            );
        }

        if size >= MAX_UNIT_SIZE {
            return Err(SizeError::SizeExceeded {
                unit: kind,
                span: unit.span(),
                size,
                limit: MAX_UNIT_SIZE,
            });
        }

        self.units.fetch_add(1, Ordering::Relaxed);
        if stats.total() > 0 {
            self.stats.lock().merge(&stats);
        }
        let nested = unit.into_nested();
        trace!(%kind, size, nested = nested.len(), "governed unit");
        Ok((size, nested))
    }

    /// Govern a unit and everything below it.
    fn govern_tree(&self, unit: Unit<'_>) -> Result<(), SizeError> {
        if self.cancelled.load(Ordering::Relaxed) {
            return Ok(());
        }
        let result = self
            .govern_one(unit)
            .and_then(|(_, nested)| self.govern_all(nested));
        if result.is_err() {
            self.cancelled.store(true, Ordering::Relaxed);
        }
        result
    }

    fn govern_all(&self, units: Vec<Unit<'_>>) -> Result<(), SizeError> {
        if self.config.parallel && units.len() > 1 {
            units
                .into_par_iter()
                .try_for_each(|unit| self.govern_tree(unit))
        } else {
            units
                .into_iter()
                .try_for_each(|unit| self.govern_tree(unit))
        }
    }

    /// Govern the units nested in the outermost one.
    ///
    /// The pool is only built when there is parallel work to do.
    fn govern_nested(&self, nested: Vec<Unit<'_>>) -> Result<(), SizeError> {
        if nested.is_empty() {
            return Ok(());
        }
        if !self.config.parallel {
            return self.govern_all(nested);
        }

        let mut pending = Some(nested);
        let result = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.num_threads)
            .stack_size(WORKER_STACK_SIZE)
            .build_scoped(rayon::ThreadBuilder::run, |pool| {
                let nested = pending.take().unwrap_or_default();
                pool.install(|| self.govern_all(nested))
            });
        match result {
            Ok(result) => result,
            Err(e) => {
                warn!("failed to create thread pool ({e}), governing sequentially");
                let nested = pending.take().unwrap_or_default();
                nested
                    .into_iter()
                    .try_for_each(|unit| self.govern_tree(unit))
            }
        }
    }
}
