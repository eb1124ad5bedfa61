//! Per-strategy counters.

use crate::binary::BinaryOutcome;
use crate::list::ListOutcome;
use crate::stmt::StmtOutcome;
use crate::top_level::TopLevelOutcome;

/// How many placeholders each strategy created.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SplitStats {
    /// List elements moved out on their own.
    pub list_outliers: usize,
    /// Runs of list elements conflated into one placeholder.
    pub list_chunks: usize,
    pub binary_extractions: usize,
    /// Statements extracted on their own.
    pub statement_extractions: usize,
    /// Sibling groups extracted together.
    pub statement_groups: usize,
    pub top_level_chunks: usize,
}

impl SplitStats {
    /// Total number of placeholders created.
    pub fn total(&self) -> usize {
        self.list_outliers
            + self.list_chunks
            + self.binary_extractions
            + self.statement_extractions
            + self.statement_groups
            + self.top_level_chunks
    }

    pub fn merge(&mut self, other: &SplitStats) {
        self.list_outliers += other.list_outliers;
        self.list_chunks += other.list_chunks;
        self.binary_extractions += other.binary_extractions;
        self.statement_extractions += other.statement_extractions;
        self.statement_groups += other.statement_groups;
        self.top_level_chunks += other.top_level_chunks;
    }

    pub(crate) fn record_list(&mut self, outcome: &ListOutcome) {
        self.list_outliers += outcome.outliers;
        self.list_chunks += outcome.chunks;
    }

    pub(crate) fn record_binary(&mut self, outcome: &BinaryOutcome) {
        self.binary_extractions += outcome.extracted;
    }

    pub(crate) fn record_statement(&mut self, outcome: &StmtOutcome) {
        self.statement_extractions += outcome.extracted;
        self.statement_groups += outcome.grouped;
    }

    pub(crate) fn record_top_level(&mut self, outcome: &TopLevelOutcome) {
        self.top_level_chunks += outcome.chunks;
    }
}
