#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]
//! Governing with the debug subscriber installed.
//!
//! The subscriber is process-global, so these tests live in their own
//! binary.

mod common;

use pretty_assertions::assert_eq;
use sizer_ir::build::{array, const_, ident, member, script};
use sizer_split::{govern_program, init_tracing, GovernorConfig, SplitStats};

use common::{assert_transparent, log_stmt, n};

#[test]
fn init_tracing_is_idempotent() {
    init_tracing();
    init_tracing();

    let mut small = script(vec![const_("a", array((0..4).map(n).collect()))]);
    let report = govern_program(&mut small, &GovernorConfig::sequential()).unwrap();
    assert_eq!(report.units, 1);
    assert_eq!(report.stats, SplitStats::default());
}

#[test]
fn governing_after_init_tracing_is_unchanged() {
    init_tracing();

    let program = script(vec![
        const_("a", array((0..8_000).map(n).collect())),
        log_stmt(vec![member(ident("a"), "length")]),
    ]);
    let (_, report) = assert_transparent(program, &GovernorConfig::default());

    assert!(report.stats.list_chunks > 0);
    init_tracing();
}
