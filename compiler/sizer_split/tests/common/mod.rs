//! Shared helpers for the governor integration tests.
//!
//! Programs here are built with the `sizer_ir` builders and are large
//! enough to push their unit past the safe ceiling, so governing them has
//! to insert placeholders.

#![allow(dead_code, reason = "not every test binary uses every helper")]

use pretty_assertions::assert_eq;
use sizer_eval::{run_program, Outcome};
use sizer_ir::build::{call, expr_stmt, ident, num, string};
use sizer_ir::visitor::{walk_function, walk_split, walk_stmts, SplitRef, Visitor};
use sizer_ir::{Expr, Function, Program, Stmt};
use sizer_split::budget::MAX_UNIT_SIZE;
use sizer_split::{
    estimate_stmts, govern_program, validate_program, GovernReport, GovernorConfig,
};

/// `log(args...)`
pub fn log(args: Vec<Expr>) -> Expr {
    call(ident("log"), args)
}

pub fn log_stmt(args: Vec<Expr>) -> Stmt {
    expr_stmt(log(args))
}

pub fn n(value: u32) -> Expr {
    num(f64::from(value))
}

pub fn s(text: &str) -> Expr {
    string(text)
}

/// Run `program` before and after governing it and require the same
/// outcome. Returns the governed tree and the report.
pub fn assert_transparent(program: Program, config: &GovernorConfig) -> (Program, GovernReport) {
    let before = run_program(&program).expect("ungoverned program evaluates");

    let mut governed = program;
    let report = govern_program(&mut governed, config).expect("program fits after governing");
    validate_program(&governed);
    assert!(
        count_placeholders(&governed) > 0,
        "test program is too small to need governing"
    );
    assert!(estimate_stmts(&governed.body) < MAX_UNIT_SIZE);

    let after = run_program(&governed).expect("governed program evaluates");
    assert_eq!(before, after);
    (governed, report)
}

/// Outcome of a program that is expected to evaluate cleanly.
pub fn outcome(program: &Program) -> Outcome {
    run_program(program).expect("program evaluates")
}

/// Placeholders anywhere in the program, nested functions included.
pub fn count_placeholders(program: &Program) -> usize {
    let mut counter = PlaceholderCounter::default();
    walk_stmts(&mut counter, &program.body);
    counter.count
}

#[derive(Default)]
struct PlaceholderCounter {
    count: usize,
}

impl<'ast> Visitor<'ast> for PlaceholderCounter {
    fn visit_function(&mut self, function: &'ast Function) {
        walk_function(self, function);
    }

    fn visit_static_block(&mut self, body: &'ast [Stmt]) {
        walk_stmts(self, body);
    }

    fn visit_split(&mut self, split: SplitRef<'ast>) {
        self.count += 1;
        walk_split(self, split);
    }
}
