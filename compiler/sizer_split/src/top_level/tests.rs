use pretty_assertions::assert_eq;
use sizer_ir::build::function_decl;
use sizer_ir::{Stmt, StmtKind};

use super::{split_top_level, TopLevelOutcome};
use crate::budget::SAFE_UNIT_SIZE;
use crate::estimate::{estimate_stmts, SizeEstimator};
use crate::test_support::stmt_of_cost;

fn split(body: &mut Vec<Stmt>) -> TopLevelOutcome {
    split_top_level(body, &mut SizeEstimator::new())
}

fn shape(body: &[Stmt]) -> Vec<Option<usize>> {
    body.iter()
        .map(|stmt| match &stmt.kind {
            StmtKind::Split(unit) => Some(unit.body.len()),
            _ => None,
        })
        .collect()
}

#[test]
fn unit_below_safe_size_is_untouched() {
    let mut body: Vec<Stmt> = (0..30).map(|_| stmt_of_cost(1_000)).collect();
    let original = body.clone();

    let outcome = split(&mut body);

    assert_eq!(outcome.chunks, 0);
    assert_eq!(body, original);
}

#[test]
fn chunks_from_the_back_until_safe() {
    let mut body: Vec<Stmt> = (0..40).map(|_| stmt_of_cost(1_000)).collect();

    let outcome = split(&mut body);

    assert_eq!(
        outcome,
        TopLevelOutcome {
            chunks: 1,
            before: 40_000,
            after: 40_000 - 8_000 + 25,
        }
    );
    let mut expected = vec![None; 32];
    expected.push(Some(8));
    assert_eq!(shape(&body), expected);
    assert!(estimate_stmts(&body) < SAFE_UNIT_SIZE);
}

#[test]
fn large_statements_are_chunked_alone() {
    let mut body: Vec<Stmt> = (0..5).map(|_| stmt_of_cost(8_000)).collect();

    let outcome = split(&mut body);

    assert_eq!(outcome.chunks, 1);
    assert_eq!(shape(&body), vec![None, None, None, None, Some(1)]);
}

#[test]
fn hoisted_declarations_are_barriers() {
    let mut body: Vec<Stmt> = (0..40).map(|_| stmt_of_cost(1_000)).collect();
    body.insert(36, function_decl("f", &[], vec![]));

    let outcome = split(&mut body);

    // The run after the declaration is too short to reach the safe size,
    // so chunking continues in front of it.
    assert_eq!(outcome.chunks, 2);
    let mut expected = vec![None; 28];
    expected.extend([Some(8), None, Some(4)]);
    assert_eq!(shape(&body), expected);
    assert!(matches!(body[29].kind, StmtKind::Function(_)));
}

#[test]
fn irreducible_statement_is_left_for_the_final_check() {
    let mut body = vec![stmt_of_cost(40_001)];
    let original = body.clone();

    let outcome = split(&mut body);

    assert_eq!(outcome.chunks, 0);
    assert_eq!(outcome.after, 40_001);
    assert_eq!(body, original);
}
