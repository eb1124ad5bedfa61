use pretty_assertions::assert_eq;
use rustc_hash::FxHashMap;
use sizer_ir::build::{
    await_, binary, block, continue_, counting_loop, expr_stmt, function_decl, ident, if_,
    labelled, num, try_stmt,
};
use sizer_ir::{BinaryOp, NodeId, Stmt, StmtKind};

use super::{apply_exports, split_statement, Legality, StmtOutcome};
use crate::errors::SizeError;
use crate::estimate::estimate_stmt;
use crate::test_support::stmt_of_cost;

fn block_body(stmt: &Stmt) -> &[Stmt] {
    match &stmt.kind {
        StmtKind::Block(body) => body,
        other => panic!("expected a block, got {other:?}"),
    }
}

fn loop_body(stmt: &Stmt) -> &Stmt {
    match &stmt.kind {
        StmtKind::For { body, .. } | StmtKind::Labelled { body, .. } => body,
        other => panic!("expected a loop or label, got {other:?}"),
    }
}

fn split_len(stmt: &Stmt) -> Option<usize> {
    match &stmt.kind {
        StmtKind::Split(unit) => Some(unit.body.len()),
        _ => None,
    }
}

#[test]
fn small_statement_is_untouched() {
    let mut origin = block(vec![stmt_of_cost(4_000), stmt_of_cost(4_000)]);
    let original = origin.clone();

    let outcome = split_statement(&mut origin).unwrap();

    assert!(!outcome.changed());
    assert_eq!(outcome.before, 8_000);
    assert_eq!(origin, original);
}

#[test]
fn oversized_child_is_extracted_first() {
    let mut origin = block(vec![stmt_of_cost(20_001), stmt_of_cost(101)]);

    let outcome = split_statement(&mut origin).unwrap();

    assert_eq!(
        outcome,
        StmtOutcome {
            extracted: 1,
            grouped: 0,
            before: 20_102,
            after: 126,
        }
    );
    let body = block_body(&origin);
    assert_eq!(split_len(&body[0]), Some(1));
    assert_eq!(split_len(&body[1]), None);
    assert_eq!(estimate_stmt(&origin), outcome.after);
}

#[test]
fn adjacent_siblings_are_grouped() {
    let mut origin = block((0..10).map(|_| stmt_of_cost(1_000)).collect());

    let outcome = split_statement(&mut origin).unwrap();

    assert_eq!(outcome.grouped, 1);
    assert_eq!(outcome.extracted, 0);
    assert_eq!(outcome.after, 10_000 - 8_000 + 25);
    let body = block_body(&origin);
    let shape: Vec<Option<usize>> = body.iter().map(split_len).collect();
    assert_eq!(shape, vec![Some(8), None, None]);
    assert_eq!(estimate_stmt(&origin), outcome.after);
}

#[test]
fn try_block_is_never_grouped_whole() {
    let mut origin = try_stmt((0..8).map(|_| stmt_of_cost(1_020)).collect(), None, None);

    let outcome = split_statement(&mut origin).unwrap();

    assert_eq!(outcome.grouped, 1);
    let StmtKind::Try { block, .. } = &origin.kind else {
        panic!("expected a try statement");
    };
    let shape: Vec<Option<usize>> = block.iter().map(split_len).collect();
    assert_eq!(shape, vec![Some(7), None]);
}

#[test]
fn labelled_continue_keeps_its_path_inline() {
    let first = stmt_of_cost(5_000);
    let second = stmt_of_cost(5_000);
    let first_id = first.id;
    let guard = if_(
        binary(BinaryOp::StrictEq, ident("j"), num(1.0)),
        block(vec![continue_(Some("outer"))]),
        None,
    );
    let guard_id = guard.id;
    let inner = counting_loop("j", 3.0, block(vec![first, guard, second]));
    let mut origin = labelled("outer", counting_loop("i", 3.0, block(vec![inner])));

    let outcome = split_statement(&mut origin).unwrap();

    assert_eq!(outcome.extracted, 1);
    // outer label -> outer loop -> block -> inner loop -> block
    let outer_loop = loop_body(&origin);
    let inner_loop = &block_body(loop_body(outer_loop))[0];
    let body = block_body(loop_body(inner_loop));
    assert_eq!(body.len(), 3);
    let StmtKind::Split(unit) = &body[0].kind else {
        panic!("expected the first statement to be extracted");
    };
    assert_eq!(unit.body[0].id, first_id);
    assert_eq!(body[1].id, guard_id);
    assert_eq!(split_len(&body[2]), None);
}

#[test]
fn suspending_statements_stay() {
    let waits = expr_stmt(await_(crate::test_support::expr_of_cost(9_001)));
    let mut origin = block(vec![waits, stmt_of_cost(11)]);
    let original = origin.clone();

    let outcome = split_statement(&mut origin).unwrap();

    assert!(!outcome.changed());
    assert_eq!(origin, original);
}

#[test]
fn function_declarations_stay() {
    let big = function_decl("f", &[], vec![stmt_of_cost(9_000)]);
    let mut origin = block(vec![big, stmt_of_cost(9_000)]);

    split_statement(&mut origin).unwrap();

    let body = block_body(&origin);
    assert!(matches!(body[0].kind, StmtKind::Function(_)));
    assert_eq!(split_len(&body[1]), Some(1));
}

#[test]
fn second_run_is_a_no_op() {
    let mut origin = block((0..30).map(|_| stmt_of_cost(1_001)).collect());
    split_statement(&mut origin).unwrap();
    let once = origin.clone();

    let outcome = split_statement(&mut origin).unwrap();

    assert!(!outcome.changed());
    assert_eq!(origin, once);
}

#[test]
fn splitting_reduces_the_estimate() {
    let mut origin = block(vec![
        stmt_of_cost(3_001),
        block(vec![stmt_of_cost(6_001), stmt_of_cost(2_001)]),
        stmt_of_cost(7_001),
    ]);
    let before = estimate_stmt(&origin);

    let outcome = split_statement(&mut origin).unwrap();

    assert!(outcome.changed());
    assert!(estimate_stmt(&origin) < before);
    assert!(estimate_stmt(&origin) <= crate::budget::MAX_INLINE_STMT);
}

#[test]
fn applying_a_blocked_statement_fails() {
    let guard = if_(ident("c"), block(vec![continue_(None)]), None);
    let guard_id = guard.id;
    let mut origin = counting_loop("i", 3.0, block(vec![guard, stmt_of_cost(101)]));
    let original = origin.clone();
    let legality = Legality::analyze(&origin);
    let plan: FxHashMap<NodeId, usize> = [(guard_id, 1)].into_iter().collect();

    let error = apply_exports(&mut origin, &plan, &legality).unwrap_err();

    assert!(matches!(
        error,
        SizeError::IllegalExtraction { node, .. } if node == guard_id
    ));
    assert_eq!(origin, original);
}

#[test]
fn applying_a_placeholder_fails() {
    let inner = Stmt::split(vec![stmt_of_cost(101)], sizer_ir::Span::DUMMY);
    let inner_id = inner.id;
    let mut origin = block(vec![inner, stmt_of_cost(101)]);
    let legality = Legality::analyze(&origin);
    let plan: FxHashMap<NodeId, usize> = [(inner_id, 1)].into_iter().collect();

    let error = apply_exports(&mut origin, &plan, &legality).unwrap_err();

    assert!(matches!(error, SizeError::IllegalExtraction { .. }));
}

#[test]
fn applying_a_group_wraps_following_siblings() {
    let stmts: Vec<Stmt> = (0..4).map(|_| stmt_of_cost(101)).collect();
    let head = stmts[1].id;
    let mut origin = block(stmts);
    let legality = Legality::analyze(&origin);
    let plan: FxHashMap<NodeId, usize> = [(head, 2)].into_iter().collect();

    let applied = apply_exports(&mut origin, &plan, &legality).unwrap();

    assert_eq!(applied, 1);
    let shape: Vec<Option<usize>> = block_body(&origin).iter().map(split_len).collect();
    assert_eq!(shape, vec![None, Some(2), None]);
}
