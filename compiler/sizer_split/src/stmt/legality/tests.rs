use pretty_assertions::assert_eq;
use rustc_hash::FxHashSet;
use sizer_ir::build::{
    await_, block, break_, case, continue_, counting_loop, expr_stmt, for_of, function_expr,
    ident, if_, labelled, num, switch, while_loop, yield_,
};
use sizer_ir::{NodeId, Stmt, StmtKind, VarKind};

use super::Legality;

fn ids(stmts: &[&Stmt]) -> FxHashSet<NodeId> {
    stmts.iter().map(|stmt| stmt.id).collect()
}

#[test]
fn labelled_continue_blocks_the_path_to_its_label() {
    let jump = continue_(Some("outer"));
    let guard_body = block(vec![jump.clone()]);
    let guard = if_(ident("c"), guard_body.clone(), None);
    let free = expr_stmt(num(1.0));
    let inner_body = block(vec![free.clone(), guard.clone()]);
    let inner = counting_loop("j", 3.0, inner_body.clone());
    let outer_body = block(vec![inner.clone()]);
    let outer_loop = counting_loop("i", 3.0, outer_body.clone());
    let origin = labelled("outer", outer_loop.clone());

    let legality = Legality::analyze(&origin);

    assert_eq!(
        legality.blocked,
        ids(&[
            &outer_loop,
            &outer_body,
            &inner,
            &inner_body,
            &guard,
            &guard_body,
            &jump
        ])
    );
    assert!(!legality.is_blocked(free.id));
    assert!(!legality.is_blocked(origin.id));
}

#[test]
fn unlabelled_break_targets_the_nearest_switch() {
    let jump = break_(None);
    let work = expr_stmt(num(1.0));
    let choice = switch(ident("x"), vec![case(num(1.0), vec![work.clone(), jump.clone()])]);
    let body = block(vec![choice.clone()]);
    let origin = while_loop(ident("c"), body.clone());

    let legality = Legality::analyze(&origin);

    assert_eq!(legality.blocked, ids(&[&jump]));
}

#[test]
fn unlabelled_continue_skips_switches() {
    let jump = continue_(None);
    let choice = switch(ident("x"), vec![case(num(1.0), vec![jump.clone()])]);
    let body = block(vec![choice.clone()]);
    let origin = while_loop(ident("c"), body.clone());

    let legality = Legality::analyze(&origin);

    assert_eq!(legality.blocked, ids(&[&body, &choice, &jump]));
}

#[test]
fn jump_out_of_the_origin_blocks_its_whole_path() {
    let jump = break_(None);
    let guard_body = block(vec![jump.clone()]);
    let guard = if_(ident("c"), guard_body.clone(), None);
    let sibling = expr_stmt(num(1.0));
    let origin = block(vec![guard.clone(), sibling.clone()]);

    let legality = Legality::analyze(&origin);

    assert_eq!(legality.blocked, ids(&[&guard, &guard_body, &jump]));
    assert!(!legality.is_blocked(sibling.id));
}

#[test]
fn labelled_break_blocks_the_labelled_body() {
    let jump = break_(Some("done"));
    let body = block(vec![expr_stmt(num(1.0)), jump.clone()]);
    let origin = block(vec![labelled("done", body.clone())]);

    let legality = Legality::analyze(&origin);

    assert_eq!(legality.blocked, ids(&[&body, &jump]));
}

#[test]
fn jumps_inside_nested_functions_are_ignored() {
    let callback = function_expr(&[], vec![while_loop(ident("c"), break_(None))]);
    let origin = block(vec![expr_stmt(callback), expr_stmt(num(1.0))]);

    let legality = Legality::analyze(&origin);

    assert!(legality.blocked.is_empty());
}

#[test]
fn suspension_marks_enclosing_statements() {
    let waits = expr_stmt(await_(ident("p")));
    let yields = expr_stmt(yield_(None));
    let nested = block(vec![yields.clone()]);
    let plain = expr_stmt(num(1.0));
    let origin = block(vec![waits.clone(), nested.clone(), plain.clone()]);

    let legality = Legality::analyze(&origin);

    assert_eq!(
        legality.suspending,
        ids(&[&origin, &waits, &nested, &yields])
    );
    assert!(!legality.suspends(plain.id));
}

#[test]
fn for_await_suspends() {
    let mut lp = for_of(VarKind::Const, "x", ident("xs"), block(vec![]));
    if let StmtKind::ForOf { is_await, .. } = &mut lp.kind {
        *is_await = true;
    }
    let origin = block(vec![lp.clone()]);

    let legality = Legality::analyze(&origin);

    assert!(legality.suspends(lp.id));
    assert!(legality.suspends(origin.id));
}
