use sizer_ir::build::{add, array, expr_stmt, function, num, script, sequence};
use sizer_ir::{Expr, Span, Stmt};

use super::{validate_function, validate_program};
use crate::test_support::stmt_of_cost;

fn pair() -> Expr {
    Expr::split(vec![num(1.0), num(2.0)], Span::DUMMY)
}

#[test]
fn list_placeholders_may_splice_several_values() {
    let nested = Expr::split(vec![pair(), num(3.0)], Span::DUMMY);
    let program = script(vec![
        expr_stmt(array(vec![pair(), nested])),
        expr_stmt(sequence(vec![pair(), num(4.0)])),
    ]);

    validate_program(&program);
}

#[test]
fn value_placeholder_with_one_expression_is_valid() {
    let value = Expr::split(vec![num(1.0)], Span::DUMMY);
    let program = script(vec![expr_stmt(add(value, num(2.0)))]);

    validate_program(&program);
}

#[test]
fn small_function_is_valid() {
    validate_function(&function(Some("f"), &[], vec![stmt_of_cost(1_000)]));
}

#[test]
#[cfg(debug_assertions)]
#[should_panic(expected = "wraps 2 expressions")]
fn value_placeholder_with_several_expressions_panics() {
    let program = script(vec![expr_stmt(add(pair(), num(3.0)))]);

    validate_program(&program);
}

#[test]
#[cfg(debug_assertions)]
#[should_panic(expected = "wraps a lone placeholder")]
fn placeholder_around_placeholder_panics() {
    let inner = Stmt::split(vec![stmt_of_cost(101)], Span::DUMMY);
    let program = script(vec![Stmt::split(vec![inner], Span::DUMMY)]);

    validate_program(&program);
}

#[test]
#[cfg(debug_assertions)]
#[should_panic(expected = "exceeds the unit ceiling")]
fn oversized_nested_function_panics() {
    let body = (0..70).map(|_| stmt_of_cost(1_000)).collect();
    let program = script(vec![expr_stmt(sizer_ir::build::function_expr(&[], body))]);

    validate_program(&program);
}
