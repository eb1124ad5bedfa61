//! Trees of a known cost.

use sizer_ir::build::{add, expr_stmt, num, string, unary};
use sizer_ir::{Expr, Stmt, UnaryOp};

/// Left-deep arithmetic expression whose estimated cost is exactly `target`.
///
/// Odd targets start from a number (5), even ones from a string (6). Each
/// round adds two `+ 1` nodes (30) and `!` wrappers (2 each) fill the rest.
pub fn expr_of_cost(target: u32) -> Expr {
    assert!(target >= 5, "no expression costs less than 5");
    let (mut expr, mut rest) = if target % 2 == 1 {
        (num(1.0), target - 5)
    } else {
        (string("s"), target - 6)
    };
    while rest >= 30 {
        expr = add(add(expr, num(1.0)), num(1.0));
        rest -= 30;
    }
    while rest > 0 {
        expr = unary(UnaryOp::Not, expr);
        rest -= 2;
    }
    expr
}

/// Expression statement whose estimated cost is exactly `target`.
pub fn stmt_of_cost(target: u32) -> Stmt {
    expr_stmt(expr_of_cost(target - 2))
}
