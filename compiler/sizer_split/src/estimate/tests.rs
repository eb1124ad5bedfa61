use pretty_assertions::assert_eq;
use rustc_hash::FxHashMap;
use sizer_ir::build::*;
use sizer_ir::{ClassMember, Expr, ExprKind, NodeId, Property, Span, Stmt, TemplatePart, UnaryOp};

use super::weights as w;
use super::*;
use crate::budget::STRING_CHUNK;
use crate::test_support::{expr_of_cost, stmt_of_cost};

#[test]
fn leaves_have_fixed_costs() {
    assert_eq!(estimate_expr(&num(1.0)), w::NUMBER);
    assert_eq!(estimate_expr(&string("hello")), w::STRING);
    assert_eq!(estimate_expr(&ident("x")), w::IDENT);
    assert_eq!(estimate_expr(&boolean(true)), w::KEYWORD);
    assert_eq!(estimate_expr(&this()), w::KEYWORD);
    assert_eq!(estimate_expr(&hole()), 0);
}

#[test]
fn operators_add_their_children() {
    let expr = add(num(1.0), ident("x"));
    assert_eq!(estimate_expr(&expr), w::BINARY + w::NUMBER + w::IDENT);

    let expr = unary(UnaryOp::Neg, num(1.0));
    assert_eq!(estimate_expr(&expr), w::UNARY + w::NUMBER);
}

#[test]
fn variadic_constructs_pay_per_item() {
    let expr = array(vec![num(1.0), num(2.0), num(3.0)]);
    assert_eq!(estimate_expr(&expr), w::ARRAY + 3 * (w::ARRAY_ITEM + w::NUMBER));

    let expr = call(ident("f"), vec![num(1.0), num(2.0)]);
    assert_eq!(estimate_expr(&expr), w::CALL + w::IDENT + 2 * (w::ARG + w::NUMBER));

    let expr = object(vec![key_value("a", num(1.0)), shorthand("b")]);
    assert_eq!(
        estimate_expr(&expr),
        w::OBJECT + (w::PROPERTY + w::NUMBER) + (w::PROPERTY + w::IDENT)
    );
}

#[test]
fn computed_keys_count() {
    let expr = object(vec![computed(ident("k"), num(1.0))]);
    assert_eq!(
        estimate_expr(&expr),
        w::OBJECT + w::PROPERTY + w::IDENT + w::NUMBER
    );
}

#[test]
fn empty_list_costs_only_its_base() {
    assert_eq!(estimate_expr(&array(vec![])), w::ARRAY);
    assert_eq!(estimate_stmt(&block(vec![])), 0);
}

#[test]
fn long_strings_pay_per_piece() {
    let exact = "a".repeat(STRING_CHUNK);
    assert_eq!(estimate_expr(&string(&exact)), w::STRING);

    let over = "a".repeat(STRING_CHUNK + 1);
    assert_eq!(estimate_expr(&string(&over)), w::STRING + 2 * w::STRING_PIECE);

    let triple = "a".repeat(STRING_CHUNK * 3);
    assert_eq!(estimate_expr(&string(&triple)), w::STRING + 3 * w::STRING_PIECE);
}

#[test]
fn placeholders_are_terminal() {
    let heavy = expr_of_cost(5_000);
    let placeholder = Expr::split(vec![heavy], Span::DUMMY);
    assert_eq!(estimate_expr(&placeholder), SPLIT_COST);

    let stmt = Stmt::split(vec![stmt_of_cost(9_000)], Span::DUMMY);
    assert_eq!(estimate_stmt(&stmt), SPLIT_COST);
}

#[test]
fn list_elements_cost_without_their_slot() {
    assert_eq!(estimate_property(&key_value("a", num(1.0))), w::NUMBER);
    assert_eq!(
        estimate_property(&computed(ident("k"), num(1.0))),
        w::IDENT + w::NUMBER
    );
    assert_eq!(estimate_property(&shorthand("x")), w::IDENT);
    assert_eq!(
        estimate_property(&spread_property(ident("rest"))),
        w::SPREAD + w::IDENT
    );
    assert_eq!(
        estimate_property(&method_property("m", &[], vec![stmt_of_cost(9_000)])),
        w::FUNCTION
    );
    let properties = Property::split(vec![key_value("a", expr_of_cost(5_000))], Span::DUMMY);
    assert_eq!(estimate_property(&properties), SPLIT_COST);

    assert_eq!(estimate_member(&field("x", Some(num(1.0)))), w::FIELD + w::NUMBER);
    assert_eq!(estimate_member(&static_field("y", None)), w::FIELD);
    assert_eq!(
        estimate_member(&class_method("m", &[], vec![stmt_of_cost(9_000)])),
        w::FUNCTION
    );
    assert_eq!(
        estimate_member(&static_block(vec![stmt_of_cost(9_000)])),
        w::FUNCTION
    );
    let members = ClassMember::split(vec![field("z", Some(expr_of_cost(5_000)))], Span::DUMMY);
    assert_eq!(estimate_member(&members), SPLIT_COST);

    assert_eq!(estimate_part(&quasi("abc")), w::STRING);
    assert_eq!(estimate_part(&subst(ident("x"))), w::IDENT);
    let parts = TemplatePart::split(vec![subst(expr_of_cost(5_000))], Span::DUMMY);
    assert_eq!(estimate_part(&parts), SPLIT_COST);
}

#[test]
fn nested_functions_cost_creation_only() {
    let body = vec![stmt_of_cost(20_000)];
    assert_eq!(estimate_expr(&function_expr(&[], body.clone())), w::FUNCTION);
    assert_eq!(estimate_stmt(&function_decl("f", &[], body)), w::FUNCTION);

    let class = class_expr(vec![
        class_method("m", &[], vec![stmt_of_cost(20_000)]),
        static_block(vec![stmt_of_cost(20_000)]),
        field("x", Some(num(1.0))),
    ]);
    assert_eq!(
        estimate_expr(&class),
        w::CLASS
            + (w::CLASS_MEMBER + w::FUNCTION)
            + (w::CLASS_MEMBER + w::FUNCTION)
            + (w::CLASS_MEMBER + w::FIELD + w::NUMBER)
    );
}

#[test]
fn function_unit_counts_defaults_and_body() {
    let mut function = function(None, &["a"], vec![return_(Some(ident("a")))]);
    function.params[0].default = Some(num(0.0));
    assert_eq!(
        estimate_function_unit(&function),
        w::NUMBER + w::RETURN + w::IDENT
    );

    let ExprKind::Function(concise) = arrow(&["a"], ident("a")).kind else {
        unreachable!();
    };
    assert_eq!(estimate_function_unit(&concise), w::RETURN + w::IDENT);
}

#[test]
fn loops_pay_iteration_overhead() {
    let stmt = for_of(sizer_ir::VarKind::Const, "x", ident("xs"), block(vec![]));
    assert_eq!(estimate_stmt(&stmt), w::FOR_OF + w::DECLARATOR + w::IDENT);

    let stmt = while_loop(boolean(true), break_(None));
    assert_eq!(estimate_stmt(&stmt), w::WHILE + w::KEYWORD + w::JUMP);
}

#[test]
fn suspension_is_expensive() {
    assert_eq!(estimate_expr(&await_(ident("p"))), w::AWAIT + w::IDENT);
    assert_eq!(estimate_expr(&yield_(None)), w::YIELD);
}

#[test]
fn try_counts_every_clause() {
    let stmt = try_stmt(
        vec![expr_stmt(num(1.0))],
        Some((Some("e"), vec![expr_stmt(num(2.0))])),
        Some(vec![expr_stmt(num(3.0))]),
    );
    let clause = w::EXPR_STMT + w::NUMBER;
    assert_eq!(
        estimate_stmt(&stmt),
        w::TRY + clause + (w::CATCH + clause) + (w::FINALLY + clause)
    );
}

#[test]
fn hook_sees_every_node_post_order() {
    let expr = add(num(1.0), ident("x"));
    let root = expr.id;
    let mut seen = Vec::new();
    let mut record = |id: NodeId, cost: u32| seen.push((id, cost));
    let total = SizeEstimator::with_hook(&mut record).expr(&expr);

    assert_eq!(seen.len(), 3);
    assert_eq!(seen.last(), Some(&(root, total)));
}

#[test]
fn cache_short_circuits_unchanged_subtrees() {
    let left = expr_of_cost(101);
    let left_id = left.id;
    let expr = add(left, num(1.0));

    let mut cache = FxHashMap::default();
    cache.insert(left_id, 1_000);
    let cost = SizeEstimator::with_cache(&cache).expr(&expr);
    assert_eq!(cost, w::BINARY + 1_000 + w::NUMBER);
}

#[test]
fn recompute_ignores_the_nodes_own_entry() {
    let expr = add(num(1.0), num(2.0));
    let mut cache = FxHashMap::default();
    cache.insert(expr.id, 9_999);

    assert_eq!(SizeEstimator::with_cache(&cache).expr(&expr), 9_999);
    assert_eq!(
        SizeEstimator::with_cache(&cache).recompute_expr(&expr),
        w::BINARY + 2 * w::NUMBER
    );
}

#[test]
fn helper_builds_exact_costs() {
    for target in [5, 6, 7, 36, 37, 1_024, 1_025, 4_096, 9_001] {
        assert_eq!(estimate_expr(&expr_of_cost(target)), target, "target {target}");
    }
    assert_eq!(estimate_stmt(&stmt_of_cost(8_193)), 8_193);
}

#[test]
fn deep_chains_do_not_overflow() {
    let mut expr = num(0.0);
    for _ in 0..2_000 {
        expr = add(expr, num(1.0));
    }
    assert_eq!(estimate_expr(&expr), 5 + 2_000 * 15);
}
