use pretty_assertions::assert_eq;
use sizer_ir::build::{
    await_, class_method, field, key_value, num, quasi, string, subst, yield_,
};
use sizer_ir::{ClassMember, Expr, ExprKind, Property, PropertyKind, TemplatePart};

use super::{split_list, ListOutcome};
use crate::estimate::weights::{ARRAY_ITEM, CLASS_MEMBER, PROPERTY, TEMPLATE_PART};
use crate::estimate::SizeEstimator;
use crate::test_support::expr_of_cost;

fn split_exprs(items: &mut Vec<Expr>) -> ListOutcome {
    split_list(items, ARRAY_ITEM, &mut SizeEstimator::new())
}

fn numbers(count: usize) -> Vec<Expr> {
    (0..count).map(|i| num(f64::from(u32::try_from(i).unwrap_or(0)))).collect()
}

/// Leaf elements reachable through list placeholders.
fn flattened_len(items: &[Expr]) -> usize {
    items
        .iter()
        .map(|item| match &item.kind {
            ExprKind::Split(unit) => flattened_len(&unit.body),
            _ => 1,
        })
        .sum()
}

#[test]
fn small_list_is_untouched() {
    let mut items = numbers(10);
    let original = items.clone();

    let outcome = split_exprs(&mut items);

    assert!(!outcome.changed());
    assert_eq!(outcome.before, 100);
    assert_eq!(outcome.after, 100);
    assert_eq!(items, original);
}

#[test]
fn element_at_inline_limit_stays() {
    let mut items = vec![expr_of_cost(1_024), num(1.0)];

    let outcome = split_exprs(&mut items);

    assert_eq!(outcome.outliers, 0);
    assert!(!items[0].is_split());
}

#[test]
fn element_above_inline_limit_is_extracted() {
    let mut items = vec![expr_of_cost(1_025), num(1.0)];

    let outcome = split_exprs(&mut items);

    assert_eq!(outcome.outliers, 1);
    assert_eq!(outcome.before, 1_025 + 5 + 5 + 5);
    assert_eq!(outcome.after, 25 + 5 + 5 + 5);
    let ExprKind::Split(unit) = &items[0].kind else {
        panic!("expected a placeholder, got {:?}", items[0].kind);
    };
    assert_eq!(unit.body.len(), 1);
    assert!(!items[1].is_split());
}

#[test]
fn one_large_property_among_small_ones() {
    let mut properties: Vec<Property> = (0..49)
        .map(|i| key_value(&format!("k{i}"), num(f64::from(i))))
        .collect();
    properties.insert(20, key_value("big", expr_of_cost(2_000)));

    let outcome = split_list(&mut properties, PROPERTY, &mut SizeEstimator::new());

    assert_eq!(
        outcome,
        ListOutcome {
            outliers: 1,
            chunks: 0,
            before: 49 * 11 + 2_006,
            after: 49 * 11 + 31,
        }
    );
    assert_eq!(properties.len(), 50);
    let split: Vec<usize> = properties
        .iter()
        .enumerate()
        .filter(|(_, property)| property.is_split())
        .map(|(index, _)| index)
        .collect();
    assert_eq!(split, vec![20]);
}

#[test]
fn several_outliers_are_all_extracted() {
    let mut items = vec![
        num(0.0),
        expr_of_cost(1_500),
        num(1.0),
        expr_of_cost(3_001),
        expr_of_cost(1_100),
    ];

    let outcome = split_exprs(&mut items);

    assert_eq!(outcome.outliers, 3);
    let split: Vec<bool> = items.iter().map(Expr::is_split).collect();
    assert_eq!(split, vec![false, true, false, true, true]);
}

#[test]
fn suspending_outlier_stays_inline() {
    let mut items = vec![await_(expr_of_cost(2_001)), num(1.0)];

    let outcome = split_exprs(&mut items);

    assert_eq!(outcome.outliers, 0);
    assert!(matches!(items[0].kind, ExprKind::Await(_)));
}

#[test]
fn existing_placeholders_are_not_extracted_again() {
    let mut items = vec![Expr::split(vec![expr_of_cost(2_001)], sizer_ir::Span::DUMMY)];
    let original = items.clone();

    let outcome = split_exprs(&mut items);

    assert!(!outcome.changed());
    assert_eq!(items, original);
}

#[test]
fn long_list_is_conflated_back_to_front() {
    // 100 × (1001 + 5): chunks of four fill 4024 of the 4096 chunk limit.
    let mut items: Vec<Expr> = (0..100).map(|_| expr_of_cost(1_001)).collect();

    let outcome = split_exprs(&mut items);

    assert_eq!(outcome.outliers, 0);
    assert_eq!(outcome.before, 100_600);
    // After 24 chunks the aggregate fits, so the leftmost run stays inline.
    assert_eq!(outcome.chunks, 24);
    assert_eq!(outcome.after, 4 * 1_006 + 24 * 30);
    assert_eq!(items.len(), 28);
    assert!(items[..4].iter().all(|item| !item.is_split()));
    for item in &items[4..] {
        let ExprKind::Split(unit) = &item.kind else {
            panic!("expected a placeholder");
        };
        assert_eq!(unit.body.len(), 4);
    }
    assert_eq!(flattened_len(&items), 100);
}

#[test]
fn repeated_passes_conflate_placeholders() {
    let mut items = numbers(120_000);

    let outcome = split_exprs(&mut items);

    // Pass 1 leaves 294 placeholders (8820); pass 2 folds runs of them.
    assert_eq!(outcome.chunks, 294 + 2);
    assert_eq!(outcome.after, 24 * 30);
    assert_eq!(items.len(), 24);
    assert!(items.iter().all(Expr::is_split));
    assert_eq!(flattened_len(&items), 120_000);
}

#[test]
fn suspending_elements_are_chunk_barriers() {
    let mut items = numbers(600);
    items.insert(300, yield_(Some(num(1.0))));
    items.extend(numbers(600));

    let outcome = split_exprs(&mut items);

    assert!(outcome.chunks > 0);
    assert!(outcome.after <= crate::budget::MAX_INLINE_LIST);
    assert!(items
        .iter()
        .any(|item| matches!(item.kind, ExprKind::Yield { .. })));
    assert_eq!(flattened_len(&items), 1_201);
}

#[test]
fn class_members_use_the_same_strategy() {
    let mut members: Vec<ClassMember> = vec![
        field("a", Some(num(1.0))),
        field("big", Some(expr_of_cost(1_501))),
        class_method("m", &[], vec![]),
    ];

    let outcome = split_list(&mut members, CLASS_MEMBER, &mut SizeEstimator::new());

    assert_eq!(outcome.outliers, 1);
    assert!(members[1].is_split());
    assert!(!members[0].is_split());
    assert!(!members[2].is_split());
}

#[test]
fn template_parts_use_the_same_strategy() {
    let mut parts: Vec<TemplatePart> = vec![
        quasi("a"),
        subst(expr_of_cost(2_000)),
        quasi("b"),
        subst(string("c")),
    ];

    let outcome = split_list(&mut parts, TEMPLATE_PART, &mut SizeEstimator::new());

    assert_eq!(outcome.outliers, 1);
    let split: Vec<bool> = parts.iter().map(TemplatePart::is_split).collect();
    assert_eq!(split, vec![false, true, false, false]);
}

#[test]
fn extracted_property_keeps_its_payload() {
    let big = key_value("big", expr_of_cost(1_201));
    let mut properties = vec![big.clone()];

    split_list(&mut properties, PROPERTY, &mut SizeEstimator::new());

    let PropertyKind::Split(unit) = &properties[0].kind else {
        panic!("expected a placeholder");
    };
    assert_eq!(unit.body, vec![big]);
}
