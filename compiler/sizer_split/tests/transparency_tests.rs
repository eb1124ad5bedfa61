#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]
//! Governed programs behave exactly like the originals.
//!
//! Every test builds a program whose outermost unit is past the safe
//! ceiling, runs it through the reference evaluator, governs it, and runs
//! it again. The trace of `log` calls, the completion value and any
//! uncaught exception must all match.

mod common;

use pretty_assertions::assert_eq;
use sizer_ir::build::{
    array, assign, assign_op, binary, block, break_, call, case, class_decl, class_method,
    const_, continue_, counting_loop, default_case, expr_stmt, field, for_in, for_of,
    function_decl, hole, ident, if_, index, key_value, labelled, let_, logical, member,
    method_property, module, new_, object, quasi, return_, script, sequence, shorthand, spread,
    spread_property, static_block, static_field, subst, switch, template, this, throw, try_stmt,
    update, var_,
};
use sizer_ir::{AssignOp, BinaryOp, Expr, LogicalOp, Stmt, StmtKind, UpdateOp, VarKind};
use sizer_split::{govern_program, GovernorConfig, SplitStats};

use common::{assert_transparent, count_placeholders, log, log_stmt, n, outcome, s};

/// `name += value;`
fn add_to(name: &str, value: Expr) -> Stmt {
    expr_stmt(assign_op(
        AssignOp::Compound(BinaryOp::Add),
        ident(name),
        value,
    ))
}

/// `name = name * 3 % 1000003;`, a non-commutative step so reordered
/// statements change the result.
fn scramble(name: &str, salt: u32) -> Stmt {
    let product = binary(BinaryOp::Mul, ident(name), n(3));
    let salted = binary(BinaryOp::Add, product, n(salt));
    expr_stmt(assign(
        ident(name),
        binary(BinaryOp::Mod, salted, n(1_000_003)),
    ))
}

fn scrambles(name: &str, count: u32) -> Vec<Stmt> {
    (0..count).map(|salt| scramble(name, salt)).collect()
}

// -- List literals --

#[test]
fn big_array_literal() {
    let items = (0..8_000).map(n).collect();
    let program = script(vec![
        const_("xs", array(items)),
        let_("sum", Some(n(0))),
        for_of(VarKind::Const, "x", ident("xs"), add_to("sum", ident("x"))),
        log_stmt(vec![
            member(ident("xs"), "length"),
            index(ident("xs"), n(0)),
            index(ident("xs"), n(7_999)),
        ]),
        expr_stmt(ident("sum")),
    ]);

    let (governed, report) = assert_transparent(program, &GovernorConfig::default());

    assert!(report.stats.list_chunks > 0);
    assert!(count_placeholders(&governed) >= report.stats.total());
    assert_eq!(outcome(&governed).value, "31996000");
}

#[test]
fn mixed_array_keeps_holes_and_spreads() {
    let items = (0..4_000)
        .map(|i| match i % 5 {
            0 => hole(),
            1 => spread(ident("pair")),
            2 => array(vec![n(i), s("inner")]),
            3 => s("text"),
            _ => n(i),
        })
        .collect();
    let program = script(vec![
        const_("pair", array(vec![s("a"), s("b")])),
        const_("xs", array(items)),
        log_stmt(vec![member(ident("xs"), "length")]),
        expr_stmt(ident("xs")),
    ]);

    assert_transparent(program, &GovernorConfig::default());
}

#[test]
fn big_object_literal() {
    let mut properties = vec![shorthand("base"), spread_property(ident("extra"))];
    properties.extend((0..4_000).map(|i| key_value(&format!("k{i}"), n(i))));
    properties.push(method_property(
        "total",
        &[],
        vec![return_(Some(binary(
            BinaryOp::Add,
            member(this(), "k0"),
            member(this(), "k3999"),
        )))],
    ));
    let program = script(vec![
        const_("base", s("b")),
        const_("extra", object(vec![key_value("k0", s("overridden"))])),
        const_("o", object(properties)),
        let_("keys", Some(n(0))),
        for_in(
            VarKind::Const,
            "k",
            ident("o"),
            expr_stmt(update(UpdateOp::Increment, false, ident("keys"))),
        ),
        log_stmt(vec![
            ident("keys"),
            call(member(ident("o"), "total"), vec![]),
            member(ident("o"), "base"),
        ]),
    ]);

    let (governed, _) = assert_transparent(program, &GovernorConfig::default());

    assert_eq!(outcome(&governed).trace, ["4002 3999 b"]);
}

#[test]
fn big_class_body() {
    let mut members: Vec<_> = (0..3_000)
        .map(|i| field(&format!("f{i}"), Some(n(i))))
        .collect();
    members.push(static_field("created", Some(n(0))));
    members.push(static_block(vec![expr_stmt(assign(
        member(this(), "created"),
        n(1),
    ))]));
    members.push(class_method(
        "sum",
        &[],
        vec![return_(Some(binary(
            BinaryOp::Add,
            member(this(), "f1"),
            member(this(), "f2999"),
        )))],
    ));
    let program = script(vec![
        class_decl("Big", members),
        const_("big", new_(ident("Big"), vec![])),
        log_stmt(vec![
            call(member(ident("big"), "sum"), vec![]),
            member(ident("Big"), "created"),
        ]),
    ]);

    let (governed, _) = assert_transparent(program, &GovernorConfig::default());

    assert_eq!(outcome(&governed).trace, ["3000 1"]);
}

#[test]
fn big_template() {
    let mut parts = Vec::new();
    for i in 0..3_000 {
        parts.push(quasi("-"));
        parts.push(subst(n(i)));
    }
    parts.push(quasi("!"));
    let program = script(vec![
        const_("text", template(parts)),
        log_stmt(vec![member(ident("text"), "length")]),
        expr_stmt(ident("text")),
    ]);

    assert_transparent(program, &GovernorConfig::default());
}

#[test]
fn long_comma_sequence() {
    let items = (0..3_000).map(|i| log(vec![n(i)])).collect();
    let program = script(vec![
        const_("last", sequence(items)),
        log_stmt(vec![s("done"), ident("last")]),
    ]);

    let (governed, _) = assert_transparent(program, &GovernorConfig::default());

    let trace = outcome(&governed).trace;
    assert_eq!(trace.len(), 3_001);
    assert_eq!(trace[2_999], "2999");
    assert_eq!(trace[3_000], "done undefined");
}

// -- Operator chains --

#[test]
fn subtraction_chain_keeps_associativity() {
    let chain = (1..=3_000).fold(n(1_000), |acc, i| binary(BinaryOp::Sub, acc, n(i)));
    let program = script(vec![expr_stmt(chain)]);

    let (governed, report) = assert_transparent(program, &GovernorConfig::default());

    assert!(report.stats.binary_extractions > 0);
    assert_eq!(outcome(&governed).value, "-4500500");
}

#[test]
fn string_concatenation_chain() {
    let chain = (0..2_000).fold(s(""), |acc, i| {
        binary(BinaryOp::Add, binary(BinaryOp::Add, acc, n(i)), s(","))
    });
    let program = script(vec![
        const_("joined", chain),
        log_stmt(vec![member(ident("joined"), "length")]),
    ]);

    assert_transparent(program, &GovernorConfig::default());
}

#[test]
fn logical_chain_short_circuits() {
    let chain = (0..3_000)
        .map(|i| {
            if i == 2_000 {
                n(0)
            } else {
                update(UpdateOp::Increment, true, ident("count"))
            }
        })
        .reduce(|acc, item| logical(LogicalOp::And, acc, item))
        .expect("non-empty chain");
    let program = script(vec![
        let_("count", Some(n(0))),
        const_("result", chain),
        log_stmt(vec![ident("count"), ident("result")]),
    ]);

    let (governed, _) = assert_transparent(program, &GovernorConfig::default());

    assert_eq!(outcome(&governed).trace, ["2000 0"]);
}

// -- Statements --

#[test]
fn labelled_loops_with_jumps() {
    let mut inner = vec![
        if_(
            binary(BinaryOp::StrictEq, ident("j"), n(2)),
            continue_(Some("outer")),
            None,
        ),
        if_(
            binary(BinaryOp::StrictEq, ident("i"), n(2)),
            break_(Some("outer")),
            None,
        ),
    ];
    inner.extend(scrambles("acc", 2_000));
    inner.push(log_stmt(vec![ident("i"), ident("j"), ident("acc")]));
    let program = script(vec![
        let_("acc", Some(n(1))),
        labelled(
            "outer",
            counting_loop("i", 5.0, counting_loop("j", 5.0, block(inner))),
        ),
        expr_stmt(ident("acc")),
    ]);

    let (governed, report) = assert_transparent(program, &GovernorConfig::default());

    assert!(report.stats.statement_extractions + report.stats.statement_groups > 0);
    assert_eq!(outcome(&governed).trace.len(), 4);
}

#[test]
fn try_catch_finally() {
    let mut attempt = scrambles("acc", 1_200);
    attempt.push(throw(binary(BinaryOp::Add, s("boom "), ident("acc"))));
    attempt.push(log_stmt(vec![s("unreachable")]));
    let mut handler = scrambles("acc", 1_000);
    handler.push(log_stmt(vec![s("caught"), ident("e")]));
    let mut finalizer = scrambles("acc", 1_000);
    finalizer.push(log_stmt(vec![s("finally"), ident("acc")]));
    let program = script(vec![
        let_("acc", Some(n(7))),
        try_stmt(attempt, Some((Some("e"), handler)), Some(finalizer)),
        expr_stmt(ident("acc")),
    ]);

    let (governed, _) = assert_transparent(program, &GovernorConfig::default());

    let trace = outcome(&governed).trace;
    assert_eq!(trace.len(), 2);
    assert!(trace[0].starts_with("caught boom "));
}

#[test]
fn uncaught_throw_from_extracted_code() {
    let mut body = scrambles("acc", 2_000);
    body.push(throw(ident("acc")));
    let program = script(vec![let_("acc", Some(n(3))), block(body)]);

    let (governed, _) = assert_transparent(program, &GovernorConfig::default());

    assert!(outcome(&governed).thrown.is_some());
}

#[test]
fn switch_with_fallthrough_and_returns() {
    let mut first = scrambles("out", 1_000);
    first.push(log_stmt(vec![s("fell"), ident("out")]));
    let mut second = scrambles("out", 1_000);
    second.push(break_(None));
    let mut third = scrambles("out", 1_000);
    third.push(return_(Some(binary(BinaryOp::Sub, n(0), ident("out")))));
    let mut fallback = scrambles("out", 500);
    fallback.push(log_stmt(vec![s("default")]));
    let program = script(vec![
        function_decl(
            "pick",
            &["k"],
            vec![
                var_("out", Some(ident("k"))),
                switch(
                    ident("k"),
                    vec![
                        case(n(0), first),
                        case(n(1), second),
                        case(n(2), third),
                        default_case(fallback),
                    ],
                ),
                return_(Some(ident("out"))),
            ],
        ),
        log_stmt(
            (0..4)
                .map(|k| call(ident("pick"), vec![n(k)]))
                .collect(),
        ),
    ]);

    let (governed, report) = assert_transparent(program, &GovernorConfig::default());

    assert!(report.units > 1);
    assert_eq!(outcome(&governed).trace.len(), 3);
}

#[test]
fn module_top_level_is_chunked() {
    let mut body: Vec<Stmt> = (0..4_000)
        .map(|i| let_(&format!("v{i}"), Some(n(i))))
        .collect();
    body.push(log_stmt(vec![binary(
        BinaryOp::Add,
        ident("v0"),
        ident("v3999"),
    )]));
    let program = module(body);

    let (governed, report) = assert_transparent(program, &GovernorConfig::sequential());

    assert!(report.stats.top_level_chunks > 0);
    assert!(governed
        .body
        .iter()
        .any(|stmt| matches!(stmt.kind, StmtKind::Split(_))));
    assert_eq!(outcome(&governed).trace, ["3999"]);
}

#[test]
fn hoisted_function_called_before_its_declaration() {
    let mut body = vec![
        var_("acc", Some(n(5))),
        log_stmt(vec![call(ident("late"), vec![])]),
    ];
    body.extend(scrambles("acc", 2_000));
    body.push(function_decl("late", &[], vec![return_(Some(s("hoisted")))]));
    let program = script(body);

    let (governed, _) = assert_transparent(program, &GovernorConfig::default());

    assert_eq!(outcome(&governed).trace, ["hoisted"]);
}

// -- Nested units --

#[test]
fn nested_functions_governed_in_parallel() {
    let mut body: Vec<Stmt> = (0..8)
        .map(|f| {
            let mut stmts = vec![var_("t", Some(n(f)))];
            stmts.extend(scrambles("t", 1_500));
            stmts.push(return_(Some(ident("t"))));
            function_decl(&format!("f{f}"), &[], stmts)
        })
        .collect();
    body.push(log_stmt(
        (0..8)
            .map(|f| call(ident(&format!("f{f}")), vec![]))
            .collect(),
    ));
    let program = script(body);
    let config = GovernorConfig {
        parallel: true,
        num_threads: 4,
    };

    let parallel_outcome = {
        let (governed, report) = assert_transparent(program.clone(), &config);
        assert!(report.units > 1 + 8);
        outcome(&governed)
    };
    let sequential_outcome = {
        let mut governed = program;
        let report = govern_program(&mut governed, &GovernorConfig::sequential())
            .expect("program fits");
        assert!(report.stats.total() > 0);
        outcome(&governed)
    };

    assert_eq!(parallel_outcome, sequential_outcome);
}

#[test]
fn small_programs_are_left_alone() {
    let mut program = script(vec![
        let_("acc", Some(n(1))),
        block(scrambles("acc", 10)),
        expr_stmt(ident("acc")),
    ]);
    let original = program.clone();

    let report = govern_program(&mut program, &GovernorConfig::default())
        .expect("small program fits");

    assert_eq!(report.stats, SplitStats::default());
    assert_eq!(program, original);
    assert_eq!(count_placeholders(&program), 0);
}
