//! Terse tree builders.
//!
//! The governor sits behind a parser; tooling and tests that need trees
//! without source text build them with these functions. All nodes get
//! [`Span::DUMMY`] and a fresh id. Keyword-named builders carry a trailing
//! underscore (`if_`, `break_`, ...).

use crate::ast::{
    AssignOp, BinaryOp, CatchClause, Class, ClassMember, ClassMemberKind, Expr, ExprKind, ForHead,
    ForInit, Function, FunctionBody, LogicalOp, MethodKind, Param, Program, ProgramKind, Property,
    PropertyKey, PropertyKind, Stmt, StmtKind, SwitchCase, TemplatePart, UnaryOp, UpdateOp,
    VarDecl, VarKind,
};
use crate::{Name, Span};

fn expr(kind: ExprKind) -> Expr {
    Expr::new(kind, Span::DUMMY)
}

fn stmt(kind: StmtKind) -> Stmt {
    Stmt::new(kind, Span::DUMMY)
}

// Literals and names

pub fn num(value: f64) -> Expr {
    expr(ExprKind::Number(value))
}

pub fn string(text: &str) -> Expr {
    expr(ExprKind::Str(text.to_owned()))
}

pub fn boolean(value: bool) -> Expr {
    expr(ExprKind::Bool(value))
}

pub fn null() -> Expr {
    expr(ExprKind::Null)
}

pub fn undefined() -> Expr {
    expr(ExprKind::Undefined)
}

pub fn ident(name: &str) -> Expr {
    expr(ExprKind::Ident(Name::new(name)))
}

pub fn this() -> Expr {
    expr(ExprKind::This)
}

pub fn hole() -> Expr {
    expr(ExprKind::Hole)
}

// Collections

pub fn array(items: Vec<Expr>) -> Expr {
    expr(ExprKind::Array(items))
}

pub fn spread(inner: Expr) -> Expr {
    expr(ExprKind::Spread(Box::new(inner)))
}

pub fn object(properties: Vec<Property>) -> Expr {
    expr(ExprKind::Object(properties))
}

pub fn key_value(key: &str, value: Expr) -> Property {
    Property::new(
        PropertyKind::KeyValue {
            key: PropertyKey::Named(Name::new(key)),
            value,
        },
        Span::DUMMY,
    )
}

pub fn computed(key: Expr, value: Expr) -> Property {
    Property::new(
        PropertyKind::KeyValue {
            key: PropertyKey::Computed(Box::new(key)),
            value,
        },
        Span::DUMMY,
    )
}

pub fn shorthand(name: &str) -> Property {
    Property::new(PropertyKind::Shorthand(Name::new(name)), Span::DUMMY)
}

pub fn spread_property(inner: Expr) -> Property {
    Property::new(PropertyKind::Spread(inner), Span::DUMMY)
}

pub fn method_property(key: &str, params: &[&str], body: Vec<Stmt>) -> Property {
    Property::new(
        PropertyKind::Method {
            key: PropertyKey::Named(Name::new(key)),
            kind: MethodKind::Method,
            function: Box::new(function(None, params, body)),
        },
        Span::DUMMY,
    )
}

pub fn template(parts: Vec<TemplatePart>) -> Expr {
    expr(ExprKind::Template(parts))
}

pub fn tagged_template(tag: Expr, parts: Vec<TemplatePart>) -> Expr {
    expr(ExprKind::TaggedTemplate {
        tag: Box::new(tag),
        parts,
    })
}

pub fn quasi(text: &str) -> TemplatePart {
    TemplatePart::Quasi(text.to_owned())
}

pub fn subst(inner: Expr) -> TemplatePart {
    TemplatePart::Subst(inner)
}

// Operators

pub fn unary(op: UnaryOp, operand: Expr) -> Expr {
    expr(ExprKind::Unary {
        op,
        operand: Box::new(operand),
    })
}

pub fn update(op: UpdateOp, prefix: bool, target: Expr) -> Expr {
    expr(ExprKind::Update {
        op,
        prefix,
        target: Box::new(target),
    })
}

pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Expr {
    expr(ExprKind::Binary {
        op,
        left: Box::new(left),
        right: Box::new(right),
    })
}

pub fn add(left: Expr, right: Expr) -> Expr {
    binary(BinaryOp::Add, left, right)
}

pub fn logical(op: LogicalOp, left: Expr, right: Expr) -> Expr {
    expr(ExprKind::Logical {
        op,
        left: Box::new(left),
        right: Box::new(right),
    })
}

pub fn assign(target: Expr, value: Expr) -> Expr {
    assign_op(AssignOp::Assign, target, value)
}

pub fn assign_op(op: AssignOp, target: Expr, value: Expr) -> Expr {
    expr(ExprKind::Assign {
        op,
        target: Box::new(target),
        value: Box::new(value),
    })
}

pub fn conditional(test: Expr, consequent: Expr, alternate: Expr) -> Expr {
    expr(ExprKind::Conditional {
        test: Box::new(test),
        consequent: Box::new(consequent),
        alternate: Box::new(alternate),
    })
}

pub fn sequence(items: Vec<Expr>) -> Expr {
    expr(ExprKind::Sequence(items))
}

// Access and calls

pub fn member(object: Expr, property: &str) -> Expr {
    expr(ExprKind::Member {
        object: Box::new(object),
        property: Name::new(property),
        optional: false,
    })
}

pub fn index(object: Expr, index: Expr) -> Expr {
    expr(ExprKind::Index {
        object: Box::new(object),
        index: Box::new(index),
        optional: false,
    })
}

pub fn call(callee: Expr, args: Vec<Expr>) -> Expr {
    expr(ExprKind::Call {
        callee: Box::new(callee),
        args,
        optional: false,
    })
}

pub fn new_(callee: Expr, args: Vec<Expr>) -> Expr {
    expr(ExprKind::New {
        callee: Box::new(callee),
        args,
    })
}

pub fn yield_(argument: Option<Expr>) -> Expr {
    expr(ExprKind::Yield {
        argument: argument.map(Box::new),
        delegate: false,
    })
}

pub fn await_(inner: Expr) -> Expr {
    expr(ExprKind::Await(Box::new(inner)))
}

// Functions and classes

fn params_of(names: &[&str]) -> Vec<Param> {
    names
        .iter()
        .map(|name| Param {
            name: Name::new(name),
            default: None,
            rest: false,
        })
        .collect()
}

pub fn function(name: Option<&str>, params: &[&str], body: Vec<Stmt>) -> Function {
    Function {
        span: Span::DUMMY,
        name: name.map(Name::new),
        params: params_of(params),
        body: FunctionBody::Block(body),
        is_arrow: false,
        is_async: false,
        is_generator: false,
    }
}

pub fn function_expr(params: &[&str], body: Vec<Stmt>) -> Expr {
    expr(ExprKind::Function(Box::new(function(None, params, body))))
}

pub fn arrow(params: &[&str], body: Expr) -> Expr {
    expr(ExprKind::Function(Box::new(Function {
        span: Span::DUMMY,
        name: None,
        params: params_of(params),
        body: FunctionBody::Expr(Box::new(body)),
        is_arrow: true,
        is_async: false,
        is_generator: false,
    })))
}

pub fn function_decl(name: &str, params: &[&str], body: Vec<Stmt>) -> Stmt {
    stmt(StmtKind::Function(Box::new(function(
        Some(name),
        params,
        body,
    ))))
}

pub fn class(name: Option<&str>, members: Vec<ClassMember>) -> Class {
    Class {
        span: Span::DUMMY,
        name: name.map(Name::new),
        superclass: None,
        members,
    }
}

pub fn class_expr(members: Vec<ClassMember>) -> Expr {
    expr(ExprKind::Class(Box::new(class(None, members))))
}

pub fn class_decl(name: &str, members: Vec<ClassMember>) -> Stmt {
    stmt(StmtKind::Class(Box::new(class(Some(name), members))))
}

pub fn field(key: &str, value: Option<Expr>) -> ClassMember {
    ClassMember::new(
        ClassMemberKind::Field {
            key: PropertyKey::Named(Name::new(key)),
            is_static: false,
            value,
        },
        Span::DUMMY,
    )
}

pub fn static_field(key: &str, value: Option<Expr>) -> ClassMember {
    ClassMember::new(
        ClassMemberKind::Field {
            key: PropertyKey::Named(Name::new(key)),
            is_static: true,
            value,
        },
        Span::DUMMY,
    )
}

pub fn class_method(key: &str, params: &[&str], body: Vec<Stmt>) -> ClassMember {
    ClassMember::new(
        ClassMemberKind::Method {
            key: PropertyKey::Named(Name::new(key)),
            kind: MethodKind::Method,
            is_static: false,
            function: Box::new(function(None, params, body)),
        },
        Span::DUMMY,
    )
}

pub fn static_block(body: Vec<Stmt>) -> ClassMember {
    ClassMember::new(ClassMemberKind::StaticBlock(body), Span::DUMMY)
}

// Statements

pub fn empty() -> Stmt {
    stmt(StmtKind::Empty)
}

pub fn expr_stmt(inner: Expr) -> Stmt {
    stmt(StmtKind::Expr(inner))
}

pub fn block(body: Vec<Stmt>) -> Stmt {
    stmt(StmtKind::Block(body))
}

fn declare(kind: VarKind, name: &str, init: Option<Expr>) -> Stmt {
    stmt(StmtKind::Var {
        kind,
        decls: vec![VarDecl {
            name: Name::new(name),
            init,
        }],
    })
}

pub fn var_(name: &str, init: Option<Expr>) -> Stmt {
    declare(VarKind::Var, name, init)
}

pub fn let_(name: &str, init: Option<Expr>) -> Stmt {
    declare(VarKind::Let, name, init)
}

pub fn const_(name: &str, init: Expr) -> Stmt {
    declare(VarKind::Const, name, Some(init))
}

pub fn if_(test: Expr, consequent: Stmt, alternate: Option<Stmt>) -> Stmt {
    stmt(StmtKind::If {
        test,
        consequent: Box::new(consequent),
        alternate: alternate.map(Box::new),
    })
}

pub fn while_loop(test: Expr, body: Stmt) -> Stmt {
    stmt(StmtKind::While {
        test,
        body: Box::new(body),
    })
}

pub fn do_while(body: Stmt, test: Expr) -> Stmt {
    stmt(StmtKind::DoWhile {
        body: Box::new(body),
        test,
    })
}

pub fn for_loop(
    init: Option<ForInit>,
    test: Option<Expr>,
    update: Option<Expr>,
    body: Stmt,
) -> Stmt {
    stmt(StmtKind::For {
        init,
        test,
        update,
        body: Box::new(body),
    })
}

/// `for (let name = 0; name < bound; name++) body`
pub fn counting_loop(name: &str, bound: f64, body: Stmt) -> Stmt {
    for_loop(
        Some(ForInit::Var {
            kind: VarKind::Let,
            decls: vec![VarDecl {
                name: Name::new(name),
                init: Some(num(0.0)),
            }],
        }),
        Some(binary(BinaryOp::Lt, ident(name), num(bound))),
        Some(update(UpdateOp::Increment, false, ident(name))),
        body,
    )
}

pub fn for_of(kind: VarKind, name: &str, right: Expr, body: Stmt) -> Stmt {
    stmt(StmtKind::ForOf {
        left: ForHead::Var {
            kind,
            name: Name::new(name),
        },
        right,
        body: Box::new(body),
        is_await: false,
    })
}

pub fn for_in(kind: VarKind, name: &str, right: Expr, body: Stmt) -> Stmt {
    stmt(StmtKind::ForIn {
        left: ForHead::Var {
            kind,
            name: Name::new(name),
        },
        right,
        body: Box::new(body),
    })
}

pub fn switch(discriminant: Expr, cases: Vec<SwitchCase>) -> Stmt {
    stmt(StmtKind::Switch {
        discriminant,
        cases,
    })
}

pub fn case(test: Expr, body: Vec<Stmt>) -> SwitchCase {
    SwitchCase {
        span: Span::DUMMY,
        test: Some(test),
        body,
    }
}

pub fn default_case(body: Vec<Stmt>) -> SwitchCase {
    SwitchCase {
        span: Span::DUMMY,
        test: None,
        body,
    }
}

pub fn labelled(label: &str, body: Stmt) -> Stmt {
    stmt(StmtKind::Labelled {
        label: Name::new(label),
        body: Box::new(body),
    })
}

pub fn break_(label: Option<&str>) -> Stmt {
    stmt(StmtKind::Break(label.map(Name::new)))
}

pub fn continue_(label: Option<&str>) -> Stmt {
    stmt(StmtKind::Continue(label.map(Name::new)))
}

pub fn return_(argument: Option<Expr>) -> Stmt {
    stmt(StmtKind::Return(argument))
}

pub fn throw(argument: Expr) -> Stmt {
    stmt(StmtKind::Throw(argument))
}

pub fn try_stmt(
    block: Vec<Stmt>,
    handler: Option<(Option<&str>, Vec<Stmt>)>,
    finalizer: Option<Vec<Stmt>>,
) -> Stmt {
    stmt(StmtKind::Try {
        block,
        handler: handler.map(|(param, body)| CatchClause {
            span: Span::DUMMY,
            param: param.map(Name::new),
            body,
        }),
        finalizer,
    })
}

// Programs

pub fn script(body: Vec<Stmt>) -> Program {
    Program::new(ProgramKind::Script, body, Span::DUMMY)
}

pub fn module(body: Vec<Stmt>) -> Program {
    Program::new(ProgramKind::Module, body, Span::DUMMY)
}
