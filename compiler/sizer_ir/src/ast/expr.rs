//! Expression nodes.

use crate::{Name, NodeId, Span};

use super::items::{Class, Function, Property, SplitUnit, TemplatePart};
use super::operators::{AssignOp, BinaryOp, LogicalOp, MetaProperty, UnaryOp, UpdateOp};

/// Expression node.
#[derive(Clone, Debug, PartialEq)]
pub struct Expr {
    pub id: NodeId,
    pub span: Span,
    pub kind: ExprKind,
}

impl Expr {
    /// Create an expression with a fresh id.
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Expr {
            id: NodeId::fresh(),
            span,
            kind,
        }
    }

    /// Wrap a run of expressions in an out-of-line placeholder.
    ///
    /// In a value position the run holds exactly one expression. In list
    /// positions (array elements, sequence operands) the run's values are
    /// spliced into the enclosing list.
    pub fn split(body: Vec<Expr>, span: Span) -> Self {
        Expr::new(ExprKind::Split(SplitUnit::new(body, span)), span)
    }

    /// Check if this expression is a placeholder.
    #[inline]
    pub fn is_split(&self) -> bool {
        matches!(self.kind, ExprKind::Split(_))
    }
}

/// Expression kinds.
#[derive(Clone, Debug, PartialEq)]
pub enum ExprKind {
    // Literals
    Number(f64),
    Str(String),
    Bool(bool),
    Null,
    Undefined,
    BigInt(String),
    RegExp { pattern: String, flags: String },
    Template(Vec<TemplatePart>),
    TaggedTemplate {
        tag: Box<Expr>,
        parts: Vec<TemplatePart>,
    },

    // Names
    Ident(Name),
    This,
    Super,

    // Collections
    /// Array elision (`[a, , b]`).
    Hole,
    Array(Vec<Expr>),
    Object(Vec<Property>),
    Spread(Box<Expr>),

    // Closures
    Function(Box<Function>),
    Class(Box<Class>),

    // Operators
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Update {
        op: UpdateOp,
        prefix: bool,
        target: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Logical {
        op: LogicalOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Assign {
        op: AssignOp,
        target: Box<Expr>,
        value: Box<Expr>,
    },
    Conditional {
        test: Box<Expr>,
        consequent: Box<Expr>,
        alternate: Box<Expr>,
    },
    Sequence(Vec<Expr>),

    // Access and calls
    Member {
        object: Box<Expr>,
        property: Name,
        optional: bool,
    },
    Index {
        object: Box<Expr>,
        index: Box<Expr>,
        optional: bool,
    },
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
        optional: bool,
    },
    New {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },

    // Suspension
    Yield {
        argument: Option<Box<Expr>>,
        delegate: bool,
    },
    Await(Box<Expr>),

    // Meta
    Meta(MetaProperty),
    ImportCall(Box<Expr>),

    /// Out-of-line placeholder.
    Split(SplitUnit<Expr>),
}
