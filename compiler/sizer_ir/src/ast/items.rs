//! Functions, classes, list elements and the placeholder payload.

use crate::{Name, NodeId, Span};

use super::expr::Expr;
use super::operators::MethodKind;
use super::stmt::Stmt;

/// Payload of an out-of-line placeholder.
///
/// Owns the subtree (or sibling run) it replaced. The downstream emitter
/// compiles `body` as its own unit and invokes it from the extraction point.
#[derive(Clone, Debug, PartialEq)]
pub struct SplitUnit<T> {
    pub id: NodeId,
    pub span: Span,
    pub body: Vec<T>,
}

impl<T> SplitUnit<T> {
    pub fn new(body: Vec<T>, span: Span) -> Self {
        SplitUnit {
            id: NodeId::fresh(),
            span,
            body,
        }
    }
}

/// Function parameter.
#[derive(Clone, Debug, PartialEq)]
pub struct Param {
    pub name: Name,
    pub default: Option<Expr>,
    pub rest: bool,
}

/// Function body: a statement block, or the expression of a concise arrow.
#[derive(Clone, Debug, PartialEq)]
pub enum FunctionBody {
    Block(Vec<Stmt>),
    Expr(Box<Expr>),
}

/// Function declaration, expression, arrow or method.
#[derive(Clone, Debug, PartialEq)]
pub struct Function {
    pub span: Span,
    pub name: Option<Name>,
    pub params: Vec<Param>,
    pub body: FunctionBody,
    pub is_arrow: bool,
    pub is_async: bool,
    pub is_generator: bool,
}

/// Object property or class member key.
#[derive(Clone, Debug, PartialEq)]
pub enum PropertyKey {
    Named(Name),
    Computed(Box<Expr>),
}

/// Object literal property.
#[derive(Clone, Debug, PartialEq)]
pub struct Property {
    pub span: Span,
    pub kind: PropertyKind,
}

#[derive(Clone, Debug, PartialEq)]
pub enum PropertyKind {
    KeyValue {
        key: PropertyKey,
        value: Expr,
    },
    Shorthand(Name),
    Method {
        key: PropertyKey,
        kind: MethodKind,
        function: Box<Function>,
    },
    Spread(Expr),
    Split(SplitUnit<Property>),
}

impl Property {
    pub fn new(kind: PropertyKind, span: Span) -> Self {
        Property { span, kind }
    }

    /// Wrap a run of properties in an out-of-line placeholder.
    pub fn split(body: Vec<Property>, span: Span) -> Self {
        Property::new(PropertyKind::Split(SplitUnit::new(body, span)), span)
    }

    #[inline]
    pub fn is_split(&self) -> bool {
        matches!(self.kind, PropertyKind::Split(_))
    }
}

/// Class declaration or expression.
#[derive(Clone, Debug, PartialEq)]
pub struct Class {
    pub span: Span,
    pub name: Option<Name>,
    pub superclass: Option<Box<Expr>>,
    pub members: Vec<ClassMember>,
}

/// Class body element.
#[derive(Clone, Debug, PartialEq)]
pub struct ClassMember {
    pub span: Span,
    pub kind: ClassMemberKind,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ClassMemberKind {
    Method {
        key: PropertyKey,
        kind: MethodKind,
        is_static: bool,
        function: Box<Function>,
    },
    Field {
        key: PropertyKey,
        is_static: bool,
        value: Option<Expr>,
    },
    StaticBlock(Vec<Stmt>),
    Split(SplitUnit<ClassMember>),
}

impl ClassMember {
    pub fn new(kind: ClassMemberKind, span: Span) -> Self {
        ClassMember { span, kind }
    }

    /// Wrap a run of class members in an out-of-line placeholder.
    pub fn split(body: Vec<ClassMember>, span: Span) -> Self {
        ClassMember::new(ClassMemberKind::Split(SplitUnit::new(body, span)), span)
    }

    #[inline]
    pub fn is_split(&self) -> bool {
        matches!(self.kind, ClassMemberKind::Split(_))
    }
}

/// Segment of a template literal.
#[derive(Clone, Debug, PartialEq)]
pub enum TemplatePart {
    Quasi(String),
    Subst(Expr),
    Split(SplitUnit<TemplatePart>),
}

impl TemplatePart {
    /// Wrap a run of template segments in an out-of-line placeholder.
    pub fn split(body: Vec<TemplatePart>, span: Span) -> Self {
        TemplatePart::Split(SplitUnit::new(body, span))
    }

    #[inline]
    pub fn is_split(&self) -> bool {
        matches!(self, TemplatePart::Split(_))
    }

    /// Template parts carry no span of their own; substitutions and
    /// placeholders report theirs.
    pub fn span(&self) -> Span {
        match self {
            TemplatePart::Quasi(_) => Span::DUMMY,
            TemplatePart::Subst(expr) => expr.span,
            TemplatePart::Split(unit) => unit.span,
        }
    }
}
