//! Statement nodes and top-level programs.

use crate::{Name, NodeId, Span};

use super::expr::Expr;
use super::items::{Class, Function, SplitUnit};
use super::operators::VarKind;

/// Statement node.
#[derive(Clone, Debug, PartialEq)]
pub struct Stmt {
    pub id: NodeId,
    pub span: Span,
    pub kind: StmtKind,
}

impl Stmt {
    /// Create a statement with a fresh id.
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Stmt {
            id: NodeId::fresh(),
            span,
            kind,
        }
    }

    /// Wrap a run of statements in an out-of-line placeholder.
    pub fn split(body: Vec<Stmt>, span: Span) -> Self {
        Stmt::new(StmtKind::Split(SplitUnit::new(body, span)), span)
    }

    #[inline]
    pub fn is_split(&self) -> bool {
        matches!(self.kind, StmtKind::Split(_))
    }

    /// Loops are the only `continue` targets.
    pub fn is_loop(&self) -> bool {
        matches!(
            self.kind,
            StmtKind::While { .. }
                | StmtKind::DoWhile { .. }
                | StmtKind::For { .. }
                | StmtKind::ForIn { .. }
                | StmtKind::ForOf { .. }
        )
    }

    /// Loops and switches are unlabelled `break` targets.
    pub fn is_breakable(&self) -> bool {
        self.is_loop() || matches!(self.kind, StmtKind::Switch { .. })
    }
}

/// One `name = init` declarator.
#[derive(Clone, Debug, PartialEq)]
pub struct VarDecl {
    pub name: Name,
    pub init: Option<Expr>,
}

/// Initializer slot of a classic `for` loop.
#[derive(Clone, Debug, PartialEq)]
pub enum ForInit {
    Var { kind: VarKind, decls: Vec<VarDecl> },
    Expr(Expr),
}

/// Left-hand side of `for-in` / `for-of`.
#[derive(Clone, Debug, PartialEq)]
pub enum ForHead {
    Var { kind: VarKind, name: Name },
    Target(Expr),
}

/// `case test:` or `default:` clause.
#[derive(Clone, Debug, PartialEq)]
pub struct SwitchCase {
    pub span: Span,
    pub test: Option<Expr>,
    pub body: Vec<Stmt>,
}

/// `catch (param) { body }`.
#[derive(Clone, Debug, PartialEq)]
pub struct CatchClause {
    pub span: Span,
    pub param: Option<Name>,
    pub body: Vec<Stmt>,
}

/// Statement kinds.
#[derive(Clone, Debug, PartialEq)]
pub enum StmtKind {
    Empty,
    Expr(Expr),
    Block(Vec<Stmt>),
    Var {
        kind: VarKind,
        decls: Vec<VarDecl>,
    },
    Function(Box<Function>),
    Class(Box<Class>),

    // Control flow
    If {
        test: Expr,
        consequent: Box<Stmt>,
        alternate: Option<Box<Stmt>>,
    },
    While {
        test: Expr,
        body: Box<Stmt>,
    },
    DoWhile {
        body: Box<Stmt>,
        test: Expr,
    },
    For {
        init: Option<ForInit>,
        test: Option<Expr>,
        update: Option<Expr>,
        body: Box<Stmt>,
    },
    ForIn {
        left: ForHead,
        right: Expr,
        body: Box<Stmt>,
    },
    ForOf {
        left: ForHead,
        right: Expr,
        body: Box<Stmt>,
        is_await: bool,
    },
    Switch {
        discriminant: Expr,
        cases: Vec<SwitchCase>,
    },
    Labelled {
        label: Name,
        body: Box<Stmt>,
    },
    With {
        object: Expr,
        body: Box<Stmt>,
    },

    // Jumps
    Break(Option<Name>),
    Continue(Option<Name>),
    Return(Option<Expr>),
    Throw(Expr),
    Try {
        block: Vec<Stmt>,
        handler: Option<CatchClause>,
        finalizer: Option<Vec<Stmt>>,
    },
    Debugger,

    // Modules
    Import {
        source: String,
        specifiers: Vec<Name>,
    },
    Export(Box<Stmt>),
    ExportDefault(Expr),

    /// Out-of-line placeholder.
    Split(SplitUnit<Stmt>),
}

/// Script or module.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ProgramKind {
    Script,
    Module,
}

/// Top-level compilation input.
#[derive(Clone, Debug, PartialEq)]
pub struct Program {
    pub span: Span,
    pub kind: ProgramKind,
    pub body: Vec<Stmt>,
}

impl Program {
    pub fn new(kind: ProgramKind, body: Vec<Stmt>, span: Span) -> Self {
        Program { span, kind, body }
    }
}
