//! Sizer IR - Syntax Tree Types
//!
//! This crate contains the tree the code-size governor measures and rewrites:
//! - Spans for source locations
//! - Node ids for memoized per-node costs
//! - Names for identifiers and labels
//! - AST nodes (Expr, Stmt, Function, Class, ...) and out-of-line placeholders
//! - A read-only visitor and terse tree builders
//!
//! # Design Philosophy
//!
//! - **Closed grammar**: every node kind is a variant of a sum type, so every
//!   pass matches exhaustively.
//! - **Downward ownership**: parents own children through `Box` and `Vec`.
//!   Rewrites move a child out by value and move a placeholder back in.
//! - **Thread-safe**: every tree type is `Send + Sync`, so disjoint subtrees
//!   can be governed on worker threads.

/// Compile-time assertion that a type has a specific size.
///
/// Used to prevent accidental size regressions in frequently-allocated types.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

pub mod ast;
pub mod build;
mod name;
mod node_id;
mod span;
mod suspension;
pub mod visitor;

pub use ast::{
    AssignOp, BinaryOp, CatchClause, Class, ClassMember, ClassMemberKind, Expr, ExprKind, ForHead,
    ForInit, Function, FunctionBody, LogicalOp, MetaProperty, MethodKind, Param, Program,
    ProgramKind, Property, PropertyKey, PropertyKind, SplitUnit, Stmt, StmtKind, SwitchCase,
    TemplatePart, UnaryOp, UpdateOp, VarDecl, VarKind,
};
pub use name::Name;
pub use node_id::NodeId;
pub use span::Span;
pub use suspension::{expr_suspends, stmt_suspends};

static_assert_size!(NodeId, 4);
static_assert_size!(Span, 8);
