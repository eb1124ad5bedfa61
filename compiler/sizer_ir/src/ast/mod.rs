//! Syntax tree.
//!
//! The grammar is a closed set of sum types: every consumer matches
//! exhaustively, so adding a node kind is a compile error until every pass
//! (in particular the cost model) handles it.
//!
//! Ownership is strictly downward. A parent owns its children through `Box`
//! and `Vec`; rewriting a child means taking it out by value and writing a
//! placeholder that owns it back into the same slot.

mod expr;
mod items;
mod operators;
mod stmt;

pub use expr::{Expr, ExprKind};
pub use items::{
    Class, ClassMember, ClassMemberKind, Function, FunctionBody, Param, Property, PropertyKey,
    PropertyKind, SplitUnit, TemplatePart,
};
pub use operators::{
    AssignOp, BinaryOp, LogicalOp, MetaProperty, MethodKind, UnaryOp, UpdateOp, VarKind,
};
pub use stmt::{
    CatchClause, ForHead, ForInit, Program, ProgramKind, Stmt, StmtKind, SwitchCase, VarDecl,
};
