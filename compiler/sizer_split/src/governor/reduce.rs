//! Node-level reduction inside one unit.
//!
//! A post-order walk over everything the unit owns, stopping at nested unit
//! boundaries. Children are reduced before their parent, so a parent's
//! strategy always sees the final cost of each child. Subtrees whose
//! memoized cost is at most `MAX_INLINE_EXPR` cannot hold anything
//! oversized and are skipped without being entered.
//!
//! The memo maps every `Expr`/`Stmt` id of the unit to its current cost.
//! It is seeded by the initial hooked estimate and refreshed on the way
//! back up for every node the walk visits. Missing entries count as
//! oversized, so a node is never skipped on stale information.

use rustc_hash::FxHashMap;
use sizer_ir::{
    Class, ClassMember, ClassMemberKind, Expr, ExprKind, ForHead, ForInit, NodeId, Property,
    PropertyKey, PropertyKind, Stmt, StmtKind, TemplatePart, VarDecl,
};
use sizer_stack::ensure_sufficient_stack;

use crate::binary::split_binary;
use crate::budget::{MAX_INLINE_EXPR, MAX_INLINE_STMT};
use crate::element::ListItem;
use crate::errors::SizeError;
use crate::estimate::{weights, SizeEstimator};
use crate::list::split_list;
use crate::stmt::split_statement;

use super::stats::SplitStats;

pub(crate) struct Reducer {
    memo: FxHashMap<NodeId, u32>,
    pub(crate) stats: SplitStats,
}

impl Reducer {
    pub(crate) fn new(memo: FxHashMap<NodeId, u32>) -> Self {
        Reducer {
            memo,
            stats: SplitStats::default(),
        }
    }

    pub(crate) fn memo(&self) -> &FxHashMap<NodeId, u32> {
        &self.memo
    }

    fn cost(&self, id: NodeId) -> u32 {
        self.memo.get(&id).copied().unwrap_or(u32::MAX)
    }

    fn opt_expr(&mut self, expr: Option<&mut Expr>) -> Result<(), SizeError> {
        match expr {
            Some(expr) => self.expr(expr),
            None => Ok(()),
        }
    }

    pub(crate) fn stmts(&mut self, stmts: &mut [Stmt]) -> Result<(), SizeError> {
        stmts.iter_mut().try_for_each(|stmt| self.stmt(stmt))
    }

    pub(crate) fn expr(&mut self, expr: &mut Expr) -> Result<(), SizeError> {
        if self.cost(expr.id) <= MAX_INLINE_EXPR {
            return Ok(());
        }
        ensure_sufficient_stack(|| self.expr_children(&mut expr.kind))?;

        if matches!(expr.kind, ExprKind::Binary { .. } | ExprKind::Logical { .. }) {
            let outcome = split_binary(expr, &mut SizeEstimator::with_cache(&self.memo));
            self.stats.record_binary(&outcome);
        } else {
            match &mut expr.kind {
                ExprKind::Array(items) => self.list(items, weights::ARRAY_ITEM),
                ExprKind::Sequence(items) => self.list(items, weights::SEQUENCE_ITEM),
                ExprKind::Object(properties) => self.list(properties, weights::PROPERTY),
                ExprKind::Template(parts) => self.list(parts, weights::TEMPLATE_PART),
                ExprKind::Class(class) => self.list(&mut class.members, weights::CLASS_MEMBER),
                _ => {}
            }
        }

        let cost = SizeEstimator::with_cache(&self.memo).recompute_expr(expr);
        self.memo.insert(expr.id, cost);
        Ok(())
    }

    fn list<T: ListItem>(&mut self, items: &mut Vec<T>, per_item: u32) {
        let outcome = split_list(items, per_item, &mut SizeEstimator::with_cache(&self.memo));
        self.stats.record_list(&outcome);
    }

    fn expr_children(&mut self, kind: &mut ExprKind) -> Result<(), SizeError> {
        match kind {
            ExprKind::Number(_)
            | ExprKind::Str(_)
            | ExprKind::Bool(_)
            | ExprKind::Null
            | ExprKind::Undefined
            | ExprKind::BigInt(_)
            | ExprKind::RegExp { .. }
            | ExprKind::Ident(_)
            | ExprKind::This
            | ExprKind::Super
            | ExprKind::Hole
            | ExprKind::Meta(_)
            | ExprKind::Function(_)
            | ExprKind::Split(_) => Ok(()),
            ExprKind::Template(parts) => parts.iter_mut().try_for_each(|part| self.part(part)),
            ExprKind::TaggedTemplate { tag, parts } => {
                self.expr(tag)?;
                parts.iter_mut().try_for_each(|part| self.part(part))
            }
            ExprKind::Array(items) | ExprKind::Sequence(items) => {
                items.iter_mut().try_for_each(|item| self.expr(item))
            }
            ExprKind::Object(properties) => properties
                .iter_mut()
                .try_for_each(|property| self.property(property)),
            ExprKind::Spread(inner)
            | ExprKind::Await(inner)
            | ExprKind::ImportCall(inner)
            | ExprKind::Unary { operand: inner, .. }
            | ExprKind::Update { target: inner, .. }
            | ExprKind::Member { object: inner, .. } => self.expr(inner),
            ExprKind::Class(class) => self.class(class),
            ExprKind::Binary { left, right, .. }
            | ExprKind::Logical { left, right, .. }
            | ExprKind::Assign {
                target: left,
                value: right,
                ..
            }
            | ExprKind::Index {
                object: left,
                index: right,
                ..
            } => {
                self.expr(left)?;
                self.expr(right)
            }
            ExprKind::Conditional {
                test,
                consequent,
                alternate,
            } => {
                self.expr(test)?;
                self.expr(consequent)?;
                self.expr(alternate)
            }
            ExprKind::Call { callee, args, .. } | ExprKind::New { callee, args } => {
                self.expr(callee)?;
                args.iter_mut().try_for_each(|arg| self.expr(arg))
            }
            ExprKind::Yield { argument, .. } => self.opt_expr(argument.as_deref_mut()),
        }
    }

    fn key(&mut self, key: &mut PropertyKey) -> Result<(), SizeError> {
        match key {
            PropertyKey::Named(_) => Ok(()),
            PropertyKey::Computed(expr) => self.expr(expr),
        }
    }

    pub(crate) fn property(&mut self, property: &mut Property) -> Result<(), SizeError> {
        match &mut property.kind {
            PropertyKind::KeyValue { key, value } => {
                self.key(key)?;
                self.expr(value)
            }
            PropertyKind::Method { key, .. } => self.key(key),
            PropertyKind::Spread(expr) => self.expr(expr),
            PropertyKind::Shorthand(_) | PropertyKind::Split(_) => Ok(()),
        }
    }

    fn class(&mut self, class: &mut Class) -> Result<(), SizeError> {
        if let Some(superclass) = &mut class.superclass {
            self.expr(superclass)?;
        }
        class
            .members
            .iter_mut()
            .try_for_each(|member| self.member(member))
    }

    pub(crate) fn member(&mut self, member: &mut ClassMember) -> Result<(), SizeError> {
        match &mut member.kind {
            ClassMemberKind::Method { key, .. } => self.key(key),
            ClassMemberKind::Field { key, value, .. } => {
                self.key(key)?;
                self.opt_expr(value.as_mut())
            }
            ClassMemberKind::StaticBlock(_) | ClassMemberKind::Split(_) => Ok(()),
        }
    }

    pub(crate) fn part(&mut self, part: &mut TemplatePart) -> Result<(), SizeError> {
        match part {
            TemplatePart::Subst(expr) => self.expr(expr),
            TemplatePart::Quasi(_) | TemplatePart::Split(_) => Ok(()),
        }
    }

    pub(crate) fn stmt(&mut self, stmt: &mut Stmt) -> Result<(), SizeError> {
        if self.cost(stmt.id) <= MAX_INLINE_EXPR {
            return Ok(());
        }
        ensure_sufficient_stack(|| self.stmt_children(&mut stmt.kind))?;

        if let StmtKind::Class(class) = &mut stmt.kind {
            self.list(&mut class.members, weights::CLASS_MEMBER);
        }

        let mut cost = SizeEstimator::with_cache(&self.memo).recompute_stmt(stmt);
        if cost > MAX_INLINE_STMT && is_compound(stmt) {
            let outcome = split_statement(stmt)?;
            self.stats.record_statement(&outcome);
            if outcome.changed() {
                // The statement splitter rewrote lists anywhere below, so
                // every cost underneath is re-estimated.
                let memo = &mut self.memo;
                let mut record = |id: NodeId, cost: u32| {
                    memo.insert(id, cost);
                };
                cost = SizeEstimator::with_hook(&mut record).recompute_stmt(stmt);
            }
        }
        self.memo.insert(stmt.id, cost);
        Ok(())
    }

    fn decls(&mut self, decls: &mut [VarDecl]) -> Result<(), SizeError> {
        decls
            .iter_mut()
            .try_for_each(|decl| self.opt_expr(decl.init.as_mut()))
    }

    fn stmt_children(&mut self, kind: &mut StmtKind) -> Result<(), SizeError> {
        match kind {
            StmtKind::Empty
            | StmtKind::Break(_)
            | StmtKind::Continue(_)
            | StmtKind::Debugger
            | StmtKind::Import { .. }
            | StmtKind::Function(_)
            | StmtKind::Split(_) => Ok(()),
            StmtKind::Expr(expr) | StmtKind::Throw(expr) | StmtKind::ExportDefault(expr) => {
                self.expr(expr)
            }
            StmtKind::Return(argument) => self.opt_expr(argument.as_mut()),
            StmtKind::Block(body) => self.stmts(body),
            StmtKind::Var { decls, .. } => self.decls(decls),
            StmtKind::Class(class) => self.class(class),
            StmtKind::If {
                test,
                consequent,
                alternate,
            } => {
                self.expr(test)?;
                self.stmt(consequent)?;
                match alternate {
                    Some(alternate) => self.stmt(alternate),
                    None => Ok(()),
                }
            }
            StmtKind::While { test, body } | StmtKind::DoWhile { body, test } => {
                self.expr(test)?;
                self.stmt(body)
            }
            StmtKind::For {
                init,
                test,
                update,
                body,
            } => {
                match init {
                    Some(ForInit::Var { decls, .. }) => self.decls(decls)?,
                    Some(ForInit::Expr(expr)) => self.expr(expr)?,
                    None => {}
                }
                self.opt_expr(test.as_mut())?;
                self.opt_expr(update.as_mut())?;
                self.stmt(body)
            }
            StmtKind::ForIn { left, right, body } | StmtKind::ForOf { left, right, body, .. } => {
                if let ForHead::Target(target) = left {
                    self.expr(target)?;
                }
                self.expr(right)?;
                self.stmt(body)
            }
            StmtKind::Switch {
                discriminant,
                cases,
            } => {
                self.expr(discriminant)?;
                for case in cases {
                    self.opt_expr(case.test.as_mut())?;
                    self.stmts(&mut case.body)?;
                }
                Ok(())
            }
            StmtKind::Labelled { body, .. } | StmtKind::Export(body) => self.stmt(body),
            StmtKind::With { object, body } => {
                self.expr(object)?;
                self.stmt(body)
            }
            StmtKind::Try {
                block,
                handler,
                finalizer,
            } => {
                self.stmts(block)?;
                if let Some(handler) = handler {
                    self.stmts(&mut handler.body)?;
                }
                match finalizer {
                    Some(finalizer) => self.stmts(finalizer),
                    None => Ok(()),
                }
            }
        }
    }
}

/// Statements that own other statements.
fn is_compound(stmt: &Stmt) -> bool {
    matches!(
        stmt.kind,
        StmtKind::Block(_)
            | StmtKind::If { .. }
            | StmtKind::While { .. }
            | StmtKind::DoWhile { .. }
            | StmtKind::For { .. }
            | StmtKind::ForIn { .. }
            | StmtKind::ForOf { .. }
            | StmtKind::Switch { .. }
            | StmtKind::Labelled { .. }
            | StmtKind::With { .. }
            | StmtKind::Try { .. }
    )
}
