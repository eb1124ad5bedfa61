//! Cost Model.
//!
//! `cost(node) = base(kind) + Σ cost(child) + per_item × count + string pieces`.
//!
//! Estimation is total over the grammar and never mutates the tree. Two
//! optional attachments change what a `SizeEstimator` does around the pure
//! computation:
//!
//! - a **hook**, called with `(id, cost)` for every `Expr` and `Stmt` whose
//!   cost is computed (post-order), used to build memo tables;
//! - a **cache** of previously computed costs, consulted before descending
//!   into an `Expr` or `Stmt`. Callers must keep it valid for every node
//!   whose subtree is unchanged.
//!
//! Placeholders are terminal and cost `SPLIT_COST`. Nested functions, class
//! methods and static blocks are separate units and cost a fixed creation
//! constant.

pub mod weights;

use rustc_hash::FxHashMap;
use sizer_ir::{
    Class, ClassMember, ClassMemberKind, Expr, ExprKind, ForHead, ForInit, Function, FunctionBody,
    NodeId, Property, PropertyKey, PropertyKind, Stmt, StmtKind, TemplatePart, VarDecl,
};
use sizer_stack::ensure_sufficient_stack;

use crate::budget::{SPLIT_COST, STRING_CHUNK};

use self::weights as w;

/// Recursive cost estimator.
#[derive(Default)]
pub struct SizeEstimator<'a> {
    hook: Option<&'a mut dyn FnMut(NodeId, u32)>,
    cache: Option<&'a FxHashMap<NodeId, u32>>,
}

impl<'a> SizeEstimator<'a> {
    /// Plain estimator.
    pub fn new() -> Self {
        SizeEstimator::default()
    }

    /// Estimator reporting every computed `Expr`/`Stmt` cost to `hook`.
    pub fn with_hook(hook: &'a mut dyn FnMut(NodeId, u32)) -> Self {
        SizeEstimator {
            hook: Some(hook),
            cache: None,
        }
    }

    /// Estimator reusing costs from `cache` for unchanged subtrees.
    pub fn with_cache(cache: &'a FxHashMap<NodeId, u32>) -> Self {
        SizeEstimator {
            hook: None,
            cache: Some(cache),
        }
    }

    fn cached(&self, id: NodeId) -> Option<u32> {
        self.cache.and_then(|cache| cache.get(&id).copied())
    }

    fn report(&mut self, id: NodeId, cost: u32) {
        if let Some(hook) = self.hook.as_mut() {
            (*hook)(id, cost);
        }
    }

    /// Cost of an expression.
    pub fn expr(&mut self, expr: &Expr) -> u32 {
        if let Some(cost) = self.cached(expr.id) {
            return cost;
        }
        self.recompute_expr(expr)
    }

    /// Cost of an expression, ignoring any cached cost of the node itself.
    ///
    /// Children still come from the cache.
    pub fn recompute_expr(&mut self, expr: &Expr) -> u32 {
        let cost = ensure_sufficient_stack(|| self.expr_kind(&expr.kind));
        self.report(expr.id, cost);
        cost
    }

    /// Cost of a statement.
    pub fn stmt(&mut self, stmt: &Stmt) -> u32 {
        if let Some(cost) = self.cached(stmt.id) {
            return cost;
        }
        self.recompute_stmt(stmt)
    }

    /// Cost of a statement, ignoring any cached cost of the node itself.
    pub fn recompute_stmt(&mut self, stmt: &Stmt) -> u32 {
        let cost = ensure_sufficient_stack(|| self.stmt_kind(&stmt.kind));
        self.report(stmt.id, cost);
        cost
    }

    /// Sum of a statement list.
    pub fn stmts(&mut self, stmts: &[Stmt]) -> u32 {
        stmts.iter().map(|stmt| self.stmt(stmt)).sum()
    }

    fn opt_expr(&mut self, expr: Option<&Expr>) -> u32 {
        expr.map_or(0, |expr| self.expr(expr))
    }

    /// Cost of an object property, excluding its slot overhead.
    pub fn property(&mut self, property: &Property) -> u32 {
        match &property.kind {
            PropertyKind::KeyValue { key, value } => self.key(key) + self.expr(value),
            PropertyKind::Shorthand(_) => w::IDENT,
            PropertyKind::Method { key, .. } => self.key(key) + w::FUNCTION,
            PropertyKind::Spread(expr) => w::SPREAD + self.expr(expr),
            PropertyKind::Split(_) => SPLIT_COST,
        }
    }

    /// Cost of a class member, excluding its slot overhead.
    pub fn member(&mut self, member: &ClassMember) -> u32 {
        match &member.kind {
            ClassMemberKind::Method { key, .. } => self.key(key) + w::FUNCTION,
            ClassMemberKind::Field { key, value, .. } => {
                w::FIELD + self.key(key) + self.opt_expr(value.as_ref())
            }
            ClassMemberKind::StaticBlock(_) => w::FUNCTION,
            ClassMemberKind::Split(_) => SPLIT_COST,
        }
    }

    /// Cost of a template segment, excluding its slot overhead.
    pub fn part(&mut self, part: &TemplatePart) -> u32 {
        match part {
            TemplatePart::Quasi(text) => string_cost(text),
            TemplatePart::Subst(expr) => self.expr(expr),
            TemplatePart::Split(_) => SPLIT_COST,
        }
    }

    /// Size of a function as its own compiled unit: parameter defaults
    /// plus body.
    pub fn function_unit(&mut self, function: &Function) -> u32 {
        let defaults: u32 = function
            .params
            .iter()
            .map(|param| self.opt_expr(param.default.as_ref()))
            .sum();
        let body = match &function.body {
            FunctionBody::Block(stmts) => self.stmts(stmts),
            FunctionBody::Expr(expr) => w::RETURN + self.expr(expr),
        };
        defaults + body
    }

    fn key(&mut self, key: &PropertyKey) -> u32 {
        match key {
            PropertyKey::Named(_) => 0,
            PropertyKey::Computed(expr) => self.expr(expr),
        }
    }

    fn class(&mut self, class: &Class) -> u32 {
        let superclass = class.superclass.as_deref().map_or(0, |expr| self.expr(expr));
        let members: u32 = class
            .members
            .iter()
            .map(|member| w::CLASS_MEMBER + self.member(member))
            .sum();
        w::CLASS + superclass + members
    }

    fn parts(&mut self, parts: &[TemplatePart]) -> u32 {
        parts
            .iter()
            .map(|part| w::TEMPLATE_PART + self.part(part))
            .sum()
    }

    fn items(&mut self, items: &[Expr], per_item: u32) -> u32 {
        items.iter().map(|item| per_item + self.expr(item)).sum()
    }

    fn expr_kind(&mut self, kind: &ExprKind) -> u32 {
        match kind {
            // Leaves
            ExprKind::Number(_) => w::NUMBER,
            ExprKind::Str(text) => string_cost(text),
            ExprKind::Bool(_)
            | ExprKind::Null
            | ExprKind::Undefined
            | ExprKind::This
            | ExprKind::Super => w::KEYWORD,
            ExprKind::BigInt(_) => w::BIGINT,
            ExprKind::RegExp { .. } => w::REGEXP,
            ExprKind::Ident(_) => w::IDENT,
            ExprKind::Hole => w::HOLE,
            ExprKind::Meta(_) => w::META,

            // Collections
            ExprKind::Template(parts) => w::TEMPLATE + self.parts(parts),
            ExprKind::TaggedTemplate { tag, parts } => {
                w::TAGGED_TEMPLATE + self.expr(tag) + self.parts(parts)
            }
            ExprKind::Array(items) => w::ARRAY + self.items(items, w::ARRAY_ITEM),
            ExprKind::Object(properties) => {
                let properties: u32 = properties
                    .iter()
                    .map(|property| w::PROPERTY + self.property(property))
                    .sum();
                w::OBJECT + properties
            }
            ExprKind::Spread(inner) => w::SPREAD + self.expr(inner),

            // Closures
            ExprKind::Function(_) => w::FUNCTION,
            ExprKind::Class(class) => self.class(class),

            // Operators
            ExprKind::Unary { operand, .. } => w::UNARY + self.expr(operand),
            ExprKind::Update { target, .. } => w::UPDATE + self.expr(target),
            ExprKind::Binary { left, right, .. } => w::BINARY + self.expr(left) + self.expr(right),
            ExprKind::Logical { left, right, .. } => {
                w::LOGICAL + self.expr(left) + self.expr(right)
            }
            ExprKind::Assign { target, value, .. } => {
                w::ASSIGN + self.expr(target) + self.expr(value)
            }
            ExprKind::Conditional {
                test,
                consequent,
                alternate,
            } => w::CONDITIONAL + self.expr(test) + self.expr(consequent) + self.expr(alternate),
            ExprKind::Sequence(items) => w::SEQUENCE + self.items(items, w::SEQUENCE_ITEM),

            // Access and calls
            ExprKind::Member {
                object, optional, ..
            } => w::MEMBER + optional_cost(*optional) + self.expr(object),
            ExprKind::Index {
                object,
                index,
                optional,
            } => w::INDEX + optional_cost(*optional) + self.expr(object) + self.expr(index),
            ExprKind::Call {
                callee,
                args,
                optional,
            } => w::CALL + optional_cost(*optional) + self.expr(callee) + self.items(args, w::ARG),
            ExprKind::New { callee, args } => w::NEW + self.expr(callee) + self.items(args, w::ARG),

            // Suspension
            ExprKind::Yield { argument, delegate } => {
                let base = if *delegate {
                    w::YIELD_DELEGATE
                } else {
                    w::YIELD
                };
                base + argument.as_deref().map_or(0, |expr| self.expr(expr))
            }
            ExprKind::Await(inner) => w::AWAIT + self.expr(inner),

            ExprKind::ImportCall(inner) => w::IMPORT_CALL + self.expr(inner),
            ExprKind::Split(_) => SPLIT_COST,
        }
    }

    fn decls(&mut self, decls: &[VarDecl]) -> u32 {
        let decls: u32 = decls
            .iter()
            .map(|decl| w::DECLARATOR + self.opt_expr(decl.init.as_ref()))
            .sum();
        w::VAR + decls
    }

    fn head(&mut self, head: &ForHead) -> u32 {
        match head {
            ForHead::Var { .. } => w::DECLARATOR,
            ForHead::Target(expr) => self.expr(expr),
        }
    }

    fn stmt_kind(&mut self, kind: &StmtKind) -> u32 {
        match kind {
            StmtKind::Empty => 0,
            StmtKind::Expr(expr) => w::EXPR_STMT + self.expr(expr),
            StmtKind::Block(body) => self.stmts(body),
            StmtKind::Var { decls, .. } => self.decls(decls),
            StmtKind::Function(_) => w::FUNCTION,
            StmtKind::Class(class) => self.class(class),

            // Control flow
            StmtKind::If {
                test,
                consequent,
                alternate,
            } => {
                w::IF
                    + self.expr(test)
                    + self.stmt(consequent)
                    + alternate.as_deref().map_or(0, |stmt| self.stmt(stmt))
            }
            StmtKind::While { test, body } => w::WHILE + self.expr(test) + self.stmt(body),
            StmtKind::DoWhile { body, test } => w::DO_WHILE + self.stmt(body) + self.expr(test),
            StmtKind::For {
                init,
                test,
                update,
                body,
            } => {
                let init = match init {
                    Some(ForInit::Var { decls, .. }) => self.decls(decls),
                    Some(ForInit::Expr(expr)) => self.expr(expr),
                    None => 0,
                };
                w::FOR
                    + init
                    + self.opt_expr(test.as_ref())
                    + self.opt_expr(update.as_ref())
                    + self.stmt(body)
            }
            StmtKind::ForIn { left, right, body } => {
                w::FOR_IN + self.head(left) + self.expr(right) + self.stmt(body)
            }
            StmtKind::ForOf {
                left,
                right,
                body,
                is_await,
            } => {
                let base = if *is_await { w::FOR_AWAIT } else { w::FOR_OF };
                base + self.head(left) + self.expr(right) + self.stmt(body)
            }
            StmtKind::Switch {
                discriminant,
                cases,
            } => {
                let cases: u32 = cases
                    .iter()
                    .map(|case| w::CASE + self.opt_expr(case.test.as_ref()) + self.stmts(&case.body))
                    .sum();
                w::SWITCH + self.expr(discriminant) + cases
            }
            StmtKind::Labelled { body, .. } => self.stmt(body),
            StmtKind::With { object, body } => w::WITH + self.expr(object) + self.stmt(body),

            // Jumps
            StmtKind::Break(_) | StmtKind::Continue(_) => w::JUMP,
            StmtKind::Return(argument) => w::RETURN + self.opt_expr(argument.as_ref()),
            StmtKind::Throw(argument) => w::THROW + self.expr(argument),
            StmtKind::Try {
                block,
                handler,
                finalizer,
            } => {
                let handler = handler
                    .as_ref()
                    .map_or(0, |handler| w::CATCH + self.stmts(&handler.body));
                let finalizer = finalizer
                    .as_deref()
                    .map_or(0, |finalizer| w::FINALLY + self.stmts(finalizer));
                w::TRY + self.stmts(block) + handler + finalizer
            }
            StmtKind::Debugger => w::DEBUGGER,

            // Modules
            StmtKind::Import { .. } => w::MODULE_ITEM,
            StmtKind::Export(declaration) => w::MODULE_ITEM + self.stmt(declaration),
            StmtKind::ExportDefault(expr) => w::MODULE_ITEM + self.expr(expr),

            StmtKind::Split(_) => SPLIT_COST,
        }
    }
}

/// Cost of a string constant, including extra loads for oversized literals.
pub fn string_cost(text: &str) -> u32 {
    if text.len() <= STRING_CHUNK {
        return w::STRING;
    }
    let pieces = u32::try_from(text.len().div_ceil(STRING_CHUNK)).unwrap_or(u32::MAX);
    w::STRING.saturating_add(w::STRING_PIECE.saturating_mul(pieces))
}

fn optional_cost(optional: bool) -> u32 {
    if optional {
        w::OPTIONAL
    } else {
        0
    }
}

/// Cost of an expression.
pub fn estimate_expr(expr: &Expr) -> u32 {
    SizeEstimator::new().expr(expr)
}

/// Cost of a statement.
pub fn estimate_stmt(stmt: &Stmt) -> u32 {
    SizeEstimator::new().stmt(stmt)
}

/// Cost of a statement list.
pub fn estimate_stmts(stmts: &[Stmt]) -> u32 {
    SizeEstimator::new().stmts(stmts)
}

/// Cost of an object property.
pub fn estimate_property(property: &Property) -> u32 {
    SizeEstimator::new().property(property)
}

/// Cost of a class member.
pub fn estimate_member(member: &ClassMember) -> u32 {
    SizeEstimator::new().member(member)
}

/// Cost of a template segment.
pub fn estimate_part(part: &TemplatePart) -> u32 {
    SizeEstimator::new().part(part)
}

/// Size of a function's own compiled unit.
pub fn estimate_function_unit(function: &Function) -> u32 {
    SizeEstimator::new().function_unit(function)
}

#[cfg(test)]
mod tests;
