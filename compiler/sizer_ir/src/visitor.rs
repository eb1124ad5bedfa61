//! Syntax tree visitor.
//!
//! A single read-only `Visitor` trait. Default `visit_*` methods call the
//! matching `walk_*` function, which traverses children. Override a method to
//! add behavior at a node, and call the `walk_*` function to keep descending.
//!
//! Traversal stops at compiled-unit boundaries by default: nested functions,
//! class static blocks and placeholders are reported through
//! `visit_function`, `visit_static_block` and `visit_split`, whose default
//! implementations do not descend. Use `walk_function` / `walk_split` to
//! cross the boundary explicitly.
//!
//! # Example
//!
//! ```text
//! struct CountCalls(usize);
//!
//! impl<'ast> Visitor<'ast> for CountCalls {
//!     fn visit_expr(&mut self, expr: &'ast Expr) {
//!         if matches!(expr.kind, ExprKind::Call { .. }) {
//!             self.0 += 1;
//!         }
//!         walk_expr(self, expr);
//!     }
//! }
//! ```

use crate::ast::{
    Class, ClassMember, ClassMemberKind, Expr, ExprKind, ForHead, ForInit, Function, FunctionBody,
    Property, PropertyKey, PropertyKind, SplitUnit, Stmt, StmtKind, TemplatePart,
};

/// Borrowed placeholder of any list element type.
#[derive(Copy, Clone, Debug)]
pub enum SplitRef<'ast> {
    Expr(&'ast SplitUnit<Expr>),
    Stmt(&'ast SplitUnit<Stmt>),
    Property(&'ast SplitUnit<Property>),
    Member(&'ast SplitUnit<ClassMember>),
    Part(&'ast SplitUnit<TemplatePart>),
}

/// Syntax tree visitor.
pub trait Visitor<'ast> {
    fn visit_stmt(&mut self, stmt: &'ast Stmt) {
        walk_stmt(self, stmt);
    }

    fn visit_expr(&mut self, expr: &'ast Expr) {
        walk_expr(self, expr);
    }

    fn visit_property(&mut self, property: &'ast Property) {
        walk_property(self, property);
    }

    fn visit_member(&mut self, member: &'ast ClassMember) {
        walk_member(self, member);
    }

    fn visit_part(&mut self, part: &'ast TemplatePart) {
        walk_part(self, part);
    }

    /// Nested function: a separate compiled unit.
    fn visit_function(&mut self, function: &'ast Function) {
        let _ = function;
    }

    /// Class static block: a separate compiled unit.
    fn visit_static_block(&mut self, body: &'ast [Stmt]) {
        let _ = body;
    }

    /// Placeholder: terminal unless overridden.
    fn visit_split(&mut self, split: SplitRef<'ast>) {
        let _ = split;
    }
}

pub fn walk_stmts<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, stmts: &'ast [Stmt]) {
    for stmt in stmts {
        visitor.visit_stmt(stmt);
    }
}

pub fn walk_stmt<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, stmt: &'ast Stmt) {
    match &stmt.kind {
        StmtKind::Empty
        | StmtKind::Break(_)
        | StmtKind::Continue(_)
        | StmtKind::Debugger
        | StmtKind::Import { .. } => {}
        StmtKind::Expr(expr) | StmtKind::Throw(expr) | StmtKind::ExportDefault(expr) => {
            visitor.visit_expr(expr);
        }
        StmtKind::Return(argument) => {
            if let Some(argument) = argument {
                visitor.visit_expr(argument);
            }
        }
        StmtKind::Block(body) => walk_stmts(visitor, body),
        StmtKind::Var { decls, .. } => {
            for decl in decls {
                if let Some(init) = &decl.init {
                    visitor.visit_expr(init);
                }
            }
        }
        StmtKind::Function(function) => visitor.visit_function(function),
        StmtKind::Class(class) => walk_class(visitor, class),
        StmtKind::If {
            test,
            consequent,
            alternate,
        } => {
            visitor.visit_expr(test);
            visitor.visit_stmt(consequent);
            if let Some(alternate) = alternate {
                visitor.visit_stmt(alternate);
            }
        }
        StmtKind::While { test, body } | StmtKind::DoWhile { body, test } => {
            visitor.visit_expr(test);
            visitor.visit_stmt(body);
        }
        StmtKind::For {
            init,
            test,
            update,
            body,
        } => {
            match init {
                Some(ForInit::Var { decls, .. }) => {
                    for decl in decls {
                        if let Some(init) = &decl.init {
                            visitor.visit_expr(init);
                        }
                    }
                }
                Some(ForInit::Expr(expr)) => visitor.visit_expr(expr),
                None => {}
            }
            if let Some(test) = test {
                visitor.visit_expr(test);
            }
            if let Some(update) = update {
                visitor.visit_expr(update);
            }
            visitor.visit_stmt(body);
        }
        StmtKind::ForIn { left, right, body } | StmtKind::ForOf { left, right, body, .. } => {
            if let ForHead::Target(target) = left {
                visitor.visit_expr(target);
            }
            visitor.visit_expr(right);
            visitor.visit_stmt(body);
        }
        StmtKind::Switch {
            discriminant,
            cases,
        } => {
            visitor.visit_expr(discriminant);
            for case in cases {
                if let Some(test) = &case.test {
                    visitor.visit_expr(test);
                }
                walk_stmts(visitor, &case.body);
            }
        }
        StmtKind::Labelled { body, .. } => visitor.visit_stmt(body),
        StmtKind::With { object, body } => {
            visitor.visit_expr(object);
            visitor.visit_stmt(body);
        }
        StmtKind::Try {
            block,
            handler,
            finalizer,
        } => {
            walk_stmts(visitor, block);
            if let Some(handler) = handler {
                walk_stmts(visitor, &handler.body);
            }
            if let Some(finalizer) = finalizer {
                walk_stmts(visitor, finalizer);
            }
        }
        StmtKind::Export(declaration) => visitor.visit_stmt(declaration),
        StmtKind::Split(unit) => visitor.visit_split(SplitRef::Stmt(unit)),
    }
}

pub fn walk_expr<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, expr: &'ast Expr) {
    match &expr.kind {
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
        | ExprKind::Meta(_) => {}
        ExprKind::Template(parts) => {
            for part in parts {
                visitor.visit_part(part);
            }
        }
        ExprKind::TaggedTemplate { tag, parts } => {
            visitor.visit_expr(tag);
            for part in parts {
                visitor.visit_part(part);
            }
        }
        ExprKind::Array(items) | ExprKind::Sequence(items) => {
            for item in items {
                visitor.visit_expr(item);
            }
        }
        ExprKind::Object(properties) => {
            for property in properties {
                visitor.visit_property(property);
            }
        }
        ExprKind::Spread(inner)
        | ExprKind::Await(inner)
        | ExprKind::ImportCall(inner)
        | ExprKind::Unary { operand: inner, .. }
        | ExprKind::Update { target: inner, .. }
        | ExprKind::Member { object: inner, .. } => visitor.visit_expr(inner),
        ExprKind::Function(function) => visitor.visit_function(function),
        ExprKind::Class(class) => walk_class(visitor, class),
        ExprKind::Binary { left, right, .. } | ExprKind::Logical { left, right, .. } => {
            visitor.visit_expr(left);
            visitor.visit_expr(right);
        }
        ExprKind::Assign { target, value, .. } => {
            visitor.visit_expr(target);
            visitor.visit_expr(value);
        }
        ExprKind::Conditional {
            test,
            consequent,
            alternate,
        } => {
            visitor.visit_expr(test);
            visitor.visit_expr(consequent);
            visitor.visit_expr(alternate);
        }
        ExprKind::Index { object, index, .. } => {
            visitor.visit_expr(object);
            visitor.visit_expr(index);
        }
        ExprKind::Call { callee, args, .. } | ExprKind::New { callee, args } => {
            visitor.visit_expr(callee);
            for arg in args {
                visitor.visit_expr(arg);
            }
        }
        ExprKind::Yield { argument, .. } => {
            if let Some(argument) = argument {
                visitor.visit_expr(argument);
            }
        }
        ExprKind::Split(unit) => visitor.visit_split(SplitRef::Expr(unit)),
    }
}

pub fn walk_key<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, key: &'ast PropertyKey) {
    if let PropertyKey::Computed(expr) = key {
        visitor.visit_expr(expr);
    }
}

pub fn walk_property<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, property: &'ast Property) {
    match &property.kind {
        PropertyKind::KeyValue { key, value } => {
            walk_key(visitor, key);
            visitor.visit_expr(value);
        }
        PropertyKind::Shorthand(_) => {}
        PropertyKind::Method { key, function, .. } => {
            walk_key(visitor, key);
            visitor.visit_function(function);
        }
        PropertyKind::Spread(expr) => visitor.visit_expr(expr),
        PropertyKind::Split(unit) => visitor.visit_split(SplitRef::Property(unit)),
    }
}

pub fn walk_class<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, class: &'ast Class) {
    if let Some(superclass) = &class.superclass {
        visitor.visit_expr(superclass);
    }
    for member in &class.members {
        visitor.visit_member(member);
    }
}

pub fn walk_member<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, member: &'ast ClassMember) {
    match &member.kind {
        ClassMemberKind::Method { key, function, .. } => {
            walk_key(visitor, key);
            visitor.visit_function(function);
        }
        ClassMemberKind::Field { key, value, .. } => {
            walk_key(visitor, key);
            if let Some(value) = value {
                visitor.visit_expr(value);
            }
        }
        ClassMemberKind::StaticBlock(body) => visitor.visit_static_block(body),
        ClassMemberKind::Split(unit) => visitor.visit_split(SplitRef::Member(unit)),
    }
}

pub fn walk_part<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, part: &'ast TemplatePart) {
    match part {
        TemplatePart::Quasi(_) => {}
        TemplatePart::Subst(expr) => visitor.visit_expr(expr),
        TemplatePart::Split(unit) => visitor.visit_split(SplitRef::Part(unit)),
    }
}

/// Descend into a nested function's parameters and body.
pub fn walk_function<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, function: &'ast Function) {
    for param in &function.params {
        if let Some(default) = &param.default {
            visitor.visit_expr(default);
        }
    }
    match &function.body {
        FunctionBody::Block(body) => walk_stmts(visitor, body),
        FunctionBody::Expr(expr) => visitor.visit_expr(expr),
    }
}

/// Descend into a placeholder's body.
pub fn walk_split<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, split: SplitRef<'ast>) {
    match split {
        SplitRef::Expr(unit) => {
            for expr in &unit.body {
                visitor.visit_expr(expr);
            }
        }
        SplitRef::Stmt(unit) => walk_stmts(visitor, &unit.body),
        SplitRef::Property(unit) => {
            for property in &unit.body {
                visitor.visit_property(property);
            }
        }
        SplitRef::Member(unit) => {
            for member in &unit.body {
                visitor.visit_member(member);
            }
        }
        SplitRef::Part(unit) => {
            for part in &unit.body {
                visitor.visit_part(part);
            }
        }
    }
}
