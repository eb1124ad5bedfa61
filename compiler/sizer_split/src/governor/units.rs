//! Compiled units.
//!
//! A unit is the part of the tree that compiles to one piece of code: a
//! script or module body, a function, a class static block, or the payload
//! of a placeholder. Units borrow disjoint subtrees of the input, so sibling
//! units can be governed on different threads.

use std::fmt;

use sizer_ir::{
    Class, ClassMember, ClassMemberKind, Expr, ExprKind, ForHead, ForInit, Function, FunctionBody,
    ProgramKind, Property, PropertyKey, PropertyKind, Span, SplitUnit, Stmt, StmtKind,
    TemplatePart,
};
use sizer_ir::visitor::SplitRef;
use sizer_stack::ensure_sufficient_stack;

use crate::errors::SizeError;
use crate::estimate::{weights, SizeEstimator};

use super::reduce::Reducer;

/// What kind of code a unit compiles to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum UnitKind {
    Script,
    Module,
    Function,
    Arrow,
    StaticBlock,
    /// Payload of a placeholder.
    Split,
}

impl UnitKind {
    pub fn as_str(self) -> &'static str {
        match self {
            UnitKind::Script => "script",
            UnitKind::Module => "module",
            UnitKind::Function => "function",
            UnitKind::Arrow => "arrow function",
            UnitKind::StaticBlock => "class static block",
            UnitKind::Split => "extracted unit",
        }
    }
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Estimated size of a placeholder payload compiled as its own unit.
///
/// A list payload pays the slot overhead of the list it was cut from for
/// every element it materializes.
pub(crate) fn payload_size(split: SplitRef<'_>, estimator: &mut SizeEstimator<'_>) -> u32 {
    match split {
        SplitRef::Stmt(unit) => estimator.stmts(&unit.body),
        SplitRef::Expr(unit) => unit
            .body
            .iter()
            .map(|expr| weights::ARRAY_ITEM + estimator.expr(expr))
            .sum(),
        SplitRef::Property(unit) => unit
            .body
            .iter()
            .map(|property| weights::PROPERTY + estimator.property(property))
            .sum(),
        SplitRef::Member(unit) => unit
            .body
            .iter()
            .map(|member| weights::CLASS_MEMBER + estimator.member(member))
            .sum(),
        SplitRef::Part(unit) => unit
            .body
            .iter()
            .map(|part| weights::TEMPLATE_PART + estimator.part(part))
            .sum(),
    }
}

/// A unit borrowed out of the tree being governed.
pub(crate) enum Unit<'a> {
    Program {
        kind: ProgramKind,
        span: Span,
        body: &'a mut Vec<Stmt>,
    },
    Function(&'a mut Function),
    StaticBlock {
        span: Span,
        body: &'a mut Vec<Stmt>,
    },
    Exprs(&'a mut SplitUnit<Expr>),
    Stmts(&'a mut SplitUnit<Stmt>),
    Properties(&'a mut SplitUnit<Property>),
    Members(&'a mut SplitUnit<ClassMember>),
    Parts(&'a mut SplitUnit<TemplatePart>),
}

impl<'a> Unit<'a> {
    pub(crate) fn kind(&self) -> UnitKind {
        match self {
            Unit::Program {
                kind: ProgramKind::Script,
                ..
            } => UnitKind::Script,
            Unit::Program {
                kind: ProgramKind::Module,
                ..
            } => UnitKind::Module,
            Unit::Function(function) if function.is_arrow => UnitKind::Arrow,
            Unit::Function(_) => UnitKind::Function,
            Unit::StaticBlock { .. } => UnitKind::StaticBlock,
            Unit::Exprs(_)
            | Unit::Stmts(_)
            | Unit::Properties(_)
            | Unit::Members(_)
            | Unit::Parts(_) => UnitKind::Split,
        }
    }

    pub(crate) fn span(&self) -> Span {
        match self {
            Unit::Program { span, .. } | Unit::StaticBlock { span, .. } => *span,
            Unit::Function(function) => function.span,
            Unit::Exprs(unit) => unit.span,
            Unit::Stmts(unit) => unit.span,
            Unit::Properties(unit) => unit.span,
            Unit::Members(unit) => unit.span,
            Unit::Parts(unit) => unit.span,
        }
    }

    /// Estimated size of the unit's own code.
    pub(crate) fn size(&self, estimator: &mut SizeEstimator<'_>) -> u32 {
        match self {
            Unit::Program { body, .. } | Unit::StaticBlock { body, .. } => estimator.stmts(body),
            Unit::Function(function) => estimator.function_unit(function),
            Unit::Exprs(unit) => payload_size(SplitRef::Expr(unit), estimator),
            Unit::Stmts(unit) => payload_size(SplitRef::Stmt(unit), estimator),
            Unit::Properties(unit) => payload_size(SplitRef::Property(unit), estimator),
            Unit::Members(unit) => payload_size(SplitRef::Member(unit), estimator),
            Unit::Parts(unit) => payload_size(SplitRef::Part(unit), estimator),
        }
    }

    /// Run the node-level strategies over everything the unit owns.
    pub(crate) fn reduce(&mut self, reducer: &mut Reducer) -> Result<(), SizeError> {
        match self {
            Unit::Program { body, .. } | Unit::StaticBlock { body, .. } => reducer.stmts(body),
            Unit::Function(function) => {
                for param in &mut function.params {
                    if let Some(default) = &mut param.default {
                        reducer.expr(default)?;
                    }
                }
                match &mut function.body {
                    FunctionBody::Block(body) => reducer.stmts(body),
                    FunctionBody::Expr(expr) => reducer.expr(expr),
                }
            }
            Unit::Stmts(unit) => reducer.stmts(&mut unit.body),
            Unit::Exprs(unit) => unit.body.iter_mut().try_for_each(|expr| reducer.expr(expr)),
            Unit::Properties(unit) => unit
                .body
                .iter_mut()
                .try_for_each(|property| reducer.property(property)),
            Unit::Members(unit) => unit
                .body
                .iter_mut()
                .try_for_each(|member| reducer.member(member)),
            Unit::Parts(unit) => unit.body.iter_mut().try_for_each(|part| reducer.part(part)),
        }
    }

    /// The statement list the top-level splitter may chunk, if any.
    pub(crate) fn statements(&mut self) -> Option<&mut Vec<Stmt>> {
        match self {
            Unit::Program { body, .. } | Unit::StaticBlock { body, .. } => Some(&mut **body),
            Unit::Function(function) => match &mut function.body {
                FunctionBody::Block(body) => Some(body),
                FunctionBody::Expr(_) => None,
            },
            Unit::Stmts(unit) => Some(&mut unit.body),
            Unit::Exprs(_) | Unit::Properties(_) | Unit::Members(_) | Unit::Parts(_) => None,
        }
    }

    /// Give up the unit and hand out the units nested directly inside it.
    pub(crate) fn into_nested(self) -> Vec<Unit<'a>> {
        let mut collector = Collector { units: Vec::new() };
        match self {
            Unit::Program { body, .. } | Unit::StaticBlock { body, .. } => collector.stmts(body),
            Unit::Function(function) => collector.function(function),
            Unit::Stmts(unit) => collector.stmts(&mut unit.body),
            Unit::Exprs(unit) => {
                for expr in &mut unit.body {
                    collector.expr(expr);
                }
            }
            Unit::Properties(unit) => {
                for property in &mut unit.body {
                    collector.property(property);
                }
            }
            Unit::Members(unit) => {
                for member in &mut unit.body {
                    collector.member(member);
                }
            }
            Unit::Parts(unit) => {
                for part in &mut unit.body {
                    collector.part(part);
                }
            }
        }
        collector.units
    }
}

/// Finds unit boundaries directly below a unit.
struct Collector<'a> {
    units: Vec<Unit<'a>>,
}

impl<'a> Collector<'a> {
    fn function(&mut self, function: &'a mut Function) {
        for param in &mut function.params {
            if let Some(default) = &mut param.default {
                self.expr(default);
            }
        }
        match &mut function.body {
            FunctionBody::Block(body) => self.stmts(body),
            FunctionBody::Expr(expr) => self.expr(expr),
        }
    }

    fn stmts(&mut self, stmts: &'a mut [Stmt]) {
        for stmt in stmts {
            self.stmt(stmt);
        }
    }

    fn opt_expr(&mut self, expr: Option<&'a mut Expr>) {
        if let Some(expr) = expr {
            self.expr(expr);
        }
    }

    fn stmt(&mut self, stmt: &'a mut Stmt) {
        let kind: &'a mut StmtKind = &mut stmt.kind;
        ensure_sufficient_stack(move || self.stmt_kind(kind));
    }

    fn stmt_kind(&mut self, kind: &'a mut StmtKind) {
        match kind {
            StmtKind::Empty
            | StmtKind::Break(_)
            | StmtKind::Continue(_)
            | StmtKind::Debugger
            | StmtKind::Import { .. } => {}
            StmtKind::Expr(expr) | StmtKind::Throw(expr) | StmtKind::ExportDefault(expr) => {
                self.expr(expr);
            }
            StmtKind::Return(argument) => self.opt_expr(argument.as_mut()),
            StmtKind::Block(body) => self.stmts(body),
            StmtKind::Var { decls, .. } => {
                for decl in decls {
                    self.opt_expr(decl.init.as_mut());
                }
            }
            StmtKind::Function(function) => self.units.push(Unit::Function(function)),
            StmtKind::Class(class) => self.class(class),
            StmtKind::If {
                test,
                consequent,
                alternate,
            } => {
                self.expr(test);
                self.stmt(consequent);
                if let Some(alternate) = alternate {
                    self.stmt(alternate);
                }
            }
            StmtKind::While { test, body } | StmtKind::DoWhile { body, test } => {
                self.expr(test);
                self.stmt(body);
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
                            self.opt_expr(decl.init.as_mut());
                        }
                    }
                    Some(ForInit::Expr(expr)) => self.expr(expr),
                    None => {}
                }
                self.opt_expr(test.as_mut());
                self.opt_expr(update.as_mut());
                self.stmt(body);
            }
            StmtKind::ForIn { left, right, body } | StmtKind::ForOf { left, right, body, .. } => {
                if let ForHead::Target(target) = left {
                    self.expr(target);
                }
                self.expr(right);
                self.stmt(body);
            }
            StmtKind::Switch {
                discriminant,
                cases,
            } => {
                self.expr(discriminant);
                for case in cases {
                    self.opt_expr(case.test.as_mut());
                    self.stmts(&mut case.body);
                }
            }
            StmtKind::Labelled { body, .. } | StmtKind::Export(body) => self.stmt(body),
            StmtKind::With { object, body } => {
                self.expr(object);
                self.stmt(body);
            }
            StmtKind::Try {
                block,
                handler,
                finalizer,
            } => {
                self.stmts(block);
                if let Some(handler) = handler {
                    self.stmts(&mut handler.body);
                }
                if let Some(finalizer) = finalizer {
                    self.stmts(finalizer);
                }
            }
            StmtKind::Split(unit) => self.units.push(Unit::Stmts(unit)),
        }
    }

    fn expr(&mut self, expr: &'a mut Expr) {
        let kind: &'a mut ExprKind = &mut expr.kind;
        ensure_sufficient_stack(move || self.expr_kind(kind));
    }

    fn expr_kind(&mut self, kind: &'a mut ExprKind) {
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
            | ExprKind::Meta(_) => {}
            ExprKind::Template(parts) => {
                for part in parts {
                    self.part(part);
                }
            }
            ExprKind::TaggedTemplate { tag, parts } => {
                self.expr(tag);
                for part in parts {
                    self.part(part);
                }
            }
            ExprKind::Array(items) | ExprKind::Sequence(items) => {
                for item in items {
                    self.expr(item);
                }
            }
            ExprKind::Object(properties) => {
                for property in properties {
                    self.property(property);
                }
            }
            ExprKind::Spread(inner)
            | ExprKind::Await(inner)
            | ExprKind::ImportCall(inner)
            | ExprKind::Unary { operand: inner, .. }
            | ExprKind::Update { target: inner, .. }
            | ExprKind::Member { object: inner, .. } => self.expr(inner),
            ExprKind::Function(function) => self.units.push(Unit::Function(function)),
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
                self.expr(left);
                self.expr(right);
            }
            ExprKind::Conditional {
                test,
                consequent,
                alternate,
            } => {
                self.expr(test);
                self.expr(consequent);
                self.expr(alternate);
            }
            ExprKind::Call { callee, args, .. } | ExprKind::New { callee, args } => {
                self.expr(callee);
                for arg in args {
                    self.expr(arg);
                }
            }
            ExprKind::Yield { argument, .. } => {
                if let Some(argument) = argument {
                    self.expr(argument);
                }
            }
            ExprKind::Split(unit) => self.units.push(Unit::Exprs(unit)),
        }
    }

    fn key(&mut self, key: &'a mut PropertyKey) {
        if let PropertyKey::Computed(expr) = key {
            self.expr(expr);
        }
    }

    fn property(&mut self, property: &'a mut Property) {
        match &mut property.kind {
            PropertyKind::KeyValue { key, value } => {
                self.key(key);
                self.expr(value);
            }
            PropertyKind::Shorthand(_) => {}
            PropertyKind::Method { key, function, .. } => {
                self.key(key);
                self.units.push(Unit::Function(function));
            }
            PropertyKind::Spread(expr) => self.expr(expr),
            PropertyKind::Split(unit) => self.units.push(Unit::Properties(unit)),
        }
    }

    fn class(&mut self, class: &'a mut Class) {
        if let Some(superclass) = &mut class.superclass {
            self.expr(superclass);
        }
        for member in &mut class.members {
            self.member(member);
        }
    }

    fn member(&mut self, member: &'a mut ClassMember) {
        let span = member.span;
        match &mut member.kind {
            ClassMemberKind::Method { key, function, .. } => {
                self.key(key);
                self.units.push(Unit::Function(function));
            }
            ClassMemberKind::Field { key, value, .. } => {
                self.key(key);
                self.opt_expr(value.as_mut());
            }
            ClassMemberKind::StaticBlock(body) => {
                self.units.push(Unit::StaticBlock { span, body });
            }
            ClassMemberKind::Split(unit) => self.units.push(Unit::Members(unit)),
        }
    }

    fn part(&mut self, part: &'a mut TemplatePart) {
        match part {
            TemplatePart::Quasi(_) => {}
            TemplatePart::Subst(expr) => self.expr(expr),
            TemplatePart::Split(unit) => self.units.push(Unit::Parts(unit)),
        }
    }
}
