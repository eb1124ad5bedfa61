//! Statement execution.

use std::rc::Rc;

use sizer_ir::{
    CatchClause, Expr, ForHead, ForInit, Name, Stmt, StmtKind, SwitchCase, VarDecl, VarKind,
};

use super::{Completion, Interpreter};
use crate::environment::{Environment, Mutability};
use crate::errors::{escaping_jump, not_iterable, unsupported, Eval, Fault};
use crate::value::Value;

/// What a loop does after one run of its body.
enum LoopStep<'a> {
    Next,
    Exit,
    Propagate(Completion<'a>),
}

fn loop_step<'a>(completion: Completion<'a>, labels: &[Name]) -> LoopStep<'a> {
    match completion {
        Completion::Normal | Completion::Continue(None) => LoopStep::Next,
        Completion::Break(None) => LoopStep::Exit,
        Completion::Continue(Some(label)) if labels.contains(&label) => LoopStep::Next,
        Completion::Break(Some(label)) if labels.contains(&label) => LoopStep::Exit,
        other => LoopStep::Propagate(other),
    }
}

/// Run one loop iteration's body and turn its completion into a step.
macro_rules! iterate {
    ($self:ident, $body:expr, $env:expr, $labels:expr) => {
        match loop_step($self.exec_labelled($body, $env, &[])?, $labels) {
            LoopStep::Next => {}
            LoopStep::Exit => break,
            LoopStep::Propagate(completion) => return Ok(completion),
        }
    };
}

impl<'a> Interpreter<'a> {
    /// Define the function declarations of a statement list before it runs.
    ///
    /// Statement placeholders are transparent, so declarations inside them
    /// belong to the same list.
    pub(super) fn hoist(stmts: &'a [Stmt], env: &Environment<'a>) {
        for stmt in stmts {
            match &stmt.kind {
                StmtKind::Function(function) => {
                    if let Some(name) = &function.name {
                        env.define(name.clone(), Self::closure(function, env), Mutability::Mutable);
                    }
                }
                StmtKind::Split(unit) => Self::hoist(&unit.body, env),
                _ => {}
            }
        }
    }

    pub(super) fn exec_stmts(
        &mut self,
        stmts: &'a [Stmt],
        env: &Environment<'a>,
    ) -> Eval<'a, Completion<'a>> {
        for stmt in stmts {
            match self.exec_stmt(stmt, env)? {
                Completion::Normal => {}
                abrupt => return Ok(abrupt),
            }
        }
        Ok(Completion::Normal)
    }

    /// Run a statement list in a fresh block scope.
    fn exec_block(&mut self, stmts: &'a [Stmt], env: &Environment<'a>) -> Eval<'a, Completion<'a>> {
        let scope = env.block();
        Self::hoist(stmts, &scope);
        self.exec_stmts(stmts, &scope)
    }

    pub(super) fn exec_stmt(
        &mut self,
        stmt: &'a Stmt,
        env: &Environment<'a>,
    ) -> Eval<'a, Completion<'a>> {
        self.exec_labelled(stmt, env, &[])
    }

    /// Run a statement that carries the labels in `labels`.
    fn exec_labelled(
        &mut self,
        stmt: &'a Stmt,
        env: &Environment<'a>,
        labels: &[Name],
    ) -> Eval<'a, Completion<'a>> {
        self.step()?;
        self.guarded(|this| this.exec_kind(stmt, env, labels))
    }

    fn exec_kind(
        &mut self,
        stmt: &'a Stmt,
        env: &Environment<'a>,
        labels: &[Name],
    ) -> Eval<'a, Completion<'a>> {
        match &stmt.kind {
            // Function declarations were hoisted with their list.
            StmtKind::Empty | StmtKind::Debugger | StmtKind::Function(_) => {
                Ok(Completion::Normal)
            }
            StmtKind::Expr(expr) => {
                let value = self.eval(expr, env)?;
                if self.depth == 0 {
                    self.last_value = value;
                }
                Ok(Completion::Normal)
            }
            StmtKind::Block(body) => self.exec_block(body, env),
            StmtKind::Var { kind, decls } => {
                self.declare(*kind, decls, env)?;
                Ok(Completion::Normal)
            }
            StmtKind::Class(class) => {
                let value = self.class_value(class, env)?;
                if let Some(name) = &class.name {
                    env.define(name.clone(), value, Mutability::Mutable);
                }
                Ok(Completion::Normal)
            }

            StmtKind::If {
                test,
                consequent,
                alternate,
            } => {
                if self.eval(test, env)?.is_truthy() {
                    self.exec_stmt(consequent, env)
                } else if let Some(alternate) = alternate {
                    self.exec_stmt(alternate, env)
                } else {
                    Ok(Completion::Normal)
                }
            }
            StmtKind::While { test, body } => {
                loop {
                    self.step()?;
                    if !self.eval(test, env)?.is_truthy() {
                        break;
                    }
                    iterate!(self, body, env, labels);
                }
                Ok(Completion::Normal)
            }
            StmtKind::DoWhile { body, test } => {
                loop {
                    self.step()?;
                    iterate!(self, body, env, labels);
                    if !self.eval(test, env)?.is_truthy() {
                        break;
                    }
                }
                Ok(Completion::Normal)
            }
            StmtKind::For {
                init,
                test,
                update,
                body,
            } => self.exec_for(init.as_ref(), test.as_ref(), update.as_ref(), body, env, labels),
            StmtKind::ForIn { left, right, body } => {
                let keys = self.for_in_keys(right, env)?;
                for key in keys {
                    self.step()?;
                    let scope = env.block();
                    self.bind_head(left, Value::Str(key), &scope)?;
                    iterate!(self, body, &scope, labels);
                }
                Ok(Completion::Normal)
            }
            StmtKind::ForOf {
                left,
                right,
                body,
                is_await,
            } => {
                if *is_await {
                    return Err(unsupported("for await"));
                }
                self.exec_for_of(left, right, body, env, labels)
            }
            StmtKind::Switch {
                discriminant,
                cases,
            } => self.exec_switch(discriminant, cases, env, labels),
            StmtKind::Labelled { label, body } => {
                let mut inner = labels.to_vec();
                inner.push(label.clone());
                match self.exec_labelled(body, env, &inner)? {
                    Completion::Break(Some(target)) if target == *label => Ok(Completion::Normal),
                    other => Ok(other),
                }
            }
            StmtKind::With { .. } => Err(unsupported("with")),

            StmtKind::Break(label) => Ok(Completion::Break(label.clone())),
            StmtKind::Continue(label) => Ok(Completion::Continue(label.clone())),
            StmtKind::Return(argument) => {
                let value = match argument {
                    Some(argument) => self.eval(argument, env)?,
                    None => Value::Undefined,
                };
                Ok(Completion::Return(value))
            }
            StmtKind::Throw(argument) => Err(Fault::Throw(self.eval(argument, env)?)),
            StmtKind::Try {
                block,
                handler,
                finalizer,
            } => self.exec_try(block, handler.as_ref(), finalizer.as_deref(), env),

            StmtKind::Import { .. } => Err(unsupported("import")),
            StmtKind::Export(_) | StmtKind::ExportDefault(_) => Err(unsupported("export")),

            StmtKind::Split(unit) => match self.exec_stmts(&unit.body, env)? {
                Completion::Break(label) => Err(escaping_jump("break", label.as_deref())),
                Completion::Continue(label) => Err(escaping_jump("continue", label.as_deref())),
                completion => Ok(completion),
            },
        }
    }

    pub(super) fn declare(
        &mut self,
        kind: VarKind,
        decls: &'a [VarDecl],
        env: &Environment<'a>,
    ) -> Eval<'a, ()> {
        for decl in decls {
            let value = match &decl.init {
                Some(init) => Some(self.eval(init, env)?),
                None => None,
            };
            match kind {
                VarKind::Var => env.declare_var(&decl.name, value),
                VarKind::Let => env.define(
                    decl.name.clone(),
                    value.unwrap_or(Value::Undefined),
                    Mutability::Mutable,
                ),
                VarKind::Const => env.define(
                    decl.name.clone(),
                    value.unwrap_or(Value::Undefined),
                    Mutability::Immutable,
                ),
            }
        }
        Ok(())
    }

    fn exec_for(
        &mut self,
        init: Option<&'a ForInit>,
        test: Option<&'a Expr>,
        update: Option<&'a Expr>,
        body: &'a Stmt,
        env: &Environment<'a>,
        labels: &[Name],
    ) -> Eval<'a, Completion<'a>> {
        let scope = env.block();
        match init {
            Some(ForInit::Var { kind, decls }) => self.declare(*kind, decls, &scope)?,
            Some(ForInit::Expr(expr)) => {
                self.eval(expr, &scope)?;
            }
            None => {}
        }
        loop {
            self.step()?;
            if let Some(test) = test {
                if !self.eval(test, &scope)?.is_truthy() {
                    break;
                }
            }
            iterate!(self, body, &scope, labels);
            if let Some(update) = update {
                self.eval(update, &scope)?;
            }
        }
        Ok(Completion::Normal)
    }

    fn for_in_keys(
        &mut self,
        right: &'a Expr,
        env: &Environment<'a>,
    ) -> Eval<'a, Vec<Rc<str>>> {
        let keys = match self.eval(right, env)? {
            Value::Object(object) => object.borrow().keys().to_vec(),
            Value::Array(items) => (0..items.borrow().len())
                .map(|i| Rc::from(i.to_string()))
                .collect(),
            Value::Str(text) => (0..text.chars().count())
                .map(|i| Rc::from(i.to_string()))
                .collect(),
            _ => Vec::new(),
        };
        Ok(keys)
    }

    fn exec_for_of(
        &mut self,
        left: &'a ForHead,
        right: &'a Expr,
        body: &'a Stmt,
        env: &Environment<'a>,
        labels: &[Name],
    ) -> Eval<'a, Completion<'a>> {
        match self.eval(right, env)? {
            Value::Array(items) => {
                // Arrays iterate live: the body may push.
                let mut index = 0;
                loop {
                    self.step()?;
                    let item = match items.borrow().get(index) {
                        Some(item) => item.clone(),
                        None => break,
                    };
                    index += 1;
                    let scope = env.block();
                    self.bind_head(left, item, &scope)?;
                    iterate!(self, body, &scope, labels);
                }
            }
            Value::Str(text) => {
                for ch in text.chars() {
                    self.step()?;
                    let scope = env.block();
                    self.bind_head(left, Value::string(ch.encode_utf8(&mut [0; 4])), &scope)?;
                    iterate!(self, body, &scope, labels);
                }
            }
            other => return Err(not_iterable(&other)),
        }
        Ok(Completion::Normal)
    }

    /// Bind the loop variable of a `for-in`/`for-of` head.
    fn bind_head(
        &mut self,
        head: &'a ForHead,
        value: Value<'a>,
        scope: &Environment<'a>,
    ) -> Eval<'a, ()> {
        match head {
            ForHead::Var {
                kind: VarKind::Var,
                name,
            } => scope.declare_var(name, Some(value)),
            ForHead::Var {
                kind: VarKind::Let,
                name,
            } => scope.define(name.clone(), value, Mutability::Mutable),
            ForHead::Var {
                kind: VarKind::Const,
                name,
            } => scope.define(name.clone(), value, Mutability::Immutable),
            ForHead::Target(target) => {
                let reference = self.reference(target, scope)?;
                Self::put_reference(&reference, value, scope)?;
            }
        }
        Ok(())
    }

    fn exec_switch(
        &mut self,
        discriminant: &'a Expr,
        cases: &'a [SwitchCase],
        env: &Environment<'a>,
        labels: &[Name],
    ) -> Eval<'a, Completion<'a>> {
        let value = self.eval(discriminant, env)?;
        let scope = env.block();
        for case in cases {
            Self::hoist(&case.body, &scope);
        }

        let mut start = None;
        for (i, case) in cases.iter().enumerate() {
            if let Some(test) = &case.test {
                if self.eval(test, &scope)?.strict_equals(&value) {
                    start = Some(i);
                    break;
                }
            }
        }
        let start = start.or_else(|| cases.iter().position(|case| case.test.is_none()));
        let Some(start) = start else {
            return Ok(Completion::Normal);
        };

        for case in &cases[start..] {
            match self.exec_stmts(&case.body, &scope)? {
                Completion::Normal => {}
                Completion::Break(None) => return Ok(Completion::Normal),
                Completion::Break(Some(label)) if labels.contains(&label) => {
                    return Ok(Completion::Normal);
                }
                abrupt => return Ok(abrupt),
            }
        }
        Ok(Completion::Normal)
    }

    fn exec_try(
        &mut self,
        block: &'a [Stmt],
        handler: Option<&'a CatchClause>,
        finalizer: Option<&'a [Stmt]>,
        env: &Environment<'a>,
    ) -> Eval<'a, Completion<'a>> {
        let result = match (self.exec_block(block, env), handler) {
            (Err(Fault::Throw(exception)), Some(handler)) => {
                let scope = env.block();
                if let Some(param) = &handler.param {
                    scope.define(param.clone(), exception, Mutability::Mutable);
                }
                Self::hoist(&handler.body, &scope);
                self.exec_stmts(&handler.body, &scope)
            }
            (result, _) => result,
        };
        if matches!(result, Err(Fault::Error(_))) {
            return result;
        }

        if let Some(finalizer) = finalizer {
            match self.exec_block(finalizer, env)? {
                Completion::Normal => {}
                abrupt => return Ok(abrupt),
            }
        }
        result
    }
}
