//! Expression evaluation.

use std::cell::RefCell;
use std::rc::Rc;

use sizer_ir::{
    AssignOp, Expr, ExprKind, LogicalOp, MethodKind, Property, PropertyKey, PropertyKind,
    TemplatePart, UnaryOp, UpdateOp,
};

use super::call::{get_member, Reference};
use super::Interpreter;
use crate::environment::Environment;
use crate::errors::{not_iterable, reference_error, unsupported, Eval};
use crate::operators::{evaluate_binary, evaluate_unary};
use crate::value::{array_index, Object, ObjectRef, Value};

impl<'a> Interpreter<'a> {
    pub(super) fn eval(&mut self, expr: &'a Expr, env: &Environment<'a>) -> Eval<'a, Value<'a>> {
        self.guarded(|this| this.eval_kind(expr, env))
    }

    fn eval_kind(&mut self, expr: &'a Expr, env: &Environment<'a>) -> Eval<'a, Value<'a>> {
        match &expr.kind {
            ExprKind::Number(n) => Ok(Value::Number(*n)),
            ExprKind::Str(text) => Ok(Value::string(text)),
            ExprKind::Bool(b) => Ok(Value::Bool(*b)),
            ExprKind::Null => Ok(Value::Null),
            ExprKind::Undefined | ExprKind::Hole => Ok(Value::Undefined),
            ExprKind::BigInt(_) => Err(unsupported("bigint")),
            ExprKind::RegExp { .. } => Err(unsupported("regexp")),
            ExprKind::Template(parts) => {
                let mut text = String::new();
                self.template(parts, env, &mut text)?;
                Ok(Value::string(&text))
            }
            ExprKind::TaggedTemplate { tag, parts } => self.tagged_template(tag, parts, env),

            ExprKind::Ident(name) => env.lookup(name).ok_or_else(|| reference_error(name)),
            ExprKind::This => Ok(env.this()),
            ExprKind::Super => Err(unsupported("super")),

            ExprKind::Array(items) => Ok(Value::array(self.eval_list(items, env)?)),
            ExprKind::Object(properties) => {
                let object: ObjectRef<'a> = Rc::new(RefCell::new(Object::default()));
                self.define_properties(properties, &object, env)?;
                Ok(Value::Object(object))
            }
            ExprKind::Spread(_) => Err(unsupported("spread outside a list")),

            ExprKind::Function(function) => Ok(Self::closure(function, env)),
            ExprKind::Class(class) => self.class_value(class, env),

            ExprKind::Unary { op, operand } => self.unary(*op, operand, env),
            ExprKind::Update { op, prefix, target } => {
                let reference = self.reference(target, env)?;
                let old = Self::get_reference(&reference, env)?.to_number();
                let new = match op {
                    UpdateOp::Increment => old + 1.0,
                    UpdateOp::Decrement => old - 1.0,
                };
                Self::put_reference(&reference, Value::Number(new), env)?;
                Ok(Value::Number(if *prefix { new } else { old }))
            }
            ExprKind::Binary { op, left, right } => {
                let left = self.eval(left, env)?;
                let right = self.eval(right, env)?;
                evaluate_binary(*op, &left, &right)
            }
            ExprKind::Logical { op, left, right } => {
                let left = self.eval(left, env)?;
                if short_circuits(*op, &left) {
                    Ok(left)
                } else {
                    self.eval(right, env)
                }
            }
            ExprKind::Assign { op, target, value } => self.assign(*op, target, value, env),
            ExprKind::Conditional {
                test,
                consequent,
                alternate,
            } => {
                if self.eval(test, env)?.is_truthy() {
                    self.eval(consequent, env)
                } else {
                    self.eval(alternate, env)
                }
            }
            ExprKind::Sequence(items) => {
                Ok(self.eval_list(items, env)?.pop().unwrap_or(Value::Undefined))
            }

            ExprKind::Member {
                object,
                property,
                optional,
            } => {
                let base = self.eval(object, env)?;
                if *optional && base.is_nullish() {
                    return Ok(Value::Undefined);
                }
                get_member(&base, property)
            }
            ExprKind::Index {
                object,
                index,
                optional,
            } => {
                let base = self.eval(object, env)?;
                if *optional && base.is_nullish() {
                    return Ok(Value::Undefined);
                }
                let key = self.eval(index, env)?.property_key();
                get_member(&base, &key)
            }
            ExprKind::Call {
                callee,
                args,
                optional,
            } => {
                let (function, this) = self.callee(callee, env)?;
                if *optional && function.is_nullish() {
                    return Ok(Value::Undefined);
                }
                let args = self.eval_list(args, env)?;
                self.call(&function, this, args)
            }
            ExprKind::New { callee, args } => {
                let constructor = self.eval(callee, env)?;
                let args = self.eval_list(args, env)?;
                self.construct(&constructor, &args)
            }

            ExprKind::Yield { .. } => Err(unsupported("yield")),
            ExprKind::Await(_) => Err(unsupported("await")),
            ExprKind::Meta(_) => Err(unsupported("meta property")),
            ExprKind::ImportCall(_) => Err(unsupported("import")),

            // A value placeholder wraps exactly one expression.
            ExprKind::Split(unit) => {
                Ok(self.eval_list(&unit.body, env)?.pop().unwrap_or(Value::Undefined))
            }
        }
    }

    /// Evaluate a list of elements: array items, arguments or comma
    /// operands. Spreads expand and placeholders splice in place.
    pub(super) fn eval_list(
        &mut self,
        items: &'a [Expr],
        env: &Environment<'a>,
    ) -> Eval<'a, Vec<Value<'a>>> {
        let mut values = Vec::with_capacity(items.len());
        self.push_items(items, env, &mut values)?;
        Ok(values)
    }

    fn push_items(
        &mut self,
        items: &'a [Expr],
        env: &Environment<'a>,
        out: &mut Vec<Value<'a>>,
    ) -> Eval<'a, ()> {
        for item in items {
            match &item.kind {
                ExprKind::Spread(inner) => match self.eval(inner, env)? {
                    Value::Array(values) => out.extend(values.borrow().iter().cloned()),
                    Value::Str(text) => out.extend(
                        text.chars()
                            .map(|ch| Value::string(ch.encode_utf8(&mut [0; 4]))),
                    ),
                    other => return Err(not_iterable(&other)),
                },
                ExprKind::Split(unit) => self.push_items(&unit.body, env, out)?,
                _ => out.push(self.eval(item, env)?),
            }
        }
        Ok(())
    }

    /// Resolve a callee together with the `this` a call through it receives.
    fn callee(
        &mut self,
        callee: &'a Expr,
        env: &Environment<'a>,
    ) -> Eval<'a, (Value<'a>, Value<'a>)> {
        match &callee.kind {
            ExprKind::Member {
                object,
                property,
                optional,
            } => {
                let base = self.eval(object, env)?;
                if *optional && base.is_nullish() {
                    return Ok((Value::Undefined, Value::Undefined));
                }
                let function = get_member(&base, property)?;
                Ok((function, base))
            }
            ExprKind::Index {
                object,
                index,
                optional,
            } => {
                let base = self.eval(object, env)?;
                if *optional && base.is_nullish() {
                    return Ok((Value::Undefined, Value::Undefined));
                }
                let key = self.eval(index, env)?.property_key();
                let function = get_member(&base, &key)?;
                Ok((function, base))
            }
            _ => Ok((self.eval(callee, env)?, Value::Undefined)),
        }
    }

    fn template(
        &mut self,
        parts: &'a [TemplatePart],
        env: &Environment<'a>,
        out: &mut String,
    ) -> Eval<'a, ()> {
        for part in parts {
            match part {
                TemplatePart::Quasi(text) => out.push_str(text),
                TemplatePart::Subst(expr) => out.push_str(&self.eval(expr, env)?.to_js_string()),
                TemplatePart::Split(unit) => self.template(&unit.body, env, out)?,
            }
        }
        Ok(())
    }

    /// A tag receives the array of literal segments followed by the
    /// substituted values.
    fn tagged_template(
        &mut self,
        tag: &'a Expr,
        parts: &'a [TemplatePart],
        env: &Environment<'a>,
    ) -> Eval<'a, Value<'a>> {
        let (function, this) = self.callee(tag, env)?;
        let mut strings = Vec::new();
        let mut args = vec![Value::Undefined];
        self.template_args(parts, env, &mut strings, &mut args)?;
        args[0] = Value::array(strings);
        self.call(&function, this, args)
    }

    fn template_args(
        &mut self,
        parts: &'a [TemplatePart],
        env: &Environment<'a>,
        strings: &mut Vec<Value<'a>>,
        values: &mut Vec<Value<'a>>,
    ) -> Eval<'a, ()> {
        for part in parts {
            match part {
                TemplatePart::Quasi(text) => strings.push(Value::string(text)),
                TemplatePart::Subst(expr) => values.push(self.eval(expr, env)?),
                TemplatePart::Split(unit) => self.template_args(&unit.body, env, strings, values)?,
            }
        }
        Ok(())
    }

    fn define_properties(
        &mut self,
        properties: &'a [Property],
        target: &ObjectRef<'a>,
        env: &Environment<'a>,
    ) -> Eval<'a, ()> {
        for property in properties {
            match &property.kind {
                PropertyKind::KeyValue { key, value } => {
                    let key = self.property_key_of(key, env)?;
                    let value = self.eval(value, env)?;
                    target.borrow_mut().set(key, value);
                }
                PropertyKind::Shorthand(name) => {
                    let value = env.lookup(name).ok_or_else(|| reference_error(name))?;
                    target.borrow_mut().set(Rc::from(name.as_str()), value);
                }
                PropertyKind::Method {
                    key,
                    kind,
                    function,
                } => {
                    if *kind != MethodKind::Method {
                        return Err(unsupported("accessor"));
                    }
                    let key = self.property_key_of(key, env)?;
                    target.borrow_mut().set(key, Self::closure(function, env));
                }
                PropertyKind::Spread(source) => match self.eval(source, env)? {
                    Value::Object(source) => {
                        let entries: Vec<(Rc<str>, Value<'a>)> = source
                            .borrow()
                            .entries()
                            .map(|(key, value)| (Rc::clone(key), value.clone()))
                            .collect();
                        let mut target = target.borrow_mut();
                        for (key, value) in entries {
                            target.set(key, value);
                        }
                    }
                    Value::Array(items) => {
                        let items = items.borrow().clone();
                        let mut target = target.borrow_mut();
                        for (i, value) in items.into_iter().enumerate() {
                            target.set(Rc::from(i.to_string()), value);
                        }
                    }
                    _ => {}
                },
                PropertyKind::Split(unit) => self.define_properties(&unit.body, target, env)?,
            }
        }
        Ok(())
    }

    pub(super) fn property_key_of(
        &mut self,
        key: &'a PropertyKey,
        env: &Environment<'a>,
    ) -> Eval<'a, Rc<str>> {
        match key {
            PropertyKey::Named(name) => Ok(Rc::from(name.as_str())),
            PropertyKey::Computed(expr) => Ok(self.eval(expr, env)?.property_key()),
        }
    }

    fn unary(
        &mut self,
        op: UnaryOp,
        operand: &'a Expr,
        env: &Environment<'a>,
    ) -> Eval<'a, Value<'a>> {
        match (op, &operand.kind) {
            (UnaryOp::Delete, ExprKind::Member { .. } | ExprKind::Index { .. }) => {
                let Reference::Property { base, key } = self.reference(operand, env)? else {
                    return Ok(Value::Bool(true));
                };
                match &base {
                    Value::Object(object) => {
                        object.borrow_mut().remove(&key);
                    }
                    Value::Array(items) => {
                        let mut items = items.borrow_mut();
                        if let Some(slot) = array_index(&key).and_then(|i| items.get_mut(i)) {
                            *slot = Value::Undefined;
                        }
                    }
                    _ => {}
                }
                Ok(Value::Bool(true))
            }
            // `typeof` tolerates undeclared names.
            (UnaryOp::TypeOf, ExprKind::Ident(name)) => Ok(Value::string(
                env.lookup(name).map_or("undefined", |value| value.type_of()),
            )),
            _ => {
                let value = self.eval(operand, env)?;
                Ok(evaluate_unary(op, &value))
            }
        }
    }

    fn assign(
        &mut self,
        op: AssignOp,
        target: &'a Expr,
        value: &'a Expr,
        env: &Environment<'a>,
    ) -> Eval<'a, Value<'a>> {
        let reference = self.reference(target, env)?;
        let result = match op {
            AssignOp::Assign => self.eval(value, env)?,
            AssignOp::Compound(op) => {
                let old = Self::get_reference(&reference, env)?;
                let right = self.eval(value, env)?;
                evaluate_binary(op, &old, &right)?
            }
            AssignOp::Logical(op) => {
                let old = Self::get_reference(&reference, env)?;
                if short_circuits(op, &old) {
                    return Ok(old);
                }
                self.eval(value, env)?
            }
        };
        Self::put_reference(&reference, result.clone(), env)?;
        Ok(result)
    }
}

/// Whether a logical operator returns its left operand without evaluating
/// the right one.
fn short_circuits(op: LogicalOp, left: &Value<'_>) -> bool {
    match op {
        LogicalOp::And => !left.is_truthy(),
        LogicalOp::Or => left.is_truthy(),
        LogicalOp::Coalesce => !left.is_nullish(),
    }
}
