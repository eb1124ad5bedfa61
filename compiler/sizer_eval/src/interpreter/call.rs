//! Closures, classes, calls and property access.

use std::cell::RefCell;
use std::rc::Rc;

use sizer_ir::{
    Class, ClassMember, ClassMemberKind, Expr, ExprKind, Function, FunctionBody, MethodKind, Name,
};

use super::{Completion, Interpreter, MAX_CALL_DEPTH};
use crate::environment::{AssignError, Environment, Mutability};
use crate::errors::{
    assignment_to_constant, not_a_function, range_error, reference_error, type_error,
    unsupported, Eval, Fault,
};
use crate::value::{
    array_index, lookup, Callable, ClassDef, Closure, Native, Object, ObjectRef, Value,
};

/// An assignable location.
pub(super) enum Reference<'a> {
    Binding(&'a Name),
    Property { base: Value<'a>, key: Rc<str> },
}

impl<'a> Interpreter<'a> {
    /// A function value closing over `env`. Non-arrow functions get a fresh
    /// `prototype` object so they can be used with `new`.
    pub(super) fn closure(function: &'a Function, env: &Environment<'a>) -> Value<'a> {
        let mut object = Object::callable(Callable::Closure(Closure {
            function,
            scope: env.clone(),
        }));
        if !function.is_arrow {
            object.set(Rc::from("prototype"), Value::object(Object::default()));
        }
        Value::object(object)
    }

    pub(super) fn class_value(
        &mut self,
        class: &'a Class,
        env: &Environment<'a>,
    ) -> Eval<'a, Value<'a>> {
        if class.superclass.is_some() {
            return Err(unsupported("class heritage"));
        }
        let mut members = Vec::new();
        collect_members(&class.members, &mut members);

        let scope = env.block();
        let constructor: ObjectRef<'a> = Rc::new(RefCell::new(Object::default()));
        let class_value = Value::Object(Rc::clone(&constructor));
        if let Some(name) = &class.name {
            scope.define(name.clone(), class_value.clone(), Mutability::Immutable);
        }

        // Methods first, then static fields and static blocks in order.
        let prototype: ObjectRef<'a> = Rc::new(RefCell::new(Object::default()));
        let mut constructor_fn = None;
        let mut fields = Vec::new();
        for &member in &members {
            match &member.kind {
                ClassMemberKind::Method {
                    key,
                    kind,
                    is_static,
                    function,
                } => {
                    if *kind != MethodKind::Method {
                        return Err(unsupported("accessor"));
                    }
                    let key = self.property_key_of(key, &scope)?;
                    if !is_static && &*key == "constructor" {
                        constructor_fn = Some(&**function);
                        continue;
                    }
                    let target = if *is_static { &constructor } else { &prototype };
                    target
                        .borrow_mut()
                        .set(key, Self::closure(function, &scope));
                }
                ClassMemberKind::Field {
                    is_static: false, ..
                } => fields.push(member),
                _ => {}
            }
        }
        {
            let mut object = constructor.borrow_mut();
            object.callable = Some(Callable::Class(ClassDef {
                constructor: constructor_fn,
                fields,
                scope: scope.clone(),
            }));
            object.set(Rc::from("prototype"), Value::Object(prototype));
        }

        for member in members {
            match &member.kind {
                ClassMemberKind::Field {
                    key,
                    is_static: true,
                    value,
                } => {
                    let body = scope.function();
                    body.bind_this(class_value.clone());
                    let key = self.property_key_of(key, &body)?;
                    let value = match value {
                        Some(value) => self.eval(value, &body)?,
                        None => Value::Undefined,
                    };
                    constructor.borrow_mut().set(key, value);
                }
                ClassMemberKind::StaticBlock(stmts) => {
                    let body = scope.function();
                    body.bind_this(class_value.clone());
                    Self::hoist(stmts, &body);
                    self.exec_stmts(stmts, &body)?;
                }
                _ => {}
            }
        }
        Ok(class_value)
    }

    /// Call `callee` with `this` bound to `this`.
    pub(super) fn call(
        &mut self,
        callee: &Value<'a>,
        this: Value<'a>,
        args: Vec<Value<'a>>,
    ) -> Eval<'a, Value<'a>> {
        let Value::Object(object) = callee else {
            return Err(not_a_function(callee));
        };
        let callable = object.borrow().callable.clone();
        match callable {
            Some(Callable::Closure(closure)) => self.call_closure(&closure, this, &args),
            Some(Callable::Class(_)) => Err(type_error(
                "class constructor cannot be invoked without 'new'",
            )),
            Some(Callable::Native(native)) => Ok(self.call_native(native, args)),
            None => Err(not_a_function(callee)),
        }
    }

    pub(super) fn call_closure(
        &mut self,
        closure: &Closure<'a>,
        this: Value<'a>,
        args: &[Value<'a>],
    ) -> Eval<'a, Value<'a>> {
        let function = closure.function;
        if function.is_async || function.is_generator {
            return Err(unsupported("async and generator functions"));
        }
        if self.depth >= MAX_CALL_DEPTH {
            return Err(range_error("maximum call stack size exceeded"));
        }

        self.depth += 1;
        let result = self.run_closure(function, &closure.scope, this, args);
        self.depth -= 1;
        result
    }

    fn run_closure(
        &mut self,
        function: &'a Function,
        captured: &Environment<'a>,
        this: Value<'a>,
        args: &[Value<'a>],
    ) -> Eval<'a, Value<'a>> {
        let scope = captured.function();
        if !function.is_arrow {
            scope.bind_this(this);
        }
        for (i, param) in function.params.iter().enumerate() {
            let value = if param.rest {
                Value::array(args.get(i..).unwrap_or_default().to_vec())
            } else {
                match (args.get(i), &param.default) {
                    (Some(arg), _) if !matches!(arg, Value::Undefined) => arg.clone(),
                    (_, Some(default)) => self.eval(default, &scope)?,
                    _ => Value::Undefined,
                }
            };
            scope.define(param.name.clone(), value, Mutability::Mutable);
        }

        match &function.body {
            FunctionBody::Block(body) => {
                Self::hoist(body, &scope);
                match self.exec_stmts(body, &scope)? {
                    Completion::Return(value) => Ok(value),
                    _ => Ok(Value::Undefined),
                }
            }
            FunctionBody::Expr(body) => self.eval(body, &scope),
        }
    }

    fn call_native(&mut self, native: Native<'a>, args: Vec<Value<'a>>) -> Value<'a> {
        match native {
            Native::Log => {
                let line: Vec<String> = args.iter().map(Value::to_display).collect();
                self.trace.push(line.join(" "));
                Value::Undefined
            }
            Native::Push(items) => {
                let mut items = items.borrow_mut();
                items.extend(args);
                Value::length(items.len())
            }
        }
    }

    /// `new callee(...args)`.
    pub(super) fn construct(
        &mut self,
        callee: &Value<'a>,
        args: &[Value<'a>],
    ) -> Eval<'a, Value<'a>> {
        let Value::Object(object) = callee else {
            return Err(type_error(&format!("{} is not a constructor", callee.inspect())));
        };
        let callable = object.borrow().callable.clone();
        let proto = match lookup(object, "prototype") {
            Some(Value::Object(proto)) => Some(proto),
            _ => None,
        };
        let instance = Value::object(Object::with_proto(proto));

        match callable {
            Some(Callable::Closure(closure)) if !closure.function.is_arrow => {
                let result = self.call_closure(&closure, instance.clone(), args)?;
                Ok(constructed(result, instance))
            }
            Some(Callable::Class(class)) => {
                self.init_fields(&class, &instance)?;
                match class.constructor {
                    Some(function) => {
                        let closure = Closure {
                            function,
                            scope: class.scope.clone(),
                        };
                        let result = self.call_closure(&closure, instance.clone(), args)?;
                        Ok(constructed(result, instance))
                    }
                    None => Ok(instance),
                }
            }
            _ => Err(type_error(&format!("{} is not a constructor", callee.inspect()))),
        }
    }

    fn init_fields(&mut self, class: &ClassDef<'a>, instance: &Value<'a>) -> Eval<'a, ()> {
        for field in &class.fields {
            if let ClassMemberKind::Field { key, value, .. } = &field.kind {
                let body = class.scope.function();
                body.bind_this(instance.clone());
                let key = self.property_key_of(key, &body)?;
                let value = match value {
                    Some(value) => self.eval(value, &body)?,
                    None => Value::Undefined,
                };
                set_member(instance, key, value)?;
            }
        }
        Ok(())
    }

    pub(super) fn reference(
        &mut self,
        target: &'a Expr,
        env: &Environment<'a>,
    ) -> Eval<'a, Reference<'a>> {
        match &target.kind {
            ExprKind::Ident(name) => Ok(Reference::Binding(name)),
            ExprKind::Member {
                object, property, ..
            } => Ok(Reference::Property {
                base: self.eval(object, env)?,
                key: Rc::from(property.as_str()),
            }),
            ExprKind::Index { object, index, .. } => {
                let base = self.eval(object, env)?;
                let key = self.eval(index, env)?.property_key();
                Ok(Reference::Property { base, key })
            }
            _ => Err(Fault::Throw(Value::string(
                "SyntaxError: invalid assignment target",
            ))),
        }
    }

    pub(super) fn get_reference(
        reference: &Reference<'a>,
        env: &Environment<'a>,
    ) -> Eval<'a, Value<'a>> {
        match reference {
            Reference::Binding(name) => env.lookup(name).ok_or_else(|| reference_error(name)),
            Reference::Property { base, key } => get_member(base, key),
        }
    }

    pub(super) fn put_reference(
        reference: &Reference<'a>,
        value: Value<'a>,
        env: &Environment<'a>,
    ) -> Eval<'a, ()> {
        match reference {
            Reference::Binding(name) => match env.assign(name, value) {
                Ok(()) => Ok(()),
                Err(AssignError::Immutable) => Err(assignment_to_constant(name)),
                Err(AssignError::Undefined) => Err(reference_error(name)),
            },
            Reference::Property { base, key } => set_member(base, Rc::clone(key), value),
        }
    }
}

fn collect_members<'a>(members: &'a [ClassMember], out: &mut Vec<&'a ClassMember>) {
    for member in members {
        match &member.kind {
            ClassMemberKind::Split(unit) => collect_members(&unit.body, out),
            _ => out.push(member),
        }
    }
}

/// A constructor's own return value wins if it is an object.
fn constructed<'a>(result: Value<'a>, instance: Value<'a>) -> Value<'a> {
    match result {
        Value::Object(_) | Value::Array(_) => result,
        _ => instance,
    }
}

/// `base[key]`.
pub(super) fn get_member<'a>(base: &Value<'a>, key: &str) -> Eval<'a, Value<'a>> {
    match base {
        Value::Undefined | Value::Null => Err(type_error(&format!(
            "cannot read properties of {} (reading '{key}')",
            base.inspect()
        ))),
        Value::Str(text) => Ok(match key {
            "length" => Value::length(text.encode_utf16().count()),
            _ => array_index(key)
                .and_then(|index| text.chars().nth(index))
                .map_or(Value::Undefined, |ch| {
                    Value::string(ch.encode_utf8(&mut [0; 4]))
                }),
        }),
        Value::Array(items) => Ok(match key {
            "length" => Value::length(items.borrow().len()),
            "push" => Value::object(Object::callable(Callable::Native(Native::Push(
                Rc::clone(items),
            )))),
            _ => array_index(key)
                .and_then(|index| items.borrow().get(index).cloned())
                .unwrap_or(Value::Undefined),
        }),
        Value::Object(object) => Ok(lookup(object, key).unwrap_or(Value::Undefined)),
        Value::Bool(_) | Value::Number(_) => Ok(Value::Undefined),
    }
}

/// `base[key] = value`.
pub(super) fn set_member<'a>(base: &Value<'a>, key: Rc<str>, value: Value<'a>) -> Eval<'a, ()> {
    match base {
        Value::Undefined | Value::Null => Err(type_error(&format!(
            "cannot set properties of {} (setting '{key}')",
            base.inspect()
        ))),
        Value::Array(items) => {
            let mut items = items.borrow_mut();
            if &*key == "length" {
                if let Some(length) = value.to_length() {
                    items.resize(length, Value::Undefined);
                }
            } else if let Some(index) = array_index(&key) {
                if index >= items.len() {
                    items.resize(index + 1, Value::Undefined);
                }
                items[index] = value;
            }
            Ok(())
        }
        Value::Object(object) => {
            object.borrow_mut().set(key, value);
            Ok(())
        }
        Value::Bool(_) | Value::Number(_) | Value::Str(_) => Ok(()),
    }
}
