//! Runtime values.
//!
//! Primitives are plain data. Arrays and objects are shared, mutable heap
//! cells compared by identity. Functions and classes are objects with a
//! [`Callable`] attached, so they can carry properties such as `prototype`
//! and static members.
//!
//! Values borrow the syntax tree for `'a`: a closure points at the
//! [`Function`] node it was created from instead of copying it.

use std::cell::RefCell;
use std::fmt;
use std::num::FpCategory;
use std::rc::Rc;

use rustc_hash::FxHashMap;
use sizer_ir::{ClassMember, Function};

use crate::environment::Environment;

pub type ArrayRef<'a> = Rc<RefCell<Vec<Value<'a>>>>;
pub type ObjectRef<'a> = Rc<RefCell<Object<'a>>>;

/// Nesting depth past which [`Value::inspect`] abbreviates.
const INSPECT_DEPTH: usize = 4;

#[derive(Clone)]
pub enum Value<'a> {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    Str(Rc<str>),
    Array(ArrayRef<'a>),
    Object(ObjectRef<'a>),
}

/// A plain object: string-keyed properties in insertion order plus a
/// prototype link.
#[derive(Default)]
pub struct Object<'a> {
    keys: Vec<Rc<str>>,
    values: FxHashMap<Rc<str>, Value<'a>>,
    pub proto: Option<ObjectRef<'a>>,
    pub callable: Option<Callable<'a>>,
}

/// What happens when an object is called or constructed.
#[derive(Clone)]
pub enum Callable<'a> {
    Closure(Closure<'a>),
    Class(ClassDef<'a>),
    Native(Native<'a>),
}

/// A function or arrow together with the scope it was created in.
#[derive(Clone)]
pub struct Closure<'a> {
    pub function: &'a Function,
    pub scope: Environment<'a>,
}

/// The constructor half of a class: its `constructor` method and the
/// instance fields initialized on every `new`.
#[derive(Clone)]
pub struct ClassDef<'a> {
    pub constructor: Option<&'a Function>,
    pub fields: Vec<&'a ClassMember>,
    pub scope: Environment<'a>,
}

/// Built-in functions.
#[derive(Clone)]
pub enum Native<'a> {
    /// The global `log(...)`: appends its arguments to the trace.
    Log,
    /// `array.push(...)` bound to its array.
    Push(ArrayRef<'a>),
}

impl<'a> Value<'a> {
    pub fn string(text: &str) -> Self {
        Value::Str(Rc::from(text))
    }

    pub fn array(items: Vec<Value<'a>>) -> Self {
        Value::Array(Rc::new(RefCell::new(items)))
    }

    pub fn object(object: Object<'a>) -> Self {
        Value::Object(Rc::new(RefCell::new(object)))
    }

    #[allow(clippy::cast_precision_loss)]
    pub fn length(len: usize) -> Self {
        Value::Number(len as f64)
    }

    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    pub fn is_callable(&self) -> bool {
        matches!(self, Value::Object(object) if object.borrow().callable.is_some())
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => !n.is_nan() && n.classify() != FpCategory::Zero,
            Value::Str(s) => !s.is_empty(),
            Value::Array(_) | Value::Object(_) => true,
        }
    }

    /// `ToNumber`.
    pub fn to_number(&self) -> f64 {
        match self {
            Value::Undefined => f64::NAN,
            Value::Null | Value::Bool(false) => 0.0,
            Value::Bool(true) => 1.0,
            Value::Number(n) => *n,
            Value::Str(s) => parse_number(s),
            Value::Array(_) | Value::Object(_) => parse_number(&self.to_js_string()),
        }
    }

    /// A valid array length, if this value is one.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::float_cmp
    )]
    pub fn to_length(&self) -> Option<usize> {
        let n = self.to_number();
        (n.is_finite() && n >= 0.0 && n.fract() == 0.0).then(|| n as usize)
    }

    /// `ToString`.
    pub fn to_js_string(&self) -> String {
        match self {
            Value::Undefined => "undefined".to_owned(),
            Value::Null => "null".to_owned(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => format_number(*n),
            Value::Str(s) => s.to_string(),
            Value::Array(items) => items
                .borrow()
                .iter()
                .map(|item| {
                    if item.is_nullish() {
                        String::new()
                    } else {
                        item.to_js_string()
                    }
                })
                .collect::<Vec<_>>()
                .join(","),
            Value::Object(object) => {
                if object.borrow().callable.is_some() {
                    "function".to_owned()
                } else {
                    "[object Object]".to_owned()
                }
            }
        }
    }

    /// Property key for a computed member or `in` test.
    pub fn property_key(&self) -> Rc<str> {
        match self {
            Value::Str(s) => Rc::clone(s),
            other => Rc::from(other.to_js_string()),
        }
    }

    /// Arrays and objects convert to their string form; primitives stay.
    pub fn to_primitive(&self) -> Value<'a> {
        match self {
            Value::Array(_) | Value::Object(_) => Value::string(&self.to_js_string()),
            other => other.clone(),
        }
    }

    pub fn type_of(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null | Value::Array(_) => "object",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::Str(_) => "string",
            Value::Object(_) if self.is_callable() => "function",
            Value::Object(_) => "object",
        }
    }

    /// `===`.
    #[allow(clippy::float_cmp)]
    pub fn strict_equals(&self, other: &Value<'a>) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => Rc::ptr_eq(a, b),
            (Value::Object(a), Value::Object(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// `==`.
    #[allow(clippy::float_cmp)]
    pub fn loose_equals(&self, other: &Value<'a>) -> bool {
        match (self, other) {
            (a, b) if a.is_nullish() || b.is_nullish() => a.is_nullish() && b.is_nullish(),
            (Value::Number(_), Value::Str(_))
            | (Value::Str(_), Value::Number(_))
            | (Value::Bool(_), _)
            | (_, Value::Bool(_)) => self.to_number() == other.to_number(),
            (Value::Array(_) | Value::Object(_), Value::Number(_) | Value::Str(_))
            | (Value::Number(_) | Value::Str(_), Value::Array(_) | Value::Object(_)) => {
                self.to_primitive().loose_equals(&other.to_primitive())
            }
            _ => self.strict_equals(other),
        }
    }

    /// How `log` prints a value: strings bare, everything else inspected.
    pub fn to_display(&self) -> String {
        match self {
            Value::Str(s) => s.to_string(),
            other => other.inspect(),
        }
    }

    /// Developer-facing rendering with nested structure.
    pub fn inspect(&self) -> String {
        let mut out = String::new();
        self.write_inspect(&mut out, 0);
        out
    }

    fn write_inspect(&self, out: &mut String, depth: usize) {
        match self {
            Value::Str(s) => {
                out.push('\'');
                out.push_str(s);
                out.push('\'');
            }
            Value::Array(_) if depth >= INSPECT_DEPTH => out.push_str("[Array]"),
            Value::Array(items) => {
                out.push('[');
                for (i, item) in items.borrow().iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    item.write_inspect(out, depth + 1);
                }
                out.push(']');
            }
            Value::Object(object) => {
                let object = object.borrow();
                match &object.callable {
                    Some(Callable::Class(_)) => out.push_str("[class]"),
                    Some(Callable::Closure(_) | Callable::Native(_)) => {
                        out.push_str("[Function]");
                    }
                    None if depth >= INSPECT_DEPTH => out.push_str("[Object]"),
                    None if object.keys.is_empty() => out.push_str("{}"),
                    None => {
                        out.push_str("{ ");
                        for (i, (key, value)) in object.entries().enumerate() {
                            if i > 0 {
                                out.push_str(", ");
                            }
                            out.push_str(key);
                            out.push_str(": ");
                            value.write_inspect(out, depth + 1);
                        }
                        out.push_str(" }");
                    }
                }
            }
            primitive => out.push_str(&primitive.to_js_string()),
        }
    }
}

impl fmt::Debug for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.inspect())
    }
}

impl<'a> Object<'a> {
    pub fn with_proto(proto: Option<ObjectRef<'a>>) -> Self {
        Object {
            proto,
            ..Object::default()
        }
    }

    pub fn callable(callable: Callable<'a>) -> Self {
        Object {
            callable: Some(callable),
            ..Object::default()
        }
    }

    pub fn get_own(&self, key: &str) -> Option<Value<'a>> {
        self.values.get(key).cloned()
    }

    /// Set an own property. A new key goes after the existing ones.
    pub fn set(&mut self, key: Rc<str>, value: Value<'a>) {
        if !self.values.contains_key(&key) {
            self.keys.push(Rc::clone(&key));
        }
        self.values.insert(key, value);
    }

    pub fn remove(&mut self, key: &str) -> bool {
        if self.values.remove(key).is_none() {
            return false;
        }
        self.keys.retain(|k| &**k != key);
        true
    }

    /// Own keys in insertion order.
    pub fn keys(&self) -> &[Rc<str>] {
        &self.keys
    }

    pub fn entries(&self) -> impl Iterator<Item = (&Rc<str>, &Value<'a>)> {
        self.keys
            .iter()
            .filter_map(|key| self.values.get(key).map(|value| (key, value)))
    }
}

/// Look `key` up on `object` and its prototype chain.
pub fn lookup<'a>(object: &ObjectRef<'a>, key: &str) -> Option<Value<'a>> {
    let mut current = Rc::clone(object);
    loop {
        let proto = {
            let borrowed = current.borrow();
            if let Some(value) = borrowed.get_own(key) {
                return Some(value);
            }
            borrowed.proto.clone()
        };
        current = proto?;
    }
}

/// Whether `proto` appears on the prototype chain of `object`.
pub fn inherits_from<'a>(object: &ObjectRef<'a>, proto: &ObjectRef<'a>) -> bool {
    let mut current = object.borrow().proto.clone();
    while let Some(next) = current {
        if Rc::ptr_eq(&next, proto) {
            return true;
        }
        current = next.borrow().proto.clone();
    }
    false
}

/// Canonical array index of a property key.
pub fn array_index(key: &str) -> Option<usize> {
    let index: usize = key.parse().ok()?;
    (index.to_string() == key).then_some(index)
}

/// Number to string the way JavaScript prints integers and plain decimals.
pub fn format_number(n: f64) -> String {
    match n.classify() {
        FpCategory::Nan => "NaN".to_owned(),
        FpCategory::Infinite if n > 0.0 => "Infinity".to_owned(),
        FpCategory::Infinite => "-Infinity".to_owned(),
        FpCategory::Zero => "0".to_owned(),
        FpCategory::Normal | FpCategory::Subnormal => n.to_string(),
    }
}

fn parse_number(text: &str) -> f64 {
    let text = text.trim();
    if text.is_empty() {
        return 0.0;
    }
    match text {
        "Infinity" | "+Infinity" => f64::INFINITY,
        "-Infinity" => f64::NEG_INFINITY,
        _ if text.bytes().all(|b| b.is_ascii_digit() || b"+-.eE".contains(&b)) => {
            text.parse().unwrap_or(f64::NAN)
        }
        _ => f64::NAN,
    }
}

/// `ToInt32`.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap
)]
pub fn to_int32(n: f64) -> i32 {
    if !n.is_finite() {
        return 0;
    }
    let wrapped = n.trunc().rem_euclid(4_294_967_296.0);
    (wrapped as u32) as i32
}

#[cfg(test)]
mod tests;
