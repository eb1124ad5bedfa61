//! Operator semantics on values.
//!
//! Direct enum dispatch over the closed operator sets. `in` and
//! `instanceof` can throw; everything else is total.

use sizer_ir::{BinaryOp, UnaryOp};

use crate::errors::{type_error, Eval};
use crate::value::{array_index, inherits_from, lookup, to_int32, Value};

/// Evaluate a binary operator on two evaluated operands.
pub(crate) fn evaluate_binary<'a>(
    op: BinaryOp,
    left: &Value<'a>,
    right: &Value<'a>,
) -> Eval<'a, Value<'a>> {
    let value = match op {
        BinaryOp::Add => add(left, right),
        BinaryOp::Sub => Value::Number(left.to_number() - right.to_number()),
        BinaryOp::Mul => Value::Number(left.to_number() * right.to_number()),
        BinaryOp::Div => Value::Number(left.to_number() / right.to_number()),
        BinaryOp::Mod => Value::Number(left.to_number() % right.to_number()),
        BinaryOp::Exp => Value::Number(left.to_number().powf(right.to_number())),

        BinaryOp::StrictEq => Value::Bool(left.strict_equals(right)),
        BinaryOp::StrictNotEq => Value::Bool(!left.strict_equals(right)),
        BinaryOp::LooseEq => Value::Bool(left.loose_equals(right)),
        BinaryOp::LooseNotEq => Value::Bool(!left.loose_equals(right)),
        BinaryOp::Lt => Value::Bool(compare(left, right, |o| o.is_lt())),
        BinaryOp::LtEq => Value::Bool(compare(left, right, |o| o.is_le())),
        BinaryOp::Gt => Value::Bool(compare(left, right, |o| o.is_gt())),
        BinaryOp::GtEq => Value::Bool(compare(left, right, |o| o.is_ge())),

        BinaryOp::BitAnd => int32(left, right, |a, b| a & b),
        BinaryOp::BitOr => int32(left, right, |a, b| a | b),
        BinaryOp::BitXor => int32(left, right, |a, b| a ^ b),
        BinaryOp::Shl => int32(left, right, |a, b| a.wrapping_shl(shift(b))),
        BinaryOp::Shr => int32(left, right, |a, b| a.wrapping_shr(shift(b))),
        BinaryOp::UShr => {
            let a = u32::from_ne_bytes(to_int32(left.to_number()).to_ne_bytes());
            let b = to_int32(right.to_number());
            Value::Number(f64::from(a.wrapping_shr(shift(b))))
        }

        BinaryOp::In => Value::Bool(has_property(left, right)?),
        BinaryOp::InstanceOf => Value::Bool(instance_of(left, right)?),
    };
    Ok(value)
}

/// Evaluate a unary operator other than `delete`.
pub(crate) fn evaluate_unary<'a>(op: UnaryOp, operand: &Value<'a>) -> Value<'a> {
    match op {
        UnaryOp::Neg => Value::Number(-operand.to_number()),
        UnaryOp::Plus => Value::Number(operand.to_number()),
        UnaryOp::Not => Value::Bool(!operand.is_truthy()),
        UnaryOp::BitNot => Value::Number(f64::from(!to_int32(operand.to_number()))),
        UnaryOp::TypeOf => Value::string(operand.type_of()),
        UnaryOp::Void => Value::Undefined,
        UnaryOp::Delete => Value::Bool(true),
    }
}

fn add<'a>(left: &Value<'a>, right: &Value<'a>) -> Value<'a> {
    let left = left.to_primitive();
    let right = right.to_primitive();
    if matches!(left, Value::Str(_)) || matches!(right, Value::Str(_)) {
        let mut text = left.to_js_string();
        text.push_str(&right.to_js_string());
        Value::string(&text)
    } else {
        Value::Number(left.to_number() + right.to_number())
    }
}

/// Relational comparison. Two strings compare by content; anything else
/// compares as numbers, and a `NaN` on either side makes every test false.
fn compare(left: &Value<'_>, right: &Value<'_>, test: fn(std::cmp::Ordering) -> bool) -> bool {
    let left = left.to_primitive();
    let right = right.to_primitive();
    let ordering = match (&left, &right) {
        (Value::Str(a), Value::Str(b)) => Some(a.cmp(b)),
        _ => left.to_number().partial_cmp(&right.to_number()),
    };
    ordering.is_some_and(test)
}

fn int32<'a>(left: &Value<'a>, right: &Value<'a>, op: fn(i32, i32) -> i32) -> Value<'a> {
    let result = op(to_int32(left.to_number()), to_int32(right.to_number()));
    Value::Number(f64::from(result))
}

/// Shift counts use the low five bits of the right operand.
fn shift(count: i32) -> u32 {
    u32::from_ne_bytes(count.to_ne_bytes()) & 31
}

fn has_property<'a>(key: &Value<'a>, target: &Value<'a>) -> Eval<'a, bool> {
    let key = key.property_key();
    match target {
        Value::Object(object) => Ok(lookup(object, &key).is_some()),
        Value::Array(items) => Ok(&*key == "length"
            || array_index(&key).is_some_and(|index| index < items.borrow().len())),
        other => Err(type_error(&format!(
            "cannot use 'in' to search for '{key}' in {}",
            other.inspect()
        ))),
    }
}

fn instance_of<'a>(value: &Value<'a>, constructor: &Value<'a>) -> Eval<'a, bool> {
    let Value::Object(constructor_object) = constructor else {
        return Err(type_error("right-hand side of 'instanceof' is not callable"));
    };
    if !constructor.is_callable() {
        return Err(type_error("right-hand side of 'instanceof' is not callable"));
    }
    let (Value::Object(object), Some(Value::Object(proto))) =
        (value, lookup(constructor_object, "prototype"))
    else {
        return Ok(false);
    };
    Ok(inherits_from(object, &proto))
}
