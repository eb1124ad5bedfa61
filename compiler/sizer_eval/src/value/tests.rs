use std::cell::RefCell;
use std::rc::Rc;

use pretty_assertions::assert_eq;

use super::{array_index, format_number, inherits_from, to_int32, Object, ObjectRef, Value};

fn object_of(entries: &[(&str, Value<'static>)]) -> Value<'static> {
    let mut object = Object::default();
    for (key, value) in entries {
        object.set(Rc::from(*key), value.clone());
    }
    Value::object(object)
}

#[test]
fn numbers_print_like_javascript() {
    assert_eq!(format_number(3.0), "3");
    assert_eq!(format_number(-0.0), "0");
    assert_eq!(format_number(0.5), "0.5");
    assert_eq!(format_number(f64::NAN), "NaN");
    assert_eq!(format_number(f64::NEG_INFINITY), "-Infinity");
}

#[test]
fn string_conversion() {
    let list = Value::array(vec![Value::Number(1.0), Value::Null, Value::string("x")]);

    assert_eq!(list.to_js_string(), "1,,x");
    assert_eq!(object_of(&[]).to_js_string(), "[object Object]");
    assert_eq!(Value::Bool(true).to_js_string(), "true");
}

#[test]
fn number_conversion() {
    assert_eq!(Value::string(" 42 ").to_number(), 42.0);
    assert_eq!(Value::string("").to_number(), 0.0);
    assert!(Value::string("4x").to_number().is_nan());
    assert!(Value::Undefined.to_number().is_nan());
    assert_eq!(Value::Null.to_number(), 0.0);
    assert_eq!(Value::array(vec![Value::Number(7.0)]).to_number(), 7.0);
}

#[test]
fn truthiness() {
    assert!(!Value::Number(0.0).is_truthy());
    assert!(!Value::Number(f64::NAN).is_truthy());
    assert!(!Value::string("").is_truthy());
    assert!(Value::array(Vec::new()).is_truthy());
    assert!(Value::Number(-1.0).is_truthy());
}

#[test]
fn equality() {
    let list = Value::array(Vec::new());

    assert!(list.strict_equals(&list.clone()));
    assert!(!list.strict_equals(&Value::array(Vec::new())));
    assert!(Value::Null.loose_equals(&Value::Undefined));
    assert!(!Value::Null.loose_equals(&Value::Number(0.0)));
    assert!(Value::string("1").loose_equals(&Value::Number(1.0)));
    assert!(Value::Bool(true).loose_equals(&Value::Number(1.0)));
    assert!(!Value::string("1").strict_equals(&Value::Number(1.0)));
}

#[test]
fn inspect_renders_nested_structure() {
    let value = object_of(&[
        ("a", Value::Number(1.0)),
        (
            "b",
            Value::array(vec![Value::string("x"), Value::Undefined]),
        ),
    ]);

    assert_eq!(value.inspect(), "{ a: 1, b: ['x', undefined] }");
    assert_eq!(Value::string("bare").to_display(), "bare");
}

#[test]
fn object_keys_keep_insertion_order() {
    let mut object = Object::default();
    object.set(Rc::from("b"), Value::Number(1.0));
    object.set(Rc::from("a"), Value::Number(2.0));
    object.set(Rc::from("b"), Value::Number(3.0));

    let keys: Vec<&str> = object.keys().iter().map(|k| &**k).collect();
    assert_eq!(keys, ["b", "a"]);
    assert!(object.remove("b"));
    assert!(!object.remove("b"));
    assert_eq!(object.keys().len(), 1);
}

#[test]
fn int32_wraps() {
    assert_eq!(to_int32(4_294_967_297.0), 1);
    assert_eq!(to_int32(-1.0), -1);
    assert_eq!(to_int32(2_147_483_648.0), i32::MIN);
    assert_eq!(to_int32(f64::INFINITY), 0);
}

#[test]
fn array_indices_are_canonical() {
    assert_eq!(array_index("0"), Some(0));
    assert_eq!(array_index("12"), Some(12));
    assert_eq!(array_index("012"), None);
    assert_eq!(array_index("length"), None);
}

#[test]
fn prototype_chain_membership() {
    let base: ObjectRef<'_> = Rc::new(RefCell::new(Object::default()));
    let middle = Rc::new(RefCell::new(Object::with_proto(Some(Rc::clone(&base)))));
    let leaf = Rc::new(RefCell::new(Object::with_proto(Some(Rc::clone(&middle)))));
    let stranger: ObjectRef<'_> = Rc::new(RefCell::new(Object::default()));

    assert!(inherits_from(&leaf, &middle));
    assert!(inherits_from(&leaf, &base));
    assert!(!inherits_from(&leaf, &leaf));
    assert!(!inherits_from(&leaf, &stranger));
    assert!(!inherits_from(&base, &middle));
}
