//! Prop validators, run when a component is constructed.

use std::rc::Rc;

use indexmap::IndexMap;

use crate::value::Value;

type ValidateFn = dyn Fn(&Value, &str, &str) -> Option<String>;

/// Validators for a component's props, keyed by prop name.
pub type PropTypes = IndexMap<String, Validator>;

/// Checks a single prop. Called with the value (or [`Value::Undefined`] when the prop is missing),
/// the prop name and the component name, and returns a reason when the value is rejected.
#[derive(Clone)]
pub struct Validator(Rc<ValidateFn>);

impl Validator {
    pub fn new<F>(f: F) -> Self
    where
        F: 'static + Fn(&Value, &str, &str) -> Option<String>,
    {
        Self(Rc::new(f))
    }

    pub fn validate(&self, value: &Value, prop: &str, component: &str) -> Option<String> {
        (self.0)(value, prop, component)
    }

    /// Also reject `null` and `undefined`.
    pub fn required(self) -> Self {
        Self::new(move |value, prop, component| {
            if value.is_nullish() {
                Some(format!(
                    "`{prop}` is required by `{component}`, but its value is `{}`",
                    value.type_name()
                ))
            } else {
                self.validate(value, prop, component)
            }
        })
    }
}

/// Missing values pass, so only the type of supplied values is checked.
fn of_type(expected: &'static str, check: fn(&Value) -> bool) -> Validator {
    Validator::new(move |value, _, _| {
        if value.is_nullish() || check(value) {
            None
        } else {
            Some(format!(
                "expected `{expected}`, got `{}`",
                value.type_name()
            ))
        }
    })
}

pub fn string() -> Validator {
    of_type("string", |value| matches!(value, Value::String(_)))
}

pub fn number() -> Validator {
    of_type("number", |value| matches!(value, Value::Number(_)))
}

pub fn boolean() -> Validator {
    of_type("boolean", |value| matches!(value, Value::Bool(_)))
}

pub fn function() -> Validator {
    of_type("function", |value| matches!(value, Value::Function(_)))
}

pub fn array() -> Validator {
    of_type("array", |value| matches!(value, Value::Array(_)))
}

/// An element created by [`crate::create_element`].
pub fn node() -> Validator {
    of_type("element", |value| matches!(value, Value::Node(_)))
}

/// The value must equal one of `allowed`.
pub fn one_of(allowed: Vec<Value>) -> Validator {
    Validator::new(move |value, _, _| {
        if value.is_nullish() || allowed.contains(value) {
            None
        } else {
            Some(format!("expected one of {allowed:?}, got {value:?}"))
        }
    })
}
