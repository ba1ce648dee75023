use std::{any::Any, fmt, rc::Rc};

use indexmap::IndexMap;

use crate::{dom::Callback, vnode::VNode};

/// Attributes, event handlers and children handed to an element or component.
pub type Props = IndexMap<String, Value>;

/// The state container of a component instance.
pub type State = IndexMap<String, Value>;

/// Reserved prop holding an element's children.
pub const CHILDREN: &str = "children";

/// Reserved prop identifying an element among its siblings.
pub const KEY: &str = "key";

/// Build a [`Props`] (or [`State`]) map.
///
/// ```
/// use tessera::{props, Value};
///
/// let props = props! { "id" => "title", "count" => 3 };
/// assert_eq!(props["count"], Value::Number(3.0));
/// ```
#[macro_export]
macro_rules! props {
    () => {
        $crate::Props::new()
    };
    ($($name:expr => $value:expr),+ $(,)?) => {{
        let mut props = $crate::Props::new();
        $(
            props.insert(::std::string::String::from($name), $crate::Value::from($value));
        )+
        props
    }};
}

/// A dynamically typed prop, state or child value.
#[derive(Clone, Default)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(Rc<str>),
    Node(VNode),
    Array(Vec<Value>),
    Function(Callback),
    /// Any other value, opaque to the runtime.
    Object(Rc<dyn Any>),
}

impl Value {
    pub fn object<T>(value: T) -> Self
    where
        T: 'static,
    {
        Self::Object(Rc::new(value))
    }

    /// `null` and `undefined`.
    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Null | Value::Undefined)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_ref()),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_node(&self) -> Option<&VNode> {
        match self {
            Value::Node(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_callback(&self) -> Option<&Callback> {
        match self {
            Value::Function(callback) => Some(callback),
            _ => None,
        }
    }

    /// Borrow the contents of an [`Value::Object`] as a concrete type.
    pub fn downcast_ref<T>(&self) -> Option<&T>
    where
        T: 'static,
    {
        match self {
            Value::Object(object) => object.downcast_ref(),
            _ => None,
        }
    }

    /// Name of the kind of value, used in validation messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Node(_) => "element",
            Value::Array(_) => "array",
            Value::Function(_) => "function",
            Value::Object(_) => "object",
        }
    }

    /// String coercion used when a value is written as an attribute. Matches the browser's own
    /// coercion, so nothing is special-cased: `null` becomes `"null"` and so on.
    pub fn to_attribute_string(&self) -> String {
        match self {
            Value::Undefined => "undefined".into(),
            Value::Null => "null".into(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => number_to_string(*n),
            Value::String(s) => s.to_string(),
            Value::Array(items) => items
                .iter()
                .map(|item| {
                    if item.is_nullish() {
                        String::new()
                    } else {
                        item.to_attribute_string()
                    }
                })
                .collect::<Vec<_>>()
                .join(","),
            Value::Function(_) => "function".into(),
            Value::Node(_) | Value::Object(_) => "[object Object]".into(),
        }
    }
}

/// Format a number the way JS `String(n)` does: shortest round-trip digits, plain notation for
/// magnitudes in `[1e-6, 1e21)` and exponent notation with an explicit sign outside of it.
pub fn number_to_string(n: f64) -> String {
    if n.is_nan() {
        "NaN".into()
    } else if n.is_infinite() {
        let text = if n > 0.0 { "Infinity" } else { "-Infinity" };
        text.into()
    } else if n == 0.0 {
        // Covers -0
        "0".into()
    } else if n.abs() >= 1e21 || n.abs() < 1e-6 {
        let text = format!("{n:e}");
        match text.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{mantissa}e+{exponent}")
            }
            _ => text,
        }
    } else {
        n.to_string()
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Node(a), Value::Node(b)) => a.ptr_eq(b),
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => a.ptr_eq(b),
            (Value::Object(a), Value::Object(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => f.write_str("undefined"),
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => f.write_str(&number_to_string(*n)),
            Value::String(s) => write!(f, "{s:?}"),
            Value::Node(node) => fmt::Debug::fmt(node, f),
            Value::Array(items) => f.debug_list().entries(items).finish(),
            Value::Function(_) => f.write_str("[function]"),
            Value::Object(_) => f.write_str("[object]"),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.into())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value.into())
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

macro_rules! from_number {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::Number(value as f64)
                }
            }
        )*
    };
}

from_number!(i8, i16, i32, i64, u8, u16, u32, u64, usize, isize, f32, f64);

impl From<VNode> for Value {
    fn from(value: VNode) -> Self {
        Value::Node(value)
    }
}

impl From<Callback> for Value {
    fn from(value: Callback) -> Self {
        Value::Function(value)
    }
}

impl<T> From<Vec<T>> for Value
where
    T: Into<Value>,
{
    fn from(value: Vec<T>) -> Self {
        Value::Array(value.into_iter().map(Into::into).collect())
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Undefined
    }
}
