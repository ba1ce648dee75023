//! Entry points for a JSX transform. These only normalize call shapes before handing over to
//! [`create_element`].

use crate::{
    component::ComponentType,
    value::{Props, Value, CHILDREN, KEY},
    vnode::{create_element, ElementType},
};

/// Groups children without producing an element of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fragment;

/// What a JSX call can construct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JsxType {
    Element(ElementType),
    Fragment,
}

impl From<Fragment> for JsxType {
    fn from(_: Fragment) -> Self {
        JsxType::Fragment
    }
}

impl From<ElementType> for JsxType {
    fn from(ty: ElementType) -> Self {
        JsxType::Element(ty)
    }
}

impl From<&'static str> for JsxType {
    fn from(tag: &'static str) -> Self {
        JsxType::Element(tag.into())
    }
}

impl From<String> for JsxType {
    fn from(tag: String) -> Self {
        JsxType::Element(tag.into())
    }
}

impl From<ComponentType> for JsxType {
    fn from(component: ComponentType) -> Self {
        JsxType::Element(component.into())
    }
}

/// A fragment's value: its children as they are, or `null` without any.
pub fn fragment(props: &Props) -> Value {
    props.get(CHILDREN).cloned().unwrap_or(Value::Null)
}

/// Element with at most one level of child nesting. Nested arrays are spliced into their parent
/// once; nothing is filtered.
pub fn jsx<T>(ty: T, mut props: Props, key: Option<Value>) -> Value
where
    T: Into<JsxType>,
{
    if let Some(Value::Array(children)) = props.get_mut(CHILDREN) {
        *children = std::mem::take(children)
            .into_iter()
            .flat_map(|child| match child {
                Value::Array(nested) => nested,
                child => vec![child],
            })
            .collect();
    }

    build(ty.into(), props, key)
}

/// Element with static children. Child arrays are flattened completely, dropping `null`,
/// `undefined` and `false`.
pub fn jsxs<T>(ty: T, mut props: Props, key: Option<Value>) -> Value
where
    T: Into<JsxType>,
{
    if let Some(Value::Array(children)) = props.get_mut(CHILDREN) {
        let mut flat = Vec::with_capacity(children.len());
        flatten_into(std::mem::take(children), &mut flat);
        *children = flat;
    }

    build(ty.into(), props, key)
}

/// Development variant of [`jsxs`], recording where the element was declared in the `__source`
/// and `__self` props.
pub fn jsx_dev<T>(
    ty: T,
    mut props: Props,
    key: Option<Value>,
    _is_static_children: bool,
    source: Value,
    self_: Value,
) -> Value
where
    T: Into<JsxType>,
{
    props.insert("__source".into(), source);
    props.insert("__self".into(), self_);

    jsxs(ty, props, key)
}

fn flatten_into(children: Vec<Value>, out: &mut Vec<Value>) {
    for child in children {
        match child {
            Value::Array(nested) => flatten_into(nested, out),
            Value::Null | Value::Undefined | Value::Bool(false) => (),
            child => out.push(child),
        }
    }
}

fn build(ty: JsxType, mut props: Props, key: Option<Value>) -> Value {
    match ty {
        JsxType::Fragment => fragment(&props),
        JsxType::Element(ty) => {
            if let Some(key) = key {
                props.insert(KEY.into(), key);
            }

            create_element(ty, props, Vec::new()).into()
        }
    }
}
