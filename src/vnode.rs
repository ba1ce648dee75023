use std::{borrow::Cow, fmt, rc::Rc};

use crate::{
    component::ComponentType,
    value::{Props, Value, CHILDREN, KEY},
};

/// What a [`VNode`] materializes into.
#[derive(Clone, PartialEq, Eq)]
pub enum ElementType {
    /// An intrinsic element, identified by its tag name (eg `div`).
    Tag(Cow<'static, str>),

    /// A component, instantiated during materialization.
    Component(ComponentType),
}

impl fmt::Debug for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementType::Tag(tag) => write!(f, "<{tag}>"),
            ElementType::Component(component) => write!(f, "<{}>", component.name()),
        }
    }
}

impl From<&'static str> for ElementType {
    fn from(tag: &'static str) -> Self {
        ElementType::Tag(Cow::Borrowed(tag))
    }
}

impl From<String> for ElementType {
    fn from(tag: String) -> Self {
        ElementType::Tag(Cow::Owned(tag))
    }
}

impl From<ComponentType> for ElementType {
    fn from(component: ComponentType) -> Self {
        ElementType::Component(component)
    }
}

struct VNodeData {
    ty: ElementType,
    props: Props,
}

/// A single position in a declared UI tree. Immutable once created, so clones share the same
/// data.
#[derive(Clone)]
pub struct VNode(Rc<VNodeData>);

impl VNode {
    fn new(ty: ElementType, props: Props) -> Self {
        Self(Rc::new(VNodeData { ty, props }))
    }

    pub fn ty(&self) -> &ElementType {
        &self.0.ty
    }

    pub fn props(&self) -> &Props {
        &self.0.props
    }

    /// The `children` prop, if there is one.
    pub fn children(&self) -> Option<&Value> {
        self.0.props.get(CHILDREN)
    }

    /// The `key` prop, kept for future reconciliation.
    pub fn key(&self) -> Option<&Value> {
        self.0.props.get(KEY)
    }

    pub fn is_intrinsic(&self) -> bool {
        matches!(self.0.ty, ElementType::Tag(_))
    }

    /// Whether both handles point at the same node.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for VNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VNode")
            .field("type", &self.0.ty)
            .field("props", &self.0.props)
            .finish()
    }
}

/// Create a [`VNode`].
///
/// A `children` entry already present in `props` always wins over `children`, even if it is a
/// single value. Otherwise no children leave the prop unset, and any number of children are
/// stored as an array.
pub fn create_element<T>(ty: T, mut props: Props, children: Vec<Value>) -> VNode
where
    T: Into<ElementType>,
{
    if !props.contains_key(CHILDREN) && !children.is_empty() {
        props.insert(CHILDREN.into(), Value::Array(children));
    }

    VNode::new(ty.into(), props)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::props;

    #[test]
    fn explicit_children_prop_wins() {
        let node = create_element(
            "div",
            props! { "children" => "only" },
            vec![Value::from("ignored"), Value::from("also ignored")],
        );

        assert_eq!(node.children(), Some(&Value::from("only")));
    }

    #[test]
    fn variadic_children_become_an_array() {
        let none = create_element("div", props! {}, vec![]);
        let one = create_element("div", props! {}, vec![Value::from("a")]);

        assert_eq!(none.children(), None);
        assert_eq!(one.children(), Some(&Value::Array(vec![Value::from("a")])));
    }

    #[test]
    fn key_is_kept_in_props() {
        let node = create_element("li", props! { "key" => "row-1", "class" => "row" }, vec![]);

        assert_eq!(node.key(), Some(&Value::from("row-1")));
        assert_eq!(node.props().get("class"), Some(&Value::from("row")));
        assert!(node.is_intrinsic());
    }
}
