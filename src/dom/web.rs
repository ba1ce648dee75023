//! Browser DOM host, backed by [`web_sys`].

use std::{
    cell::{Cell, RefCell},
    collections::HashMap,
    hash::{Hash, Hasher},
    rc::Rc,
};

use js_sys::{Object, WeakMap};
use wasm_bindgen::{prelude::Closure, JsCast, JsValue};
use web_sys::{Document, Element, Node};

use super::{Callback, Event, Host, LISTENER_ERROR};
use crate::{error::HostError, report::report};

/// A [`web_sys::Node`] paired with a key that identifies it. Two handles to the same DOM node
/// always share a key, so the handle can be hashed.
#[derive(Debug, Clone)]
pub struct WebNode {
    key: u32,
    node: Node,
}

impl WebNode {
    pub fn node(&self) -> &Node {
        &self.node
    }

    /// The node as an [`Element`], if it is one.
    pub fn element(&self) -> Option<&Element> {
        self.node.dyn_ref::<Element>()
    }
}

impl PartialEq for WebNode {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for WebNode {}

impl Hash for WebNode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

/// Hands out node keys. The keys live in a [`WeakMap`], so nothing here keeps a node alive.
struct NodeKeys {
    keys: WeakMap,
    next: Cell<u32>,
}

impl NodeKeys {
    fn key(&self, node: &Node) -> u32 {
        let object = node.unchecked_ref::<Object>();

        if let Some(key) = self.keys.get(object).as_f64() {
            return key as u32;
        }

        let key = self.next.get();
        self.next.set(key + 1);
        self.keys.set(object, &JsValue::from(key));

        key
    }
}

type ListenerClosure = Closure<dyn Fn(web_sys::Event)>;

/// Listener closures registered on a single element. They are owned here rather than leaked, and
/// dropped once the element is cleared out of its container.
struct Listeners {
    node: Node,
    closures: Vec<(String, ListenerClosure)>,
}

impl Listeners {
    fn remove(self) {
        for (event, closure) in &self.closures {
            let _ = self
                .node
                .remove_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
        }
    }
}

/// Host that writes into a browser [`Document`].
#[derive(Clone)]
pub struct WebHost {
    document: Document,
    keys: Rc<NodeKeys>,
    listeners: Rc<RefCell<HashMap<u32, Listeners>>>,
}

impl WebHost {
    pub fn new(document: &Document) -> Self {
        Self {
            document: document.clone(),
            keys: Rc::new(NodeKeys {
                keys: WeakMap::new(),
                next: Cell::new(0),
            }),
            listeners: Rc::default(),
        }
    }

    /// Create a host for the document of the global `window`.
    pub fn from_window() -> Result<Self, HostError> {
        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(|| HostError::new("no global `window` with a document exists"))?;

        Ok(Self::new(&document))
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Number of event listener closures currently held for rendered elements.
    pub fn listener_count(&self) -> usize {
        self.listeners
            .borrow()
            .values()
            .map(|listeners| listeners.closures.len())
            .sum()
    }

    /// Detach and drop the listeners of every strict descendant of `parent`.
    fn release_listeners(&self, parent: &WebNode) {
        let released = {
            let mut listeners = self.listeners.borrow_mut();
            let keys = listeners
                .iter()
                .filter(|(key, entry)| {
                    **key != parent.key && parent.node.contains(Some(&entry.node))
                })
                .map(|(key, _)| *key)
                .collect::<Vec<_>>();

            keys.into_iter()
                .filter_map(|key| listeners.remove(&key))
                .collect::<Vec<_>>()
        };

        released.into_iter().for_each(Listeners::remove);
    }

    /// Wrap an existing DOM node (eg a container element) so it can be passed to the renderer.
    pub fn wrap<N>(&self, node: N) -> WebNode
    where
        N: Into<Node>,
    {
        let node = node.into();

        WebNode {
            key: self.keys.key(&node),
            node,
        }
    }
}

impl Host for WebHost {
    type Node = WebNode;

    fn create_text(&self, content: &str) -> Result<WebNode, HostError> {
        Ok(self.wrap(self.document.create_text_node(content)))
    }

    fn create_element(&self, tag: &str) -> Result<WebNode, HostError> {
        let element = self
            .document
            .create_element(tag)
            .map_err(HostError::from_js)?;

        Ok(self.wrap(element))
    }

    fn create_fragment(&self) -> Result<WebNode, HostError> {
        Ok(self.wrap(self.document.create_document_fragment()))
    }

    fn set_attribute(&self, element: &WebNode, name: &str, value: &str) -> Result<(), HostError> {
        element
            .element()
            .ok_or_else(|| HostError::new("setAttribute target is not an element"))?
            .set_attribute(name, value)
            .map_err(HostError::from_js)
    }

    fn add_event_listener(
        &self,
        element: &WebNode,
        event: &str,
        callback: Callback,
    ) -> Result<(), HostError> {
        let closure = Closure::<dyn Fn(web_sys::Event)>::new(move |native: web_sys::Event| {
            let event = Event::with_native(native.type_(), native);

            if let Err(err) = callback.call(&event) {
                report(LISTENER_ERROR, &err);
            }
        });

        element
            .node
            .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
            .map_err(HostError::from_js)?;

        self.listeners
            .borrow_mut()
            .entry(element.key)
            .or_insert_with(|| Listeners {
                node: element.node.clone(),
                closures: Vec::new(),
            })
            .closures
            .push((event.to_string(), closure));

        Ok(())
    }

    fn append_child(&self, parent: &WebNode, child: &WebNode) -> Result<(), HostError> {
        parent
            .node
            .append_child(&child.node)
            .map(|_| ())
            .map_err(HostError::from_js)
    }

    fn clear_children(&self, parent: &WebNode) -> Result<(), HostError> {
        self.release_listeners(parent);
        parent.node.set_text_content(None);
        Ok(())
    }

    fn child_nodes(&self, node: &WebNode) -> Vec<WebNode> {
        let children = node.node.child_nodes();

        (0..children.length())
            .filter_map(|i| children.get(i))
            .map(|child| self.wrap(child))
            .collect()
    }

    fn is_fragment(&self, node: &WebNode) -> bool {
        node.node.node_type() == Node::DOCUMENT_FRAGMENT_NODE
    }

    fn is_connected(&self, node: &WebNode) -> bool {
        node.node.is_connected()
    }
}
