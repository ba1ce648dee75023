//! In-memory document, used to render without a browser (native callers and tests).

use std::{cell::RefCell, rc::Rc};

use indexmap::IndexMap;

use super::{Callback, Event, Host, LISTENER_ERROR};
use crate::{error::HostError, report::report};

/// Identifier of a node within a [`MemoryDocument`] (index into its arena).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Document,
    Element(String),
    Text(String),
    Fragment,
}

struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    attributes: IndexMap<String, String>,
    listeners: Vec<(String, Callback)>,
}

impl NodeData {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            children: Vec::new(),
            attributes: IndexMap::new(),
            listeners: Vec::new(),
        }
    }
}

struct Arena {
    nodes: Vec<NodeData>,
    root: NodeId,
    body: NodeId,
}

impl Arena {
    fn get(&self, id: NodeId) -> Result<&NodeData, HostError> {
        self.nodes
            .get(id.0 as usize)
            .ok_or_else(|| HostError::new(format!("unknown node {id:?}")))
    }

    fn get_mut(&mut self, id: NodeId) -> Result<&mut NodeData, HostError> {
        self.nodes
            .get_mut(id.0 as usize)
            .ok_or_else(|| HostError::new(format!("unknown node {id:?}")))
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(NodeData::new(kind));
        id
    }

    fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id.0 as usize)?.parent
    }

    fn detach(&mut self, child: NodeId) -> Result<(), HostError> {
        if let Some(parent) = self.get_mut(child)?.parent.take() {
            self.get_mut(parent)?.children.retain(|id| *id != child);
        }

        Ok(())
    }

    /// Checks that `child` can be placed under `parent` without creating a cycle.
    fn check_insert(&self, parent: NodeId, child: NodeId) -> Result<(), HostError> {
        if child == self.root {
            return Err(HostError::new("the document node cannot be appended"));
        }

        let mut cursor = Some(parent);
        while let Some(node) = cursor {
            if node == child {
                return Err(HostError::new("appendChild would create a cycle"));
            }
            cursor = self.parent(node);
        }

        Ok(())
    }

    fn insert(&mut self, parent: NodeId, child: NodeId) -> Result<(), HostError> {
        self.detach(child)?;
        self.get_mut(child)?.parent = Some(parent);
        self.get_mut(parent)?.children.push(child);
        Ok(())
    }

    fn text_content(&self, id: NodeId, out: &mut String) {
        let Some(node) = self.nodes.get(id.0 as usize) else {
            return;
        };

        match &node.kind {
            NodeKind::Text(content) => out.push_str(content),
            _ => node
                .children
                .iter()
                .for_each(|child| self.text_content(*child, out)),
        }
    }
}

/// Arena backed DOM. Cloning the document produces another handle to the same arena.
#[derive(Clone)]
pub struct MemoryDocument(Rc<RefCell<Arena>>);

impl MemoryDocument {
    /// Create a document containing an empty `body` element.
    pub fn new() -> Self {
        let mut arena = Arena {
            nodes: Vec::new(),
            root: NodeId(0),
            body: NodeId(0),
        };

        let root = arena.push(NodeKind::Document);
        let body = arena.push(NodeKind::Element("body".into()));
        arena.nodes[body.0 as usize].parent = Some(root);
        arena.nodes[root.0 as usize].children.push(body);
        arena.root = root;
        arena.body = body;

        Self(Rc::new(RefCell::new(arena)))
    }

    pub fn root(&self) -> NodeId {
        self.0.borrow().root
    }

    pub fn body(&self) -> NodeId {
        self.0.borrow().body
    }

    pub fn kind(&self, node: NodeId) -> Option<NodeKind> {
        self.0.borrow().get(node).ok().map(|data| data.kind.clone())
    }

    pub fn tag_name(&self, node: NodeId) -> Option<String> {
        match self.kind(node)? {
            NodeKind::Element(tag) => Some(tag),
            _ => None,
        }
    }

    /// Content of a text node.
    pub fn text(&self, node: NodeId) -> Option<String> {
        match self.kind(node)? {
            NodeKind::Text(content) => Some(content),
            _ => None,
        }
    }

    /// Concatenated text of the node and all of its descendants.
    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.0.borrow().text_content(node, &mut out);
        out
    }

    pub fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.0.borrow().get(node).ok()?.attributes.get(name).cloned()
    }

    pub fn attribute_names(&self, node: NodeId) -> Vec<String> {
        self.0
            .borrow()
            .get(node)
            .map(|data| data.attributes.keys().cloned().collect())
            .unwrap_or_default()
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.0.borrow().parent(node)
    }

    /// Detach `node` (and its subtree) from its parent.
    pub fn remove(&self, node: NodeId) -> Result<(), HostError> {
        self.0.borrow_mut().detach(node)
    }

    pub fn listener_count(&self, node: NodeId, event: &str) -> usize {
        self.0
            .borrow()
            .get(node)
            .map(|data| data.listeners.iter().filter(|(kind, _)| kind == event).count())
            .unwrap_or_default()
    }

    /// Invoke every listener registered for the event on `node`, returning how many were called.
    /// A failing listener is logged and does not stop the others.
    pub fn dispatch(&self, node: NodeId, event: &Event) -> usize {
        // Listeners are free to touch the document, so the arena can't stay borrowed
        let listeners = self
            .0
            .borrow()
            .get(node)
            .map(|data| {
                data.listeners
                    .iter()
                    .filter(|(kind, _)| kind == event.kind())
                    .map(|(_, callback)| callback.clone())
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();

        for listener in &listeners {
            if let Err(err) = listener.call(event) {
                report(LISTENER_ERROR, &err);
            }
        }

        listeners.len()
    }
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl Host for MemoryDocument {
    type Node = NodeId;

    fn create_text(&self, content: &str) -> Result<NodeId, HostError> {
        Ok(self.0.borrow_mut().push(NodeKind::Text(content.into())))
    }

    fn create_element(&self, tag: &str) -> Result<NodeId, HostError> {
        if tag.is_empty() {
            return Err(HostError::new("element tag cannot be empty"));
        }

        Ok(self.0.borrow_mut().push(NodeKind::Element(tag.into())))
    }

    fn create_fragment(&self) -> Result<NodeId, HostError> {
        Ok(self.0.borrow_mut().push(NodeKind::Fragment))
    }

    fn set_attribute(&self, element: &NodeId, name: &str, value: &str) -> Result<(), HostError> {
        let mut arena = self.0.borrow_mut();
        let node = arena.get_mut(*element)?;

        match node.kind {
            NodeKind::Element(_) => {
                node.attributes.insert(name.into(), value.into());
                Ok(())
            }
            _ => Err(HostError::new("setAttribute target is not an element")),
        }
    }

    fn add_event_listener(
        &self,
        element: &NodeId,
        event: &str,
        callback: Callback,
    ) -> Result<(), HostError> {
        self.0
            .borrow_mut()
            .get_mut(*element)?
            .listeners
            .push((event.into(), callback));
        Ok(())
    }

    fn append_child(&self, parent: &NodeId, child: &NodeId) -> Result<(), HostError> {
        let mut arena = self.0.borrow_mut();

        if matches!(arena.get(*parent)?.kind, NodeKind::Text(_)) {
            return Err(HostError::new("text nodes cannot have children"));
        }

        let moved = match arena.get(*child)?.kind {
            NodeKind::Fragment => arena.get(*child)?.children.clone(),
            _ => vec![*child],
        };

        for node in &moved {
            arena.check_insert(*parent, *node)?;
        }

        for node in moved {
            arena.insert(*parent, node)?;
        }

        Ok(())
    }

    fn clear_children(&self, parent: &NodeId) -> Result<(), HostError> {
        let mut arena = self.0.borrow_mut();

        for child in std::mem::take(&mut arena.get_mut(*parent)?.children) {
            arena.get_mut(child)?.parent = None;
        }

        Ok(())
    }

    fn child_nodes(&self, node: &NodeId) -> Vec<NodeId> {
        self.0
            .borrow()
            .get(*node)
            .map(|data| data.children.clone())
            .unwrap_or_default()
    }

    fn is_fragment(&self, node: &NodeId) -> bool {
        matches!(self.kind(*node), Some(NodeKind::Fragment))
    }

    fn is_connected(&self, node: &NodeId) -> bool {
        let arena = self.0.borrow();

        let mut cursor = Some(*node);
        while let Some(current) = cursor {
            if current == arena.root {
                return true;
            }
            cursor = arena.parent(current);
        }

        false
    }
}
