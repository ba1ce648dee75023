mod event;
pub mod memory;
pub mod web;

use std::{fmt::Debug, hash::Hash};

pub use self::event::{Callback, Event};
pub use self::memory::MemoryDocument;
pub use self::web::WebHost;
use crate::error::HostError;

/// Tag for errors returned by event listeners, which are logged and swallowed.
pub const LISTENER_ERROR: &str = "listener error:";

/// The document that virtual nodes are materialized into.
///
/// Nodes are handles: cloning one must not clone the underlying DOM node, and equality/hashing
/// must follow node identity, as the renderer keys its attachment table by them.
pub trait Host: Clone + 'static {
    type Node: 'static + Clone + Eq + Hash + Debug;

    fn create_text(&self, content: &str) -> Result<Self::Node, HostError>;

    fn create_element(&self, tag: &str) -> Result<Self::Node, HostError>;

    /// Create a node that can collect children, which are moved out of it when it is appended.
    fn create_fragment(&self) -> Result<Self::Node, HostError>;

    fn set_attribute(&self, element: &Self::Node, name: &str, value: &str)
        -> Result<(), HostError>;

    /// Register `callback` to be called with an [`Event`] whenever `event` fires on `element`.
    fn add_event_listener(
        &self,
        element: &Self::Node,
        event: &str,
        callback: Callback,
    ) -> Result<(), HostError>;

    /// Append `child` to `parent`. Appending a fragment moves its children instead.
    fn append_child(&self, parent: &Self::Node, child: &Self::Node) -> Result<(), HostError>;

    /// Remove every child of `parent`.
    fn clear_children(&self, parent: &Self::Node) -> Result<(), HostError>;

    /// Children of `node` in document order.
    fn child_nodes(&self, node: &Self::Node) -> Vec<Self::Node>;

    fn is_fragment(&self, node: &Self::Node) -> bool;

    /// Whether `node` is currently part of the live document.
    fn is_connected(&self, node: &Self::Node) -> bool;
}
