//! Turning [`Value`] trees into host nodes, and the mount pipeline around it.

mod attachments;
mod traversal;

use std::{cell::RefCell, future::Future, rc::Rc};

use futures::task::{LocalSpawn, LocalSpawnExt};
use tracing::{debug, trace};

use self::attachments::Attachments;
use crate::{
    component::{mount, ComponentType, Instance},
    config::Config,
    dom::Host,
    error::RenderError,
    report::report,
    scheduler::SpawnerRef,
    value::{Props, Value, CHILDREN},
    vnode::{ElementType, VNode},
};

pub const REF_ERROR: &str = "ref callback error:";

/// Attachments made during a single materialization, so that they can be undone if it fails.
type Pass<N> = Vec<(N, Instance)>;

/// Materializes values into a [`Host`] and drives the mount lifecycle of the components found
/// along the way.
pub struct Renderer<H>
where
    H: Host,
{
    host: H,
    spawner: SpawnerRef,
    attachments: Rc<RefCell<Attachments<H::Node>>>,
    config: Config,
}

impl<H> Renderer<H>
where
    H: Host,
{
    /// Create a renderer writing into `host`. Deferred work (the post-insertion pass and hook
    /// futures that are not awaited) is handed to `spawner`.
    pub fn new<S>(host: H, spawner: S) -> Self
    where
        S: LocalSpawn + 'static,
    {
        Self::with_config(host, spawner, Config::default())
    }

    pub fn with_config<S>(host: H, spawner: S, config: Config) -> Self
    where
        S: LocalSpawn + 'static,
    {
        Self {
            host,
            spawner: Rc::new(spawner),
            attachments: Rc::new(RefCell::new(Attachments::new())),
            config,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn config(&self) -> Config {
        self.config
    }

    /// Replace the contents of `container` with `children`, then schedule the post-insertion
    /// pass. The pass never runs before this returns.
    pub fn render<V>(&self, children: V, container: &H::Node) -> Result<(), RenderError>
    where
        V: Into<Value>,
    {
        let children = children.into();
        debug!(?container, "rendering");

        self.host.clear_children(container)?;
        let node = self.materialize(&children)?;

        let roots = if self.host.is_fragment(&node) {
            self.host.child_nodes(&node)
        } else {
            vec![node.clone()]
        };

        self.host.append_child(container, &node)?;
        self.spawner.spawn_local(self.traverse(roots))?;

        Ok(())
    }

    /// The post-insertion pass over `roots`, for callers that insert materialized nodes
    /// themselves.
    pub fn traverse(&self, roots: Vec<H::Node>) -> impl Future<Output = ()> + 'static {
        traversal::traverse(
            self.host.clone(),
            Rc::clone(&self.attachments),
            self.config,
            roots,
        )
    }

    /// Produce exactly one host node for `value`.
    ///
    /// Components met along the way are constructed, run through `beforeMount`, `render` and
    /// `didMount`, and attached to the node they produced. If materialization fails, the
    /// attachments it made are dropped again.
    pub fn materialize(&self, value: &Value) -> Result<H::Node, RenderError> {
        let mut pass = Pass::new();

        self.materialize_value(value, &mut pass).inspect_err(|_| {
            self.attachments.borrow_mut().discard(&pass);
        })
    }

    /// Instances attached to `node`, outermost first.
    pub fn attached(&self, node: &H::Node) -> Option<Vec<Instance>> {
        self.attachments.borrow().get(node).map(<[_]>::to_vec)
    }

    /// Number of nodes with attachments not yet cleared by a post-insertion pass.
    pub fn pending_attachments(&self) -> usize {
        self.attachments.borrow().len()
    }

    fn materialize_value(
        &self,
        value: &Value,
        pass: &mut Pass<H::Node>,
    ) -> Result<H::Node, RenderError> {
        match value {
            Value::String(text) => Ok(self.host.create_text(text)?),
            Value::Number(_) => Ok(self.host.create_text(&value.to_attribute_string())?),
            Value::Array(items) => {
                let fragment = self.host.create_fragment()?;

                for item in items {
                    let child = self.materialize_value(item, pass)?;
                    self.host.append_child(&fragment, &child)?;
                }

                Ok(fragment)
            }
            Value::Node(node) => match node.ty() {
                ElementType::Tag(tag) => self.materialize_element(tag, node, pass),
                ElementType::Component(component) => {
                    self.materialize_component(component, node.props().clone(), pass)
                }
            },
            Value::Undefined
            | Value::Null
            | Value::Bool(_)
            | Value::Function(_)
            | Value::Object(_) => Ok(self.host.create_text("")?),
        }
    }

    fn materialize_element(
        &self,
        tag: &str,
        node: &VNode,
        pass: &mut Pass<H::Node>,
    ) -> Result<H::Node, RenderError> {
        let element = self.host.create_element(tag)?;

        for (name, value) in node.props() {
            if name == CHILDREN {
                continue;
            }

            match (name.as_str(), value) {
                ("ref", Value::Function(callback)) => {
                    if let Err(err) = callback.call(&element) {
                        report(REF_ERROR, &err);
                    }
                }
                (name, Value::Function(callback)) if name.starts_with("on") => {
                    let event = name["on".len()..].to_lowercase();
                    self.host
                        .add_event_listener(&element, &event, callback.clone())?;
                }
                (name, value) => {
                    self.host
                        .set_attribute(&element, name, &value.to_attribute_string())?;
                }
            }
        }

        if let Some(children) = node.children() {
            let child = self.materialize_value(children, pass)?;
            self.host.append_child(&element, &child)?;
        }

        Ok(element)
    }

    fn materialize_component(
        &self,
        component: &ComponentType,
        props: Props,
        pass: &mut Pass<H::Node>,
    ) -> Result<H::Node, RenderError> {
        trace!(component = component.name(), "materializing component");

        let instance = component.instantiate(props)?;
        mount::before_mount(&instance, self.spawner.as_ref());

        let rendered = instance.render().map_err(|source| RenderError::Render {
            component: component.name(),
            source,
        })?;
        let node = self.materialize_value(&rendered, pass)?;
        let anchor = self.anchor(&node)?;

        mount::did_mount(&instance, self.spawner.as_ref());

        self.attachments
            .borrow_mut()
            .attach(anchor.clone(), instance.clone());
        pass.push((anchor, instance));

        Ok(node)
    }

    /// The node a component's instance is attached to. Fragments are emptied when inserted, so
    /// their first child stands in for them, and an empty one is given a placeholder child.
    fn anchor(&self, node: &H::Node) -> Result<H::Node, RenderError> {
        if !self.host.is_fragment(node) {
            return Ok(node.clone());
        }

        if let Some(first) = self.host.child_nodes(node).into_iter().next() {
            return Ok(first);
        }

        let placeholder = self.host.create_text("")?;
        self.host.append_child(node, &placeholder)?;
        Ok(placeholder)
    }
}

impl<H> Clone for Renderer<H>
where
    H: Host,
{
    fn clone(&self) -> Self {
        Self {
            host: self.host.clone(),
            spawner: Rc::clone(&self.spawner),
            attachments: Rc::clone(&self.attachments),
            config: self.config,
        }
    }
}

#[cfg(target_arch = "wasm32")]
impl Renderer<crate::dom::WebHost> {
    /// Renderer for the current window's document, running deferred work as microtasks.
    pub fn for_window() -> Result<Self, crate::error::HostError> {
        Ok(Self::new(
            crate::dom::WebHost::from_window()?,
            crate::scheduler::MicrotaskSpawner,
        ))
    }
}
