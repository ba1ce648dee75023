mod instance;
mod lifecycle;
pub mod mount;
mod scope;
pub mod validators;

use std::{fmt, future::Future};

use futures::{future::LocalBoxFuture, FutureExt};

pub use self::instance::{ComponentType, Instance};
pub use self::lifecycle::{Hook, Lifecycle, Phase};
pub use self::scope::Scope;
pub use self::validators::{PropTypes, Validator};
use crate::value::{Props, State, Value};

/// What a lifecycle hook produced.
pub enum Effect {
    /// The hook finished synchronously.
    Ready(anyhow::Result<()>),

    /// The hook continues asynchronously.
    Pending(LocalBoxFuture<'static, anyhow::Result<()>>),
}

impl Effect {
    pub fn done() -> Self {
        Effect::Ready(Ok(()))
    }

    pub fn future<F>(future: F) -> Self
    where
        F: 'static + Future<Output = anyhow::Result<()>>,
    {
        Effect::Pending(future.boxed_local())
    }
}

impl From<anyhow::Result<()>> for Effect {
    fn from(result: anyhow::Result<()>) -> Self {
        Effect::Ready(result)
    }
}

impl fmt::Debug for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Effect::Ready(result) => f.debug_tuple("Ready").field(result).finish(),
            Effect::Pending(_) => f.write_str("Pending"),
        }
    }
}

/// A stateful component.
///
/// Only [`Component::create`] and [`Component::render`] are required. A mount hook is defined by
/// overriding it to return `Some`; the default `None` means the component has no such hook. Each
/// hook runs at most once per instance.
pub trait Component: 'static {
    /// Build the component from its scope, which already holds the merged and validated props.
    /// The initial state is set with [`Scope::assign_state`]; [`Scope::set_state`] fails here.
    fn create(scope: &Scope) -> anyhow::Result<Self>
    where
        Self: Sized;

    /// Describe the UI for the current props and state.
    fn render(&self, scope: &Scope) -> anyhow::Result<Value>;

    fn name() -> &'static str
    where
        Self: Sized,
    {
        let path = std::any::type_name::<Self>();
        let path = path.split('<').next().unwrap_or(path);
        path.rsplit("::").next().unwrap_or(path)
    }

    /// Props used wherever the caller did not supply one.
    fn default_props() -> Props
    where
        Self: Sized,
    {
        Props::new()
    }

    fn prop_types() -> PropTypes
    where
        Self: Sized,
    {
        PropTypes::new()
    }

    /// Runs before the first render. A returned future is spawned and never waited on.
    fn before_mount(&mut self, _scope: &Scope) -> Option<Effect> {
        None
    }

    /// Runs once the DOM for the component exists, before it is inserted into the document.
    fn did_mount(&mut self, _scope: &Scope) -> Option<Effect> {
        None
    }

    /// Runs after the DOM was inserted into the document. A returned future is awaited by the
    /// post-insertion pass.
    fn after_mount(&mut self, _scope: &Scope) -> Option<Effect> {
        None
    }

    // Update hooks. There is no update pipeline yet, so these are never invoked.

    fn before_update(&mut self, _scope: &Scope) -> Option<Effect> {
        None
    }

    fn after_update(&mut self, _scope: &Scope) -> Option<Effect> {
        None
    }

    fn should_update(&self, _scope: &Scope, _next_props: &Props, _next_state: &State) -> bool {
        true
    }
}
