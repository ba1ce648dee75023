use std::{any::Any, fmt, rc::Rc};

use anyhow::anyhow;

/// An event delivered to a listener registered through an `on*` prop.
pub struct Event {
    /// Event name as used by DOM listeners (eg `click`).
    kind: String,

    /// The host's own event object, if the host has one (eg [`web_sys::Event`]).
    native: Option<Box<dyn Any>>,
}

impl Event {
    pub fn new<S>(kind: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            kind: kind.into(),
            native: None,
        }
    }

    /// Create an event that carries the host's native event object alongside it.
    pub fn with_native<S, N>(kind: S, native: N) -> Self
    where
        S: Into<String>,
        N: 'static,
    {
        Self {
            kind: kind.into(),
            native: Some(Box::new(native)),
        }
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Attempt to access the native event as a concrete type.
    pub fn native<N>(&self) -> Option<&N>
    where
        N: 'static,
    {
        self.native.as_ref()?.downcast_ref()
    }
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("kind", &self.kind)
            .field("native", &self.native.is_some())
            .finish()
    }
}

type CallbackFn = dyn Fn(&dyn Any) -> anyhow::Result<()>;

/// A function-valued prop. The same type backs event handlers (called with an [`Event`]) and ref
/// callbacks (called with the host node), so the argument is passed type-erased.
#[derive(Clone)]
pub struct Callback(Rc<CallbackFn>);

impl Callback {
    pub fn new<F>(f: F) -> Self
    where
        F: 'static + Fn(&dyn Any) -> anyhow::Result<()>,
    {
        Self(Rc::new(f))
    }

    /// Build an event handler. Calling it with anything other than an [`Event`] is an error.
    pub fn event<F>(f: F) -> Self
    where
        F: 'static + Fn(&Event) -> anyhow::Result<()>,
    {
        Self::new(move |arg| {
            let event = arg
                .downcast_ref::<Event>()
                .ok_or_else(|| anyhow!("event handler called without an event"))?;
            f(event)
        })
    }

    /// Build a ref callback for hosts whose nodes are of type `N`.
    pub fn node<N, F>(f: F) -> Self
    where
        N: 'static,
        F: 'static + Fn(&N) -> anyhow::Result<()>,
    {
        Self::new(move |arg| {
            let node = arg.downcast_ref::<N>().ok_or_else(|| {
                anyhow!("ref callback expected a `{}`", std::any::type_name::<N>())
            })?;
            f(node)
        })
    }

    pub fn call(&self, arg: &dyn Any) -> anyhow::Result<()> {
        (self.0)(arg)
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Callback")
    }
}
