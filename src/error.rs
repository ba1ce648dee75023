use futures::task::SpawnError;
use thiserror::Error;

/// Errors raised while constructing or mutating a component instance. These are programmer
/// errors, so they propagate to whoever is rendering instead of being logged and swallowed.
#[derive(Debug, Error)]
pub enum ComponentError {
    /// A prop validator rejected the value supplied for `prop`.
    #[error("invalid prop `{prop}` supplied to `{component}`: {reason}")]
    InvalidProp {
        component: &'static str,
        prop: String,
        reason: String,
    },

    /// The same lifecycle record was constructed twice.
    #[error("`{component}` was constructed more than once")]
    AlreadyConstructed { component: &'static str },

    /// State was modified before the instance finished constructing.
    #[error("setState() called on `{component}` before its constructor completed")]
    NotConstructed { component: &'static str },

    /// State was modified outside of a mount phase (most often from within the constructor).
    #[error(
        "setState() called on `{component}` outside of a mount phase; \
         assign the initial state directly in the constructor instead"
    )]
    StateOutsideMount { component: &'static str },

    /// The component's own constructor failed.
    #[error("failed to construct `{component}`")]
    Create {
        component: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

/// Failure reported by a [`crate::dom::Host`] while manipulating nodes.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct HostError(pub String);

impl HostError {
    pub fn new<S>(message: S) -> Self
    where
        S: Into<String>,
    {
        Self(message.into())
    }

    /// Converts a thrown JS value into an error, keeping its message where there is one.
    pub fn from_js(value: wasm_bindgen::JsValue) -> Self {
        Self(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

/// Errors that abort rendering of a subtree.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Component(#[from] ComponentError),

    /// `render()` of a component returned an error.
    #[error("`{component}` failed to render")]
    Render {
        component: &'static str,
        #[source]
        source: anyhow::Error,
    },

    #[error("host operation failed: {0}")]
    Host(#[from] HostError),

    /// The post-insertion pass could not be handed to the spawner.
    #[error("failed to schedule the post-insertion pass")]
    Spawn(#[from] SpawnError),
}
