//! A small component runtime. Virtual node trees are materialized into a DOM, with class-style
//! components driven through a single mount: construction, `beforeMount`, `render`, `didMount`,
//! insertion into the document, then `afterMount` from a deferred pass over the inserted nodes.
//!
//! ```
//! use futures::executor::LocalPool;
//! use tessera::{dom::MemoryDocument, jsx::jsxs, props, Renderer};
//!
//! let mut pool = LocalPool::new();
//! let document = MemoryDocument::new();
//! let renderer = Renderer::new(document.clone(), pool.spawner());
//!
//! let list = jsxs("ul", props! { "children" => vec!["A", "B"] }, None);
//! renderer.render(list, &document.body()).unwrap();
//! pool.run_until_stalled();
//!
//! assert_eq!(document.text_content(document.body()), "AB");
//! ```

pub mod component;
pub mod config;
pub mod dom;
pub mod error;
pub mod jsx;
pub mod render;
mod report;
pub mod scheduler;
pub mod value;
pub mod vnode;

pub use component::{Component, ComponentType, Effect, Hook, Instance, Phase, Scope};
pub use config::Config;
pub use error::{ComponentError, HostError, RenderError};
pub use jsx::{fragment, jsx, jsx_dev, jsxs, Fragment};
pub use render::Renderer;
pub use value::{Props, State, Value};
pub use vnode::{create_element, ElementType, VNode};

/// Send panics to the browser console.
#[cfg(target_arch = "wasm32")]
pub fn init() {
    std::panic::set_hook(Box::new(console_error_panic_hook::hook));
}
