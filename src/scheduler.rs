//! Deferred work. Anything that must not run before the current call returns (the post-insertion
//! pass, fire-and-forget hook futures) is handed to a [`LocalSpawn`] implementation.

use std::rc::Rc;

use futures::{
    future::LocalBoxFuture,
    task::{LocalSpawn, LocalSpawnExt},
};
use tracing::warn;

use crate::report::report;

/// Shared spawner, as held by the renderer.
pub type SpawnerRef = Rc<dyn LocalSpawn>;

/// Spawn a hook's future without waiting on it. A failure is reported under `tag`.
pub(crate) fn spawn_detached(
    spawner: &dyn LocalSpawn,
    tag: &'static str,
    future: LocalBoxFuture<'static, anyhow::Result<()>>,
) {
    let task = async move {
        if let Err(err) = future.await {
            report(tag, &err);
        }
    };

    if let Err(err) = spawner.spawn_local(task) {
        warn!("dropping hook future, spawner is unavailable: {err}");
    }
}

#[cfg(target_arch = "wasm32")]
pub use self::microtask::MicrotaskSpawner;

#[cfg(target_arch = "wasm32")]
mod microtask {
    use futures::{
        future::LocalFutureObj,
        task::{LocalSpawn, SpawnError},
    };

    /// Runs spawned futures on the browser's microtask queue, once the current call stack has
    /// unwound.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct MicrotaskSpawner;

    impl LocalSpawn for MicrotaskSpawner {
        fn spawn_local_obj(&self, future: LocalFutureObj<'static, ()>) -> Result<(), SpawnError> {
            wasm_bindgen_futures::spawn_local(future);
            Ok(())
        }
    }
}
