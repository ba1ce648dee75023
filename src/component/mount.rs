//! Executors for the mount hooks. Each runs a single phase for a single instance, and none of them
//! lets a hook failure escape: failures are reported and mounting carries on.
//!
//! The executors deliberately differ in how they treat asynchronous hooks. `beforeMount` and
//! `didMount` futures are spawned and never waited on, as they run before the DOM is in the
//! document. `afterMount` futures are awaited, so that the post-insertion pass only completes
//! once every hook in the tree has settled.

use futures::task::LocalSpawn;
use tracing::trace;

use super::{Effect, Hook, Instance, Lifecycle};
use crate::{report::report, scheduler::spawn_detached};

pub const BEFORE_MOUNT_ERROR: &str = "beforeMount() error:";
pub const DID_MOUNT_ERROR: &str = "didMount() error:";
pub const ASYNC_DID_MOUNT_ERROR: &str = "Async didMount() error:";
pub const AFTER_MOUNT_ERROR: &str = "afterMount() error:";

/// Check whether `hook` can run, marking it consumed if so.
fn claim(instance: &Instance, hook: Hook) -> bool {
    instance.scope().with_lifecycle(|lifecycle| {
        let invocable = lifecycle.can_invoke(hook);
        if invocable {
            lifecycle.mark_consumed(hook);
        }
        invocable
    })
}

/// Claim and invoke `hook`. `None` when it already ran or the component does not define it.
fn invoke(instance: &Instance, hook: Hook) -> Option<Effect> {
    if !claim(instance, hook) {
        return None;
    }

    let effect = instance.call(hook);
    if effect.is_some() {
        trace!(component = instance.name(), "{}", hook.name());
    }
    effect
}

/// Run `beforeMount` within the mounting phase.
pub fn before_mount(instance: &Instance, spawner: &dyn LocalSpawn) {
    instance.scope().with_lifecycle(Lifecycle::enter_mount);

    match invoke(instance, Hook::BeforeMount) {
        None | Some(Effect::Ready(Ok(()))) => (),
        Some(Effect::Ready(Err(err))) => report(BEFORE_MOUNT_ERROR, &err),
        Some(Effect::Pending(future)) => spawn_detached(spawner, BEFORE_MOUNT_ERROR, future),
    }

    instance.scope().with_lifecycle(Lifecycle::exit_mount);
}

/// Run `didMount`, then mark the instance as mounted. The instance counts as mounted as soon as
/// the hook returns, even if it continues asynchronously, failed or is not defined.
pub fn did_mount(instance: &Instance, spawner: &dyn LocalSpawn) {
    let effect = invoke(instance, Hook::DidMount);

    instance.scope().with_lifecycle(Lifecycle::mark_mounted);

    match effect {
        None | Some(Effect::Ready(Ok(()))) => (),
        Some(Effect::Ready(Err(err))) => report(DID_MOUNT_ERROR, &err),
        Some(Effect::Pending(future)) => spawn_detached(spawner, ASYNC_DID_MOUNT_ERROR, future),
    }
}

/// Run `afterMount`, waiting for it to settle if it continues asynchronously.
pub async fn after_mount(instance: &Instance) {
    // The component must not stay borrowed across the await
    let result = match invoke(instance, Hook::AfterMount) {
        None => return,
        Some(Effect::Ready(result)) => result,
        Some(Effect::Pending(future)) => future.await,
    };

    if let Err(err) = result {
        report(AFTER_MOUNT_ERROR, &err);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use anyhow::anyhow;
    use futures::executor::{block_on, LocalPool};

    use super::*;
    use crate::{
        component::{Component, ComponentType, Phase, Scope},
        props,
        value::Value,
    };

    thread_local! {
        static CALLS: RefCell<Vec<&'static str>> = const { RefCell::new(Vec::new()) };
    }

    fn calls() -> Vec<&'static str> {
        CALLS.with(|calls| calls.borrow_mut().drain(..).collect())
    }

    fn record(call: &'static str) {
        CALLS.with(|calls| calls.borrow_mut().push(call));
    }

    struct Failing;

    impl Component for Failing {
        fn create(_scope: &Scope) -> anyhow::Result<Self> {
            Ok(Self)
        }

        fn render(&self, _scope: &Scope) -> anyhow::Result<Value> {
            Ok(Value::Null)
        }

        fn before_mount(&mut self, scope: &Scope) -> Option<Effect> {
            record("beforeMount");
            assert_eq!(scope.phase(), Phase::Mounting);
            Some(Effect::Ready(Err(anyhow!("before"))))
        }

        fn did_mount(&mut self, _scope: &Scope) -> Option<Effect> {
            record("didMount");
            Some(Effect::future(async { Err(anyhow!("later")) }))
        }

        fn after_mount(&mut self, _scope: &Scope) -> Option<Effect> {
            record("afterMount");
            Some(Effect::future(async { Err(anyhow!("after")) }))
        }
    }

    struct Plain;

    impl Component for Plain {
        fn create(_scope: &Scope) -> anyhow::Result<Self> {
            Ok(Self)
        }

        fn render(&self, _scope: &Scope) -> anyhow::Result<Value> {
            Ok(Value::Null)
        }
    }

    struct Late;

    impl Component for Late {
        fn create(_scope: &Scope) -> anyhow::Result<Self> {
            Ok(Self)
        }

        fn render(&self, _scope: &Scope) -> anyhow::Result<Value> {
            Ok(Value::Null)
        }

        fn after_mount(&mut self, _scope: &Scope) -> Option<Effect> {
            record("late afterMount");
            Some(Effect::done())
        }
    }

    #[test]
    fn failures_do_not_escape_and_hooks_run_once() {
        let mut pool = LocalPool::new();
        let spawner = pool.spawner();
        calls();
        let instance = ComponentType::of::<Failing>().instantiate(props! {}).unwrap();

        before_mount(&instance, &spawner);
        assert_eq!(instance.phase(), Phase::Constructed);

        did_mount(&instance, &spawner);
        assert_eq!(instance.phase(), Phase::Mounted);
        pool.run_until_stalled();

        block_on(after_mount(&instance));

        // A second pass must not re-fire anything
        before_mount(&instance, &spawner);
        did_mount(&instance, &spawner);
        block_on(after_mount(&instance));

        assert_eq!(calls(), ["beforeMount", "didMount", "afterMount"]);
    }

    #[test]
    fn missing_hooks_still_mount() {
        let spawner = LocalPool::new().spawner();
        let instance = ComponentType::of::<Plain>().instantiate(props! {}).unwrap();

        before_mount(&instance, &spawner);
        assert_eq!(instance.phase(), Phase::Constructed);

        did_mount(&instance, &spawner);
        block_on(after_mount(&instance));

        assert_eq!(instance.phase(), Phase::Mounted);
        assert!(instance.scope().with_lifecycle(|lifecycle| {
            !lifecycle.can_invoke(Hook::BeforeMount)
                && !lifecycle.can_invoke(Hook::DidMount)
                && !lifecycle.can_invoke(Hook::AfterMount)
        }));
    }

    #[test]
    fn a_single_defined_hook_runs() {
        calls();
        let spawner = LocalPool::new().spawner();
        let instance = ComponentType::of::<Late>().instantiate(props! {}).unwrap();

        before_mount(&instance, &spawner);
        did_mount(&instance, &spawner);
        block_on(after_mount(&instance));
        block_on(after_mount(&instance));

        assert_eq!(calls(), ["late afterMount"]);
    }

    #[test]
    fn state_set_while_mounting_is_kept() {
        struct Counter;

        impl Component for Counter {
            fn create(_scope: &Scope) -> anyhow::Result<Self> {
                Ok(Self)
            }

            fn render(&self, scope: &Scope) -> anyhow::Result<Value> {
                Ok(scope.state_value("count"))
            }

            fn before_mount(&mut self, scope: &Scope) -> Option<Effect> {
                Some(Effect::Ready(
                    scope
                        .set_state(props! { "count" => 1 })
                        .map_err(anyhow::Error::from),
                ))
            }
        }

        let spawner = LocalPool::new().spawner();
        let instance = ComponentType::of::<Counter>().instantiate(props! {}).unwrap();

        before_mount(&instance, &spawner);

        assert_eq!(instance.render().unwrap(), Value::from(1));
    }
}
