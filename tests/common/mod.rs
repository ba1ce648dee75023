#![allow(dead_code)]

use std::{cell::RefCell, fmt};

use futures::{channel::oneshot, executor::LocalPool};
use rstest::fixture;
use tessera::{
    component::validators,
    create_element,
    dom::{memory::NodeId, MemoryDocument},
    props, Component, ComponentType, Config, Effect, Props, Renderer, RenderError, Scope, Value,
};
use tracing::{
    dispatcher::DefaultGuard,
    field::{Field, Visit},
    Event, Level, Subscriber,
};
use tracing_subscriber::{
    layer::{Context, SubscriberExt},
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

thread_local! {
    static LOG: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
    static ERRORS: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
}

/// Record a lifecycle event for the current test.
pub fn log<S>(entry: S)
where
    S: Into<String>,
{
    LOG.with(|log| log.borrow_mut().push(entry.into()));
}

/// Everything logged so far, clearing the log.
pub fn take_log() -> Vec<String> {
    LOG.with(|log| log.borrow_mut().drain(..).collect())
}

/// Every error event logged on this thread so far, clearing them.
pub fn take_errors() -> Vec<String> {
    ERRORS.with(|errors| errors.borrow_mut().drain(..).collect())
}

/// Keeps the message of every error event, so tests can check what was reported.
struct ErrorCapture;

impl<S> Layer<S> for ErrorCapture
where
    S: Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() != Level::ERROR {
            return;
        }

        let mut message = Message(String::new());
        event.record(&mut message);
        ERRORS.with(|errors| errors.borrow_mut().push(message.0));
    }
}

struct Message(String);

impl Visit for Message {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{value:?}");
        }
    }
}

/// Install a subscriber for the current thread: formatted output filtered by `RUST_LOG`, plus
/// error capture for [`take_errors`].
pub fn init_tracing() -> DefaultGuard {
    take_errors();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_test_writer()
                .with_filter(EnvFilter::from_default_env()),
        )
        .with(ErrorCapture)
        .set_default()
}

pub struct Harness {
    pub pool: LocalPool,
    pub document: MemoryDocument,
    pub renderer: Renderer<MemoryDocument>,
    _tracing: DefaultGuard,
}

impl Harness {
    pub fn with_config(config: Config) -> Self {
        let tracing = init_tracing();
        take_log();

        let pool = LocalPool::new();
        let document = MemoryDocument::new();
        let renderer = Renderer::with_config(document.clone(), pool.spawner(), config);

        Self {
            pool,
            document,
            renderer,
            _tracing: tracing,
        }
    }

    pub fn render<V>(&self, children: V) -> Result<(), RenderError>
    where
        V: Into<Value>,
    {
        self.renderer.render(children, &self.document.body())
    }

    /// Run every deferred task that can make progress.
    pub fn flush(&mut self) {
        self.pool.run_until_stalled();
    }

    pub fn body(&self) -> NodeId {
        self.document.body()
    }

    pub fn body_children(&self) -> Vec<NodeId> {
        use tessera::dom::Host;

        self.document.child_nodes(&self.body())
    }

    pub fn text(&self) -> String {
        self.document.text_content(self.body())
    }
}

#[fixture]
pub fn harness() -> Harness {
    Harness::with_config(Config::default())
}

/// A gate that an `afterMount` hook waits on, passed to [`Recorder`] through its `gate` prop.
pub fn gate() -> (oneshot::Sender<()>, Value) {
    let (sender, receiver) = oneshot::channel();
    (sender, Value::object(RefCell::new(Some(receiver))))
}

/// Component logging every step of its mount as `<name>:<step>`. Renders a `div` with its name
/// as `id` around its children.
pub struct Recorder;

impl Component for Recorder {
    fn create(scope: &Scope) -> anyhow::Result<Self> {
        log(format!("{}:constructor", name(scope)));
        Ok(Self)
    }

    fn render(&self, scope: &Scope) -> anyhow::Result<Value> {
        log(format!("{}:render", name(scope)));

        let mut props = props! { "id" => name(scope) };
        if let children @ (Value::Array(_) | Value::Node(_) | Value::String(_)) = scope.children() {
            props.insert("children".into(), children);
        }

        Ok(create_element("div", props, vec![]).into())
    }

    fn prop_types() -> tessera::component::PropTypes {
        [("name".to_string(), validators::string().required())]
            .into_iter()
            .collect()
    }

    fn before_mount(&mut self, scope: &Scope) -> Option<Effect> {
        log(format!("{}:beforeMount", name(scope)));
        Some(Effect::done())
    }

    fn did_mount(&mut self, scope: &Scope) -> Option<Effect> {
        log(format!("{}:didMount", name(scope)));
        Some(Effect::done())
    }

    fn after_mount(&mut self, scope: &Scope) -> Option<Effect> {
        let name = name(scope);
        log(format!("{name}:afterMount"));

        let receiver = scope
            .prop("gate")
            .downcast_ref::<RefCell<Option<oneshot::Receiver<()>>>>()
            .and_then(|gate| gate.borrow_mut().take());

        let effect = match receiver {
            Some(receiver) => Effect::future(async move {
                receiver.await?;
                log(format!("{name}:afterMount settled"));
                Ok(())
            }),
            None => Effect::done(),
        };
        Some(effect)
    }
}

fn name(scope: &Scope) -> String {
    scope.prop("name").as_str().unwrap_or_default().to_string()
}

pub fn recorder(props: Props) -> Value {
    create_element(ComponentType::of::<Recorder>(), props, vec![]).into()
}
