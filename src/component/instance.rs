use std::{any::TypeId, cell::RefCell, fmt, rc::Rc};

use super::{Component, Effect, Hook, Lifecycle, Phase, PropTypes, Scope};
use crate::{
    error::ComponentError,
    value::{Props, Value},
};

type CreateFn = fn(&Scope) -> anyhow::Result<Box<dyn Component>>;

fn create_boxed<C>(scope: &Scope) -> anyhow::Result<Box<dyn Component>>
where
    C: Component,
{
    Ok(Box::new(C::create(scope)?))
}

/// Describes a [`Component`] implementation, so that it can be placed in a
/// [`crate::VNode`] and instantiated later.
#[derive(Clone, Copy)]
pub struct ComponentType {
    id: TypeId,
    name: &'static str,
    default_props: fn() -> Props,
    prop_types: fn() -> PropTypes,
    create: CreateFn,
}

impl ComponentType {
    pub fn of<C>() -> Self
    where
        C: Component,
    {
        Self {
            id: TypeId::of::<C>(),
            name: C::name(),
            default_props: C::default_props,
            prop_types: C::prop_types,
            create: create_boxed::<C>,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Merge the default props under `props`, then run every validator over the result.
    pub fn resolve_props(&self, props: Props) -> Result<Props, ComponentError> {
        let mut merged = (self.default_props)();
        merged.extend(props);

        for (prop, validator) in (self.prop_types)() {
            let value = merged.get(&prop).cloned().unwrap_or_default();

            if let Some(reason) = validator.validate(&value, &prop, self.name) {
                return Err(ComponentError::InvalidProp {
                    component: self.name,
                    prop,
                    reason,
                });
            }
        }

        Ok(merged)
    }

    /// Construct a new instance of the component.
    pub fn instantiate(&self, props: Props) -> Result<Instance, ComponentError> {
        let mut lifecycle = Lifecycle::new(self.name);
        lifecycle.begin_construction()?;

        let props = self.resolve_props(props)?;
        lifecycle.finish_construction();

        let scope = Scope::new(self.name, props, lifecycle);
        let component = (self.create)(&scope).map_err(|source| {
            // Errors from the runtime itself (eg `set_state` misuse) are surfaced as they are
            match source.downcast::<ComponentError>() {
                Ok(err) => err,
                Err(source) => ComponentError::Create {
                    component: self.name,
                    source,
                },
            }
        })?;

        Ok(Instance(Rc::new(InstanceData {
            scope,
            component: RefCell::new(component),
        })))
    }
}

impl PartialEq for ComponentType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ComponentType {}

impl fmt::Debug for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentType")
            .field("name", &self.name)
            .finish()
    }
}

struct InstanceData {
    scope: Scope,
    component: RefCell<Box<dyn Component>>,
}

/// A live component, created by materialization.
#[derive(Clone)]
pub struct Instance(Rc<InstanceData>);

impl Instance {
    pub fn name(&self) -> &'static str {
        self.0.scope.name()
    }

    pub fn scope(&self) -> &Scope {
        &self.0.scope
    }

    pub fn phase(&self) -> Phase {
        self.0.scope.phase()
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn render(&self) -> anyhow::Result<Value> {
        self.0.component.borrow().render(&self.0.scope)
    }

    /// Invoke a mount hook, or `None` if the component does not define it. Guarding and marking
    /// it consumed is left to the caller.
    pub(crate) fn call(&self, hook: Hook) -> Option<Effect> {
        let mut component = self.0.component.borrow_mut();
        let scope = &self.0.scope;

        match hook {
            Hook::BeforeMount => component.before_mount(scope),
            Hook::DidMount => component.did_mount(scope),
            Hook::AfterMount => component.after_mount(scope),
        }
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("name", &self.name())
            .field("phase", &self.phase())
            .finish()
    }
}
