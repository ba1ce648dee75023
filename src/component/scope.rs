use std::{cell::RefCell, fmt, rc::Rc};

use tracing::trace;

use super::{Lifecycle, Phase};
use crate::{
    error::ComponentError,
    value::{Props, State, Value, CHILDREN},
};

struct Base {
    props: Props,
    state: State,
    lifecycle: Lifecycle,
}

/// Handle to the props, state and lifecycle of a component instance.
///
/// Cheap to clone, so it can be moved into futures returned from hooks and used to update state
/// once they resume.
#[derive(Clone)]
pub struct Scope {
    name: &'static str,
    base: Rc<RefCell<Base>>,
}

impl Scope {
    pub(crate) fn new(name: &'static str, props: Props, lifecycle: Lifecycle) -> Self {
        Self {
            name,
            base: Rc::new(RefCell::new(Base {
                props,
                state: State::new(),
                lifecycle,
            })),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The merged and validated props.
    pub fn props(&self) -> Props {
        self.base.borrow().props.clone()
    }

    /// A single prop, [`Value::Undefined`] when missing.
    pub fn prop(&self, name: &str) -> Value {
        self.base
            .borrow()
            .props
            .get(name)
            .cloned()
            .unwrap_or_default()
    }

    pub fn children(&self) -> Value {
        self.prop(CHILDREN)
    }

    pub fn state(&self) -> State {
        self.base.borrow().state.clone()
    }

    /// A single state entry, [`Value::Undefined`] when missing.
    pub fn state_value(&self, key: &str) -> Value {
        self.base
            .borrow()
            .state
            .get(key)
            .cloned()
            .unwrap_or_default()
    }

    /// Replace the state outright. This is how a constructor sets the initial state.
    pub fn assign_state(&self, state: State) {
        self.base.borrow_mut().state = state;
    }

    /// Shallowly merge `partial` into the state.
    ///
    /// Only allowed while mounting or once mounted. Neither case schedules a re-render: there is
    /// no update pipeline yet, so changes made after mount only show up in a later `render()`.
    pub fn set_state(&self, partial: State) -> Result<(), ComponentError> {
        let mut base = self.base.borrow_mut();

        match base.lifecycle.phase() {
            Phase::Unknown => Err(ComponentError::NotConstructed {
                component: self.name,
            }),
            Phase::Constructed => Err(ComponentError::StateOutsideMount {
                component: self.name,
            }),
            Phase::Mounting | Phase::Mounted => {
                let mut state = base.state.clone();
                state.extend(partial);
                base.state = state;

                trace!(component = self.name, "state updated");
                Ok(())
            }
        }
    }

    pub fn phase(&self) -> Phase {
        self.base.borrow().lifecycle.phase()
    }

    pub(crate) fn with_lifecycle<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Lifecycle) -> R,
    {
        f(&mut self.base.borrow_mut().lifecycle)
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let base = self.base.borrow();

        f.debug_struct("Scope")
            .field("name", &self.name)
            .field("phase", &base.lifecycle.phase())
            .field("props", &base.props)
            .field("state", &base.state)
            .finish()
    }
}
