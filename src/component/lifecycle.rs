use crate::error::ComponentError;

/// The optional mount hooks a component can define.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hook {
    BeforeMount,
    DidMount,
    AfterMount,
}

impl Hook {
    fn index(self) -> usize {
        match self {
            Hook::BeforeMount => 0,
            Hook::DidMount => 1,
            Hook::AfterMount => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Hook::BeforeMount => "beforeMount",
            Hook::DidMount => "didMount",
            Hook::AfterMount => "afterMount",
        }
    }
}

/// Where an instance is in its mount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Construction has not completed.
    Unknown,

    /// Constructed, and not within a mount phase.
    Constructed,

    /// `beforeMount` is running. State can change, but nothing is scheduled because of it.
    Mounting,

    /// The `didMount` phase has completed.
    Mounted,
}

/// Phase tracking for a single component instance.
#[derive(Debug)]
pub struct Lifecycle {
    component: &'static str,

    /// Set as soon as construction begins, to catch a second construction of the same record.
    construction_started: bool,

    phase: Phase,

    /// Hooks that have already been invoked, indexed by [`Hook::index`].
    consumed: [bool; 3],
}

impl Lifecycle {
    pub fn new(component: &'static str) -> Self {
        Self {
            component,
            construction_started: false,
            phase: Phase::Unknown,
            consumed: [false; 3],
        }
    }

    pub fn begin_construction(&mut self) -> Result<(), ComponentError> {
        if self.construction_started {
            return Err(ComponentError::AlreadyConstructed {
                component: self.component,
            });
        }

        self.construction_started = true;
        Ok(())
    }

    pub fn finish_construction(&mut self) {
        debug_assert!(self.construction_started, "construction was never started");

        if self.phase == Phase::Unknown {
            self.phase = Phase::Constructed;
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn component(&self) -> &'static str {
        self.component
    }

    /// Whether `hook` has not been invoked yet. A component that does not define the hook still
    /// consumes it on first invocation.
    pub fn can_invoke(&self, hook: Hook) -> bool {
        !self.consumed[hook.index()]
    }

    pub fn mark_consumed(&mut self, hook: Hook) {
        self.consumed[hook.index()] = true;
    }

    pub fn enter_mount(&mut self) {
        if self.phase == Phase::Constructed {
            self.phase = Phase::Mounting;
        }
    }

    pub fn exit_mount(&mut self) {
        if self.phase == Phase::Mounting {
            self.phase = Phase::Constructed;
        }
    }

    pub fn mark_mounted(&mut self) {
        if self.phase != Phase::Unknown {
            self.phase = Phase::Mounted;
        }
    }
}
