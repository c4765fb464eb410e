//! Observer hooks fired by the engine during dispatch.

use crate::core::ExceptionHook;

/// One dispatch step as reported to the trace and undefined-event hooks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dispatch<'a> {
    /// Name of the state the event was dispatched against
    pub state: &'a str,
    pub event: &'a str,
    /// True when the event was served by the default fallback
    pub is_default: bool,
    /// True for events produced by an action rather than by the caller
    pub is_internal: bool,
}

/// Called before a matched event runs.
pub type TraceHook = Box<dyn FnMut(&Dispatch<'_>) + Send>;

/// Called when an event matches neither the current state nor a default.
pub type UndefinedHook = Box<dyn FnMut(&Dispatch<'_>) + Send>;

/// Called with `(new_state, old_state)` just before the state switches.
pub type StateChangeHook = Box<dyn FnMut(&str, &str) + Send>;

pub(crate) struct Hooks<C> {
    pub(crate) trace: Option<TraceHook>,
    pub(crate) state_change: Option<StateChangeHook>,
    pub(crate) undefined: Option<UndefinedHook>,
    pub(crate) exception: Option<ExceptionHook<C>>,
}

impl<C> Default for Hooks<C> {
    fn default() -> Self {
        Self {
            trace: None,
            state_change: None,
            undefined: None,
            exception: None,
        }
    }
}
