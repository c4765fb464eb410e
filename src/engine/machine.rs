//! Machine that dispatches named events against a transition table.

use crate::builder::BuildError;
use crate::core::{
    Action, ActionError, ActionResult, Continuation, EventNode, ExceptionHook, Matched, StateId,
    Table,
};
use crate::engine::hooks::{Dispatch, Hooks};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// A running state machine.
///
/// The machine owns its context and passes it as the leading argument to
/// every action, so actions bound to one machine share one context value.
/// A machine is not reentrant: `handle` takes `&mut self` and runs a whole
/// continuation chain before returning.
pub struct Machine<C> {
    table: Arc<Table<C>>,
    current: StateId,
    context: C,
    hooks: Hooks<C>,
}

impl<C> Machine<C> {
    /// Create a machine in the table's entry state.
    pub fn new(table: Arc<Table<C>>, context: C) -> Self {
        let current = table.initial();
        Self {
            table,
            current,
            context,
            hooks: Hooks::default(),
        }
    }

    /// Name of the current state.
    pub fn state(&self) -> &str {
        self.table.state(self.current).name()
    }

    /// Move to `name` without running any hooks.
    pub fn set_state(&mut self, name: &str) -> Result<(), BuildError> {
        self.current = self.table.find(name).ok_or_else(|| BuildError::UnknownState {
            state: name.to_string(),
        })?;
        Ok(())
    }

    /// The shared transition table.
    pub fn table(&self) -> &Arc<Table<C>> {
        &self.table
    }

    /// The context every action receives.
    pub fn context(&self) -> &C {
        &self.context
    }

    /// Mutable access to the context between dispatches.
    pub fn context_mut(&mut self) -> &mut C {
        &mut self.context
    }

    /// Stop the machine and hand back its context.
    pub fn into_context(self) -> C {
        self.context
    }

    /// Called before every matched event, internal ones included.
    pub fn set_trace_hook<F>(&mut self, hook: F)
    where
        F: FnMut(&Dispatch<'_>) + Send + 'static,
    {
        self.hooks.trace = Some(Box::new(hook));
    }

    /// Called with the old and new state names after each transition.
    pub fn set_state_change_hook<F>(&mut self, hook: F)
    where
        F: FnMut(&str, &str) + Send + 'static,
    {
        self.hooks.state_change = Some(Box::new(hook));
    }

    /// Called when an event matches neither the state nor a default.
    pub fn set_undefined_hook<F>(&mut self, hook: F)
    where
        F: FnMut(&Dispatch<'_>) + Send + 'static,
    {
        self.hooks.undefined = Some(Box::new(hook));
    }

    /// Route errors raised by actions to `hook` instead of the caller.
    ///
    /// Replaces any hook installed earlier, including one declared with
    /// `EXCEPTION` in a description.
    pub fn set_exception_hook<F>(&mut self, hook: F)
    where
        F: Fn(&mut C, &ActionError) -> Continuation + Send + Sync + 'static,
    {
        self.hooks.exception = Some(Arc::new(hook));
    }

    pub(crate) fn install_exception_hook(&mut self, hook: ExceptionHook<C>) {
        self.hooks.exception = Some(hook);
    }

    /// Whether action errors are routed to a hook.
    pub fn has_exception_hook(&self) -> bool {
        self.hooks.exception.is_some()
    }

    /// Dispatch `event` with `args`, following internal events to the end.
    ///
    /// Returns `Ok(false)` when an event in the chain matches neither the
    /// current state nor a default; the current state is left as it was at
    /// that point. Errors raised by actions are passed to the exception hook
    /// if one is installed, otherwise returned unchanged.
    pub fn handle(&mut self, event: &str, args: &[Value]) -> Result<bool, ActionError> {
        let table = Arc::clone(&self.table);
        let mut event = event.to_string();
        let mut args = Some(args);
        let mut is_internal = false;

        loop {
            let state = table.state(self.current).name();
            let Some((node, matched)) = table.lookup(self.current, &event) else {
                tracing::debug!(state, event = %event, internal = is_internal, "unhandled event");
                if let Some(hook) = self.hooks.undefined.as_mut() {
                    hook(&Dispatch {
                        state,
                        event: &event,
                        is_default: false,
                        is_internal,
                    });
                }
                return Ok(false);
            };

            let is_default = matched == Matched::Default;
            tracing::trace!(state, event = %event, default = is_default, internal = is_internal, "dispatch");
            if let Some(hook) = self.hooks.trace.as_mut() {
                hook(&Dispatch {
                    state,
                    event: &event,
                    is_default,
                    is_internal,
                });
            }

            let next = match self.fire(&table, node, &mut args) {
                Ok(next) => next,
                Err(err) => match &self.hooks.exception {
                    Some(hook) => {
                        tracing::debug!(error = %err, event = %event, "action failed, routed to exception hook");
                        hook(&mut self.context, &err)
                    }
                    None => return Err(err),
                },
            };

            match next {
                Continuation::Stop => return Ok(true),
                Continuation::Next(following) => {
                    event = following;
                    is_internal = true;
                }
            }
        }
    }

    /// Run one matched event: its actions, then the transition if it has one.
    fn fire(
        &mut self,
        table: &Table<C>,
        node: &EventNode<C>,
        args: &mut Option<&[Value]>,
    ) -> ActionResult {
        let mut next = Continuation::Stop;
        for action in &node.actions {
            next = next.supersede(self.invoke(action, args)?);
        }

        let Some(target) = node.next else {
            return Ok(next);
        };

        let from = self.current;
        if let Some(exit) = &table.state(from).exit {
            next = next.supersede(self.invoke(exit, args)?);
        }

        let (old, new) = (table.state(from).name(), table.state(target).name());
        tracing::debug!(from = old, to = new, "state change");
        if let Some(hook) = self.hooks.state_change.as_mut() {
            hook(new, old);
        }
        self.current = target;

        if let Some(enter) = &table.state(target).enter {
            next = next.supersede(self.invoke(enter, args)?);
        }
        Ok(next)
    }

    /// Call `action`, handing over the caller's arguments only once per `handle`.
    fn invoke(&mut self, action: &Action<C>, args: &mut Option<&[Value]>) -> ActionResult {
        action(&mut self.context, args.take().unwrap_or(&[]))
    }
}

impl<C: fmt::Debug> fmt::Debug for Machine<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Machine")
            .field("state", &self.state())
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}
