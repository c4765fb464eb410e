//! Uniform callable signatures shared by user machines and the grammar.
//!
//! Every action, whether it is an event action or an enter/exit hook, has the
//! same shape: it receives the machine's context and an ordered argument list
//! and answers with a [`Continuation`].

use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Error raised by user code inside an action or a context factory.
pub type ActionError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Outcome of running one action.
pub type ActionResult = Result<Continuation, ActionError>;

/// A named callable invoked during a transition.
pub type Action<C> = Arc<dyn Fn(&mut C, &[Value]) -> ActionResult + Send + Sync>;

/// Converts an error raised during dispatch into a continuation.
pub type ExceptionHook<C> = Arc<dyn Fn(&mut C, &ActionError) -> Continuation + Send + Sync>;

/// Creates a machine context from constructor arguments.
pub type ContextFactory<C> = Arc<dyn Fn(&[Value]) -> Result<C, ActionError> + Send + Sync>;

/// Action callables keyed by the names used in a description.
pub type ActionMap<C> = HashMap<String, Action<C>>;

/// What the engine should do after an action returns.
///
/// # Example
///
/// ```rust
/// use fsm_table::core::Continuation;
///
/// let next = Continuation::next("timeout");
/// assert_eq!(next.event(), Some("timeout"));
/// assert!(Continuation::Stop.is_stop());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Continuation {
    /// No further event is produced
    #[default]
    Stop,

    /// Dispatch this event next, as an internal event
    Next(String),
}

impl Continuation {
    /// Continue with the named event.
    pub fn next(event: impl Into<String>) -> Self {
        Self::Next(event.into())
    }

    /// True when no further event follows.
    pub fn is_stop(&self) -> bool {
        matches!(self, Self::Stop)
    }

    /// Name of the next event, if any.
    pub fn event(&self) -> Option<&str> {
        match self {
            Self::Stop => None,
            Self::Next(event) => Some(event),
        }
    }

    /// Keep `self` unless `later` names an event.
    pub(crate) fn supersede(self, later: Continuation) -> Continuation {
        match later {
            Self::Stop => self,
            next => next,
        }
    }
}

impl From<Option<String>> for Continuation {
    fn from(event: Option<String>) -> Self {
        event.map_or(Self::Stop, Self::Next)
    }
}

impl From<&str> for Continuation {
    fn from(event: &str) -> Self {
        Self::Next(event.to_string())
    }
}

/// Wrap a closure as an [`Action`].
///
/// # Example
///
/// ```rust
/// use fsm_table::core::{action, Continuation};
/// use serde_json::Value;
///
/// let count = action(|n: &mut u32, _args: &[Value]| {
///     *n += 1;
///     Ok(Continuation::Stop)
/// });
///
/// let mut n = 0;
/// count(&mut n, &[]).unwrap();
/// assert_eq!(n, 1);
/// ```
pub fn action<C, F>(f: F) -> Action<C>
where
    F: Fn(&mut C, &[Value]) -> ActionResult + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Wrap a closure as an [`ExceptionHook`].
pub fn exception_hook<C, F>(f: F) -> ExceptionHook<C>
where
    F: Fn(&mut C, &ActionError) -> Continuation + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Wrap a closure as a [`ContextFactory`].
pub fn context_factory<C, F>(f: F) -> ContextFactory<C>
where
    F: Fn(&[Value]) -> Result<C, ActionError> + Send + Sync + 'static,
{
    Arc::new(f)
}
