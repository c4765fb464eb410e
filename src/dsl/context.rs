//! Parse context threaded through the directive actions.

use crate::core::{ActionMap, ContextFactory, Description, EventDecl, ExceptionHook, StateDecl};
use crate::dsl::parser::Parsed;
use crate::dsl::resolver::SymbolResolver;
use std::fmt;
use std::sync::Arc;

/// The event ACTION directives append to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum EventCursor {
    State { state: usize, event: usize },
    Default(usize),
}

/// Mutable accumulator for one parse.
///
/// The directive interpreter owns exactly one of these as the context of its
/// grammar machine, so every semantic action receives it as its leading
/// argument. It is created fresh per parse and consumed by
/// [`DirectiveInterpreter::finish`](crate::dsl::DirectiveInterpreter::finish).
pub struct ParseContext<C> {
    pub(crate) description: Description,
    pub(crate) state: Option<usize>,
    pub(crate) event: Option<EventCursor>,
    line: String,
    line_num: usize,
    pub(crate) resolver: Arc<dyn SymbolResolver<C>>,
    pub(crate) factory: Option<ContextFactory<C>>,
    pub(crate) handlers: ActionMap<C>,
    pub(crate) exception: Option<ExceptionHook<C>>,
}

impl<C> ParseContext<C> {
    pub fn new(resolver: Arc<dyn SymbolResolver<C>>) -> Self {
        Self {
            description: Description::new(),
            state: None,
            event: None,
            line: String::new(),
            line_num: 0,
            resolver,
            factory: None,
            handlers: ActionMap::new(),
            exception: None,
        }
    }

    /// Set the arguments of the directive about to be dispatched.
    pub fn set_line(&mut self, line_num: usize, line: &str) {
        self.line_num = line_num;
        self.line = line.to_string();
    }

    /// Arguments of the current directive, keyword removed.
    pub fn line(&self) -> &str {
        &self.line
    }

    /// 1-based number of the current directive's source line.
    pub fn line_num(&self) -> usize {
        self.line_num
    }

    pub(crate) fn tokens(&self) -> Vec<&str> {
        self.line.split_whitespace().collect()
    }

    pub fn description(&self) -> &Description {
        &self.description
    }

    /// The state under construction.
    pub fn active_state(&self) -> Option<&StateDecl> {
        self.state.and_then(|i| self.description.states.get(i))
    }

    pub(crate) fn active_state_mut(&mut self) -> Option<&mut StateDecl> {
        self.state.and_then(|i| self.description.states.get_mut(i))
    }

    /// The event or default event under construction.
    pub fn active_event(&self) -> Option<&EventDecl> {
        match self.event? {
            EventCursor::State { state, event } => self
                .description
                .states
                .get(state)
                .and_then(|s| s.events.get(event)),
            EventCursor::Default(i) => self.description.defaults.get(i),
        }
    }

    pub(crate) fn active_event_mut(&mut self) -> Option<&mut EventDecl> {
        match self.event? {
            EventCursor::State { state, event } => self
                .description
                .states
                .get_mut(state)
                .and_then(|s| s.events.get_mut(event)),
            EventCursor::Default(i) => self.description.defaults.get_mut(i),
        }
    }

    pub(crate) fn into_parsed(self) -> Parsed<C> {
        Parsed::new(self.description, self.factory, self.handlers, self.exception)
    }
}

impl<C> fmt::Debug for ParseContext<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParseContext")
            .field("description", &self.description)
            .field("line_num", &self.line_num)
            .field("line", &self.line)
            .field("handlers", &self.handlers.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsl::SymbolTable;

    fn context() -> ParseContext<()> {
        ParseContext::new(Arc::new(SymbolTable::new()))
    }

    #[test]
    fn set_line_splits_tokens() {
        let mut ctx = context();
        ctx.set_line(4, "press   on");

        assert_eq!(ctx.line_num(), 4);
        assert_eq!(ctx.line(), "press   on");
        assert_eq!(ctx.tokens(), vec!["press", "on"]);
    }

    #[test]
    fn cursors_follow_declarations() {
        let mut ctx = context();
        assert!(ctx.active_state().is_none());
        assert!(ctx.active_event().is_none());

        ctx.description.states.push(StateDecl::new("idle"));
        ctx.description.states[0]
            .events
            .push(EventDecl::new("go", None));
        ctx.description.defaults.push(EventDecl::new("reset", None));

        ctx.state = Some(0);
        ctx.event = Some(EventCursor::State { state: 0, event: 0 });
        assert_eq!(ctx.active_state().unwrap().name, "idle");
        assert_eq!(ctx.active_event().unwrap().name, "go");

        ctx.event = Some(EventCursor::Default(0));
        ctx.active_event_mut().unwrap().actions.push("clear".to_string());
        assert_eq!(ctx.description().defaults[0].actions, vec!["clear"]);
    }
}
