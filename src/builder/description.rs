//! Builder for constructing descriptions in code.

use crate::builder::error::BuildError;
use crate::core::{Description, EventDecl, HandlerDecl, StateDecl};

/// The event that `action()` appends to.
#[derive(Clone, Copy)]
enum Cursor {
    State(usize),
    Default(usize),
}

/// Builder for constructing descriptions with a fluent API.
///
/// Calls mirror the directives of the description language. Misuse (an
/// `enter()` before any `state()`, a repeated state name) is recorded and
/// reported by [`DescriptionBuilder::build`].
pub struct DescriptionBuilder {
    description: Description,
    cursor: Option<Cursor>,
    error: Option<BuildError>,
}

impl DescriptionBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            description: Description::new(),
            cursor: None,
            error: None,
        }
    }

    /// Declare a state and make it current. The first one is the entry state.
    pub fn state(mut self, name: &str) -> Self {
        if self.description.state(name).is_some() {
            return self.fail(BuildError::DuplicateState {
                name: name.to_string(),
            });
        }
        if self.description.first_state.is_none() {
            self.description.first_state = Some(name.to_string());
        }
        self.description.states.push(StateDecl::new(name));
        self.cursor = None;
        self
    }

    /// Set the current state's enter hook.
    pub fn enter(mut self, action: &str) -> Self {
        match self.description.states.last_mut() {
            Some(state) => state.enter = Some(action.to_string()),
            None => return self.fail(out_of_order("enter", "state")),
        }
        self.description.actions.insert(action.to_string());
        self
    }

    /// Set the current state's exit hook.
    pub fn exit(mut self, action: &str) -> Self {
        match self.description.states.last_mut() {
            Some(state) => state.exit = Some(action.to_string()),
            None => return self.fail(out_of_order("exit", "state")),
        }
        self.description.actions.insert(action.to_string());
        self
    }

    /// Declare an event on the current state, replacing one of the same name.
    pub fn event(mut self, name: &str, next_state: Option<&str>) -> Self {
        let Some(index) = self.description.states.len().checked_sub(1) else {
            return self.fail(out_of_order("event", "state"));
        };
        let events = &mut self.description.states[index].events;
        let position = upsert(events, EventDecl::new(name, next_state.map(String::from)));
        self.cursor = Some(Cursor::State(position));
        self
    }

    /// Declare a default fallback event, replacing one of the same name.
    pub fn default_event(mut self, name: &str, next_state: Option<&str>) -> Self {
        let event = EventDecl::new(name, next_state.map(String::from));
        let position = upsert(&mut self.description.defaults, event);
        self.cursor = Some(Cursor::Default(position));
        self
    }

    /// Append an action to the most recent event or default event.
    pub fn action(mut self, name: &str) -> Self {
        let event = match self.cursor {
            Some(Cursor::State(i)) => self
                .description
                .states
                .last_mut()
                .and_then(|s| s.events.get_mut(i)),
            Some(Cursor::Default(i)) => self.description.defaults.get_mut(i),
            None => None,
        };
        let Some(event) = event else {
            return self.fail(out_of_order("action", "event"));
        };
        event.actions.push(name.to_string());
        self.description.actions.insert(name.to_string());
        self
    }

    /// Record the symbol path of the context factory.
    pub fn context(mut self, path: &str) -> Self {
        self.description.context = Some(path.to_string());
        self
    }

    /// Record a handler binding.
    pub fn handler(mut self, name: &str, path: &str) -> Self {
        self.description.handlers.push(HandlerDecl {
            name: name.to_string(),
            path: path.to_string(),
        });
        self
    }

    /// Record the symbol path of the exception hook.
    pub fn exception(mut self, path: &str) -> Self {
        self.description.exception = Some(path.to_string());
        self
    }

    /// Build the description.
    /// Returns the first recorded error, or `NoStates` if nothing was declared.
    pub fn build(self) -> Result<Description, BuildError> {
        if let Some(err) = self.error {
            return Err(err);
        }
        if self.description.states.is_empty() {
            return Err(BuildError::NoStates);
        }
        Ok(self.description)
    }

    fn fail(mut self, err: BuildError) -> Self {
        self.error.get_or_insert(err);
        self
    }
}

impl Default for DescriptionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn out_of_order(directive: &'static str, needs: &'static str) -> BuildError {
    BuildError::OutOfOrder { directive, needs }
}

/// Insert `event`, replacing a same-named one in place. Returns its position.
pub(crate) fn upsert(events: &mut Vec<EventDecl>, event: EventDecl) -> usize {
    match events.iter().position(|e| e.name == event.name) {
        Some(position) => {
            events[position] = event;
            position
        }
        None => {
            events.push(event);
            events.len() - 1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_requires_a_state() {
        let result = DescriptionBuilder::new().build();

        assert!(matches!(result, Err(BuildError::NoStates)));
    }

    #[test]
    fn builder_rejects_hook_before_state() {
        let result = DescriptionBuilder::new().enter("wake").state("idle").build();

        assert!(matches!(
            result,
            Err(BuildError::OutOfOrder {
                directive: "enter",
                ..
            })
        ));
    }

    #[test]
    fn builder_rejects_action_before_event() {
        let result = DescriptionBuilder::new().state("idle").action("run").build();

        assert!(matches!(
            result,
            Err(BuildError::OutOfOrder {
                directive: "action",
                needs: "event"
            })
        ));
    }

    #[test]
    fn builder_reports_duplicate_state() {
        let result = DescriptionBuilder::new().state("a").state("a").build();

        assert!(matches!(result, Err(BuildError::DuplicateState { name }) if name == "a"));
    }

    #[test]
    fn fluent_api_builds_description() {
        let description = DescriptionBuilder::new()
            .state("off")
            .enter("dark")
            .event("press", Some("on"))
            .action("turn_on")
            .state("on")
            .exit("cool")
            .event("press", Some("off"))
            .action("turn_off")
            .default_event("reset", Some("off"))
            .action("turn_off")
            .context("app.Bulb")
            .handler("turn_on", "app.turn_on")
            .exception("app.on_error")
            .build()
            .unwrap();

        assert_eq!(description.first_state.as_deref(), Some("off"));
        assert_eq!(description.state_names(), vec!["off", "on"]);
        assert_eq!(description.state("off").unwrap().enter.as_deref(), Some("dark"));
        assert_eq!(description.state("on").unwrap().exit.as_deref(), Some("cool"));
        assert_eq!(description.default_event("reset").unwrap().actions, vec!["turn_off"]);
        assert_eq!(
            description.actions.iter().collect::<Vec<_>>(),
            vec!["cool", "dark", "turn_off", "turn_on"]
        );
        assert_eq!(description.handlers.len(), 1);
        assert_eq!(description.exception.as_deref(), Some("app.on_error"));
    }

    #[test]
    fn redeclared_event_replaces_in_place() {
        let description = DescriptionBuilder::new()
            .state("idle")
            .event("go", Some("idle"))
            .action("first")
            .event("stop", None)
            .event("go", None)
            .action("second")
            .build()
            .unwrap();

        let idle = description.state("idle").unwrap();
        assert_eq!(idle.events.len(), 2);
        assert_eq!(idle.events[0].name, "go");
        assert_eq!(idle.events[0].actions, vec!["second"]);
        assert_eq!(idle.events[0].next_state, None);
    }
}
