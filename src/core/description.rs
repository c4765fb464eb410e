//! Declarative, name-based description of a state machine.
//!
//! A [`Description`] is what the directive interpreter accumulates while it
//! reads a source: states, their events and hooks, all by name. It holds no
//! callables, so it can be inspected, serialized, dumped back to text and
//! bound to different action maps.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// A declared event: the actions it runs and an optional target state.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDecl {
    pub name: String,
    pub actions: Vec<String>,
    /// Target state name; resolved to a state only when a table is built
    pub next_state: Option<String>,
}

impl EventDecl {
    pub fn new(name: impl Into<String>, next_state: Option<String>) -> Self {
        Self {
            name: name.into(),
            actions: Vec::new(),
            next_state,
        }
    }
}

/// A declared state with optional enter/exit hooks.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateDecl {
    pub name: String,
    pub enter: Option<String>,
    pub exit: Option<String>,
    pub events: Vec<EventDecl>,
}

impl StateDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Find an event declared on this state.
    pub fn event(&self, name: &str) -> Option<&EventDecl> {
        self.events.iter().find(|e| e.name == name)
    }
}

/// A HANDLER binding of a short action name to a symbol path.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandlerDecl {
    pub name: String,
    pub path: String,
}

/// Complete name-based description of a machine.
///
/// `Display` renders the description as directive text that parses back into
/// an equivalent description (comments are not preserved).
///
/// # Example
///
/// ```rust
/// use fsm_table::builder::DescriptionBuilder;
///
/// let description = DescriptionBuilder::new()
///     .state("off")
///     .event("press", Some("on"))
///     .action("turn_on")
///     .state("on")
///     .event("press", Some("off"))
///     .action("turn_off")
///     .build()
///     .unwrap();
///
/// assert_eq!(description.first_state.as_deref(), Some("off"));
/// assert!(description.dump().starts_with("STATE off\n"));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Description {
    /// Entry state: the first state declared
    pub first_state: Option<String>,
    pub states: Vec<StateDecl>,
    /// Fallback events, consulted when the current state has no match
    pub defaults: Vec<EventDecl>,
    /// Every action name referenced so far, sorted and de-duplicated
    pub actions: BTreeSet<String>,
    pub context: Option<String>,
    pub handlers: Vec<HandlerDecl>,
    pub exception: Option<String>,
}

impl Description {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, name: &str) -> Option<&StateDecl> {
        self.states.iter().find(|s| s.name == name)
    }

    pub fn default_event(&self, name: &str) -> Option<&EventDecl> {
        self.defaults.iter().find(|e| e.name == name)
    }

    /// Names of all declared states, in declaration order.
    pub fn state_names(&self) -> Vec<&str> {
        self.states.iter().map(|s| s.name.as_str()).collect()
    }

    /// De-duplicated names of every declared event, including defaults.
    pub fn events(&self) -> BTreeSet<&str> {
        self.states
            .iter()
            .flat_map(|s| s.events.iter())
            .chain(self.defaults.iter())
            .map(|e| e.name.as_str())
            .collect()
    }

    /// Action names actually referenced by hooks and events.
    ///
    /// Normally equal to [`Description::actions`]; computed from the
    /// declarations so that hand-edited or deserialized descriptions are
    /// checked against what they really use.
    pub fn referenced_actions(&self) -> BTreeSet<&str> {
        let mut names = BTreeSet::new();
        for state in &self.states {
            names.extend(state.enter.as_deref());
            names.extend(state.exit.as_deref());
            for event in &state.events {
                names.extend(event.actions.iter().map(String::as_str));
            }
        }
        for event in &self.defaults {
            names.extend(event.actions.iter().map(String::as_str));
        }
        names
    }

    /// Regenerate directive text for this description.
    pub fn dump(&self) -> String {
        self.to_string()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// States with the entry state first, the rest in declaration order.
    fn states_in_dump_order(&self) -> impl Iterator<Item = &StateDecl> {
        let first = self.first_state.as_deref();
        let head = first.and_then(|name| self.state(name));
        head.into_iter()
            .chain(self.states.iter().filter(move |s| Some(s.name.as_str()) != first))
    }
}

fn write_event(
    f: &mut fmt::Formatter<'_>,
    keyword: &str,
    indent: &str,
    event: &EventDecl,
) -> fmt::Result {
    match &event.next_state {
        Some(next) => writeln!(f, "{indent}{keyword} {} {next}", event.name)?,
        None => writeln!(f, "{indent}{keyword} {}", event.name)?,
    }
    for action in &event.actions {
        writeln!(f, "{indent}  ACTION {action}")?;
    }
    Ok(())
}

impl fmt::Display for Description {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // ENTER/EXIT are only legal before the first EVENT of a state.
        for state in self.states_in_dump_order() {
            writeln!(f, "STATE {}", state.name)?;
            if let Some(enter) = &state.enter {
                writeln!(f, "  ENTER {enter}")?;
            }
            if let Some(exit) = &state.exit {
                writeln!(f, "  EXIT {exit}")?;
            }
            for event in &state.events {
                write_event(f, "EVENT", "  ", event)?;
            }
        }
        for event in &self.defaults {
            write_event(f, "DEFAULT", "", event)?;
        }
        if let Some(context) = &self.context {
            writeln!(f, "CONTEXT {context}")?;
        }
        for handler in &self.handlers {
            writeln!(f, "HANDLER {} {}", handler.name, handler.path)?;
        }
        if let Some(exception) = &self.exception {
            writeln!(f, "EXCEPTION {exception}")?;
        }
        Ok(())
    }
}
