//! Runtime transition table.
//!
//! A [`Table`] is the bound, immutable form of a [`Description`]: action names
//! are replaced by callables and every `next_state` name by a [`StateId`].
//! Tables are produced by [`crate::builder::build_table`] and shared by the
//! machines that run them.
//!
//! [`Description`]: crate::core::Description

use super::action::Action;
use std::collections::HashMap;
use std::fmt;

/// Index of a state inside its table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StateId(pub(crate) usize);

/// A bound event.
pub struct EventNode<C> {
    pub(crate) name: String,
    pub(crate) actions: Vec<Action<C>>,
    pub(crate) next: Option<StateId>,
}

impl<C> EventNode<C> {
    /// Event name as declared.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Bound actions, in declaration order.
    pub fn actions(&self) -> &[Action<C>] {
        &self.actions
    }

    /// Target state, or `None` to stay put.
    pub fn next_state(&self) -> Option<StateId> {
        self.next
    }
}

/// A bound state with its hooks and events.
pub struct StateNode<C> {
    pub(crate) name: String,
    pub(crate) enter: Option<Action<C>>,
    pub(crate) exit: Option<Action<C>>,
    pub(crate) events: HashMap<String, EventNode<C>>,
}

impl<C> StateNode<C> {
    /// State name as declared.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether an ENTER action is bound.
    pub fn has_enter(&self) -> bool {
        self.enter.is_some()
    }

    /// Whether an EXIT action is bound.
    pub fn has_exit(&self) -> bool {
        self.exit.is_some()
    }

    /// Event declared on this state.
    pub fn event(&self, name: &str) -> Option<&EventNode<C>> {
        self.events.get(name)
    }
}

/// Where an event was found by [`Table::lookup`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Matched {
    /// Declared on the current state
    State,

    /// Served by the default fallback
    Default,
}

/// Immutable transition table.
pub struct Table<C> {
    states: Vec<StateNode<C>>,
    index: HashMap<String, StateId>,
    defaults: HashMap<String, EventNode<C>>,
    initial: StateId,
}

impl<C> Table<C> {
    pub(crate) fn from_parts(
        states: Vec<StateNode<C>>,
        index: HashMap<String, StateId>,
        defaults: HashMap<String, EventNode<C>>,
        initial: StateId,
    ) -> Self {
        Self {
            states,
            index,
            defaults,
            initial,
        }
    }

    /// The entry state.
    pub fn initial(&self) -> StateId {
        self.initial
    }

    /// Look a state up by name.
    pub fn find(&self, name: &str) -> Option<StateId> {
        self.index.get(name).copied()
    }

    /// The state behind `id`.
    pub fn state(&self, id: StateId) -> &StateNode<C> {
        &self.states[id.0]
    }

    pub fn states(&self) -> impl Iterator<Item = &StateNode<C>> {
        self.states.iter()
    }

    pub fn default_event(&self, name: &str) -> Option<&EventNode<C>> {
        self.defaults.get(name)
    }

    /// Find `event` for `state`: an exact match first, then the defaults.
    pub fn lookup(&self, state: StateId, event: &str) -> Option<(&EventNode<C>, Matched)> {
        if let Some(node) = self.state(state).events.get(event) {
            return Some((node, Matched::State));
        }
        self.defaults
            .get(event)
            .map(|node| (node, Matched::Default))
    }
}

impl<C> fmt::Debug for Table<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Table")
            .field("states", &self.states.iter().map(|s| &s.name).collect::<Vec<_>>())
            .field("defaults", &self.defaults.keys().collect::<Vec<_>>())
            .field("initial", &self.state(self.initial).name)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::action::{action, Continuation};

    fn event(name: &str, next: Option<usize>) -> EventNode<()> {
        EventNode {
            name: name.to_string(),
            actions: vec![action(|_: &mut (), _| Ok(Continuation::Stop))],
            next: next.map(StateId),
        }
    }

    fn state(name: &str, events: Vec<EventNode<()>>) -> StateNode<()> {
        StateNode {
            name: name.to_string(),
            enter: None,
            exit: None,
            events: events.into_iter().map(|e| (e.name.clone(), e)).collect(),
        }
    }

    fn table() -> Table<()> {
        let states = vec![
            state("idle", vec![event("start", Some(1)), event("reset", None)]),
            state("busy", vec![event("stop", Some(0))]),
        ];
        let defaults = [event("reset", Some(0))]
            .into_iter()
            .map(|e| (e.name.clone(), e))
            .collect();
        let index = states
            .iter()
            .enumerate()
            .map(|(i, s)| (s.name.clone(), StateId(i)))
            .collect();
        Table::from_parts(states, index, defaults, StateId(0))
    }

    #[test]
    fn find_maps_names_to_ids() {
        let table = table();
        assert_eq!(table.find("idle"), Some(StateId(0)));
        assert_eq!(table.find("busy"), Some(StateId(1)));
        assert_eq!(table.find("gone"), None);
        assert_eq!(table.state(table.initial()).name(), "idle");
    }

    #[test]
    fn exact_match_wins_over_default() {
        let table = table();
        let (node, matched) = table.lookup(StateId(0), "reset").unwrap();
        assert_eq!(matched, Matched::State);
        assert_eq!(node.next_state(), None);
    }

    #[test]
    fn default_serves_missing_event() {
        let table = table();
        let (node, matched) = table.lookup(StateId(1), "reset").unwrap();
        assert_eq!(matched, Matched::Default);
        assert_eq!(node.next_state(), Some(StateId(0)));
    }

    #[test]
    fn unknown_event_has_no_match() {
        let table = table();
        assert!(table.lookup(StateId(1), "start").is_none());
        assert!(table.lookup(StateId(0), "explode").is_none());
    }
}
