//! Binding descriptions to callables.
//!
//! Building happens in two passes. The first binds every hook and action name
//! to its callable and creates the state and event nodes; the second resolves
//! each `next_state` name to a state, which lets a description refer to
//! states declared further down.

use crate::builder::error::BuildError;
use crate::core::{Action, ActionMap, Description, EventDecl, EventNode, StateId, StateNode, Table};
use crate::engine::Machine;
use std::collections::HashMap;
use std::sync::Arc;

/// Where a not-yet-resolved `next_state` lives.
enum Slot<'d> {
    State(usize, &'d str),
    Default(&'d str),
}

fn bind<C>(actions: &ActionMap<C>, name: &str) -> Result<Action<C>, BuildError> {
    actions
        .get(name)
        .cloned()
        .ok_or_else(|| BuildError::MissingBinding {
            name: name.to_string(),
        })
}

fn bind_event<C>(actions: &ActionMap<C>, event: &EventDecl) -> Result<EventNode<C>, BuildError> {
    Ok(EventNode {
        name: event.name.clone(),
        actions: event
            .actions
            .iter()
            .map(|name| bind(actions, name))
            .collect::<Result<_, _>>()?,
        next: None,
    })
}

/// Build a transition table from `description`, looking actions up in `actions`.
///
/// Every action name the description references must be present in
/// `actions`; this is checked before any node is created.
///
/// # Example
///
/// ```rust
/// use fsm_table::builder::{build_table, DescriptionBuilder};
/// use fsm_table::core::ActionMap;
///
/// let description = DescriptionBuilder::new()
///     .state("off")
///     .event("press", Some("on"))
///     .state("on")
///     .event("press", Some("off"))
///     .build()
///     .unwrap();
///
/// let table = build_table::<()>(&description, &ActionMap::new()).unwrap();
/// assert_eq!(table.state(table.initial()).name(), "off");
/// ```
pub fn build_table<C>(
    description: &Description,
    actions: &ActionMap<C>,
) -> Result<Table<C>, BuildError> {
    let referenced = description
        .actions
        .iter()
        .map(String::as_str)
        .chain(description.referenced_actions());
    for name in referenced {
        if !actions.contains_key(name) {
            return Err(BuildError::MissingBinding {
                name: name.to_string(),
            });
        }
    }
    let first = description
        .first_state
        .as_deref()
        .ok_or(BuildError::NoStates)?;

    let mut states = Vec::with_capacity(description.states.len());
    let mut defaults = HashMap::new();
    let mut pending = Vec::new();

    for (i, decl) in description.states.iter().enumerate() {
        let mut events = HashMap::new();
        for event in &decl.events {
            if events.insert(event.name.clone(), bind_event(actions, event)?).is_some() {
                return Err(BuildError::DuplicateEvent {
                    state: decl.name.clone(),
                    event: event.name.clone(),
                });
            }
            if let Some(next) = event.next_state.as_deref() {
                pending.push((Slot::State(i, &event.name), next));
            }
        }
        states.push(StateNode {
            name: decl.name.clone(),
            enter: decl.enter.as_deref().map(|n| bind(actions, n)).transpose()?,
            exit: decl.exit.as_deref().map(|n| bind(actions, n)).transpose()?,
            events,
        });
    }
    for event in &description.defaults {
        if defaults.insert(event.name.clone(), bind_event(actions, event)?).is_some() {
            return Err(BuildError::DuplicateEvent {
                state: "DEFAULT".to_string(),
                event: event.name.clone(),
            });
        }
        if let Some(next) = event.next_state.as_deref() {
            pending.push((Slot::Default(&event.name), next));
        }
    }

    let mut index = HashMap::with_capacity(states.len());
    for (i, state) in states.iter().enumerate() {
        if index.insert(state.name.clone(), StateId(i)).is_some() {
            return Err(BuildError::DuplicateState {
                name: state.name.clone(),
            });
        }
    }
    let resolve = |name: &str| {
        index
            .get(name)
            .copied()
            .ok_or_else(|| BuildError::UnknownState {
                state: name.to_string(),
            })
    };

    for (slot, next) in pending {
        let target = resolve(next)?;
        let node = match slot {
            Slot::State(i, event) => states[i].events.get_mut(event),
            Slot::Default(event) => defaults.get_mut(event),
        };
        if let Some(node) = node {
            node.next = Some(target);
        }
    }
    let initial = resolve(first)?;

    tracing::debug!(
        states = states.len(),
        defaults = defaults.len(),
        initial = first,
        "transition table built"
    );
    Ok(Table::from_parts(states, index, defaults, initial))
}

/// Build a table and wrap it in a machine that owns `context`.
pub fn build_machine<C>(
    description: &Description,
    actions: &ActionMap<C>,
    context: C,
) -> Result<Machine<C>, BuildError> {
    let table = build_table(description, actions)?;
    Ok(Machine::new(Arc::new(table), context))
}
