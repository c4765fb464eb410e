//! Runtime dispatch engine.
//!
//! A [`Machine`] runs one [`Table`](crate::core::Table): it keeps the current
//! state, dispatches named events against it, and follows the internal events
//! that actions return until the chain ends.
//!
//! # Key Concepts
//!
//! - **Dispatch**: exact match on the current state, then the default fallback
//! - **Arguments**: only the first action of a `handle` call sees the caller's arguments
//! - **Continuations**: an action may name the next event; the loop is iterative
//! - **Hooks**: trace, state-change, undefined-event and exception observers

mod hooks;
mod machine;

pub use hooks::{Dispatch, StateChangeHook, TraceHook, UndefinedHook};
pub use machine::Machine;
