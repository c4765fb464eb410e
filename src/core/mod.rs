//! Core state machine data.
//!
//! This module contains the data the rest of the crate operates on:
//! - The uniform action signature and the `Continuation` it returns
//! - `Description`, the name-based declaration of a machine
//! - `Table`, the bound runtime form shared by running machines
//!
//! Nothing here dispatches events; see [`crate::engine`] for that.

mod action;
mod description;
mod table;

pub use action::{
    action, context_factory, exception_hook, Action, ActionError, ActionMap, ActionResult,
    ContextFactory, Continuation, ExceptionHook,
};
pub use description::{Description, EventDecl, HandlerDecl, StateDecl};
pub use table::{EventNode, Matched, StateId, StateNode, Table};
