//! Build errors for descriptions and transition tables.

use crate::core::ActionError;
use thiserror::Error;

/// Errors that can occur when building descriptions, tables and machines.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("no callable bound for action '{name}'")]
    MissingBinding { name: String },

    #[error("unknown state '{state}'")]
    UnknownState { state: String },

    #[error("no states declared")]
    NoStates,

    #[error("duplicate state '{name}'")]
    DuplicateState { name: String },

    #[error("duplicate event '{event}' in state '{state}'")]
    DuplicateEvent { state: String, event: String },

    #[error("{directive} requires a preceding {needs}")]
    OutOfOrder {
        directive: &'static str,
        needs: &'static str,
    },

    #[error("no context was bound and none was supplied")]
    NoContext,

    #[error("context initialization failed: {0}")]
    ContextInit(#[source] ActionError),
}
