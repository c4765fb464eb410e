//! Builder API: turning descriptions into running machines.
//!
//! This module provides the binder that resolves action names to callables,
//! a fluent builder for writing descriptions in code, and the `action_map!`
//! macro for assembling action maps with minimal boilerplate.

pub mod description;
pub mod error;
pub mod machine;
pub mod macros;

pub use description::DescriptionBuilder;
pub use error::BuildError;
pub use machine::{build_machine, build_table};
