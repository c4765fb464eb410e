//! fsm-table: data-driven finite state machines
//!
//! A machine is a transition table of named states and events. Events run
//! named actions, may move the machine to another state, and may hand the
//! dispatch loop a follow-up event. Tables are declared either in code or in
//! a small line-oriented description language, whose parser is itself a
//! transition table run by the same engine.
//!
//! # Core Concepts
//!
//! - **Description**: the name-based declaration of a machine
//! - **Table**: a description bound to callables, shared by running machines
//! - **Machine**: the current state plus a context every action receives
//! - **Continuation**: an action's request to dispatch another event
//! - **Default events**: consulted when the current state has no match
//!
//! # Example
//!
//! ```rust
//! use fsm_table::core::Continuation;
//! use fsm_table::dsl::{Parser, SymbolTable};
//!
//! #[derive(Default)]
//! struct Bulb {
//!     presses: u32,
//! }
//!
//! let symbols = SymbolTable::<Bulb>::new()
//!     .handler("bulb.press", |bulb, _args| {
//!         bulb.presses += 1;
//!         Ok(Continuation::Stop)
//!     })
//!     .unwrap();
//!
//! let source = "
//!     STATE off
//!         EVENT press on
//!             ACTION press
//!     STATE on
//!         EVENT press off
//!             ACTION press
//!     HANDLER press bulb.press
//! ";
//!
//! let mut machine = Parser::new(symbols).load(source, &[]).unwrap();
//! assert_eq!(machine.state(), "off");
//!
//! assert!(machine.handle("press", &[]).unwrap());
//! assert!(machine.handle("press", &[]).unwrap());
//! assert_eq!(machine.state(), "off");
//! assert_eq!(machine.context().presses, 2);
//!
//! // Unknown events are not errors.
//! assert!(!machine.handle("unplug", &[]).unwrap());
//! ```

pub mod builder;
pub mod core;
pub mod dsl;
pub mod engine;
pub mod error;

// Re-export commonly used types
pub use self::builder::{build_machine, build_table, BuildError, DescriptionBuilder};
pub use self::core::{Action, ActionError, ActionMap, Continuation, Description, Table};
pub use self::dsl::{load, parse, ParseError, Parsed, Parser, SymbolTable};
pub use self::engine::Machine;
pub use self::error::Error;
