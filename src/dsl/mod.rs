//! The description language.
//!
//! A description is a line-oriented list of directives:
//!
//! ```text
//! STATE off              # the first state is the entry state
//!     EVENT press on
//!         ACTION turn_on
//! STATE on
//!     ENTER glow
//!     EVENT press off
//!         ACTION turn_off
//! DEFAULT reset off
//! CONTEXT app.Bulb
//! HANDLER turn_on app.turn_on
//! ```
//!
//! Parsing does not use a hand-written parser. The grammar is a transition
//! table ([`grammar`]) run by an ordinary [`Machine`](crate::engine::Machine)
//! whose context is a [`ParseContext`]; each accepted directive runs its
//! semantic action against that context. CONTEXT, HANDLER and EXCEPTION name
//! callables by dotted path and are looked up through a [`SymbolResolver`].

mod actions;
mod context;
mod directive;
mod error;
pub mod grammar;
mod interpreter;
mod parser;
mod resolver;
mod source;

pub use context::ParseContext;
pub use directive::Directive;
pub use error::ParseError;
pub use interpreter::DirectiveInterpreter;
pub use parser::{load, parse, Parsed, Parser};
pub use resolver::{ResolveError, Symbol, SymbolResolver, SymbolTable};
pub use source::{un_comment, LineSource, Reader, SourceError};
