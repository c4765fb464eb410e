//! The grammar table of the description language.
//!
//! The grammar is an ordinary [`Description`] built with the same
//! [`DescriptionBuilder`] and bound by the same [`build_table`] as any user
//! machine. Its states are parser positions; its events are lower-case
//! directive keywords. Entering a position runs the semantic action of the
//! directive that led there, while ENTER, EXIT and ACTION run as event
//! actions and keep the position unchanged.
//!
//! ```text
//! init ──state──▶ state ──event──▶ event ──action──▶ event
//!                   │                │
//!                   └──default──▶ default ──context/handler/exception──▶ ...
//! ```
//!
//! Any failure dispatches [`ERROR_EVENT`], a default event that leads every
//! position to the terminal [`ERROR_STATE`].

use crate::action_map;
use crate::builder::{build_table, DescriptionBuilder};
use crate::core::{ActionMap, ActionResult, Continuation, Description, Table};
use crate::dsl::actions;
use crate::dsl::context::ParseContext;
use crate::dsl::directive::Directive as D;
use crate::dsl::error::ParseError;
use serde_json::Value;

/// Event that moves the interpreter to its terminal error state.
pub const ERROR_EVENT: &str = "error";

/// Terminal state reached after any failure.
pub const ERROR_STATE: &str = "error";

/// Name of the grammar's entry state.
pub const INITIAL_STATE: &str = "init";

/// The grammar as a description.
pub fn description() -> Description {
    let to = |d: D| Some(d.keyword());

    DescriptionBuilder::new()
        .state(INITIAL_STATE)
        .event(D::State.keyword(), to(D::State))
        .state(D::State.keyword())
        .enter(D::State.keyword())
        .event(D::Enter.keyword(), None)
        .action(D::Enter.keyword())
        .event(D::Exit.keyword(), None)
        .action(D::Exit.keyword())
        .event(D::Event.keyword(), to(D::Event))
        .event(D::State.keyword(), to(D::State))
        .event(D::Default.keyword(), to(D::Default))
        .event(D::Context.keyword(), to(D::Context))
        .event(D::Handler.keyword(), to(D::Handler))
        .event(D::Exception.keyword(), to(D::Exception))
        .state(D::Event.keyword())
        .enter(D::Event.keyword())
        .event(D::Action.keyword(), None)
        .action(D::Action.keyword())
        .event(D::Event.keyword(), to(D::Event))
        .event(D::State.keyword(), to(D::State))
        .event(D::Default.keyword(), to(D::Default))
        .event(D::Context.keyword(), to(D::Context))
        .event(D::Handler.keyword(), to(D::Handler))
        .event(D::Exception.keyword(), to(D::Exception))
        .state(D::Default.keyword())
        .enter(D::Default.keyword())
        .event(D::Action.keyword(), None)
        .action(D::Action.keyword())
        .event(D::Default.keyword(), to(D::Default))
        .event(D::State.keyword(), to(D::State))
        .event(D::Context.keyword(), to(D::Context))
        .event(D::Handler.keyword(), to(D::Handler))
        .event(D::Exception.keyword(), to(D::Exception))
        .state(D::Context.keyword())
        .enter(D::Context.keyword())
        .event(D::Handler.keyword(), to(D::Handler))
        .event(D::Exception.keyword(), to(D::Exception))
        .state(D::Handler.keyword())
        .enter(D::Handler.keyword())
        .event(D::Handler.keyword(), to(D::Handler))
        .event(D::Exception.keyword(), to(D::Exception))
        .state(D::Exception.keyword())
        .enter(D::Exception.keyword())
        .event(D::Handler.keyword(), to(D::Handler))
        .state(ERROR_STATE)
        .default_event(ERROR_EVENT, Some(ERROR_STATE))
        .build()
        .expect("grammar description is well formed")
}

fn semantic(result: Result<(), ParseError>) -> ActionResult {
    result?;
    Ok(Continuation::Stop)
}

/// Semantic actions keyed by directive keyword.
pub fn actions<C: 'static>() -> ActionMap<ParseContext<C>> {
    action_map! {
        D::State.keyword() => |ctx: &mut ParseContext<C>, _: &[Value]| semantic(actions::act_state(ctx)),
        D::Enter.keyword() => |ctx: &mut ParseContext<C>, _: &[Value]| semantic(actions::act_enter(ctx)),
        D::Exit.keyword() => |ctx: &mut ParseContext<C>, _: &[Value]| semantic(actions::act_exit(ctx)),
        D::Event.keyword() => |ctx: &mut ParseContext<C>, _: &[Value]| semantic(actions::act_event(ctx)),
        D::Action.keyword() => |ctx: &mut ParseContext<C>, _: &[Value]| semantic(actions::act_action(ctx)),
        D::Context.keyword() => |ctx: &mut ParseContext<C>, _: &[Value]| semantic(actions::act_context(ctx)),
        D::Handler.keyword() => |ctx: &mut ParseContext<C>, _: &[Value]| semantic(actions::act_handler(ctx)),
        D::Default.keyword() => |ctx: &mut ParseContext<C>, _: &[Value]| semantic(actions::act_default(ctx)),
        D::Exception.keyword() => |ctx: &mut ParseContext<C>, _: &[Value]| semantic(actions::act_exception(ctx)),
    }
}

/// Bind the grammar to its semantic actions.
pub fn table<C: 'static>() -> Table<ParseContext<C>> {
    build_table(&description(), &actions::<C>()).expect("every grammar action is bound")
}
