//! Semantic actions of the description language.
//!
//! Each function handles one directive keyword. The grammar table calls them
//! with the [`ParseContext`] after the directive's keyword has been accepted
//! at the current position; they validate the directive's arguments and
//! record its effect.

use crate::builder::description::upsert;
use crate::core::{EventDecl, HandlerDecl, StateDecl};
use crate::dsl::context::{EventCursor, ParseContext};
use crate::dsl::directive::Directive;
use crate::dsl::error::ParseError;
use crate::dsl::resolver::Symbol;

fn too_few<C>(ctx: &ParseContext<C>, directive: Directive) -> ParseError {
    ParseError::TooFewTokens {
        directive: directive.name().to_string(),
        line: ctx.line_num(),
    }
}

fn extra<C>(ctx: &ParseContext<C>, directive: Directive, expected: &'static str) -> ParseError {
    ParseError::ExtraToken {
        directive: directive.name().to_string(),
        expected,
        line: ctx.line_num(),
    }
}

fn duplicate_name<C>(ctx: &ParseContext<C>, directive: Directive) -> ParseError {
    ParseError::DuplicateName {
        directive: directive.name().to_string(),
        line: ctx.line_num(),
    }
}

fn duplicate_directive<C>(ctx: &ParseContext<C>, directive: Directive) -> ParseError {
    ParseError::DuplicateDirective {
        directive: directive.name().to_string(),
        line: ctx.line_num(),
    }
}

// Only reachable when an action runs outside the grammar's ordering.
fn unexpected<C>(ctx: &ParseContext<C>, directive: Directive) -> ParseError {
    ParseError::UnexpectedDirective {
        directive: directive.name().to_string(),
        line: ctx.line_num(),
    }
}

fn one_token<C>(ctx: &ParseContext<C>, directive: Directive) -> Result<String, ParseError> {
    match ctx.tokens().as_slice() {
        [token] => Ok(token.to_string()),
        [] => Err(too_few(ctx, directive)),
        _ => Err(extra(ctx, directive, "one token")),
    }
}

fn name_and_target<C>(
    ctx: &ParseContext<C>,
    directive: Directive,
) -> Result<EventDecl, ParseError> {
    match ctx.tokens().as_slice() {
        [name] => Ok(EventDecl::new(*name, None)),
        [name, next] => Ok(EventDecl::new(*name, Some(next.to_string()))),
        [] => Err(too_few(ctx, directive)),
        _ => Err(extra(ctx, directive, "one or two tokens")),
    }
}

fn resolve<C>(
    ctx: &ParseContext<C>,
    directive: Directive,
    path: &str,
) -> Result<Symbol<C>, ParseError> {
    ctx.resolver
        .resolve(path)
        .map_err(|source| ParseError::UnresolvedSymbol {
            directive: directive.name().to_string(),
            line: ctx.line_num(),
            source,
        })
}

fn wrong_symbol<C>(
    ctx: &ParseContext<C>,
    directive: Directive,
    path: &str,
    expected: &'static str,
) -> ParseError {
    ParseError::UnexpectedSymbol {
        directive: directive.name().to_string(),
        path: path.to_string(),
        expected,
        line: ctx.line_num(),
    }
}

/// `STATE name`: declare a state and make it active.
pub fn act_state<C>(ctx: &mut ParseContext<C>) -> Result<(), ParseError> {
    let name = one_token(ctx, Directive::State)?;
    if ctx.description.state(&name).is_some() {
        return Err(duplicate_name(ctx, Directive::State));
    }
    if ctx.description.first_state.is_none() {
        ctx.description.first_state = Some(name.clone());
    }
    ctx.description.states.push(StateDecl::new(name));
    ctx.state = Some(ctx.description.states.len() - 1);
    ctx.event = None;
    Ok(())
}

/// `ENTER action`: set the active state's enter hook.
pub fn act_enter<C>(ctx: &mut ParseContext<C>) -> Result<(), ParseError> {
    let name = one_token(ctx, Directive::Enter)?;
    let duplicate = duplicate_directive(ctx, Directive::Enter);
    let missing = unexpected(ctx, Directive::Enter);
    let state = ctx.active_state_mut().ok_or(missing)?;
    if state.enter.is_some() {
        return Err(duplicate);
    }
    state.enter = Some(name.clone());
    ctx.description.actions.insert(name);
    Ok(())
}

/// `EXIT action`: set the active state's exit hook.
pub fn act_exit<C>(ctx: &mut ParseContext<C>) -> Result<(), ParseError> {
    let name = one_token(ctx, Directive::Exit)?;
    let duplicate = duplicate_directive(ctx, Directive::Exit);
    let missing = unexpected(ctx, Directive::Exit);
    let state = ctx.active_state_mut().ok_or(missing)?;
    if state.exit.is_some() {
        return Err(duplicate);
    }
    state.exit = Some(name.clone());
    ctx.description.actions.insert(name);
    Ok(())
}

/// `EVENT name [next_state]`: declare an event on the active state.
///
/// Redeclaring an event of the same state replaces it.
pub fn act_event<C>(ctx: &mut ParseContext<C>) -> Result<(), ParseError> {
    let event = name_and_target(ctx, Directive::Event)?;
    let (line, missing) = (ctx.line_num(), unexpected(ctx, Directive::Event));
    let index = ctx.state.ok_or(missing)?;
    let state = &mut ctx.description.states[index];
    if state.event(&event.name).is_some() {
        tracing::warn!(state = %state.name, event = %event.name, line, "event redeclared, replacing");
    }
    let position = upsert(&mut state.events, event);
    ctx.event = Some(EventCursor::State {
        state: index,
        event: position,
    });
    Ok(())
}

/// `DEFAULT name [next_state]`: declare a default fallback event.
pub fn act_default<C>(ctx: &mut ParseContext<C>) -> Result<(), ParseError> {
    let event = name_and_target(ctx, Directive::Default)?;
    if ctx.description.default_event(&event.name).is_some() {
        tracing::warn!(event = %event.name, line = ctx.line_num(), "default event redeclared, replacing");
    }
    let position = upsert(&mut ctx.description.defaults, event);
    ctx.event = Some(EventCursor::Default(position));
    Ok(())
}

/// `ACTION name`: append an action to the active event.
pub fn act_action<C>(ctx: &mut ParseContext<C>) -> Result<(), ParseError> {
    let name = one_token(ctx, Directive::Action)?;
    let duplicate = duplicate_name(ctx, Directive::Action);
    let missing = unexpected(ctx, Directive::Action);
    let event = ctx.active_event_mut().ok_or(missing)?;
    if event.actions.contains(&name) {
        return Err(duplicate);
    }
    event.actions.push(name.clone());
    ctx.description.actions.insert(name);
    Ok(())
}

/// `CONTEXT path`: resolve the context factory.
pub fn act_context<C>(ctx: &mut ParseContext<C>) -> Result<(), ParseError> {
    let path = one_token(ctx, Directive::Context)?;
    if ctx.factory.is_some() {
        return Err(duplicate_name(ctx, Directive::Context));
    }
    match resolve(ctx, Directive::Context, &path)? {
        Symbol::Context(factory) => ctx.factory = Some(factory),
        _ => return Err(wrong_symbol(ctx, Directive::Context, &path, "context factory")),
    }
    ctx.description.context = Some(path);
    Ok(())
}

/// `HANDLER name path`: bind an action name to a resolved handler.
pub fn act_handler<C>(ctx: &mut ParseContext<C>) -> Result<(), ParseError> {
    let (name, path) = match ctx.tokens().as_slice() {
        [name, path] => (name.to_string(), path.to_string()),
        [] | [_] => return Err(too_few(ctx, Directive::Handler)),
        _ => return Err(extra(ctx, Directive::Handler, "two tokens")),
    };
    if ctx.handlers.contains_key(&name) {
        return Err(duplicate_name(ctx, Directive::Handler));
    }
    let Symbol::Handler(handler) = resolve(ctx, Directive::Handler, &path)? else {
        return Err(wrong_symbol(ctx, Directive::Handler, &path, "handler"));
    };
    ctx.handlers.insert(name.clone(), handler);
    ctx.description.handlers.push(HandlerDecl { name, path });
    Ok(())
}

/// `EXCEPTION path`: resolve the exception hook.
pub fn act_exception<C>(ctx: &mut ParseContext<C>) -> Result<(), ParseError> {
    let path = one_token(ctx, Directive::Exception)?;
    if ctx.exception.is_some() {
        return Err(duplicate_name(ctx, Directive::Exception));
    }
    let Symbol::Exception(hook) = resolve(ctx, Directive::Exception, &path)? else {
        return Err(wrong_symbol(ctx, Directive::Exception, &path, "exception hook"));
    };
    ctx.exception = Some(hook);
    ctx.description.exception = Some(path);
    Ok(())
}
