//! Directive interpreter: the grammar table run by an ordinary machine.

use crate::core::Table;
use crate::dsl::context::ParseContext;
use crate::dsl::directive::Directive;
use crate::dsl::error::ParseError;
use crate::dsl::grammar::{ERROR_EVENT, ERROR_STATE};
use crate::dsl::parser::Parsed;
use crate::dsl::resolver::SymbolResolver;
use crate::engine::Machine;
use std::sync::Arc;

/// Feeds directive lines, one at a time, to a grammar machine.
///
/// After the first failure the interpreter is poisoned: the grammar machine
/// sits in its terminal `error` state and rejects every further directive.
pub struct DirectiveInterpreter<C> {
    machine: Machine<ParseContext<C>>,
}

impl<C> DirectiveInterpreter<C> {
    pub fn new(grammar: Arc<Table<ParseContext<C>>>, resolver: Arc<dyn SymbolResolver<C>>) -> Self {
        Self {
            machine: Machine::new(grammar, ParseContext::new(resolver)),
        }
    }

    /// Interpret one comment-stripped, non-empty line.
    pub fn feed(&mut self, line_num: usize, line: &str) -> Result<(), ParseError> {
        let result = self.dispatch(line_num, line.trim());
        if result.is_err() {
            self.poison();
        }
        result
    }

    fn dispatch(&mut self, line_num: usize, line: &str) -> Result<(), ParseError> {
        let Some((keyword, rest)) = line.split_once(char::is_whitespace) else {
            return Err(ParseError::TooFewTokens {
                directive: line.to_string(),
                line: line_num,
            });
        };
        let unexpected = || ParseError::UnexpectedDirective {
            directive: keyword.to_string(),
            line: line_num,
        };
        let directive = Directive::from_keyword(keyword).ok_or_else(unexpected)?;

        self.machine.context_mut().set_line(line_num, rest.trim());
        match self.machine.handle(directive.keyword(), &[]) {
            Ok(true) => {
                tracing::debug!(
                    directive = directive.name(),
                    line = line_num,
                    position = self.machine.state(),
                    "directive accepted"
                );
                Ok(())
            }
            Ok(false) => Err(unexpected()),
            Err(err) => Err(match err.downcast::<ParseError>() {
                Ok(err) => *err,
                Err(other) => ParseError::ActionFailed {
                    message: other.to_string(),
                    line: line_num,
                },
            }),
        }
    }

    fn poison(&mut self) {
        // The error transition runs no actions.
        if let Err(err) = self.machine.handle(ERROR_EVENT, &[]) {
            tracing::warn!(error = %err, "error transition failed");
        }
    }

    /// Whether a directive has failed.
    pub fn is_poisoned(&self) -> bool {
        self.machine.state() == ERROR_STATE
    }

    /// Current grammar position.
    pub fn position(&self) -> &str {
        self.machine.state()
    }

    /// What has been parsed so far.
    pub fn context(&self) -> &ParseContext<C> {
        self.machine.context()
    }

    /// Stop interpreting and hand over what was parsed.
    pub fn finish(self) -> Parsed<C> {
        self.machine.into_context().into_parsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsl::{grammar, SymbolTable};

    fn interpreter() -> DirectiveInterpreter<()> {
        DirectiveInterpreter::new(Arc::new(grammar::table()), Arc::new(SymbolTable::new()))
    }

    #[test]
    fn positions_follow_directives() {
        let mut interp = interpreter();
        assert_eq!(interp.position(), "init");

        interp.feed(1, "STATE idle").unwrap();
        assert_eq!(interp.position(), "state");
        interp.feed(2, "enter wake").unwrap();
        assert_eq!(interp.position(), "state");
        interp.feed(3, "Event go busy").unwrap();
        assert_eq!(interp.position(), "event");
        interp.feed(4, "ACTION start").unwrap();
        assert_eq!(interp.position(), "event");
        interp.feed(5, "DEFAULT reset idle").unwrap();
        assert_eq!(interp.position(), "default");
        assert_eq!(interp.context().description().states.len(), 1);
        assert_eq!(interp.context().description().defaults.len(), 1);

        let parsed = interp.finish();
        assert_eq!(parsed.first_state(), Some("idle"));
        assert_eq!(parsed.actions(), vec!["start", "wake"]);
    }

    #[test]
    fn keyword_alone_has_too_few_tokens() {
        let err = interpreter().feed(1, "STATE").unwrap_err();
        assert_eq!(err.to_string(), "STATE has too few tokens, line=1");
    }

    #[test]
    fn unknown_keyword_is_unexpected() {
        let err = interpreter().feed(3, "FOO bar").unwrap_err();
        assert_eq!(err.to_string(), "unexpected directive 'FOO', line=3");
    }

    #[test]
    fn error_is_not_a_keyword() {
        let err = interpreter().feed(1, "error here").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedDirective { .. }));
    }

    #[test]
    fn directive_out_of_position_is_unexpected() {
        let mut interp = interpreter();
        let err = interp.feed(1, "EVENT go").unwrap_err();
        assert_eq!(err.to_string(), "unexpected directive 'EVENT', line=1");
        assert!(interp.is_poisoned());
    }

    #[test]
    fn action_error_poisons() {
        let mut interp = interpreter();
        interp.feed(1, "STATE a").unwrap();
        let err = interp.feed(2, "STATE a").unwrap_err();
        assert!(matches!(err, ParseError::DuplicateName { line: 2, .. }));
        assert!(interp.is_poisoned());

        let err = interp.feed(3, "STATE b").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedDirective { line: 3, .. }));
    }
}
