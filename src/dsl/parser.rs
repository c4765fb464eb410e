//! Parsing, binding and building descriptions.

use crate::builder::{build_table, BuildError};
use crate::core::{ActionMap, ContextFactory, Description, ExceptionHook, Table};
use crate::dsl::context::ParseContext;
use crate::dsl::error::ParseError;
use crate::dsl::grammar;
use crate::dsl::interpreter::DirectiveInterpreter;
use crate::dsl::resolver::{SymbolResolver, SymbolTable};
use crate::dsl::source::{directive_lines, LineSource};
use crate::engine::Machine;
use crate::error::Error;
use serde_json::Value;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// Parses descriptions against one symbol resolver.
///
/// The grammar table is built once per parser and shared by every parse.
///
/// # Example
///
/// ```rust
/// use fsm_table::core::Continuation;
/// use fsm_table::dsl::{Parser, SymbolTable};
///
/// let symbols = SymbolTable::<u32>::new()
///     .handler("counter.bump", |n, _args| {
///         *n += 1;
///         Ok(Continuation::Stop)
///     })
///     .unwrap();
///
/// let source = "
///     STATE idle
///         EVENT tick
///             ACTION bump
///     HANDLER bump counter.bump
/// ";
///
/// let mut machine = Parser::new(symbols).load(source, &[]).unwrap();
/// assert!(machine.handle("tick", &[]).unwrap());
/// assert_eq!(*machine.context(), 1);
/// ```
pub struct Parser<C> {
    grammar: Arc<Table<ParseContext<C>>>,
    resolver: Arc<dyn SymbolResolver<C>>,
}

impl<C: 'static> Parser<C> {
    pub fn new(resolver: impl SymbolResolver<C> + 'static) -> Self {
        Self::with_resolver(Arc::new(resolver))
    }

    pub fn with_resolver(resolver: Arc<dyn SymbolResolver<C>>) -> Self {
        Self {
            grammar: Arc::new(grammar::table()),
            resolver,
        }
    }

    /// A fresh interpreter for feeding lines by hand.
    pub fn interpreter(&self) -> DirectiveInterpreter<C> {
        DirectiveInterpreter::new(Arc::clone(&self.grammar), Arc::clone(&self.resolver))
    }

    /// Parse a description, stopping at the first error.
    pub fn parse(&self, source: impl LineSource) -> Result<Parsed<C>, ParseError> {
        let lines = source.into_lines()?;
        let mut interpreter = self.interpreter();
        for (line_num, line) in directive_lines(&lines) {
            interpreter.feed(line_num, line)?;
        }

        let parsed = interpreter.finish();
        tracing::debug!(
            states = parsed.description.states.len(),
            actions = parsed.description.actions.len(),
            handlers = parsed.handlers.len(),
            "description parsed"
        );
        Ok(parsed)
    }

    /// Parse, bind and build in one step.
    ///
    /// `ctor_args` are passed to the CONTEXT factory; without one the machine
    /// gets `C::default()`.
    pub fn load(&self, source: impl LineSource, ctor_args: &[Value]) -> Result<Machine<C>, Error>
    where
        C: Default,
    {
        let mut parsed = self.parse(source)?;
        parsed.bind(ctor_args)?;
        Ok(parsed.into_machine()?)
    }

    /// Like [`Parser::load`], for context types without a default.
    ///
    /// The description must declare a CONTEXT; its factory receives
    /// `ctor_args` and the machine owns what it returns.
    pub fn load_bound(
        &self,
        source: impl LineSource,
        ctor_args: &[Value],
    ) -> Result<Machine<C>, Error> {
        let mut parsed = self.parse(source)?;
        parsed.bind(ctor_args)?;
        Ok(parsed.into_bound_machine(&ActionMap::new())?)
    }
}

impl<C: 'static> Default for Parser<C> {
    fn default() -> Self {
        Self::new(SymbolTable::new())
    }
}

/// Outcome of a successful parse.
pub struct Parsed<C> {
    pub(crate) description: Description,
    factory: Option<ContextFactory<C>>,
    pub(crate) handlers: ActionMap<C>,
    exception: Option<ExceptionHook<C>>,
    context: Option<C>,
}

impl<C> Parsed<C> {
    pub(crate) fn new(
        description: Description,
        factory: Option<ContextFactory<C>>,
        handlers: ActionMap<C>,
        exception: Option<ExceptionHook<C>>,
    ) -> Self {
        Self {
            description,
            factory,
            handlers,
            exception,
            context: None,
        }
    }

    /// The state named by the first STATE directive.
    pub fn first_state(&self) -> Option<&str> {
        self.description.first_state.as_deref()
    }

    /// Every referenced action name, sorted and de-duplicated.
    pub fn actions(&self) -> Vec<&str> {
        self.description.actions.iter().map(String::as_str).collect()
    }

    /// Every declared event name, including default events.
    pub fn events(&self) -> BTreeSet<&str> {
        self.description.events()
    }

    /// Declared state names, in declaration order.
    pub fn states(&self) -> Vec<&str> {
        self.description.state_names()
    }

    /// Handlers bound by HANDLER directives.
    pub fn handlers(&self) -> &ActionMap<C> {
        &self.handlers
    }

    pub fn has_context_factory(&self) -> bool {
        self.factory.is_some()
    }

    pub fn has_exception_hook(&self) -> bool {
        self.exception.is_some()
    }

    /// The context created by [`Parsed::bind`], if any.
    pub fn context(&self) -> Option<&C> {
        self.context.as_ref()
    }

    /// Move out the context created by [`Parsed::bind`].
    pub fn take_context(&mut self) -> Option<C> {
        self.context.take()
    }

    pub fn description(&self) -> &Description {
        &self.description
    }

    /// Regenerate description text that parses back to the same description.
    pub fn dump(&self) -> String {
        self.description.dump()
    }

    /// Create the context by calling the CONTEXT factory with `ctor_args`.
    ///
    /// Does nothing when no CONTEXT was declared.
    pub fn bind(&mut self, ctor_args: &[Value]) -> Result<(), BuildError> {
        if let Some(factory) = &self.factory {
            let context = factory(ctor_args).map_err(BuildError::ContextInit)?;
            tracing::debug!(args = ctor_args.len(), "context created");
            self.context = Some(context);
        }
        Ok(())
    }

    /// Build a machine that owns `context`.
    ///
    /// Actions resolve against the HANDLER bindings and `actions`; an entry
    /// in `actions` overrides a handler of the same name. A resolved
    /// EXCEPTION hook is installed on the machine.
    pub fn build(&self, actions: &ActionMap<C>, context: C) -> Result<Machine<C>, BuildError> {
        let mut bound = self.handlers.clone();
        bound.extend(actions.iter().map(|(name, action)| (name.clone(), Arc::clone(action))));

        let table = build_table(&self.description, &bound)?;
        let mut machine = Machine::new(Arc::new(table), context);
        if let Some(hook) = &self.exception {
            machine.install_exception_hook(Arc::clone(hook));
        }
        Ok(machine)
    }

    /// Build a machine that owns the bound context.
    ///
    /// A declared CONTEXT that was never bound is created with no arguments.
    /// Fails with [`BuildError::NoContext`] when there is no CONTEXT.
    pub fn into_bound_machine(mut self, actions: &ActionMap<C>) -> Result<Machine<C>, BuildError> {
        if self.context.is_none() {
            self.bind(&[])?;
        }
        let context = self.context.take().ok_or(BuildError::NoContext)?;
        self.build(actions, context)
    }

    /// Build a machine from the HANDLER bindings alone.
    ///
    /// Uses the context created by [`Parsed::bind`]. A declared CONTEXT that
    /// was never bound is created with no arguments; with no CONTEXT the
    /// machine gets `C::default()`.
    pub fn into_machine(mut self) -> Result<Machine<C>, BuildError>
    where
        C: Default,
    {
        if self.context.is_none() && self.factory.is_none() {
            self.context = Some(C::default());
        }
        self.into_bound_machine(&ActionMap::new())
    }
}

impl<C> fmt::Debug for Parsed<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parsed")
            .field("description", &self.description)
            .field("handlers", &self.handlers.keys().collect::<Vec<_>>())
            .field("context_factory", &self.factory.is_some())
            .field("exception_hook", &self.exception.is_some())
            .finish_non_exhaustive()
    }
}

/// Parse `source` without a symbol resolver.
///
/// CONTEXT, HANDLER and EXCEPTION directives fail to resolve; use a
/// [`Parser`] with a [`SymbolTable`] for those.
pub fn parse<C: 'static>(source: impl LineSource) -> Result<Parsed<C>, ParseError> {
    Parser::default().parse(source)
}

/// Parse, bind and build `source` against `resolver`.
pub fn load<C: Default + 'static>(
    source: impl LineSource,
    resolver: impl SymbolResolver<C> + 'static,
    ctor_args: &[Value],
) -> Result<Machine<C>, Error> {
    Parser::new(resolver).load(source, ctor_args)
}
