//! Resolution of dotted symbol paths.
//!
//! CONTEXT, HANDLER and EXCEPTION directives name callables by dotted path
//! (`app.lights.turn_on`). The parser looks those paths up through a
//! [`SymbolResolver`]; [`SymbolTable`] is the in-memory implementation,
//! a namespace tree with one level per path segment.

use crate::core::{
    Action, ActionError, ActionResult, ContextFactory, Continuation, ExceptionHook,
};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;

/// Errors raised while registering or resolving a symbol path.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("'{path}' has no segment '{segment}'")]
    Unresolved { path: String, segment: String },

    #[error("'{path}' names a namespace, not a symbol")]
    NotASymbol { path: String },

    #[error("'{path}' is not a valid dotted path")]
    InvalidPath { path: String },

    #[error("'{path}' is already registered")]
    Conflict { path: String },
}

/// A resolved callable.
pub enum Symbol<C> {
    /// Creates the machine context (CONTEXT)
    Context(ContextFactory<C>),

    /// An action callable (HANDLER)
    Handler(Action<C>),

    /// Turns action errors into events (EXCEPTION)
    Exception(ExceptionHook<C>),
}

impl<C> Symbol<C> {
    /// Human-readable kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Context(_) => "context factory",
            Self::Handler(_) => "handler",
            Self::Exception(_) => "exception hook",
        }
    }
}

impl<C> Clone for Symbol<C> {
    fn clone(&self) -> Self {
        match self {
            Self::Context(f) => Self::Context(Arc::clone(f)),
            Self::Handler(f) => Self::Handler(Arc::clone(f)),
            Self::Exception(f) => Self::Exception(Arc::clone(f)),
        }
    }
}

/// Looks up callables by dotted path.
pub trait SymbolResolver<C>: Send + Sync {
    fn resolve(&self, path: &str) -> Result<Symbol<C>, ResolveError>;
}

enum Node<C> {
    Namespace(BTreeMap<String, Node<C>>),
    Symbol(Symbol<C>),
}

/// In-memory namespace tree of symbols.
///
/// # Example
///
/// ```rust
/// use fsm_table::core::Continuation;
/// use fsm_table::dsl::{SymbolResolver, SymbolTable};
///
/// let symbols = SymbolTable::<u32>::new()
///     .handler("lights.turn_on", |n, _args| {
///         *n += 1;
///         Ok(Continuation::Stop)
///     })
///     .unwrap();
///
/// assert!(symbols.resolve("lights.turn_on").is_ok());
/// assert!(symbols.resolve("lights.turn_off").is_err());
/// ```
pub struct SymbolTable<C> {
    root: BTreeMap<String, Node<C>>,
}

impl<C> SymbolTable<C> {
    pub fn new() -> Self {
        Self {
            root: BTreeMap::new(),
        }
    }

    /// Register `symbol` under `path`, creating namespaces as needed.
    pub fn register(&mut self, path: &str, symbol: Symbol<C>) -> Result<(), ResolveError> {
        let segments = segments(path)?;
        let conflict = || ResolveError::Conflict {
            path: path.to_string(),
        };
        let Some((last, parents)) = segments.split_last() else {
            return Err(invalid(path));
        };

        let mut level = &mut self.root;
        for segment in parents {
            let node = level
                .entry(segment.to_string())
                .or_insert_with(|| Node::Namespace(BTreeMap::new()));
            level = match node {
                Node::Namespace(children) => children,
                Node::Symbol(_) => return Err(conflict()),
            };
        }
        if level.contains_key(*last) {
            return Err(conflict());
        }
        level.insert(last.to_string(), Node::Symbol(symbol));
        Ok(())
    }

    /// Register a context factory.
    pub fn context<F>(mut self, path: &str, factory: F) -> Result<Self, ResolveError>
    where
        F: Fn(&[Value]) -> Result<C, ActionError> + Send + Sync + 'static,
    {
        self.register(path, Symbol::Context(Arc::new(factory)))?;
        Ok(self)
    }

    /// Register a handler.
    pub fn handler<F>(mut self, path: &str, handler: F) -> Result<Self, ResolveError>
    where
        F: Fn(&mut C, &[Value]) -> ActionResult + Send + Sync + 'static,
    {
        self.register(path, Symbol::Handler(Arc::new(handler)))?;
        Ok(self)
    }

    /// Register an exception hook.
    pub fn exception<F>(mut self, path: &str, hook: F) -> Result<Self, ResolveError>
    where
        F: Fn(&mut C, &ActionError) -> Continuation + Send + Sync + 'static,
    {
        self.register(path, Symbol::Exception(Arc::new(hook)))?;
        Ok(self)
    }
}

impl<C> Default for SymbolTable<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> SymbolResolver<C> for SymbolTable<C> {
    fn resolve(&self, path: &str) -> Result<Symbol<C>, ResolveError> {
        let mut level = &self.root;
        let mut segments = segments(path)?.into_iter().peekable();
        while let Some(segment) = segments.next() {
            let unresolved = || ResolveError::Unresolved {
                path: path.to_string(),
                segment: segment.to_string(),
            };
            match level.get(segment).ok_or_else(unresolved)? {
                Node::Namespace(children) => level = children,
                Node::Symbol(symbol) => {
                    return match segments.next() {
                        None => Ok(symbol.clone()),
                        Some(extra) => Err(ResolveError::Unresolved {
                            path: path.to_string(),
                            segment: extra.to_string(),
                        }),
                    };
                }
            }
        }
        Err(ResolveError::NotASymbol {
            path: path.to_string(),
        })
    }
}

fn invalid(path: &str) -> ResolveError {
    ResolveError::InvalidPath {
        path: path.to_string(),
    }
}

fn segments(path: &str) -> Result<Vec<&str>, ResolveError> {
    let segments: Vec<&str> = path.split('.').collect();
    if segments.iter().any(|s| s.is_empty() || s.chars().any(char::is_whitespace)) {
        return Err(invalid(path));
    }
    Ok(segments)
}
