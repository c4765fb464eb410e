//! Errors raised while reading a description.

use crate::dsl::resolver::ResolveError;
use crate::dsl::source::SourceError;
use thiserror::Error;

/// Errors that can occur while parsing a description.
///
/// Every variant raised for a directive carries the directive keyword and the
/// 1-based number of the offending line.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("{directive} has too few tokens, line={line}")]
    TooFewTokens { directive: String, line: usize },

    #[error("{directive} must have {expected}, line={line}")]
    ExtraToken {
        directive: String,
        expected: &'static str,
        line: usize,
    },

    #[error("duplicate {directive} name, line={line}")]
    DuplicateName { directive: String, line: usize },

    #[error("duplicate directive '{directive}', line={line}")]
    DuplicateDirective { directive: String, line: usize },

    #[error("unexpected directive '{directive}', line={line}")]
    UnexpectedDirective { directive: String, line: usize },

    #[error("{directive} cannot resolve symbol: {source}, line={line}")]
    UnresolvedSymbol {
        directive: String,
        line: usize,
        source: ResolveError,
    },

    #[error("{directive} expects a {expected} at '{path}', line={line}")]
    UnexpectedSymbol {
        directive: String,
        path: String,
        expected: &'static str,
        line: usize,
    },

    #[error("directive action failed: {message}, line={line}")]
    ActionFailed { message: String, line: usize },

    #[error(transparent)]
    Source(#[from] SourceError),
}

impl ParseError {
    /// Line number of the offending directive, if the error has one.
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::TooFewTokens { line, .. }
            | Self::ExtraToken { line, .. }
            | Self::DuplicateName { line, .. }
            | Self::DuplicateDirective { line, .. }
            | Self::UnexpectedDirective { line, .. }
            | Self::UnresolvedSymbol { line, .. }
            | Self::UnexpectedSymbol { line, .. }
            | Self::ActionFailed { line, .. } => Some(*line),
            Self::Source(_) => None,
        }
    }

    /// Keyword of the offending directive, as written for unexpected ones.
    pub fn directive(&self) -> Option<&str> {
        match self {
            Self::TooFewTokens { directive, .. }
            | Self::ExtraToken { directive, .. }
            | Self::DuplicateName { directive, .. }
            | Self::DuplicateDirective { directive, .. }
            | Self::UnexpectedDirective { directive, .. }
            | Self::UnresolvedSymbol { directive, .. }
            | Self::UnexpectedSymbol { directive, .. } => Some(directive),
            Self::ActionFailed { .. } | Self::Source(_) => None,
        }
    }
}
