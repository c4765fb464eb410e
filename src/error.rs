//! Crate-level error.

use crate::builder::BuildError;
use crate::dsl::ParseError;
use thiserror::Error;

/// Any failure of [`load`](crate::dsl::load): reading the description or
/// building the machine from it.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Build(#[from] BuildError),
}

