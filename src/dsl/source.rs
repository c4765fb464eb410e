//! Line sources for descriptions.
//!
//! A description can come from text, a sequence of lines, a file path or an
//! open reader. Whatever the origin, lines are comment-stripped and trimmed
//! the same way before the interpreter sees them.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while loading description lines.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("cannot read {}: {source}", .path.display())]
    Open { path: PathBuf, source: io::Error },

    #[error("cannot read description: {0}")]
    Read(#[from] io::Error),
}

/// Anything that yields the raw lines of a description.
///
/// `&str` and `String` are treated as description text, not as file names;
/// use a [`Path`] or [`PathBuf`] to read a file.
pub trait LineSource {
    fn into_lines(self) -> Result<Vec<String>, SourceError>;
}

impl LineSource for &str {
    fn into_lines(self) -> Result<Vec<String>, SourceError> {
        Ok(self.lines().map(String::from).collect())
    }
}

impl LineSource for String {
    fn into_lines(self) -> Result<Vec<String>, SourceError> {
        self.as_str().into_lines()
    }
}

impl<S: AsRef<str>> LineSource for Vec<S> {
    fn into_lines(self) -> Result<Vec<String>, SourceError> {
        Ok(self.iter().map(|l| l.as_ref().to_string()).collect())
    }
}

impl<S: AsRef<str>> LineSource for &[S] {
    fn into_lines(self) -> Result<Vec<String>, SourceError> {
        Ok(self.iter().map(|l| l.as_ref().to_string()).collect())
    }
}

impl<S: AsRef<str>, const N: usize> LineSource for [S; N] {
    fn into_lines(self) -> Result<Vec<String>, SourceError> {
        Ok(self.iter().map(|l| l.as_ref().to_string()).collect())
    }
}

impl LineSource for &Path {
    fn into_lines(self) -> Result<Vec<String>, SourceError> {
        let file = File::open(self).map_err(|source| SourceError::Open {
            path: self.to_path_buf(),
            source,
        })?;
        Reader(file).into_lines()
    }
}

impl LineSource for PathBuf {
    fn into_lines(self) -> Result<Vec<String>, SourceError> {
        self.as_path().into_lines()
    }
}

/// An open handle to read a description from.
pub struct Reader<R>(pub R);

impl<R: Read> LineSource for Reader<R> {
    fn into_lines(self) -> Result<Vec<String>, SourceError> {
        Ok(BufReader::new(self.0)
            .lines()
            .collect::<Result<Vec<_>, io::Error>>()?)
    }
}

/// Drop a trailing `#` comment and surrounding whitespace.
pub fn un_comment(line: &str) -> &str {
    line.split_once('#').map_or(line, |(code, _)| code).trim()
}

/// Comment-stripped, non-empty lines paired with their 1-based line numbers.
pub(crate) fn directive_lines(lines: &[String]) -> impl Iterator<Item = (usize, &str)> {
    lines
        .iter()
        .enumerate()
        .map(|(i, line)| (i + 1, un_comment(line)))
        .filter(|(_, line)| !line.is_empty())
}
