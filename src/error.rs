//! Error types for blogify operations.

use thiserror::Error;

/// Errors that can occur while converting a document or building the index.
///
/// All variants are deterministic input-validation failures; there is nothing
/// transient to retry. Line numbers are 1-based. Errors raised by the markup
/// transducer count lines within the body it was handed; the conversion
/// driver rebases them to raw-file line numbers before reporting.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed document (line {line}): {reason}")]
    Format { reason: String, line: usize },

    #[error("tab character on line {line}: indentation must use spaces")]
    TabCharacter { line: usize },

    #[error("link [{id}] on line {line} has no matching definition")]
    UnresolvedLink { id: String, line: usize },

    #[error("link on line {line} is missing the `:` after its identifier")]
    MalformedLink { line: usize },
}

impl Error {
    /// Shift any line number in the error by `offset` lines.
    ///
    /// Used by the conversion driver to turn body-relative line numbers into
    /// raw-file line numbers once the front matter offset is known.
    pub fn rebase_line(self, offset: usize) -> Self {
        match self {
            Error::Format { reason, line } => Error::Format {
                reason,
                line: line + offset,
            },
            Error::TabCharacter { line } => Error::TabCharacter {
                line: line + offset,
            },
            Error::UnresolvedLink { id, line } => Error::UnresolvedLink {
                id,
                line: line + offset,
            },
            Error::MalformedLink { line } => Error::MalformedLink {
                line: line + offset,
            },
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
