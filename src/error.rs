//! Fatal error type
//!
//! Only failures that end the run live here. Problems with a single entry
//! are reported through [`crate::output::Reporter`] and the entry is skipped.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot access '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid filter pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("template error: {0}")]
    Template(#[from] minijinja::Error),

    #[error("cannot read template '{}': {source}", path.display())]
    TemplateFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("error writing output: {0}")]
    Output(#[from] std::io::Error),

    #[error(
        "incomplete write: only {written} of {expected} bytes were written to '{}'",
        path.display()
    )]
    IncompleteWrite {
        written: usize,
        expected: usize,
        path: PathBuf,
    },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
