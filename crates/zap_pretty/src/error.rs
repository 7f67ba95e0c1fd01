//! Error types.
//!
//! Only I/O and configuration problems are errors. Lines that cannot be
//! interpreted are not: they are passed through (see
//! [`ExtractError`](crate::record::ExtractError)).

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while configuring or running the pipeline.
#[derive(Error, Debug)]
pub enum Error {
    /// Reading input or writing output failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// An input file could not be opened.
    #[error("cannot open {}: {source}", path.display())]
    OpenInput {
        /// The path given on the command line.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// The display time zone is not a known IANA zone name.
    #[error("unknown time zone: {0:?}")]
    UnknownTimezone(String),
}

/// A specialized [`Result`](std::result::Result) for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;
