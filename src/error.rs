//! User-facing failures.
//!
//! Every variant ends the run with exit status 1.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors reported to the user on stderr.
#[derive(Debug, Error)]
pub enum Error {
    /// A `--<flag>` option names neither a flag nor an alias.
    #[error("Unknown flag '{0}'")]
    UnknownFlag(String),

    /// An input file could not be opened.
    #[error("Could not open {} for reading", path.display())]
    Open {
        /// Path given on the command line.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Any other command line problem.
    #[error(transparent)]
    Usage(#[from] clap::Error),
}
