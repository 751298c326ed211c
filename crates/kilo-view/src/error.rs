//! Line source failures.
//!
//! Opening or reading the file to view is the only thing outside the
//! terminal that can fail. Both cases are fatal and carry the path so the
//! message printed on exit says which file was the problem.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// The file behind a [`Document`](crate::document::Document) could not be
/// loaded.
#[derive(Debug, Error)]
pub enum LineSourceError {
    /// The file could not be opened (missing, permissions, a directory...).
    #[error("{}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file opened but reading it failed part way.
    #[error("{}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl LineSourceError {
    /// The path that failed to load.
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::Open { path, .. } | Self::Read { path, .. } => path,
        }
    }
}
