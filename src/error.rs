use std::path::{Path, PathBuf};

use crate::common::ChromNumber;

/// Errors that can occur while building or running a simulation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("no centromere reference for chromosome {chrom}")]
    Lookup { chrom: ChromNumber },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("degenerate crossover model for chromosome {chrom}: {reason}")]
    DegenerateModel { chrom: ChromNumber, reason: String },

    #[error("no crossover pair at least {min_separation} bins apart after {retries} redraws")]
    NonConvergence { retries: usize, min_separation: usize },

    #[error("parse error at line {line}: {msg}")]
    Parse { line: usize, msg: String },

    #[error("I/O error: {source} ({path})")]
    Io {
        source: std::io::Error,
        path: PathBuf,
    },
}

impl Error {
    /// Wrap an `io::Error` with the path that produced it.
    pub fn io(source: std::io::Error, path: impl Into<PathBuf>) -> Self {
        Self::Io {
            source,
            path: path.into(),
        }
    }

    /// Point an I/O error raised while reading `path` at that path.
    pub(crate) fn at_path(self, path: &Path) -> Self {
        match self {
            Self::Io { source, .. } => Self::io(source, path),
            other => other,
        }
    }

    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            source: err,
            path: PathBuf::from("<unknown>"),
        }
    }
}
