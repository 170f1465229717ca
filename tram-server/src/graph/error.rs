//! Graph error types.

use std::path::PathBuf;

use super::DataVersion;

/// Errors from the graph store and graph persistence.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// The store cannot hand out read transactions
    #[error("graph store is unavailable")]
    Unavailable,

    #[error("failed to access graph file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The persisted graph could not be decoded
    #[error("graph file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("graph version {found} does not match expected {expected}")]
    VersionMismatch {
        expected: DataVersion,
        found: DataVersion,
    },
}

impl GraphError {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        GraphError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}
