use thiserror::Error;

use datoso_dat::DatError;

/// Errors that can occur during CLI command execution.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// I/O error
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// DAT file error
    #[error("DAT error: {0}")]
    Dat(#[from] DatError),

    /// JSON output error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Some files of a batch failed; each was already reported
    #[error("{failed} of {total} files failed")]
    Batch { failed: usize, total: usize },

    /// Catch-all for other errors
    #[error("{0}")]
    Other(String),
}

impl CliError {
    pub(crate) fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}
