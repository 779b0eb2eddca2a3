//! Errors from external tool invocations.

use thiserror::Error;

/// Errors that can occur while invoking an external conversion tool.
#[derive(Debug, Error)]
pub enum ExternalError {
    /// The tool binary could not be launched
    #[error("failed to launch {tool}: {source}")]
    Launch {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    /// The tool ran but exited non-zero
    #[error("{tool} exited with {status}: {stderr}")]
    ToolFailed {
        tool: String,
        status: String,
        stderr: String,
    },

    /// The tool exited successfully but the expected output file is missing
    #[error("{tool} produced no output artifact")]
    MissingOutput { tool: String },

    /// Scratch workspace I/O failed
    #[error("workspace I/O error: {0}")]
    Workspace(#[from] std::io::Error),
}

impl ExternalError {
    /// External tool failures surface as bad-gateway; workspace faults as
    /// internal errors.
    pub fn to_http_status(&self) -> u16 {
        match self {
            ExternalError::Launch { .. }
            | ExternalError::ToolFailed { .. }
            | ExternalError::MissingOutput { .. } => 502,
            ExternalError::Workspace(_) => 500,
        }
    }
}
