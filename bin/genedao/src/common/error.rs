use std::path::PathBuf;

use genedao_deploy::DeployError;

/// Error types for the genedao commands
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Deployment error (configuration, transaction, connectivity, verification)
    #[error(transparent)]
    Deploy(#[from] DeployError),

    /// Failed to read a report file
    #[error("Failed to read report '{}': {source}", path.display())]
    ReportRead {
        /// The report path
        path: PathBuf,
        /// The underlying I/O error
        source: std::io::Error,
    },

    /// Failed to parse a report file
    #[error("Failed to parse report '{}': {source}", path.display())]
    ReportParse {
        /// The report path
        path: PathBuf,
        /// The underlying JSON error
        source: serde_json::Error,
    },

    /// Failed to serialize a report
    #[error("Failed to serialize report for '{}': {source}", path.display())]
    ReportSerialize {
        /// The report path
        path: PathBuf,
        /// The underlying JSON error
        source: serde_json::Error,
    },

    /// Failed to write a report file
    #[error("Failed to write report '{}': {source}", path.display())]
    ReportWrite {
        /// The report path
        path: PathBuf,
        /// The underlying I/O error
        source: std::io::Error,
    },

    /// Failed to create the log file
    #[error("Failed to create log file '{}': {source}", path.display())]
    LogFile {
        /// The log file path
        path: PathBuf,
        /// The underlying I/O error
        source: std::io::Error,
    },
}

impl CliError {
    /// Shorthand for a [`DeployError::Configuration`].
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Deploy(DeployError::Configuration(msg.into()))
    }
}

/// Result type for the genedao commands
pub type Result<T> = std::result::Result<T, CliError>;
