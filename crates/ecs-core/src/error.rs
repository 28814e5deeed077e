//! Core error types for ecs-status

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Top-level error type for an ecs-status run
#[derive(Error, Debug)]
pub enum StatusError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The run was aborted by a fatal batch error
    #[error(transparent)]
    Run(#[from] RunError),

    /// The run finished without a line for every service
    #[error("{0}")]
    Incomplete(String),
}

/// Errors reported by a [`ServiceDescriber`](crate::traits::ServiceDescriber)
/// for a whole batch.
///
/// Per-service lookup failures are not errors; they arrive as
/// [`ServiceFailure`](crate::types::ServiceFailure) records inside a
/// successful [`BatchResult`](crate::types::BatchResult).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DescribeError {
    /// The control plane failed on its side
    #[error("ServerException: {0}")]
    Server(String),

    /// The request was rejected as a client-side error
    #[error("ClientException: {0}")]
    Client(String),

    /// A request parameter was invalid
    #[error("InvalidParameterException: {0}")]
    InvalidParameter(String),

    /// The cluster does not exist
    #[error("an error occurred while trying to find cluster: cluster not found ({0})")]
    ClusterNotFound(String),

    /// Credentials were missing, invalid or lacked permission
    #[error("an error occurred while trying to access aws: invalid credentials or related ({0})")]
    AccessDenied(String),

    /// The call did not finish within its deadline
    #[error("request timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    /// Anything else
    #[error("{0}")]
    Other(String),
}

impl DescribeError {
    /// Whether this error makes the whole run unrecoverable.
    ///
    /// A missing cluster or rejected credentials will fail every batch in the
    /// same way, so there is no point waiting for the siblings.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::ClusterNotFound(_) | Self::AccessDenied(_))
    }
}

/// Errors that end a fan-out run early
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RunError {
    /// A batch failed with an unrecoverable error
    #[error("batch {batch} failed: {error}")]
    Fatal {
        /// Index of the failing batch
        batch: usize,
        /// The error the describer returned
        error: DescribeError,
    },
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file not found
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    /// Invalid configuration
    #[error("Invalid config: {0}")]
    Invalid(String),

    /// TOML parse error
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// Missing required field
    #[error("Missing required field: {0}")]
    MissingField(String),
}
