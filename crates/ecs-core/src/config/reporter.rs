//! Reporter configuration

use serde::Deserialize;
use std::time::Duration;

use crate::fanout::DEFAULT_CALL_TIMEOUT;

/// Settings read from `config.toml`. Command-line flags take precedence.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ReporterConfig {
    /// AWS region to query
    pub region: Option<String>,

    /// Cluster used when `--cluster` is not given
    pub cluster: Option<String>,

    /// Suffix appended to every service name
    pub suffix: Option<String>,

    /// Override for the control-plane endpoint (e.g. a local emulator)
    pub endpoint: Option<String>,

    /// Deadline for each describe call, in seconds
    #[serde(with = "super::serde_utils::duration_secs")]
    pub request_timeout: Duration,
}

impl Default for ReporterConfig {
    fn default() -> Self {
        Self {
            region: None,
            cluster: None,
            suffix: None,
            endpoint: None,
            request_timeout: DEFAULT_CALL_TIMEOUT,
        }
    }
}
