//! Core domain types

use std::fmt;
use std::str::FromStr;

use crate::classify::revision;
use crate::error::ConfigError;

/// Name of a service within a cluster
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServiceName(String);

impl ServiceName {
    /// Create a new service name
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Get the raw name
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServiceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ServiceName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ServiceName {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Build the list of service names to look up.
///
/// `raw` is the comma-separated list given on the command line; `suffix` is
/// appended to every entry. Surrounding whitespace is trimmed and empty
/// entries are rejected.
pub fn service_names(raw: &str, suffix: &str) -> Result<Vec<ServiceName>, ConfigError> {
    raw.split(',')
        .map(|name| {
            let name = name.trim();
            if name.is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "empty service name in list {:?}",
                    raw
                )));
            }
            Ok(ServiceName::new(format!("{}{}", name, suffix.trim())))
        })
        .collect()
}

/// Coarse lifecycle state reported by the control plane
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleStatus {
    Active,
    Draining,
    Deactivating,
    Inactive,
    Stopped,
    /// Any status this tool does not know about, kept verbatim
    Other(String),
}

impl LifecycleStatus {
    /// The control plane's spelling of this status
    pub fn as_str(&self) -> &str {
        match self {
            Self::Active => "ACTIVE",
            Self::Draining => "DRAINING",
            Self::Deactivating => "DEACTIVATING",
            Self::Inactive => "INACTIVE",
            Self::Stopped => "STOPPED",
            Self::Other(raw) => raw,
        }
    }
}

impl From<&str> for LifecycleStatus {
    fn from(s: &str) -> Self {
        match s {
            "ACTIVE" => Self::Active,
            "DRAINING" => Self::Draining,
            "DEACTIVATING" => Self::Deactivating,
            "INACTIVE" => Self::Inactive,
            "STOPPED" => Self::Stopped,
            other => Self::Other(other.to_string()),
        }
    }
}

impl FromStr for LifecycleStatus {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl fmt::Display for LifecycleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One task-definition revision currently attached to a service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deployment {
    /// Task definition reference, `<family>:<revision>` or a full ARN
    pub task_definition: String,
}

impl Deployment {
    /// Create a deployment for a task definition reference
    pub fn new(task_definition: impl Into<String>) -> Self {
        Self {
            task_definition: task_definition.into(),
        }
    }

    /// Revision part of the task definition reference
    pub fn revision(&self) -> &str {
        revision(&self.task_definition)
    }
}

/// Status of a single service as returned by the control plane
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceStatus {
    pub name: ServiceName,
    pub status: LifecycleStatus,
    pub desired_count: u32,
    pub running_count: u32,
    /// Deployments in control-plane order (PRIMARY first)
    pub deployments: Vec<Deployment>,
    /// The task definition the service is supposed to run
    pub task_definition: String,
}

impl ServiceStatus {
    /// Revision the service is supposed to run
    pub fn primary_revision(&self) -> &str {
        revision(&self.task_definition)
    }

    /// Revision of the most recent deployment, if there is one
    pub fn latest_revision(&self) -> Option<&str> {
        self.deployments.first().map(Deployment::revision)
    }
}

/// A service the control plane could not resolve
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceFailure {
    pub arn: String,
    pub reason: String,
}

/// Successful answer for one batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchResult {
    pub services: Vec<ServiceStatus>,
    pub failures: Vec<ServiceFailure>,
}

impl BatchResult {
    /// Number of status lines this result produces
    pub fn len(&self) -> usize {
        self.services.len() + self.failures.len()
    }

    /// Whether the result carries nothing at all
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// User-facing classification of a service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Single deployment on the desired revision, all tasks running
    Healthy,
    /// Service is being torn down
    Transitioning,
    /// Service is inactive or stopped
    Stopped,
    /// The control plane could not resolve the service
    Unreachable,
    /// Anything that has not converged yet
    ActiveNotRunning,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Healthy => "healthy",
            Self::Transitioning => "transitioning",
            Self::Stopped => "stopped",
            Self::Unreachable => "unreachable",
            Self::ActiveNotRunning => "active, not running",
        };
        f.write_str(label)
    }
}

/// A classified, formatted line ready to be presented
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub category: Category,
    pub message: String,
}

impl StatusLine {
    pub fn new(category: Category, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_names_appends_suffix() {
        let names = service_names("api, worker,web", "-qa").unwrap();
        assert_eq!(
            names,
            vec![
                ServiceName::from("api-qa"),
                ServiceName::from("worker-qa"),
                ServiceName::from("web-qa"),
            ]
        );
    }

    #[test]
    fn test_service_names_without_suffix() {
        let names = service_names("api", "").unwrap();
        assert_eq!(names, vec![ServiceName::from("api")]);
    }

    #[test]
    fn test_service_names_rejects_empty_entries() {
        assert!(matches!(
            service_names("api,,web", ""),
            Err(ConfigError::Invalid(_))
        ));
        assert!(service_names("", "-qa").is_err());
    }

    #[test]
    fn test_lifecycle_status_parse() {
        assert_eq!(LifecycleStatus::from("ACTIVE"), LifecycleStatus::Active);
        assert_eq!(LifecycleStatus::from("DRAINING"), LifecycleStatus::Draining);
        assert_eq!(
            "PENDING".parse::<LifecycleStatus>().unwrap(),
            LifecycleStatus::Other("PENDING".to_string())
        );
        // Matching is exact; the control plane always sends upper case
        assert_eq!(
            LifecycleStatus::from("active"),
            LifecycleStatus::Other("active".to_string())
        );
    }

    #[test]
    fn test_lifecycle_status_display_round_trips_raw_text() {
        assert_eq!(LifecycleStatus::Inactive.to_string(), "INACTIVE");
        assert_eq!(LifecycleStatus::from("WEIRD").to_string(), "WEIRD");
    }

    #[test]
    fn test_latest_revision_uses_first_deployment() {
        let status = ServiceStatus {
            name: "api".into(),
            status: LifecycleStatus::Active,
            desired_count: 2,
            running_count: 1,
            deployments: vec![Deployment::new("api:8"), Deployment::new("api:7")],
            task_definition: "api:8".to_string(),
        };

        assert_eq!(status.primary_revision(), "8");
        assert_eq!(status.latest_revision(), Some("8"));
    }

    #[test]
    fn test_batch_result_len() {
        let result = BatchResult {
            services: vec![],
            failures: vec![ServiceFailure {
                arn: "arn:1".into(),
                reason: "MISSING".into(),
            }],
        };
        assert_eq!(result.len(), 1);
        assert!(!result.is_empty());
        assert!(BatchResult::default().is_empty());
    }
}
