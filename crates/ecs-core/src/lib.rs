//! ecs-core: batching, classification and fan-out for ecs-status
//!
//! This crate turns a list of service names into concurrent, bounded-size
//! describe requests against the container control plane and classifies
//! every answer into a presentable status line. The control plane itself is
//! reached through the [`ServiceDescriber`] trait.

pub mod classify;
pub mod config;
pub mod error;
pub mod fanout;
pub mod partition;
pub mod traits;
pub mod types;

pub use error::{ConfigError, DescribeError, RunError, StatusError};
pub use fanout::{FanOut, Progress, RunSummary, StatusStream};
pub use partition::{partition, Batch, MAX_SERVICES_PER_REQUEST};
pub use traits::ServiceDescriber;
pub use types::{Category, ServiceName, StatusLine};
