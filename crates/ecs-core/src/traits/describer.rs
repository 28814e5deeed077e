//! Describer trait

use async_trait::async_trait;

use crate::error::DescribeError;
use crate::partition::Batch;
use crate::types::BatchResult;

/// Abstraction over the control plane's "describe services" call
#[async_trait]
pub trait ServiceDescriber: Send + Sync {
    /// Describe every service in `batch` within `cluster`.
    ///
    /// Services the control plane cannot resolve come back as failures in
    /// the result; `Err` is reserved for problems with the whole request.
    async fn describe(&self, cluster: &str, batch: &Batch) -> Result<BatchResult, DescribeError>;
}
