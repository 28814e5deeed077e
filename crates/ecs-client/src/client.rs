//! ECS `DescribeServices` client

use async_trait::async_trait;
use aws_config::meta::region::RegionProviderChain;
use aws_config::BehaviorVersion;
use aws_sdk_ecs::config::Region;
use aws_sdk_ecs::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};

use ecs_core::types::BatchResult;
use ecs_core::{Batch, ConfigError, DescribeError, ServiceDescriber};

use crate::convert::{batch_result, error_from_code};
use crate::credentials::ensure_credentials;

/// Region used when nothing else names one
pub const DEFAULT_REGION: &str = "us-east-1";

/// Region lookup: `explicit`, then the SDK chain (`AWS_REGION`, profile,
/// instance metadata), then [`DEFAULT_REGION`].
pub fn region_provider(explicit: Option<&str>) -> RegionProviderChain {
    RegionProviderChain::first_try(explicit.map(|r| Region::new(r.to_string())))
        .or_default_provider()
        .or_else(Region::from_static(DEFAULT_REGION))
}

/// Client for the ECS control plane
#[derive(Debug, Clone)]
pub struct EcsClient {
    client: aws_sdk_ecs::Client,
}

impl EcsClient {
    /// Load region and credentials from the environment and build a client.
    ///
    /// `endpoint` replaces the public endpoint, e.g. for a local emulator.
    pub async fn load(region: Option<&str>, endpoint: Option<&str>) -> Result<Self, ConfigError> {
        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(region_provider(region))
            .load()
            .await;
        ensure_credentials(&sdk_config).await?;

        let mut builder = aws_sdk_ecs::config::Builder::from(&sdk_config);
        if let Some(endpoint) = endpoint {
            builder = builder.endpoint_url(check_endpoint(endpoint)?);
        }
        Ok(Self::from_conf(builder.build()))
    }

    /// Build a client from a complete SDK configuration
    pub fn from_conf(config: aws_sdk_ecs::Config) -> Self {
        Self {
            client: aws_sdk_ecs::Client::from_conf(config),
        }
    }

    /// Region requests are sent to
    pub fn region(&self) -> Option<&str> {
        self.client.config().region().map(|r| r.as_ref())
    }
}

fn check_endpoint(endpoint: &str) -> Result<&str, ConfigError> {
    let host = endpoint
        .strip_prefix("https://")
        .or_else(|| endpoint.strip_prefix("http://"))
        .ok_or_else(|| {
            ConfigError::Invalid(format!(
                "Endpoint {:?} must start with http:// or https://",
                endpoint
            ))
        })?;
    if host.is_empty() || host.starts_with('/') {
        return Err(ConfigError::Invalid(format!(
            "Endpoint {:?} has no host",
            endpoint
        )));
    }
    Ok(endpoint)
}

#[async_trait]
impl ServiceDescriber for EcsClient {
    async fn describe(&self, cluster: &str, batch: &Batch) -> Result<BatchResult, DescribeError> {
        tracing::debug!(cluster, services = batch.len(), "Sending DescribeServices");

        let output = self
            .client
            .describe_services()
            .cluster(cluster)
            .set_services(Some(
                batch.services().iter().map(|s| s.as_str().to_string()).collect(),
            ))
            .send()
            .await
            .map_err(|e| match e {
                SdkError::ServiceError(context) => {
                    let status = context.raw().status().as_u16();
                    let err = context.err();
                    error_from_code(status, err.code(), err.message())
                }
                other => DescribeError::Other(format!(
                    "Request failed: {}",
                    DisplayErrorContext(&other)
                )),
            })?;

        Ok(batch_result(&output))
    }
}
