//! ecs-client: the ECS control-plane adapter for ecs-status
//!
//! Implements [`ecs_core::ServiceDescriber`] with the AWS SDK's
//! `DescribeServices` operation. Region and credentials come from the SDK's
//! default provider chains.

pub mod client;
pub mod credentials;
mod convert;

pub use client::{region_provider, EcsClient, DEFAULT_REGION};
pub use credentials::ensure_credentials;
