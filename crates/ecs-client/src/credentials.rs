//! AWS credential checks
//!
//! Credentials come from the SDK's default provider chain: environment
//! variables, shared config and credentials files (profiles, SSO,
//! `credential_process`), web identity, and container or instance roles.

use aws_config::SdkConfig;
use aws_credential_types::provider::ProvideCredentials;
use aws_sdk_ecs::error::DisplayErrorContext;

use ecs_core::ConfigError;

/// Resolve credentials once so a missing identity is reported before any
/// request is sent.
pub async fn ensure_credentials(config: &SdkConfig) -> Result<(), ConfigError> {
    let provider = config.credentials_provider().ok_or_else(|| {
        ConfigError::MissingField("AWS credentials (no credentials provider configured)".to_string())
    })?;

    match provider.provide_credentials().await {
        Ok(credentials) => {
            tracing::debug!(
                access_key_id = credentials.access_key_id(),
                "Resolved AWS credentials"
            );
            Ok(())
        }
        Err(e) => Err(ConfigError::MissingField(format!(
            "AWS credentials ({})",
            DisplayErrorContext(&e)
        ))),
    }
}
