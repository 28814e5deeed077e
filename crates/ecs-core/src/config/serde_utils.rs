//! Shared deserialization helpers for configuration

/// Deserialize a `Duration` from a whole number of seconds.
///
/// ```ignore
/// #[derive(Deserialize)]
/// struct Config {
///     #[serde(with = "ecs_core::config::serde_utils::duration_secs")]
///     timeout: Duration,
/// }
/// ```
pub mod duration_secs {
    use serde::{Deserialize, Deserializer};
    use std::time::Duration;

    /// Deserialize a Duration from seconds (u64)
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
