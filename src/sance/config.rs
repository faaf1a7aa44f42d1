use std::path::PathBuf;
use std::time::Duration;

use derive_builder::Builder;

use super::retry::RetryPolicy;
use super::slug::MAX_SLUG_LEN;
use crate::ConfigError;

/// Knobs for a batch run.
///
/// ```
/// use std::time::Duration;
/// use sance_rs::sance::OrchestratorConfigBuilder;
///
/// let config = OrchestratorConfigBuilder::default()
///     .concurrency(4usize)
///     .base_delay(Duration::from_millis(500))
///     .cache_dir("/tmp/sance")
///     .build()
///     .unwrap();
/// assert_eq!(config.max_attempts, 5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
#[builder(
    setter(into),
    default,
    build_fn(validate = "Self::validate", error = "ConfigError")
)]
pub struct OrchestratorConfig {
    /// Utterances resolved at the same time; each group finishes before the next starts.
    pub concurrency: usize,
    /// Attempts per retried stage.
    pub max_attempts: u32,
    /// Delay after the first failed attempt; doubles after each further one.
    pub base_delay: Duration,
    pub attempt_timeout: Duration,
    pub cache_dir: PathBuf,
    pub slug_limit: usize,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        let policy = RetryPolicy::default();
        Self {
            concurrency: 2,
            max_attempts: policy.max_attempts,
            base_delay: policy.base_delay,
            attempt_timeout: policy.attempt_timeout,
            cache_dir: PathBuf::from("data/sance"),
            slug_limit: MAX_SLUG_LEN,
        }
    }
}

impl OrchestratorConfig {
    pub fn builder() -> OrchestratorConfigBuilder {
        OrchestratorConfigBuilder::default()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_positive("concurrency", self.concurrency as u128)?;
        check_positive("max_attempts", self.max_attempts as u128)?;
        check_positive("attempt_timeout", self.attempt_timeout.as_nanos())?;
        check_positive("slug_limit", self.slug_limit as u128)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            base_delay: self.base_delay,
            attempt_timeout: self.attempt_timeout,
        }
    }
}

impl OrchestratorConfigBuilder {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.concurrency == Some(0) {
            return Err(ConfigError::Zero("concurrency"));
        }
        if self.max_attempts == Some(0) {
            return Err(ConfigError::Zero("max_attempts"));
        }
        if self.attempt_timeout == Some(Duration::ZERO) {
            return Err(ConfigError::Zero("attempt_timeout"));
        }
        if self.slug_limit == Some(0) {
            return Err(ConfigError::Zero("slug_limit"));
        }
        Ok(())
    }
}

fn check_positive(field: &'static str, value: u128) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::Zero(field));
    }
    Ok(())
}
