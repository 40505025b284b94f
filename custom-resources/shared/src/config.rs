use std::time::Duration;

use tracing_subscriber::EnvFilter;

use crate::ProviderError;

pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_RESPONSE_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_OPENSEARCH_CLIENT_PREFIX: &str = "amazonopensearchservice";

/// Runtime configuration shared by the custom resource providers
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub log_level: String,
    pub response_timeout: Duration,
    pub opensearch_client_prefix: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            response_timeout: Duration::from_secs(DEFAULT_RESPONSE_TIMEOUT_SECS),
            opensearch_client_prefix: DEFAULT_OPENSEARCH_CLIENT_PREFIX.to_string(),
        }
    }
}

impl ProviderConfig {
    /// Create provider config from Lambda environment variables set by the template.
    /// Every variable is optional and falls back to its default.
    pub fn from_env() -> Result<Self, ProviderError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like `from_env`, but a bad value never stops the function from starting:
    /// the defaults are used and the error is handed back for logging once
    /// tracing is up. CloudFormation must always receive a response.
    pub fn from_env_or_default() -> (Self, Option<ProviderError>) {
        Self::from_lookup_or_default(|key| std::env::var(key).ok())
    }

    pub fn from_lookup_or_default<F>(lookup: F) -> (Self, Option<ProviderError>)
    where
        F: Fn(&str) -> Option<String>,
    {
        match Self::from_lookup(lookup) {
            Ok(config) => (config, None),
            Err(e) => (Self::default(), Some(e)),
        }
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ProviderError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let log_level = lookup("LOG_LEVEL").unwrap_or(defaults.log_level);

        let response_timeout = match lookup("RESPONSE_TIMEOUT_SECS") {
            Some(raw) => {
                let secs = raw.trim().parse::<u64>().map_err(|_| {
                    ProviderError::ConfigurationError(format!(
                        "RESPONSE_TIMEOUT_SECS must be a whole number of seconds, got '{}'",
                        raw
                    ))
                })?;
                Duration::from_secs(secs)
            }
            None => defaults.response_timeout,
        };

        let opensearch_client_prefix = lookup("OPENSEARCH_CLIENT_PREFIX")
            .map(|prefix| prefix.to_lowercase())
            .unwrap_or(defaults.opensearch_client_prefix);

        Ok(Self {
            log_level,
            response_timeout,
            opensearch_client_prefix,
        })
    }

    /// Tracing filter for `tracing_subscriber`; an unparsable level falls back to info
    pub fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_new(&self.log_level).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL))
    }
}
