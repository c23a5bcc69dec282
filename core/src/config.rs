//! Client configuration: API location, failure policy and user-facing text.

use std::env;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },

    #[error("malformed configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// What a failed like/rate does beyond logging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MutationFailurePolicy {
    /// Log only; the user sees no change.
    #[default]
    Silent,
    /// Also publish `Messages::mutation_failure` on the coordinator's notice channel.
    Surface,
}

impl MutationFailurePolicy {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "silent" => Some(Self::Silent),
            "surface" => Some(Self::Surface),
            _ => None,
        }
    }
}

/// Fixed, localized messages shown instead of raw transport errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Messages {
    pub list_failure: String,
    pub detail_failure: String,
    pub mutation_failure: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            list_failure: "Impossible de charger la liste des films.".to_string(),
            detail_failure: "Impossible de charger le film.".to_string(),
            mutation_failure: "Impossible d'enregistrer votre action.".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    /// `None` leaves requests without a deadline.
    pub request_timeout_secs: Option<u64>,
    pub mutation_failures: MutationFailurePolicy,
    pub messages: Messages,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: None,
            mutation_failures: MutationFailurePolicy::Silent,
            messages: Messages::default(),
        }
    }
}

impl ClientConfig {
    /// Read `CINEMAX_API_URL`, `CINEMAX_REQUEST_TIMEOUT_SECS` and
    /// `CINEMAX_MUTATION_FAILURES`, falling back to defaults when unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(raw)?)
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        match lookup("CINEMAX_API_URL") {
            Some(url) if !url.trim().is_empty() => config.base_url = url.trim().to_string(),
            _ => info!("CINEMAX_API_URL not set, using default: {}", config.base_url),
        }

        if let Some(raw) = lookup("CINEMAX_REQUEST_TIMEOUT_SECS") {
            let secs = raw.trim().parse::<u64>().map_err(|e| {
                warn!("Invalid CINEMAX_REQUEST_TIMEOUT_SECS value: {e}");
                ConfigError::Invalid {
                    key: "CINEMAX_REQUEST_TIMEOUT_SECS",
                    value: raw.clone(),
                }
            })?;
            config.request_timeout_secs = Some(secs);
        }

        if let Some(raw) = lookup("CINEMAX_MUTATION_FAILURES") {
            config.mutation_failures =
                MutationFailurePolicy::parse(&raw).ok_or(ConfigError::Invalid {
                    key: "CINEMAX_MUTATION_FAILURES",
                    value: raw,
                })?;
        }

        Ok(config)
    }
}
