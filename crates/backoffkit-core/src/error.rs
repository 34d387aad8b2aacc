//! Errors raised while loading declarative backoff settings.
//!
//! Sequences themselves never fail: exhaustion is reported as `None` from
//! [`Sequence::next_delay`](crate::retry::Sequence::next_delay). Only turning
//! untrusted configuration into a sequence can go wrong.

use thiserror::Error;

/// Failure to parse or validate [`BackoffSettings`](crate::settings::BackoffSettings).
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The TOML document could not be parsed into settings.
    #[error("invalid TOML backoff settings: {0}")]
    Toml(String),

    /// The JSON document could not be parsed into settings.
    #[error("invalid JSON backoff settings: {0}")]
    Json(#[from] serde_json::Error),

    /// Growth factor is NaN or infinite.
    #[error("growth factor must be a finite number, got {factor}")]
    InvalidFactor {
        /// The rejected factor.
        factor: f64,
    },

    /// Both interval bounds are set and the floor exceeds the ceiling.
    #[error("min_interval_ms ({min}) exceeds max_interval_ms ({max})")]
    InvertedBounds {
        /// Configured floor in milliseconds.
        min: u64,
        /// Configured ceiling in milliseconds.
        max: u64,
    },

    /// A jitter strategy name that is not one of `none`, `full`, `equal`.
    #[error("unknown jitter strategy '{0}'; expected 'none', 'full' or 'equal'")]
    UnknownJitter(String),
}

impl From<toml::de::Error> for SettingsError {
    fn from(err: toml::de::Error) -> Self {
        SettingsError::Toml(err.to_string())
    }
}
