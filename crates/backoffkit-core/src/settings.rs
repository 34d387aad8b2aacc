//! Declarative backoff settings for configuration files.
//!
//! Services usually keep their retry policy next to the rest of their
//! configuration. [`BackoffSettings`] is the serde form of a complete
//! sequence: which algorithm, its parameters and the shared limits.
//!
//! # Example
//!
//! ```
//! use backoffkit_core::retry::Sequence;
//! use backoffkit_core::settings::BackoffSettings;
//! use std::time::Duration;
//!
//! let settings = BackoffSettings::from_toml_str(r#"
//!     kind = "exponential"
//!     base_ms = 100
//!     factor = 2.0
//!     max_retries = 4
//!     max_interval_ms = 1000
//!     jitter = "none"
//! "#)?;
//!
//! let mut backoff = settings.build()?;
//! let delays: Vec<_> = backoff.iter().collect();
//! assert_eq!(delays, [100, 200, 400, 800].map(Duration::from_millis).to_vec());
//! # Ok::<(), backoffkit_core::error::SettingsError>(())
//! ```

use crate::config::BackoffConfig;
use crate::error::SettingsError;
use crate::retry::{
    Constant, DEFAULT_DECORRELATED_FACTOR, DEFAULT_EXPONENTIAL_FACTOR, Decorrelated,
    Exponential, JitterKind, Sequence,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A complete, serializable description of a delay sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackoffSettings {
    /// Algorithm and its parameters.
    #[serde(flatten)]
    pub algorithm: AlgorithmSettings,

    /// Limits shared by all algorithms.
    #[serde(flatten)]
    pub limits: LimitSettings,
}

/// Algorithm selector, tagged by `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AlgorithmSettings {
    /// [`Constant`] backoff.
    Constant {
        /// Fixed delay in milliseconds.
        interval_ms: u64,
    },

    /// [`Exponential`] backoff.
    Exponential {
        /// First delay in milliseconds.
        base_ms: u64,
        /// Growth factor; values not above 1.0 fall back to 2.0.
        #[serde(default = "default_exponential_factor")]
        factor: f64,
    },

    /// [`Decorrelated`] backoff.
    Decorrelated {
        /// First delay in milliseconds.
        initial_ms: u64,
        /// Growth factor; values not above 1.0 fall back to 3.0.
        #[serde(default = "default_decorrelated_factor")]
        factor: f64,
    },
}

fn default_exponential_factor() -> f64 {
    DEFAULT_EXPONENTIAL_FACTOR
}

fn default_decorrelated_factor() -> f64 {
    DEFAULT_DECORRELATED_FACTOR
}

/// Limits and randomization shared by every algorithm.
///
/// Every field is optional; a missing field keeps the [`BackoffConfig`]
/// default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitSettings {
    /// Retry limit; negative means unlimited.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_retries: Option<i64>,

    /// Elapsed budget in milliseconds; 0 means unlimited.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_elapsed_ms: Option<u64>,

    /// Delay floor in milliseconds; 0 disables it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_interval_ms: Option<u64>,

    /// Delay ceiling in milliseconds; 0 disables it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_interval_ms: Option<u64>,

    /// Built-in jitter strategy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jitter: Option<JitterKind>,

    /// Seed for the random source; unset keeps the fixed default seed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl BackoffSettings {
    /// Parse settings from a TOML document.
    pub fn from_toml_str(input: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(input)?)
    }

    /// Parse settings from a JSON document.
    pub fn from_json_str(input: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(input)?)
    }

    /// Build the [`BackoffConfig`] described by the limits.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvertedBounds`] when both interval bounds
    /// are enabled and the floor exceeds the ceiling.
    pub fn to_config(&self) -> Result<BackoffConfig, SettingsError> {
        self.limits.to_config()
    }

    /// Build the sequence these settings describe.
    ///
    /// # Errors
    ///
    /// - [`SettingsError::InvalidFactor`] for a NaN or infinite factor
    /// - [`SettingsError::InvertedBounds`] as in [`Self::to_config`]
    pub fn build(&self) -> Result<Box<dyn Sequence + Send>, SettingsError> {
        let config = self.to_config()?;

        let sequence: Box<dyn Sequence + Send> = match self.algorithm {
            AlgorithmSettings::Constant { interval_ms } => {
                Box::new(Constant::new(Duration::from_millis(interval_ms), config))
            }
            AlgorithmSettings::Exponential { base_ms, factor } => Box::new(Exponential::new(
                Duration::from_millis(base_ms),
                finite_factor(factor)?,
                config,
            )),
            AlgorithmSettings::Decorrelated { initial_ms, factor } => {
                Box::new(Decorrelated::new(
                    Duration::from_millis(initial_ms),
                    finite_factor(factor)?,
                    config,
                ))
            }
        };

        Ok(sequence)
    }
}

impl LimitSettings {
    fn to_config(&self) -> Result<BackoffConfig, SettingsError> {
        if let (Some(min), Some(max)) = (self.min_interval_ms, self.max_interval_ms)
            && min > 0
            && max > 0
            && min > max
        {
            return Err(SettingsError::InvertedBounds { min, max });
        }

        let mut builder = BackoffConfig::builder();
        if let Some(max_retries) = self.max_retries {
            builder = builder.max_retries_signed(max_retries);
        }
        if let Some(ms) = self.max_elapsed_ms {
            builder = builder.max_elapsed(Duration::from_millis(ms));
        }
        if let Some(ms) = self.min_interval_ms {
            builder = builder.min_interval(Duration::from_millis(ms));
        }
        if let Some(ms) = self.max_interval_ms {
            builder = builder.max_interval(Duration::from_millis(ms));
        }
        if let Some(kind) = self.jitter {
            builder = builder.jitter_kind(kind);
        }
        if let Some(seed) = self.seed {
            builder = builder.seed(seed);
        }

        Ok(builder.build())
    }
}

fn finite_factor(factor: f64) -> Result<f64, SettingsError> {
    if factor.is_finite() {
        Ok(factor)
    } else {
        Err(SettingsError::InvalidFactor { factor })
    }
}
