#![deny(unsafe_code)]
#![warn(missing_docs)]

//! Retry delay sequences for fault-tolerant clients.
//!
//! This crate computes how long a client should wait before retrying a
//! failed operation, and when it should give up. It is a pure decision
//! component: no I/O, no timers, no sleeping.
//!
//! - **Sequences** via the [`Sequence`](retry::Sequence) trait
//!   - [`Constant`](retry::Constant) - fixed delay
//!   - [`Exponential`](retry::Exponential) - multiplicative growth with jitter and bounds
//!   - [`Decorrelated`](retry::Decorrelated) - randomized growth that spreads out clients
//! - **Jitter strategies** via the [`Jitter`](retry::Jitter) trait
//! - **Shared limits** via [`BackoffConfig`](config::BackoffConfig)
//! - **Config-file support** via [`BackoffSettings`](settings::BackoffSettings)
//!
//! Enable the `tracing` feature to log produced delays and exhaustion.
//!
//! # Examples
//!
//! Using the prelude for convenient imports:
//!
//! ```rust
//! use backoffkit_core::prelude::*;
//! use std::time::Duration;
//!
//! let config = BackoffConfig::builder()
//!     .max_retries(5)
//!     .max_elapsed(Duration::from_secs(10))
//!     .jitter_strategy(FullJitter)
//!     .build();
//! let mut backoff = Exponential::new(Duration::from_millis(100), 2.0, config);
//!
//! while let Some(delay) = backoff.next_delay() {
//!     // std::thread::sleep(delay); then retry the operation
//!     # let _ = delay;
//! }
//! assert!(backoff.retries() <= 5);
//! ```

pub mod config;
pub mod error;
pub mod retry;
pub mod settings;

/// Convenient re-exports of commonly used items.
///
/// Import everything with:
///
/// ```rust
/// use backoffkit_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::{BackoffConfig, BackoffConfigBuilder};
    pub use crate::error::SettingsError;
    pub use crate::retry::{
        Constant, Decorrelated, EqualJitter, Exponential, FullJitter, Jitter, JitterKind,
        NoJitter, Sequence,
    };
    pub use crate::settings::BackoffSettings;
}
