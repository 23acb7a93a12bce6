//! Scheduler configuration.
//!
//! Controls how the deferred-execution helper picks between the immediate
//! queue and the timer queue of an [`EventLoop`](crate::EventLoop).

use core_types::ConfigError;
use serde::Deserialize;
use std::time::Duration;

/// Largest accepted default delay, matching the 32-bit limit hosts place on timers.
pub const MAX_DELAY_MS: u64 = i32::MAX as u64;

/// Configuration for an event loop.
///
/// # Examples
///
/// ```
/// use promise_runtime::SchedulerConfig;
///
/// let config = SchedulerConfig::from_json(r#"{ "prefer_immediate": false }"#).unwrap();
/// assert!(!config.prefer_immediate);
/// assert_eq!(config.default_delay_ms, 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SchedulerConfig {
    /// Use the immediate queue for zero-delay work when set; otherwise every
    /// deferred action goes through the timer queue
    pub prefer_immediate: bool,
    /// Delay applied to deferred actions that go through the timer queue
    /// without an explicit delay
    pub default_delay_ms: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            prefer_immediate: true,
            default_delay_ms: 0,
        }
    }
}

impl SchedulerConfig {
    /// Parses a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: SchedulerConfig =
            serde_json::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that every field is within range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_delay_ms > MAX_DELAY_MS {
            return Err(ConfigError::Invalid {
                field: "default_delay_ms",
                reason: format!("{} exceeds {}", self.default_delay_ms, MAX_DELAY_MS),
            });
        }
        Ok(())
    }

    /// Sets whether the immediate queue is used.
    pub fn with_prefer_immediate(mut self, prefer_immediate: bool) -> Self {
        self.prefer_immediate = prefer_immediate;
        self
    }

    /// Sets the default timer delay, clamped to [`MAX_DELAY_MS`].
    pub fn with_default_delay(mut self, delay: Duration) -> Self {
        self.default_delay_ms = u64::try_from(delay.as_millis())
            .unwrap_or(MAX_DELAY_MS)
            .min(MAX_DELAY_MS);
        self
    }

    /// The default timer delay as a [`Duration`], clamped to [`MAX_DELAY_MS`].
    pub fn default_delay(&self) -> Duration {
        Duration::from_millis(self.default_delay_ms.min(MAX_DELAY_MS))
    }
}
