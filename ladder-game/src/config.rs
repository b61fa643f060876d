//! Runtime configuration for board geometry and animation pacing.
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::constants::{
    CELEBRATION_MS, HORIZONTAL_STEP_MS, MAX_ROW_COUNT, MIN_ROW_COUNT, ROW_COUNT, RUNG_PROBABILITY, SETTLE_MS,
    STAGGER_MS, VERTICAL_STEP_MS,
};

/// Errors raised when configuration invariants are violated.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be at least {min} (got {value})")]
    MinViolation {
        field: &'static str,
        min: u64,
        value: u64,
    },
    #[error("{field} must be at most {max} (got {value})")]
    MaxViolation {
        field: &'static str,
        max: u64,
        value: u64,
    },
    #[error("{field} must be between {min:.2} and {max:.2} (got {value:.2})")]
    RangeViolation {
        field: &'static str,
        min: f64,
        max: f64,
        value: f64,
    },
    #[error("config JSON is invalid: {0}")]
    Json(String),
}

/// Top-level configuration bundle.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LadderConfig {
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub timing: TimingConfig,
}

impl LadderConfig {
    #[must_use]
    pub fn default_config() -> Self {
        Self::default()
    }

    /// Parse a configuration from JSON; absent fields fall back to defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Json` when the text is not valid JSON for this
    /// shape, or any validation error raised by [`Self::validate`].
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(json).map_err(|e| ConfigError::Json(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Validate every section.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when any field violates the documented bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.layout.validate()?;
        self.timing.validate()?;
        Ok(())
    }
}

/// Board geometry and rung density.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    #[serde(default = "LayoutConfig::default_rows")]
    pub rows: u16,
    #[serde(default = "LayoutConfig::default_rung_probability")]
    pub rung_probability: f64,
}

impl LayoutConfig {
    const fn default_rows() -> u16 {
        ROW_COUNT
    }

    const fn default_rung_probability() -> f64 {
        RUNG_PROBABILITY
    }

    /// Validate geometry bounds.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when the row count is outside
    /// `MIN_ROW_COUNT..=MAX_ROW_COUNT` or the probability is outside `[0, 1]`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows < MIN_ROW_COUNT {
            return Err(ConfigError::MinViolation {
                field: "layout.rows",
                min: u64::from(MIN_ROW_COUNT),
                value: u64::from(self.rows),
            });
        }
        if self.rows > MAX_ROW_COUNT {
            return Err(ConfigError::MaxViolation {
                field: "layout.rows",
                max: u64::from(MAX_ROW_COUNT),
                value: u64::from(self.rows),
            });
        }
        if !(0.0..=1.0).contains(&self.rung_probability) {
            return Err(ConfigError::RangeViolation {
                field: "layout.rung_probability",
                min: 0.0,
                max: 1.0,
                value: self.rung_probability,
            });
        }
        Ok(())
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            rows: Self::default_rows(),
            rung_probability: Self::default_rung_probability(),
        }
    }
}

/// Animation pacing, all in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingConfig {
    #[serde(default = "TimingConfig::default_vertical_step_ms")]
    pub vertical_step_ms: u64,
    #[serde(default = "TimingConfig::default_horizontal_step_ms")]
    pub horizontal_step_ms: u64,
    #[serde(default = "TimingConfig::default_settle_ms")]
    pub settle_ms: u64,
    #[serde(default = "TimingConfig::default_stagger_ms")]
    pub stagger_ms: u64,
    #[serde(default = "TimingConfig::default_celebration_ms")]
    pub celebration_ms: u64,
}

impl TimingConfig {
    const fn default_vertical_step_ms() -> u64 {
        VERTICAL_STEP_MS
    }

    const fn default_horizontal_step_ms() -> u64 {
        HORIZONTAL_STEP_MS
    }

    const fn default_settle_ms() -> u64 {
        SETTLE_MS
    }

    const fn default_stagger_ms() -> u64 {
        STAGGER_MS
    }

    const fn default_celebration_ms() -> u64 {
        CELEBRATION_MS
    }

    /// Step durations must be non-zero so per-participant steps stay strictly ordered in time.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MinViolation` for a zero step duration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("timing.vertical_step_ms", self.vertical_step_ms),
            ("timing.horizontal_step_ms", self.horizontal_step_ms),
        ] {
            if value == 0 {
                return Err(ConfigError::MinViolation {
                    field,
                    min: 1,
                    value,
                });
            }
        }
        Ok(())
    }

    #[must_use]
    pub const fn vertical_step(&self) -> Duration {
        Duration::from_millis(self.vertical_step_ms)
    }

    #[must_use]
    pub const fn horizontal_step(&self) -> Duration {
        Duration::from_millis(self.horizontal_step_ms)
    }

    #[must_use]
    pub const fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    #[must_use]
    pub const fn stagger(&self) -> Duration {
        Duration::from_millis(self.stagger_ms)
    }

    #[must_use]
    pub const fn celebration(&self) -> Duration {
        Duration::from_millis(self.celebration_ms)
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            vertical_step_ms: Self::default_vertical_step_ms(),
            horizontal_step_ms: Self::default_horizontal_step_ms(),
            settle_ms: Self::default_settle_ms(),
            stagger_ms: Self::default_stagger_ms(),
            celebration_ms: Self::default_celebration_ms(),
        }
    }
}
