//! Run configuration.
//!
//! [`RunConfig`] is an immutable value passed by reference into every
//! component. It can be built in code with the `with_*` methods or loaded
//! from JSON; missing fields take their defaults.
//!
//! ```
//! use ptrack_rs::config::{Direction, RunConfig};
//! use ptrack_rs::integrate::Method;
//!
//! let config = RunConfig::from_json_str(r#"{
//!     "method": "rk2",
//!     "direction": "reverse",
//!     "sub_steps_per_interval": 4,
//!     "saves_per_hour": 2,
//!     "surface_trapped": false
//! }"#).unwrap();
//! assert_eq!(config.method, Method::Rk2);
//! assert_eq!(config.direction, Direction::Reverse);
//! assert_eq!(config.saves_per_interval, 2);
//! assert!(config.effective_turbulence());
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::grid::ExtrapolationPolicy;
use crate::integrate::Method;
use crate::interp::InterpolationStrategy;

/// Configuration errors, raised before any integration begins.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Invalid option value or combination
    #[error("Invalid value '{key}': {value} - {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    fn invalid(key: &str, value: impl ToString, reason: &str) -> Self {
        ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Tracking direction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    #[default]
    Forward,
    /// Walk snapshots backward in time
    Reverse,
}

/// Parameters of one tracking experiment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Integration method
    #[serde(default)]
    pub method: Method,

    #[serde(default)]
    pub direction: Direction,

    /// Sub-steps per snapshot interval (`ndiv`)
    #[serde(default = "default_sub_steps")]
    pub sub_steps_per_interval: usize,

    /// Saves per snapshot interval; must divide `sub_steps_per_interval`
    #[serde(default = "default_saves", alias = "saves_per_hour")]
    pub saves_per_interval: usize,

    /// Snapshot intervals per tracking day
    #[serde(default = "default_intervals_per_day")]
    pub intervals_per_day: usize,

    /// Keep particles at the top sigma level
    #[serde(default = "default_true")]
    pub surface_trapped: bool,

    /// Vertical mixing; `None` means on in 3-D and off when surface-trapped
    #[serde(default)]
    pub turbulence: Option<bool>,

    /// Fraction of the wind added to surface drift, in [0, 1)
    #[serde(default)]
    pub windage: f64,

    #[serde(default = "default_one")]
    pub days_to_track: usize,

    #[serde(default = "default_one")]
    pub number_of_releases: usize,

    #[serde(default = "default_one_i64")]
    pub days_between_releases: i64,

    /// Treatment of positions outside the grid envelope
    #[serde(default)]
    pub extrapolation: ExtrapolationPolicy,

    #[serde(default)]
    pub interpolation: InterpolationStrategy,

    /// Speed (m/s) at or below which a particle counts as beached at a save
    #[serde(default)]
    pub beaching_speed_threshold: f64,

    /// Vertical diffusivity for turbulent mixing (m²/s)
    #[serde(default = "default_diffusivity")]
    pub vertical_diffusivity: f64,

    #[serde(default)]
    pub random_seed: u64,

    /// Drop particles that start on land
    #[serde(default = "default_true")]
    pub trim_land_at_release: bool,
}

fn default_sub_steps() -> usize {
    12
}
fn default_saves() -> usize {
    1
}
fn default_intervals_per_day() -> usize {
    24
}
fn default_true() -> bool {
    true
}
fn default_one() -> usize {
    1
}
fn default_one_i64() -> i64 {
    1
}
fn default_diffusivity() -> f64 {
    1e-4
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            method: Method::default(),
            direction: Direction::default(),
            sub_steps_per_interval: default_sub_steps(),
            saves_per_interval: default_saves(),
            intervals_per_day: default_intervals_per_day(),
            surface_trapped: true,
            turbulence: None,
            windage: 0.0,
            days_to_track: 1,
            number_of_releases: 1,
            days_between_releases: 1,
            extrapolation: ExtrapolationPolicy::default(),
            interpolation: InterpolationStrategy::default(),
            beaching_speed_threshold: 0.0,
            vertical_diffusivity: default_diffusivity(),
            random_seed: 0,
            trim_land_at_release: true,
        }
    }
}

impl RunConfig {
    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: RunConfig =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Save as pretty-printed JSON.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check option values and combinations.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ndiv = self.sub_steps_per_interval;
        if ndiv == 0 {
            return Err(ConfigError::invalid("sub_steps_per_interval", ndiv, "must be at least 1"));
        }
        let spi = self.saves_per_interval;
        if spi == 0 || spi > ndiv {
            return Err(ConfigError::invalid(
                "saves_per_interval",
                spi,
                "must be between 1 and sub_steps_per_interval",
            ));
        }
        if ndiv % spi != 0 {
            return Err(ConfigError::invalid(
                "saves_per_interval",
                spi,
                "must divide sub_steps_per_interval so saves fall on sub-step boundaries",
            ));
        }
        if self.intervals_per_day == 0 {
            return Err(ConfigError::invalid(
                "intervals_per_day",
                self.intervals_per_day,
                "must be at least 1",
            ));
        }
        if !(0.0..1.0).contains(&self.windage) {
            return Err(ConfigError::invalid("windage", self.windage, "must be in [0, 1)"));
        }
        if self.days_to_track == 0 {
            return Err(ConfigError::invalid(
                "days_to_track",
                self.days_to_track,
                "must be at least 1",
            ));
        }
        if self.number_of_releases == 0 {
            return Err(ConfigError::invalid(
                "number_of_releases",
                self.number_of_releases,
                "must be at least 1",
            ));
        }
        if self.days_between_releases < 0 {
            return Err(ConfigError::invalid(
                "days_between_releases",
                self.days_between_releases,
                "cannot be negative",
            ));
        }
        if !(self.beaching_speed_threshold >= 0.0 && self.beaching_speed_threshold.is_finite()) {
            return Err(ConfigError::invalid(
                "beaching_speed_threshold",
                self.beaching_speed_threshold,
                "must be finite and non-negative",
            ));
        }
        if !(self.vertical_diffusivity >= 0.0 && self.vertical_diffusivity.is_finite()) {
            return Err(ConfigError::invalid(
                "vertical_diffusivity",
                self.vertical_diffusivity,
                "must be finite and non-negative",
            ));
        }
        Ok(())
    }

    /// Whether turbulent mixing is applied. Never in surface-trapped mode.
    pub fn effective_turbulence(&self) -> bool {
        !self.surface_trapped && self.turbulence.unwrap_or(true)
    }

    /// Windage fraction in effect. Zero unless surface-trapped.
    pub fn effective_windage(&self) -> f64 {
        if self.surface_trapped {
            self.windage
        } else {
            0.0
        }
    }

    /// Sub-steps between consecutive saves.
    #[inline]
    pub fn save_stride(&self) -> usize {
        self.sub_steps_per_interval / self.saves_per_interval
    }

    /// Saves per tracking day (excluding the initial row).
    #[inline]
    pub fn saves_per_day(&self) -> usize {
        self.intervals_per_day * self.saves_per_interval
    }

    /// Rows in one release's record: every save plus the initial state.
    #[inline]
    pub fn rows_per_release(&self) -> usize {
        self.saves_per_day() * self.days_to_track + 1
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_sub_steps(mut self, ndiv: usize) -> Self {
        self.sub_steps_per_interval = ndiv;
        self
    }

    pub fn with_saves_per_interval(mut self, saves: usize) -> Self {
        self.saves_per_interval = saves;
        self
    }

    pub fn with_intervals_per_day(mut self, n: usize) -> Self {
        self.intervals_per_day = n;
        self
    }

    pub fn with_surface_trapped(mut self, surface_trapped: bool) -> Self {
        self.surface_trapped = surface_trapped;
        self
    }

    pub fn with_turbulence(mut self, turbulence: Option<bool>) -> Self {
        self.turbulence = turbulence;
        self
    }

    pub fn with_windage(mut self, windage: f64) -> Self {
        self.windage = windage;
        self
    }

    pub fn with_days_to_track(mut self, days: usize) -> Self {
        self.days_to_track = days;
        self
    }

    pub fn with_releases(mut self, number: usize, days_between: i64) -> Self {
        self.number_of_releases = number;
        self.days_between_releases = days_between;
        self
    }

    pub fn with_extrapolation(mut self, policy: ExtrapolationPolicy) -> Self {
        self.extrapolation = policy;
        self
    }

    pub fn with_interpolation(mut self, strategy: InterpolationStrategy) -> Self {
        self.interpolation = strategy;
        self
    }

    pub fn with_beaching_threshold(mut self, speed: f64) -> Self {
        self.beaching_speed_threshold = speed;
        self
    }

    pub fn with_vertical_diffusivity(mut self, kv: f64) -> Self {
        self.vertical_diffusivity = kv;
        self
    }

    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.random_seed = seed;
        self
    }

    pub fn with_trim_land(mut self, trim: bool) -> Self {
        self.trim_land_at_release = trim;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RunConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.method, Method::Rk4);
        assert_eq!(config.save_stride(), 12);
        assert_eq!(config.rows_per_release(), 25);
        assert!(!config.effective_turbulence());
    }

    #[test]
    fn test_saves_must_divide_sub_steps() {
        let config = RunConfig::default().with_sub_steps(4).with_saves_per_interval(8);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { key, .. }) if key == "saves_per_interval"
        ));
        let config = RunConfig::default().with_sub_steps(6).with_saves_per_interval(4);
        assert!(config.validate().is_err());
        let config = RunConfig::default().with_sub_steps(6).with_saves_per_interval(3);
        assert!(config.validate().is_ok());
        assert_eq!(config.save_stride(), 2);
    }

    #[test]
    fn test_invalid_values() {
        assert!(RunConfig::default().with_sub_steps(0).validate().is_err());
        assert!(RunConfig::default().with_windage(1.0).validate().is_err());
        assert!(RunConfig::default().with_windage(-0.01).validate().is_err());
        assert!(RunConfig::default().with_days_to_track(0).validate().is_err());
        assert!(RunConfig::default().with_releases(0, 1).validate().is_err());
        assert!(RunConfig::default().with_releases(3, -1).validate().is_err());
        assert!(RunConfig::default().with_beaching_threshold(f64::NAN).validate().is_err());
        assert!(RunConfig::default().with_intervals_per_day(0).validate().is_err());
    }

    #[test]
    fn test_mode_overrides() {
        let three_d = RunConfig::default().with_surface_trapped(false).with_windage(0.02);
        assert!(three_d.effective_turbulence());
        assert_eq!(three_d.effective_windage(), 0.0);
        assert!(!three_d.with_turbulence(Some(false)).effective_turbulence());

        let surface = RunConfig::default().with_windage(0.02).with_turbulence(Some(true));
        assert!(!surface.effective_turbulence());
        assert_eq!(surface.effective_windage(), 0.02);
    }

    #[test]
    fn test_json_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.json");
        let config = RunConfig::default()
            .with_method(Method::Rk2)
            .with_direction(Direction::Reverse)
            .with_random_seed(7)
            .with_interpolation(InterpolationStrategy::Batch);
        config.save_to_file(&path).unwrap();
        let loaded = RunConfig::from_json_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_bad_json() {
        assert!(matches!(RunConfig::from_json_str("{ not json"), Err(ConfigError::Parse(_))));
        assert!(matches!(
            RunConfig::from_json_str(r#"{"method": "euler"}"#),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            RunConfig::from_json_str(r#"{"windage": 1.5}"#),
            Err(ConfigError::InvalidValue { .. })
        ));
    }
}
