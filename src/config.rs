//! Tunable parameters of the dispatch engine.

use std::fs;
use std::path::Path;

use chrono::Duration;
use serde::Deserialize;

use crate::Quantity;
use crate::engine::ConfigError;

/// Parameters of the travel-time estimator.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub base_travel_minutes: u32,
    pub per_delivery_minutes: u32,
    pub between_stops_minutes: u32,
    pub traffic_buffer: f64,
    /// Complexity when every order of a batch shares one neighborhood.
    pub same_neighborhood_complexity: f64,
    pub mixed_fuel_penalty: f64,
    /// Orders at or above this size add `large_order_penalty`.
    pub large_order_liters: u32,
    pub large_order_penalty: f64,
    pub single_speed_kmh: f64,
    pub single_handling_minutes: f64,
    pub single_buffer: f64,
    pub default_distance_km: f64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            base_travel_minutes: 15,
            per_delivery_minutes: 8,
            between_stops_minutes: 5,
            traffic_buffer: 1.2,
            same_neighborhood_complexity: 0.8,
            mixed_fuel_penalty: 0.1,
            large_order_liters: 30,
            large_order_penalty: 0.15,
            single_speed_kmh: 25.0,
            single_handling_minutes: 8.0,
            single_buffer: 1.3,
            default_distance_km: 5.0,
        }
    }
}

/// Longest accepted grouping or duplicate window: one week.
pub const MAX_WINDOW_MINUTES: i64 = 7 * 24 * 60;

/// Immutable configuration passed to every engine operation.
///
/// The free functions of [`engine`](crate::engine) expect a value that passed
/// [`DispatchConfig::validate`]; [`Dispatcher::new`](crate::Dispatcher::new)
/// enforces it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    pub keg_size_liters: u32,
    pub kegs_per_box: u32,
    pub grouping_window_minutes: i64,
    pub duplicate_window_minutes: i64,
    pub urgent_after_hours: f64,
    pub high_after_hours: f64,
    pub timing: TimingConfig,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            keg_size_liters: 10,
            kegs_per_box: 4,
            grouping_window_minutes: 15,
            duplicate_window_minutes: 5,
            urgent_after_hours: 2.0,
            high_after_hours: 1.0,
            timing: TimingConfig::default(),
        }
    }
}

impl DispatchConfig {
    /// Load a configuration from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: DispatchConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make the capacity or timing rules meaningless.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.keg_size_liters == 0 {
            return Err(ConfigError::Invalid("keg_size_liters must be positive"));
        }
        if self.kegs_per_box == 0 {
            return Err(ConfigError::Invalid("kegs_per_box must be positive"));
        }
        if self.keg_size_liters.checked_mul(self.kegs_per_box).is_none() {
            return Err(ConfigError::Invalid("box capacity overflows"));
        }
        if self.grouping_window_minutes < 0 || self.duplicate_window_minutes < 0 {
            return Err(ConfigError::Invalid("time windows must not be negative"));
        }
        if self.grouping_window_minutes > MAX_WINDOW_MINUTES
            || self.duplicate_window_minutes > MAX_WINDOW_MINUTES
        {
            return Err(ConfigError::Invalid("time windows must not exceed one week"));
        }
        if !(self.high_after_hours.is_finite() && self.urgent_after_hours.is_finite()) {
            return Err(ConfigError::Invalid("priority thresholds must be finite"));
        }
        if self.high_after_hours > self.urgent_after_hours {
            return Err(ConfigError::Invalid(
                "high_after_hours must not exceed urgent_after_hours",
            ));
        }

        let t = &self.timing;
        let multipliers = [
            t.traffic_buffer,
            t.same_neighborhood_complexity,
            t.single_speed_kmh,
            t.single_buffer,
        ];
        if multipliers.iter().any(|m| !m.is_finite() || *m <= 0.0) {
            return Err(ConfigError::Invalid("timing multipliers must be positive"));
        }
        let additive = [
            t.mixed_fuel_penalty,
            t.large_order_penalty,
            t.single_handling_minutes,
            t.default_distance_km,
        ];
        if additive.iter().any(|m| !m.is_finite() || *m < 0.0) {
            return Err(ConfigError::Invalid(
                "timing penalties and distances must not be negative",
            ));
        }
        Ok(())
    }

    pub fn max_box_capacity(&self) -> Quantity {
        Quantity::from_liters(self.keg_size_liters.saturating_mul(self.kegs_per_box))
    }

    /// Orderable sizes, smallest first: one keg up to a full box.
    pub fn allowed_quantities(&self) -> impl Iterator<Item = Quantity> + '_ {
        (1..=self.kegs_per_box)
            .map(|kegs| Quantity::from_liters(kegs.saturating_mul(self.keg_size_liters)))
    }

    pub fn grouping_window(&self) -> Duration {
        window(self.grouping_window_minutes)
    }

    pub fn duplicate_window(&self) -> Duration {
        window(self.duplicate_window_minutes)
    }
}

/// Out-of-range minutes saturate instead of panicking.
fn window(minutes: i64) -> Duration {
    Duration::try_minutes(minutes).unwrap_or(if minutes < 0 {
        Duration::MIN
    } else {
        Duration::MAX
    })
}
