//! Data-driven game balance
//!
//! Persisted in LocalStorage on the web, read from a JSON file natively.
//! Every field has a default, so partial JSON documents are accepted.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reasons a tuning document can be rejected
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("invalid tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("tuning field `{field}` out of range: {reason}")]
    OutOfRange { field: &'static str, reason: &'static str },
}

/// Balance constants for the simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Loop periods (ms) ===
    /// Car movement / score tick
    pub clock_period_ms: u64,
    /// Player easing tick
    pub motion_period_ms: u64,
    /// Autopilot decision tick
    pub avoidance_period_ms: u64,

    // === Difficulty ramp ===
    pub speed_start: f32,
    /// Added to speed on every clock tick
    pub speed_increment: f32,
    pub speed_max: f32,

    // === Spawning ===
    /// Car speed = base + U[0, jitter) + factor * game speed
    pub car_base_speed: f32,
    pub car_speed_jitter: f32,
    pub car_speed_factor: f32,
    /// Interval = max(base - slope * speed, floor)
    pub spawn_interval_base_ms: f32,
    pub spawn_interval_slope_ms: f32,
    pub spawn_interval_floor_ms: f32,

    // === Autopilot ===
    /// Danger zone = base + per_speed * speed, measured back from the player
    pub danger_zone_base: f32,
    pub danger_zone_per_speed: f32,
    /// How far past the player a car still counts as a threat in its lane
    pub threat_ahead: f32,
    /// How far past the player a car still counts when ranking lanes
    pub safety_ahead: f32,
    /// Player must be this close to its lane to accept a new target
    pub settle_tolerance: f32,

    // === Player motion ===
    /// Fraction of the remaining distance covered per motion tick
    pub ease_factor: f32,
    /// Distance under which the player snaps onto the lane
    pub snap_epsilon: f32,

    /// Longest frame `advance` will simulate at once
    pub max_frame_ms: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            clock_period_ms: 16,
            motion_period_ms: 16,
            avoidance_period_ms: 50,

            speed_start: 1.0,
            speed_increment: 0.003,
            speed_max: 8.0,

            car_base_speed: 5.0,
            car_speed_jitter: 5.0,
            car_speed_factor: 1.0,
            spawn_interval_base_ms: 1100.0,
            spawn_interval_slope_ms: 80.0,
            spawn_interval_floor_ms: 300.0,

            danger_zone_base: 200.0,
            danger_zone_per_speed: 20.0,
            threat_ahead: 60.0,
            safety_ahead: 100.0,
            settle_tolerance: 10.0,

            ease_factor: 0.15,
            snap_epsilon: 2.0,

            max_frame_ms: 250,
        }
    }
}

impl Tuning {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "lane_dodge_tuning";

    /// Environment variable naming a tuning file (native only)
    pub const ENV_PATH: &'static str = "LANE_DODGE_TUNING";

    /// Parse and validate a tuning document
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Read, parse and validate a tuning file
    pub fn from_path(path: impl AsRef<std::path::Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Check that every value keeps the simulation well-formed
    pub fn validate(&self) -> Result<(), TuningError> {
        let periods = [
            ("clock_period_ms", self.clock_period_ms),
            ("motion_period_ms", self.motion_period_ms),
            ("avoidance_period_ms", self.avoidance_period_ms),
            ("max_frame_ms", self.max_frame_ms),
        ];
        for (field, value) in periods {
            if value == 0 {
                return Err(TuningError::OutOfRange { field, reason: "must be positive" });
            }
        }

        let values = [
            ("speed_start", self.speed_start),
            ("speed_increment", self.speed_increment),
            ("speed_max", self.speed_max),
            ("car_base_speed", self.car_base_speed),
            ("car_speed_jitter", self.car_speed_jitter),
            ("car_speed_factor", self.car_speed_factor),
            ("spawn_interval_base_ms", self.spawn_interval_base_ms),
            ("spawn_interval_slope_ms", self.spawn_interval_slope_ms),
            ("spawn_interval_floor_ms", self.spawn_interval_floor_ms),
            ("danger_zone_base", self.danger_zone_base),
            ("danger_zone_per_speed", self.danger_zone_per_speed),
            ("threat_ahead", self.threat_ahead),
            ("safety_ahead", self.safety_ahead),
            ("settle_tolerance", self.settle_tolerance),
            ("ease_factor", self.ease_factor),
            ("snap_epsilon", self.snap_epsilon),
        ];
        for (field, value) in values {
            if !value.is_finite() {
                return Err(TuningError::OutOfRange { field, reason: "must be finite" });
            }
        }

        // Finite from here on, so plain comparisons are safe
        let non_negative = [
            ("speed_increment", self.speed_increment),
            ("car_speed_jitter", self.car_speed_jitter),
            ("car_speed_factor", self.car_speed_factor),
            ("spawn_interval_base_ms", self.spawn_interval_base_ms),
            ("spawn_interval_slope_ms", self.spawn_interval_slope_ms),
            ("danger_zone_base", self.danger_zone_base),
            ("danger_zone_per_speed", self.danger_zone_per_speed),
            ("threat_ahead", self.threat_ahead),
            ("safety_ahead", self.safety_ahead),
            ("settle_tolerance", self.settle_tolerance),
        ];
        for (field, value) in non_negative {
            if value < 0.0 {
                return Err(TuningError::OutOfRange { field, reason: "must not be negative" });
            }
        }

        if self.speed_start <= 0.0 {
            return Err(TuningError::OutOfRange {
                field: "speed_start",
                reason: "must be positive",
            });
        }
        if self.speed_max < self.speed_start {
            return Err(TuningError::OutOfRange {
                field: "speed_max",
                reason: "must not be below speed_start",
            });
        }
        if self.car_base_speed <= 0.0 {
            return Err(TuningError::OutOfRange {
                field: "car_base_speed",
                reason: "must be positive",
            });
        }
        if self.spawn_interval_floor_ms < 1.0 {
            return Err(TuningError::OutOfRange {
                field: "spawn_interval_floor_ms",
                reason: "must be at least 1ms",
            });
        }
        if self.ease_factor <= 0.0 || self.ease_factor > 1.0 {
            return Err(TuningError::OutOfRange {
                field: "ease_factor",
                reason: "must be in (0, 1]",
            });
        }
        if self.snap_epsilon <= 0.0 {
            return Err(TuningError::OutOfRange {
                field: "snap_epsilon",
                reason: "must be positive",
            });
        }
        Ok(())
    }

    /// This tuning if valid, otherwise the defaults
    pub fn or_default(self) -> Self {
        match self.validate() {
            Ok(()) => self,
            Err(e) => {
                log::warn!("Ignoring invalid tuning: {}", e);
                Self::default()
            }
        }
    }

    /// Load tuning from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(tuning) => {
                        log::info!("Loaded tuning from LocalStorage");
                        return tuning;
                    }
                    Err(e) => log::warn!("Ignoring stored tuning: {}", e),
                }
            }
        }

        log::info!("Using default tuning");
        Self::default()
    }

    /// Load tuning from the file named by `LANE_DODGE_TUNING`, if any
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        let Ok(path) = std::env::var(Self::ENV_PATH) else {
            log::info!("Using default tuning");
            return Self::default();
        };

        match Self::from_path(&path) {
            Ok(tuning) => {
                log::info!("Loaded tuning from {}", path);
                tuning
            }
            Err(e) => {
                log::warn!("Ignoring tuning file {}: {}", path, e);
                Self::default()
            }
        }
    }
}
