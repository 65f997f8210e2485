//! Data-driven game balance
//!
//! Every number that shapes difficulty lives here so it can be tweaked from
//! a JSON file without touching the simulation. `Default` reproduces the
//! shipped balance.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Game balance parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Match ===
    /// Lives at the start of every game
    pub starting_lives: u32,
    /// Puck impulse magnitude at game start
    pub starting_puck_speed: f32,
    /// Tilt-to-force gain at game start
    pub starting_striker_gain: f32,

    // === Launch ===
    /// Relaunch lateral impulse is drawn from [-range, range]
    pub launch_lateral_range: f32,
    /// Relaunch forward impulse = puck speed * this
    pub launch_forward_factor: f32,

    // === Escalation ===
    /// Every N points a random feature is picked
    pub feature_interval: u32,
    /// Score offset within the interval where the puck speeds up
    pub speed_up_offset: u32,
    /// Puck speed increment
    pub puck_speed_step: f32,
    /// Speed-up only applies while puck speed is at or below this
    pub puck_speed_cap: f32,
    /// Score at which inverted controls start (and bonus lives are granted)
    pub inversion_start_score: u32,
    /// Score at which inverted controls end
    pub inversion_end_score: u32,
    /// Lives granted at `inversion_start_score`
    pub bonus_lives: u32,
    /// Puck slow-down applied at `inversion_start_score`
    pub inversion_puck_slowdown: f32,
    /// Striker gain decrement for the SlowStriker feature
    pub striker_slow_step: f32,
    /// SlowStriker only applies while gain is above this
    pub striker_gain_floor: f32,

    // === Field ===
    /// Lateral shift of walls and props per WidenField
    pub widen_step: f32,
    /// Floor / far prop scale increase per WidenField
    pub widen_scale_step: f32,

    // === Obstacles ===
    /// How far behind the attacker boundary obstacles are parked
    pub obstacle_park_depth: f32,
    /// Lateral distance an obstacle slides once deployed
    pub obstacle_slide_distance: f32,
    /// Duration of the slide (seconds)
    pub obstacle_slide_secs: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            starting_lives: 6,
            starting_puck_speed: 1.5,
            starting_striker_gain: 6.0,

            launch_lateral_range: 1.5,
            launch_forward_factor: 2.0,

            feature_interval: 10,
            speed_up_offset: 5,
            puck_speed_step: 0.3,
            puck_speed_cap: 3.4,
            inversion_start_score: 50,
            inversion_end_score: 55,
            bonus_lives: 3,
            inversion_puck_slowdown: 0.9,
            striker_slow_step: 0.5,
            striker_gain_floor: 3.0,

            widen_step: 0.1,
            widen_scale_step: 0.25,

            obstacle_park_depth: 30.0,
            obstacle_slide_distance: 1.6,
            obstacle_slide_secs: 15.0,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON. Missing fields take their default.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning from a JSON file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load tuning, falling back to defaults on any error
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(tuning) => {
                log::info!("Loaded tuning from {}", path.display());
                tuning
            }
            Err(err) => {
                log::warn!("Using default tuning ({}): {}", path.display(), err);
                Self::default()
            }
        }
    }

    /// Reject values that would break the milestone arithmetic
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.feature_interval == 0 {
            return Err(ConfigError::Invalid {
                field: "feature_interval",
                reason: "must be non-zero",
            });
        }
        if self.starting_lives == 0 {
            return Err(ConfigError::Invalid {
                field: "starting_lives",
                reason: "must be non-zero",
            });
        }
        if self.obstacle_slide_secs <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "obstacle_slide_secs",
                reason: "must be positive",
            });
        }
        if self.launch_lateral_range < 0.0 {
            return Err(ConfigError::Invalid {
                field: "launch_lateral_range",
                reason: "must not be negative",
            });
        }
        Ok(())
    }
}
