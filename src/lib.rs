//! Tilt Hockey - gameplay core of a tilt-controlled puck-and-striker game
//!
//! Core modules:
//! - `sim`: Collision classification, rally/scoring state, escalation, tilt
//! - `platform`: Device sensor abstraction (motion/gravity)
//! - `persistence`: Key-value storage for the high score
//! - `tuning`: Data-driven game balance
//! - `ui`: Hint catalog and display formatting for the HUD collaborator

pub mod error;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod tuning;
pub mod ui;

pub use error::{ConfigError, StoreError, TiltError};
pub use highscores::HighScore;
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Rigid-body simulation step (300 Hz, matches the physics collaborator)
    pub const PHYSICS_DT: f32 = 1.0 / 300.0;
    /// Tilt sampling interval (60 Hz)
    pub const TILT_DT: f32 = 1.0 / 60.0;

    /// Persisted high score key
    pub const HIGH_SCORE_KEY: &str = "HIGHSCORE";

    /// Maximum hearts shown by the lives indicator
    pub const MAX_DISPLAY_LIVES: u32 = 9;
    /// Number of pips on the puck speed indicator
    pub const SPEED_PIPS: u8 = 7;
}
