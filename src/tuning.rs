//! Data-driven game balance
//!
//! Every gameplay constant that is a matter of feel rather than an invariant
//! lives here. Defaults reproduce the reference tuning; a JSON file may
//! override any subset of fields.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading a tuning file
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("could not read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not parse tuning file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("tuning value `{0}` is out of range")]
    Invalid(&'static str),
}

/// Game balance values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Player physics ===
    /// Downward acceleration (px/s²)
    pub gravity: f32,
    /// Initial upward speed of a jump (px/s)
    pub jump_velocity: f32,
    /// Vertical speed multiplier applied when the jump is released early
    pub jump_cut: f32,

    // === Slide ===
    pub slide_in_fps: f32,
    pub slide_out_fps: f32,
    /// Longest the low pose may be held (seconds)
    pub slide_hold_max: f32,
    /// Hold pose animation toggles per second
    pub slide_hold_toggle_rate: f32,

    // === World ===
    /// Scroll speed at difficulty 1 (px/s)
    pub base_scroll: f32,
    /// Difficulty gained per second of running
    pub speed_ramp: f32,
    /// Points per second at difficulty 1
    pub score_rate: f32,

    // === Spawning ===
    /// Spawn interval at difficulty 1 (seconds)
    pub spawn_base: f32,
    /// Floor for the spawn interval (seconds)
    pub spawn_min: f32,
    /// Random ± fraction applied to each interval
    pub spawn_jitter: f32,
    pub combo_min_difficulty: f32,
    pub combo_chance: f32,

    // === Power-ups ===
    pub boost_duration: f32,
    pub boost_jump_mult: f32,
    pub boost_scroll_mult: f32,
    pub slowmo_duration: f32,
    pub slowmo_time_scale: f32,
    /// Score awarded for kicking a hazard away while immune
    pub kick_bonus: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: 2200.0,
            jump_velocity: 410.0,
            jump_cut: 0.45,

            slide_in_fps: 16.0,
            slide_out_fps: 16.0,
            slide_hold_max: 3.0,
            slide_hold_toggle_rate: 6.0,

            base_scroll: 320.0,
            speed_ramp: 0.045,
            score_rate: 10.0,

            spawn_base: 0.95,
            spawn_min: 0.38,
            spawn_jitter: 0.12,
            combo_min_difficulty: 2.0,
            combo_chance: 0.08,

            boost_duration: 5.0,
            boost_jump_mult: 1.2,
            boost_scroll_mult: 1.15,
            slowmo_duration: 4.0,
            slowmo_time_scale: 0.55,
            kick_bonus: 25.0,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.as_ref().display());
        Ok(tuning)
    }

    /// Load tuning, falling back to defaults on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path.as_ref()) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::warn!("Using default tuning ({})", e);
                Self::default()
            }
        }
    }

    /// Reject values that would stall or invert the simulation
    pub fn validate(&self) -> Result<(), TuningError> {
        let positive = [
            ("gravity", self.gravity),
            ("jump_velocity", self.jump_velocity),
            ("slide_in_fps", self.slide_in_fps),
            ("slide_out_fps", self.slide_out_fps),
            ("slide_hold_max", self.slide_hold_max),
            ("slide_hold_toggle_rate", self.slide_hold_toggle_rate),
            ("base_scroll", self.base_scroll),
            ("score_rate", self.score_rate),
            ("spawn_base", self.spawn_base),
            ("spawn_min", self.spawn_min),
            ("combo_min_difficulty", self.combo_min_difficulty),
            ("boost_duration", self.boost_duration),
            ("boost_jump_mult", self.boost_jump_mult),
            ("boost_scroll_mult", self.boost_scroll_mult),
            ("slowmo_duration", self.slowmo_duration),
            ("slowmo_time_scale", self.slowmo_time_scale),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(TuningError::Invalid(name));
            }
        }

        let fractions = [
            ("jump_cut", self.jump_cut),
            ("spawn_jitter", self.spawn_jitter),
            ("combo_chance", self.combo_chance),
        ];
        for (name, value) in fractions {
            if !(0.0..=1.0).contains(&value) {
                return Err(TuningError::Invalid(name));
            }
        }

        if !self.speed_ramp.is_finite() || self.speed_ramp < 0.0 {
            return Err(TuningError::Invalid("speed_ramp"));
        }
        if !self.kick_bonus.is_finite() || self.kick_bonus < 0.0 {
            return Err(TuningError::Invalid("kick_bonus"));
        }
        // Slow motion may only slow the world down
        if self.slowmo_time_scale > 1.0 {
            return Err(TuningError::Invalid("slowmo_time_scale"));
        }
        Ok(())
    }

    /// Spawn interval for a difficulty multiplier, before jitter
    pub fn spawn_interval(&self, difficulty: f32) -> f32 {
        (self.spawn_base / difficulty.max(1.0).sqrt()).max(self.spawn_min)
    }
}
