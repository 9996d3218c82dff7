//! Coconut Dash - a side-scrolling endless runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (player, spawning, motion, collisions, score)
//! - `engine`: Owned engine aggregate with the ready gate and render snapshots
//! - `clock`: Frame callback timing, clamped delta time
//! - `highscores`: Global Top-10 leaderboard boundary
//! - `tuning`: Data-driven game balance

pub mod clock;
pub mod engine;
pub mod highscores;
pub mod sim;
pub mod tuning;

pub use engine::{Engine, Snapshot};
pub use highscores::{HighScores, LeaderboardError, LeaderboardService};
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Largest simulation step a single frame callback may produce (seconds)
    pub const MAX_DT: f32 = 0.033;

    /// Visible field dimensions
    pub const FIELD_WIDTH: f32 = 900.0;
    pub const FIELD_HEIGHT: f32 = 300.0;

    /// Running surface (road top + road height)
    pub const GROUND_Y: f32 = 235.0;

    /// Player lane and standing hitbox
    pub const PLAYER_X: f32 = 120.0;
    pub const PLAYER_W: f32 = 28.0;
    pub const PLAYER_H: f32 = 44.0;
    /// Hitbox height at the lowest slide frames
    pub const SLIDE_LOW_H: f32 = 18.0;

    /// Slide animation frames: 0..=2 going down, 2/3 held, 4..=5 standing up
    pub const SLIDE_IN_LAST_FRAME: u8 = 2;
    pub const SLIDE_OUT_FIRST_FRAME: u8 = 4;
    pub const SLIDE_LAST_FRAME: u8 = 5;
    pub const SLIDE_HOLD_FRAMES: [u8; 2] = [2, 3];

    /// Entities behind this x are dropped
    pub const DESPAWN_X: f32 = -200.0;
    /// Vertical band outside of which entities are dropped
    pub const DESPAWN_TOP: f32 = -200.0;
    pub const DESPAWN_BOTTOM: f32 = FIELD_HEIGHT + 120.0;

    /// Inventory slots
    pub const INVENTORY_CAPACITY: usize = 3;
}
