//! Eggfall - an egg-catching arcade timing game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (lanes, spawning, catch/miss state machine)
//! - `highscores`: LocalStorage-backed leaderboard
//! - `settings`: Persisted display preferences
//!
//! Rendering and input live in the binary shell and talk to the simulation
//! only through `snapshot()` and discrete input events.

pub mod highscores;
pub mod settings;
pub mod sim;

pub use highscores::HighScores;
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Upper bound on a single simulation step (milliseconds). Frame gaps
    /// larger than this (e.g. tab backgrounding) are clamped, not integrated.
    pub const MAX_STEP_MS: f64 = 40.0;

    /// Number of lanes / catcher positions
    pub const LANE_COUNT: usize = 4;

    /// Lives at the start of a run
    pub const START_LIVES: u8 = 3;

    /// Spawn interval bounds (milliseconds)
    pub const SPAWN_INTERVAL_MAX_MS: f64 = 1200.0;
    pub const SPAWN_INTERVAL_MIN_MS: f64 = 450.0;
    /// Interval shrink per point of score (milliseconds)
    pub const SPAWN_INTERVAL_PER_SCORE_MS: f64 = 8.0;

    /// Egg speed curve (progress per millisecond)
    pub const EGG_BASE_SPEED: f64 = 0.007;
    pub const EGG_SPEED_PER_SCORE: f64 = 0.000_25;
    pub const EGG_SPEED_BONUS_CAP: f64 = 0.018;

    /// Per-egg speed jitter: `speed = base * (FLOOR + random * SPAN)`
    pub const EGG_JITTER_FLOOR: f64 = 0.9;
    pub const EGG_JITTER_SPAN: f64 = 0.3;

    /// Playfield dimensions the lane layout was authored for
    pub const FIELD_WIDTH: f32 = 720.0;
    pub const FIELD_HEIGHT: f32 = 460.0;
}

/// Linear interpolation between two points
#[inline]
pub fn lerp_point(a: Vec2, b: Vec2, t: f32) -> Vec2 {
    a + (b - a) * t
}
