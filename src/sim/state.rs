//! Game state and core simulation types
//!
//! All state that must be persisted for save/continue and determinism lives
//! here. The rendering shell only ever sees a `Snapshot`.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::lane::CatcherPos;
use crate::consts::START_LIVES;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Frozen by explicit pause input
    Paused,
    /// Run ended; only an explicit reset leaves this phase
    GameOver,
}

/// An egg in flight
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Egg {
    /// Lane index, fixed at spawn
    pub lane: usize,
    /// Position along the lane in [0,1)
    pub progress: f64,
    /// Progress gained per millisecond, fixed at spawn
    pub speed: f64,
}

/// Transient feedback for the rendering shell. Drained via
/// [`GameState::take_events`]; never read back by the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// An egg landed in the guarded lane
    Caught,
    /// An egg hit the ground; the shell flashes the screen
    MissFlash,
    /// Lives ran out this tick
    GameOver,
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Spawn RNG (lane choice and speed jitter); serialized so a restored
    /// save continues the same stream
    pub rng: Pcg32,
    pub score: u32,
    pub lives: u8,
    pub phase: GamePhase,
    pub catcher: CatcherPos,
    /// Eggs in flight
    pub eggs: Vec<Egg>,
    /// Timestamp of the most recent spawn. `None` gates nothing, so the
    /// first spawn check of a run fires immediately. Not persisted:
    /// timestamps belong to one page session's clock domain, and a restored
    /// save runs against a fresh clock.
    #[serde(skip)]
    pub last_spawn_ms: Option<f64>,
    /// Timestamp of the previous tick, for step-size bookkeeping. Not
    /// persisted, same clock-domain reasoning as `last_spawn_ms`.
    #[serde(skip)]
    pub(crate) last_tick_ms: Option<f64>,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Pending shell feedback
    #[serde(skip)]
    pub(crate) events: Vec<GameEvent>,
}

impl GameState {
    /// Create a fresh run with the given seed
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            score: 0,
            lives: START_LIVES,
            phase: GamePhase::Playing,
            catcher: CatcherPos::default(),
            eggs: Vec::new(),
            last_spawn_ms: None,
            last_tick_ms: None,
            time_ticks: 0,
            events: Vec::new(),
        }
    }

    /// True while the simulation clock is frozen (paused or game over)
    #[inline]
    pub fn is_frozen(&self) -> bool {
        matches!(self.phase, GamePhase::Paused | GamePhase::GameOver)
    }

    /// Re-initialize for a fresh run. The RNG stream keeps rolling so
    /// back-to-back runs differ without reseeding.
    pub fn reset(&mut self) {
        self.score = 0;
        self.lives = START_LIVES;
        self.phase = GamePhase::Playing;
        self.catcher = CatcherPos::default();
        self.eggs.clear();
        self.last_spawn_ms = None;
        self.last_tick_ms = None;
        self.time_ticks = 0;
        self.events.clear();
    }

    /// Drain pending shell feedback events
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Read-only view for the rendering shell
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            score: self.score,
            lives: self.lives,
            paused: self.is_frozen(),
            game_over: self.phase == GamePhase::GameOver,
            catcher: self.catcher,
            eggs: self
                .eggs
                .iter()
                .map(|e| EggView {
                    lane: e.lane,
                    progress: e.progress,
                })
                .collect(),
        }
    }
}

/// Read-only state view handed to the rendering shell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub score: u32,
    pub lives: u8,
    pub paused: bool,
    pub game_over: bool,
    pub catcher: CatcherPos,
    pub eggs: Vec<EggView>,
}

/// Lane + progress of one egg; the shell resolves this to a point via
/// [`super::lane::Lane::point_at`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EggView {
    pub lane: usize,
    pub progress: f64,
}
