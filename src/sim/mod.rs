//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Clamped timestep only
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod lane;
pub mod state;
pub mod tick;

pub use lane::{CatcherPos, Direction, Lane, LANES};
pub use state::{Egg, EggView, GameEvent, GamePhase, GameState, Snapshot};
pub use tick::{difficulty, handle_input, tick, Difficulty, InputEvent};
