//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (per-tick constants, no wall-clock time)
//! - Seeded RNG only, owned by `GameState`
//! - Stable entity iteration order (insertion order, `retain`-based removal)
//! - No rendering or platform dependencies

pub mod collision;
pub mod effects;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{Rect, circles_overlap, rects_overlap};
pub use effects::{ActiveEffects, NitroState};
pub use state::{
    Car, Coin, GameConfig, GameEvent, GamePhase, GameState, MAX_PARTICLES, Obstacle, ObstacleKind,
    Particle, Powerup, PowerupKind, Tree, TreeKind,
};
pub use tick::{TickInput, tick};
