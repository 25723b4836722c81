//! Lane Rush - a lane-dodging arcade driving game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, timed effects)
//! - `render`: Canvas2D presentation layer (wasm only)
//! - `highscore`: Single persisted best-score integer
//! - `settings`: Quality/accessibility preferences

pub mod highscore;
pub mod render;
pub mod settings;
pub mod sim;

pub use highscore::BestScore;
pub use settings::{QualityPreset, Settings};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz; all sim constants are per-tick)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Logical rendering space (scaled to the viewport by CSS)
    pub const LOGICAL_WIDTH: f32 = 900.0;
    pub const LOGICAL_HEIGHT: f32 = 600.0;

    /// Road geometry
    pub const ROAD_LEFT: f32 = 100.0;
    pub const ROAD_RIGHT: f32 = 800.0;
    pub const ROAD_SHOULDER: f32 = 20.0;
    /// Fixed lane centers across the road
    pub const LANES: [f32; 4] = [150.0, 350.0, 550.0, 750.0];

    /// Car defaults
    pub const CAR_WIDTH: f32 = 60.0;
    pub const CAR_HEIGHT: f32 = 100.0;
    pub const CAR_START_X: f32 = 400.0;
    pub const CAR_START_Y: f32 = 480.0;
    /// Horizontal steering speed (px per tick)
    pub const CAR_STEER_SPEED: f32 = 8.0;
    /// Target tilt while steering (radians)
    pub const CAR_TILT: f32 = 0.1;
    /// Exponential tilt smoothing factor per tick
    pub const CAR_TILT_SMOOTHING: f32 = 0.1;

    /// Scroll speed
    pub const BASE_SPEED: f32 = 4.0;
    /// Score points per unit of base-speed increase
    pub const SPEED_RAMP_SCORE: f32 = 200.0;

    /// Entities
    pub const COIN_RADIUS: f32 = 15.0;
    pub const COIN_VALUE: u64 = 10;
    pub const POWERUP_RADIUS: f32 = 20.0;
    /// Off-screen spawn offset above the top edge for coins/power-ups
    pub const SPAWN_Y_OFFSET: f32 = -30.0;
    /// Entities are removed once this far past the bottom edge
    pub const DESPAWN_MARGIN: f32 = 50.0;
    /// Points for passing an obstacle uncollided
    pub const OBSTACLE_PASS_SCORE: u64 = 5;

    /// Spawn timers (ticks between threshold checks)
    pub const OBSTACLE_SPAWN_BASE: u32 = 80;
    pub const OBSTACLE_SPAWN_MIN: u32 = 30;
    pub const COIN_SPAWN_INTERVAL: u32 = 60;
    pub const POWERUP_SPAWN_INTERVAL: u32 = 400;
    pub const TREE_SPAWN_INTERVAL: u32 = 40;
    /// A lane is blocked for spawning while an obstacle there is above this y
    pub const LANE_CLEAR_Y: f32 = 150.0;

    /// Timed-effect durations (ticks)
    pub const SHIELD_TICKS: u32 = 300;
    pub const SLOW_MO_TICKS: u32 = 200;
    pub const MAGNET_TICKS: u32 = 250;
    pub const NITRO_ACTIVE_TICKS: u32 = 180;
    pub const NITRO_COOLDOWN_TICKS: u32 = 600;
    /// Combo decay window; reset on every coin collection
    pub const COMBO_WINDOW_TICKS: u32 = 180;
    pub const COMBO_MAX: u32 = 5;

    /// Magnet pull
    pub const MAGNET_RADIUS: f32 = 150.0;
    pub const MAGNET_PULL: f32 = 0.1;

    /// Particles
    pub const PARTICLE_GRAVITY: f32 = 0.2;
    pub const PARTICLE_DECAY: f32 = 0.02;
    /// Probability of a nitro trail spark per tick
    pub const NITRO_TRAIL_CHANCE: f64 = 0.3;

    /// Day-night cycle length in ticks (60 seconds)
    pub const DAY_NIGHT_PERIOD: f32 = 3600.0;
}

/// Linear interpolation
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
