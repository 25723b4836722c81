//! Game state and core simulation types
//!
//! The whole session lives in one `GameState` aggregate owned by the tick
//! pipeline; the presentation layer only ever sees it by shared reference.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::collision::Rect;
use super::effects::ActiveEffects;
use crate::consts::*;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Title/menu screen, no simulation running
    Menu,
    /// Active gameplay
    Playing,
    /// Run ended; terminal until an explicit restart
    GameOver,
}

/// The player's car
#[derive(Debug, Clone)]
pub struct Car {
    /// Top-left corner
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Horizontal steering speed (px per tick)
    pub steer_speed: f32,
    /// Current visual tilt (radians)
    pub tilt: f32,
    /// Tilt the car is easing toward
    pub target_tilt: f32,
}

impl Default for Car {
    fn default() -> Self {
        Self {
            x: CAR_START_X,
            y: CAR_START_Y,
            width: CAR_WIDTH,
            height: CAR_HEIGHT,
            steer_speed: CAR_STEER_SPEED,
            tilt: 0.0,
            target_tilt: 0.0,
        }
    }
}

impl Car {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn center(&self) -> Vec2 {
        self.rect().center()
    }

    /// Leftmost allowed x (inside the left shoulder)
    pub fn min_x(&self) -> f32 {
        ROAD_LEFT + ROAD_SHOULDER
    }

    /// Rightmost allowed x (car fully inside the right shoulder)
    pub fn max_x(&self) -> f32 {
        ROAD_RIGHT - ROAD_SHOULDER - self.width
    }

    /// Clamp x to the road bounds
    pub fn clamp_to_road(&mut self) {
        self.x = self.x.clamp(self.min_x(), self.max_x());
    }
}

/// Obstacle visual classes, each with a fixed footprint and color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObstacleKind {
    Car,
    Truck,
    Cone,
}

impl ObstacleKind {
    pub const ALL: [ObstacleKind; 3] = [ObstacleKind::Car, ObstacleKind::Truck, ObstacleKind::Cone];

    pub fn size(&self) -> (f32, f32) {
        match self {
            ObstacleKind::Car => (55.0, 90.0),
            ObstacleKind::Truck => (70.0, 120.0),
            ObstacleKind::Cone => (30.0, 40.0),
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            ObstacleKind::Car => "#4ecdc4",
            ObstacleKind::Truck => "#ff6b6b",
            ObstacleKind::Cone => "#ff9900",
        }
    }
}

/// A traffic obstacle scrolling toward the car
#[derive(Debug, Clone)]
pub struct Obstacle {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub kind: ObstacleKind,
    /// Pass points already awarded for this obstacle
    pub scored: bool,
}

impl Obstacle {
    /// Spawn at a lane center, fully above the visible area
    pub fn at_lane(lane: f32, kind: ObstacleKind) -> Self {
        let (width, height) = kind.size();
        Self {
            x: lane - width / 2.0,
            y: -height,
            width,
            height,
            kind,
            scored: false,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Lane center this obstacle occupies
    pub fn lane_x(&self) -> f32 {
        self.x + self.width / 2.0
    }
}

/// A collectible coin
#[derive(Debug, Clone)]
pub struct Coin {
    pub pos: Vec2,
    pub radius: f32,
    pub value: u64,
}

impl Coin {
    pub fn at_lane(lane: f32) -> Self {
        Self {
            pos: Vec2::new(lane, SPAWN_Y_OFFSET),
            radius: COIN_RADIUS,
            value: COIN_VALUE,
        }
    }
}

/// Power-up variants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerupKind {
    Shield,
    SlowMo,
    Magnet,
}

impl PowerupKind {
    pub const ALL: [PowerupKind; 3] = [PowerupKind::Shield, PowerupKind::SlowMo, PowerupKind::Magnet];

    pub fn label(&self) -> &'static str {
        match self {
            PowerupKind::Shield => "Shield Activated!",
            PowerupKind::SlowMo => "Slow Motion!",
            PowerupKind::Magnet => "Coin Magnet!",
        }
    }

    /// Notification text for when the effect window runs out
    pub fn expired_label(&self) -> &'static str {
        match self {
            PowerupKind::Shield => "Shield expired",
            PowerupKind::SlowMo => "Slow motion over",
            PowerupKind::Magnet => "Magnet expired",
        }
    }
}

/// A collectible power-up
#[derive(Debug, Clone)]
pub struct Powerup {
    pub pos: Vec2,
    pub radius: f32,
    pub kind: PowerupKind,
}

impl Powerup {
    pub fn at_lane(lane: f32, kind: PowerupKind) -> Self {
        Self {
            pos: Vec2::new(lane, SPAWN_Y_OFFSET),
            radius: POWERUP_RADIUS,
            kind,
        }
    }
}

/// Roadside scenery variants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeKind {
    Pine,
    Round,
}

/// Decorative roadside tree; never collides with anything
#[derive(Debug, Clone)]
pub struct Tree {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub kind: TreeKind,
}

/// A short-lived visual particle
#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Remaining life in [0, 1]; doubles as render alpha
    pub life: f32,
    pub color: &'static str,
    pub size: f32,
}

/// Hard cap on live particles
pub const MAX_PARTICLES: usize = 256;

/// Events surfaced by the sim for HUD notifications; drained once per frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    PowerupActivated(PowerupKind),
    PowerupExpired(PowerupKind),
    ShieldAbsorbed,
    NitroActivated,
    NitroExpired,
    NitroReady,
    GameOver,
}

/// Session capabilities and tuning knobs
///
/// Optional features are flags here rather than separate code paths, so a
/// reduced variant is just a different config.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Lane centers obstacles/coins/power-ups spawn at
    pub lanes: Vec<f32>,
    pub nitro_enabled: bool,
    pub combo_enabled: bool,
    pub day_night_enabled: bool,
    /// Burst size multiplier (quality preset / constrained displays)
    pub particle_scale: f32,
    pub max_particles: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            lanes: LANES.to_vec(),
            nitro_enabled: true,
            combo_enabled: true,
            day_night_enabled: true,
            particle_scale: 1.0,
            max_particles: MAX_PARTICLES,
        }
    }
}

/// Complete game state (deterministic for a given seed and input sequence)
#[derive(Debug, Clone)]
pub struct GameState {
    pub phase: GamePhase,
    pub config: GameConfig,
    pub car: Car,

    // Entity collections; insertion order is the iteration order
    pub obstacles: Vec<Obstacle>,
    pub coins: Vec<Coin>,
    pub powerups: Vec<Powerup>,
    pub trees: Vec<Tree>,
    pub particles: Vec<Particle>,

    // Session counters
    pub score: u64,
    pub streak: u32,
    pub best_streak: u32,
    pub coins_collected: u32,
    pub lives: u8,
    /// Monotonic distance accumulator (display meters)
    pub distance: f32,

    // Speed state
    pub base_speed: f32,
    /// Effective scroll speed applied last tick (base after slow-mo/nitro)
    pub speed: f32,
    /// Road dash scroll offset (cosmetic)
    pub road_offset: f32,
    /// Screen shake magnitude, decays each tick
    pub shake: f32,

    pub effects: ActiveEffects,
    /// Day-night cycle phase in [0, 1)
    pub day_night: f32,

    // Spawn timers (ticks since last threshold reset)
    pub obstacle_timer: u32,
    pub coin_timer: u32,
    pub powerup_timer: u32,
    pub tree_timer: u32,
    /// Which side of the road the next tree spawns on
    pub tree_side_left: bool,

    pub time_ticks: u64,
    pub seed: u64,
    pub rng: Pcg32,

    events: Vec<GameEvent>,
}

impl GameState {
    /// Create a fresh state sitting at the menu
    pub fn new(seed: u64) -> Self {
        Self::with_config(seed, GameConfig::default())
    }

    pub fn with_config(seed: u64, config: GameConfig) -> Self {
        Self {
            phase: GamePhase::Menu,
            config,
            car: Car::default(),
            obstacles: Vec::new(),
            coins: Vec::new(),
            powerups: Vec::new(),
            trees: Vec::new(),
            particles: Vec::new(),
            score: 0,
            streak: 0,
            best_streak: 0,
            coins_collected: 0,
            lives: 3,
            distance: 0.0,
            base_speed: BASE_SPEED,
            speed: BASE_SPEED,
            road_offset: 0.0,
            shake: 0.0,
            effects: ActiveEffects::default(),
            day_night: 0.0,
            obstacle_timer: 0,
            coin_timer: 0,
            powerup_timer: 0,
            tree_timer: 0,
            tree_side_left: true,
            time_ticks: 0,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
        }
    }

    /// Start (or restart) a session: everything resets, config survives
    pub fn start(&mut self, seed: u64) {
        let config = self.config.clone();
        *self = Self::with_config(seed, config);
        self.phase = GamePhase::Playing;
        super::spawn::populate_trees(self, 10);
    }

    /// Queue an event for the orchestrator
    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all queued events (called once per frame by the orchestrator)
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Emit a radial particle burst, capped and scaled by config
    pub fn spawn_burst(&mut self, origin: Vec2, color: &'static str, count: usize) {
        let count = ((count as f32 * self.config.particle_scale).round() as usize).max(1);
        for i in 0..count {
            if self.particles.len() >= self.config.max_particles {
                // Drop the oldest to make room
                self.particles.remove(0);
            }
            let angle = std::f32::consts::TAU * i as f32 / count as f32;
            let speed = self.rng.random_range(3.0..8.0);
            let size = self.rng.random_range(2.0..7.0);
            self.particles.push(Particle {
                pos: origin,
                vel: Vec2::new(angle.cos() * speed, angle.sin() * speed),
                life: 1.0,
                color,
                size,
            });
        }
    }

    /// Displayed speed multiplier (1.0x at base speed)
    pub fn speed_multiplier(&self) -> f32 {
        self.speed / BASE_SPEED
    }

    /// Displayed speed in km/h
    pub fn speed_kmh(&self) -> u32 {
        (80.0 + self.speed * 10.0) as u32
    }
}
