//! Entity factories
//!
//! All spawning draws from the state-owned RNG so a seed fully determines a
//! session. Obstacles respect a lane-availability filter: a lane whose last
//! obstacle is still near the top of the screen is excluded, which prevents
//! unavoidable stacked spawns. If every lane is blocked the spawn is simply
//! skipped that tick.

use rand::Rng;

use super::state::{Coin, GameState, Obstacle, ObstacleKind, Powerup, PowerupKind, Tree, TreeKind};
use crate::consts::*;

/// Lanes with no obstacle still above `LANE_CLEAR_Y`
fn available_lanes(state: &GameState) -> Vec<f32> {
    state
        .config
        .lanes
        .iter()
        .copied()
        .filter(|&lane| {
            !state
                .obstacles
                .iter()
                .any(|obs| (obs.lane_x() - lane).abs() < 1.0 && obs.y < LANE_CLEAR_Y)
        })
        .collect()
}

/// Spawn an obstacle of a uniformly random kind at a free lane, if any
pub fn spawn_obstacle(state: &mut GameState) {
    let lanes = available_lanes(state);
    if lanes.is_empty() {
        return;
    }
    let lane = lanes[state.rng.random_range(0..lanes.len())];
    let kind = ObstacleKind::ALL[state.rng.random_range(0..ObstacleKind::ALL.len())];
    state.obstacles.push(Obstacle::at_lane(lane, kind));
}

/// Spawn a coin at a uniformly random lane, above the visible area
pub fn spawn_coin(state: &mut GameState) {
    let lanes = &state.config.lanes;
    let lane = lanes[state.rng.random_range(0..lanes.len())];
    state.coins.push(Coin::at_lane(lane));
}

/// Spawn a power-up of a uniformly random variant at a random lane
pub fn spawn_powerup(state: &mut GameState) {
    let lanes = &state.config.lanes;
    let lane = lanes[state.rng.random_range(0..lanes.len())];
    let kind = PowerupKind::ALL[state.rng.random_range(0..PowerupKind::ALL.len())];
    state.powerups.push(Powerup::at_lane(lane, kind));
}

/// Spawn a tree on alternating sides of the road, randomized within the
/// roadside band
pub fn spawn_tree(state: &mut GameState) {
    let x = if state.tree_side_left {
        50.0 + state.rng.random_range(0.0..50.0)
    } else {
        ROAD_RIGHT + state.rng.random_range(0.0..50.0)
    };
    state.tree_side_left = !state.tree_side_left;

    let y = state.rng.random_range(0.0..LOGICAL_HEIGHT);
    let size = 40.0 + state.rng.random_range(0.0..30.0);
    let kind = if state.rng.random_bool(0.5) {
        TreeKind::Pine
    } else {
        TreeKind::Round
    };
    state.trees.push(Tree { x, y, size, kind });
}

/// Pre-populate roadside scenery at session start
pub fn populate_trees(state: &mut GameState, count: usize) {
    for _ in 0..count {
        spawn_tree(state);
    }
}
