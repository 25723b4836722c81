//! Fixed timestep simulation tick
//!
//! One call advances the session by exactly one tick. The pipeline is a
//! fixed sequence of sub-steps; adding behavior means adding a stage here,
//! never swapping a function out at runtime. Order matters: input and car
//! movement resolve before collisions, countdowns after entity updates,
//! spawning last.

use glam::Vec2;
use rand::Rng;

use super::collision::{circles_overlap, rects_overlap};
use super::spawn;
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::*;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Steering intent (held keys)
    pub left: bool,
    pub right: bool,
    /// One-shot: fire nitro if available
    pub nitro: bool,
    /// One-shot: restart from the game-over screen
    pub restart: bool,
}

/// Advance the game state by one tick
pub fn tick(state: &mut GameState, input: &TickInput) {
    match state.phase {
        GamePhase::Playing => {}
        GamePhase::GameOver => {
            if input.restart {
                let seed = state.rng.random::<u64>();
                state.start(seed);
            }
            return;
        }
        GamePhase::Menu => return,
    }

    state.time_ticks += 1;

    // Screen shake decay, snapped to zero near rest
    state.shake *= 0.9;
    if state.shake < 0.5 {
        state.shake = 0.0;
    }

    step_car(state, input);

    if input.nitro && state.config.nitro_enabled && state.effects.try_nitro() {
        state.push_event(GameEvent::NitroActivated);
    }

    // Effective scroll speed for this whole tick
    let speed = state.base_speed * state.effects.speed_multiplier();
    state.speed = speed;

    if state.effects.nitro_active() && state.rng.random_bool(NITRO_TRAIL_CHANCE) {
        let rear = Vec2::new(
            state.car.x + state.car.width / 2.0,
            state.car.y + state.car.height,
        );
        state.spawn_burst(rear, "#ffaa00", 3);
    }

    step_obstacles(state, speed);
    if state.phase != GamePhase::Playing {
        // Lives ran out this tick; the transition already fired
        return;
    }

    step_coins(state, speed);
    step_powerups(state, speed);
    step_trees(state, speed);
    step_particles(state);
    step_effects(state);
    step_ambient(state, speed);
    step_spawns(state);
}

/// Resolve steering intent, ease tilt, clamp to the road
fn step_car(state: &mut GameState, input: &TickInput) {
    let car = &mut state.car;
    if input.left && !input.right {
        car.x -= car.steer_speed;
        car.target_tilt = -CAR_TILT;
    } else if input.right && !input.left {
        car.x += car.steer_speed;
        car.target_tilt = CAR_TILT;
    } else {
        car.target_tilt = 0.0;
    }
    car.tilt += (car.target_tilt - car.tilt) * CAR_TILT_SMOOTHING;
    car.clamp_to_road();
}

/// Advance obstacles, resolve collisions, award pass points
fn step_obstacles(state: &mut GameState, speed: f32) {
    let car_rect = state.car.rect();
    let obstacles = std::mem::take(&mut state.obstacles);
    let mut survivors = Vec::with_capacity(obstacles.len());

    for mut obs in obstacles {
        obs.y += speed;

        if rects_overlap(&car_rect, &obs.rect()) {
            let center = obs.rect().center();
            if state.effects.shield {
                // Shield absorbs the hit; exactly one of absorb/life-loss
                // happens per collision
                state.effects.consume_shield();
                state.push_event(GameEvent::ShieldAbsorbed);
                state.spawn_burst(center, "#00ffff", 15);
            } else {
                state.lives = state.lives.saturating_sub(1);
                state.streak = 0;
                state.shake = 10.0;
                state.spawn_burst(center, "#ff0000", 20);
                if state.lives == 0 {
                    state.phase = GamePhase::GameOver;
                    state.push_event(GameEvent::GameOver);
                }
            }
            continue;
        }

        if obs.y > LOGICAL_HEIGHT && !obs.scored {
            obs.scored = true;
            state.score += OBSTACLE_PASS_SCORE;
            state.streak += 1;
            state.best_streak = state.best_streak.max(state.streak);
        }

        if obs.y < LOGICAL_HEIGHT + DESPAWN_MARGIN {
            survivors.push(obs);
        }
    }

    state.obstacles = survivors;
}

/// Advance coins, apply magnet pull, resolve pickups
fn step_coins(state: &mut GameState, speed: f32) {
    let car_center = state.car.center();
    let pickup_radius = state.car.width / 3.0;
    let magnet = state.effects.magnet;
    let multiplier = if state.config.combo_enabled {
        state.effects.combo_multiplier as u64
    } else {
        1
    };

    let coins = std::mem::take(&mut state.coins);
    let mut survivors = Vec::with_capacity(coins.len());

    for mut coin in coins {
        coin.pos.y += speed;

        if magnet && coin.pos.distance(car_center) < MAGNET_RADIUS {
            coin.pos += (car_center - coin.pos) * MAGNET_PULL;
        }

        if circles_overlap(coin.pos, coin.radius, car_center, pickup_radius) {
            // Multiplier applies to the base value, never a modified one
            state.score += coin.value * multiplier;
            state.coins_collected += 1;
            state.streak += 2;
            state.best_streak = state.best_streak.max(state.streak);
            if state.config.combo_enabled {
                state.effects.advance_combo();
            }
            state.spawn_burst(coin.pos, "#ffd700", 12);
            continue;
        }

        if coin.pos.y < LOGICAL_HEIGHT + DESPAWN_MARGIN {
            survivors.push(coin);
        }
    }

    state.coins = survivors;
}

/// Advance power-ups, resolve pickups into effect activations
fn step_powerups(state: &mut GameState, speed: f32) {
    let car_center = state.car.center();
    let pickup_radius = state.car.width / 2.0;

    let powerups = std::mem::take(&mut state.powerups);
    let mut survivors = Vec::with_capacity(powerups.len());

    for mut powerup in powerups {
        powerup.pos.y += speed;

        if circles_overlap(powerup.pos, powerup.radius, car_center, pickup_radius) {
            state.effects.activate(powerup.kind);
            state.push_event(GameEvent::PowerupActivated(powerup.kind));
            state.spawn_burst(powerup.pos, "#ff00ff", 15);
            continue;
        }

        if powerup.pos.y < LOGICAL_HEIGHT + DESPAWN_MARGIN {
            survivors.push(powerup);
        }
    }

    state.powerups = survivors;
}

/// Scenery scrolls at half the road speed
fn step_trees(state: &mut GameState, speed: f32) {
    for tree in &mut state.trees {
        tree.y += speed * 0.5;
    }
    state.trees.retain(|t| t.y < LOGICAL_HEIGHT + 100.0);
}

/// Integrate particles: velocity, gravity, fade
fn step_particles(state: &mut GameState) {
    for p in &mut state.particles {
        p.pos += p.vel;
        p.vel.y += PARTICLE_GRAVITY;
        p.life -= PARTICLE_DECAY;
    }
    state.particles.retain(|p| p.life > 0.0);
}

/// Tick down timed-effect windows and surface expiry notifications
fn step_effects(state: &mut GameState) {
    let mut events = Vec::new();
    state.effects.countdown(&mut events);
    for event in events {
        state.push_event(event);
    }
}

/// Difficulty ramp, distance/speed metrics, day-night phase, road scroll
fn step_ambient(state: &mut GameState, speed: f32) {
    state.base_speed = BASE_SPEED + state.score as f32 / SPEED_RAMP_SCORE;
    state.distance += speed * 0.1;
    state.road_offset = (state.road_offset + speed) % 50.0;
    if state.config.day_night_enabled {
        state.day_night = (state.day_night + 1.0 / DAY_NIGHT_PERIOD).fract();
    }
}

/// Evaluate spawn timers against their thresholds
fn step_spawns(state: &mut GameState) {
    state.obstacle_timer += 1;
    state.coin_timer += 1;
    state.powerup_timer += 1;
    state.tree_timer += 1;

    // Obstacles come faster as score climbs, floored at a minimum interval
    let threshold =
        OBSTACLE_SPAWN_MIN.max(OBSTACLE_SPAWN_BASE.saturating_sub((state.score / 100) as u32));
    if state.obstacle_timer > threshold {
        spawn::spawn_obstacle(state);
        state.obstacle_timer = 0;
    }

    if state.coin_timer > COIN_SPAWN_INTERVAL {
        if state.rng.random_bool(0.5) {
            spawn::spawn_coin(state);
        }
        state.coin_timer = 0;
    }

    if state.powerup_timer > POWERUP_SPAWN_INTERVAL {
        if state.rng.random_bool(0.3) {
            spawn::spawn_powerup(state);
        }
        state.powerup_timer = 0;
    }

    if state.tree_timer > TREE_SPAWN_INTERVAL {
        spawn::spawn_tree(state);
        state.tree_timer = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Coin, Obstacle, ObstacleKind, Powerup, PowerupKind};
    use proptest::prelude::*;

    fn playing_state(seed: u64) -> GameState {
        let mut state = GameState::new(seed);
        state.start(seed);
        state
    }

    /// An obstacle placed directly on the car
    fn obstacle_on_car(state: &GameState) -> Obstacle {
        let mut obs = Obstacle::at_lane(
            state.car.x + state.car.width / 2.0,
            ObstacleKind::Car,
        );
        obs.y = state.car.y;
        obs
    }

    #[test]
    fn test_car_stops_at_bound_when_holding_direction() {
        let mut state = playing_state(1);
        let input = TickInput {
            right: true,
            ..Default::default()
        };
        for _ in 0..500 {
            tick(&mut state, &input);
            if state.phase != GamePhase::Playing {
                return; // collided with spawned traffic; bound still held
            }
            assert!(state.car.x <= state.car.max_x());
        }
        assert_eq!(state.car.x, state.car.max_x());
    }

    #[test]
    fn test_unshielded_collision_costs_a_life_and_streak() {
        let mut state = playing_state(2);
        state.streak = 4;
        state.best_streak = 4;
        state.obstacles.push(obstacle_on_car(&state));

        tick(&mut state, &TickInput::default());
        assert_eq!(state.lives, 2);
        assert_eq!(state.streak, 0);
        assert_eq!(state.best_streak, 4);
        assert!(state.obstacles.is_empty());
        assert!(state.shake > 0.0);
    }

    #[test]
    fn test_shield_absorbs_exactly_one_collision() {
        let mut state = playing_state(3);
        state.effects.activate(PowerupKind::Shield);
        state.obstacles.push(obstacle_on_car(&state));

        tick(&mut state, &TickInput::default());
        assert_eq!(state.lives, 3);
        assert!(!state.effects.shield);
        assert!(state.drain_events().contains(&GameEvent::ShieldAbsorbed));

        // Shield is consumed: a second collision costs a life
        state.obstacles.push(obstacle_on_car(&state));
        tick(&mut state, &TickInput::default());
        assert_eq!(state.lives, 2);
    }

    #[test]
    fn test_game_over_fires_once_and_is_terminal() {
        let mut state = playing_state(4);
        state.lives = 1;
        state.obstacles.push(obstacle_on_car(&state));

        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.lives, 0);
        let events = state.drain_events();
        assert_eq!(
            events.iter().filter(|e| **e == GameEvent::GameOver).count(),
            1
        );

        // Terminal: further ticks change nothing
        let score = state.score;
        let ticks = state.time_ticks;
        for _ in 0..10 {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.score, score);
        assert_eq!(state.time_ticks, ticks);
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_restart_from_game_over() {
        let mut state = playing_state(5);
        state.lives = 1;
        state.score = 120;
        state.obstacles.push(obstacle_on_car(&state));
        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::GameOver);

        tick(
            &mut state,
            &TickInput {
                restart: true,
                ..Default::default()
            },
        );
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score, 0);
        assert_eq!(state.lives, 3);
        assert!(state.obstacles.is_empty());
    }

    #[test]
    fn test_coin_pickup_applies_combo_to_base_value() {
        let mut state = playing_state(6);
        state.effects.combo_multiplier = 3;
        state.effects.combo_ticks = COMBO_WINDOW_TICKS;
        let mut coin = Coin::at_lane(0.0);
        coin.pos = state.car.center();
        state.coins.push(coin);

        tick(&mut state, &TickInput::default());
        assert_eq!(state.score, 30);
        assert_eq!(state.coins_collected, 1);
        assert_eq!(state.streak, 2);
        // Collection bumps the multiplier for the next coin
        assert_eq!(state.effects.combo_multiplier, 4);
        assert!(state.coins.is_empty());
    }

    #[test]
    fn test_magnet_pulls_nearby_coins() {
        let mut state = playing_state(7);
        state.effects.activate(PowerupKind::Magnet);
        let car_center = state.car.center();
        let mut coin = Coin::at_lane(0.0);
        coin.pos = car_center + Vec2::new(100.0, 0.0);
        state.coins.push(coin);

        tick(&mut state, &TickInput::default());
        let coin = &state.coins[0];
        assert!(coin.pos.x < car_center.x + 100.0);
    }

    #[test]
    fn test_powerup_pickup_activates_effect() {
        let mut state = playing_state(8);
        let mut powerup = Powerup::at_lane(0.0, PowerupKind::SlowMo);
        powerup.pos = state.car.center();
        state.powerups.push(powerup);

        tick(&mut state, &TickInput::default());
        assert!(state.effects.slow_mo);
        assert!(state
            .drain_events()
            .contains(&GameEvent::PowerupActivated(PowerupKind::SlowMo)));
        assert!(state.powerups.is_empty());
    }

    #[test]
    fn test_slow_motion_halves_entity_advancement() {
        let mut state = playing_state(9);
        let base = state.base_speed;
        let mut obs = Obstacle::at_lane(150.0, ObstacleKind::Cone);
        obs.y = 100.0;
        state.obstacles.push(obs);
        let mut coin = Coin::at_lane(750.0);
        coin.pos.y = 100.0;
        state.coins.push(coin);
        let tree_y = state.trees[0].y;

        state.effects.activate(PowerupKind::SlowMo);
        tick(&mut state, &TickInput::default());

        assert_eq!(state.obstacles[0].y, 100.0 + base * 0.5);
        assert_eq!(state.coins[0].pos.y, 100.0 + base * 0.5);
        assert_eq!(state.trees[0].y, tree_y + base * 0.25);

        // After expiry everything moves at full speed again
        for _ in 0..SLOW_MO_TICKS {
            state.effects
                .countdown(&mut Vec::new());
        }
        let y = state.obstacles[0].y;
        let base = state.base_speed;
        tick(&mut state, &TickInput::default());
        assert_eq!(state.obstacles[0].y, y + base);
    }

    #[test]
    fn test_nitro_doubles_speed_and_emits_event() {
        let mut state = playing_state(10);
        let base = state.base_speed;
        tick(
            &mut state,
            &TickInput {
                nitro: true,
                ..Default::default()
            },
        );
        assert_eq!(state.speed, base * 2.0);
        assert!(state.drain_events().contains(&GameEvent::NitroActivated));
    }

    #[test]
    fn test_nitro_disabled_by_config() {
        let mut state = playing_state(11);
        state.config.nitro_enabled = false;
        tick(
            &mut state,
            &TickInput {
                nitro: true,
                ..Default::default()
            },
        );
        assert!(!state.effects.nitro_active());
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_obstacle_scored_at_most_once() {
        let mut state = playing_state(12);
        let mut obs = Obstacle::at_lane(150.0, ObstacleKind::Cone);
        obs.y = LOGICAL_HEIGHT - 1.0;
        state.obstacles.push(obs);

        tick(&mut state, &TickInput::default());
        assert_eq!(state.score, OBSTACLE_PASS_SCORE);
        assert_eq!(state.streak, 1);

        // Still on screen for a few more ticks; no double counting
        while !state.obstacles.is_empty() {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.score, OBSTACLE_PASS_SCORE);
    }

    #[test]
    fn test_difficulty_ramp_and_distance() {
        let mut state = playing_state(13);
        state.score = 400;
        tick(&mut state, &TickInput::default());
        assert_eq!(state.base_speed, BASE_SPEED + 2.0);
        assert!(state.distance > 0.0);
    }

    #[test]
    fn test_day_night_phase_wraps() {
        let mut state = playing_state(14);
        state.day_night = 1.0 - 0.5 / DAY_NIGHT_PERIOD;
        tick(&mut state, &TickInput::default());
        assert!(state.day_night < 1.0);
        assert!(state.day_night >= 0.0);
    }

    #[test]
    fn test_score_is_monotonic() {
        let mut state = playing_state(15);
        let mut last = 0;
        let input = TickInput::default();
        for _ in 0..2000 {
            tick(&mut state, &input);
            assert!(state.score >= last);
            last = state.score;
            if state.phase != GamePhase::Playing {
                break;
            }
        }
    }

    #[test]
    fn test_spawning_happens_on_schedule() {
        let mut state = playing_state(16);
        for _ in 0..(OBSTACLE_SPAWN_BASE + 2) {
            tick(&mut state, &TickInput::default());
        }
        assert!(!state.obstacles.is_empty());
    }

    proptest! {
        #[test]
        fn prop_car_x_always_within_road_bounds(
            seq in proptest::collection::vec((any::<bool>(), any::<bool>()), 1..400)
        ) {
            let mut state = playing_state(99);
            for (left, right) in seq {
                let input = TickInput { left, right, ..Default::default() };
                tick(&mut state, &input);
                prop_assert!(state.car.x >= state.car.min_x());
                prop_assert!(state.car.x <= state.car.max_x());
            }
        }

        #[test]
        fn prop_lives_never_negative_single_game_over(seed in 0u64..500) {
            let mut state = playing_state(seed);
            // Drive into traffic on purpose
            let mut game_overs = 0;
            for i in 0..3000u32 {
                let input = TickInput {
                    left: i % 120 < 60,
                    right: i % 120 >= 60,
                    ..Default::default()
                };
                tick(&mut state, &input);
                game_overs += state
                    .drain_events()
                    .iter()
                    .filter(|e| **e == GameEvent::GameOver)
                    .count();
                if state.phase == GamePhase::GameOver {
                    break;
                }
            }
            prop_assert!(game_overs <= 1);
            if state.phase == GamePhase::GameOver {
                prop_assert_eq!(state.lives, 0);
                prop_assert_eq!(game_overs, 1);
            }
        }
    }
}
