//! Timed-effect controller
//!
//! Shield, slow-motion, magnet, nitro and the combo multiplier are the only
//! cross-cutting mutable flags in the sim: speed computation, coin value and
//! collision resolution all read them. Each is a boolean gate plus a
//! countdown in ticks; nitro additionally runs a Ready/Active/Cooldown
//! machine so it cannot be re-triggered mid-window.

use super::state::{GameEvent, PowerupKind};
use crate::consts::*;

/// Nitro availability state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NitroState {
    #[default]
    Ready,
    Active {
        ticks_left: u32,
    },
    Cooldown {
        ticks_left: u32,
    },
}

/// Active timed effects and their countdowns
#[derive(Debug, Clone)]
pub struct ActiveEffects {
    pub shield: bool,
    pub shield_ticks: u32,
    pub slow_mo: bool,
    pub slow_mo_ticks: u32,
    pub magnet: bool,
    pub magnet_ticks: u32,
    pub nitro: NitroState,
    /// Current coin-value multiplier, >= 1
    pub combo_multiplier: u32,
    /// Ticks left before the combo decays back to 1
    pub combo_ticks: u32,
}

impl Default for ActiveEffects {
    fn default() -> Self {
        Self {
            shield: false,
            shield_ticks: 0,
            slow_mo: false,
            slow_mo_ticks: 0,
            magnet: false,
            magnet_ticks: 0,
            nitro: NitroState::Ready,
            combo_multiplier: 1,
            combo_ticks: 0,
        }
    }
}

impl ActiveEffects {
    /// Activate the effect matching a collected power-up; re-collection
    /// refreshes the window
    pub fn activate(&mut self, kind: PowerupKind) {
        match kind {
            PowerupKind::Shield => {
                self.shield = true;
                self.shield_ticks = SHIELD_TICKS;
            }
            PowerupKind::SlowMo => {
                self.slow_mo = true;
                self.slow_mo_ticks = SLOW_MO_TICKS;
            }
            PowerupKind::Magnet => {
                self.magnet = true;
                self.magnet_ticks = MAGNET_TICKS;
            }
        }
    }

    /// Absorb a collision: the shield ends immediately
    pub fn consume_shield(&mut self) {
        self.shield = false;
        self.shield_ticks = 0;
    }

    /// Try to fire nitro; fails while active or cooling down
    pub fn try_nitro(&mut self) -> bool {
        match self.nitro {
            NitroState::Ready => {
                self.nitro = NitroState::Active {
                    ticks_left: NITRO_ACTIVE_TICKS,
                };
                true
            }
            _ => false,
        }
    }

    pub fn nitro_active(&self) -> bool {
        matches!(self.nitro, NitroState::Active { .. })
    }

    /// Combined speed modifier for the current tick
    pub fn speed_multiplier(&self) -> f32 {
        let slow = if self.slow_mo { 0.5 } else { 1.0 };
        let boost = if self.nitro_active() { 2.0 } else { 1.0 };
        slow * boost
    }

    /// Register a coin collection: bump the multiplier (capped) and restart
    /// the decay window
    pub fn advance_combo(&mut self) {
        self.combo_multiplier = (self.combo_multiplier + 1).min(COMBO_MAX);
        self.combo_ticks = COMBO_WINDOW_TICKS;
    }

    /// Tick all countdowns down by one, clearing flags at zero and queueing
    /// expiry notifications
    pub fn countdown(&mut self, events: &mut Vec<GameEvent>) {
        if self.shield_ticks > 0 {
            self.shield_ticks -= 1;
            if self.shield_ticks == 0 && self.shield {
                self.shield = false;
                events.push(GameEvent::PowerupExpired(PowerupKind::Shield));
            }
        }
        if self.slow_mo_ticks > 0 {
            self.slow_mo_ticks -= 1;
            if self.slow_mo_ticks == 0 {
                self.slow_mo = false;
                events.push(GameEvent::PowerupExpired(PowerupKind::SlowMo));
            }
        }
        if self.magnet_ticks > 0 {
            self.magnet_ticks -= 1;
            if self.magnet_ticks == 0 {
                self.magnet = false;
                events.push(GameEvent::PowerupExpired(PowerupKind::Magnet));
            }
        }

        self.nitro = match self.nitro {
            NitroState::Ready => NitroState::Ready,
            NitroState::Active { ticks_left } => {
                if ticks_left <= 1 {
                    events.push(GameEvent::NitroExpired);
                    NitroState::Cooldown {
                        ticks_left: NITRO_COOLDOWN_TICKS,
                    }
                } else {
                    NitroState::Active {
                        ticks_left: ticks_left - 1,
                    }
                }
            }
            NitroState::Cooldown { ticks_left } => {
                if ticks_left <= 1 {
                    events.push(GameEvent::NitroReady);
                    NitroState::Ready
                } else {
                    NitroState::Cooldown {
                        ticks_left: ticks_left - 1,
                    }
                }
            }
        };

        if self.combo_ticks > 0 {
            self.combo_ticks -= 1;
            if self.combo_ticks == 0 {
                self.combo_multiplier = 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(effects: &mut ActiveEffects, ticks: u32) -> Vec<GameEvent> {
        let mut events = Vec::new();
        for _ in 0..ticks {
            effects.countdown(&mut events);
        }
        events
    }

    #[test]
    fn test_shield_expires_once() {
        let mut effects = ActiveEffects::default();
        effects.activate(PowerupKind::Shield);
        assert!(effects.shield);

        let events = drain(&mut effects, SHIELD_TICKS + 50);
        assert!(!effects.shield);
        let expiries = events
            .iter()
            .filter(|e| **e == GameEvent::PowerupExpired(PowerupKind::Shield))
            .count();
        assert_eq!(expiries, 1);
    }

    #[test]
    fn test_consumed_shield_does_not_report_expiry() {
        let mut effects = ActiveEffects::default();
        effects.activate(PowerupKind::Shield);
        effects.consume_shield();
        assert!(!effects.shield);

        let events = drain(&mut effects, SHIELD_TICKS + 1);
        assert!(events
            .iter()
            .all(|e| *e != GameEvent::PowerupExpired(PowerupKind::Shield)));
    }

    #[test]
    fn test_slow_mo_halves_speed() {
        let mut effects = ActiveEffects::default();
        assert_eq!(effects.speed_multiplier(), 1.0);
        effects.activate(PowerupKind::SlowMo);
        assert_eq!(effects.speed_multiplier(), 0.5);
        drain(&mut effects, SLOW_MO_TICKS);
        assert_eq!(effects.speed_multiplier(), 1.0);
    }

    #[test]
    fn test_nitro_lifecycle() {
        let mut effects = ActiveEffects::default();
        assert!(effects.try_nitro());
        assert!(effects.nitro_active());
        assert_eq!(effects.speed_multiplier(), 2.0);

        // Cannot re-trigger while active
        assert!(!effects.try_nitro());

        let events = drain(&mut effects, NITRO_ACTIVE_TICKS);
        assert!(!effects.nitro_active());
        assert!(events.contains(&GameEvent::NitroExpired));
        assert!(matches!(effects.nitro, NitroState::Cooldown { .. }));

        // Cannot re-trigger while cooling down
        assert!(!effects.try_nitro());

        let events = drain(&mut effects, NITRO_COOLDOWN_TICKS);
        assert!(events.contains(&GameEvent::NitroReady));
        assert_eq!(effects.nitro, NitroState::Ready);
        assert!(effects.try_nitro());
    }

    #[test]
    fn test_nitro_stacks_with_slow_mo() {
        let mut effects = ActiveEffects::default();
        effects.activate(PowerupKind::SlowMo);
        effects.try_nitro();
        assert_eq!(effects.speed_multiplier(), 1.0);
    }

    #[test]
    fn test_combo_caps_and_decays() {
        let mut effects = ActiveEffects::default();
        assert_eq!(effects.combo_multiplier, 1);

        for _ in 0..10 {
            effects.advance_combo();
        }
        assert_eq!(effects.combo_multiplier, COMBO_MAX);

        // Collections inside the window keep it alive
        drain(&mut effects, COMBO_WINDOW_TICKS - 1);
        assert_eq!(effects.combo_multiplier, COMBO_MAX);
        effects.advance_combo();
        drain(&mut effects, COMBO_WINDOW_TICKS - 1);
        assert_eq!(effects.combo_multiplier, COMBO_MAX);

        // Window runs out: resets to 1 exactly once
        drain(&mut effects, 1);
        assert_eq!(effects.combo_multiplier, 1);
        drain(&mut effects, COMBO_WINDOW_TICKS * 2);
        assert_eq!(effects.combo_multiplier, 1);
    }

    #[test]
    fn test_powerup_reactivation_refreshes_window() {
        let mut effects = ActiveEffects::default();
        effects.activate(PowerupKind::Magnet);
        drain(&mut effects, MAGNET_TICKS / 2);
        effects.activate(PowerupKind::Magnet);
        drain(&mut effects, MAGNET_TICKS - 1);
        assert!(effects.magnet);
        drain(&mut effects, 1);
        assert!(!effects.magnet);
    }
}
