//! Stamina drain, idle recovery, and the exhaustion/recovery hysteresis.
//!
//! Resistance is a pure function of stamina, but recovery mode is not:
//! once stamina hits zero the courier is locked out of movement until it
//! climbs back to the recovery threshold, so the flag is modeled as its own
//! state rather than derived.

use bevy_ecs::prelude::Component;
use serde::{Deserialize, Serialize};

use crate::weather::WeatherCondition;

pub const MAX_STAMINA: f64 = 100.0;
pub const RECOVERY_THRESHOLD: f64 = 30.0;
pub const RECOVERY_RATE_PER_INTERVAL: f64 = 5.0;
pub const RECOVERY_INTERVAL_S: f64 = 1.0;

const TIRED_THRESHOLD: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resistance {
    Normal,
    Tired,
    Exhausted,
}

impl Resistance {
    pub fn from_stamina(stamina: f64) -> Self {
        if stamina > TIRED_THRESHOLD {
            Resistance::Normal
        } else if stamina > 0.0 {
            Resistance::Tired
        } else {
            Resistance::Exhausted
        }
    }

    pub fn speed_multiplier(self) -> f64 {
        match self {
            Resistance::Normal => 1.0,
            Resistance::Tired => 0.8,
            Resistance::Exhausted => 0.0,
        }
    }
}

/// Stamina lost by one completed move. Always non-negative; the caller
/// subtracts it.
pub fn move_stamina_loss(distance: u32, weight: f64, condition: WeatherCondition) -> f64 {
    let d = distance as f64;
    let base = 0.5 * d;
    let weight_penalty = 0.2 * (weight - 3.0).max(0.0) * d;
    let weather_penalty = condition.stamina_penalty_per_tile() * d;
    base + weight_penalty + weather_penalty
}

#[derive(Debug, Clone, Copy, Component, Serialize, Deserialize)]
pub struct Vitals {
    pub stamina: f64,
    pub resistance: Resistance,
    pub recovery_mode: bool,
    /// Seconds spent idle since the last move; fractional remainder carries
    /// across recovery intervals.
    pub idle_s: f64,
}

impl Default for Vitals {
    fn default() -> Self {
        Self {
            stamina: MAX_STAMINA,
            resistance: Resistance::Normal,
            recovery_mode: false,
            idle_s: 0.0,
        }
    }
}

impl Vitals {
    /// Gate for a movement attempt. In recovery mode movement is refused
    /// until stamina reaches the threshold; the first attempt at or above it
    /// clears the flag.
    pub fn try_clear_recovery(&mut self) -> bool {
        if !self.recovery_mode {
            return true;
        }
        if self.stamina >= RECOVERY_THRESHOLD {
            self.recovery_mode = false;
            return true;
        }
        false
    }

    /// Apply the stamina cost of a completed move and update resistance.
    /// Crossing to zero arms recovery mode.
    pub fn apply_move_loss(&mut self, distance: u32, weight: f64, condition: WeatherCondition) {
        let loss = move_stamina_loss(distance, weight, condition);
        let before = self.stamina;
        self.stamina = (self.stamina - loss).clamp(0.0, MAX_STAMINA);
        if before > 0.0 && self.stamina <= 0.0 {
            self.recovery_mode = true;
        }
        self.resistance = Resistance::from_stamina(self.stamina);
    }

    /// Accrue idle time and recover stamina for every full interval elapsed,
    /// carrying the fractional remainder. Returns the amount recovered.
    /// Resistance updates immediately, not only at move time.
    pub fn idle_tick(&mut self, dt_s: f64) -> f64 {
        self.idle_s += dt_s;
        if self.idle_s < RECOVERY_INTERVAL_S {
            return 0.0;
        }
        let intervals = (self.idle_s / RECOVERY_INTERVAL_S).floor();
        self.idle_s -= intervals * RECOVERY_INTERVAL_S;
        self.recover(intervals * RECOVERY_RATE_PER_INTERVAL)
    }

    /// Raise stamina by `amount`, clamped to the maximum. Clears recovery
    /// mode as soon as the threshold is reached.
    pub fn recover(&mut self, amount: f64) -> f64 {
        let before = self.stamina;
        self.stamina = (self.stamina + amount).clamp(0.0, MAX_STAMINA);
        if self.recovery_mode && self.stamina >= RECOVERY_THRESHOLD {
            self.recovery_mode = false;
        }
        self.resistance = Resistance::from_stamina(self.stamina);
        self.stamina - before
    }

    pub fn reset_idle(&mut self) {
        self.idle_s = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resistance_thresholds() {
        assert_eq!(Resistance::from_stamina(100.0), Resistance::Normal);
        assert_eq!(Resistance::from_stamina(30.1), Resistance::Normal);
        assert_eq!(Resistance::from_stamina(30.0), Resistance::Tired);
        assert_eq!(Resistance::from_stamina(0.1), Resistance::Tired);
        assert_eq!(Resistance::from_stamina(0.0), Resistance::Exhausted);
    }

    #[test]
    fn two_tile_move_unloaded_costs_one_point() {
        let mut vitals = Vitals {
            stamina: 35.0,
            resistance: Resistance::Normal,
            recovery_mode: false,
            idle_s: 0.0,
        };
        vitals.apply_move_loss(2, 0.0, WeatherCondition::Clear);
        assert!((vitals.stamina - 34.0).abs() < 1e-9);
        assert_eq!(vitals.resistance, Resistance::Normal);
    }

    #[test]
    fn weight_and_storm_add_per_tile_penalties() {
        // 3 tiles, 5 kg, storm: 0.5*3 + 0.2*2*3 + 0.3*3 = 1.5 + 1.2 + 0.9
        let loss = move_stamina_loss(3, 5.0, WeatherCondition::Storm);
        assert!((loss - 3.6).abs() < 1e-9);
        // Below the 3 kg threshold the weight term vanishes.
        assert!((move_stamina_loss(1, 2.0, WeatherCondition::Clear) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn hitting_zero_arms_recovery_mode() {
        let mut vitals = Vitals {
            stamina: 0.4,
            ..Vitals::default()
        };
        vitals.apply_move_loss(1, 0.0, WeatherCondition::Clear);
        assert_eq!(vitals.stamina, 0.0);
        assert_eq!(vitals.resistance, Resistance::Exhausted);
        assert!(vitals.recovery_mode);
        assert!(!vitals.try_clear_recovery());
    }

    #[test]
    fn recovery_mode_holds_until_threshold() {
        let mut vitals = Vitals {
            stamina: 0.0,
            resistance: Resistance::Exhausted,
            recovery_mode: true,
            idle_s: 0.0,
        };
        vitals.recover(29.9);
        assert!(vitals.recovery_mode);
        assert!(!vitals.try_clear_recovery());
        assert_eq!(vitals.resistance, Resistance::Tired);

        vitals.recover(0.1);
        assert!(!vitals.recovery_mode);
        assert!(vitals.try_clear_recovery());
    }

    #[test]
    fn movement_attempt_clears_recovery_at_threshold() {
        let mut vitals = Vitals {
            stamina: RECOVERY_THRESHOLD,
            resistance: Resistance::Tired,
            recovery_mode: true,
            idle_s: 0.0,
        };
        assert!(vitals.try_clear_recovery());
        assert!(!vitals.recovery_mode);
    }

    #[test]
    fn idle_recovery_carries_fractional_remainder() {
        let mut vitals = Vitals {
            stamina: 10.0,
            resistance: Resistance::Tired,
            recovery_mode: false,
            idle_s: 0.0,
        };
        assert_eq!(vitals.idle_tick(0.6), 0.0);
        // 0.6 + 0.6 = 1.2 s: one interval, 0.2 s remainder.
        let recovered = vitals.idle_tick(0.6);
        assert!((recovered - RECOVERY_RATE_PER_INTERVAL).abs() < 1e-9);
        assert!((vitals.idle_s - 0.2).abs() < 1e-9);
        assert!((vitals.stamina - 15.0).abs() < 1e-9);
    }

    #[test]
    fn idle_recovery_applies_multiple_whole_intervals() {
        let mut vitals = Vitals {
            stamina: 0.0,
            resistance: Resistance::Exhausted,
            recovery_mode: true,
            idle_s: 0.0,
        };
        let recovered = vitals.idle_tick(3.5);
        assert!((recovered - 15.0).abs() < 1e-9);
        assert_eq!(vitals.resistance, Resistance::Tired);
        assert!(vitals.recovery_mode); // 15 < threshold

        vitals.idle_tick(3.0);
        assert!((vitals.stamina - 30.0).abs() < 1e-9);
        assert!(!vitals.recovery_mode);
    }

    #[test]
    fn stamina_clamps_at_both_ends() {
        let mut vitals = Vitals::default();
        vitals.recover(50.0);
        assert_eq!(vitals.stamina, MAX_STAMINA);
        vitals.apply_move_loss(5, 100.0, WeatherCondition::Storm);
        assert!(vitals.stamina >= 0.0);
    }
}
