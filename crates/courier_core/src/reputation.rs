//! Reputation scoring: one update per delivery outcome, with late tiers,
//! streak bonuses, the first-late-of-day discount, and loss dampening.

use bevy_ecs::prelude::{Component, Resource};
use serde::{Deserialize, Serialize};

pub const STARTING_REPUTATION: f64 = 70.0;
/// Below this the session is over; callers poll after every update.
pub const GAME_OVER_THRESHOLD: f64 = 20.0;
/// At or above this, the first late delivery of the day costs half.
const FIRST_LATE_DISCOUNT_THRESHOLD: f64 = 85.0;
/// At or above this, payouts carry the excellence bonus.
const EXCELLENCE_THRESHOLD: f64 = 90.0;
/// Near-zero reputation no longer drains; it is floored instead.
const NEAR_ZERO: f64 = 5.0;

const STREAK_BONUS_AT: u32 = 3;

/// Tunable scoring knobs. The early/on-time boundary is configurable rather
/// than canonical; the default margin is 20% of the accept-to-deadline
/// window.
#[derive(Debug, Clone, Copy, Resource, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub early_fraction: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            early_fraction: 0.2,
        }
    }
}

/// One delivery outcome fed to the scorer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DeliveryOutcome {
    Cancelled,
    /// Expired in the courier's hands (or never delivered).
    Lost { overtime_s: f64 },
    Completed {
        overtime_s: f64,
        /// Seconds left before the deadline at delivery (0 when late).
        remaining_s: f64,
        /// Accept-to-deadline window, basis for the early margin.
        window_s: f64,
    },
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyStats {
    pub on_time: u32,
    pub early: u32,
    pub late: u32,
    pub canceled: u32,
    pub lost: u32,
}

/// Result of one scorer invocation, surfaced to the status feed.
#[derive(Debug, Clone, PartialEq)]
pub struct ReputationChange {
    pub old: f64,
    pub new: f64,
    pub applied: f64,
    pub streak: u32,
    pub message: String,
    pub game_over: bool,
}

#[derive(Debug, Clone, Component, Serialize, Deserialize)]
pub struct Reputation {
    pub value: f64,
    pub streak: u32,
    pub first_late_used_today: bool,
    pub daily: DailyStats,
}

impl Default for Reputation {
    fn default() -> Self {
        Self {
            value: STARTING_REPUTATION,
            streak: 0,
            first_late_used_today: false,
            daily: DailyStats::default(),
        }
    }
}

fn overtime_penalty(overtime_s: f64) -> f64 {
    if overtime_s <= 30.0 {
        2.0
    } else if overtime_s <= 120.0 {
        5.0
    } else {
        10.0
    }
}

impl Reputation {
    pub fn is_game_over(&self) -> bool {
        self.value < GAME_OVER_THRESHOLD
    }

    /// Payout multiplier read by the payment step, not by the scorer.
    pub fn payout_multiplier(&self) -> f64 {
        if self.value >= EXCELLENCE_THRESHOLD {
            1.05
        } else {
            1.0
        }
    }

    /// Reset daily counters at the start of a shift.
    pub fn reset_daily(&mut self) {
        self.first_late_used_today = false;
        self.daily = DailyStats::default();
    }

    /// Late/lost penalty with the first-late-of-day discount applied and
    /// consumed when eligible.
    fn late_penalty(&mut self, overtime_s: f64) -> f64 {
        let base = overtime_penalty(overtime_s);
        if self.value >= FIRST_LATE_DISCOUNT_THRESHOLD && !self.first_late_used_today {
            self.first_late_used_today = true;
            base / 2.0
        } else {
            base
        }
    }

    /// Apply one delivery outcome. Negative totals are dampened: a single
    /// event removes at most max(1, 20% of current), never crosses the
    /// game-over floor from at/above it, and near zero the value is floored
    /// at 1 instead of drained further.
    pub fn apply(&mut self, outcome: DeliveryOutcome, config: &ScoringConfig) -> ReputationChange {
        let old = self.value;
        let mut message;
        let mut change;

        match outcome {
            DeliveryOutcome::Cancelled => {
                change = -4.0;
                self.streak = 0;
                self.daily.canceled += 1;
                message = "Order canceled: -4 reputation".to_string();
            }
            DeliveryOutcome::Lost { overtime_s } => {
                self.daily.lost += 1;
                self.streak = 0;
                let penalty = self.late_penalty(overtime_s);
                change = -penalty;
                message = format!(
                    "Package lost ({overtime_s:.0}s overtime): -{penalty} reputation"
                );
            }
            DeliveryOutcome::Completed {
                overtime_s,
                remaining_s,
                window_s,
            } => {
                if overtime_s > 0.0 {
                    self.daily.late += 1;
                    self.streak = 0;
                    let penalty = self.late_penalty(overtime_s);
                    change = -penalty;
                    message =
                        format!("Late delivery ({overtime_s:.0}s): -{penalty} reputation");
                } else if remaining_s >= config.early_fraction * window_s && window_s > 0.0 {
                    change = 5.0;
                    self.streak += 1;
                    self.daily.early += 1;
                    message = "Early delivery: +5 reputation".to_string();
                } else {
                    change = 3.0;
                    self.streak += 1;
                    self.daily.on_time += 1;
                    message = "On-time delivery: +3 reputation".to_string();
                }
            }
        }

        // Streak bonus fires once per run, the instant the counter reaches
        // exactly three. The streak itself keeps counting.
        if self.streak == STREAK_BONUS_AT && change > 0.0 {
            change += 2.0;
            message.push_str(" + streak bonus: +2");
        }

        let new = if change < 0.0 {
            if old <= NEAR_ZERO {
                old.max(1.0)
            } else {
                let mut loss = change.abs().min((old * 0.20).max(1.0));
                if old >= GAME_OVER_THRESHOLD && old - loss < GAME_OVER_THRESHOLD {
                    loss = old - GAME_OVER_THRESHOLD;
                }
                (old - loss).clamp(0.0, 100.0)
            }
        } else {
            (old + change).clamp(0.0, 100.0)
        };
        self.value = new;

        ReputationChange {
            old,
            new,
            applied: new - old,
            streak: self.streak,
            message,
            game_over: self.is_game_over(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rep(value: f64) -> Reputation {
        Reputation {
            value,
            ..Reputation::default()
        }
    }

    #[test]
    fn cancel_costs_four_and_resets_streak() {
        let mut r = rep(70.0);
        r.streak = 2;
        let change = r.apply(DeliveryOutcome::Cancelled, &ScoringConfig::default());
        assert_eq!(change.applied, -4.0);
        assert_eq!(r.value, 66.0);
        assert_eq!(r.streak, 0);
        assert_eq!(r.daily.canceled, 1);
    }

    #[test]
    fn late_penalty_tiers() {
        let config = ScoringConfig::default();
        for (overtime, expected) in [(10.0, -2.0), (31.0, -5.0), (121.0, -10.0)] {
            let mut r = rep(70.0);
            let change = r.apply(
                DeliveryOutcome::Completed {
                    overtime_s: overtime,
                    remaining_s: 0.0,
                    window_s: 90.0,
                },
                &config,
            );
            assert_eq!(change.applied, expected, "overtime {overtime}");
            assert_eq!(r.daily.late, 1);
        }
    }

    #[test]
    fn first_late_of_day_is_half_price_at_high_reputation() {
        let config = ScoringConfig::default();
        let mut r = rep(88.0);
        let change = r.apply(
            DeliveryOutcome::Completed {
                overtime_s: 10.0,
                remaining_s: 0.0,
                window_s: 90.0,
            },
            &config,
        );
        assert_eq!(change.applied, -1.0);
        assert!(r.first_late_used_today);

        // Discount is consumed; the second late event costs full price.
        let change = r.apply(
            DeliveryOutcome::Completed {
                overtime_s: 10.0,
                remaining_s: 0.0,
                window_s: 90.0,
            },
            &config,
        );
        assert_eq!(change.applied, -2.0);
    }

    #[test]
    fn early_and_on_time_boundaries() {
        let config = ScoringConfig::default();
        // 90 s window, 20% margin = 18 s.
        let mut r = rep(70.0);
        let change = r.apply(
            DeliveryOutcome::Completed {
                overtime_s: 0.0,
                remaining_s: 18.0,
                window_s: 90.0,
            },
            &config,
        );
        assert_eq!(change.applied, 5.0);
        assert_eq!(r.daily.early, 1);

        let mut r = rep(70.0);
        let change = r.apply(
            DeliveryOutcome::Completed {
                overtime_s: 0.0,
                remaining_s: 17.9,
                window_s: 90.0,
            },
            &config,
        );
        assert_eq!(change.applied, 3.0);
        assert_eq!(r.daily.on_time, 1);
    }

    #[test]
    fn streak_bonus_fires_exactly_once_per_run() {
        let config = ScoringConfig::default();
        let mut r = rep(50.0);
        let on_time = DeliveryOutcome::Completed {
            overtime_s: 0.0,
            remaining_s: 1.0,
            window_s: 90.0,
        };
        assert_eq!(r.apply(on_time, &config).applied, 3.0);
        assert_eq!(r.apply(on_time, &config).applied, 3.0);
        // Third delivery: +3 and the +2 bonus.
        assert_eq!(r.apply(on_time, &config).applied, 5.0);
        assert_eq!(r.streak, 3);
        // Fourth: streak keeps counting, no repeat bonus.
        assert_eq!(r.apply(on_time, &config).applied, 3.0);
        assert_eq!(r.streak, 4);
    }

    #[test]
    fn loss_dampening_limits_single_event_damage() {
        let config = ScoringConfig::default();
        // 20% of 100 = 20, so a -10 penalty passes through untouched.
        let mut r = rep(100.0);
        r.apply(
            DeliveryOutcome::Lost { overtime_s: 300.0 },
            &config,
        );
        // 100 >= 85 and first late unused: -10 halved to -5.
        assert_eq!(r.value, 95.0);

        // At 24, 20% is 4.8: a -10 tier loses only 4.8.
        let mut r = rep(24.0);
        let change = r.apply(DeliveryOutcome::Lost { overtime_s: 300.0 }, &config);
        assert!((change.applied + 4.0).abs() < 1e-9); // clamped at the floor
        assert!((r.value - 20.0).abs() < 1e-9);
    }

    #[test]
    fn single_event_never_crosses_the_game_over_floor() {
        let config = ScoringConfig::default();
        let mut r = rep(21.0);
        let change = r.apply(DeliveryOutcome::Cancelled, &config);
        assert_eq!(r.value, 20.0);
        assert!(!change.game_over);

        // Already below the floor: next penalty can finish it.
        let mut r = rep(19.0);
        let change = r.apply(DeliveryOutcome::Cancelled, &config);
        assert!(change.game_over);
        assert!(r.value < GAME_OVER_THRESHOLD);
    }

    #[test]
    fn near_zero_reputation_floors_at_one() {
        let config = ScoringConfig::default();
        let mut r = rep(3.0);
        r.apply(DeliveryOutcome::Cancelled, &config);
        assert_eq!(r.value, 3.0);

        let mut r = rep(0.5);
        r.apply(DeliveryOutcome::Cancelled, &config);
        assert_eq!(r.value, 1.0);
    }

    #[test]
    fn payout_multiplier_unlocks_at_ninety() {
        assert_eq!(rep(89.9).payout_multiplier(), 1.0);
        assert_eq!(rep(90.0).payout_multiplier(), 1.05);
    }

    #[test]
    fn scenario_priority_one_delivered_ten_seconds_late() {
        // Accepted at 100 with priority 1: deadline 190. Delivered at 200:
        // overtime 10 s, tier <=30 s.
        let config = ScoringConfig::default();
        let mut r = rep(70.0);
        let change = r.apply(
            DeliveryOutcome::Completed {
                overtime_s: 10.0,
                remaining_s: 0.0,
                window_s: 90.0,
            },
            &config,
        );
        assert_eq!(change.applied, -2.0);

        let mut r = rep(86.0);
        let change = r.apply(
            DeliveryOutcome::Completed {
                overtime_s: 10.0,
                remaining_s: 0.0,
                window_s: 90.0,
            },
            &config,
        );
        assert_eq!(change.applied, -1.0);
    }
}
