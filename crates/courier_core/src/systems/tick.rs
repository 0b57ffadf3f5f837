//! Tick system: advances movement animation, accrues idle stamina
//! recovery, runs the order expiry sweep, and polls the terminal session
//! conditions. Fires at a fixed cadence and re-schedules itself.

use bevy_ecs::prelude::{Query, Res, ResMut};
use tracing::{debug, info};

use crate::clock::{CurrentEvent, EventKind, SimulationClock};
use crate::context::{EndCondition, SessionOutcome, SimContext};
use crate::ecs::{AgentKind, Courier, Motion, Position, Wallet};
use crate::jobs::{ExpiryConfig, JobBoard};
use crate::reputation::{DeliveryOutcome, Reputation, ScoringConfig};
use crate::scenario::TickConfig;
use crate::stamina::Vitals;
use crate::telemetry::StatusFeed;

#[allow(clippy::type_complexity)]
pub fn tick_system(
    mut clock: ResMut<SimulationClock>,
    event: Res<CurrentEvent>,
    config: Res<TickConfig>,
    context: Res<SimContext>,
    expiry: Res<ExpiryConfig>,
    scoring: Res<ScoringConfig>,
    mut outcome: ResMut<SessionOutcome>,
    mut feed: ResMut<StatusFeed>,
    mut agents: Query<(
        &Courier,
        &mut Position,
        &mut Motion,
        &mut Vitals,
        &mut Reputation,
        &mut JobBoard,
        &Wallet,
    )>,
) {
    if event.0.kind != EventKind::Tick {
        return;
    }

    // Keep the tick chain alive until the session is over; the host stops
    // pumping while paused, so rescheduling during a pause is harmless.
    if !outcome.is_over() {
        clock.schedule_in(config.interval_ms, EventKind::Tick, None);
    }

    // A paused tick advances nothing: no animation, no idle accrual, no
    // expiry. Partial timers keep their accumulated values.
    if context.paused || outcome.is_over() {
        return;
    }

    let dt_s = config.interval_ms as f64 / 1000.0;
    let now_s = clock.elapsed_s();

    for (courier, mut position, mut motion, mut vitals, mut reputation, mut board, wallet) in
        agents.iter_mut()
    {
        if motion.moving {
            motion.progress += motion.rate * dt_s;
            if motion.progress >= 1.0 {
                *position = motion.target.into();
                motion.moving = false;
                motion.progress = 0.0;
            }
        } else {
            let recovered = vitals.idle_tick(dt_s);
            if recovered > 0.0 {
                debug!(agent = %courier.name, stamina = vitals.stamina, "stamina recovered");
            }
        }

        board.mark_released(now_s);

        for lost in board.sweep(now_s, &expiry) {
            let change = reputation.apply(
                DeliveryOutcome::Lost {
                    overtime_s: lost.overtime_s,
                },
                &scoring,
            );
            info!(
                agent = %courier.name,
                order = %lost.id,
                overtime = lost.overtime_s,
                "order lost"
            );
            if courier.kind == AgentKind::Human {
                feed.push(now_s, format!("Package {} lost! {}", lost.id, change.message));
                if change.game_over {
                    outcome.finish(EndCondition::ReputationCollapse);
                }
            }
        }

        // Terminal conditions are judged on the human courier.
        if courier.kind == AgentKind::Human {
            if reputation.is_game_over() {
                outcome.finish(EndCondition::ReputationCollapse);
            }
            if context.goal_income > 0.0 && wallet.earnings >= context.goal_income {
                outcome.finish(EndCondition::GoalReached);
            }
            if now_s >= context.time_limit_s {
                outcome.finish(EndCondition::TimeExhausted);
            }
            if !board.has_remaining_jobs() {
                outcome.finish(EndCondition::JobsExhausted);
            }
        }
    }

    if let Some(condition) = outcome.ended {
        feed.push(now_s, format!("Session over: {condition:?}"));
    }
}
