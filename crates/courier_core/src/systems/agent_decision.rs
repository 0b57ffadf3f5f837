//! Autonomous agent decision system.
//!
//! One iteration per [`EventKind::AgentDecision`] event: handle
//! pickup/delivery at the current tile, pick up new jobs, then choose and
//! execute a move through the same action layer the human path uses. The
//! iteration re-schedules itself at the agent's decision cadence, so each
//! bot runs an independent loop on the shared cooperative clock.

use bevy_ecs::prelude::{Query, Res, ResMut};
use rand::Rng;
use tracing::{debug, info};

use crate::actions;
use crate::ai::heuristic::{pick_greedy_job, pick_random_job};
use crate::ai::lookahead::{axis_step, best_lookahead_step, greedy_step, random_step};
use crate::ai::{AiController, SkillTier, TargetKind};
use crate::city::{chebyshev, CityMap};
use crate::clock::{CurrentEvent, EventKind, EventSubject, SimulationClock};
use crate::context::{SessionOutcome, SimContext};
use crate::ecs::{Courier, Motion, Position, Wallet};
use crate::jobs::JobBoard;
use crate::orders::OrderState;
use crate::reputation::{Reputation, ScoringConfig};
use crate::stamina::Vitals;
use crate::weather::WeatherModel;

/// Refresh the controller's target from the active order's state.
fn update_target(controller: &mut AiController, board: &JobBoard) {
    controller.target = board.active_order().and_then(|order| match order.state {
        OrderState::Accepted => Some((order.pickup, TargetKind::Pickup)),
        OrderState::Carrying => Some((order.dropoff, TargetKind::Dropoff)),
        _ => None,
    });
}

/// Pickup/delivery when standing next to the active order's endpoint.
fn handle_arrivals(
    courier: &Courier,
    controller: &mut AiController,
    board: &mut JobBoard,
    reputation: &mut Reputation,
    wallet: &mut Wallet,
    position: &Position,
    now_s: f64,
    scoring: &ScoringConfig,
) {
    let Some((state, pickup, dropoff)) = board
        .active_order()
        .map(|o| (o.state, o.pickup, o.dropoff))
    else {
        return;
    };
    match state {
        OrderState::Accepted if chebyshev(position.tile(), pickup) <= 1 => {
            let outcome = actions::try_pickup(board, position, now_s);
            if outcome.performed() {
                info!(agent = %courier.name, "package picked up");
            }
        }
        OrderState::Carrying if chebyshev(position.tile(), dropoff) <= 1 => {
            match actions::try_deliver(board, reputation, wallet, position, now_s, scoring) {
                Ok(receipt) => {
                    info!(
                        agent = %courier.name,
                        order = %receipt.order_id,
                        payout = receipt.payout,
                        overtime = receipt.overtime_s,
                        reputation = reputation.value,
                        "delivered"
                    );
                }
                Err(rejection) => debug!(agent = %courier.name, ?rejection, "delivery refused"),
            }
        }
        _ => {}
    }
    update_target(controller, board);
}

/// Job selection at the controller's job-check cadence.
fn select_job(
    courier: &Courier,
    controller: &mut AiController,
    board: &mut JobBoard,
    position: &Position,
    weather: &WeatherModel,
    now_s: f64,
) {
    let due = controller.target.is_none()
        || now_s - controller.last_job_check_s >= controller.params.job_check_interval_s;
    if !due {
        return;
    }
    controller.last_job_check_s = now_s;

    if board.accepted_ids().len() >= controller.params.max_accepted {
        return;
    }

    let picked = match controller.tier {
        SkillTier::Random => pick_random_job(
            board,
            now_s,
            &controller.params,
            &mut controller.rng,
        ),
        SkillTier::Greedy => pick_greedy_job(
            board,
            position.tile(),
            now_s,
            weather.current_condition(),
            &controller.params,
        ),
    };
    if let Some(id) = picked {
        let outcome = actions::accept_order(board, &id, now_s);
        if outcome.performed() {
            info!(agent = %courier.name, order = %id, "job accepted");
        }
    }
    update_target(controller, board);
}

/// Pick the next destination tile, or `None` to stay put.
fn choose_step(
    controller: &mut AiController,
    city: &CityMap,
    position: (i32, i32),
) -> Option<(i32, i32)> {
    // Forced random moves take precedence until they are spent.
    if controller.forced_random_remaining > 0 {
        controller.forced_random_remaining -= 1;
        return random_step(city, position, &mut controller.rng);
    }

    let Some((target, _)) = controller.target else {
        // Nothing to do: wander.
        return random_step(city, position, &mut controller.rng);
    };

    if chebyshev(position, target) <= 1 {
        // Adjacent already; arrival handling owns the next step.
        return None;
    }

    controller.record_position(position);
    if controller.is_stuck() {
        debug!("loop detected, forcing random moves");
        controller.trip_loop_breaker();
        controller.forced_random_remaining -= 1;
        return random_step(city, position, &mut controller.rng);
    }

    match controller.tier {
        SkillTier::Random => {
            let toward = controller
                .rng
                .gen_bool(controller.params.toward_target_probability);
            if toward {
                axis_step(city, position, target, &mut controller.rng)
                    .or_else(|| random_step(city, position, &mut controller.rng))
            } else {
                random_step(city, position, &mut controller.rng)
            }
        }
        SkillTier::Greedy => {
            let lookahead = controller
                .rng
                .gen_bool(controller.params.lookahead_probability);
            if lookahead {
                best_lookahead_step(city, position, target, controller.params.lookahead_depth)
                    .or_else(|| greedy_step(city, position, target))
                    .or_else(|| random_step(city, position, &mut controller.rng))
            } else {
                random_step(city, position, &mut controller.rng)
            }
        }
    }
}

#[allow(clippy::type_complexity)]
pub fn agent_decision_system(
    mut clock: ResMut<SimulationClock>,
    event: Res<CurrentEvent>,
    context: Res<SimContext>,
    outcome: Res<SessionOutcome>,
    scoring: Res<ScoringConfig>,
    city: Res<CityMap>,
    weather: Res<WeatherModel>,
    mut agents: Query<(
        &Courier,
        &mut AiController,
        &Position,
        &mut Motion,
        &mut Vitals,
        &mut Reputation,
        &mut JobBoard,
        &mut Wallet,
    )>,
) {
    if event.0.kind != EventKind::AgentDecision {
        return;
    }
    let Some(EventSubject::Agent(agent)) = event.0.subject else {
        return;
    };
    if outcome.is_over() {
        // Session done: let the decision chain drain.
        return;
    }

    let Ok((
        courier,
        mut controller,
        position,
        mut motion,
        mut vitals,
        mut reputation,
        mut board,
        mut wallet,
    )) = agents.get_mut(agent)
    else {
        return;
    };

    let interval_ms = (controller.params.decision_interval_s * 1000.0) as u64;
    clock.schedule_in(
        interval_ms,
        EventKind::AgentDecision,
        Some(EventSubject::Agent(agent)),
    );

    // Paused sessions freeze decisions without dropping the loop.
    if context.paused {
        return;
    }

    let now_s = clock.elapsed_s();

    handle_arrivals(
        courier,
        &mut controller,
        &mut board,
        &mut reputation,
        &mut wallet,
        position,
        now_s,
        &scoring,
    );

    select_job(courier, &mut controller, &mut board, position, &weather, now_s);

    if !motion.moving {
        if let Some(dest) = choose_step(&mut controller, &city, position.tile()) {
            let action = actions::try_move(
                &city,
                &weather,
                courier,
                &reputation,
                &board,
                &mut vitals,
                position,
                &mut motion,
                dest,
            );
            if let actions::MoveAction::Rejected { reason } = action {
                debug!(agent = %courier.name, reason, "move refused");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::city::TileSpec;
    use std::collections::HashMap;

    fn open_city() -> CityMap {
        let tiles = (0..8).map(|_| "CCCCCCCC".chars().collect()).collect();
        let mut legend = HashMap::new();
        legend.insert(
            'C',
            TileSpec {
                name: "street".into(),
                blocked: false,
                surface_weight: 1.0,
            },
        );
        CityMap::new("open".into(), tiles, legend, 0.0)
    }

    #[test]
    fn stuck_controller_is_forced_into_five_random_moves() {
        let city = open_city();
        let mut controller = AiController::new(SkillTier::Greedy, 9);
        controller.target = Some(((7, 7), TargetKind::Pickup));
        // Six of the last eight positions span only two tiles.
        for i in 0..8 {
            controller.record_position(if i % 2 == 0 { (3, 3) } else { (3, 4) });
        }

        let step = choose_step(&mut controller, &city, (3, 3));
        assert!(step.is_some());
        assert_eq!(controller.forced_random_remaining, 4);
        assert!(controller.history.is_empty());

        // Four more forced moves, then the flag is spent.
        for expected_left in [3, 2, 1, 0] {
            choose_step(&mut controller, &city, (3, 3));
            assert_eq!(controller.forced_random_remaining, expected_left);
        }
        choose_step(&mut controller, &city, (3, 3));
        assert_eq!(controller.forced_random_remaining, 0);
    }

    #[test]
    fn greedy_controller_advances_toward_its_target() {
        let city = open_city();
        let mut controller = AiController::new(SkillTier::Greedy, 3);
        controller.target = Some(((7, 0), TargetKind::Pickup));

        // Walk along the row as the simulation would; every produced step
        // must be a valid neighbor, and lookahead (p = 0.9) makes most of
        // them head right.
        let mut toward = 0;
        for x in 0..6 {
            let step = choose_step(&mut controller, &city, (x, 0)).expect("step");
            assert_eq!(crate::city::manhattan((x, 0), step), 1);
            if step == (x + 1, 0) {
                toward += 1;
            }
        }
        assert!(toward >= 4, "lookahead should dominate: {toward}/6");
    }

    #[test]
    fn adjacent_target_means_no_step() {
        let city = open_city();
        let mut controller = AiController::new(SkillTier::Random, 3);
        controller.target = Some(((2, 1), TargetKind::Dropoff));
        assert_eq!(choose_step(&mut controller, &city, (2, 0)), None);
    }
}
