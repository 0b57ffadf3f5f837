//! Agent actions: movement, order acceptance, pickup, delivery, cancel.
//!
//! The same entry points serve the human input layer and the autonomous
//! decision systems, so the adjacency, capacity, and vitals rules cannot
//! drift between the two. Precondition violations are values, not errors:
//! every rejected action carries a user-facing reason string.

use bevy_ecs::prelude::{Entity, World};
use tracing::debug;

use crate::city::{chebyshev, CityMap};
use crate::clock::SimulationClock;
use crate::context::{EndCondition, SessionOutcome, SimContext};
use crate::ecs::{Courier, Facing, Motion, Position, Wallet};
use crate::jobs::JobBoard;
use crate::orders::OrderState;
use crate::reputation::{DeliveryOutcome, Reputation, ReputationChange, ScoringConfig};
use crate::speed::{movement_distance, progress_rate, SpeedFactors};
use crate::stamina::Vitals;
use crate::telemetry::StatusFeed;
use crate::weather::WeatherModel;

/// Outcome of a movement request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MoveAction {
    Started { distance: u32, speed: f64 },
    Rejected { reason: &'static str },
}

impl MoveAction {
    pub fn started(&self) -> bool {
        matches!(self, MoveAction::Started { .. })
    }
}

/// Outcome of a non-movement action.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionOutcome {
    Performed { message: String },
    Rejected { reason: String },
}

impl ActionOutcome {
    pub fn performed(&self) -> bool {
        matches!(self, ActionOutcome::Performed { .. })
    }

    fn rejected(reason: impl Into<String>) -> Self {
        ActionOutcome::Rejected {
            reason: reason.into(),
        }
    }
}

/// Record of one completed delivery.
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryReceipt {
    pub order_id: String,
    pub priority: u8,
    pub payout: f64,
    pub overtime_s: f64,
    pub change: ReputationChange,
    pub message: String,
}

/// Walk step-by-step toward `dir` up to `max_distance` tiles, stopping at
/// the last in-bounds, unblocked tile. Diagonal requests step both axes at
/// once, mirroring how destinations are requested tile-for-tile.
fn walk(city: &CityMap, start: (i32, i32), dir: (i32, i32), max_distance: u32) -> (i32, i32) {
    let mut current = start;
    for step in 1..=max_distance as i32 {
        let next = (start.0 + dir.0 * step, start.1 + dir.1 * step);
        if city.in_bounds(next.0, next.1) && !city.is_blocked(next.0, next.1) {
            current = next;
        } else {
            break;
        }
    }
    current
}

/// Request a move toward `dest`. On success the motion component is armed
/// and the stamina cost of the whole step is applied up front.
#[allow(clippy::too_many_arguments)]
pub fn try_move(
    city: &CityMap,
    weather: &WeatherModel,
    courier: &Courier,
    reputation: &Reputation,
    board: &JobBoard,
    vitals: &mut Vitals,
    position: &Position,
    motion: &mut Motion,
    dest: (i32, i32),
) -> MoveAction {
    if motion.moving {
        return MoveAction::Rejected {
            reason: "already moving",
        };
    }
    if !vitals.try_clear_recovery() {
        return MoveAction::Rejected {
            reason: "recovering: stamina below the recovery threshold",
        };
    }

    let weight = board.carried_weight();
    let speed = SpeedFactors {
        base_speed: courier.base_speed,
        weather_multiplier: weather.speed_multiplier(),
        weight,
        reputation: reputation.value,
        resistance: vitals.resistance,
        surface_weight: city.surface_weight(position.x, position.y),
    }
    .compute();

    let max_distance = movement_distance(speed);
    if max_distance == 0 {
        return MoveAction::Rejected {
            reason: "too exhausted to move",
        };
    }

    let dir = (
        (dest.0 - position.x).signum(),
        (dest.1 - position.y).signum(),
    );
    if dir == (0, 0) {
        return MoveAction::Rejected {
            reason: "already there",
        };
    }

    let target = walk(city, position.tile(), dir, max_distance);
    if target == position.tile() {
        return MoveAction::Rejected {
            reason: "path blocked",
        };
    }

    let distance = chebyshev(position.tile(), target) as u32;
    motion.target = target;
    motion.moving = true;
    motion.progress = 0.0;
    motion.rate = progress_rate(distance, speed);
    motion.facing = Facing::toward(position.tile(), target);
    vitals.reset_idle();
    vitals.apply_move_loss(distance, weight, weather.current_condition());

    MoveAction::Started { distance, speed }
}

/// Accept an order from the agent's own board. Capacity is checked at
/// acceptance as well as pickup, so an agent can never commit to more than
/// it can carry.
pub fn accept_order(board: &mut JobBoard, id: &str, now_s: f64) -> ActionOutcome {
    let Some(order) = board.order(id) else {
        debug!(order = id, "accept ignored: unknown order");
        return ActionOutcome::rejected(format!("No such order: {id}"));
    };
    if !order.is_selectable() {
        debug!(order = id, state = ?order.state, "accept ignored: not selectable");
        return ActionOutcome::rejected(format!("Order {id} is not available"));
    }
    if board.carried_weight() + order.weight > board.capacity {
        return ActionOutcome::rejected("Overweight! You can't accept this order.");
    }
    let priority = order.priority;
    board.accept(id, now_s);
    ActionOutcome::Performed {
        message: format!("Accepted {id} (priority {priority})"),
    }
}

/// Accept whatever the selection cursor points at.
pub fn accept_selected(board: &mut JobBoard, now_s: f64) -> ActionOutcome {
    match board.selected_order().map(|o| o.id.clone()) {
        Some(id) => accept_order(board, &id, now_s),
        None => ActionOutcome::rejected("No selectable orders"),
    }
}

/// Pick up the active order. Requires Chebyshev adjacency to the pickup
/// tile and spare capacity for the package.
pub fn try_pickup(board: &mut JobBoard, position: &Position, now_s: f64) -> ActionOutcome {
    let Some(order) = board.active_order() else {
        return ActionOutcome::rejected("No active order");
    };
    if order.state != OrderState::Accepted {
        debug!(order = %order.id, state = ?order.state, "pickup ignored: wrong state");
        return ActionOutcome::rejected(format!("Order {} is not awaiting pickup", order.id));
    }
    if chebyshev(position.tile(), order.pickup) > 1 {
        return ActionOutcome::rejected("Not at the pickup point");
    }
    if board.carried_weight() + order.weight > board.capacity {
        return ActionOutcome::rejected("Overweight! You can't pick up yet.");
    }

    let id = order.id.clone();
    let priority = order.priority;
    let overtime = order.overtime_s(now_s);
    if let Some(order) = board.order_mut(&id) {
        order.mark_carrying(now_s);
    }

    let message = if overtime > 0.0 {
        format!("Priority {priority} package picked up! ({overtime:.0}s overtime)")
    } else {
        format!("Priority {priority} package picked up!")
    };
    ActionOutcome::Performed { message }
}

/// Deliver the active order. Requires adjacency to the dropoff tile; the
/// reputation scorer runs first and its multiplier prices the payout.
pub fn try_deliver(
    board: &mut JobBoard,
    reputation: &mut Reputation,
    wallet: &mut Wallet,
    position: &Position,
    now_s: f64,
    config: &ScoringConfig,
) -> Result<DeliveryReceipt, ActionOutcome> {
    let Some(order) = board.active_order() else {
        return Err(ActionOutcome::rejected("No active order"));
    };
    if order.state != OrderState::Carrying {
        debug!(order = %order.id, state = ?order.state, "delivery ignored: wrong state");
        return Err(ActionOutcome::rejected(format!(
            "Order {} is not being carried",
            order.id
        )));
    }
    if chebyshev(position.tile(), order.dropoff) > 1 {
        return Err(ActionOutcome::rejected("Not at the dropoff point"));
    }

    let id = order.id.clone();
    let priority = order.priority;
    let base_payout = order.payout;
    let overtime_s = order.overtime_s(now_s);
    let remaining_s = order.deadline_s.map(|d| (d - now_s).max(0.0)).unwrap_or(0.0);
    let window_s = order.deadline_window_s();

    if let Some(order) = board.order_mut(&id) {
        order.mark_delivered(now_s);
    }
    board.retire(&id);

    let change = reputation.apply(
        DeliveryOutcome::Completed {
            overtime_s,
            remaining_s,
            window_s,
        },
        config,
    );
    let multiplier = reputation.payout_multiplier();
    let payout = base_payout * multiplier;
    wallet.earnings += payout;

    let mut message = format!("Priority {priority} job completed! +${payout:.0}");
    if multiplier > 1.0 {
        message.push_str(" (includes +5% excellence bonus)");
    }
    message.push_str(" | ");
    message.push_str(&change.message);

    Ok(DeliveryReceipt {
        order_id: id,
        priority,
        payout,
        overtime_s,
        change,
        message,
    })
}

/// Cancel the active order with its reputation penalty.
pub fn cancel_active(
    board: &mut JobBoard,
    reputation: &mut Reputation,
    config: &ScoringConfig,
) -> Result<ReputationChange, ActionOutcome> {
    let Some(order) = board.active_order() else {
        return Err(ActionOutcome::rejected("No order to cancel"));
    };
    if !matches!(order.state, OrderState::Accepted | OrderState::Carrying) {
        debug!(order = %order.id, state = ?order.state, "cancel ignored: wrong state");
        return Err(ActionOutcome::rejected(format!(
            "Cannot discard order in state {:?}",
            order.state
        )));
    }
    let id = order.id.clone();
    if let Some(order) = board.order_mut(&id) {
        order.state = OrderState::Cancelled;
    }
    board.retire(&id);
    Ok(reputation.apply(DeliveryOutcome::Cancelled, config))
}

// ---------------------------------------------------------------------------
// Host-facing wrappers: the presentation layer drives the human courier
// through these. Each checks the pause flag, pushes status toasts, and polls
// the terminal conditions the way every reputation caller must.
// ---------------------------------------------------------------------------

fn paused(world: &World) -> bool {
    world.resource::<SimContext>().paused
}

fn push_status(world: &mut World, text: String) {
    let now_s = world.resource::<SimulationClock>().elapsed_s();
    world.resource_mut::<StatusFeed>().push(now_s, text);
}

fn poll_game_over(world: &mut World, agent: Entity) {
    let mut query = world.query::<(&Courier, &Reputation, &Wallet)>();
    let Ok((courier, reputation, wallet)) = query.get(world, agent) else {
        return;
    };
    if courier.kind != crate::ecs::AgentKind::Human {
        return;
    }
    let collapsed = reputation.is_game_over();
    let goal = world.resource::<SimContext>().goal_income;
    let reached = goal > 0.0 && wallet.earnings >= goal;
    let mut outcome = world.resource_mut::<SessionOutcome>();
    if collapsed {
        outcome.finish(EndCondition::ReputationCollapse);
    } else if reached {
        outcome.finish(EndCondition::GoalReached);
    }
}

/// Move the agent toward a destination tile.
pub fn move_agent(world: &mut World, agent: Entity, dest: (i32, i32)) -> MoveAction {
    if paused(world) {
        return MoveAction::Rejected {
            reason: "simulation paused",
        };
    }
    world.resource_scope(|world, city: bevy_ecs::world::Mut<CityMap>| {
        world.resource_scope(|world, weather: bevy_ecs::world::Mut<WeatherModel>| {
            let mut query = world.query::<(
                &Courier,
                &Reputation,
                &JobBoard,
                &mut Vitals,
                &Position,
                &mut Motion,
            )>();
            let Ok((courier, reputation, board, mut vitals, position, mut motion)) =
                query.get_mut(world, agent)
            else {
                return MoveAction::Rejected {
                    reason: "no such agent",
                };
            };
            try_move(
                &city,
                &weather,
                courier,
                reputation,
                board,
                &mut vitals,
                position,
                &mut motion,
                dest,
            )
        })
    })
}

/// Accept the order under the selection cursor.
pub fn accept_selected_order(world: &mut World, agent: Entity) -> ActionOutcome {
    if paused(world) {
        return ActionOutcome::rejected("Simulation paused");
    }
    let now_s = world.resource::<SimulationClock>().elapsed_s();
    let outcome = {
        let mut query = world.query::<&mut JobBoard>();
        match query.get_mut(world, agent) {
            Ok(mut board) => accept_selected(&mut board, now_s),
            Err(_) => ActionOutcome::rejected("No such agent"),
        }
    };
    if let ActionOutcome::Performed { message } = &outcome {
        push_status(world, message.clone());
    }
    outcome
}

/// Attempt pickup of the active order at the agent's position.
pub fn pickup_active(world: &mut World, agent: Entity) -> ActionOutcome {
    if paused(world) {
        return ActionOutcome::rejected("Simulation paused");
    }
    let now_s = world.resource::<SimulationClock>().elapsed_s();
    let outcome = {
        let mut query = world.query::<(&mut JobBoard, &Position)>();
        match query.get_mut(world, agent) {
            Ok((mut board, position)) => try_pickup(&mut board, position, now_s),
            Err(_) => ActionOutcome::rejected("No such agent"),
        }
    };
    match &outcome {
        ActionOutcome::Performed { message } | ActionOutcome::Rejected { reason: message } => {
            push_status(world, message.clone());
        }
    }
    outcome
}

/// Attempt delivery of the active order at the agent's position.
pub fn deliver_active(world: &mut World, agent: Entity) -> ActionOutcome {
    if paused(world) {
        return ActionOutcome::rejected("Simulation paused");
    }
    let now_s = world.resource::<SimulationClock>().elapsed_s();
    let config = *world.resource::<ScoringConfig>();
    let result = {
        let mut query = world.query::<(&mut JobBoard, &mut Reputation, &mut Wallet, &Position)>();
        match query.get_mut(world, agent) {
            Ok((mut board, mut reputation, mut wallet, position)) => try_deliver(
                &mut board,
                &mut reputation,
                &mut wallet,
                position,
                now_s,
                &config,
            ),
            Err(_) => Err(ActionOutcome::rejected("No such agent")),
        }
    };
    let outcome = match result {
        Ok(receipt) => ActionOutcome::Performed {
            message: receipt.message,
        },
        Err(rejection) => rejection,
    };
    match &outcome {
        ActionOutcome::Performed { message } | ActionOutcome::Rejected { reason: message } => {
            push_status(world, message.clone());
        }
    }
    poll_game_over(world, agent);
    outcome
}

/// Cancel the active order.
pub fn cancel_active_order(world: &mut World, agent: Entity) -> ActionOutcome {
    if paused(world) {
        return ActionOutcome::rejected("Simulation paused");
    }
    let config = *world.resource::<ScoringConfig>();
    let result = {
        let mut query = world.query::<(&mut JobBoard, &mut Reputation)>();
        match query.get_mut(world, agent) {
            Ok((mut board, mut reputation)) => {
                cancel_active(&mut board, &mut reputation, &config)
            }
            Err(_) => Err(ActionOutcome::rejected("No such agent")),
        }
    };
    let outcome = match result {
        Ok(change) => ActionOutcome::Performed {
            message: format!("Order discarded! {}", change.message),
        },
        Err(rejection) => rejection,
    };
    if let ActionOutcome::Performed { message } = &outcome {
        push_status(world, message.clone());
    }
    poll_game_over(world, agent);
    outcome
}

/// Advance the job list cursor.
pub fn cycle_board_selection(world: &mut World, agent: Entity, forward: bool) -> Option<String> {
    let mut query = world.query::<&mut JobBoard>();
    let mut board = query.get_mut(world, agent).ok()?;
    if forward {
        board.cycle_selection()
    } else {
        board.cycle_selection_prev()
    }
}

/// Cycle which accepted order is active.
pub fn cycle_active_order(world: &mut World, agent: Entity, forward: bool) -> Option<String> {
    let mut query = world.query::<&mut JobBoard>();
    let mut board = query.get_mut(world, agent).ok()?;
    let order = if forward {
        board.next_active()
    } else {
        board.prev_active()
    };
    order.map(|o| o.id.clone())
}

pub fn set_paused(world: &mut World, paused: bool) {
    world.resource_mut::<SimContext>().paused = paused;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orders::Order;
    use crate::stamina::Resistance;
    use std::collections::HashMap;

    fn open_city() -> CityMap {
        let tiles: Vec<Vec<char>> = (0..8).map(|_| "CCCCCCCC".chars().collect()).collect();
        let mut legend = HashMap::new();
        legend.insert(
            'C',
            crate::city::TileSpec {
                name: "street".into(),
                blocked: false,
                surface_weight: 1.0,
            },
        );
        CityMap::new("open".into(), tiles, legend, 0.0)
    }

    fn walled_city() -> CityMap {
        // Wall of buildings down column 2.
        let tiles: Vec<Vec<char>> = (0..8).map(|_| "CCBCCCCC".chars().collect()).collect();
        let mut legend = HashMap::new();
        legend.insert(
            'C',
            crate::city::TileSpec {
                name: "street".into(),
                blocked: false,
                surface_weight: 1.0,
            },
        );
        legend.insert(
            'B',
            crate::city::TileSpec {
                name: "building".into(),
                blocked: true,
                surface_weight: 0.0,
            },
        );
        CityMap::new("walled".into(), tiles, legend, 0.0)
    }

    fn clear_weather() -> WeatherModel {
        WeatherModel::new(
            crate::weather::WeatherCondition::Clear,
            0.0,
            HashMap::new(),
            vec![],
            Some(1),
        )
    }

    fn empty_board() -> JobBoard {
        JobBoard::from_orders(vec![], crate::jobs::DEFAULT_CAPACITY)
    }

    fn board_with(order: Order) -> JobBoard {
        let mut board = JobBoard::from_orders(vec![order], crate::jobs::DEFAULT_CAPACITY);
        board.mark_released(0.0);
        board
    }

    #[test]
    fn move_covers_two_tiles_at_base_speed() {
        let city = open_city();
        let weather = clear_weather();
        let courier = Courier::human("rider");
        let reputation = Reputation::default();
        let board = empty_board();
        let mut vitals = Vitals::default();
        let position = Position { x: 0, y: 0 };
        let mut motion = Motion::default();

        let action = try_move(
            &city, &weather, &courier, &reputation, &board, &mut vitals, &position, &mut motion,
            (7, 0),
        );
        match action {
            MoveAction::Started { distance, speed } => {
                assert_eq!(distance, 2);
                assert!((speed - 3.0).abs() < 1e-9);
            }
            other => panic!("expected move, got {other:?}"),
        }
        assert_eq!(motion.target, (2, 0));
        assert!(motion.moving);
        assert_eq!(motion.facing, Facing::Right);
        assert!((vitals.stamina - 99.0).abs() < 1e-9);
    }

    #[test]
    fn move_stops_before_the_wall() {
        let city = walled_city();
        let weather = clear_weather();
        let courier = Courier::human("rider");
        let reputation = Reputation::default();
        let board = empty_board();
        let mut vitals = Vitals::default();
        let position = Position { x: 0, y: 0 };
        let mut motion = Motion::default();

        let action = try_move(
            &city, &weather, &courier, &reputation, &board, &mut vitals, &position, &mut motion,
            (7, 0),
        );
        assert!(action.started());
        assert_eq!(motion.target, (1, 0));
    }

    #[test]
    fn move_rejected_when_boxed_in() {
        let city = walled_city();
        let weather = clear_weather();
        let courier = Courier::human("rider");
        let reputation = Reputation::default();
        let board = empty_board();
        let mut vitals = Vitals::default();
        let position = Position { x: 1, y: 0 };
        let mut motion = Motion::default();

        // Requesting a move straight into the wall.
        let action = try_move(
            &city, &weather, &courier, &reputation, &board, &mut vitals, &position, &mut motion,
            (2, 0),
        );
        assert_eq!(
            action,
            MoveAction::Rejected {
                reason: "path blocked"
            }
        );
        assert!(!motion.moving);
    }

    #[test]
    fn recovery_mode_refuses_moves_until_threshold() {
        let city = open_city();
        let weather = clear_weather();
        let courier = Courier::human("rider");
        let reputation = Reputation::default();
        let board = empty_board();
        let mut vitals = Vitals {
            stamina: 10.0,
            resistance: Resistance::Tired,
            recovery_mode: true,
            idle_s: 0.0,
        };
        let position = Position { x: 0, y: 0 };
        let mut motion = Motion::default();

        let action = try_move(
            &city, &weather, &courier, &reputation, &board, &mut vitals, &position, &mut motion,
            (5, 0),
        );
        assert!(!action.started());

        // The instant stamina reaches the threshold the same attempt works.
        vitals.recover(20.0);
        let action = try_move(
            &city, &weather, &courier, &reputation, &board, &mut vitals, &position, &mut motion,
            (5, 0),
        );
        assert!(action.started());
        assert!(!vitals.recovery_mode);
    }

    #[test]
    fn pickup_requires_adjacency_and_capacity() {
        let mut board = board_with(Order::new(
            "p1".into(),
            (4, 4),
            (7, 7),
            100.0,
            3.0,
            1,
            0.0,
        ));
        board.accept("p1", 0.0);

        let far = Position { x: 0, y: 0 };
        assert!(!try_pickup(&mut board, &far, 1.0).performed());

        let near = Position { x: 3, y: 4 };
        assert!(try_pickup(&mut board, &near, 1.0).performed());
        assert_eq!(board.carried_weight(), 3.0);
    }

    #[test]
    fn overweight_pickup_is_refused() {
        let mut board = JobBoard::from_orders(
            vec![
                Order::new("heavy".into(), (0, 0), (5, 5), 100.0, 6.0, 0, 0.0),
                Order::new("heavier".into(), (0, 0), (6, 6), 100.0, 3.0, 0, 0.0),
            ],
            crate::jobs::DEFAULT_CAPACITY,
        );
        board.mark_released(0.0);
        board.accept("heavy", 0.0);
        let here = Position { x: 0, y: 0 };
        assert!(try_pickup(&mut board, &here, 1.0).performed());

        board.accept("heavier", 2.0);
        board.set_active(Some("heavier".into()));
        // 6.0 carried + 3.0 > 8.0 capacity.
        let outcome = try_pickup(&mut board, &here, 3.0);
        assert!(!outcome.performed());
        assert_eq!(board.carried_weight(), 6.0);
    }

    #[test]
    fn delivery_pays_and_scores() {
        let mut board = board_with(Order::new(
            "d1".into(),
            (0, 0),
            (1, 1),
            200.0,
            1.0,
            1,
            0.0,
        ));
        board.accept("d1", 0.0);
        let here = Position { x: 0, y: 0 };
        assert!(try_pickup(&mut board, &here, 1.0).performed());

        let mut reputation = Reputation::default();
        let mut wallet = Wallet::default();
        let receipt = try_deliver(
            &mut board,
            &mut reputation,
            &mut wallet,
            &Position { x: 1, y: 2 },
            10.0,
            &ScoringConfig::default(),
        )
        .expect("delivery succeeds");
        // Delivered 80 s early inside a 90 s window: early bonus.
        assert_eq!(receipt.change.applied, 5.0);
        assert_eq!(wallet.earnings, 200.0);
        assert!(board.active_id().is_none());

        // Delivering again is a state inconsistency, reported not thrown.
        let err = try_deliver(
            &mut board,
            &mut reputation,
            &mut wallet,
            &Position { x: 1, y: 2 },
            11.0,
            &ScoringConfig::default(),
        );
        assert!(err.is_err());
    }

    #[test]
    fn excellence_bonus_prices_the_payout() {
        let mut board = board_with(Order::new(
            "d2".into(),
            (0, 0),
            (0, 1),
            100.0,
            1.0,
            0,
            0.0,
        ));
        board.accept("d2", 0.0);
        let here = Position { x: 0, y: 0 };
        assert!(try_pickup(&mut board, &here, 1.0).performed());

        let mut reputation = Reputation {
            value: 95.0,
            ..Reputation::default()
        };
        let mut wallet = Wallet::default();
        let receipt = try_deliver(
            &mut board,
            &mut reputation,
            &mut wallet,
            &here,
            5.0,
            &ScoringConfig::default(),
        )
        .expect("delivery succeeds");
        assert!((receipt.payout - 105.0).abs() < 1e-9);
        assert!(receipt.message.contains("excellence"));
    }

    #[test]
    fn cancel_penalizes_and_retires() {
        let mut board = board_with(Order::new(
            "c1".into(),
            (0, 0),
            (5, 5),
            100.0,
            1.0,
            0,
            0.0,
        ));
        board.accept("c1", 0.0);
        let mut reputation = Reputation::default();
        let change = cancel_active(&mut board, &mut reputation, &ScoringConfig::default())
            .expect("cancel succeeds");
        assert_eq!(change.applied, -4.0);
        assert_eq!(
            board.order("c1").unwrap().state,
            OrderState::Cancelled
        );
        assert!(board.active_id().is_none());

        // A second cancel has nothing to act on.
        assert!(cancel_active(&mut board, &mut reputation, &ScoringConfig::default()).is_err());
    }
}
