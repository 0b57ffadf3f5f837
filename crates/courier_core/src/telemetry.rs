//! Presentation-facing read models: HUD snapshots, one-shot status toasts,
//! and the end-of-shift score.
//!
//! Nothing here mutates simulation state; the host drains the status feed
//! and rebuilds HUD snapshots at its own cadence.

use std::collections::VecDeque;

use bevy_ecs::prelude::{Entity, Resource, World};

use crate::clock::SimulationClock;
use crate::context::{SessionOutcome, SimContext};
use crate::ecs::{AgentKind, Courier, Facing, Motion, Position, Wallet};
use crate::jobs::JobBoard;
use crate::orders::OrderState;
use crate::reputation::{DailyStats, Reputation};
use crate::stamina::{Resistance, Vitals};
use crate::weather::{WeatherCondition, WeatherModel};

/// One-shot status line for the toast area: pickup/delivery/error feedback.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusEvent {
    pub at_s: f64,
    pub text: String,
}

/// FIFO of pending status toasts. Systems push; the host drains.
#[derive(Debug, Default, Resource)]
pub struct StatusFeed {
    events: VecDeque<StatusEvent>,
}

impl StatusFeed {
    pub fn push(&mut self, at_s: f64, text: impl Into<String>) {
        self.events.push_back(StatusEvent {
            at_s,
            text: text.into(),
        });
    }

    pub fn drain(&mut self) -> Vec<StatusEvent> {
        self.events.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Render state for one agent.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentSnapshot {
    pub entity: Entity,
    pub name: String,
    pub kind: AgentKind,
    pub tile: (i32, i32),
    pub target: (i32, i32),
    pub moving: bool,
    pub progress: f64,
    pub facing: Facing,
    pub stamina: f64,
    pub resistance: Resistance,
    pub recovery_mode: bool,
    pub reputation: f64,
    pub streak: u32,
    pub daily: DailyStats,
    pub earnings: f64,
    pub payout_multiplier: f64,
    pub carried_weight: f64,
}

/// Weather HUD line.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherSnapshot {
    pub condition: WeatherCondition,
    pub intensity: f64,
    pub seconds_to_change: f64,
    pub speed_multiplier: f64,
    /// Interpolated across the transition window, for visual effects.
    pub display_multiplier: f64,
}

/// One selectable order as shown in the job list.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderView {
    pub id: String,
    pub pickup: (i32, i32),
    pub dropoff: (i32, i32),
    pub payout: f64,
    pub weight: f64,
    pub priority: u8,
    pub state: OrderState,
    pub deadline_s: Option<f64>,
}

/// Job list with the UI cursor for one agent's board.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BoardSnapshot {
    pub selectable: Vec<OrderView>,
    pub selected_index: usize,
    pub active: Option<OrderView>,
    pub accepted: Vec<OrderView>,
    pub carried_weight: f64,
    pub capacity: f64,
}

fn order_view(order: &crate::orders::Order) -> OrderView {
    OrderView {
        id: order.id.clone(),
        pickup: order.pickup,
        dropoff: order.dropoff,
        payout: order.payout,
        weight: order.weight,
        priority: order.priority,
        state: order.state,
        deadline_s: order.deadline_s,
    }
}

pub fn agent_snapshots(world: &mut World) -> Vec<AgentSnapshot> {
    let mut out = Vec::new();
    let mut query = world.query::<(
        Entity,
        &Courier,
        &Position,
        &Motion,
        &Vitals,
        &Reputation,
        &Wallet,
        &JobBoard,
    )>();
    for (entity, courier, position, motion, vitals, reputation, wallet, board) in
        query.iter(world)
    {
        out.push(AgentSnapshot {
            entity,
            name: courier.name.clone(),
            kind: courier.kind,
            tile: position.tile(),
            target: motion.target,
            moving: motion.moving,
            progress: motion.progress,
            facing: motion.facing,
            stamina: vitals.stamina,
            resistance: vitals.resistance,
            recovery_mode: vitals.recovery_mode,
            reputation: reputation.value,
            streak: reputation.streak,
            daily: reputation.daily,
            earnings: wallet.earnings,
            payout_multiplier: reputation.payout_multiplier(),
            carried_weight: board.carried_weight(),
        });
    }
    out
}

pub fn weather_snapshot(world: &World) -> WeatherSnapshot {
    let weather = world.resource::<WeatherModel>();
    let now_s = world.resource::<SimulationClock>().elapsed_s();
    WeatherSnapshot {
        condition: weather.current_condition(),
        intensity: weather.current_intensity(),
        seconds_to_change: weather.seconds_to_change(now_s),
        speed_multiplier: weather.speed_multiplier(),
        display_multiplier: weather.speed_multiplier_interpolated(now_s),
    }
}

pub fn board_snapshot(world: &mut World, agent: Entity) -> BoardSnapshot {
    let mut query = world.query::<&JobBoard>();
    let Ok(board) = query.get(world, agent) else {
        return BoardSnapshot::default();
    };
    BoardSnapshot {
        selectable: board.selectable().into_iter().map(order_view).collect(),
        selected_index: board.selected_index(),
        active: board.active_order().map(order_view),
        accepted: board
            .accepted_ids()
            .iter()
            .filter_map(|id| board.order(id))
            .map(order_view)
            .collect(),
        carried_weight: board.carried_weight(),
        capacity: board.capacity,
    }
}

/// Remaining shift time for the HUD clock.
pub fn time_remaining_s(world: &World) -> f64 {
    let elapsed = world.resource::<SimulationClock>().elapsed_s();
    world.resource::<SimContext>().time_remaining_s(elapsed)
}

pub fn session_outcome(world: &World) -> SessionOutcome {
    *world.resource::<SessionOutcome>()
}

/// Final score: earnings plus weighted reputation, delivery bonuses, and
/// late/lost penalties. Never negative.
pub fn final_score(earnings: f64, reputation: f64, daily: &DailyStats) -> f64 {
    let successful = (daily.on_time + daily.early) as f64;
    let score = earnings + reputation * 10.0 + successful * 50.0
        - daily.late as f64 * 25.0
        - daily.lost as f64 * 50.0;
    score.max(0.0)
}

pub fn performance_rank(score: f64) -> char {
    if score >= 2000.0 {
        'S'
    } else if score >= 1500.0 {
        'A'
    } else if score >= 1000.0 {
        'B'
    } else if score >= 500.0 {
        'C'
    } else {
        'D'
    }
}
