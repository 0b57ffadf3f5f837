//! Job-selection heuristics for the autonomous tiers.

use rand::rngs::StdRng;
use rand::Rng;

use crate::city::manhattan;
use crate::jobs::JobBoard;
use crate::orders::{Order, OrderId};
use crate::weather::WeatherCondition;

use super::TierParams;

/// Fixed step penalty for accepting work in bad weather: storm worst, then
/// rain, then overcast, nothing for clear skies.
pub fn weather_penalty(condition: WeatherCondition) -> f64 {
    match condition {
        WeatherCondition::Storm => 3.0,
        WeatherCondition::Rain => 2.0,
        WeatherCondition::RainLight | WeatherCondition::Clouds | WeatherCondition::Fog => 1.0,
        WeatherCondition::Wind | WeatherCondition::Heat | WeatherCondition::Cold => 1.0,
        WeatherCondition::Clear => 0.0,
    }
}

/// Score one order for the greedy tier. Invalid or overweight orders score
/// negative infinity so they can never win.
pub fn score_order(
    order: &Order,
    position: (i32, i32),
    carried_weight: f64,
    capacity: f64,
    condition: WeatherCondition,
    params: &TierParams,
) -> f64 {
    if !order.is_selectable() || carried_weight + order.weight > capacity {
        return f64::NEG_INFINITY;
    }
    let pickup_distance = manhattan(position, order.pickup) as f64;
    let delivery_distance = manhattan(order.pickup, order.dropoff) as f64;
    params.payout_weight * order.payout
        - params.distance_weight * (pickup_distance + delivery_distance)
        - params.weather_weight * weather_penalty(condition)
        + params.priority_bonus * order.priority as f64
}

/// Random tier: uniform choice among eligible orders.
pub fn pick_random_job(
    board: &JobBoard,
    now_s: f64,
    params: &TierParams,
    rng: &mut StdRng,
) -> Option<OrderId> {
    let eligible = board.eligible(now_s, params.eligibility_delay_s);
    if eligible.is_empty() {
        return None;
    }
    let idx = rng.gen_range(0..eligible.len());
    Some(eligible[idx].id.clone())
}

/// Greedy tier: highest score wins; ties fall to the earlier board entry,
/// which is already the selection ordering (priority desc, payout desc).
pub fn pick_greedy_job(
    board: &JobBoard,
    position: (i32, i32),
    now_s: f64,
    condition: WeatherCondition,
    params: &TierParams,
) -> Option<OrderId> {
    let mut best: Option<(f64, &Order)> = None;
    for order in board.eligible(now_s, params.eligibility_delay_s) {
        let score = score_order(
            order,
            position,
            board.carried_weight(),
            board.capacity,
            condition,
            params,
        );
        if score == f64::NEG_INFINITY {
            continue;
        }
        match best {
            Some((best_score, _)) if score <= best_score => {}
            _ => best = Some((score, order)),
        }
    }
    best.map(|(_, order)| order.id.clone())
}
