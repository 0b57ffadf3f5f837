//! Per-agent job board: the full order list, the UI selection cursor, and
//! the agent's accepted/active set.
//!
//! Every agent that makes independent accept decisions owns a private board,
//! so two agents never contend for the same order record.

use bevy_ecs::prelude::{Component, Resource};
use serde::{Deserialize, Serialize};

use crate::orders::{board_order, Order, OrderId, OrderState};

/// Maximum carried weight, checked at the moment of pickup.
pub const DEFAULT_CAPACITY: f64 = 8.0;

/// Orders still `available` this long after release are dropped from the
/// board with no penalty; nobody wanted them.
pub const UNACCEPTED_TIMEOUT_S: f64 = 600.0;

/// An accepted or carried order this far past its deadline counts as lost:
/// the courier plainly is not going to deliver it.
pub const LOST_AFTER_OVERTIME_S: f64 = 180.0;

/// Expiry sweep configuration; one shared instance lives as a resource.
#[derive(Debug, Clone, Copy, Resource, Serialize, Deserialize)]
pub struct ExpiryConfig {
    pub unaccepted_timeout_s: f64,
    pub lost_after_overtime_s: f64,
}

impl Default for ExpiryConfig {
    fn default() -> Self {
        Self {
            unaccepted_timeout_s: UNACCEPTED_TIMEOUT_S,
            lost_after_overtime_s: LOST_AFTER_OVERTIME_S,
        }
    }
}

/// Order lost by the sweep; the caller applies the reputation outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct LostOrder {
    pub id: OrderId,
    pub priority: u8,
    pub overtime_s: f64,
    pub was_carrying: bool,
}

#[derive(Debug, Clone, Component, Serialize, Deserialize)]
pub struct JobBoard {
    orders: Vec<Order>,
    selected: usize,
    accepted: Vec<OrderId>,
    active: Option<OrderId>,
    pub capacity: f64,
}

impl JobBoard {
    pub fn from_orders(mut orders: Vec<Order>, capacity: f64) -> Self {
        orders.sort_by(board_order);
        Self {
            orders,
            selected: 0,
            accepted: Vec::new(),
            active: None,
            capacity,
        }
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn order(&self, id: &str) -> Option<&Order> {
        self.orders.iter().find(|o| o.id == id)
    }

    pub fn order_mut(&mut self, id: &str) -> Option<&mut Order> {
        self.orders.iter_mut().find(|o| o.id == id)
    }

    /// Flip `released` on every order whose release time has elapsed. Set
    /// once at the lifecycle transition, never recomputed lazily.
    pub fn mark_released(&mut self, now_s: f64) {
        for order in &mut self.orders {
            if !order.released && now_s >= order.release_time_s {
                order.released = true;
            }
        }
    }

    /// Currently selectable orders, in board order (priority desc, payout
    /// desc — the list is stored sorted).
    pub fn selectable(&self) -> Vec<&Order> {
        self.orders.iter().filter(|o| o.is_selectable()).collect()
    }

    /// Selectable orders released at least `delay_s` ago. The autonomous
    /// tiers use this to leave a priority window for the human player.
    pub fn eligible(&self, now_s: f64, delay_s: f64) -> Vec<&Order> {
        self.orders
            .iter()
            .filter(|o| o.is_selectable() && now_s - o.release_time_s >= delay_s)
            .collect()
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected_order(&self) -> Option<&Order> {
        let opts = self.selectable();
        if opts.is_empty() {
            return None;
        }
        Some(opts[self.selected % opts.len()])
    }

    pub fn cycle_selection(&mut self) -> Option<OrderId> {
        let count = self.selectable().len();
        if count == 0 {
            return None;
        }
        self.selected = (self.selected + 1) % count;
        self.selected_order().map(|o| o.id.clone())
    }

    pub fn cycle_selection_prev(&mut self) -> Option<OrderId> {
        let count = self.selectable().len();
        if count == 0 {
            return None;
        }
        self.selected = if self.selected == 0 {
            count - 1
        } else {
            self.selected - 1
        };
        self.selected_order().map(|o| o.id.clone())
    }

    /// Total weight currently being carried.
    pub fn carried_weight(&self) -> f64 {
        self.orders
            .iter()
            .filter(|o| o.state == OrderState::Carrying)
            .map(|o| o.weight)
            .sum()
    }

    pub fn accepted_ids(&self) -> &[OrderId] {
        &self.accepted
    }

    pub fn active_id(&self) -> Option<&OrderId> {
        self.active.as_ref()
    }

    pub fn active_order(&self) -> Option<&Order> {
        self.active.as_deref().and_then(|id| self.order(id))
    }

    /// Accept an order by id. Sets the deadline from priority and makes the
    /// order active if nothing else is.
    pub fn accept(&mut self, id: &str, now_s: f64) -> bool {
        let Some(order) = self.order_mut(id) else {
            return false;
        };
        if !order.is_selectable() {
            return false;
        }
        order.accept(now_s);
        let id = id.to_string();
        if !self.accepted.contains(&id) {
            self.accepted.push(id.clone());
        }
        if self.active.is_none() {
            self.active = Some(id);
        }
        true
    }

    /// Drop a terminal order from the accepted set and advance the active
    /// cursor to the next accepted order, if any.
    pub fn retire(&mut self, id: &str) {
        self.accepted.retain(|a| a != id);
        if self.active.as_deref() == Some(id) {
            self.active = self.accepted.first().cloned();
        }
    }

    pub fn set_active(&mut self, id: Option<OrderId>) {
        self.active = id;
    }

    pub fn next_active(&mut self) -> Option<&Order> {
        if self.accepted.is_empty() {
            return self.active_order();
        }
        let idx = match &self.active {
            Some(id) => match self.accepted.iter().position(|a| a == id) {
                Some(i) => (i + 1) % self.accepted.len(),
                None => 0,
            },
            None => 0,
        };
        self.active = Some(self.accepted[idx].clone());
        self.active_order()
    }

    pub fn prev_active(&mut self) -> Option<&Order> {
        if self.accepted.is_empty() {
            return self.active_order();
        }
        let idx = match &self.active {
            Some(id) => match self.accepted.iter().position(|a| a == id) {
                Some(i) => (i + self.accepted.len() - 1) % self.accepted.len(),
                None => self.accepted.len() - 1,
            },
            None => self.accepted.len() - 1,
        };
        self.active = Some(self.accepted[idx].clone());
        self.active_order()
    }

    /// Expiry sweep, run every tick. Unclaimed orders time out silently;
    /// accepted/carried orders deep in overtime are marked expired and
    /// returned so the caller can apply the "lost" reputation outcome.
    /// Terminal orders are never touched again, so running the sweep twice
    /// in the same tick is a no-op the second time.
    pub fn sweep(&mut self, now_s: f64, config: &ExpiryConfig) -> Vec<LostOrder> {
        let mut lost = Vec::new();
        for order in &mut self.orders {
            match order.state {
                OrderState::Available => {
                    if order.released
                        && now_s - order.release_time_s > config.unaccepted_timeout_s
                    {
                        order.state = OrderState::Expired;
                    }
                }
                OrderState::Accepted | OrderState::Carrying => {
                    let overtime = order.overtime_s(now_s);
                    if overtime > config.lost_after_overtime_s {
                        lost.push(LostOrder {
                            id: order.id.clone(),
                            priority: order.priority,
                            overtime_s: overtime,
                            was_carrying: order.state == OrderState::Carrying,
                        });
                        order.state = OrderState::Expired;
                    }
                }
                _ => {}
            }
        }
        for l in &lost {
            self.retire(&l.id);
        }
        lost
    }

    /// True while any order could still be worked: active, or not yet
    /// released. Once this is false the session has nothing left to offer.
    pub fn has_remaining_jobs(&self) -> bool {
        self.orders.iter().any(|o| !o.state.is_terminal())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orders::Order;

    fn board() -> JobBoard {
        let orders = vec![
            Order::new("low".into(), (0, 0), (3, 3), 50.0, 1.0, 0, 0.0),
            Order::new("high".into(), (1, 1), (4, 4), 80.0, 1.0, 2, 0.0),
            Order::new("mid".into(), (2, 2), (5, 5), 120.0, 1.0, 1, 120.0),
        ];
        JobBoard::from_orders(orders, DEFAULT_CAPACITY)
    }

    #[test]
    fn selectable_is_gated_by_release_time() {
        let mut b = board();
        b.mark_released(119.0);
        let ids: Vec<&str> = b.selectable().iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["high", "low"]);

        b.mark_released(120.0);
        let ids: Vec<&str> = b.selectable().iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["high", "mid", "low"]);
    }

    #[test]
    fn accept_sets_active_and_deadline() {
        let mut b = board();
        b.mark_released(0.0);
        assert!(b.accept("high", 10.0));
        assert_eq!(b.active_id().map(String::as_str), Some("high"));
        assert_eq!(b.order("high").unwrap().deadline_s, Some(70.0));
        // Accepting again fails: no longer selectable.
        assert!(!b.accept("high", 11.0));
    }

    #[test]
    fn cycle_selection_wraps_both_ways() {
        let mut b = board();
        b.mark_released(0.0);
        assert_eq!(b.selected_order().unwrap().id, "high");
        assert_eq!(b.cycle_selection().as_deref(), Some("low"));
        assert_eq!(b.cycle_selection().as_deref(), Some("high"));
        assert_eq!(b.cycle_selection_prev().as_deref(), Some("low"));
    }

    #[test]
    fn sweep_times_out_unclaimed_orders_without_penalty() {
        let mut b = board();
        b.mark_released(0.0);
        let lost = b.sweep(601.0, &ExpiryConfig::default());
        assert!(lost.is_empty());
        assert_eq!(b.order("high").unwrap().state, OrderState::Expired);
        assert_eq!(b.order("low").unwrap().state, OrderState::Expired);
        // "mid" released at 120, not yet timed out.
        assert_eq!(b.order("mid").unwrap().state, OrderState::Available);
    }

    #[test]
    fn sweep_loses_deep_overtime_orders_once() {
        let mut b = board();
        b.mark_released(0.0);
        b.accept("high", 0.0); // deadline 60
        let config = ExpiryConfig::default();

        assert!(b.sweep(100.0, &config).is_empty()); // 40 s overtime, still deliverable
        let lost = b.sweep(241.0, &config);
        assert_eq!(lost.len(), 1);
        assert_eq!(lost[0].id, "high");
        assert!(lost[0].overtime_s > 180.0);
        assert!(b.active_id().is_none());

        // Second sweep in the same tick must not double-report.
        assert!(b.sweep(241.0, &config).is_empty());
    }

    #[test]
    fn carried_weight_counts_only_carried_orders() {
        let mut b = board();
        b.mark_released(0.0);
        b.accept("high", 0.0);
        assert_eq!(b.carried_weight(), 0.0);
        b.order_mut("high").unwrap().mark_carrying(5.0);
        assert_eq!(b.carried_weight(), 1.0);
    }

    #[test]
    fn active_cycling_walks_the_accepted_list() {
        let mut b = board();
        b.mark_released(120.0);
        b.accept("high", 121.0);
        b.accept("low", 121.0);
        b.accept("mid", 121.0);
        assert_eq!(b.active_id().map(String::as_str), Some("high"));
        assert_eq!(b.next_active().unwrap().id, "low");
        assert_eq!(b.next_active().unwrap().id, "mid");
        assert_eq!(b.next_active().unwrap().id, "high");
        assert_eq!(b.prev_active().unwrap().id, "mid");
    }

    #[test]
    fn eligibility_delay_hides_fresh_orders() {
        let mut b = board();
        b.mark_released(1.0);
        assert!(b.eligible(1.0, 3.0).is_empty());
        assert_eq!(b.eligible(3.0, 3.0).len(), 2);
    }
}
