//! Delivery orders and their lifecycle.
//!
//! An order moves `available → accepted → carrying → delivered`; `accepted`
//! and `carrying` can instead exit to `expired` or `cancelled`. Terminal
//! records are kept for scoring rather than destroyed.

use serde::{Deserialize, Serialize};

pub type OrderId = String;

/// Deadline allowance by priority, seconds from acceptance. Overrides any
/// source deadline that would exceed the priority-0 allowance.
pub fn deadline_allowance_s(priority: u8) -> f64 {
    match priority {
        0 => 120.0,
        1 => 90.0,
        _ => 60.0,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderState {
    Available,
    Accepted,
    Carrying,
    Delivered,
    Expired,
    Cancelled,
}

impl OrderState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            OrderState::Delivered | OrderState::Expired | OrderState::Cancelled
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub pickup: (i32, i32),
    pub dropoff: (i32, i32),
    pub payout: f64,
    pub weight: f64,
    pub priority: u8,
    /// Seconds from game start at which the order appears on the board.
    pub release_time_s: f64,
    /// Set once when the release time elapses, at the lifecycle transition.
    pub released: bool,
    pub state: OrderState,
    /// Absolute elapsed-time deadline, derived from priority at acceptance.
    pub deadline_s: Option<f64>,
    pub accepted_at_s: Option<f64>,
    pub picked_at_s: Option<f64>,
    pub delivered_at_s: Option<f64>,
}

impl Order {
    pub fn new(
        id: OrderId,
        pickup: (i32, i32),
        dropoff: (i32, i32),
        payout: f64,
        weight: f64,
        priority: u8,
        release_time_s: f64,
    ) -> Self {
        Self {
            id,
            pickup,
            dropoff,
            payout,
            weight,
            priority,
            release_time_s,
            released: false,
            state: OrderState::Available,
            deadline_s: None,
            accepted_at_s: None,
            picked_at_s: None,
            delivered_at_s: None,
        }
    }

    /// Selectable: released, still available, not expired.
    pub fn is_selectable(&self) -> bool {
        self.released && self.state == OrderState::Available
    }

    /// Acceptance derives the deadline from priority, measured from the
    /// acceptance instant.
    pub fn accept(&mut self, now_s: f64) {
        self.state = OrderState::Accepted;
        self.accepted_at_s = Some(now_s);
        self.deadline_s = Some(now_s + deadline_allowance_s(self.priority));
    }

    pub fn mark_carrying(&mut self, now_s: f64) {
        self.state = OrderState::Carrying;
        self.picked_at_s = Some(now_s);
    }

    pub fn mark_delivered(&mut self, now_s: f64) {
        self.state = OrderState::Delivered;
        self.delivered_at_s = Some(now_s);
    }

    pub fn overtime_s(&self, now_s: f64) -> f64 {
        match self.deadline_s {
            Some(deadline) => (now_s - deadline).max(0.0),
            None => 0.0,
        }
    }

    pub fn is_late(&self, now_s: f64) -> bool {
        self.overtime_s(now_s) > 0.0
    }

    /// Seconds between acceptance and deadline; the early-delivery margin is
    /// a fraction of this window.
    pub fn deadline_window_s(&self) -> f64 {
        match (self.accepted_at_s, self.deadline_s) {
            (Some(accepted), Some(deadline)) => (deadline - accepted).max(0.0),
            _ => 0.0,
        }
    }
}

/// Board ordering: priority descending, then payout descending. Applied both
/// to the stored list and to the selectable view.
pub fn board_order(a: &Order, b: &Order) -> std::cmp::Ordering {
    b.priority
        .cmp(&a.priority)
        .then_with(|| b.payout.total_cmp(&a.payout))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(priority: u8) -> Order {
        Order::new("job-1".into(), (0, 0), (5, 5), 100.0, 2.0, priority, 0.0)
    }

    #[test]
    fn deadline_derived_from_priority_at_accept() {
        let mut o = order(1);
        o.accept(100.0);
        assert_eq!(o.state, OrderState::Accepted);
        assert_eq!(o.deadline_s, Some(190.0));
        assert_eq!(o.accepted_at_s, Some(100.0));

        let mut urgent = order(2);
        urgent.accept(0.0);
        assert_eq!(urgent.deadline_s, Some(60.0));
    }

    #[test]
    fn overtime_is_zero_before_the_deadline() {
        let mut o = order(1);
        o.accept(100.0);
        assert_eq!(o.overtime_s(150.0), 0.0);
        assert_eq!(o.overtime_s(200.0), 10.0);
        assert!(o.is_late(200.0));
        assert!(!o.is_late(190.0));
    }

    #[test]
    fn selectable_requires_release_and_available_state() {
        let mut o = order(0);
        assert!(!o.is_selectable());
        o.released = true;
        assert!(o.is_selectable());
        o.accept(5.0);
        assert!(!o.is_selectable());
    }

    #[test]
    fn board_order_sorts_priority_then_payout() {
        let mut a = order(0);
        a.payout = 300.0;
        let mut b = order(2);
        b.payout = 50.0;
        let mut c = order(2);
        c.payout = 80.0;
        let mut list = vec![a.clone(), b.clone(), c.clone()];
        list.sort_by(board_order);
        assert_eq!(list[0].payout, 80.0);
        assert_eq!(list[1].payout, 50.0);
        assert_eq!(list[2].payout, 300.0);
    }
}
