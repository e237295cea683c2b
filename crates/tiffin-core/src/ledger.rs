//! Order Ledger - dish-request lifecycle state machine
//!
//! Transitions: `not_started --pickup--> in_progress --verify--> completed`,
//! or `in_progress --abandon--> failed`. Completed and failed are terminal.
//! Pickup is an idempotent guard: from any state other than `not_started`
//! it is a no-op, never an error, so duplicate UI triggers are harmless.

use serde::{Deserialize, Serialize};
use std::sync::RwLock;
use uuid::Uuid;

/// Sentinel served-dish value for abandoned orders
pub const ABANDONED_DISH: &str = "Vanished";

/// Default display emoji when a served dish has no pantry counterpart
pub const DEFAULT_DISH_EMOJI: &str = "🍽️";

/// Order difficulty tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// A few steps
    Easy,
    /// Several combinations
    Medium,
    /// The full repertoire
    Hard,
}

/// Order lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Waiting to be picked up
    NotStarted,
    /// Being cooked
    InProgress,
    /// Fulfilled by a served dish (terminal)
    Completed,
    /// Explicitly abandoned (terminal)
    Failed,
}

impl OrderStatus {
    /// Whether this status permits no further transitions
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// A dish request with a lifecycle status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    /// Order id
    pub id: Uuid,
    /// Requested dish name
    pub name: String,
    /// Display emoji
    pub emoji: String,
    /// Difficulty tier
    pub difficulty: Difficulty,
    /// Lifecycle status
    pub status: OrderStatus,
    /// Set only on `Completed` or `Failed`
    pub served_dish: Option<String>,
}

impl Order {
    /// Create a new order in `NotStarted`
    #[must_use]
    pub fn new(name: impl Into<String>, emoji: impl Into<String>, difficulty: Difficulty) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            emoji: emoji.into(),
            difficulty,
            status: OrderStatus::NotStarted,
            served_dish: None,
        }
    }
}

/// State machine over all known orders
#[derive(Debug, Default)]
pub struct OrderLedger {
    orders: RwLock<Vec<Order>>,
}

impl OrderLedger {
    /// Create an empty ledger
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an order, returning its id
    pub fn add(&self, order: Order) -> Uuid {
        let id = order.id;
        self.orders.write().expect("ledger lock poisoned").push(order);
        id
    }

    /// Pick up an order: `not_started -> in_progress`.
    ///
    /// Returns `true` only when the transition happened. Any other state is
    /// an idempotent no-op.
    pub fn pickup(&self, id: Uuid) -> bool {
        let mut orders = self.orders.write().expect("ledger lock poisoned");
        match orders.iter_mut().find(|o| o.id == id) {
            Some(order) if order.status == OrderStatus::NotStarted => {
                order.status = OrderStatus::InProgress;
                true
            }
            _ => false,
        }
    }

    /// Pick up a set of orders atomically, all-or-nothing.
    ///
    /// Every requested id must exist and be `not_started`, otherwise the
    /// ledger is left untouched and `false` is returned. Orders not in the
    /// set are never affected.
    pub fn pickup_many(&self, ids: &[Uuid]) -> bool {
        let mut orders = self.orders.write().expect("ledger lock poisoned");
        let eligible = ids.iter().all(|id| {
            orders
                .iter()
                .any(|o| o.id == *id && o.status == OrderStatus::NotStarted)
        });
        if !eligible {
            return false;
        }
        for order in orders.iter_mut() {
            if ids.contains(&order.id) {
                order.status = OrderStatus::InProgress;
            }
        }
        true
    }

    /// Complete an in-progress order with the dish that satisfied it.
    ///
    /// Returns `false` if the order is unknown or not in progress; terminal
    /// orders are immune.
    pub fn complete(&self, id: Uuid, served_dish: impl Into<String>, emoji: Option<String>) -> bool {
        let mut orders = self.orders.write().expect("ledger lock poisoned");
        match orders.iter_mut().find(|o| o.id == id) {
            Some(order) if order.status == OrderStatus::InProgress => {
                order.status = OrderStatus::Completed;
                order.served_dish = Some(served_dish.into());
                if let Some(emoji) = emoji {
                    order.emoji = emoji;
                }
                true
            }
            _ => false,
        }
    }

    /// Fail every in-progress order with the `"Vanished"` sentinel.
    ///
    /// Returns the number of orders transitioned.
    pub fn abandon_in_progress(&self) -> usize {
        let mut orders = self.orders.write().expect("ledger lock poisoned");
        let mut count = 0;
        for order in orders.iter_mut() {
            if order.status == OrderStatus::InProgress {
                order.status = OrderStatus::Failed;
                order.served_dish = Some(ABANDONED_DISH.to_string());
                count += 1;
            }
        }
        count
    }

    /// Remove terminal orders. Returns how many were cleared.
    pub fn clear_finished(&self) -> usize {
        let mut orders = self.orders.write().expect("ledger lock poisoned");
        let before = orders.len();
        orders.retain(|o| !o.status.is_terminal());
        before - orders.len()
    }

    /// In-progress orders in ledger order
    #[must_use]
    pub fn in_progress(&self) -> Vec<Order> {
        self.orders
            .read()
            .expect("ledger lock poisoned")
            .iter()
            .filter(|o| o.status == OrderStatus::InProgress)
            .cloned()
            .collect()
    }

    /// Look up an order by id
    #[must_use]
    pub fn get(&self, id: Uuid) -> Option<Order> {
        self.orders
            .read()
            .expect("ledger lock poisoned")
            .iter()
            .find(|o| o.id == id)
            .cloned()
    }

    /// Snapshot of all orders in ledger order
    #[must_use]
    pub fn snapshot(&self) -> Vec<Order> {
        self.orders.read().expect("ledger lock poisoned").clone()
    }
}

/// Starter menu of dish requests
#[must_use]
pub fn starter_menu() -> Vec<Order> {
    vec![
        Order::new("Filter Coffee", "☕", Difficulty::Easy),
        Order::new("Idli", "🍥", Difficulty::Medium),
        Order::new("Masala Dosa", "🥞", Difficulty::Hard),
        Order::new("Sambar", "🍲", Difficulty::Medium),
    ]
}
