//! EventBus - broadcast-based event system for kitchen state changes.
//!
//! Publishes events as the engine mutates state so presentation layers and
//! internal subscribers can receive real-time updates.

use serde::Serialize;
use tokio::sync::broadcast;
use uuid::Uuid;

/// Events emitted while the kitchen runs
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum KitchenEvent {
    /// A combination attempt was logged and is now in flight
    AttemptStarted {
        /// Timeline entry id of the pending attempt
        entry_id: u64,
        /// Action name
        action: String,
    },
    /// A combination attempt resolved
    AttemptResolved {
        /// Timeline entry id
        entry_id: u64,
        /// Whether an ingredient was produced
        success: bool,
        /// Produced ingredient name, if any
        result_name: Option<String>,
    },
    /// An order moved to in-progress
    OrderPickedUp {
        /// Order id
        order_id: Uuid,
    },
    /// An order was fulfilled by a served dish
    OrderCompleted {
        /// Order id
        order_id: Uuid,
        /// Dish that satisfied it
        served_dish: String,
    },
    /// All in-progress orders were abandoned
    OrdersAbandoned {
        /// How many orders failed
        count: usize,
    },
    /// A dish was served, matched or not
    DishServed {
        /// Served dish name
        dish: String,
        /// Whether it satisfied an order
        matched: bool,
    },
    /// Free-text narration was appended to the timeline
    Narration {
        /// Narration text
        text: String,
    },
}

/// Broadcast-based event bus for kitchen events.
///
/// Uses `tokio::broadcast` so multiple subscribers can receive the same
/// events. Slow subscribers miss events (lagged) rather than blocking the
/// publisher.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<KitchenEvent>,
}

impl EventBus {
    /// Create a new EventBus with the given channel capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to events. Returns a receiver that will get all future events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<KitchenEvent> {
        self.sender.subscribe()
    }

    /// Publish an event to all active subscribers.
    ///
    /// Returns the number of subscribers that received the event. With no
    /// subscribers the event is silently dropped.
    pub fn publish(&self, event: KitchenEvent) -> usize {
        self.sender.send(event).unwrap_or(0)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_publish_subscribe() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();

        bus.publish(KitchenEvent::AttemptStarted {
            entry_id: 1,
            action: "stone_grind".to_string(),
        });

        match rx.recv().await.unwrap() {
            KitchenEvent::AttemptStarted { entry_id, action } => {
                assert_eq!(entry_id, 1);
                assert_eq!(action, "stone_grind");
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_event_ordering() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();

        bus.publish(KitchenEvent::AttemptStarted {
            entry_id: 1,
            action: "boil".to_string(),
        });
        bus.publish(KitchenEvent::AttemptResolved {
            entry_id: 1,
            success: true,
            result_name: Some("Decoction".to_string()),
        });

        assert!(matches!(
            rx.recv().await.unwrap(),
            KitchenEvent::AttemptStarted { .. }
        ));
        assert!(matches!(
            rx.recv().await.unwrap(),
            KitchenEvent::AttemptResolved { success: true, .. }
        ));
    }

    #[test]
    fn test_publish_no_subscribers() {
        let bus = EventBus::new(16);
        let count = bus.publish(KitchenEvent::OrdersAbandoned { count: 2 });
        assert_eq!(count, 0);
    }

    #[test]
    fn test_event_serialization() {
        let event = KitchenEvent::DishServed {
            dish: "Masala Dosa".to_string(),
            matched: true,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"dish_served\""));
        assert!(json.contains("\"matched\":true"));
    }
}
