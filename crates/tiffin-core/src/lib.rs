//! Tiffin Core - Kitchen Orchestration Engine
//!
//! This crate contains the deterministic heart of the Tiffin kitchen:
//! - Pantry: deduplicated ingredient inventory with canonical-name keys
//! - Ledger: order lifecycle state machine
//! - Timeline: append-only audit log of attempts and narrations
//! - Resolver: ingredient-combination oracle over a completion service
//! - Verifier: served-dish / order matcher over a completion service
//! - Kitchen: the tool-call dispatcher and trust boundary for the planner
//!
//! This crate does NOT care about:
//! - How state is rendered
//! - How the completion service is transported
//! - Where orders and ingredients are persisted

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod actions;
pub mod config;
pub mod error;
pub mod event_bus;
pub mod kitchen;
pub mod ledger;
pub mod normalizer;
pub mod pantry;
pub mod resolver;
pub mod timeline;
pub mod verifier;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::actions::{KitchenAction, ABANDON, SERVE};
    pub use crate::config::KitchenConfig;
    pub use crate::error::{Error, Result};
    pub use crate::event_bus::{EventBus, KitchenEvent};
    pub use crate::kitchen::{Kitchen, SessionReport};
    pub use crate::ledger::{Difficulty, Order, OrderLedger, OrderStatus};
    pub use crate::normalizer::normalize;
    pub use crate::pantry::{Ingredient, Pantry};
    pub use crate::resolver::CombinationResolver;
    pub use crate::timeline::{AttemptResult, Timeline, TimelineEntry};
    pub use crate::verifier::{DishVerifier, ServeOutcome};
}

pub use config::KitchenConfig;
pub use error::{Error, Result};
pub use event_bus::{EventBus, KitchenEvent};
pub use kitchen::{Kitchen, SessionReport};
pub use ledger::{Difficulty, Order, OrderLedger, OrderStatus};
pub use pantry::{Ingredient, Pantry};
pub use timeline::{AttemptResult, Timeline, TimelineEntry};
pub use verifier::ServeOutcome;
