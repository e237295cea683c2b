//! The closed kitchen-action catalog
//!
//! Actions are fixed at startup. Regular actions take an `ingredients`
//! array; `serve` takes a `dish` string; `abandon` takes nothing. The
//! catalog doubles as the declared tool list handed to the agent session.

use crate::normalizer::normalize;
use serde::Serialize;
use tiffin_llm::ToolDefinition;

/// Name of the terminal serve pseudo-action
pub const SERVE: &str = "serve";

/// Name of the terminal abandon pseudo-action
pub const ABANDON: &str = "abandon";

/// A fixed cooking technique with a declared argument shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct KitchenAction {
    /// Symbolic identifier (tool-call name)
    pub name: &'static str,
    /// Human label
    pub display_name: &'static str,
    /// Emoji tag
    pub emoji: &'static str,
    /// Terminal pseudo-actions bypass the combination resolver
    pub terminal: bool,
}

/// The full catalog, terminal pseudo-actions last
pub const CATALOG: &[KitchenAction] = &[
    KitchenAction {
        name: "stone_grind",
        display_name: "Stone Grind",
        emoji: "🪨",
        terminal: false,
    },
    KitchenAction {
        name: "steam",
        display_name: "Steam",
        emoji: "💨",
        terminal: false,
    },
    KitchenAction {
        name: "temper",
        display_name: "Temper",
        emoji: "🫕",
        terminal: false,
    },
    KitchenAction {
        name: "roast",
        display_name: "Roast",
        emoji: "🔥",
        terminal: false,
    },
    KitchenAction {
        name: "boil",
        display_name: "Boil",
        emoji: "♨️",
        terminal: false,
    },
    KitchenAction {
        name: "ferment",
        display_name: "Ferment",
        emoji: "⏳",
        terminal: false,
    },
    KitchenAction {
        name: "mix",
        display_name: "Mix",
        emoji: "🥄",
        terminal: false,
    },
    KitchenAction {
        name: "shallow_fry",
        display_name: "Shallow Fry",
        emoji: "🍳",
        terminal: false,
    },
    KitchenAction {
        name: SERVE,
        display_name: "Serve",
        emoji: "🍽️",
        terminal: true,
    },
    KitchenAction {
        name: ABANDON,
        display_name: "Abandon",
        emoji: "🏳️",
        terminal: true,
    },
];

/// Find an action by any spelling of its name ("stone grind" == "stone_grind")
#[must_use]
pub fn find(name: &str) -> Option<&'static KitchenAction> {
    let key = normalize(name);
    CATALOG.iter().find(|a| normalize(a.name) == key)
}

/// Build the declared tool catalog for the agent session
#[must_use]
pub fn tool_definitions() -> Vec<ToolDefinition> {
    CATALOG
        .iter()
        .map(|action| match action.name {
            SERVE => ToolDefinition::new(
                SERVE,
                "Serve a finished dish to fulfil an active order",
                serde_json::json!({
                    "type": "object",
                    "properties": {
                        "dish": {"type": "string", "description": "Name of the dish being served"}
                    },
                    "required": ["dish"]
                }),
            ),
            ABANDON => ToolDefinition::new(
                ABANDON,
                "Give up on all active orders",
                serde_json::json!({"type": "object", "properties": {}}),
            ),
            _ => ToolDefinition::new(
                action.name,
                format!(
                    "{} the given pantry ingredients into a new ingredient",
                    action.display_name
                ),
                serde_json::json!({
                    "type": "object",
                    "properties": {
                        "ingredients": {
                            "type": "array",
                            "items": {"type": "string"},
                            "description": "Pantry ingredient names to combine"
                        }
                    },
                    "required": ["ingredients"]
                }),
            ),
        })
        .collect()
}
