//! Encounter orchestration above the entity store and rule engine

pub mod loot;
pub mod resolver;

pub use loot::{generate_loot, LootDrop};
pub use resolver::{
    CombatEvent, CombatOutcome, CombatResolver, CombatStatus, PlayerAction, RoundReport,
};
