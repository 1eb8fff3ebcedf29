//! The rule engine: stateless functions over entity store data
//!
//! Everything resolves through the same d100 test primitive; the rest
//! is bookkeeping that keeps derived stats consistent.

pub mod aggregation;
pub mod d100;
pub mod dice;
pub mod equipment;
pub mod experience;
pub mod spells;

pub use aggregation::recompute_stats;
pub use d100::{perform_test, TestOutcome, XP_ROLL_THRESHOLD};
pub use dice::{DiceRoller, ScriptedDice, SeededDice};
pub use equipment::{equip_item, unequip_slot, use_consumable, ConsumeOutcome, EquipOutcome};
pub use experience::{award_skill_xp, award_stat_xp, LEVEL_UP_BONUS};
pub use spells::{
    can_afford_spell, cast_spell, grant_sorcerer_spells, learn_random_spell, pay_spell_cost,
    sync_spellbook_unlock, CastOutcome, SPELLBOOK_UNLOCK_INT,
};
