//! Spellcasting
//!
//! The spell book unlocks at adjusted Int 50. A cast pays its cost
//! unconditionally, then resolves as a d100 test on Int assisted by the
//! Magic skill; the effect only triggers on success. HP costs cannot
//! reduce the caster to zero, STR costs reduce adjusted STR for the
//! remainder of the encounter.

use crate::catalog::{Spell, SpellCostType, SpellEffect, SpellTable};
use crate::core::types::{EntityId, SkillId, StatId};
use crate::ecs::components::Stats;
use crate::ecs::EntityStore;
use crate::rules::d100::perform_test;
use crate::rules::dice::DiceRoller;

/// Adjusted Int required before the spell book unlocks
pub const SPELLBOOK_UNLOCK_INT: i32 = 50;

/// The fixed rolls granting a Sorcerer's two starting spells
pub const SORCERER_SPELL_ROLLS: [u32; 2] = [17, 13];

/// Enforce `is_unlocked ⇔ adj_int >= 50`
///
/// Called on every recompute so equipment changes and level-ups keep
/// the invariant; returns the new state if it changed.
pub fn sync_spellbook_unlock(store: &mut EntityStore, entity: EntityId) -> Option<bool> {
    let adj_int = store.stats(entity)?.adj_int;
    let book = store.spell_book_mut(entity)?;
    let unlocked = adj_int >= SPELLBOOK_UNLOCK_INT;
    if book.is_unlocked != unlocked {
        book.is_unlocked = unlocked;
        Some(unlocked)
    } else {
        None
    }
}

/// Affordability is strictly greater than cost: casting can never
/// reduce the paying pool to zero or below
pub fn can_afford_spell(stats: &Stats, spell: &Spell) -> bool {
    match spell.cost_type {
        SpellCostType::Hp => stats.current_hp > spell.cost,
        SpellCostType::Str => stats.adj_str > spell.cost,
    }
}

/// Pay a spell's cost; the caller has already checked affordability
pub fn pay_spell_cost(stats: &mut Stats, spell: &Spell) {
    match spell.cost_type {
        SpellCostType::Hp => stats.current_hp -= spell.cost,
        SpellCostType::Str => stats.adj_str -= spell.cost,
    }
}

/// Outcome of one casting attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CastOutcome {
    /// The book is still locked
    BookLocked,
    /// The spell is unknown or its Int requirement is unmet
    NotCastable,
    /// Cost exceeds the caster's pool; nothing is paid
    CannotAfford,
    /// Cost paid, test failed, no effect
    Fizzled { roll: u32 },
    /// Cost paid, test passed, effect applied
    Cast { roll: u32, narration: String },
}

/// Attempt to cast a known spell at an optional target
pub fn cast_spell(
    store: &mut EntityStore,
    dice: &mut dyn DiceRoller,
    caster: EntityId,
    target: Option<EntityId>,
    spell: &Spell,
) -> CastOutcome {
    let Some(book) = store.spell_book(caster) else {
        return CastOutcome::BookLocked;
    };
    if !book.is_unlocked {
        return CastOutcome::BookLocked;
    }
    let Some(stats) = store.stats(caster) else {
        return CastOutcome::NotCastable;
    };
    if !store.spell_book(caster).is_some_and(|book| book.can_cast(spell, stats.adj_int)) {
        return CastOutcome::NotCastable;
    }
    if !can_afford_spell(stats, spell) {
        return CastOutcome::CannotAfford;
    }

    // Cost comes off before the dice decide anything
    if let Some(stats) = store.stats_mut(caster) {
        pay_spell_cost(stats, spell);
    }

    let outcome = perform_test(store, dice, caster, StatId::Int, 0, &[SkillId::Magic]);
    if outcome.success {
        let narration = apply_spell_effect(store, dice, caster, target, spell);
        CastOutcome::Cast { roll: outcome.roll, narration }
    } else {
        CastOutcome::Fizzled { roll: outcome.roll }
    }
}

/// Apply a successfully cast spell's effect and narrate it
pub fn apply_spell_effect(
    store: &mut EntityStore,
    dice: &mut dyn DiceRoller,
    caster: EntityId,
    target: Option<EntityId>,
    spell: &Spell,
) -> String {
    let name = spell.name.as_str();
    let target_name = target
        .and_then(|id| store.info(id))
        .map(|info| info.name.clone())
        .unwrap_or_else(|| "the foe".to_string());

    match spell.effect {
        SpellEffect::Heal10 => {
            let Some(stats) = store.stats_mut(caster) else {
                return format!("Cast {name}, but nothing happens!");
            };
            let healed = (stats.max_hp - stats.current_hp).min(10).max(0);
            stats.current_hp += healed;
            format!("Cast {name}, healed {healed} HP!")
        }
        SpellEffect::HealAll => {
            let Some(stats) = store.stats_mut(caster) else {
                return format!("Cast {name}, but nothing happens!");
            };
            let healed = (stats.max_hp - stats.current_hp).max(0);
            stats.current_hp = stats.max_hp;
            format!("Cast {name}, fully healed ({healed} HP)!")
        }
        SpellEffect::Damage2 | SpellEffect::Damage4 => {
            let damage = if spell.effect == SpellEffect::Damage2 { 2 } else { 4 };
            match target.and_then(|id| store.stats_mut(id)) {
                Some(stats) => {
                    stats.current_hp -= damage;
                    format!("Cast {name}, deals {damage} damage to {target_name}!")
                }
                None => format!("Cast {name}, but no target!"),
            }
        }
        SpellEffect::IceStorm => {
            let damage = dice.roll(10) as i32;
            match target.and_then(|id| store.stats_mut(id)) {
                Some(stats) => {
                    stats.current_hp -= damage;
                    if stats.current_hp > 0 {
                        stats.av = (stats.av - 5).max(0);
                        format!("Cast {name}, deals {damage} damage and chills {target_name} (-5 AV)!")
                    } else {
                        format!("Cast {name}, deals {damage} damage and destroys {target_name}!")
                    }
                }
                None => format!("Cast {name}, but no target!"),
            }
        }
        SpellEffect::Lightning => {
            let damage = dice.roll(10) as i32;
            match target.and_then(|id| store.stats_mut(id)) {
                Some(stats) => {
                    stats.current_hp -= damage;
                    format!("Cast {name}, deals {damage} damage with crackling charges!")
                }
                None => format!("Cast {name}, but no target!"),
            }
        }
        SpellEffect::Armor1 => {
            if let Some(stats) = store.stats_mut(caster) {
                stats.defense += 1;
            }
            format!("Cast {name}, +1 defense until the end of the encounter!")
        }
        SpellEffect::MirrorImage => match target.and_then(|id| store.stats_mut(id)) {
            Some(stats) => {
                stats.av = (stats.av - 10).max(0);
                format!("Cast {name}, mirror images confuse {target_name} (-10 AV)!")
            }
            None => format!("Cast {name}, created mirror images!"),
        },
        SpellEffect::Clumsy => match target.and_then(|id| store.stats_mut(id)) {
            Some(stats) => {
                stats.av = (stats.av - 10).max(0);
                format!("Cast {name}, {target_name} becomes clumsy (-10 AV)!")
            }
            None => format!("Cast {name}, but no target!"),
        },
        SpellEffect::DrainLife => match target.and_then(|id| store.stats(id).map(|s| s.current_hp)) {
            Some(drained) if drained > 0 => {
                if let Some(stats) = store.stats_mut(caster) {
                    stats.current_hp = (stats.current_hp + drained).min(stats.max_hp);
                }
                if let Some(stats) = target.and_then(|id| store.stats_mut(id)) {
                    stats.current_hp = 0;
                }
                format!("Cast {name}, drained all life from {target_name}!")
            }
            _ => format!("Cast {name}, but no life to drain!"),
        },
        SpellEffect::Resurrection => {
            if let Some(info) = store.info_mut(caster) {
                info.life_points += 1;
                format!("Cast {name}, gained an extra life point!")
            } else {
                format!("Cast {name}, but nothing happens!")
            }
        }
        SpellEffect::StrBoost | SpellEffect::DexBoost | SpellEffect::IntBoost => {
            format!("Cast {name}, +10 to the next roll!")
        }
        SpellEffect::StrBoost20 | SpellEffect::DexBoost20 | SpellEffect::IntBoost20 => {
            format!("Cast {name}, +20 to the next roll!")
        }
        SpellEffect::Confuse => format!("Cast {name}, {target_name} won't attack next round!"),
        SpellEffect::OpenMagic => format!("Cast {name}, a magically sealed door swings open!"),
        SpellEffect::Invisibility => format!("Cast {name}, you fade from sight!"),
        SpellEffect::AlterTime => format!("Cast {name}, time flows backwards!"),
        SpellEffect::Clone => format!("Cast {name}, a replica fights beside you!"),
        SpellEffect::Counter => format!("Cast {name}, the dark magic is countered!"),
        SpellEffect::Manipulate => format!("Cast {name}, fate itself bends!"),
        SpellEffect::Summons => format!("Cast {name}, a summoned creature joins the fight!"),
    }
}

/// Learn a random spell: one d100 into the spell table
pub fn learn_random_spell(
    store: &mut EntityStore,
    dice: &mut dyn DiceRoller,
    entity: EntityId,
    table: &SpellTable,
) -> Option<String> {
    let roll = dice.d100();
    let spell = table.spell_for_roll(roll)?.clone();
    let name = spell.name.clone();
    store.spell_book_mut(entity)?.add_spell(spell);
    Some(name)
}

/// Grant a Sorcerer's fixed starting spells
pub fn grant_sorcerer_spells(
    store: &mut EntityStore,
    entity: EntityId,
    table: &SpellTable,
) -> Vec<String> {
    let mut names = Vec::new();
    for roll in SORCERER_SPELL_ROLLS {
        if let Some(spell) = table.spell_for_roll(roll).cloned() {
            if let Some(book) = store.spell_book_mut(entity) {
                names.push(spell.name.clone());
                book.add_spell(spell);
            }
        }
    }
    names
}
