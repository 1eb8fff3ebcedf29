//! Catalog data records
//!
//! The structured tables the engine consumes at its loader boundary:
//! monsters, items, spells, plus the dungeon tables assembled in
//! `loader`. All interchange is JSON-shaped records.

pub mod defaults;
pub mod loader;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ecs::components::{Item, ItemBonuses, ItemEffect, ItemEffectKind, ItemSlot};

pub use loader::GameData;

/// Monster hit points: a fixed value or a range
///
/// Ranged entries resolve to the range floor when spawned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HpSpec {
    Fixed(i32),
    Range(i32, i32),
}

impl HpSpec {
    pub fn base_hp(self) -> i32 {
        match self {
            HpSpec::Fixed(hp) => hp,
            HpSpec::Range(floor, _) => floor,
        }
    }
}

/// One monster catalog entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonsterSpec {
    pub name: String,
    pub hp: HpSpec,
    pub av: i32,
    #[serde(rename = "def")]
    pub defense: i32,
    #[serde(rename = "dmg")]
    pub damage_mod: i32,
    #[serde(rename = "char", default)]
    pub glyph: String,
    #[serde(default)]
    pub color: String,
    /// Slash-separated loot codes, each a category letter plus an
    /// optional repeat count (e.g. "I/W2/A")
    #[serde(default)]
    pub loot_table: String,
}

/// Monster catalog keyed by spawn key; ordered so random picks over the
/// key set are deterministic under a seeded dice stream
pub type MonsterCatalog = BTreeMap<String, MonsterSpec>;

/// One item catalog entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemSpec {
    pub name: String,
    #[serde(default)]
    pub value: i32,
    pub slot: ItemSlot,
    #[serde(default)]
    pub bonuses: ItemBonuses,
    #[serde(default)]
    pub effect: Option<ItemEffectKind>,
    #[serde(default)]
    pub effect_value: Option<i32>,
}

impl ItemSpec {
    /// Instantiate the component record for one item entity
    pub fn to_item(&self) -> Item {
        let effect = self.effect.map(|kind| ItemEffect {
            kind,
            value: self.effect_value.unwrap_or(match kind {
                ItemEffectKind::Heal => 4,
                ItemEffectKind::AddOil | ItemEffectKind::AddFood | ItemEffectKind::AddPicks => 1,
            }),
        });
        Item {
            name: self.name.clone(),
            value: self.value,
            slot: self.slot,
            bonuses: self.bonuses,
            effect,
        }
    }
}

/// Item catalog: category → key → spec
pub type ItemCatalog = BTreeMap<String, BTreeMap<String, ItemSpec>>;

/// How a spell's cost is paid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpellCostType {
    /// Paid from current HP; the caster cannot reduce themselves to 0
    Hp,
    /// Paid from adjusted STR for the remainder of the encounter
    Str,
}

/// The closed table of spell effect codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpellEffect {
    #[serde(rename = "heal_10")]
    Heal10,
    HealAll,
    #[serde(rename = "damage_2")]
    Damage2,
    #[serde(rename = "damage_4")]
    Damage4,
    IceStorm,
    Lightning,
    #[serde(rename = "armor_1")]
    Armor1,
    MirrorImage,
    StrBoost,
    DexBoost,
    IntBoost,
    #[serde(rename = "str_boost_20")]
    StrBoost20,
    #[serde(rename = "dex_boost_20")]
    DexBoost20,
    #[serde(rename = "int_boost_20")]
    IntBoost20,
    Clumsy,
    Confuse,
    OpenMagic,
    Invisibility,
    AlterTime,
    Clone,
    Counter,
    Manipulate,
    Summons,
    DrainLife,
    Resurrection,
}

/// One spell table entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spell {
    pub name: String,
    pub cost: i32,
    pub cost_type: SpellCostType,
    pub effect: SpellEffect,
    pub int_requirement: i32,
}

/// Spell table keyed by integer threshold
#[derive(Debug, Clone, Default)]
pub struct SpellTable {
    pub entries: BTreeMap<u32, Spell>,
}

impl SpellTable {
    /// The entry with the highest threshold at or below `roll`, falling
    /// back to the lowest-keyed entry when no threshold matches
    pub fn spell_for_roll(&self, roll: u32) -> Option<&Spell> {
        self.entries
            .range(..=roll)
            .next_back()
            .or_else(|| self.entries.iter().next())
            .map(|(_, spell)| spell)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spell(name: &str) -> Spell {
        Spell {
            name: name.to_string(),
            cost: 3,
            cost_type: SpellCostType::Hp,
            effect: SpellEffect::Damage2,
            int_requirement: 50,
        }
    }

    fn three_spell_table() -> SpellTable {
        let mut entries = BTreeMap::new();
        entries.insert(13, spell("Heal"));
        entries.insert(17, spell("Fire Blast"));
        entries.insert(60, spell("Ice Storm"));
        SpellTable { entries }
    }

    #[test]
    fn test_spell_for_roll_highest_threshold_at_or_below() {
        let table = three_spell_table();
        assert_eq!(table.spell_for_roll(17).unwrap().name, "Fire Blast");
        assert_eq!(table.spell_for_roll(59).unwrap().name, "Fire Blast");
        assert_eq!(table.spell_for_roll(100).unwrap().name, "Ice Storm");
    }

    #[test]
    fn test_spell_for_roll_falls_back_to_lowest() {
        let table = three_spell_table();
        assert_eq!(table.spell_for_roll(2).unwrap().name, "Heal");
    }

    #[test]
    fn test_hp_spec_range_resolves_to_floor() {
        assert_eq!(HpSpec::Fixed(8).base_hp(), 8);
        assert_eq!(HpSpec::Range(4, 9).base_hp(), 4);
    }

    #[test]
    fn test_monster_spec_parses_range_hp() {
        let json = r#"{"name": "Giant Rat", "hp": [4, 9], "av": 25, "def": 0, "dmg": 0}"#;
        let spec: MonsterSpec = serde_json::from_str(json).unwrap();
        assert_eq!(spec.hp, HpSpec::Range(4, 9));
        assert_eq!(spec.hp.base_hp(), 4);
    }

    #[test]
    fn test_spell_effect_codes_roundtrip() {
        for (effect, code) in [
            (SpellEffect::Heal10, "\"heal_10\""),
            (SpellEffect::Damage4, "\"damage_4\""),
            (SpellEffect::IceStorm, "\"ice_storm\""),
            (SpellEffect::StrBoost20, "\"str_boost_20\""),
            (SpellEffect::DrainLife, "\"drain_life\""),
        ] {
            assert_eq!(serde_json::to_string(&effect).unwrap(), code);
            assert_eq!(serde_json::from_str::<SpellEffect>(code).unwrap(), effect);
        }
    }

    #[test]
    fn test_item_spec_effect_defaults() {
        let json = r#"{"name": "Healing Potion", "value": 25, "slot": "consumable", "effect": "heal"}"#;
        let spec: ItemSpec = serde_json::from_str(json).unwrap();
        let item = spec.to_item();
        let effect = item.effect.unwrap();
        assert_eq!(effect.kind, ItemEffectKind::Heal);
        assert_eq!(effect.value, 4);
    }
}
