//! Loot generation from monster loot-table strings
//!
//! A loot table is a slash-separated list of codes, each a category
//! letter plus an optional repeat count ("I", "W2", "A/I/W2"). One code
//! is chosen uniformly, then that many items are drawn uniformly from
//! the code's catalog category.

use crate::catalog::ItemCatalog;
use crate::core::types::EntityId;
use crate::ecs::{Component, EntityStore};
use crate::rules::dice::DiceRoller;

/// One minted loot item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LootDrop {
    pub item_id: EntityId,
    pub name: String,
}

/// Catalog category for a loot code letter
fn category_for(letter: char) -> Option<&'static str> {
    match letter {
        'A' => Some("armor"),
        'I' => Some("items"),
        'W' => Some("weapons"),
        'P' => Some("parts"),
        _ => None,
    }
}

/// Parse one code into its category letter and repeat count
fn parse_code(code: &str) -> Option<(char, usize)> {
    let mut chars = code.chars();
    let letter = chars.next()?;
    let rest = chars.as_str();
    let count = if rest.is_empty() { 1 } else { rest.parse().ok()? };
    Some((letter, count))
}

/// Roll loot into the receiver's inventory; unknown codes yield nothing
pub fn generate_loot(
    store: &mut EntityStore,
    dice: &mut dyn DiceRoller,
    receiver: EntityId,
    loot_table: &str,
    items: &ItemCatalog,
) -> Vec<LootDrop> {
    let codes: Vec<&str> = loot_table.split('/').filter(|code| !code.is_empty()).collect();
    if codes.is_empty() {
        return Vec::new();
    }
    let chosen = codes[dice.pick(codes.len())];
    let Some((letter, count)) = parse_code(chosen) else {
        return Vec::new();
    };
    let Some(category) = category_for(letter) else {
        tracing::warn!(code = chosen, "loot code with unknown category letter");
        return Vec::new();
    };
    let Some(specs) = items.get(category).filter(|specs| !specs.is_empty()) else {
        return Vec::new();
    };
    let keys: Vec<&String> = specs.keys().collect();

    let mut drops = Vec::with_capacity(count);
    for _ in 0..count {
        let spec = &specs[keys[dice.pick(keys.len())]];
        let item_id = store.create_entity();
        store.add_component(item_id, Component::Item(spec.to_item()));
        if let Some(inventory) = store.inventory_mut(receiver) {
            inventory.items.push(item_id);
        }
        drops.push(LootDrop { item_id, name: spec.name.clone() });
    }
    drops
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::defaults;
    use crate::ecs::components::Inventory;
    use crate::rules::dice::ScriptedDice;

    fn receiver(store: &mut EntityStore) -> EntityId {
        let id = store.create_entity();
        store.add_component(id, Component::Inventory(Inventory::default()));
        id
    }

    #[test]
    fn test_parse_code_counts() {
        assert_eq!(parse_code("I"), Some(('I', 1)));
        assert_eq!(parse_code("W2"), Some(('W', 2)));
        assert_eq!(parse_code("A10"), Some(('A', 10)));
        assert_eq!(parse_code(""), None);
        assert_eq!(parse_code("Wx"), None);
    }

    #[test]
    fn test_repeat_count_mints_that_many() {
        let data = defaults::default_game_data().unwrap();
        let mut store = EntityStore::new();
        let hero = receiver(&mut store);
        // pick(1) chooses the only code; two item picks follow
        let mut dice = ScriptedDice::new([0, 0, 1]);

        let drops = generate_loot(&mut store, &mut dice, hero, "W2", &data.items);
        assert_eq!(drops.len(), 2);
        assert_eq!(store.inventory(hero).unwrap().items.len(), 2);
        for drop in &drops {
            assert!(store.item(drop.item_id).is_some());
        }
    }

    #[test]
    fn test_unknown_letter_yields_nothing() {
        let data = defaults::default_game_data().unwrap();
        let mut store = EntityStore::new();
        let hero = receiver(&mut store);
        let mut dice = ScriptedDice::new([0]);
        assert!(generate_loot(&mut store, &mut dice, hero, "X", &data.items).is_empty());
    }

    #[test]
    fn test_empty_table_yields_nothing() {
        let data = defaults::default_game_data().unwrap();
        let mut store = EntityStore::new();
        let hero = receiver(&mut store);
        let mut dice = ScriptedDice::new([0]);
        assert!(generate_loot(&mut store, &mut dice, hero, "", &data.items).is_empty());
    }
}
