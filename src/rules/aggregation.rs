//! Equipment stat aggregation
//!
//! Adjusted stats, max HP, defense and damage modifier are always fully
//! recomputed from primary values plus the summed bonuses of everything
//! currently equipped. Nothing is incrementally patched on equip or
//! unequip, so the recompute is idempotent by construction.

use crate::core::types::EntityId;
use crate::ecs::components::ItemBonuses;
use crate::ecs::EntityStore;
use crate::rules::spells::sync_spellbook_unlock;

/// Recompute an entity's equipment-derived stats
///
/// After recomputation `current_hp` is clamped down to the new
/// `max_hp`; it is never raised, and the clamp never pushes it below 0.
/// The spell book unlock invariant is re-checked because adjusted Int
/// may have changed. Entities without stats or equipment are left
/// untouched.
pub fn recompute_stats(store: &mut EntityStore, entity: EntityId) {
    let Some(equipment) = store.equipment(entity) else {
        return;
    };
    let equipped: Vec<EntityId> = equipment.equipped().map(|(_, item)| item).collect();

    let mut totals = ItemBonuses::default();
    for item_id in equipped {
        if let Some(item) = store.item(item_id) {
            totals.str += item.bonuses.str;
            totals.dex += item.bonuses.dex;
            totals.int += item.bonuses.int;
            totals.hp += item.bonuses.hp;
            totals.def += item.bonuses.def;
            totals.dmg += item.bonuses.dmg;
        }
    }

    let Some(stats) = store.stats_mut(entity) else {
        return;
    };
    stats.adj_str = stats.primary_str + totals.str;
    stats.adj_dex = stats.primary_dex + totals.dex;
    stats.adj_int = stats.primary_int + totals.int;
    stats.max_hp = stats.primary_hp + totals.hp;
    stats.defense = totals.def;
    stats.damage_mod = totals.dmg;
    if stats.current_hp > stats.max_hp {
        stats.current_hp = stats.max_hp.max(0);
    }

    sync_spellbook_unlock(store, entity);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::components::{
        Equipment, Inventory, Item, ItemSlot, EquipSlot, SpellBook, Stats,
    };
    use crate::ecs::Component;

    fn adventurer(store: &mut EntityStore) -> EntityId {
        let id = store.create_entity();
        store.add_component(id, Component::Stats(Stats::new(40, 35, 45, 20)));
        store.add_component(id, Component::Equipment(Equipment::default()));
        store.add_component(id, Component::Inventory(Inventory::default()));
        store.add_component(id, Component::SpellBook(SpellBook::default()));
        id
    }

    fn equip(store: &mut EntityStore, owner: EntityId, slot: EquipSlot, bonuses: ItemBonuses) {
        let item = store.create_entity();
        store.add_component(
            item,
            Component::Item(Item {
                name: "test gear".into(),
                value: 1,
                slot: ItemSlot::Gear(slot),
                bonuses,
                effect: None,
            }),
        );
        store.equipment_mut(owner).unwrap().set(slot, item);
    }

    #[test]
    fn test_bonuses_sum_from_all_equipped() {
        let mut store = EntityStore::new();
        let hero = adventurer(&mut store);
        equip(&mut store, hero, EquipSlot::MainHand, ItemBonuses { dmg: 2, ..Default::default() });
        equip(&mut store, hero, EquipSlot::Torso, ItemBonuses { def: 2, hp: 3, ..Default::default() });
        equip(&mut store, hero, EquipSlot::Head, ItemBonuses { int: 10, def: 1, ..Default::default() });

        recompute_stats(&mut store, hero);
        let stats = store.stats(hero).unwrap();
        assert_eq!(stats.adj_int, 55);
        assert_eq!(stats.max_hp, 23);
        assert_eq!(stats.defense, 3);
        assert_eq!(stats.damage_mod, 2);
        assert_eq!(stats.adj_str, 40, "untouched stats stay at primary");
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let mut store = EntityStore::new();
        let hero = adventurer(&mut store);
        equip(&mut store, hero, EquipSlot::MainHand, ItemBonuses { str: 5, dmg: 2, ..Default::default() });

        recompute_stats(&mut store, hero);
        let first = store.stats(hero).unwrap().clone();
        recompute_stats(&mut store, hero);
        let second = store.stats(hero).unwrap();

        assert_eq!(second.adj_str, first.adj_str);
        assert_eq!(second.max_hp, first.max_hp);
        assert_eq!(second.defense, first.defense);
        assert_eq!(second.damage_mod, first.damage_mod);
        assert_eq!(second.current_hp, first.current_hp);
    }

    #[test]
    fn test_hp_clamped_down_when_max_shrinks() {
        let mut store = EntityStore::new();
        let hero = adventurer(&mut store);
        equip(&mut store, hero, EquipSlot::Neck, ItemBonuses { hp: 10, ..Default::default() });
        recompute_stats(&mut store, hero);
        store.stats_mut(hero).unwrap().current_hp = 30;

        // Losing the amulet shrinks max back to 20
        store.equipment_mut(hero).unwrap().take(EquipSlot::Neck);
        recompute_stats(&mut store, hero);
        let stats = store.stats(hero).unwrap();
        assert_eq!(stats.max_hp, 20);
        assert_eq!(stats.current_hp, 20);
    }

    #[test]
    fn test_clamp_never_raises_hp() {
        let mut store = EntityStore::new();
        let hero = adventurer(&mut store);
        store.stats_mut(hero).unwrap().current_hp = 5;
        recompute_stats(&mut store, hero);
        assert_eq!(store.stats(hero).unwrap().current_hp, 5);
    }

    #[test]
    fn test_wounded_below_zero_is_left_alone() {
        let mut store = EntityStore::new();
        let hero = adventurer(&mut store);
        store.stats_mut(hero).unwrap().current_hp = -2;
        recompute_stats(&mut store, hero);
        assert_eq!(store.stats(hero).unwrap().current_hp, -2, "death detection must still see <= 0");
    }

    #[test]
    fn test_unlocks_spellbook_when_int_crosses_threshold() {
        let mut store = EntityStore::new();
        let hero = adventurer(&mut store);
        equip(&mut store, hero, EquipSlot::Head, ItemBonuses { int: 10, ..Default::default() });
        recompute_stats(&mut store, hero);
        assert!(store.spell_book(hero).unwrap().is_unlocked);

        store.equipment_mut(hero).unwrap().take(EquipSlot::Head);
        recompute_stats(&mut store, hero);
        assert!(!store.spell_book(hero).unwrap().is_unlocked, "unlock tracks adjusted Int both ways");
    }
}
