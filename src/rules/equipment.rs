//! Equipment and belt-item operations
//!
//! These maintain the inventory/equipment disjointness invariant: an
//! equipped item id never also sits in its owner's inventory. Every
//! change ends with a full stat recompute.

use crate::core::types::EntityId;
use crate::ecs::components::{EquipSlot, ItemEffectKind};
use crate::ecs::EntityStore;
use crate::rules::aggregation::recompute_stats;

/// Result of an equip attempt; all failure modes are domain outcomes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EquipOutcome {
    /// Item equipped; any previous occupant moved to the inventory
    Equipped { slot: EquipSlot, replaced: Option<EntityId> },
    /// The item id is not in the owner's inventory
    NotInInventory,
    /// The item has no gear slot (consumable or junk)
    NotEquippable,
}

/// Equip an inventory item into its designated slot
pub fn equip_item(store: &mut EntityStore, owner: EntityId, item_id: EntityId) -> EquipOutcome {
    let Some(slot) = store.item(item_id).and_then(|item| item.slot.as_gear()) else {
        return EquipOutcome::NotEquippable;
    };
    let in_inventory = store
        .inventory(owner)
        .is_some_and(|inventory| inventory.items.contains(&item_id));
    if !in_inventory {
        return EquipOutcome::NotInInventory;
    }

    let Some(equipment) = store.equipment_mut(owner) else {
        return EquipOutcome::NotInInventory;
    };
    let replaced = equipment.set(slot, item_id);

    if let Some(inventory) = store.inventory_mut(owner) {
        inventory.remove(item_id);
        if let Some(old_item) = replaced {
            inventory.items.push(old_item);
        }
    }

    recompute_stats(store, owner);
    EquipOutcome::Equipped { slot, replaced }
}

/// Unequip a slot back into the inventory; None if the slot was empty
pub fn unequip_slot(store: &mut EntityStore, owner: EntityId, slot: EquipSlot) -> Option<EntityId> {
    let item_id = store.equipment_mut(owner)?.take(slot)?;
    if let Some(inventory) = store.inventory_mut(owner) {
        inventory.items.push(item_id);
    }
    recompute_stats(store, owner);
    Some(item_id)
}

/// What using a belt item did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsumeOutcome {
    Healed { amount: i32 },
    OilAdded { amount: i32 },
    FoodAdded { amount: i32 },
    PicksAdded { amount: i32 },
    /// The item had no effect entry; it is still spent
    NoEffect,
    NotConsumable,
    NotInInventory,
}

/// Use a consumable from the inventory
///
/// The item entity is removed from the inventory and destroyed; healing
/// is clamped to max HP.
pub fn use_consumable(store: &mut EntityStore, owner: EntityId, item_id: EntityId) -> ConsumeOutcome {
    let Some(item) = store.item(item_id) else {
        return ConsumeOutcome::NotInInventory;
    };
    if item.slot.as_gear().is_some() {
        return ConsumeOutcome::NotConsumable;
    }
    let effect = item.effect;

    let in_inventory = store
        .inventory_mut(owner)
        .is_some_and(|inventory| inventory.remove(item_id));
    if !in_inventory {
        return ConsumeOutcome::NotInInventory;
    }
    store.remove_entity(item_id);

    match effect {
        Some(effect) => match effect.kind {
            ItemEffectKind::Heal => {
                let Some(stats) = store.stats_mut(owner) else {
                    return ConsumeOutcome::NoEffect;
                };
                let healed = effect.value.min(stats.max_hp - stats.current_hp).max(0);
                stats.current_hp += healed;
                ConsumeOutcome::Healed { amount: healed }
            }
            ItemEffectKind::AddOil => {
                if let Some(resources) = store.resources_mut(owner) {
                    resources.oil += effect.value;
                }
                ConsumeOutcome::OilAdded { amount: effect.value }
            }
            ItemEffectKind::AddFood => {
                if let Some(resources) = store.resources_mut(owner) {
                    resources.food += effect.value;
                }
                ConsumeOutcome::FoodAdded { amount: effect.value }
            }
            ItemEffectKind::AddPicks => {
                if let Some(resources) = store.resources_mut(owner) {
                    resources.picks += effect.value;
                }
                ConsumeOutcome::PicksAdded { amount: effect.value }
            }
        },
        None => ConsumeOutcome::NoEffect,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::components::{
        Equipment, Inventory, Item, ItemBonuses, ItemEffect, ItemSlot, Resources, SpellBook, Stats,
    };
    use crate::ecs::Component;

    fn adventurer(store: &mut EntityStore) -> EntityId {
        let id = store.create_entity();
        store.add_component(id, Component::Stats(Stats::new(40, 30, 30, 20)));
        store.add_component(id, Component::Equipment(Equipment::default()));
        store.add_component(id, Component::Inventory(Inventory::default()));
        store.add_component(id, Component::Resources(Resources::new(0, 0, 0)));
        store.add_component(id, Component::SpellBook(SpellBook::default()));
        id
    }

    fn stash_item(store: &mut EntityStore, owner: EntityId, item: Item) -> EntityId {
        let id = store.create_entity();
        store.add_component(id, Component::Item(item));
        store.inventory_mut(owner).unwrap().items.push(id);
        id
    }

    fn sword() -> Item {
        Item {
            name: "Short Sword".into(),
            value: 30,
            slot: ItemSlot::Gear(EquipSlot::MainHand),
            bonuses: ItemBonuses { dmg: 2, ..Default::default() },
            effect: None,
        }
    }

    #[test]
    fn test_equip_moves_item_out_of_inventory() {
        let mut store = EntityStore::new();
        let hero = adventurer(&mut store);
        let blade = stash_item(&mut store, hero, sword());

        let outcome = equip_item(&mut store, hero, blade);
        assert_eq!(outcome, EquipOutcome::Equipped { slot: EquipSlot::MainHand, replaced: None });
        assert!(store.inventory(hero).unwrap().items.is_empty());
        assert_eq!(store.equipment(hero).unwrap().get(EquipSlot::MainHand), Some(blade));
        assert_eq!(store.stats(hero).unwrap().damage_mod, 2);
    }

    #[test]
    fn test_equip_swaps_occupied_slot() {
        let mut store = EntityStore::new();
        let hero = adventurer(&mut store);
        let old_blade = stash_item(&mut store, hero, sword());
        let new_blade = stash_item(&mut store, hero, sword());
        equip_item(&mut store, hero, old_blade);

        let outcome = equip_item(&mut store, hero, new_blade);
        assert_eq!(
            outcome,
            EquipOutcome::Equipped { slot: EquipSlot::MainHand, replaced: Some(old_blade) }
        );
        assert_eq!(store.inventory(hero).unwrap().items, vec![old_blade]);
    }

    #[test]
    fn test_cannot_equip_junk() {
        let mut store = EntityStore::new();
        let hero = adventurer(&mut store);
        let trinket = stash_item(
            &mut store,
            hero,
            Item {
                name: "Rat Tail".into(),
                value: 2,
                slot: ItemSlot::Junk,
                bonuses: ItemBonuses::default(),
                effect: None,
            },
        );
        assert_eq!(equip_item(&mut store, hero, trinket), EquipOutcome::NotEquippable);
    }

    #[test]
    fn test_cannot_equip_from_nowhere() {
        let mut store = EntityStore::new();
        let hero = adventurer(&mut store);
        let loose = store.create_entity();
        store.add_component(loose, Component::Item(sword()));
        assert_eq!(equip_item(&mut store, hero, loose), EquipOutcome::NotInInventory);
    }

    #[test]
    fn test_unequip_returns_to_inventory() {
        let mut store = EntityStore::new();
        let hero = adventurer(&mut store);
        let blade = stash_item(&mut store, hero, sword());
        equip_item(&mut store, hero, blade);

        assert_eq!(unequip_slot(&mut store, hero, EquipSlot::MainHand), Some(blade));
        assert_eq!(store.inventory(hero).unwrap().items, vec![blade]);
        assert_eq!(store.stats(hero).unwrap().damage_mod, 0);
        assert_eq!(unequip_slot(&mut store, hero, EquipSlot::MainHand), None);
    }

    #[test]
    fn test_healing_potion_clamps_to_max() {
        let mut store = EntityStore::new();
        let hero = adventurer(&mut store);
        store.stats_mut(hero).unwrap().current_hp = 18;
        let potion = stash_item(
            &mut store,
            hero,
            Item {
                name: "Healing Potion".into(),
                value: 25,
                slot: ItemSlot::Consumable,
                bonuses: ItemBonuses::default(),
                effect: Some(ItemEffect { kind: ItemEffectKind::Heal, value: 4 }),
            },
        );

        let outcome = use_consumable(&mut store, hero, potion);
        assert_eq!(outcome, ConsumeOutcome::Healed { amount: 2 });
        assert_eq!(store.stats(hero).unwrap().current_hp, 20);
        assert!(!store.contains(potion), "consumed items are destroyed");
    }

    #[test]
    fn test_oil_flask_adds_oil() {
        let mut store = EntityStore::new();
        let hero = adventurer(&mut store);
        let flask = stash_item(
            &mut store,
            hero,
            Item {
                name: "Oil Flask".into(),
                value: 5,
                slot: ItemSlot::Consumable,
                bonuses: ItemBonuses::default(),
                effect: Some(ItemEffect { kind: ItemEffectKind::AddOil, value: 1 }),
            },
        );
        assert_eq!(use_consumable(&mut store, hero, flask), ConsumeOutcome::OilAdded { amount: 1 });
        assert_eq!(store.resources(hero).unwrap().oil, 1);
    }
}
