//! Built-in sample catalogs
//!
//! A representative slice of the full rulebook tables, embedded as JSON
//! and run through the real loader so the demo binary and test fixtures
//! exercise the same path as external data files.

use crate::catalog::loader::{
    load_area_table, load_door_table, load_items, load_monsters, load_spells, load_templates,
    GameData,
};
use crate::core::error::Result;

pub const AREA_TABLE_JSON: &str = r#"{
    "entrance": {"type": "Yellow", "layout": [1, 0, 0, 0]},
    "entries": {
        "1":  {"type": "Yellow", "layout": [1, 0, 1, 0]},
        "2":  {"type": "Red",    "layout": [1, 1, 1, 1]},
        "3":  {"type": "Yellow", "layout": [0, 1, 0, 1]},
        "4":  {"type": "Red",    "layout": [1, "D", 1, 0]},
        "5":  {"type": "Yellow", "layout": [1, 1, 0, 1]},
        "6":  {"type": "Green",  "layout": [0, 1, 1, 1]},
        "7":  {"type": "Red",    "layout": [1, "D", 1, "D"]},
        "8":  {"type": "Yellow", "layout": [1, 0, 1, 0]},
        "9":  {"type": "Green",  "layout": [1, "D", 1, 1]},
        "10": {"type": "Red",    "layout": [1, 0, 1, 0]}
    }
}"#;

pub const DOOR_TABLE_JSON: &str = r#"{
    "1":  {"code": "L1",  "type": "Locked",      "test": "Dex", "mod": 0,   "skills": ["Locks"]},
    "32": {"code": "TL1", "type": "Trap Locked", "test": "Dex", "mod": 0,   "skills": ["Locks", "Traps"]},
    "34": {"code": "J1",  "type": "Jammed",      "test": "Str", "mod": 0,   "skills": ["Strong"]},
    "72": {"code": "L4",  "type": "Locked",      "test": "Dex", "mod": -15, "skills": ["Locks"]},
    "96": {"code": "M",   "type": "Magic",       "test": "Int", "mod": 0,   "skills": ["Magic"]}
}"#;

pub const ROOM_TEMPLATES_JSON: &str = r######################"{
    "entrance": "start_room",
    "templates": {
        "start_room": {
            "map": [
                "#########D##########",
                "#..................#",
                "#..................#",
                "#..................#",
                "#..................#",
                "#..................#",
                "#..................#",
                "#..................#",
                "####################"
            ],
            "exits": {"north": [9, 0]},
            "start_pos": [9, 4]
        },
        "corridor_ns": {
            "map": [
                "#######D###########",
                "#######.###########",
                "#######.###########",
                "#######.###########",
                "#######.###########",
                "#######.###########",
                "#######.###########",
                "#######D###########"
            ],
            "exits": {"north": [7, 0], "south": [7, 7]}
        },
        "four_way_room": {
            "map": [
                "#########D#########",
                "#.................#",
                "#.................#",
                "#.................#",
                "D.................D",
                "#.................#",
                "#.................#",
                "#.................#",
                "#########D#########"
            ],
            "exits": {"north": [9, 0], "south": [9, 8], "east": [18, 4], "west": [0, 4]}
        }
    }
}"######################;

pub const MONSTERS_JSON: &str = r#"{
    "giant_rat": {
        "name": "Giant Rat", "hp": [4, 9], "av": 25, "def": 0, "dmg": 0,
        "char": "r", "color": "grey", "loot_table": "P"
    },
    "goblin": {
        "name": "Goblin", "hp": 8, "av": 30, "def": 2, "dmg": 0,
        "char": "g", "color": "green", "loot_table": "I/W"
    },
    "skeleton": {
        "name": "Skeleton", "hp": 12, "av": 35, "def": 1, "dmg": 1,
        "char": "s", "color": "white", "loot_table": "W/A"
    },
    "orc_brute": {
        "name": "Orc Brute", "hp": [14, 20], "av": 40, "def": 3, "dmg": 2,
        "char": "o", "color": "green", "loot_table": "W2/A/I"
    }
}"#;

pub const ITEMS_JSON: &str = r#"{
    "weapons": {
        "short_sword": {"name": "Short Sword", "value": 30, "slot": "main_hand", "bonuses": {"dmg": 2}},
        "war_hammer":  {"name": "War Hammer",  "value": 45, "slot": "main_hand", "bonuses": {"dmg": 3, "dex": -5}},
        "dagger":      {"name": "Dagger",      "value": 10, "slot": "main_hand", "bonuses": {"dmg": 1, "dex": 5}}
    },
    "armor": {
        "leather_cuirass": {"name": "Leather Cuirass", "value": 35, "slot": "torso", "bonuses": {"def": 2}},
        "iron_helm":       {"name": "Iron Helm",       "value": 25, "slot": "head",  "bonuses": {"def": 1}},
        "wooden_shield":   {"name": "Wooden Shield",   "value": 20, "slot": "off_hand", "bonuses": {"def": 2, "dex": -5}},
        "sage_circlet":    {"name": "Sage Circlet",    "value": 60, "slot": "head",  "bonuses": {"int": 10}}
    },
    "items": {
        "healing_potion": {"name": "Healing Potion", "value": 25, "slot": "consumable", "effect": "heal", "effect_value": 4},
        "oil_flask":      {"name": "Oil Flask",      "value": 5,  "slot": "consumable", "effect": "add_oil"},
        "rations":        {"name": "Rations",        "value": 5,  "slot": "consumable", "effect": "add_food"},
        "silver_ring":    {"name": "Silver Ring",    "value": 40, "slot": "ring1", "bonuses": {"int": 5}}
    },
    "parts": {
        "rat_tail":  {"name": "Rat Tail",  "value": 2, "slot": "junk"},
        "bone_shard": {"name": "Bone Shard", "value": 3, "slot": "junk"}
    }
}"#;

pub const SPELLS_JSON: &str = r#"{
    "5":  {"name": "Magic Shield", "cost": 2,  "cost_type": "hp",  "effect": "armor_1",      "int_requirement": 50},
    "13": {"name": "Heal",         "cost": 4,  "cost_type": "str", "effect": "heal_10",      "int_requirement": 50},
    "17": {"name": "Fire Blast",   "cost": 3,  "cost_type": "hp",  "effect": "damage_4",     "int_requirement": 50},
    "29": {"name": "Frost Jab",    "cost": 2,  "cost_type": "hp",  "effect": "damage_2",     "int_requirement": 55},
    "41": {"name": "Fumble",       "cost": 3,  "cost_type": "hp",  "effect": "clumsy",       "int_requirement": 55},
    "53": {"name": "Ice Storm",    "cost": 5,  "cost_type": "hp",  "effect": "ice_storm",    "int_requirement": 60},
    "61": {"name": "Mirror Image", "cost": 4,  "cost_type": "str", "effect": "mirror_image", "int_requirement": 60},
    "73": {"name": "Lightning",    "cost": 6,  "cost_type": "hp",  "effect": "lightning",    "int_requirement": 65},
    "85": {"name": "Drain Life",   "cost": 8,  "cost_type": "hp",  "effect": "drain_life",   "int_requirement": 70},
    "97": {"name": "Resurrection", "cost": 10, "cost_type": "str", "effect": "resurrection", "int_requirement": 70}
}"#;

/// Parse the embedded catalogs into a ready `GameData`
pub fn default_game_data() -> Result<GameData> {
    Ok(GameData {
        area_table: load_area_table(AREA_TABLE_JSON)?,
        door_table: load_door_table(DOOR_TABLE_JSON)?,
        templates: load_templates(ROOM_TEMPLATES_JSON)?,
        monsters: load_monsters(MONSTERS_JSON)?,
        items: load_items(ITEMS_JSON)?,
        spells: load_spells(SPELLS_JSON)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_parse_cleanly() {
        let data = default_game_data().unwrap();
        assert_eq!(data.area_table.entries.len(), 10);
        assert_eq!(data.door_table.entries.len(), 5);
        assert_eq!(data.templates.len(), 3);
        assert_eq!(data.monsters.len(), 4);
        assert_eq!(data.spells.entries.len(), 10);
    }

    #[test]
    fn test_default_loot_categories_exist() {
        let data = default_game_data().unwrap();
        for category in ["weapons", "armor", "items", "parts"] {
            assert!(data.items.contains_key(category), "missing category {category}");
            assert!(!data.items[category].is_empty());
        }
    }
}
