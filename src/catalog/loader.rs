//! Load game data tables from JSON
//!
//! Converts JSON catalog files into the runtime tables the engine
//! consumes. Malformed catalogs are the one unrecoverable error class:
//! loading fails with a typed `EngineError` and startup aborts outside
//! this crate.

use std::collections::BTreeMap;
use std::path::Path;

use ahash::AHashMap;
use serde::Deserialize;

use crate::catalog::{ItemCatalog, MonsterCatalog, Spell, SpellTable};
use crate::core::error::{EngineError, Result};
use crate::core::types::{AreaKind, Direction, SkillId, StatId};
use crate::dungeon::tables::{AreaTable, AreaTypeEntry, DoorEntry, DoorKind, DoorTable, SideLayout};
use crate::dungeon::templates::{RoomTemplate, TemplateCatalog};

/// All tables a session needs, loaded together
#[derive(Debug, Clone)]
pub struct GameData {
    pub area_table: AreaTable,
    pub door_table: DoorTable,
    pub templates: TemplateCatalog,
    pub monsters: MonsterCatalog,
    pub items: ItemCatalog,
    pub spells: SpellTable,
}

impl GameData {
    /// Load the six standard catalog files from a directory
    pub fn load_dir(dir: &Path) -> Result<GameData> {
        let read = |file: &str| std::fs::read_to_string(dir.join(file));
        Ok(GameData {
            area_table: load_area_table(&read("area_table.json")?)?,
            door_table: load_door_table(&read("door_table.json")?)?,
            templates: load_templates(&read("room_templates.json")?)?,
            monsters: load_monsters(&read("monsters.json")?)?,
            items: load_items(&read("items.json")?)?,
            spells: load_spells(&read("spells.json")?)?,
        })
    }
}

/// A layout side in catalog files: 0 (wall), 1 (open), or "D" (door)
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawSide {
    Flag(u8),
    Code(String),
}

fn convert_side(raw: &RawSide) -> Result<SideLayout> {
    match raw {
        RawSide::Flag(0) => Ok(SideLayout::Wall),
        RawSide::Flag(1) => Ok(SideLayout::Open),
        RawSide::Code(code) if code == "D" => Ok(SideLayout::Door),
        RawSide::Flag(flag) => Err(EngineError::MalformedCatalog(format!(
            "layout side flag {flag} (expected 0, 1, or \"D\")"
        ))),
        RawSide::Code(code) => Err(EngineError::MalformedCatalog(format!(
            "layout side code '{code}' (expected 0, 1, or \"D\")"
        ))),
    }
}

#[derive(Debug, Deserialize)]
struct RawAreaEntry {
    #[serde(rename = "type")]
    kind: AreaKind,
    layout: [RawSide; 4],
}

#[derive(Debug, Deserialize)]
struct RawAreaTable {
    entrance: RawAreaEntry,
    entries: BTreeMap<String, RawAreaEntry>,
}

fn convert_area_entry(raw: &RawAreaEntry) -> Result<AreaTypeEntry> {
    let mut layout = [SideLayout::Wall; 4];
    for (side, raw_side) in raw.layout.iter().enumerate() {
        layout[side] = convert_side(raw_side)?;
    }
    Ok(AreaTypeEntry { kind: raw.kind, layout })
}

fn parse_roll_key(key: &str) -> Result<u32> {
    let roll: u32 = key
        .parse()
        .map_err(|_| EngineError::MalformedCatalog(format!("roll key '{key}' is not an integer")))?;
    if !(1..=100).contains(&roll) {
        return Err(EngineError::MalformedCatalog(format!(
            "roll key {roll} outside 1..=100"
        )));
    }
    Ok(roll)
}

/// Parse the area-type table (sparse roll keys plus the entrance entry)
pub fn load_area_table(json: &str) -> Result<AreaTable> {
    let raw: RawAreaTable = serde_json::from_str(json)?;
    let mut entries = BTreeMap::new();
    for (key, entry) in &raw.entries {
        entries.insert(parse_roll_key(key)?, convert_area_entry(entry)?);
    }
    if entries.is_empty() {
        return Err(EngineError::MalformedCatalog("area table has no roll entries".into()));
    }
    Ok(AreaTable { entries, entrance: convert_area_entry(&raw.entrance)? })
}

#[derive(Debug, Deserialize)]
struct RawDoorEntry {
    code: String,
    #[serde(rename = "type")]
    kind: String,
    test: String,
    #[serde(rename = "mod", default)]
    modifier: i32,
    #[serde(default)]
    skills: Vec<String>,
}

fn convert_door_entry(raw: &RawDoorEntry) -> Result<DoorEntry> {
    let kind = match raw.kind.as_str() {
        "Locked" => DoorKind::Locked,
        "Trap Locked" => DoorKind::TrapLocked,
        "Jammed" => DoorKind::Jammed,
        "Magic" => DoorKind::Magic,
        other => {
            return Err(EngineError::MalformedCatalog(format!("unknown door type '{other}'")))
        }
    };
    let test_stat = StatId::parse(&raw.test)
        .ok_or_else(|| EngineError::MalformedCatalog(format!("unknown test stat '{}'", raw.test)))?;
    let assisting = raw
        .skills
        .iter()
        .map(|name| {
            SkillId::parse(name)
                .ok_or_else(|| EngineError::MalformedCatalog(format!("unknown skill '{name}'")))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(DoorEntry { code: raw.code.clone(), kind, test_stat, modifier: raw.modifier, assisting })
}

/// Parse the door-type table
pub fn load_door_table(json: &str) -> Result<DoorTable> {
    let raw: BTreeMap<String, RawDoorEntry> = serde_json::from_str(json)?;
    let mut entries = BTreeMap::new();
    for (key, entry) in &raw {
        entries.insert(parse_roll_key(key)?, convert_door_entry(entry)?);
    }
    if entries.is_empty() {
        return Err(EngineError::MalformedCatalog("door table has no entries".into()));
    }
    Ok(DoorTable { entries })
}

#[derive(Debug, Deserialize)]
struct RawTemplate {
    map: Vec<String>,
    #[serde(default)]
    exits: BTreeMap<Direction, [i32; 2]>,
    #[serde(default)]
    start_pos: Option<[i32; 2]>,
}

#[derive(Debug, Deserialize)]
struct RawTemplateCatalog {
    entrance: String,
    templates: BTreeMap<String, RawTemplate>,
}

/// Parse the room-template catalog; every template's declared exits are
/// validated as walkable at this point
pub fn load_templates(json: &str) -> Result<TemplateCatalog> {
    let raw: RawTemplateCatalog = serde_json::from_str(json)?;
    let mut templates = Vec::with_capacity(raw.templates.len());
    for (name, template) in &raw.templates {
        let mut exits = AHashMap::new();
        for (&direction, &[x, y]) in &template.exits {
            exits.insert(direction, (x, y));
        }
        templates.push(RoomTemplate::new(
            name.clone(),
            template.map.clone(),
            exits,
            template.start_pos.map(|[x, y]| (x, y)),
        ));
    }
    TemplateCatalog::new(templates, &raw.entrance)
}

/// Parse the monster catalog
pub fn load_monsters(json: &str) -> Result<MonsterCatalog> {
    Ok(serde_json::from_str(json)?)
}

/// Parse the item catalog (category → key → spec)
pub fn load_items(json: &str) -> Result<ItemCatalog> {
    Ok(serde_json::from_str(json)?)
}

/// Parse the spell table; keys are integer thresholds written as strings
pub fn load_spells(json: &str) -> Result<SpellTable> {
    let raw: BTreeMap<String, Spell> = serde_json::from_str(json)?;
    let mut entries = BTreeMap::new();
    for (key, spell) in raw {
        entries.insert(parse_roll_key(&key)?, spell);
    }
    if entries.is_empty() {
        return Err(EngineError::MalformedCatalog("spell table has no entries".into()));
    }
    Ok(SpellTable { entries })
}
