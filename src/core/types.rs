//! Core type definitions used throughout the engine

use serde::{Deserialize, Serialize};

/// Unique identifier for entities
///
/// Monotonically increasing within a session; ids are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Cardinal direction on the area grid
///
/// `SIDES` order matches an area layout's side order (top, right,
/// bottom, left).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    pub const SIDES: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Offset on the world area grid (one step in this direction)
    pub fn offset(self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::East => (1, 0),
            Direction::South => (0, 1),
            Direction::West => (-1, 0),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Direction::North => "north",
            Direction::East => "east",
            Direction::South => "south",
            Direction::West => "west",
        }
    }
}

/// The three tested characteristics
///
/// Replaces by-name attribute lookup with a closed identifier mapped
/// through fixed accessors on `Stats`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatId {
    Str,
    Dex,
    Int,
}

impl StatId {
    pub const ALL: [StatId; 3] = [StatId::Str, StatId::Dex, StatId::Int];

    pub fn name(self) -> &'static str {
        match self {
            StatId::Str => "str",
            StatId::Dex => "dex",
            StatId::Int => "int",
        }
    }

    /// Case-insensitive parse; catalog files write "Dex", code writes "dex"
    pub fn parse(name: &str) -> Option<StatId> {
        match name.to_ascii_lowercase().as_str() {
            "str" => Some(StatId::Str),
            "dex" => Some(StatId::Dex),
            "int" => Some(StatId::Int),
            _ => None,
        }
    }
}

/// The closed set of 10 skills
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SkillId {
    Agility,
    Aware,
    Bravery,
    Dodge,
    Escape,
    Locks,
    Lucky,
    Magic,
    Strong,
    Traps,
}

impl SkillId {
    pub const ALL: [SkillId; 10] = [
        SkillId::Agility,
        SkillId::Aware,
        SkillId::Bravery,
        SkillId::Dodge,
        SkillId::Escape,
        SkillId::Locks,
        SkillId::Lucky,
        SkillId::Magic,
        SkillId::Strong,
        SkillId::Traps,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SkillId::Agility => "Agility",
            SkillId::Aware => "Aware",
            SkillId::Bravery => "Bravery",
            SkillId::Dodge => "Dodge",
            SkillId::Escape => "Escape",
            SkillId::Locks => "Locks",
            SkillId::Lucky => "Lucky",
            SkillId::Magic => "Magic",
            SkillId::Strong => "Strong",
            SkillId::Traps => "Traps",
        }
    }

    /// Index into per-entity skill state arrays
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn parse(name: &str) -> Option<SkillId> {
        SkillId::ALL.into_iter().find(|skill| skill.name() == name)
    }
}

/// Playable races
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Race {
    Human,
    Elf,
    Dwarf,
}

/// Hero paths chosen at character creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeroPath {
    Warrior,
    Rogue,
    Sorcerer,
}

/// Area kind, drawn from the area-type table
///
/// Doubles as the area's map color. A guarded area flips to `Yellow`
/// (the cleared kind) once its encounter is won.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AreaKind {
    Yellow,
    Red,
    Green,
    Blue,
}

impl AreaKind {
    /// The kind a guarded area becomes once cleared
    pub const CLEARED: AreaKind = AreaKind::Yellow;
}
