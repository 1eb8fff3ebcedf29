//! Character creation and the persisted build record
//!
//! Creation assigns 50/40/30 over the three characteristics, applies
//! hero-path and race adjustments, and picks two +5 skills. The result
//! is a serializable build record written once when creation completes;
//! the session layer instantiates the actual entity from it.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::config::GameConfig;
use crate::core::error::Result;
use crate::core::types::{HeroPath, Race, SkillId, StatId};

/// The point pool assigned over the three characteristics, best first
pub const STAT_POINTS: [i32; 3] = [50, 40, 30];

/// Characteristic block of a build record
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BuildStats {
    pub str: i32,
    pub dex: i32,
    pub int: i32,
    pub hp: i32,
}

/// Session counters of a build record
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BuildInfo {
    pub life: i32,
    pub rep: i32,
    pub fate: i32,
}

/// A starting-equipment entry, referencing the item catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartingItem {
    pub category: String,
    pub key: String,
}

/// The complete player build, serialized once at creation completion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharacterBuild {
    pub name: String,
    pub race: Race,
    pub hero_path: HeroPath,
    pub stats: BuildStats,
    pub info: BuildInfo,
    pub skills_choice: Vec<SkillId>,
    #[serde(default)]
    pub starting_equipment: Vec<StartingItem>,
}

impl CharacterBuild {
    /// Assemble a build from creation choices
    ///
    /// `assignment` maps the 50/40/30 pool onto characteristics in
    /// order; it should name each characteristic once (a repeated name
    /// keeps the last value written, as repeated UI input would).
    pub fn assemble(
        name: impl Into<String>,
        race: Race,
        hero_path: HeroPath,
        assignment: [StatId; 3],
        skills_choice: Vec<SkillId>,
        config: &GameConfig,
    ) -> Self {
        let mut str = 30;
        let mut dex = 30;
        let mut int = 30;
        for (points, stat) in STAT_POINTS.into_iter().zip(assignment) {
            match stat {
                StatId::Str => str = points,
                StatId::Dex => dex = points,
                StatId::Int => int = points,
            }
        }

        match hero_path {
            HeroPath::Warrior => {
                str += 10;
                dex -= 5;
                int -= 5;
            }
            HeroPath::Rogue => {
                dex += 10;
                int -= 5;
                str -= 5;
            }
            HeroPath::Sorcerer => {
                int += 10;
                dex -= 5;
                str -= 5;
            }
        }
        match race {
            Race::Dwarf => {
                str += 5;
                int -= 5;
            }
            Race::Elf => {
                dex += 5;
                str -= 5;
            }
            Race::Human => {
                int += 5;
                dex -= 5;
            }
        }

        Self {
            name: name.into(),
            race,
            hero_path,
            stats: BuildStats { str, dex, int, hp: config.starting_hp },
            info: BuildInfo {
                life: config.starting_life_points,
                rep: config.starting_rep,
                fate: config.starting_fate,
            },
            skills_choice,
            starting_equipment: Vec::new(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the build snapshot; the one persistence this engine does
    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<CharacterBuild> {
        Ok(serde_json::from_str(&std::fs::read_to_string(path)?)?)
    }
}

/// Skills seeded with +5 by a hero path
pub fn path_skills(hero_path: HeroPath) -> [SkillId; 2] {
    match hero_path {
        HeroPath::Warrior => [SkillId::Bravery, SkillId::Escape],
        HeroPath::Rogue => [SkillId::Locks, SkillId::Traps],
        HeroPath::Sorcerer => [SkillId::Magic, SkillId::Lucky],
    }
}

/// Skill seeded with +5 by a race
pub fn race_skill(race: Race) -> SkillId {
    match race {
        Race::Dwarf => SkillId::Strong,
        Race::Elf => SkillId::Dodge,
        Race::Human => SkillId::Aware,
    }
}
