//! Component data records
//!
//! Components are plain data; all behavior beyond small accessors lives
//! in the `rules` systems that operate on them.

use serde::{Deserialize, Serialize};

use crate::catalog::Spell;
use crate::core::types::{EntityId, HeroPath, Race, SkillId, StatId};

/// Slots in a 10-slot experience track
pub const PIP_TRACK_LEN: usize = 10;

/// One experience track: 10 pip slots, filled first-empty-first
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipTrack([bool; PIP_TRACK_LEN]);

impl PipTrack {
    /// Mark up to `pips` empty slots; extra pips past a full track are
    /// discarded
    pub fn add_pips(&mut self, pips: u32) {
        let mut remaining = pips;
        for slot in self.0.iter_mut() {
            if remaining == 0 {
                break;
            }
            if !*slot {
                *slot = true;
                remaining -= 1;
            }
        }
    }

    /// Full iff every slot is marked; a full track triggers a level-up
    pub fn is_full(&self) -> bool {
        self.0.iter().all(|&slot| slot)
    }

    pub fn filled(&self) -> usize {
        self.0.iter().filter(|&&slot| slot).count()
    }

    pub fn clear(&mut self) {
        self.0 = [false; PIP_TRACK_LEN];
    }
}

/// Position within the dungeon: world coords index the area grid,
/// local coords are tile offsets inside the current area
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub world_x: i32,
    pub world_y: i32,
    pub local_x: i32,
    pub local_y: i32,
}

impl Position {
    pub fn new(world_x: i32, world_y: i32, local_x: i32, local_y: i32) -> Self {
        Self { world_x, world_y, local_x, local_y }
    }

    pub fn area_coord(&self) -> (i32, i32) {
        (self.world_x, self.world_y)
    }
}

/// Combat and progression numbers
///
/// Primary values are permanent. Adjusted values are the current
/// effective values after equipment and encounter-scoped modifiers and
/// are always fully recomputed, never incrementally patched.
#[derive(Debug, Clone)]
pub struct Stats {
    pub primary_str: i32,
    pub primary_dex: i32,
    pub primary_int: i32,
    pub primary_hp: i32,

    pub adj_str: i32,
    pub adj_dex: i32,
    pub adj_int: i32,

    pub max_hp: i32,
    pub current_hp: i32,

    /// Attack value: a monster hits on a d100 roll at or below this
    pub av: i32,
    pub defense: i32,
    pub damage_mod: i32,

    xp_tracks: [PipTrack; 3],
    attuned: [bool; 3],
}

impl Stats {
    pub fn new(strength: i32, dexterity: i32, intelligence: i32, hp: i32) -> Self {
        Self {
            primary_str: strength,
            primary_dex: dexterity,
            primary_int: intelligence,
            primary_hp: hp,
            adj_str: strength,
            adj_dex: dexterity,
            adj_int: intelligence,
            max_hp: hp,
            current_hp: hp,
            av: 0,
            defense: 0,
            damage_mod: 0,
            xp_tracks: [PipTrack::default(); 3],
            attuned: [false; 3],
        }
    }

    /// Monster statline: no characteristics, just the combat numbers
    pub fn monster(hp: i32, av: i32, defense: i32, damage_mod: i32) -> Self {
        let mut stats = Self::new(0, 0, 0, hp);
        stats.av = av;
        stats.defense = defense;
        stats.damage_mod = damage_mod;
        stats
    }

    pub fn primary(&self, stat: StatId) -> i32 {
        match stat {
            StatId::Str => self.primary_str,
            StatId::Dex => self.primary_dex,
            StatId::Int => self.primary_int,
        }
    }

    pub fn primary_mut(&mut self, stat: StatId) -> &mut i32 {
        match stat {
            StatId::Str => &mut self.primary_str,
            StatId::Dex => &mut self.primary_dex,
            StatId::Int => &mut self.primary_int,
        }
    }

    pub fn adjusted(&self, stat: StatId) -> i32 {
        match stat {
            StatId::Str => self.adj_str,
            StatId::Dex => self.adj_dex,
            StatId::Int => self.adj_int,
        }
    }

    pub fn adjusted_mut(&mut self, stat: StatId) -> &mut i32 {
        match stat {
            StatId::Str => &mut self.adj_str,
            StatId::Dex => &mut self.adj_dex,
            StatId::Int => &mut self.adj_int,
        }
    }

    pub fn xp_track(&self, stat: StatId) -> &PipTrack {
        &self.xp_tracks[stat as usize]
    }

    pub fn xp_track_mut(&mut self, stat: StatId) -> &mut PipTrack {
        &mut self.xp_tracks[stat as usize]
    }

    pub fn is_attuned(&self, stat: StatId) -> bool {
        self.attuned[stat as usize]
    }

    pub fn set_attuned(&mut self, stat: StatId, attuned: bool) {
        self.attuned[stat as usize] = attuned;
    }
}

/// Non-stat identity: names, origin, and the session-scoped counters
#[derive(Debug, Clone)]
pub struct Info {
    pub name: String,
    pub race: Option<Race>,
    pub hero_path: Option<HeroPath>,
    pub life_points: i32,
    pub rep: i32,
    pub fate: i32,
}

impl Info {
    pub fn adventurer(
        name: impl Into<String>,
        race: Race,
        hero_path: HeroPath,
        life_points: i32,
        rep: i32,
        fate: i32,
    ) -> Self {
        Self {
            name: name.into(),
            race: Some(race),
            hero_path: Some(hero_path),
            life_points,
            rep,
            fate,
        }
    }

    /// Monsters only carry a name
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            race: None,
            hero_path: None,
            life_points: 0,
            rep: 0,
            fate: 0,
        }
    }
}

/// The 13 fixed equipment slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipSlot {
    Head,
    Torso,
    MainHand,
    OffHand,
    Back,
    Arms,
    Hands,
    Waist,
    Legs,
    Feet,
    Neck,
    Ring1,
    Ring2,
}

pub const EQUIP_SLOT_COUNT: usize = 13;

impl EquipSlot {
    pub const ALL: [EquipSlot; EQUIP_SLOT_COUNT] = [
        EquipSlot::Head,
        EquipSlot::Torso,
        EquipSlot::MainHand,
        EquipSlot::OffHand,
        EquipSlot::Back,
        EquipSlot::Arms,
        EquipSlot::Hands,
        EquipSlot::Waist,
        EquipSlot::Legs,
        EquipSlot::Feet,
        EquipSlot::Neck,
        EquipSlot::Ring1,
        EquipSlot::Ring2,
    ];

    pub fn name(self) -> &'static str {
        match self {
            EquipSlot::Head => "head",
            EquipSlot::Torso => "torso",
            EquipSlot::MainHand => "main_hand",
            EquipSlot::OffHand => "off_hand",
            EquipSlot::Back => "back",
            EquipSlot::Arms => "arms",
            EquipSlot::Hands => "hands",
            EquipSlot::Waist => "waist",
            EquipSlot::Legs => "legs",
            EquipSlot::Feet => "feet",
            EquipSlot::Neck => "neck",
            EquipSlot::Ring1 => "ring1",
            EquipSlot::Ring2 => "ring2",
        }
    }

    pub fn parse(name: &str) -> Option<EquipSlot> {
        EquipSlot::ALL.into_iter().find(|slot| slot.name() == name)
    }
}

/// Where an item can go: a gear slot, the belt, or nowhere
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemSlot {
    Gear(EquipSlot),
    Consumable,
    Junk,
}

impl ItemSlot {
    pub fn as_str(self) -> &'static str {
        match self {
            ItemSlot::Gear(slot) => slot.name(),
            ItemSlot::Consumable => "consumable",
            ItemSlot::Junk => "junk",
        }
    }

    pub fn parse(name: &str) -> Option<ItemSlot> {
        match name {
            "consumable" => Some(ItemSlot::Consumable),
            "junk" => Some(ItemSlot::Junk),
            other => EquipSlot::parse(other).map(ItemSlot::Gear),
        }
    }

    pub fn as_gear(self) -> Option<EquipSlot> {
        match self {
            ItemSlot::Gear(slot) => Some(slot),
            _ => None,
        }
    }
}

impl Serialize for ItemSlot {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ItemSlot {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        ItemSlot::parse(&name)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown item slot '{name}'")))
    }
}

/// Flat bonuses an item grants while equipped; the entire input surface
/// of stat aggregation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemBonuses {
    #[serde(default)]
    pub str: i32,
    #[serde(default)]
    pub dex: i32,
    #[serde(default)]
    pub int: i32,
    #[serde(default)]
    pub hp: i32,
    #[serde(default)]
    pub def: i32,
    #[serde(default)]
    pub dmg: i32,
}

/// What a consumable does when used from the belt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemEffectKind {
    Heal,
    AddOil,
    AddFood,
    AddPicks,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemEffect {
    pub kind: ItemEffectKind,
    pub value: i32,
}

/// An item instance; also carried by loot entities
#[derive(Debug, Clone)]
pub struct Item {
    pub name: String,
    pub value: i32,
    pub slot: ItemSlot,
    pub bonuses: ItemBonuses,
    pub effect: Option<ItemEffect>,
}

/// Ordered backpack of item entity ids
#[derive(Debug, Clone, Default)]
pub struct Inventory {
    pub items: Vec<EntityId>,
}

impl Inventory {
    /// Remove the first occurrence of `item`; false if absent
    pub fn remove(&mut self, item: EntityId) -> bool {
        match self.items.iter().position(|&id| id == item) {
            Some(index) => {
                self.items.remove(index);
                true
            }
            None => false,
        }
    }
}

/// Equipped items by slot
///
/// An occupied slot's item id never simultaneously appears in the same
/// owner's inventory; the equip/unequip operations in `rules::equipment`
/// maintain that.
#[derive(Debug, Clone, Default)]
pub struct Equipment {
    slots: [Option<EntityId>; EQUIP_SLOT_COUNT],
}

impl Equipment {
    pub fn get(&self, slot: EquipSlot) -> Option<EntityId> {
        self.slots[slot as usize]
    }

    pub fn set(&mut self, slot: EquipSlot, item: EntityId) -> Option<EntityId> {
        self.slots[slot as usize].replace(item)
    }

    pub fn take(&mut self, slot: EquipSlot) -> Option<EntityId> {
        self.slots[slot as usize].take()
    }

    /// All currently equipped item ids with their slots
    pub fn equipped(&self) -> impl Iterator<Item = (EquipSlot, EntityId)> + '_ {
        EquipSlot::ALL
            .into_iter()
            .filter_map(move |slot| self.get(slot).map(|id| (slot, id)))
    }
}

/// Per-skill progression state
#[derive(Debug, Clone, Copy, Default)]
pub struct SkillState {
    pub bonus: i32,
    pub pips: PipTrack,
    pub attuned: bool,
}

/// The fixed set of 10 skills and their progression
#[derive(Debug, Clone, Default)]
pub struct Skills {
    states: [SkillState; 10],
}

impl Skills {
    pub fn get(&self, skill: SkillId) -> &SkillState {
        &self.states[skill.index()]
    }

    pub fn get_mut(&mut self, skill: SkillId) -> &mut SkillState {
        &mut self.states[skill.index()]
    }

    pub fn bonus(&self, skill: SkillId) -> i32 {
        self.get(skill).bonus
    }
}

/// Known spells; locked until adjusted Int reaches the unlock threshold
#[derive(Debug, Clone, Default)]
pub struct SpellBook {
    pub spells: Vec<Spell>,
    pub is_unlocked: bool,
}

impl SpellBook {
    /// Add a spell unless one with the same name is already known
    pub fn add_spell(&mut self, spell: Spell) {
        if !self.spells.iter().any(|known| known.name == spell.name) {
            self.spells.push(spell);
        }
    }

    pub fn can_cast(&self, spell: &Spell, adj_int: i32) -> bool {
        self.spells.iter().any(|known| known.name == spell.name)
            && adj_int >= spell.int_requirement
    }

    /// Spells castable at the given adjusted Int
    pub fn castable(&self, adj_int: i32) -> Vec<&Spell> {
        self.spells
            .iter()
            .filter(|spell| adj_int >= spell.int_requirement)
            .collect()
    }
}

/// Consumable trackers
#[derive(Debug, Clone, Default)]
pub struct Resources {
    pub oil: i32,
    pub food: i32,
    pub picks: i32,
    pub key_pips: i32,
    pub lever_pips: i32,
}

impl Resources {
    pub fn new(oil: i32, food: i32, picks: i32) -> Self {
        Self { oil, food, picks, key_pips: 0, lever_pips: 0 }
    }
}

/// Tag component identifying the player entity
#[derive(Debug, Clone, Copy, Default)]
pub struct Player;

/// Tag component for anything that can enter combat
#[derive(Debug, Clone, Copy, Default)]
pub struct Combatant;
