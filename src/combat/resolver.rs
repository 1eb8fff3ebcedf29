//! Encounter resolution
//!
//! One resolver drives one encounter: the player chooses exactly one
//! action per round, the action resolves atomically (no suspension
//! point), the monster answers, and the end-of-combat check runs. The
//! resolver never errors on a well-formed action; every failure here is
//! a domain outcome recorded in the transcript.

use crate::catalog::GameData;
use crate::core::types::{EntityId, StatId};
use crate::ecs::components::EquipSlot;
use crate::ecs::EntityStore;
use crate::combat::loot::generate_loot;
use crate::rules::aggregation::recompute_stats;
use crate::rules::d100::XP_ROLL_THRESHOLD;
use crate::rules::dice::DiceRoller;
use crate::rules::equipment::{equip_item, unequip_slot, use_consumable, ConsumeOutcome, EquipOutcome};
use crate::rules::experience::award_stat_xp;
use crate::rules::spells::{cast_spell, CastOutcome};

/// The player's choice for one combat round
///
/// Equipment, spell and belt submenus are browse-only; only these
/// terminal choices consume the round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerAction {
    Attack,
    /// Not yet implemented in the rules; converts to an attack
    Flee,
    Equip(EntityId),
    Unequip(EquipSlot),
    /// Cast a known spell by name
    CastSpell(String),
    UseBeltItem(EntityId),
}

/// One transcript entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CombatEvent {
    PlayerHit { roll: u32, damage: i32 },
    PlayerMiss { roll: u32 },
    FleeConverted,
    MonsterHit { name: String, roll: u32, damage: i32 },
    MonsterMiss { name: String, roll: u32 },
    Equipped { name: String },
    Unequipped { name: String },
    SpellCast { narration: String, roll: u32 },
    SpellFizzled { name: String, roll: u32 },
    /// A refused choice (locked book, unaffordable cost, bad item);
    /// the round is still consumed
    ActionRefused { reason: String },
    ItemUsed { description: String },
    LootFound { name: String },
    MonsterDefeated { name: String },
    LifePointSpent { remaining: i32 },
    PlayerSlain,
}

impl std::fmt::Display for CombatEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CombatEvent::PlayerHit { roll, damage } => {
                write!(f, "You hit for {damage} damage! (rolled {roll})")
            }
            CombatEvent::PlayerMiss { roll } => write!(f, "You miss! (rolled {roll})"),
            CombatEvent::FleeConverted => {
                write!(f, "Fleeing not yet implemented. You attack instead.")
            }
            CombatEvent::MonsterHit { name, roll, damage } => {
                write!(f, "{name} hits you for {damage} damage! (rolled {roll})")
            }
            CombatEvent::MonsterMiss { name, roll } => {
                write!(f, "{name} misses! (rolled {roll})")
            }
            CombatEvent::Equipped { name } => write!(f, "Equipped {name}."),
            CombatEvent::Unequipped { name } => write!(f, "Unequipped {name}."),
            CombatEvent::SpellCast { narration, roll } => {
                write!(f, "{narration} (rolled {roll})")
            }
            CombatEvent::SpellFizzled { name, roll } => {
                write!(f, "Cast {name} but it failed! (rolled {roll})")
            }
            CombatEvent::ActionRefused { reason } => write!(f, "{reason}"),
            CombatEvent::ItemUsed { description } => write!(f, "{description}"),
            CombatEvent::LootFound { name } => write!(f, "You found: {name}!"),
            CombatEvent::MonsterDefeated { name } => write!(f, "{name} defeated!"),
            CombatEvent::LifePointSpent { remaining } => {
                write!(f, "You have fallen, but a Life Point saves you! ({remaining} left)")
            }
            CombatEvent::PlayerSlain => write!(f, "You have fallen. The dungeon claims you."),
        }
    }
}

/// Terminal result of an encounter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombatOutcome {
    Victory,
    /// Life points exhausted; ends the play session
    Defeat,
}

/// Resolver state between rounds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombatStatus {
    AwaitingPlayerAction,
    Over(CombatOutcome),
}

/// Everything one round produced
#[derive(Debug, Clone)]
pub struct RoundReport {
    pub events: Vec<CombatEvent>,
    pub status: CombatStatus,
}

/// Drives a single encounter between the player and one monster
pub struct CombatResolver {
    player: EntityId,
    monster: EntityId,
    monster_key: String,
    status: CombatStatus,
    rounds: u32,
}

impl CombatResolver {
    pub fn new(player: EntityId, monster: EntityId, monster_key: impl Into<String>) -> Self {
        Self {
            player,
            monster,
            monster_key: monster_key.into(),
            status: CombatStatus::AwaitingPlayerAction,
            rounds: 0,
        }
    }

    pub fn monster(&self) -> EntityId {
        self.monster
    }

    pub fn status(&self) -> CombatStatus {
        self.status
    }

    pub fn is_over(&self) -> bool {
        matches!(self.status, CombatStatus::Over(_))
    }

    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    /// Resolve one full round for the given player action
    ///
    /// Every action consumes the round and lets the monster act,
    /// including equipment changes, belt items and refused choices.
    pub fn resolve_round(
        &mut self,
        store: &mut EntityStore,
        dice: &mut dyn DiceRoller,
        data: &GameData,
        action: PlayerAction,
    ) -> RoundReport {
        let mut events = Vec::new();
        if self.is_over() {
            return RoundReport { events, status: self.status };
        }
        self.rounds += 1;

        match action {
            PlayerAction::Attack => self.player_attack(store, dice, &mut events),
            PlayerAction::Flee => {
                events.push(CombatEvent::FleeConverted);
                self.player_attack(store, dice, &mut events);
            }
            PlayerAction::Equip(item_id) => {
                let name = store.item(item_id).map(|item| item.name.clone());
                match equip_item(store, self.player, item_id) {
                    EquipOutcome::Equipped { .. } => events.push(CombatEvent::Equipped {
                        name: name.unwrap_or_else(|| "gear".into()),
                    }),
                    EquipOutcome::NotEquippable | EquipOutcome::NotInInventory => {
                        events.push(CombatEvent::ActionRefused {
                            reason: "You fumble with gear you cannot equip.".into(),
                        })
                    }
                }
            }
            PlayerAction::Unequip(slot) => match unequip_slot(store, self.player, slot) {
                Some(item_id) => {
                    let name = store
                        .item(item_id)
                        .map_or_else(|| "gear".into(), |item| item.name.clone());
                    events.push(CombatEvent::Unequipped { name });
                }
                None => events.push(CombatEvent::ActionRefused {
                    reason: "Nothing is equipped there.".into(),
                }),
            },
            PlayerAction::CastSpell(name) => self.player_cast(store, dice, &name, &mut events),
            PlayerAction::UseBeltItem(item_id) => {
                let name = store
                    .item(item_id)
                    .map_or_else(|| "an item".into(), |item| item.name.clone());
                let description = match use_consumable(store, self.player, item_id) {
                    ConsumeOutcome::Healed { amount } => {
                        format!("Used {name}, healed {amount} HP!")
                    }
                    ConsumeOutcome::OilAdded { amount } => {
                        format!("Used {name}, gained {amount} oil!")
                    }
                    ConsumeOutcome::FoodAdded { amount } => {
                        format!("Used {name}, gained {amount} food!")
                    }
                    ConsumeOutcome::PicksAdded { amount } => {
                        format!("Used {name}, gained {amount} picks!")
                    }
                    ConsumeOutcome::NoEffect => format!("Used {name}!"),
                    ConsumeOutcome::NotConsumable | ConsumeOutcome::NotInInventory => {
                        events.push(CombatEvent::ActionRefused {
                            reason: "That is not on your belt.".into(),
                        });
                        String::new()
                    }
                };
                if !description.is_empty() {
                    events.push(CombatEvent::ItemUsed { description });
                }
            }
        }

        self.monster_turn(store, dice, &mut events);
        self.check_end(store, dice, data, &mut events);
        RoundReport { events, status: self.status }
    }

    /// The player's attack: a raw d100 against adjusted STR
    fn player_attack(
        &self,
        store: &mut EntityStore,
        dice: &mut dyn DiceRoller,
        events: &mut Vec<CombatEvent>,
    ) {
        let roll = dice.d100();
        if roll <= XP_ROLL_THRESHOLD {
            award_stat_xp(store, self.player, StatId::Str, 1);
        }
        let adj_str = store.stats(self.player).map_or(0, |stats| stats.adj_str);
        if roll as i32 <= adj_str {
            let damage_mod = store.stats(self.player).map_or(0, |stats| stats.damage_mod);
            let defense = store.stats(self.monster).map_or(0, |stats| stats.defense);
            let damage = (dice.d6() as i32 + damage_mod - defense).max(0);
            if let Some(stats) = store.stats_mut(self.monster) {
                stats.current_hp -= damage;
            }
            events.push(CombatEvent::PlayerHit { roll, damage });
        } else {
            events.push(CombatEvent::PlayerMiss { roll });
        }
    }

    fn player_cast(
        &self,
        store: &mut EntityStore,
        dice: &mut dyn DiceRoller,
        name: &str,
        events: &mut Vec<CombatEvent>,
    ) {
        let spell = store
            .spell_book(self.player)
            .and_then(|book| book.spells.iter().find(|spell| spell.name == name).cloned());
        let Some(spell) = spell else {
            events.push(CombatEvent::ActionRefused {
                reason: format!("You do not know {name}."),
            });
            return;
        };
        match cast_spell(store, dice, self.player, Some(self.monster), &spell) {
            CastOutcome::Cast { roll, narration } => {
                events.push(CombatEvent::SpellCast { narration, roll })
            }
            CastOutcome::Fizzled { roll } => events.push(CombatEvent::SpellFizzled {
                name: spell.name.clone(),
                roll,
            }),
            CastOutcome::BookLocked => events.push(CombatEvent::ActionRefused {
                reason: "Your spell book is still sealed.".into(),
            }),
            CastOutcome::NotCastable => events.push(CombatEvent::ActionRefused {
                reason: format!("{} is beyond your wits.", spell.name),
            }),
            CastOutcome::CannotAfford => events.push(CombatEvent::ActionRefused {
                reason: format!("You cannot afford to cast {}.", spell.name),
            }),
        }
    }

    /// The monster acts after any round-consuming player action
    fn monster_turn(
        &self,
        store: &mut EntityStore,
        dice: &mut dyn DiceRoller,
        events: &mut Vec<CombatEvent>,
    ) {
        let Some(monster_stats) = store.stats(self.monster) else {
            return;
        };
        if monster_stats.current_hp <= 0 {
            return;
        }
        let av = monster_stats.av;
        let damage_mod = monster_stats.damage_mod;
        let name = store
            .info(self.monster)
            .map_or_else(|| "The monster".into(), |info| info.name.clone());

        let roll = dice.d100();
        if roll as i32 <= av {
            let defense = store.stats(self.player).map_or(0, |stats| stats.defense);
            let damage = (dice.d6() as i32 + damage_mod - defense).max(0);
            if let Some(stats) = store.stats_mut(self.player) {
                stats.current_hp -= damage;
            }
            events.push(CombatEvent::MonsterHit { name, roll, damage });
        } else {
            events.push(CombatEvent::MonsterMiss { name, roll });
        }
    }

    /// End-of-combat check, run after every round
    fn check_end(
        &mut self,
        store: &mut EntityStore,
        dice: &mut dyn DiceRoller,
        data: &GameData,
        events: &mut Vec<CombatEvent>,
    ) {
        let monster_dead = store.stats(self.monster).is_some_and(|stats| stats.current_hp <= 0);
        if monster_dead {
            let name = store
                .info(self.monster)
                .map_or_else(|| "The monster".into(), |info| info.name.clone());
            events.push(CombatEvent::MonsterDefeated { name });

            let loot_table = data
                .monsters
                .get(&self.monster_key)
                .map(|spec| spec.loot_table.clone())
                .unwrap_or_default();
            for drop in generate_loot(store, dice, self.player, &loot_table, &data.items) {
                events.push(CombatEvent::LootFound { name: drop.name });
            }

            store.remove_entity(self.monster);
            // Encounter-scoped stat changes (STR costs, defense buffs)
            // end with the encounter
            recompute_stats(store, self.player);
            self.status = CombatStatus::Over(CombatOutcome::Victory);
            return;
        }

        let player_dead = store.stats(self.player).is_some_and(|stats| stats.current_hp <= 0);
        if player_dead {
            let Some(info) = store.info_mut(self.player) else {
                return;
            };
            info.life_points -= 1;
            if info.life_points >= 0 {
                let remaining = info.life_points;
                if let Some(stats) = store.stats_mut(self.player) {
                    stats.current_hp = stats.max_hp;
                }
                events.push(CombatEvent::LifePointSpent { remaining });
            } else {
                events.push(CombatEvent::PlayerSlain);
                recompute_stats(store, self.player);
                self.status = CombatStatus::Over(CombatOutcome::Defeat);
            }
        }
    }
}
