//! A single play session
//!
//! Owns the entity store, the dungeon map and the dice stream, and
//! turns player inputs (move, search, open door, combat actions) into
//! synchronous state transitions. Strictly single-threaded and
//! turn-based; each input resolves completely before the next.

use crate::catalog::GameData;
use crate::combat::{CombatEvent, CombatOutcome, CombatResolver, CombatStatus, PlayerAction, RoundReport};
use crate::core::config::{GameConfig, TimeEvent};
use crate::core::types::{Direction, EntityId, HeroPath};
use crate::dungeon::templates::is_walkable;
use crate::dungeon::DungeonMap;
use crate::ecs::components::{
    Combatant, Equipment, Info, Inventory, ItemEffectKind, ItemSlot, Player, Position, Resources,
    Skills, SpellBook, Stats,
};
use crate::ecs::{Component, EntityStore};
use crate::rules::dice::DiceRoller;
use crate::rules::experience::LEVEL_UP_BONUS;
use crate::rules::spells::grant_sorcerer_spells;
use crate::rules::{perform_test, recompute_stats, sync_spellbook_unlock, TestOutcome};
use crate::session::build::{path_skills, race_skill, CharacterBuild};
use crate::session::log::{MessageLog, Tone};

/// What a movement input did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Stepped within the current area
    Moved,
    /// Crossed an exit into (possibly newly generated) area
    EnteredArea { coord: (i32, i32) },
    /// Wall, out of bounds, or no position
    Blocked,
    /// The exit is guarded by a door that is still shut
    DoorClosed(Direction),
    /// Movement is unavailable mid-encounter or after defeat
    Unavailable,
}

/// What a door attempt did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoorOutcome {
    NoDoor,
    AlreadyOpen,
    Opened { roll: u32 },
    StillShut { roll: u32, pick_lost: bool },
}

/// One running play session
pub struct GameSession {
    pub store: EntityStore,
    pub log: MessageLog,
    map: DungeonMap,
    data: GameData,
    config: GameConfig,
    dice: Box<dyn DiceRoller>,
    player: EntityId,
    ticks: u64,
    active_combat: Option<CombatResolver>,
    session_over: bool,
}

impl GameSession {
    /// Start a session from a finished character build
    pub fn new(
        build: &CharacterBuild,
        data: GameData,
        config: GameConfig,
        mut dice: Box<dyn DiceRoller>,
    ) -> Self {
        let map = DungeonMap::new(
            data.templates.clone(),
            data.area_table.clone(),
            data.door_table.clone(),
            dice.as_mut(),
        );
        let mut session = Self {
            store: EntityStore::new(),
            log: MessageLog::default(),
            map,
            data,
            config,
            dice,
            player: EntityId(0),
            ticks: 0,
            active_combat: None,
            session_over: false,
        };
        session.player = session.create_player(build);
        session.log.push("Welcome to the dungeon!", Tone::Good);
        session
    }

    fn create_player(&mut self, build: &CharacterBuild) -> EntityId {
        let player = self.store.create_entity();

        let entrance = self.map.templates().get(self.map.templates().entrance());
        let (start_x, start_y) = entrance.start_pos.unwrap_or((1, 1));
        self.store.add_component(player, Component::Position(Position::new(0, 0, start_x, start_y)));
        self.store.add_component(player, Component::Player(Player));
        self.store.add_component(player, Component::Combatant(Combatant));
        self.store.add_component(
            player,
            Component::Info(Info::adventurer(
                build.name.clone(),
                build.race,
                build.hero_path,
                build.info.life,
                build.info.rep,
                build.info.fate,
            )),
        );
        self.store.add_component(
            player,
            Component::Stats(Stats::new(build.stats.str, build.stats.dex, build.stats.int, build.stats.hp)),
        );
        self.store.add_component(player, Component::Inventory(Inventory::default()));
        self.store.add_component(player, Component::Equipment(Equipment::default()));
        self.store.add_component(player, Component::SpellBook(SpellBook::default()));

        let mut skills = Skills::default();
        for skill in path_skills(build.hero_path) {
            skills.get_mut(skill).bonus += LEVEL_UP_BONUS;
        }
        skills.get_mut(race_skill(build.race)).bonus += LEVEL_UP_BONUS;
        for &skill in &build.skills_choice {
            skills.get_mut(skill).bonus += LEVEL_UP_BONUS;
        }
        self.store.add_component(player, Component::Skills(skills));

        // A build with starting equipment begins with empty pouches and
        // lets the gear stock them; otherwise the standard provisions
        let resources = if build.starting_equipment.is_empty() {
            Resources::new(self.config.starting_oil, self.config.starting_food, self.config.starting_picks)
        } else {
            Resources::new(0, 0, 0)
        };
        self.store.add_component(player, Component::Resources(resources));

        self.issue_starting_gear(player, build);
        recompute_stats(&mut self.store, player);

        if sync_spellbook_unlock(&mut self.store, player) == Some(true) {
            self.log.push("Spell book unlocked! (Intelligence 50+)", Tone::Good);
        }
        if build.hero_path == HeroPath::Sorcerer {
            let names = grant_sorcerer_spells(&mut self.store, player, &self.data.spells);
            if !names.is_empty() {
                self.log.push(format!("Starting spells: {}", names.join(", ")), Tone::Good);
            }
        }
        player
    }

    /// Mint starting items: gear auto-equips into empty slots,
    /// provision consumables stock the pouches, the rest goes into the
    /// backpack
    fn issue_starting_gear(&mut self, player: EntityId, build: &CharacterBuild) {
        for entry in &build.starting_equipment {
            let Some(spec) = self.data.items.get(&entry.category).and_then(|specs| specs.get(&entry.key))
            else {
                tracing::warn!(category = %entry.category, key = %entry.key, "starting item not in catalog");
                continue;
            };
            let item = spec.to_item();
            match item.slot {
                ItemSlot::Gear(slot) => {
                    let item_id = self.store.create_entity();
                    self.store.add_component(item_id, Component::Item(item));
                    let equipment = self.store.equipment_mut(player);
                    match equipment {
                        Some(equipment) if equipment.get(slot).is_none() => {
                            equipment.set(slot, item_id);
                        }
                        _ => {
                            if let Some(inventory) = self.store.inventory_mut(player) {
                                inventory.items.push(item_id);
                            }
                        }
                    }
                }
                ItemSlot::Consumable => match item.effect.map(|effect| (effect.kind, effect.value)) {
                    Some((ItemEffectKind::AddOil, value)) => {
                        if let Some(resources) = self.store.resources_mut(player) {
                            resources.oil += value;
                        }
                    }
                    Some((ItemEffectKind::AddFood, value)) => {
                        if let Some(resources) = self.store.resources_mut(player) {
                            resources.food += value;
                        }
                    }
                    Some((ItemEffectKind::AddPicks, value)) => {
                        if let Some(resources) = self.store.resources_mut(player) {
                            resources.picks += value;
                        }
                    }
                    _ => {
                        let item_id = self.store.create_entity();
                        self.store.add_component(item_id, Component::Item(item));
                        if let Some(inventory) = self.store.inventory_mut(player) {
                            inventory.items.push(item_id);
                        }
                    }
                },
                ItemSlot::Junk => {
                    let item_id = self.store.create_entity();
                    self.store.add_component(item_id, Component::Item(item));
                    if let Some(inventory) = self.store.inventory_mut(player) {
                        inventory.items.push(item_id);
                    }
                }
            }
        }
    }

    pub fn player(&self) -> EntityId {
        self.player
    }

    pub fn map(&self) -> &DungeonMap {
        &self.map
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn in_combat(&self) -> bool {
        self.active_combat.is_some()
    }

    pub fn is_over(&self) -> bool {
        self.session_over
    }

    /// Advance the time track; every third tick costs provisions or
    /// spawns a wandering monster, and tick 36 wraps the track
    pub fn advance_turn(&mut self, ticks: u64) -> Option<TimeEvent> {
        self.ticks += ticks;
        self.log.push(format!("Time advances... ({})", self.ticks), Tone::Info);

        let event = self.config.time_marker(self.ticks);
        match event {
            Some(TimeEvent::OilBurn) => {
                let resources = self.store.resources_mut(self.player);
                match resources {
                    Some(resources) if resources.oil > 0 => {
                        resources.oil -= 1;
                        self.log.push("You use a flask of oil.", Tone::Info);
                    }
                    _ => self.log.push("You are out of oil! It's getting dark...", Tone::Bad),
                }
            }
            Some(TimeEvent::FoodRation) => {
                let resources = self.store.resources_mut(self.player);
                match resources {
                    Some(resources) if resources.food > 0 => {
                        resources.food -= 1;
                        self.log.push("You eat some rations.", Tone::Info);
                    }
                    _ => self.log.push("You are hungry and weak!", Tone::Bad),
                }
            }
            Some(TimeEvent::WanderingMonster) => {
                self.log.push("A wandering monster appears!", Tone::Bad);
                self.start_combat();
            }
            Some(TimeEvent::TrackEnd) => {
                self.ticks = 0;
            }
            None => {}
        }
        event
    }

    /// Move one tile; crossing an exit generates and enters the next
    /// area
    pub fn move_player(&mut self, direction: Direction) -> MoveOutcome {
        if self.session_over || self.in_combat() {
            return MoveOutcome::Unavailable;
        }
        let Some(pos) = self.store.position(self.player).copied() else {
            return MoveOutcome::Blocked;
        };
        let (dx, dy) = direction.offset();
        let (next_x, next_y) = (pos.local_x + dx, pos.local_y + dy);

        let (tile, exit, door_shut) = {
            let Some(area) = self.map.get_area(pos.world_x, pos.world_y) else {
                return MoveOutcome::Blocked;
            };
            let template = self.map.template_of(area);
            let Some(tile) = template.tile(next_x, next_y) else {
                return MoveOutcome::Blocked;
            };
            let exit = template.exit_at(next_x, next_y);
            let door_shut = exit
                .and_then(|exit| area.doors.get(&exit))
                .is_some_and(|door| !door.is_open);
            (tile, exit, door_shut)
        };
        if !is_walkable(tile) {
            return MoveOutcome::Blocked;
        }

        let Some(exit) = exit else {
            if let Some(pos) = self.store.position_mut(self.player) {
                pos.local_x = next_x;
                pos.local_y = next_y;
            }
            self.advance_turn(1);
            return MoveOutcome::Moved;
        };

        if door_shut {
            self.log.push("The door is shut fast.", Tone::Warning);
            return MoveOutcome::DoorClosed(exit);
        }

        // Cross into the adjacent area, generating it on first entry
        let (wdx, wdy) = exit.offset();
        let coord = (pos.world_x + wdx, pos.world_y + wdy);
        let entry_dir = exit.opposite();
        let template_idx = self
            .map
            .generate_area(coord.0, coord.1, Some(entry_dir), self.dice.as_mut())
            .template;

        let template = self.map.templates().get(template_idx);
        // Degraded selections may lack the matching exit; land on the
        // room's start position (or a safe corner) instead
        let (entry_x, entry_y) = template
            .exits
            .get(&entry_dir)
            .copied()
            .or(template.start_pos)
            .unwrap_or((1, 1));

        if let Some(pos) = self.store.position_mut(self.player) {
            pos.world_x = coord.0;
            pos.world_y = coord.1;
            pos.local_x = entry_x;
            pos.local_y = entry_y;
        }
        self.log.push("You enter a new area.", Tone::Good);
        self.advance_turn(1);
        MoveOutcome::EnteredArea { coord }
    }

    /// Search the current area once; searching takes five ticks
    pub fn search_area(&mut self) -> bool {
        if self.session_over || self.in_combat() {
            return false;
        }
        let Some(pos) = self.store.position(self.player).copied() else {
            return false;
        };
        let already = self
            .map
            .get_area(pos.world_x, pos.world_y)
            .map_or(true, |area| area.has_been_searched);
        if already {
            self.log.push("You've already searched here.", Tone::Info);
            return false;
        }
        self.advance_turn(self.config.search_ticks);
        self.log.push("You search the area...", Tone::Good);
        if let Some(area) = self.map.get_area_mut(pos.world_x, pos.world_y) {
            area.has_been_searched = true;
        }
        true
    }

    /// Attempt the test on the door guarding `direction` in the
    /// current area
    ///
    /// Failure on a (trap-)locked door spends a pick when one is held;
    /// running dry is narrated, not an error.
    pub fn try_open_door(&mut self, direction: Direction) -> DoorOutcome {
        let Some(pos) = self.store.position(self.player).copied() else {
            return DoorOutcome::NoDoor;
        };
        let door = self
            .map
            .get_area(pos.world_x, pos.world_y)
            .and_then(|area| area.doors.get(&direction));
        let Some(door) = door else {
            return DoorOutcome::NoDoor;
        };
        if door.is_open {
            return DoorOutcome::AlreadyOpen;
        }
        let (stat, modifier, kind) = (door.test_stat, door.modifier, door.kind);
        let assisting = door.assisting.clone();

        let TestOutcome { success, roll, .. } = perform_test(
            &mut self.store,
            self.dice.as_mut(),
            self.player,
            stat,
            modifier,
            &assisting,
        );

        if success {
            if let Some(door) = self
                .map
                .get_area_mut(pos.world_x, pos.world_y)
                .and_then(|area| area.doors.get_mut(&direction))
            {
                door.is_open = true;
            }
            self.log.push(format!("Success! The door opens. (Rolled {roll})"), Tone::Good);
            DoorOutcome::Opened { roll }
        } else {
            self.log.push(format!("Failure! The door remains shut. (Rolled {roll})"), Tone::Bad);
            let mut pick_lost = false;
            if kind.consumes_pick_on_failure() {
                match self.store.resources_mut(self.player) {
                    Some(resources) if resources.picks > 0 => {
                        resources.picks -= 1;
                        pick_lost = true;
                        self.log.push("You lost a pick.", Tone::Warning);
                    }
                    _ => self.log.push("You have no picks left to lose.", Tone::Warning),
                }
            }
            DoorOutcome::StillShut { roll, pick_lost }
        }
    }

    /// Spawn a monster from the catalog and open an encounter
    pub fn start_combat(&mut self) {
        if self.active_combat.is_some() || self.data.monsters.is_empty() {
            return;
        }
        let keys: Vec<&String> = self.data.monsters.keys().collect();
        let key = keys[self.dice.pick(keys.len())].clone();
        let spec = &self.data.monsters[&key];

        let monster = self.store.create_entity();
        self.store.add_component(monster, Component::Combatant(Combatant));
        self.store.add_component(monster, Component::Info(Info::named(spec.name.clone())));
        self.store.add_component(
            monster,
            Component::Stats(Stats::monster(spec.hp.base_hp(), spec.av, spec.defense, spec.damage_mod)),
        );

        self.log.push("Combat has begun!", Tone::Bad);
        self.active_combat = Some(CombatResolver::new(self.player, monster, key));
    }

    /// Feed one player action to the active encounter
    pub fn combat_action(&mut self, action: PlayerAction) -> Option<RoundReport> {
        let resolver = self.active_combat.as_mut()?;
        let report = resolver.resolve_round(&mut self.store, self.dice.as_mut(), &self.data, action);
        for event in &report.events {
            let tone = match event {
                CombatEvent::PlayerHit { .. }
                | CombatEvent::LootFound { .. }
                | CombatEvent::MonsterDefeated { .. }
                | CombatEvent::MonsterMiss { .. } => Tone::Good,
                CombatEvent::MonsterHit { .. }
                | CombatEvent::PlayerSlain
                | CombatEvent::SpellFizzled { .. } => Tone::Bad,
                CombatEvent::LifePointSpent { .. } | CombatEvent::ActionRefused { .. } => {
                    Tone::Warning
                }
                _ => Tone::Info,
            };
            self.log.push(event.to_string(), tone);
        }

        match report.status {
            CombatStatus::Over(CombatOutcome::Victory) => {
                if let Some(pos) = self.store.position(self.player).copied() {
                    if let Some(area) = self.map.get_area_mut(pos.world_x, pos.world_y) {
                        area.mark_cleared();
                        self.log.push("The area is now clear.", Tone::Good);
                    }
                }
                self.active_combat = None;
            }
            CombatStatus::Over(CombatOutcome::Defeat) => {
                self.active_combat = None;
                self.session_over = true;
            }
            CombatStatus::AwaitingPlayerAction => {}
        }
        Some(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::defaults;
    use crate::core::types::{Race, SkillId, StatId};
    use crate::rules::dice::ScriptedDice;
    use crate::session::build::StartingItem;

    fn warrior_build() -> CharacterBuild {
        CharacterBuild::assemble(
            "Wulfric",
            Race::Human,
            HeroPath::Warrior,
            [StatId::Str, StatId::Dex, StatId::Int],
            vec![SkillId::Dodge],
            &GameConfig::default(),
        )
    }

    fn new_session(rolls: Vec<u32>) -> GameSession {
        let data = defaults::default_game_data().unwrap();
        GameSession::new(
            &warrior_build(),
            data,
            GameConfig::default(),
            Box::new(ScriptedDice::new(rolls)),
        )
    }

    #[test]
    fn test_player_spawns_at_entrance_start() {
        let session = new_session(vec![]);
        let pos = session.store.position(session.player()).unwrap();
        assert_eq!((pos.world_x, pos.world_y), (0, 0));
        assert_eq!((pos.local_x, pos.local_y), (9, 4));
    }

    #[test]
    fn test_path_and_race_seed_skills() {
        let session = new_session(vec![]);
        let skills = session.store.skills(session.player()).unwrap();
        assert_eq!(skills.bonus(SkillId::Bravery), 5);
        assert_eq!(skills.bonus(SkillId::Escape), 5);
        assert_eq!(skills.bonus(SkillId::Aware), 5);
        assert_eq!(skills.bonus(SkillId::Dodge), 5);
        assert_eq!(skills.bonus(SkillId::Locks), 0);
    }

    #[test]
    fn test_no_starting_gear_means_standard_provisions() {
        let session = new_session(vec![]);
        let resources = session.store.resources(session.player()).unwrap();
        assert_eq!((resources.oil, resources.food, resources.picks), (20, 10, 15));
    }

    #[test]
    fn test_starting_gear_auto_equips() {
        let data = defaults::default_game_data().unwrap();
        let mut build = warrior_build();
        build.starting_equipment = vec![
            StartingItem { category: "weapons".into(), key: "short_sword".into() },
            StartingItem { category: "items".into(), key: "oil_flask".into() },
        ];
        let session = GameSession::new(
            &build,
            data,
            GameConfig::default(),
            Box::new(ScriptedDice::new(vec![])),
        );

        let stats = session.store.stats(session.player()).unwrap();
        assert_eq!(stats.damage_mod, 2, "sword bonuses aggregated");
        let resources = session.store.resources(session.player()).unwrap();
        assert_eq!(resources.oil, 1, "flask stocked the pouch");
        assert_eq!(resources.food, 0);
    }

    #[test]
    fn test_walls_block_movement() {
        let mut session = new_session(vec![]);
        // From (9, 4) there are three open tiles south before the wall
        for _ in 0..3 {
            assert_eq!(session.move_player(Direction::South), MoveOutcome::Moved);
        }
        assert_eq!(session.move_player(Direction::South), MoveOutcome::Blocked);
    }

    #[test]
    fn test_crossing_the_north_exit_generates_an_area() {
        // Entrance start is (9, 4); the north exit is at (9, 0).
        // Rolls: 4 moves consume no dice; generation consumes an area
        // roll, a template pick, then door rolls as needed.
        let mut session = new_session(vec![3, 0, 50, 50]);
        for _ in 0..3 {
            assert_eq!(session.move_player(Direction::North), MoveOutcome::Moved);
        }
        let outcome = session.move_player(Direction::North);
        assert_eq!(outcome, MoveOutcome::EnteredArea { coord: (0, -1) });

        let pos = session.store.position(session.player()).unwrap();
        assert_eq!((pos.world_x, pos.world_y), (0, -1));
        let area = session.map().get_area(0, -1).unwrap();
        let template = session.map().templates().get(area.template);
        assert!(template.has_exit(Direction::South), "entered from the south");
        assert_eq!((pos.local_x, pos.local_y), template.exits[&Direction::South]);
    }

    #[test]
    fn test_search_is_once_per_area() {
        let mut session = new_session(vec![]);
        assert!(session.search_area());
        assert_eq!(session.ticks(), 5);
        assert!(!session.search_area(), "second search is refused");
        assert_eq!(session.ticks(), 5);
    }

    #[test]
    fn test_time_track_consumes_oil() {
        let mut session = new_session(vec![]);
        session.advance_turn(3);
        let resources = session.store.resources(session.player()).unwrap();
        assert_eq!(resources.oil, 19);
        assert!(session.log.contains("flask of oil"));
    }

    #[test]
    fn test_wandering_monster_opens_combat() {
        // pick(4 monsters) = 1 → "goblin" (BTreeMap order)
        let mut session = new_session(vec![1]);
        session.advance_turn(9);
        assert!(session.in_combat());
        assert!(session.log.contains("wandering monster"));
    }

    #[test]
    fn test_combat_victory_clears_area() {
        let mut session = new_session(vec![1]);
        session.advance_turn(9);
        assert!(session.in_combat());
        // Whittle the goblin down deterministically
        if let Some(resolver) = session.active_combat.as_ref() {
            let monster = resolver.monster();
            session.store.stats_mut(monster).unwrap().current_hp = 1;
        }
        // attack 40 hits (adj STR 60), d6 6 - def 2 = 4 kills; loot picks
        session.dice = Box::new(ScriptedDice::new(vec![40, 6, 0, 0]));
        let report = session.combat_action(PlayerAction::Attack).unwrap();
        assert_eq!(report.status, CombatStatus::Over(CombatOutcome::Victory));
        assert!(!session.in_combat());
        let area = session.map().get_area(0, 0).unwrap();
        assert_eq!(area.kind, crate::core::types::AreaKind::CLEARED);
        assert!(session.log.contains("The area is now clear."));
    }

    #[test]
    fn test_defeat_ends_the_session() {
        let mut session = new_session(vec![1]);
        session.advance_turn(9);
        session.store.info_mut(session.player()).unwrap().life_points = 0;
        session.store.stats_mut(session.player()).unwrap().current_hp = 1;
        // player miss (90), goblin hit (10), d6 6 → overkill
        session.dice = Box::new(ScriptedDice::new(vec![90, 10, 6]));
        let report = session.combat_action(PlayerAction::Attack).unwrap();
        assert_eq!(report.status, CombatStatus::Over(CombatOutcome::Defeat));
        assert!(session.is_over());
        assert_eq!(session.move_player(Direction::North), MoveOutcome::Unavailable);
    }
}
