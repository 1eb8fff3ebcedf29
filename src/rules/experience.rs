//! Experience pips and leveling
//!
//! Stats and skills progress through 10-slot pip tracks. Attunement
//! doubles every award; skills additionally cost two pips per award.
//! A full track levels up: +5 to the primary value (or skill bonus)
//! and the track resets to empty.

use crate::core::types::{EntityId, SkillId, StatId};
use crate::ecs::EntityStore;
use crate::rules::aggregation::recompute_stats;

/// Bonus granted when a pip track fills
pub const LEVEL_UP_BONUS: i32 = 5;

/// Pip multiplier for awards to assisted skills
pub const SKILL_PIP_COST: u32 = 2;

/// Award pips to a characteristic; returns true if it leveled up
///
/// A level-up raises the primary value and immediately recomputes the
/// equipment-derived aggregates so adj_*/max_hp stay consistent.
pub fn award_stat_xp(store: &mut EntityStore, entity: EntityId, stat: StatId, pips: u32) -> bool {
    let Some(stats) = store.stats_mut(entity) else {
        return false;
    };
    let pips = if stats.is_attuned(stat) { pips * 2 } else { pips };
    let track = stats.xp_track_mut(stat);
    track.add_pips(pips);
    if !track.is_full() {
        return false;
    }
    track.clear();
    *stats.primary_mut(stat) += LEVEL_UP_BONUS;
    recompute_stats(store, entity);
    true
}

/// Award pips to a skill; returns true if it leveled up
pub fn award_skill_xp(store: &mut EntityStore, entity: EntityId, skill: SkillId, pips: u32) -> bool {
    let Some(skills) = store.skills_mut(entity) else {
        return false;
    };
    let state = skills.get_mut(skill);
    let pips = if state.attuned { pips * 2 } else { pips };
    state.pips.add_pips(pips * SKILL_PIP_COST);
    if !state.pips.is_full() {
        return false;
    }
    state.pips.clear();
    state.bonus += LEVEL_UP_BONUS;
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::components::{Equipment, Skills, SpellBook, Stats};
    use crate::ecs::Component;

    fn adventurer(store: &mut EntityStore) -> EntityId {
        let id = store.create_entity();
        store.add_component(id, Component::Stats(Stats::new(30, 30, 30, 20)));
        store.add_component(id, Component::Skills(Skills::default()));
        store.add_component(id, Component::Equipment(Equipment::default()));
        store.add_component(id, Component::SpellBook(SpellBook::default()));
        id
    }

    #[test]
    fn test_nine_pips_do_not_level() {
        let mut store = EntityStore::new();
        let hero = adventurer(&mut store);
        for _ in 0..9 {
            assert!(!award_stat_xp(&mut store, hero, StatId::Str, 1));
        }
        assert_eq!(store.stats(hero).unwrap().primary_str, 30);
        assert_eq!(store.stats(hero).unwrap().xp_track(StatId::Str).filled(), 9);
    }

    #[test]
    fn test_ten_pips_level_exactly_once() {
        let mut store = EntityStore::new();
        let hero = adventurer(&mut store);
        let mut level_ups = 0;
        for _ in 0..10 {
            if award_stat_xp(&mut store, hero, StatId::Str, 1) {
                level_ups += 1;
            }
        }
        assert_eq!(level_ups, 1);
        let stats = store.stats(hero).unwrap();
        assert_eq!(stats.primary_str, 35);
        assert_eq!(stats.xp_track(StatId::Str).filled(), 0, "track resets on level-up");
        assert_eq!(stats.adj_str, 35, "aggregates recomputed immediately");
    }

    #[test]
    fn test_attuned_stat_earns_double() {
        let mut store = EntityStore::new();
        let hero = adventurer(&mut store);
        store.stats_mut(hero).unwrap().set_attuned(StatId::Dex, true);
        award_stat_xp(&mut store, hero, StatId::Dex, 2);
        assert_eq!(store.stats(hero).unwrap().xp_track(StatId::Dex).filled(), 4);
    }

    #[test]
    fn test_skill_award_costs_two_pips() {
        let mut store = EntityStore::new();
        let hero = adventurer(&mut store);
        award_skill_xp(&mut store, hero, SkillId::Locks, 1);
        assert_eq!(store.skills(hero).unwrap().get(SkillId::Locks).pips.filled(), 2);
    }

    #[test]
    fn test_attuned_skill_award_costs_four() {
        let mut store = EntityStore::new();
        let hero = adventurer(&mut store);
        store.skills_mut(hero).unwrap().get_mut(SkillId::Magic).attuned = true;
        award_skill_xp(&mut store, hero, SkillId::Magic, 1);
        assert_eq!(store.skills(hero).unwrap().get(SkillId::Magic).pips.filled(), 4);
    }

    #[test]
    fn test_skill_levels_after_five_awards() {
        let mut store = EntityStore::new();
        let hero = adventurer(&mut store);
        for _ in 0..4 {
            assert!(!award_skill_xp(&mut store, hero, SkillId::Dodge, 1));
        }
        assert!(award_skill_xp(&mut store, hero, SkillId::Dodge, 1));
        let state = store.skills(hero).unwrap().get(SkillId::Dodge);
        assert_eq!(state.bonus, LEVEL_UP_BONUS);
        assert_eq!(state.pips.filled(), 0);
    }

    #[test]
    fn test_missing_components_award_nothing() {
        let mut store = EntityStore::new();
        let bare = store.create_entity();
        assert!(!award_stat_xp(&mut store, bare, StatId::Str, 1));
        assert!(!award_skill_xp(&mut store, bare, SkillId::Lucky, 1));
    }
}
