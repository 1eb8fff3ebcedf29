//! The d100 test, the single resolution mechanic every action uses

use crate::core::types::{EntityId, SkillId, StatId};
use crate::ecs::EntityStore;
use crate::rules::dice::DiceRoller;
use crate::rules::experience::{award_skill_xp, award_stat_xp};

/// A d100 roll at or below this grants experience, independent of the
/// test's outcome
pub const XP_ROLL_THRESHOLD: u32 = 10;

/// Outcome of one d100 test
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TestOutcome {
    pub success: bool,
    pub roll: u32,
    pub target: i32,
}

/// Perform a d100 test against a characteristic
///
/// Target is the adjusted characteristic plus a flat modifier plus the
/// bonuses of each assisting skill. A roll of 1 always succeeds and 100
/// always fails, regardless of target; otherwise success means rolling
/// at or under the target. A roll of 1..=10 grants one experience pip
/// to the characteristic and each assisting skill as a side effect,
/// before the outcome is decided.
pub fn perform_test(
    store: &mut EntityStore,
    dice: &mut dyn DiceRoller,
    entity: EntityId,
    stat: StatId,
    modifier: i32,
    assisting: &[SkillId],
) -> TestOutcome {
    let mut target = store.stats(entity).map_or(0, |stats| stats.adjusted(stat)) + modifier;
    if let Some(skills) = store.skills(entity) {
        for &skill in assisting {
            target += skills.bonus(skill);
        }
    }

    let roll = dice.d100();

    if roll <= XP_ROLL_THRESHOLD {
        award_stat_xp(store, entity, stat, 1);
        for &skill in assisting {
            award_skill_xp(store, entity, skill, 1);
        }
    }

    let success = match roll {
        1 => true,
        100 => false,
        _ => roll as i32 <= target,
    };
    TestOutcome { success, roll, target }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::components::{Equipment, Skills, SpellBook, Stats};
    use crate::ecs::Component;
    use crate::rules::dice::ScriptedDice;

    fn adventurer(store: &mut EntityStore, strength: i32) -> EntityId {
        let id = store.create_entity();
        store.add_component(id, Component::Stats(Stats::new(strength, 30, 30, 20)));
        store.add_component(id, Component::Skills(Skills::default()));
        store.add_component(id, Component::Equipment(Equipment::default()));
        store.add_component(id, Component::SpellBook(SpellBook::default()));
        id
    }

    #[test]
    fn test_roll_of_one_succeeds_and_awards_xp() {
        let mut store = EntityStore::new();
        let hero = adventurer(&mut store, 50);
        let mut dice = ScriptedDice::new([1]);

        let outcome = perform_test(&mut store, &mut dice, hero, StatId::Str, 0, &[]);
        assert!(outcome.success);
        assert_eq!(outcome.roll, 1);
        assert_eq!(store.stats(hero).unwrap().xp_track(StatId::Str).filled(), 1);
    }

    #[test]
    fn test_roll_of_one_beats_zero_target() {
        let mut store = EntityStore::new();
        let hero = adventurer(&mut store, 0);
        let mut dice = ScriptedDice::new([1]);
        assert!(perform_test(&mut store, &mut dice, hero, StatId::Str, 0, &[]).success);
    }

    #[test]
    fn test_roll_of_hundred_fails_any_target() {
        let mut store = EntityStore::new();
        let hero = adventurer(&mut store, 100);
        let mut dice = ScriptedDice::new([100]);
        let outcome = perform_test(&mut store, &mut dice, hero, StatId::Str, 50, &[]);
        assert!(!outcome.success);
    }

    #[test]
    fn test_target_hundred_succeeds_below_hundred() {
        let mut store = EntityStore::new();
        let hero = adventurer(&mut store, 100);
        let mut dice = ScriptedDice::new([99]);
        assert!(perform_test(&mut store, &mut dice, hero, StatId::Str, 0, &[]).success);
    }

    #[test]
    fn test_target_zero_fails_above_one() {
        let mut store = EntityStore::new();
        let hero = adventurer(&mut store, 0);
        let mut dice = ScriptedDice::new([2]);
        assert!(!perform_test(&mut store, &mut dice, hero, StatId::Str, 0, &[]).success);
    }

    #[test]
    fn test_assisting_skills_raise_target() {
        let mut store = EntityStore::new();
        let hero = adventurer(&mut store, 40);
        store.skills_mut(hero).unwrap().get_mut(SkillId::Locks).bonus = 10;
        store.skills_mut(hero).unwrap().get_mut(SkillId::Traps).bonus = 5;
        let mut dice = ScriptedDice::new([55]);

        let outcome = perform_test(
            &mut store,
            &mut dice,
            hero,
            StatId::Str,
            0,
            &[SkillId::Locks, SkillId::Traps],
        );
        assert_eq!(outcome.target, 55);
        assert!(outcome.success);
    }

    #[test]
    fn test_low_roll_feeds_assisting_skills() {
        let mut store = EntityStore::new();
        let hero = adventurer(&mut store, 40);
        let mut dice = ScriptedDice::new([7]);

        perform_test(&mut store, &mut dice, hero, StatId::Dex, 0, &[SkillId::Locks]);
        assert_eq!(store.stats(hero).unwrap().xp_track(StatId::Dex).filled(), 1);
        // Skill awards cost two pips each
        assert_eq!(store.skills(hero).unwrap().get(SkillId::Locks).pips.filled(), 2);
    }

    #[test]
    fn test_high_roll_grants_no_xp() {
        let mut store = EntityStore::new();
        let hero = adventurer(&mut store, 90);
        let mut dice = ScriptedDice::new([11]);

        let outcome = perform_test(&mut store, &mut dice, hero, StatId::Str, 0, &[]);
        assert!(outcome.success);
        assert_eq!(store.stats(hero).unwrap().xp_track(StatId::Str).filled(), 0);
    }
}
