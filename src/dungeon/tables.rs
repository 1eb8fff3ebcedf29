//! Roll tables for area and door generation
//!
//! Both tables are keyed by sparse integer entries in 1..=100 and are
//! consulted with a nearest-key lookup: the entry whose key is
//! numerically closest to the d100 roll wins. When two keys are
//! equidistant the lower key wins; the rule is arbitrary but must be
//! deterministic, so it is pinned here and tested.

use std::collections::BTreeMap;

use crate::core::types::{AreaKind, SkillId, StatId};

/// One side of an area layout (top, right, bottom, left order)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SideLayout {
    Wall,
    Open,
    Door,
}

/// An area-type table entry
#[derive(Debug, Clone)]
pub struct AreaTypeEntry {
    pub kind: AreaKind,
    pub layout: [SideLayout; 4],
}

/// The area-type roll table plus the fixed entrance entry
#[derive(Debug, Clone)]
pub struct AreaTable {
    pub entries: BTreeMap<u32, AreaTypeEntry>,
    pub entrance: AreaTypeEntry,
}

impl AreaTable {
    pub fn entry_for_roll(&self, roll: u32) -> Option<&AreaTypeEntry> {
        nearest_key(&self.entries, roll).and_then(|key| self.entries.get(&key))
    }
}

/// Kinds of door that guard an area exit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoorKind {
    Locked,
    TrapLocked,
    Jammed,
    Magic,
}

impl DoorKind {
    pub fn name(self) -> &'static str {
        match self {
            DoorKind::Locked => "Locked",
            DoorKind::TrapLocked => "Trap Locked",
            DoorKind::Jammed => "Jammed",
            DoorKind::Magic => "Magic",
        }
    }

    /// Failing the open test on these consumes a lock pick
    pub fn consumes_pick_on_failure(self) -> bool {
        matches!(self, DoorKind::Locked | DoorKind::TrapLocked)
    }
}

/// A door-type table entry: the test that opens it
#[derive(Debug, Clone)]
pub struct DoorEntry {
    pub code: String,
    pub kind: DoorKind,
    pub test_stat: StatId,
    pub modifier: i32,
    pub assisting: Vec<SkillId>,
}

/// The door roll table
#[derive(Debug, Clone)]
pub struct DoorTable {
    pub entries: BTreeMap<u32, DoorEntry>,
}

impl DoorTable {
    pub fn entry_for_roll(&self, roll: u32) -> Option<&DoorEntry> {
        nearest_key(&self.entries, roll).and_then(|key| self.entries.get(&key))
    }
}

/// The key numerically closest to `roll`; equidistant ties go to the
/// lower key
pub fn nearest_key<V>(entries: &BTreeMap<u32, V>, roll: u32) -> Option<u32> {
    let mut best: Option<(u32, u32)> = None;
    for &key in entries.keys() {
        let distance = key.abs_diff(roll);
        // Strict comparison keeps the first (lowest) key on a tie
        if best.map_or(true, |(_, best_distance)| distance < best_distance) {
            best = Some((key, distance));
        }
    }
    best.map(|(key, _)| key)
}
