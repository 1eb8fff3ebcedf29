//! The dungeon map: lazily generated, coordinate-addressed areas
//!
//! Areas exist only once traversal has generated them; regenerating an
//! existing coordinate returns the cached area with no side effects.
//! Each generated area's tiles are stitched into a global tile map in
//! which adjacent rooms overlap by exactly one tile (the shared door
//! tile).

use ahash::AHashMap;

use crate::core::types::{AreaKind, Direction, SkillId, StatId};
use crate::dungeon::tables::{AreaTable, DoorEntry, DoorKind, DoorTable, SideLayout};
use crate::dungeon::templates::{RoomTemplate, TemplateCatalog, DOOR_TILE};
use crate::rules::dice::DiceRoller;

/// A door guarding one side of an area
///
/// Created once at area generation; only `is_open` ever changes, on a
/// successful open test.
#[derive(Debug, Clone)]
pub struct Door {
    pub code: String,
    pub kind: DoorKind,
    pub test_stat: StatId,
    pub modifier: i32,
    pub assisting: Vec<SkillId>,
    pub is_open: bool,
}

impl Door {
    fn from_entry(entry: &DoorEntry) -> Self {
        Self {
            code: entry.code.clone(),
            kind: entry.kind,
            test_stat: entry.test_stat,
            modifier: entry.modifier,
            assisting: entry.assisting.clone(),
            is_open: false,
        }
    }
}

/// One generated room/corridor node in the dungeon
#[derive(Debug, Clone)]
pub struct Area {
    pub coord: (i32, i32),
    pub kind: AreaKind,
    pub layout: [SideLayout; 4],
    pub doors: AHashMap<Direction, Door>,
    pub has_been_searched: bool,
    pub template: usize,
}

impl Area {
    /// Flip to the cleared kind after a guarded encounter is won
    pub fn mark_cleared(&mut self) {
        self.kind = AreaKind::CLEARED;
    }
}

/// All discovered areas plus the stitched global tile map
pub struct DungeonMap {
    catalog: TemplateCatalog,
    area_table: AreaTable,
    door_table: DoorTable,
    areas: AHashMap<(i32, i32), Area>,
    tiles: AHashMap<(i32, i32), char>,
}

impl DungeonMap {
    /// Create the map and generate the entrance area at (0, 0)
    ///
    /// The entrance always uses the table's fixed entrance entry and the
    /// catalog's entrance template; only its doors (if the entrance
    /// layout declares any) consume dice.
    pub fn new(
        catalog: TemplateCatalog,
        area_table: AreaTable,
        door_table: DoorTable,
        dice: &mut dyn DiceRoller,
    ) -> Self {
        let mut map = Self {
            catalog,
            area_table,
            door_table,
            areas: AHashMap::new(),
            tiles: AHashMap::new(),
        };
        let entry = map.area_table.entrance.clone();
        let template = map.catalog.entrance();
        map.instantiate((0, 0), entry.kind, entry.layout, template, dice);
        map
    }

    pub fn get_area(&self, x: i32, y: i32) -> Option<&Area> {
        self.areas.get(&(x, y))
    }

    pub fn get_area_mut(&mut self, x: i32, y: i32) -> Option<&mut Area> {
        self.areas.get_mut(&(x, y))
    }

    pub fn template_of(&self, area: &Area) -> &RoomTemplate {
        self.catalog.get(area.template)
    }

    pub fn templates(&self) -> &TemplateCatalog {
        &self.catalog
    }

    /// The stitched tile at global coordinates, if discovered
    pub fn get_world_tile(&self, world_x: i32, world_y: i32) -> Option<char> {
        self.tiles.get(&(world_x, world_y)).copied()
    }

    /// Global tile coordinate of a local tile in `area`
    pub fn local_to_world(&self, area: &Area, local_x: i32, local_y: i32) -> (i32, i32) {
        let template = self.template_of(area);
        local_to_world(area.coord, (template.width(), template.height()), (local_x, local_y))
    }

    /// Local tile coordinate in `area` of a global tile
    pub fn world_to_local(&self, area: &Area, world_x: i32, world_y: i32) -> (i32, i32) {
        let template = self.template_of(area);
        world_to_local(area.coord, (template.width(), template.height()), (world_x, world_y))
    }

    /// Generate the area at (x, y), or return it if already generated
    ///
    /// `required_exit` is the side the player enters through (the
    /// opposite of the direction they left the previous area); the
    /// chosen template must expose it. Re-requesting a generated
    /// coordinate short-circuits with no rolls and no new doors.
    pub fn generate_area(
        &mut self,
        x: i32,
        y: i32,
        required_exit: Option<Direction>,
        dice: &mut dyn DiceRoller,
    ) -> &Area {
        if self.areas.contains_key(&(x, y)) {
            return &self.areas[&(x, y)];
        }

        let roll = dice.d100();
        let entry = self
            .area_table
            .entry_for_roll(roll)
            .cloned()
            .unwrap_or_else(|| self.area_table.entrance.clone());

        let template = self.select_template(required_exit, dice);
        self.instantiate((x, y), entry.kind, entry.layout, template, dice)
    }

    /// Pick a template exposing the required exit; with no match, fall
    /// back to any non-entrance template and surface a diagnostic
    fn select_template(&self, required_exit: Option<Direction>, dice: &mut dyn DiceRoller) -> usize {
        let mut candidates = match required_exit {
            Some(direction) => self.catalog.candidates_with_exit(direction),
            None => Vec::new(),
        };
        if candidates.is_empty() {
            if let Some(direction) = required_exit {
                tracing::warn!(
                    direction = direction.name(),
                    "no room template with required exit; picking an unconstrained room"
                );
            }
            candidates = self.catalog.non_entrance();
        }
        candidates[dice.pick(candidates.len())]
    }

    fn instantiate(
        &mut self,
        coord: (i32, i32),
        kind: AreaKind,
        layout: [SideLayout; 4],
        template: usize,
        dice: &mut dyn DiceRoller,
    ) -> &Area {
        // One independent d100 per door side, nearest-key matched
        let mut doors = AHashMap::new();
        for (side, &side_layout) in layout.iter().enumerate() {
            if side_layout == SideLayout::Door {
                let roll = dice.d100();
                if let Some(entry) = self.door_table.entry_for_roll(roll) {
                    doors.insert(Direction::SIDES[side], Door::from_entry(entry));
                }
            }
        }

        self.stitch_tiles(coord, template);

        let area = Area {
            coord,
            kind,
            layout,
            doors,
            has_been_searched: false,
            template,
        };
        self.areas.insert(coord, area);
        &self.areas[&coord]
    }

    /// Merge a template's tiles into the global map
    ///
    /// Adjacent rooms share their edge tile, so an already-present tile
    /// is only overwritten by an incoming door tile.
    fn stitch_tiles(&mut self, coord: (i32, i32), template: usize) {
        let template = self.catalog.get(template);
        let dims = (template.width(), template.height());
        for (local_x, local_y, tile) in template.tiles() {
            let world = local_to_world(coord, dims, (local_x, local_y));
            match self.tiles.get(&world) {
                Some(_) if tile != DOOR_TILE => {}
                _ => {
                    self.tiles.insert(world, tile);
                }
            }
        }
    }
}

/// Global tile coordinate of a local tile: rooms overlap adjacent rooms
/// by one tile per axis, so the stride is `dimension - 1`
pub fn local_to_world(coord: (i32, i32), dims: (i32, i32), local: (i32, i32)) -> (i32, i32) {
    (coord.0 * (dims.0 - 1) + local.0, coord.1 * (dims.1 - 1) + local.1)
}

/// Inverse of `local_to_world` for a known area
pub fn world_to_local(coord: (i32, i32), dims: (i32, i32), world: (i32, i32)) -> (i32, i32) {
    (world.0 - coord.0 * (dims.0 - 1), world.1 - coord.1 * (dims.1 - 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::defaults;
    use crate::rules::dice::{ScriptedDice, SeededDice};

    fn test_map(dice: &mut dyn DiceRoller) -> DungeonMap {
        let data = defaults::default_game_data().expect("default data must parse");
        DungeonMap::new(data.templates, data.area_table, data.door_table, dice)
    }

    #[test]
    fn test_entrance_exists_at_origin() {
        let mut dice = SeededDice::new(1);
        let map = test_map(&mut dice);
        let entrance = map.get_area(0, 0).expect("entrance generated at construction");
        assert_eq!(entrance.coord, (0, 0));
        assert_eq!(map.template_of(entrance).name, "start_room");
    }

    #[test]
    fn test_generated_area_exposes_required_exit() {
        let mut dice = SeededDice::new(99);
        let mut map = test_map(&mut dice);
        for (y, direction) in [(-1, Direction::South), (-2, Direction::North)] {
            let template = map.generate_area(0, y, Some(direction), &mut dice).template;
            assert!(
                map.templates().get(template).has_exit(direction),
                "template must expose the entrance direction"
            );
        }
    }

    #[test]
    fn test_regeneration_returns_cached_area() {
        let mut dice = ScriptedDice::new([50, 0, 10, 20]);
        let mut map = test_map(&mut dice);
        let first = map.generate_area(0, -1, Some(Direction::South), &mut dice).clone();
        let consumed = dice.remaining();
        let second = map.generate_area(0, -1, Some(Direction::South), &mut dice);

        assert_eq!(dice.remaining(), consumed, "cached return must not roll");
        assert_eq!(second.template, first.template);
        assert_eq!(second.doors.len(), first.doors.len());
    }

    #[test]
    fn test_world_tile_conversions_roundtrip() {
        let mut dice = SeededDice::new(3);
        let mut map = test_map(&mut dice);
        map.generate_area(0, -1, Some(Direction::South), &mut dice);
        let area = map.get_area(0, -1).unwrap().clone();

        let (wx, wy) = map.local_to_world(&area, 3, 2);
        assert_eq!(map.world_to_local(&area, wx, wy), (3, 2));
    }

    #[test]
    fn test_stitching_stride_overlaps_one_tile() {
        // With dims (5, 5), x stride is 4: room 1's local 0 lands on
        // room 0's local 4.
        assert_eq!(local_to_world((1, 0), (5, 5), (0, 2)), local_to_world((0, 0), (5, 5), (4, 2)));
    }
}
