//! Room templates: fixed tile layouts with declared exit points

use ahash::AHashMap;

use crate::core::error::{EngineError, Result};
use crate::core::types::Direction;

/// Tile characters the player can stand on
pub const WALKABLE_TILES: [char; 2] = ['.', 'D'];

/// The door tile; wins ties when stitching overlapping room edges into
/// the world tile map
pub const DOOR_TILE: char = 'D';

pub fn is_walkable(tile: char) -> bool {
    WALKABLE_TILES.contains(&tile)
}

/// A reusable room layout, instantiated into Areas by the generator
#[derive(Debug, Clone)]
pub struct RoomTemplate {
    pub name: String,
    rows: Vec<Vec<char>>,
    pub exits: AHashMap<Direction, (i32, i32)>,
    pub start_pos: Option<(i32, i32)>,
}

impl RoomTemplate {
    pub fn new(
        name: impl Into<String>,
        rows: Vec<String>,
        exits: AHashMap<Direction, (i32, i32)>,
        start_pos: Option<(i32, i32)>,
    ) -> Self {
        Self {
            name: name.into(),
            rows: rows.iter().map(|row| row.chars().collect()).collect(),
            exits,
            start_pos,
        }
    }

    pub fn width(&self) -> i32 {
        self.rows.first().map_or(0, |row| row.len() as i32)
    }

    pub fn height(&self) -> i32 {
        self.rows.len() as i32
    }

    pub fn tile(&self, x: i32, y: i32) -> Option<char> {
        if x < 0 || y < 0 {
            return None;
        }
        self.rows.get(y as usize)?.get(x as usize).copied()
    }

    /// The exit direction whose declared tile is (x, y), if any
    pub fn exit_at(&self, x: i32, y: i32) -> Option<Direction> {
        self.exits
            .iter()
            .find(|(_, &coord)| coord == (x, y))
            .map(|(&direction, _)| direction)
    }

    pub fn has_exit(&self, direction: Direction) -> bool {
        self.exits.contains_key(&direction)
    }

    /// All tiles with their local coordinates
    pub fn tiles(&self) -> impl Iterator<Item = (i32, i32, char)> + '_ {
        self.rows.iter().enumerate().flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .map(move |(x, &tile)| (x as i32, y as i32, tile))
        })
    }

    /// Check that every declared exit (and the start position, if any)
    /// is an in-bounds walkable tile
    ///
    /// The generator trusts templates at runtime; this runs once at
    /// catalog load so a malformed template aborts startup instead of
    /// stranding the player mid-session.
    pub fn validate(&self) -> Result<()> {
        for (&direction, &(x, y)) in &self.exits {
            match self.tile(x, y) {
                Some(tile) if is_walkable(tile) => {}
                _ => {
                    return Err(EngineError::UnreachableExit {
                        template: self.name.clone(),
                        direction,
                        x,
                        y,
                    })
                }
            }
        }
        if let Some((x, y)) = self.start_pos {
            if !self.tile(x, y).is_some_and(is_walkable) {
                return Err(EngineError::MalformedCatalog(format!(
                    "template '{}' start position ({x}, {y}) is not walkable",
                    self.name
                )));
            }
        }
        Ok(())
    }
}

/// The full template catalog with its designated entrance template
#[derive(Debug, Clone)]
pub struct TemplateCatalog {
    templates: Vec<RoomTemplate>,
    entrance: usize,
}

impl TemplateCatalog {
    /// Build a catalog; validates every template and requires the named
    /// entrance to exist
    pub fn new(templates: Vec<RoomTemplate>, entrance_name: &str) -> Result<Self> {
        for template in &templates {
            template.validate()?;
        }
        let entrance = templates
            .iter()
            .position(|template| template.name == entrance_name)
            .ok_or_else(|| {
                EngineError::MalformedCatalog(format!(
                    "entrance template '{entrance_name}' not in catalog"
                ))
            })?;
        Ok(Self { templates, entrance })
    }

    pub fn get(&self, index: usize) -> &RoomTemplate {
        &self.templates[index]
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.templates.iter().position(|template| template.name == name)
    }

    pub fn entrance(&self) -> usize {
        self.entrance
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Non-entrance templates exposing an exit in `direction`, in
    /// catalog order (the order feeds the dice stream, so it must be
    /// deterministic)
    pub fn candidates_with_exit(&self, direction: Direction) -> Vec<usize> {
        (0..self.templates.len())
            .filter(|&index| index != self.entrance && self.templates[index].has_exit(direction))
            .collect()
    }

    /// Every non-entrance template, the degraded-selection fallback pool
    pub fn non_entrance(&self) -> Vec<usize> {
        (0..self.templates.len()).filter(|&index| index != self.entrance).collect()
    }
}
