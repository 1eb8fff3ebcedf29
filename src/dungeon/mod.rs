//! Procedural dungeon generation
//!
//! Stitches discrete room templates into a connected, coordinate-
//! addressed world, resolving area types, doors and tile coordinates
//! deterministically from the shared dice stream.

pub mod map;
pub mod tables;
pub mod templates;

pub use map::{local_to_world, world_to_local, Area, Door, DungeonMap};
pub use tables::{AreaTable, AreaTypeEntry, DoorEntry, DoorKind, DoorTable, SideLayout};
pub use templates::{is_walkable, RoomTemplate, TemplateCatalog, DOOR_TILE, WALKABLE_TILES};
