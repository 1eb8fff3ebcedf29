//! Hollowdeep - a turn-based dungeon crawler rules engine
//!
//! Entities live in a tagged-union component store, the dungeon grows
//! lazily from room templates stitched into a world tile grid, and
//! every action resolves through a single d100 test mechanic.

pub mod catalog;
pub mod combat;
pub mod core;
pub mod dungeon;
pub mod ecs;
pub mod rules;
pub mod session;
