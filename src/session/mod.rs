//! The session layer: character creation, the time track, movement,
//! doors, searching, and combat orchestration for one play-through

pub mod build;
pub mod game;
pub mod log;

pub use build::{path_skills, race_skill, CharacterBuild, StartingItem};
pub use game::{DoorOutcome, GameSession, MoveOutcome};
pub use log::{MessageLog, Tone};
