use thiserror::Error;

use crate::core::types::Direction;

/// Errors for the unrecoverable setup class only: malformed or missing
/// catalog data. Expected game-state conditions (absent components,
/// failed tests, exhausted resources) are modeled as `Option`s and
/// domain outcomes, never as errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed catalog: {0}")]
    MalformedCatalog(String),

    #[error("room template '{template}' declares a {direction:?} exit at ({x}, {y}) that is not a walkable tile")]
    UnreachableExit {
        template: String,
        direction: Direction,
        x: i32,
        y: i32,
    },
}

pub type Result<T> = std::result::Result<T, EngineError>;
