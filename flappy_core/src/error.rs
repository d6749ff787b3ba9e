//! Error types for construction, turn advance and command parsing.

use crate::types::Coord;

/// Field configurations the game refuses to start with
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("field height {height} cannot fit the gap and margins (need at least {min})")]
    FieldTooShort { height: Coord, min: Coord },

    #[error("field width {width} leaves no room to spawn obstacles (need at least {min})")]
    FieldTooNarrow { width: Coord, min: Coord },

    #[error("player column {player_x} is outside a field {width} columns wide")]
    PlayerOutsideField { player_x: Coord, width: Coord },
}

/// Turn advance failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TurnError {
    #[error("the game is over")]
    GameOver,
}

/// Strict command parsing failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("unrecognized key {0:?}")]
    Unrecognized(char),

    #[error("unknown command {0:?}")]
    UnknownName(String),
}
