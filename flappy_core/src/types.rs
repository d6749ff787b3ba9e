//! Core types and constants for the deterministic Flappy simulation.
//!
//! The play field is an integer grid: columns grow to the right, rows grow
//! downward, and row 0 is the top of the field.

use crate::error::{CommandError, ConfigError};
use std::ops::RangeInclusive;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Grid coordinate (column or row)
pub type Coord = i32;

/// Turn counter type
pub type Turn = u32;

/// Default field width in columns
pub const DEFAULT_WIDTH: Coord = 40;
/// Default field height in rows
pub const DEFAULT_HEIGHT: Coord = 35;
/// Default fixed column of the player
pub const DEFAULT_PLAYER_X: Coord = 2;

/// Rows gained by a flap
pub const FLAP_LIFT: Coord = 2;
/// Velocity carried into the next gravity step after a flap
pub const FLAP_VELOCITY: Coord = -1;
/// Terminal fall speed (rows per turn)
pub const MAX_DOWNWARD_SPEED: Coord = 4;

/// Height of the passable opening in every obstacle
pub const GAP_HEIGHT: Coord = 7;
/// Rows open on each side of the gap center
pub const GAP_HALF: Coord = GAP_HEIGHT / 2;
/// Obstacle thickness in columns
pub const OBSTACLE_WIDTH: Coord = 2;
/// Rows at the top and bottom of the field that never hold a gap center
pub const GAP_MARGIN: Coord = 10;

/// Spawn spacing at distance zero
pub const BASE_SPAWN_SPACING: Coord = 20;
/// Distance travelled per one-column reduction of the spawn spacing
pub const SPACING_STEP_DISTANCE: u32 = 100;
/// The spawn spacing never shrinks below this
pub const MIN_SPAWN_SPACING: Coord = GAP_HEIGHT + OBSTACLE_WIDTH;

/// Points awarded per cleared obstacle
pub const CLEAR_BONUS: u32 = 50;

/// Field configuration
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Config {
    /// Field width in columns
    pub width: Coord,
    /// Field height in rows
    pub height: Coord,
    /// Fixed column of the player
    pub player_x: Coord,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            player_x: DEFAULT_PLAYER_X,
        }
    }
}

impl Config {
    pub fn new(width: Coord, height: Coord, player_x: Coord) -> Self {
        Config {
            width,
            height,
            player_x,
        }
    }

    /// Smallest height that fits the gap plus both margins
    pub const fn min_height() -> Coord {
        GAP_HEIGHT + 2 * GAP_MARGIN + 1
    }

    /// Reject configurations the game cannot be played in
    pub fn validate(&self) -> Result<(), ConfigError> {
        let min_height = Self::min_height();
        if self.height < min_height {
            return Err(ConfigError::FieldTooShort {
                height: self.height,
                min: min_height,
            });
        }

        if self.player_x < 0 || self.player_x >= self.width {
            return Err(ConfigError::PlayerOutsideField {
                player_x: self.player_x,
                width: self.width,
            });
        }

        // New obstacles must appear entirely ahead of the player
        let min_width = self.player_x + OBSTACLE_WIDTH + 1;
        if self.width < min_width {
            return Err(ConfigError::FieldTooNarrow {
                width: self.width,
                min: min_width,
            });
        }

        Ok(())
    }

    /// Column where new obstacles appear (both columns stay on screen)
    pub fn spawn_column(&self) -> Coord {
        self.width - OBSTACLE_WIDTH
    }

    /// Rows a gap center may be drawn from
    pub fn gap_rows(&self) -> RangeInclusive<Coord> {
        GAP_MARGIN..=(self.height - GAP_MARGIN - 1)
    }

    /// Row the player starts on
    pub fn start_row(&self) -> Coord {
        self.height / 2
    }

    pub fn row_in_bounds(&self, row: Coord) -> bool {
        (0..self.height).contains(&row)
    }
}

/// Command consumed by one turn
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Command {
    /// Jump upward
    Flap,
    /// Do nothing and fall under gravity
    #[default]
    Glide,
    /// End the game
    Quit,
}

impl Command {
    /// Map a raw key the way control programs send them.
    ///
    /// Anything that is not a flap or quit key falls under gravity.
    pub fn from_key(key: char) -> Command {
        match key {
            ' ' | 'w' => Command::Flap,
            'Q' => Command::Quit,
            _ => Command::Glide,
        }
    }

    /// Like [`Command::from_key`], but rejects keys outside the known set
    pub fn from_key_strict(key: char) -> Result<Command, CommandError> {
        match key {
            ' ' | 'w' => Ok(Command::Flap),
            's' | 'd' => Ok(Command::Glide),
            'Q' => Ok(Command::Quit),
            other => Err(CommandError::Unrecognized(other)),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Command::Flap => "flap",
            Command::Glide => "glide",
            Command::Quit => "quit",
        }
    }
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "flap" => Ok(Command::Flap),
            "glide" | "fall" => Ok(Command::Glide),
            "quit" => Ok(Command::Quit),
            _ => Err(CommandError::UnknownName(s.to_string())),
        }
    }
}

/// One pipe pair: two solid columns with an open gap around `gap_center`
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Obstacle {
    /// Left column
    pub x: Coord,
    /// Center row of the gap
    pub gap_center: Coord,
}

impl Obstacle {
    pub fn new(x: Coord, gap_center: Coord) -> Self {
        Obstacle { x, gap_center }
    }

    /// The same obstacle one column further left
    pub fn shift(self) -> Obstacle {
        Obstacle {
            x: self.x - 1,
            gap_center: self.gap_center,
        }
    }

    /// Right-hand column
    pub fn trailing_column(&self) -> Coord {
        self.x + OBSTACLE_WIDTH - 1
    }

    pub fn covers_column(&self, column: Coord) -> bool {
        (self.x..=self.trailing_column()).contains(&column)
    }

    /// Whether `row` is inside the gap
    pub fn is_open(&self, row: Coord) -> bool {
        (row - self.gap_center).abs() <= GAP_HALF
    }

    pub fn is_solid_at(&self, column: Coord, row: Coord) -> bool {
        self.covers_column(column) && !self.is_open(row)
    }
}

/// Player state
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Player {
    /// Row (0 is the top)
    pub row: Coord,
    /// Rows per turn, positive is downward
    pub velocity: Coord,
}

impl Player {
    pub fn new(row: Coord) -> Self {
        Player { row, velocity: 0 }
    }
}

/// Why a game ended
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum GameOverCause {
    /// Explicit quit command
    Quit,
    /// Flew into a solid obstacle cell
    Crashed,
    /// Left the field vertically
    OutOfBounds,
}

/// Game status
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Status {
    /// Accepting turns
    Running,
    /// Terminal
    GameOver(GameOverCause),
}

/// Things that happened during a turn
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Event {
    ObstacleSpawned(Obstacle),
    /// Obstacles left behind this turn, with the new running total
    ObstaclesCleared { count: u32, total: u32 },
    GameOver(GameOverCause),
}

/// Read-only snapshot for renderers and control programs
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct View {
    pub turn: Turn,
    pub status: Status,
    pub width: Coord,
    pub height: Coord,
    pub player_x: Coord,
    pub player: Player,
    /// Oldest first
    pub obstacles: Vec<Obstacle>,
    pub distance: u32,
    pub obstacles_cleared: u32,
    pub score: u32,
}

impl View {
    pub fn is_running(&self) -> bool {
        matches!(self.status, Status::Running)
    }

    /// The obstacle the player meets next
    pub fn next_obstacle(&self) -> Option<&Obstacle> {
        self.obstacles.first()
    }

    /// Gap center of the next obstacle
    pub fn next_gap_center(&self) -> Option<Coord> {
        self.next_obstacle().map(|o| o.gap_center)
    }

    /// Columns between the player and the next obstacle
    pub fn distance_to_next(&self) -> Option<Coord> {
        self.next_obstacle().map(|o| o.x - self.player_x)
    }

    /// Whether the cell at (`column`, `row`) is solid
    pub fn is_solid(&self, column: Coord, row: Coord) -> bool {
        self.obstacles.iter().any(|o| o.is_solid_at(column, row))
    }
}
