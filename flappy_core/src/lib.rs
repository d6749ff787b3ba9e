//! Flappy core game engine - deterministic turn-based obstacle-avoidance simulation

pub mod collision;
pub mod controller;
pub mod driver;
pub mod error;
pub mod game;
pub mod generator;
pub mod physics;
pub mod types;
pub mod world;

pub use controller::{Autopilot, Controller, Scripted};
pub use error::{CommandError, ConfigError, TurnError};
pub use game::Game;
pub use generator::{FixedGap, GapSequence, GapSource, SeededGaps};
pub use types::*;
