//! Collision detection against the field bounds and obstacles.

use crate::types::*;

/// Collision checks for the player cell
pub struct Collision;

impl Collision {
    /// Check the player's row against the bounds and the (already
    /// scrolled) obstacle occupying the player's column, if any.
    pub fn check(config: &Config, row: Coord, occupant: Option<&Obstacle>) -> Option<GameOverCause> {
        if !config.row_in_bounds(row) {
            return Some(GameOverCause::OutOfBounds);
        }

        match occupant {
            Some(obstacle) if obstacle.is_solid_at(config.player_x, row) => {
                Some(GameOverCause::Crashed)
            }
            _ => None,
        }
    }
}
