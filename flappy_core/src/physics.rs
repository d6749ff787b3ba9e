//! Vertical movement of the player.

use crate::types::*;

/// Physics calculations for the player
pub struct Physics;

impl Physics {
    /// Move the player for one turn.
    ///
    /// `Quit` never reaches physics; the game ends before it. It leaves the
    /// player untouched if it does.
    pub fn update_player(player: &mut Player, command: Command) {
        match command {
            Command::Flap => Self::flap(player),
            Command::Glide => Self::fall(player),
            Command::Quit => {}
        }
    }

    /// Lift by a fixed amount, whatever the current velocity
    pub fn flap(player: &mut Player) {
        player.row -= FLAP_LIFT;
        player.velocity = FLAP_VELOCITY;
    }

    /// Move by the current velocity, then accelerate toward terminal speed
    pub fn fall(player: &mut Player) {
        player.row += player.velocity;
        if player.velocity < MAX_DOWNWARD_SPEED {
            player.velocity += 1;
        }
    }
}
