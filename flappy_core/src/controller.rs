//! Control programs: anything that turns a view into the next command.

use crate::types::*;
use std::collections::VecDeque;

/// Synchronous control capability, called once per turn
pub trait Controller {
    fn next_command(&mut self, view: &View) -> Command;
}

impl<F> Controller for F
where
    F: FnMut(&View) -> Command,
{
    fn next_command(&mut self, view: &View) -> Command {
        self(view)
    }
}

/// Simple gap-following bot.
///
/// Aims for the next gap center (or mid-field with nothing ahead). It only
/// flaps from at or below the target, so once inside a gap it stays within
/// three rows of the center.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Autopilot;

impl Autopilot {
    pub fn new() -> Self {
        Autopilot
    }

    fn target_row(view: &View) -> Coord {
        view.next_gap_center().unwrap_or(view.height / 2)
    }
}

impl Controller for Autopilot {
    fn next_command(&mut self, view: &View) -> Command {
        let target = Self::target_row(view);
        let row = view.player.row;
        let sinking = row + view.player.velocity > target;

        // Never flap through the ceiling
        if row >= target && sinking && row - FLAP_LIFT >= 0 {
            Command::Flap
        } else {
            Command::Glide
        }
    }
}

/// Replays a fixed list of commands, then repeats a fallback
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scripted {
    commands: VecDeque<Command>,
    fallback: Command,
}

impl Scripted {
    pub fn new(commands: impl IntoIterator<Item = Command>) -> Self {
        Scripted {
            commands: commands.into_iter().collect(),
            fallback: Command::Glide,
        }
    }

    /// Quit once the script runs out
    pub fn then_quit(mut self) -> Self {
        self.fallback = Command::Quit;
        self
    }

    pub fn remaining(&self) -> usize {
        self.commands.len()
    }
}

impl Controller for Scripted {
    fn next_command(&mut self, _view: &View) -> Command {
        self.commands.pop_front().unwrap_or(self.fallback)
    }
}
