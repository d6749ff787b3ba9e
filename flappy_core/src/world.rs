//! Scrolling world bookkeeping and scoring.

use crate::types::*;

/// Active obstacles plus progress counters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct World {
    /// Oldest (leftmost) first
    obstacles: Vec<Obstacle>,
    distance: u32,
    obstacles_cleared: u32,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn distance(&self) -> u32 {
        self.distance
    }

    pub fn obstacles_cleared(&self) -> u32 {
        self.obstacles_cleared
    }

    /// Most recently spawned obstacle
    pub fn newest(&self) -> Option<&Obstacle> {
        self.obstacles.last()
    }

    /// Add a freshly spawned obstacle at the far end of the list
    pub fn push(&mut self, obstacle: Obstacle) {
        debug_assert!(
            self.newest().map_or(true, |last| last.x < obstacle.x),
            "obstacles must be spawned right of the newest one"
        );
        self.obstacles.push(obstacle);
    }

    /// Advance one column: shift every obstacle left and drop the ones
    /// whose trailing column is now behind `player_x`.
    ///
    /// Returns how many obstacles were cleared.
    pub fn scroll(&mut self, player_x: Coord) -> u32 {
        self.distance += 1;

        let before = self.obstacles.len();
        self.obstacles = self
            .obstacles
            .iter()
            .map(|o| o.shift())
            .filter(|o| o.trailing_column() >= player_x)
            .collect();

        let cleared = (before - self.obstacles.len()) as u32;
        self.obstacles_cleared += cleared;
        cleared
    }

    /// Obstacle occupying `column`, if any
    pub fn obstacle_at(&self, column: Coord) -> Option<&Obstacle> {
        self.obstacles.iter().find(|o| o.covers_column(column))
    }

    pub fn score(&self) -> u32 {
        score(self.distance, self.obstacles_cleared)
    }
}

/// Distance travelled plus a bonus per cleared obstacle
pub fn score(distance: u32, obstacles_cleared: u32) -> u32 {
    distance + obstacles_cleared * CLEAR_BONUS
}
