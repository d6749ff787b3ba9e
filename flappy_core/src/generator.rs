//! Obstacle spawning: timing, difficulty curve and gap placement.

use crate::types::*;
use crate::world::World;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::ops::RangeInclusive;

/// Source of gap centers, injected at game construction
pub trait GapSource {
    /// Pick a row from `rows` (never empty)
    fn gap_center(&mut self, rows: RangeInclusive<Coord>) -> Coord;
}

impl<G: GapSource + ?Sized> GapSource for &mut G {
    fn gap_center(&mut self, rows: RangeInclusive<Coord>) -> Coord {
        (**self).gap_center(rows)
    }
}

impl<G: GapSource + ?Sized> GapSource for Box<G> {
    fn gap_center(&mut self, rows: RangeInclusive<Coord>) -> Coord {
        (**self).gap_center(rows)
    }
}

/// Uniform gap centers from a seeded ChaCha stream
#[derive(Debug, Clone)]
pub struct SeededGaps {
    seed: u64,
    rng: ChaCha8Rng,
}

impl SeededGaps {
    pub fn new(seed: u64) -> Self {
        SeededGaps {
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl GapSource for SeededGaps {
    fn gap_center(&mut self, rows: RangeInclusive<Coord>) -> Coord {
        self.rng.gen_range(rows)
    }
}

/// Always the same row, clamped into the allowed range
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FixedGap(pub Coord);

impl GapSource for FixedGap {
    fn gap_center(&mut self, rows: RangeInclusive<Coord>) -> Coord {
        self.0.clamp(*rows.start(), *rows.end())
    }
}

/// Replays a list of rows in order, wrapping around at the end
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GapSequence {
    rows: Vec<Coord>,
    next: usize,
}

impl GapSequence {
    pub fn new(rows: Vec<Coord>) -> Self {
        GapSequence { rows, next: 0 }
    }
}

impl GapSource for GapSequence {
    fn gap_center(&mut self, rows: RangeInclusive<Coord>) -> Coord {
        let Some(&row) = self.rows.get(self.next) else {
            // Empty sequence: middle of the allowed range
            return (*rows.start() + *rows.end()) / 2;
        };
        self.next = (self.next + 1) % self.rows.len();
        row.clamp(*rows.start(), *rows.end())
    }
}

/// Columns that must open up behind the newest obstacle before the next one
/// spawns. Shrinks by one every [`SPACING_STEP_DISTANCE`] turns down to
/// [`MIN_SPAWN_SPACING`].
pub fn spawn_spacing(distance: u32) -> Coord {
    let shrink = (distance / SPACING_STEP_DISTANCE).min(BASE_SPAWN_SPACING as u32) as Coord;
    (BASE_SPAWN_SPACING - shrink).max(MIN_SPAWN_SPACING)
}

/// Decides when and where obstacles appear
pub struct ObstacleGenerator;

impl ObstacleGenerator {
    /// Whether a new obstacle is due.
    ///
    /// Always true on an empty field; otherwise the gap between the right
    /// edge and the newest obstacle must strictly exceed the spacing.
    pub fn should_spawn(config: &Config, world: &World) -> bool {
        match world.newest() {
            None => true,
            Some(newest) => config.width - newest.x > spawn_spacing(world.distance()),
        }
    }

    /// Build a new obstacle at the spawn column
    pub fn spawn<G: GapSource + ?Sized>(config: &Config, gaps: &mut G) -> Obstacle {
        let rows = config.gap_rows();
        let (low, high) = (*rows.start(), *rows.end());
        let center = gaps.gap_center(rows).clamp(low, high);
        Obstacle::new(config.spawn_column(), center)
    }

    /// Spawn into `world` if one is due
    pub fn maybe_spawn<G: GapSource + ?Sized>(
        config: &Config,
        world: &mut World,
        gaps: &mut G,
    ) -> Option<Obstacle> {
        if !Self::should_spawn(config, world) {
            return None;
        }

        let obstacle = Self::spawn(config, gaps);
        world.push(obstacle);
        log::debug!(
            "spawned obstacle at column {} with gap center {} (distance {})",
            obstacle.x,
            obstacle.gap_center,
            world.distance()
        );
        Some(obstacle)
    }
}
