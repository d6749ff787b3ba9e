//! Main game logic and state management.

use crate::collision::Collision;
use crate::error::{ConfigError, TurnError};
use crate::generator::{GapSource, ObstacleGenerator, SeededGaps};
use crate::physics::Physics;
use crate::types::*;
use crate::world::World;

/// Main game state and logic
#[derive(Debug, Clone)]
pub struct Game<G = SeededGaps> {
    config: Config,
    turn: Turn,
    status: Status,
    player: Player,
    world: World,
    gaps: G,
}

impl Game<SeededGaps> {
    /// Create a game whose gap centers come from `seed`
    pub fn seeded(config: Config, seed: u64) -> Result<Self, ConfigError> {
        Game::new(config, SeededGaps::new(seed))
    }
}

impl<G: GapSource> Game<G> {
    /// Create a new game with the given configuration and gap source
    pub fn new(config: Config, gaps: G) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Game {
            config,
            turn: 0,
            status: Status::Running,
            player: Player::new(config.start_row()),
            world: World::new(),
            gaps,
        })
    }

    /// Advance the simulation by one turn.
    ///
    /// Order: physics, scroll, spawn, collision. Collision sees the
    /// obstacles at their shifted columns.
    pub fn step(&mut self, command: Command) -> Result<Vec<Event>, TurnError> {
        if let Status::GameOver(cause) = self.status {
            log::warn!("turn requested after game over ({:?})", cause);
            return Err(TurnError::GameOver);
        }

        log::trace!("turn {}: {}", self.turn + 1, command.as_str());
        let mut events = Vec::new();

        if command == Command::Quit {
            self.finish(GameOverCause::Quit, &mut events);
            return Ok(events);
        }

        Physics::update_player(&mut self.player, command);

        let cleared = self.world.scroll(self.config.player_x);
        if cleared > 0 {
            log::debug!(
                "cleared {} obstacle(s), {} total",
                cleared,
                self.world.obstacles_cleared()
            );
            events.push(Event::ObstaclesCleared {
                count: cleared,
                total: self.world.obstacles_cleared(),
            });
        }

        if let Some(obstacle) =
            ObstacleGenerator::maybe_spawn(&self.config, &mut self.world, &mut self.gaps)
        {
            events.push(Event::ObstacleSpawned(obstacle));
        }

        self.turn += 1;

        let occupant = self.world.obstacle_at(self.config.player_x);
        if let Some(cause) = Collision::check(&self.config, self.player.row, occupant) {
            self.finish(cause, &mut events);
        }

        Ok(events)
    }

    /// Generate a view of the current game state for rendering
    pub fn view(&self) -> View {
        View {
            turn: self.turn,
            status: self.status,
            width: self.config.width,
            height: self.config.height,
            player_x: self.config.player_x,
            player: self.player,
            obstacles: self.world.obstacles().to_vec(),
            distance: self.world.distance(),
            obstacles_cleared: self.world.obstacles_cleared(),
            score: self.world.score(),
        }
    }

    fn finish(&mut self, cause: GameOverCause, events: &mut Vec<Event>) {
        self.status = Status::GameOver(cause);
        log::info!(
            "game over ({:?}) after {} turns: distance {}, cleared {}, score {}",
            cause,
            self.turn,
            self.world.distance(),
            self.world.obstacles_cleared(),
            self.world.score()
        );
        events.push(Event::GameOver(cause));
    }
}

impl<G> Game<G> {
    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn turn(&self) -> Turn {
        self.turn
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn player(&self) -> Player {
        self.player
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn score(&self) -> u32 {
        self.world.score()
    }

    /// Check if the game is still accepting turns
    pub fn is_running(&self) -> bool {
        matches!(self.status, Status::Running)
    }

    /// Why the game ended, if it has
    pub fn game_over_cause(&self) -> Option<GameOverCause> {
        match self.status {
            Status::GameOver(cause) => Some(cause),
            Status::Running => None,
        }
    }

    /// Get a human-readable status string
    pub fn status_string(&self) -> &'static str {
        match self.status {
            Status::Running => "Flying",
            Status::GameOver(GameOverCause::Quit) => "Quit",
            Status::GameOver(GameOverCause::Crashed) => "Hit a pipe",
            Status::GameOver(GameOverCause::OutOfBounds) => "Flew off the map",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::FixedGap;

    fn fixed_game(center: Coord) -> Game<FixedGap> {
        Game::new(Config::default(), FixedGap(center)).unwrap()
    }

    #[test]
    fn test_game_creation() {
        let game = Game::seeded(Config::default(), 1).unwrap();

        assert_eq!(game.turn(), 0);
        assert_eq!(game.status(), Status::Running);
        assert_eq!(game.player(), Player::new(17));
        assert!(game.world().obstacles().is_empty());
        assert_eq!(game.score(), 0);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let result = Game::seeded(Config::new(40, 20, 2), 1);
        assert!(matches!(result, Err(ConfigError::FieldTooShort { .. })));
    }

    #[test]
    fn test_first_turn_spawns_obstacle() {
        let mut game = fixed_game(12);
        let events = game.step(Command::Glide).unwrap();

        assert_eq!(events, vec![Event::ObstacleSpawned(Obstacle::new(38, 12))]);
        assert_eq!(game.world().obstacles(), &[Obstacle::new(38, 12)]);
    }

    #[test]
    fn test_quit_ends_game_without_moving() {
        let mut game = fixed_game(17);
        let events = game.step(Command::Quit).unwrap();

        assert_eq!(events, vec![Event::GameOver(GameOverCause::Quit)]);
        assert_eq!(game.status(), Status::GameOver(GameOverCause::Quit));
        assert_eq!(game.world().distance(), 0);
        assert!(game.world().obstacles().is_empty());
        assert_eq!(game.player(), Player::new(17));
        assert_eq!(game.status_string(), "Quit");
    }

    fn assert_turns_rejected<G: GapSource>(game: &mut Game<G>) {
        let before = game.view();

        for command in [Command::Flap, Command::Glide, Command::Quit] {
            assert_eq!(game.step(command), Err(TurnError::GameOver));
        }

        assert_eq!(game.view(), before);
        assert_eq!(game.turn(), before.turn);
        assert_eq!(game.world().distance(), before.distance);
        assert_eq!(game.world().obstacles_cleared(), before.obstacles_cleared);
        assert!(!game.is_running());
    }

    #[test]
    fn test_turn_after_game_over_is_rejected() {
        let mut game = fixed_game(17);
        game.step(Command::Quit).unwrap();
        assert_turns_rejected(&mut game);
    }

    #[test]
    fn test_turn_after_crash_is_rejected() {
        let mut game = fixed_game(17);
        // Clear one obstacle first so the counters are non-trivial
        game.world.push(Obstacle::new(1, 17));
        game.world.push(Obstacle::new(3, 17));
        game.player = Player { row: 5, velocity: 0 };

        game.step(Command::Glide).unwrap();
        assert_eq!(game.game_over_cause(), Some(GameOverCause::Crashed));
        assert_eq!(game.world().obstacles_cleared(), 1);
        assert_eq!(game.world().distance(), 1);
        assert_eq!(game.turn(), 1);

        assert_turns_rejected(&mut game);
    }

    #[test]
    fn test_turn_after_leaving_the_field_is_rejected() {
        let mut game = fixed_game(17);
        for _ in 0..3 {
            game.step(Command::Glide).unwrap();
        }
        game.player = Player { row: 1, velocity: 0 };

        game.step(Command::Flap).unwrap();
        assert_eq!(game.game_over_cause(), Some(GameOverCause::OutOfBounds));
        assert_eq!(game.world().distance(), 4);
        assert_eq!(game.turn(), 4);

        assert_turns_rejected(&mut game);
    }

    #[test]
    fn test_flying_off_the_top() {
        let mut game = fixed_game(17);
        game.player = Player { row: 1, velocity: 0 };

        let events = game.step(Command::Flap).unwrap();

        assert_eq!(game.player().row, -1);
        assert_eq!(game.status(), Status::GameOver(GameOverCause::OutOfBounds));
        assert_eq!(events.last(), Some(&Event::GameOver(GameOverCause::OutOfBounds)));
        // The fatal turn still counts
        assert_eq!(game.world().distance(), 1);
    }

    #[test]
    fn test_falling_off_the_bottom() {
        let mut game = fixed_game(17);
        game.player = Player {
            row: 32,
            velocity: MAX_DOWNWARD_SPEED,
        };

        game.step(Command::Glide).unwrap();

        assert_eq!(game.game_over_cause(), Some(GameOverCause::OutOfBounds));
        assert_eq!(game.status_string(), "Flew off the map");
    }

    #[test]
    fn test_crash_into_solid_cell() {
        let mut game = fixed_game(17);
        // Obstacle reaches the player column on this turn's scroll
        game.world.push(Obstacle::new(3, 17));
        game.player = Player { row: 5, velocity: 0 };

        let events = game.step(Command::Glide).unwrap();

        assert_eq!(game.world().obstacles()[0].x, 2);
        assert_eq!(game.game_over_cause(), Some(GameOverCause::Crashed));
        assert_eq!(events.last(), Some(&Event::GameOver(GameOverCause::Crashed)));
    }

    #[test]
    fn test_every_solid_row_crashes() {
        for row in 0..35 {
            let mut game = fixed_game(17);
            game.world.push(Obstacle::new(3, 17));
            // Zero velocity: a glide keeps the player on `row`
            game.player = Player { row, velocity: 0 };

            game.step(Command::Glide).unwrap();

            let expected = if (row - 17).abs() > GAP_HALF {
                Some(GameOverCause::Crashed)
            } else {
                None
            };
            assert_eq!(game.game_over_cause(), expected, "row {}", row);
        }
    }

    #[test]
    fn test_collision_uses_shifted_position() {
        let mut game = fixed_game(17);
        // Before the scroll the player column is free; after it the
        // obstacle has moved onto it
        game.world.push(Obstacle::new(3, 30));
        game.player = Player { row: 17, velocity: 0 };

        game.step(Command::Glide).unwrap();
        assert_eq!(game.game_over_cause(), Some(GameOverCause::Crashed));

        // An obstacle whose trailing column leaves the player column this
        // turn can no longer hit
        let mut game = fixed_game(17);
        game.world.push(Obstacle::new(1, 30));
        game.player = Player { row: 17, velocity: 0 };

        let events = game.step(Command::Glide).unwrap();
        assert!(game.is_running());
        assert!(events.contains(&Event::ObstaclesCleared { count: 1, total: 1 }));
    }

    #[test]
    fn test_passing_through_gap() {
        let mut game = fixed_game(17);
        game.world.push(Obstacle::new(3, 17));

        // Hold the player near the gap center with alternating commands
        for command in [Command::Flap, Command::Glide, Command::Glide, Command::Flap] {
            game.step(command).unwrap();
            assert!(game.is_running(), "crashed at row {}", game.player().row);
        }

        assert_eq!(game.world().obstacles_cleared(), 1);
        assert_eq!(game.score(), game.world().distance() + CLEAR_BONUS);
    }

    #[test]
    fn test_view_generation() {
        let mut game = fixed_game(20);
        game.step(Command::Flap).unwrap();
        let view = game.view();

        assert_eq!(view.turn, 1);
        assert_eq!(view.status, Status::Running);
        assert_eq!(view.width, 40);
        assert_eq!(view.height, 35);
        assert_eq!(view.player_x, 2);
        assert_eq!(view.player, Player { row: 15, velocity: -1 });
        assert_eq!(view.obstacles, vec![Obstacle::new(38, 20)]);
        assert_eq!(view.distance, 1);
        assert_eq!(view.obstacles_cleared, 0);
        assert_eq!(view.score, 1);
        assert_eq!(view.distance_to_next(), Some(36));
    }

    #[test]
    fn test_deterministic_simulation() {
        let config = Config::default();
        let mut game1 = Game::seeded(config, 0xC0FFEE).unwrap();
        let mut game2 = Game::seeded(config, 0xC0FFEE).unwrap();

        let commands = [Command::Glide, Command::Flap, Command::Glide, Command::Flap];
        for _ in 0..10 {
            for command in commands {
                let a = game1.step(command);
                let b = game2.step(command);
                assert_eq!(a, b);
            }
        }

        assert_eq!(game1.view(), game2.view());
    }

    #[test]
    fn test_independent_games_do_not_interfere() {
        let config = Config::default();
        let mut left = Game::seeded(config, 1).unwrap();
        let mut right = Game::seeded(config, 2).unwrap();

        left.step(Command::Quit).unwrap();
        right.step(Command::Glide).unwrap();

        assert!(!left.is_running());
        assert!(right.is_running());
        assert_eq!(right.world().distance(), 1);
    }
}
