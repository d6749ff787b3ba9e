//! Headless episode runner for evaluating control programs.

use crate::controller::Controller;
use crate::error::ConfigError;
use crate::game::Game;
use crate::generator::GapSource;
use crate::types::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Outcome of one episode
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RunSummary {
    pub turns: Turn,
    pub distance: u32,
    pub obstacles_cleared: u32,
    pub score: u32,
    /// `None` when the turn cap was hit first
    pub cause: Option<GameOverCause>,
}

impl RunSummary {
    pub fn from_game<G>(game: &Game<G>) -> Self {
        RunSummary {
            turns: game.turn(),
            distance: game.world().distance(),
            obstacles_cleared: game.world().obstacles_cleared(),
            score: game.score(),
            cause: game.game_over_cause(),
        }
    }
}

/// Play until game over or `max_turns` turns have been taken
pub fn run_episode<G, C>(game: &mut Game<G>, controller: &mut C, max_turns: Turn) -> RunSummary
where
    G: GapSource,
    C: Controller + ?Sized,
{
    while game.is_running() && game.turn() < max_turns {
        let command = controller.next_command(&game.view());
        if game.step(command).is_err() {
            break;
        }
    }

    RunSummary::from_game(game)
}

/// Results of a batch of seeded episodes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Evaluation {
    /// (seed, summary) in the order played
    pub runs: Vec<(u64, RunSummary)>,
}

impl Evaluation {
    pub fn best(&self) -> Option<&(u64, RunSummary)> {
        self.runs.iter().max_by_key(|(_, run)| run.score)
    }

    pub fn mean_score(&self) -> f64 {
        if self.runs.is_empty() {
            return 0.0;
        }
        let total: u64 = self.runs.iter().map(|(_, run)| run.score as u64).sum();
        total as f64 / self.runs.len() as f64
    }
}

/// Run one independent seeded game per seed, each with a fresh controller
pub fn evaluate<C, F>(
    config: Config,
    seeds: impl IntoIterator<Item = u64>,
    mut make_controller: F,
    max_turns: Turn,
) -> Result<Evaluation, ConfigError>
where
    C: Controller,
    F: FnMut(u64) -> C,
{
    config.validate()?;

    let mut evaluation = Evaluation::default();
    for seed in seeds {
        let mut game = Game::seeded(config, seed)?;
        let mut controller = make_controller(seed);
        let summary = run_episode(&mut game, &mut controller, max_turns);
        log::debug!("seed {}: score {} ({:?})", seed, summary.score, summary.cause);
        evaluation.runs.push((seed, summary));
    }

    Ok(evaluation)
}


#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;
    use crate::controller::Scripted;
    use crate::generator::FixedGap;

    #[test]
    fn test_command_names_are_lowercase() {
        for command in [Command::Flap, Command::Glide, Command::Quit] {
            let json = serde_json::to_string(&command).unwrap();
            assert_eq!(json, format!("\"{}\"", command.as_str()));
            assert_eq!(serde_json::from_str::<Command>(&json).unwrap(), command);
        }
    }

    #[test]
    fn test_view_survives_json() {
        let mut game = Game::new(Config::default(), FixedGap(17)).unwrap();
        game.step(Command::Glide).unwrap();
        let view = game.view();

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["turn"], 1);
        assert_eq!(json["status"], "Running");
        assert_eq!(json["obstacles"][0]["x"], 38);
        assert_eq!(json["obstacles"][0]["gap_center"], 17);

        let back: View = serde_json::from_value(json).unwrap();
        assert_eq!(back, view);
    }

    #[test]
    fn test_run_summary_survives_json() {
        let mut game = Game::seeded(Config::default(), 3).unwrap();
        let mut script = Scripted::new([Command::Glide; 2]).then_quit();
        let summary = run_episode(&mut game, &mut script, 100);

        let json = serde_json::to_string(&summary).unwrap();
        let back: RunSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(back, summary);
        assert_eq!(back.cause, Some(GameOverCause::Quit));
        assert_eq!(back.distance, 2);
    }
}
