//! CLI harness for flappy_core: keyboard play, autopilot demo and headless bot evaluation.

use clap::{Parser, Subcommand};
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{poll, read, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{
        disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use flappy_core::driver::{self, Evaluation};
use flappy_core::*;
use std::io::{stdout, Result, Stdout, Write};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

const GAME_TITLE: &str = "Flappy Robot";
const PASSING_SOUNDS: [&str; 5] = ["Swish!", "Whoosh!", "Swoosh!", "Chirp", "Tweet"];
const MSG_START: u16 = 20;
const MAX_MESSAGES: usize = 3;

#[derive(Debug, Parser)]
#[command(name = "cli_harness", about = "Play or evaluate the Flappy simulation")]
struct Args {
    /// Field width in columns
    #[arg(long, default_value_t = DEFAULT_WIDTH)]
    width: Coord,

    /// Field height in rows
    #[arg(long, default_value_t = DEFAULT_HEIGHT)]
    height: Coord,

    /// Fixed column of the player
    #[arg(long, default_value_t = DEFAULT_PLAYER_X)]
    player_x: Coord,

    /// Seed for gap placement (defaults to the clock)
    #[arg(long)]
    seed: Option<u64>,

    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Subcommand)]
enum Mode {
    /// Play in the terminal (default)
    Play {
        /// Milliseconds per turn
        #[arg(
            long,
            default_value_t = 100,
            value_parser = clap::value_parser!(u64).range(1..=60_000)
        )]
        tick_ms: u64,

        /// Let the built-in bot fly
        #[arg(long)]
        autopilot: bool,
    },
    /// Evaluate the built-in bot over consecutive seeds without a screen
    Headless {
        /// Number of games
        #[arg(long, default_value_t = 10)]
        games: u64,

        /// Turn cap per game
        #[arg(long, default_value_t = 10_000)]
        max_turns: Turn,

        /// Print JSON lines instead of text
        #[arg(long)]
        json: bool,
    },
}

/// Where commands come from in interactive mode
enum Pilot {
    Keyboard,
    Bot(Autopilot),
}

/// CLI application state
struct CliApp {
    config: Config,
    seed: u64,
    game: Game,
    pilot: Pilot,
    tick: Duration,
    last_tick: Instant,
    /// Last command key pressed since the previous turn
    pending: Option<Command>,
    messages: Vec<String>,
    running: bool,
}

impl CliApp {
    fn new(
        config: Config,
        seed: u64,
        tick: Duration,
        autopilot: bool,
    ) -> std::result::Result<Self, ConfigError> {
        let pilot = if autopilot {
            Pilot::Bot(Autopilot::new())
        } else {
            Pilot::Keyboard
        };

        let mut app = Self {
            config,
            seed,
            game: Game::seeded(config, seed)?,
            pilot,
            tick,
            last_tick: Instant::now(),
            pending: None,
            messages: Vec::new(),
            running: true,
        };
        app.welcome();
        Ok(app)
    }

    fn welcome(&mut self) {
        self.messages.clear();
        self.push_message("Welcome to");
        self.push_message(format!("   {}!!!", GAME_TITLE));
        self.push_message("Don't hit the pipes");
    }

    fn push_message(&mut self, message: impl Into<String>) {
        self.messages.push(message.into());
        if self.messages.len() > MAX_MESSAGES {
            self.messages.remove(0);
        }
    }

    fn restart(&mut self) -> std::result::Result<(), ConfigError> {
        self.seed = self.seed.wrapping_add(1);
        self.game = Game::seeded(self.config, self.seed)?;
        self.pending = None;
        self.welcome();
        Ok(())
    }

    fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut out = stdout();
        execute!(out, EnterAlternateScreen, Hide, Clear(ClearType::All))?;

        let result = self.main_loop(&mut out);

        execute!(out, LeaveAlternateScreen, Show)?;
        disable_raw_mode()?;
        result
    }

    fn main_loop(&mut self, out: &mut Stdout) -> Result<()> {
        self.render(out)?;

        while self.running {
            let timeout = self.tick.saturating_sub(self.last_tick.elapsed());
            if poll(timeout)? {
                if let Event::Key(event) = read()? {
                    self.handle_key(event);
                }
                continue;
            }

            if self.game.is_running() {
                self.advance();
            }
            self.last_tick = Instant::now();
            self.render(out)?;
        }

        Ok(())
    }

    fn handle_key(&mut self, event: KeyEvent) {
        if event.kind != KeyEventKind::Press {
            return;
        }

        if event.code == KeyCode::Char('c') && event.modifiers.contains(KeyModifiers::CONTROL) {
            self.running = false;
            return;
        }

        if !self.game.is_running() {
            match event.code {
                KeyCode::Char('r') | KeyCode::Char('R') => {
                    // Validated at startup, so a restart cannot fail
                    if self.restart().is_err() {
                        self.running = false;
                    }
                }
                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => self.running = false,
                _ => {}
            }
            return;
        }

        let Some(command) = key_command(event.code) else {
            return;
        };

        // The bot flies, but the player can still quit
        if matches!(self.pilot, Pilot::Bot(_)) && command != Command::Quit {
            return;
        }
        self.pending = Some(command);
    }

    fn advance(&mut self) {
        let command = match &mut self.pilot {
            Pilot::Keyboard => self.pending.take().unwrap_or_default(),
            Pilot::Bot(bot) => match self.pending.take() {
                Some(Command::Quit) => Command::Quit,
                _ => bot.next_command(&self.game.view()),
            },
        };

        let events = match self.game.step(command) {
            Ok(events) => events,
            Err(err) => {
                log::warn!("{}", err);
                return;
            }
        };

        for event in events {
            match event {
                flappy_core::Event::ObstaclesCleared { total, .. } => {
                    let sound = PASSING_SOUNDS[total as usize % PASSING_SOUNDS.len()];
                    self.push_message(sound);
                }
                flappy_core::Event::GameOver(_) => {
                    self.push_message("Game Over.");
                    if self.game.world().obstacles_cleared() == 0 {
                        self.push_message("Better luck next time :(");
                    } else {
                        self.push_message("     Good job!");
                    }
                }
                flappy_core::Event::ObstacleSpawned(_) => {}
            }
        }
    }

    fn render(&self, out: &mut Stdout) -> Result<()> {
        let view = self.game.view();

        queue!(out, Clear(ClearType::All))?;
        let row = self.render_field(out, &view)?;
        self.render_panels(out, &view, row + 1)?;
        out.flush()
    }

    fn render_field(&self, out: &mut Stdout, view: &View) -> Result<u16> {
        for y in 0..view.height {
            queue!(out, MoveTo(0, y as u16))?;

            for x in 0..view.width {
                let (glyph, color) = cell_glyph(view, x, y);
                queue!(out, SetForegroundColor(color), Print(glyph))?;
            }
        }

        let bottom = view.height as u16;
        queue!(
            out,
            MoveTo(0, bottom),
            SetForegroundColor(Color::DarkYellow),
            Print("▀".repeat(view.width as usize)),
            ResetColor
        )?;

        Ok(bottom)
    }

    fn render_panels(&self, out: &mut Stdout, view: &View, top: u16) -> Result<()> {
        let stats = [
            format!("Meters Flown: {}", view.distance),
            format!("Pipes Passed: {}", view.obstacles_cleared),
            format!("Score: {}", view.score),
        ];

        for (i, line) in stats.iter().enumerate() {
            queue!(out, MoveTo(1, top + 1 + i as u16), Print(line))?;
        }

        for (i, message) in self.messages.iter().enumerate() {
            queue!(
                out,
                MoveTo(MSG_START, top + 1 + i as u16),
                SetForegroundColor(Color::Cyan),
                Print(message),
                ResetColor
            )?;
        }

        let help = match (&self.pilot, self.game.status()) {
            (_, Status::GameOver(_)) => "R: Play again  |  Q/Esc: Exit".to_string(),
            (Pilot::Keyboard, Status::Running) => "SPACE/W/Up: Flap  |  Q/Esc: Quit".to_string(),
            (Pilot::Bot(_), Status::Running) => "Autopilot  |  Q/Esc: Quit".to_string(),
        };
        queue!(
            out,
            MoveTo(1, top + 5),
            SetForegroundColor(Color::DarkGrey),
            Print(format!("{}  |  {}  |  seed {}", help, self.game.status_string(), self.seed)),
            ResetColor
        )?;

        Ok(())
    }
}

/// Command for a key pressed during play.
///
/// Lowercase `q` quits here too; the core keeps `from_key` permissive.
fn key_command(code: KeyCode) -> Option<Command> {
    match code {
        KeyCode::Char('q') | KeyCode::Esc => Some(Command::Quit),
        KeyCode::Char(c) => Some(Command::from_key(c)),
        KeyCode::Up => Some(Command::Flap),
        _ => None,
    }
}

/// Glyph and color for one field cell
fn cell_glyph(view: &View, x: Coord, y: Coord) -> (char, Color) {
    if x == view.player_x && y == view.player.row {
        return ('@', Color::Yellow);
    }

    match view.obstacles.iter().find(|o| o.is_solid_at(x, y)) {
        // Caps on the rows bordering the gap
        Some(o) if (y - o.gap_center).abs() == GAP_HALF + 1 => ('▓', Color::Green),
        Some(_) => ('█', Color::DarkGreen),
        None => (' ', Color::Reset),
    }
}

fn cause_label(cause: Option<GameOverCause>) -> &'static str {
    match cause {
        Some(GameOverCause::Quit) => "quit",
        Some(GameOverCause::Crashed) => "crashed",
        Some(GameOverCause::OutOfBounds) => "out of bounds",
        None => "turn cap",
    }
}

fn run_headless(
    config: Config,
    seed: u64,
    games: u64,
    max_turns: Turn,
    json: bool,
) -> std::result::Result<Evaluation, ConfigError> {
    let seeds = (0..games).map(|i| seed.wrapping_add(i));
    let evaluation = driver::evaluate(config, seeds, |_| Autopilot::new(), max_turns)?;

    for (seed, run) in &evaluation.runs {
        if json {
            println!("{}", serde_json::json!({ "seed": seed, "run": run }));
        } else {
            println!(
                "seed {:>20}: score {:>6}  meters {:>6}  pipes {:>4}  ({})",
                seed,
                run.score,
                run.distance,
                run.obstacles_cleared,
                cause_label(run.cause)
            );
        }
    }

    let best = evaluation.best().map(|(seed, run)| (*seed, run.score));
    if json {
        println!(
            "{}",
            serde_json::json!({
                "games": evaluation.runs.len(),
                "mean_score": evaluation.mean_score(),
                "best": best.map(|(seed, score)| serde_json::json!({ "seed": seed, "score": score })),
            })
        );
    } else if let Some((seed, score)) = best {
        println!(
            "{} games, mean score {:.1}, best {} (seed {})",
            evaluation.runs.len(),
            evaluation.mean_score(),
            score,
            seed
        );
    }

    Ok(evaluation)
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0xC0FFEE)
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = Config::new(args.width, args.height, args.player_x);
    if let Err(err) = config.validate() {
        eprintln!("error: {}", err);
        std::process::exit(2);
    }
    let seed = args.seed.unwrap_or_else(clock_seed);
    log::info!("starting with seed {} on a {}x{} field", seed, config.width, config.height);

    let mode = args.mode.unwrap_or(Mode::Play {
        tick_ms: 100,
        autopilot: false,
    });

    match mode {
        Mode::Headless {
            games,
            max_turns,
            json,
        } => {
            if let Err(err) = run_headless(config, seed, games, max_turns, json) {
                eprintln!("error: {}", err);
                std::process::exit(2);
            }
            Ok(())
        }
        Mode::Play { tick_ms, autopilot } => {
            let mut app = match CliApp::new(config, seed, Duration::from_millis(tick_ms), autopilot) {
                Ok(app) => app,
                Err(err) => {
                    eprintln!("error: {}", err);
                    std::process::exit(2);
                }
            };

            // Restore the terminal if we are killed from outside
            ctrlc::set_handler(move || {
                let _ = disable_raw_mode();
                let _ = execute!(stdout(), LeaveAlternateScreen, Show);
                std::process::exit(0);
            })
            .map_err(std::io::Error::other)?;

            app.run()
        }
    }
}
