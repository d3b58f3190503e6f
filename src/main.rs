use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use salmon_duel::console::Console;
use salmon_duel::game::Game;
use salmon_duel::{Color, Difficulty, Search};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Side {
    White,
    Black,
}

impl From<Side> for Color {
    fn from(side: Side) -> Self {
        match side {
            Side::White => Color::White,
            Side::Black => Color::Black,
        }
    }
}

/// Play chess against the computer in the terminal.
#[derive(Debug, Parser)]
#[command(name = "salmon-duel", version, about)]
struct Cli {
    /// Difficulty preset: easy, medium or hard
    #[arg(long, default_value = "medium")]
    difficulty: String,

    /// Override the search depth in plies
    #[arg(long)]
    depth: Option<u32>,

    /// Override the chance of playing a random move, in [0, 1]
    #[arg(long)]
    randomness: Option<f64>,

    /// The side you play
    #[arg(long, value_enum, default_value_t = Side::White)]
    play_as: Side,

    /// Seed for the computer's random choices
    #[arg(long)]
    seed: Option<u64>,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "warn")]
    log_level: String,
}

impl Cli {
    fn difficulty(&self) -> Result<Difficulty> {
        let preset: Difficulty = self
            .difficulty
            .parse()
            .context("invalid --difficulty")?;
        if self.depth.is_none() && self.randomness.is_none() {
            return Ok(preset);
        }

        let depth = self.depth.unwrap_or(preset.search_depth);
        let randomness = self.randomness.unwrap_or(preset.randomness);
        Ok(Difficulty::new("Custom", depth, randomness)?)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let difficulty = cli.difficulty()?;
    let search = match cli.seed {
        Some(seed) => Search::with_seed(seed),
        None => Search::new(),
    };
    info!(difficulty = %difficulty, human = ?cli.play_as, "starting game");

    let game = Game::with_search(cli.play_as.into(), difficulty, search);
    Console::new(game).run()
}
