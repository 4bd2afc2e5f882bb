//! Backgammon rules engine command line.
//!
//! ## Usage
//!
//! - `backgammon-rules` - Play a self-play demo game
//! - `backgammon-rules demo --games 10 --match-length 7` - Self-play a match
//! - `backgammon-rules console` - Drive a match from text commands on stdin
//!
//! Logging goes to stderr; set `RUST_LOG` or pass `--verbose`.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use backgammon_rules::board::Player;
use backgammon_rules::console::Console;
use backgammon_rules::selfplay::play_match;

/// Backgammon rules engine
#[derive(Parser)]
#[command(name = "backgammon-rules")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log every roll and move
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Play random games against itself
    Demo {
        /// Maximum number of games to play
        #[arg(short, long, default_value_t = 1)]
        games: u32,

        /// Points needed to win the match (0 = money play)
        #[arg(short, long, default_value_t = 0)]
        match_length: u32,

        /// Seed for reproducible dice
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Read commands from stdin and answer on stdout
    Console {
        /// Points needed to win the match (0 = money play)
        #[arg(short, long, default_value_t = 0)]
        match_length: u32,

        /// Seed for reproducible dice
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn rng_from(seed: Option<u64>) -> fastrand::Rng {
    match seed {
        Some(seed) => fastrand::Rng::with_seed(seed),
        None => fastrand::Rng::new(),
    }
}

fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Some(Commands::Console { match_length, seed }) => {
            let mut console =
                Console::new(match_length, rng_from(seed)).context("failed to start the match")?;
            let stdin = std::io::stdin();
            console
                .run(stdin.lock(), std::io::stdout())
                .context("console I/O failed")?;
        }
        Some(Commands::Demo {
            games,
            match_length,
            seed,
        }) => run_demo(games, match_length, seed)?,
        None => run_demo(1, 0, None)?,
    }
    Ok(())
}

fn run_demo(games: u32, match_length: u32, seed: Option<u64>) -> Result<()> {
    let mut rng = rng_from(seed);
    info!(games, match_length, "starting self-play");

    let (session, records) =
        play_match(&mut rng, match_length, games.max(1)).context("self-play failed")?;

    for (i, record) in records.iter().enumerate() {
        println!(
            "game {}: {} ({} turns, {} moves, {} hits, {} forfeits)",
            i + 1,
            record.outcome,
            record.turns,
            record.moves,
            record.hits,
            record.forfeits
        );
    }
    println!(
        "score: white {} black {}",
        session.score(Player::White),
        session.score(Player::Black)
    );
    if let Some(winner) = session.winner() {
        println!("{winner} wins the match to {match_length}");
    }
    println!("\nfinal position of the last game:\n{}", session.game().board());
    Ok(())
}
