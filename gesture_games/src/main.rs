//! gesture_games: interactive entry point.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use gesture_games::app::run;
use gesture_games::config::{Config, InputSource};
use gesture_games::menu::GameId;
use score_ledger::Ledger;

/// Hand-gesture minigames for a webcam, LeapMotion or simulated hand
#[derive(Parser, Debug)]
#[command(name = "gesture_games", version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Player name recorded in the ledger (overrides config)
    #[arg(short, long)]
    player: Option<String>,

    /// Start straight into game 1-5, skipping the first menu
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=5))]
    game: Option<u8>,

    /// Print the score ledger and exit
    #[arg(long)]
    history: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(log_level.into())
                .from_env_lossy(),
        )
        .init();

    let mut config = Config::load(args.config.as_deref()).context("loading configuration")?;
    if let Some(player) = args.player {
        config.player.name = player;
    }
    config.validate().context("invalid configuration")?;

    if args.history {
        print_history(&Ledger::new(&config.ledger.path));
        return Ok(());
    }

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║            Gesture Games: webcam hand-tracking arcade        ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();
    match config.input.source {
        InputSource::Sim => println!("  Mode: Simulated hand  (mouse + keys 0-5)"),
        InputSource::Upstream => println!(
            "  Mode: Upstream landmarks  ({} {})",
            config.input.upstream_command,
            config.input.upstream_args.join(" ")
        ),
        InputSource::Leap => println!("  Mode: LeapMotion hardware"),
    }
    println!("  Player: {}", config.player.name);
    println!("  Scores: {}", config.ledger.path.display());
    println!();

    let first = args.game.and_then(GameId::from_finger_count);
    run(config, first)?;
    Ok(())
}

fn print_history(ledger: &Ledger) {
    let records = ledger.records();
    if records.is_empty() {
        println!("No scores recorded in {}", ledger.path().display());
        return;
    }

    println!("{:<20} {:<14} {:>6} {:>6} {:>9} {:>9}", "game", "player", "score", "level", "time", "reaction");
    for r in &records {
        let reaction = r.avg_reaction_time.map(|t| format!("{:.3}s", t)).unwrap_or_else(|| "-".to_string());
        println!(
            "{:<20} {:<14} {:>6} {:>6} {:>8.2}s {:>9}",
            r.game, r.player, r.score, r.level, r.time_elapsed, reaction
        );
    }

    println!();
    println!("Best per game:");
    for r in ledger.best_per_game() {
        println!("  {:<20} {:>6}  ({})", r.game, r.score, r.player);
    }
}
