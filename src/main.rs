use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use grid_snake::game::GameConfig;
use grid_snake::modes::{HumanMode, SessionOptions};
use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "grid_snake")]
#[command(version, about = "Grid snake game with a local score history")]
struct Cli {
    /// Game mode
    #[arg(long, default_value = "human")]
    mode: Mode,

    /// Grid width in cells
    #[arg(long, default_value = "20")]
    width: usize,

    /// Grid height in cells
    #[arg(long, default_value = "15")]
    height: usize,

    /// Tick interval at the start of a game, in milliseconds
    #[arg(long, default_value = "150")]
    initial_speed: u64,

    /// Fastest tick interval, in milliseconds
    #[arg(long, default_value = "80")]
    min_speed: u64,

    /// Seed for the food placement
    #[arg(long)]
    seed: Option<u64>,

    /// Name the games are recorded under
    #[arg(long, default_value = "player", conflicts_with = "guest")]
    player: String,

    /// Play without recording any history
    #[arg(long)]
    guest: bool,

    /// Where the score history is kept
    #[arg(long, default_value = "grid_snake_scores.json")]
    history: PathBuf,

    /// Write logs to this file (the terminal is taken by the game)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[derive(Clone, ValueEnum)]
enum Mode {
    /// Play snake with keyboard controls
    Human,
}

fn init_tracing(log_file: Option<&PathBuf>) -> Result<()> {
    let Some(path) = log_file else {
        return Ok(());
    };

    let file = File::create(path)
        .with_context(|| format!("Failed to create log file {:?}", path))?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "grid_snake=info".into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.log_file.as_ref())?;

    // Create game configuration from CLI arguments
    let config = GameConfig {
        initial_speed_ms: cli.initial_speed,
        min_speed_ms: cli.min_speed,
        ..GameConfig::new(cli.width, cli.height)
    };
    config.validate().context("Invalid game configuration")?;

    let options = SessionOptions {
        player: (!cli.guest).then_some(cli.player),
        history_path: (!cli.guest).then_some(cli.history),
        seed: cli.seed,
    };

    tracing::info!(
        width = config.grid_width,
        height = config.grid_height,
        guest = cli.guest,
        "starting session"
    );

    // Dispatch to appropriate mode
    match cli.mode {
        Mode::Human => {
            let mut human_mode = HumanMode::new(config, options)?;
            human_mode.run().await?;
        }
    }

    Ok(())
}
