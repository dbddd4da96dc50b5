use std::fs::File;
use std::io::{stdin, stdout};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tick_snake::engine::{Engine, GridEngine, JsonEngine, ProcessTransport, serve_lines};
use tick_snake::game::{GRID_SIZE, GameConfig, SpeedMode};
use tick_snake::modes::HumanMode;
use tick_snake::score::{FileStore, HighScoreStore, MemoryStore};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tick_snake")]
#[command(version, about = "Timer-driven grid snake with per-speed high scores")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    play: PlayArgs,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the built-in engine on stdin/stdout, one JSON object per line
    Engine {
        /// Seed for fruit placement
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[derive(Args)]
struct PlayArgs {
    /// Speed mode
    #[arg(long, value_enum, conflicts_with = "route")]
    speed: Option<SpeedMode>,

    /// Pick the speed mode from a route, e.g. /speed or /ahhh
    #[arg(long)]
    route: Option<String>,

    /// Grid side length
    #[arg(long, default_value_t = GRID_SIZE)]
    grid_size: usize,

    /// High score file (defaults to the user data directory)
    #[arg(long)]
    scores: Option<PathBuf>,

    /// Keep high scores in memory only
    #[arg(long, conflicts_with = "scores")]
    no_save: bool,

    /// Run the engine as a child process speaking the JSON line protocol
    #[arg(long)]
    engine_cmd: Option<String>,

    /// Write logs here (the terminal belongs to the game)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Command::Engine { seed }) => serve_engine(seed),
        None => play(cli.play).await,
    }
}

async fn play(args: PlayArgs) -> Result<()> {
    if let Some(path) = &args.log_file {
        init_file_logging(path)?;
    }

    let speed = args
        .speed
        .or_else(|| args.route.as_deref().map(SpeedMode::from_route))
        .unwrap_or_default();
    let config = GameConfig::new(args.grid_size, speed);
    config.validate()?;

    let engine: Box<dyn Engine> = match &args.engine_cmd {
        Some(cmd) => Box::new(JsonEngine::new(
            ProcessTransport::from_command_line(cmd)
                .with_context(|| format!("Failed to start engine: {cmd}"))?,
        )),
        None => Box::new(GridEngine::new()),
    };

    let store = open_store(&args);

    info!(?speed, grid_size = config.grid_size, "starting terminal game");
    HumanMode::new(config, engine, store)?.run().await
}

fn open_store(args: &PlayArgs) -> Box<dyn HighScoreStore> {
    if args.no_save {
        return Box::new(MemoryStore::new());
    }
    match args.scores.clone().or_else(FileStore::default_path) {
        Some(path) => {
            info!(path = %path.display(), "using high score file");
            Box::new(FileStore::new(path))
        }
        None => {
            warn!("no data directory found; high scores last for this session only");
            Box::new(MemoryStore::new())
        }
    }
}

fn serve_engine(seed: Option<u64>) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .init();

    let mut engine = match seed {
        Some(seed) => GridEngine::with_seed(seed),
        None => GridEngine::new(),
    };

    let served = serve_lines(&mut engine, stdin().lock(), stdout().lock())
        .context("Engine server I/O failed")?;
    info!(served, "engine input closed");
    Ok(())
}

fn init_file_logging(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}
