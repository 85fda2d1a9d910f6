/// Ample - interactive playback shell
use ample_audio::ClockBackend;
use ample_playback::{PlayerService, Transport};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod library;
mod shell;

use crate::config::AppConfig;
use crate::shell::Shell;

#[derive(Parser)]
#[command(name = "ample")]
#[command(about = "Queue and play songs from a library", long_about = None)]
struct Cli {
    /// Configuration file path (default: ./ample.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// JSON song library (default: built-in demo library)
    #[arg(short, long)]
    library: Option<PathBuf>,

    /// Start with repeat enabled
    #[arg(long)]
    repeat: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    if cli.repeat {
        config.playback.repeat = true;
    }

    let songs = match &cli.library {
        Some(path) => library::load(path)?,
        None => library::demo(),
    };
    info!(songs = songs.len(), "Loaded library");

    let backend = Arc::new(ClockBackend::new(songs.clone(), config.clock.clone()));
    let seek_step = config.playback.seek_step();
    let player = PlayerService::spawn(Transport::new(backend, config.playback));

    let shell = Shell::new(player, songs, seek_step);
    shell.spawn_event_printer();

    println!("Ample ready. Type `help` for commands.");
    shell.run(BufReader::new(tokio::io::stdin())).await
}
