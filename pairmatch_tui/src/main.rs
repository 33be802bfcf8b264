use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{bail, Context};
use clap::Parser;
use host::{Config, LocalContentProvider, Session};
use pairmatch::{fallback_characters, Timing};
use tracing::info;
use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod app;
mod terminal;
mod ui;

#[derive(Parser)]
struct Args {
    /// JSON file with the characters to play with
    #[arg(long)]
    characters: Option<PathBuf>,

    /// Directory with one image per character
    #[arg(long)]
    images: Option<PathBuf>,

    /// RNG seed
    #[arg(long)]
    seed: Option<u64>,

    /// How long a matched pair stays in view before it is scored
    #[arg(long, default_value_t = 500)]
    match_delay_ms: u64,

    /// How long a mismatched pair stays face up before it is hidden again
    #[arg(long, default_value_t = 1500)]
    mismatch_delay_ms: u64,

    /// A log level among "off", "error", "warn", "info", "debug", "trace"
    #[arg(short, long, default_value = "info")]
    log_level: LevelFilter,

    /// Where to write the logs, since the terminal is taken by the UI
    #[arg(long, default_value = "pairmatch.log")]
    log_file: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.mismatch_delay_ms <= args.match_delay_ms {
        bail!("The mismatch delay must be longer than the match delay");
    }

    initialize_logging(args.log_level, &args.log_file)?;

    // Get a random seed
    let seed = args.seed.unwrap_or_else(rand::random);
    info!(seed);

    let config = Config {
        timing: Timing {
            match_delay: Duration::from_millis(args.match_delay_ms),
            mismatch_delay: Duration::from_millis(args.mismatch_delay_ms),
        },
        seed,
        fallback_characters: fallback_characters(),
    };
    let provider = LocalContentProvider::new(args.characters, args.images);
    let session = Session::new(Arc::new(provider), config);

    terminal::run(session).await?;
    Ok(())
}

fn initialize_logging(level: LevelFilter, path: &Path) -> anyhow::Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Could not create log file {}", path.display()))?;

    let format = tracing_subscriber::fmt::format()
        .with_target(false)
        .compact();

    let filter = Targets::new().with_default(level);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .event_format(format)
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .with(filter)
        .init();
    Ok(())
}
