// In app/src/main.rs

use anyhow::{Context, Result};
use app_config::Settings;
use clap::{Parser, Subcommand};
use engine::Engine;
use events::EngineEvent;
use market_data::ReplayFeed;
use std::path::{Path, PathBuf};
use tokio::sync::{broadcast, watch};
use tracing_subscriber::prelude::*;

mod report;

// --- Command-Line Interface Definition ---

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    long_about = "Scans a watchlist, votes on each symbol and trades under strict risk limits."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Runs the scan/decide/execute loop.
    Run {
        /// Load this file instead of the layered `config/` lookup.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Stop after this many cycles.
        #[arg(long)]
        max_cycles: Option<u64>,

        /// Sell every open position at a fresh quote before exiting.
        #[arg(long)]
        liquidate_on_exit: bool,
    },

    /// Evaluates every watchlist symbol once and prints the votes. Never trades.
    Scan {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Loads and validates the configuration, then prints a summary.
    Check {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

impl Commands {
    fn config_path(&self) -> Option<&Path> {
        match self {
            Commands::Run { config, .. }
            | Commands::Scan { config }
            | Commands::Check { config } => config.as_deref(),
        }
    }
}

// --- Main Application Entry Point ---

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load environment variables from a .env file, if it exists.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut settings = match cli.command.config_path() {
        Some(path) => app_config::load_settings_from(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => app_config::load_settings().context("loading layered configuration")?,
    };

    init_tracing(&settings.app.log_level);
    tracing::info!(environment = %settings.app.environment, "Configuration loaded.");

    match cli.command {
        Commands::Run {
            max_cycles,
            liquidate_on_exit,
            ..
        } => {
            if max_cycles.is_some() {
                settings.scanner.max_cycles = max_cycles;
            }
            if liquidate_on_exit {
                settings.trading.liquidate_on_shutdown = true;
            }
            settings.validate()?;
            handle_run(settings).await?;
        }
        Commands::Scan { .. } => handle_scan(settings).await?,
        Commands::Check { .. } => report::print_settings(&settings),
    }

    Ok(())
}

fn init_tracing(log_level: &str) {
    let level = log_level.parse::<tracing::Level>().unwrap_or(tracing::Level::INFO);
    let fmt_layer = tracing_subscriber::fmt::layer().with_filter(
        tracing_subscriber::filter::Targets::new().with_default(level),
    );
    tracing_subscriber::registry().with(fmt_layer).init();

    if !log_level.eq_ignore_ascii_case(level.as_str()) {
        tracing::warn!(configured = %log_level, "Unknown log level; using INFO.");
    }
}

fn open_feed(settings: &Settings) -> Result<ReplayFeed> {
    let path = &settings.market_data.replay_file;
    let feed = ReplayFeed::from_file(path)
        .with_context(|| format!("opening market data replay {}", path.display()))?;

    let recorded = feed.symbols();
    for symbol in settings.scanner.watchlist.iter().filter(|s| !recorded.contains(s)) {
        tracing::warn!(%symbol, "Watchlist symbol has no recorded data; it will fail every scan.");
    }
    Ok(feed)
}

// --- "Run" Subcommand Logic ---

async fn handle_run(settings: Settings) -> Result<()> {
    let feed = open_feed(&settings)?;

    let (events_tx, events_rx) = broadcast::channel::<EngineEvent>(256);
    let (stop_tx, stop_rx) = watch::channel(false);

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupt received. Stopping after the current cycle.");
            let _ = stop_tx.send(true);
        }
    });

    let reporter = tokio::spawn(report::print_events(events_rx));

    let mut engine = Engine::from_settings(&settings, Box::new(feed), events_tx, stop_rx)?;
    engine.run().await;

    // Closing the channel lets the reporter drain and exit.
    drop(engine);
    reporter.await.context("report printer panicked")?;

    Ok(())
}

// --- "Scan" Subcommand Logic ---

async fn handle_scan(settings: Settings) -> Result<()> {
    let feed = open_feed(&settings)?;
    let (events_tx, _) = broadcast::channel::<EngineEvent>(1);
    let (_stop_tx, stop_rx) = watch::channel(false);

    let mut engine = Engine::from_settings(&settings, Box::new(feed), events_tx, stop_rx)?;
    let results = engine.analyze_watchlist().await;
    report::print_analysis(&results, settings.trading.min_confidence);
    Ok(())
}
