//! Live bet-slip tracker entry point.

use std::io::Read;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use schedina::api::{create_router, AppState};
use schedina::config::Config;
use schedina::metrics;
use schedina::oracle::{GeminiOracle, OfflineOracle, ScoreOracle};
use schedina::slip::parse_slip;
use schedina::tracker::{MatchPoller, SlipEvent, SlipStore};
use schedina::utils::shutdown_signal;
use schedina::SlipError;

/// Live bet-slip tracker backed by an AI score oracle.
#[derive(Parser, Debug)]
#[command(name = "schedina")]
#[command(about = "Track a pasted bet slip against live scores")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,

    /// HTTP server port for the slip API.
    #[arg(short, long)]
    port: Option<u16>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the tracker service (default).
    Run {
        /// HTTP server port for the slip API.
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Check configuration validity.
    CheckConfig,

    /// Parse a slip from a file (or stdin) and print the recognized bets.
    Parse {
        /// Slip file; stdin when omitted.
        file: Option<PathBuf>,
    },

    /// Query the score oracle once for a single match.
    Probe {
        /// Home team name.
        home_team: String,
        /// Away team name.
        away_team: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Initialize logging
    let filter = if args.verbose {
        EnvFilter::new("schedina=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    match args.command {
        Some(Command::CheckConfig) => cmd_check_config().await,
        Some(Command::Parse { file }) => cmd_parse(file),
        Some(Command::Probe {
            home_team,
            away_team,
        }) => cmd_probe(home_team, away_team).await,
        Some(Command::Run { port }) => cmd_run(port).await,
        None => cmd_run(args.port).await,
    }
}

/// Build the configured oracle: Gemini when a key is present, offline
/// placeholders otherwise.
fn build_oracle(config: &Config) -> Arc<dyn ScoreOracle> {
    match &config.gemini_api_key {
        Some(key) => Arc::new(GeminiOracle::new(config, key.clone())),
        None => {
            warn!("GEMINI_API_KEY not set, running with placeholder snapshots");
            Arc::new(OfflineOracle::new())
        }
    }
}

/// Run the tracker service.
async fn cmd_run(port_override: Option<u16>) -> anyhow::Result<()> {
    // Load configuration
    info!("Loading configuration...");
    let config = Config::load().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        return Err(anyhow::anyhow!("Configuration validation failed: {}", e));
    }

    let port = port_override.unwrap_or(config.port);

    info!("Configuration loaded successfully");
    info!(
        "Oracle: {}",
        if config.has_oracle() { config.gemini_model.as_str() } else { "OFFLINE" }
    );
    info!("Initial-load spacing: {}ms", config.initial_spacing_ms);
    info!("Refresh period: {}s", config.refresh_interval_secs);

    // Initialize metrics
    let prometheus = metrics::install_recorder();
    metrics::init_metrics();

    // Wire store, oracle, and poller
    let store = Arc::new(SlipStore::new());
    let oracle = build_oracle(&config);
    let poller = Arc::new(MatchPoller::new(Arc::clone(&store), oracle, &config));

    // Log slip events (goals, load completion) for operators
    let mut events = store.subscribe();
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(SlipEvent::Goal {
                    home_team,
                    away_team,
                    ..
                }) => info!("GOAL: {} - {}", home_team, away_team),
                Ok(SlipEvent::LoadComplete) => info!("Slip fully loaded"),
                Ok(_) => {}
                Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "slip event stream lagged");
                }
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    let app_state = AppState::new(store, poller).with_prometheus(prometheus);

    // Start HTTP server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    info!("HTTP server listening on {}", addr);

    app_state.set_ready(true);
    let router = create_router(app_state);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutdown complete");
    Ok(())
}

/// Check configuration validity.
async fn cmd_check_config() -> anyhow::Result<()> {
    println!("======================================================================");
    println!("SCHEDINA - CONFIGURATION CHECK");
    println!("======================================================================");

    // Load configuration
    print!("Loading configuration... ");
    let config = match Config::load() {
        Ok(c) => {
            println!("OK");
            c
        }
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration load failed"));
        }
    };

    // Validate configuration
    print!("Validating configuration... ");
    match config.validate() {
        Ok(()) => println!("OK"),
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration validation failed"));
        }
    }

    // Show configuration summary
    println!("----------------------------------------------------------------------");
    println!("Configuration Summary:");
    println!(
        "  Oracle: {}",
        if config.has_oracle() {
            "Gemini (key present)"
        } else {
            "OFFLINE - placeholder snapshots only"
        }
    );
    println!("  Model: {}", config.gemini_model);
    println!("  Initial-load spacing: {}ms", config.initial_spacing_ms);
    println!("  Refresh period: {}s", config.refresh_interval_secs);
    println!("  HTTP timeout: {}ms", config.http_timeout_ms);
    println!("  Port: {}", config.port);
    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");

    Ok(())
}

/// Parse a slip and print the recognized bets.
fn cmd_parse(file: Option<PathBuf>) -> anyhow::Result<()> {
    let text = match file {
        Some(path) => std::fs::read_to_string(path).map_err(SlipError::Io)?,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .map_err(SlipError::Io)?;
            buffer
        }
    };

    match parse_slip(&text) {
        Ok(entries) => {
            println!("Recognized {} bet(s):", entries.len());
            for entry in &entries {
                println!(
                    "  #{}  {} - {}  [{}]",
                    entry.id, entry.home_team, entry.away_team, entry.selection
                );
            }
            Ok(())
        }
        Err(e) => {
            println!("No matches recognized. Example: \"Napoli - Inter 1\"");
            Err(SlipError::Parse(e).into())
        }
    }
}

/// Query the oracle once and print the snapshot.
async fn cmd_probe(home_team: String, away_team: String) -> anyhow::Result<()> {
    println!("======================================================================");
    println!("SCHEDINA - ORACLE PROBE");
    println!("======================================================================");

    let config = Config::load()?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    let oracle = build_oracle(&config);

    println!("\nQuerying oracle for {} vs {}...\n", home_team, away_team);
    let snapshot = oracle.fetch_snapshot(&home_team, &away_team).await;

    println!("  Status: {}", snapshot.status);
    println!("  Score: {} - {}", snapshot.home_score, snapshot.away_score);
    println!("  Kick-off: {}", snapshot.start_time);
    match snapshot.minute {
        Some(minute) => println!("  Minute: {}'", minute),
        None => println!("  Minute: -"),
    }
    println!("======================================================================");

    Ok(())
}
