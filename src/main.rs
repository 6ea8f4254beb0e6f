use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use monster_radar::{
    follow::LocationFollow,
    session,
    telemetry,
    web::{self, WebServerConfig},
    ConfigLoader, Engine, GameConfig,
};

#[derive(Debug, Parser)]
#[command(author, version, about = "Monster radar simulation runner")]
struct Cli {
    /// Path to a game config YAML file (built-in defaults when omitted)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the tick budget of a headless run
    #[arg(long)]
    ticks: Option<u64>,

    /// Override the random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Override snapshot interval in ticks (0 disables)
    #[arg(long)]
    snapshot_interval: Option<u64>,

    /// Directory for snapshots
    #[arg(long)]
    snapshot_dir: Option<PathBuf>,

    /// Serve the live session over HTTP instead of a headless run
    #[arg(long)]
    serve: bool,

    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    #[arg(long, default_value_t = 8080)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => ConfigLoader::new(".").load(path)?,
        None => GameConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    if let Some(interval) = cli.snapshot_interval {
        config.snapshot_interval_ticks = interval;
    }
    telemetry::init(&config.logging.level);

    let snapshot_dir = cli
        .snapshot_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from("snapshots"));
    let engine = Engine::from_config(&config, snapshot_dir);

    if cli.serve {
        let (handle, task) = session::spawn(
            engine,
            LocationFollow::new(config.camera.zoom),
            config.tick_period(),
        );
        web::serve(
            handle.clone(),
            WebServerConfig {
                host: cli.host,
                port: cli.port,
            },
        )
        .await?;
        let _ = handle.shutdown();
        task.await.context("game session task panicked")?;
        return Ok(());
    }

    run_headless(engine, &config, cli.ticks)
}

fn run_headless(mut engine: Engine, config: &GameConfig, ticks: Option<u64>) -> Result<()> {
    let player = config
        .player
        .context("headless runs need a fixed `player` position in the config")?;
    let ticks = config.ticks(ticks);
    let executed = engine.run_with_hook(
        ticks,
        |_| Some(player),
        |snapshot| {
            if let Some(message) = &snapshot.state.status_message {
                tracing::info!(tick = snapshot.tick, "{message}");
            }
        },
    )?;

    let state = engine.state();
    if state.is_game_over {
        println!(
            "Scenario '{}': caught after {} ({} ticks, {} monsters).",
            engine.scenario_name(),
            state.formatted_time(),
            executed,
            engine.world().population().len()
        );
        println!("{}", state.share_message());
    } else {
        println!(
            "Scenario '{}': survived all {} ticks ({}), {} monsters still hunting.",
            engine.scenario_name(),
            executed,
            state.formatted_time(),
            engine.world().population().len()
        );
    }
    Ok(())
}
