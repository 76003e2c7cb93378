// src/main.rs
use anyhow::{anyhow, Context, Result};
use chrono::Duration;
use clap::{Parser, Subcommand};
use std::process;
use tracing::{error, info};

use recap_keeper::cache::{MaintenanceAction, StalenessInvalidator, StalenessPolicy};
use recap_keeper::config::{self, CacheConfig, Config};
use recap_keeper::db::{PostgresRecordStore, RecordFilter, RecordStore};
use recap_keeper::logging;
use recap_keeper::share::{HttpPublishEndpoint, PublishPipeline};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "config.toml",
        global = true
    )]
    config: String,

    /// Show verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List every cached player that has been analyzed
    List,
    /// Mark every cached player stale so the analysis runs again (non-destructive)
    Invalidate {
        /// Rewind generated_at this many hours before now (defaults to the staleness threshold)
        #[arg(long)]
        stale_before_hours: Option<i64>,
    },
    /// Delete every cached player record (destructive)
    DeleteAll {
        /// Confirm the irreversible deletion
        #[arg(long)]
        yes: bool,
    },
    /// Publish a rendered share card for one player
    Publish {
        #[arg(long)]
        riot_id: String,

        #[arg(long)]
        tag_line: String,

        /// File containing the rendered card as a data URL
        #[arg(long, value_name = "FILE")]
        card: String,

        #[arg(long, default_value = "Check out my season recap!")]
        caption: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match config::load_config(&cli.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Failed to load configuration from {}: {}", cli.config, e);
            process::exit(1);
        }
    };

    let _log_guard = logging::init_logging(config.logging.as_ref(), cli.verbose)?;

    info!("Recap Keeper v{}", env!("CARGO_PKG_VERSION"));
    info!("Loaded configuration from: {}", cli.config);

    let result = match cli.command {
        Commands::List => list_players(&config).await,
        Commands::Invalidate { stale_before_hours } => {
            invalidate_players(&config, stale_before_hours).await
        }
        Commands::DeleteAll { yes } => {
            if !yes {
                error!("delete-all removes every cached player permanently; re-run with --yes");
                process::exit(1);
            }
            run_maintenance(&config, MaintenanceAction::DeleteAll).await
        }
        Commands::Publish {
            riot_id,
            tag_line,
            card,
            caption,
        } => publish_card(&config, &riot_id, &tag_line, &card, &caption).await,
    };

    if let Err(e) = result {
        error!("{:#}", e);
        process::exit(1);
    }

    Ok(())
}

async fn initialize_invalidator(
    config: &Config,
) -> Result<StalenessInvalidator<PostgresRecordStore>> {
    let store = PostgresRecordStore::new(&config.database)
        .await
        .context("Failed to connect to the player store")?;
    Ok(StalenessInvalidator::new(
        store,
        StalenessPolicy::from(&config.cache),
    ))
}

/// Print every analyzed player without changing anything
async fn list_players(config: &Config) -> Result<()> {
    let invalidator = initialize_invalidator(config).await?;
    let players = invalidator
        .list_cached_players()
        .await
        .context("Failed to list cached players")?;

    info!("{} cached players", players.len());
    for player in players {
        println!(
            "{}#{}\t{}",
            player.riot_id, player.tag_line, player.archetype.name
        );
    }
    Ok(())
}

/// How far before now invalidated players are moved
fn stale_before_window(cache: &CacheConfig, stale_before_hours: Option<i64>) -> Result<Duration> {
    match stale_before_hours {
        Some(hours) => Duration::try_hours(hours)
            .ok_or_else(|| anyhow!("--stale-before-hours {} is out of range", hours)),
        None => Ok(StalenessPolicy::from(cache).threshold),
    }
}

async fn invalidate_players(config: &Config, stale_before_hours: Option<i64>) -> Result<()> {
    let stale_before = stale_before_window(&config.cache, stale_before_hours)?;
    run_maintenance(config, MaintenanceAction::MarkStale { stale_before }).await
}

async fn run_maintenance(config: &Config, action: MaintenanceAction) -> Result<()> {
    let invalidator = initialize_invalidator(config).await?;
    let report = invalidator
        .run(action)
        .await
        .context(format!("Maintenance run '{}' failed", action))?;

    info!(
        "Maintenance run '{}' completed: {} of {} listed players affected",
        report.action,
        report.affected,
        report.listed.len()
    );
    Ok(())
}

async fn publish_card(
    config: &Config,
    riot_id: &str,
    tag_line: &str,
    card_path: &str,
    caption: &str,
) -> Result<()> {
    let publish_config = config
        .publish
        .as_ref()
        .ok_or_else(|| anyhow!("No [publish] section in configuration"))?;

    let card = tokio::fs::read_to_string(card_path)
        .await
        .context(format!("Failed to read card from {}", card_path))?;

    let store = PostgresRecordStore::new(&config.database)
        .await
        .context("Failed to connect to the player store")?;
    let player = store
        .select(&RecordFilter::player(riot_id, tag_line))
        .await
        .context("Failed to look up player")?
        .into_iter()
        .next()
        .ok_or_else(|| anyhow!("No cached player {}#{}", riot_id, tag_line))?;

    let endpoint = HttpPublishEndpoint::new(publish_config)?;
    let pipeline = PublishPipeline::new(endpoint, player);

    let result = pipeline.publish(card.trim(), caption).await?;
    info!("Share card published for {}", pipeline.player().display_name());
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
