use anyhow::Context;
use clap::{Parser, Subcommand};
use freefood::classifier::Classifier;
use freefood::config::env_loader::load_config;
use freefood::config::model::{Config, FoodStrategy};
use freefood::events::store::EventStore;
use freefood::logging::setup_logging;
use freefood::rubric::api::RubricAPI;
use freefood::rubric::collector::collect;
use freefood::web;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "freefood")]
#[command(about = "Collects campus events, finds the ones with free food and serves them")]
struct Cli {
    /// Events file to read and write (overrides EVENTS_PATH)
    #[arg(short, long)]
    events_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the current listings from Rubric into the events file
    Collect,
    /// Mark every unclassified event with whether it offers free food
    Enrich {
        /// keyword or llm (overrides FOOD_STRATEGY)
        #[arg(short, long)]
        strategy: Option<FoodStrategy>,
    },
    /// Serve the events file as web pages and a calendar feed
    Serve {
        /// Address to listen on (overrides BIND_ADDR)
        #[arg(short, long)]
        bind: Option<SocketAddr>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let logging = setup_logging().await;

    let result = run(Cli::parse()).await;
    if let Err(err) = &result {
        error!("Fatal error: {err:#}");
    }

    logging.shutdown().await;
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config: Config = load_config().context("Failed loading config")?;

    if let Some(events_path) = cli.events_path {
        config.events_path = events_path;
    }

    let store = EventStore::new(&config.events_path);

    match cli.command {
        Commands::Collect => {
            let count = collect(&RubricAPI::default(), &config.search, &store)
                .await
                .context("Failed collecting events")?;

            info!("Collected {} events", count);
        }
        Commands::Enrich { strategy } => {
            if let Some(strategy) = strategy {
                config.classifier.strategy = strategy;
            }

            let classifier = Classifier::from_config(&config.classifier)?;
            let summary = store
                .update(&classifier)
                .await
                .context("Failed saving enriched events")?;

            info!(
                "Processed {} events, {} with free food",
                summary.processed(),
                summary.with_food
            );
        }
        Commands::Serve { bind } => {
            web::serve(bind.unwrap_or(config.bind_addr), store)
                .await
                .context("Web server failed")?;
        }
    }

    Ok(())
}
