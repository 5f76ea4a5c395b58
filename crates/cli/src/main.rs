//! CLI for Strata, the chain state poller and cache-backed read API.
//!
//! Pipeline: LCD queries -> transform -> cache (list + map) -> read API.

mod config;

use clap::{Parser, Subcommand};
use config::Settings;
use std::sync::Arc;
use std::time::Instant;
use strata_api::AppState;
use strata_core::DelegationSnapshot;
use strata_engine::{CacheReader, CacheWriter, DatasetOutcome, Poller};
use strata_provider::ChainQuerier;

#[derive(Parser, Debug)]
#[command(name = "strata", version, about = "Chain state poller and cache-backed read API")]
struct Cli {
    #[command(flatten)]
    settings: Settings,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Poll on a fixed interval and serve the read API.
    Run,

    /// Run a single poll cycle and report each dataset's outcome.
    PollOnce,

    /// Fetch one delegator's delegations, unbondings and rewards.
    Delegations {
        address: String,

        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    if let Ok(path) = dotenv {
        tracing::debug!(path = %path.display(), "loaded .env");
    }

    let cli = Cli::parse();
    let settings = cli.settings;

    match cli.command {
        Commands::Run => run(&settings).await?,
        Commands::PollOnce => poll_once(&settings).await?,
        Commands::Delegations { address, json } => {
            let client = settings.lcd_client()?;
            let t0 = Instant::now();
            let snapshot = strata_engine::fetch_user_delegations(&client, &address).await?;
            tracing::info!(
                address = %address,
                elapsed_ms = t0.elapsed().as_millis() as u64,
                "fetched delegations"
            );

            if json {
                println!("{}", serde_json::to_string_pretty(&snapshot)?);
            } else {
                print!("{}", render_delegations(&address, &snapshot));
            }
        }
    }

    Ok(())
}

async fn run(settings: &Settings) -> Result<(), Box<dyn std::error::Error>> {
    let config = settings.engine_config()?;
    let querier: Arc<dyn ChainQuerier> = Arc::new(settings.lcd_client()?);
    let store = settings.open_store().await?;

    tracing::info!(
        lcd_url = %settings.lcd_url,
        listen = %settings.listen,
        contracts = config.contracts.len(),
        "starting strata"
    );

    let state = AppState::new(CacheReader::new(store.clone()), querier.clone())
        .with_validator_prefix(&settings.validator_prefix);
    let app = strata_api::router(state, &config.contracts);
    let listener = tokio::net::TcpListener::bind(settings.listen).await?;

    let poller = Poller::new(querier, CacheWriter::new(store), config);
    let mut poll_task = tokio::spawn(async move { poller.run().await });

    tokio::select! {
        res = &mut poll_task => {
            match res {
                Ok(Ok(())) => tracing::info!("poller stopped"),
                Ok(Err(e)) => {
                    tracing::error!(error = %e, "poller failed");
                    return Err(e.into());
                }
                Err(e) => return Err(e.into()),
            }
        }
        res = strata_api::serve(listener, app) => {
            poll_task.abort();
            res?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("interrupted, shutting down");
            poll_task.abort();
        }
    }

    Ok(())
}

async fn poll_once(settings: &Settings) -> Result<(), Box<dyn std::error::Error>> {
    let config = settings.engine_config()?;
    let querier = Arc::new(settings.lcd_client()?);
    let store = settings.open_store().await?;
    let poller = Poller::new(querier, CacheWriter::new(store), config);

    let t0 = Instant::now();
    let Some(report) = poller.run_cycle().await? else {
        return Ok(());
    };

    println!("cycle {} (tag {})", report.cycle, report.tag);
    for (dataset, outcome) in &report.outcomes {
        match outcome {
            DatasetOutcome::Published { records } => {
                println!("  {:<12} ok      {records} records", dataset.as_str())
            }
            DatasetOutcome::Failed(msg) => println!("  {:<12} FAILED  {msg}", dataset.as_str()),
        }
    }
    tracing::info!(
        failures = report.failures(),
        elapsed_ms = t0.elapsed().as_millis() as u64,
        "poll cycle done"
    );

    if report.failures() > 0 {
        return Err(format!("{} dataset(s) failed to refresh", report.failures()).into());
    }
    Ok(())
}

fn render_delegations(address: &str, snap: &DelegationSnapshot) -> String {
    let mut out = format!("Delegations for {address}\n");

    out.push_str(&format!("\nActive ({}):\n", snap.delegations.len()));
    for d in &snap.delegations {
        out.push_str(&format!(
            "  {}  {} {}\n",
            d.delegation.validator_address, d.balance.amount, d.balance.denom
        ));
    }

    out.push_str(&format!("\nUnbonding ({}):\n", snap.unbonding_delegations.len()));
    for u in &snap.unbonding_delegations {
        out.push_str(&format!(
            "  {}  {}  completes {}\n",
            u.validator_address,
            u.balance,
            u.completion_time.to_rfc3339()
        ));
    }

    out.push_str("\nRewards:\n");
    for coin in &snap.rewards.total {
        out.push_str(&format!("  {} {}\n", coin.amount, coin.denom));
    }
    out
}
