//! Supply chain risk pipeline — CLI entry point.
//!
//! # Usage
//!
//! ```bash
//! # Run one stage's competing-consumer worker loop
//! supplyrisk worker --stage extract
//! supplyrisk worker --stage score
//! supplyrisk worker --stage alert
//!
//! # Run the Fetcher on its polling interval
//! supplyrisk schedule
//! ```
//!
//! # Environment Variables
//!
//! See [`supplyrisk::config::Settings`] for the full list (`REDIS_URL`,
//! `DATABASE_URL`, `LLM_API_KEY`, `LLM_BASE_URL`, `RELEVANCE_THRESHOLD`,
//! `ALERT_THRESHOLD`, `FETCH_INTERVAL_SECS`, `DEDUP_TTL_SECS`,
//! `PROPAGATION_THRESHOLD`). `NEWSAPI_KEY`/`NEWSAPI_BASE_URL` select the
//! Fetcher's news source. `RISK_CONFIG` points at the company profile
//! TOML file. `RUST_LOG` controls log verbosity (default: info).

use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use uuid::Uuid;

use supplyrisk::catalog::{Catalog, CatalogHandle};
use supplyrisk::config;
use supplyrisk::dedup::redis_dedup::RedisDedupIndex;
use supplyrisk::errors::PipelineError;
use supplyrisk::graph::{self, GraphHandle};
use supplyrisk::ingestion::fetcher::Fetcher;
use supplyrisk::ingestion::newsapi::NewsApiClient;
use supplyrisk::llm::gemini::GeminiClient;
use supplyrisk::llm::LlmClient;
use supplyrisk::notify::{NoopNotifier, Notifier};
use supplyrisk::relevance::EmbeddingClient;
use supplyrisk::scheduler;
use supplyrisk::store::postgres::PostgresStore;
use supplyrisk::store::DocumentStore;
use supplyrisk::stream::redis_bus::RedisStreamBus;
use supplyrisk::stream::StreamBus;
use supplyrisk::worker::{self, WorkerContext};

#[derive(Parser, Debug)]
#[command(name = "supplyrisk")]
#[command(about = "Supply chain risk pipeline: ingestion, LLM risk extraction, scoring, propagation, alerting")]
#[command(version)]
struct CliArgs {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load seed catalog/company data into the document store (external collaborator).
    Seed,
    /// Generate sample articles/suppliers for local testing (external collaborator).
    CreateSampleData,
    /// Run one pipeline stage's competing-consumer worker loop until shutdown.
    Worker {
        #[arg(long, value_enum)]
        stage: Stage,
    },
    /// Run the Fetcher on its polling interval until shutdown.
    Schedule,
    /// REST/WebSocket API surface (non-goal; stub only).
    Api,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Stage {
    Extract,
    Score,
    Alert,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Extract => write!(f, "extract"),
            Stage::Score => write!(f, "score"),
            Stage::Alert => write!(f, "alert"),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = CliArgs::parse();

    match args.command {
        Command::Seed => {
            info!("seed: external collaborator contract only, no built-in loader — exiting");
            return Ok(());
        }
        Command::CreateSampleData => {
            info!("create-sample-data: external collaborator contract only, no built-in generator — exiting");
            return Ok(());
        }
        Command::Api => {
            info!("api: REST/WebSocket surface is out of scope for this crate — exiting");
            return Ok(());
        }
        Command::Worker { stage } => run_worker(stage).await,
        Command::Schedule => run_schedule().await,
    }
}

/// Load settings, initialize the company profile global, connect the
/// document store, run its migrations, and load the initial supplier
/// catalog. Shared by both the worker and scheduler entry points. Fatal
/// at any step (spec §7 `ConfigError`: fail-fast).
async fn bootstrap_store(
) -> anyhow::Result<(config::Settings, Arc<dyn DocumentStore>, Catalog)> {
    let settings = config::Settings::from_env().map_err(config_fatal)?;

    let profile = config::load_company_profile();
    config::init(profile);
    let company = config::get();

    let store = PostgresStore::connect(&settings.database_url)
        .await
        .map_err(config_fatal)?;
    store.run_migrations().await.map_err(config_fatal)?;
    let store: Arc<dyn DocumentStore> = Arc::new(store);

    let suppliers = store.suppliers_for_company(&company.company_id).await?;
    Ok((settings, store, Catalog::new(suppliers)))
}

/// Build the full [`WorkerContext`] a stage worker needs: everything
/// from [`bootstrap_store`] plus the stream bus, the initial supply
/// graph, the LLM/embedding client, and the notifier.
async fn bootstrap_worker() -> anyhow::Result<(WorkerContext, config::Settings)> {
    let (settings, store, catalog) = bootstrap_store().await?;
    let company = config::get();

    let graph = GraphHandle::new(graph::builder::build(&company, &catalog));
    let catalog = CatalogHandle::new(catalog);

    let bus: Arc<dyn StreamBus> = Arc::new(
        RedisStreamBus::connect(&settings.redis_url)
            .await
            .map_err(config_fatal)?,
    );

    let gemini = Arc::new(GeminiClient::new(
        settings.llm_base_url.clone(),
        settings.llm_api_key.clone(),
    ));
    let llm: Arc<dyn LlmClient> = gemini.clone();
    let embeddings: Arc<dyn EmbeddingClient> = gemini;
    let notifier: Arc<dyn Notifier> = Arc::new(NoopNotifier);

    let ctx = WorkerContext {
        bus,
        store,
        catalog,
        graph,
        llm,
        embeddings,
        notifier,
        relevance_threshold: settings.relevance_threshold,
        alert_threshold: settings.alert_threshold,
        propagation_threshold: settings.propagation_threshold,
    };

    Ok((ctx, settings))
}

fn config_fatal(e: PipelineError) -> anyhow::Error {
    anyhow::anyhow!("{e}")
}

/// Task identification for supervisor logging.
#[derive(Debug, Clone, Copy)]
enum TaskName {
    Extract,
    Score,
    Alert,
    Scheduler,
}

impl std::fmt::Display for TaskName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskName::Extract => write!(f, "ExtractWorker"),
            TaskName::Score => write!(f, "ScoreWorker"),
            TaskName::Alert => write!(f, "AlertWorker"),
            TaskName::Scheduler => write!(f, "Scheduler"),
        }
    }
}

fn install_shutdown_handler(cancel: CancellationToken) {
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("received Ctrl+C, initiating graceful shutdown");
        cancel.cancel();
    });
}

async fn run_worker(stage: Stage) -> anyhow::Result<()> {
    let (ctx, _settings) = bootstrap_worker().await?;
    let cancel = CancellationToken::new();
    install_shutdown_handler(cancel.clone());

    let consumer = format!("{stage}-{}", Uuid::new_v4());
    info!(%stage, %consumer, "starting worker");

    let mut tasks: JoinSet<TaskName> = JoinSet::new();
    let task_cancel = cancel.clone();
    let task_ctx = ctx;
    match stage {
        Stage::Extract => {
            tasks.spawn(async move {
                worker::extract::run(task_ctx, consumer, task_cancel).await;
                TaskName::Extract
            });
        }
        Stage::Score => {
            tasks.spawn(async move {
                worker::score::run(task_ctx, consumer, task_cancel).await;
                TaskName::Score
            });
        }
        Stage::Alert => {
            tasks.spawn(async move {
                worker::alert::run(task_ctx, consumer, task_cancel).await;
                TaskName::Alert
            });
        }
    }

    while let Some(result) = tasks.join_next().await {
        match result {
            Ok(name) => info!(%name, "worker task exited"),
            Err(e) => error!(error = %e, "worker task panicked"),
        }
    }

    info!("worker shutdown complete");
    Ok(())
}

async fn run_schedule() -> anyhow::Result<()> {
    let (settings, _store, catalog) = bootstrap_store().await?;
    let catalog = Arc::new(catalog);
    let cancel = CancellationToken::new();
    install_shutdown_handler(cancel.clone());

    let news_api_key = std::env::var("NEWSAPI_KEY").unwrap_or_default();
    let news_base_url = std::env::var("NEWSAPI_BASE_URL")
        .unwrap_or_else(|_| "https://newsapi.org".to_string());
    if news_api_key.is_empty() {
        warn!("NEWSAPI_KEY not set — Fetcher cycles will fail and retry on the next tick");
    }

    let fetcher = Arc::new(Fetcher::new(
        NewsApiClient::new(news_base_url, news_api_key),
        RedisDedupIndex::connect(&settings.redis_url)
            .await
            .map_err(config_fatal)?,
        RedisStreamBus::connect(&settings.redis_url)
            .await
            .map_err(config_fatal)?,
        settings.dedup_ttl_secs,
    ));

    const MAX_ARTICLES_PER_CYCLE: usize = 100;

    let mut tasks: JoinSet<TaskName> = JoinSet::new();
    let task_cancel = cancel.clone();
    tasks.spawn(async move {
        scheduler::run_interval(
            std::time::Duration::from_secs(settings.fetch_interval_secs),
            task_cancel,
            || {
                let fetcher = fetcher.clone();
                let catalog = catalog.clone();
                async move {
                    let company = config::get();
                    let counts = fetcher
                        .run_cycle(&company, &catalog, MAX_ARTICLES_PER_CYCLE)
                        .await;
                    info!(?counts, "scheduled fetch cycle complete");
                }
            },
        )
        .await;
        TaskName::Scheduler
    });

    while let Some(result) = tasks.join_next().await {
        match result {
            Ok(name) => info!(%name, "scheduler task exited"),
            Err(e) => error!(error = %e, "scheduler task panicked"),
        }
    }

    info!("scheduler shutdown complete");
    Ok(())
}
