//! announce-watch — binary entrypoint.
//! One invocation = one pass: fetch, ping, diff, notify, persist. Scheduling
//! is left to cron / CI.

use anyhow::Result;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use announce_watch::config::AppConfig;
use announce_watch::ingest::{config::load_sources_default, providers};
use announce_watch::notify::TelegramNotifier;
use announce_watch::{run_once, RunSettings, SeenStore};

/// `RUST_LOG` wins; otherwise info for this crate, warn for dependencies.
/// `LOG_FORMAT=json` switches to one JSON object per line.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("announce_watch=info,warn"));

    let json = std::env::var("LOG_FORMAT")
        .ok()
        .is_some_and(|v| v.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer().compact()).init();
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load .env when present; real env vars take precedence.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cfg = AppConfig::from_env()?;
    let sources = load_sources_default()?;
    let client = providers::build_http_client(cfg.http_timeout)?;
    let providers = providers::build_providers(&sources, &client)?;

    let notifier = TelegramNotifier::new(cfg.tg_token.clone(), cfg.tg_chat_id.clone(), client);
    let store = SeenStore::new(cfg.seen_path.clone());
    let settings = RunSettings {
        app_name: cfg.app_name.clone(),
        max_batch: cfg.max_batch,
    };

    tracing::info!(sources = providers.len(), store = %store.path().display(), "run starting");
    let report = run_once(&providers, &notifier, &store, &settings, chrono::Utc::now()).await?;
    tracing::info!(
        fetched = report.fetched,
        failed_sources = ?report.failed_sources,
        notified = report.notified.len(),
        "run finished"
    );
    Ok(())
}
