//! run.rs — one pass of the pipeline.
//!
//! fetch → status ping → dedup → notify → mark seen → persist
//!
//! The seen set on disk only changes after the batch message was accepted by
//! the notifier. Any failure after the fetch step propagates, leaving the
//! stored set as it was so the next run retries the same batch.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

use crate::dedup::{mark_seen, select_new};
use crate::ingest::{self, types::SourceProvider};
use crate::notify::{format_batch, format_status, Notifier};
use crate::store::SeenStore;

/// Knobs for a single run.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub app_name: String,
    pub max_batch: usize,
}

/// What a successful run did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub fetched: usize,
    pub failed_sources: Vec<String>,
    /// Urls delivered and marked seen in this run; empty when nothing was new.
    pub notified: Vec<String>,
}

pub async fn run_once(
    providers: &[Box<dyn SourceProvider>],
    notifier: &dyn Notifier,
    store: &SeenStore,
    settings: &RunSettings,
    now: DateTime<Utc>,
) -> Result<RunReport> {
    let seen = store.load().await;
    tracing::debug!(seen = seen.len(), path = %store.path().display(), "seen set loaded");

    let fetched = ingest::fetch_all(providers).await;
    let mut report = RunReport {
        fetched: fetched.items.len(),
        failed_sources: fetched.failures.iter().map(|f| f.provider.clone()).collect(),
        notified: Vec::new(),
    };
    tracing::info!(
        items = report.fetched,
        failed = report.failed_sources.len(),
        "fetch finished"
    );

    notifier
        .send(&format_status(&settings.app_name, report.fetched))
        .await
        .context("sending status message")?;

    let new_items = select_new(&fetched.items, &seen, settings.max_batch);
    if new_items.is_empty() {
        tracing::info!("nothing new");
        return Ok(report);
    }

    notifier
        .send(&format_batch(&settings.app_name, &new_items, now))
        .await
        .context("sending update message")?;

    let next = mark_seen(&seen, &new_items);
    store
        .save(&next)
        .await
        .with_context(|| format!("saving seen set to {}", store.path().display()))?;

    report.notified = new_items.into_iter().map(|it| it.url).collect();
    tracing::info!(notified = report.notified.len(), seen = next.len(), "batch delivered");
    Ok(report)
}
