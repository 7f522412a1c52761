// src/ingest/mod.rs
pub mod config;
pub mod providers;
pub mod strategies;
pub mod types;

use crate::ingest::types::{Item, SourceProvider};
use metrics::{counter, describe_counter, describe_histogram};
use once_cell::sync::OnceCell;

/// One-time metrics registration (so series show up once a recorder exists).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("ingest_items_total", "Items parsed from providers.");
        describe_counter!(
            "ingest_provider_errors_total",
            "Provider fetch/parse errors."
        );
        describe_histogram!("ingest_parse_ms", "Provider parse time in milliseconds.");
    });
}

/// Normalize display text: decode entities, strip tags, collapse whitespace.
pub fn normalize_text(s: &str) -> String {
    // 1) HTML entity decode
    let mut out = html_escape::decode_html_entities(s).to_string();

    // 2) Strip HTML tags
    static RE_TAGS: OnceCell<regex::Regex> = OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| regex::Regex::new(r"(?is)</?[^>]+>").unwrap());
    out = re_tags.replace_all(&out, "").to_string();

    // 3) Whitespace + length cap
    collapse_whitespace(&out)
}

/// Collapse whitespace runs (NBSP included), trim, cap at 500 chars.
/// For text that is already plain, e.g. a parsed DOM text node.
pub fn collapse_whitespace(s: &str) -> String {
    static RE_WS: OnceCell<regex::Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| regex::Regex::new(r"[\s\u{00A0}]+").unwrap());
    let out = re_ws.replace_all(s, " ");
    let out = out.trim();
    if out.chars().count() > 500 {
        out.chars().take(500).collect()
    } else {
        out.to_string()
    }
}

/// A source that failed during one fetch pass.
#[derive(Debug, Clone)]
pub struct SourceFailure {
    pub provider: String,
    pub error: String,
}

/// Everything one fetch pass produced. Failures are kept for reporting only.
#[derive(Debug, Default)]
pub struct FetchOutcome {
    pub items: Vec<Item>,
    pub failures: Vec<SourceFailure>,
}

/// Fetch every provider once, in order. A failing provider contributes no
/// items and is recorded in `failures`; it never aborts the pass.
pub async fn fetch_all(providers: &[Box<dyn SourceProvider>]) -> FetchOutcome {
    ensure_metrics_described();

    let mut out = FetchOutcome::default();
    for p in providers {
        match p.fetch_latest().await {
            Ok(mut v) => {
                tracing::debug!(provider = p.name(), items = v.len(), "provider ok");
                out.items.append(&mut v);
            }
            Err(e) => {
                tracing::warn!(error = ?e, provider = p.name(), "provider error");
                counter!("ingest_provider_errors_total").increment(1);
                out.failures.push(SourceFailure {
                    provider: p.name().to_string(),
                    error: format!("{e:#}"),
                });
            }
        }
    }
    out
}
