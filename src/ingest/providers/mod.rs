// src/ingest/providers/mod.rs
pub mod html;
pub mod json;
pub mod rss;

use anyhow::{Context, Result};
use std::time::Duration;

use crate::ingest::config::{SourceKind, SourceSpec};
use crate::ingest::types::SourceProvider;

// The list pages answer non-browser agents with a challenge page.
const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Shared HTTP client for all providers (and the notifier).
pub fn build_http_client(timeout: Duration) -> Result<reqwest::Client> {
    let mut headers = reqwest::header::HeaderMap::new();
    headers.insert(
        reqwest::header::ACCEPT_LANGUAGE,
        reqwest::header::HeaderValue::from_static("en-US,en;q=0.9"),
    );

    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .default_headers(headers)
        .build()
        .context("building http client")
}

/// Where a provider gets its body from.
pub(crate) enum Mode {
    Fixture(String),
    Http { url: String, client: reqwest::Client },
}

impl Mode {
    async fn body(&self) -> Result<String> {
        match self {
            Mode::Fixture(s) => Ok(s.clone()),
            Mode::Http { url, client } => {
                let resp = client
                    .get(url)
                    .send()
                    .await
                    .with_context(|| format!("GET {url}"))?;
                let status = resp.status();
                if !status.is_success() {
                    anyhow::bail!("HTTP {status} for {url}");
                }
                resp.text().await.with_context(|| format!("reading body of {url}"))
            }
        }
    }
}

/// Turn configured sources into providers, all sharing `client`.
pub fn build_providers(
    specs: &[SourceSpec],
    client: &reqwest::Client,
) -> Result<Vec<Box<dyn SourceProvider>>> {
    let mut out: Vec<Box<dyn SourceProvider>> = Vec::with_capacity(specs.len());
    for spec in specs {
        let base = spec.base_url()?;
        let p: Box<dyn SourceProvider> = match spec.kind {
            SourceKind::Html => Box::new(html::HtmlListProvider::from_url(
                &spec.name,
                &spec.url,
                base,
                client.clone(),
            )),
            SourceKind::Json => Box::new(json::JsonApiProvider::from_url(
                &spec.name,
                &spec.url,
                base,
                client.clone(),
            )),
            SourceKind::Rss => Box::new(rss::RssProvider::from_url(
                &spec.name,
                &spec.url,
                client.clone(),
            )),
        };
        out.push(p);
    }
    Ok(out)
}
