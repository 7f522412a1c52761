// src/ingest/providers/json.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use metrics::{counter, histogram};
use url::Url;

use super::Mode;
use crate::ingest::strategies;
use crate::ingest::types::{Item, SourceProvider};

/// Announcement API endpoint returning JSON in one of several known shapes.
pub struct JsonApiProvider {
    name: String,
    base: Url,
    mode: Mode,
}

impl JsonApiProvider {
    pub fn from_fixture_str(name: &str, base: Url, body: &str) -> Self {
        Self {
            name: name.to_string(),
            base,
            mode: Mode::Fixture(body.to_string()),
        }
    }

    pub fn from_url(name: &str, url: &str, base: Url, client: reqwest::Client) -> Self {
        Self {
            name: name.to_string(),
            base,
            mode: Mode::Http {
                url: url.to_string(),
                client,
            },
        }
    }

    /// Records no strategy understands are skipped, not treated as errors.
    /// Only a body that is not JSON at all fails the source.
    pub fn parse_items_from_str(body: &str, base: &Url) -> Result<Vec<Item>> {
        let t0 = std::time::Instant::now();
        let root: serde_json::Value =
            serde_json::from_str(body).context("parsing announcement json")?;

        let records = strategies::find_records(&root);
        let out: Vec<Item> = records
            .iter()
            .filter_map(|r| strategies::extract(r, base))
            .collect();

        if out.len() < records.len() {
            tracing::debug!(
                records = records.len(),
                extracted = out.len(),
                "some json records matched no strategy"
            );
        }

        histogram!("ingest_parse_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);
        counter!("ingest_items_total").increment(out.len() as u64);
        Ok(out)
    }
}

#[async_trait]
impl SourceProvider for JsonApiProvider {
    async fn fetch_latest(&self) -> Result<Vec<Item>> {
        let body = self.mode.body().await?;
        Self::parse_items_from_str(&body, &self.base)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
