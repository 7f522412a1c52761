// src/ingest/providers/html.rs
use anyhow::Result;
use async_trait::async_trait;
use metrics::{counter, histogram};
use once_cell::sync::OnceCell;
use scraper::{Html, Selector};
use url::Url;

use super::Mode;
use crate::dedup::dedup_by_url;
use crate::ingest::types::{Item, SourceProvider};

/// Links to announcement detail pages all share this path segment.
const DETAIL_SELECTOR: &str = r#"a[href*="/support/announcement/detail/"]"#;

/// First `20YY-MM-DD` in `s`, if any.
pub fn find_date(s: &str) -> Option<String> {
    static RE_DATE: OnceCell<regex::Regex> = OnceCell::new();
    let re = RE_DATE
        .get_or_init(|| regex::Regex::new(r"(?:^|[^0-9])(20\d{2}-\d{2}-\d{2})(?:[^0-9]|$)").unwrap());
    re.captures(s).map(|c| c[1].to_string())
}

/// Scrapes an announcement list page for detail links.
pub struct HtmlListProvider {
    name: String,
    base: Url,
    mode: Mode,
}

impl HtmlListProvider {
    pub fn from_fixture_str(name: &str, base: Url, html: &str) -> Self {
        Self {
            name: name.to_string(),
            base,
            mode: Mode::Fixture(html.to_string()),
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

    /// Pure parse step; no I/O.
    pub fn parse_items_from_str(html: &str, base: &Url) -> Vec<Item> {
        let t0 = std::time::Instant::now();
        let document = Html::parse_document(html);
        let Ok(selector) = Selector::parse(DETAIL_SELECTOR) else {
            return Vec::new();
        };

        let mut out = Vec::new();
        for a in document.select(&selector) {
            let Some(href) = a.value().attr("href") else {
                continue;
            };
            let Ok(full) = base.join(href) else {
                continue;
            };
            let title = a.text().collect::<Vec<_>>().join(" ");

            // The date usually sits next to the link, inside the same parent.
            let date = a
                .parent()
                .and_then(scraper::ElementRef::wrap)
                .and_then(|p| find_date(&p.text().collect::<Vec<_>>().join(" ")));

            // scraper already decoded entities; the text is plain.
            if let Some(item) = Item::from_plain(&title, full.as_str(), date) {
                out.push(item);
            }
        }

        let out = dedup_by_url(out);
        histogram!("ingest_parse_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);
        counter!("ingest_items_total").increment(out.len() as u64);
        out
    }
}

#[async_trait]
impl SourceProvider for HtmlListProvider {
    async fn fetch_latest(&self) -> Result<Vec<Item>> {
        let body = self.mode.body().await?;
        Ok(Self::parse_items_from_str(&body, &self.base))
    }

    fn name(&self) -> &str {
        &self.name
    }
}
