// tests/providers_fixtures.rs
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use announce_watch::ingest::fetch_all;
use announce_watch::ingest::providers::{
    html::HtmlListProvider, json::JsonApiProvider, rss::RssProvider,
};
use announce_watch::ingest::types::{Item, SourceProvider};
use url::Url;

const LIST_HTML: &str = include_str!("fixtures/announcement_list.html");
const API_JSON: &str = include_str!("fixtures/announcements_api.json");
const FEED_XML: &str = include_str!("fixtures/announcements_rss.xml");

fn base() -> Url {
    Url::parse("https://www.binance.com").unwrap()
}

const FOO: &str = "https://www.binance.com/en/support/announcement/detail/7f1c2a";
const BAR: &str = "https://www.binance.com/en/support/announcement/detail/9ab3e1";
const BAZ: &str = "https://www.binance.com/en/support/announcement/detail/c44d10";

#[tokio::test]
async fn html_list_page_yields_unique_detail_links() {
    let p = HtmlListProvider::from_fixture_str("list", base(), LIST_HTML);
    let items = p.fetch_latest().await.expect("html parse ok");

    let urls: Vec<_> = items.iter().map(|i| i.url.as_str()).collect();
    assert_eq!(urls, vec![FOO, BAR, BAZ]);
    assert_eq!(items[0].date.as_deref(), Some("2025-01-02"));
    assert_eq!(items[2].title, "Notice on Wallet Maintenance for the BAZ Network");
    assert_eq!(items[2].date, None);
}

#[tokio::test]
async fn json_api_and_html_agree_on_identity() {
    let p = JsonApiProvider::from_fixture_str("api", base(), API_JSON);
    let items = p.fetch_latest().await.expect("json parse ok");

    let urls: Vec<_> = items.iter().map(|i| i.url.as_str()).collect();
    assert_eq!(urls, vec![FOO, BAR, BAZ]);
    assert_eq!(items[1].date.as_deref(), Some("2025-01-01"));
}

#[tokio::test]
async fn rss_feed_parses() {
    let p = RssProvider::from_fixture_str("feed", FEED_XML);
    let items = p.fetch_latest().await.expect("rss parse ok");
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].url, FOO);
    assert_eq!(items[0].date.as_deref(), Some("2025-01-02"));
}

struct Broken;

#[async_trait]
impl SourceProvider for Broken {
    async fn fetch_latest(&self) -> Result<Vec<Item>> {
        Err(anyhow!("connection reset"))
    }
    fn name(&self) -> &str {
        "broken"
    }
}

#[tokio::test]
async fn failing_source_is_isolated() {
    let providers: Vec<Box<dyn SourceProvider>> = vec![
        Box::new(Broken),
        Box::new(HtmlListProvider::from_fixture_str("list", base(), LIST_HTML)),
        Box::new(JsonApiProvider::from_fixture_str("bad-json", base(), "<html>oops</html>")),
        Box::new(RssProvider::from_fixture_str("feed", FEED_XML)),
    ];

    let out = fetch_all(&providers).await;
    // Cross-source duplicates are kept here; the dedup step drops them.
    assert_eq!(out.items.len(), 5);
    let failed: Vec<_> = out.failures.iter().map(|f| f.provider.as_str()).collect();
    assert_eq!(failed, vec!["broken", "bad-json"]);
    assert!(out.failures[0].error.contains("connection reset"));
}

#[tokio::test]
async fn all_sources_failing_is_empty_not_error() {
    let providers: Vec<Box<dyn SourceProvider>> = vec![Box::new(Broken), Box::new(Broken)];
    let out = fetch_all(&providers).await;
    assert!(out.items.is_empty());
    assert_eq!(out.failures.len(), 2);
}
