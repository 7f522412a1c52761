//! Field-name guessing for JSON announcement records.
//!
//! Upstream APIs rename and re-nest fields without notice. Instead of one
//! rigid `Deserialize` shape, each record is offered to an ordered list of
//! extraction strategies; the first one that yields an [`Item`] wins. Every
//! strategy is a pure function so it can be tested on its own.

use serde_json::Value;
use url::Url;

use crate::ingest::types::Item;

/// A single way of reading an [`Item`] out of a raw record.
pub type Strategy = fn(&Value, &Url) -> Option<Item>;

/// Strategies in priority order.
pub const STRATEGIES: &[(&str, Strategy)] = &[
    ("direct_link", direct_link),
    ("article_code", article_code),
    ("nested_article", nested_article),
];

const TITLE_KEYS: &[&str] = &["title", "name", "headline"];
const URL_KEYS: &[&str] = &["url", "link", "href"];
const CODE_KEYS: &[&str] = &["code", "articleCode"];
const DATE_KEYS: &[&str] = &["date", "releaseDate", "publishDate", "published_at"];
const NESTED_KEYS: &[&str] = &["article", "data", "item"];

/// Paths (object keys; `*` fans out over an array) where record lists live.
const RECORD_PATHS: &[&[&str]] = &[
    &["data", "catalogs", "*", "articles"],
    &["data", "articles"],
    &["articles"],
    &["data", "items"],
    &["items"],
    &["data"],
    &[],
];

/// Run the strategies in order; first success wins.
pub fn extract(raw: &Value, base: &Url) -> Option<Item> {
    STRATEGIES.iter().find_map(|(name, strategy)| {
        let item = strategy(raw, base)?;
        tracing::trace!(strategy = *name, url = %item.url, "record matched");
        Some(item)
    })
}

/// Locate the record list inside an API response. Returns the records of the
/// first path that resolves to at least one array.
pub fn find_records(root: &Value) -> Vec<&Value> {
    for path in RECORD_PATHS {
        let arrays = resolve(root, path);
        if !arrays.is_empty() {
            return arrays.into_iter().flatten().collect();
        }
    }
    Vec::new()
}

fn resolve<'a>(v: &'a Value, path: &[&str]) -> Vec<&'a Vec<Value>> {
    match path.split_first() {
        None => v.as_array().into_iter().collect(),
        Some((&"*", rest)) => v
            .as_array()
            .map(|arr| arr.iter().flat_map(|x| resolve(x, rest)).collect())
            .unwrap_or_default(),
        Some((key, rest)) => v.get(*key).map(|x| resolve(x, rest)).unwrap_or_default(),
    }
}

/// `{title|name|headline, url|link|href}`
pub fn direct_link(raw: &Value, base: &Url) -> Option<Item> {
    let title = first_str(raw, TITLE_KEYS)?;
    let href = first_str(raw, URL_KEYS)?;
    let url = base.join(href).ok()?;
    Item::new(title, url.as_str(), date_field(raw))
}

/// `{title, code}`: the detail page url is derived from the article code.
pub fn article_code(raw: &Value, base: &Url) -> Option<Item> {
    let title = first_str(raw, &["title"])?;
    let code = first_scalar(raw, CODE_KEYS)?;
    let url = base
        .join(&format!("/en/support/announcement/detail/{code}"))
        .ok()?;
    Item::new(title, url.as_str(), date_field(raw))
}

/// The record wraps the real article one level down.
pub fn nested_article(raw: &Value, base: &Url) -> Option<Item> {
    NESTED_KEYS
        .iter()
        .filter_map(|k| raw.get(*k).filter(|v| v.is_object()))
        .find_map(|inner| direct_link(inner, base).or_else(|| article_code(inner, base)))
}

fn first_str<'a>(raw: &'a Value, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .filter_map(|k| raw.get(*k).and_then(Value::as_str))
        .find(|s| !s.trim().is_empty())
}

fn first_scalar(raw: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|k| match raw.get(*k)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// Dates come either as text (kept to the `YYYY-MM-DD` prefix when present)
/// or as an epoch number in seconds or milliseconds.
fn date_field(raw: &Value) -> Option<String> {
    DATE_KEYS.iter().find_map(|k| match raw.get(*k)? {
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                None
            } else {
                Some(crate::ingest::providers::html::find_date(s).unwrap_or_else(|| s.to_string()))
            }
        }
        Value::Number(n) => n.as_i64().and_then(epoch_to_date),
        _ => None,
    })
}

fn epoch_to_date(n: i64) -> Option<String> {
    let secs = if n >= 100_000_000_000 { n / 1000 } else { n };
    chrono::DateTime::from_timestamp(secs, 0).map(|dt| dt.format("%Y-%m-%d").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn base() -> Url {
        Url::parse("https://www.binance.com").unwrap()
    }

    #[test]
    fn direct_link_resolves_relative_href() {
        let raw = json!({"headline": "Notice", "href": "/en/support/announcement/detail/abc"});
        let it = direct_link(&raw, &base()).unwrap();
        assert_eq!(it.title, "Notice");
        assert_eq!(it.url, "https://www.binance.com/en/support/announcement/detail/abc");
    }

    #[test]
    fn article_code_builds_detail_url_and_epoch_date() {
        let raw = json!({"title": "Will List FOO", "code": "c0ffee", "releaseDate": 1_704_067_200_000i64});
        let it = article_code(&raw, &base()).unwrap();
        assert_eq!(it.url, "https://www.binance.com/en/support/announcement/detail/c0ffee");
        assert_eq!(it.date.as_deref(), Some("2024-01-01"));
    }

    #[test]
    fn direct_link_wins_over_code() {
        let raw = json!({"title": "T", "url": "https://x.test/a", "code": "zzz"});
        assert_eq!(extract(&raw, &base()).unwrap().url, "https://x.test/a");
    }

    #[test]
    fn nested_record_is_unwrapped() {
        let raw = json!({"article": {"title": "Inner", "code": 7}});
        let it = extract(&raw, &base()).unwrap();
        assert_eq!(it.title, "Inner");
        assert!(it.url.ends_with("/detail/7"));
    }

    #[test]
    fn unknown_shape_yields_none() {
        assert!(extract(&json!({"foo": 1}), &base()).is_none());
        assert!(extract(&json!("just text"), &base()).is_none());
    }

    #[test]
    fn string_date_is_cut_to_day() {
        let raw = json!({"title": "T", "url": "/a", "date": "2025-03-04T10:00:00Z"});
        assert_eq!(extract(&raw, &base()).unwrap().date.as_deref(), Some("2025-03-04"));
    }

    #[test]
    fn finds_records_under_catalogs() {
        let root = json!({"data": {"catalogs": [
            {"articles": [{"title": "A", "code": "1"}]},
            {"articles": [{"title": "B", "code": "2"}]}
        ]}});
        assert_eq!(find_records(&root).len(), 2);
    }

    #[test]
    fn finds_records_at_root_array() {
        let root = json!([{"title": "A", "url": "/a"}]);
        assert_eq!(find_records(&root).len(), 1);
        assert!(find_records(&json!({"data": {"x": 1}})).is_empty());
    }
}
