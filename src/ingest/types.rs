// src/ingest/types.rs
use anyhow::Result;

/// One announcement candidate. Identity is `url`.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct Item {
    pub title: String,
    pub url: String,
    pub date: Option<String>, // usually YYYY-MM-DD
}

impl Item {
    /// Build an item from raw fields. Returns `None` when the title or url
    /// ends up empty after normalization.
    pub fn new(title: &str, url: &str, date: Option<String>) -> Option<Self> {
        Self::build(crate::ingest::normalize_text(title), url, date)
    }

    /// Like [`Item::new`] for a title that is already plain text (entities
    /// decoded, no markup): only whitespace is collapsed.
    pub fn from_plain(title: &str, url: &str, date: Option<String>) -> Option<Self> {
        Self::build(crate::ingest::collapse_whitespace(title), url, date)
    }

    fn build(title: String, url: &str, date: Option<String>) -> Option<Self> {
        let url = url.trim();
        if title.is_empty() || url.is_empty() {
            return None;
        }
        Some(Self {
            title,
            url: url.to_string(),
            date: date.map(|d| d.trim().to_string()).filter(|d| !d.is_empty()),
        })
    }
}

#[async_trait::async_trait]
pub trait SourceProvider: Send + Sync {
    async fn fetch_latest(&self) -> Result<Vec<Item>>;
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_blank_title_or_url() {
        assert!(Item::new("   ", "https://x.test/1", None).is_none());
        assert!(Item::new("Listing", "  ", None).is_none());
    }

    #[test]
    fn trims_and_drops_empty_date() {
        let it = Item::new("  New   listing ", " https://x.test/1 ", Some(" ".into())).unwrap();
        assert_eq!(it.title, "New listing");
        assert_eq!(it.url, "https://x.test/1");
        assert_eq!(it.date, None);
    }

    #[test]
    fn plain_title_keeps_angle_brackets_and_entities() {
        let it = Item::from_plain(" Will List <TOKEN>\n &lt;b&gt; ", "u", None).unwrap();
        assert_eq!(it.title, "Will List <TOKEN> &lt;b&gt;");
        assert!(Item::from_plain(" \n ", "u", None).is_none());
    }
}
