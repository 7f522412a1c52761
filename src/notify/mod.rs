// src/notify/mod.rs
pub mod telegram;

use anyhow::Result;
use chrono::{DateTime, Utc};

use crate::ingest::types::Item;

pub use telegram::TelegramNotifier;

/// Delivers one text message. Success means the channel accepted it; there is
/// no receipt tracking beyond that.
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, text: &str) -> Result<()>;
}

/// Telegram rejects longer `sendMessage` texts.
pub const MAX_MESSAGE_CHARS: usize = 4096;

/// `- title (date)` followed by the url on its own indented line.
pub fn format_item(it: &Item) -> String {
    format_item_capped(it, usize::MAX)
}

fn format_item_capped(it: &Item, title_cap: usize) -> String {
    let d = it
        .date
        .as_deref()
        .map(|d| format!(" ({d})"))
        .unwrap_or_default();
    format!("- {}{}\n  {}", truncate_chars(&it.title, title_cap), d, it.url)
}

/// Cut to at most `max` chars, marking the cut with `…`.
fn truncate_chars(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}

/// Heartbeat sent on every run, new items or not.
pub fn format_status(app_name: &str, items_found: usize) -> String {
    format!("✅ {app_name} ran. items_found={items_found}")
}

/// Single message for the whole batch, kept within [`MAX_MESSAGE_CHARS`].
/// Titles are shortened first so every url survives; the whole text is
/// only cut as a last resort.
pub fn format_batch(app_name: &str, items: &[Item], now: DateTime<Utc>) -> String {
    let header = format!(
        "🟡 {app_name} update detected\nTime: {}\n\n",
        now.format("%Y-%m-%d %H:%M UTC")
    );

    let mut title_cap = items
        .iter()
        .map(|it| it.title.chars().count())
        .max()
        .unwrap_or(0);
    loop {
        let body = items
            .iter()
            .map(|it| format_item_capped(it, title_cap))
            .collect::<Vec<_>>()
            .join("\n\n");
        let text = format!("{header}{body}");
        let excess = text.chars().count().saturating_sub(MAX_MESSAGE_CHARS);
        if excess == 0 || title_cap <= 1 {
            return truncate_chars(&text, MAX_MESSAGE_CHARS);
        }
        title_cap = title_cap
            .saturating_sub(excess.div_ceil(items.len().max(1)))
            .max(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn item_with_and_without_date() {
        let dated = Item {
            title: "Will List FOO".into(),
            url: "https://x.test/1".into(),
            date: Some("2025-01-02".into()),
        };
        let bare = Item {
            date: None,
            ..dated.clone()
        };
        assert_eq!(format_item(&dated), "- Will List FOO (2025-01-02)\n  https://x.test/1");
        assert_eq!(format_item(&bare), "- Will List FOO\n  https://x.test/1");
    }

    #[test]
    fn batch_has_header_time_and_blank_line_between_items() {
        let now = Utc.with_ymd_and_hms(2025, 9, 6, 9, 5, 59).unwrap();
        let items = vec![
            Item {
                title: "X".into(),
                url: "u1".into(),
                date: None,
            },
            Item {
                title: "Y".into(),
                url: "u2".into(),
                date: None,
            },
        ];
        let text = format_batch("binance-alerts", &items, now);
        assert_eq!(
            text,
            "🟡 binance-alerts update detected\nTime: 2025-09-06 09:05 UTC\n\n- X\n  u1\n\n- Y\n  u2"
        );
    }

    fn long_item(i: usize) -> Item {
        Item {
            title: "x".repeat(500),
            url: format!("https://www.binance.com/en/support/announcement/detail/{i:032}"),
            date: Some("2025-01-02".into()),
        }
    }

    #[test]
    fn oversized_batch_shortens_titles_and_keeps_every_url() {
        let items: Vec<Item> = (0..10).map(long_item).collect();
        let untrimmed: usize = items.iter().map(|it| format_item(it).chars().count()).sum();
        assert!(untrimmed > MAX_MESSAGE_CHARS);

        let text = format_batch("binance-alerts", &items, Utc::now());
        assert!(text.chars().count() <= MAX_MESSAGE_CHARS);
        for it in &items {
            assert!(text.contains(&it.url));
        }
        assert!(text.contains("…"));
        assert!(text.starts_with("🟡 binance-alerts update detected"));
    }

    #[test]
    fn whole_text_is_cut_when_titles_are_not_enough() {
        let items = vec![Item {
            title: "T".into(),
            url: format!("https://x.test/{}", "a".repeat(5000)),
            date: None,
        }];
        let text = format_batch("w", &items, Utc::now());
        assert_eq!(text.chars().count(), MAX_MESSAGE_CHARS);
        assert!(text.ends_with('…'));
    }

    #[test]
    fn status_reports_count() {
        assert_eq!(format_status("w", 0), "✅ w ran. items_found=0");
    }
}
