//! dedup.rs — picks the batch of never-notified items for one run.
//!
//! Everything here is pure: the seen set is a snapshot that is read, never
//! mutated. [`mark_seen`] returns the next snapshot instead.

use std::collections::{BTreeSet, HashSet};

use crate::ingest::types::Item;

/// Urls already notified. Ordered so persistence is deterministic.
pub type SeenSet = BTreeSet<String>;

/// Default cap on items per notification.
pub const DEFAULT_MAX_BATCH: usize = 10;

/// Drop later items whose url was already encountered. Order is kept.
pub fn dedup_by_url(items: Vec<Item>) -> Vec<Item> {
    let mut urls: HashSet<String> = HashSet::with_capacity(items.len());
    items
        .into_iter()
        .filter(|it| urls.insert(it.url.clone()))
        .collect()
}

/// Items from `fetched` that are not in `seen`, first occurrence per url,
/// in encounter order, at most `max_batch` of them.
pub fn select_new(fetched: &[Item], seen: &SeenSet, max_batch: usize) -> Vec<Item> {
    let mut urls: HashSet<&str> = HashSet::new();
    fetched
        .iter()
        .filter(|&it| urls.insert(it.url.as_str()))
        .filter(|it| !seen.contains(&it.url))
        .take(max_batch)
        .cloned()
        .collect()
}

/// Next seen set after `batch` was delivered.
pub fn mark_seen(seen: &SeenSet, batch: &[Item]) -> SeenSet {
    let mut next = seen.clone();
    next.extend(batch.iter().map(|it| it.url.clone()));
    next
}
