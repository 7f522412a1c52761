//! Seen store: the persisted set of urls that were already notified.
//!
//! On disk this is a pretty-printed JSON array of strings, sorted, so the
//! file diffs cleanly between runs. Reading is forgiving, writing is not.

use anyhow::{Context, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::dedup::SeenSet;

pub const DEFAULT_SEEN_PATH: &str = "data/seen.json";

#[derive(Debug, Clone)]
pub struct SeenStore {
    path: PathBuf,
}

impl SeenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Missing, unreadable or malformed state all mean "nothing seen yet".
    pub async fn load(&self) -> SeenSet {
        let raw = match fs::read_to_string(&self.path).await {
            Ok(s) => s,
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(path = %self.path.display(), "seen store unreadable: {e:#}");
                }
                return SeenSet::new();
            }
        };
        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Array(values)) => values.into_iter().map(coerce_entry).collect(),
            Ok(_) => {
                tracing::warn!(path = %self.path.display(), "seen store is not a list, starting empty");
                SeenSet::new()
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), "seen store malformed: {e:#}");
                SeenSet::new()
            }
        }
    }

    /// Overwrite the stored set. Goes through a temp file + rename so a crash
    /// mid-write leaves the previous state intact.
    pub async fn save(&self, seen: &SeenSet) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .await
                .with_context(|| format!("creating {}", dir.display()))?;
        }

        // BTreeSet iterates sorted.
        let sorted: Vec<&String> = seen.iter().collect();
        let body = serde_json::to_vec_pretty(&sorted).context("serializing seen set")?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, body)
            .await
            .with_context(|| format!("writing {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .await
            .with_context(|| format!("replacing {}", self.path.display()))?;
        Ok(())
    }
}

fn coerce_entry(v: Value) -> String {
    match v {
        Value::String(s) => s,
        other => other.to_string(),
    }
}
