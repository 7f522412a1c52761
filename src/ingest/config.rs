// src/ingest/config.rs
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

const ENV_PATH: &str = "SOURCES_PATH";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Html,
    Json,
    Rss,
}

/// One configured upstream.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SourceSpec {
    pub name: String,
    pub kind: SourceKind,
    pub url: String,
    /// Base for resolving relative links. Defaults to the origin of `url`.
    #[serde(default)]
    pub base: Option<String>,
}

impl SourceSpec {
    fn html(name: &str, url: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: SourceKind::Html,
            url: url.to_string(),
            base: Some("https://www.binance.com".to_string()),
        }
    }

    pub fn base_url(&self) -> Result<Url> {
        let raw = self.base.as_deref().unwrap_or(&self.url);
        let parsed =
            Url::parse(raw).with_context(|| format!("source {}: invalid url {raw}", self.name))?;
        if self.base.is_some() {
            return Ok(parsed);
        }
        parsed
            .join("/")
            .with_context(|| format!("source {}: no origin in {raw}", self.name))
    }
}

/// Built-in sources: the announcement centre and its "all" list as fallback.
pub fn default_sources() -> Vec<SourceSpec> {
    vec![
        SourceSpec::html(
            "binance-announcements",
            "https://www.binance.com/en/support/announcement",
        ),
        SourceSpec::html(
            "binance-announcements-list",
            "https://www.binance.com/en/support/announcement/list/0",
        ),
    ]
}

/// Load sources from an explicit path. Supports TOML or JSON formats.
pub fn load_sources_from(path: &Path) -> Result<Vec<SourceSpec>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading sources from {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    parse_sources(&content, ext.as_str())
}

/// Load sources using env var + fallbacks:
/// 1) $SOURCES_PATH
/// 2) config/sources.toml
/// 3) config/sources.json
/// 4) built-in defaults
pub fn load_sources_default() -> Result<Vec<SourceSpec>> {
    if let Ok(p) = std::env::var(ENV_PATH) {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return load_sources_from(&pb);
        } else {
            return Err(anyhow!("SOURCES_PATH points to non-existent path"));
        }
    }
    let toml_p = PathBuf::from("config/sources.toml");
    if toml_p.exists() {
        return load_sources_from(&toml_p);
    }
    let json_p = PathBuf::from("config/sources.json");
    if json_p.exists() {
        return load_sources_from(&json_p);
    }
    Ok(default_sources())
}

fn parse_sources(s: &str, hint_ext: &str) -> Result<Vec<SourceSpec>> {
    let try_toml = hint_ext == "toml" || s.contains("[[source]]");
    if try_toml {
        if let Ok(v) = parse_toml(s) {
            return Ok(v);
        }
    }
    if let Ok(v) = parse_json(s) {
        return Ok(v);
    }
    if !try_toml {
        if let Ok(v) = parse_toml(s) {
            return Ok(v);
        }
    }
    Err(anyhow!("unsupported sources format"))
}

fn parse_toml(s: &str) -> Result<Vec<SourceSpec>> {
    #[derive(Deserialize)]
    struct TomlSources {
        source: Vec<SourceSpec>,
    }
    let v: TomlSources = toml::from_str(s)?;
    Ok(clean_list(v.source))
}

fn parse_json(s: &str) -> Result<Vec<SourceSpec>> {
    let v: Vec<SourceSpec> = serde_json::from_str(s)?;
    Ok(clean_list(v))
}

fn clean_list(items: Vec<SourceSpec>) -> Vec<SourceSpec> {
    items
        .into_iter()
        .filter_map(|mut it| {
            it.url = it.url.trim().to_string();
            it.name = it.name.trim().to_string();
            if it.url.is_empty() {
                return None;
            }
            if it.name.is_empty() {
                it.name = it.url.clone();
            }
            Some(it)
        })
        .collect()
}
