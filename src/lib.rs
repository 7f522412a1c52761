// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod config;
pub mod dedup;
pub mod ingest;
pub mod notify;
pub mod run;
pub mod store;

// ---- Re-exports for stable public API ----
pub use crate::dedup::{select_new, SeenSet};
pub use crate::ingest::types::{Item, SourceProvider};
pub use crate::notify::Notifier;
pub use crate::run::{run_once, RunReport, RunSettings};
pub use crate::store::SeenStore;
