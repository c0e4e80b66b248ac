//! Toolkit catalog - the machine-readable index of all toolkits
//!
//! # Overview
//!
//! The catalog system:
//! - Reads each toolkit's `toolkit.json` manifest
//! - Merges it with any existing catalog entry into a normalized entry
//! - Persists `catalog/toolkits.json` only when an entry actually changed
//!
//! # Architecture
//!
//! ```text
//! toolkits/<slug>/toolkit.json   ← Manifest (author-owned)
//!            │
//!            ▼
//!     CatalogReconciler          ← override → manifest → existing → default
//!            │
//!            ▼
//!     CatalogStore               ← load()/save(), single writer
//!            │
//!            ▼
//! catalog/toolkits.json          ← {version, generated_at, toolkits[]}
//! ```

mod document;
mod entry;
mod manifest;
mod reconcile;
mod store;

pub use document::{CatalogDocument, CATALOG_VERSION};
pub use entry::{
    record_list, record_slug, record_text, CatalogEntry, EntryRecord, PREFERRED_KEYS,
};
pub use manifest::{CatalogOverride, ListInput, ToolkitManifest};
pub use reconcile::{
    format_timestamp, resolve_entry, CatalogOutcome, CatalogReconciler, DEFAULT_VERSION,
};
pub use store::{CatalogStore, FileCatalogStore};
