//! Catalog reconciliation
//!
//! Merges a toolkit's manifest into its catalog entry. Per field, the
//! first non-empty candidate wins:
//!
//! | field                              | candidates                                         |
//! |------------------------------------|----------------------------------------------------|
//! | description                        | override, manifest, existing, `""`                 |
//! | tags, maintainers                  | override, manifest, existing, `[]`                 |
//! | categories                         | override, manifest, manifest `category`, existing, `[]` |
//! | docs_url                           | override, existing if under `toolkits/<slug>/`, default |
//! | bundle_url                         | override, existing if ending in `.zip`, default    |
//! | source                             | override, existing, `toolkits/<slug>`              |
//! | name, version                      | manifest, existing, slug title / `0.0.0`           |
//!
//! The catalog is only rewritten when the resulting entry differs from the
//! stored one, so repeated runs without manifest changes write nothing.

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use super::entry::{record_extra, record_list, record_text, CatalogEntry, EntryRecord};
use super::manifest::ToolkitManifest;
use super::store::{CatalogStore, FileCatalogStore};
use crate::error::Result;
use crate::layout::ToolshelfLayout;
use crate::slug::Slug;

/// Version recorded when neither manifest nor catalog provide one
pub const DEFAULT_VERSION: &str = "0.0.0";

/// What a reconciliation did to the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogOutcome {
    /// A new entry was added
    Created,
    /// An existing entry changed
    Updated,
    /// The entry already matched; nothing was written
    Unchanged,
}

/// Keeps catalog entries in step with toolkit manifests
pub struct CatalogReconciler<S: CatalogStore = FileCatalogStore> {
    layout: ToolshelfLayout,
    store: S,
    clock: fn() -> DateTime<Utc>,
}

impl CatalogReconciler<FileCatalogStore> {
    /// Reconciler writing to the layout's `catalog/toolkits.json`
    pub fn new(layout: ToolshelfLayout) -> Self {
        let store = FileCatalogStore::new(layout.catalog.clone());
        Self::with_store(layout, store)
    }
}

impl<S: CatalogStore> CatalogReconciler<S> {
    pub fn with_store(layout: ToolshelfLayout, store: S) -> Self {
        Self {
            layout,
            store,
            clock: Utc::now,
        }
    }

    /// Replace the clock used to stamp `generated_at`
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Bring the catalog entry for `slug` in line with its manifest
    pub fn sync_catalog(&self, slug: &Slug) -> Result<CatalogOutcome> {
        let manifest = ToolkitManifest::load(&self.layout, slug)?;
        let mut document = self.store.load()?;

        let (record, outcome) = {
            let existing = document.find(slug.as_str()).map(|(_, record)| record);
            let record = resolve_entry(slug, &manifest, existing).to_record();
            let outcome = match existing {
                None => CatalogOutcome::Created,
                Some(current) if *current == record => CatalogOutcome::Unchanged,
                Some(_) => CatalogOutcome::Updated,
            };
            (record, outcome)
        };

        if outcome == CatalogOutcome::Unchanged {
            debug!("Catalog entry for {} is up to date", slug);
            return Ok(outcome);
        }

        document.upsert(record);
        document.sort_entries();
        document.generated_at = Some(format_timestamp((self.clock)()));

        if self.store.save(&document)? {
            info!("Catalog entry for {} {:?}", slug, outcome);
        }
        Ok(outcome)
    }
}

/// ISO-8601 UTC timestamp truncated to whole seconds
pub fn format_timestamp(now: DateTime<Utc>) -> String {
    now.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// First candidate list that is non-empty, or an empty list
fn first_non_empty(candidates: impl IntoIterator<Item = Vec<String>>) -> Vec<String> {
    candidates
        .into_iter()
        .find(|list| !list.is_empty())
        .unwrap_or_default()
}

/// Compute the normalized entry for `slug`
pub fn resolve_entry(
    slug: &Slug,
    manifest: &ToolkitManifest,
    existing: Option<&EntryRecord>,
) -> CatalogEntry {
    let overrides = &manifest.catalog;
    let existing_text = |key: &str| existing.and_then(|record| record_text(record, key));
    let existing_list = |key: &str| {
        existing
            .map(|record| record_list(record, key))
            .unwrap_or_default()
    };

    let docs_prefix = format!("toolkits/{slug}/");

    let description = overrides
        .description
        .clone()
        .or_else(|| manifest.description.clone())
        .or_else(|| existing_text("description"))
        .unwrap_or_default();

    let tags = first_non_empty([
        overrides.tags.normalize(),
        manifest.tags.normalize(),
        existing_list("tags"),
    ]);

    let maintainers = first_non_empty([
        overrides.maintainers.normalize(),
        manifest.maintainers.normalize(),
        existing_list("maintainers"),
    ]);

    let categories = first_non_empty([
        overrides.categories.normalize(),
        manifest.categories.normalize(),
        manifest.category.normalize(),
        existing_list("categories"),
    ]);

    let docs_url = overrides
        .docs_url
        .clone()
        .or_else(|| existing_text("docs_url").filter(|url| url.starts_with(&docs_prefix)))
        .unwrap_or_else(|| docs_prefix.clone());

    let bundle_url = overrides
        .bundle_url
        .clone()
        .or_else(|| existing_text("bundle_url").filter(|url| url.ends_with(".zip")))
        .unwrap_or_else(|| format!("{docs_prefix}bundle.zip"));

    let source = overrides
        .source
        .clone()
        .or_else(|| existing_text("source"))
        .unwrap_or_else(|| format!("toolkits/{slug}"));

    let name = manifest
        .name
        .clone()
        .or_else(|| existing_text("name"))
        .unwrap_or_else(|| slug.title());

    let version = manifest
        .version
        .clone()
        .or_else(|| existing_text("version"))
        .unwrap_or_else(|| DEFAULT_VERSION.to_string());

    CatalogEntry {
        slug: slug.to_string(),
        name,
        version,
        description,
        tags,
        maintainers,
        source,
        docs_url,
        bundle_url,
        categories,
        extra: existing.map(record_extra).unwrap_or_default(),
    }
}
