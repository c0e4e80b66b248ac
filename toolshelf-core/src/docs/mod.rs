//! Documentation synchronization
//!
//! Projects each toolkit's sources onto the generated docs tree:
//!
//! ```text
//! toolkits/<slug>/docs/README.md  ─┐ (falls back to toolkits/<slug>/README.md)
//!                                  ├─▶ docs/toolkits/<slug>/index.md
//! toolkits/<slug>/**              ─┼─▶ docs/toolkits/<slug>/bundle.zip
//!                                  ├─▶ docs/toolkits/<slug>/bundle/index.html
//! toolkits/<slug>/toolkit.json    ─┴─▶ catalog/toolkits.json
//! ```
//!
//! Every write is skipped when the target already holds identical bytes,
//! so re-running without source changes leaves the tree untouched. Nothing
//! is ever deleted or renamed.

mod page;

pub use page::{first_heading, render_readme_page, render_redirect_html};

use std::path::PathBuf;
use tracing::{debug, info};

use crate::bundle::build_bundle_bytes;
use crate::catalog::{CatalogOutcome, CatalogReconciler};
use crate::error::{Result, ToolshelfError};
use crate::io::write_if_changed;
use crate::layout::ToolshelfLayout;
use crate::slug::Slug;

/// Files touched by a synchronization run
#[derive(Debug, Default)]
pub struct SyncReport {
    /// Files that were (re)written
    pub written: Vec<PathBuf>,
    /// Files that already matched
    pub unchanged: Vec<PathBuf>,
    /// Catalog outcome per synchronized toolkit
    pub catalog: Vec<(Slug, CatalogOutcome)>,
}

impl SyncReport {
    fn record(&mut self, path: PathBuf, written: bool) {
        if written {
            self.written.push(path);
        } else {
            self.unchanged.push(path);
        }
    }

    /// Number of file writes, including the catalog
    pub fn write_count(&self) -> usize {
        self.written.len()
    }

    fn merge(&mut self, other: SyncReport) {
        self.written.extend(other.written);
        self.unchanged.extend(other.unchanged);
        self.catalog.extend(other.catalog);
    }
}

/// Keeps generated docs, bundles and the catalog in step with toolkit sources
pub struct DocsSynchronizer {
    layout: ToolshelfLayout,
    reconciler: CatalogReconciler,
}

impl DocsSynchronizer {
    pub fn new(layout: ToolshelfLayout) -> Self {
        let reconciler = CatalogReconciler::new(layout.clone());
        Self { layout, reconciler }
    }

    /// Use a specific reconciler (e.g. one with a fixed clock)
    pub fn with_reconciler(layout: ToolshelfLayout, reconciler: CatalogReconciler) -> Self {
        Self { layout, reconciler }
    }

    /// Canonical README for `slug`, preferring `docs/README.md`
    pub fn locate_readme(&self, slug: &Slug) -> Option<PathBuf> {
        let toolkit_dir = self.layout.toolkit_dir(slug);
        [
            toolkit_dir.join("docs").join("README.md"),
            toolkit_dir.join("README.md"),
        ]
        .into_iter()
        .find(|path| path.is_file())
    }

    /// Synchronize a single toolkit
    pub fn sync_toolkit(&self, slug: &Slug) -> Result<SyncReport> {
        let toolkit_dir = self.layout.toolkit_dir(slug);
        if !toolkit_dir.is_dir() {
            return Err(ToolshelfError::NotFound(format!(
                "toolkits/{slug} does not exist"
            )));
        }

        debug!("Synchronizing {}", slug);
        let mut report = SyncReport::default();

        self.sync_readme(slug, &mut report)?;
        self.sync_bundle(slug, &mut report)?;

        let catalog_path = self.layout.catalog.clone();
        let outcome = self.reconciler.sync_catalog(slug)?;
        report.record(catalog_path, outcome != CatalogOutcome::Unchanged);
        report.catalog.push((slug.clone(), outcome));

        info!(
            "Synchronized {} ({} written, {} unchanged)",
            slug,
            report.written.len(),
            report.unchanged.len()
        );
        Ok(report)
    }

    /// Synchronize every toolkit found under `toolkits/`
    pub fn sync_all(&self) -> Result<SyncReport> {
        let mut report = SyncReport::default();
        for slug in self.layout.discover_toolkits()? {
            report.merge(self.sync_toolkit(&slug)?);
        }
        Ok(report)
    }

    fn sync_readme(&self, slug: &Slug, report: &mut SyncReport) -> Result<()> {
        let Some(readme) = self.locate_readme(slug) else {
            debug!("No README for {}, skipping docs page", slug);
            return Ok(());
        };

        let markdown =
            std::fs::read_to_string(&readme).map_err(|e| ToolshelfError::io(&readme, e))?;
        let page = render_readme_page(&markdown, &slug.title(), &self.layout.relative(&readme));

        let target = self.layout.docs_page(slug);
        let written = write_if_changed(&target, page.as_bytes())?;
        report.record(target, written);
        Ok(())
    }

    fn sync_bundle(&self, slug: &Slug, report: &mut SyncReport) -> Result<()> {
        let bytes = build_bundle_bytes(&self.layout, slug)?;
        let target = self.layout.bundle_path(slug);
        let written = write_if_changed(&target, &bytes)?;
        report.record(target, written);

        let redirect = self.layout.redirect_page(slug);
        let html = render_redirect_html(slug.as_str());
        let written = write_if_changed(&redirect, html.as_bytes())?;
        report.record(redirect, written);
        Ok(())
    }
}
