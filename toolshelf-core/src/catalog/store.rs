//! Catalog persistence
//!
//! The catalog is a small single-writer document. Callers go through
//! [`CatalogStore`] so that locking or rename-based writes can be added
//! to an implementation without touching the reconciler.

use std::path::PathBuf;
use tracing::debug;

use super::CatalogDocument;
use crate::error::{Result, ToolshelfError};
use crate::io::write_if_changed;

/// Load/save access to the catalog document
pub trait CatalogStore {
    /// Load the catalog, or an empty one if none has been written yet
    fn load(&self) -> Result<CatalogDocument>;

    /// Persist the catalog; returns `true` if anything was written
    fn save(&self, document: &CatalogDocument) -> Result<bool>;
}

/// Catalog stored as a JSON file (normally `catalog/toolkits.json`)
#[derive(Debug, Clone)]
pub struct FileCatalogStore {
    path: PathBuf,
}

impl FileCatalogStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load the catalog, failing if the file does not exist
    pub fn load_required(&self) -> Result<CatalogDocument> {
        if !self.path.exists() {
            return Err(ToolshelfError::NotFound(
                "catalog/toolkits.json is missing".to_string(),
            ));
        }
        self.load()
    }
}

impl CatalogStore for FileCatalogStore {
    fn load(&self) -> Result<CatalogDocument> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No catalog at {}, starting empty", self.path.display());
                return Ok(CatalogDocument::new());
            }
            Err(e) => return Err(ToolshelfError::io(&self.path, e)),
        };

        CatalogDocument::from_json(&content).map_err(|e| ToolshelfError::json(&self.path, e))
    }

    /// Writes only when the serialized text differs from the file on disk
    fn save(&self, document: &CatalogDocument) -> Result<bool> {
        let text = document
            .to_json()
            .map_err(|e| ToolshelfError::json(&self.path, e))?;
        write_if_changed(&self.path, text.as_bytes())
    }
}
