//! Repository layout discovery
//!
//! All inputs and generated outputs live under a single repository root:
//!
//! ```text
//! <root>/
//! ├── toolkits/<slug>/toolkit.json     ← manifest (input)
//! ├── toolkits/<slug>/docs/README.md   ← canonical README (input)
//! ├── catalog/toolkits.json            ← generated catalog
//! └── docs/toolkits/<slug>/            ← generated index.md, bundle.zip, bundle/index.html
//! ```
//!
//! Root resolution order:
//! 1. CLI override (if provided)
//! 2. `TOOLSHELF_ROOT` environment variable
//! 3. Current working directory

use std::path::{Path, PathBuf};
use tracing::{debug, trace};

use crate::error::{Result, ToolshelfError};
use crate::slug::Slug;

/// Environment variable naming the repository root
pub const ROOT_ENV: &str = "TOOLSHELF_ROOT";

/// Manifest file name inside each toolkit directory
pub const MANIFEST_FILE: &str = "toolkit.json";

/// Paths derived from the repository root
#[derive(Debug, Clone)]
pub struct ToolshelfLayout {
    /// Repository root
    pub root: PathBuf,
    /// Toolkit source directories (`toolkits/`)
    pub toolkits: PathBuf,
    /// Generated catalog file (`catalog/toolkits.json`)
    pub catalog: PathBuf,
    /// Generated per-toolkit documentation (`docs/toolkits/`)
    pub docs_toolkits: PathBuf,
}

impl ToolshelfLayout {
    /// Resolve the layout from the environment or the current directory
    pub fn discover() -> Result<Self> {
        Self::discover_with_override(None)
    }

    /// Resolve the layout with an optional CLI override
    pub fn discover_with_override(cli_override: Option<PathBuf>) -> Result<Self> {
        trace!("Discovering repository root");

        if let Some(override_path) = cli_override {
            let canonical = override_path.canonicalize().map_err(|_| {
                ToolshelfError::NotFound(format!(
                    "Repository root does not exist: {}",
                    override_path.display()
                ))
            })?;
            debug!("Using --root override: {}", canonical.display());
            return Ok(Self::from_root(canonical));
        }

        if let Some(from_env) = std::env::var_os(ROOT_ENV).filter(|v| !v.is_empty()) {
            let path = PathBuf::from(from_env);
            debug!("Using {ROOT_ENV}: {}", path.display());
            return Ok(Self::from_root(path));
        }

        let cwd = std::env::current_dir().map_err(|e| ToolshelfError::io(".", e))?;
        debug!("Using current directory as repository root: {}", cwd.display());
        Ok(Self::from_root(cwd))
    }

    /// Build the layout for a known root directory
    pub fn from_root(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        ToolshelfLayout {
            toolkits: root.join("toolkits"),
            catalog: root.join("catalog").join("toolkits.json"),
            docs_toolkits: root.join("docs").join("toolkits"),
            root,
        }
    }

    pub fn toolkit_dir(&self, slug: &Slug) -> PathBuf {
        self.toolkits.join(slug.as_str())
    }

    pub fn manifest_path(&self, slug: &Slug) -> PathBuf {
        self.toolkit_dir(slug).join(MANIFEST_FILE)
    }

    /// Output directory for a toolkit's generated docs
    pub fn docs_dir(&self, slug: &Slug) -> PathBuf {
        self.docs_toolkits.join(slug.as_str())
    }

    pub fn docs_page(&self, slug: &Slug) -> PathBuf {
        self.docs_dir(slug).join("index.md")
    }

    pub fn bundle_path(&self, slug: &Slug) -> PathBuf {
        self.docs_dir(slug).join("bundle.zip")
    }

    pub fn redirect_page(&self, slug: &Slug) -> PathBuf {
        self.docs_dir(slug).join("bundle").join("index.html")
    }

    /// Render a path relative to the root with forward slashes
    pub fn relative(&self, path: &Path) -> String {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Names of all directories under `toolkits/`, sorted
    ///
    /// Names are returned as-is (not validated) so callers such as the
    /// validator can report malformed directory names.
    pub fn discover_toolkit_names(&self) -> Result<Vec<String>> {
        if !self.toolkits.exists() {
            return Ok(Vec::new());
        }

        let entries = std::fs::read_dir(&self.toolkits)
            .map_err(|e| ToolshelfError::io(&self.toolkits, e))?;

        let mut names: Vec<String> = entries
            .filter_map(|e| e.ok())
            .filter(|e| e.path().is_dir())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        Ok(names)
    }

    /// Slugs of all toolkit directories whose names are valid slugs
    pub fn discover_toolkits(&self) -> Result<Vec<Slug>> {
        Ok(self
            .discover_toolkit_names()?
            .iter()
            .filter_map(|name| match Slug::parse(name) {
                Ok(slug) => Some(slug),
                Err(_) => {
                    tracing::warn!("Skipping toolkit directory with invalid slug: {name}");
                    None
                }
            })
            .collect())
    }
}
