//! Deterministic zip archives of toolkit source trees

use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

use crate::error::{Result, ToolshelfError};
use crate::layout::{ToolshelfLayout, MANIFEST_FILE};
use crate::slug::Slug;

/// Result of writing a bundle to disk
#[derive(Debug, Clone)]
pub struct BundleSummary {
    pub path: PathBuf,
    pub size: u64,
    pub entries: usize,
}

/// Resolve a toolkit directory, requiring both the directory and its manifest
fn resolve_toolkit_dir(layout: &ToolshelfLayout, slug: &Slug) -> Result<PathBuf> {
    let toolkit_dir = layout.toolkit_dir(slug);
    if !toolkit_dir.is_dir() {
        return Err(ToolshelfError::NotFound(format!(
            "toolkits/{slug} does not exist"
        )));
    }
    if !toolkit_dir.join(MANIFEST_FILE).is_file() {
        return Err(ToolshelfError::NotFound(format!(
            "toolkits/{slug}/{MANIFEST_FILE} is required"
        )));
    }
    Ok(toolkit_dir)
}

/// All files under `toolkit_dir` paired with their archive names, in path order
///
/// Siblings are visited in file-name order, which yields the same sequence as
/// sorting the full paths component by component.
pub fn list_toolkit_files(toolkit_dir: &Path, slug: &Slug) -> Result<Vec<(PathBuf, String)>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(toolkit_dir).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(toolkit_dir).to_path_buf();
            ToolshelfError::io(path, std::io::Error::other(e))
        })?;
        if !entry.path().is_file() {
            continue;
        }

        let relative = entry
            .path()
            .strip_prefix(toolkit_dir)
            .unwrap_or(entry.path())
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        files.push((entry.path().to_path_buf(), format!("{slug}/{relative}")));
    }
    Ok(files)
}

/// Build the zip archive for `slug` in memory
///
/// Timestamps and permissions are pinned so the same tree always produces
/// the same bytes.
pub fn build_bundle_bytes(layout: &ToolshelfLayout, slug: &Slug) -> Result<Vec<u8>> {
    let toolkit_dir = resolve_toolkit_dir(layout, slug)?;
    let files = list_toolkit_files(&toolkit_dir, slug)?;

    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(DateTime::default())
        .unix_permissions(0o644);

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (source, arcname) in &files {
        let content = std::fs::read(source).map_err(|e| ToolshelfError::io(source, e))?;
        writer.start_file(arcname.as_str(), options)?;
        writer
            .write_all(&content)
            .map_err(|e| ToolshelfError::io(source, e))?;
    }
    let bytes = writer.finish()?.into_inner();

    debug!(
        "Built bundle for {} ({} files, {} bytes)",
        slug,
        files.len(),
        bytes.len()
    );
    Ok(bytes)
}

/// Build the bundle for `slug` and write it to `destination`
pub fn bundle_toolkit(
    layout: &ToolshelfLayout,
    slug: &Slug,
    destination: &Path,
) -> Result<BundleSummary> {
    let toolkit_dir = resolve_toolkit_dir(layout, slug)?;
    let entries = list_toolkit_files(&toolkit_dir, slug)?.len();
    let bytes = build_bundle_bytes(layout, slug)?;

    if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| ToolshelfError::io(parent, e))?;
    }
    std::fs::write(destination, &bytes).map_err(|e| ToolshelfError::io(destination, e))?;

    Ok(BundleSummary {
        path: destination.to_path_buf(),
        size: bytes.len() as u64,
        entries,
    })
}
