//! Test helper functions for integration tests
//!
//! Shared across the integration test files using the tests/common/ pattern.
#![allow(dead_code)]

use anyhow::Result;
use std::fs;
use std::path::Path;
use std::sync::Once;

/// Initialize logging for tests (only once per test run)
static INIT: Once = Once::new();

pub fn init_test_logging() {
    INIT.call_once(|| {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let _ = tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_test_writer()
                    .with_target(true)
                    .with_level(true),
            )
            .with(tracing_subscriber::filter::EnvFilter::from_default_env())
            .try_init();
    });
}

pub const SAMPLE_SLUG: &str = "sample-toolkit";

/// Write `content` to `root/relative`, creating parent directories
pub fn write_file(root: &Path, relative: &str, content: &str) -> Result<()> {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    Ok(())
}

/// Create a repository with a single complete toolkit, `sample-toolkit`
///
/// ```text
/// toolkits/sample-toolkit/
/// ├── toolkit.json
/// ├── docs/{README,RELEASE_NOTES,CHANGELOG,TESTING}.md
/// └── scripts/check.sh
/// ```
pub fn create_sample_repo(root: &Path) -> Result<()> {
    let manifest = serde_json::json!({
        "slug": SAMPLE_SLUG,
        "name": "Sample Toolkit",
        "version": "1.2.0",
        "description": "Manifest description",
        "tags": ["sre", "sample"],
        "maintainers": ["ops@example.com"],
        "categories": ["testing"],
        "catalog": {
            "description": "Catalog description"
        }
    });
    write_file(
        root,
        "toolkits/sample-toolkit/toolkit.json",
        &serde_json::to_string_pretty(&manifest)?,
    )?;
    write_file(
        root,
        "toolkits/sample-toolkit/docs/README.md",
        "# Sample Toolkit\n\nRuns sample checks.\n",
    )?;
    for name in ["RELEASE_NOTES.md", "CHANGELOG.md", "TESTING.md"] {
        write_file(
            root,
            &format!("toolkits/sample-toolkit/docs/{name}"),
            "# Notes\n",
        )?;
    }
    write_file(
        root,
        "toolkits/sample-toolkit/scripts/check.sh",
        "#!/bin/sh\necho ok\n",
    )?;
    Ok(())
}

/// Entry names of a zip archive, in archive order
pub fn archive_names(bytes: &[u8]) -> Result<Vec<String>> {
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(bytes))?;
    let mut names = Vec::with_capacity(archive.len());
    for index in 0..archive.len() {
        names.push(archive.by_index(index)?.name().to_string());
    }
    Ok(names)
}
