//! Integration tests for the `toolshelf` binary
//!
//! Each test builds a throwaway repository, runs the binary against it with
//! `--root`, and checks exit status, stdout and the generated files.

use anyhow::Result;
use pretty_assertions::assert_eq;
use serial_test::serial;
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn toolshelf(root: &Path, args: &[&str]) -> Result<Output> {
    let output = Command::new(env!("CARGO_BIN_EXE_toolshelf"))
        .arg("--root")
        .arg(root)
        .args(args)
        .env_remove("TOOLSHELF_ROOT")
        .env_remove("RUST_LOG")
        .output()?;
    Ok(output)
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn write(root: &Path, relative: &str, content: &str) -> Result<()> {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap())?;
    fs::write(path, content)?;
    Ok(())
}

fn sample_repo() -> Result<TempDir> {
    let temp = TempDir::new()?;
    let root = temp.path();
    write(
        root,
        "toolkits/sample-toolkit/toolkit.json",
        r#"{"slug": "sample-toolkit", "name": "Sample Toolkit", "version": "1.0.0",
            "description": "Sample", "tags": ["sre"], "categories": ["testing"]}"#,
    )?;
    for name in ["README.md", "RELEASE_NOTES.md", "CHANGELOG.md", "TESTING.md"] {
        write(
            root,
            &format!("toolkits/sample-toolkit/docs/{name}"),
            "# Sample Toolkit\n",
        )?;
    }
    Ok(temp)
}

#[test]
fn test_bundle_writes_archive() -> Result<()> {
    let temp = sample_repo()?;
    let target = temp.path().join("out/sample.zip");

    let output = toolshelf(
        temp.path(),
        &["bundle", "--slug", "sample-toolkit", "--output", target.to_str().unwrap()],
    )?;
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let size = fs::metadata(&target)?.len();
    assert_eq!(stdout(&output).trim(), format!("Wrote sample.zip ({size} bytes)"));

    let archive = zip::ZipArchive::new(fs::File::open(&target)?)?;
    assert_eq!(archive.len(), 5);
    Ok(())
}

#[test]
fn test_bundle_quiet_and_failures() -> Result<()> {
    let temp = sample_repo()?;
    let target = temp.path().join("quiet.zip");
    let target = target.to_str().unwrap();

    let output = toolshelf(
        temp.path(),
        &["bundle", "--slug", "sample-toolkit", "--output", target, "--quiet"],
    )?;
    assert!(output.status.success());
    assert_eq!(stdout(&output), "");

    let output = toolshelf(temp.path(), &["bundle", "--slug", "ghost", "--output", target])?;
    assert!(!output.status.success());

    write(temp.path(), "toolkits/broken/toolkit.json", "{ nope")?;
    let output = toolshelf(temp.path(), &["bundle", "--slug", "broken", "--output", target])?;
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("is not valid JSON"));
    Ok(())
}

#[test]
fn test_sync_then_validate() -> Result<()> {
    let temp = sample_repo()?;

    let output = toolshelf(temp.path(), &["sync"])?;
    assert!(output.status.success());
    let first = stdout(&output);
    assert!(first.contains("Updated docs/toolkits/sample-toolkit/index.md"));
    assert!(first.contains("Updated catalog/toolkits.json"));

    let output = toolshelf(temp.path(), &["sync", "--slug", "sample-toolkit"])?;
    assert!(output.status.success());
    assert_eq!(stdout(&output), "");

    let output = toolshelf(temp.path(), &["validate", "--strict"])?;
    assert!(output.status.success(), "stdout: {}", stdout(&output));
    assert_eq!(stdout(&output).trim(), "[OK] sample-toolkit");
    Ok(())
}

#[test]
fn test_validate_reports_failures() -> Result<()> {
    let temp = sample_repo()?;
    assert!(toolshelf(temp.path(), &["sync"])?.status.success());

    // Manifest now claims another slug and a toolkit dir is uncatalogued
    write(
        temp.path(),
        "toolkits/sample-toolkit/toolkit.json",
        r#"{"slug": "other", "name": "Sample Toolkit", "version": "1.0.0",
            "description": "Sample", "tags": ["sre"], "categories": ["testing"]}"#,
    )?;
    fs::create_dir_all(temp.path().join("toolkits/stray"))?;

    let lenient = toolshelf(temp.path(), &["validate", "--toolkit", "sample-toolkit"])?;
    assert!(lenient.status.success());

    let strict = toolshelf(temp.path(), &["validate", "--strict"])?;
    assert!(!strict.status.success());
    let text = stdout(&strict);
    assert!(text.contains("[FAIL] sample-toolkit"));
    assert!(text.contains("  - Manifest slug mismatch for sample-toolkit"));
    assert!(text.contains("Toolkits missing from catalog/toolkits.json:\n  - stray"));

    let json = toolshelf(temp.path(), &["validate", "--json"])?;
    assert!(!json.status.success());
    let parsed: serde_json::Value = serde_json::from_slice(&json.stdout)?;
    assert_eq!(parsed["passed"], serde_json::json!(false));
    assert_eq!(parsed["missing_from_catalog"], serde_json::json!(["stray"]));

    let unknown = toolshelf(temp.path(), &["validate", "--toolkit", "ghost"])?;
    assert!(!unknown.status.success());
    assert!(String::from_utf8_lossy(&unknown.stderr)
        .contains("Toolkit 'ghost' missing from catalog/toolkits.json"));
    Ok(())
}

#[test]
fn test_validate_without_catalog_fails() -> Result<()> {
    let temp = sample_repo()?;
    let output = toolshelf(temp.path(), &["validate"])?;
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("catalog/toolkits.json is missing"));
    Ok(())
}

#[test]
fn test_catalog_listing() -> Result<()> {
    let temp = sample_repo()?;
    assert!(toolshelf(temp.path(), &["sync"])?.status.success());

    let table = toolshelf(temp.path(), &["catalog"])?;
    assert!(table.status.success());
    let text = stdout(&table);
    assert!(text.contains("sample-toolkit"));
    assert!(text.contains("Sample Toolkit"));
    assert!(text.contains("1 toolkit(s)"));

    let json = toolshelf(temp.path(), &["catalog", "--json"])?;
    let entries: serde_json::Value = serde_json::from_slice(&json.stdout)?;
    assert_eq!(entries[0]["slug"], serde_json::json!("sample-toolkit"));
    assert_eq!(
        entries[0]["bundle_url"],
        serde_json::json!("toolkits/sample-toolkit/bundle.zip")
    );
    Ok(())
}

#[test]
fn test_missing_root_is_an_error() -> Result<()> {
    let temp = TempDir::new()?;
    let output = toolshelf(&temp.path().join("does-not-exist"), &["sync"])?;
    assert!(!output.status.success());
    Ok(())
}

#[test]
#[serial]
fn test_site_vars() -> Result<()> {
    let temp = TempDir::new()?;
    let output = Command::new(env!("CARGO_BIN_EXE_toolshelf"))
        .arg("site-vars")
        .current_dir(temp.path())
        .env("GITHUB_REPOSITORY", "acme/tools")
        .output()?;
    assert!(output.status.success());

    let vars: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(
        vars,
        serde_json::json!({
            "raw_catalog_url": "https://raw.githubusercontent.com/acme/tools/main/catalog/toolkits.json",
            "repo_slug": "acme/tools",
            "repo_url": "https://github.com/acme/tools",
        })
    );
    Ok(())
}
