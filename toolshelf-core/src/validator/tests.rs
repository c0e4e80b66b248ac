//! Tests for the catalog validator

use super::rules::*;
use super::*;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn complete_entry(slug: &str) -> EntryRecord {
        let value = json!({
            "slug": slug,
            "name": "Demo",
            "version": "1.0.0",
            "description": "Demo toolkit",
            "tags": ["demo"],
            "categories": ["testing"],
            "docs_url": format!("toolkits/{slug}/"),
            "bundle_url": format!("toolkits/{slug}/bundle.zip"),
        });
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    /// A toolkit with sources, docs and a generated page
    fn healthy_toolkit(root: &Path, slug: &str) {
        let dir = root.join("toolkits").join(slug);
        write(&dir.join("toolkit.json"), &json!({"slug": slug}).to_string());
        for name in REQUIRED_DOC_FILES {
            write(&dir.join("docs").join(name), "# doc\n");
        }
        write(
            &root.join("docs/toolkits").join(slug).join("index.md"),
            "---\ntitle: Demo\n---\n",
        );
    }

    fn messages(issues: &[ValidationIssue]) -> Vec<&str> {
        issues.iter().map(|i| i.message.as_str()).collect()
    }

    #[test]
    fn test_healthy_entry_has_no_issues() {
        let temp = TempDir::new().unwrap();
        healthy_toolkit(temp.path(), "demo");

        let validator = CatalogValidator::new(ToolshelfLayout::from_root(temp.path()), true);
        let issues = validator.validate_entry("demo", &complete_entry("demo"));
        assert!(issues.is_empty(), "unexpected issues: {issues:?}");
    }

    #[test]
    fn test_missing_keys_reported_once() {
        let temp = TempDir::new().unwrap();
        healthy_toolkit(temp.path(), "demo");

        let mut entry = complete_entry("demo");
        entry.remove("docs_url");
        entry.remove("version");

        let issues = RequiredKeysRule.check(&EntryContext {
            layout: &ToolshelfLayout::from_root(temp.path()),
            slug: "demo",
            entry: &entry,
            strict: false,
        });
        assert_eq!(
            messages(&issues),
            vec!["Catalog entry for demo missing keys: docs_url, version"]
        );
    }

    #[test]
    fn test_unanchored_urls() {
        let temp = TempDir::new().unwrap();
        healthy_toolkit(temp.path(), "demo");

        let mut entry = complete_entry("demo");
        entry.insert("docs_url".into(), json!("elsewhere/"));
        entry.insert("bundle_url".into(), json!("toolkits/demo/bundle.tar"));

        let validator = CatalogValidator::new(ToolshelfLayout::from_root(temp.path()), false);
        let issues = validator.validate_entry("demo", &entry);
        assert_eq!(
            messages(&issues),
            vec![
                "Catalog entry for demo should expose docs_url under toolkits/demo/",
                "Catalog entry for demo has bundle_url that must end with .zip",
            ]
        );
        assert!(issues.iter().all(|i| i.rule_id == "required-keys"));
    }

    #[test]
    fn test_list_field_shapes() {
        let temp = TempDir::new().unwrap();
        healthy_toolkit(temp.path(), "demo");

        let mut entry = complete_entry("demo");
        entry.insert("categories".into(), json!(["ok", ""]));
        entry.insert("maintainers".into(), json!("solo"));

        let validator = CatalogValidator::new(ToolshelfLayout::from_root(temp.path()), false);
        let issues = validator.validate_entry("demo", &entry);
        assert_eq!(
            messages(&issues),
            vec![
                "Catalog entry for demo must define categories as a list of non-empty strings",
                "Catalog entry for demo must define maintainers as a list of non-empty strings",
            ]
        );
    }

    #[test]
    fn test_strict_checks_manifest_slug() {
        let temp = TempDir::new().unwrap();
        healthy_toolkit(temp.path(), "demo");
        write(
            &temp.path().join("toolkits/demo/toolkit.json"),
            r#"{"slug": "other"}"#,
        );
        let layout = ToolshelfLayout::from_root(temp.path());

        let lenient = CatalogValidator::new(layout.clone(), false);
        assert!(lenient.validate_entry("demo", &complete_entry("demo")).is_empty());

        let strict = CatalogValidator::new(layout, true);
        let issues = strict.validate_entry("demo", &complete_entry("demo"));
        assert_eq!(messages(&issues), vec!["Manifest slug mismatch for demo"]);
    }

    #[test]
    fn test_strict_reports_invalid_json() {
        let temp = TempDir::new().unwrap();
        healthy_toolkit(temp.path(), "demo");
        write(&temp.path().join("toolkits/demo/toolkit.json"), "{ nope");

        let strict = CatalogValidator::new(ToolshelfLayout::from_root(temp.path()), true);
        let issues = strict.validate_entry("demo", &complete_entry("demo"));
        assert_eq!(issues.len(), 1);
        assert!(issues[0]
            .message
            .starts_with("toolkits/demo/toolkit.json is not valid JSON: "));
    }

    #[test]
    fn test_missing_sources_and_docs() {
        let temp = TempDir::new().unwrap();
        let validator = CatalogValidator::new(ToolshelfLayout::from_root(temp.path()), true);
        let issues = validator.validate_entry("Bad", &complete_entry("Bad"));

        assert_eq!(
            messages(&issues),
            vec![
                "Invalid slug 'Bad': expected lowercase letters, numbers, hyphens, or underscores",
                "Toolkit directory missing: toolkits/Bad",
                "Missing toolkit.json for Bad",
                "Documentation page missing: docs/toolkits/Bad/index.md",
                "Toolkit documentation missing: toolkits/Bad/docs/README.md",
                "Toolkit documentation missing: toolkits/Bad/docs/RELEASE_NOTES.md",
                "Toolkit documentation missing: toolkits/Bad/docs/CHANGELOG.md",
                "Toolkit documentation missing: toolkits/Bad/docs/TESTING.md",
            ]
        );
    }

    #[test]
    fn test_whole_catalog_reports_uncatalogued_dirs() {
        let temp = TempDir::new().unwrap();
        healthy_toolkit(temp.path(), "demo");
        fs::create_dir_all(temp.path().join("toolkits/stray")).unwrap();

        let mut document = CatalogDocument::new();
        document.upsert(complete_entry("demo"));

        let validator = CatalogValidator::new(ToolshelfLayout::from_root(temp.path()), false);
        let report = validator.validate_document(&document, None).unwrap();
        assert_eq!(report.missing_from_catalog, vec!["stray"]);
        assert_eq!(report.failure_count(), 1);
        assert!(!report.passed());

        let single = validator.validate_document(&document, Some("demo")).unwrap();
        assert!(single.missing_from_catalog.is_empty());
        assert!(single.passed());
    }

    #[test]
    fn test_unknown_toolkit_is_not_found() {
        let temp = TempDir::new().unwrap();
        let validator = CatalogValidator::new(ToolshelfLayout::from_root(temp.path()), false);

        let err = validator
            .validate_document(&CatalogDocument::new(), Some("ghost"))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Toolkit 'ghost' missing from catalog/toolkits.json"
        );

        let err = validator.validate(None).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_rule_ids_are_unique() {
        let temp = TempDir::new().unwrap();
        let validator = CatalogValidator::new(ToolshelfLayout::from_root(temp.path()), false);
        let mut ids: Vec<_> = validator.rules().iter().map(|r| r.rule_id()).collect();
        let total = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), total);
    }
}
