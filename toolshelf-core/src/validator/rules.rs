//! Validation rules for catalog entries

use super::{EntryContext, ValidationIssue, ValidationRule};
use crate::layout::MANIFEST_FILE;
use crate::slug::is_valid_slug;
use serde_json::Value;

/// Keys every catalog entry must carry
pub const REQUIRED_KEYS: &[&str] = &[
    "bundle_url",
    "categories",
    "description",
    "docs_url",
    "name",
    "tags",
    "version",
];

/// Files each toolkit must ship under `toolkits/<slug>/docs/`
pub const REQUIRED_DOC_FILES: &[&str] = &[
    "README.md",
    "RELEASE_NOTES.md",
    "CHANGELOG.md",
    "TESTING.md",
];

/// Rule: slug must match the slug pattern
pub struct SlugPatternRule;

impl ValidationRule for SlugPatternRule {
    fn rule_id(&self) -> &'static str {
        "slug-pattern"
    }

    fn description(&self) -> &'static str {
        "Slug must use lowercase letters, numbers, hyphens, or underscores"
    }

    fn check(&self, ctx: &EntryContext<'_>) -> Vec<ValidationIssue> {
        if is_valid_slug(ctx.slug) {
            return Vec::new();
        }
        vec![self.issue(format!(
            "Invalid slug '{}': expected lowercase letters, numbers, hyphens, or underscores",
            ctx.slug
        ))]
    }
}

/// Rule: toolkit directory and manifest must exist; strict mode also
/// requires the manifest to parse and name the same slug
pub struct ToolkitSourceRule;

impl ValidationRule for ToolkitSourceRule {
    fn rule_id(&self) -> &'static str {
        "toolkit-source"
    }

    fn description(&self) -> &'static str {
        "Toolkit directory and toolkit.json must exist"
    }

    fn check(&self, ctx: &EntryContext<'_>) -> Vec<ValidationIssue> {
        let slug = ctx.slug;
        let mut issues = Vec::new();

        let toolkit_dir = ctx.layout.toolkits.join(slug);
        if !toolkit_dir.exists() {
            issues.push(self.issue(format!("Toolkit directory missing: toolkits/{slug}")));
        }

        let manifest = toolkit_dir.join(MANIFEST_FILE);
        if !manifest.exists() {
            issues.push(self.issue(format!("Missing toolkit.json for {slug}")));
            return issues;
        }
        if !ctx.strict {
            return issues;
        }

        let parsed = std::fs::read_to_string(&manifest)
            .map_err(|e| e.to_string())
            .and_then(|content| {
                serde_json::from_str::<Value>(&content).map_err(|e| e.to_string())
            });
        match parsed {
            Err(e) => issues.push(self.issue(format!(
                "toolkits/{slug}/{MANIFEST_FILE} is not valid JSON: {e}"
            ))),
            Ok(data) => {
                if data.get("slug").and_then(Value::as_str) != Some(slug) {
                    issues.push(self.issue(format!("Manifest slug mismatch for {slug}")));
                }
            }
        }
        issues
    }
}

/// Rule: required keys present, URLs anchored under `toolkits/<slug>/`
pub struct RequiredKeysRule;

impl ValidationRule for RequiredKeysRule {
    fn rule_id(&self) -> &'static str {
        "required-keys"
    }

    fn description(&self) -> &'static str {
        "Catalog entry must carry the required keys and anchored URLs"
    }

    fn check(&self, ctx: &EntryContext<'_>) -> Vec<ValidationIssue> {
        let slug = ctx.slug;
        let missing: Vec<&str> = REQUIRED_KEYS
            .iter()
            .copied()
            .filter(|key| ctx.field(key).is_none())
            .collect();
        if !missing.is_empty() {
            return vec![self.issue(format!(
                "Catalog entry for {slug} missing keys: {}",
                missing.join(", ")
            ))];
        }

        let anchor = format!("toolkits/{slug}/");
        let mut issues = Vec::new();

        match non_empty_text(ctx.field("docs_url")) {
            None => issues.push(self.issue(format!(
                "Catalog entry for {slug} has an empty docs_url"
            ))),
            Some(url) if !url.starts_with(&anchor) => issues.push(self.issue(format!(
                "Catalog entry for {slug} should expose docs_url under {anchor}"
            ))),
            Some(_) => {}
        }

        match non_empty_text(ctx.field("bundle_url")) {
            None => {
                issues.push(self.issue(format!("Catalog entry for {slug} has an empty bundle_url")))
            }
            Some(url) if !url.starts_with(&anchor) => issues.push(self.issue(format!(
                "Catalog entry for {slug} should expose bundle_url under {anchor}"
            ))),
            Some(url) if !url.ends_with(".zip") => issues.push(self.issue(format!(
                "Catalog entry for {slug} has bundle_url that must end with .zip"
            ))),
            Some(_) => {}
        }

        issues
    }
}

/// Rule: list fields hold only non-empty strings
pub struct ListFieldsRule;

impl ValidationRule for ListFieldsRule {
    fn rule_id(&self) -> &'static str {
        "list-fields"
    }

    fn description(&self) -> &'static str {
        "tags, categories and maintainers must be lists of non-empty strings"
    }

    fn check(&self, ctx: &EntryContext<'_>) -> Vec<ValidationIssue> {
        // Absent tags/categories are reported by required-keys
        ["tags", "categories", "maintainers"]
            .into_iter()
            .filter_map(|key| ctx.field(key).map(|value| (key, value)))
            .filter(|(_, value)| !is_string_list(value))
            .map(|(key, _)| {
                self.issue(format!(
                    "Catalog entry for {} must define {key} as a list of non-empty strings",
                    ctx.slug
                ))
            })
            .collect()
    }
}

/// Rule: generated documentation page exists
pub struct GeneratedPageRule;

impl ValidationRule for GeneratedPageRule {
    fn rule_id(&self) -> &'static str {
        "generated-page"
    }

    fn description(&self) -> &'static str {
        "docs/toolkits/<slug>/index.md must have been generated"
    }

    fn check(&self, ctx: &EntryContext<'_>) -> Vec<ValidationIssue> {
        let page = ctx.layout.docs_toolkits.join(ctx.slug).join("index.md");
        if page.exists() {
            return Vec::new();
        }
        vec![self.issue(format!(
            "Documentation page missing: docs/toolkits/{}/index.md",
            ctx.slug
        ))]
    }
}

/// Rule: toolkit ships its documentation set
pub struct ToolkitDocsRule;

impl ValidationRule for ToolkitDocsRule {
    fn rule_id(&self) -> &'static str {
        "toolkit-docs"
    }

    fn description(&self) -> &'static str {
        "Toolkit must ship README, release notes, changelog and testing docs"
    }

    fn check(&self, ctx: &EntryContext<'_>) -> Vec<ValidationIssue> {
        let docs_dir = ctx.layout.toolkits.join(ctx.slug).join("docs");
        REQUIRED_DOC_FILES
            .iter()
            .filter(|name| !docs_dir.join(name).exists())
            .map(|name| {
                self.issue(format!(
                    "Toolkit documentation missing: toolkits/{}/docs/{name}",
                    ctx.slug
                ))
            })
            .collect()
    }
}

fn non_empty_text(value: Option<&Value>) -> Option<&str> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn is_string_list(value: &Value) -> bool {
    match value {
        Value::Array(items) => items
            .iter()
            .all(|item| item.as_str().is_some_and(|s| !s.trim().is_empty())),
        _ => false,
    }
}
