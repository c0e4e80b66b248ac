//! Catalog Validator - consistency checks across catalog, sources and docs
//!
//! Read-only. Each catalog entry is run through a fixed list of rules; the
//! issues they report are collected per toolkit. Whole-catalog runs also
//! report toolkit directories that never made it into the catalog.

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{debug, info};

pub mod rules;

#[cfg(test)]
mod tests;

use crate::catalog::{record_slug, CatalogDocument, EntryRecord, FileCatalogStore};
use crate::error::{Result, ToolshelfError};
use crate::layout::ToolshelfLayout;
use rules::*;

/// A single problem found in a catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    /// Identifier of the rule that raised the issue
    pub rule_id: &'static str,
    /// Human-readable description
    pub message: String,
}

/// Everything a rule may inspect for one catalog entry
pub struct EntryContext<'a> {
    pub layout: &'a ToolshelfLayout,
    pub slug: &'a str,
    pub entry: &'a EntryRecord,
    pub strict: bool,
}

impl EntryContext<'_> {
    /// Entry value under `key`, if present
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.entry.get(key)
    }
}

/// Trait for validation rules
pub trait ValidationRule: Send + Sync {
    /// Check one entry for issues
    fn check(&self, ctx: &EntryContext<'_>) -> Vec<ValidationIssue>;

    /// Rule identifier
    fn rule_id(&self) -> &'static str;

    /// Rule description
    fn description(&self) -> &'static str;

    fn issue(&self, message: String) -> ValidationIssue {
        ValidationIssue {
            rule_id: self.rule_id(),
            message,
        }
    }
}

/// Validation result for one toolkit
#[derive(Debug, Clone, Serialize)]
pub struct ToolkitReport {
    pub slug: String,
    pub issues: Vec<ValidationIssue>,
}

impl ToolkitReport {
    pub fn passed(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Validation result for a run
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub toolkits: Vec<ToolkitReport>,
    /// Toolkit directories with no catalog entry (whole-catalog runs only)
    pub missing_from_catalog: Vec<String>,
}

impl ValidationReport {
    /// Failing toolkits plus directories missing from the catalog
    pub fn failure_count(&self) -> usize {
        self.toolkits.iter().filter(|t| !t.passed()).count() + self.missing_from_catalog.len()
    }

    pub fn passed(&self) -> bool {
        self.failure_count() == 0
    }
}

/// Main catalog validator
pub struct CatalogValidator {
    layout: ToolshelfLayout,
    strict: bool,
    rules: Vec<Box<dyn ValidationRule>>,
}

impl CatalogValidator {
    /// Create validator with the default catalog rules
    pub fn new(layout: ToolshelfLayout, strict: bool) -> Self {
        let rules: Vec<Box<dyn ValidationRule>> = vec![
            Box::new(SlugPatternRule),
            Box::new(ToolkitSourceRule),
            Box::new(RequiredKeysRule),
            Box::new(ListFieldsRule),
            Box::new(GeneratedPageRule),
            Box::new(ToolkitDocsRule),
        ];

        Self {
            layout,
            strict,
            rules,
        }
    }

    pub fn rules(&self) -> &[Box<dyn ValidationRule>] {
        &self.rules
    }

    /// Run every rule against a single entry
    pub fn validate_entry(&self, slug: &str, entry: &EntryRecord) -> Vec<ValidationIssue> {
        debug!("Validating catalog entry: {}", slug);
        let ctx = EntryContext {
            layout: &self.layout,
            slug,
            entry,
            strict: self.strict,
        };
        self.rules.iter().flat_map(|rule| rule.check(&ctx)).collect()
    }

    /// Validate one toolkit, or the whole catalog when `toolkit` is `None`
    pub fn validate(&self, toolkit: Option<&str>) -> Result<ValidationReport> {
        let document = FileCatalogStore::new(self.layout.catalog.clone()).load_required()?;
        self.validate_document(&document, toolkit)
    }

    /// Validate an already loaded catalog document
    pub fn validate_document(
        &self,
        document: &CatalogDocument,
        toolkit: Option<&str>,
    ) -> Result<ValidationReport> {
        // Later entries win for duplicated slugs
        let entries: BTreeMap<&str, &EntryRecord> = document
            .toolkits
            .iter()
            .filter_map(|record| record_slug(record).map(|slug| (slug, record)))
            .collect();

        let selected: Vec<(&str, &EntryRecord)> = match toolkit {
            Some(slug) => {
                let entry = entries.get(slug).ok_or_else(|| {
                    ToolshelfError::NotFound(format!(
                        "Toolkit '{slug}' missing from catalog/toolkits.json"
                    ))
                })?;
                vec![(slug, *entry)]
            }
            None => entries.iter().map(|(slug, entry)| (*slug, *entry)).collect(),
        };

        let mut report = ValidationReport::default();
        for (slug, entry) in selected {
            report.toolkits.push(ToolkitReport {
                slug: slug.to_string(),
                issues: self.validate_entry(slug, entry),
            });
        }

        if toolkit.is_none() {
            report.missing_from_catalog = self
                .layout
                .discover_toolkit_names()?
                .into_iter()
                .filter(|name| !entries.contains_key(name.as_str()))
                .collect();
        }

        info!(
            "Validated {} catalog entries, {} failures",
            report.toolkits.len(),
            report.failure_count()
        );
        Ok(report)
    }
}
