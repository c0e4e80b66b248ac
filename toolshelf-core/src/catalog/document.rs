//! The catalog document (catalog/toolkits.json)

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::entry::{record_slug, EntryRecord};

/// Current catalog schema version
pub const CATALOG_VERSION: u64 = 1;

/// Aggregated index of all toolkits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogDocument {
    /// Schema version
    #[serde(default = "default_version")]
    pub version: u64,

    /// When an entry last changed (`YYYY-MM-DDTHH:MM:SSZ`)
    #[serde(default)]
    pub generated_at: Option<String>,

    /// Entries, sorted by slug
    #[serde(default)]
    pub toolkits: Vec<EntryRecord>,

    /// Top-level keys written by other tools
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_version() -> u64 {
    CATALOG_VERSION
}

impl Default for CatalogDocument {
    fn default() -> Self {
        Self {
            version: CATALOG_VERSION,
            generated_at: None,
            toolkits: Vec::new(),
            extra: Map::new(),
        }
    }
}

impl CatalogDocument {
    /// Create a new empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a catalog from JSON text
    pub fn from_json(content: &str) -> serde_json::Result<Self> {
        serde_json::from_str(content)
    }

    /// Serialize as 2-space indented JSON with a trailing newline
    pub fn to_json(&self) -> serde_json::Result<String> {
        let mut text = serde_json::to_string_pretty(self)?;
        text.push('\n');
        Ok(text)
    }

    /// Find the entry for `slug` and its position
    pub fn find(&self, slug: &str) -> Option<(usize, &EntryRecord)> {
        self.toolkits
            .iter()
            .enumerate()
            .find(|(_, record)| record_slug(record) == Some(slug))
    }

    /// Replace the entry with the same slug, or append a new one
    pub fn upsert(&mut self, record: EntryRecord) {
        let slug = record_slug(&record).map(str::to_string);
        let position = slug
            .as_deref()
            .and_then(|slug| self.find(slug).map(|(index, _)| index));

        match position {
            Some(index) => self.toolkits[index] = record,
            None => self.toolkits.push(record),
        }
    }

    /// Sort entries by slug (stable; entries without a slug sort first)
    pub fn sort_entries(&mut self) {
        self.toolkits
            .sort_by(|a, b| record_slug(a).unwrap_or("").cmp(record_slug(b).unwrap_or("")));
    }

    /// Slugs of all entries, in document order
    pub fn slugs(&self) -> Vec<&str> {
        self.toolkits.iter().filter_map(record_slug).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn record(value: Value) -> EntryRecord {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn test_empty_document_text() {
        let text = CatalogDocument::new().to_json().unwrap();
        assert_eq!(
            text,
            "{\n  \"version\": 1,\n  \"generated_at\": null,\n  \"toolkits\": []\n}\n"
        );
    }

    #[test]
    fn test_upsert_replaces_existing() {
        let mut doc = CatalogDocument::new();
        doc.upsert(record(json!({"slug": "b", "name": "B"})));
        doc.upsert(record(json!({"slug": "a", "name": "A"})));
        doc.upsert(record(json!({"slug": "b", "name": "B2"})));
        doc.sort_entries();

        assert_eq!(doc.slugs(), vec!["a", "b"]);
        assert_eq!(doc.find("b").unwrap().1["name"], json!("B2"));
        assert_eq!(doc.find("b").unwrap().0, 1);
    }

    #[test]
    fn test_unknown_keys_survive_round_trip() {
        let text = r#"{
            "version": 1,
            "generated_at": "2024-01-01T00:00:00Z",
            "toolkits": [],
            "owner": "sre"
        }"#;
        let doc = CatalogDocument::from_json(text).unwrap();
        assert_eq!(doc.extra.get("owner"), Some(&json!("sre")));
        assert!(doc.to_json().unwrap().contains("\"owner\": \"sre\""));
    }
}
