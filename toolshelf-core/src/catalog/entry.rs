//! Catalog entries
//!
//! Entries are persisted as plain JSON objects so that keys written by
//! other tools survive a round trip. [`CatalogEntry`] is the normalized
//! form the reconciler produces; [`CatalogEntry::to_record`] lays it out
//! with the preferred key order.

use serde_json::{Map, Value};

use super::manifest::{text_value, ListInput};

/// A catalog entry as stored on disk
pub type EntryRecord = Map<String, Value>;

/// Preferred key order for catalog entries; other keys follow
pub const PREFERRED_KEYS: &[&str] = &[
    "slug",
    "name",
    "version",
    "description",
    "tags",
    "maintainers",
    "source",
    "docs_url",
    "bundle_url",
    "categories",
];

/// A normalized catalog entry
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub slug: String,
    pub name: String,
    pub version: String,
    pub description: String,
    pub tags: Vec<String>,
    pub maintainers: Vec<String>,
    pub source: String,
    pub docs_url: String,
    pub bundle_url: String,
    pub categories: Vec<String>,
    /// Keys outside the preferred set, in their original order
    pub extra: Map<String, Value>,
}

impl CatalogEntry {
    /// Render the entry as a JSON object with the preferred key order
    pub fn to_record(&self) -> EntryRecord {
        let mut record = Map::new();
        record.insert("slug".into(), Value::from(self.slug.as_str()));
        record.insert("name".into(), Value::from(self.name.as_str()));
        record.insert("version".into(), Value::from(self.version.as_str()));
        record.insert("description".into(), Value::from(self.description.as_str()));
        record.insert("tags".into(), string_list(&self.tags));
        record.insert("maintainers".into(), string_list(&self.maintainers));
        record.insert("source".into(), Value::from(self.source.as_str()));
        record.insert("docs_url".into(), Value::from(self.docs_url.as_str()));
        record.insert("bundle_url".into(), Value::from(self.bundle_url.as_str()));
        record.insert("categories".into(), string_list(&self.categories));

        for (key, value) in &self.extra {
            if !record.contains_key(key) {
                record.insert(key.clone(), value.clone());
            }
        }
        record
    }
}

fn string_list(items: &[String]) -> Value {
    Value::Array(items.iter().map(|s| Value::from(s.as_str())).collect())
}

/// The slug stored in a record, if it is a string
pub fn record_slug(record: &EntryRecord) -> Option<&str> {
    record.get("slug").and_then(Value::as_str)
}

/// Non-empty trimmed text stored under `key`
pub fn record_text(record: &EntryRecord, key: &str) -> Option<String> {
    record.get(key).and_then(text_value)
}

/// Normalized list stored under `key`
pub fn record_list(record: &EntryRecord, key: &str) -> Vec<String> {
    ListInput::from_value(record.get(key)).normalize()
}

/// Keys of `record` outside the preferred set, in their original order
pub fn record_extra(record: &EntryRecord) -> Map<String, Value> {
    record
        .iter()
        .filter(|(key, _)| !PREFERRED_KEYS.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}
