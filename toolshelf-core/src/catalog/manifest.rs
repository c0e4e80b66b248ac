//! Toolkit manifest parsing (toolkit.json)
//!
//! Manifests are written by toolkit authors and are not held to a strict
//! schema. Only the fields the catalog cares about are read, and each is
//! read leniently: text fields that are not non-empty strings count as
//! absent, and list fields accept a single string, a list, or nothing.

use serde::de::{self, Deserializer, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::Deserialize;
use serde_json::Value;
use std::fmt;

use crate::error::{Result, ToolshelfError};
use crate::layout::{ToolshelfLayout, MANIFEST_FILE};
use crate::slug::Slug;

/// A list-shaped input as found in manifests and existing catalog entries
///
/// Supports:
/// - absent / null / any non-list, non-string value
/// - `"tags": "networking"` - a single value
/// - `"tags": ["networking", "dns"]` - a list (non-string items dropped)
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ListInput {
    #[default]
    Absent,
    Single(String),
    Many(Vec<String>),
}

impl ListInput {
    /// Read a list input from an optional JSON value
    pub fn from_value(value: Option<&Value>) -> Self {
        match value {
            Some(value) => ListInput::deserialize(value).unwrap_or_default(),
            None => ListInput::Absent,
        }
    }

    /// Trimmed, non-empty, deduplicated items in input order
    pub fn normalize(&self) -> Vec<String> {
        let items: Vec<&str> = match self {
            ListInput::Absent => Vec::new(),
            ListInput::Single(item) => vec![item.as_str()],
            ListInput::Many(items) => items.iter().map(String::as_str).collect(),
        };

        let mut normalized: Vec<String> = Vec::with_capacity(items.len());
        for item in items {
            let trimmed = item.trim();
            if !trimmed.is_empty() && !normalized.iter().any(|seen| seen == trimmed) {
                normalized.push(trimmed.to_string());
            }
        }
        normalized
    }
}

impl<'de> Deserialize<'de> for ListInput {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ListInputVisitor;

        impl<'de> Visitor<'de> for ListInputVisitor {
            type Value = ListInput;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a string or a list of strings")
            }

            fn visit_str<E>(self, value: &str) -> std::result::Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(ListInput::Single(value.to_string()))
            }

            fn visit_string<E>(self, value: String) -> std::result::Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(ListInput::Single(value))
            }

            fn visit_seq<A>(self, mut seq: A) -> std::result::Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut items = Vec::new();
                while let Some(item) = seq.next_element::<Value>()? {
                    if let Value::String(text) = item {
                        items.push(text);
                    }
                }
                Ok(ListInput::Many(items))
            }

            fn visit_map<M>(self, mut map: M) -> std::result::Result<Self::Value, M::Error>
            where
                M: MapAccess<'de>,
            {
                while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
                Ok(ListInput::Absent)
            }

            fn visit_some<D>(self, deserializer: D) -> std::result::Result<Self::Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                ListInput::deserialize(deserializer)
            }

            fn visit_none<E>(self) -> std::result::Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(ListInput::Absent)
            }

            fn visit_unit<E>(self) -> std::result::Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(ListInput::Absent)
            }

            fn visit_bool<E>(self, _: bool) -> std::result::Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(ListInput::Absent)
            }

            fn visit_i64<E>(self, _: i64) -> std::result::Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(ListInput::Absent)
            }

            fn visit_u64<E>(self, _: u64) -> std::result::Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(ListInput::Absent)
            }

            fn visit_f64<E>(self, _: f64) -> std::result::Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(ListInput::Absent)
            }
        }

        deserializer.deserialize_any(ListInputVisitor)
    }
}

/// Deserialize a text field, treating non-strings and blank strings as absent
fn lenient_text<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(text_value))
}

/// Non-empty trimmed text of a JSON string value
pub(crate) fn text_value(value: &Value) -> Option<String> {
    value
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

/// Deserialize the `catalog` override, ignoring anything that is not an object
fn override_object<'de, D>(deserializer: D) -> std::result::Result<CatalogOverride, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        value @ Value::Object(_) => {
            serde_json::from_value(value).map_err(<D::Error as de::Error>::custom)
        }
        _ => Ok(CatalogOverride::default()),
    }
}

/// Catalog fields a manifest may pin explicitly via its `catalog` object
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogOverride {
    #[serde(default, deserialize_with = "lenient_text")]
    pub description: Option<String>,

    #[serde(default)]
    pub tags: ListInput,

    #[serde(default)]
    pub maintainers: ListInput,

    #[serde(default)]
    pub categories: ListInput,

    #[serde(default, deserialize_with = "lenient_text")]
    pub docs_url: Option<String>,

    #[serde(default, deserialize_with = "lenient_text")]
    pub bundle_url: Option<String>,

    #[serde(default, deserialize_with = "lenient_text")]
    pub source: Option<String>,
}

/// The catalog-relevant view of a toolkit manifest
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ToolkitManifest {
    /// Slug the manifest claims for itself (checked by strict validation)
    #[serde(default, deserialize_with = "lenient_text")]
    pub slug: Option<String>,

    #[serde(default, deserialize_with = "lenient_text")]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "lenient_text")]
    pub version: Option<String>,

    #[serde(default, deserialize_with = "lenient_text")]
    pub description: Option<String>,

    #[serde(default)]
    pub tags: ListInput,

    #[serde(default)]
    pub maintainers: ListInput,

    #[serde(default)]
    pub categories: ListInput,

    /// Singular form accepted as a fallback for `categories`
    #[serde(default)]
    pub category: ListInput,

    /// Explicit catalog overrides; take precedence over manifest fields
    #[serde(default, deserialize_with = "override_object")]
    pub catalog: CatalogOverride,
}

impl ToolkitManifest {
    /// Parse manifest from a JSON string
    ///
    /// The document must be a JSON object; derived struct deserialization
    /// would otherwise fill fields from an array by position.
    pub fn from_json(content: &str) -> serde_json::Result<Self> {
        match serde_json::from_str::<Value>(content)? {
            value @ Value::Object(_) => serde_json::from_value(value),
            _ => Err(<serde_json::Error as de::Error>::custom(
                "manifest must be a JSON object",
            )),
        }
    }

    /// Load the manifest of `slug`, failing with a configuration error if it
    /// is missing or not a JSON object
    pub fn load(layout: &ToolshelfLayout, slug: &Slug) -> Result<Self> {
        let path = layout.manifest_path(slug);
        if !path.is_file() {
            return Err(ToolshelfError::Config(format!(
                "toolkits/{slug}/{MANIFEST_FILE} is required"
            )));
        }

        let content = std::fs::read_to_string(&path).map_err(|e| ToolshelfError::io(&path, e))?;
        Self::from_json(&content).map_err(|e| {
            ToolshelfError::Config(format!(
                "toolkits/{slug}/{MANIFEST_FILE} is not a valid manifest: {e}"
            ))
        })
    }
}
