//! Toolkit identifiers

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, ToolshelfError};

static SLUG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9][a-z0-9_-]*$").expect("slug pattern is valid"));

/// Check a candidate string against the slug pattern
pub fn is_valid_slug(candidate: &str) -> bool {
    SLUG_PATTERN.is_match(candidate)
}

/// A validated toolkit slug (`[a-z0-9][a-z0-9_-]*`)
///
/// Slugs double as directory names under `toolkits/` and as catalog keys,
/// so a `Slug` can always be joined onto a path without escaping the
/// toolkit root.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Slug(String);

impl Slug {
    pub fn parse(candidate: &str) -> Result<Self> {
        if is_valid_slug(candidate) {
            Ok(Slug(candidate.to_string()))
        } else {
            Err(ToolshelfError::InvalidSlug(candidate.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Human-readable title derived from the slug ("sample-toolkit" -> "Sample Toolkit")
    pub fn title(&self) -> String {
        title_case(&self.0.replace('-', " "))
    }
}

impl FromStr for Slug {
    type Err = ToolshelfError;

    fn from_str(s: &str) -> Result<Self> {
        Slug::parse(s)
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Upper-case the first letter of every alphabetic run, lower-case the rest
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut previous_alpha = false;
    for ch in text.chars() {
        if ch.is_alphabetic() {
            if previous_alpha {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            previous_alpha = true;
        } else {
            out.push(ch);
            previous_alpha = false;
        }
    }
    out
}
