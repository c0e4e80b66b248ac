//! Template variables for the documentation site generator

use serde::Serialize;

/// Environment variable holding `<owner>/<repo>`
pub const REPOSITORY_ENV: &str = "GITHUB_REPOSITORY";

pub const DEFAULT_REPOSITORY: &str = "sre-toolbox-community/ideal-octo-engine";

/// Variables exposed to site templates, serialized in key order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SiteVariables {
    pub raw_catalog_url: String,
    pub repo_slug: String,
    pub repo_url: String,
}

impl SiteVariables {
    pub fn from_env() -> Self {
        let repository = std::env::var(REPOSITORY_ENV)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_REPOSITORY.to_string());
        Self::for_repository(repository.trim())
    }

    pub fn for_repository(repository: &str) -> Self {
        Self {
            raw_catalog_url: format!(
                "https://raw.githubusercontent.com/{repository}/main/catalog/toolkits.json"
            ),
            repo_slug: repository.to_string(),
            repo_url: format!("https://github.com/{repository}"),
        }
    }
}
