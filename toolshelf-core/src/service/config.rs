//! Bundle service configuration

use tracing::warn;

/// Environment variable overriding the bundle size limit
pub const MAX_BYTES_ENV: &str = "TOOLKIT_UPLOAD_MAX_BYTES";

/// 50 MiB
pub const DEFAULT_MAX_BUNDLE_BYTES: i64 = 50 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Largest bundle, in bytes, the service will return. A negative
    /// limit rejects every bundle.
    pub max_bundle_bytes: i64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            max_bundle_bytes: DEFAULT_MAX_BUNDLE_BYTES,
        }
    }
}

impl ServiceConfig {
    /// Read the limit from `TOOLKIT_UPLOAD_MAX_BYTES`
    ///
    /// The environment is read once, here; a running service keeps the
    /// value it was built with.
    pub fn from_env() -> Self {
        Self::from_value(std::env::var(MAX_BYTES_ENV).ok().as_deref())
    }

    /// Parse a raw limit, falling back to the default when it is missing,
    /// blank or not an integer
    pub fn from_value(raw: Option<&str>) -> Self {
        let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
            return Self::default();
        };

        match raw.parse::<i64>() {
            Ok(max_bundle_bytes) => Self { max_bundle_bytes },
            Err(_) => {
                warn!(
                    "Ignoring invalid {}={:?}, using {} bytes",
                    MAX_BYTES_ENV, raw, DEFAULT_MAX_BUNDLE_BYTES
                );
                Self::default()
            }
        }
    }
}
