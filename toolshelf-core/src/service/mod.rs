//! On-demand bundle service
//!
//! A server-agnostic request handler: a [`BundleRequest`] goes in, a
//! [`BundleResponse`] comes out. The CLI embeds it in an HTTP server; tests
//! call it directly.
//!
//! Routes:
//! - `GET|HEAD /catalog/toolkits.json` - the catalog file, verbatim
//! - `GET|HEAD /toolkits/<slug>/bundle.zip` - a freshly built bundle
//!
//! Every request rebuilds the bundle from disk. There is no cache, so
//! concurrent requests may duplicate work but always get a complete archive.

mod config;

pub use config::{ServiceConfig, DEFAULT_MAX_BUNDLE_BYTES, MAX_BYTES_ENV};

use http::header::{
    HeaderName, ALLOW, CACHE_CONTROL, CONTENT_DISPOSITION, CONTENT_LENGTH, CONTENT_TYPE,
    RETRY_AFTER,
};
use http::{HeaderMap, HeaderValue, Method, StatusCode};
use tracing::{debug, error, info, warn};

use crate::bundle::build_bundle_bytes;
use crate::error::ToolshelfError;
use crate::layout::ToolshelfLayout;
use crate::slug::Slug;

/// Path of the catalog route
pub const CATALOG_ROUTE: &str = "/catalog/toolkits.json";

const TOOLKITS_PREFIX: &str = "/toolkits/";
const BUNDLE_FILE: &str = "bundle.zip";
const TEXT_PLAIN: &str = "text/plain; charset=utf-8";
const RETRY_AFTER_SECONDS: &str = "120";

const NOT_FOUND_BODY: &[u8] = b"Toolkit not found";
const METHOD_NOT_ALLOWED_BODY: &[u8] = b"Method not allowed";
const TOO_LARGE_BODY: &[u8] = b"Bundle exceeds configured limit";
const INTERNAL_ERROR_BODY: &[u8] = b"Internal server error";

/// An incoming request, reduced to what the service routes on
#[derive(Debug, Clone)]
pub struct BundleRequest {
    pub method: Method,
    /// Request path without query string
    pub path: String,
    pub headers: HeaderMap,
}

impl BundleRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: HeaderMap::new(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn head(path: impl Into<String>) -> Self {
        Self::new(Method::HEAD, path)
    }
}

/// The service's answer: status, headers and body bytes
#[derive(Debug, Clone)]
pub struct BundleResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl BundleResponse {
    fn new(status: StatusCode, content_type: &'static str, body: Vec<u8>) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
        headers.insert(CONTENT_LENGTH, HeaderValue::from(body.len()));
        Self {
            status,
            headers,
            body,
        }
    }

    fn text(status: StatusCode, body: &'static [u8]) -> Self {
        Self::new(status, TEXT_PLAIN, body.to_vec())
    }

    fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Drop the body for HEAD requests, keeping Content-Length
    fn for_method(mut self, method: &Method) -> Self {
        if method == Method::HEAD {
            self.body.clear();
        }
        self
    }

    /// Header value as a string, if present and visible ASCII
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// Extract the slug from `/toolkits/<slug>/bundle.zip`
///
/// Empty segments are ignored, so `/toolkits//demo/bundle.zip/` matches.
/// Anything else, including an invalid slug, yields `None`.
pub fn parse_bundle_path(path: &str) -> Option<Slug> {
    let remainder = path.strip_prefix(TOOLKITS_PREFIX)?;
    let parts: Vec<&str> = remainder.split('/').filter(|s| !s.is_empty()).collect();
    match parts.as_slice() {
        [slug, endpoint] if *endpoint == BUNDLE_FILE => Slug::parse(slug).ok(),
        _ => None,
    }
}

/// Serves bundles and the catalog for a repository layout
#[derive(Debug, Clone)]
pub struct BundleService {
    layout: ToolshelfLayout,
    config: ServiceConfig,
}

impl BundleService {
    pub fn new(layout: ToolshelfLayout, config: ServiceConfig) -> Self {
        Self { layout, config }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Route and answer a single request
    pub fn handle(&self, request: &BundleRequest) -> BundleResponse {
        let method = &request.method;
        if method != Method::GET && method != Method::HEAD {
            debug!("Rejecting {} {}", method, request.path);
            return BundleResponse::text(StatusCode::METHOD_NOT_ALLOWED, METHOD_NOT_ALLOWED_BODY)
                .with_header(ALLOW, HeaderValue::from_static("GET, HEAD"));
        }

        if request.path == CATALOG_ROUTE {
            return self.serve_catalog().for_method(method);
        }

        let Some(slug) = parse_bundle_path(&request.path) else {
            return not_found();
        };
        self.serve_bundle(&slug).for_method(method)
    }

    fn serve_catalog(&self) -> BundleResponse {
        match std::fs::read(&self.layout.catalog) {
            Ok(payload) => {
                BundleResponse::new(StatusCode::OK, "application/json; charset=utf-8", payload)
                    .with_header(CACHE_CONTROL, HeaderValue::from_static("no-store"))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => not_found(),
            Err(e) => {
                error!("Failed to read catalog {}: {}", self.layout.catalog.display(), e);
                internal_error()
            }
        }
    }

    fn serve_bundle(&self, slug: &Slug) -> BundleResponse {
        let bundle = match build_bundle_bytes(&self.layout, slug) {
            Ok(bundle) => bundle,
            Err(ToolshelfError::NotFound(reason)) => {
                debug!("Bundle request for {}: {}", slug, reason);
                return not_found();
            }
            Err(e) => {
                error!("Failed to build bundle for {}: {}", slug, e);
                return internal_error();
            }
        };

        let size = i64::try_from(bundle.len()).unwrap_or(i64::MAX);
        if size > self.config.max_bundle_bytes {
            warn!(
                "Bundle for {} is {} bytes, over the {} byte limit",
                slug, size, self.config.max_bundle_bytes
            );
            return BundleResponse::text(StatusCode::PAYLOAD_TOO_LARGE, TOO_LARGE_BODY)
                .with_header(RETRY_AFTER, HeaderValue::from_static(RETRY_AFTER_SECONDS));
        }

        let disposition = format!("attachment; filename=\"{slug}_toolkit.zip\"");
        let Ok(disposition) = HeaderValue::from_str(&disposition) else {
            return internal_error();
        };

        info!("Serving bundle for {} ({} bytes)", slug, size);
        BundleResponse::new(StatusCode::OK, "application/zip", bundle)
            .with_header(CONTENT_DISPOSITION, disposition)
            .with_header(CACHE_CONTROL, HeaderValue::from_static("no-store"))
    }
}

fn not_found() -> BundleResponse {
    BundleResponse::text(StatusCode::NOT_FOUND, NOT_FOUND_BODY)
}

fn internal_error() -> BundleResponse {
    BundleResponse::text(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_BODY)
}
