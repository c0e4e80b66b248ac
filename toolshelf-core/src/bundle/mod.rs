//! Toolkit bundles
//!
//! A bundle is a zip archive of a toolkit's whole source tree, with every
//! entry namespaced under `<slug>/`. Bundles are built on demand from the
//! files on disk; the synchronizer mirrors one to `docs/toolkits/<slug>/`
//! for static hosting and the HTTP service builds one per request.

mod archive;

pub use archive::{build_bundle_bytes, bundle_toolkit, list_toolkit_files, BundleSummary};
