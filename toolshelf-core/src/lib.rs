//! Toolshelf core library
//!
//! Builds toolkit bundles, reconciles the catalog, synchronizes generated
//! documentation, serves bundles on demand and validates the result.

pub mod bundle;
pub mod catalog;
pub mod docs;
pub mod error;
pub mod io;
pub mod layout;
pub mod service;
pub mod site;
pub mod slug;
pub mod validator;

pub use error::{Result, ToolshelfError};
pub use layout::ToolshelfLayout;
pub use slug::Slug;
