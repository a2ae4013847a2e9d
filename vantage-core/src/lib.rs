//! # Vantage Core
//!
//! Backend services for a local media browser: directory listing and tree
//! reading over a media root, safe tree mutation under concurrent UI
//! access, debounced directory watching, per-folder sidecar tags, and a
//! content-addressed thumbnail cache.
//!
//! The crate is consumed through [`MediaBrowser`], a facade owning one
//! instance of each service. Window chrome, views, and IPC wiring live in
//! the embedding application, which calls these operations and renders
//! their results.
//!
//! ## Error policy
//!
//! Operations that mutate user data propagate every failure; read paths
//! degrade instead — an unreadable directory entry is skipped, a failed
//! subtree read becomes an empty children list, and a broken source image
//! becomes a "no thumbnail" response. Absorbed failures are logged via
//! `tracing`.
#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(missing_docs)]

pub mod browser;
pub mod error;
pub mod fs;
pub mod sidecar;
pub mod thumbs;

pub use browser::MediaBrowser;
pub use error::{BrowserError, Result};
pub use fs::{DEFAULT_TREE_DEPTH, DirectoryWatcher, WatchConfig};
pub use sidecar::SIDECAR_FILENAME;
pub use thumbs::ThumbnailService;

pub use vantage_model as model;
