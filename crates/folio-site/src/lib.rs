//! Document loading, navigation and page rendering for folio.
//!
//! This crate provides:
//! - [`Site`]: page and home rendering plus the navigation tree
//! - [`DocumentLoader`]: front matter parsing with a modification-time cache
//! - [`DocumentSource`]: the storage seam, with [`FsSource`] for directories
//!
//! # Quick Start
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::sync::Arc;
//! use folio_renderer::RenderOptions;
//! use folio_site::{Site, SiteConfig};
//!
//! let config = SiteConfig {
//!     title: "Notes".to_owned(),
//!     render_options: RenderOptions::default(),
//! };
//! let site = Arc::new(Site::open("notes", config));
//!
//! let nav = site.navigation();
//! let page = site.render_page("rust/ownership")?;
//! # Ok(())
//! # }
//! ```

mod document;
mod loader;
#[cfg(any(test, feature = "mock"))]
mod mock;
mod site;
mod source;
mod tree;

pub use document::{Document, FrontMatterError, Metadata, parse_document};
pub use loader::{DocumentLoader, LoadError};
#[cfg(any(test, feature = "mock"))]
pub use mock::MockSource;
pub use site::{Home, Page, Site, SiteConfig, SiteError};
pub use source::{DocumentSource, Entry, EntryKind, FsSource, SourceError, SourceErrorKind};
pub use tree::{NavNode, build_tree, find_home_document};

// Re-export TocEntry from folio-renderer for convenience
pub use folio_renderer::TocEntry;
