//! Site facade: document lookup, rendering and navigation.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use folio_renderer::{RenderOptions, TocEntry, render_document, slug_to_title};
use serde::Serialize;

use crate::document::Metadata;
use crate::loader::{DocumentLoader, LoadError};
use crate::source::{DocumentSource, FsSource};
use crate::tree::{NavNode, build_tree, find_home_document};

/// Error returned when a page cannot be rendered.
#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    /// No document at the requested path.
    #[error("Page not found: {0}")]
    NotFound(String),
    /// Requested path is absolute, hidden or escapes the document root.
    #[error("Invalid page path: {0}")]
    InvalidPath(String),
}

impl From<LoadError> for SiteError {
    fn from(e: LoadError) -> Self {
        match e {
            LoadError::NotFound(path) => Self::NotFound(path.display().to_string()),
        }
    }
}

/// Configuration for [`Site`].
#[derive(Clone, Debug)]
pub struct SiteConfig {
    /// Site title, used for the home page and page titles.
    pub title: String,
    /// Options passed to the renderer for every page.
    pub render_options: RenderOptions,
}

/// Rendered document page.
#[derive(Clone, Debug, Serialize)]
pub struct Page {
    /// Display title (metadata title or derived from the path).
    pub title: String,
    /// Request path without extension (e.g., "notes/rust"); empty for home.
    pub path: String,
    /// Rendered HTML fragment.
    pub html: String,
    pub toc: Vec<TocEntry>,
    pub metadata: Metadata,
    /// Recovered rendering problems (malformed directives, missing notes).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// Result of rendering the home page.
#[derive(Clone, Debug)]
pub enum Home {
    /// Rendered `index.md` or `README.md`.
    Document(Page),
    /// No home document; show a welcome message instead.
    Welcome {
        /// Site title.
        title: String,
    },
}

/// Document site rooted at a [`DocumentSource`].
///
/// Thread-safe; share it across request handlers with `Arc<Site>`. Nothing
/// is cached beyond parsed documents, so the navigation tree and home page
/// always reflect the current directory contents.
pub struct Site {
    loader: DocumentLoader,
    config: SiteConfig,
}

impl Site {
    /// Create a site over an arbitrary source.
    #[must_use]
    pub fn new(source: Arc<dyn DocumentSource>, config: SiteConfig) -> Self {
        Self {
            loader: DocumentLoader::new(source),
            config,
        }
    }

    /// Create a site over a directory on disk.
    #[must_use]
    pub fn open(root: impl Into<PathBuf>, config: SiteConfig) -> Self {
        Self::new(Arc::new(FsSource::new(root)), config)
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.config.title
    }

    /// Document loader backing this site.
    #[must_use]
    pub fn loader(&self) -> &DocumentLoader {
        &self.loader
    }

    /// Render the document at `path` (no extension, `/`-separated).
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::InvalidPath`] for absolute paths or paths with
    /// empty or dot-prefixed segments, and [`SiteError::NotFound`] if no
    /// document exists.
    pub fn render_page(&self, path: &str) -> Result<Page, SiteError> {
        let file = document_file(path)?;
        let document = self.loader.load(&file)?;

        let title = document.metadata.title().unwrap_or_else(|| {
            let name = path.rsplit('/').next().unwrap_or(path);
            slug_to_title(name)
        });

        Ok(self.page(title, path, &document.body, document.metadata.clone()))
    }

    /// Render the home page.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::NotFound`] if the home document disappears
    /// between lookup and load.
    pub fn render_home(&self) -> Result<Home, SiteError> {
        let Some(file) = self.home_document() else {
            return Ok(Home::Welcome {
                title: self.config.title.clone(),
            });
        };

        let document = self.loader.load(&file)?;
        let title = document
            .metadata
            .title()
            .unwrap_or_else(|| self.config.title.clone());

        Ok(Home::Document(self.page(
            title,
            "",
            &document.body,
            document.metadata.clone(),
        )))
    }

    /// Navigation tree for the whole site, without the home document.
    #[must_use]
    pub fn navigation(&self) -> Vec<NavNode> {
        let home = self.home_document();
        build_tree(&self.loader, Path::new(""), home.as_deref())
    }

    /// Path of the home document, if the root has one.
    #[must_use]
    pub fn home_document(&self) -> Option<PathBuf> {
        find_home_document(self.loader.source().as_ref())
    }

    fn page(&self, title: String, path: &str, body: &str, metadata: Metadata) -> Page {
        let result = render_document(body, &self.config.render_options);
        for warning in &result.warnings {
            tracing::debug!(path, warning = %warning, "Render warning");
        }

        Page {
            title,
            path: path.to_owned(),
            html: result.html,
            toc: result.toc,
            metadata,
            warnings: result.warnings,
        }
    }
}

/// Map a request path to a document file, rejecting traversal and hidden
/// segments.
fn document_file(path: &str) -> Result<PathBuf, SiteError> {
    let valid = !path.contains('\\')
        && path
            .split('/')
            .all(|segment| !segment.is_empty() && !segment.starts_with('.'));

    if valid {
        Ok(PathBuf::from(format!("{path}.md")))
    } else {
        Err(SiteError::InvalidPath(path.to_owned()))
    }
}
