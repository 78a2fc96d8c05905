//! Document loading with a modification-time cache.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::SystemTime;

use crate::document::{Document, parse_document};
use crate::source::DocumentSource;

/// Error returned by [`DocumentLoader::load`].
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The document does not exist.
    #[error("Document not found: {}", .0.display())]
    NotFound(PathBuf),
}

/// Cached parse result for one path.
struct CacheEntry {
    modified: SystemTime,
    document: Arc<Document>,
}

/// Loads documents through a [`DocumentSource`] and caches parse results.
///
/// An entry is reused only while the source reports the same modification
/// time it had when the entry was stored; a changed timestamp causes a
/// re-read. Entries are never evicted. Concurrent loads of the same path may
/// both parse it; the later insert wins.
///
/// Only a missing document is an error. Unreadable files, invalid UTF-8 and
/// malformed front matter degrade to a best-effort [`Document`] with empty
/// metadata.
pub struct DocumentLoader {
    source: Arc<dyn DocumentSource>,
    cache: Mutex<HashMap<PathBuf, CacheEntry>>,
    parses: AtomicUsize,
}

impl DocumentLoader {
    #[must_use]
    pub fn new(source: Arc<dyn DocumentSource>) -> Self {
        Self {
            source,
            cache: Mutex::new(HashMap::new()),
            parses: AtomicUsize::new(0),
        }
    }

    /// Source this loader reads from.
    #[must_use]
    pub fn source(&self) -> &Arc<dyn DocumentSource> {
        &self.source
    }

    /// Number of times a document was parsed (cache misses).
    #[must_use]
    pub fn parse_count(&self) -> usize {
        self.parses.load(Ordering::Relaxed)
    }

    /// Load a document by its path relative to the source root.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::NotFound`] if the document doesn't exist.
    pub fn load(&self, path: &Path) -> Result<Arc<Document>, LoadError> {
        let modified = match self.source.modified(path) {
            Ok(modified) => Some(modified),
            Err(e) if e.is_not_found() => return Err(LoadError::NotFound(path.to_path_buf())),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to stat document, skipping cache");
                None
            }
        };

        if let Some(modified) = modified
            && let Some(document) = self.cached(path, modified)
        {
            tracing::debug!(path = %path.display(), "Document cache hit");
            return Ok(document);
        }

        let bytes = match self.source.read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.is_not_found() => return Err(LoadError::NotFound(path.to_path_buf())),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read document, rendering it empty");
                return Ok(Arc::new(Document::default()));
            }
        };

        let document = Arc::new(self.parse(path, &bytes));

        if let Some(modified) = modified {
            self.lock_cache().insert(
                path.to_path_buf(),
                CacheEntry {
                    modified,
                    document: Arc::clone(&document),
                },
            );
        }
        Ok(document)
    }

    fn cached(&self, path: &Path, modified: SystemTime) -> Option<Arc<Document>> {
        self.lock_cache()
            .get(path)
            .filter(|entry| entry.modified == modified)
            .map(|entry| Arc::clone(&entry.document))
    }

    fn parse(&self, path: &Path, bytes: &[u8]) -> Document {
        self.parses.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(path = %path.display(), "Parsing document");

        let text = String::from_utf8_lossy(bytes);
        if matches!(text, std::borrow::Cow::Owned(_)) {
            tracing::warn!(path = %path.display(), "Document is not valid UTF-8, replacing invalid bytes");
        }

        parse_document(&text).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), error = %e, "Malformed front matter, using raw text");
            Document::raw(&text)
        })
    }

    fn lock_cache(&self) -> std::sync::MutexGuard<'_, HashMap<PathBuf, CacheEntry>> {
        // Entries are replaced whole, so a poisoned map is still consistent
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
