//! Mock document source for testing.
//!
//! Provides [`MockSource`] for unit testing without filesystem access.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use std::time::{Duration, SystemTime};

use crate::source::{DocumentSource, Entry, SourceError, SourceErrorKind};

/// In-memory file stored by [`MockSource`].
#[derive(Debug)]
struct MockFile {
    content: Vec<u8>,
    modified: SystemTime,
}

/// Mock source for testing.
///
/// Stores files in memory; directories are implied by file paths.
/// Modification times are set explicitly, so tests can simulate edits
/// deterministically.
///
/// # Example
///
/// ```ignore
/// use std::path::Path;
/// use folio_site::{DocumentSource, MockSource};
///
/// let source = MockSource::new()
///     .with_file("guide.md", "# Guide")
///     .with_file("notes/rust.md", "# Rust");
///
/// assert_eq!(source.read(Path::new("guide.md")).unwrap(), b"# Guide");
/// assert_eq!(source.list(Path::new("")).unwrap().len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct MockSource {
    files: RwLock<HashMap<PathBuf, MockFile>>,
    denied: RwLock<HashSet<PathBuf>>,
}

impl MockSource {
    /// Create a new empty mock source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file with modification time zero.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_file(self, path: impl Into<PathBuf>, content: impl Into<Vec<u8>>) -> Self {
        self.set_file(path, content, 0);
        self
    }

    /// Make reads and listings of a path fail with permission denied.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_denied(self, path: impl Into<PathBuf>) -> Self {
        self.denied.write().unwrap().insert(path.into());
        self
    }

    /// Add or replace a file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path relative to the source root
    /// * `content` - File bytes
    /// * `mtime` - Modification time as seconds since Unix epoch
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn set_file(&self, path: impl Into<PathBuf>, content: impl Into<Vec<u8>>, mtime: u64) {
        self.files.write().unwrap().insert(
            path.into(),
            MockFile {
                content: content.into(),
                modified: SystemTime::UNIX_EPOCH + Duration::from_secs(mtime),
            },
        );
    }

    /// Remove a file.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn remove_file(&self, path: &Path) {
        self.files.write().unwrap().remove(path);
    }

    fn check_access(&self, path: &Path) -> Result<(), SourceError> {
        if self.denied.read().unwrap().contains(path) {
            return Err(SourceError::new(SourceErrorKind::PermissionDenied)
                .with_path(path)
                .with_backend("Mock"));
        }
        Ok(())
    }
}

impl DocumentSource for MockSource {
    fn modified(&self, path: &Path) -> Result<SystemTime, SourceError> {
        self.files
            .read()
            .unwrap()
            .get(path)
            .map(|file| file.modified)
            .ok_or_else(|| SourceError::not_found(path).with_backend("Mock"))
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>, SourceError> {
        self.check_access(path)?;
        self.files
            .read()
            .unwrap()
            .get(path)
            .map(|file| file.content.clone())
            .ok_or_else(|| SourceError::not_found(path).with_backend("Mock"))
    }

    fn list(&self, dir: &Path) -> Result<Vec<Entry>, SourceError> {
        self.check_access(dir)?;

        let files = self.files.read().unwrap();
        let mut dirs = BTreeSet::new();
        let mut entries = Vec::new();

        for path in files.keys() {
            let Ok(rest) = path.strip_prefix(dir) else {
                continue;
            };
            let mut components = rest.components();
            let Some(first) = components.next() else {
                continue;
            };
            let name = first.as_os_str().to_string_lossy().into_owned();
            if components.next().is_some() {
                dirs.insert(name);
            } else {
                entries.push(Entry::file(name));
            }
        }

        if entries.is_empty() && dirs.is_empty() && !dir.as_os_str().is_empty() {
            return Err(SourceError::not_found(dir).with_backend("Mock"));
        }

        entries.extend(dirs.into_iter().map(Entry::dir));
        Ok(entries)
    }
}
