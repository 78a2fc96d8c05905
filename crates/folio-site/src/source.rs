//! Document source abstraction.
//!
//! Provides the [`DocumentSource`] trait the loader and tree builder read
//! through, along with [`SourceError`] and the filesystem implementation
//! [`FsSource`].
//!
//! # Path Convention
//!
//! All paths are relative to the source root, using `/` separators:
//! - `""` - the root directory
//! - `"guide.md"` - a document at the root
//! - `"notes/rust.md"` - a nested document

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Kind of a directory entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryKind {
    Dir,
    File,
}

/// Directory entry returned by [`DocumentSource::list`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entry {
    /// File or directory name (no path components).
    pub name: String,
    pub kind: EntryKind,
}

impl Entry {
    /// Create a directory entry.
    #[must_use]
    pub fn dir(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::Dir,
        }
    }

    /// Create a file entry.
    #[must_use]
    pub fn file(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::File,
        }
    }

    #[must_use]
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Dir
    }
}

/// Semantic error categories.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum SourceErrorKind {
    /// Resource does not exist.
    NotFound,
    /// Permission denied.
    PermissionDenied,
    /// Other/unknown error category.
    Other,
}

/// Source error with semantic kind and backend-specific cause.
#[derive(Debug)]
pub struct SourceError {
    /// Semantic error category.
    pub kind: SourceErrorKind,
    /// Path context (if applicable).
    pub path: Option<PathBuf>,
    /// Backend identifier (e.g., "Fs", "Mock").
    pub backend: Option<&'static str>,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl SourceError {
    /// Create a new source error.
    #[must_use]
    pub fn new(kind: SourceErrorKind) -> Self {
        Self {
            kind,
            path: None,
            backend: None,
            source: None,
        }
    }

    /// Attach path context.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Attach backend identifier.
    #[must_use]
    pub fn with_backend(mut self, backend: &'static str) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Attach the underlying error.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Create a not found error with path.
    #[must_use]
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::new(SourceErrorKind::NotFound).with_path(path)
    }

    /// Create a source error from an I/O error.
    #[must_use]
    pub fn io(err: std::io::Error, path: impl Into<PathBuf>) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::NotFound => SourceErrorKind::NotFound,
            std::io::ErrorKind::PermissionDenied => SourceErrorKind::PermissionDenied,
            _ => SourceErrorKind::Other,
        };
        Self::new(kind).with_path(path).with_source(err)
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.kind == SourceErrorKind::NotFound
    }
}

impl std::fmt::Display for SourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Format: "[Backend] Kind: cause (path: notes/a.md)"
        if let Some(backend) = self.backend {
            write!(f, "[{backend}] ")?;
        }

        let kind_str = match self.kind {
            SourceErrorKind::NotFound => "Not found",
            SourceErrorKind::PermissionDenied => "Permission denied",
            SourceErrorKind::Other => "Error",
        };
        write!(f, "{kind_str}")?;

        if let Some(source) = &self.source {
            write!(f, ": {source}")?;
        }
        if let Some(path) = &self.path {
            write!(f, " (path: {})", path.display())?;
        }
        Ok(())
    }
}

impl std::error::Error for SourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|s| s.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Read access to a tree of documents.
///
/// Implementations must be thread-safe; the loader and the tree builder
/// call them from concurrent requests.
pub trait DocumentSource: Send + Sync {
    /// Modification timestamp of a file.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the file doesn't exist or can't be stat'ed.
    fn modified(&self, path: &Path) -> Result<SystemTime, SourceError>;

    /// Read a file's raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the file doesn't exist or can't be read.
    fn read(&self, path: &Path) -> Result<Vec<u8>, SourceError>;

    /// List the entries of a directory, in no particular order.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the directory doesn't exist or can't be read.
    fn list(&self, dir: &Path) -> Result<Vec<Entry>, SourceError>;
}

/// Filesystem-backed [`DocumentSource`] rooted at a directory.
#[derive(Clone, Debug)]
pub struct FsSource {
    root: PathBuf,
}

impl FsSource {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory of this source.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }

    fn error(err: std::io::Error, path: &Path) -> SourceError {
        SourceError::io(err, path).with_backend("Fs")
    }
}

impl DocumentSource for FsSource {
    fn modified(&self, path: &Path) -> Result<SystemTime, SourceError> {
        fs::metadata(self.resolve(path))
            .and_then(|meta| meta.modified())
            .map_err(|e| Self::error(e, path))
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>, SourceError> {
        fs::read(self.resolve(path)).map_err(|e| Self::error(e, path))
    }

    fn list(&self, dir: &Path) -> Result<Vec<Entry>, SourceError> {
        let entries = fs::read_dir(self.resolve(dir)).map_err(|e| Self::error(e, dir))?;

        let mut result = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| Self::error(e, dir))?;
            let Ok(file_type) = entry.file_type() else {
                continue;
            };
            let name = entry.file_name().to_string_lossy().into_owned();

            // Follow symlinks so linked folders and documents are listed
            let is_dir = if file_type.is_symlink() {
                entry.path().is_dir()
            } else {
                file_type.is_dir()
            };

            result.push(if is_dir {
                Entry::dir(name)
            } else {
                Entry::file(name)
            });
        }
        Ok(result)
    }
}
