//! Navigation tree mirroring the document directory layout.

use std::path::{Path, PathBuf};

use folio_renderer::slug_to_title;
use serde::Serialize;

use crate::loader::DocumentLoader;
use crate::source::{DocumentSource, Entry};

/// Recognized document extension.
const DOCUMENT_EXTENSION: &str = ".md";
/// Route prefix for documents.
const ROUTE_PREFIX: &str = "/posts/";

/// Navigation tree node.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum NavNode {
    /// Folder with at least one document below it.
    Folder {
        name: String,
        title: String,
        children: Vec<NavNode>,
    },
    /// Document leaf.
    Document {
        name: String,
        title: String,
        /// Route path, e.g. `/posts/notes/rust`.
        route: String,
    },
}

impl NavNode {
    #[must_use]
    pub fn title(&self) -> &str {
        match self {
            Self::Folder { title, .. } | Self::Document { title, .. } => title,
        }
    }
}

/// Find the home document in the root directory.
///
/// The first `index.md` (any case) wins, else the first `readme.md` (any
/// case). Candidates are compared by file name so the choice is stable.
pub fn find_home_document(source: &dyn DocumentSource) -> Option<PathBuf> {
    let mut entries = source.list(Path::new("")).ok()?;
    entries.sort_by(|a, b| a.name.cmp(&b.name));

    ["index", "readme"].into_iter().find_map(|stem| {
        entries
            .iter()
            .filter(|entry| !entry.is_dir())
            .find(|entry| {
                document_stem(&entry.name).is_some_and(|s| s.eq_ignore_ascii_case(stem))
            })
            .map(|entry| PathBuf::from(&entry.name))
    })
}

/// Build the navigation tree below `dir`.
///
/// Hidden entries (leading `.`) are skipped, only `.md` files are listed,
/// folders without documents are omitted, and folders come before
/// documents, each group ordered by name. `home` is left out of the tree.
/// Directories that cannot be listed are logged and treated as empty.
pub fn build_tree(loader: &DocumentLoader, dir: &Path, home: Option<&Path>) -> Vec<NavNode> {
    let mut entries = match loader.source().list(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to list directory");
            return Vec::new();
        }
    };
    entries.retain(|entry| !entry.name.starts_with('.'));
    entries.sort_by(|a, b| b.is_dir().cmp(&a.is_dir()).then_with(|| a.name.cmp(&b.name)));

    entries
        .iter()
        .filter_map(|entry| {
            let path = dir.join(&entry.name);
            if entry.is_dir() {
                folder_node(loader, entry, &path, home)
            } else {
                document_node(loader, entry, &path, home)
            }
        })
        .collect()
}

fn folder_node(
    loader: &DocumentLoader,
    entry: &Entry,
    path: &Path,
    home: Option<&Path>,
) -> Option<NavNode> {
    let children = build_tree(loader, path, home);
    (!children.is_empty()).then(|| NavNode::Folder {
        name: entry.name.clone(),
        title: slug_to_title(&entry.name),
        children,
    })
}

fn document_node(
    loader: &DocumentLoader,
    entry: &Entry,
    path: &Path,
    home: Option<&Path>,
) -> Option<NavNode> {
    let stem = document_stem(&entry.name)?;
    if home == Some(path) {
        return None;
    }

    let title = loader
        .load(path)
        .ok()
        .and_then(|doc| doc.metadata.title())
        .unwrap_or_else(|| slug_to_title(stem));

    Some(NavNode::Document {
        name: entry.name.clone(),
        title,
        route: route_for(path),
    })
}

/// File stem of a document name, or `None` for other files.
fn document_stem(name: &str) -> Option<&str> {
    name.strip_suffix(DOCUMENT_EXTENSION)
        .filter(|stem| !stem.is_empty())
}

/// Route for a document path: `notes/rust.md` becomes `/posts/notes/rust`.
fn route_for(path: &Path) -> String {
    let mut route = String::from(ROUTE_PREFIX);
    for (idx, component) in path.with_extension("").components().enumerate() {
        if idx > 0 {
            route.push('/');
        }
        route.push_str(&component.as_os_str().to_string_lossy());
    }
    route
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::mock::MockSource;

    fn loader(source: MockSource) -> DocumentLoader {
        DocumentLoader::new(Arc::new(source))
    }

    fn doc(name: &str, title: &str, route: &str) -> NavNode {
        NavNode::Document {
            name: name.to_owned(),
            title: title.to_owned(),
            route: route.to_owned(),
        }
    }

    fn tree(loader: &DocumentLoader) -> Vec<NavNode> {
        let home = find_home_document(loader.source().as_ref());
        build_tree(loader, Path::new(""), home.as_deref())
    }

    #[test]
    fn test_folders_first_home_and_hidden_excluded() {
        let loader = loader(
            MockSource::new()
                .with_file("index.md", "# Home")
                .with_file("b.md", "")
                .with_file("a/c.md", "")
                .with_file(".git/d.md", ""),
        );

        assert_eq!(
            tree(&loader),
            vec![
                NavNode::Folder {
                    name: "a".to_owned(),
                    title: "A".to_owned(),
                    children: vec![doc("c.md", "C", "/posts/a/c")],
                },
                doc("b.md", "B", "/posts/b"),
            ]
        );
    }

    #[test]
    fn test_titles_from_metadata_or_file_name() {
        let loader = loader(
            MockSource::new()
                .with_file("getting-started.md", "no front matter")
                .with_file("named.md", "---\ntitle: Custom Title\n---\nBody"),
        );

        assert_eq!(
            tree(&loader),
            vec![
                doc("getting-started.md", "Getting Started", "/posts/getting-started"),
                doc("named.md", "Custom Title", "/posts/named"),
            ]
        );
    }

    #[test]
    fn test_empty_and_non_markdown_folders_omitted() {
        let loader = loader(
            MockSource::new()
                .with_file("images/logo.png", "")
                .with_file("deep/er/only.txt", "")
                .with_file("x.md", ""),
        );

        assert_eq!(tree(&loader), vec![doc("x.md", "X", "/posts/x")]);
    }

    #[test]
    fn test_nested_home_name_is_listed() {
        let loader = loader(
            MockSource::new()
                .with_file("README.md", "")
                .with_file("guide/index.md", ""),
        );

        assert_eq!(
            tree(&loader),
            vec![NavNode::Folder {
                name: "guide".to_owned(),
                title: "Guide".to_owned(),
                children: vec![doc("index.md", "Index", "/posts/guide/index")],
            }]
        );
    }

    #[test]
    fn test_unreadable_folder_is_skipped() {
        let loader = loader(
            MockSource::new()
                .with_file("open/a.md", "")
                .with_file("secret/b.md", "")
                .with_denied("secret"),
        );

        let nodes = tree(&loader);
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].title(), "Open");
    }

    #[test]
    fn test_find_home_prefers_index() {
        let source = MockSource::new()
            .with_file("README.md", "")
            .with_file("Index.md", "");
        assert_eq!(find_home_document(&source), Some(PathBuf::from("Index.md")));
    }

    #[test]
    fn test_find_home_falls_back_to_readme() {
        let source = MockSource::new()
            .with_file("readme.md", "")
            .with_file("other.md", "");
        assert_eq!(find_home_document(&source), Some(PathBuf::from("readme.md")));
    }

    #[test]
    fn test_find_home_ignores_directories_and_other_extensions() {
        let source = MockSource::new()
            .with_file("index/a.md", "")
            .with_file("index.txt", "");
        assert_eq!(find_home_document(&source), None);
    }

    #[test]
    fn test_serialized_shape() {
        let node = NavNode::Folder {
            name: "a".to_owned(),
            title: "A".to_owned(),
            children: vec![doc("b.md", "B", "/posts/a/b")],
        };
        assert_eq!(
            serde_json::to_value(&node).unwrap(),
            serde_json::json!({
                "kind": "folder",
                "name": "a",
                "title": "A",
                "children": [
                    {"kind": "document", "name": "b.md", "title": "B", "route": "/posts/a/b"}
                ]
            })
        );
    }
}
