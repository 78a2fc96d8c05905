//! Front matter parsing.
//!
//! A document may start with a YAML mapping between two `---` lines:
//!
//! ```markdown
//! ---
//! title: Getting Started
//! tags: [intro]
//! ---
//!
//! # Body
//! ```

use serde::Serialize;
use serde_json::{Map, Value};

/// Front matter delimiter line.
const DELIMITER: &str = "---";

/// Error returned when front matter cannot be parsed.
#[derive(Debug, thiserror::Error)]
pub enum FrontMatterError {
    /// Front matter is not valid YAML.
    #[error("invalid front matter: {0}")]
    Yaml(#[from] serde_yaml::Error),
    /// Front matter is valid YAML but not a mapping.
    #[error("front matter must be a mapping")]
    NotAMapping,
}

/// Open-ended document metadata.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Metadata {
    fields: Map<String, Value>,
}

impl Metadata {
    /// Display title, when the front matter sets `title` to a string or a
    /// number.
    #[must_use]
    pub fn title(&self) -> Option<String> {
        match self.fields.get("title")? {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_owned()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Raw value of a metadata key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Immutable snapshot of a document: metadata plus markdown body.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Document {
    pub metadata: Metadata,
    pub body: String,
}

impl Document {
    /// Document with empty metadata and `text` as the body.
    #[must_use]
    pub fn raw(text: &str) -> Self {
        Self {
            metadata: Metadata::default(),
            body: text.trim().to_owned(),
        }
    }
}

/// Split front matter from a document's text.
///
/// Text without a front matter block becomes the body as-is (trimmed). An
/// opening `---` without a closing one is treated as body text.
///
/// # Examples
///
/// ```
/// use folio_site::parse_document;
///
/// let doc = parse_document("---\ntitle: Hello\n---\n\n# Body\n").unwrap();
/// assert_eq!(doc.metadata.title().as_deref(), Some("Hello"));
/// assert_eq!(doc.body, "# Body");
/// ```
pub fn parse_document(text: &str) -> Result<Document, FrontMatterError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text).trim_start();

    let Some((yaml, body)) = split_front_matter(text) else {
        return Ok(Document::raw(text));
    };

    let fields = if yaml.trim().is_empty() {
        Map::new()
    } else {
        match serde_yaml::from_str::<Value>(yaml)? {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            _ => return Err(FrontMatterError::NotAMapping),
        }
    };

    Ok(Document {
        metadata: Metadata { fields },
        body: body.trim().to_owned(),
    })
}

/// Return `(yaml, body)` when `text` opens with a delimited block.
fn split_front_matter(text: &str) -> Option<(&str, &str)> {
    let (first, rest) = text.split_once('\n')?;
    if first.trim_end() != DELIMITER {
        return None;
    }

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == DELIMITER {
            return Some((&rest[..offset], &rest[offset + line.len()..]));
        }
        offset += line.len();
    }
    None
}
