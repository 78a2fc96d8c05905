//! Diagram blocks rendered client-side with zoom controls.
//!
//! A fenced block tagged with the diagram language is emitted as a wrapper
//! carrying the raw source for the client-side library. An optional header
//! segment sizes the container:
//!
//! ````markdown
//! ```mermaid
//! ---
//! height: 600px
//! width: 90vw
//! ---
//! graph TD
//!     A --> B
//! ```
//! ````

use std::collections::BTreeMap;
use std::fmt::Write;

use sha2::{Digest, Sha256};

use crate::code_block::{CodeBlockProcessor, ProcessResult};
use crate::state::escape_html;

/// Header delimiter line.
const HEADER_DELIMITER: &str = "---";
const DEFAULT_HEIGHT: &str = "auto";
const DEFAULT_MIN_HEIGHT: &str = "400px";
const DEFAULT_WIDTH: &str = "100%";
/// Extra container style for viewport-relative widths.
const BREAKOUT_STYLE: &str = " position: relative; left: 50%; transform: translateX(-50%);";

/// Split a diagram source into its header entries and the remaining code.
///
/// The header is present only when the first line is `---` and a later line
/// closes it. Lines without `:` or with an empty key are skipped.
///
/// # Examples
///
/// ```
/// use folio_renderer::parse_diagram_header;
///
/// let (header, code) = parse_diagram_header("---\nheight: 300px\n---\ngraph TD\n");
/// assert_eq!(header.get("height").map(String::as_str), Some("300px"));
/// assert_eq!(code, "graph TD\n");
///
/// let (header, code) = parse_diagram_header("graph TD\n");
/// assert!(header.is_empty());
/// assert_eq!(code, "graph TD\n");
/// ```
#[must_use]
pub fn parse_diagram_header(source: &str) -> (BTreeMap<String, String>, &str) {
    let mut lines = source.split_inclusive('\n');
    let Some(first) = lines
        .next()
        .filter(|first| first.trim_end() == HEADER_DELIMITER)
    else {
        return (BTreeMap::new(), source);
    };

    let mut header = BTreeMap::new();
    let mut offset = first.len();
    for line in lines {
        offset += line.len();
        if line.trim_end() == HEADER_DELIMITER {
            return (header, &source[offset..]);
        }
        if let Some((key, value)) = line.split_once(':') {
            let key = key.trim();
            if !key.is_empty() {
                header.insert(key.to_owned(), value.trim().to_owned());
            }
        }
    }

    (BTreeMap::new(), source)
}

/// Container sizing derived from a diagram header.
#[derive(Debug, PartialEq, Eq)]
struct Layout<'a> {
    height: &'a str,
    min_height: &'a str,
    width: &'a str,
    breakout: bool,
}

impl<'a> Layout<'a> {
    fn from_header(header: &'a BTreeMap<String, String>) -> Self {
        let (height, min_height) = match header.get("height") {
            Some(height) => (height.as_str(), height.as_str()),
            None => (DEFAULT_HEIGHT, DEFAULT_MIN_HEIGHT),
        };
        let width = header.get("width").map_or(DEFAULT_WIDTH, String::as_str);

        Self {
            height,
            min_height,
            width,
            breakout: width.contains("vw"),
        }
    }
}

/// Identifier scoping a diagram's zoom controls.
fn diagram_id(code: &str) -> String {
    let hash = Sha256::digest(code.as_bytes());
    format!("mermaid-{}", &hex::encode(hash)[..8])
}

/// Code block processor for client-rendered diagrams.
///
/// # Example
///
/// ```
/// use folio_renderer::{DiagramProcessor, MarkdownRenderer};
///
/// let result = MarkdownRenderer::new()
///     .with_processor(DiagramProcessor::new("mermaid"))
///     .render_markdown("```mermaid\ngraph TD\n```");
///
/// assert!(result.html.contains(r#"class="mermaid-container""#));
/// assert!(result.html.contains("resetMermaidZoom"));
/// ```
pub struct DiagramProcessor {
    language: String,
}

impl DiagramProcessor {
    /// Create a processor for fenced blocks tagged `language`.
    #[must_use]
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
        }
    }

    fn render(source: &str) -> String {
        let (header, code) = parse_diagram_header(source);
        let layout = Layout::from_header(&header);
        let id = diagram_id(code);
        let escaped = escape_html(code);

        let mut html = String::with_capacity(escaped.len() * 2 + 640);
        write!(
            html,
            r#"<div class="mermaid-container" style="width: {};{}">"#,
            escape_html(layout.width),
            if layout.breakout { BREAKOUT_STYLE } else { "" }
        )
        .unwrap();
        html.push_str(r#"<div class="mermaid-controls">"#);
        for (action, label, title) in [
            ("resetMermaidZoom", "Reset", "Reset zoom"),
            ("zoomMermaidIn", "+", "Zoom in"),
            ("zoomMermaidOut", "\u{2212}", "Zoom out"),
        ] {
            write!(
                html,
                r#"<button type="button" onclick="{action}('{id}')" title="{title}">{label}</button>"#
            )
            .unwrap();
        }
        html.push_str("</div>");
        write!(
            html,
            r#"<div id="{id}" class="mermaid-wrapper" data-mermaid-code="{escaped}" style="height: {}; min-height: {};"><pre class="mermaid">{escaped}</pre></div>"#,
            escape_html(layout.height),
            escape_html(layout.min_height)
        )
        .unwrap();
        html.push_str("</div>");
        html
    }
}

impl CodeBlockProcessor for DiagramProcessor {
    fn process(&mut self, language: &str, source: &str) -> ProcessResult {
        if language == self.language {
            ProcessResult::Inline(Self::render(source))
        } else {
            ProcessResult::PassThrough
        }
    }
}
