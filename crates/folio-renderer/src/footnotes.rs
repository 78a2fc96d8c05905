//! Footnotes rendered as sidenotes.
//!
//! Definitions (`[^label]: text`) are pulled out of the body before
//! rendering by [`extract_footnotes`]. A definition runs until a blank line,
//! the next line starting with `[^`, or the end of input. References
//! (`[^label]` not followed by `:`) are left in place and resolved by
//! [`Sidenotes`] while rendering.

use std::cell::Cell;
use std::collections::HashMap;
use std::fmt::Write;
use std::rc::Rc;
use std::sync::LazyLock;

use regex::Regex;

use crate::fence::FenceTracker;
use crate::handler::FootnoteHandler;
use crate::state::escape_html;

static DEFINITION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[\^([^\]]+)\]:\s*(.*)$").expect("footnote definition pattern is valid")
});

/// Footnote definitions of one document, keyed by label.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FootnoteTable {
    definitions: HashMap<String, String>,
}

impl FootnoteTable {
    /// Get the definition text for a label.
    #[must_use]
    pub fn get(&self, label: &str) -> Option<&str> {
        self.definitions.get(label).map(String::as_str)
    }

    /// Add or replace a definition.
    pub fn insert(&mut self, label: impl Into<String>, text: impl Into<String>) {
        self.definitions.insert(label.into(), text.into());
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

/// Remove footnote definitions from a body.
///
/// Returns the remaining body (trimmed) and the definitions. When a label is
/// defined twice, the last definition wins; both are removed. Definitions
/// inside fenced code are left alone. Running this on its own output is a
/// no-op that yields an empty table.
///
/// # Examples
///
/// ```
/// use folio_renderer::extract_footnotes;
///
/// let (body, table) = extract_footnotes("Text[^1].\n\n[^1]: The note.\n");
/// assert_eq!(body, "Text[^1].");
/// assert_eq!(table.get("1"), Some("The note."));
/// ```
#[must_use]
pub fn extract_footnotes(body: &str) -> (String, FootnoteTable) {
    let mut table = FootnoteTable::default();
    let mut kept: Vec<&str> = Vec::new();
    let mut fence = FenceTracker::new();
    let mut current: Option<(String, String)> = None;

    for line in body.lines() {
        if let Some((_, text)) = current.as_mut() {
            if line.trim().is_empty() || line.starts_with("[^") {
                if let Some((label, text)) = current.take() {
                    table.insert(label, text.trim());
                }
            } else {
                text.push('\n');
                text.push_str(line);
                continue;
            }
        }

        if fence.is_code_line(line) {
            kept.push(line);
            continue;
        }

        if let Some(caps) = DEFINITION.captures(line) {
            current = Some((caps[1].to_owned(), caps[2].to_owned()));
        } else {
            kept.push(line);
        }
    }

    if let Some((label, text)) = current {
        table.insert(label, text.trim());
    }

    (kept.join("\n").trim().to_owned(), table)
}

/// Location of an inline footnote reference.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct Reference<'a> {
    pub(crate) start: usize,
    pub(crate) end: usize,
    pub(crate) label: &'a str,
}

/// Find the first `[^label]` in `text` that is not followed by `:`.
pub(crate) fn find_reference(text: &str) -> Option<Reference<'_>> {
    let mut from = 0;
    while let Some(offset) = text[from..].find("[^") {
        let start = from + offset;
        let label_start = start + 2;
        let label_len = text[label_start..].find(']')?;
        let end = label_start + label_len + 1;

        if label_len > 0 && !text[end..].starts_with(':') {
            return Some(Reference {
                start,
                end,
                label: &text[label_start..end - 1],
            });
        }
        from = start + 1;
    }
    None
}

/// Click behavior shared by the reference marker: highlight the note on wide
/// viewports, toggle it on narrow ones.
fn toggle_script(n: usize) -> String {
    format!(
        "on click if window.innerWidth &gt;= 1280 then add .highlight to #sn-{n} then wait 1s then remove .highlight from #sn-{n} else toggle .open on me then toggle .show on #sn-{n}"
    )
}

/// Footnote handler that renders each reference as an inline sidenote.
///
/// Numbers come from a counter that can be shared between renders, so
/// nested content (tab panels) continues the page's numbering.
pub struct Sidenotes {
    table: Rc<FootnoteTable>,
    counter: Rc<Cell<usize>>,
    render_definition: Box<dyn Fn(&str) -> String>,
}

impl Sidenotes {
    /// Create a handler whose definitions are rendered by `render_definition`.
    pub fn new(
        table: Rc<FootnoteTable>,
        counter: Rc<Cell<usize>>,
        render_definition: impl Fn(&str) -> String + 'static,
    ) -> Self {
        Self {
            table,
            counter,
            render_definition: Box::new(render_definition),
        }
    }

    fn next_number(&self) -> usize {
        let n = self.counter.get() + 1;
        self.counter.set(n);
        n
    }
}

impl FootnoteHandler for Sidenotes {
    fn reference(&mut self, label: &str, out: &mut String) {
        let n = self.next_number();
        let note = match self.table.get(label) {
            Some(text) => unwrap_paragraph((self.render_definition)(text)),
            None => format!(
                r#"<span class="sidenote-missing">Missing footnote: {}</span>"#,
                escape_html(label)
            ),
        };
        let toggle = toggle_script(n);

        write!(
            out,
            concat!(
                r#"<span class="hidden" aria-hidden="true"> (</span>"#,
                r#"<span id="snref-{n}" role="doc-noteref" aria-label="Sidenote {n}" class="sidenote-ref" _="{toggle}">{n}</span>"#,
                r#"<span id="sn-{n}" role="doc-footnote" aria-labelledby="snref-{n}" class="sidenote">{note}</span>"#,
                r#"<span class="hidden" aria-hidden="true">)</span>"#,
            ),
            n = n,
            toggle = toggle,
            note = note,
        )
        .unwrap();
    }
}

/// Strip the `<p>` wrapper from a definition rendered as a single paragraph.
fn unwrap_paragraph(html: String) -> String {
    let trimmed = html.trim();
    match trimmed
        .strip_prefix("<p>")
        .and_then(|inner| inner.strip_suffix("</p>"))
    {
        Some(inner) if !inner.contains("<p>") => inner.to_owned(),
        _ => html,
    }
}
