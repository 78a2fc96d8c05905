//! Tabs preprocessor for the `:::tabs` directive.
//!
//! Replaces each well-formed directive with a small fenced placeholder
//! block and keeps the tab contents aside. Panels are rendered later, when
//! [`TabsProcessor`](super::TabsProcessor) meets the placeholder, so nested
//! content is rendered in document order.

use md5::{Digest, Md5};

use crate::fence::FenceTracker;

/// Opening line of a tab group.
const TABS_OPEN: &str = ":::tabs";
/// Closing line of a tab group.
const DIRECTIVE_CLOSE: &str = ":::";
/// Prefix and suffix of a tab title line: `::tab{title="…"}`.
const TAB_PREFIX: &str = "::tab{title=\"";
const TAB_SUFFIX: &str = "\"}";

/// Fence language of the placeholder blocks.
pub(crate) const PLACEHOLDER_LANGUAGE: &str = "folio-tabs";

/// One titled sub-section of a directive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tab {
    pub title: String,
    /// Markdown content, trimmed.
    pub content: String,
}

/// A tab group extracted from the markdown.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TabsGroup {
    /// Content-derived identifier (8 hex digits).
    pub id: String,
    pub tabs: Vec<Tab>,
}

/// Preprocessor that expands tab directives.
///
/// ```markdown
/// :::tabs
/// ::tab{title="macOS"}
/// Install with Homebrew.
/// ::tab{title="Linux"}
/// Install with apt.
/// :::
/// ```
///
/// Directives without titled tabs, or without a closing line, are left
/// unchanged. Nested directives stay inside their parent tab's content.
///
/// # Example
///
/// ```
/// use folio_renderer::TabsPreprocessor;
///
/// let mut preprocessor = TabsPreprocessor::new();
/// let output = preprocessor.process(":::tabs\n::tab{title=\"A\"}\nOne\n::tab{title=\"B\"}\nTwo\n:::\n");
///
/// assert_eq!(output, "```folio-tabs\n0\n```\n");
/// let groups = preprocessor.into_groups();
/// assert_eq!(groups[0].tabs.len(), 2);
/// assert_eq!(groups[0].tabs[1].content, "Two");
/// ```
#[derive(Debug, Default)]
pub struct TabsPreprocessor {
    groups: Vec<TabsGroup>,
    warnings: Vec<String>,
}

impl TabsPreprocessor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Process markdown text and return it with directives replaced by
    /// placeholder blocks.
    #[must_use]
    pub fn process(&mut self, input: &str) -> String {
        let lines: Vec<&str> = input.lines().collect();
        let mut output = String::with_capacity(input.len());
        let mut fence = FenceTracker::new();
        let mut idx = 0;

        while idx < lines.len() {
            let line = lines[idx];
            if !fence.is_code_line(line) && is_tabs_open(line) {
                match find_close(&lines, idx) {
                    Some(close) => {
                        if let Some(placeholder) = self.extract(&lines[idx..=close], idx + 1) {
                            output.push_str(&placeholder);
                            output.push('\n');
                            idx = close + 1;
                            continue;
                        }
                    }
                    None => self.warnings.push(format!(
                        "line {}: {TABS_OPEN} without closing {DIRECTIVE_CLOSE}, passing through",
                        idx + 1
                    )),
                }
            }
            output.push_str(line);
            output.push('\n');
            idx += 1;
        }

        if !input.ends_with('\n') {
            output.pop();
        }
        output
    }

    /// Get warnings generated during processing.
    #[must_use]
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Consume the preprocessor and return the extracted tab groups.
    #[must_use]
    pub fn into_groups(self) -> Vec<TabsGroup> {
        self.groups
    }

    /// Extract one directive (opening line through closing line).
    ///
    /// Returns the placeholder block, or `None` when the directive has no tabs.
    fn extract(&mut self, directive: &[&str], line_num: usize) -> Option<String> {
        let body = &directive[1..directive.len() - 1];
        let tabs = split_tabs(body);
        if tabs.is_empty() {
            self.warnings.push(format!(
                "line {line_num}: {TABS_OPEN} with no ::tab sections, passing through"
            ));
            return None;
        }

        let placeholder = format!("```{PLACEHOLDER_LANGUAGE}\n{}\n```", self.groups.len());
        self.groups.push(TabsGroup {
            id: directive_id(&directive.join("\n")),
            tabs,
        });
        Some(placeholder)
    }
}

fn is_tabs_open(line: &str) -> bool {
    let trimmed = line.trim_end();
    trimmed == TABS_OPEN || trimmed == "::: tabs"
}

fn is_close(line: &str) -> bool {
    line.trim_end() == DIRECTIVE_CLOSE
}

/// Parse a `::tab{title="…"}` line.
fn parse_tab_title(line: &str) -> Option<&str> {
    let title = line
        .trim_end()
        .strip_prefix(TAB_PREFIX)?
        .strip_suffix(TAB_SUFFIX)?;
    (!title.is_empty() && !title.contains('"')).then_some(title)
}

/// Find the closing line of the directive opened at `open`, honoring nesting
/// and code fences.
fn find_close(lines: &[&str], open: usize) -> Option<usize> {
    let mut fence = FenceTracker::new();
    let mut depth = 1usize;

    for (idx, line) in lines.iter().enumerate().skip(open + 1) {
        if fence.is_code_line(line) {
            continue;
        }
        if is_tabs_open(line) {
            depth += 1;
        } else if is_close(line) {
            depth -= 1;
            if depth == 0 {
                return Some(idx);
            }
        }
    }
    None
}

/// Split a directive body into titled tabs. Lines before the first title
/// line are dropped; title lines inside nested directives belong to them.
fn split_tabs(body: &[&str]) -> Vec<Tab> {
    let mut tabs: Vec<(String, Vec<&str>)> = Vec::new();
    let mut fence = FenceTracker::new();
    let mut depth = 0usize;

    for line in body {
        let is_code = fence.is_code_line(line);
        if !is_code {
            if is_tabs_open(line) {
                depth += 1;
            } else if is_close(line) {
                depth = depth.saturating_sub(1);
            } else if depth == 0
                && let Some(title) = parse_tab_title(line)
            {
                tabs.push((title.to_owned(), Vec::new()));
                continue;
            }
        }
        if let Some((_, content)) = tabs.last_mut() {
            content.push(line);
        }
    }

    tabs.into_iter()
        .map(|(title, lines)| Tab {
            title,
            content: lines.join("\n").trim().to_owned(),
        })
        .collect()
}

/// Short identifier derived from the raw directive text.
fn directive_id(raw: &str) -> String {
    let hash = Md5::digest(raw.as_bytes());
    hex::encode(hash)[..8].to_owned()
}
