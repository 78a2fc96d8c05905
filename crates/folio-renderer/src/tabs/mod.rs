//! Tabbed content groups for markdown.
//!
//! ```markdown
//! :::tabs
//! ::tab{title="macOS"}
//! Install with Homebrew.
//! ::tab{title="Linux"}
//! Install with apt.
//! :::
//! ```
//!
//! # Architecture
//!
//! Tab groups are handled in two phases:
//!
//! 1. **Preprocessing** ([`TabsPreprocessor`]): extracts each directive's
//!    tabs and leaves a fenced placeholder block in the markdown, so blank
//!    lines inside tab content cannot break the surrounding document.
//!
//! 2. **Rendering** ([`TabsProcessor`]): when the renderer reaches a
//!    placeholder, renders the group's panels and emits the container.
//!
//! # Usage
//!
//! ```
//! use folio_renderer::{MarkdownRenderer, TabsPreprocessor, TabsProcessor};
//!
//! let markdown = ":::tabs\n::tab{title=\"macOS\"}\nHomebrew.\n::tab{title=\"Linux\"}\napt.\n:::\n";
//!
//! let mut preprocessor = TabsPreprocessor::new();
//! let processed = preprocessor.process(markdown);
//! let groups = preprocessor.into_groups();
//!
//! let result = MarkdownRenderer::new()
//!     .with_processor(TabsProcessor::new(groups, |md| {
//!         MarkdownRenderer::new().render_markdown(md).html
//!     }))
//!     .render_markdown(&processed);
//!
//! assert!(result.html.contains(r#"role="tablist""#));
//! assert!(result.html.contains("<p>Homebrew.</p>"));
//! ```

mod preprocessor;
mod processor;

pub use preprocessor::{Tab, TabsGroup, TabsPreprocessor};
pub use processor::TabsProcessor;
