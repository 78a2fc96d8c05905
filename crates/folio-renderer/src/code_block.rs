//! Code block processor trait for extensible code block handling.
//!
//! Processors are registered with the renderer and checked in order when a
//! fenced code block is encountered. The first processor returning a
//! non-`PassThrough` result wins; unclaimed blocks get the default
//! `<pre><code>` rendering.
//!
//! # Example
//!
//! ```
//! use folio_renderer::{CodeBlockProcessor, ProcessResult};
//!
//! struct Shout;
//!
//! impl CodeBlockProcessor for Shout {
//!     fn process(&mut self, language: &str, source: &str) -> ProcessResult {
//!         if language == "shout" {
//!             ProcessResult::Inline(format!("<p>{}</p>", source.trim().to_uppercase()))
//!         } else {
//!             ProcessResult::PassThrough
//!         }
//!     }
//! }
//! ```

/// Result of processing a code block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProcessResult {
    /// Replace code block with inline HTML immediately.
    Inline(String),

    /// Render as a regular code block.
    PassThrough,
}

/// Trait for processing special code blocks.
pub trait CodeBlockProcessor {
    /// Process a code block and return the result.
    ///
    /// # Arguments
    ///
    /// * `language` - First word of the fence info string
    /// * `source` - Raw content of the code block
    fn process(&mut self, language: &str, source: &str) -> ProcessResult;

    /// Get warnings generated during processing.
    ///
    /// Default implementation returns empty slice.
    fn warnings(&self) -> &[String] {
        &[]
    }
}

/// Language of a fence info string: its first word, if any.
///
/// Anything after the first word is ignored.
#[must_use]
pub(crate) fn fence_language(info: &str) -> Option<&str> {
    info.split_whitespace().next()
}
