//! Markdown rendering for folio documents.
//!
//! This crate turns a document body into an HTML fragment plus a table of
//! contents. On top of the base grammar it adds:
//!
//! - footnotes rendered as sidenotes ([`extract_footnotes`], [`Sidenotes`])
//! - `:::tabs` directives ([`TabsPreprocessor`], [`TabsProcessor`])
//! - client-rendered diagrams with sizing headers ([`DiagramProcessor`])
//! - internal/external link classification ([`classify_link`], [`HtmxLinks`])
//! - anchored headings whose ids match [`extract_toc`]
//!
//! # Architecture
//!
//! [`MarkdownRenderer`] walks pulldown-cmark events and delegates the node
//! kinds it customizes to a handler table ([`HeadingHandler`],
//! [`LinkHandler`], [`ImageHandler`], [`FootnoteHandler`]) and to an ordered
//! list of [`CodeBlockProcessor`]s. [`render_document`] wires the full
//! pipeline together.
//!
//! # Example
//!
//! ```
//! use folio_renderer::{RenderOptions, render_document};
//!
//! let result = render_document("# Hello\n\n**Bold** text", &RenderOptions::default());
//! assert_eq!(result.html, r#"<h1 id="hello">Hello</h1><p><strong>Bold</strong> text</p>"#);
//! assert_eq!(result.toc[0].title, "Hello");
//! ```

mod code_block;
mod diagram;
mod document;
mod fence;
mod footnotes;
mod handler;
mod html;
mod link;
mod renderer;
mod slug;
mod state;
mod tabs;
mod toc;

pub use code_block::{CodeBlockProcessor, ProcessResult};
pub use diagram::{DiagramProcessor, parse_diagram_header};
pub use document::{
    DEFAULT_DIAGRAM_LANGUAGE, DEFAULT_IMAGE_DIR, DEFAULT_MAX_DEPTH, RenderOptions,
    render_document,
};
pub use footnotes::{FootnoteTable, Sidenotes, extract_footnotes};
pub use handler::{AnchoredHeadings, FootnoteHandler, HeadingHandler, ImageHandler, LinkHandler};
pub use html::HtmlImages;
pub use link::{HtmxLinks, LinkKind, MAIN_CONTENT_TARGET, classify_link};
pub use renderer::{MarkdownRenderer, RenderResult};
pub use slug::{anchor_slug, slug_to_title};
pub use state::{TocEntry, escape_html};
pub use tabs::{Tab, TabsGroup, TabsPreprocessor, TabsProcessor};
pub use toc::extract_toc;
