//! Pluggable handlers for the node kinds the renderer customizes.
//!
//! [`MarkdownRenderer`](crate::MarkdownRenderer) owns one handler per node
//! kind (headings, links, images, footnote references) plus an ordered list
//! of [`CodeBlockProcessor`](crate::CodeBlockProcessor)s. Event dispatch
//! stays in the renderer; swapping a handler never touches it.

use std::fmt::Write;

/// Renders heading elements.
pub trait HeadingHandler {
    /// Write a complete heading element.
    ///
    /// `id` is the anchor slug of the heading's plain text and `inner_html`
    /// its rendered inline content.
    fn heading(&self, level: u8, id: &str, inner_html: &str, out: &mut String);
}

/// Renders the opening and closing tags of links.
pub trait LinkHandler {
    /// Write the opening `<a>` tag for `href`.
    fn link_start(&self, href: &str, title: &str, out: &mut String);

    /// Write the closing tag.
    fn link_end(&self, out: &mut String) {
        out.push_str("</a>");
    }
}

/// Renders images once their alt text has been collected.
pub trait ImageHandler {
    fn image(&self, src: &str, alt: &str, title: &str, out: &mut String);
}

/// Renders inline footnote references (`[^label]`).
///
/// Without a footnote handler, references stay literal text.
pub trait FootnoteHandler {
    fn reference(&mut self, label: &str, out: &mut String);
}

/// Default heading handler: `<hN id="slug">…</hN>`.
#[derive(Clone, Copy, Debug, Default)]
pub struct AnchoredHeadings;

impl HeadingHandler for AnchoredHeadings {
    fn heading(&self, level: u8, id: &str, inner_html: &str, out: &mut String) {
        write!(out, r#"<h{level} id="{id}">{}</h{level}>"#, inner_html.trim()).unwrap();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchored_heading() {
        let mut out = String::new();
        AnchoredHeadings.heading(2, "intro", " Intro <em>now</em> ", &mut out);
        assert_eq!(out, r#"<h2 id="intro">Intro <em>now</em></h2>"#);
    }

    struct Bare;

    impl LinkHandler for Bare {
        fn link_start(&self, href: &str, _title: &str, out: &mut String) {
            write!(out, r#"<a href="{href}">"#).unwrap();
        }
    }

    #[test]
    fn test_default_link_end() {
        let mut out = String::new();
        Bare.link_start("/x", "", &mut out);
        out.push_str("x");
        Bare.link_end(&mut out);
        assert_eq!(out, r#"<a href="/x">x</a>"#);
    }
}
