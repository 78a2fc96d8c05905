//! Internal/external link classification.
//!
//! A link is internal when it is rooted at the site (`/…` but not `//…`)
//! and its final path segment has no dot. Content routes carry no file
//! extension, so `/image.png` counts as external even though it is served
//! locally. The check is purely syntactic.

use std::fmt::Write;

use crate::handler::LinkHandler;
use crate::state::escape_html;

/// Element that partial navigation swaps.
pub const MAIN_CONTENT_TARGET: &str = "#main-content";

/// Classification of a link target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum LinkKind {
    /// Site route, navigated without a full page reload.
    Internal,
    /// Anything else, opened in a new tab.
    External,
}

/// Classify a link target.
///
/// # Examples
///
/// ```
/// use folio_renderer::{LinkKind, classify_link};
///
/// assert_eq!(classify_link("/posts/my-note"), LinkKind::Internal);
/// assert_eq!(classify_link("/image.png"), LinkKind::External);
/// assert_eq!(classify_link("https://example.com"), LinkKind::External);
/// ```
#[must_use]
pub fn classify_link(href: &str) -> LinkKind {
    let rooted = href.starts_with('/') && !href.starts_with("//");
    let last_segment = href.rsplit('/').next().unwrap_or(href);

    if rooted && !last_segment.contains('.') {
        LinkKind::Internal
    } else {
        LinkKind::External
    }
}

/// Link handler emitting htmx partial-navigation attributes for internal
/// links and new-tab attributes for external ones.
#[derive(Clone, Copy, Debug, Default)]
pub struct HtmxLinks;

impl LinkHandler for HtmxLinks {
    fn link_start(&self, href: &str, title: &str, out: &mut String) {
        let href = escape_html(href);
        write!(out, r#"<a href="{href}""#).unwrap();

        match classify_link(&href) {
            LinkKind::Internal => write!(
                out,
                r#" hx-get="{href}" hx-target="{MAIN_CONTENT_TARGET}" hx-push-url="true" hx-swap="innerHTML show:window:top""#
            )
            .unwrap(),
            LinkKind::External => out.push_str(r#" target="_blank" rel="noopener noreferrer""#),
        }

        if !title.is_empty() {
            write!(out, r#" title="{}""#, escape_html(title)).unwrap();
        }
        out.push('>');
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_internal_routes() {
        assert_eq!(classify_link("/posts/my-note"), LinkKind::Internal);
        assert_eq!(classify_link("/"), LinkKind::Internal);
        assert_eq!(classify_link("/posts/guide/intro#setup"), LinkKind::Internal);
    }

    #[test]
    fn test_dot_in_last_segment_is_external() {
        assert_eq!(classify_link("/image.png"), LinkKind::External);
        assert_eq!(classify_link("/static/report.pdf"), LinkKind::External);
        assert_eq!(classify_link("/posts/v1.2"), LinkKind::External);
    }

    #[test]
    fn test_dot_in_earlier_segment_is_internal() {
        assert_eq!(classify_link("/v1.2/notes"), LinkKind::Internal);
    }

    #[test]
    fn test_external_targets() {
        assert_eq!(classify_link("https://example.com"), LinkKind::External);
        assert_eq!(classify_link("//cdn.example.com/lib"), LinkKind::External);
        assert_eq!(classify_link("mailto:me@example.com"), LinkKind::External);
        assert_eq!(classify_link("relative/page"), LinkKind::External);
        assert_eq!(classify_link("#section"), LinkKind::External);
    }

    #[test]
    fn test_internal_link_markup() {
        let mut out = String::new();
        HtmxLinks.link_start("/posts/a", "", &mut out);
        assert_eq!(
            out,
            r##"<a href="/posts/a" hx-get="/posts/a" hx-target="#main-content" hx-push-url="true" hx-swap="innerHTML show:window:top">"##
        );
    }

    #[test]
    fn test_external_link_markup_with_title() {
        let mut out = String::new();
        HtmxLinks.link_start("https://example.com/?a=1&b=2", "Example", &mut out);
        assert_eq!(
            out,
            r#"<a href="https://example.com/?a=1&amp;b=2" target="_blank" rel="noopener noreferrer" title="Example">"#
        );
    }
}
