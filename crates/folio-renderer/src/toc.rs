//! Table of contents derived directly from markdown source.
//!
//! Scans ATX heading lines outside fenced code without rendering the
//! document. Anchors come from the same plain text and slug function the
//! renderer uses, so every entry links to a heading `id` in the rendered page.
//! Reference links in a heading resolve against the definitions of the whole
//! body, as they do when the page is rendered.

use pulldown_cmark::{BrokenLink, CowStr, Event, Parser, RefDefs, Tag, TagEnd};

use crate::fence::FenceTracker;
use crate::renderer::parser_options;
use crate::slug::anchor_slug;
use crate::state::TocEntry;

/// Extract TOC entries (levels 1 to 6) in document order.
///
/// # Examples
///
/// ```
/// use folio_renderer::extract_toc;
///
/// let toc = extract_toc("# Intro\n\n```\n# not a heading\n```\n\n## Setup `cargo`\n");
/// assert_eq!(toc.len(), 2);
/// assert_eq!(toc[1].title, "Setup cargo");
/// assert_eq!(toc[1].id, "setup-cargo");
/// ```
#[must_use]
pub fn extract_toc(body: &str) -> Vec<TocEntry> {
    let definitions = Parser::new_ext(body, parser_options());
    let references = definitions.reference_definitions();
    let mut fence = FenceTracker::new();

    body.lines()
        .filter(|line| !fence.is_code_line(line))
        .filter_map(|line| {
            let level = heading_level(line)?;
            let title = plain_text(line, references);
            if title.is_empty() {
                return None;
            }
            Some(TocEntry {
                level,
                id: anchor_slug(&title),
                title,
            })
        })
        .collect()
}

/// Level of an ATX heading line: 1 to 6 `#` then whitespace then text.
fn heading_level(line: &str) -> Option<u8> {
    let hashes = line.bytes().take_while(|&b| b == b'#').count();
    if !(1..=6).contains(&hashes) {
        return None;
    }
    let rest = &line[hashes..];
    let starts_with_space = rest.starts_with(|c: char| c.is_whitespace());
    (starts_with_space && !rest.trim().is_empty()).then(|| u8::try_from(hashes).unwrap_or(6))
}

/// Plain text of a heading line with inline markup removed.
///
/// `[^label]` is left as text: footnote definitions are stripped before
/// rendering, so those never become links.
fn plain_text<'a>(line: &'a str, references: &RefDefs<'a>) -> String {
    let mut text = String::new();
    let mut in_heading = false;
    let mut image_depth = 0usize;

    let resolve = |link: BrokenLink<'a>| {
        if link.reference.starts_with('^') {
            return None;
        }
        references.get(&link.reference).map(|def| {
            (
                def.dest.clone(),
                def.title.clone().unwrap_or(CowStr::Borrowed("")),
            )
        })
    };

    for event in Parser::new_with_broken_link_callback(line, parser_options(), Some(resolve)) {
        match event {
            Event::Start(Tag::Heading { .. }) => in_heading = true,
            Event::End(TagEnd::Heading(_)) => in_heading = false,
            Event::Start(Tag::Image { .. }) => image_depth += 1,
            Event::End(TagEnd::Image) => image_depth = image_depth.saturating_sub(1),
            Event::Text(t) | Event::Code(t) | Event::InlineMath(t) | Event::DisplayMath(t)
                if in_heading && image_depth == 0 =>
            {
                text.push_str(&t);
            }
            Event::SoftBreak if in_heading => text.push(' '),
            _ => {}
        }
    }

    text.trim().to_owned()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn entry(level: u8, title: &str, id: &str) -> TocEntry {
        TocEntry {
            level,
            title: title.to_owned(),
            id: id.to_owned(),
        }
    }

    #[test]
    fn test_extract_levels_in_order() {
        let toc = extract_toc("# One\ntext\n## Two\n### Three\n###### Six\n");
        assert_eq!(
            toc,
            vec![
                entry(1, "One", "one"),
                entry(2, "Two", "two"),
                entry(3, "Three", "three"),
                entry(6, "Six", "six"),
            ]
        );
    }

    #[test]
    fn test_headings_in_fences_skipped() {
        let toc = extract_toc("~~~\n# hidden\n~~~\n````md\n```\n# hidden\n```\n````\n# Shown\n");
        assert_eq!(toc, vec![entry(1, "Shown", "shown")]);
    }

    #[test]
    fn test_not_headings() {
        let toc = extract_toc("#NoSpace\n####### seven\n#\n#   \n  # indented\n");
        assert!(toc.is_empty());
    }

    #[test]
    fn test_inline_markup_stripped() {
        let toc = extract_toc("## **Bold** and [link](/x) and `code`\n");
        assert_eq!(toc, vec![entry(2, "Bold and link and code", "bold-and-link-and-code")]);
    }

    #[test]
    fn test_closing_hashes_removed() {
        let toc = extract_toc("## Title ##\n");
        assert_eq!(toc, vec![entry(2, "Title", "title")]);
    }

    #[test]
    fn test_image_only_heading_skipped() {
        let toc = extract_toc("## ![logo](a.png)\n## Real\n");
        assert_eq!(toc, vec![entry(2, "Real", "real")]);
    }

    #[test]
    fn test_full_reference_link_resolved() {
        let toc = extract_toc("[ref]: /posts/docs\n\n## See [the docs][ref]\n");
        assert_eq!(toc, vec![entry(2, "See the docs", "see-the-docs")]);
    }

    #[test]
    fn test_collapsed_and_shortcut_references_resolved() {
        let toc = extract_toc("## Read [Guide][] and [FAQ]\n\n[guide]: /g\n[faq]: /f \"Questions\"\n");
        assert_eq!(toc, vec![entry(2, "Read Guide and FAQ", "read-guide-and-faq")]);
    }

    #[test]
    fn test_undefined_reference_stays_literal() {
        let toc = extract_toc("## See [the docs][nowhere]\n");
        assert_eq!(toc[0].title, "See [the docs][nowhere]");
    }

    #[test]
    fn test_footnote_label_not_resolved_as_link() {
        let toc = extract_toc("## Title[^n]\n\n[^n]: Note\n");
        assert_eq!(toc, vec![entry(2, "Title[^n]", "titlen")]);
    }

    #[test]
    fn test_inline_math_kept_as_source() {
        let toc = extract_toc("## Area $a_1 * b_1$\n");
        assert_eq!(toc[0].title, "Area a_1 * b_1");
    }

    #[test]
    fn test_duplicate_titles_share_anchor() {
        let toc = extract_toc("## Notes\n## Notes\n");
        assert_eq!(toc[0].id, toc[1].id);
    }
}
