//! Default HTML output for elements without a dedicated handler.

use std::fmt::Write;

use crate::handler::ImageHandler;
use crate::state::escape_html;

/// Image source prefixes that are never rewritten.
const ABSOLUTE_SOURCE_PREFIXES: [&str; 6] =
    ["http://", "https://", "/", "attachment:", "blob:", "data:"];

pub(crate) fn code_block(lang: Option<&str>, content: &str, out: &mut String) {
    if let Some(lang) = lang {
        write!(
            out,
            r#"<pre><code class="language-{}">{}</code></pre>"#,
            escape_html(lang),
            escape_html(content)
        )
        .unwrap();
    } else {
        write!(out, "<pre><code>{}</code></pre>", escape_html(content)).unwrap();
    }
}

pub(crate) fn hard_break(out: &mut String) {
    out.push_str("<br>");
}

pub(crate) fn horizontal_rule(out: &mut String) {
    out.push_str("<hr>");
}

pub(crate) fn task_list_marker(checked: bool, out: &mut String) {
    if checked {
        out.push_str(r#"<input type="checkbox" checked disabled> "#);
    } else {
        out.push_str(r#"<input type="checkbox" disabled> "#);
    }
}

/// Image handler that prefixes relative sources with an image directory.
///
/// Sources starting with a scheme (`http://`, `data:`, ...) or `/` are kept.
#[derive(Clone, Debug, Default)]
pub struct HtmlImages {
    image_dir: Option<String>,
}

impl HtmlImages {
    #[must_use]
    pub fn new(image_dir: Option<String>) -> Self {
        Self { image_dir }
    }

    /// Resolve the final `src` for an image.
    #[must_use]
    pub fn resolve_src(&self, src: &str) -> String {
        match &self.image_dir {
            Some(dir)
                if !dir.is_empty()
                    && !ABSOLUTE_SOURCE_PREFIXES
                        .iter()
                        .any(|prefix| src.starts_with(prefix)) =>
            {
                format!("{}/{src}", dir.trim_end_matches('/'))
            }
            _ => src.to_owned(),
        }
    }
}

impl ImageHandler for HtmlImages {
    fn image(&self, src: &str, alt: &str, title: &str, out: &mut String) {
        let title_attr = if title.is_empty() {
            String::new()
        } else {
            format!(r#" title="{}""#, escape_html(title))
        };
        write!(
            out,
            r#"<img src="{}"{title_attr} alt="{}">"#,
            escape_html(&self.resolve_src(src)),
            escape_html(alt)
        )
        .unwrap();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_block_with_language() {
        let mut out = String::new();
        code_block(Some("rust"), "fn main() {}", &mut out);
        assert_eq!(
            out,
            r#"<pre><code class="language-rust">fn main() {}</code></pre>"#
        );
    }

    #[test]
    fn test_code_block_escapes_content() {
        let mut out = String::new();
        code_block(None, "<b>&</b>", &mut out);
        assert_eq!(out, "<pre><code>&lt;b&gt;&amp;&lt;/b&gt;</code></pre>");
    }

    #[test]
    fn test_relative_image_gets_prefix() {
        let images = HtmlImages::new(Some("/static/images/".to_owned()));
        assert_eq!(images.resolve_src("cat.png"), "/static/images/cat.png");
        assert_eq!(images.resolve_src("sub/cat.png"), "/static/images/sub/cat.png");
    }

    #[test]
    fn test_absolute_image_sources_kept() {
        let images = HtmlImages::new(Some("/static/images".to_owned()));
        for src in [
            "http://example.com/a.png",
            "https://example.com/a.png",
            "/media/a.png",
            "attachment:a.png",
            "blob:abc",
            "data:image/png;base64,AAAA",
        ] {
            assert_eq!(images.resolve_src(src), src);
        }
    }

    #[test]
    fn test_no_image_dir() {
        let images = HtmlImages::default();
        assert_eq!(images.resolve_src("cat.png"), "cat.png");
    }

    #[test]
    fn test_image_markup() {
        let images = HtmlImages::new(Some("/img".to_owned()));
        let mut out = String::new();
        images.image("a.png", "An \"A\"", "Title", &mut out);
        assert_eq!(
            out,
            r#"<img src="/img/a.png" title="Title" alt="An &quot;A&quot;">"#
        );
    }
}
