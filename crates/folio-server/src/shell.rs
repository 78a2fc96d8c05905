//! HTML page shell.
//!
//! Wraps rendered fragments in the full page layout (navbar, navigation
//! sidebar, main content, TOC sidebar) or, for htmx requests, in the
//! partial response that swaps `main#main-content` and the TOC sidebar.

use std::fmt::Write;

use folio_renderer::{MAIN_CONTENT_TARGET, TocEntry, escape_html};
use folio_site::{NavNode, Page};

const HTMX_SCRIPT: &str = "https://unpkg.com/htmx.org@2.0.4";
const HYPERSCRIPT_SCRIPT: &str = "https://unpkg.com/hyperscript.org@0.9.12";
const MERMAID_MODULE: &str = "https://cdn.jsdelivr.net/npm/mermaid@11/dist/mermaid.esm.min.mjs";
const KATEX_STYLESHEET: &str = "https://cdn.jsdelivr.net/npm/katex@0.16.11/dist/katex.min.css";
const KATEX_SCRIPT: &str = "https://cdn.jsdelivr.net/npm/katex@0.16.11/dist/katex.min.js";
const KATEX_AUTO_RENDER: &str =
    "https://cdn.jsdelivr.net/npm/katex@0.16.11/dist/contrib/auto-render.min.js";
const HIGHLIGHT_SCRIPT: &str =
    "https://cdn.jsdelivr.net/npm/@highlightjs/cdn-assets@11.9.0/highlight.min.js";
const HIGHLIGHT_LIGHT_THEME: &str =
    "https://cdn.jsdelivr.net/npm/@highlightjs/cdn-assets@11.9.0/styles/github.min.css";
const HIGHLIGHT_DARK_THEME: &str =
    "https://cdn.jsdelivr.net/npm/@highlightjs/cdn-assets@11.9.0/styles/github-dark.min.css";

/// Swap used by navigation links; replaces the whole main element.
const NAV_SWAP: &str = "outerHTML show:window:top settle:0.1s";

/// Client-side helpers referenced by tab buttons, diagram controls and the
/// theme toggle. Math and code highlighting rerun after every htmx swap.
const SCRIPT: &str = r#"
function switchTab(tabsId, index) {
  document.querySelectorAll('.tabs-container[data-tabs-id="' + tabsId + '"]').forEach(function (container) {
    container.querySelectorAll(':scope > .tabs-header > .tab-button').forEach(function (button, i) {
      button.classList.toggle('active', i === index);
      button.setAttribute('aria-selected', i === index ? 'true' : 'false');
    });
    container.querySelectorAll(':scope > .tabs-content > .tab-panel').forEach(function (panel, i) {
      panel.classList.toggle('active', i === index);
      panel.hidden = i !== index;
    });
  });
}
function mermaidScale(id) {
  var wrapper = document.getElementById(id);
  return wrapper && wrapper.dataset.scale ? parseFloat(wrapper.dataset.scale) : 1;
}
function setMermaidScale(id, scale) {
  var wrapper = document.getElementById(id);
  var svg = wrapper && wrapper.querySelector('svg');
  if (!svg) return;
  wrapper.dataset.scale = scale;
  svg.style.transformOrigin = 'top left';
  svg.style.transform = 'scale(' + scale + ')';
}
function resetMermaidZoom(id) { setMermaidScale(id, 1); }
function zoomMermaidIn(id) { setMermaidScale(id, Math.min(mermaidScale(id) * 1.25, 5)); }
function zoomMermaidOut(id) { setMermaidScale(id, Math.max(mermaidScale(id) / 1.25, 0.2)); }
function renderMath() {
  if (!window.renderMathInElement) return;
  document.querySelectorAll('.math').forEach(function (el) {
    renderMathInElement(el, {
      delimiters: [
        { left: '$$', right: '$$', display: true },
        { left: '$', right: '$', display: false }
      ],
      throwOnError: false
    });
  });
}
function highlightCode() {
  if (!window.hljs) return;
  document.querySelectorAll('pre code[class^="language-"]:not(.hljs)').forEach(function (block) {
    hljs.highlightElement(block);
  });
}
function applyTheme(dark) {
  document.documentElement.classList.toggle('dark', dark);
  var light = document.getElementById('hljs-light');
  var night = document.getElementById('hljs-dark');
  if (light) light.disabled = dark;
  if (night) night.disabled = !dark;
}
function toggleTheme() {
  var dark = !document.documentElement.classList.contains('dark');
  localStorage.setItem('folio-theme', dark ? 'dark' : 'light');
  applyTheme(dark);
}
(function () {
  var stored = localStorage.getItem('folio-theme');
  applyTheme(stored ? stored === 'dark' : window.matchMedia('(prefers-color-scheme: dark)').matches);
})();
document.addEventListener('DOMContentLoaded', function () {
  renderMath();
  highlightCode();
  document.body.addEventListener('htmx:afterSettle', function () {
    renderMath();
    highlightCode();
  });
});
"#;

const STYLE: &str = r"
body { margin: 0; font-family: system-ui, sans-serif; line-height: 1.6; color: #1f2328; }
.navbar { display: flex; align-items: center; justify-content: space-between; padding: 0.75rem 1.5rem; border-bottom: 1px solid #d0d7de; }
.theme-toggle { border: 1px solid #d0d7de; border-radius: 6px; background: none; color: inherit; cursor: pointer; padding: 0.2rem 0.5rem; }
.site-title { font-weight: 600; font-size: 1.25rem; color: inherit; text-decoration: none; }
.layout { display: flex; gap: 2rem; padding: 1.5rem; }
.posts-sidebar, .toc-sidebar { flex: 0 0 14rem; font-size: 0.9rem; }
.posts-sidebar ul, .toc-sidebar ul { list-style: none; padding-left: 1rem; margin: 0; }
.content { flex: 1 1 auto; min-width: 0; max-width: 48rem; }
.footer { padding: 1rem 1.5rem; border-top: 1px solid #d0d7de; font-size: 0.85rem; color: #656d76; }
.hidden { display: none; }
.ml-0 { margin-left: 0; } .ml-3 { margin-left: 0.75rem; } .ml-6 { margin-left: 1.5rem; }
.ml-9 { margin-left: 2.25rem; } .ml-12 { margin-left: 3rem; } .ml-15 { margin-left: 3.75rem; }
.sidenote-ref { cursor: pointer; font-size: 0.75em; vertical-align: super; color: #0969da; }
.sidenote-ref.open { font-weight: 600; }
.sidenote { display: none; font-size: 0.85rem; color: #656d76; }
.sidenote.show { display: block; margin: 0.5rem 0; padding-left: 0.75rem; border-left: 2px solid #d0d7de; }
.sidenote.highlight { background: #fff8c5; }
@media (min-width: 1280px) {
  .content { position: relative; }
  .sidenote { display: block; float: right; clear: right; width: 14rem; margin-right: -16rem; }
}
.tabs-header { display: flex; gap: 0.25rem; border-bottom: 1px solid #d0d7de; }
.tab-button { border: none; background: none; padding: 0.4rem 0.8rem; cursor: pointer; }
.tab-button.active { border-bottom: 2px solid #0969da; font-weight: 600; }
.tab-panel { padding: 0.75rem 0; }
.mermaid-container { margin: 1rem 0; }
.mermaid-controls { display: flex; gap: 0.25rem; justify-content: flex-end; }
.mermaid-wrapper { overflow: auto; border: 1px solid #d0d7de; }
pre.literal { white-space: pre-wrap; }
.math-display { display: block; margin: 1rem 0; overflow-x: auto; }
html.dark body { background: #0d1117; color: #e6edf3; }
html.dark .navbar, html.dark .footer, html.dark .tabs-header, html.dark .mermaid-wrapper { border-color: #30363d; }
html.dark a, html.dark .sidenote-ref { color: #58a6ff; }
html.dark .sidenote, html.dark .footer { color: #8b949e; }
html.dark .sidenote.highlight { background: #3d2f00; }
";

/// Page content placed inside the shell.
#[derive(Debug)]
pub(crate) struct ShellPage {
    /// Title shown in the browser tab, before the site title.
    pub(crate) title: String,
    /// Inner HTML of `main#main-content`.
    pub(crate) main: String,
    pub(crate) toc: Vec<TocEntry>,
}

impl ShellPage {
    /// Rendered document: `<h1>` title followed by the fragment.
    pub(crate) fn document(page: Page) -> Self {
        let mut main = String::with_capacity(page.html.len() + page.title.len() + 32);
        write!(main, r#"<h1 class="page-title">{}</h1>"#, escape_html(&page.title)).unwrap();
        main.push_str(&page.html);

        Self {
            title: page.title,
            main,
            toc: page.toc,
        }
    }

    /// Welcome page shown when the root has no home document.
    pub(crate) fn welcome(site_title: &str) -> Self {
        let main = format!(
            "<h1 class=\"page-title\">Welcome to {}!</h1>\
             <p>Your personal document site.</p>\
             <p>Browse the documents in the sidebar, or create an <code>index.md</code> \
             or <code>README.md</code> file in the root directory to customize this page.</p>",
            escape_html(site_title)
        );

        Self {
            title: "Home".to_owned(),
            main,
            toc: Vec::new(),
        }
    }

    pub(crate) fn not_found(path: &str) -> Self {
        let main = format!(
            "<h1 class=\"page-title\">Page Not Found</h1>\
             <p>No document exists at <code>{}</code>.</p>",
            escape_html(path)
        );

        Self {
            title: "Not Found".to_owned(),
            main,
            toc: Vec::new(),
        }
    }
}

/// Render a complete HTML document.
pub(crate) fn full_page(page: &ShellPage, site_title: &str, nav: &[NavNode]) -> String {
    let site_title = escape_html(site_title);
    let mut html = String::with_capacity(page.main.len() + SCRIPT.len() + STYLE.len() + 4096);

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    write_title(&mut html, &page.title, &site_title);
    write!(html, "\n<script src=\"{HTMX_SCRIPT}\"></script>").unwrap();
    write!(html, "\n<script src=\"{HYPERSCRIPT_SCRIPT}\"></script>").unwrap();
    write!(html, "\n<link rel=\"stylesheet\" href=\"{KATEX_STYLESHEET}\">").unwrap();
    write!(html, "\n<script defer src=\"{KATEX_SCRIPT}\"></script>").unwrap();
    write!(html, "\n<script defer src=\"{KATEX_AUTO_RENDER}\"></script>").unwrap();
    write!(
        html,
        "\n<link id=\"hljs-light\" rel=\"stylesheet\" href=\"{HIGHLIGHT_LIGHT_THEME}\">"
    )
    .unwrap();
    write!(
        html,
        "\n<link id=\"hljs-dark\" rel=\"stylesheet\" href=\"{HIGHLIGHT_DARK_THEME}\" disabled>"
    )
    .unwrap();
    write!(html, "\n<script defer src=\"{HIGHLIGHT_SCRIPT}\"></script>").unwrap();
    write!(
        html,
        "\n<script type=\"module\">\n\
         import mermaid from \"{MERMAID_MODULE}\";\n\
         mermaid.initialize({{ startOnLoad: false }});\n\
         const renderDiagrams = () => mermaid.run({{ querySelector: \"pre.mermaid:not([data-processed])\" }});\n\
         renderDiagrams();\n\
         document.body.addEventListener(\"htmx:afterSettle\", renderDiagrams);\n\
         </script>"
    )
    .unwrap();
    write!(html, "\n<script>{SCRIPT}</script>").unwrap();
    write!(html, "\n<style>{STYLE}</style>").unwrap();
    html.push_str("\n</head>\n<body>\n");

    write!(
        html,
        r#"<nav class="navbar"><a href="/" class="site-title">{site_title}</a><button id="theme-toggle" class="theme-toggle" type="button" onclick="toggleTheme()" aria-label="Toggle dark mode">&#9680;</button></nav>"#
    )
    .unwrap();
    html.push_str("\n<div class=\"layout\">\n");
    html.push_str(
        r#"<aside id="posts-sidebar" class="posts-sidebar"><details open><summary>Posts</summary>"#,
    );
    write_nav(&mut html, nav);
    html.push_str("</details></aside>\n");
    write_main(&mut html, page);
    html.push('\n');
    write_toc(&mut html, &page.toc, false);
    html.push_str("\n</div>\n");
    html.push_str("<footer class=\"footer\">Powered by folio</footer>\n</body>\n</html>\n");
    html
}

/// Render the htmx partial: title, main content and out-of-band TOC.
pub(crate) fn partial_page(page: &ShellPage, site_title: &str) -> String {
    let mut html = String::with_capacity(page.main.len() + 1024);
    write_title(&mut html, &page.title, &escape_html(site_title));
    html.push('\n');
    write_main(&mut html, page);
    html.push('\n');
    write_toc(&mut html, &page.toc, true);
    html
}

fn write_title(html: &mut String, title: &str, escaped_site_title: &str) {
    write!(
        html,
        "<title>{} - {escaped_site_title}</title>",
        escape_html(title)
    )
    .unwrap();
}

fn write_main(html: &mut String, page: &ShellPage) {
    write!(
        html,
        r#"<main id="{}" class="content">{}</main>"#,
        MAIN_CONTENT_TARGET.trim_start_matches('#'),
        page.main
    )
    .unwrap();
}

fn write_nav(html: &mut String, nodes: &[NavNode]) {
    html.push_str(r#"<ul class="nav-list">"#);
    for node in nodes {
        match node {
            NavNode::Folder {
                title, children, ..
            } => {
                write!(
                    html,
                    "<li class=\"nav-folder\"><details><summary>{}</summary>",
                    escape_html(title)
                )
                .unwrap();
                write_nav(html, children);
                html.push_str("</details></li>");
            }
            NavNode::Document { title, route, .. } => {
                let route = escape_html(route);
                write!(
                    html,
                    r#"<li class="nav-document"><a href="{route}" hx-get="{route}" hx-target="{MAIN_CONTENT_TARGET}" hx-push-url="true" hx-swap="{NAV_SWAP}">{}</a></li>"#,
                    escape_html(title)
                )
                .unwrap();
            }
        }
    }
    html.push_str("</ul>");
}

fn write_toc(html: &mut String, toc: &[TocEntry], out_of_band: bool) {
    html.push_str(r#"<aside id="toc-sidebar" class="toc-sidebar""#);
    if out_of_band {
        html.push_str(r#" hx-swap-oob="true""#);
    }
    html.push_str(r#"><h2 class="toc-title">Contents</h2>"#);

    if toc.is_empty() {
        html.push_str(r#"<p class="toc-empty">No headings found</p>"#);
    } else {
        html.push_str("<ul>");
        for entry in toc {
            let indent = usize::from(entry.level.saturating_sub(1)) * 3;
            write!(
                html,
                r##"<li class="toc-item ml-{indent}"><a href="#{}">{}</a></li>"##,
                escape_html(&entry.id),
                escape_html(&entry.title)
            )
            .unwrap();
        }
        html.push_str("</ul>");
    }
    html.push_str("</aside>");
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn toc(level: u8, title: &str, id: &str) -> TocEntry {
        TocEntry {
            level,
            title: title.to_owned(),
            id: id.to_owned(),
        }
    }

    fn page() -> ShellPage {
        ShellPage {
            title: "Rust <Tips>".to_owned(),
            main: "<p>Body</p>".to_owned(),
            toc: vec![toc(2, "Ownership", "ownership"), toc(3, "Borrowing", "borrowing")],
        }
    }

    #[test]
    fn test_full_page_layout() {
        let nav = vec![NavNode::Folder {
            name: "notes".to_owned(),
            title: "Notes".to_owned(),
            children: vec![NavNode::Document {
                name: "rust.md".to_owned(),
                title: "Rust".to_owned(),
                route: "/posts/notes/rust".to_owned(),
            }],
        }];

        let html = full_page(&page(), "My & Notes", &nav);

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Rust &lt;Tips&gt; - My &amp; Notes</title>"));
        assert!(html.contains(r#"<a href="/" class="site-title">My &amp; Notes</a>"#));
        assert!(html.contains(r#"<li class="nav-folder"><details><summary>Notes</summary>"#));
        assert!(html.contains(
            r##"<a href="/posts/notes/rust" hx-get="/posts/notes/rust" hx-target="#main-content" hx-push-url="true" hx-swap="outerHTML show:window:top settle:0.1s">Rust</a>"##
        ));
        assert!(html.contains(r#"<main id="main-content" class="content"><p>Body</p></main>"#));
        assert!(html.contains(r#"<aside id="toc-sidebar" class="toc-sidebar"><h2"#));
        for function in [
            "switchTab",
            "resetMermaidZoom",
            "zoomMermaidIn",
            "zoomMermaidOut",
            "renderMath",
            "highlightCode",
            "toggleTheme",
        ] {
            assert!(html.contains(&format!("function {function}(")), "{function} missing");
        }
        assert!(html.contains(r#"onclick="toggleTheme()""#));
        assert!(html.contains("htmx:afterSettle"));
        assert!(html.contains("Powered by folio"));
    }

    #[test]
    fn test_full_page_loads_math_and_highlighting() {
        let html = full_page(&page(), "Site", &[]);

        for url in [
            KATEX_STYLESHEET,
            KATEX_SCRIPT,
            KATEX_AUTO_RENDER,
            HIGHLIGHT_SCRIPT,
            HIGHLIGHT_LIGHT_THEME,
            HIGHLIGHT_DARK_THEME,
        ] {
            assert!(html.contains(url), "{url} missing");
        }
        // Both are deferred, so they run before DOMContentLoaded fires.
        assert!(html.contains(&format!(r#"<script defer src="{KATEX_AUTO_RENDER}">"#)));
        assert!(html.contains(&format!(r#"<script defer src="{HIGHLIGHT_SCRIPT}">"#)));
    }

    #[test]
    fn test_sidenote_classes_are_styled() {
        let result = folio_renderer::render_document(
            "Claim[^1].\n\n[^1]: Source.\n",
            &folio_renderer::RenderOptions::default(),
        );
        let script = result
            .html
            .split(r#"_=""#)
            .nth(1)
            .and_then(|rest| rest.split('"').next())
            .unwrap();

        let words: Vec<&str> = script.split_whitespace().collect();
        let classes: Vec<&str> = words
            .windows(2)
            .filter(|pair| matches!(pair[0], "add" | "remove" | "toggle"))
            .filter_map(|pair| pair[1].strip_prefix('.'))
            .collect();

        assert!(classes.contains(&"highlight"));
        for class in classes {
            assert!(
                STYLE.contains(&format!(".{class} ")),
                ".{class} toggled by sidenotes but not styled"
            );
        }
    }

    #[test]
    fn test_partial_page() {
        let html = partial_page(&page(), "Site");

        assert_eq!(
            html,
            "<title>Rust &lt;Tips&gt; - Site</title>\n\
             <main id=\"main-content\" class=\"content\"><p>Body</p></main>\n\
             <aside id=\"toc-sidebar\" class=\"toc-sidebar\" hx-swap-oob=\"true\">\
             <h2 class=\"toc-title\">Contents</h2><ul>\
             <li class=\"toc-item ml-3\"><a href=\"#ownership\">Ownership</a></li>\
             <li class=\"toc-item ml-6\"><a href=\"#borrowing\">Borrowing</a></li>\
             </ul></aside>"
        );
    }

    #[test]
    fn test_empty_toc() {
        let mut html = String::new();
        write_toc(&mut html, &[], false);
        assert!(html.contains("No headings found"));
        assert!(!html.contains("<ul>"));
    }

    #[test]
    fn test_document_page_has_heading() {
        let page = ShellPage::document(Page {
            title: "A & B".to_owned(),
            path: "a".to_owned(),
            html: "<p>x</p>".to_owned(),
            toc: Vec::new(),
            metadata: folio_site::Metadata::default(),
            warnings: Vec::new(),
        });
        assert_eq!(page.main, r#"<h1 class="page-title">A &amp; B</h1><p>x</p>"#);
        assert_eq!(page.title, "A & B");
    }

    #[test]
    fn test_welcome_page() {
        let page = ShellPage::welcome("Notes");
        assert_eq!(page.title, "Home");
        assert!(page.main.contains("Welcome to Notes!"));
        assert!(page.main.contains("index.md"));
        assert!(page.main.contains("README.md"));
    }
}
