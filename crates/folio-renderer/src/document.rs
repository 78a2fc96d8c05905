//! Full document pipeline.
//!
//! Footnote definitions are extracted first and tab directives replaced by
//! placeholders next; the body is then rendered with sidenotes, diagrams
//! and tab groups wired in. Tab panels and footnote definitions go through
//! the same pipeline one level deeper.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::diagram::DiagramProcessor;
use crate::footnotes::{FootnoteTable, Sidenotes, extract_footnotes};
use crate::html::HtmlImages;
use crate::renderer::{MarkdownRenderer, RenderResult};
use crate::state::escape_html;
use crate::tabs::{TabsPreprocessor, TabsProcessor};
use crate::toc::extract_toc;

/// Default prefix for relative image sources.
pub const DEFAULT_IMAGE_DIR: &str = "/static/images";
/// Default fence language rendered as a diagram.
pub const DEFAULT_DIAGRAM_LANGUAGE: &str = "mermaid";
/// Default limit for nested renders (tab panels, footnote definitions).
pub const DEFAULT_MAX_DEPTH: usize = 8;

/// Options for [`render_document`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderOptions {
    /// Prefix for relative image sources; `None` keeps sources as written.
    pub image_dir: Option<String>,
    /// Fence language rendered as a diagram.
    pub diagram_language: String,
    /// Nesting depth at which nested content is no longer rendered.
    pub max_depth: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            image_dir: Some(DEFAULT_IMAGE_DIR.to_owned()),
            diagram_language: DEFAULT_DIAGRAM_LANGUAGE.to_owned(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Render a document body to HTML.
///
/// The TOC is extracted from `body` independently of rendering; its anchors
/// match the heading ids in the HTML. Malformed directives, diagram headers
/// and footnote labels degrade to visible output and are listed in
/// [`RenderResult::warnings`].
///
/// # Example
///
/// ```
/// use folio_renderer::{RenderOptions, render_document};
///
/// let result = render_document(
///     "## Intro\n\nA claim[^1].\n\n[^1]: The source.\n",
///     &RenderOptions::default(),
/// );
///
/// assert!(result.html.contains(r#"<h2 id="intro">Intro</h2>"#));
/// assert!(result.html.contains(r#"class="sidenote">The source.</span>"#));
/// assert_eq!(result.toc[0].id, "intro");
/// ```
#[must_use]
pub fn render_document(body: &str, options: &RenderOptions) -> RenderResult {
    let (stripped, footnotes) = extract_footnotes(body);
    let ctx = RenderContext::new(options.clone(), footnotes);
    let html = ctx.render(&stripped);

    RenderResult {
        html,
        toc: extract_toc(body),
        warnings: ctx.warnings.take(),
    }
}

/// State shared by one top-level render and all of its nested renders.
#[derive(Clone)]
struct RenderContext {
    options: Rc<RenderOptions>,
    footnotes: Option<Rc<FootnoteTable>>,
    /// Sidenote numbering, continued across tab panels.
    counter: Rc<Cell<usize>>,
    warnings: Rc<RefCell<Vec<String>>>,
    depth: usize,
}

impl RenderContext {
    fn new(options: RenderOptions, footnotes: FootnoteTable) -> Self {
        Self {
            options: Rc::new(options),
            footnotes: Some(Rc::new(footnotes)),
            counter: Rc::default(),
            warnings: Rc::default(),
            depth: 0,
        }
    }

    /// Context for content one level deeper, or `None` at the depth limit.
    fn descend(&self) -> Option<Self> {
        let depth = self.depth + 1;
        (depth < self.options.max_depth).then(|| Self {
            depth,
            ..self.clone()
        })
    }

    /// Context whose renders leave footnote references literal.
    fn without_footnotes(&self) -> Self {
        Self {
            footnotes: None,
            ..self.clone()
        }
    }

    fn warn(&self, message: String) {
        self.warnings.borrow_mut().push(message);
    }

    fn render(&self, markdown: &str) -> String {
        let mut tabs = TabsPreprocessor::new();
        let body = tabs.process(markdown);
        self.warnings
            .borrow_mut()
            .extend(tabs.warnings().iter().cloned());

        let panels = self.clone();
        let mut renderer = MarkdownRenderer::new()
            .with_image_handler(HtmlImages::new(self.options.image_dir.clone()))
            .with_processor(DiagramProcessor::new(self.options.diagram_language.clone()))
            .with_processor(TabsProcessor::new(tabs.into_groups(), move |content| {
                panels.render_panel(content)
            }));

        if let Some(table) = &self.footnotes {
            let definitions = self.without_footnotes();
            renderer = renderer.with_footnote_handler(Sidenotes::new(
                Rc::clone(table),
                Rc::clone(&self.counter),
                move |text| definitions.render_definition(text),
            ));
        }

        let result = renderer.render_markdown(&body);
        self.warnings.borrow_mut().extend(result.warnings);
        result.html
    }

    fn render_panel(&self, content: &str) -> String {
        match self.descend() {
            Some(child) => child.render(content),
            None => {
                self.warn(format!(
                    "tab content nested deeper than {} levels rendered literally",
                    self.options.max_depth
                ));
                format!(r#"<pre class="literal">{}</pre>"#, escape_html(content))
            }
        }
    }

    fn render_definition(&self, text: &str) -> String {
        match self.descend() {
            Some(child) => child.render(text),
            None => escape_html(text),
        }
    }
}
