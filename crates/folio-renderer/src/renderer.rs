//! Markdown renderer with a pluggable handler table.

use std::fmt::Write;

use pulldown_cmark::{
    CodeBlockKind, Event, HeadingLevel, LinkType, Options, Parser, Tag, TagEnd, TextMergeStream,
};

use crate::code_block::{CodeBlockProcessor, ProcessResult, fence_language};
use crate::footnotes::find_reference;
use crate::handler::{AnchoredHeadings, FootnoteHandler, HeadingHandler, ImageHandler, LinkHandler};
use crate::html::{self, HtmlImages};
use crate::link::HtmxLinks;
use crate::state::{CodeBlockState, HeadingState, ImageState, TableState, TocEntry, escape_html};

/// Result of rendering markdown.
#[derive(Clone, Debug, Default)]
pub struct RenderResult {
    /// Rendered HTML fragment.
    pub html: String,
    /// Table of contents entries for the rendered headings.
    pub toc: Vec<TocEntry>,
    /// Warnings generated during rendering (e.g., malformed directives).
    pub warnings: Vec<String>,
}

/// Parser options shared by the renderer and the TOC extractor.
pub(crate) fn parser_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_MATH
}

fn heading_level_to_num(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Markdown renderer.
///
/// Tables, lists and inline formatting are rendered directly. Headings,
/// links, images and footnote references go through the handler registered
/// for them, so callers can change their markup without touching event
/// dispatch.
///
/// # Code Block Processors
///
/// Custom code block processing can be added via [`with_processor`](Self::with_processor).
/// Processors are checked in order; the first returning a non-`PassThrough` result wins.
pub struct MarkdownRenderer {
    output: String,
    code: CodeBlockState,
    table: TableState,
    image: ImageState,
    heading: HeadingState,
    headings: Box<dyn HeadingHandler>,
    links: Box<dyn LinkHandler>,
    images: Box<dyn ImageHandler>,
    footnotes: Option<Box<dyn FootnoteHandler>>,
    processors: Vec<Box<dyn CodeBlockProcessor>>,
}

impl MarkdownRenderer {
    /// Create a renderer with the default handlers.
    ///
    /// Footnote references stay literal until a footnote handler is set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            output: String::with_capacity(4096),
            code: CodeBlockState::default(),
            table: TableState::default(),
            image: ImageState::default(),
            heading: HeadingState::default(),
            headings: Box::new(AnchoredHeadings),
            links: Box::new(HtmxLinks),
            images: Box::new(HtmlImages::default()),
            footnotes: None,
            processors: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_heading_handler(mut self, handler: impl HeadingHandler + 'static) -> Self {
        self.headings = Box::new(handler);
        self
    }

    #[must_use]
    pub fn with_link_handler(mut self, handler: impl LinkHandler + 'static) -> Self {
        self.links = Box::new(handler);
        self
    }

    #[must_use]
    pub fn with_image_handler(mut self, handler: impl ImageHandler + 'static) -> Self {
        self.images = Box::new(handler);
        self
    }

    /// Resolve `[^label]` references in text with `handler`.
    #[must_use]
    pub fn with_footnote_handler(mut self, handler: impl FootnoteHandler + 'static) -> Self {
        self.footnotes = Some(Box::new(handler));
        self
    }

    /// Add a code block processor.
    ///
    /// Processors are checked in order when a code block is encountered.
    /// The first processor returning a non-`PassThrough` result wins.
    #[must_use]
    pub fn with_processor<P: CodeBlockProcessor + 'static>(mut self, processor: P) -> Self {
        self.processors.push(Box::new(processor));
        self
    }

    /// Render markdown text with the standard parser options.
    pub fn render_markdown(&mut self, markdown: &str) -> RenderResult {
        self.render(Parser::new_ext(markdown, parser_options()))
    }

    /// Get all warnings from all processors.
    pub fn processor_warnings(&self) -> impl Iterator<Item = String> + '_ {
        self.processors.iter().flat_map(|p| p.warnings()).cloned()
    }

    /// Push content to output or heading buffer based on context.
    ///
    /// Markup inside image alt text is dropped.
    fn push_inline(&mut self, content: &str) {
        if self.image.is_active() {
            return;
        }
        if self.heading.is_active() {
            self.heading.push_html(content);
        } else {
            self.output.push_str(content);
        }
    }

    /// Render markdown events and return the result.
    ///
    /// Adjacent text events are merged first, so a reference such as
    /// `[^note]` is seen as one piece of text.
    pub fn render<'a, I>(&mut self, events: I) -> RenderResult
    where
        I: Iterator<Item = Event<'a>>,
    {
        for event in TextMergeStream::new(events) {
            self.process_event(event);
        }

        RenderResult {
            html: std::mem::take(&mut self.output),
            toc: self.heading.take_toc(),
            warnings: self.processor_warnings().collect(),
        }
    }

    fn process_event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start_tag(tag),
            Event::End(tag) => self.end_tag(tag),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => self.inline_code(&code),
            Event::Html(html) | Event::InlineHtml(html) => self.push_inline(&html),
            Event::SoftBreak => self.soft_break(),
            Event::HardBreak => {
                let mut out = String::new();
                html::hard_break(&mut out);
                self.push_inline(&out);
            }
            Event::Rule => html::horizontal_rule(&mut self.output),
            Event::TaskListMarker(checked) => html::task_list_marker(checked, &mut self.output),
            Event::InlineMath(math) => self.math(&math, false),
            Event::DisplayMath(math) => self.math(&math, true),
            Event::FootnoteReference(_) => {
                // Footnotes are resolved from text by the footnote handler
            }
        }
    }

    fn start_tag(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => self.output.push_str("<p>"),
            Tag::Heading { level, .. } => {
                // Opening tag is written in end_tag once the anchor is known.
                self.heading.start_heading(heading_level_to_num(level));
            }
            Tag::BlockQuote(_) => self.output.push_str("<blockquote>"),
            Tag::CodeBlock(kind) => {
                let lang = match kind {
                    CodeBlockKind::Fenced(ref info) => fence_language(info).map(str::to_owned),
                    CodeBlockKind::Indented => None,
                };
                self.code.start(lang);
            }
            Tag::List(start) => match start {
                Some(1) => self.output.push_str("<ol>"),
                Some(n) => write!(self.output, r#"<ol start="{n}">"#).unwrap(),
                None => self.output.push_str("<ul>"),
            },
            Tag::Item => self.output.push_str("<li>"),
            Tag::FootnoteDefinition(_) | Tag::HtmlBlock | Tag::MetadataBlock(_) => {}
            Tag::DefinitionList => self.output.push_str("<dl>"),
            Tag::DefinitionListTitle => self.output.push_str("<dt>"),
            Tag::DefinitionListDefinition => self.output.push_str("<dd>"),
            Tag::Table(alignments) => {
                self.table.start(alignments);
                self.output.push_str("<table>");
            }
            Tag::TableHead => {
                self.table.start_head();
                self.output.push_str("<thead><tr>");
            }
            Tag::TableRow => {
                self.table.start_row();
                self.output.push_str("<tr>");
            }
            Tag::TableCell => {
                let align = self.table.current_alignment_style();
                let tag = if self.table.is_in_head() { "th" } else { "td" };
                write!(self.output, "<{tag}{align}>").unwrap();
            }
            Tag::Emphasis => self.push_inline("<em>"),
            Tag::Strong => self.push_inline("<strong>"),
            Tag::Strikethrough => self.push_inline("<s>"),
            Tag::Link {
                link_type,
                dest_url,
                title,
                ..
            } => {
                let mut out = String::new();
                if link_type == LinkType::Email {
                    let href = format!("mailto:{dest_url}");
                    self.links.link_start(&href, &title, &mut out);
                } else {
                    self.links.link_start(&dest_url, &title, &mut out);
                }
                self.push_inline(&out);
            }
            Tag::Image {
                dest_url, title, ..
            } => {
                // Alt text is collected until the end tag
                self.image.start(&dest_url, &title);
            }
            Tag::Superscript => self.push_inline("<sup>"),
            Tag::Subscript => self.push_inline("<sub>"),
        }
    }

    fn end_tag(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => self.output.push_str("</p>"),
            TagEnd::Heading(_level) => {
                if let Some((level, id, html)) = self.heading.complete_heading() {
                    self.headings.heading(level, &id, &html, &mut self.output);
                }
            }
            TagEnd::BlockQuote(_) => self.output.push_str("</blockquote>"),
            TagEnd::CodeBlock => self.end_code_block(),
            TagEnd::List(ordered) => {
                self.output
                    .push_str(if ordered { "</ol>" } else { "</ul>" });
            }
            TagEnd::Item => self.output.push_str("</li>"),
            TagEnd::FootnoteDefinition | TagEnd::HtmlBlock | TagEnd::MetadataBlock(_) => {}
            TagEnd::Image => {
                let (src, alt, title) = self.image.end();
                let mut out = String::new();
                self.images.image(&src, &alt, &title, &mut out);
                self.push_inline(&out);
            }
            TagEnd::DefinitionList => self.output.push_str("</dl>"),
            TagEnd::DefinitionListTitle => self.output.push_str("</dt>"),
            TagEnd::DefinitionListDefinition => self.output.push_str("</dd>"),
            TagEnd::Table => self.output.push_str("</tbody></table>"),
            TagEnd::TableHead => {
                self.output.push_str("</tr></thead><tbody>");
                self.table.end_head();
            }
            TagEnd::TableRow => self.output.push_str("</tr>"),
            TagEnd::TableCell => {
                self.output.push_str(if self.table.is_in_head() {
                    "</th>"
                } else {
                    "</td>"
                });
                self.table.next_cell();
            }
            TagEnd::Emphasis => self.push_inline("</em>"),
            TagEnd::Strong => self.push_inline("</strong>"),
            TagEnd::Strikethrough => self.push_inline("</s>"),
            TagEnd::Link => {
                let mut out = String::new();
                self.links.link_end(&mut out);
                self.push_inline(&out);
            }
            TagEnd::Superscript => self.push_inline("</sup>"),
            TagEnd::Subscript => self.push_inline("</sub>"),
        }
    }

    fn end_code_block(&mut self) {
        let (lang, content) = self.code.end();

        // Try processors in order, fall back to normal code block rendering
        let processed = lang.as_ref().is_some_and(|lang_str| {
            self.processors.iter_mut().any(|processor| {
                match processor.process(lang_str, &content) {
                    ProcessResult::Inline(html) => {
                        self.output.push_str(&html);
                        true
                    }
                    ProcessResult::PassThrough => false,
                }
            })
        });

        if !processed {
            html::code_block(lang.as_deref(), &content, &mut self.output);
        }
    }

    fn text(&mut self, text: &str) {
        if self.code.is_active() {
            self.code.push_str(text);
        } else if self.image.is_active() {
            self.image.push_str(text);
        } else {
            if self.heading.is_active() {
                self.heading.push_text(text);
            }
            let html = self.text_html(text);
            self.push_inline(&html);
        }
    }

    /// Escape text, resolving footnote references when a handler is set.
    fn text_html(&mut self, text: &str) -> String {
        let Some(footnotes) = self.footnotes.as_deref_mut() else {
            return escape_html(text);
        };

        let mut out = String::with_capacity(text.len());
        let mut rest = text;
        while let Some(reference) = find_reference(rest) {
            out.push_str(&escape_html(&rest[..reference.start]));
            footnotes.reference(reference.label, &mut out);
            rest = &rest[reference.end..];
        }
        out.push_str(&escape_html(rest));
        out
    }

    fn inline_code(&mut self, code: &str) {
        if self.image.is_active() {
            self.image.push_str(code);
            return;
        }
        if self.heading.is_active() {
            self.heading.push_text(code);
        }
        self.push_inline(&format!("<code>{}</code>", escape_html(code)));
    }

    /// Math is emitted with its delimiters for client-side typesetting.
    fn math(&mut self, source: &str, display: bool) {
        if self.image.is_active() {
            self.image.push_str(source);
            return;
        }
        if self.heading.is_active() {
            self.heading.push_text(source);
        }
        let (class, delimiter) = if display {
            ("math-display", "$$")
        } else {
            ("math-inline", "$")
        };
        self.push_inline(&format!(
            r#"<span class="math {class}">{delimiter}{}{delimiter}</span>"#,
            escape_html(source)
        ));
    }

    fn soft_break(&mut self) {
        if self.code.is_active() {
            self.code.push_newline();
        } else if self.image.is_active() {
            self.image.push_str(" ");
        } else {
            if self.heading.is_active() {
                self.heading.push_text(" ");
            }
            self.push_inline("\n");
        }
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}
