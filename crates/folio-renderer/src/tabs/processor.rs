//! Tabs processor that renders tab groups at their placeholders.
//!
//! [`TabsPreprocessor`](super::TabsPreprocessor) leaves a fenced placeholder
//! block where each tab group stood. When the renderer reaches one, this
//! processor renders the group's panels and assembles the container.

use std::fmt::Write;

use crate::code_block::{CodeBlockProcessor, ProcessResult};
use crate::state::escape_html;

use super::TabsGroup;
use super::preprocessor::PLACEHOLDER_LANGUAGE;

/// Code block processor that turns placeholders into tab containers.
///
/// # Output HTML Structure
///
/// ```html
/// <div class="tabs-container" data-tabs-id="1a2b3c4d">
///   <div class="tabs-header" role="tablist">
///     <button type="button" class="tab-button active" role="tab"
///             aria-selected="true" onclick="switchTab('1a2b3c4d', 0)">macOS</button>
///     <button type="button" class="tab-button" role="tab"
///             aria-selected="false" onclick="switchTab('1a2b3c4d', 1)">Linux</button>
///   </div>
///   <div class="tabs-content">
///     <div class="tab-panel active" role="tabpanel" data-tab-index="0"><!-- content --></div>
///     <div class="tab-panel" role="tabpanel" data-tab-index="1" hidden><!-- content --></div>
///   </div>
/// </div>
/// ```
pub struct TabsProcessor {
    groups: Vec<TabsGroup>,
    render_panel: Box<dyn FnMut(&str) -> String>,
    warnings: Vec<String>,
}

impl TabsProcessor {
    /// Create a processor for `groups` whose panel content is rendered by
    /// `render_panel`.
    #[must_use]
    pub fn new(groups: Vec<TabsGroup>, render_panel: impl FnMut(&str) -> String + 'static) -> Self {
        Self {
            groups,
            render_panel: Box::new(render_panel),
            warnings: Vec::new(),
        }
    }

    /// Render one group into its container.
    ///
    /// The first button and panel are active; the remaining panels stay in
    /// the DOM with the `hidden` attribute until `switchTab` activates them.
    fn transform(&mut self, group_idx: usize) -> Option<String> {
        let group = self.groups.get(group_idx)?;
        let id = &group.id;

        let mut html = String::with_capacity(512);
        write!(
            html,
            r#"<div class="tabs-container" data-tabs-id="{id}"><div class="tabs-header" role="tablist">"#
        )
        .unwrap();
        for (idx, tab) in group.tabs.iter().enumerate() {
            let active = idx == 0;
            write!(
                html,
                r#"<button type="button" class="tab-button{}" role="tab" aria-selected="{active}" onclick="switchTab('{id}', {idx})">{}</button>"#,
                if active { " active" } else { "" },
                escape_html(&tab.title)
            )
            .unwrap();
        }
        html.push_str(r#"</div><div class="tabs-content">"#);
        for (idx, tab) in group.tabs.iter().enumerate() {
            let active = idx == 0;
            let content = (self.render_panel)(&tab.content);
            write!(
                html,
                r#"<div class="tab-panel{}" role="tabpanel" data-tab-index="{idx}"{}>{content}</div>"#,
                if active { " active" } else { "" },
                if active { "" } else { " hidden" },
            )
            .unwrap();
        }
        html.push_str("</div></div>");
        Some(html)
    }
}

impl CodeBlockProcessor for TabsProcessor {
    fn process(&mut self, language: &str, source: &str) -> ProcessResult {
        if language != PLACEHOLDER_LANGUAGE {
            return ProcessResult::PassThrough;
        }

        match source.trim().parse().ok().and_then(|idx| self.transform(idx)) {
            Some(html) => ProcessResult::Inline(html),
            None => {
                self.warnings.push(format!(
                    "{PLACEHOLDER_LANGUAGE} block without a matching tab group, passing through"
                ));
                ProcessResult::PassThrough
            }
        }
    }

    fn warnings(&self) -> &[String] {
        &self.warnings
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::tabs::Tab;

    fn group() -> TabsGroup {
        TabsGroup {
            id: "abcd1234".to_owned(),
            tabs: vec![
                Tab {
                    title: "macOS".to_owned(),
                    content: "brew".to_owned(),
                },
                Tab {
                    title: "<Linux>".to_owned(),
                    content: "apt".to_owned(),
                },
            ],
        }
    }

    fn process(processor: &mut TabsProcessor, source: &str) -> ProcessResult {
        processor.process(PLACEHOLDER_LANGUAGE, source)
    }

    #[test]
    fn test_container_markup() {
        let mut processor = TabsProcessor::new(vec![group()], |md| format!("<p>{md}</p>"));
        let ProcessResult::Inline(html) = process(&mut processor, "0\n") else {
            panic!("placeholder not replaced");
        };

        assert_eq!(
            html,
            concat!(
                r#"<div class="tabs-container" data-tabs-id="abcd1234"><div class="tabs-header" role="tablist">"#,
                r#"<button type="button" class="tab-button active" role="tab" aria-selected="true" onclick="switchTab('abcd1234', 0)">macOS</button>"#,
                r#"<button type="button" class="tab-button" role="tab" aria-selected="false" onclick="switchTab('abcd1234', 1)">&lt;Linux&gt;</button>"#,
                r#"</div><div class="tabs-content">"#,
                r#"<div class="tab-panel active" role="tabpanel" data-tab-index="0"><p>brew</p></div>"#,
                r#"<div class="tab-panel" role="tabpanel" data-tab-index="1" hidden><p>apt</p></div>"#,
                "</div></div>",
            )
        );
        assert!(processor.warnings().is_empty());
    }

    #[test]
    fn test_panels_rendered_in_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        let mut processor = TabsProcessor::new(vec![group()], move |md| {
            sink.borrow_mut().push(md.to_owned());
            String::new()
        });
        let _ = process(&mut processor, "0");
        assert_eq!(*log.borrow(), vec!["brew", "apt"]);
    }

    #[test]
    fn test_unknown_group_passes_through() {
        let mut processor = TabsProcessor::new(vec![group()], str::to_owned);
        assert_eq!(process(&mut processor, "7"), ProcessResult::PassThrough);
        assert_eq!(process(&mut processor, "x"), ProcessResult::PassThrough);
        assert_eq!(processor.warnings().len(), 2);
    }

    #[test]
    fn test_other_languages_pass_through() {
        let mut processor = TabsProcessor::new(vec![group()], str::to_owned);
        let result = processor.process("rust", "0");
        assert_eq!(result, ProcessResult::PassThrough);
        assert!(processor.warnings().is_empty());
    }
}
