//! List regrouping
//!
//! Notion delivers list items as flat siblings. Consecutive items of the same
//! family are wrapped in one `<ul>`/`<ol>`; any change of family or any other
//! block closes the open list first. Item children are grouped the same way,
//! recursively.

use super::block::{BlockKind, ContentBlock};
use super::render::BlockRenderer;
use super::rich_text::compose;
use crate::error::{PressError, Result};

/// The list element a list item belongs in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListTag {
    Unordered,
    Ordered,
}

impl ListTag {
    /// List family of a block, `None` for anything that isn't a list item
    pub fn for_block(block: &ContentBlock) -> Option<ListTag> {
        match block.kind {
            BlockKind::BulletedItem(_) => Some(ListTag::Unordered),
            BlockKind::NumberedItem(_) => Some(ListTag::Ordered),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ListTag::Unordered => "ul",
            ListTag::Ordered => "ol",
        }
    }
}

/// Accumulator for grouping one level of sibling blocks
#[derive(Debug, Default)]
pub struct ListFold {
    open: Option<ListTag>,
    segments: Vec<String>,
}

impl ListFold {
    /// Append one rendered sibling. `tag` is the list family of the sibling,
    /// or `None` if it is not a list item.
    pub fn step(mut self, tag: Option<ListTag>, html: String) -> Self {
        if self.open != tag {
            self.close();
            if let Some(tag) = tag {
                self.segments.push(format!("<{}>", tag.name()));
                self.open = Some(tag);
            }
        }
        self.segments.push(html);
        self
    }

    /// Close any list left open and join the segments
    pub fn finish(mut self) -> String {
        self.close();
        self.segments.join("\n")
    }

    fn close(&mut self) {
        if let Some(tag) = self.open.take() {
            self.segments.push(format!("</{}>", tag.name()));
        }
    }
}

impl BlockRenderer<'_> {
    /// Render an ordered sequence of sibling blocks, wrapping list items
    pub fn render_sequence(&self, blocks: &[ContentBlock]) -> Result<String> {
        let fold = blocks
            .iter()
            .try_fold(ListFold::default(), |fold, block| {
                let html = self.render_block(block)?;
                Ok::<_, PressError>(fold.step(ListTag::for_block(block), html))
            })?;
        Ok(fold.finish())
    }

    /// Render one list item as `<li>`, nesting its children inside it
    pub fn render_list_item(&self, block: &ContentBlock) -> Result<String> {
        let text = match &block.kind {
            BlockKind::BulletedItem(text) | BlockKind::NumberedItem(text) => compose(text),
            _ => String::new(),
        };

        let mut html = format!("<li>{}", text);
        if block.has_children {
            let children = self.fetch_children(block)?;
            if !children.is_empty() {
                html.push('\n');
                html.push_str(&self.render_sequence(&children)?);
            }
        }
        html.push_str("</li>");
        Ok(html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::block::RichTextSpan;
    use crate::domain::highlight::CodeHighlighter;
    use crate::domain::render::RenderOptions;
    use crate::domain::test_support::MemorySource;

    fn bullet(id: &str, text: &str) -> ContentBlock {
        ContentBlock::new(id, BlockKind::BulletedItem(vec![RichTextSpan::plain(text)]))
    }

    fn numbered(id: &str, text: &str) -> ContentBlock {
        ContentBlock::new(id, BlockKind::NumberedItem(vec![RichTextSpan::plain(text)]))
    }

    fn paragraph(id: &str, text: &str) -> ContentBlock {
        ContentBlock::new(id, BlockKind::Paragraph(vec![RichTextSpan::plain(text)]))
    }

    #[test]
    fn test_fold_groups_same_family() {
        let out = ListFold::default()
            .step(Some(ListTag::Unordered), "<li>a</li>".to_string())
            .step(Some(ListTag::Unordered), "<li>b</li>".to_string())
            .finish();
        assert_eq!(out, "<ul>\n<li>a</li>\n<li>b</li>\n</ul>");
    }

    #[test]
    fn test_fold_without_lists_is_plain_join() {
        let out = ListFold::default()
            .step(None, "<p>a</p>".to_string())
            .step(None, "<hr>".to_string())
            .finish();
        assert_eq!(out, "<p>a</p>\n<hr>");
        assert_eq!(ListFold::default().finish(), "");
    }

    #[test]
    fn test_mixed_sequence_regroups() {
        let source = MemorySource::default();
        let highlighter = CodeHighlighter::new();
        let renderer = BlockRenderer::new(&source, &highlighter, RenderOptions::default());

        let blocks = vec![
            bullet("1", "one"),
            bullet("2", "two"),
            numbered("3", "three"),
            paragraph("4", "para"),
            bullet("5", "five"),
        ];
        let html = renderer.render_sequence(&blocks).unwrap();

        assert_eq!(
            html,
            "<ul>\n<li>one</li>\n<li>two</li>\n</ul>\n\
             <ol>\n<li>three</li>\n</ol>\n\
             <p>para</p>\n\
             <ul>\n<li>five</li>\n</ul>"
        );
        assert_eq!(html.matches("<ul>").count(), html.matches("</ul>").count());
        assert_eq!(html.matches("<ol>").count(), html.matches("</ol>").count());
    }

    #[test]
    fn test_nested_child_of_same_family() {
        let mut source = MemorySource::default();
        source.insert("parent", vec![bullet("child", "inner")]);
        let highlighter = CodeHighlighter::new();
        let renderer = BlockRenderer::new(&source, &highlighter, RenderOptions::default());

        let parent = bullet("parent", "outer").with_children(true);
        let html = renderer.render_list_item(&parent).unwrap();

        assert_eq!(html, "<li>outer\n<ul>\n<li>inner</li>\n</ul></li>");
        assert_eq!(html.matches("<li>").count(), 2);
        assert_eq!(html.matches("<ul>").count(), 1);
    }

    #[test]
    fn test_deep_nesting_and_family_switch() {
        let mut source = MemorySource::default();
        source.insert("a", vec![numbered("b", "step").with_children(true)]);
        source.insert("b", vec![bullet("c", "detail")]);
        let highlighter = CodeHighlighter::new();
        let renderer = BlockRenderer::new(&source, &highlighter, RenderOptions::default());

        let html = renderer
            .render_sequence(&[bullet("a", "top").with_children(true)])
            .unwrap();

        assert_eq!(
            html,
            "<ul>\n<li>top\n<ol>\n<li>step\n<ul>\n<li>detail</li>\n</ul></li>\n</ol></li>\n</ul>"
        );
        assert_eq!(source.fetch_count(), 2);
    }

    #[test]
    fn test_non_list_children_render_inside_item() {
        let mut source = MemorySource::default();
        source.insert("a", vec![paragraph("p", "note")]);
        let highlighter = CodeHighlighter::new();
        let renderer = BlockRenderer::new(&source, &highlighter, RenderOptions::default());

        let html = renderer
            .render_list_item(&bullet("a", "item").with_children(true))
            .unwrap();
        assert_eq!(html, "<li>item\n<p>note</p></li>");
    }

    #[test]
    fn test_has_children_but_none_returned() {
        let source = MemorySource::default();
        let highlighter = CodeHighlighter::new();
        let renderer = BlockRenderer::new(&source, &highlighter, RenderOptions::default());

        let html = renderer
            .render_list_item(&numbered("lonely", "x").with_children(true))
            .unwrap();
        assert_eq!(html, "<li>x</li>");
    }

    #[test]
    fn test_child_fetch_failure_propagates() {
        let source = MemorySource::failing_on("broken");
        let highlighter = CodeHighlighter::new();
        let renderer = BlockRenderer::new(&source, &highlighter, RenderOptions::default());

        let result = renderer.render_sequence(&[
            paragraph("ok", "fine"),
            bullet("broken", "x").with_children(true),
        ]);
        assert!(result.is_err());
    }
}
