//! Block → HTML fragment rendering

use super::block::{BlockKind, BlockSource, ContentBlock, MediaSource, RichTextSpan};
use super::embed::{is_video_platform, normalize_embed_url};
use super::highlight::CodeHighlighter;
use super::rich_text::{compose, plain_text};
use super::table::{render_table, TableHeaderPolicy};
use crate::error::Result;
use html_escape::encode_double_quoted_attribute;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fmt;

/// Rendering knobs that don't depend on the site configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderOptions {
    #[serde(default)]
    pub table_headers: TableHeaderPolicy,
}

/// Something the renderer recovered from and wants the user to know about
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    UnsupportedBlock { id: String, kind: String },
    UnknownLanguage { id: String, language: String },
    StrayTableRow { id: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UnsupportedBlock { id, kind } => {
                write!(f, "unsupported block type '{}' ({})", kind, id)
            }
            Diagnostic::UnknownLanguage { id, language } => {
                write!(f, "unknown code language '{}', using plain text ({})", language, id)
            }
            Diagnostic::StrayTableRow { id } => {
                write!(f, "table row outside of a table ({})", id)
            }
        }
    }
}

/// Renders content blocks to HTML fragments.
///
/// Children of lists and tables are fetched through the injected
/// [`BlockSource`]; a fetch failure aborts the render.
pub struct BlockRenderer<'a> {
    source: &'a dyn BlockSource,
    highlighter: &'a CodeHighlighter,
    options: RenderOptions,
    diagnostics: RefCell<Vec<Diagnostic>>,
}

impl<'a> BlockRenderer<'a> {
    pub fn new(
        source: &'a dyn BlockSource,
        highlighter: &'a CodeHighlighter,
        options: RenderOptions,
    ) -> Self {
        BlockRenderer {
            source,
            highlighter,
            options,
            diagnostics: RefCell::new(Vec::new()),
        }
    }

    /// Render a page's top-level blocks into its content HTML
    pub fn render_page(&self, blocks: &[ContentBlock]) -> Result<String> {
        self.render_sequence(blocks)
    }

    /// Render a single block
    pub fn render_block(&self, block: &ContentBlock) -> Result<String> {
        log::debug!("rendering {} block {}", block.kind_name(), block.id);

        let html = match &block.kind {
            BlockKind::Paragraph(text) => format!("<p>{}</p>", compose(text)),
            BlockKind::Heading { level, text } => {
                let n = level.number();
                format!("<h{}>{}</h{}>", n, compose(text), n)
            }
            BlockKind::Quote(text) => format!("<blockquote>{}</blockquote>", compose(text)),
            BlockKind::Code { language, text } => self.render_code(block, language, text),
            BlockKind::BulletedItem(_) | BlockKind::NumberedItem(_) => {
                self.render_list_item(block)?
            }
            BlockKind::ToDo { checked, text } => {
                let checked = if *checked { " checked" } else { "" };
                format!(
                    "<div class=\"checkbox\"><label><input type=\"checkbox\" disabled{}> {}</label></div>",
                    checked,
                    compose(text)
                )
            }
            BlockKind::Table => self.render_table_block(block)?,
            BlockKind::TableRow { cells } => {
                self.record(Diagnostic::StrayTableRow {
                    id: block.id.to_string(),
                });
                let text: Vec<String> = cells.iter().map(|cell| compose(cell)).collect();
                format!("<div>{}</div>", text.join(" "))
            }
            BlockKind::Embed { url } => iframe(&normalize_embed_url(url)),
            BlockKind::Video(source) => render_video(source),
            BlockKind::Divider => "<hr>".to_string(),
            BlockKind::Image { source, caption } => render_image(source, caption),
            BlockKind::Unsupported { kind, text } => {
                self.record(Diagnostic::UnsupportedBlock {
                    id: block.id.to_string(),
                    kind: kind.clone(),
                });
                format!("<div>{}</div>", compose(text))
            }
        };

        Ok(html)
    }

    /// Diagnostics recorded so far, in order
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.borrow().clone()
    }

    /// Take the recorded diagnostics, leaving none behind
    pub fn take_diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.take()
    }

    pub(super) fn fetch_children(&self, block: &ContentBlock) -> Result<Vec<ContentBlock>> {
        self.source.children(&block.id)
    }

    fn record(&self, diagnostic: Diagnostic) {
        log::warn!("{}", diagnostic);
        self.diagnostics.borrow_mut().push(diagnostic);
    }

    fn render_code(&self, block: &ContentBlock, language: &str, text: &[RichTextSpan]) -> String {
        let language = language.trim().to_lowercase();
        log::debug!("code block language: '{}'", language);

        let highlighted = self.highlighter.highlight(&language, &plain_text(text));
        if !highlighted.language_resolved && !language.is_empty() {
            self.record(Diagnostic::UnknownLanguage {
                id: block.id.to_string(),
                language,
            });
        }

        format!(
            "<div class=\"code-block\"><pre>{}</pre></div>",
            highlighted.html
        )
    }

    fn render_table_block(&self, block: &ContentBlock) -> Result<String> {
        let children = self.fetch_children(block)?;
        let rows: Vec<&[Vec<RichTextSpan>]> = children
            .iter()
            .filter_map(|child| match &child.kind {
                BlockKind::TableRow { cells } => Some(cells.as_slice()),
                _ => {
                    log::debug!("skipping {} block inside table {}", child.kind_name(), block.id);
                    None
                }
            })
            .collect();

        Ok(render_table(&rows, self.options.table_headers))
    }
}

fn iframe(url: &str) -> String {
    format!(
        "<iframe src=\"{}\" title=\"embed\" frameborder=\"0\" loading=\"lazy\" allowfullscreen style=\"width:100%;height:400px;\"></iframe>",
        encode_double_quoted_attribute(url)
    )
}

fn render_video(source: &MediaSource) -> String {
    let url = source.url();
    let embed_url = normalize_embed_url(url);
    if is_video_platform(&embed_url) {
        return iframe(&embed_url);
    }
    format!(
        "<video src=\"{}\" controls style=\"max-width:100%;height:auto;\"></video>",
        encode_double_quoted_attribute(url)
    )
}

fn render_image(source: &MediaSource, caption: &[RichTextSpan]) -> String {
    format!(
        "<figure><img src=\"{}\" alt=\"{}\" loading=\"lazy\" style=\"max-width:100%;\"/><figcaption>{}</figcaption></figure>",
        encode_double_quoted_attribute(source.url()),
        encode_double_quoted_attribute(&plain_text(caption)),
        compose(caption)
    )
}
