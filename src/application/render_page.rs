//! Render a single page use case

use crate::domain::{BlockId, BlockRenderer, BlockSource, CodeHighlighter, Diagnostic, RenderOptions};
use crate::error::Result;

/// HTML body of one page plus what the renderer had to skip
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    pub html: String,
    pub diagnostics: Vec<Diagnostic>,
}

/// Service for rendering one page by id, without touching the output directory
pub struct RenderPageService<S: BlockSource> {
    source: S,
    options: RenderOptions,
}

impl<S: BlockSource> RenderPageService<S> {
    pub fn new(source: S, options: RenderOptions) -> Self {
        RenderPageService { source, options }
    }

    pub fn execute(&self, page_id: &str) -> Result<RenderedPage> {
        let id = BlockId::new(page_id.trim());
        log::info!("rendering page {}", id);

        let highlighter = CodeHighlighter::new();
        let renderer = BlockRenderer::new(&self.source, &highlighter, self.options);
        let blocks = self.source.children(&id)?;
        let html = renderer.render_page(&blocks)?;

        Ok(RenderedPage {
            html,
            diagnostics: renderer.take_diagnostics(),
        })
    }
}
