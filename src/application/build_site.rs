//! Build site use case
//!
//! Every entry is fetched and rendered in memory first; the output directory
//! is only cleaned and written once all of them succeeded. A failure while
//! writing removes the partial output.

use crate::domain::{
    listing_order, BlockRenderer, CodeHighlighter, Diagnostic, EntrySource, RenderedEntry,
    SlugAllocator,
};
use crate::error::Result;
use crate::infrastructure::{load_theme_config, SiteConfig, SiteWriter, Theme};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tera::Context;

const DEFAULT_CODE_THEME: &str = "InspiredGitHub";
const HIGHLIGHT_CSS: &str = "static/highlight.css";

/// What a build produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    pub output_dir: PathBuf,
    /// (title, site-relative url) in listing order
    pub entries: Vec<(String, String)>,
    pub static_files: usize,
    pub diagnostics: Vec<Diagnostic>,
}

/// Index page view of one entry
#[derive(Debug, Serialize)]
struct PostSummary<'a> {
    title: &'a str,
    url: String,
    summary: Option<&'a str>,
    tags: &'a BTreeSet<String>,
    date: Option<NaiveDate>,
}

/// Service for full site rebuilds
pub struct BuildSiteService<S: EntrySource> {
    source: S,
    config: SiteConfig,
    root: PathBuf,
}

impl<S: EntrySource> BuildSiteService<S> {
    /// Create a build service for the site rooted at `root`
    pub fn new(source: S, config: SiteConfig, root: PathBuf) -> Self {
        BuildSiteService {
            source,
            config,
            root,
        }
    }

    /// Fetch and render every published entry, in source order
    pub fn render_entries(
        &self,
        highlighter: &CodeHighlighter,
    ) -> Result<(Vec<RenderedEntry>, Vec<Diagnostic>)> {
        let renderer = BlockRenderer::new(&self.source, highlighter, self.config.render);
        let mut slugs = SlugAllocator::default();
        let mut rendered = Vec::new();

        for entry in self.source.published_entries()? {
            let slug = slugs.allocate(&entry.title);
            log::info!("rendering '{}' (slug: {})", entry.title, slug);

            let blocks = self.source.children(&entry.id)?;
            let content_html = renderer.render_page(&blocks)?;

            rendered.push(RenderedEntry {
                title: entry.title,
                slug,
                content_html,
                summary: entry.summary,
                tags: entry.tags,
                date: entry.date,
            });
        }

        Ok((rendered, renderer.take_diagnostics()))
    }

    /// Rebuild the whole site
    pub fn execute(&self) -> Result<BuildReport> {
        log::info!("building {} from Notion", self.config.site_name);

        // 1. Theme first, so template errors surface before any fetching
        let theme_dir = self.config.theme_dir(&self.root);
        let theme = Theme::load(&theme_dir)?;
        let theme_config = load_theme_config(&theme_dir)?;

        // 2. Render everything in memory
        let highlighter = CodeHighlighter::new();
        let (mut entries, diagnostics) = self.render_entries(&highlighter)?;
        entries.sort_by(listing_order);

        // 3. Clean build of the output directory
        let output_dir = self.config.output_path(&self.root);
        let writer = SiteWriter::recreate(&output_dir, &self.root)?;
        let context = self.site_context(&theme_config);

        let static_files =
            match self.write_site(&writer, &theme, &context, &theme_config, &entries, &highlighter)
            {
                Ok(count) => count,
                Err(err) => {
                    log::warn!("build failed while writing, removing partial output");
                    writer.discard();
                    return Err(err);
                }
            };

        log::info!("site written to {}", output_dir.display());
        Ok(BuildReport {
            output_dir,
            entries: entries.iter().map(|e| (e.title.clone(), e.url())).collect(),
            static_files,
            diagnostics,
        })
    }

    /// Template variables shared by every page
    fn site_context(&self, theme_config: &toml::Table) -> Context {
        let mut context = Context::new();
        context.insert("site_name", &self.config.site_name);
        context.insert("base_url", &self.config.base_url);
        context.insert("extra", &self.config.extra);
        context.insert("theme", theme_config);
        context
    }

    fn write_site(
        &self,
        writer: &SiteWriter,
        theme: &Theme,
        context: &Context,
        theme_config: &toml::Table,
        entries: &[RenderedEntry],
        highlighter: &CodeHighlighter,
    ) -> Result<usize> {
        for entry in entries {
            let mut page = context.clone();
            page.insert("title", &entry.title);
            page.insert("slug", &entry.slug);
            page.insert("content", &entry.content_html);
            page.insert("summary", &entry.summary);
            page.insert("tags", &entry.tags);
            page.insert("date", &entry.date);
            writer.write(entry.url(), &theme.render_post(&page)?)?;
        }

        let posts: Vec<PostSummary<'_>> = entries
            .iter()
            .map(|e| PostSummary {
                title: &e.title,
                url: e.url(),
                summary: e.summary.as_deref(),
                tags: &e.tags,
                date: e.date,
            })
            .collect();
        let mut index = context.clone();
        index.insert("posts", &posts);
        writer.write("index.html", &theme.render_index(&index)?)?;

        let mut static_files = 0;
        if let Some(static_dir) = theme.static_dir() {
            log::info!("copying theme static files from {}", static_dir.display());
            let render = |path: &Path| theme.render_file(path, context);
            static_files += writer.copy_tree(static_dir, "static", Some(&render))?;
        }

        // A stylesheet shipped by the theme wins over the generated one
        if writer.root().join(HIGHLIGHT_CSS).exists() {
            log::info!("theme provides {}, not generating it", HIGHLIGHT_CSS);
        } else {
            let code_theme = theme_config
                .get("code_theme")
                .and_then(|v| v.as_str())
                .unwrap_or(DEFAULT_CODE_THEME);
            match highlighter.stylesheet(code_theme) {
                Some(css) => {
                    writer.write(HIGHLIGHT_CSS, &css)?;
                    static_files += 1;
                }
                None => log::warn!("unknown code_theme '{}', no highlight.css written", code_theme),
            }
        }

        let assets = self.root.join("src");
        if assets.is_dir() {
            log::info!("copying {}", assets.display());
            static_files += writer.copy_tree(&assets, "src", None)?;
        }

        Ok(static_files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BlockId, BlockKind, BlockSource, ContentBlock, RichTextSpan, SourceEntry};
    use crate::error::PressError;
    use std::collections::HashMap;
    use std::fs;
    use tempfile::TempDir;

    #[derive(Default)]
    struct FakeNotion {
        entries: Vec<SourceEntry>,
        blocks: HashMap<BlockId, Vec<ContentBlock>>,
    }

    impl BlockSource for FakeNotion {
        fn children(&self, id: &BlockId) -> Result<Vec<ContentBlock>> {
            self.blocks.get(id).cloned().ok_or_else(|| PressError::Api {
                status: 404,
                code: "object_not_found".to_string(),
                message: format!("no block {}", id),
            })
        }
    }

    impl EntrySource for FakeNotion {
        fn published_entries(&self) -> Result<Vec<SourceEntry>> {
            Ok(self.entries.clone())
        }
    }

    fn paragraph(id: &str, text: &str) -> ContentBlock {
        ContentBlock::new(id, BlockKind::Paragraph(vec![RichTextSpan::plain(text)]))
    }

    fn fake_with(titles: &[&str]) -> FakeNotion {
        let mut fake = FakeNotion::default();
        for (i, title) in titles.iter().enumerate() {
            let id = format!("page-{}", i);
            fake.entries.push(SourceEntry::new(id.clone(), *title));
            fake.blocks
                .insert(BlockId::new(id.clone()), vec![paragraph(&format!("{}-p", id), title)]);
        }
        fake
    }

    #[test]
    fn test_render_entries_allocates_unique_slugs() {
        let service = BuildSiteService::new(
            fake_with(&["Same", "Same"]),
            SiteConfig::default(),
            PathBuf::from("."),
        );
        let (entries, diagnostics) = service.render_entries(&CodeHighlighter::new()).unwrap();

        assert_eq!(entries[0].slug, "same");
        assert_eq!(entries[1].slug, "same-2");
        assert_eq!(entries[0].content_html, "<p>Same</p>");
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_fetch_failure_leaves_previous_output() {
        let temp = TempDir::new().unwrap();
        let out = temp.path().join("_output");
        fs::create_dir_all(&out).unwrap();
        fs::write(out.join("index.html"), "previous").unwrap();

        let mut fake = fake_with(&["Fine"]);
        fake.entries.push(SourceEntry::new("missing", "Broken"));
        let service = BuildSiteService::new(fake, SiteConfig::default(), temp.path().to_path_buf());

        assert!(service.execute().is_err());
        assert_eq!(fs::read_to_string(out.join("index.html")).unwrap(), "previous");
    }

    #[test]
    fn test_write_failure_discards_partial_output() {
        let temp = TempDir::new().unwrap();
        let templates = temp.path().join("themes/default/templates");
        fs::create_dir_all(&templates).unwrap();
        fs::write(templates.join("post.html"), "{{ content | safe }}").unwrap();
        // Parses fine, fails at render time
        fs::write(templates.join("index.html"), "{{ missing_variable }}").unwrap();

        let service = BuildSiteService::new(
            fake_with(&["One"]),
            SiteConfig::default(),
            temp.path().to_path_buf(),
        );

        assert!(matches!(service.execute(), Err(PressError::Template(_))));
        assert!(!temp.path().join("_output").exists());
    }

    #[test]
    fn test_theme_highlight_css_is_kept() {
        let temp = TempDir::new().unwrap();
        let static_dir = temp.path().join("themes/default/static");
        fs::create_dir_all(&static_dir).unwrap();
        fs::create_dir_all(temp.path().join("themes/default/templates")).unwrap();
        fs::write(
            temp.path().join("themes/default/templates/post.html"),
            "{{ content | safe }}",
        )
        .unwrap();
        fs::write(
            temp.path().join("themes/default/templates/index.html"),
            "{{ posts | length }}",
        )
        .unwrap();
        fs::write(static_dir.join("highlight.css"), ".custom {}").unwrap();

        let service = BuildSiteService::new(
            fake_with(&["One"]),
            SiteConfig::default(),
            temp.path().to_path_buf(),
        );
        let report = service.execute().unwrap();

        let css = fs::read_to_string(temp.path().join("_output/static/highlight.css")).unwrap();
        assert_eq!(css, ".custom {}");
        assert_eq!(report.static_files, 1);
    }
}
