//! Integration tests for full site builds against an in-memory Notion

use chrono::NaiveDate;
use std::collections::HashMap;
use std::fs;
use t2press::application::{init, BuildSiteService};
use t2press::domain::{
    Annotations, BlockId, BlockKind, BlockSource, ContentBlock, Diagnostic, EntrySource,
    HeadingLevel, RichTextSpan, SourceEntry, TableHeaderPolicy,
};
use t2press::error::Result;
use t2press::infrastructure::SiteConfig;
use t2press::PressError;
use tempfile::TempDir;

#[derive(Default)]
struct FakeNotion {
    entries: Vec<SourceEntry>,
    blocks: HashMap<BlockId, Vec<ContentBlock>>,
}

impl FakeNotion {
    fn page(&mut self, entry: SourceEntry, blocks: Vec<ContentBlock>) {
        self.blocks.insert(entry.id.clone(), blocks);
        self.entries.push(entry);
    }
}

impl BlockSource for FakeNotion {
    fn children(&self, id: &BlockId) -> Result<Vec<ContentBlock>> {
        self.blocks.get(id).cloned().ok_or_else(|| PressError::Api {
            status: 404,
            code: "object_not_found".to_string(),
            message: format!("Could not find block with ID: {}", id),
        })
    }
}

impl EntrySource for FakeNotion {
    fn published_entries(&self) -> Result<Vec<SourceEntry>> {
        Ok(self.entries.clone())
    }
}

fn text(s: &str) -> Vec<RichTextSpan> {
    vec![RichTextSpan::plain(s)]
}

fn dated(id: &str, title: &str, y: i32, m: u32, d: u32) -> SourceEntry {
    let mut entry = SourceEntry::new(id, title);
    entry.date = NaiveDate::from_ymd_opt(y, m, d);
    entry
}

fn sample_notion() -> FakeNotion {
    let mut notion = FakeNotion::default();

    let mut first = dated("page-1", "Hello World", 2025, 1, 10);
    first.summary = Some("first post".to_string());
    first.tags.insert("rust".to_string());
    notion.page(
        first,
        vec![
            ContentBlock::new(
                "h",
                BlockKind::Heading {
                    level: HeadingLevel::H2,
                    text: text("Intro"),
                },
            ),
            ContentBlock::new(
                "p",
                BlockKind::Paragraph(vec![
                    RichTextSpan::plain("Hi "),
                    RichTextSpan::plain("there").with_annotations(Annotations {
                        bold: true,
                        ..Default::default()
                    }),
                ]),
            ),
            ContentBlock::new("b1", BlockKind::BulletedItem(text("one"))),
            ContentBlock::new("b2", BlockKind::BulletedItem(text("two"))).with_children(true),
            ContentBlock::new(
                "c",
                BlockKind::Code {
                    language: "rust".to_string(),
                    text: text("fn main() {}"),
                },
            ),
            ContentBlock::new(
                "e",
                BlockKind::Embed {
                    url: "https://youtu.be/abc123?t=5".to_string(),
                },
            ),
        ],
    );
    notion.blocks.insert(
        BlockId::new("b2"),
        vec![ContentBlock::new("n1", BlockKind::NumberedItem(text("nested")))],
    );

    notion.page(
        dated("page-2", "Tables & Things", 2025, 2, 1),
        vec![
            ContentBlock::new("t", BlockKind::Table).with_children(true),
            ContentBlock::new(
                "x",
                BlockKind::Unsupported {
                    kind: "synced_block".to_string(),
                    text: Vec::new(),
                },
            ),
        ],
    );
    notion.blocks.insert(
        BlockId::new("t"),
        vec![
            ContentBlock::new(
                "r1",
                BlockKind::TableRow {
                    cells: vec![text("[th]Name"), text("[th]Score")],
                },
            ),
            ContentBlock::new(
                "r2",
                BlockKind::TableRow {
                    cells: vec![text("alice"), text("10")],
                },
            ),
        ],
    );

    notion.page(SourceEntry::new("page-3", "Hello World"), vec![]);
    notion
}

fn scaffolded_site() -> TempDir {
    let temp = TempDir::new().unwrap();
    init(temp.path()).unwrap();
    temp
}

#[test]
fn test_build_writes_posts_and_index() {
    let temp = scaffolded_site();
    let config = SiteConfig::load_from_dir(temp.path()).unwrap();

    let report = BuildSiteService::new(sample_notion(), config, temp.path().to_path_buf())
        .execute()
        .unwrap();

    let out = temp.path().join("_output");
    assert_eq!(report.output_dir, out);
    let urls: Vec<&str> = report.entries.iter().map(|(_, url)| url.as_str()).collect();
    assert_eq!(
        urls,
        vec![
            "posts/tables-things/index.html",
            "posts/hello-world/index.html",
            "posts/hello-world-2/index.html",
        ]
    );

    let hello = fs::read_to_string(out.join("posts/hello-world/index.html")).unwrap();
    assert!(hello.contains("<h2>Intro</h2>"));
    assert!(hello.contains("<p>Hi <strong>there</strong></p>"));
    assert!(hello.contains(
        "<ul>\n<li>one</li>\n<li>two\n<ol>\n<li>nested</li>\n</ol></li>\n</ul>"
    ));
    assert!(hello.contains("<div class=\"code-block\"><pre>"));
    assert!(hello.contains("https://www.youtube.com/embed/abc123"));
    assert!(hello.contains("<li>rust</li>"));

    let index = fs::read_to_string(out.join("index.html")).unwrap();
    let newest = index.find("Tables &amp; Things").unwrap();
    let older = index.find("Hello World").unwrap();
    assert!(newest < older);
    assert!(index.contains("first post"));
}

#[test]
fn test_build_reports_diagnostics() {
    let temp = scaffolded_site();
    let config = SiteConfig::load_from_dir(temp.path()).unwrap();

    let report = BuildSiteService::new(sample_notion(), config, temp.path().to_path_buf())
        .execute()
        .unwrap();

    assert_eq!(
        report.diagnostics,
        vec![Diagnostic::UnsupportedBlock {
            id: "x".to_string(),
            kind: "synced_block".to_string(),
        }]
    );
}

#[test]
fn test_build_table_header_policies() {
    let temp = scaffolded_site();
    let mut config = SiteConfig::load_from_dir(temp.path()).unwrap();
    let root = temp.path().to_path_buf();

    BuildSiteService::new(sample_notion(), config.clone(), root.clone())
        .execute()
        .unwrap();
    let positional =
        fs::read_to_string(temp.path().join("_output/posts/tables-things/index.html")).unwrap();
    assert!(positional.contains("<th>[th]Name</th>"));

    config.render.table_headers = TableHeaderPolicy::Prefix;
    BuildSiteService::new(sample_notion(), config, root)
        .execute()
        .unwrap();
    let prefix =
        fs::read_to_string(temp.path().join("_output/posts/tables-things/index.html")).unwrap();
    assert!(prefix.contains("<th>Name</th>"));
    assert!(prefix.contains("<td>alice</td>"));
}

#[test]
fn test_build_copies_static_assets() {
    let temp = scaffolded_site();
    let theme_static = temp.path().join("themes/default/static");
    fs::write(
        theme_static.join("vars.css.j2"),
        ":root { --title: \"{{ site_name }}\"; }",
    )
    .unwrap();
    fs::create_dir_all(temp.path().join("src/img")).unwrap();
    fs::write(temp.path().join("src/img/logo.svg"), "<svg/>").unwrap();

    let config = SiteConfig::load_from_dir(temp.path()).unwrap();
    let report = BuildSiteService::new(sample_notion(), config, temp.path().to_path_buf())
        .execute()
        .unwrap();

    let out = temp.path().join("_output");
    assert!(out.join("static/style.css").exists());
    assert_eq!(
        fs::read_to_string(out.join("static/vars.css")).unwrap(),
        ":root { --title: \"T2-Press\"; }"
    );
    assert!(!out.join("static/vars.css.j2").exists());
    assert!(fs::read_to_string(out.join("static/highlight.css"))
        .unwrap()
        .contains(".hl-"));
    assert_eq!(
        fs::read_to_string(out.join("src/img/logo.svg")).unwrap(),
        "<svg/>"
    );
    // style.css, vars.css, highlight.css, logo.svg
    assert_eq!(report.static_files, 4);
}

#[test]
fn test_rebuild_removes_stale_pages() {
    let temp = scaffolded_site();
    let config = SiteConfig::load_from_dir(temp.path()).unwrap();
    let stale = temp.path().join("_output/posts/removed/index.html");
    fs::create_dir_all(stale.parent().unwrap()).unwrap();
    fs::write(&stale, "old").unwrap();

    BuildSiteService::new(sample_notion(), config, temp.path().to_path_buf())
        .execute()
        .unwrap();
    assert!(!stale.exists());
}

#[test]
fn test_failed_fetch_keeps_previous_site() {
    let temp = scaffolded_site();
    let config = SiteConfig::load_from_dir(temp.path()).unwrap();
    let previous = temp.path().join("_output/index.html");
    fs::create_dir_all(previous.parent().unwrap()).unwrap();
    fs::write(&previous, "previous build").unwrap();

    let mut notion = sample_notion();
    notion.blocks.remove(&BlockId::new("t"));

    let result = BuildSiteService::new(notion, config, temp.path().to_path_buf()).execute();
    assert!(matches!(result, Err(PressError::Api { status: 404, .. })));
    assert_eq!(fs::read_to_string(&previous).unwrap(), "previous build");
}

#[test]
fn test_build_without_theme_uses_builtin() {
    let temp = TempDir::new().unwrap();
    let report = BuildSiteService::new(
        sample_notion(),
        SiteConfig::default(),
        temp.path().to_path_buf(),
    )
    .execute()
    .unwrap();

    let hello =
        fs::read_to_string(temp.path().join("_output/posts/hello-world/index.html")).unwrap();
    assert!(hello.contains("<title>Hello World | T2-Press</title>"));
    // Only the generated highlight.css
    assert_eq!(report.static_files, 1);
}
