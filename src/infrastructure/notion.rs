//! Notion API client and wire-format decoding
//!
//! Blocks arrive as `{"id", "type", "has_children", "<type>": {payload}}`.
//! Decoding is lenient for kinds the renderer has no markup for: they become
//! [`BlockKind::Unsupported`] with whatever rich text could be recovered.

use super::config::{Credentials, NotionSettings};
use crate::domain::{
    Annotations, BlockId, BlockKind, BlockSource, ContentBlock, EntrySource, HeadingLevel,
    MediaSource, RichTextSpan, SourceEntry,
};
use crate::error::{PressError, Result};
use chrono::NaiveDate;
use reqwest::blocking::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::collections::BTreeSet;
use std::time::Duration;

const NOTION_VERSION: &str = "2022-06-28";
const PAGE_SIZE: u32 = 100;
const UNTITLED: &str = "無題";

// --------------------
// Wire types
// --------------------

#[derive(Debug, Deserialize)]
struct WireList<T> {
    results: Vec<T>,
    #[serde(default)]
    has_more: bool,
    #[serde(default)]
    next_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireError {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireBlock {
    id: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    has_children: bool,
    #[serde(flatten)]
    payloads: Map<String, Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireAnnotations {
    bold: bool,
    italic: bool,
    strikethrough: bool,
    underline: bool,
    code: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireRichText {
    plain_text: String,
    annotations: WireAnnotations,
    href: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireUrl {
    url: String,
}

/// Union of every payload field the renderer reads
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WirePayload {
    rich_text: Vec<WireRichText>,
    language: Option<String>,
    checked: bool,
    url: Option<String>,
    cells: Vec<Vec<WireRichText>>,
    caption: Vec<WireRichText>,
    external: Option<WireUrl>,
    file: Option<WireUrl>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WirePage {
    id: String,
    #[serde(default)]
    properties: Map<String, Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireProperty {
    title: Vec<WireRichText>,
    rich_text: Vec<WireRichText>,
    multi_select: Vec<WireOption>,
    select: Option<WireOption>,
    date: Option<WireDate>,
}

#[derive(Debug, Deserialize)]
struct WireOption {
    name: String,
}

#[derive(Debug, Deserialize)]
struct WireDate {
    start: Option<String>,
}

impl From<WireRichText> for RichTextSpan {
    fn from(wire: WireRichText) -> Self {
        let a = wire.annotations;
        RichTextSpan {
            plain_text: wire.plain_text,
            annotations: Annotations {
                bold: a.bold,
                italic: a.italic,
                strikethrough: a.strikethrough,
                underline: a.underline,
                code: a.code,
            },
            href: wire.href.filter(|href| !href.is_empty()),
        }
    }
}

fn spans(wire: Vec<WireRichText>) -> Vec<RichTextSpan> {
    wire.into_iter().map(RichTextSpan::from).collect()
}

fn media(payload: &mut WirePayload) -> MediaSource {
    MediaSource {
        external: payload.external.take().map(|u| u.url),
        file: payload.file.take().map(|u| u.url),
    }
}

// --------------------
// Decoding
// --------------------

/// Decode one block from its wire form
pub(crate) fn decode_block(wire: WireBlock) -> Result<ContentBlock> {
    let WireBlock {
        id,
        kind,
        has_children,
        mut payloads,
    } = wire;
    let raw = payloads.remove(&kind).unwrap_or(Value::Null);

    let kind = match kind.as_str() {
        "paragraph" | "heading_1" | "heading_2" | "heading_3" | "quote" | "code"
        | "bulleted_list_item" | "numbered_list_item" | "to_do" | "table" | "table_row"
        | "embed" | "video" | "divider" | "image" => decode_known(&kind, parse_payload(raw)?),
        _ => {
            let payload = parse_payload(raw).unwrap_or_default();
            BlockKind::Unsupported {
                kind,
                text: spans(payload.rich_text),
            }
        }
    };

    Ok(ContentBlock {
        id: BlockId::new(id),
        has_children,
        kind,
    })
}

fn parse_payload(raw: Value) -> Result<WirePayload> {
    if raw.is_null() {
        return Ok(WirePayload::default());
    }
    Ok(serde_json::from_value(raw)?)
}

fn decode_known(kind: &str, mut payload: WirePayload) -> BlockKind {
    match kind {
        "paragraph" => BlockKind::Paragraph(spans(payload.rich_text)),
        "heading_1" | "heading_2" | "heading_3" => BlockKind::Heading {
            level: kind
                .strip_prefix("heading_")
                .and_then(|n| n.parse().ok())
                .and_then(HeadingLevel::from_number)
                .unwrap_or(HeadingLevel::H3),
            text: spans(payload.rich_text),
        },
        "quote" => BlockKind::Quote(spans(payload.rich_text)),
        "code" => BlockKind::Code {
            language: payload.language.unwrap_or_default(),
            text: spans(payload.rich_text),
        },
        "bulleted_list_item" => BlockKind::BulletedItem(spans(payload.rich_text)),
        "numbered_list_item" => BlockKind::NumberedItem(spans(payload.rich_text)),
        "to_do" => BlockKind::ToDo {
            checked: payload.checked,
            text: spans(payload.rich_text),
        },
        "table" => BlockKind::Table,
        "table_row" => BlockKind::TableRow {
            cells: payload.cells.into_iter().map(spans).collect(),
        },
        "embed" => BlockKind::Embed {
            url: payload.url.unwrap_or_default(),
        },
        "video" => BlockKind::Video(media(&mut payload)),
        "image" => BlockKind::Image {
            source: media(&mut payload),
            caption: spans(payload.caption),
        },
        _ => BlockKind::Divider,
    }
}

/// Decode a database page into entry metadata
pub(crate) fn decode_entry(page: WirePage, settings: &NotionSettings) -> SourceEntry {
    let property = |name: &Option<String>| -> Option<WireProperty> {
        let value = page.properties.get(name.as_deref()?)?.clone();
        match serde_json::from_value(value) {
            Ok(prop) => Some(prop),
            Err(err) => {
                log::warn!("ignoring malformed property {:?} on {}: {}", name, page.id, err);
                None
            }
        }
    };

    let title = property(&Some(settings.title_property.clone()))
        .map(|p| text_of(p.title))
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| UNTITLED.to_string());

    let summary = property(&settings.summary_property)
        .map(|p| text_of(p.rich_text))
        .filter(|s| !s.trim().is_empty());

    let tags = property(&settings.tags_property)
        .map(|p| {
            p.multi_select
                .into_iter()
                .chain(p.select)
                .map(|option| option.name)
                .collect()
        })
        .unwrap_or_else(BTreeSet::new);

    let date = property(&settings.date_property)
        .and_then(|p| p.date)
        .and_then(|d| d.start)
        .and_then(|start| parse_date(&start));

    SourceEntry {
        id: BlockId::new(page.id.clone()),
        title,
        summary,
        tags,
        date,
    }
}

fn text_of(wire: Vec<WireRichText>) -> String {
    wire.into_iter().map(|t| t.plain_text).collect()
}

/// Notion dates are `YYYY-MM-DD` optionally followed by a time
fn parse_date(start: &str) -> Option<NaiveDate> {
    let day = start.get(..10)?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

/// Database query body selecting entries whose checkbox `property` is set
fn published_query(property: &str, cursor: Option<&str>) -> Value {
    let mut body = json!({
        "filter": {
            "property": property,
            "checkbox": { "equals": true }
        },
        "page_size": PAGE_SIZE,
    });
    if let Some(cursor) = cursor {
        body["start_cursor"] = json!(cursor);
    }
    body
}

fn api_error(status: u16, body: &str) -> PressError {
    match serde_json::from_str::<WireError>(body) {
        Ok(err) => PressError::Api {
            status,
            code: err.code,
            message: err.message,
        },
        Err(_) => PressError::Api {
            status,
            code: "unknown".to_string(),
            message: body.chars().take(200).collect(),
        },
    }
}

// --------------------
// Client
// --------------------

/// Blocking Notion API client
pub struct NotionClient {
    client: Client,
    credentials: Credentials,
    settings: NotionSettings,
}

impl NotionClient {
    pub fn new(credentials: Credentials, settings: NotionSettings) -> Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(60)).build()?;
        Ok(NotionClient {
            client,
            credentials,
            settings,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.settings.api_base.trim_end_matches('/'), path)
    }

    fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request
            .bearer_auth(&self.credentials.token)
            .header("Notion-Version", NOTION_VERSION)
            .send()?;

        let status = response.status();
        let body = response.text()?;
        if !status.is_success() {
            return Err(api_error(status.as_u16(), &body));
        }
        Ok(serde_json::from_str(&body)?)
    }

    /// Collect every page of a cursor-paginated endpoint
    fn paginate<T: DeserializeOwned>(
        &self,
        mut fetch: impl FnMut(Option<&str>) -> Result<WireList<T>>,
    ) -> Result<Vec<T>> {
        let mut results = Vec::new();
        let mut cursor: Option<String> = None;
        loop {
            let page = fetch(cursor.as_deref())?;
            results.extend(page.results);
            match page.next_cursor {
                Some(next) if page.has_more => cursor = Some(next),
                _ => return Ok(results),
            }
        }
    }

    fn query_published(&self) -> Result<Vec<WirePage>> {
        let url = self.url(&format!("databases/{}/query", self.credentials.database_id()?));
        self.paginate(|cursor| {
            let body = published_query(&self.settings.published_property, cursor);
            self.send(self.client.post(&url).json(&body))
        })
    }

    fn list_children(&self, id: &BlockId) -> Result<Vec<WireBlock>> {
        let url = self.url(&format!("blocks/{}/children", id));
        self.paginate(|cursor| {
            let mut request = self
                .client
                .get(&url)
                .query(&[("page_size", PAGE_SIZE.to_string())]);
            if let Some(cursor) = cursor {
                request = request.query(&[("start_cursor", cursor)]);
            }
            self.send(request)
        })
    }
}

impl BlockSource for NotionClient {
    fn children(&self, id: &BlockId) -> Result<Vec<ContentBlock>> {
        log::debug!("fetching children of {}", id);
        self.list_children(id)?
            .into_iter()
            .map(decode_block)
            .collect()
    }
}

impl EntrySource for NotionClient {
    fn published_entries(&self) -> Result<Vec<SourceEntry>> {
        let pages = self.query_published()?;
        log::info!("{} published entries in database", pages.len());
        Ok(pages
            .into_iter()
            .map(|page| decode_entry(page, &self.settings))
            .collect())
    }
}
