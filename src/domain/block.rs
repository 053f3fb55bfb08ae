//! Content block model
//!
//! Blocks are decoded from the Notion wire format by the infrastructure layer
//! and only ever read by the renderer.

use crate::error::Result;
use std::fmt;

/// Opaque block (or page) identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(String);

impl BlockId {
    pub fn new(id: impl Into<String>) -> Self {
        BlockId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Inline style flags of a rich text span
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Annotations {
    pub bold: bool,
    pub italic: bool,
    pub strikethrough: bool,
    pub underline: bool,
    pub code: bool,
}

/// A run of text with a uniform set of annotations
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RichTextSpan {
    pub plain_text: String,
    pub annotations: Annotations,
    pub href: Option<String>,
}

impl RichTextSpan {
    /// Create an unstyled span
    pub fn plain(text: impl Into<String>) -> Self {
        RichTextSpan {
            plain_text: text.into(),
            ..Default::default()
        }
    }

    pub fn with_annotations(mut self, annotations: Annotations) -> Self {
        self.annotations = annotations;
        self
    }

    pub fn with_href(mut self, href: impl Into<String>) -> Self {
        self.href = Some(href.into());
        self
    }
}

/// Where an image or video lives
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaSource {
    pub external: Option<String>,
    pub file: Option<String>,
}

impl MediaSource {
    /// Resolve the media URL, preferring an external link over an attached file
    pub fn url(&self) -> &str {
        self.external
            .as_deref()
            .filter(|url| !url.is_empty())
            .or(self.file.as_deref())
            .unwrap_or("")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
}

impl HeadingLevel {
    pub fn from_number(level: u8) -> Option<Self> {
        match level {
            1 => Some(HeadingLevel::H1),
            2 => Some(HeadingLevel::H2),
            3 => Some(HeadingLevel::H3),
            _ => None,
        }
    }

    pub fn number(&self) -> u8 {
        match self {
            HeadingLevel::H1 => 1,
            HeadingLevel::H2 => 2,
            HeadingLevel::H3 => 3,
        }
    }
}

/// Kind-specific payload of a block
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockKind {
    Paragraph(Vec<RichTextSpan>),
    Heading {
        level: HeadingLevel,
        text: Vec<RichTextSpan>,
    },
    Quote(Vec<RichTextSpan>),
    Code {
        language: String,
        text: Vec<RichTextSpan>,
    },
    BulletedItem(Vec<RichTextSpan>),
    NumberedItem(Vec<RichTextSpan>),
    ToDo {
        checked: bool,
        text: Vec<RichTextSpan>,
    },
    /// Rows arrive as children of the table block
    Table,
    TableRow {
        cells: Vec<Vec<RichTextSpan>>,
    },
    Embed {
        url: String,
    },
    Video(MediaSource),
    Divider,
    Image {
        source: MediaSource,
        caption: Vec<RichTextSpan>,
    },
    /// Any kind this renderer has no dedicated markup for
    Unsupported {
        kind: String,
        text: Vec<RichTextSpan>,
    },
}

/// One unit of structured content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentBlock {
    pub id: BlockId,
    pub has_children: bool,
    pub kind: BlockKind,
}

impl ContentBlock {
    pub fn new(id: impl Into<String>, kind: BlockKind) -> Self {
        ContentBlock {
            id: BlockId::new(id),
            has_children: false,
            kind,
        }
    }

    pub fn with_children(mut self, has_children: bool) -> Self {
        self.has_children = has_children;
        self
    }

    /// Wire name of this block's kind, used in diagnostics
    pub fn kind_name(&self) -> &str {
        match &self.kind {
            BlockKind::Paragraph(_) => "paragraph",
            BlockKind::Heading { level, .. } => match level {
                HeadingLevel::H1 => "heading_1",
                HeadingLevel::H2 => "heading_2",
                HeadingLevel::H3 => "heading_3",
            },
            BlockKind::Quote(_) => "quote",
            BlockKind::Code { .. } => "code",
            BlockKind::BulletedItem(_) => "bulleted_list_item",
            BlockKind::NumberedItem(_) => "numbered_list_item",
            BlockKind::ToDo { .. } => "to_do",
            BlockKind::Table => "table",
            BlockKind::TableRow { .. } => "table_row",
            BlockKind::Embed { .. } => "embed",
            BlockKind::Video(_) => "video",
            BlockKind::Divider => "divider",
            BlockKind::Image { .. } => "image",
            BlockKind::Unsupported { kind, .. } => kind,
        }
    }
}

/// Capability to fetch the direct children of a block
pub trait BlockSource {
    /// Children of `id`, in document order
    fn children(&self, id: &BlockId) -> Result<Vec<ContentBlock>>;
}
