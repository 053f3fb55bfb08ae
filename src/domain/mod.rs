//! Domain layer - Content model and HTML rendering

pub mod block;
pub mod embed;
pub mod entry;
pub mod highlight;
pub mod list;
pub mod render;
pub mod rich_text;
pub mod slug;
pub mod table;

pub use block::{
    Annotations, BlockId, BlockKind, BlockSource, ContentBlock, HeadingLevel, MediaSource,
    RichTextSpan,
};
pub use entry::{listing_order, EntrySource, RenderedEntry, SourceEntry};
pub use highlight::CodeHighlighter;
pub use list::ListTag;
pub use render::{BlockRenderer, Diagnostic, RenderOptions};
pub use slug::{slugify, SlugAllocator};
pub use table::TableHeaderPolicy;
