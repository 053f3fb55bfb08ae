//! Source entries and their rendered form

use super::block::{BlockId, BlockSource};
use crate::error::Result;
use chrono::NaiveDate;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeSet;

/// Page-level properties of one published database entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEntry {
    pub id: BlockId,
    pub title: String,
    pub summary: Option<String>,
    pub tags: BTreeSet<String>,
    pub date: Option<NaiveDate>,
}

impl SourceEntry {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        SourceEntry {
            id: BlockId::new(id),
            title: title.into(),
            summary: None,
            tags: BTreeSet::new(),
            date: None,
        }
    }
}

/// A data source that can list published entries and fetch their blocks
pub trait EntrySource: BlockSource {
    /// All entries flagged as published
    fn published_entries(&self) -> Result<Vec<SourceEntry>>;
}

/// One fully rendered entry, ready to be written
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedEntry {
    pub title: String,
    pub slug: String,
    pub content_html: String,
    pub summary: Option<String>,
    pub tags: BTreeSet<String>,
    pub date: Option<NaiveDate>,
}

impl RenderedEntry {
    /// Site-relative URL of the entry page
    pub fn url(&self) -> String {
        format!("posts/{}/index.html", self.slug)
    }
}

/// Newest first; undated entries last, ties broken by title
pub fn listing_order(a: &RenderedEntry, b: &RenderedEntry) -> Ordering {
    match (a.date, b.date) {
        (Some(da), Some(db)) => db.cmp(&da).then_with(|| a.title.cmp(&b.title)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.title.cmp(&b.title),
    }
}
