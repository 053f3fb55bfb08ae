//! Table rendering and header-cell policies

use super::block::RichTextSpan;
use super::rich_text::compose;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Cell text prefix marking a header cell under [`TableHeaderPolicy::Prefix`]
pub const HEADER_PREFIX: &str = "[th]";
/// Cell text prefix marking a corner header cell under [`TableHeaderPolicy::Prefix`]
pub const CORNER_PREFIX: &str = "[corner]";

const CORNER_DIVIDER: &str = "<svg class=\"corner-divider\" viewBox=\"0 0 100 100\" \
    preserveAspectRatio=\"none\" aria-hidden=\"true\">\
    <line x1=\"0\" y1=\"0\" x2=\"100\" y2=\"100\" stroke=\"currentColor\" \
    vector-effect=\"non-scaling-stroke\"/></svg>";

/// How header cells are chosen in a table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TableHeaderPolicy {
    /// The first row is the header row
    #[default]
    Positional,
    /// Cells opt in with a `[th]` or `[corner]` text prefix
    Prefix,
}

impl FromStr for TableHeaderPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "positional" => Ok(TableHeaderPolicy::Positional),
            "prefix" => Ok(TableHeaderPolicy::Prefix),
            _ => Err(format!(
                "Invalid table_headers: '{}'. Valid values are: positional, prefix",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CellRole {
    Header,
    Corner,
    Data,
}

/// Render table rows (each a list of cells) into one `<table>`
pub fn render_table(rows: &[&[Vec<RichTextSpan>]], policy: TableHeaderPolicy) -> String {
    let mut html = String::from("<table>");
    for (index, cells) in rows.iter().enumerate() {
        html.push_str("<tr>");
        for cell in cells.iter() {
            html.push_str(&render_cell(cell, index, policy));
        }
        html.push_str("</tr>");
    }
    html.push_str("</table>");
    html
}

fn render_cell(cell: &[RichTextSpan], row_index: usize, policy: TableHeaderPolicy) -> String {
    let (role, content) = match policy {
        TableHeaderPolicy::Positional => {
            let role = if row_index == 0 {
                CellRole::Header
            } else {
                CellRole::Data
            };
            (role, compose(cell))
        }
        TableHeaderPolicy::Prefix => {
            if let Some(rest) = strip_cell_prefix(cell, CORNER_PREFIX) {
                (CellRole::Corner, compose(&rest))
            } else if let Some(rest) = strip_cell_prefix(cell, HEADER_PREFIX) {
                (CellRole::Header, compose(&rest))
            } else {
                (CellRole::Data, compose(cell))
            }
        }
    };

    match role {
        CellRole::Header => format!("<th>{}</th>", content),
        CellRole::Data => format!("<td>{}</td>", content),
        CellRole::Corner => format!(
            "<th class=\"corner\">{}<span>{}</span></th>",
            CORNER_DIVIDER, content
        ),
    }
}

/// Remove `prefix` from the start of the cell's first span, if present
fn strip_cell_prefix(cell: &[RichTextSpan], prefix: &str) -> Option<Vec<RichTextSpan>> {
    let first = cell.first()?;
    let rest = first.plain_text.strip_prefix(prefix)?;

    let mut spans = cell.to_vec();
    spans[0].plain_text = rest.trim_start().to_string();
    Some(spans)
}
