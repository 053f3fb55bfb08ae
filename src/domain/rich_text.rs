//! Rich text composition
//!
//! Styles are layered in a fixed order regardless of which flags are set:
//! code innermost, then bold, italic, strikethrough, underline, and the link
//! outermost. Literal text and hrefs are escaped; the generated tags are not.

use super::block::RichTextSpan;
use html_escape::{encode_double_quoted_attribute, encode_text};

/// Compose a sequence of spans into one HTML string
pub fn compose(spans: &[RichTextSpan]) -> String {
    spans.iter().map(compose_span).collect()
}

/// Compose a single span
pub fn compose_span(span: &RichTextSpan) -> String {
    let mut html = encode_text(&span.plain_text).into_owned();
    let ann = &span.annotations;

    if ann.code {
        html = format!("<code>{}</code>", html);
    }
    if ann.bold {
        html = format!("<strong>{}</strong>", html);
    }
    if ann.italic {
        html = format!("<em>{}</em>", html);
    }
    if ann.strikethrough {
        html = format!("<del>{}</del>", html);
    }
    if ann.underline {
        html = format!("<u>{}</u>", html);
    }
    if let Some(href) = &span.href {
        html = format!(
            "<a href=\"{}\">{}</a>",
            encode_double_quoted_attribute(href),
            html
        );
    }

    html
}

/// Concatenate the raw text of all spans, ignoring annotations
pub fn plain_text(spans: &[RichTextSpan]) -> String {
    spans.iter().map(|s| s.plain_text.as_str()).collect()
}
