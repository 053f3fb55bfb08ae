//! Syntax highlighting for code blocks
//!
//! Output is class-annotated `<span>` markup with no wrapping element, paired
//! with a stylesheet generated by [`CodeHighlighter::stylesheet`].

use html_escape::encode_text;
use syntect::highlighting::ThemeSet;
use syntect::html::{css_for_theme_with_class_style, ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

const CLASS_STYLE: ClassStyle = ClassStyle::SpacedPrefixed { prefix: "hl-" };

/// Result of highlighting one code block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Highlighted {
    pub html: String,
    /// False when the language was missing or unknown and plain text was used
    pub language_resolved: bool,
}

/// Loaded syntax definitions, shared by every code block of a build
pub struct CodeHighlighter {
    syntaxes: SyntaxSet,
    themes: ThemeSet,
}

impl CodeHighlighter {
    pub fn new() -> Self {
        CodeHighlighter {
            syntaxes: SyntaxSet::load_defaults_newlines(),
            themes: ThemeSet::load_defaults(),
        }
    }

    /// Highlight `code` written in `language` (case-insensitive, trimmed).
    ///
    /// Unknown or empty languages fall back to plain text. This never fails:
    /// if the highlighter itself errors, the escaped code is returned.
    pub fn highlight(&self, language: &str, code: &str) -> Highlighted {
        let (syntax, language_resolved) = match self.find_syntax(language) {
            Some(syntax) => (syntax, true),
            None => (self.syntaxes.find_syntax_plain_text(), false),
        };

        let html = match self.classed_html(syntax, code) {
            Ok(html) => html,
            Err(err) => {
                log::warn!("highlighting failed for language '{}': {}", language, err);
                encode_text(code).into_owned()
            }
        };

        Highlighted {
            html,
            language_resolved,
        }
    }

    /// Stylesheet for the named syntect theme, or `None` if it doesn't exist
    pub fn stylesheet(&self, theme_name: &str) -> Option<String> {
        let theme = self.themes.themes.get(theme_name)?;
        match css_for_theme_with_class_style(theme, CLASS_STYLE) {
            Ok(css) => Some(css),
            Err(err) => {
                log::warn!("could not build stylesheet for '{}': {}", theme_name, err);
                None
            }
        }
    }

    fn find_syntax(&self, language: &str) -> Option<&SyntaxReference> {
        let language = language.trim().to_lowercase();
        if language.is_empty() {
            return None;
        }
        self.syntaxes
            .find_syntax_by_token(&language)
            .or_else(|| self.syntaxes.find_syntax_by_extension(&language))
    }

    fn classed_html(
        &self,
        syntax: &SyntaxReference,
        code: &str,
    ) -> Result<String, syntect::Error> {
        let mut generator =
            ClassedHTMLGenerator::new_with_class_style(syntax, &self.syntaxes, CLASS_STYLE);
        for line in LinesWithEndings::from(code) {
            generator.parse_html_for_line_which_includes_newline(line)?;
        }
        Ok(generator.finalize())
    }
}

impl Default for CodeHighlighter {
    fn default() -> Self {
        Self::new()
    }
}
