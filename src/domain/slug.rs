//! URL slugs for entry titles

use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

const FALLBACK_SLUG: &str = "post";

fn separator_regex() -> &'static Regex {
    static SEPARATORS: OnceLock<Regex> = OnceLock::new();
    SEPARATORS.get_or_init(|| Regex::new(r"[^\p{Alphabetic}\p{Nd}]+").expect("valid regex"))
}

/// Lowercase the title and join its alphanumeric runs with hyphens.
///
/// Returns `"post"` when nothing usable is left.
pub fn slugify(title: &str) -> String {
    let lower = title.to_lowercase();
    let slug = separator_regex().replace_all(&lower, "-");
    let slug = slug.trim_matches('-');
    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug.to_string()
    }
}

/// Hands out unique slugs within one build
#[derive(Debug, Default)]
pub struct SlugAllocator {
    seen: HashMap<String, usize>,
}

impl SlugAllocator {
    /// Slug for `title`, suffixed with `-2`, `-3`, ... on collisions
    pub fn allocate(&mut self, title: &str) -> String {
        let base = slugify(title);
        let mut count = self.seen.get(&base).copied().unwrap_or(0);
        loop {
            count += 1;
            let candidate = if count == 1 {
                base.clone()
            } else {
                format!("{}-{}", base, count)
            };
            if !self.seen.contains_key(&candidate) {
                self.seen.insert(base.clone(), count);
                if candidate != base {
                    self.seen.insert(candidate.clone(), 1);
                }
                return candidate;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_ascii() {
        assert_eq!(slugify("Hello, World!"), "hello-world");
        assert_eq!(slugify("  Rust 2024 edition  "), "rust-2024-edition");
    }

    #[test]
    fn test_slugify_keeps_unicode_letters() {
        assert_eq!(slugify("今日の天気"), "今日の天気");
        assert_eq!(slugify("Café au lait"), "café-au-lait");
    }

    #[test]
    fn test_slugify_fallback() {
        assert_eq!(slugify(""), "post");
        assert_eq!(slugify("!!! ???"), "post");
    }

    #[test]
    fn test_allocator_suffixes_duplicates() {
        let mut slugs = SlugAllocator::default();
        assert_eq!(slugs.allocate("Notes"), "notes");
        assert_eq!(slugs.allocate("notes"), "notes-2");
        assert_eq!(slugs.allocate("NOTES!"), "notes-3");
        assert_eq!(slugs.allocate("Other"), "other");
    }

    #[test]
    fn test_allocator_avoids_natural_collision() {
        let mut slugs = SlugAllocator::default();
        assert_eq!(slugs.allocate("a 2"), "a-2");
        assert_eq!(slugs.allocate("a"), "a");
        assert_eq!(slugs.allocate("a"), "a-3");
    }
}
