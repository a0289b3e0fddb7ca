//! Anchor normalization and per-document anchor bookkeeping.
//!
//! Every dialect shares one anchor alphabet, `[0-9a-z_-]`, which is valid as
//! an AsciiDoc block id, an HTML `name` attribute and a Confluence anchor.
//! A token produced here can therefore be referenced from any dialect.

use std::collections::HashMap;

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::error::{Error, Result};

/// Separator placed between words, after the prefix, and before
/// disambiguation counters.
pub const ANCHOR_SEPARATOR: char = '_';

/// Punctuation that separates words in a title. Everything else outside the
/// anchor alphabet is dropped.
const WORD_BREAKS: &[char] = &[
    '@', '#', '&', '(', ')', '{', '}', '[', ']', '!', '$', '*', '%', '+', '=', '/', ':', '.', ';',
    ',', '?', '\\', '<', '>', '|', '\'', '"', '~', '^', '`',
];

fn is_separator(c: char) -> bool {
    c == '_' || c == '-'
}

/// Reduce text to the anchor alphabet.
///
/// Accents are stripped through NFKD decomposition, word breaks become `_`,
/// separator runs collapse to their first character and leading/trailing
/// separators are removed.
fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    // Starts true so leading separators are never emitted.
    let mut after_separator = true;

    for c in text.nfkd().filter(|c| !is_combining_mark(*c)) {
        let mapped = if c.is_whitespace() || WORD_BREAKS.contains(&c) {
            ANCHOR_SEPARATOR
        } else if c.is_ascii_alphanumeric() || is_separator(c) {
            c.to_ascii_lowercase()
        } else {
            continue;
        };

        if is_separator(mapped) {
            if !after_separator {
                slug.push(mapped);
                after_separator = true;
            }
        } else {
            slug.push(mapped);
            after_separator = false;
        }
    }

    while slug.ends_with(is_separator) {
        slug.pop();
    }
    slug
}

/// Normalize a title or caller-supplied anchor into an anchor token.
///
/// Without a prefix the token is the slug preceded by `_` (the form AsciiDoc
/// uses for generated section ids). With a prefix it is `<prefix>_<slug>`;
/// input that already carries the prefix is left alone so normalization is
/// idempotent.
///
/// # Example
///
/// ```
/// use markupdoc::normalize_anchor;
///
/// assert_eq!(normalize_anchor("API Overview", None)?, "_api_overview");
/// assert_eq!(normalize_anchor("Intro", Some("doc1"))?, "doc1_intro");
/// assert_eq!(normalize_anchor("_api_overview", None)?, "_api_overview");
/// # Ok::<(), markupdoc::Error>(())
/// ```
pub fn normalize_anchor(title: &str, prefix: Option<&str>) -> Result<String> {
    if title.trim().is_empty() {
        return Err(Error::InvalidAnchor("anchor source is blank".to_string()));
    }

    let slug = slugify(title);
    if slug.is_empty() {
        return Err(Error::InvalidAnchor(format!(
            "'{title}' contains no anchor-safe characters"
        )));
    }

    let prefix = prefix.map(slugify).filter(|p| !p.is_empty());
    let token = match prefix {
        Some(prefix) => {
            let already_prefixed = slug
                .strip_prefix(prefix.as_str())
                .is_some_and(|rest| rest.starts_with(ANCHOR_SEPARATOR));
            if already_prefixed {
                slug
            } else {
                format!("{prefix}{ANCHOR_SEPARATOR}{slug}")
            }
        }
        None => format!("{ANCHOR_SEPARATOR}{slug}"),
    };

    Ok(token)
}

/// Anchors registered in one document, in registration order.
///
/// Maps each token to the text shown when a cross-reference to it carries no
/// text of its own.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnchorRegistry {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl AnchorRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `token`, returning the token actually stored.
    ///
    /// A token that is already taken gets `_2`, `_3`, ... appended, using the
    /// smallest counter that is still free.
    pub fn register(&mut self, token: &str, display: impl Into<String>) -> String {
        let mut unique = token.to_string();
        let mut counter = 2usize;
        while self.index.contains_key(&unique) {
            unique = format!("{token}{ANCHOR_SEPARATOR}{counter}");
            counter += 1;
        }
        if unique != token {
            tracing::debug!(anchor = token, registered = %unique, "anchor collision resolved");
        }

        self.index.insert(unique.clone(), self.entries.len());
        self.entries.push((unique.clone(), display.into()));
        unique
    }

    /// Check whether a token is registered.
    pub fn contains(&self, token: &str) -> bool {
        self.index.contains_key(token)
    }

    /// Display text registered for a token.
    pub fn display_text(&self, token: &str) -> Option<&str> {
        self.index
            .get(token)
            .map(|&i| self.entries[i].1.as_str())
    }

    /// The most recently registered token.
    pub fn last(&self) -> Option<&str> {
        self.entries.last().map(|(token, _)| token.as_str())
    }

    /// Iterate over `(token, display text)` pairs in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(token, display)| (token.as_str(), display.as_str()))
    }

    /// Number of registered anchors.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no anchor is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Forget all anchors.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("API Overview"), "api_overview");
        assert_eq!(slugify("  Multiple   Spaces  "), "multiple_spaces");
        assert_eq!(slugify("GET /pets/{petId}"), "get_pets_petid");
    }

    #[test]
    fn test_slugify_collapses_mixed_separators() {
        assert_eq!(slugify("a - b"), "a_b");
        assert_eq!(slugify("--leading-and-trailing--"), "leading-and-trailing");
        assert_eq!(slugify("snake__case"), "snake_case");
    }

    #[test]
    fn test_slugify_strips_accents() {
        assert_eq!(slugify("Café Crème"), "cafe_creme");
        assert_eq!(slugify("Ångström"), "angstrom");
    }

    #[test]
    fn test_slugify_drops_non_latin() {
        assert_eq!(slugify("Pet 日本"), "pet");
        assert_eq!(slugify("日本語"), "");
    }

    #[test]
    fn test_normalize_without_prefix() {
        assert_eq!(normalize_anchor("API Overview", None).unwrap(), "_api_overview");
        assert_eq!(normalize_anchor("Paths", Some("")).unwrap(), "_paths");
        assert_eq!(normalize_anchor("Paths", Some("  ")).unwrap(), "_paths");
    }

    #[test]
    fn test_normalize_with_prefix() {
        assert_eq!(normalize_anchor("Intro", Some("doc1")).unwrap(), "doc1_intro");
        assert_eq!(
            normalize_anchor("Get Pet", Some("Paths Doc")).unwrap(),
            "paths_doc_get_pet"
        );
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let titles = [
            "API Overview",
            "  weird -- Title!! ",
            "Café/Crème",
            "_already_normal",
            "doc1",
            "x",
        ];
        for prefix in [None, Some("doc1"), Some("Other Prefix")] {
            for title in titles {
                let once = normalize_anchor(title, prefix).unwrap();
                let twice = normalize_anchor(&once, prefix).unwrap();
                assert_eq!(once, twice, "title {title:?} prefix {prefix:?}");
            }
        }
    }

    #[test]
    fn test_normalize_rejects_blank_and_empty() {
        assert!(matches!(
            normalize_anchor("", None),
            Err(Error::InvalidAnchor(_))
        ));
        assert!(matches!(
            normalize_anchor("   ", Some("p")),
            Err(Error::InvalidAnchor(_))
        ));
        assert!(matches!(
            normalize_anchor("!!! ???", None),
            Err(Error::InvalidAnchor(_))
        ));
    }

    #[test]
    fn test_registry_disambiguates() {
        let mut registry = AnchorRegistry::new();
        assert_eq!(registry.register("_intro", "Intro"), "_intro");
        assert_eq!(registry.register("_intro", "Intro"), "_intro_2");
        assert_eq!(registry.register("_intro", "intro"), "_intro_3");
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.last(), Some("_intro_3"));
        assert_eq!(registry.display_text("_intro_2"), Some("Intro"));
    }

    #[test]
    fn test_registry_skips_taken_suffix() {
        let mut registry = AnchorRegistry::new();
        registry.register("_a_2", "explicit");
        registry.register("_a", "first");
        assert_eq!(registry.register("_a", "second"), "_a_3");
    }

    #[test]
    fn test_registry_clear() {
        let mut registry = AnchorRegistry::new();
        registry.register("_x", "X");
        registry.clear();
        assert!(registry.is_empty());
        assert!(!registry.contains("_x"));
        assert_eq!(registry.last(), None);
    }
}
