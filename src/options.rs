//! Builder configuration.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::language::MarkupLanguage;

/// Construction-time configuration of a [`MarkupDocBuilder`](crate::MarkupDocBuilder).
///
/// The dialect is fixed for the lifetime of a builder. The anchor prefix is
/// the initial value; it can be changed later with
/// [`with_anchor_prefix`](crate::MarkupDocBuilder::with_anchor_prefix) and
/// returns to this value when the builder is cleared by a write.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderOptions {
    /// Target markup dialect
    pub language: MarkupLanguage,

    /// Prefix for every generated anchor
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anchor_prefix: Option<String>,
}

impl BuilderOptions {
    /// Create options for a dialect.
    pub fn new(language: MarkupLanguage) -> Self {
        Self {
            language,
            anchor_prefix: None,
        }
    }

    /// Set the anchor prefix. A blank prefix means no prefix.
    pub fn with_anchor_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.anchor_prefix = normalize_prefix(Some(prefix.into()));
        self
    }

    /// Set the target dialect.
    pub fn with_language(mut self, language: MarkupLanguage) -> Self {
        self.language = language;
        self
    }

    /// Load options from JSON, e.g. `{"language": "markdown", "anchor_prefix": "api"}`.
    pub fn from_json(json: &str) -> Result<Self> {
        let mut options: Self = serde_json::from_str(json)?;
        options.anchor_prefix = normalize_prefix(options.anchor_prefix.take());
        Ok(options)
    }
}

/// Trim a prefix and drop it when blank.
pub(crate) fn normalize_prefix(prefix: Option<String>) -> Option<String> {
    prefix
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
}
