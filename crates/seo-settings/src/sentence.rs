//! Sentence categories and generation strategies

use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of generated text a setting applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SentenceType {
    /// `<title>` element
    Title,
    /// Meta description
    Description,
    /// Main heading
    H1,
    /// Meta keywords
    Keywords,
    /// Sentinel for unknown or missing input; never stored
    #[serde(other)]
    Invalid,
}

impl SentenceType {
    /// Every type that may carry a setting
    pub const ALL: [SentenceType; 4] = [
        SentenceType::Title,
        SentenceType::Description,
        SentenceType::H1,
        SentenceType::Keywords,
    ];

    /// Check for the invalid sentinel
    #[inline]
    #[must_use]
    pub fn is_invalid(self) -> bool {
        self == SentenceType::Invalid
    }

    /// Stable lowercase name
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SentenceType::Invalid => "invalid",
            SentenceType::Title => "title",
            SentenceType::Description => "description",
            SentenceType::H1 => "h1",
            SentenceType::Keywords => "keywords",
        }
    }

    /// Parse a name, mapping anything unknown to [`SentenceType::Invalid`]
    #[must_use]
    pub fn parse_lossy(name: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(name.trim()))
            .unwrap_or(SentenceType::Invalid)
    }
}

impl fmt::Display for SentenceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strategy used to produce a sentence
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SentenceGenerationType {
    /// Generated from page content
    Auto,
    /// Rendered from a site template
    Template,
    /// Entered by a user, never regenerated
    Manual,
    /// Not produced at all
    Disabled,
    /// Sentinel for unknown or missing input; never stored
    #[serde(other)]
    Invalid,
}

impl SentenceGenerationType {
    /// Every selectable strategy
    pub const ALL: [SentenceGenerationType; 4] = [
        SentenceGenerationType::Auto,
        SentenceGenerationType::Template,
        SentenceGenerationType::Manual,
        SentenceGenerationType::Disabled,
    ];

    /// Check for the invalid sentinel
    #[inline]
    #[must_use]
    pub fn is_invalid(self) -> bool {
        self == SentenceGenerationType::Invalid
    }

    /// Stable lowercase name
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SentenceGenerationType::Invalid => "invalid",
            SentenceGenerationType::Auto => "auto",
            SentenceGenerationType::Template => "template",
            SentenceGenerationType::Manual => "manual",
            SentenceGenerationType::Disabled => "disabled",
        }
    }

    /// Parse a name, mapping anything unknown to [`SentenceGenerationType::Invalid`]
    #[must_use]
    pub fn parse_lossy(name: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(name.trim()))
            .unwrap_or(SentenceGenerationType::Invalid)
    }
}

impl fmt::Display for SentenceGenerationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
