//! Command inputs
//!
//! Commands arrive from the transport layer with raw identifiers; enum fields
//! may carry the `Invalid` sentinel when the caller sent something unknown.

use seo_settings::{SentenceGenerationType, SentenceType, UserId};
use serde::{Deserialize, Serialize};

/// Change how one sentence type of a page is generated
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetPageSentenceGenerationTypeCommand {
    /// Authenticated user, `None` for anonymous calls
    #[serde(default)]
    pub actor: Option<UserId>,
    /// Page identifier as received
    pub page_id: String,
    /// Sentence category to change
    pub sentence_type: SentenceType,
    /// New strategy
    pub sentence_generation_type: SentenceGenerationType,
}

impl SetPageSentenceGenerationTypeCommand {
    /// Create command
    #[must_use]
    pub fn new(
        actor: Option<UserId>,
        page_id: impl Into<String>,
        sentence_type: SentenceType,
        sentence_generation_type: SentenceGenerationType,
    ) -> Self {
        Self {
            actor,
            page_id: page_id.into(),
            sentence_type,
            sentence_generation_type,
        }
    }
}

/// Force (or stop forcing) a keyword into generated metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetKeywordIsForcedCommand {
    /// Authenticated user, `None` for anonymous calls
    #[serde(default)]
    pub actor: Option<UserId>,
    /// Keyword identifier as received
    pub keyword_id: String,
    /// New flag value
    pub is_forced: bool,
}

impl SetKeywordIsForcedCommand {
    /// Create command
    #[must_use]
    pub fn new(actor: Option<UserId>, keyword_id: impl Into<String>, is_forced: bool) -> Self {
        Self {
            actor,
            keyword_id: keyword_id.into(),
            is_forced,
        }
    }
}
