//! External entities seen by the core
//!
//! Pages and keywords live in the entity store; the core reads the fields it
//! needs and, for keywords, writes back the "is forced" flag.

use chrono::{DateTime, Utc};
use seo_settings::{KeywordId, PageId, SiteId};
use seo_text::NormalizedText;
use serde::{Deserialize, Serialize};

/// Page of a site
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// Page ID
    pub id: PageId,
    /// Owning site (immutable)
    pub site_id: SiteId,
    /// Page URL
    pub url: String,
}

impl Page {
    /// Create page with a fresh ID
    #[inline]
    #[must_use]
    pub fn new(site_id: SiteId, url: impl Into<String>) -> Self {
        Self {
            id: PageId::new(),
            site_id,
            url: url.into(),
        }
    }
}

/// Keyword tracked for a site
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keyword {
    /// Keyword ID
    pub id: KeywordId,
    /// Owning site
    pub site_id: SiteId,
    /// Keyword text, normalized for matching
    pub text: NormalizedText,
    /// Always used for generation, regardless of ranking
    pub is_forced: bool,
    /// Last modification time
    pub date_updated: DateTime<Utc>,
}

impl Keyword {
    /// Default for [`Keyword::is_forced`]
    pub const DEFAULT_IS_FORCED: bool = false;

    /// Create keyword with a fresh ID
    #[must_use]
    pub fn new(site_id: SiteId, text: &str) -> Self {
        Self {
            id: KeywordId::new(),
            site_id,
            text: NormalizedText::new(text),
            is_forced: Self::DEFAULT_IS_FORCED,
            date_updated: Utc::now(),
        }
    }

    /// Set the forced flag and stamp the modification time
    pub fn set_forced(&mut self, is_forced: bool, now: DateTime<Utc>) {
        self.is_forced = is_forced;
        self.date_updated = now;
    }
}
