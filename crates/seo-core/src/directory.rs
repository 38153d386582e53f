//! Entity lookup boundaries
//!
//! [`PageDirectory`] and [`KeywordStore`] front the external entity store.
//! The in-memory implementations back tests and the demo binary.

use crate::entities::{Keyword, Page};
use async_trait::async_trait;
use dashmap::DashMap;
use seo_settings::{KeywordId, PageId, PersistenceError};

/// Page lookup
#[async_trait]
pub trait PageDirectory: Send + Sync {
    /// Page by ID, `None` when it does not exist
    async fn get_by_id(&self, page_id: PageId) -> Result<Option<Page>, PersistenceError>;
}

/// Keyword lookup and persistence
#[async_trait]
pub trait KeywordStore: Send + Sync {
    /// Keyword by ID, `None` when it does not exist
    async fn get_by_id(&self, keyword_id: KeywordId) -> Result<Option<Keyword>, PersistenceError>;

    /// Insert or replace a keyword
    async fn save(&self, keyword: Keyword) -> Result<(), PersistenceError>;
}

/// Process-local page directory
#[derive(Debug, Default)]
pub struct InMemoryPageDirectory {
    pages: DashMap<PageId, Page>,
}

impl InMemoryPageDirectory {
    /// Create empty directory
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a page
    pub fn insert(&self, page: Page) {
        self.pages.insert(page.id, page);
    }

    /// Number of pages
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Check if directory is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

#[async_trait]
impl PageDirectory for InMemoryPageDirectory {
    async fn get_by_id(&self, page_id: PageId) -> Result<Option<Page>, PersistenceError> {
        Ok(self.pages.get(&page_id).map(|p| p.clone()))
    }
}

/// Process-local keyword store
#[derive(Debug, Default)]
pub struct InMemoryKeywordStore {
    keywords: DashMap<KeywordId, Keyword>,
}

impl InMemoryKeywordStore {
    /// Create empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a keyword
    pub fn insert(&self, keyword: Keyword) {
        self.keywords.insert(keyword.id, keyword);
    }
}

#[async_trait]
impl KeywordStore for InMemoryKeywordStore {
    async fn get_by_id(&self, keyword_id: KeywordId) -> Result<Option<Keyword>, PersistenceError> {
        Ok(self.keywords.get(&keyword_id).map(|k| k.clone()))
    }

    async fn save(&self, keyword: Keyword) -> Result<(), PersistenceError> {
        self.keywords.insert(keyword.id, keyword);
        Ok(())
    }
}
