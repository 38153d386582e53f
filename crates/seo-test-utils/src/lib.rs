//! Testing utilities for the SEO metadata workspace
//!
//! Shared fixtures, spies and assertions.

#![allow(missing_docs)]

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use seo_core::{
    ChangePropagator, GenerationTypeChange, InMemoryKeywordStore, InMemoryPageDirectory, Keyword,
    Page, PipelineError, RegenerationPipeline, SetKeywordIsForcedHandler,
    SetPageSentenceGenerationTypeHandler, SiteOwnershipValidator,
};
use seo_settings::{
    GeneratorSettings, InMemorySettingsStore, PageId, PersistenceError, SettingsStore, SiteId,
    UserId,
};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Settings store that counts calls and can be told to fail reads or writes
#[derive(Debug, Default)]
pub struct SpyStore {
    inner: InMemorySettingsStore,
    reads: AtomicUsize,
    writes: AtomicUsize,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl SpyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inner(&self) -> &InMemorySettingsStore {
        &self.inner
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Write attempts, including failed ones
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn record_read(&self) -> Result<(), PersistenceError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            Err(PersistenceError::Unavailable("spy store read failure".to_string()))
        } else {
            Ok(())
        }
    }

    fn record_write(&self) -> Result<(), PersistenceError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            Err(PersistenceError::Unavailable("spy store write failure".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl SettingsStore for SpyStore {
    async fn page_settings_or_default(
        &self,
        page_id: PageId,
    ) -> Result<GeneratorSettings, PersistenceError> {
        self.record_read()?;
        self.inner.page_settings_or_default(page_id).await
    }

    async fn site_settings(&self, site_id: SiteId) -> Result<GeneratorSettings, PersistenceError> {
        self.record_read()?;
        self.inner.site_settings(site_id).await
    }

    async fn set_page_settings(
        &self,
        page_id: PageId,
        settings: GeneratorSettings,
        upsert_only: bool,
    ) -> Result<(), PersistenceError> {
        self.record_write()?;
        self.inner.set_page_settings(page_id, settings, upsert_only).await
    }

    async fn set_site_settings(
        &self,
        site_id: SiteId,
        settings: GeneratorSettings,
        upsert_only: bool,
    ) -> Result<(), PersistenceError> {
        self.record_write()?;
        self.inner.set_site_settings(site_id, settings, upsert_only).await
    }
}

/// Pipeline that records every delivery and can fail the first few
#[derive(Debug, Default)]
pub struct RecordingPipeline {
    received: Mutex<Vec<GenerationTypeChange>>,
    remaining_failures: AtomicUsize,
}

impl RecordingPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the first `failures` deliveries
    pub fn failing(failures: usize) -> Self {
        Self {
            received: Mutex::new(Vec::new()),
            remaining_failures: AtomicUsize::new(failures),
        }
    }

    /// Every delivery attempt, in order
    pub fn received(&self) -> Vec<GenerationTypeChange> {
        self.received.lock().clone()
    }
}

#[async_trait]
impl RegenerationPipeline for RecordingPipeline {
    async fn regenerate(&self, change: &GenerationTypeChange) -> Result<(), PipelineError> {
        self.received.lock().push(change.clone());
        let failed = self
            .remaining_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failed {
            Err(PipelineError("pipeline unavailable".to_string()))
        } else {
            Ok(())
        }
    }
}

/// One site with an owner, in-memory collaborators and both handlers
pub struct TestWorld {
    pub owner: UserId,
    pub site_id: SiteId,
    pub store: Arc<SpyStore>,
    pub pages: Arc<InMemoryPageDirectory>,
    pub keywords: Arc<InMemoryKeywordStore>,
    pub access: Arc<SiteOwnershipValidator>,
    pub page_handler: SetPageSentenceGenerationTypeHandler,
    pub keyword_handler: SetKeywordIsForcedHandler,
    pub changes: mpsc::Receiver<GenerationTypeChange>,
}

impl TestWorld {
    pub fn new() -> Self {
        Self::with_queue_capacity(64)
    }

    pub fn with_queue_capacity(capacity: usize) -> Self {
        let store = Arc::new(SpyStore::new());
        let pages = Arc::new(InMemoryPageDirectory::new());
        let keywords = Arc::new(InMemoryKeywordStore::new());
        let access = Arc::new(SiteOwnershipValidator::new(pages.clone(), keywords.clone()));

        let owner = UserId::new();
        let site_id = SiteId::new();
        access.grant(site_id, owner);

        let (propagator, changes) = ChangePropagator::new(capacity);
        let page_handler = SetPageSentenceGenerationTypeHandler::new(
            access.clone(),
            pages.clone(),
            store.clone(),
            propagator,
        );
        let keyword_handler = SetKeywordIsForcedHandler::new(access.clone(), keywords.clone());

        Self {
            owner,
            site_id,
            store,
            pages,
            keywords,
            access,
            page_handler,
            keyword_handler,
            changes,
        }
    }

    pub fn create_page(&self) -> Page {
        let page = Page::new(self.site_id, "https://example.com/products");
        self.pages.insert(page.clone());
        page
    }

    /// Page on a site the world's owner does not own
    pub fn create_foreign_page(&self) -> Page {
        let page = Page::new(SiteId::new(), "https://elsewhere.example.com/");
        self.pages.insert(page.clone());
        page
    }

    pub fn create_keyword(&self, text: &str) -> Keyword {
        let keyword = Keyword::new(self.site_id, text);
        self.keywords.insert(keyword.clone());
        keyword
    }

    /// Changes queued so far, without waiting
    pub fn drain_changes(&mut self) -> Vec<GenerationTypeChange> {
        let mut drained = Vec::new();
        while let Ok(change) = self.changes.try_recv() {
            drained.push(change);
        }
        drained
    }
}

impl Default for TestWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Assert `ts` lies within `tolerance` of now
pub fn assert_around_now(ts: DateTime<Utc>, tolerance: Duration) {
    let delta = (Utc::now() - ts).abs();
    assert!(
        delta <= tolerance,
        "timestamp {ts} is {delta} away from now (tolerance {tolerance})"
    );
}
