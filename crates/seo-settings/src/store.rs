//! Settings persistence boundary
//!
//! [`SettingsStore`] is the seam to the external entity store. Reads of a
//! missing record return an empty (default) record; writes either replace the
//! record or merge into it. Content is not validated here.

use crate::error::PersistenceError;
use crate::ids::{PageId, SiteId};
use crate::settings::GeneratorSettings;
use async_trait::async_trait;
use dashmap::DashMap;
use std::hash::Hash;

/// Read/write access to page and site generator settings
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Page record, or an empty record when the page has no override
    async fn page_settings_or_default(
        &self,
        page_id: PageId,
    ) -> Result<GeneratorSettings, PersistenceError>;

    /// Site record, or an empty record when the site has no override
    async fn site_settings(&self, site_id: SiteId) -> Result<GeneratorSettings, PersistenceError>;

    /// Persist a page record
    ///
    /// With `upsert_only` the given entries are merged into the stored record
    /// and unrelated keys survive; otherwise the record is replaced.
    async fn set_page_settings(
        &self,
        page_id: PageId,
        settings: GeneratorSettings,
        upsert_only: bool,
    ) -> Result<(), PersistenceError>;

    /// Persist a site record, same semantics as [`SettingsStore::set_page_settings`]
    async fn set_site_settings(
        &self,
        site_id: SiteId,
        settings: GeneratorSettings,
        upsert_only: bool,
    ) -> Result<(), PersistenceError>;
}

/// Process-local store, used by tests and the demo binary
#[derive(Debug, Default)]
pub struct InMemorySettingsStore {
    pages: DashMap<PageId, GeneratorSettings>,
    sites: DashMap<SiteId, GeneratorSettings>,
}

impl InMemorySettingsStore {
    /// Create empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of page records
    #[inline]
    #[must_use]
    pub fn page_record_count(&self) -> usize {
        self.pages.len()
    }

    /// Number of site records
    #[inline]
    #[must_use]
    pub fn site_record_count(&self) -> usize {
        self.sites.len()
    }
}

fn read_or_default<K: Eq + Hash>(
    map: &DashMap<K, GeneratorSettings>,
    key: &K,
) -> GeneratorSettings {
    map.get(key).map(|entry| entry.clone()).unwrap_or_default()
}

fn write<K: Eq + Hash>(
    map: &DashMap<K, GeneratorSettings>,
    key: K,
    settings: GeneratorSettings,
    upsert_only: bool,
) {
    if upsert_only {
        map.entry(key).or_default().merge_from(&settings);
    } else {
        map.insert(key, settings);
    }
}

#[async_trait]
impl SettingsStore for InMemorySettingsStore {
    async fn page_settings_or_default(
        &self,
        page_id: PageId,
    ) -> Result<GeneratorSettings, PersistenceError> {
        Ok(read_or_default(&self.pages, &page_id))
    }

    async fn site_settings(&self, site_id: SiteId) -> Result<GeneratorSettings, PersistenceError> {
        Ok(read_or_default(&self.sites, &site_id))
    }

    async fn set_page_settings(
        &self,
        page_id: PageId,
        settings: GeneratorSettings,
        upsert_only: bool,
    ) -> Result<(), PersistenceError> {
        tracing::trace!(%page_id, upsert_only, entries = settings.len(), "writing page settings");
        write(&self.pages, page_id, settings, upsert_only);
        Ok(())
    }

    async fn set_site_settings(
        &self,
        site_id: SiteId,
        settings: GeneratorSettings,
        upsert_only: bool,
    ) -> Result<(), PersistenceError> {
        tracing::trace!(%site_id, upsert_only, entries = settings.len(), "writing site settings");
        write(&self.sites, site_id, settings, upsert_only);
        Ok(())
    }
}
