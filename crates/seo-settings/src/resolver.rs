//! Override chain resolution
//!
//! Effective settings for a page come from the first *concrete* record in the
//! chain page → site → global default. Records are never merged field by field
//! across tiers: a page that overrides one sentence type shadows the whole site
//! record, and its unset types fall back to the global default.

use crate::error::PersistenceError;
use crate::ids::{PageId, SiteId};
use crate::sentence::{SentenceGenerationType, SentenceType};
use crate::settings::GeneratorSettings;
use crate::store::SettingsStore;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Tier that supplied the effective settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingsSource {
    /// Page-level override
    Page,
    /// Site-level default
    Site,
    /// Hard-coded global default
    Global,
}

impl SettingsSource {
    /// Lookup order
    pub const CHAIN: [SettingsSource; 3] =
        [SettingsSource::Page, SettingsSource::Site, SettingsSource::Global];
}

impl fmt::Display for SettingsSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SettingsSource::Page => "page",
            SettingsSource::Site => "site",
            SettingsSource::Global => "global",
        })
    }
}

/// Effective settings together with the tier they came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSettings {
    /// Winning record (never default)
    pub settings: GeneratorSettings,
    /// Tier of the winning record
    pub source: SettingsSource,
}

/// Resolves and mutates generator settings
#[derive(Clone)]
pub struct SettingsResolver {
    store: Arc<dyn SettingsStore>,
}

impl fmt::Debug for SettingsResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SettingsResolver").finish_non_exhaustive()
    }
}

impl SettingsResolver {
    /// Create resolver over a store
    #[inline]
    #[must_use]
    pub fn new(store: Arc<dyn SettingsStore>) -> Self {
        Self { store }
    }

    /// Underlying store
    #[inline]
    #[must_use]
    pub fn store(&self) -> &Arc<dyn SettingsStore> {
        &self.store
    }

    /// Effective settings for a page of `site_id`
    ///
    /// Tiers are consulted strictly in [`SettingsSource::CHAIN`] order and the
    /// lookup stops at the first concrete record; later tiers are not read.
    ///
    /// # Errors
    /// Returns the store's error if a page or site read fails.
    pub async fn resolve(
        &self,
        page_id: PageId,
        site_id: SiteId,
    ) -> Result<ResolvedSettings, PersistenceError> {
        for source in SettingsSource::CHAIN {
            let settings = match source {
                SettingsSource::Page => self.store.page_settings_or_default(page_id).await?,
                SettingsSource::Site => self.store.site_settings(site_id).await?,
                SettingsSource::Global => GeneratorSettings::global_default().clone(),
            };

            if !settings.is_default() {
                tracing::trace!(%page_id, %site_id, %source, "resolved generator settings");
                return Ok(ResolvedSettings { settings, source });
            }
        }

        Ok(ResolvedSettings {
            settings: GeneratorSettings::global_default().clone(),
            source: SettingsSource::Global,
        })
    }

    /// Effective settings only
    ///
    /// # Errors
    /// See [`SettingsResolver::resolve`].
    pub async fn resolve_settings(
        &self,
        page_id: PageId,
        site_id: SiteId,
    ) -> Result<GeneratorSettings, PersistenceError> {
        self.resolve(page_id, site_id).await.map(|r| r.settings)
    }

    /// Set one entry in place
    ///
    /// Callers validate that neither argument is the `Invalid` sentinel; debug
    /// builds assert it, release builds skip the pair.
    #[inline]
    pub fn apply_change(
        settings: &mut GeneratorSettings,
        sentence_type: SentenceType,
        generation_type: SentenceGenerationType,
    ) {
        debug_assert!(
            !sentence_type.is_invalid() && !generation_type.is_invalid(),
            "apply_change called with an invalid pair ({sentence_type}, {generation_type})"
        );
        settings.set(sentence_type, generation_type);
    }

    /// `fallback` when `settings` is default, otherwise `settings` unchanged
    #[inline]
    #[must_use]
    pub fn replace_if_default(
        settings: GeneratorSettings,
        fallback: GeneratorSettings,
    ) -> GeneratorSettings {
        if settings.is_default() {
            fallback
        } else {
            settings
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemorySettingsStore;

    fn settings(entries: &[(SentenceType, SentenceGenerationType)]) -> GeneratorSettings {
        GeneratorSettings::from_entries(entries.iter().copied())
    }

    fn fixture() -> (Arc<InMemorySettingsStore>, SettingsResolver, PageId, SiteId) {
        let store = Arc::new(InMemorySettingsStore::new());
        let resolver = SettingsResolver::new(store.clone());
        (store, resolver, PageId::new(), SiteId::new())
    }

    #[tokio::test]
    async fn falls_back_to_global_when_nothing_overridden() {
        let (_, resolver, page_id, site_id) = fixture();

        let resolved = resolver.resolve(page_id, site_id).await.unwrap();

        assert_eq!(resolved.source, SettingsSource::Global);
        assert_eq!(&resolved.settings, GeneratorSettings::global_default());
    }

    #[tokio::test]
    async fn site_value_used_when_page_has_no_override() {
        let (store, resolver, page_id, site_id) = fixture();
        store
            .set_site_settings(
                site_id,
                settings(&[(SentenceType::Title, SentenceGenerationType::Manual)]),
                false,
            )
            .await
            .unwrap();

        let resolved = resolver.resolve(page_id, site_id).await.unwrap();

        assert_eq!(resolved.source, SettingsSource::Site);
        assert_eq!(
            resolved.settings.generation_type(SentenceType::Title),
            SentenceGenerationType::Manual
        );
    }

    #[tokio::test]
    async fn page_value_shadows_site_value() {
        let (store, resolver, page_id, site_id) = fixture();
        store
            .set_site_settings(
                site_id,
                settings(&[(SentenceType::Title, SentenceGenerationType::Manual)]),
                false,
            )
            .await
            .unwrap();
        store
            .set_page_settings(
                page_id,
                settings(&[(SentenceType::Title, SentenceGenerationType::Template)]),
                false,
            )
            .await
            .unwrap();

        let resolved = resolver.resolve(page_id, site_id).await.unwrap();

        assert_eq!(resolved.source, SettingsSource::Page);
        assert_eq!(
            resolved.settings.generation_type(SentenceType::Title),
            SentenceGenerationType::Template
        );
    }

    #[tokio::test]
    async fn page_record_shadows_whole_site_record() {
        let (store, resolver, page_id, site_id) = fixture();
        store
            .set_site_settings(
                site_id,
                settings(&[(SentenceType::H1, SentenceGenerationType::Manual)]),
                false,
            )
            .await
            .unwrap();
        store
            .set_page_settings(
                page_id,
                settings(&[(SentenceType::Title, SentenceGenerationType::Disabled)]),
                false,
            )
            .await
            .unwrap();

        let effective = resolver.resolve_settings(page_id, site_id).await.unwrap();

        // H1 is unset on the page, so the global default wins over the site value
        assert_eq!(
            effective.generation_type(SentenceType::H1),
            SentenceGenerationType::Template
        );
    }

    #[test]
    fn replace_if_default_picks_fallback_only_for_default() {
        let fallback = GeneratorSettings::global_default().clone();
        let concrete = settings(&[(SentenceType::Title, SentenceGenerationType::Manual)]);

        assert_eq!(
            SettingsResolver::replace_if_default(GeneratorSettings::new(), fallback.clone()),
            fallback
        );
        assert_eq!(
            SettingsResolver::replace_if_default(concrete.clone(), fallback),
            concrete
        );
    }

    #[test]
    fn apply_change_touches_one_entry() {
        let mut record = settings(&[
            (SentenceType::Title, SentenceGenerationType::Manual),
            (SentenceType::H1, SentenceGenerationType::Disabled),
        ]);

        SettingsResolver::apply_change(
            &mut record,
            SentenceType::Title,
            SentenceGenerationType::Auto,
        );

        assert_eq!(record.get(SentenceType::Title), Some(SentenceGenerationType::Auto));
        assert_eq!(record.get(SentenceType::H1), Some(SentenceGenerationType::Disabled));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "invalid pair")]
    fn apply_change_asserts_valid_pair() {
        let mut record = GeneratorSettings::new();
        SettingsResolver::apply_change(
            &mut record,
            SentenceType::Title,
            SentenceGenerationType::Invalid,
        );
    }
}
