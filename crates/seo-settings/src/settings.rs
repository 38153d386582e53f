//! Generator settings records
//!
//! A [`GeneratorSettings`] record maps sentence types to generation strategies.
//! Pages and sites each own at most one record; the global default is an
//! immutable process-wide constant.

use crate::sentence::{SentenceGenerationType, SentenceType};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Hard-coded strategies used when neither page nor site overrides anything
pub const GLOBAL_DEFAULT_ENTRIES: [(SentenceType, SentenceGenerationType); 4] = [
    (SentenceType::Title, SentenceGenerationType::Auto),
    (SentenceType::Description, SentenceGenerationType::Auto),
    (SentenceType::H1, SentenceGenerationType::Template),
    (SentenceType::Keywords, SentenceGenerationType::Disabled),
];

static GLOBAL_DEFAULT: Lazy<GeneratorSettings> =
    Lazy::new(|| GeneratorSettings::from_entries(GLOBAL_DEFAULT_ENTRIES));

/// Per-page, per-site or global generation settings
///
/// An empty record is "default" (nothing overridden); a record with at least
/// one entry is "concrete". Entries never hold the `Invalid` sentinel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<SentenceType, SentenceGenerationType>",
    into = "BTreeMap<SentenceType, SentenceGenerationType>"
)]
pub struct GeneratorSettings {
    entries: BTreeMap<SentenceType, SentenceGenerationType>,
}

impl GeneratorSettings {
    /// Empty (default) record
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The immutable global default
    #[inline]
    #[must_use]
    pub fn global_default() -> &'static GeneratorSettings {
        &GLOBAL_DEFAULT
    }

    /// Build a record from explicit entries, skipping invalid pairs
    #[must_use]
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (SentenceType, SentenceGenerationType)>,
    {
        let mut settings = Self::new();
        for (sentence_type, generation_type) in entries {
            settings.set(sentence_type, generation_type);
        }
        settings
    }

    /// True when nothing is overridden
    #[inline]
    #[must_use]
    pub fn is_default(&self) -> bool {
        self.entries.is_empty()
    }

    /// Explicit entry for a sentence type
    #[inline]
    #[must_use]
    pub fn get(&self, sentence_type: SentenceType) -> Option<SentenceGenerationType> {
        self.entries.get(&sentence_type).copied()
    }

    /// Effective strategy: the explicit entry, else the global default
    ///
    /// Only `SentenceType::Invalid` yields `SentenceGenerationType::Invalid`.
    #[must_use]
    pub fn generation_type(&self, sentence_type: SentenceType) -> SentenceGenerationType {
        self.get(sentence_type)
            .unwrap_or_else(|| default_generation_type(sentence_type))
    }

    /// Set one entry
    ///
    /// Pairs containing an `Invalid` sentinel are ignored.
    pub fn set(&mut self, sentence_type: SentenceType, generation_type: SentenceGenerationType) {
        if sentence_type.is_invalid() || generation_type.is_invalid() {
            return;
        }
        self.entries.insert(sentence_type, generation_type);
    }

    /// Copy every entry of `other` over this record, keeping unrelated keys
    pub fn merge_from(&mut self, other: &GeneratorSettings) {
        for (sentence_type, generation_type) in other.iter() {
            self.entries.insert(sentence_type, generation_type);
        }
    }

    /// Number of explicit entries
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Same as [`GeneratorSettings::is_default`]
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate explicit entries in sentence type order
    pub fn iter(&self) -> impl Iterator<Item = (SentenceType, SentenceGenerationType)> + '_ {
        self.entries.iter().map(|(t, g)| (*t, *g))
    }
}

impl From<BTreeMap<SentenceType, SentenceGenerationType>> for GeneratorSettings {
    fn from(entries: BTreeMap<SentenceType, SentenceGenerationType>) -> Self {
        Self::from_entries(entries)
    }
}

impl From<GeneratorSettings> for BTreeMap<SentenceType, SentenceGenerationType> {
    fn from(settings: GeneratorSettings) -> Self {
        settings.entries
    }
}

fn default_generation_type(sentence_type: SentenceType) -> SentenceGenerationType {
    GLOBAL_DEFAULT_ENTRIES
        .iter()
        .find(|(t, _)| *t == sentence_type)
        .map_or(SentenceGenerationType::Invalid, |(_, g)| *g)
}
