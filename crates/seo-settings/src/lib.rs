//! Sentence-generation settings
//!
//! Pages belong to sites, and both may override how each category of
//! generated text is produced:
//! - [`GeneratorSettings`] records map [`SentenceType`] to [`SentenceGenerationType`]
//! - [`SettingsStore`] persists page and site records
//! - [`SettingsResolver`] applies the page → site → global override chain
//!
//! # Example
//!
//! ```rust,ignore
//! use seo_settings::prelude::*;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), PersistenceError> {
//! let store = Arc::new(InMemorySettingsStore::new());
//! let resolver = SettingsResolver::new(store);
//!
//! let resolved = resolver.resolve(PageId::new(), SiteId::new()).await?;
//! assert_eq!(resolved.source, SettingsSource::Global);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod error;
pub mod ids;
pub mod resolver;
pub mod sentence;
pub mod settings;
pub mod store;

pub use error::PersistenceError;
pub use ids::{IdParseError, KeywordId, PageId, SiteId, UserId};
pub use resolver::{ResolvedSettings, SettingsResolver, SettingsSource};
pub use sentence::{SentenceGenerationType, SentenceType};
pub use settings::{GeneratorSettings, GLOBAL_DEFAULT_ENTRIES};
pub use store::{InMemorySettingsStore, SettingsStore};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with generator settings
    pub use crate::{
        GeneratorSettings, InMemorySettingsStore, PageId, PersistenceError, ResolvedSettings,
        SentenceGenerationType, SentenceType, SettingsResolver, SettingsSource, SettingsStore,
        SiteId,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
