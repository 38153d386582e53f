//! SEO Core - sentence-generation setting commands
//!
//! Handles the commands that change how generated metadata is produced:
//! - Validates and authorizes page generation-type changes
//! - Writes the effective settings into the page-level record
//! - Hands each committed change to the regeneration pipeline without blocking
//! - Toggles the "is forced" flag of keywords
//!
//! # Example
//!
//! ```rust,ignore
//! use seo_core::prelude::*;
//! use std::sync::Arc;
//!
//! # async fn example(
//! #     access: Arc<dyn AccessValidator>,
//! #     pages: Arc<dyn PageDirectory>,
//! #     page_id: PageId,
//! #     owner: UserId,
//! # ) -> Result<(), CommandError> {
//! let config = CoreConfig::new();
//! let (propagator, changes) = ChangePropagator::from_config(&config);
//! let worker = RegenerationWorker::new(Arc::new(TracingPipeline), DeliveryPolicy::from(&config));
//! let _worker = worker.spawn(changes);
//!
//! let store = Arc::new(InMemorySettingsStore::new());
//! let handler = SetPageSentenceGenerationTypeHandler::new(access, pages, store, propagator);
//!
//! let change = handler
//!     .handle(SetPageSentenceGenerationTypeCommand::new(
//!         Some(owner),
//!         page_id.to_string(),
//!         SentenceType::Title,
//!         SentenceGenerationType::Manual,
//!     ))
//!     .await?;
//! println!("{} -> {}", change.old, change.new);
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![warn(missing_docs)]

pub mod access;
pub mod commands;
pub mod config;
pub mod directory;
pub mod entities;
pub mod error;
pub mod handler;
pub mod keyword;
pub mod propagation;
pub mod telemetry;

pub use access::{AccessTarget, AccessValidator, SiteOwnershipValidator};
pub use commands::{SetKeywordIsForcedCommand, SetPageSentenceGenerationTypeCommand};
pub use config::{CoreConfig, LOG_ENV};
pub use directory::{InMemoryKeywordStore, InMemoryPageDirectory, KeywordStore, PageDirectory};
pub use entities::{Keyword, Page};
pub use error::{AccessError, CommandError, ConfigError, PipelineError, PropagationError};
pub use handler::{HandlerStage, SetPageSentenceGenerationTypeHandler};
pub use keyword::SetKeywordIsForcedHandler;
pub use propagation::{
    ChangePropagator, DeliveryPolicy, GenerationTypeChange, RegenerationPipeline,
    RegenerationWorker, TracingPipeline, WorkerStats,
};
pub use telemetry::{init_tracing, TelemetryError};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with SEO Core
    pub use crate::{
        AccessTarget, AccessValidator, ChangePropagator, CommandError, CoreConfig,
        DeliveryPolicy, GenerationTypeChange, KeywordStore, PageDirectory, RegenerationPipeline,
        RegenerationWorker, SetKeywordIsForcedCommand, SetKeywordIsForcedHandler,
        SetPageSentenceGenerationTypeCommand, SetPageSentenceGenerationTypeHandler,
        TracingPipeline,
    };
    pub use seo_settings::prelude::*;
    pub use seo_settings::{KeywordId, UserId};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
