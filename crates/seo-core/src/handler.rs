//! Page sentence-generation-type command handler
//!
//! Validates a request to change one generation setting of a page, writes the
//! change into the page-level settings record and enqueues a change
//! description for regeneration.

use crate::access::{AccessTarget, AccessValidator};
use crate::commands::SetPageSentenceGenerationTypeCommand;
use crate::directory::PageDirectory;
use crate::error::CommandError;
use crate::propagation::{ChangePropagator, GenerationTypeChange};
use seo_settings::{GeneratorSettings, PageId, SettingsResolver, SettingsStore};
use std::fmt;
use std::sync::Arc;

/// Progress of one command through the handler
///
/// A failure leaves the command at the last stage it completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HandlerStage {
    /// Command accepted for processing
    Received,
    /// Identifier and enums checked
    Validated,
    /// Actor authorized
    AccessChecked,
    /// Effective settings loaded
    Resolved,
    /// Page-level record written
    Persisted,
    /// Change handed to the propagator (terminal)
    Propagated,
}

impl fmt::Display for HandlerStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            HandlerStage::Received => "received",
            HandlerStage::Validated => "validated",
            HandlerStage::AccessChecked => "access_checked",
            HandlerStage::Resolved => "resolved",
            HandlerStage::Persisted => "persisted",
            HandlerStage::Propagated => "propagated",
        })
    }
}

/// Handles [`SetPageSentenceGenerationTypeCommand`]
#[derive(Clone)]
pub struct SetPageSentenceGenerationTypeHandler {
    access: Arc<dyn AccessValidator>,
    pages: Arc<dyn PageDirectory>,
    resolver: SettingsResolver,
    propagator: ChangePropagator,
}

impl fmt::Debug for SetPageSentenceGenerationTypeHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SetPageSentenceGenerationTypeHandler")
            .field("resolver", &self.resolver)
            .field("propagator", &self.propagator)
            .finish_non_exhaustive()
    }
}

impl SetPageSentenceGenerationTypeHandler {
    /// Create handler
    #[must_use]
    pub fn new(
        access: Arc<dyn AccessValidator>,
        pages: Arc<dyn PageDirectory>,
        store: Arc<dyn SettingsStore>,
        propagator: ChangePropagator,
    ) -> Self {
        Self {
            access,
            pages,
            resolver: SettingsResolver::new(store),
            propagator,
        }
    }

    /// Apply the command
    ///
    /// # Workflow
    /// 1. Parse the page ID
    /// 2. Reject `Invalid` sentence and generation types
    /// 3. Authorize the actor
    /// 4. Load the page and resolve its effective settings
    /// 5. Apply the change and upsert the page-level record
    /// 6. Enqueue the change description
    ///
    /// A propagation failure in step 6 is logged and does not fail the call.
    ///
    /// # Errors
    /// - `CommandError::NotFound` for a malformed or unknown page ID
    /// - `CommandError::Validation` for `Invalid` enum values
    /// - `CommandError::Unauthenticated` / `CommandError::AccessDenied`
    /// - `CommandError::Persistence` if a read or the write fails
    pub async fn handle(
        &self,
        command: SetPageSentenceGenerationTypeCommand,
    ) -> Result<GenerationTypeChange, CommandError> {
        let mut stage = HandlerStage::Received;
        let page_id = command.page_id.clone();

        let result = self.run(command, &mut stage).await;
        match &result {
            Ok(change) => tracing::info!(
                page_id = %change.page_id,
                sentence_type = %change.sentence_type,
                old = %change.old,
                new = %change.new,
                %stage,
                "sentence generation type changed"
            ),
            Err(e) if e.is_server_fault() => {
                tracing::error!(
                    %page_id,
                    %stage,
                    error = %e,
                    "sentence generation type change failed"
                );
            }
            Err(e) => {
                tracing::warn!(
                    %page_id,
                    %stage,
                    error = %e,
                    "sentence generation type change rejected"
                );
            }
        }
        result
    }

    async fn run(
        &self,
        command: SetPageSentenceGenerationTypeCommand,
        stage: &mut HandlerStage,
    ) -> Result<GenerationTypeChange, CommandError> {
        let page_id: PageId = command
            .page_id
            .parse()
            .map_err(|_| CommandError::not_found("page", &command.page_id))?;
        let sentence_type = command.sentence_type;
        let generation_type = command.sentence_generation_type;

        if generation_type.is_invalid() {
            return Err(CommandError::validation(
                "sentence_generation_type",
                "must not be invalid",
            ));
        }
        if sentence_type.is_invalid() {
            return Err(CommandError::validation("sentence_type", "must not be invalid"));
        }
        advance(stage, HandlerStage::Validated, page_id);

        self.access
            .validate(command.actor, AccessTarget::Page(page_id))
            .await?;
        advance(stage, HandlerStage::AccessChecked, page_id);

        let page = self
            .pages
            .get_by_id(page_id)
            .await?
            .ok_or_else(|| CommandError::not_found("page", page_id))?;
        let resolved = self.resolver.resolve(page.id, page.site_id).await?;
        tracing::trace!(%page_id, source = %resolved.source, "resolved settings before change");
        let mut settings = SettingsResolver::replace_if_default(
            resolved.settings,
            GeneratorSettings::global_default().clone(),
        );
        advance(stage, HandlerStage::Resolved, page_id);

        let old = settings.generation_type(sentence_type);
        SettingsResolver::apply_change(&mut settings, sentence_type, generation_type);
        self.resolver
            .store()
            .set_page_settings(page_id, settings, true)
            .await?;
        advance(stage, HandlerStage::Persisted, page_id);

        let change = GenerationTypeChange::new(page_id, sentence_type, old, generation_type);
        match self.propagator.on_change(change.clone()) {
            Ok(()) => advance(stage, HandlerStage::Propagated, page_id),
            Err(e) => tracing::error!(
                %page_id,
                %sentence_type,
                error = %e,
                "failed to enqueue regeneration; dependent content is stale"
            ),
        }

        Ok(change)
    }
}

fn advance(stage: &mut HandlerStage, next: HandlerStage, page_id: PageId) {
    tracing::debug!(%page_id, from = %stage, to = %next, "command stage");
    *stage = next;
}
