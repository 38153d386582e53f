//! Keyword "is forced" command handler

use crate::access::{AccessTarget, AccessValidator};
use crate::commands::SetKeywordIsForcedCommand;
use crate::directory::KeywordStore;
use crate::entities::Keyword;
use crate::error::CommandError;
use chrono::Utc;
use seo_settings::KeywordId;
use std::fmt;
use std::sync::Arc;

/// Handles [`SetKeywordIsForcedCommand`]
#[derive(Clone)]
pub struct SetKeywordIsForcedHandler {
    access: Arc<dyn AccessValidator>,
    keywords: Arc<dyn KeywordStore>,
}

impl fmt::Debug for SetKeywordIsForcedHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SetKeywordIsForcedHandler").finish_non_exhaustive()
    }
}

impl SetKeywordIsForcedHandler {
    /// Create handler
    #[must_use]
    pub fn new(access: Arc<dyn AccessValidator>, keywords: Arc<dyn KeywordStore>) -> Self {
        Self { access, keywords }
    }

    /// Set the flag and stamp the keyword's modification time
    ///
    /// Setting the current value again still refreshes `date_updated`.
    ///
    /// # Errors
    /// - `CommandError::NotFound` for a malformed or unknown keyword ID
    /// - `CommandError::Unauthenticated` / `CommandError::AccessDenied`
    /// - `CommandError::Persistence` if loading or saving fails
    pub async fn handle(
        &self,
        command: SetKeywordIsForcedCommand,
    ) -> Result<Keyword, CommandError> {
        let keyword_id = command.keyword_id.clone();
        let result = self.run(command).await;
        match &result {
            Ok(keyword) => tracing::info!(
                keyword_id = %keyword.id,
                is_forced = keyword.is_forced,
                "keyword forced flag updated"
            ),
            Err(e) => {
                tracing::warn!(%keyword_id, error = %e, "keyword forced flag update rejected");
            }
        }
        result
    }

    async fn run(&self, command: SetKeywordIsForcedCommand) -> Result<Keyword, CommandError> {
        let keyword_id: KeywordId = command
            .keyword_id
            .parse()
            .map_err(|_| CommandError::not_found("keyword", &command.keyword_id))?;

        self.access
            .validate(command.actor, AccessTarget::Keyword(keyword_id))
            .await?;

        let mut keyword = self
            .keywords
            .get_by_id(keyword_id)
            .await?
            .ok_or_else(|| CommandError::not_found("keyword", keyword_id))?;

        keyword.set_forced(command.is_forced, Utc::now());
        self.keywords.save(keyword.clone()).await?;
        Ok(keyword)
    }
}
