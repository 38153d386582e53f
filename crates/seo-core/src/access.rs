//! Access validation boundary
//!
//! Authorization itself is external; the core only asks an [`AccessValidator`]
//! whether an actor may act on a target. [`SiteOwnershipValidator`] is a
//! reference implementation where each site has a single owning user.

use crate::directory::{KeywordStore, PageDirectory};
use crate::error::AccessError;
use async_trait::async_trait;
use dashmap::DashMap;
use seo_settings::{KeywordId, PageId, SiteId, UserId};
use std::fmt;
use std::sync::Arc;

/// Entity a command acts on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessTarget {
    /// A page
    Page(PageId),
    /// A keyword
    Keyword(KeywordId),
}

impl fmt::Display for AccessTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessTarget::Page(id) => write!(f, "page {id}"),
            AccessTarget::Keyword(id) => write!(f, "keyword {id}"),
        }
    }
}

/// Authorizes command actors
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccessValidator: Send + Sync {
    /// Succeed iff `actor` may modify `target`
    async fn validate(&self, actor: Option<UserId>, target: AccessTarget)
        -> Result<(), AccessError>;
}

/// Grants access to the owner of the target's site
pub struct SiteOwnershipValidator {
    owners: DashMap<SiteId, UserId>,
    pages: Arc<dyn PageDirectory>,
    keywords: Arc<dyn KeywordStore>,
}

impl fmt::Debug for SiteOwnershipValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SiteOwnershipValidator")
            .field("sites", &self.owners.len())
            .finish_non_exhaustive()
    }
}

impl SiteOwnershipValidator {
    /// Create validator over the entity lookups
    #[must_use]
    pub fn new(pages: Arc<dyn PageDirectory>, keywords: Arc<dyn KeywordStore>) -> Self {
        Self {
            owners: DashMap::new(),
            pages,
            keywords,
        }
    }

    /// Record `owner` as the owner of `site_id`
    pub fn grant(&self, site_id: SiteId, owner: UserId) {
        self.owners.insert(site_id, owner);
    }

    async fn site_of(&self, target: AccessTarget) -> Result<SiteId, AccessError> {
        let site_id = match target {
            AccessTarget::Page(id) => self.pages.get_by_id(id).await?.map(|p| p.site_id),
            AccessTarget::Keyword(id) => self.keywords.get_by_id(id).await?.map(|k| k.site_id),
        };

        site_id.ok_or_else(|| match target {
            AccessTarget::Page(id) => AccessError::TargetNotFound {
                entity: "page",
                id: id.to_string(),
            },
            AccessTarget::Keyword(id) => AccessError::TargetNotFound {
                entity: "keyword",
                id: id.to_string(),
            },
        })
    }
}

#[async_trait]
impl AccessValidator for SiteOwnershipValidator {
    async fn validate(
        &self,
        actor: Option<UserId>,
        target: AccessTarget,
    ) -> Result<(), AccessError> {
        let actor = actor.ok_or(AccessError::Unauthenticated)?;
        let site_id = self.site_of(target).await?;

        let owner = self.owners.get(&site_id).map(|o| *o);
        if owner == Some(actor) {
            Ok(())
        } else {
            tracing::debug!(%actor, %target, %site_id, "access denied");
            Err(AccessError::Denied(format!("{actor} does not own site {site_id}")))
        }
    }
}
