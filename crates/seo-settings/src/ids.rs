//! Opaque entity identifiers
//!
//! Pages, sites, keywords and users are owned by external stores; the core only
//! ever sees their ULID identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ulid::Ulid;

/// Identifier string could not be parsed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind} identifier: {input:?}")]
pub struct IdParseError {
    /// Entity kind (`page`, `site`, ...)
    pub kind: &'static str,
    /// Rejected input
    pub input: String,
}

macro_rules! ulid_id {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub Ulid);

        impl $name {
            /// Entity kind used in error messages
            pub const KIND: &'static str = $kind;

            /// Generate a new identifier
            #[inline]
            #[must_use]
            pub fn new() -> Self {
                Self(Ulid::new())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = IdParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ulid::from_string(s.trim())
                    .map(Self)
                    .map_err(|_| IdParseError {
                        kind: $kind,
                        input: s.to_string(),
                    })
            }
        }
    };
}

ulid_id!(
    /// Page identifier
    PageId,
    "page"
);
ulid_id!(
    /// Site identifier
    SiteId,
    "site"
);
ulid_id!(
    /// Keyword identifier
    KeywordId,
    "keyword"
);
ulid_id!(
    /// User identifier (command actor)
    UserId,
    "user"
);
