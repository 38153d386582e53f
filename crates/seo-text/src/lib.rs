//! Text normalization for generated SEO metadata
//!
//! [`NormalizedText`] is the canonical comparison key used when generated
//! sentences are matched against page content: comparisons ignore letter
//! case, punctuation and repeated whitespace.

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod normalized;

pub use normalized::{NormalizedText, PUNCTUATION};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
