//! NormalizedText - canonical comparison key for generated and source text
//!
//! Provides [`NormalizedText`], a value that ignores letter case, punctuation
//! and whitespace noise so that generated sentences and page content can be
//! compared and tokenized deterministically.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt::{self, Display, Formatter};
use std::hash::{Hash, Hasher};

const SPACE: char = ' ';

/// Characters replaced by a single space during normalization
pub const PUNCTUATION: &[char] = &[
    '\n', '\t', '~', '`', '!', '@', ':', ';', '"', '\\', '$', '%', '^', '&', '*', '(', ')', '-',
    '=', '+', '_', '|', '/', '?', '#', '№', '[', ']', '{', '}', '.', ',', '—',
];

/// Lowercase text with punctuation replaced by spaces
///
/// Construction never fails. The stored value is produced by, in order:
/// 1. lowercasing
/// 2. replacing every [`PUNCTUATION`] character with a space
/// 3. collapsing runs of spaces into one (unless explicitly allowed)
/// 4. trimming trailing whitespace
///
/// Equality and hashing are case-insensitive over the normalized value and
/// always agree with each other.
///
/// # Example
/// ```
/// use seo_text::NormalizedText;
///
/// let text = NormalizedText::new("Buy  Cheap-Shoes, NOW!");
/// assert_eq!(text.as_str(), "buy cheap shoes now");
/// assert_eq!(text.word_count(), 4);
/// assert_eq!(text, NormalizedText::new("buy cheap shoes now"));
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct NormalizedText {
    value: String,
}

impl NormalizedText {
    /// Normalize raw text, collapsing repeated spaces
    #[inline]
    #[must_use]
    pub fn new(raw: &str) -> Self {
        Self::with_options(raw, false)
    }

    /// Normalize raw text
    ///
    /// # Arguments
    /// - `raw`: Arbitrary input, may be empty
    /// - `allow_multiple_spaces`: Keep runs of spaces instead of collapsing them
    #[must_use]
    pub fn with_options(raw: &str, allow_multiple_spaces: bool) -> Self {
        if raw.is_empty() {
            return Self::default();
        }

        let mut value = String::with_capacity(raw.len());
        for c in raw.chars().flat_map(char::to_lowercase) {
            let c = if PUNCTUATION.contains(&c) { SPACE } else { c };
            if c == SPACE && !allow_multiple_spaces && value.ends_with(SPACE) {
                continue;
            }
            value.push(c);
        }
        value.truncate(value.trim_end().len());

        Self { value }
    }

    /// Normalized value
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// True when nothing is left after normalization
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Number of space separated tokens (0 for empty text)
    ///
    /// Empty tokens count: a leading space or a kept run of spaces adds to
    /// the total. Use [`NormalizedText::words`] for non-empty words only.
    #[must_use]
    pub fn word_count(&self) -> usize {
        if self.value.is_empty() {
            0
        } else {
            self.value.split(SPACE).count()
        }
    }

    /// Words in order, skipping any contained in `exclude`
    #[must_use]
    pub fn words(&self, exclude: Option<&HashSet<String>>) -> Vec<&str> {
        match exclude {
            Some(exclude) if !exclude.is_empty() => self
                .tokens()
                .filter(|word| !exclude.contains(*word))
                .collect(),
            _ => self.tokens().collect(),
        }
    }

    /// Words as normalized values
    #[must_use]
    pub fn word_values(&self) -> Vec<NormalizedText> {
        self.tokens().map(NormalizedText::new).collect()
    }

    /// True when every character is numeric (vacuously true when empty)
    ///
    /// Any Unicode numeric character qualifies, not only ASCII digits.
    #[inline]
    #[must_use]
    pub fn is_numeric_only(&self) -> bool {
        self.value.chars().all(char::is_numeric)
    }

    fn tokens(&self) -> impl Iterator<Item = &str> {
        self.value.split(SPACE).filter(|word| !word.is_empty())
    }

    fn folded(&self) -> impl Iterator<Item = char> + '_ {
        self.value.chars().flat_map(char::to_lowercase)
    }
}

impl PartialEq for NormalizedText {
    fn eq(&self, other: &Self) -> bool {
        self.folded().eq(other.folded())
    }
}

impl Eq for NormalizedText {}

impl Hash for NormalizedText {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for c in self.folded() {
            c.hash(state);
        }
    }
}

impl Display for NormalizedText {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl AsRef<str> for NormalizedText {
    fn as_ref(&self) -> &str {
        &self.value
    }
}

impl From<&str> for NormalizedText {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for NormalizedText {
    fn from(raw: String) -> Self {
        Self::new(&raw)
    }
}

impl From<Option<&str>> for NormalizedText {
    fn from(raw: Option<&str>) -> Self {
        raw.map(Self::new).unwrap_or_default()
    }
}

impl From<NormalizedText> for String {
    fn from(text: NormalizedText) -> Self {
        text.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;

    fn hash_of(text: &NormalizedText) -> u64 {
        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn normalizes_case_punctuation_and_spaces() {
        let text = NormalizedText::new("Hello,   World!!  (SEO)\tTools.  ");
        assert_eq!(text.as_str(), "hello world seo tools");
    }

    #[test]
    fn keeps_leading_space_but_trims_trailing() {
        let text = NormalizedText::new("#hashtag!");
        assert_eq!(text.as_str(), " hashtag");
        assert_eq!(text.word_count(), 2);
        assert_eq!(text.words(None), vec!["hashtag"]);
    }

    #[test]
    fn multiple_spaces_allowed_when_requested() {
        let text = NormalizedText::with_options("a -- b", true);
        assert_eq!(text.as_str(), "a    b");
        assert_eq!(text.word_count(), 5);
        assert_eq!(text.words(None), vec!["a", "b"]);
    }

    #[test]
    fn empty_and_missing_input() {
        assert!(NormalizedText::new("").is_empty());
        assert_eq!(NormalizedText::new("").word_count(), 0);
        assert_eq!(NormalizedText::from(None).word_count(), 0);
        assert!(NormalizedText::new("").words(None).is_empty());
        assert!(NormalizedText::new("?!.").is_empty());
    }

    #[test]
    fn words_with_exclusions_preserve_order() {
        let text = NormalizedText::new("the best shoes in the city");
        let exclude: HashSet<String> = ["the", "in"].iter().map(|s| s.to_string()).collect();

        assert_eq!(text.words(Some(&exclude)), vec!["best", "shoes", "city"]);
        assert_eq!(text.words(Some(&HashSet::new())).len(), 6);
    }

    #[test]
    fn word_values_are_normalized() {
        let text = NormalizedText::new("Red Shoes");
        let words = text.word_values();
        assert_eq!(words, vec![NormalizedText::new("red"), NormalizedText::new("shoes")]);
    }

    #[test]
    fn numeric_only() {
        assert!(NormalizedText::new("2024").is_numeric_only());
        assert!(NormalizedText::new("").is_numeric_only());
        assert!(!NormalizedText::new("20 24").is_numeric_only());
        assert!(!NormalizedText::new("v2").is_numeric_only());
        assert!(NormalizedText::new("٣٤").is_numeric_only());
    }

    #[test]
    fn equality_and_hash_agree() {
        let a = NormalizedText::new("Running SHOES");
        let b = NormalizedText::new("running, shoes!");
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));

        let mut set = HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
    }

    #[test]
    fn serde_normalizes_on_deserialize() {
        let text: NormalizedText = serde_json::from_str("\"Big, Sale!\"").unwrap();
        assert_eq!(text.as_str(), "big sale");
        assert_eq!(serde_json::to_string(&text).unwrap(), "\"big sale\"");
    }
}
