//! core::verse
//!
//! Text payload of one segment.

use std::fmt;

use once_cell::sync::OnceCell;

/// Characters removed before tokenizing.
const STRIPPED: &[char] = &[
    '“', '”', '‘', '’', '"', '\'', '.', ':', ';', ',', '…', '?', '!', '*', '(', ')', '—',
];

/// The text stored under one segment id.
///
/// Tokens are computed on first access and cached.
///
/// # Example
///
/// ```
/// use bilara_check::core::verse::Verse;
///
/// let verse = Verse::new("“Evaṁ me sutaṁ—ekaṁ samayaṁ.”");
/// assert_eq!(verse.tokens(), &["evaṁ", "me", "sutaṁekaṁ", "samayaṁ"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Verse {
    text: String,
    tokens: OnceCell<Vec<String>>,
}

impl Verse {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tokens: OnceCell::new(),
        }
    }

    /// The raw text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Case-folded, punctuation-stripped, whitespace-split tokens.
    pub fn tokens(&self) -> &[String] {
        self.tokens.get_or_init(|| {
            self.text
                .to_lowercase()
                .replace(STRIPPED, "")
                .split_whitespace()
                .map(str::to_string)
                .collect()
        })
    }
}

impl PartialEq for Verse {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

impl Eq for Verse {}

impl From<&str> for Verse {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for Verse {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

impl AsRef<str> for Verse {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for Verse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_fold_and_strip() {
        let verse = Verse::new("Hello, World! (again)");
        assert_eq!(verse.tokens(), &["hello", "world", "again"]);
    }

    #[test]
    fn tokens_cached() {
        let verse = Verse::new("a b");
        let first = verse.tokens().as_ptr();
        let second = verse.tokens().as_ptr();
        assert_eq!(first, second);
    }

    #[test]
    fn blank_has_no_tokens() {
        assert!(Verse::new("  ").tokens().is_empty());
        assert!(Verse::new("…").tokens().is_empty());
    }

    #[test]
    fn equality_ignores_cache() {
        let a = Verse::new("x y");
        let b = Verse::new("x y");
        let _ = a.tokens();
        assert_eq!(a, b);
    }
}
