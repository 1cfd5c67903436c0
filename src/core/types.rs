//! core::types
//!
//! Strong types for segment identifiers.
//!
//! # Types
//!
//! - [`SegmentId`] - Validated `<text key>:<sequence>` identifier
//! - [`TextKey`] - The work designator before the colon (e.g. `mn10`)
//! - [`Sequence`] - Dot-separated ordered tuple of [`SeqPart`]s
//! - [`SeqPart`] - A numeric component or a baked range (`23-28`)
//!
//! # Validation
//!
//! These types enforce validity at construction time. A [`SegmentId`]
//! keeps its raw spelling, so `SegmentId::parse(s)?.to_string() == s`
//! holds for every valid input.
//!
//! # Examples
//!
//! ```
//! use bilara_check::core::types::{SegmentId, SeqPart};
//!
//! let id = SegmentId::parse("mn13:23-28.6").unwrap();
//! assert_eq!(id.key().as_str(), "mn13");
//! assert_eq!(id.seq().head(), SeqPart::Baked { start: 23, end: 28 });
//! assert_eq!(id.seq().last(), SeqPart::Num(6));
//! assert_eq!(id.to_string(), "mn13:23-28.6");
//!
//! assert!(SegmentId::parse("mn13:1.x").is_err());
//! assert!(SegmentId::parse("mn13 1.1").is_err());
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from identifier validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid segment id '{raw}': {reason}")]
    InvalidSegmentId { raw: String, reason: String },

    #[error("invalid external id '{raw}': {reason}")]
    InvalidExternalId { raw: String, reason: String },
}

impl TypeError {
    fn segment(raw: &str, reason: impl Into<String>) -> Self {
        TypeError::InvalidSegmentId {
            raw: raw.to_string(),
            reason: reason.into(),
        }
    }
}

/// One component of a [`Sequence`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SeqPart {
    /// A plain segment number.
    Num(u64),
    /// Segments `start..=end` collapsed into one during editing.
    Baked { start: u64, end: u64 },
}

impl SeqPart {
    /// Parse one dot-separated component, returning the rejection reason.
    fn parse(part: &str) -> Result<Self, String> {
        if is_digits(part) {
            return number(part).map(SeqPart::Num);
        }
        match part.split_once('-') {
            Some((start, end)) if is_digits(start) && is_digits(end) => Ok(SeqPart::Baked {
                start: number(start)?,
                end: number(end)?,
            }),
            _ => Err(format!(
                "sequence component '{part}' is neither a number nor a range"
            )),
        }
    }

    /// The numeric value, or `None` for a baked range.
    pub fn as_num(self) -> Option<u64> {
        match self {
            SeqPart::Num(n) => Some(n),
            SeqPart::Baked { .. } => None,
        }
    }

    /// Check if this component is a baked range.
    pub fn is_baked(self) -> bool {
        matches!(self, SeqPart::Baked { .. })
    }

    /// Lower bound: the number itself, or the start of a baked range.
    pub fn lower(self) -> u64 {
        match self {
            SeqPart::Num(n) => n,
            SeqPart::Baked { start, .. } => start,
        }
    }

    /// Upper bound: the number itself, or the end of a baked range.
    pub fn upper(self) -> u64 {
        match self {
            SeqPart::Num(n) => n,
            SeqPart::Baked { end, .. } => end,
        }
    }
}

impl fmt::Display for SeqPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeqPart::Num(n) => write!(f, "{n}"),
            SeqPart::Baked { start, end } => write!(f, "{start}-{end}"),
        }
    }
}

/// The sequence part of a segment id, after the colon.
///
/// Always has at least one component.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Sequence(Vec<SeqPart>);

impl Sequence {
    /// First component.
    pub fn head(&self) -> SeqPart {
        self.0[0]
    }

    /// Final component.
    pub fn last(&self) -> SeqPart {
        self.0[self.0.len() - 1]
    }

    /// Component before the final one, if the sequence has at least two.
    pub fn second_to_last(&self) -> Option<SeqPart> {
        self.0.len().checked_sub(2).map(|i| self.0[i])
    }

    /// Number of components.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false: a sequence has at least one component.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// All components in order.
    pub fn parts(&self) -> &[SeqPart] {
        &self.0
    }
}

/// The work designator before the colon.
///
/// A change of text key between two consecutive identifiers marks a
/// document boundary.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextKey(String);

impl TextKey {
    /// Get the text key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for TextKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TextKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A validated segment identifier such as `mn10:12.3` or `mn13:23-28.6`.
///
/// Equality, hashing and ordering use the raw spelling.
///
/// # Example
///
/// ```
/// use bilara_check::core::types::SegmentId;
///
/// let id = SegmentId::parse("pli-tv-bu-vb-pj1:1.1.0").unwrap();
/// assert_eq!(id.key().as_str(), "pli-tv-bu-vb-pj1");
/// assert_eq!(id.seq().len(), 3);
/// assert!(id.is_heading());
///
/// // Invalid identifiers fail at creation time
/// assert!(SegmentId::parse("").is_err());
/// assert!(SegmentId::parse("mn1").is_err());
/// assert!(SegmentId::parse("mn1:1..2").is_err());
/// assert!(SegmentId::parse("mn1:1-").is_err());
/// assert!(SegmentId::parse("mn1:1.2-3").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SegmentId {
    raw: String,
    key: TextKey,
    seq: Sequence,
}

impl SegmentId {
    /// Raw spelling of the stream-start sentinel.
    const START: &'static str = ":0-0";

    /// Parse and validate a raw identifier.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidSegmentId` if the character set is invalid,
    /// the colon is missing, either side is empty, a sequence component is
    /// neither an integer nor a baked `a-b` range, a number does not fit in
    /// 64 bits, or the final component is a baked range.
    pub fn parse(raw: impl Into<String>) -> Result<Self, TypeError> {
        let raw = raw.into();

        if raw.is_empty() {
            return Err(TypeError::segment(&raw, "identifier cannot be empty"));
        }
        if let Some(c) = raw
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | ':' | '.')))
        {
            return Err(TypeError::segment(
                &raw,
                format!("invalid character '{}'", c.escape_default()),
            ));
        }

        let Some((key, seq)) = raw.split_once(':') else {
            return Err(TypeError::segment(&raw, "missing ':' separator"));
        };
        if key.is_empty() {
            return Err(TypeError::segment(&raw, "text key cannot be empty"));
        }
        if seq.is_empty() {
            return Err(TypeError::segment(&raw, "sequence cannot be empty"));
        }

        let parts = seq
            .split('.')
            .map(SeqPart::parse)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|reason| TypeError::segment(&raw, reason))?;
        if parts.last().is_some_and(|p| p.is_baked()) {
            return Err(TypeError::segment(
                &raw,
                "final sequence component must be a number",
            ));
        }

        let key = TextKey(key.to_string());
        Ok(Self {
            raw,
            key,
            seq: Sequence(parts),
        })
    }

    /// The synthetic identifier a sequence scan starts from (`:0-0`).
    ///
    /// Its text key is empty, so any real identifier following it is the
    /// start of a new document.
    pub fn start() -> Self {
        Self {
            raw: Self::START.to_string(),
            key: TextKey(String::new()),
            seq: Sequence(vec![SeqPart::Baked { start: 0, end: 0 }]),
        }
    }

    /// Check if this is the stream-start sentinel.
    pub fn is_start(&self) -> bool {
        self.raw == Self::START
    }

    /// The text key before the colon.
    pub fn key(&self) -> &TextKey {
        &self.key
    }

    /// The parsed sequence after the colon.
    pub fn seq(&self) -> &Sequence {
        &self.seq
    }

    /// Raw sequence spelling after the colon.
    pub fn raw_seq(&self) -> &str {
        &self.raw[self.key.0.len() + 1..]
    }

    /// Check if the final sequence component is 0 (a heading slot).
    pub fn is_heading(&self) -> bool {
        self.seq.last() == SeqPart::Num(0)
    }

    /// Get the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Parse a run of ASCII digits.
fn number(digits: &str) -> Result<u64, String> {
    digits
        .parse()
        .map_err(|_| format!("sequence component '{digits}' is too large"))
}

impl PartialEq for SegmentId {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Eq for SegmentId {}

impl Hash for SegmentId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl PartialOrd for SegmentId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SegmentId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.raw.cmp(&other.raw)
    }
}

impl std::str::FromStr for SegmentId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for SegmentId {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl From<SegmentId> for String {
    fn from(id: SegmentId) -> Self {
        id.raw
    }
}

impl AsRef<str> for SegmentId {
    fn as_ref(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}
