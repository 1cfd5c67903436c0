//! core::external
//!
//! External identifier families used by the reference layer.
//!
//! # Families
//!
//! Tokens are classified in this fixed priority order; the first family
//! whose pattern matches wins:
//!
//! 1. [`Family::Site`] - `sc38`
//! 2. [`Family::PtsCross`] - `pts-cs1.1`
//! 3. [`Family::PtsEdition`] - `pts-vp-pli3.1`
//! 4. [`Family::AlternateEdition`] - `nya12`
//! 5. [`Family::Manuscript`] - `ms1V_2`, `ms24Mn_38`
//!
//! A token matching no family (`msdiv114`, `pts-vp-en1.1`) is ignored.
//!
//! # Example
//!
//! ```
//! use bilara_check::core::external::{ExternalId, Family, References};
//!
//! let id = ExternalId::classify("pts-cs1.1").unwrap();
//! assert_eq!(id.family(), Family::PtsCross);
//! assert!(ExternalId::classify("msdiv114").is_none());
//!
//! let refs = References::parse("sc2, pts-cs1.1, ms1V_2");
//! assert_eq!(refs.manuscripts().len(), 1);
//! assert_eq!(refs.site().unwrap().as_str(), "sc2");
//! ```

use std::collections::BTreeSet;
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::types::TypeError;

static SITE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^sc\d+$").expect("valid regex"));
static PTS_CROSS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^pts-cs(\d+(?:\.\d+)*)$").expect("valid regex"));
static PTS_EDITION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^pts-vp-pli\d+(?:\.\d+)*$").expect("valid regex"));
static ALTERNATE_EDITION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^nya\d+$").expect("valid regex"));
static MANUSCRIPT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^ms\d+(?:[A-Za-z]+_\d+)?$").expect("valid regex"));

/// An external numbering scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Family {
    /// Corpus-site paragraph number.
    Site,
    /// Pali Text Society cross number.
    PtsCross,
    /// Pali Text Society edition page number.
    PtsEdition,
    /// Alternate edition number.
    AlternateEdition,
    /// Manuscript number.
    Manuscript,
}

impl Family {
    /// All families in classification priority order.
    pub const PRIORITY: [Family; 5] = [
        Family::Site,
        Family::PtsCross,
        Family::PtsEdition,
        Family::AlternateEdition,
        Family::Manuscript,
    ];

    fn pattern(self) -> &'static Regex {
        match self {
            Family::Site => &SITE,
            Family::PtsCross => &PTS_CROSS,
            Family::PtsEdition => &PTS_EDITION,
            Family::AlternateEdition => &ALTERNATE_EDITION,
            Family::Manuscript => &MANUSCRIPT,
        }
    }

    /// Check if a token belongs to this family.
    pub fn matches(self, token: &str) -> bool {
        self.pattern().is_match(token)
    }

    /// Short name used in log lines.
    pub fn name(self) -> &'static str {
        match self {
            Family::Site => "site",
            Family::PtsCross => "pts-cross",
            Family::PtsEdition => "pts-edition",
            Family::AlternateEdition => "alternate-edition",
            Family::Manuscript => "manuscript",
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A validated identifier from one external family.
///
/// Ordering groups by family first, then by raw spelling.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ExternalId {
    family: Family,
    raw: String,
}

impl ExternalId {
    /// Create an identifier of a known family.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidExternalId` if the token does not match the
    /// family's pattern.
    pub fn new(family: Family, raw: impl Into<String>) -> Result<Self, TypeError> {
        let raw = raw.into();
        if !family.matches(&raw) {
            return Err(TypeError::InvalidExternalId {
                reason: format!("not a {family} identifier"),
                raw,
            });
        }
        Ok(Self { family, raw })
    }

    /// Create a manuscript identifier.
    pub fn manuscript(raw: impl Into<String>) -> Result<Self, TypeError> {
        Self::new(Family::Manuscript, raw)
    }

    /// Classify a trimmed token into the first matching family.
    ///
    /// Returns `None` for tokens no family recognizes.
    pub fn classify(token: &str) -> Option<Self> {
        Family::PRIORITY
            .into_iter()
            .find(|family| family.matches(token))
            .map(|family| Self {
                family,
                raw: token.to_string(),
            })
    }

    /// The family this identifier belongs to.
    pub fn family(&self) -> Family {
        self.family
    }

    /// Check if this is a manuscript identifier.
    pub fn is_manuscript(&self) -> bool {
        self.family == Family::Manuscript
    }

    /// Numeric part of a PTS cross id (`pts-cs1.10` → `1.10`).
    pub fn pts_no(&self) -> Option<&str> {
        match self.family {
            Family::PtsCross => self.raw.strip_prefix("pts-cs"),
            _ => None,
        }
    }

    /// Get the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl AsRef<str> for ExternalId {
    fn as_ref(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for ExternalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

/// A classified reference cell such as `"sc2, pts-cs1.1, ms1V_2"`.
///
/// Keeps every trimmed token, the first identifier seen per single-valued
/// family, and all distinct manuscript ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct References {
    tokens: BTreeSet<String>,
    site: Option<ExternalId>,
    pts_cross: Option<ExternalId>,
    pts_edition: Option<ExternalId>,
    alternate_edition: Option<ExternalId>,
    manuscripts: BTreeSet<ExternalId>,
}

impl References {
    /// Split a cell on commas and classify each token.
    pub fn parse(cell: &str) -> Self {
        let mut refs = Self::default();
        for token in cell.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            refs.tokens.insert(token.to_string());
            let Some(id) = ExternalId::classify(token) else {
                continue;
            };
            let slot = match id.family {
                Family::Manuscript => {
                    refs.manuscripts.insert(id);
                    continue;
                }
                Family::Site => &mut refs.site,
                Family::PtsCross => &mut refs.pts_cross,
                Family::PtsEdition => &mut refs.pts_edition,
                Family::AlternateEdition => &mut refs.alternate_edition,
            };
            if slot.is_none() {
                *slot = Some(id);
            }
        }
        refs
    }

    /// Every trimmed token in the cell.
    pub fn tokens(&self) -> &BTreeSet<String> {
        &self.tokens
    }

    pub fn site(&self) -> Option<&ExternalId> {
        self.site.as_ref()
    }

    pub fn pts_cross(&self) -> Option<&ExternalId> {
        self.pts_cross.as_ref()
    }

    pub fn pts_edition(&self) -> Option<&ExternalId> {
        self.pts_edition.as_ref()
    }

    pub fn alternate_edition(&self) -> Option<&ExternalId> {
        self.alternate_edition.as_ref()
    }

    /// Distinct manuscript ids in the cell.
    pub fn manuscripts(&self) -> &BTreeSet<ExternalId> {
        &self.manuscripts
    }

    /// Canonical cell text: sorted tokens joined with `", "`.
    pub fn data(&self) -> String {
        self.tokens.iter().cloned().collect::<Vec<_>>().join(", ")
    }
}
