//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Example
//!
//! ```toml
//! exclude_dirs = [".git", "sutta/kn/xplayground"]
//! languages = ["en", "de", "jpn", "pt"]
//! pts_cross_prefix = "dn"
//!
//! [paths]
//! root = "~/bilara-data/root"
//! html = "~/bilara-data/html"
//! reference = "~/bilara-data/reference"
//!
//! [allow]
//! headers_without_0 = ["dhp416:5"]
//! unordered = ["mn28:33-34.1"]
//! ```
//!
//! # Validation
//!
//! Values are validated after parsing: allow-list entries must be valid
//! segment ids and language codes must be unique.

use std::collections::BTreeSet;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::core::types::SegmentId;

/// Top-level configuration file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// Directory names skipped while walking a layer.
    pub exclude_dirs: Vec<String>,

    /// Language directory names of multi-language layers.
    pub languages: Vec<String>,

    /// Text-key prefix whose PTS cross numbers must prefix the sequence.
    pub pts_cross_prefix: String,

    /// PTS cross ids skipped by the PTS alignment audit.
    pub pts_cross_ignore: Vec<String>,

    /// Layer roots
    pub paths: LayerPaths,

    /// Per-check allow-lists
    pub allow: AllowConfig,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            exclude_dirs: vec![".git".to_string()],
            languages: vec![
                "en".to_string(),
                "de".to_string(),
                "jpn".to_string(),
                "pt".to_string(),
            ],
            pts_cross_prefix: "dn".to_string(),
            pts_cross_ignore: Vec::new(),
            paths: LayerPaths::default(),
            allow: AllowConfig::default(),
        }
    }
}

impl FileConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for dir in &self.exclude_dirs {
            if dir.trim().is_empty() {
                return Err(ConfigError::InvalidValue(
                    "exclude_dirs entries cannot be empty".into(),
                ));
            }
        }

        let mut seen = BTreeSet::new();
        for lang in &self.languages {
            if lang.is_empty() || lang.contains(['/', '\\']) {
                return Err(ConfigError::InvalidValue(format!(
                    "invalid language code '{lang}'"
                )));
            }
            if !seen.insert(lang) {
                return Err(ConfigError::InvalidValue(format!(
                    "duplicate language code '{lang}'"
                )));
            }
        }

        self.allow.validate()
    }
}

/// Root directory of each data layer. Unset layers are skipped.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct LayerPaths {
    pub root: Option<PathBuf>,
    pub html: Option<PathBuf>,
    pub comment: Option<PathBuf>,
    pub variant: Option<PathBuf>,
    pub translation: Option<PathBuf>,
    pub reference: Option<PathBuf>,
}

/// Named allow-lists of segment ids that a check must not report.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct AllowConfig {
    pub missing: Vec<String>,
    pub surplus: Vec<String>,
    pub comment_surplus: Vec<String>,
    pub unordered: Vec<String>,
    pub headers_without_0: Vec<String>,
    pub duplicates: Vec<String>,
    pub unknown_variants: Vec<String>,
    pub variant_arrow: Vec<String>,
}

impl AllowConfig {
    fn lists(&self) -> [(&'static str, &Vec<String>); 8] {
        [
            ("missing", &self.missing),
            ("surplus", &self.surplus),
            ("comment_surplus", &self.comment_surplus),
            ("unordered", &self.unordered),
            ("headers_without_0", &self.headers_without_0),
            ("duplicates", &self.duplicates),
            ("unknown_variants", &self.unknown_variants),
            ("variant_arrow", &self.variant_arrow),
        ]
    }

    /// Every entry must be a valid segment id.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, list) in self.lists() {
            for raw in list {
                SegmentId::parse(raw.as_str()).map_err(|e| {
                    ConfigError::InvalidValue(format!("allow.{name}: {e}"))
                })?;
            }
        }
        Ok(())
    }
}
