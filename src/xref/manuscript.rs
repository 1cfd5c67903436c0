//! xref::manuscript
//!
//! An externally keyed corpus: JSON files mapping manuscript ids to text.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, error};

use crate::core::external::ExternalId;
use crate::corpus::{load_all, read_json_object, CorpusError, LoadStats};

#[derive(Debug)]
struct ManuscriptFile {
    path: PathBuf,
    entries: Vec<(ExternalId, String)>,
}

impl ManuscriptFile {
    fn from_file(path: &Path) -> Result<Self, CorpusError> {
        let map = read_json_object(path)?;
        let input_len = map.len();
        let mut entries = Vec::with_capacity(input_len);
        let mut dropped = Vec::new();
        for (key, value) in map {
            match (ExternalId::manuscript(key.as_str()), value) {
                (Ok(id), Value::String(text)) => entries.push((id, text)),
                _ => dropped.push(key),
            }
        }
        if !dropped.is_empty() {
            error!(
                "[{}] Lost '{}' entries that are not manuscript ids with text: {:?}",
                path.display(),
                dropped.len(),
                dropped
            );
        }
        debug_assert_eq!(input_len, entries.len() + dropped.len());
        Ok(Self {
            path: path.to_path_buf(),
            entries,
        })
    }
}

/// Manuscript ids and their text, merged from every file under a root.
#[derive(Debug, Clone, Default)]
pub struct ManuscriptCorpus {
    entries: BTreeMap<ExternalId, String>,
    stats: LoadStats,
}

impl ManuscriptCorpus {
    /// Walk `root` and merge every manuscript file.
    ///
    /// # Errors
    ///
    /// Fails if the root is missing or unreadable, or if two files define the
    /// same manuscript id.
    pub fn from_path(root: &Path, exclude_dirs: &[String]) -> Result<Self, CorpusError> {
        let (files, stats) =
            load_all("manuscript", root, exclude_dirs, ManuscriptFile::from_file)?;

        let mut owner: BTreeMap<ExternalId, PathBuf> = BTreeMap::new();
        let mut entries = BTreeMap::new();
        for file in files {
            for (id, text) in file.entries {
                if let Some(existing) = owner.get(&id) {
                    return Err(CorpusError::DuplicateKey {
                        key: id.to_string(),
                        path: file.path.clone(),
                        existing: existing.clone(),
                    });
                }
                owner.insert(id.clone(), file.path.clone());
                entries.insert(id, text);
            }
        }
        debug!("[manuscript] Merged '{}' manuscript ids", entries.len());
        Ok(Self { entries, stats })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &ExternalId) -> Option<&str> {
        self.entries.get(id).map(String::as_str)
    }

    /// Sorted set of every manuscript id.
    pub fn ids(&self) -> BTreeSet<ExternalId> {
        self.entries.keys().cloned().collect()
    }

    pub fn stats(&self) -> LoadStats {
        self.stats
    }
}
