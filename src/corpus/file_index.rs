//! corpus::file_index
//!
//! One JSON file of a layer as an ordered, typed index.
//!
//! # Quarantine
//!
//! A key that fails segment id validation, or whose value is not a string,
//! does not fail the file. It moves to a side-table of [`Quarantined`]
//! entries so that `input == valid + quarantined` always holds.
//!
//! # Replacement
//!
//! A `FileIndex` is never mutated. [`FileIndex::with_verse`] and
//! [`FileIndex::without`] return a new value, which the owner swaps in and
//! writes back with [`FileIndex::write_json`].

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::{debug, error};

use super::{read_json_object, CorpusError};
use crate::core::types::SegmentId;
use crate::core::verse::Verse;

/// A raw entry that could not be turned into a typed one.
#[derive(Debug, Clone, PartialEq)]
pub struct Quarantined {
    pub key: String,
    pub value: Value,
    pub reason: String,
}

/// Ordered mapping of segment id to verse for a single file.
#[derive(Debug, Clone)]
pub struct FileIndex {
    path: PathBuf,
    entries: Vec<(SegmentId, Verse)>,
    lookup: HashMap<SegmentId, usize>,
    errors: Vec<Quarantined>,
}

impl FileIndex {
    /// Load a file.
    ///
    /// # Errors
    ///
    /// Fails only if the file cannot be read or is not a JSON object.
    /// Malformed keys are quarantined.
    pub fn from_file(path: &Path) -> Result<Self, CorpusError> {
        let map = read_json_object(path)?;
        Ok(Self::from_map(map, path))
    }

    /// Build from an already-parsed JSON object, keeping its key order.
    pub fn from_map(map: Map<String, Value>, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let input_len = map.len();
        let mut entries = Vec::with_capacity(input_len);
        let mut lookup = HashMap::with_capacity(input_len);
        let mut errors = Vec::new();

        for (key, value) in map {
            let text = match value {
                Value::String(text) => text,
                other => {
                    errors.push(Quarantined {
                        key,
                        value: other,
                        reason: "value is not a string".into(),
                    });
                    continue;
                }
            };
            match SegmentId::parse(key.as_str()) {
                Ok(id) => {
                    lookup.insert(id.clone(), entries.len());
                    entries.push((id, Verse::new(text)));
                }
                Err(e) => errors.push(Quarantined {
                    key,
                    value: Value::String(text),
                    reason: e.to_string(),
                }),
            }
        }
        debug_assert_eq!(input_len, entries.len() + errors.len());

        if errors.is_empty() {
            debug!("[{}] Loaded '{}' entries, dropped '0'", path.display(), entries.len());
        } else {
            let keys: Vec<&str> = errors.iter().map(|q| q.key.as_str()).collect();
            error!(
                "[{}] Lost '{}' entries during domain model conversion: {:?}",
                path.display(),
                errors.len(),
                keys
            );
        }

        Self {
            path,
            entries,
            lookup,
            errors,
        }
    }

    /// Build from typed entries.
    ///
    /// # Errors
    ///
    /// Returns `CorpusError::DuplicateKey` if an id appears twice.
    pub fn from_entries(
        path: impl Into<PathBuf>,
        entries: Vec<(SegmentId, Verse)>,
    ) -> Result<Self, CorpusError> {
        let path = path.into();
        let mut lookup = HashMap::with_capacity(entries.len());
        for (i, (id, _)) in entries.iter().enumerate() {
            if lookup.insert(id.clone(), i).is_some() {
                return Err(CorpusError::DuplicateKey {
                    key: id.to_string(),
                    path: path.clone(),
                    existing: path,
                });
            }
        }
        Ok(Self {
            path,
            entries,
            lookup,
            errors: Vec::new(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of valid entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &SegmentId) -> Option<&Verse> {
        self.lookup.get(id).map(|&i| &self.entries[i].1)
    }

    pub fn contains(&self, id: &SegmentId) -> bool {
        self.lookup.contains_key(id)
    }

    /// Valid entries in file order.
    pub fn iter(&self) -> impl Iterator<Item = (&SegmentId, &Verse)> {
        self.entries.iter().map(|(id, verse)| (id, verse))
    }

    /// Valid ids in file order.
    pub fn ids(&self) -> impl Iterator<Item = &SegmentId> {
        self.entries.iter().map(|(id, _)| id)
    }

    /// Quarantined raw entries, in file order.
    pub fn errors(&self) -> &[Quarantined] {
        &self.errors
    }

    /// A copy with `id` set to `verse`, replacing in place or appending.
    pub fn with_verse(&self, id: SegmentId, verse: Verse) -> Self {
        let mut next = self.clone();
        match next.lookup.get(&id) {
            Some(&i) => next.entries[i].1 = verse,
            None => {
                next.lookup.insert(id.clone(), next.entries.len());
                next.entries.push((id, verse));
            }
        }
        next
    }

    /// A copy without `id`. Returns an unchanged copy if it is absent.
    pub fn without(&self, id: &SegmentId) -> Self {
        let entries: Vec<_> = self
            .entries
            .iter()
            .filter(|(existing, _)| existing != id)
            .cloned()
            .collect();
        let lookup = entries
            .iter()
            .enumerate()
            .map(|(i, (id, _))| (id.clone(), i))
            .collect();
        Self {
            path: self.path.clone(),
            entries,
            lookup,
            errors: self.errors.clone(),
        }
    }

    /// JSON object for this file: valid entries in order, then quarantined
    /// entries so nothing from the source is lost.
    pub fn to_json(&self) -> Map<String, Value> {
        let mut map = Map::with_capacity(self.entries.len() + self.errors.len());
        for (id, verse) in &self.entries {
            map.insert(id.to_string(), Value::String(verse.text().to_string()));
        }
        for q in &self.errors {
            map.insert(q.key.clone(), q.value.clone());
        }
        map
    }

    /// Write this index back to its path as indented, Unicode-preserving
    /// JSON.
    ///
    /// Uses atomic write (temp file, then rename).
    pub fn write_json(&self) -> Result<(), CorpusError> {
        let write_err = |path: &Path| {
            let path = path.to_path_buf();
            move |e| CorpusError::Write { path, source: e }
        };

        let mut contents = serde_json::to_string_pretty(&Value::Object(self.to_json()))
            .map_err(|e| CorpusError::Write {
                path: self.path.clone(),
                source: e.into(),
            })?;
        contents.push('\n');

        let temp_path = self.path.with_extension("json.tmp");
        let mut file = fs::File::create(&temp_path).map_err(write_err(&temp_path))?;
        file.write_all(contents.as_bytes())
            .map_err(write_err(&temp_path))?;
        file.sync_all().map_err(write_err(&temp_path))?;

        fs::rename(&temp_path, &self.path).map_err(write_err(&self.path))?;
        debug!("[{}] Wrote '{}' entries", self.path.display(), self.entries.len());
        Ok(())
    }
}
