//! corpus::reference
//!
//! The reference layer as raw `segment id -> reference cell` pairs.
//!
//! Keys stay raw strings here. Validation happens when the cross-reference
//! index is built, so a bad key in reference data is reported there instead
//! of being quarantined silently at load time.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, error};

use super::{load_all, read_json_object, CorpusError, LoadStats, Quarantined};

/// Raw entries of one reference file.
#[derive(Debug, Clone)]
struct ReferenceFile {
    path: PathBuf,
    entries: Vec<(String, String)>,
    errors: Vec<Quarantined>,
}

impl ReferenceFile {
    fn from_file(path: &Path) -> Result<Self, CorpusError> {
        let map = read_json_object(path)?;
        let mut entries = Vec::with_capacity(map.len());
        let mut errors = Vec::new();
        for (key, value) in map {
            match value {
                Value::String(cell) => entries.push((key, cell)),
                other => errors.push(Quarantined {
                    key,
                    value: other,
                    reason: "value is not a string".into(),
                }),
            }
        }
        if !errors.is_empty() {
            error!(
                "[{}] Lost '{}' reference entries with non-string values",
                path.display(),
                errors.len()
            );
        }
        Ok(Self {
            path: path.to_path_buf(),
            entries,
            errors,
        })
    }
}

/// Merged reference table in corpus order.
#[derive(Debug, Clone, Default)]
pub struct ReferenceTable {
    entries: Vec<(String, String)>,
    lookup: HashMap<String, usize>,
    errors: Vec<(PathBuf, Quarantined)>,
    stats: LoadStats,
}

impl ReferenceTable {
    /// Walk `root` and merge every reference file under it.
    ///
    /// # Errors
    ///
    /// Fails if the root is missing or unreadable, or on a cross-file
    /// duplicate key.
    pub fn from_path(root: &Path, exclude_dirs: &[String]) -> Result<Self, CorpusError> {
        let (files, stats) = load_all("reference", root, exclude_dirs, ReferenceFile::from_file)?;
        let mut table = Self::default();
        let mut owner: Vec<PathBuf> = Vec::new();
        for file in files {
            table.merge(&file.path, file.entries, &owner)?;
            owner.resize(table.entries.len(), file.path.clone());
            table
                .errors
                .extend(file.errors.into_iter().map(|q| (file.path.clone(), q)));
        }
        table.stats = stats;
        debug!("[reference] Merged '{}' entries", table.len());
        Ok(table)
    }

    /// Build from in-memory pairs attributed to `path`.
    ///
    /// # Errors
    ///
    /// Returns `CorpusError::DuplicateKey` if a key appears twice.
    pub fn from_entries(
        path: impl Into<PathBuf>,
        entries: Vec<(String, String)>,
    ) -> Result<Self, CorpusError> {
        let path = path.into();
        let mut table = Self::default();
        let owner = Vec::new();
        table.merge(&path, entries, &owner)?;
        table.stats = LoadStats {
            attempted: 1,
            succeeded: 1,
            failed: 0,
        };
        Ok(table)
    }

    /// `owner[i]` is the file that contributed entry `i` so far.
    fn merge(
        &mut self,
        path: &Path,
        entries: Vec<(String, String)>,
        owner: &[PathBuf],
    ) -> Result<(), CorpusError> {
        for (key, cell) in entries {
            if let Some(&existing) = self.lookup.get(&key) {
                let existing = owner
                    .get(existing)
                    .cloned()
                    .unwrap_or_else(|| path.to_path_buf());
                return Err(CorpusError::DuplicateKey {
                    key,
                    path: path.to_path_buf(),
                    existing,
                });
            }
            self.lookup.insert(key.clone(), self.entries.len());
            self.entries.push((key, cell));
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The raw cell for a raw key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.lookup.get(key).map(|&i| self.entries[i].1.as_str())
    }

    /// `(key, cell)` pairs in corpus order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Entries dropped for non-string values.
    pub fn errors(&self) -> &[(PathBuf, Quarantined)] {
        &self.errors
    }

    pub fn stats(&self) -> LoadStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn from_entries_keeps_order() {
        let table = ReferenceTable::from_entries(
            "mem",
            pairs(&[("w:1.2", "sc2, ms1V_2"), ("w:1.1", "sc1, ms1V_1")]),
        )
        .unwrap();
        let keys: Vec<_> = table.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["w:1.2", "w:1.1"]);
        assert_eq!(table.get("w:1.1"), Some("sc1, ms1V_1"));
    }

    #[test]
    fn duplicate_in_memory_rejected() {
        let err = ReferenceTable::from_entries("mem", pairs(&[("a:1", "x"), ("a:1", "y")]))
            .unwrap_err();
        assert!(matches!(err, CorpusError::DuplicateKey { .. }));
    }

    #[test]
    fn loads_tree_and_names_both_files_on_collision() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("sutta")).unwrap();
        fs::write(
            dir.path().join("sutta/dn1_reference.json"),
            r#"{"dn1:1.1": "sc1, ms1D_1"}"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("sutta/dn2_reference.json"),
            r#"{"dn1:1.1": "sc9, ms1D_9"}"#,
        )
        .unwrap();

        let err = ReferenceTable::from_path(dir.path(), &[]).unwrap_err();
        match err {
            CorpusError::DuplicateKey { path, existing, .. } => {
                assert!(path.ends_with("dn2_reference.json"));
                assert!(existing.ends_with("dn1_reference.json"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn non_string_values_quarantined() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("r.json"),
            r#"{"a:1": "sc1", "a:2": 3, "a:3": null}"#,
        )
        .unwrap();
        let table = ReferenceTable::from_path(dir.path(), &[]).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.errors().len(), 2);
        assert_eq!(table.stats().succeeded, 1);
    }
}
