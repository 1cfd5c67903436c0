//! corpus
//!
//! Loading data layers from disk into immutable indices.
//!
//! # Modules
//!
//! - [`file_index`] - One JSON file as an ordered, typed index
//! - [`aggregate`] - Corpus-wide merge with the duplicate-key invariant
//! - [`reference`] - The raw reference table
//! - [`natural`] - Numeric-aware path ordering
//!
//! # Invariants
//!
//! - Files are merged in natural path order, so corpus order and duplicate
//!   reporting are reproducible
//! - A key defined by two files aborts the load (`CorpusError::DuplicateKey`)
//! - A missing or unreadable root aborts the load; an unreadable file under
//!   the root is logged, counted and skipped

pub mod aggregate;
pub mod file_index;
pub mod natural;
pub mod reference;

pub use aggregate::{CorpusIndex, LanguageCorpus};
pub use file_index::{FileIndex, Quarantined};
pub use reference::ReferenceTable;

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, error, info, warn};
use walkdir::WalkDir;

/// Errors from loading a corpus.
#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("corpus root not found: {0}")]
    RootNotFound(PathBuf),

    #[error("corpus root is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse '{path}': {message}")]
    Parse { path: PathBuf, message: String },

    #[error("'{0}' does not contain a JSON object")]
    NotAnObject(PathBuf),

    #[error("lost data: key '{key}' in '{path}' is already defined in '{existing}'")]
    DuplicateKey {
        key: String,
        path: PathBuf,
        existing: PathBuf,
    },

    #[error("no language detected in path '{0}'")]
    LanguageNotDetected(PathBuf),

    #[error("file '{0}' is not part of this corpus")]
    UnknownFile(PathBuf),

    #[error("failed to write '{path}': {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// File counts for one corpus load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadStats {
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl LoadStats {
    /// Percentage of attempted files that failed to load.
    pub fn failed_ratio(&self) -> f64 {
        if self.attempted == 0 {
            0.0
        } else {
            self.failed as f64 * 100.0 / self.attempted as f64
        }
    }

    fn log(&self, label: &str) {
        info!(
            "[{}] Processed: '{}' files. good: '{}', bad: '{}'. Failed ratio: {:.2}%",
            label,
            self.attempted,
            self.succeeded,
            self.failed,
            self.failed_ratio()
        );
    }
}

/// Read a file holding a single JSON object, keeping key order.
pub fn read_json_object(path: &Path) -> Result<Map<String, Value>, CorpusError> {
    let contents = fs::read_to_string(path).map_err(|e| CorpusError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;
    let value: Value = serde_json::from_str(&contents).map_err(|e| CorpusError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(CorpusError::NotAnObject(path.to_path_buf())),
    }
}

fn is_excluded(root: &Path, path: &Path, exclude_dirs: &[String]) -> bool {
    let relative = path.strip_prefix(root).unwrap_or(path);
    exclude_dirs.iter().any(|dir| {
        relative == Path::new(dir)
            || path
                .file_name()
                .is_some_and(|name| name == std::ffi::OsStr::new(dir))
    })
}

/// Every `*.json` file under `root`, skipping excluded directories.
///
/// An exclude entry matches either a directory name anywhere in the tree or
/// a path relative to `root`. The result is in natural order.
pub fn collect_json_files(
    root: &Path,
    exclude_dirs: &[String],
) -> Result<Vec<PathBuf>, CorpusError> {
    if !root.exists() {
        return Err(CorpusError::RootNotFound(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(CorpusError::NotADirectory(root.to_path_buf()));
    }

    let walker = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| {
            e.depth() == 0
                || !e.file_type().is_dir()
                || !is_excluded(root, e.path(), exclude_dirs)
        });

    let mut files = Vec::new();
    for entry in walker {
        match entry {
            Ok(entry) => {
                let is_json = entry.path().extension().is_some_and(|ext| ext == "json");
                if entry.file_type().is_file() && is_json {
                    files.push(entry.into_path());
                }
            }
            Err(e) if e.depth() == 0 => {
                return Err(CorpusError::Read {
                    path: root.to_path_buf(),
                    source: e.into(),
                });
            }
            Err(e) => {
                // Unreadable subdirectory; keep walking the rest of the tree
                warn!("Error accessing entry under '{}': {}", root.display(), e);
            }
        }
    }

    natural::sort_paths(&mut files);
    debug!("Found {} json files under '{}'", files.len(), root.display());
    Ok(files)
}

/// Walk `root` and load every file with `load`, in parallel.
///
/// Results come back in natural path order. Files that fail to load are
/// logged and counted, never returned.
pub(crate) fn load_all<T, F>(
    label: &str,
    root: &Path,
    exclude_dirs: &[String],
    load: F,
) -> Result<(Vec<T>, LoadStats), CorpusError>
where
    T: Send,
    F: Fn(&Path) -> Result<T, CorpusError> + Sync,
{
    let paths = collect_json_files(root, exclude_dirs)?;
    let results: Vec<Result<T, CorpusError>> =
        paths.par_iter().map(|p| load(p.as_path())).collect();

    let mut stats = LoadStats::default();
    let mut loaded = Vec::with_capacity(results.len());
    for result in results {
        stats.attempted += 1;
        match result {
            Ok(item) => {
                stats.succeeded += 1;
                loaded.push(item);
            }
            Err(e) => {
                stats.failed += 1;
                error!("[{}] Error loading file: {}", label, e);
            }
        }
    }
    stats.log(label);
    Ok((loaded, stats))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(dir: &TempDir, rel: &str, contents: &str) {
        let path = dir.path().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn collects_json_in_natural_order() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "mn/mn10.json", "{}");
        touch(&dir, "mn/mn9.json", "{}");
        touch(&dir, "mn/notes.txt", "");
        let files = collect_json_files(dir.path(), &[]).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["mn9.json", "mn10.json"]);
    }

    #[test]
    fn excluded_dirs_skipped() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "a/keep.json", "{}");
        touch(&dir, "playground/skip.json", "{}");
        touch(&dir, "b/nested/skip.json", "{}");
        let exclude = vec!["playground".to_string(), "b/nested".to_string()];
        let files = collect_json_files(dir.path(), &exclude).unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("a/keep.json"));
    }

    #[test]
    fn missing_root_is_fatal() {
        let dir = TempDir::new().unwrap();
        let err = collect_json_files(&dir.path().join("nope"), &[]).unwrap_err();
        assert!(matches!(err, CorpusError::RootNotFound(_)));
    }

    #[test]
    fn file_root_is_fatal() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "file.json", "{}");
        let err = collect_json_files(&dir.path().join("file.json"), &[]).unwrap_err();
        assert!(matches!(err, CorpusError::NotADirectory(_)));
    }

    #[test]
    fn read_rejects_non_objects() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "list.json", "[1, 2]");
        touch(&dir, "broken.json", "{");
        assert!(matches!(
            read_json_object(&dir.path().join("list.json")),
            Err(CorpusError::NotAnObject(_))
        ));
        assert!(matches!(
            read_json_object(&dir.path().join("broken.json")),
            Err(CorpusError::Parse { .. })
        ));
    }

    #[test]
    fn read_keeps_key_order() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "o.json", r#"{"b": "1", "a": "2", "c": "3"}"#);
        let map = read_json_object(&dir.path().join("o.json")).unwrap();
        let keys: Vec<_> = map.keys().cloned().collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
    }

    #[test]
    fn load_all_counts_failures() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "a1.json", "{}");
        touch(&dir, "a2.json", "not json");
        touch(&dir, "a3.json", "{}");
        let (loaded, stats) = load_all("test", dir.path(), &[], read_json_object).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(
            stats,
            LoadStats {
                attempted: 3,
                succeeded: 2,
                failed: 1
            }
        );
        assert!((stats.failed_ratio() - 33.333).abs() < 0.01);
    }
}
