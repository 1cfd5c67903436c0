//! corpus::aggregate
//!
//! Corpus-wide indices merged from per-file indices.
//!
//! # Duplicate invariant
//!
//! `CorpusIndex::len() == Σ FileIndex::len()` for the files it holds. A key
//! that two files both define would shrink the merged index, so the merge
//! aborts with [`CorpusError::DuplicateKey`] naming both files instead.

use std::collections::{BTreeMap, HashMap};
use std::path::{Component, Path};

use tracing::{debug, info};

use super::{load_all, CorpusError, FileIndex, LoadStats, Quarantined};
use crate::core::types::SegmentId;
use crate::core::verse::Verse;

/// All files of one layer merged into a single index.
///
/// Iteration follows corpus order: files in natural path order, entries in
/// file order.
#[derive(Debug, Clone)]
pub struct CorpusIndex {
    name: String,
    files: Vec<FileIndex>,
    /// Segment id to position in `files`
    index: HashMap<SegmentId, usize>,
    stats: LoadStats,
}

impl CorpusIndex {
    /// Walk `root` and merge every JSON file under it.
    ///
    /// The index is named after the root directory.
    ///
    /// # Errors
    ///
    /// Fails if the root is missing or unreadable, or on a cross-file
    /// duplicate key. Individual unreadable files are logged and skipped.
    pub fn from_path(root: &Path, exclude_dirs: &[String]) -> Result<Self, CorpusError> {
        let name = layer_name(root);
        let (files, stats) = load_all(&name, root, exclude_dirs, FileIndex::from_file)?;
        let mut corpus = Self::from_files(name, files)?;
        corpus.stats = stats;
        Ok(corpus)
    }

    /// Merge already-loaded files, in the order given.
    ///
    /// # Errors
    ///
    /// Returns `CorpusError::DuplicateKey` on the first key defined twice.
    pub fn from_files(
        name: impl Into<String>,
        files: Vec<FileIndex>,
    ) -> Result<Self, CorpusError> {
        let name = name.into();
        let total: usize = files.iter().map(FileIndex::len).sum();
        let mut index: HashMap<SegmentId, usize> = HashMap::with_capacity(total);

        for (file_no, file) in files.iter().enumerate() {
            for id in file.ids() {
                if let Some(&existing) = index.get(id) {
                    return Err(CorpusError::DuplicateKey {
                        key: id.to_string(),
                        path: file.path().to_path_buf(),
                        existing: files[existing].path().to_path_buf(),
                    });
                }
                index.insert(id.clone(), file_no);
            }
        }
        debug_assert_eq!(index.len(), total);
        debug!("[{}] Merged '{}' entries from '{}' files", name, total, files.len());

        let stats = LoadStats {
            attempted: files.len(),
            succeeded: files.len(),
            failed: 0,
        };
        Ok(Self {
            name,
            files,
            index,
            stats,
        })
    }

    /// A new index with the file at `file.path()` swapped for `file`.
    ///
    /// # Errors
    ///
    /// Returns `CorpusError::UnknownFile` if no file has that path, or
    /// `CorpusError::DuplicateKey` if the replacement collides with another
    /// file.
    pub fn replace_file(&self, file: FileIndex) -> Result<Self, CorpusError> {
        let pos = self
            .files
            .iter()
            .position(|f| f.path() == file.path())
            .ok_or_else(|| CorpusError::UnknownFile(file.path().to_path_buf()))?;

        let mut files = self.files.clone();
        files[pos] = file;
        let mut next = Self::from_files(self.name.clone(), files)?;
        next.stats = self.stats;
        Ok(next)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of entries across all files.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn get(&self, id: &SegmentId) -> Option<&Verse> {
        self.file_of(id).and_then(|file| file.get(id))
    }

    pub fn contains(&self, id: &SegmentId) -> bool {
        self.index.contains_key(id)
    }

    /// The file that defines `id`.
    pub fn file_of(&self, id: &SegmentId) -> Option<&FileIndex> {
        self.index.get(id).map(|&i| &self.files[i])
    }

    /// Entries in corpus order.
    pub fn iter(&self) -> impl Iterator<Item = (&SegmentId, &Verse)> {
        self.files.iter().flat_map(FileIndex::iter)
    }

    /// Ids in corpus order.
    pub fn ids(&self) -> impl Iterator<Item = &SegmentId> {
        self.files.iter().flat_map(FileIndex::ids)
    }

    /// Contributing files in natural path order.
    pub fn files(&self) -> &[FileIndex] {
        &self.files
    }

    /// Quarantined entries of every file, with the file they came from.
    pub fn errors(&self) -> impl Iterator<Item = (&Path, &Quarantined)> {
        self.files
            .iter()
            .flat_map(|f| f.errors().iter().map(move |q| (f.path(), q)))
    }

    pub fn stats(&self) -> LoadStats {
        self.stats
    }
}

fn layer_name(root: &Path) -> String {
    root.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| root.display().to_string())
}

/// A multi-language layer: one [`CorpusIndex`] per language code.
///
/// Each language keeps its own duplicate invariant, so the same id may exist
/// once per language.
#[derive(Debug, Clone)]
pub struct LanguageCorpus {
    name: String,
    by_lang: BTreeMap<String, CorpusIndex>,
    stats: LoadStats,
}

impl LanguageCorpus {
    /// Walk `root` and group files by the language found in their path.
    ///
    /// The language of a file is the path component closest to the file
    /// that is one of `languages`.
    ///
    /// # Errors
    ///
    /// As [`CorpusIndex::from_path`], plus
    /// `CorpusError::LanguageNotDetected` for a file outside every language
    /// directory.
    pub fn from_path(
        root: &Path,
        exclude_dirs: &[String],
        languages: &[String],
    ) -> Result<Self, CorpusError> {
        let name = layer_name(root);
        let (files, stats) = load_all(&name, root, exclude_dirs, FileIndex::from_file)?;

        let mut grouped: BTreeMap<String, Vec<FileIndex>> = BTreeMap::new();
        for file in files {
            let relative = file.path().strip_prefix(root).unwrap_or(file.path());
            let lang = detect_language(relative, languages)
                .ok_or_else(|| CorpusError::LanguageNotDetected(file.path().to_path_buf()))?;
            grouped.entry(lang.to_string()).or_default().push(file);
        }

        let mut by_lang = BTreeMap::new();
        for (lang, files) in grouped {
            let corpus = CorpusIndex::from_files(format!("{name}/{lang}"), files)?;
            info!("[{}] Language '{}': '{}' entries", name, lang, corpus.len());
            by_lang.insert(lang, corpus);
        }

        Ok(Self {
            name,
            by_lang,
            stats,
        })
    }

    /// Build from per-language indices.
    pub fn from_languages(
        name: impl Into<String>,
        by_lang: BTreeMap<String, CorpusIndex>,
    ) -> Self {
        let files = by_lang.values().map(|c| c.files().len()).sum();
        Self {
            name: name.into(),
            by_lang,
            stats: LoadStats {
                attempted: files,
                succeeded: files,
                failed: 0,
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self, lang: &str) -> Option<&CorpusIndex> {
        self.by_lang.get(lang)
    }

    /// Languages present, sorted.
    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.by_lang.keys().map(String::as_str)
    }

    /// `(language, index)` pairs sorted by language.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CorpusIndex)> {
        self.by_lang.iter().map(|(lang, c)| (lang.as_str(), c))
    }

    /// Entries across every language.
    pub fn len(&self) -> usize {
        self.by_lang.values().map(CorpusIndex::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> LoadStats {
        self.stats
    }
}

fn detect_language<'a>(relative: &Path, languages: &'a [String]) -> Option<&'a str> {
    let dirs: Vec<&std::ffi::OsStr> = relative
        .parent()
        .unwrap_or(Path::new(""))
        .components()
        .filter_map(|c| match c {
            Component::Normal(name) => Some(name),
            _ => None,
        })
        .collect();

    dirs.iter().rev().find_map(|dir| {
        languages
            .iter()
            .find(|lang| std::ffi::OsStr::new(lang.as_str()) == *dir)
            .map(String::as_str)
    })
}
