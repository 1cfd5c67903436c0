//! reconcile command - Reference data against a manuscript corpus

use std::path::Path;

use anyhow::{Context as _, Result};
use tracing::info;

use super::Layers;
use crate::xref::ManuscriptCorpus;

/// Report manuscript ids the references never name, and referenced ids the
/// manuscript corpus lacks.
pub fn reconcile(layers: &Layers<'_>, manuscripts: &Path) -> Result<()> {
    let xref = layers.xref()?;
    let corpus = ManuscriptCorpus::from_path(manuscripts, layers.config().exclude_dirs())
        .with_context(|| format!("Failed to load manuscripts from '{}'", manuscripts.display()))?;

    let result = xref.reconcile(&corpus.ids());
    result.log();
    if result.is_empty() {
        info!("[xref] All '{}' manuscript ids are placed", corpus.len());
    }
    Ok(())
}
