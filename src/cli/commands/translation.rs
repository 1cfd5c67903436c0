//! translation command - Every language checked against the markup

use anyhow::{bail, Result};
use tracing::info;

use super::{Allow, Layers};
use crate::check::segments::surplus_per_language;
use crate::check::sequence::check_order;

/// Check each translation language for ids the markup lacks, and for
/// ordering.
pub fn translation(layers: &Layers<'_>, allow: &Allow) -> Result<()> {
    if layers.config().languages().is_empty() {
        bail!("No languages configured (set languages in the config file)");
    }
    let translation = layers.translation()?;
    let html = layers.html()?;

    let surplus = surplus_per_language(&translation, html, &allow.surplus, false);
    info!(
        "[{}] '{}' of '{}' languages have surplus ids",
        translation.name(),
        surplus.len(),
        translation.languages().count()
    );
    for (_, corpus) in translation.iter() {
        check_order(corpus, &allow.unordered);
    }
    Ok(())
}
