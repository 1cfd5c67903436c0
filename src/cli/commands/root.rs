//! root command - Ordering, duplicate and blank-verse checks on the root text

use anyhow::Result;

use super::{Allow, Layers};
use crate::check::sequence::check_order;
use crate::check::verses::{adjacent_duplicates, blank_verses};

/// Check the root layer on its own.
pub fn root(layers: &Layers<'_>, allow: &Allow) -> Result<()> {
    let root = layers.root()?;
    check_order(root, &allow.unordered);
    adjacent_duplicates(root.name(), root.iter(), &allow.duplicates);
    blank_verses(root.name(), root.iter());
    Ok(())
}
