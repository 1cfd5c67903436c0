//! comment command - Comments must annotate existing root segments

use anyhow::Result;

use super::{Allow, Layers};
use crate::check::segments::surplus;
use crate::core::config::Layer;

pub fn comment(layers: &Layers<'_>, allow: &Allow) -> Result<()> {
    let comment = layers.load(Layer::Comment)?;
    let root = layers.root()?;
    surplus(&comment, root, &allow.comment_surplus, false);
    Ok(())
}
