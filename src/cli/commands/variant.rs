//! variant command - Variant readings checked against the root text

use anyhow::Result;

use super::{Allow, Layers};
use crate::check::segments::surplus;
use crate::check::variant::{arrow_mismatches, unknown_variants};
use crate::core::config::Layer;

pub fn variant(layers: &Layers<'_>, allow: &Allow) -> Result<()> {
    let variant = layers.load(Layer::Variant)?;
    let root = layers.root()?;

    surplus(&variant, root, &allow.surplus, false);
    arrow_mismatches(&variant, root, &allow.variant_arrow);
    unknown_variants(&variant, &allow.unknown_variants);
    Ok(())
}
