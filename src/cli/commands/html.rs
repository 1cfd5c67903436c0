//! html command - Markup checked against the root text

use anyhow::Result;

use super::{Allow, Layers};
use crate::check::segments::{missing, surplus};
use crate::check::sequence::check_order;
use crate::check::verses::misplaced_headers;

/// Check the markup layer.
///
/// Surplus ids ending in `0` are headings added by the markup and are not
/// reported.
pub fn html(layers: &Layers<'_>, allow: &Allow) -> Result<()> {
    let html = layers.html()?;
    let root = layers.root()?;

    misplaced_headers(html.name(), html.iter(), &allow.headers_without_0);
    missing(html, root, &allow.missing);
    surplus(html, root, &allow.surplus, true);
    check_order(html, &allow.unordered);
    Ok(())
}
