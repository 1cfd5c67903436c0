//! reference command - Audits of the reference table

use anyhow::Result;
use tracing::info;

use super::Layers;
use crate::core::config::Layer;
use crate::xref::audit;

/// Audit the reference layer.
///
/// Segment ids are checked against the root text only when a root layer is
/// configured.
pub fn reference(layers: &Layers<'_>) -> Result<()> {
    let config = layers.config();
    let xref = layers.xref()?;

    audit::duplicated_manuscript_ids(xref);
    audit::misaligned_alternate_edition(xref);
    audit::misaligned_pts_cross(xref, config.pts_cross_prefix(), config.pts_cross_ignore());

    if config.layer_opt(Layer::Root).is_some() {
        audit::unknown_segments(xref, layers.root()?);
    } else {
        info!("[xref] No root layer configured; segment ids not checked");
    }
    Ok(())
}
