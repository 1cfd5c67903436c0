//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Loads the layers it needs through [`Layers`]
//! 2. Runs its checks, which log what they find
//! 3. Returns `Err` only when a layer cannot be loaded at all
//!
//! Layers are loaded on first use and kept, so `all` reads each layer once.

mod comment;
mod html;
mod reconcile;
mod reference;
mod root;
mod translation;
mod variant;

use anyhow::{Context as _, Result};
use once_cell::unsync::OnceCell;
use tracing::info;

use super::args::Command;
use super::Context;
use crate::check::AllowList;
use crate::core::config::{AllowConfig, Config, Layer};
use crate::corpus::{CorpusIndex, LanguageCorpus, ReferenceTable};
use crate::xref::CrossReferenceIndex;

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    let allow = Allow::from_config(ctx.config.allow())?;
    let layers = Layers::new(&ctx.config);

    match command {
        Command::Root => root::root(&layers, &allow),
        Command::Html => html::html(&layers, &allow),
        Command::Comment => comment::comment(&layers, &allow),
        Command::Translation => translation::translation(&layers, &allow),
        Command::Variant => variant::variant(&layers, &allow),
        Command::Reference => reference::reference(&layers),
        Command::All => all(&layers, &allow),
        Command::Reconcile { manuscripts } => reconcile::reconcile(&layers, &manuscripts),
    }
}

/// Run every check whose layers are configured. The root layer is required.
fn all(layers: &Layers<'_>, allow: &Allow) -> Result<()> {
    root::root(layers, allow)?;

    let config = layers.config;
    let steps: [(Layer, fn(&Layers<'_>, &Allow) -> Result<()>); 5] = [
        (Layer::Html, html::html),
        (Layer::Comment, comment::comment),
        (Layer::Translation, translation::translation),
        (Layer::Variant, variant::variant),
        (Layer::Reference, audit_references),
    ];
    for (layer, step) in steps {
        // Translation checks run against the markup layer.
        let needs_html = layer == Layer::Translation;
        if config.layer_opt(layer).is_none()
            || (needs_html && config.layer_opt(Layer::Html).is_none())
        {
            info!("Skipping the {} checks: layer not configured", layer);
            continue;
        }
        step(layers, allow)?;
    }
    Ok(())
}

fn audit_references(layers: &Layers<'_>, _allow: &Allow) -> Result<()> {
    reference::reference(layers)
}

/// Parsed allow-lists, one per check.
#[derive(Debug, Default)]
pub(crate) struct Allow {
    pub missing: AllowList,
    pub surplus: AllowList,
    pub comment_surplus: AllowList,
    pub unordered: AllowList,
    pub headers_without_0: AllowList,
    pub duplicates: AllowList,
    pub unknown_variants: AllowList,
    pub variant_arrow: AllowList,
}

impl Allow {
    fn from_config(config: &AllowConfig) -> Result<Self> {
        let list = |name: &str, raw: &[String]| {
            AllowList::from_config(raw).with_context(|| format!("Invalid allow.{}", name))
        };
        Ok(Self {
            missing: list("missing", &config.missing)?,
            surplus: list("surplus", &config.surplus)?,
            comment_surplus: list("comment_surplus", &config.comment_surplus)?,
            unordered: list("unordered", &config.unordered)?,
            headers_without_0: list("headers_without_0", &config.headers_without_0)?,
            duplicates: list("duplicates", &config.duplicates)?,
            unknown_variants: list("unknown_variants", &config.unknown_variants)?,
            variant_arrow: list("variant_arrow", &config.variant_arrow)?,
        })
    }
}

/// Lazily loaded data layers.
pub(crate) struct Layers<'a> {
    config: &'a Config,
    root: OnceCell<CorpusIndex>,
    html: OnceCell<CorpusIndex>,
    xref: OnceCell<CrossReferenceIndex>,
}

impl<'a> Layers<'a> {
    fn new(config: &'a Config) -> Self {
        Self {
            config,
            root: OnceCell::new(),
            html: OnceCell::new(),
            xref: OnceCell::new(),
        }
    }

    pub fn config(&self) -> &Config {
        self.config
    }

    pub fn root(&self) -> Result<&CorpusIndex> {
        self.root.get_or_try_init(|| self.load(Layer::Root))
    }

    pub fn html(&self) -> Result<&CorpusIndex> {
        self.html.get_or_try_init(|| self.load(Layer::Html))
    }

    /// Load a single-language layer. Not cached.
    pub fn load(&self, layer: Layer) -> Result<CorpusIndex> {
        let path = self.config.layer(layer)?;
        CorpusIndex::from_path(&path, self.config.exclude_dirs())
            .with_context(|| format!("Failed to load the {} layer", layer))
    }

    pub fn translation(&self) -> Result<LanguageCorpus> {
        let path = self.config.layer(Layer::Translation)?;
        LanguageCorpus::from_path(
            &path,
            self.config.exclude_dirs(),
            self.config.languages(),
        )
        .context("Failed to load the translation layer")
    }

    /// Cross-reference index built from the reference layer.
    pub fn xref(&self) -> Result<&CrossReferenceIndex> {
        self.xref.get_or_try_init(|| {
            let path = self.config.layer(Layer::Reference)?;
            let table = ReferenceTable::from_path(&path, self.config.exclude_dirs())
                .context("Failed to load the reference layer")?;
            Ok(CrossReferenceIndex::build(&table))
        })
    }
}
