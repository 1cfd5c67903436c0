//! core::config
//!
//! Configuration schema and loading.
//!
//! # Config Locations
//!
//! Searched in order:
//! 1. The path passed on the command line (`--config`)
//! 2. `$BILARA_CHECK_CONFIG` if set
//! 3. `$XDG_CONFIG_HOME/bilara-check/config.toml`
//! 4. `~/.config/bilara-check/config.toml`
//!
//! A missing config file is not an error; defaults are used and every
//! layer is unset.
//!
//! # Paths
//!
//! Layer roots may start with `~/`. Relative roots are resolved against the
//! directory containing the config file.
//!
//! # Example
//!
//! ```no_run
//! use bilara_check::core::config::{Config, Layer};
//!
//! let config = Config::load(None).unwrap();
//! let root = config.layer(Layer::Root).unwrap();
//! println!("root layer: {}", root.display());
//! println!("languages: {:?}", config.languages());
//! ```

pub mod schema;

pub use schema::{AllowConfig, FileConfig, LayerPaths};

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),

    #[error("no path configured for the {0} layer (set paths.{0})")]
    LayerNotConfigured(Layer),
}

/// A data layer of the corpus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    Root,
    Html,
    Comment,
    Variant,
    Translation,
    Reference,
}

impl Layer {
    pub fn name(self) -> &'static str {
        match self {
            Layer::Root => "root",
            Layer::Html => "html",
            Layer::Comment => "comment",
            Layer::Variant => "variant",
            Layer::Translation => "translation",
            Layer::Reference => "reference",
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Loaded configuration.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// The parsed file contents (or defaults)
    pub file: FileConfig,
    /// Path the config was read from, if any
    source: Option<PathBuf>,
}

impl Config {
    /// Load configuration, honoring an explicit path first.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit path is missing, or if a config file
    /// exists but cannot be read, parsed or validated.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        match Self::search_path() {
            Some(path) => Self::from_file(&path),
            None => Ok(Self::default()),
        }
    }

    /// Read, parse and validate one config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;
        let file: FileConfig = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        file.validate()?;

        Ok(Self {
            file,
            source: Some(path.to_path_buf()),
        })
    }

    /// First existing config file in the default search order.
    fn search_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("BILARA_CHECK_CONFIG") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_home).join("bilara-check/config.toml");
            if path.exists() {
                return Some(path);
            }
        }

        let path = dirs::home_dir()?.join(".config/bilara-check/config.toml");
        path.exists().then_some(path)
    }

    /// Path the config was read from.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Resolved root directory of a layer.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::LayerNotConfigured` if the layer has no path.
    pub fn layer(&self, layer: Layer) -> Result<PathBuf, ConfigError> {
        self.layer_opt(layer)
            .ok_or(ConfigError::LayerNotConfigured(layer))
    }

    /// Resolved root directory of a layer, if configured.
    pub fn layer_opt(&self, layer: Layer) -> Option<PathBuf> {
        let paths = &self.file.paths;
        let raw = match layer {
            Layer::Root => paths.root.as_ref(),
            Layer::Html => paths.html.as_ref(),
            Layer::Comment => paths.comment.as_ref(),
            Layer::Variant => paths.variant.as_ref(),
            Layer::Translation => paths.translation.as_ref(),
            Layer::Reference => paths.reference.as_ref(),
        }?;
        Some(self.resolve(raw))
    }

    fn resolve(&self, raw: &Path) -> PathBuf {
        if let Ok(rest) = raw.strip_prefix("~") {
            if let Some(home) = dirs::home_dir() {
                return home.join(rest);
            }
        }
        if raw.is_relative() {
            if let Some(dir) = self.source.as_deref().and_then(Path::parent) {
                return dir.join(raw);
            }
        }
        raw.to_path_buf()
    }

    pub fn exclude_dirs(&self) -> &[String] {
        &self.file.exclude_dirs
    }

    pub fn languages(&self) -> &[String] {
        &self.file.languages
    }

    pub fn pts_cross_prefix(&self) -> &str {
        &self.file.pts_cross_prefix
    }

    pub fn pts_cross_ignore(&self) -> &[String] {
        &self.file.pts_cross_ignore
    }

    pub fn allow(&self) -> &AllowConfig {
        &self.file.allow
    }
}
