//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--config <path>`: Use this config file instead of searching for one
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Only show errors

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// bilara-check - Consistency checks for a segmented multi-layer corpus
#[derive(Parser, Debug)]
#[command(name = "bilara-check")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file to use instead of the default search path
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Only show errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Check the root text: ordering, adjacent duplicates, blank verses
    #[command(
        name = "root",
        after_help = "\
EXAMPLES:
    # Check the root layer configured in ~/.config/bilara-check/config.toml
    bilara-check root

    # Use a project-local config
    bilara-check --config ./bilara-check.toml root"
    )]
    Root,

    /// Check markup against the root text
    #[command(
        name = "html",
        long_about = "Check the markup layer against the root text.\n\n\
            Reports heading markup at ids that do not end in 0, root ids without \
            markup, markup ids without root text (added headings excepted), and \
            ordering errors."
    )]
    Html,

    /// Check comments against the root text
    #[command(name = "comment")]
    Comment,

    /// Check every translation language against the markup
    #[command(name = "translation")]
    Translation,

    /// Check variant readings against the root text
    #[command(name = "variant")]
    Variant,

    /// Audit the reference table
    #[command(
        name = "reference",
        long_about = "Audit the reference table.\n\n\
            Builds the segment/manuscript cross-index, reporting ambiguous cells and \
            conflicts, then checks for manuscript ids used more than once, alternate \
            edition and PTS cross numbers that disagree with the segment id, and \
            segment ids the root text does not have."
    )]
    Reference,

    /// Run every check whose layers are configured
    #[command(name = "all")]
    All,

    /// Reconcile the reference table with a manuscript corpus
    #[command(
        name = "reconcile",
        after_help = "\
EXAMPLES:
    # Compare reference data with a directory of manuscript files
    bilara-check reconcile --manuscripts ~/data/ms"
    )]
    Reconcile {
        /// Directory of JSON files keyed by manuscript id
        #[arg(long, value_name = "DIR")]
        manuscripts: PathBuf,
    },
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Root => "root",
            Command::Html => "html",
            Command::Comment => "comment",
            Command::Translation => "translation",
            Command::Variant => "variant",
            Command::Reference => "reference",
            Command::All => "all",
            Command::Reconcile { .. } => "reconcile",
        }
    }
}
