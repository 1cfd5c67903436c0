//! bilara-check - Consistency checks for a segmented multi-layer corpus
//!
//! A corpus is a set of parallel layers (root text, markup, comments,
//! variants, translations, references), each a tree of JSON files mapping
//! segment ids to text. bilara-check loads the layers into typed indices and
//! reports everything that does not line up.
//!
//! # Architecture
//!
//! - [`core`] - Domain types: segment ids, verses, external ids, config
//! - [`corpus`] - Loading layers from disk into immutable indices
//! - [`check`] - Pure checks over loaded indices
//! - [`xref`] - Segment/manuscript cross-reference engine and audits
//! - [`logging`] - Subscriber setup and the error counter
//! - [`cli`] - Command-line interface layer
//!
//! # Reporting
//!
//! Checks return their findings as sorted sets and log them. Every data
//! problem is logged at ERROR; only failures to load anything at all are
//! returned as errors.

pub mod check;
pub mod cli;
pub mod core;
pub mod corpus;
pub mod logging;
pub mod xref;
