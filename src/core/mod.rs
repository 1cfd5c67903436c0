//! core
//!
//! Core domain types and configuration.
//!
//! # Modules
//!
//! - [`types`] - Strong types: SegmentId, Sequence, SeqPart
//! - [`verse`] - Verse text
//! - [`external`] - External ids and reference cells
//! - [`config`] - Configuration schema and loading
//!
//! # Design Principles
//!
//! - Ids are validated once, at the edge, and carried typed afterwards
//! - Schemas are strict and self-describing

pub mod config;
pub mod external;
pub mod types;
pub mod verse;
