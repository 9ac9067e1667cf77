//! Relationship-graph domain for Parley.
//!
//! Students register relationships between fighting styles, games, and
//! skills; this crate builds the typed multigraph, derives filtered
//! subgraphs from a relation mask, computes degree-based node styling,
//! partitions into communities, and produces the JSON payload consumed by
//! the interactive visualization library. Pure synchronous; no HTTP
//! dependencies — the flat-file record store is the only I/O.

pub mod catalog;
pub mod community;
pub mod error;
pub mod graph;
pub mod record;
pub mod render;
pub mod store;
pub mod style;

pub use error::{Error, Result};
pub use graph::{EdgeKind, NodeKind, RelationMask, StyleGraph};
pub use record::{SkillGroup, StyleRecord};
