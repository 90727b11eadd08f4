//! # gedcom2gtr
//!
//! Bounded sandclock trees from GEDCOM, rendered for LaTeX genealogytree.
//!
//! The crate answers one question:
//!
//! > Given a root individual, which relatives belong in its sandclock chart?
//!
//! ## Core Contract
//!
//! 1. Index GEDCOM records into a validated, read-only relationship graph
//! 2. Expand around a root, bounded by ancestor and descendant generation limits
//! 3. Serialize the result as genealogytree `sandclock` text
//!
//! ## Architecture
//!
//! ```text
//! GEDCOM → RecordSet → build_index → RecordGraph → TreeBuilder → TreeNode → render
//!                                                        ↑
//!                                                   TreeConfig
//! ```
//!
//! ## Determinism Guarantees
//!
//! - Same graph + same root + same config → byte-identical output
//! - Children and spouses follow record order in the source families
//! - No individual appears twice on any root-to-leaf path

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod types;
pub mod policy;
pub mod store;
pub mod builder;
pub mod sandclock;
pub mod canonical;
pub mod gedcom;

// Re-exports
pub use types::{Xref, Individual, Name, Sex, Event, Family, ReferenceRole};
pub use types::{CalendarDate, DateValue, TreeNode, NodeRole};
pub use policy::{TreeConfig, GenerationLimit, EffectiveLimits, NaturalDepths, ConfigError};
pub use store::{RecordSet, RelationshipIndex, RecordGraph, build_index, IndexError};
pub use builder::{TreeBuilder, build_tree, BuildError};
pub use sandclock::{render, escape_latex};
pub use canonical::{to_canonical_bytes, canonical_hash, canonical_hash_hex};
pub use gedcom::ParseError;
