//! **Semantic comparison of IFC building-model revisions.**
//!
//! `ifcdiff` compares two revisions of an IFC model to detect added,
//! removed, and changed objects, then writes a machine-readable audit
//! trail (new QA property sets describing each per-attribute outcome)
//! into the newer revision.
//!
//! The crate is the comparison engine only. File pickers, settings
//! dialogs, and command-line front ends are external callers that hand
//! the engine two loaded models, an output path, and a list of
//! comparison rules.
//!
//! ## Key Concepts
//!
//! - **[`model`]**: the model-access layer: entities with stable numeric
//!   labels and global ids, attribute groups (property sets), defines
//!   relations, and the [`ModelStore`] with its staged transactions.
//! - **[`schema`]**: the entity type registry; resolves canonical
//!   (`IIfcBeam`) and display (`IfcBeam`) names to type descriptors with
//!   subtype checks.
//! - **[`config`]**: [`ComparisonRule`]s: which entity type to compare,
//!   which attribute groups to examine, and the matching strategy
//!   ([`MatchMode`]): substring or exact attribute-key matching, or
//!   matching on global identifiers alone.
//! - **[`diff`]**: the pipeline: indexing a model's objects per rule,
//!   splitting buckets into only-in-old / only-in-new, and diffing
//!   attribute values of matched objects into outcome strings such as
//!   `Changed from "Draft" to "Final"`.
//! - **[`writer`]**: transactional write-back of the outcomes into the
//!   newer model in bounded batches, then a single file save.
//!
//! ## Comparing Two Revisions
//!
//! ```no_run
//! use ifcdiff::{ComparisonRule, MatchMode, ModelStore, RevisionComparer};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let old = ModelStore::open("revision-a.ifc.json")?;
//!     let mut new = ModelStore::open("revision-b.ifc.json")?;
//!
//!     let rules = vec![ComparisonRule::new(
//!         "IfcBeam",
//!         vec!["CommonProps".to_string()],
//!         "Mark",
//!         MatchMode::Contains,
//!     )];
//!
//!     let mut comparer =
//!         RevisionComparer::new(&old, &mut new, "annotated.ifc.json", "QA comparison", rules)?;
//!     let report = comparer.compare_all()?;
//!
//!     let summary = comparer.result().summary();
//!     println!(
//!         "{} objects compared, {} only in old, {} only in new ({} written)",
//!         summary.objects_compared,
//!         summary.objects_only_in_old,
//!         summary.objects_only_in_new,
//!         report.written,
//!     );
//!     Ok(())
//! }
//! ```
//!
//! The engine never mutates the old model; all new property sets are
//! created inside transactions against the new model only.

// Lint to discourage unwrap() in production code - prefer explicit error handling
#![warn(clippy::unwrap_used)]
#![allow(
    // Variable names like `old`/`new` are clear in context
    clippy::similar_names
)]

pub mod config;
pub mod diff;
pub mod error;
pub mod model;
pub mod schema;
pub mod writer;

// Re-export main types for convenience
pub use config::{ComparisonRule, MatchMode, RuleSet, Validatable, DEFAULT_OUTPUT_GROUP};
pub use diff::{
    compare_objects, compare_rule, derive_key, index_model, match_buckets, BucketSplit,
    ComparedObjects, ComparisonResult, ComparisonSummary, ObjectBucket, RevisionComparer,
};
pub use error::{ErrorContext, IfcDiffError, Result, StoreErrorKind, WriteErrorKind};
pub use model::{
    Attribute, AttributeGroup, AttributeValue, DefinesRelation, Entity, EntityLabel, GlobalId,
    ModelStore, Transaction,
};
pub use schema::{resolve_type, to_canonical_name, to_display_name, TypeDescriptor};
pub use writer::{ResultWriter, WriteReport};
