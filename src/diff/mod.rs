//! The comparison pipeline: index, match, diff, aggregate.
//!
//! One rule flows through three pure stages. The indexer walks a model's
//! defines relations once and produces keyed object buckets; the matcher
//! computes the only-in-old / only-in-new split; the differ compares
//! attribute values of matched objects. [`RevisionComparer`] orchestrates
//! the stages across all rules and hands the merged result to the writer.

mod differ;
mod engine;
mod indexer;
mod key;
mod matcher;
mod result;

pub use differ::compare_objects;
pub use engine::{compare_rule, RevisionComparer};
pub use indexer::{index_model, ObjectBucket};
pub use key::derive_key;
pub use matcher::{match_buckets, BucketSplit};
pub use result::{ComparedObjects, ComparisonResult, ComparisonSummary};
