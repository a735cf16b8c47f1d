//! Comparison result structures.

use super::indexer::ObjectBucket;
use crate::model::EntityLabel;
use indexmap::IndexMap;
use serde::Serialize;

/// Per-entity diff outcomes: entity label of the new model → attribute
/// name → outcome string.
pub type ComparedObjects = IndexMap<EntityLabel, IndexMap<String, String>>;

/// Complete result of a revision comparison.
///
/// Created per rule, merged into the session-wide aggregate, consumed
/// once by the writer, and available to the caller for reporting.
#[derive(Debug, Clone, Default, Serialize)]
#[must_use]
pub struct ComparisonResult {
    /// Buckets whose objects exist only in the old revision
    pub only_in_old: Vec<ObjectBucket>,
    /// Buckets whose objects exist only in the new revision
    pub only_in_new: Vec<ObjectBucket>,
    /// Diff outcomes for matched objects of the new revision
    pub compared: ComparedObjects,
}

impl ComparisonResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge another rule's result into this aggregate.
    ///
    /// Bucket lists append in rule order. Compared maps merge per
    /// entity; when two rules compared the same entity the later rule's
    /// outcome map replaces the earlier one, as the original tool's
    /// dictionary merge did.
    pub fn merge(&mut self, other: Self) {
        self.only_in_old.extend(other.only_in_old);
        self.only_in_new.extend(other.only_in_new);
        for (label, outcomes) in other.compared {
            self.compared.insert(label, outcomes);
        }
    }

    /// Whether any difference was detected.
    #[must_use]
    pub fn has_changes(&self) -> bool {
        !self.only_in_old.is_empty()
            || !self.only_in_new.is_empty()
            || self
                .compared
                .values()
                .any(|outcomes| outcomes.values().any(|o| o != "Equal"))
    }

    /// Summary counts for reporting.
    #[must_use]
    pub fn summary(&self) -> ComparisonSummary {
        ComparisonSummary {
            buckets_only_in_old: self.only_in_old.len(),
            buckets_only_in_new: self.only_in_new.len(),
            objects_only_in_old: self.only_in_old.iter().map(ObjectBucket::len).sum(),
            objects_only_in_new: self.only_in_new.iter().map(ObjectBucket::len).sum(),
            objects_compared: self.compared.len(),
        }
    }
}

/// Summary statistics of a comparison.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ComparisonSummary {
    pub buckets_only_in_old: usize,
    pub buckets_only_in_new: usize,
    pub objects_only_in_old: usize,
    pub objects_only_in_new: usize,
    pub objects_compared: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::GlobalId;

    fn bucket(label: u64, key: &str) -> ObjectBucket {
        let mut objects = IndexMap::new();
        objects.insert(GlobalId::from("id"), EntityLabel(label));
        ObjectBucket {
            group_label: EntityLabel(label),
            group_name: "CommonProps".into(),
            comparison_key: key.to_string(),
            objects,
        }
    }

    #[test]
    fn test_merge_appends_buckets_and_replaces_compared() {
        let mut first = ComparisonResult::new();
        first.only_in_old.push(bucket(1, "B2"));
        first
            .compared
            .entry(EntityLabel(10))
            .or_default()
            .insert("Status".into(), "Equal".into());

        let mut second = ComparisonResult::new();
        second.only_in_new.push(bucket(2, "B3"));
        second
            .compared
            .entry(EntityLabel(10))
            .or_default()
            .insert("Status".into(), "Null".into());

        first.merge(second);
        assert_eq!(first.only_in_old.len(), 1);
        assert_eq!(first.only_in_new.len(), 1);
        assert_eq!(
            first.compared[&EntityLabel(10)].get("Status").map(String::as_str),
            Some("Null")
        );
    }

    #[test]
    fn test_has_changes() {
        let mut result = ComparisonResult::new();
        assert!(!result.has_changes());

        result
            .compared
            .entry(EntityLabel(1))
            .or_default()
            .insert("Status".into(), "Equal".into());
        assert!(!result.has_changes());

        result
            .compared
            .entry(EntityLabel(1))
            .or_default()
            .insert("Mark".into(), "Changed from \"A\" to \"B\"".into());
        assert!(result.has_changes());
    }

    #[test]
    fn test_summary_counts() {
        let mut result = ComparisonResult::new();
        result.only_in_old.push(bucket(1, "B2"));
        result.only_in_old.push(bucket(2, "B4"));
        result
            .compared
            .entry(EntityLabel(10))
            .or_default()
            .insert("Status".into(), "Equal".into());

        let summary = result.summary();
        assert_eq!(summary.buckets_only_in_old, 2);
        assert_eq!(summary.objects_only_in_old, 2);
        assert_eq!(summary.objects_compared, 1);
        assert_eq!(summary.buckets_only_in_new, 0);
    }
}
