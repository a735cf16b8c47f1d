//! Bucket matching: the only-in-old / only-in-new split.

use super::indexer::ObjectBucket;
use crate::config::ComparisonRule;
use crate::model::GlobalId;
use std::collections::HashSet;

/// Buckets present on one side only.
#[derive(Debug, Clone, Default)]
pub struct BucketSplit {
    pub only_in_old: Vec<ObjectBucket>,
    pub only_in_new: Vec<ObjectBucket>,
}

/// Compute the two one-sided bucket lists for a rule.
///
/// Key modes compare bucket comparison keys through hash-set membership;
/// a bucket with an empty key can never match and lands in its only-in
/// list. Identifier-only mode checks global-id overlap at bucket level:
/// a bucket with any identifier present on the other side counts as
/// matched as a whole, even if some of its objects have no counterpart.
///
/// Matched pairs are not materialized here; the differ re-derives them.
/// Pure over its inputs and tolerant of empty sides.
#[must_use]
pub fn match_buckets(
    old: &[ObjectBucket],
    new: &[ObjectBucket],
    rule: &ComparisonRule,
) -> BucketSplit {
    let split = if rule.match_mode.uses_attribute_key() {
        BucketSplit {
            only_in_old: one_sided_by_key(old, new),
            only_in_new: one_sided_by_key(new, old),
        }
    } else {
        BucketSplit {
            only_in_old: one_sided_by_identifier(old, new),
            only_in_new: one_sided_by_identifier(new, old),
        }
    };
    tracing::debug!(
        mode = ?rule.match_mode,
        only_in_old = split.only_in_old.len(),
        only_in_new = split.only_in_new.len(),
        "matched buckets"
    );
    split
}

/// Buckets of `side` whose comparison key does not occur in `other`.
fn one_sided_by_key(side: &[ObjectBucket], other: &[ObjectBucket]) -> Vec<ObjectBucket> {
    let other_keys: HashSet<&str> = other
        .iter()
        .filter(|b| !b.comparison_key.is_empty())
        .map(|b| b.comparison_key.as_str())
        .collect();

    side.iter()
        .filter(|b| b.comparison_key.is_empty() || !other_keys.contains(b.comparison_key.as_str()))
        .cloned()
        .collect()
}

/// Buckets of `side` with no global-id overlap into `other`.
fn one_sided_by_identifier(side: &[ObjectBucket], other: &[ObjectBucket]) -> Vec<ObjectBucket> {
    let other_ids: HashSet<&GlobalId> = other.iter().flat_map(|b| b.objects.keys()).collect();

    side.iter()
        .filter(|b| !b.objects.keys().any(|id| other_ids.contains(id)))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MatchMode;
    use crate::model::EntityLabel;
    use indexmap::IndexMap;

    fn bucket(label: u64, key: &str, ids: &[&str]) -> ObjectBucket {
        let mut objects = IndexMap::new();
        for (i, id) in ids.iter().enumerate() {
            objects.insert(GlobalId::from(*id), EntityLabel(label * 100 + i as u64));
        }
        ObjectBucket {
            group_label: EntityLabel(label),
            group_name: "CommonProps".into(),
            comparison_key: key.to_string(),
            objects,
        }
    }

    fn key_rule() -> ComparisonRule {
        ComparisonRule::new(
            "IfcBeam",
            vec!["CommonProps".to_string()],
            "Mark",
            MatchMode::Contains,
        )
    }

    fn id_rule() -> ComparisonRule {
        ComparisonRule::new(
            "IfcBeam",
            vec!["CommonProps".to_string()],
            "",
            MatchMode::IdentifierOnly,
        )
    }

    #[test]
    fn test_key_mode_split() {
        let old = vec![bucket(1, "B1", &["a"]), bucket(2, "B2", &["b"])];
        let new = vec![bucket(3, "B1", &["a"]), bucket(4, "B3", &["c"])];

        let split = match_buckets(&old, &new, &key_rule());
        assert_eq!(split.only_in_old.len(), 1);
        assert_eq!(split.only_in_old[0].comparison_key, "B2");
        assert_eq!(split.only_in_new.len(), 1);
        assert_eq!(split.only_in_new[0].comparison_key, "B3");
    }

    #[test]
    fn test_empty_key_bucket_is_always_one_sided() {
        let old = vec![bucket(1, "", &["a"])];
        let new = vec![bucket(2, "", &["a"])];

        let split = match_buckets(&old, &new, &key_rule());
        assert_eq!(split.only_in_old.len(), 1);
        assert_eq!(split.only_in_new.len(), 1);
    }

    #[test]
    fn test_identifier_mode_bucket_level_overlap() {
        // id1 matched, id2 not: the bucket as a whole is matched and must
        // not appear in either only-in list.
        let old = vec![bucket(1, "", &["id1", "id2"])];
        let new = vec![bucket(2, "", &["id1", "id3"])];

        let split = match_buckets(&old, &new, &id_rule());
        assert!(split.only_in_old.is_empty());
        assert!(split.only_in_new.is_empty());
    }

    #[test]
    fn test_identifier_mode_disjoint_buckets() {
        let old = vec![bucket(1, "", &["id1"]), bucket(2, "", &["id2"])];
        let new = vec![bucket(3, "", &["id1"])];

        let split = match_buckets(&old, &new, &id_rule());
        assert_eq!(split.only_in_old.len(), 1);
        assert_eq!(
            split.only_in_old[0].objects.keys().next(),
            Some(&GlobalId::from("id2"))
        );
        assert!(split.only_in_new.is_empty());
    }

    #[test]
    fn test_empty_inputs() {
        let split = match_buckets(&[], &[], &key_rule());
        assert!(split.only_in_old.is_empty());
        assert!(split.only_in_new.is_empty());

        let new = vec![bucket(1, "B1", &["a"])];
        let split = match_buckets(&[], &new, &key_rule());
        assert!(split.only_in_old.is_empty());
        assert_eq!(split.only_in_new.len(), 1);
    }

    #[test]
    fn test_no_double_counting() {
        // Every old bucket is either matched or only-in-old, never both.
        let old = vec![bucket(1, "B1", &["a"]), bucket(2, "B2", &["b"])];
        let new = vec![bucket(3, "B1", &["a"])];

        let split = match_buckets(&old, &new, &key_rule());
        let only_keys: HashSet<&str> = split
            .only_in_old
            .iter()
            .map(|b| b.comparison_key.as_str())
            .collect();
        assert!(!only_keys.contains("B1"));
        assert!(only_keys.contains("B2"));
    }
}
