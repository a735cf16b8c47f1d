//! Attribute diffing for matched objects.

use super::indexer::ObjectBucket;
use super::key::derive_key;
use super::result::ComparedObjects;
use crate::config::ComparisonRule;
use crate::model::{Attribute, AttributeGroup, EntityLabel, GlobalId, ModelStore};
use indexmap::IndexMap;
use std::collections::{HashMap, HashSet};

/// Outcome recorded when both nominal values are present and equal.
const OUTCOME_EQUAL: &str = "Equal";
/// Outcome recorded when either nominal value is null.
const OUTCOME_NULL: &str = "Null";
/// Placeholder for an attribute the old revision does not carry.
const UNDEFINED: &str = "<undefined>";

fn changed(old: &str, new: &str) -> String {
    format!("Changed from \"{old}\" to \"{new}\"")
}

/// Compare matched objects attribute by attribute.
///
/// Returns, per entity of the new model, the diff outcome for every
/// single-value attribute found on its rule-configured groups. Key modes
/// match through per-object derived keys with a cartesian expansion over
/// old candidates sharing the key; identifier-only matches on global id
/// with first-seen-wins for duplicate ids. Outcomes merge first-write-wins
/// on attribute-name collisions.
///
/// Read-only against both stores.
#[must_use]
pub fn compare_objects(
    new_store: &ModelStore,
    old_store: &ModelStore,
    new_buckets: &[ObjectBucket],
    old_buckets: &[ObjectBucket],
    rule: &ComparisonRule,
) -> ComparedObjects {
    let mut result: ComparedObjects = IndexMap::new();

    if rule.match_mode.uses_attribute_key() {
        compare_by_key(new_store, old_store, new_buckets, old_buckets, rule, &mut result);
    } else {
        compare_by_identifier(new_store, old_store, new_buckets, old_buckets, rule, &mut result);
    }

    tracing::debug!(
        mode = ?rule.match_mode,
        compared = result.len(),
        "compared matched objects"
    );
    result
}

fn compare_by_key(
    new_store: &ModelStore,
    old_store: &ModelStore,
    new_buckets: &[ObjectBucket],
    old_buckets: &[ObjectBucket],
    rule: &ComparisonRule,
    result: &mut ComparedObjects,
) {
    // One scan over the old side: per-object derived key -> old labels.
    let mut old_lookup: HashMap<String, Vec<EntityLabel>> = HashMap::new();
    let mut seen_old: HashSet<EntityLabel> = HashSet::new();
    for bucket in old_buckets {
        for &label in bucket.objects.values() {
            if !seen_old.insert(label) {
                continue;
            }
            let key = object_comparison_key(old_store, label, rule);
            if !key.is_empty() {
                old_lookup.entry(key).or_default().push(label);
            }
        }
    }

    let mut seen_new: HashSet<EntityLabel> = HashSet::new();
    for bucket in new_buckets {
        for &label in bucket.objects.values() {
            if !seen_new.insert(label) {
                continue;
            }
            let key = object_comparison_key(new_store, label, rule);
            if key.is_empty() {
                continue;
            }
            let Some(old_matches) = old_lookup.get(&key) else {
                continue;
            };

            let new_groups = configured_groups(new_store, label, rule);
            // Every old candidate sharing the key produces a diff;
            // first-write-wins merging keeps the earliest outcome.
            for &old_label in old_matches {
                let old_groups = configured_groups(old_store, old_label, rule);
                compare_and_merge(label, &new_groups, &old_groups, result);
            }
        }
    }
}

fn compare_by_identifier(
    new_store: &ModelStore,
    old_store: &ModelStore,
    new_buckets: &[ObjectBucket],
    old_buckets: &[ObjectBucket],
    rule: &ComparisonRule,
    result: &mut ComparedObjects,
) {
    // Global id -> old label, first seen wins for duplicate ids.
    let mut old_lookup: HashMap<&GlobalId, EntityLabel> = HashMap::new();
    for bucket in old_buckets {
        for (id, &label) in &bucket.objects {
            old_lookup.entry(id).or_insert(label);
        }
    }

    let mut seen_new: HashSet<EntityLabel> = HashSet::new();
    for bucket in new_buckets {
        for (id, &label) in &bucket.objects {
            if !seen_new.insert(label) {
                continue;
            }
            let Some(&old_label) = old_lookup.get(id) else {
                continue;
            };
            let new_groups = configured_groups(new_store, label, rule);
            let old_groups = configured_groups(old_store, old_label, rule);
            compare_and_merge(label, &new_groups, &old_groups, result);
        }
    }
}

/// The object's attribute groups restricted to the rule's allow-list.
fn configured_groups<'a>(
    store: &'a ModelStore,
    object: EntityLabel,
    rule: &ComparisonRule,
) -> Vec<&'a AttributeGroup> {
    store
        .groups_defining(object)
        .into_iter()
        .filter(|g| g.name_matches_any(&rule.attribute_groups))
        .collect()
}

/// Derive the object's comparison key: first non-empty key over its
/// configured groups, in model order.
fn object_comparison_key(store: &ModelStore, object: EntityLabel, rule: &ComparisonRule) -> String {
    configured_groups(store, object, rule)
        .iter()
        .map(|g| derive_key(&g.attributes, &rule.match_key, rule.match_mode))
        .find(|key| !key.is_empty())
        .unwrap_or_default()
}

/// Compare the new object's groups against same-named old groups and
/// merge outcomes into the per-entity map, first write wins.
fn compare_and_merge(
    new_object: EntityLabel,
    new_groups: &[&AttributeGroup],
    old_groups: &[&AttributeGroup],
    result: &mut ComparedObjects,
) {
    for new_group in new_groups {
        let old_group = old_groups.iter().find(|g| g.name == new_group.name).copied();
        let outcomes = compare_group(new_group, old_group);

        let entry = result.entry(new_object).or_default();
        for (name, outcome) in outcomes {
            entry.entry(name).or_insert(outcome);
        }
    }
}

/// Per-attribute outcome strings for one group pairing.
fn compare_group(
    new_group: &AttributeGroup,
    old_group: Option<&AttributeGroup>,
) -> IndexMap<String, String> {
    let mut outcomes = IndexMap::new();
    for attr in &new_group.attributes {
        let outcome = match old_group.and_then(|g| g.attribute(&attr.name)) {
            Some(old_attr) => compare_values(old_attr, attr),
            // Attribute (or the whole old group) absent from the old
            // revision: the value is newly defined.
            None => changed(UNDEFINED, &attr.display_value().unwrap_or_default()),
        };
        outcomes.insert(attr.name.clone(), outcome);
    }
    outcomes
}

fn compare_values(old_attr: &Attribute, new_attr: &Attribute) -> String {
    match (old_attr.display_value(), new_attr.display_value()) {
        (None, _) | (_, None) => OUTCOME_NULL.to_string(),
        (Some(old), Some(new)) if old == new => OUTCOME_EQUAL.to_string(),
        (Some(old), Some(new)) => changed(&old, &new),
    }
}
