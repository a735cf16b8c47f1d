//! Attribute-group indexing: one pass over the defines relations.

use super::key::derive_key;
use crate::config::ComparisonRule;
use crate::model::{EntityLabel, GlobalId, ModelStore};
use crate::schema;
use indexmap::IndexMap;
use serde::Serialize;

/// One indexed bucket: the entities attached to a single attribute
/// group, keyed by global id, tagged with the group's derived
/// comparison key.
#[derive(Debug, Clone, Serialize)]
pub struct ObjectBucket {
    /// Label of the defining attribute group
    pub group_label: EntityLabel,
    /// Name of the defining attribute group
    pub group_name: String,
    /// Derived comparison key; empty for identifier-only matching
    pub comparison_key: String,
    /// Objects in this bucket, global id → entity label
    pub objects: IndexMap<GlobalId, EntityLabel>,
}

impl ObjectBucket {
    /// Number of objects in the bucket.
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

/// Index a model's objects for one rule.
///
/// Walks every defines relation once. Relations whose groups miss the
/// rule's group-name allow-list (case-insensitive) or whose objects miss
/// the rule's entity type are skipped. Groups are deduplicated by store
/// label: the same underlying group reached through several relations
/// accumulates objects into one bucket, and its comparison key is
/// derived once.
///
/// An unresolvable entity type yields an empty index, not an error.
#[must_use]
pub fn index_model(store: &ModelStore, rule: &ComparisonRule) -> Vec<ObjectBucket> {
    let Some(target_type) = schema::resolve_type(&rule.entity_type) else {
        tracing::debug!(
            entity_type = %rule.entity_type,
            "entity type not in schema registry; rule yields empty index"
        );
        return Vec::new();
    };

    tracing::debug!(
        entity_type = %target_type.display_name,
        groups = ?rule.attribute_groups,
        "indexing model in single pass over defines relations"
    );

    let mut buckets: IndexMap<EntityLabel, ObjectBucket> = IndexMap::new();
    let mut relations_seen = 0usize;

    for rel in store.defines_relations() {
        relations_seen += 1;

        let matching_groups: Vec<_> = rel
            .group_labels
            .iter()
            .filter_map(|label| store.group_by_label(*label))
            .filter(|g| !g.name.is_empty() && g.name_matches_any(&rule.attribute_groups))
            .collect();
        if matching_groups.is_empty() {
            continue;
        }

        let matching_objects: Vec<_> = rel
            .object_labels
            .iter()
            .filter_map(|label| store.entity_by_label(*label))
            .filter(|e| target_type.is_type_of(e))
            .collect();
        if matching_objects.is_empty() {
            continue;
        }

        for group in matching_groups {
            let bucket = buckets.entry(group.label).or_insert_with(|| {
                let comparison_key = if rule.match_mode.uses_attribute_key() {
                    derive_key(&group.attributes, &rule.match_key, rule.match_mode)
                } else {
                    String::new()
                };
                ObjectBucket {
                    group_label: group.label,
                    group_name: group.name.clone(),
                    comparison_key,
                    objects: IndexMap::new(),
                }
            });
            for entity in &matching_objects {
                bucket.objects.insert(entity.global_id.clone(), entity.label);
            }
        }
    }

    let buckets: Vec<ObjectBucket> = buckets.into_values().collect();
    tracing::info!(
        entity_type = %target_type.display_name,
        relations = relations_seen,
        buckets = buckets.len(),
        "indexed model"
    );
    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MatchMode;
    use crate::model::Attribute;

    fn rule() -> ComparisonRule {
        ComparisonRule::new(
            "IfcBeam",
            vec!["CommonProps".to_string()],
            "Mark",
            MatchMode::Contains,
        )
    }

    fn store_with_beam(mark: &str) -> ModelStore {
        let mut store = ModelStore::new("IFC4");
        let beam = store.add_entity(format!("id-{mark}").as_str(), "IfcBeam", Some(mark));
        let group = store.add_group("CommonProps", vec![Attribute::new("Mark", mark)]);
        store.add_relation(vec![group], vec![beam]);
        store
    }

    #[test]
    fn test_single_beam_indexed_with_key() {
        let store = store_with_beam("B1");
        let buckets = index_model(&store, &rule());
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].comparison_key, "B1");
        assert_eq!(buckets[0].len(), 1);
        assert!(buckets[0].objects.contains_key(&GlobalId::from("id-B1")));
    }

    #[test]
    fn test_unresolvable_type_yields_empty_index() {
        let store = store_with_beam("B1");
        let mut bad_rule = rule();
        bad_rule.entity_type = "IfcFlyingSaucer".into();
        assert!(index_model(&store, &bad_rule).is_empty());
    }

    #[test]
    fn test_group_name_filter_is_case_insensitive() {
        let store = store_with_beam("B1");
        let mut rule = rule();
        rule.attribute_groups = vec!["COMMONPROPS".to_string()];
        assert_eq!(index_model(&store, &rule).len(), 1);
    }

    #[test]
    fn test_type_filter_excludes_other_classes() {
        let mut store = ModelStore::new("IFC4");
        let wall = store.add_entity("id-w", "IfcWall", Some("W1"));
        let group = store.add_group("CommonProps", vec![Attribute::new("Mark", "W1")]);
        store.add_relation(vec![group], vec![wall]);
        assert!(index_model(&store, &rule()).is_empty());
    }

    #[test]
    fn test_supertype_rule_matches_subtype_entities() {
        let store = store_with_beam("B1");
        let mut rule = rule();
        rule.entity_type = "IfcBuildingElement".into();
        assert_eq!(index_model(&store, &rule).len(), 1);
    }

    #[test]
    fn test_same_group_through_two_relations_accumulates_one_bucket() {
        let mut store = ModelStore::new("IFC4");
        let b1 = store.add_entity("id-1", "IfcBeam", Some("B1"));
        let b2 = store.add_entity("id-2", "IfcBeam", Some("B2"));
        let group = store.add_group("CommonProps", vec![Attribute::new("Mark", "B1")]);
        store.add_relation(vec![group], vec![b1]);
        store.add_relation(vec![group], vec![b2]);

        let buckets = index_model(&store, &rule());
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].len(), 2);
        // Key derived once from the first encounter
        assert_eq!(buckets[0].comparison_key, "B1");
    }

    #[test]
    fn test_identifier_only_buckets_carry_empty_key() {
        let store = store_with_beam("B1");
        let mut rule = rule();
        rule.match_mode = MatchMode::IdentifierOnly;
        let buckets = index_model(&store, &rule);
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].comparison_key, "");
    }

    #[test]
    fn test_relation_without_matching_group_skipped() {
        let mut store = store_with_beam("B1");
        let beam = store.entities().next().expect("entity").label;
        let other = store.add_group("OtherProps", vec![Attribute::new("Mark", "X")]);
        store.add_relation(vec![other], vec![beam]);

        let buckets = index_model(&store, &rule());
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].group_name, "CommonProps");
    }
}
