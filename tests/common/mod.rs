//! Shared fixture builders for integration tests.

#![allow(dead_code)]

use ifcdiff::{Attribute, ComparisonRule, EntityLabel, MatchMode, ModelStore};

/// Install the test log subscriber; repeated calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A beam row for [`beam_store`]: (global id, mark, status).
pub type BeamRow<'a> = (&'a str, &'a str, &'a str);

/// Build a store holding one `IfcBeam` per row, each defined by a
/// `CommonProps` group with `Mark` and `Status` attributes.
pub fn beam_store(rows: &[BeamRow<'_>]) -> ModelStore {
    let mut store = ModelStore::new("IFC4");
    for &(global_id, mark, status) in rows {
        let beam = store.add_entity(global_id, "IfcBeam", Some(mark));
        let group = store.add_group(
            "CommonProps",
            vec![
                Attribute::new("Mark", mark),
                Attribute::new("Status", status),
            ],
        );
        store.add_relation(vec![group], vec![beam]);
    }
    store
}

/// The beam comparison rule used throughout the scenario tests.
pub fn beam_rule() -> ComparisonRule {
    ComparisonRule::new(
        "IfcBeam",
        vec!["CommonProps".to_string()],
        "Mark",
        MatchMode::Contains,
    )
}

/// Label of the entity with the given global id.
pub fn label_of(store: &ModelStore, global_id: &str) -> EntityLabel {
    store
        .entities()
        .find(|e| e.global_id.as_str() == global_id)
        .unwrap_or_else(|| panic!("no entity with global id {global_id}"))
        .label
}
