//! The revision comparison engine.

use super::{compare_objects, index_model, match_buckets, ComparisonResult};
use crate::config::{ComparisonRule, RuleSet, Validatable};
use crate::error::Result;
use crate::model::{EntityLabel, ModelStore};
use crate::schema;
use crate::writer::{ResultWriter, WriteReport};
use indexmap::IndexMap;
use rayon::prelude::*;
use std::path::PathBuf;

/// Compares two model revisions under a rule list and writes the
/// outcome into the newer revision.
///
/// The old model is read-only for the engine's whole lifetime; the new
/// model is read during indexing and diffing and mutated only by the
/// final writer pass.
pub struct RevisionComparer<'a> {
    old: &'a ModelStore,
    new: &'a mut ModelStore,
    output_path: PathBuf,
    transaction_label: String,
    rules: RuleSet,
    result: ComparisonResult,
}

impl<'a> RevisionComparer<'a> {
    /// Create a comparer. Rule-list invariants are validated here,
    /// before any model access; violations reject the operation.
    pub fn new(
        old: &'a ModelStore,
        new: &'a mut ModelStore,
        output_path: impl Into<PathBuf>,
        transaction_label: impl Into<String>,
        rules: impl Into<RuleSet>,
    ) -> Result<Self> {
        let rules = rules.into();
        rules.validate()?;
        Ok(Self {
            old,
            new,
            output_path: output_path.into(),
            transaction_label: transaction_label.into(),
            rules,
            result: ComparisonResult::new(),
        })
    }

    /// Run every rule, merge the results, write them into the new model,
    /// and save it to the output path.
    ///
    /// Rules are independent and fan out across worker threads; results
    /// merge in rule order so the aggregate is deterministic. The writer
    /// pass is strictly sequential.
    pub fn compare_all(&mut self) -> Result<WriteReport> {
        tracing::info!(rules = self.rules.len(), "starting revision comparison");

        let old = &*self.old;
        let new = &*self.new;
        let per_rule: Vec<ComparisonResult> = self
            .rules
            .0
            .par_iter()
            .map(|rule| compare_rule(old, new, rule))
            .collect();

        let mut merged = ComparisonResult::new();
        for result in per_rule {
            merged.merge(result);
        }
        let summary = merged.summary();
        tracing::info!(
            only_in_old = summary.objects_only_in_old,
            only_in_new = summary.objects_only_in_new,
            compared = summary.objects_compared,
            "comparison complete"
        );
        self.result = merged;

        let object_groups = self.output_group_map();
        let writer = ResultWriter::new(self.transaction_label.clone(), self.output_path.clone());
        writer.write(self.new, &self.result.compared, &object_groups)
    }

    /// The merged comparison result of the last [`Self::compare_all`] run.
    #[must_use]
    pub fn result(&self) -> &ComparisonResult {
        &self.result
    }

    /// Map each compared object to the output group of the rule whose
    /// entity type it satisfies. Later rules overwrite earlier ones;
    /// objects matching no rule fall back to the writer's default.
    fn output_group_map(&self) -> IndexMap<EntityLabel, String> {
        let mut map = IndexMap::new();
        for rule in self.rules.iter() {
            let Some(descriptor) = schema::resolve_type(&rule.entity_type) else {
                continue;
            };
            for &label in self.result.compared.keys() {
                let Some(entity) = self.new.entity_by_label(label) else {
                    continue;
                };
                if descriptor.is_type_of(entity) {
                    map.insert(label, rule.output_group.clone());
                }
            }
        }
        map
    }
}

/// Compare one rule: index both revisions, split the buckets, diff the
/// matched objects. Pure over its inputs.
///
/// This is the single-rule path [`RevisionComparer`] fans out over; it
/// is exposed for callers that want a comparison without write-back.
#[must_use]
pub fn compare_rule(
    old: &ModelStore,
    new: &ModelStore,
    rule: &ComparisonRule,
) -> ComparisonResult {
    tracing::info!(
        entity_type = %rule.entity_type,
        mode = ?rule.match_mode,
        "comparing rule"
    );
    let old_buckets = index_model(old, rule);
    let new_buckets = index_model(new, rule);

    let split = match_buckets(&old_buckets, &new_buckets, rule);
    let compared = compare_objects(new, old, &new_buckets, &old_buckets, rule);

    ComparisonResult {
        only_in_old: split.only_in_old,
        only_in_new: split.only_in_new,
        compared,
    }
}
