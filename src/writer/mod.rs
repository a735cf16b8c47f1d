//! Result write-back: QA attribute groups in the destination model.
//!
//! The writer turns the aggregated diff outcomes into new attribute
//! groups on the compared objects, committing in bounded batches so a
//! large comparison never holds one giant transaction open, then saves
//! the destination model in a single file-save operation.

use crate::config::DEFAULT_OUTPUT_GROUP;
use crate::diff::ComparedObjects;
use crate::error::{IfcDiffError, Result, WriteErrorKind};
use crate::model::{Attribute, AttributeValue, EntityLabel, ModelStore};
use indexmap::IndexMap;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Objects committed per transaction. Bounds transaction memory against
/// the underlying storage engine.
const BATCH_SIZE: usize = 500;

/// Counters from a completed write pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WriteReport {
    /// Objects annotated successfully
    pub written: usize,
    /// Objects skipped after a per-object failure
    pub skipped: usize,
    /// Transactions committed
    pub batches: usize,
}

/// Writes comparison outcomes into a destination model.
pub struct ResultWriter {
    transaction_label: String,
    output_path: PathBuf,
}

impl ResultWriter {
    pub fn new(transaction_label: impl Into<String>, output_path: impl Into<PathBuf>) -> Self {
        Self {
            transaction_label: transaction_label.into(),
            output_path: output_path.into(),
        }
    }

    /// Write one attribute group per compared object and save the model.
    ///
    /// `object_groups` maps entity labels to the output group name to
    /// use; unmapped objects fall back to [`DEFAULT_OUTPUT_GROUP`].
    ///
    /// Objects that no longer resolve in the destination model are
    /// logged and skipped; a commit or save failure is fatal and carries
    /// the batch number or target path.
    pub fn write(
        &self,
        store: &mut ModelStore,
        compared: &ComparedObjects,
        object_groups: &IndexMap<EntityLabel, String>,
    ) -> Result<WriteReport> {
        let total = compared.len();
        tracing::info!(
            total,
            batch_size = BATCH_SIZE,
            "writing comparison outcomes in batches"
        );

        let mut report = WriteReport::default();
        let objects: Vec<(&EntityLabel, &IndexMap<String, String>)> = compared.iter().collect();

        for (batch_index, batch) in objects.chunks(BATCH_SIZE).enumerate() {
            let batch_number = batch_index + 1;
            let mut txn = store.begin_transaction(format!(
                "{} - batch {}",
                self.transaction_label, batch_number
            ));

            for &(label, outcomes) in batch {
                // The compared map may outlive edits the caller made in
                // between; resolve through the store before writing.
                if txn.resolves(*label) {
                    let group_name = object_groups
                        .get(label)
                        .map_or(DEFAULT_OUTPUT_GROUP, String::as_str)
                        .to_string();
                    let attributes: Vec<Attribute> = outcomes
                        .iter()
                        .map(|(name, outcome)| Attribute {
                            name: name.clone(),
                            value: Some(AttributeValue::Text(outcome.clone())),
                        })
                        .collect();
                    let group = txn.new_group(group_name, attributes);
                    txn.relate_group(group, *label);
                    report.written += 1;

                    if report.written % 1000 == 0 {
                        tracing::info!(processed = report.written, total, "write progress");
                    }
                } else {
                    tracing::warn!(
                        label = %label,
                        "object not found in destination model, skipping"
                    );
                    report.skipped += 1;
                }
            }

            txn.commit().map_err(|e| {
                tracing::error!(batch = batch_number, error = %e, "batch commit failed");
                IfcDiffError::write(
                    format!(
                        "committing batch {batch_number} for {}",
                        self.output_path.display()
                    ),
                    WriteErrorKind::CommitFailed { batch: batch_number },
                )
            })?;
            report.batches += 1;
            tracing::debug!(batch = batch_number, objects = batch.len(), "batch committed");
        }

        tracing::info!(
            written = report.written,
            skipped = report.skipped,
            batches = report.batches,
            "all batches committed"
        );

        self.save(store)?;
        Ok(report)
    }

    fn save(&self, store: &ModelStore) -> Result<()> {
        tracing::info!(path = %self.output_path.display(), "saving annotated model");
        store.save_as(&self.output_path).map_err(|e| {
            IfcDiffError::write(
                format!("saving to {}", self.output_path.display()),
                WriteErrorKind::SaveFailed(e.to_string()),
            )
        })?;
        tracing::info!("model saved");
        Ok(())
    }

    /// Target path the annotated model is saved to.
    #[must_use]
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }
}
