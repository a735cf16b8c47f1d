//! The in-memory model store and its transaction type.

use super::{Attribute, AttributeGroup, Entity, EntityLabel, GlobalId};
use crate::error::{ErrorContext, IfcDiffError, Result, StoreErrorKind};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use xxhash_rust::xxh3::xxh3_64;

/// A "defines by attributes" relation: attaches one or more attribute
/// groups to one or more entities.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefinesRelation {
    pub label: EntityLabel,
    pub group_labels: Vec<EntityLabel>,
    pub object_labels: Vec<EntityLabel>,
}

/// An in-memory model revision.
///
/// Owns all entities, attribute groups, and defines relations of one
/// loaded model. Enumeration order is insertion order; the indexer's
/// determinism relies on it.
///
/// Mutation happens only through [`Transaction`]s obtained from
/// [`ModelStore::begin_transaction`]; the `&mut self` receiver makes a
/// second concurrent transaction on the same store unrepresentable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelStore {
    /// Schema identifier carried through from the source file, e.g. `IFC4`
    #[serde(default)]
    pub schema: String,
    entities: IndexMap<EntityLabel, Entity>,
    groups: IndexMap<EntityLabel, AttributeGroup>,
    relations: Vec<DefinesRelation>,
    next_label: u64,
    /// Content hash of the snapshot, for quick equality checks
    #[serde(skip)]
    pub content_hash: u64,
    /// Count of committed transactions over the lifetime of this store
    #[serde(skip)]
    pub transactions_committed: usize,
}

impl ModelStore {
    /// Create an empty store with the given schema identifier.
    #[must_use]
    pub fn new(schema: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            next_label: 1,
            ..Self::default()
        }
    }

    // ------------------------------------------------------------------
    // Snapshot IO
    // ------------------------------------------------------------------

    /// Open a model from a JSON snapshot file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| IfcDiffError::io(path, e))?;
        let mut store: Self = serde_json::from_str(&raw)
            .map_err(|e| {
                IfcDiffError::store(
                    format!("opening {}", path.display()),
                    StoreErrorKind::SnapshotDecode(e.to_string()),
                )
            })
            .context("open model snapshot")?;
        store.content_hash = xxh3_64(raw.as_bytes());
        Ok(store)
    }

    /// Persist the model to a JSON snapshot file in a single save operation.
    pub fn save_as(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let raw = serde_json::to_string_pretty(self).map_err(|e| {
            IfcDiffError::store(
                format!("saving {}", path.display()),
                StoreErrorKind::SnapshotEncode(e.to_string()),
            )
        })?;
        std::fs::write(path, raw).map_err(|e| IfcDiffError::io(path, e))
    }

    /// Recalculate the content hash from the current snapshot form.
    pub fn calculate_content_hash(&mut self) {
        match serde_json::to_vec(self) {
            Ok(bytes) => self.content_hash = xxh3_64(&bytes),
            Err(_) => self.content_hash = 0,
        }
    }

    // ------------------------------------------------------------------
    // Builder API (fixtures and loaders)
    // ------------------------------------------------------------------

    fn allocate_label(&mut self) -> EntityLabel {
        let label = EntityLabel(self.next_label);
        self.next_label += 1;
        label
    }

    /// Add an entity and return its label.
    pub fn add_entity(
        &mut self,
        global_id: impl Into<GlobalId>,
        class: impl Into<String>,
        name: Option<&str>,
    ) -> EntityLabel {
        let label = self.allocate_label();
        self.entities.insert(
            label,
            Entity {
                label,
                global_id: global_id.into(),
                class: class.into(),
                name: name.map(str::to_string),
            },
        );
        label
    }

    /// Add an attribute group and return its label.
    pub fn add_group(
        &mut self,
        name: impl Into<String>,
        attributes: Vec<Attribute>,
    ) -> EntityLabel {
        let label = self.allocate_label();
        self.groups.insert(
            label,
            AttributeGroup {
                label,
                name: name.into(),
                attributes,
            },
        );
        label
    }

    /// Add a defines relation between groups and objects.
    pub fn add_relation(
        &mut self,
        group_labels: Vec<EntityLabel>,
        object_labels: Vec<EntityLabel>,
    ) -> EntityLabel {
        let label = self.allocate_label();
        self.relations.push(DefinesRelation {
            label,
            group_labels,
            object_labels,
        });
        label
    }

    // ------------------------------------------------------------------
    // Read access
    // ------------------------------------------------------------------

    /// All defines relations, in native enumeration order.
    pub fn defines_relations(&self) -> impl Iterator<Item = &DefinesRelation> {
        self.relations.iter()
    }

    /// Resolve an entity by its store label.
    #[must_use]
    pub fn entity_by_label(&self, label: EntityLabel) -> Option<&Entity> {
        self.entities.get(&label)
    }

    /// Resolve an attribute group by its store label.
    #[must_use]
    pub fn group_by_label(&self, label: EntityLabel) -> Option<&AttributeGroup> {
        self.groups.get(&label)
    }

    /// All entities, in native enumeration order.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    /// Number of entities in the store.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Number of attribute groups in the store.
    #[must_use]
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Attribute groups attached to the given entity through any defines
    /// relation, deduplicated by group label, in relation order.
    #[must_use]
    pub fn groups_defining(&self, object: EntityLabel) -> Vec<&AttributeGroup> {
        let mut seen = std::collections::HashSet::new();
        let mut out = Vec::new();
        for rel in &self.relations {
            if !rel.object_labels.contains(&object) {
                continue;
            }
            for group_label in &rel.group_labels {
                if seen.insert(*group_label) {
                    if let Some(group) = self.groups.get(group_label) {
                        out.push(group);
                    }
                }
            }
        }
        out
    }

    // ------------------------------------------------------------------
    // Transactions
    // ------------------------------------------------------------------

    /// Begin a transaction. Staged mutations apply on
    /// [`Transaction::commit`]; dropping the transaction without
    /// committing discards them.
    pub fn begin_transaction(&mut self, label: impl Into<String>) -> Transaction<'_> {
        let label = label.into();
        tracing::debug!(transaction = %label, "transaction opened");
        Transaction {
            store: self,
            label,
            staged_groups: Vec::new(),
            staged_relations: Vec::new(),
        }
    }
}

/// Staged group creation inside a transaction.
#[derive(Debug)]
struct StagedGroup {
    label: EntityLabel,
    name: String,
    attributes: Vec<Attribute>,
}

/// Staged relation creation inside a transaction.
#[derive(Debug)]
struct StagedRelation {
    group_labels: Vec<EntityLabel>,
    object_labels: Vec<EntityLabel>,
}

/// A staged mutation window against one [`ModelStore`].
///
/// Labels for staged records are allocated eagerly so callers can link
/// staged groups into staged relations before committing. A rolled-back
/// transaction leaves gaps in the label sequence; labels are never reused.
#[derive(Debug)]
pub struct Transaction<'a> {
    store: &'a mut ModelStore,
    label: String,
    staged_groups: Vec<StagedGroup>,
    staged_relations: Vec<StagedRelation>,
}

impl Transaction<'_> {
    /// Stage a new attribute group and return the label it will have
    /// after commit.
    pub fn new_group(
        &mut self,
        name: impl Into<String>,
        attributes: Vec<Attribute>,
    ) -> EntityLabel {
        let label = self.store.allocate_label();
        self.staged_groups.push(StagedGroup {
            label,
            name: name.into(),
            attributes,
        });
        label
    }

    /// Stage a defines relation attaching a group to an object.
    ///
    /// The object must resolve in the store at commit time; the group may
    /// be either pre-existing or staged in this transaction.
    pub fn relate_group(&mut self, group: EntityLabel, object: EntityLabel) {
        self.staged_relations.push(StagedRelation {
            group_labels: vec![group],
            object_labels: vec![object],
        });
    }

    /// Transaction label, as passed to `begin_transaction`.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Whether an entity with the given label resolves in the
    /// underlying store.
    #[must_use]
    pub fn resolves(&self, label: EntityLabel) -> bool {
        self.store.entities.contains_key(&label)
    }

    /// Validate and apply all staged mutations.
    pub fn commit(self) -> Result<()> {
        // Validate before touching the store so a failed commit leaves it
        // unchanged.
        let staged_group_labels: std::collections::HashSet<EntityLabel> =
            self.staged_groups.iter().map(|g| g.label).collect();
        for rel in &self.staged_relations {
            if rel.object_labels.is_empty() {
                return Err(IfcDiffError::store(
                    format!("commit of transaction '{}'", self.label),
                    StoreErrorKind::EmptyRelation,
                ));
            }
            for object in &rel.object_labels {
                if !self.store.entities.contains_key(object) {
                    return Err(IfcDiffError::store(
                        format!("commit of transaction '{}'", self.label),
                        StoreErrorKind::UnknownLabel(object.0),
                    ));
                }
            }
            for group in &rel.group_labels {
                if !self.store.groups.contains_key(group) && !staged_group_labels.contains(group) {
                    return Err(IfcDiffError::store(
                        format!("commit of transaction '{}'", self.label),
                        StoreErrorKind::UnknownLabel(group.0),
                    ));
                }
            }
        }

        let group_count = self.staged_groups.len();
        for staged in self.staged_groups {
            self.store.groups.insert(
                staged.label,
                AttributeGroup {
                    label: staged.label,
                    name: staged.name,
                    attributes: staged.attributes,
                },
            );
        }
        for staged in self.staged_relations {
            let label = self.store.allocate_label();
            self.store.relations.push(DefinesRelation {
                label,
                group_labels: staged.group_labels,
                object_labels: staged.object_labels,
            });
        }
        self.store.transactions_committed += 1;
        tracing::debug!(
            transaction = %self.label,
            groups = group_count,
            "transaction committed"
        );
        Ok(())
    }
}
