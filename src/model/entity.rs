//! Entity handles and identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Process-unique numeric label of a record inside one model store.
///
/// Labels are stable within a store instance but carry no meaning across
/// revisions. All caches and lookups key on labels (or global ids),
/// never on handle identity, since a store may hand out several handles
/// for the same underlying record.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct EntityLabel(pub u64);

impl fmt::Display for EntityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Globally-unique identifier of an entity.
///
/// Stable across revisions of the same real-world object by authoring
/// convention, not by guarantee.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GlobalId(pub String);

impl GlobalId {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GlobalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GlobalId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for GlobalId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A domain object inside a loaded model.
///
/// The engine holds entities by reference or by label; the store owns them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    /// Store-unique numeric label
    pub label: EntityLabel,
    /// Globally-unique identifier
    pub global_id: GlobalId,
    /// IFC class name as authored in the model, e.g. `IfcBeam`
    pub class: String,
    /// Optional human-readable name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_display() {
        assert_eq!(EntityLabel(42).to_string(), "#42");
    }

    #[test]
    fn test_global_id_transparent_serde() {
        let id = GlobalId::from("2O2Fr$t4X7Zf8NOew3FLOH");
        let json = serde_json::to_string(&id).expect("serialize");
        assert_eq!(json, "\"2O2Fr$t4X7Zf8NOew3FLOH\"");
    }
}
