//! Rule types.

use crate::error::{IfcDiffError, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Name of the attribute group written when no rule-specific output
/// group applies.
pub const DEFAULT_OUTPUT_GROUP: &str = "QA_PSET";

/// How objects are matched across the two revisions.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Match on the value of the first attribute whose name contains the
    /// match key as a substring.
    #[default]
    Contains,
    /// Match on the value of the attribute whose name equals the match
    /// key exactly.
    ExactMatch,
    /// Match on the entity's global identifier; the match key is unused.
    IdentifierOnly,
}

impl MatchMode {
    /// Whether this mode derives comparison keys from attribute values.
    #[must_use]
    pub fn uses_attribute_key(self) -> bool {
        !matches!(self, Self::IdentifierOnly)
    }
}

/// One comparison rule: entity type, attribute groups to examine, and
/// the matching strategy.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ComparisonRule {
    /// Entity type to compare, canonical (`IIfcBeam`) or display
    /// (`IfcBeam`) spelling.
    pub entity_type: String,
    /// Attribute-group names to examine, matched case-insensitively.
    pub attribute_groups: Vec<String>,
    /// Attribute-name key used to derive comparison keys. Unused for
    /// [`MatchMode::IdentifierOnly`].
    pub match_key: String,
    /// Matching strategy.
    pub match_mode: MatchMode,
    /// Name of the attribute group the diff outcome is written under.
    pub output_group: String,
}

impl Default for ComparisonRule {
    fn default() -> Self {
        Self {
            entity_type: String::new(),
            attribute_groups: Vec::new(),
            match_key: String::new(),
            match_mode: MatchMode::default(),
            output_group: DEFAULT_OUTPUT_GROUP.to_string(),
        }
    }
}

impl ComparisonRule {
    /// Shorthand constructor for the common case.
    pub fn new(
        entity_type: impl Into<String>,
        attribute_groups: Vec<String>,
        match_key: impl Into<String>,
        match_mode: MatchMode,
    ) -> Self {
        Self {
            entity_type: entity_type.into(),
            attribute_groups,
            match_key: match_key.into(),
            match_mode,
            output_group: DEFAULT_OUTPUT_GROUP.to_string(),
        }
    }

    /// Set the output group name.
    #[must_use]
    pub fn with_output_group(mut self, name: impl Into<String>) -> Self {
        self.output_group = name.into();
        self
    }
}

/// An ordered list of comparison rules, loadable from JSON.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct RuleSet(pub Vec<ComparisonRule>);

impl RuleSet {
    /// Parse a rule set from a JSON string.
    pub fn from_json_str(raw: &str) -> Result<Self> {
        serde_json::from_str(raw)
            .map_err(|e| IfcDiffError::config(format!("rule set is not valid JSON: {e}")))
    }

    /// Load a rule set from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| IfcDiffError::io(path, e))?;
        Self::from_json_str(&raw)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ComparisonRule> {
        self.0.iter()
    }
}

impl From<Vec<ComparisonRule>> for RuleSet {
    fn from(rules: Vec<ComparisonRule>) -> Self {
        Self(rules)
    }
}
