//! Rule validation.
//!
//! Configuration errors are raised here, before any model access, and
//! are never retried.

use super::{ComparisonRule, RuleSet};
use crate::error::{IfcDiffError, Result};

/// Types that can validate their own invariants.
pub trait Validatable {
    /// Check invariants, returning a configuration error describing the
    /// first violation found.
    fn validate(&self) -> Result<()>;
}

impl Validatable for ComparisonRule {
    fn validate(&self) -> Result<()> {
        if self.entity_type.trim().is_empty() {
            return Err(IfcDiffError::config(format!(
                "rule has no entity type (output group '{}')",
                self.output_group
            )));
        }
        if self.attribute_groups.is_empty() {
            return Err(IfcDiffError::config(format!(
                "rule for '{}' lists no attribute groups",
                self.entity_type
            )));
        }
        if self.match_mode.uses_attribute_key() && self.match_key.trim().is_empty() {
            return Err(IfcDiffError::config(format!(
                "rule for '{}' uses {:?} matching but has no match key",
                self.entity_type, self.match_mode
            )));
        }
        Ok(())
    }
}

impl Validatable for RuleSet {
    fn validate(&self) -> Result<()> {
        if self.is_empty() {
            return Err(IfcDiffError::config(
                "no comparison rules provided".to_string(),
            ));
        }
        for rule in self.iter() {
            rule.validate()?;
        }
        Ok(())
    }
}
