//! Attributes and attribute groups (property sets).

use super::{AttributeValue, EntityLabel};
use serde::{Deserialize, Serialize};

/// A single name/value pair inside an attribute group.
///
/// The nominal value may be absent; absent values compare as null.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<AttributeValue>,
}

impl Attribute {
    /// Create an attribute with a present nominal value.
    pub fn new(name: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        Self {
            name: name.into(),
            value: Some(value.into()),
        }
    }

    /// Create an attribute whose nominal value is null.
    pub fn null(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
        }
    }

    /// Display string of the nominal value, if present.
    #[must_use]
    pub fn display_value(&self) -> Option<String> {
        self.value.as_ref().map(AttributeValue::display_string)
    }
}

/// A named bundle of attributes attached to entities via a defines
/// relation (a property set in the domain).
///
/// Groups are identified by their store label. Two group handles refer to
/// the same group iff their labels are equal; name equality is not
/// identity (the same name routinely recurs across a model).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeGroup {
    /// Store-unique numeric label of the group record
    pub label: EntityLabel,
    pub name: String,
    pub attributes: Vec<Attribute>,
}

impl AttributeGroup {
    /// Find an attribute by exact name.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Case-insensitive group-name match against an allow-list.
    #[must_use]
    pub fn name_matches_any(&self, names: &[String]) -> bool {
        names.iter().any(|n| n.eq_ignore_ascii_case(&self.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_display_value() {
        let attr = Attribute::new("Status", "Draft");
        assert_eq!(attr.display_value().as_deref(), Some("Draft"));
        assert_eq!(Attribute::null("Status").display_value(), None);
    }

    #[test]
    fn test_group_name_match_is_case_insensitive() {
        let group = AttributeGroup {
            label: EntityLabel(1),
            name: "CommonProps".into(),
            attributes: vec![],
        };
        assert!(group.name_matches_any(&["commonprops".to_string()]));
        assert!(!group.name_matches_any(&["OtherProps".to_string()]));
    }
}
