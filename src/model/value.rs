//! Nominal attribute values.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A nominal value carried by an [`Attribute`](super::Attribute).
///
/// IFC single-value properties carry one of a small set of simple measure
/// types. The engine only ever compares the display-string form, so the
/// variants here cover the nominal kinds the comparison cares about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeValue {
    Text(String),
    Real(f64),
    Integer(i64),
    Boolean(bool),
    /// Three-valued IFC logical: true, false, or unknown
    Logical(Option<bool>),
}

impl AttributeValue {
    /// The display string used for key derivation and outcome formatting.
    #[must_use]
    pub fn display_string(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Real(v) => write!(f, "{v}"),
            Self::Integer(v) => write!(f, "{v}"),
            Self::Boolean(v) => write!(f, "{v}"),
            Self::Logical(Some(v)) => write!(f, "{v}"),
            Self::Logical(None) => f.write_str("unknown"),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_forms() {
        assert_eq!(AttributeValue::Text("B1".into()).to_string(), "B1");
        assert_eq!(AttributeValue::Integer(12).to_string(), "12");
        assert_eq!(AttributeValue::Real(2.5).to_string(), "2.5");
        assert_eq!(AttributeValue::Boolean(true).to_string(), "true");
        assert_eq!(AttributeValue::Logical(None).to_string(), "unknown");
    }

    #[test]
    fn test_json_round_trip() {
        let val = AttributeValue::Text("Draft".into());
        let json = serde_json::to_string(&val).expect("serialize");
        let back: AttributeValue = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, val);
    }
}
