//! Comparison-key derivation.

use crate::config::MatchMode;
use crate::model::Attribute;

/// Derive the comparison key from a list of attributes.
///
/// `Contains` takes the first attribute whose name contains `match_key`
/// as a substring (ordinal comparison); `ExactMatch` requires name
/// equality. The key is the matched attribute's nominal display string;
/// an absent attribute or a null nominal value both yield the empty
/// string.
///
/// `IdentifierOnly` always yields the empty string: callers branch on
/// the mode and use the entity's global identifier instead.
#[must_use]
pub fn derive_key(attributes: &[Attribute], match_key: &str, mode: MatchMode) -> String {
    let matched = match mode {
        MatchMode::Contains => attributes.iter().find(|a| a.name.contains(match_key)),
        MatchMode::ExactMatch => attributes.iter().find(|a| a.name == match_key),
        MatchMode::IdentifierOnly => None,
    };
    matched
        .and_then(Attribute::display_value)
        .unwrap_or_default()
}
