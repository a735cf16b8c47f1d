//! Entity type registry and name resolution.
//!
//! The original tool located entity types by scanning an interface
//! catalog at runtime. Here the catalog is an explicit table of IFC
//! classes and their supertypes, built once on first use into lookup
//! maps and never mutated afterwards.
//!
//! Two spellings exist for every class: the canonical "interface" name
//! (`IIfcBeam`) used in rule files, and the display name without the
//! leading marker (`IfcBeam`) used in models and UIs.

use crate::model::Entity;
use std::collections::HashMap;
use std::sync::LazyLock;

/// The interface-name marker prepended to canonical names.
const INTERFACE_MARKER: char = 'I';

/// Descriptor of one entity class in the schema.
///
/// Subtype checks walk `parent` links, so `IfcBeam` is an instance of
/// `IfcBuildingElement`, `IfcElement`, and so on up to `IfcRoot`.
#[derive(Debug)]
pub struct TypeDescriptor {
    /// Canonical interface-style name, e.g. `IIfcBeam`
    pub canonical_name: &'static str,
    /// Display name without the marker, e.g. `IfcBeam`
    pub display_name: &'static str,
    /// Display name of the direct supertype, if any
    parent: Option<&'static str>,
}

impl TypeDescriptor {
    /// Whether `class_name` (canonical or display spelling) names this
    /// type or any subtype of it.
    #[must_use]
    pub fn is_assignable_from(&self, class_name: &str) -> bool {
        let mut current = resolve_type(class_name);
        while let Some(descriptor) = current {
            if std::ptr::eq(descriptor, self) {
                return true;
            }
            current = descriptor.parent.and_then(resolve_type);
        }
        false
    }

    /// Whether the given entity's runtime class is this type or a subtype.
    #[must_use]
    pub fn is_type_of(&self, entity: &Entity) -> bool {
        self.is_assignable_from(&entity.class)
    }
}

/// Schema table: (display name, direct supertype display name).
///
/// Covers the kernel, spatial-structure, and shared-element subset the
/// comparison rules target. Extending the schema is a one-line addition.
const SCHEMA_TABLE: &[(&str, Option<&str>)] = &[
    ("IfcRoot", None),
    ("IfcObjectDefinition", Some("IfcRoot")),
    ("IfcObject", Some("IfcObjectDefinition")),
    ("IfcProduct", Some("IfcObject")),
    ("IfcElement", Some("IfcProduct")),
    ("IfcBuildingElement", Some("IfcElement")),
    ("IfcBeam", Some("IfcBuildingElement")),
    ("IfcColumn", Some("IfcBuildingElement")),
    ("IfcWall", Some("IfcBuildingElement")),
    ("IfcWallStandardCase", Some("IfcWall")),
    ("IfcSlab", Some("IfcBuildingElement")),
    ("IfcDoor", Some("IfcBuildingElement")),
    ("IfcWindow", Some("IfcBuildingElement")),
    ("IfcStair", Some("IfcBuildingElement")),
    ("IfcStairFlight", Some("IfcBuildingElement")),
    ("IfcRamp", Some("IfcBuildingElement")),
    ("IfcRoof", Some("IfcBuildingElement")),
    ("IfcRailing", Some("IfcBuildingElement")),
    ("IfcPlate", Some("IfcBuildingElement")),
    ("IfcMember", Some("IfcBuildingElement")),
    ("IfcFooting", Some("IfcBuildingElement")),
    ("IfcPile", Some("IfcBuildingElement")),
    ("IfcCovering", Some("IfcBuildingElement")),
    ("IfcCurtainWall", Some("IfcBuildingElement")),
    ("IfcBuildingElementProxy", Some("IfcBuildingElement")),
    ("IfcReinforcingElement", Some("IfcElement")),
    ("IfcReinforcingBar", Some("IfcReinforcingElement")),
    ("IfcReinforcingMesh", Some("IfcReinforcingElement")),
    ("IfcTendon", Some("IfcReinforcingElement")),
    ("IfcTendonAnchor", Some("IfcReinforcingElement")),
    ("IfcElementAssembly", Some("IfcElement")),
    ("IfcDistributionElement", Some("IfcElement")),
    ("IfcDistributionFlowElement", Some("IfcDistributionElement")),
    ("IfcFlowSegment", Some("IfcDistributionFlowElement")),
    ("IfcFlowFitting", Some("IfcDistributionFlowElement")),
    ("IfcFlowTerminal", Some("IfcDistributionFlowElement")),
    ("IfcSpatialStructureElement", Some("IfcProduct")),
    ("IfcSite", Some("IfcSpatialStructureElement")),
    ("IfcBuilding", Some("IfcSpatialStructureElement")),
    ("IfcBuildingStorey", Some("IfcSpatialStructureElement")),
    ("IfcSpace", Some("IfcSpatialStructureElement")),
    ("IfcProxy", Some("IfcProduct")),
    ("IfcGroup", Some("IfcObject")),
    ("IfcSystem", Some("IfcGroup")),
    ("IfcZone", Some("IfcGroup")),
];

struct Registry {
    descriptors: Vec<TypeDescriptor>,
    by_canonical: HashMap<&'static str, usize>,
}

static REGISTRY: LazyLock<Registry> = LazyLock::new(|| {
    let descriptors: Vec<TypeDescriptor> = SCHEMA_TABLE
        .iter()
        .map(|&(display, parent)| TypeDescriptor {
            canonical_name: canonical_of(display),
            display_name: display,
            parent,
        })
        .collect();
    let by_canonical = descriptors
        .iter()
        .enumerate()
        .map(|(i, d)| (d.canonical_name, i))
        .collect();
    Registry {
        descriptors,
        by_canonical,
    }
});

/// Canonical names are static too; the marker-prefixed spellings are
/// leaked once at registry construction.
fn canonical_of(display: &str) -> &'static str {
    Box::leak(format!("{INTERFACE_MARKER}{display}").into_boxed_str())
}

/// Convert a display name to its canonical interface-style spelling.
///
/// `IfcWall` becomes `IIfcWall`; already-canonical, empty, and non-IFC
/// names pass through unchanged.
#[must_use]
pub fn to_canonical_name(display: &str) -> String {
    if display.starts_with("Ifc") {
        format!("{INTERFACE_MARKER}{display}")
    } else {
        display.to_string()
    }
}

/// Convert a canonical interface-style name to its display spelling.
///
/// `IIfcWall` becomes `IfcWall`; other inputs pass through unchanged.
#[must_use]
pub fn to_display_name(canonical: &str) -> String {
    canonical
        .strip_prefix("IIfc")
        .map_or_else(|| canonical.to_string(), |rest| format!("Ifc{rest}"))
}

/// Look up a type descriptor by canonical or display name.
///
/// Unknown and empty names resolve to `None`: not an error.
#[must_use]
pub fn resolve_type(name_or_display: &str) -> Option<&'static TypeDescriptor> {
    if name_or_display.is_empty() {
        return None;
    }
    let canonical = to_canonical_name(name_or_display);
    let registry = &*REGISTRY;
    registry
        .by_canonical
        .get(canonical.as_str())
        .map(|&i| &registry.descriptors[i])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EntityLabel, GlobalId};

    #[test]
    fn test_display_name_to_canonical_name() {
        assert_eq!(to_canonical_name("IfcWall"), "IIfcWall");
    }

    #[test]
    fn test_already_canonical_passes_through() {
        assert_eq!(to_canonical_name("IIfcWall"), "IIfcWall");
    }

    #[test]
    fn test_empty_name_passes_through() {
        assert_eq!(to_canonical_name(""), "");
        assert_eq!(to_display_name(""), "");
    }

    #[test]
    fn test_non_ifc_name_passes_through() {
        assert_eq!(to_canonical_name("SomeOtherClass"), "SomeOtherClass");
        assert_eq!(to_display_name("SomeOtherClass"), "SomeOtherClass");
    }

    #[test]
    fn test_canonical_name_to_display_name() {
        assert_eq!(to_display_name("IIfcWall"), "IfcWall");
        assert_eq!(to_display_name("IfcWall"), "IfcWall");
    }

    #[test]
    fn test_resolve_accepts_both_spellings() {
        let by_display = resolve_type("IfcBeam").expect("display spelling");
        let by_canonical = resolve_type("IIfcBeam").expect("canonical spelling");
        assert!(std::ptr::eq(by_display, by_canonical));
        assert_eq!(by_display.display_name, "IfcBeam");
        assert_eq!(by_display.canonical_name, "IIfcBeam");
    }

    #[test]
    fn test_resolve_unknown_is_none() {
        assert!(resolve_type("IfcFlyingSaucer").is_none());
        assert!(resolve_type("").is_none());
    }

    #[test]
    fn test_subtype_walk() {
        let element = resolve_type("IfcBuildingElement").expect("resolve");
        assert!(element.is_assignable_from("IfcBeam"));
        assert!(element.is_assignable_from("IfcWallStandardCase"));
        assert!(!element.is_assignable_from("IfcSpace"));
        // A type is assignable from itself
        assert!(element.is_assignable_from("IfcBuildingElement"));
    }

    #[test]
    fn test_is_type_of_entity() {
        let beam_type = resolve_type("IfcBeam").expect("resolve");
        let entity = crate::model::Entity {
            label: EntityLabel(1),
            global_id: GlobalId::from("id-1"),
            class: "IfcBeam".into(),
            name: None,
        };
        assert!(beam_type.is_type_of(&entity));

        let wall_type = resolve_type("IfcWall").expect("resolve");
        assert!(!wall_type.is_type_of(&entity));
    }
}
