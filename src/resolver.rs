//! Oil specification resolver.
//!
//! Translates a completed (or version-less) vehicle selection into the
//! recommended lubricant specifications, grouped by subsystem.
//!
//! # Design
//!
//! - **Pure logic over the catalog seam**: no persistence, no policy - the
//!   quota gate decides whether a search runs at all
//! - **Collaborator ordering preserved**: specifications come back in the
//!   order the catalog returns them, never re-sorted here
//! - **Empty is not an error**: a selection with no recorded specifications
//!   resolves to an empty result, distinct from a lookup failure
//!
//! # Resolution Rules
//!
//! | Selection            | Resolved To |
//! |----------------------|-------------|
//! | version chosen       | exactly that version's specifications |
//! | version not chosen   | concatenation over every version of the year, in version-enumeration order |

// Library API - exported for external consumers, not all of it is used by the binary
#![allow(dead_code)]

use std::fmt::Write as _;
use tracing::debug;

use crate::catalog::VehicleCatalog;
use crate::error::Result;
use crate::selection::VehicleSelection;
use crate::types::{OilSpecification, Subsystem};

/// Resolve a selection into its oil specifications.
///
/// With a version chosen this is a single lookup. Without one, every
/// version under the selected year contributes its specifications, in
/// version-enumeration order then specification order - a deliberate
/// fallback so an incomplete selection still yields the union of the
/// year's version-specific recommendations.
pub fn resolve(
    catalog: &dyn VehicleCatalog,
    selection: &VehicleSelection,
) -> Result<Vec<OilSpecification>> {
    if let Some(version) = selection.version {
        let specs = catalog.list_specifications(version)?;
        debug!(version, count = specs.len(), "resolved version specs");
        return Ok(specs);
    }

    let versions = catalog.list_versions(selection.year)?;
    let mut specs = Vec::new();
    for version in &versions {
        specs.extend(catalog.list_specifications(version.id)?);
    }
    debug!(
        year = selection.year,
        versions = versions.len(),
        count = specs.len(),
        "resolved year-wide specs"
    );
    Ok(specs)
}

/// Specifications for one subsystem, in their resolved order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecGroup {
    pub subsystem: Subsystem,
    pub specs: Vec<OilSpecification>,
}

/// Specifications partitioned by subsystem.
///
/// Groups appear in first-seen order and only for subsystems present in the
/// input; there are no empty placeholder groups.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpecGroups {
    groups: Vec<SpecGroup>,
}

impl SpecGroups {
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of subsystem groups (not total specifications).
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SpecGroup> {
        self.groups.iter()
    }

    pub fn get(&self, subsystem: Subsystem) -> Option<&SpecGroup> {
        self.groups.iter().find(|g| g.subsystem == subsystem)
    }

    /// Render the grouped specifications as a share-ready plain-text block.
    ///
    /// One labelled line per present field; absent fields are omitted
    /// entirely (absent and empty are treated identically).
    pub fn share_text(&self) -> String {
        let mut out = String::new();
        for group in &self.groups {
            for spec in &group.specs {
                if !out.is_empty() {
                    out.push_str("\n\n");
                }
                let _ = write!(out, "{}:", group.subsystem.label());
                append_field(&mut out, "API", spec.api.as_deref());
                append_field(&mut out, "ACEA", spec.acea.as_deref());
                append_field(&mut out, "Dexos", spec.dexos.as_deref());
                append_field(&mut out, "Viscosity", spec.viscosity.as_deref());
                append_field(&mut out, "OEM", spec.oem.as_deref());
                append_field(&mut out, "Notes", spec.notes.as_deref());
            }
        }
        out
    }
}

fn append_field(out: &mut String, label: &str, value: Option<&str>) {
    match value {
        Some(v) if !v.is_empty() => {
            let _ = write!(out, "\n{label}: {v}");
        }
        _ => {}
    }
}

/// Partition specifications by subsystem, preserving first-seen group order
/// and the relative order of specifications within each group. Pure.
pub fn group_by_subsystem(specs: Vec<OilSpecification>) -> SpecGroups {
    let mut groups: Vec<SpecGroup> = Vec::new();
    for spec in specs {
        match groups.iter_mut().find(|g| g.subsystem == spec.subsystem) {
            Some(group) => group.specs.push(spec),
            None => groups.push(SpecGroup {
                subsystem: spec.subsystem,
                specs: vec![spec],
            }),
        }
    }
    SpecGroups { groups }
}
