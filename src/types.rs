//! Core vehicle and lubricant reference types.
//!
//! This module replaces stringly-typed categories with proper Rust enums
//! that provide compile-time validation and exhaustive matching. All records
//! are plain immutable value types; the only mutable state in the crate
//! lives in the selection cascade and the entitlement gate.

// Library API - exported for external consumers, not all of it is used by the binary
#![allow(dead_code)]

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Identifier for a vehicle brand.
pub type BrandId = u32;
/// Identifier for a vehicle model.
pub type ModelId = u32;
/// Identifier for a model year.
pub type YearId = u32;
/// Identifier for a model-year version (trim/engine variant).
pub type VersionId = u32;
/// Identifier for an oil specification record.
pub type SpecId = u32;

/// Vehicle category a brand belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum VehicleCategory {
    #[strum(serialize = "car")]
    Car,
    #[strum(serialize = "motorcycle")]
    Motorcycle,
    #[strum(serialize = "truck")]
    Truck,
    #[strum(serialize = "agricultural")]
    Agricultural,
}

/// Vehicle subsystem an oil specification applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Subsystem {
    #[strum(serialize = "engine")]
    Engine,
    #[strum(serialize = "gearbox")]
    Gearbox,
    #[strum(serialize = "differential")]
    Differential,
}

impl Subsystem {
    /// Human-readable section label for rendered output
    pub const fn label(self) -> &'static str {
        match self {
            Self::Engine => "Engine",
            Self::Gearbox => "Gearbox",
            Self::Differential => "Differential",
        }
    }
}

/// A vehicle brand - the root of the selection cascade
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Brand {
    pub id: BrandId,
    pub name: String,
    pub category: VehicleCategory,
}

/// A vehicle model, belonging to exactly one brand
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Model {
    pub id: ModelId,
    pub brand_id: BrandId,
    pub name: String,
}

/// A model year, belonging to exactly one model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelYear {
    pub id: YearId,
    pub model_id: ModelId,
    pub year: u16,
}

/// A trim/engine version, belonging to exactly one model year.
///
/// A year may have zero versions; version selection is then skipped and
/// searches fall back to the union of all versions under the year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Version {
    pub id: VersionId,
    pub year_id: YearId,
    pub name: String,
}

/// A recommended lubricant specification for one vehicle subsystem.
///
/// Every field besides `id`/`version_id`/`subsystem` is optional; a record
/// with all optional fields absent is still valid and renders as an empty
/// section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OilSpecification {
    pub id: SpecId,
    pub version_id: VersionId,
    pub subsystem: Subsystem,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acea: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dexos: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub viscosity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oem: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}
