//! Vehicle catalog collaborator.
//!
//! The cascade controller and the resolver depend only on the
//! [`VehicleCatalog`] trait; the concrete data source is injected explicitly
//! as a handle, never reached through a global singleton. This keeps the
//! lookup seam swappable for test doubles.
//!
//! # Contract
//!
//! - Every lookup returns an empty vector (not an error) for a valid id with
//!   no children.
//! - Returned ordering is the collaborator's own stable order; callers do
//!   not re-sort.
//! - A failing lookup surfaces as [`OilGuideError::Catalog`] and is never
//!   retried here.

// Library API - exported for external consumers, not all of it is used by the binary
#![allow(dead_code)]

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

use crate::error::{OilGuideError, Result};
use crate::types::{
    Brand, BrandId, Model, ModelId, ModelYear, OilSpecification, Subsystem, VehicleCategory,
    Version, VersionId, YearId,
};

/// Lookup contract for vehicle hierarchy and oil specification data.
pub trait VehicleCatalog {
    /// All brands, in catalog order.
    fn list_brands(&self) -> Result<Vec<Brand>>;

    /// Models belonging to `brand`.
    fn list_models(&self, brand: BrandId) -> Result<Vec<Model>>;

    /// Model years belonging to `model`.
    fn list_years(&self, model: ModelId) -> Result<Vec<ModelYear>>;

    /// Versions belonging to `year`. May legitimately be empty.
    fn list_versions(&self, year: YearId) -> Result<Vec<Version>>;

    /// Oil specifications recorded for `version`.
    fn list_specifications(&self, version: VersionId) -> Result<Vec<OilSpecification>>;
}

/// The raw catalog tables as stored on disk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogData {
    pub brands: Vec<Brand>,
    pub models: Vec<Model>,
    pub years: Vec<ModelYear>,
    pub versions: Vec<Version>,
    pub specifications: Vec<OilSpecification>,
}

impl CatalogData {
    /// Check referential integrity of the tables.
    ///
    /// Every child row must reference an existing parent and ids must be
    /// unique within their table. Returns the first violation found.
    pub fn validate(&self) -> Result<()> {
        check_unique_ids("brand", self.brands.iter().map(|b| b.id))?;
        check_unique_ids("model", self.models.iter().map(|m| m.id))?;
        check_unique_ids("year", self.years.iter().map(|y| y.id))?;
        check_unique_ids("version", self.versions.iter().map(|v| v.id))?;
        check_unique_ids("specification", self.specifications.iter().map(|s| s.id))?;

        for model in &self.models {
            if !self.brands.iter().any(|b| b.id == model.brand_id) {
                return Err(OilGuideError::validation(format!(
                    "model {} references missing brand {}",
                    model.id, model.brand_id
                )));
            }
        }
        for year in &self.years {
            if !self.models.iter().any(|m| m.id == year.model_id) {
                return Err(OilGuideError::validation(format!(
                    "year {} references missing model {}",
                    year.id, year.model_id
                )));
            }
        }
        for version in &self.versions {
            if !self.years.iter().any(|y| y.id == version.year_id) {
                return Err(OilGuideError::validation(format!(
                    "version {} references missing year {}",
                    version.id, version.year_id
                )));
            }
        }
        for spec in &self.specifications {
            if !self.versions.iter().any(|v| v.id == spec.version_id) {
                return Err(OilGuideError::validation(format!(
                    "specification {} references missing version {}",
                    spec.id, spec.version_id
                )));
            }
        }
        Ok(())
    }
}

fn check_unique_ids(table: &str, ids: impl Iterator<Item = u32>) -> Result<()> {
    let mut seen = std::collections::HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(OilGuideError::validation(format!(
                "duplicate {table} id {id}"
            )));
        }
    }
    Ok(())
}

/// In-memory catalog backed by [`CatalogData`] tables.
///
/// Backs both the built-in sample dataset and catalogs loaded from JSON
/// files. Lookups are linear filters over the tables, which is plenty for a
/// reference dataset of this size.
#[derive(Debug, Clone)]
pub struct MemoryCatalog {
    data: CatalogData,
}

impl MemoryCatalog {
    /// Wrap pre-built tables. The caller is responsible for their integrity;
    /// use [`CatalogData::validate`] when the tables come from outside.
    pub fn from_data(data: CatalogData) -> Self {
        Self { data }
    }

    /// Load and validate a catalog from a JSON file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).map_err(|e| {
            OilGuideError::catalog(format!(
                "failed to read catalog from {:?}: {e}",
                path.as_ref()
            ))
        })?;
        let data: CatalogData = serde_json::from_str(&content)
            .map_err(|e| OilGuideError::catalog(format!("failed to parse catalog JSON: {e}")))?;
        data.validate()?;
        info!(
            brands = data.brands.len(),
            specifications = data.specifications.len(),
            "catalog loaded"
        );
        Ok(Self { data })
    }

    /// Access the underlying tables.
    pub fn data(&self) -> &CatalogData {
        &self.data
    }

    /// The built-in reference dataset.
    ///
    /// A small set of common vehicles with lubricant specifications for the
    /// Toyota Corolla line, used when no catalog file is supplied.
    pub fn sample() -> Self {
        let brands = vec![
            brand(1, "Toyota", VehicleCategory::Car),
            brand(2, "Honda", VehicleCategory::Car),
            brand(3, "Ford", VehicleCategory::Car),
            brand(4, "Chevrolet", VehicleCategory::Car),
            brand(5, "Volkswagen", VehicleCategory::Car),
            brand(6, "Yamaha", VehicleCategory::Motorcycle),
            brand(7, "Honda", VehicleCategory::Motorcycle),
            brand(8, "Volvo", VehicleCategory::Truck),
            brand(9, "John Deere", VehicleCategory::Agricultural),
        ];
        let models = vec![
            model(1, 1, "Corolla"),
            model(2, 1, "Camry"),
            model(3, 1, "RAV4"),
            model(4, 2, "Civic"),
            model(5, 2, "Accord"),
            model(6, 3, "F-150"),
            model(7, 4, "Silverado"),
            model(8, 5, "Golf"),
        ];
        let years = vec![
            year(1, 1, 2023),
            year(2, 1, 2022),
            year(3, 1, 2021),
            year(4, 2, 2023),
            year(5, 3, 2023),
            year(6, 4, 2023),
            year(7, 5, 2023),
            year(8, 6, 2023),
        ];
        let versions = vec![
            version(1, 1, "XLE 2.0L"),
            version(2, 1, "SE 1.8L"),
            version(3, 2, "XLE 2.0L"),
            version(4, 4, "SE 2.5L"),
            version(5, 5, "Limited 2.5L"),
        ];
        let specifications = vec![
            OilSpecification {
                id: 1,
                version_id: 1,
                subsystem: Subsystem::Engine,
                api: Some("SN Plus".to_string()),
                acea: Some("A5/B5".to_string()),
                dexos: None,
                viscosity: Some("0W-20".to_string()),
                oem: Some("Toyota Genuine".to_string()),
                notes: Some("Recommended for optimal fuel economy".to_string()),
            },
            OilSpecification {
                id: 2,
                version_id: 1,
                subsystem: Subsystem::Gearbox,
                api: None,
                acea: None,
                dexos: None,
                viscosity: Some("ATF WS".to_string()),
                oem: Some("Toyota WS".to_string()),
                notes: Some("Use only Toyota WS fluid".to_string()),
            },
            OilSpecification {
                id: 3,
                version_id: 1,
                subsystem: Subsystem::Differential,
                api: Some("GL-5".to_string()),
                acea: None,
                dexos: None,
                viscosity: Some("75W-85".to_string()),
                oem: None,
                notes: Some("Check level every 30,000 km".to_string()),
            },
            OilSpecification {
                id: 4,
                version_id: 2,
                subsystem: Subsystem::Engine,
                api: Some("SN".to_string()),
                acea: Some("A3/B4".to_string()),
                dexos: None,
                viscosity: Some("5W-30".to_string()),
                oem: None,
                notes: Some("Standard specification".to_string()),
            },
        ];
        Self {
            data: CatalogData {
                brands,
                models,
                years,
                versions,
                specifications,
            },
        }
    }
}

fn brand(id: BrandId, name: &str, category: VehicleCategory) -> Brand {
    Brand {
        id,
        name: name.to_string(),
        category,
    }
}

fn model(id: ModelId, brand_id: BrandId, name: &str) -> Model {
    Model {
        id,
        brand_id,
        name: name.to_string(),
    }
}

fn year(id: YearId, model_id: ModelId, year: u16) -> ModelYear {
    ModelYear { id, model_id, year }
}

fn version(id: VersionId, year_id: YearId, name: &str) -> Version {
    Version {
        id,
        year_id,
        name: name.to_string(),
    }
}

impl VehicleCatalog for MemoryCatalog {
    fn list_brands(&self) -> Result<Vec<Brand>> {
        Ok(self.data.brands.clone())
    }

    fn list_models(&self, brand: BrandId) -> Result<Vec<Model>> {
        Ok(self
            .data
            .models
            .iter()
            .filter(|m| m.brand_id == brand)
            .cloned()
            .collect())
    }

    fn list_years(&self, model: ModelId) -> Result<Vec<ModelYear>> {
        Ok(self
            .data
            .years
            .iter()
            .filter(|y| y.model_id == model)
            .cloned()
            .collect())
    }

    fn list_versions(&self, year: YearId) -> Result<Vec<Version>> {
        Ok(self
            .data
            .versions
            .iter()
            .filter(|v| v.year_id == year)
            .cloned()
            .collect())
    }

    fn list_specifications(&self, version: VersionId) -> Result<Vec<OilSpecification>> {
        Ok(self
            .data
            .specifications
            .iter()
            .filter(|s| s.version_id == version)
            .cloned()
            .collect())
    }
}
