//! Cascading vehicle selection state machine.
//!
//! This module provides the authoritative source of truth for the
//! brand → model → year → version selection chain. It enforces the
//! containment invariant (a chosen model always belongs to the chosen brand,
//! and so on down the chain) and makes downstream invalidation impossible to
//! skip programmatically.
//!
//! # Design Principles
//!
//! - **Single Source of Truth**: the `CascadeController` owns the selection
//!   and the candidate option lists
//! - **Explicit transitions**: every mutation is a [`SelectionEvent`]
//!   applied by a total transition function, not an ad-hoc field write
//! - **Fetch then commit**: collaborator lookups run before any field is
//!   mutated, so a failed lookup leaves the state untouched and no
//!   intermediate state is ever observable
//! - **Fail Fast**: unknown ids and out-of-order choices return errors
//!   immediately without corrupting the state
//!
//! # Cascade Flow
//!
//! ```text
//! BrandChosen(id)   - clears model/year/version, repopulates model options
//!     ↓
//! ModelChosen(id)   - clears year/version, repopulates year options
//!     ↓
//! YearChosen(id)    - clears version, repopulates version options
//!     ↓
//! VersionChosen(id) - optional; a year may have no versions at all
//! ```

// Library API - exported for external consumers, not all of it is used by the binary
#![allow(dead_code)]

use std::fmt;
use thiserror::Error;
use tracing::debug;

use crate::catalog::VehicleCatalog;
use crate::error::Result;
use crate::types::{Brand, BrandId, Model, ModelId, ModelYear, Version, VersionId, YearId};

/// The four dependent levels of the selection cascade, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectionLevel {
    Brand,
    Model,
    Year,
    Version,
}

impl SelectionLevel {
    /// The level that must be chosen before this one, if any.
    pub const fn upstream(self) -> Option<Self> {
        match self {
            Self::Brand => None,
            Self::Model => Some(Self::Brand),
            Self::Year => Some(Self::Model),
            Self::Version => Some(Self::Year),
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::Brand => "brand",
            Self::Model => "model",
            Self::Year => "year",
            Self::Version => "version",
        }
    }
}

impl fmt::Display for SelectionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// A selection mutation, applied through [`CascadeController::apply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionEvent {
    BrandChosen(BrandId),
    ModelChosen(ModelId),
    YearChosen(YearId),
    VersionChosen(VersionId),
    /// Unselect a level and everything downstream of it.
    Cleared(SelectionLevel),
}

/// Errors that can occur when applying a selection event.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    /// The id is not present in the currently loaded option list.
    /// The selection state is left unchanged.
    #[error("No {level} with id {id} in the current option list")]
    UnknownOption { level: SelectionLevel, id: u32 },

    /// A level was chosen before its upstream level. Callers are expected
    /// to disable the control until the upstream choice exists; hitting
    /// this at runtime is a caller bug, surfaced instead of panicking.
    #[error("Cannot choose a {level} before a {required} is selected")]
    MissingUpstream {
        level: SelectionLevel,
        required: SelectionLevel,
    },
}

/// The current cascade selection and its candidate option lists.
///
/// Owned exclusively by a [`CascadeController`]; read-only outside it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionState {
    brand: Option<BrandId>,
    model: Option<ModelId>,
    year: Option<YearId>,
    version: Option<VersionId>,
    brand_options: Vec<Brand>,
    model_options: Vec<Model>,
    year_options: Vec<ModelYear>,
    version_options: Vec<Version>,
}

impl SelectionState {
    pub fn brand(&self) -> Option<BrandId> {
        self.brand
    }

    pub fn model(&self) -> Option<ModelId> {
        self.model
    }

    pub fn year(&self) -> Option<YearId> {
        self.year
    }

    pub fn version(&self) -> Option<VersionId> {
        self.version
    }

    pub fn brand_options(&self) -> &[Brand] {
        &self.brand_options
    }

    pub fn model_options(&self) -> &[Model] {
        &self.model_options
    }

    pub fn year_options(&self) -> &[ModelYear] {
        &self.year_options
    }

    pub fn version_options(&self) -> &[Version] {
        &self.version_options
    }

    /// True iff brand, model and year are all chosen. Version is optional.
    pub fn is_ready_to_search(&self) -> bool {
        self.brand.is_some() && self.model.is_some() && self.year.is_some()
    }
}

/// A completed selection tuple, ready to hand to the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VehicleSelection {
    pub brand: BrandId,
    pub model: ModelId,
    pub year: YearId,
    pub version: Option<VersionId>,
}

/// Controller owning the cascade state and the catalog handle.
///
/// All mutation goes through `&mut self`, so Rust's borrow rules enforce the
/// single-writer contract: one logical actor per selection instance.
///
/// # Example
///
/// ```
/// use oilguide::catalog::MemoryCatalog;
/// use oilguide::selection::CascadeController;
///
/// let catalog = MemoryCatalog::sample();
/// let mut cascade = CascadeController::new(&catalog).unwrap();
/// cascade.set_brand(1).unwrap();
/// cascade.set_model(1).unwrap();
/// cascade.set_year(1).unwrap();
/// assert!(cascade.state().is_ready_to_search());
///
/// // Re-choosing the brand invalidates everything downstream
/// cascade.set_brand(2).unwrap();
/// assert!(!cascade.state().is_ready_to_search());
/// ```
pub struct CascadeController<'a> {
    catalog: &'a dyn VehicleCatalog,
    state: SelectionState,
}

impl<'a> std::fmt::Debug for CascadeController<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CascadeController")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl<'a> CascadeController<'a> {
    /// Create a controller with an empty selection. Brand options are
    /// loaded once, here.
    pub fn new(catalog: &'a dyn VehicleCatalog) -> Result<Self> {
        let brand_options = catalog.list_brands()?;
        debug!(brands = brand_options.len(), "cascade initialized");
        Ok(Self {
            catalog,
            state: SelectionState {
                brand_options,
                ..SelectionState::default()
            },
        })
    }

    /// Read access to the current selection state.
    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    /// Apply a selection event. This is the single transition function;
    /// the named setters below are convenience wrappers over it.
    pub fn apply(&mut self, event: SelectionEvent) -> Result<()> {
        match event {
            SelectionEvent::BrandChosen(id) => self.set_brand(id),
            SelectionEvent::ModelChosen(id) => self.set_model(id),
            SelectionEvent::YearChosen(id) => self.set_year(id),
            SelectionEvent::VersionChosen(id) => self.set_version(id),
            SelectionEvent::Cleared(level) => {
                self.clear(level);
                Ok(())
            }
        }
    }

    /// Choose a brand. Clears model, year and version, and repopulates the
    /// model options for the new brand.
    pub fn set_brand(&mut self, id: BrandId) -> Result<()> {
        if !self.state.brand_options.iter().any(|b| b.id == id) {
            return Err(SelectionError::UnknownOption {
                level: SelectionLevel::Brand,
                id,
            }
            .into());
        }

        // Fetch before any mutation: a catalog failure must not leave a
        // half-cleared state behind.
        let model_options = self.catalog.list_models(id)?;

        let s = &mut self.state;
        s.brand = Some(id);
        s.model = None;
        s.year = None;
        s.version = None;
        s.model_options = model_options;
        s.year_options.clear();
        s.version_options.clear();
        debug!(brand = id, models = s.model_options.len(), "brand chosen");
        Ok(())
    }

    /// Choose a model under the current brand. Clears year and version and
    /// repopulates the year options.
    pub fn set_model(&mut self, id: ModelId) -> Result<()> {
        if self.state.brand.is_none() {
            return Err(SelectionError::MissingUpstream {
                level: SelectionLevel::Model,
                required: SelectionLevel::Brand,
            }
            .into());
        }
        if !self.state.model_options.iter().any(|m| m.id == id) {
            return Err(SelectionError::UnknownOption {
                level: SelectionLevel::Model,
                id,
            }
            .into());
        }

        let year_options = self.catalog.list_years(id)?;

        let s = &mut self.state;
        s.model = Some(id);
        s.year = None;
        s.version = None;
        s.year_options = year_options;
        s.version_options.clear();
        debug!(model = id, years = s.year_options.len(), "model chosen");
        Ok(())
    }

    /// Choose a year under the current model. Clears version and
    /// repopulates the version options, which may legitimately end up
    /// empty; version selection is then skipped entirely.
    pub fn set_year(&mut self, id: YearId) -> Result<()> {
        if self.state.model.is_none() {
            return Err(SelectionError::MissingUpstream {
                level: SelectionLevel::Year,
                required: SelectionLevel::Model,
            }
            .into());
        }
        if !self.state.year_options.iter().any(|y| y.id == id) {
            return Err(SelectionError::UnknownOption {
                level: SelectionLevel::Year,
                id,
            }
            .into());
        }

        let version_options = self.catalog.list_versions(id)?;

        let s = &mut self.state;
        s.year = Some(id);
        s.version = None;
        s.version_options = version_options;
        debug!(
            year = id,
            versions = s.version_options.len(),
            "year chosen"
        );
        Ok(())
    }

    /// Choose a version under the current year. The only level that may
    /// stay unselected in a ready-to-search state.
    pub fn set_version(&mut self, id: VersionId) -> Result<()> {
        if self.state.year.is_none() {
            return Err(SelectionError::MissingUpstream {
                level: SelectionLevel::Version,
                required: SelectionLevel::Year,
            }
            .into());
        }
        if !self.state.version_options.iter().any(|v| v.id == id) {
            return Err(SelectionError::UnknownOption {
                level: SelectionLevel::Version,
                id,
            }
            .into());
        }

        self.state.version = Some(id);
        debug!(version = id, "version chosen");
        Ok(())
    }

    /// Unselect a level and cascade-clear everything downstream of it,
    /// emptying the downstream candidate lists. Brand options are kept:
    /// they are loaded once at construction and never depend on upstream
    /// choices.
    pub fn clear(&mut self, level: SelectionLevel) {
        let s = &mut self.state;
        match level {
            SelectionLevel::Brand => {
                s.brand = None;
                s.model = None;
                s.year = None;
                s.version = None;
                s.model_options.clear();
                s.year_options.clear();
                s.version_options.clear();
            }
            SelectionLevel::Model => {
                s.model = None;
                s.year = None;
                s.version = None;
                s.year_options.clear();
                s.version_options.clear();
            }
            SelectionLevel::Year => {
                s.year = None;
                s.version = None;
                s.version_options.clear();
            }
            SelectionLevel::Version => {
                s.version = None;
            }
        }
        debug!(level = %level, "selection cleared");
    }

    /// True iff brand, model and year are all chosen.
    pub fn is_ready_to_search(&self) -> bool {
        self.state.is_ready_to_search()
    }

    /// The completed selection tuple, if ready to search.
    pub fn selection(&self) -> Option<VehicleSelection> {
        Some(VehicleSelection {
            brand: self.state.brand?,
            model: self.state.model?,
            year: self.state.year?,
            version: self.state.version,
        })
    }
}
