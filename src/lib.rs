//! oilguide Library
//!
//! Core functionality for the vehicle lubricant reference tool: the
//! brand → model → year → version selection cascade, the specification
//! resolver, and the metered-search entitlement gate. The binary in
//! `main.rs` is a thin command-line shell over these modules.

pub mod account;
pub mod catalog;
pub mod cli;
pub mod entitlement;
pub mod error;
pub mod gate;
pub mod resolver;
pub mod search;
pub mod selection;
pub mod types;

// Re-export main types for convenience
pub use account::{Account, AccountStore};
pub use catalog::{CatalogData, MemoryCatalog, VehicleCatalog};
pub use entitlement::{Entitlement, EntitlementStore};
pub use error::{OilGuideError, Result};
pub use gate::{Authorization, DenialReason, GateError, QuotaGate};
pub use resolver::{group_by_subsystem, resolve, SpecGroup, SpecGroups};
pub use search::{run_search, SearchOutcome};
pub use selection::{
    CascadeController, SelectionError, SelectionEvent, SelectionLevel, SelectionState,
    VehicleSelection,
};
pub use types::{
    Brand, BrandId, Model, ModelId, ModelYear, OilSpecification, SpecId, Subsystem,
    VehicleCategory, Version, VersionId, YearId,
};
