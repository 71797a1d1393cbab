//! The combined search protocol.
//!
//! One search action is: `authorize` → on denial, hand the caller a
//! [`SearchOutcome::Denied`] so it can offer the upgrade path → on
//! permission, `consume` (persisted write-through) then `resolve` then
//! `group_by_subsystem`.
//!
//! Consume runs before resolve on purpose: the quota is spent on the
//! attempt, not refunded on a zero-result outcome.

use tracing::info;

use crate::catalog::VehicleCatalog;
use crate::error::Result;
use crate::gate::{Authorization, DenialReason, QuotaGate};
use crate::resolver::{self, SpecGroups};
use crate::selection::VehicleSelection;

/// Result of one gated search action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The gate denied the search; no quota was spent and no lookup ran.
    /// The caller should offer the premium upgrade path.
    Denied(DenialReason),
    /// The search ran. The groups may be empty - a valid "no results"
    /// state, distinct from a lookup failure (which is an `Err`).
    Results(SpecGroups),
}

/// Run one gated search for the given selection.
pub fn run_search(
    catalog: &dyn VehicleCatalog,
    gate: &mut QuotaGate<'_>,
    selection: &VehicleSelection,
) -> Result<SearchOutcome> {
    match gate.authorize() {
        Authorization::Denied(reason) => {
            info!(user = gate.user_id(), %reason, "search denied");
            Ok(SearchOutcome::Denied(reason))
        }
        Authorization::Permitted => {
            gate.consume()?;
            let specs = resolver::resolve(catalog, selection)?;
            Ok(SearchOutcome::Results(resolver::group_by_subsystem(specs)))
        }
    }
}
