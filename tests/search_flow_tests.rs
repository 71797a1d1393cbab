//! End-to-end tests for the gated search flow
//!
//! Drives the full protocol (cascade selection, quota authorization,
//! consumption with write-through persistence, resolution, grouping)
//! against the built-in sample catalog and a file-backed account store.

use tempfile::TempDir;

use oilguide::account::AccountStore;
use oilguide::catalog::MemoryCatalog;
use oilguide::entitlement::{Entitlement, EntitlementStore};
use oilguide::gate::{Authorization, DenialReason, QuotaGate};
use oilguide::search::{run_search, SearchOutcome};
use oilguide::selection::{CascadeController, VehicleSelection};
use oilguide::types::Subsystem;

const USER: &str = "driver@example.com";

fn store_with_quota(remaining: u32, premium: bool) -> (TempDir, AccountStore) {
    let dir = TempDir::new().unwrap();
    let store = AccountStore::open(dir.path()).unwrap();
    store.sign_up(USER, "pw", None).unwrap();
    store
        .save_entitlement(
            USER,
            &Entitlement {
                searches_remaining: remaining,
                is_premium: premium,
                premium_expires_at: None,
            },
        )
        .unwrap();
    (dir, store)
}

fn corolla_2023(version: Option<u32>) -> VehicleSelection {
    VehicleSelection {
        brand: 1,
        model: 1,
        year: 1,
        version,
    }
}

// =============================================================================
// Resolution scenarios
// =============================================================================

#[test]
fn test_version_unset_returns_union_of_year_versions() {
    let catalog = MemoryCatalog::sample();
    let (_dir, store) = store_with_quota(3, false);
    let mut gate = QuotaGate::load(&store, USER).unwrap();

    let outcome = run_search(&catalog, &mut gate, &corolla_2023(None)).unwrap();
    let groups = match outcome {
        SearchOutcome::Results(groups) => groups,
        SearchOutcome::Denied(_) => panic!("expected results"),
    };

    // Engine specs come from both versions under the year, in version order
    let engine = groups.get(Subsystem::Engine).unwrap();
    assert_eq!(
        engine.specs.iter().map(|s| (s.id, s.version_id)).collect::<Vec<_>>(),
        vec![(1, 1), (4, 2)]
    );
    assert_eq!(groups.get(Subsystem::Gearbox).unwrap().specs.len(), 1);
    assert_eq!(groups.get(Subsystem::Differential).unwrap().specs.len(), 1);
}

#[test]
fn test_specific_version_returns_exactly_its_specs() {
    let catalog = MemoryCatalog::sample();
    let (_dir, store) = store_with_quota(3, false);
    let mut gate = QuotaGate::load(&store, USER).unwrap();

    let outcome = run_search(&catalog, &mut gate, &corolla_2023(Some(1))).unwrap();
    let groups = match outcome {
        SearchOutcome::Results(groups) => groups,
        SearchOutcome::Denied(_) => panic!("expected results"),
    };

    assert_eq!(groups.len(), 3);
    for subsystem in [Subsystem::Engine, Subsystem::Gearbox, Subsystem::Differential] {
        let group = groups.get(subsystem).unwrap();
        assert_eq!(group.specs.len(), 1);
        assert_eq!(group.specs[0].version_id, 1);
    }
}

// =============================================================================
// Quota scenarios
// =============================================================================

#[test]
fn test_exhausted_quota_denies_before_any_lookup() {
    let catalog = MemoryCatalog::sample();
    let (_dir, store) = store_with_quota(0, false);
    let mut gate = QuotaGate::load(&store, USER).unwrap();

    let outcome = run_search(&catalog, &mut gate, &corolla_2023(Some(1))).unwrap();
    assert_eq!(outcome, SearchOutcome::Denied(DenialReason::NoSearchesRemaining));
    assert_eq!(gate.entitlement().searches_remaining, 0);
    // the persisted record is untouched too
    assert_eq!(
        store.load_entitlement(USER).unwrap().unwrap().searches_remaining,
        0
    );
}

#[test]
fn test_last_search_is_persisted_and_next_is_denied() {
    let catalog = MemoryCatalog::sample();
    let (_dir, store) = store_with_quota(1, false);
    let mut gate = QuotaGate::load(&store, USER).unwrap();

    let outcome = run_search(&catalog, &mut gate, &corolla_2023(Some(1))).unwrap();
    assert!(matches!(outcome, SearchOutcome::Results(_)));
    assert_eq!(gate.entitlement().searches_remaining, 0);

    // write-through: a fresh gate sees the spent quota
    let reloaded = QuotaGate::load(&store, USER).unwrap();
    assert_eq!(reloaded.entitlement().searches_remaining, 0);
    assert_eq!(
        reloaded.authorize(),
        Authorization::Denied(DenialReason::NoSearchesRemaining)
    );
}

#[test]
fn test_premium_searches_are_unlimited_and_undecremented() {
    let catalog = MemoryCatalog::sample();
    let (_dir, store) = store_with_quota(0, true);
    let mut gate = QuotaGate::load(&store, USER).unwrap();

    for _ in 0..5 {
        let outcome = run_search(&catalog, &mut gate, &corolla_2023(None)).unwrap();
        assert!(matches!(outcome, SearchOutcome::Results(_)));
    }
    assert_eq!(gate.entitlement().searches_remaining, 0);
    assert!(gate.entitlement().is_premium);
}

#[test]
fn test_upgrade_path_unblocks_denied_user() {
    let catalog = MemoryCatalog::sample();
    let (_dir, store) = store_with_quota(0, false);
    let mut gate = QuotaGate::load(&store, USER).unwrap();

    let denied = run_search(&catalog, &mut gate, &corolla_2023(Some(1))).unwrap();
    assert!(matches!(denied, SearchOutcome::Denied(_)));

    gate.grant_premium(2_000_000_000).unwrap();
    let outcome = run_search(&catalog, &mut gate, &corolla_2023(Some(1))).unwrap();
    assert!(matches!(outcome, SearchOutcome::Results(_)));

    // the premium flag survived the write-through round trip
    let persisted = store.load_entitlement(USER).unwrap().unwrap();
    assert!(persisted.is_premium);
    assert_eq!(persisted.premium_expires_at, Some(2_000_000_000));
}

// =============================================================================
// Full protocol from the cascade
// =============================================================================

#[test]
fn test_cascade_to_results_end_to_end() {
    let catalog = MemoryCatalog::sample();
    let (_dir, store) = store_with_quota(2, false);

    let mut cascade = CascadeController::new(&catalog).unwrap();
    cascade.set_brand(1).unwrap();
    cascade.set_model(1).unwrap();
    cascade.set_year(1).unwrap();
    cascade.set_version(2).unwrap();
    let selection = cascade.selection().unwrap();

    let mut gate = QuotaGate::load(&store, USER).unwrap();
    let outcome = run_search(&catalog, &mut gate, &selection).unwrap();
    let groups = match outcome {
        SearchOutcome::Results(groups) => groups,
        SearchOutcome::Denied(_) => panic!("expected results"),
    };

    // version 2 (SE 1.8L) only has an engine spec
    assert_eq!(groups.len(), 1);
    let engine = groups.get(Subsystem::Engine).unwrap();
    assert_eq!(engine.specs[0].viscosity.as_deref(), Some("5W-30"));
    assert_eq!(gate.entitlement().searches_remaining, 1);
}

#[test]
fn test_year_without_versions_resolves_to_empty_results() {
    let catalog = MemoryCatalog::sample();
    let (_dir, store) = store_with_quota(2, false);

    let mut cascade = CascadeController::new(&catalog).unwrap();
    cascade.set_brand(1).unwrap();
    cascade.set_model(1).unwrap();
    cascade.set_year(3).unwrap(); // Corolla 2021, no versions recorded
    assert!(cascade.state().version_options().is_empty());

    let mut gate = QuotaGate::load(&store, USER).unwrap();
    let outcome = run_search(&catalog, &mut gate, &cascade.selection().unwrap()).unwrap();
    match outcome {
        SearchOutcome::Results(groups) => assert!(groups.is_empty()),
        SearchOutcome::Denied(_) => panic!("expected empty results"),
    }
    // empty results still spend the quota
    assert_eq!(gate.entitlement().searches_remaining, 1);
}
