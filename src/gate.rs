//! Quota/entitlement gate.
//!
//! A state machine over [`Entitlement`] with two meaningful states:
//! **Metered** (`is_premium == false`) and **Unlimited**
//! (`is_premium == true`). The transition is one-directional here; there is
//! no downgrade path.
//!
//! # Billing-integrity contract
//!
//! `consume` must be called exactly once per permitted search, and the
//! decremented entitlement is persisted before `consume` returns - before
//! the resolver runs. A crash between decrement and persistence can only
//! give the user a free search, never overcharge them.

// Library API - exported for external consumers, not all of it is used by the binary
#![allow(dead_code)]

use thiserror::Error;
use tracing::{debug, info};

use crate::entitlement::{Entitlement, EntitlementStore};
use crate::error::Result;

/// Outcome of the pure authorization check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Authorization {
    Permitted,
    Denied(DenialReason),
}

/// Why a search was denied. Expected and user-facing; resolved by offering
/// the premium upgrade path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialReason {
    NoSearchesRemaining,
}

impl std::fmt::Display for DenialReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoSearchesRemaining => write!(f, "no searches remaining"),
        }
    }
}

/// Errors from gate operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GateError {
    /// `consume` was called on an exhausted metered entitlement. Callers
    /// must run `authorize` first; hitting this is a caller bug, surfaced
    /// instead of letting the quota go negative.
    #[error("Search was not authorized (no searches remaining)")]
    NotAuthorized,
}

/// Gate owning the session's entitlement, the store handle and the user id.
///
/// Mutations require `&mut self`, so one gate instance has exactly one
/// writer. Every mutation is written through to the store before the
/// in-memory value is updated; a store failure leaves the gate unchanged.
pub struct QuotaGate<'a> {
    store: &'a dyn EntitlementStore,
    user_id: String,
    entitlement: Entitlement,
}

impl<'a> QuotaGate<'a> {
    /// Load the entitlement for `user_id`, falling back to the free-tier
    /// default for a user the store has never seen.
    pub fn load(store: &'a dyn EntitlementStore, user_id: &str) -> Result<Self> {
        let entitlement = store.load_entitlement(user_id)?.unwrap_or_default();
        debug!(
            user = user_id,
            premium = entitlement.is_premium,
            remaining = entitlement.searches_remaining,
            "entitlement loaded"
        );
        Ok(Self {
            store,
            user_id: user_id.to_string(),
            entitlement,
        })
    }

    pub fn entitlement(&self) -> &Entitlement {
        &self.entitlement
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Pure predicate: is a search currently permitted?
    ///
    /// Premium users are always permitted; metered users need remaining
    /// allowance. No side effects.
    pub fn authorize(&self) -> Authorization {
        if self.entitlement.is_premium || self.entitlement.searches_remaining > 0 {
            Authorization::Permitted
        } else {
            Authorization::Denied(DenialReason::NoSearchesRemaining)
        }
    }

    /// Spend one search. Call exactly once per permitted search.
    ///
    /// Premium entitlements are left untouched. Metered entitlements are
    /// decremented and persisted write-through; the in-memory value is only
    /// updated once the store write succeeded.
    pub fn consume(&mut self) -> Result<()> {
        if self.entitlement.is_premium {
            return Ok(());
        }
        if self.entitlement.searches_remaining == 0 {
            return Err(GateError::NotAuthorized.into());
        }

        let updated = Entitlement {
            searches_remaining: self.entitlement.searches_remaining - 1,
            ..self.entitlement.clone()
        };
        self.store.save_entitlement(&self.user_id, &updated)?;
        self.entitlement = updated;
        info!(
            user = %self.user_id,
            remaining = self.entitlement.searches_remaining,
            "search consumed"
        );
        Ok(())
    }

    /// Activate premium until `expires_at` (unix seconds). The expiry is
    /// recorded but never enforced here.
    pub fn grant_premium(&mut self, expires_at: u64) -> Result<()> {
        let updated = Entitlement {
            is_premium: true,
            premium_expires_at: Some(expires_at),
            ..self.entitlement.clone()
        };
        self.store.save_entitlement(&self.user_id, &updated)?;
        self.entitlement = updated;
        info!(user = %self.user_id, expires_at, "premium activated");
        Ok(())
    }
}
