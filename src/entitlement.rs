//! Entitlement record and persistence contract.
//!
//! An [`Entitlement`] is the record of a user's remaining metered usage and
//! premium status. It is loaded once per session from an
//! [`EntitlementStore`], mutated only by the quota gate, and written back
//! after every mutation (write-through, no batching).

// Library API - exported for external consumers, not all of it is used by the binary
#![allow(dead_code)]

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A user's metered-search allowance and premium flag.
///
/// When `is_premium` is true, `searches_remaining` is not decremented and
/// its value carries no meaning (searches are unlimited).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entitlement {
    pub searches_remaining: u32,
    pub is_premium: bool,
    /// Unix seconds. Recorded on premium activation, never compared against
    /// the current time anywhere in this crate; expiry enforcement belongs
    /// to a billing collaborator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub premium_expires_at: Option<u64>,
}

impl Entitlement {
    /// Free searches granted to every new account.
    pub const FREE_SEARCHES: u32 = 3;

    /// A fresh metered entitlement with the free-tier allowance.
    pub fn new_free() -> Self {
        Self {
            searches_remaining: Self::FREE_SEARCHES,
            is_premium: false,
            premium_expires_at: None,
        }
    }
}

impl Default for Entitlement {
    fn default() -> Self {
        Self::new_free()
    }
}

/// Persistence contract for entitlements, keyed by user id.
///
/// Read-your-writes consistency is expected: a save followed by a load by
/// the same caller returns the saved value.
pub trait EntitlementStore {
    /// Load the entitlement for `user_id`, or `None` if unknown.
    fn load_entitlement(&self, user_id: &str) -> Result<Option<Entitlement>>;

    /// Persist the entitlement for `user_id`.
    fn save_entitlement(&self, user_id: &str, entitlement: &Entitlement) -> Result<()>;
}
