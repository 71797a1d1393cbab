//! Local account and session storage.
//!
//! File-backed stand-in for a real authentication backend: one JSON record
//! per account under `<root>/accounts/`, plus a `session.json` marker naming
//! the signed-in user. Passwords are stored alongside the account and
//! compared verbatim - this is the stub credential collaborator the search
//! flow needs, not real authentication.
//!
//! The store also implements [`EntitlementStore`], keyed by account email,
//! with read-your-writes consistency via immediate file writes.

// Library API - exported for external consumers, not all of it is used by the binary
#![allow(dead_code)]

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::info;

use crate::entitlement::{Entitlement, EntitlementStore};
use crate::error::{OilGuideError, Result};

/// A user account with its entitlement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub entitlement: Entitlement,
}

/// On-disk record: the account plus its stub credential.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct AccountRecord {
    account: Account,
    password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SessionMarker {
    email: String,
}

/// File-backed account store rooted at a data directory.
#[derive(Debug, Clone)]
pub struct AccountStore {
    root: PathBuf,
}

impl AccountStore {
    /// Open (creating if needed) an account store at `root`.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(root.join("accounts"))?;
        Ok(Self { root })
    }

    fn accounts_dir(&self) -> PathBuf {
        self.root.join("accounts")
    }

    fn session_path(&self) -> PathBuf {
        self.root.join("session.json")
    }

    fn account_path(&self, email: &str) -> PathBuf {
        // Emails become filenames; anything outside a safe set is mapped
        // to '_' so the key cannot escape the accounts directory.
        let safe: String = email
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '@') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.accounts_dir().join(format!("{safe}.json"))
    }

    fn load_record(&self, email: &str) -> Result<Option<AccountRecord>> {
        let path = self.account_path(email);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)?;
        let record: AccountRecord = serde_json::from_str(&content)
            .map_err(|e| OilGuideError::store(format!("corrupt account record {path:?}: {e}")))?;
        Ok(Some(record))
    }

    fn save_record(&self, record: &AccountRecord) -> Result<()> {
        let path = self.account_path(&record.account.email);
        let json = serde_json::to_string_pretty(record)?;
        fs::write(&path, json)?;
        Ok(())
    }

    fn set_session(&self, email: &str) -> Result<()> {
        let marker = SessionMarker {
            email: email.to_string(),
        };
        fs::write(self.session_path(), serde_json::to_string_pretty(&marker)?)?;
        Ok(())
    }

    /// Create a new account with the free-tier allowance and sign it in.
    ///
    /// Fails if an account with this email already exists.
    pub fn sign_up(&self, email: &str, password: &str, phone: Option<&str>) -> Result<Account> {
        if email.trim().is_empty() {
            return Err(OilGuideError::validation("email must not be empty"));
        }
        if password.is_empty() {
            return Err(OilGuideError::validation("password must not be empty"));
        }
        if self.load_record(email)?.is_some() {
            return Err(OilGuideError::account(format!(
                "an account for {email} already exists"
            )));
        }

        let account = Account {
            id: unix_millis().to_string(),
            email: email.to_string(),
            phone: phone.map(|p| p.to_string()),
            entitlement: Entitlement::new_free(),
        };
        self.save_record(&AccountRecord {
            account: account.clone(),
            password: password.to_string(),
        })?;
        self.set_session(email)?;
        info!(email, "account created");
        Ok(account)
    }

    /// Sign in with locally stored credentials and persist the session
    /// marker. Unknown accounts and wrong passwords both fail.
    pub fn sign_in(&self, email: &str, password: &str) -> Result<Account> {
        let record = self
            .load_record(email)?
            .ok_or_else(|| OilGuideError::account(format!("no account for {email}")))?;
        if record.password != password {
            return Err(OilGuideError::account("invalid credentials"));
        }
        self.set_session(email)?;
        info!(email, "signed in");
        Ok(record.account)
    }

    /// Remove the session marker, if any.
    pub fn sign_out(&self) -> Result<()> {
        let path = self.session_path();
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    /// Email of the signed-in user, if a session exists.
    pub fn current_user(&self) -> Result<Option<String>> {
        let path = self.session_path();
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)?;
        let marker: SessionMarker = serde_json::from_str(&content)
            .map_err(|e| OilGuideError::store(format!("corrupt session marker: {e}")))?;
        Ok(Some(marker.email))
    }

    /// Load an account by email without touching the session.
    pub fn load_account(&self, email: &str) -> Result<Option<Account>> {
        Ok(self.load_record(email)?.map(|r| r.account))
    }

    /// The store's root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl EntitlementStore for AccountStore {
    fn load_entitlement(&self, user_id: &str) -> Result<Option<Entitlement>> {
        Ok(self.load_record(user_id)?.map(|r| r.account.entitlement))
    }

    fn save_entitlement(&self, user_id: &str, entitlement: &Entitlement) -> Result<()> {
        let mut record = self
            .load_record(user_id)?
            .ok_or_else(|| OilGuideError::store(format!("no account for {user_id}")))?;
        record.account.entitlement = entitlement.clone();
        self.save_record(&record)
    }
}

/// Milliseconds since the unix epoch, used as a signup id.
fn unix_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_sign_up_grants_free_searches_and_session() {
        let dir = tempdir().unwrap();
        let store = AccountStore::open(dir.path()).unwrap();

        let account = store.sign_up("ana@example.com", "secret", None).unwrap();
        assert_eq!(account.entitlement.searches_remaining, 3);
        assert!(!account.entitlement.is_premium);
        assert_eq!(
            store.current_user().unwrap().as_deref(),
            Some("ana@example.com")
        );
    }

    #[test]
    fn test_duplicate_sign_up_is_rejected() {
        let dir = tempdir().unwrap();
        let store = AccountStore::open(dir.path()).unwrap();
        store.sign_up("ana@example.com", "secret", None).unwrap();

        let err = store.sign_up("ana@example.com", "other", None).unwrap_err();
        assert!(matches!(err, OilGuideError::Account(_)));
    }

    #[test]
    fn test_sign_in_checks_stored_password() {
        let dir = tempdir().unwrap();
        let store = AccountStore::open(dir.path()).unwrap();
        store
            .sign_up("ana@example.com", "secret", Some("555-0100"))
            .unwrap();
        store.sign_out().unwrap();

        assert!(store.sign_in("ana@example.com", "wrong").is_err());
        assert!(store.current_user().unwrap().is_none());

        let account = store.sign_in("ana@example.com", "secret").unwrap();
        assert_eq!(account.phone.as_deref(), Some("555-0100"));
        assert!(store.current_user().unwrap().is_some());
    }

    #[test]
    fn test_sign_in_unknown_account_fails() {
        let dir = tempdir().unwrap();
        let store = AccountStore::open(dir.path()).unwrap();
        let err = store.sign_in("ghost@example.com", "pw").unwrap_err();
        assert!(matches!(err, OilGuideError::Account(_)));
    }

    #[test]
    fn test_entitlement_store_read_your_writes() {
        let dir = tempdir().unwrap();
        let store = AccountStore::open(dir.path()).unwrap();
        store.sign_up("ana@example.com", "secret", None).unwrap();

        let updated = Entitlement {
            searches_remaining: 1,
            is_premium: false,
            premium_expires_at: None,
        };
        store.save_entitlement("ana@example.com", &updated).unwrap();
        assert_eq!(
            store.load_entitlement("ana@example.com").unwrap(),
            Some(updated)
        );
    }

    #[test]
    fn test_save_entitlement_for_unknown_user_is_store_error() {
        let dir = tempdir().unwrap();
        let store = AccountStore::open(dir.path()).unwrap();
        let err = store
            .save_entitlement("ghost@example.com", &Entitlement::new_free())
            .unwrap_err();
        assert!(matches!(err, OilGuideError::Store(_)));
    }

    #[test]
    fn test_account_filename_is_sanitized() {
        let dir = tempdir().unwrap();
        let store = AccountStore::open(dir.path()).unwrap();
        let path = store.account_path("../evil@example.com");
        // '/' is mapped, so the name stays inside accounts/
        assert_eq!(path.parent().unwrap(), store.accounts_dir());
        assert!(path.file_name().unwrap().to_string_lossy().ends_with(".json"));
    }
}
